// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
///
/// 基准必须是重定向后的最终URL，而不是请求方提交的URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 判断链接是否与基准URL同域
///
/// 域名比较忽略大小写，`www.`前缀视为同域
pub fn is_same_domain(link: &Url, base: &Url) -> bool {
    match (link.host_str(), base.host_str()) {
        (Some(a), Some(b)) => {
            let a = a.to_lowercase();
            let b = b.to_lowercase();
            a == b
                || a.strip_prefix("www.") == Some(b.as_str())
                || b.strip_prefix("www.") == Some(a.as_str())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_url() {
        let base = Url::parse("http://example.com/a/b").unwrap();
        assert_eq!(
            resolve_url(&base, "http://t.co/c").unwrap().as_str(),
            "http://t.co/c"
        );
    }

    #[test]
    fn test_resolve_protocol_relative_url() {
        let base = Url::parse("https://example.com/a/b").unwrap();
        assert_eq!(
            resolve_url(&base, "//t.co/c").unwrap().as_str(),
            "https://t.co/c"
        );
    }

    #[test]
    fn test_resolve_root_relative_url() {
        let base = Url::parse("http://example.com/a/b").unwrap();
        assert_eq!(
            resolve_url(&base, "/c").unwrap().as_str(),
            "http://example.com/c"
        );
    }

    #[test]
    fn test_resolve_relative_url() {
        let base = Url::parse("http://example.com/a/b").unwrap();
        assert_eq!(
            resolve_url(&base, "c").unwrap().as_str(),
            "http://example.com/a/c"
        );
    }

    #[test]
    fn test_same_domain_ignores_www_and_case() {
        let base = Url::parse("https://Example.com/page").unwrap();
        assert!(is_same_domain(
            &Url::parse("https://www.example.com/other").unwrap(),
            &base
        ));
        assert!(!is_same_domain(
            &Url::parse("https://other.com/").unwrap(),
            &base
        ));
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_record::LinkRecord;
use crate::utils::url_utils;
use serde::Serialize;
use url::Url;

/// 链接过滤条件
#[derive(Debug, Clone, Default)]
pub struct LinkFilter {
    /// 域名允许列表（为空则不限制）
    pub filter_domains: Vec<String>,
    /// 域名排除列表
    pub exclude_domains: Vec<String>,
    /// 是否仅保留与源页面同域的链接
    pub internal_only: bool,
}

/// 分类后的单条链接
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassifiedLink {
    /// 绝对URL
    pub url: String,
    /// 链接文本
    pub text: String,
    /// 是否与源页面同域
    pub internal: bool,
}

/// 链接分析结果
#[derive(Debug, Clone, Serialize)]
pub struct LinkAnalysis {
    /// 过滤后的全部链接
    pub links: Vec<ClassifiedLink>,
    /// 同域链接数
    pub internal_count: usize,
    /// 跨域链接数
    pub external_count: usize,
}

/// 链接服务
///
/// 过滤顺序固定为允许列表、排除列表、同域限制
pub struct LinkService;

impl LinkService {
    /// 过滤并分类页面链接
    ///
    /// # 参数
    ///
    /// * `links` - 页面中的全部链接（已解析为绝对地址）
    /// * `base` - 源页面的最终URL，用于同域判断
    /// * `filter` - 过滤条件
    pub fn analyze(links: &[LinkRecord], base: &Url, filter: &LinkFilter) -> LinkAnalysis {
        let classified: Vec<ClassifiedLink> = links
            .iter()
            .filter_map(|link| {
                let parsed = Url::parse(&link.url).ok()?;
                let host = parsed.host_str()?.to_lowercase();

                if !filter.filter_domains.is_empty()
                    && !filter
                        .filter_domains
                        .iter()
                        .any(|d| domain_matches(&host, d))
                {
                    return None;
                }

                if filter
                    .exclude_domains
                    .iter()
                    .any(|d| domain_matches(&host, d))
                {
                    return None;
                }

                let internal = url_utils::is_same_domain(&parsed, base);
                if filter.internal_only && !internal {
                    return None;
                }

                Some(ClassifiedLink {
                    url: link.url.clone(),
                    text: link.text.clone(),
                    internal,
                })
            })
            .collect();

        let internal_count = classified.iter().filter(|l| l.internal).count();
        let external_count = classified.len() - internal_count;

        LinkAnalysis {
            links: classified,
            internal_count,
            external_count,
        }
    }
}

/// 域名是否命中过滤模式
///
/// 精确相等或属于该域的子域都算命中
fn domain_matches(host: &str, pattern: &str) -> bool {
    let pattern = pattern.to_lowercase();
    host == pattern || host.ends_with(&format!(".{}", pattern))
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::extraction::{AttributeRule, ExtractionConfig, SelectorKind};
use crate::engines::traits::FetchedDocument;
use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::warn;

/// 单个字段的提取结果
///
/// 字段级失败是非致命的，用标记值而不是异常传播
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    /// 提取到的值
    Value(Value),
    /// 该字段的规则执行失败，携带原因
    Failed(String),
}

/// 提取服务
///
/// 将已校验的提取配置应用到文档句柄上。单个字段失败只影响
/// 该字段，其余字段照常产出
pub struct ExtractionService;

impl ExtractionService {
    /// 按配置提取结构化数据
    ///
    /// # 参数
    ///
    /// * `doc` - 文档句柄
    /// * `config` - 已校验的提取配置
    ///
    /// # 返回值
    ///
    /// 字段名到值的JSON对象。单数规则无匹配时为null，
    /// 复数规则无匹配时为空数组；失败字段按单复数降级为null或[]
    pub fn extract(doc: &FetchedDocument, config: &ExtractionConfig) -> Value {
        let outcomes = Self::extract_outcomes(doc, config);

        let mut result = serde_json::Map::with_capacity(outcomes.len());
        for (field, outcome) in outcomes {
            let value = match outcome {
                FieldOutcome::Value(v) => v,
                FieldOutcome::Failed(reason) => {
                    warn!("Field '{}' extraction failed: {}", field, reason);
                    metrics::counter!("extraction_field_failures_total").increment(1);
                    let multiple = config.get(&field).map(|r| r.multiple).unwrap_or(false);
                    if multiple {
                        json!([])
                    } else {
                        Value::Null
                    }
                }
            };
            result.insert(field, value);
        }

        Value::Object(result)
    }

    /// 按配置提取，保留字段级成败标记
    pub fn extract_outcomes(
        doc: &FetchedDocument,
        config: &ExtractionConfig,
    ) -> HashMap<String, FieldOutcome> {
        // The document is parsed once and shared by every CSS rule
        let html = Html::parse_document(&doc.html);

        let mut outcomes = HashMap::with_capacity(config.len());
        for (field, rule) in config.iter() {
            let outcome = match rule.kind {
                SelectorKind::Css => Self::extract_css(&html, rule),
                SelectorKind::XPath => Self::extract_xpath(doc, rule),
            };
            outcomes.insert(field.clone(), outcome);
        }

        outcomes
    }

    /// 执行单条CSS规则
    fn extract_css(
        html: &Html,
        rule: &crate::domain::models::extraction::ExtractionRule,
    ) -> FieldOutcome {
        let selector = match Selector::parse(&rule.selector) {
            Ok(s) => s,
            Err(e) => {
                return FieldOutcome::Failed(format!(
                    "invalid CSS selector '{}': {:?}",
                    rule.selector, e
                ))
            }
        };

        if rule.multiple {
            // One entry per matched node; a node missing the attribute
            // contributes null so positions stay aligned
            let values: Vec<Value> = html
                .select(&selector)
                .map(|el| Self::node_value(&el, &rule.attribute))
                .collect();
            FieldOutcome::Value(Value::Array(values))
        } else {
            match html.select(&selector).next() {
                Some(el) => FieldOutcome::Value(Self::node_value(&el, &rule.attribute)),
                None => FieldOutcome::Value(Value::Null),
            }
        }
    }

    /// 执行单条XPath规则
    ///
    /// XPath只在浏览器后端求值；结果不存在说明本次抓取
    /// 用的是其他后端，按零匹配降级
    fn extract_xpath(
        doc: &FetchedDocument,
        rule: &crate::domain::models::extraction::ExtractionRule,
    ) -> FieldOutcome {
        let values = doc.xpath_results.get(&rule.selector);

        if rule.multiple {
            let array = values
                .map(|v| v.iter().map(|s| json!(s.trim())).collect::<Vec<_>>())
                .unwrap_or_default();
            FieldOutcome::Value(Value::Array(array))
        } else {
            match values.and_then(|v| v.first()) {
                Some(s) => FieldOutcome::Value(json!(s.trim())),
                None => FieldOutcome::Value(Value::Null),
            }
        }
    }

    /// 从单个节点取值
    fn node_value(el: &ElementRef<'_>, attribute: &AttributeRule) -> Value {
        match attribute {
            AttributeRule::Text => {
                let text: Vec<&str> = el.text().collect();
                let collapsed = text
                    .join(" ")
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ");
                json!(collapsed)
            }
            AttributeRule::Markup => json!(el.html()),
            AttributeRule::Attr(name) => match el.value().attr(name) {
                Some(v) => json!(v),
                None => Value::Null,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap as StdHashMap;
    use url::Url;

    fn doc(html: &str) -> FetchedDocument {
        FetchedDocument {
            requested_url: "https://example.com/".to_string(),
            final_url: Url::parse("https://example.com/").unwrap(),
            status_code: Some(200),
            content_type: Some("text/html".to_string()),
            content_length: None,
            html: html.to_string(),
            xpath_results: StdHashMap::new(),
            fetched_via: "test",
        }
    }

    const PAGE: &str = r#"
        <html><head><title>Shop</title></head><body>
            <h1>Main Header</h1>
            <p class="price">9.99</p>
            <a href="/a">First</a>
            <a href="/b">Second</a>
            <a>No href</a>
        </body></html>
    "#;

    #[test]
    fn test_singular_and_plural_extraction() {
        let config = ExtractionConfig::validate(&json!({
            "title": {"selector": "h1"},
            "links": {"selector": "a", "multiple": true}
        }))
        .unwrap();
        let result = ExtractionService::extract(&doc(PAGE), &config);

        assert_eq!(result["title"], json!("Main Header"));
        assert_eq!(result["links"], json!(["First", "Second", "No href"]));
    }

    #[test]
    fn test_zero_match_shapes() {
        let config = ExtractionConfig::validate(&json!({
            "missing_one": {"selector": ".nope"},
            "missing_many": {"selector": ".nope", "multiple": true}
        }))
        .unwrap();
        let result = ExtractionService::extract(&doc(PAGE), &config);

        assert_eq!(result["missing_one"], Value::Null);
        assert_eq!(result["missing_many"], json!([]));
    }

    #[test]
    fn test_attribute_extraction_keeps_node_positions() {
        let config = ExtractionConfig::validate(&json!({
            "hrefs": {"selector": "a", "attribute": "href", "multiple": true}
        }))
        .unwrap();
        let result = ExtractionService::extract(&doc(PAGE), &config);

        // Third anchor has no href and must still occupy a slot
        assert_eq!(result["hrefs"], json!(["/a", "/b", null]));
    }

    #[test]
    fn test_markup_attribute_returns_serialized_node() {
        let config = ExtractionConfig::validate(&json!({
            "raw": {"selector": "p.price", "attribute": null}
        }))
        .unwrap();
        let result = ExtractionService::extract(&doc(PAGE), &config);

        let raw = result["raw"].as_str().unwrap();
        assert!(raw.contains("<p class=\"price\">"));
        assert!(raw.contains("9.99"));
    }

    #[test]
    fn test_failing_field_does_not_poison_siblings() {
        let config = ExtractionConfig::validate(&json!({
            "x": {"selector": "h1"},
            "y": {"selector": "::::invalid"}
        }))
        .unwrap();

        let outcomes = ExtractionService::extract_outcomes(&doc(PAGE), &config);
        assert!(matches!(outcomes.get("y"), Some(FieldOutcome::Failed(_))));

        let result = ExtractionService::extract(&doc(PAGE), &config);
        assert_eq!(result["x"], json!("Main Header"));
        assert_eq!(result["y"], Value::Null);
    }

    #[test]
    fn test_shorthand_rule_extracts_all_text() {
        let config = ExtractionConfig::validate(&json!({"paragraphs": "p"})).unwrap();
        let result = ExtractionService::extract(&doc(PAGE), &config);
        assert_eq!(result["paragraphs"], json!(["9.99"]));
    }

    #[test]
    fn test_xpath_uses_prefetched_results() {
        let mut d = doc(PAGE);
        d.xpath_results
            .insert("//h1/text()".to_string(), vec!["Main Header".to_string()]);

        let config = ExtractionConfig::validate(&json!({
            "heading": {"selector": "//h1/text()", "selector_kind": "xpath"},
            "absent": {"selector": "//h2", "selector_kind": "xpath", "multiple": true}
        }))
        .unwrap();
        let result = ExtractionService::extract(&d, &config);

        assert_eq!(result["heading"], json!("Main Header"));
        // Not evaluated by this backend, degrades to the zero-match shape
        assert_eq!(result["absent"], json!([]));
    }
}

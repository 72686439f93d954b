// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// 提取配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 顶层不是映射
    #[error("extract_config must be an object mapping field names to rules")]
    NotAMapping,
    /// 规则缺少selector
    #[error("extraction rule '{0}' is missing required key 'selector'")]
    MissingSelector(String),
    /// selector为空
    #[error("extraction rule '{0}' has an empty selector")]
    EmptySelector(String),
    /// selector不是字符串
    #[error("extraction rule '{0}' has a non-string 'selector' value")]
    InvalidSelectorType(String),
    /// 规则类型不合法
    #[error("extraction rule '{0}' must be a string or an object, got {1}")]
    InvalidRuleType(String, &'static str),
    /// attribute字段不合法
    #[error("extraction rule '{0}' has an invalid 'attribute' value")]
    InvalidAttribute(String),
    /// multiple字段不合法
    #[error("extraction rule '{0}' has a non-boolean 'multiple' value")]
    InvalidMultiple(String),
    /// selector_kind不合法
    #[error("extraction rule '{0}' has unknown selector_kind '{1}'")]
    UnknownSelectorKind(String, String),
}

/// 属性提取策略
///
/// 决定从匹配节点中取什么内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AttributeRule {
    /// 可见文本内容
    Text,
    /// 节点的序列化HTML（显式传入null时）
    Markup,
    /// 指定HTML属性值
    Attr(String),
}

/// 选择器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectorKind {
    /// CSS选择器（默认）
    Css,
    /// XPath选择器（仅浏览器后端支持）
    XPath,
}

/// 提取规则
///
/// 单个输出字段的规范化提取规则，经校验后不可变
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionRule {
    /// 选择器
    pub selector: String,
    /// 属性提取策略
    pub attribute: AttributeRule,
    /// 是否提取全部匹配节点
    pub multiple: bool,
    /// 选择器类型
    pub kind: SelectorKind,
}

impl ExtractionRule {
    /// 字符串简写形式的规范化结果
    ///
    /// 简写规则固定为 text + multiple=true，与结构化形式的
    /// multiple=false 默认值不一致，该差异是对外契约的一部分
    fn from_shorthand(selector: String) -> Self {
        Self {
            selector,
            attribute: AttributeRule::Text,
            multiple: true,
            kind: SelectorKind::Css,
        }
    }
}

/// 提取配置
///
/// 字段名到提取规则的映射，在边界处一次性校验构建
#[derive(Debug, Clone, Default)]
pub struct ExtractionConfig {
    rules: HashMap<String, ExtractionRule>,
}

impl ExtractionConfig {
    /// 校验并规范化原始提取配置
    ///
    /// # 参数
    ///
    /// * `raw` - 调用方传入的原始JSON值
    ///
    /// # 返回值
    ///
    /// * `Ok(ExtractionConfig)` - 规范化后的配置
    /// * `Err(ConfigError)` - 配置形状非法，错误信息指明具体字段
    pub fn validate(raw: &Value) -> Result<Self, ConfigError> {
        let map = raw.as_object().ok_or(ConfigError::NotAMapping)?;

        let mut rules = HashMap::with_capacity(map.len());
        for (field, entry) in map {
            let rule = match entry {
                Value::String(s) => {
                    if s.trim().is_empty() {
                        return Err(ConfigError::EmptySelector(field.clone()));
                    }
                    ExtractionRule::from_shorthand(s.clone())
                }
                Value::Object(obj) => Self::validate_structured(field, obj)?,
                Value::Null => return Err(ConfigError::InvalidRuleType(field.clone(), "null")),
                Value::Bool(_) => return Err(ConfigError::InvalidRuleType(field.clone(), "bool")),
                Value::Number(_) => {
                    return Err(ConfigError::InvalidRuleType(field.clone(), "number"))
                }
                Value::Array(_) => {
                    return Err(ConfigError::InvalidRuleType(field.clone(), "array"))
                }
            };
            rules.insert(field.clone(), rule);
        }

        Ok(Self { rules })
    }

    /// 校验结构化规则对象
    fn validate_structured(
        field: &str,
        obj: &serde_json::Map<String, Value>,
    ) -> Result<ExtractionRule, ConfigError> {
        let selector = match obj.get("selector") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::String(_)) => return Err(ConfigError::EmptySelector(field.to_string())),
            Some(_) => return Err(ConfigError::InvalidSelectorType(field.to_string())),
            None => return Err(ConfigError::MissingSelector(field.to_string())),
        };

        // Absent key defaults to "text"; an explicit null selects raw markup.
        let attribute = match obj.get("attribute") {
            None => AttributeRule::Text,
            Some(Value::Null) => AttributeRule::Markup,
            Some(Value::String(s)) if s == "text" => AttributeRule::Text,
            Some(Value::String(s)) if !s.trim().is_empty() => AttributeRule::Attr(s.clone()),
            Some(_) => return Err(ConfigError::InvalidAttribute(field.to_string())),
        };

        let multiple = match obj.get("multiple") {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => return Err(ConfigError::InvalidMultiple(field.to_string())),
        };

        let kind = match obj.get("selector_kind") {
            None => SelectorKind::Css,
            Some(Value::String(s)) if s == "css" => SelectorKind::Css,
            Some(Value::String(s)) if s == "xpath" => SelectorKind::XPath,
            Some(Value::String(s)) => {
                return Err(ConfigError::UnknownSelectorKind(
                    field.to_string(),
                    s.clone(),
                ))
            }
            Some(other) => {
                return Err(ConfigError::UnknownSelectorKind(
                    field.to_string(),
                    other.to_string(),
                ))
            }
        };

        Ok(ExtractionRule {
            selector,
            attribute,
            multiple,
            kind,
        })
    }

    /// 是否为空配置
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 规则条数
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// 遍历字段与规则
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ExtractionRule)> {
        self.rules.iter()
    }

    /// 获取单个字段的规则
    pub fn get(&self, field: &str) -> Option<&ExtractionRule> {
        self.rules.get(field)
    }

    /// 配置中声明的全部XPath选择器
    ///
    /// 浏览器后端在页面销毁前就地求值这些选择器
    pub fn xpath_selectors(&self) -> Vec<String> {
        self.rules
            .values()
            .filter(|r| r.kind == SelectorKind::XPath)
            .map(|r| r.selector.clone())
            .collect()
    }
}

//! # Mihomo 配置文件
//!
//! 读取完整的 Mihomo/Clash 配置，提取节点名称，
//! 用生成结果覆盖 `proxy-groups` / `rule-providers` / `rules` 三个字段，其余字段原样保留。

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::route::RouteOverride;

pub const KEY_PROXIES: &str = "proxies";
pub const KEY_PROXY_GROUPS: &str = "proxy-groups";
pub const KEY_RULE_PROVIDERS: &str = "rule-providers";
pub const KEY_RULES: &str = "rules";

/// Mihomo 配置文档（保持原有键顺序）
#[derive(Debug, Clone, Default)]
pub struct Profile {
    doc: Mapping,
}

impl Profile {
    /// 从文件读取配置
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse profile: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(content)?;
        let doc = match value {
            Value::Mapping(map) => map,
            // 空文档视为空配置
            Value::Null => Mapping::new(),
            other => anyhow::bail!("Profile root must be a mapping, got {}", kind_of(&other)),
        };
        Ok(Self { doc })
    }

    /// 提取 `proxies[].name`
    ///
    /// 缺少 `proxies` 或类型不符时返回空列表；没有字符串 `name` 的条目跳过。
    pub fn node_names(&self) -> Vec<String> {
        let Some(proxies) = self.doc.get(KEY_PROXIES) else {
            return Vec::new();
        };
        let Some(list) = proxies.as_sequence() else {
            warn!("`proxies` is not a list, treating as empty");
            return Vec::new();
        };

        list.iter()
            .enumerate()
            .filter_map(|(i, proxy)| match proxy.get("name").and_then(Value::as_str) {
                Some(name) => Some(name.to_string()),
                None => {
                    warn!(index = i, "proxy entry has no string `name`, skipped");
                    None
                }
            })
            .collect()
    }

    /// 用生成结果覆盖三个字段
    ///
    /// 已存在的键保持原位置，不存在的键追加到末尾。
    pub fn apply(&mut self, route: &RouteOverride) -> Result<()> {
        self.set(KEY_PROXY_GROUPS, serde_yaml::to_value(&route.groups)?);
        self.set(KEY_RULE_PROVIDERS, serde_yaml::to_value(&route.providers)?);
        self.set(KEY_RULES, serde_yaml::to_value(&route.rules)?);
        Ok(())
    }

    fn set(&mut self, key: &str, value: Value) {
        self.doc.insert(Value::String(key.to_string()), value);
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.doc)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.doc)?)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

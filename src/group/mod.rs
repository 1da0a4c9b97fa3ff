//! # 策略组模块
//!
//! 此模块负责：
//! 1. 定义策略组的数据结构（select / url-test）
//! 2. 以声明式表格描述全部策略组的组成
//! 3. 根据节点分类结果组装完整的策略组表

pub mod assembler;
pub mod table;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use assembler::GroupAssembler;

// ========================================
// 内置出口
// ========================================

/// 直连
pub const DIRECT: &str = "DIRECT";
/// 拒绝
pub const REJECT: &str = "REJECT";

/// 内置出口（非策略组的终点）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sink {
    /// 直连（不走代理）
    Direct,
    /// 拒绝连接
    Reject,
}

impl Sink {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sink::Direct => DIRECT,
            Sink::Reject => REJECT,
        }
    }

    /// 名称是否为内置出口
    pub fn is_sink(name: &str) -> bool {
        name == DIRECT || name == REJECT
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ========================================
// 策略组结构
// ========================================

/// 策略组类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupKind {
    /// 手动选择
    Select,
    /// 按延迟自动选择
    UrlTest,
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKind::Select => write!(f, "select"),
            GroupKind::UrlTest => write!(f, "url-test"),
        }
    }
}

/// url-test 组的测速字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyProbe {
    pub url: String,
    pub interval: u64,
    pub tolerance: u64,
}

/// 单个策略组
///
/// 序列化字段与 Mihomo 的 `proxy-groups` 条目一致：
/// `name` / `type` / (`url` / `interval` / `tolerance`) / `proxies`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyGroup {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GroupKind,
    #[serde(flatten)]
    pub probe: Option<LatencyProbe>,
    pub proxies: Vec<String>,
}

impl ProxyGroup {
    pub fn select(name: impl Into<String>, proxies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: GroupKind::Select,
            probe: None,
            proxies,
        }
    }

    pub fn url_test(name: impl Into<String>, probe: LatencyProbe, proxies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: GroupKind::UrlTest,
            probe: Some(probe),
            proxies,
        }
    }
}

/// 组装好的策略组表，保持输出顺序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupTable {
    groups: Vec<ProxyGroup>,
}

impl GroupTable {
    pub fn new(groups: Vec<ProxyGroup>) -> Self {
        Self { groups }
    }

    /// 按名称查找策略组
    pub fn get(&self, name: &str) -> Option<&ProxyGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProxyGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

// ========================================
// 测试模块
// ========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_group_serialization() {
        let group = ProxyGroup::select("🇰🇷 韩国节点", vec![DIRECT.to_string()]);
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "🇰🇷 韩国节点", "type": "select", "proxies": ["DIRECT"] })
        );
    }

    #[test]
    fn test_url_test_group_serialization() {
        let group = ProxyGroup::url_test(
            "♻️ 自动优选",
            LatencyProbe {
                url: "http://www.gstatic.com/generate_204".to_string(),
                interval: 300,
                tolerance: 50,
            },
            vec!["HK-01".to_string()],
        );

        let yaml = serde_yaml::to_string(&group).unwrap();
        let keys: Vec<&str> = ["name:", "type:", "url:", "interval:", "tolerance:", "proxies:"]
            .into_iter()
            .filter(|k| yaml.contains(*k))
            .collect();
        assert_eq!(keys.len(), 6);

        // 字段顺序与 Mihomo 配置习惯一致
        let positions: Vec<usize> = keys.iter().filter_map(|k| yaml.find(*k)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", yaml);

        let parsed: ProxyGroup = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, group);
    }

    #[test]
    fn test_sink_names() {
        assert!(Sink::is_sink("DIRECT"));
        assert!(Sink::is_sink("REJECT"));
        assert!(!Sink::is_sink("direct"));
        assert_eq!(Sink::Reject.to_string(), "REJECT");
    }
}

//! # 路由覆盖组装
//!
//! 这个模块把各部分串起来，是一次生成的入口：
//! 1. 节点分类
//! 2. 组装策略组表
//! 3. 生成规则集引用表与规则列表
//!
//! 同样的节点列表总是得到同样的结果；每次调用都从头构建，不保留任何状态。

pub mod integrity;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::config::RouteSettings;
use crate::group::{GroupAssembler, GroupTable};
use crate::node::{Classification, NodeClassifier};
use crate::rule::{ProviderTable, RuleList};

pub use integrity::{IntegrityError, IntegrityReport};

/// 一次生成的完整结果，对应 Mihomo 配置中被覆盖的三个字段
#[derive(Debug, Clone, Serialize)]
pub struct RouteOverride {
    #[serde(rename = "proxy-groups")]
    pub groups: GroupTable,
    #[serde(rename = "rule-providers")]
    pub providers: ProviderTable,
    pub rules: RuleList,
}

impl RouteOverride {
    /// 完整性校验，详见 [`integrity`]
    pub fn verify(&self, nodes: &[String], strict: bool) -> Result<IntegrityReport, IntegrityError> {
        integrity::verify(self, nodes, strict)
    }
}

/// 路由覆盖生成器
pub struct RouteBuilder {
    classifier: NodeClassifier,
    assembler: GroupAssembler,
    settings: RouteSettings,
}

impl RouteBuilder {
    pub fn new(settings: RouteSettings) -> Result<Self> {
        Ok(Self {
            classifier: NodeClassifier::new()?,
            assembler: GroupAssembler::new(&settings.probe),
            settings,
        })
    }

    /// 仅做节点分类
    pub fn classify(&self, nodes: &[String]) -> Classification {
        self.classifier.classify(nodes)
    }

    /// 生成完整的路由覆盖
    pub fn build(&self, nodes: &[String]) -> RouteOverride {
        let classification = self.classifier.classify(nodes);
        let groups = self.assembler.assemble(&classification, nodes);
        let providers = ProviderTable::build(self.settings.provider_interval);
        let rules = RuleList::build();

        debug!(
            nodes = nodes.len(),
            groups = groups.len(),
            providers = providers.len(),
            rules = rules.len(),
            "assembled route override"
        );

        RouteOverride {
            groups,
            providers,
            rules,
        }
    }
}

// ========================================
// 测试模块
// ========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::table::{FINAL, KOREA, UMBRELLA};
    use crate::group::{Sink, DIRECT};

    fn nodes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn builder() -> RouteBuilder {
        RouteBuilder::new(RouteSettings::default()).unwrap()
    }

    #[test]
    fn test_build_is_deterministic() {
        let inventory = nodes(&["HK-01 香港", "US-AI-Node", "SG-AI", "日本 家宽"]);
        let a = serde_json::to_string(&builder().build(&inventory)).unwrap();
        let b = serde_json::to_string(&builder().build(&inventory)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_referential_closure() {
        let inventory = nodes(&["HK-01 香港", "US-AI-Node", "SG-AI"]);
        let route = builder().build(&inventory);

        for group in route.groups.iter() {
            for member in &group.proxies {
                assert!(
                    Sink::is_sink(member)
                        || route.groups.contains(member)
                        || inventory.contains(member),
                    "{} -> {} is dangling",
                    group.name,
                    member
                );
            }
        }
        for rule in route.rules.iter() {
            assert!(route.groups.contains(rule.target) || Sink::is_sink(rule.target));
        }
    }

    #[test]
    fn test_output_shape() {
        let route = builder().build(&nodes(&["HK-01 香港"]));
        let json = serde_json::to_value(&route).unwrap();

        assert!(json["proxy-groups"].is_array());
        assert!(json["rule-providers"]["Direct"]["url"].is_string());
        assert_eq!(json["rules"].as_array().unwrap().last().unwrap(), "MATCH,🐟 漏网之鱼");
        assert_eq!(
            route.groups.get(KOREA).unwrap().proxies,
            vec![DIRECT.to_string()]
        );
        assert!(route.groups.contains(FINAL));
        assert!(!route.groups.get(UMBRELLA).unwrap().proxies.iter().any(|p| p == UMBRELLA));
    }

    #[test]
    fn test_built_override_passes_verification() {
        let inventory = nodes(&["HK-01 香港", "US-AI-Node", "SG-AI"]);
        let route = builder().build(&inventory);
        let report = route.verify(&inventory, true).unwrap();
        assert!(report.warnings.is_empty());

        let empty = builder().build(&[]);
        assert!(empty.verify(&[], true).is_ok());
    }

    #[test]
    fn test_provider_interval_setting() {
        let mut settings = RouteSettings::default();
        settings.provider_interval = 3600;
        let route = RouteBuilder::new(settings).unwrap().build(&[]);
        assert_eq!(route.providers.get("Apple").unwrap().interval, 3600);
    }
}

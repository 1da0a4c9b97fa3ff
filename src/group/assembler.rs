//! # 策略组组装器
//!
//! 按 [`table::GROUPS`](super::table::GROUPS) 蓝图，把节点分类结果展开成最终的策略组表。
//!
//! ## 回退规则
//! 分类组、自动优选组、手动切换组的成员为空时，统一回退为 `["DIRECT"]`，
//! 保证任何策略组都不会为空。

use tracing::debug;

use crate::config::ProbeSettings;
use crate::node::Classification;

use super::table::{GroupSpec, Mode, Source, GROUPS};
use super::{GroupTable, LatencyProbe, ProxyGroup, DIRECT};

/// 空列表回退为 `["DIRECT"]`
pub fn fallback(list: &[String]) -> Vec<String> {
    if list.is_empty() {
        vec![DIRECT.to_string()]
    } else {
        list.to_vec()
    }
}

/// 策略组组装器
pub struct GroupAssembler {
    probe: LatencyProbe,
}

impl GroupAssembler {
    pub fn new(settings: &ProbeSettings) -> Self {
        Self {
            probe: LatencyProbe {
                url: settings.url.clone(),
                interval: settings.interval,
                tolerance: settings.tolerance,
            },
        }
    }

    /// 组装完整的策略组表
    pub fn assemble(&self, classification: &Classification, nodes: &[String]) -> GroupTable {
        let groups = GROUPS
            .iter()
            .map(|spec| self.build_group(spec, classification, nodes))
            .collect();
        GroupTable::new(groups)
    }

    fn build_group(
        &self,
        spec: &GroupSpec,
        classification: &Classification,
        nodes: &[String],
    ) -> ProxyGroup {
        let proxies = match spec.source {
            Source::Category(category) => {
                let members = classification.get(category);
                if members.is_empty() {
                    debug!(group = spec.name, %category, "category is empty, falling back to DIRECT");
                }
                fallback(members)
            }
            Source::AllNodes => fallback(nodes),
            Source::Members(members) => members
                .iter()
                .flat_map(|m| m.expand().iter().map(|name| name.to_string()))
                .collect(),
        };

        match spec.mode {
            Mode::Select => ProxyGroup::select(spec.name, proxies),
            Mode::UrlTest => ProxyGroup::url_test(spec.name, self.probe.clone(), proxies),
        }
    }
}

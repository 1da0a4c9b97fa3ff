//! # 完整性校验
//!
//! 策略组之间按名称互相引用，构成一张以节点/内置出口为叶子的有向图。
//! 生成结束后在这里统一检查：
//! - 策略组名称唯一、成员非空
//! - 每个成员都能解析为内置出口、策略组或输入节点
//! - 节点名称不与策略组或内置出口重名
//! - 组间引用无环（包括直接引用自身）
//! - 规则目标可解析，兜底规则有且只有一条且位于末尾
//!
//! 节点与策略组重名、规则引用了引用表中不存在的规则集，这两类问题来自输入数据，
//! 默认只给出警告，`strict` 模式下报错。

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::group::{GroupTable, Sink};
use crate::rule::RuleList;

use super::RouteOverride;

/// 完整性错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("duplicate proxy group: {0}")]
    DuplicateGroup(String),

    #[error("proxy group `{0}` has no members")]
    EmptyGroup(String),

    #[error("proxy group `{group}` references unknown member `{member}`")]
    DanglingMember { group: String, member: String },

    #[error("proxy group reference cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    #[error("rule `{rule}` targets unknown group `{target}`")]
    UnknownRuleTarget { rule: String, target: String },

    #[error("rule list has no trailing MATCH rule")]
    MissingCatchAll,

    #[error("MATCH rule at position {index} is not the last rule")]
    MisplacedCatchAll { index: usize },

    #[error("rule set `{0}` is used by a rule but not declared in rule-providers")]
    UnknownRuleSet(String),

    #[error("node `{0}` has the same name as a proxy group or built-in outbound")]
    NodeShadowsGroup(String),
}

/// 校验通过后的汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub groups: usize,
    pub providers: usize,
    pub rules: usize,
    pub warnings: Vec<String>,
}

/// 执行完整性校验
pub fn verify(
    route: &RouteOverride,
    nodes: &[String],
    strict: bool,
) -> Result<IntegrityReport, IntegrityError> {
    let node_set: HashSet<&str> = nodes.iter().map(String::as_str).collect();
    let mut warnings = Vec::new();

    // 重名节点在组间引用里无法与策略组区分，先单独报告
    for name in shadowing_nodes(&route.groups, nodes) {
        report(IntegrityError::NodeShadowsGroup(name.to_string()), strict, &mut warnings)?;
    }

    check_groups(&route.groups, &node_set)?;
    check_cycles(&route.groups, &node_set)?;
    check_rules(&route.rules, &route.groups)?;

    let mut seen = HashSet::new();
    for name in route.rules.rule_set_names() {
        if !route.providers.contains(name) && seen.insert(name) {
            report(IntegrityError::UnknownRuleSet(name.to_string()), strict, &mut warnings)?;
        }
    }

    Ok(IntegrityReport {
        groups: route.groups.len(),
        providers: route.providers.len(),
        rules: route.rules.len(),
        warnings,
    })
}

/// 输入数据问题：严格模式下直接返回错误，否则记为警告
fn report(
    error: IntegrityError,
    strict: bool,
    warnings: &mut Vec<String>,
) -> Result<(), IntegrityError> {
    if strict {
        return Err(error);
    }
    warn!("{}", error);
    warnings.push(error.to_string());
    Ok(())
}

/// 与策略组或内置出口同名的节点（去重，按输入顺序）
fn shadowing_nodes<'a>(groups: &GroupTable, nodes: &'a [String]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    nodes
        .iter()
        .map(String::as_str)
        .filter(|n| Sink::is_sink(n) || groups.contains(n))
        .filter(|n| seen.insert(*n))
        .collect()
}

/// 名称唯一、成员非空、成员可解析
fn check_groups(groups: &GroupTable, node_set: &HashSet<&str>) -> Result<(), IntegrityError> {
    let mut seen = HashSet::new();
    for group in groups.iter() {
        if !seen.insert(group.name.as_str()) {
            return Err(IntegrityError::DuplicateGroup(group.name.clone()));
        }
    }

    for group in groups.iter() {
        if group.proxies.is_empty() {
            return Err(IntegrityError::EmptyGroup(group.name.clone()));
        }
        for member in &group.proxies {
            let known = Sink::is_sink(member)
                || seen.contains(member.as_str())
                || node_set.contains(member.as_str());
            if !known {
                return Err(IntegrityError::DanglingMember {
                    group: group.name.clone(),
                    member: member.clone(),
                });
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// 深度优先检测组间引用环
///
/// 与节点同名的成员无法确定指向节点还是策略组，不计入边；
/// 这类重名已经在前面单独报告。
fn check_cycles(groups: &GroupTable, node_set: &HashSet<&str>) -> Result<(), IntegrityError> {
    // 只保留指向其他策略组的边
    let edges: HashMap<&str, Vec<&str>> = groups
        .iter()
        .map(|g| {
            let targets = g
                .proxies
                .iter()
                .map(String::as_str)
                .filter(|m| groups.contains(m) && !node_set.contains(m))
                .collect();
            (g.name.as_str(), targets)
        })
        .collect();

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    for group in groups.iter() {
        let mut path = Vec::new();
        visit(group.name.as_str(), &edges, &mut marks, &mut path)?;
    }
    Ok(())
}

fn visit<'a>(
    name: &'a str,
    edges: &HashMap<&'a str, Vec<&'a str>>,
    marks: &mut HashMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
) -> Result<(), IntegrityError> {
    match marks.get(name) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = path.iter().position(|n| *n == name).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
            cycle.push(name.to_string());
            return Err(IntegrityError::Cycle(cycle));
        }
        None => {}
    }

    marks.insert(name, Mark::Visiting);
    path.push(name);
    if let Some(targets) = edges.get(name) {
        for target in targets {
            visit(*target, edges, marks, path)?;
        }
    }
    path.pop();
    marks.insert(name, Mark::Done);
    Ok(())
}

/// 规则目标可解析，兜底规则唯一且在末尾
fn check_rules(rules: &RuleList, groups: &GroupTable) -> Result<(), IntegrityError> {
    let last = rules.len().checked_sub(1);

    for (index, rule) in rules.iter().enumerate() {
        if !Sink::is_sink(rule.target) && !groups.contains(rule.target) {
            return Err(IntegrityError::UnknownRuleTarget {
                rule: rule.to_string(),
                target: rule.target.to_string(),
            });
        }
        if rule.matcher.is_catch_all() && Some(index) != last {
            return Err(IntegrityError::MisplacedCatchAll { index });
        }
    }

    match rules.iter().last() {
        Some(rule) if rule.matcher.is_catch_all() => Ok(()),
        _ => Err(IntegrityError::MissingCatchAll),
    }
}

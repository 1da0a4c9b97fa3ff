//! # 分流规则表
//!
//! 对应 Mihomo 配置的 `rules` 段。规则按顺序匹配，首条命中即生效，
//! 因此表格顺序必须原样保留；最后一条固定为兜底的 `MATCH`。

use std::fmt;

use serde::{Serialize, Serializer};

use crate::group::table::{
    AD_BLOCK, AI_PLATFORM, APPLE, APP_PURIFY, DOMESTIC_MEDIA, FINAL, FOREIGN_MEDIA,
    GAME_PLATFORM, GLOBAL_DIRECT, GOOGLE_FCM, MS_BING, MS_ONEDRIVE, MS_SERVICES, NETFLIX,
    PRIVATE_TRACKER, SCHOOL, TALKATONE, TELEGRAM, UMBRELLA, VIRTUAL_CARD, YOUTUBE,
};

/// 规则匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// 引用 `rule-providers` 中的规则集
    RuleSet(&'static str),
    /// GeoSite 数据库分类
    GeoSite(&'static str),
    /// GeoIP 数据库国家代码
    GeoIp(&'static str),
    /// 兜底，匹配一切
    Match,
}

impl Matcher {
    /// 规则类型关键字
    pub fn kind(&self) -> &'static str {
        match self {
            Matcher::RuleSet(_) => "RULE-SET",
            Matcher::GeoSite(_) => "GEOSITE",
            Matcher::GeoIp(_) => "GEOIP",
            Matcher::Match => "MATCH",
        }
    }

    /// 规则参数（兜底规则没有参数）
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Matcher::RuleSet(k) | Matcher::GeoSite(k) | Matcher::GeoIp(k) => Some(*k),
            Matcher::Match => None,
        }
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self, Matcher::Match)
    }
}

/// 单条分流规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleEntry {
    pub matcher: Matcher,
    /// 目标策略组（或内置出口）
    pub target: &'static str,
}

impl fmt::Display for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.matcher.key() {
            Some(key) => write!(f, "{},{},{}", self.matcher.kind(), key, self.target),
            None => write!(f, "{},{}", self.matcher.kind(), self.target),
        }
    }
}

impl Serialize for RuleEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

const fn rule_set(name: &'static str, target: &'static str) -> RuleEntry {
    RuleEntry {
        matcher: Matcher::RuleSet(name),
        target,
    }
}

const RULES: &[RuleEntry] = &[
    rule_set("Direct", GLOBAL_DIRECT),
    rule_set("AI", AI_PLATFORM),
    rule_set("Talkatone", TALKATONE),
    rule_set("Card", VIRTUAL_CARD),
    rule_set("School", SCHOOL),
    rule_set("PT", PRIVATE_TRACKER),
    rule_set("Proxy", UMBRELLA),
    rule_set("LocalAreaNetwork", GLOBAL_DIRECT),
    rule_set("UnBan", GLOBAL_DIRECT),
    rule_set("BanAD", AD_BLOCK),
    rule_set("BanProgramAD", APP_PURIFY),
    rule_set("GoogleFCM", GOOGLE_FCM),
    rule_set("GoogleCN", GLOBAL_DIRECT),
    rule_set("SteamCN", GLOBAL_DIRECT),
    rule_set("AI_ACL", AI_PLATFORM),
    rule_set("OpenAi_ACL", AI_PLATFORM),
    rule_set("Bing", MS_BING),
    rule_set("OneDrive", MS_ONEDRIVE),
    rule_set("Microsoft", MS_SERVICES),
    rule_set("Apple", APPLE),
    rule_set("Telegram", TELEGRAM),
    rule_set("YouTube", YOUTUBE),
    rule_set("Netflix", NETFLIX),
    rule_set("ChinaMedia", DOMESTIC_MEDIA),
    rule_set("ProxyMedia", FOREIGN_MEDIA),
    rule_set("Epic", GAME_PLATFORM),
    rule_set("Origin", GAME_PLATFORM),
    rule_set("Sony", GAME_PLATFORM),
    rule_set("Steam", GAME_PLATFORM),
    rule_set("Nintendo", GAME_PLATFORM),
    rule_set("ProxyGFWlist", UMBRELLA),
    rule_set("ChinaDomain", GLOBAL_DIRECT),
    rule_set("ChinaCompanyIp", GLOBAL_DIRECT),
    rule_set("Download", GLOBAL_DIRECT),
    RuleEntry {
        matcher: Matcher::GeoSite("CN"),
        target: GLOBAL_DIRECT,
    },
    RuleEntry {
        matcher: Matcher::GeoSite("geolocation-!cn"),
        target: UMBRELLA,
    },
    RuleEntry {
        matcher: Matcher::GeoIp("CN"),
        target: GLOBAL_DIRECT,
    },
    RuleEntry {
        matcher: Matcher::Match,
        target: FINAL,
    },
];

/// 有序规则列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleList {
    entries: Vec<RuleEntry>,
}

impl RuleList {
    /// 生成完整规则列表
    pub fn build() -> Self {
        Self {
            entries: RULES.to_vec(),
        }
    }

    #[cfg(test)]
    pub fn from_entries(entries: Vec<RuleEntry>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 规则中引用到的规则集名称（按出现顺序）
    pub fn rule_set_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().filter_map(|r| match r.matcher {
            Matcher::RuleSet(name) => Some(name),
            _ => None,
        })
    }
}

// ========================================
// 测试模块
// ========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_formatting() {
        let lines: Vec<String> = RuleList::build().iter().map(|r| r.to_string()).collect();
        assert_eq!(lines[0], "RULE-SET,Direct,🎯 全球直连");
        assert_eq!(lines[lines.len() - 3], "GEOSITE,geolocation-!cn,🚀 万金油");
        assert_eq!(lines[lines.len() - 2], "GEOIP,CN,🎯 全球直连");
        assert_eq!(lines.last().unwrap(), "MATCH,🐟 漏网之鱼");
    }

    #[test]
    fn test_single_trailing_catch_all() {
        let rules = RuleList::build();
        let catch_all: Vec<usize> = rules
            .iter()
            .enumerate()
            .filter(|(_, r)| r.matcher.is_catch_all())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(catch_all, vec![rules.len() - 1]);
    }

    #[test]
    fn test_rule_sets_reference_known_providers() {
        let providers = super::super::ProviderTable::build(86400);
        let rules = RuleList::build();
        assert_eq!(rules.rule_set_names().count(), 34);
        assert!(rules.rule_set_names().all(|n| providers.contains(n)));
    }

    #[test]
    fn test_serializes_as_strings() {
        let rules = RuleList::from_entries(vec![RuleEntry {
            matcher: Matcher::GeoIp("CN"),
            target: "DIRECT",
        }]);
        assert_eq!(serde_json::to_string(&rules).unwrap(), r#"["GEOIP,CN,DIRECT"]"#);
    }
}

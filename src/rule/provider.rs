//! # 规则集引用表
//!
//! 对应 Mihomo 配置的 `rule-providers` 段。全部条目都是远程 classical 列表，
//! 由 Mihomo 自行下载并缓存到 `./ruleset/<name>.list`。

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// 自维护规则仓库
const PROXY_HUB: &str =
    "https://raw.githubusercontent.com/WanderingSoul49/proxy-hub/refs/heads/main/ruleset/list/";
/// ACL4SSR 规则仓库
const ACL4SSR: &str = "https://raw.githubusercontent.com/ACL4SSR/ACL4SSR/master/Clash/";

/// 规则集来源仓库
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repo {
    ProxyHub,
    Acl4ssr,
}

impl Repo {
    fn base_url(&self) -> &'static str {
        match self {
            Repo::ProxyHub => PROXY_HUB,
            Repo::Acl4ssr => ACL4SSR,
        }
    }
}

/// (名称, 仓库, 仓库内相对路径)
const PROVIDERS: &[(&str, Repo, &str)] = &[
    ("Direct", Repo::ProxyHub, "Direct.list"),
    ("AI", Repo::ProxyHub, "AI.list"),
    ("Talkatone", Repo::ProxyHub, "Talkatone.list"),
    ("Card", Repo::ProxyHub, "Card.list"),
    ("School", Repo::ProxyHub, "School.list"),
    ("PT", Repo::ProxyHub, "PT.list"),
    ("Proxy", Repo::ProxyHub, "Proxy.list"),
    // ACL4SSR
    ("LocalAreaNetwork", Repo::Acl4ssr, "LocalAreaNetwork.list"),
    ("UnBan", Repo::Acl4ssr, "UnBan.list"),
    ("BanAD", Repo::Acl4ssr, "BanAD.list"),
    ("BanProgramAD", Repo::Acl4ssr, "BanProgramAD.list"),
    ("GoogleFCM", Repo::Acl4ssr, "Ruleset/GoogleFCM.list"),
    ("GoogleCN", Repo::Acl4ssr, "GoogleCN.list"),
    ("SteamCN", Repo::Acl4ssr, "Ruleset/SteamCN.list"),
    ("AI_ACL", Repo::Acl4ssr, "Ruleset/AI.list"),
    ("OpenAi_ACL", Repo::Acl4ssr, "Ruleset/OpenAi.list"),
    ("Bing", Repo::Acl4ssr, "Bing.list"),
    ("OneDrive", Repo::Acl4ssr, "OneDrive.list"),
    ("Microsoft", Repo::Acl4ssr, "Microsoft.list"),
    ("Apple", Repo::Acl4ssr, "Apple.list"),
    ("Telegram", Repo::Acl4ssr, "Telegram.list"),
    ("YouTube", Repo::Acl4ssr, "Ruleset/YouTube.list"),
    ("Netflix", Repo::Acl4ssr, "Ruleset/Netflix.list"),
    ("ChinaMedia", Repo::Acl4ssr, "ChinaMedia.list"),
    ("ProxyMedia", Repo::Acl4ssr, "ProxyMedia.list"),
    ("Epic", Repo::Acl4ssr, "Ruleset/Epic.list"),
    ("Origin", Repo::Acl4ssr, "Ruleset/Origin.list"),
    ("Sony", Repo::Acl4ssr, "Ruleset/Sony.list"),
    ("Steam", Repo::Acl4ssr, "Ruleset/Steam.list"),
    ("Nintendo", Repo::Acl4ssr, "Ruleset/Nintendo.list"),
    ("ProxyGFWlist", Repo::Acl4ssr, "ProxyGFWlist.list"),
    ("ChinaDomain", Repo::Acl4ssr, "ChinaDomain.list"),
    ("ChinaCompanyIp", Repo::Acl4ssr, "ChinaCompanyIp.list"),
    ("Download", Repo::Acl4ssr, "Download.list"),
];

/// 单个规则集引用
///
/// 字段与 Mihomo `rule-providers` 条目一致：`type` / `behavior` / `url` / `path` / `interval`
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct RuleProvider {
    #[serde(rename = "type")]
    pub kind: String,
    pub behavior: String,
    pub url: String,
    pub path: String,
    pub interval: u64,
}

impl RuleProvider {
    /// 远程 classical 列表
    pub fn remote_classical(name: &str, url: String, interval: u64) -> Self {
        Self {
            kind: "http".to_string(),
            behavior: "classical".to_string(),
            url,
            path: format!("./ruleset/{}.list", name),
            interval,
        }
    }
}

/// 规则集引用表，按声明顺序输出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderTable {
    entries: Vec<(String, RuleProvider)>,
}

impl ProviderTable {
    /// 生成完整的规则集引用表
    pub fn build(interval: u64) -> Self {
        let entries = PROVIDERS
            .iter()
            .map(|(name, repo, rel)| {
                let url = format!("{}{}", repo.base_url(), rel);
                (
                    name.to_string(),
                    RuleProvider::remote_classical(name, url, interval),
                )
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&RuleProvider> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for ProviderTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, provider) in &self.entries {
            map.serialize_entry(name, provider)?;
        }
        map.end()
    }
}

//! # 节点分类器
//!
//! 根据节点名称中的关键字（地区名、缩写、旗帜 emoji 等）把节点划入各个分类。
//!
//! ## 判定流程
//! 1. 对每个节点只跑一遍基础正则，得到 [`NodeTraits`]
//! 2. 每个 [`Category`] 是 `NodeTraits` 上的布尔谓词（含 AND / AND-NOT 组合）
//! 3. 分类结果保持输入顺序，允许重复，允许为空
//!
//! 分类永远不会失败：匹配不到任何关键字的节点只是不进入任何分类。

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

// ========================================
// 基础正则关键字
// ========================================

const PATTERN_HOME: &str = "家宽|家庭|住宅|原生";
const PATTERN_GAME: &str = "游戏";
const PATTERN_HK: &str = "香港|HK|Hong Kong|🇭🇰|HongKong";
const PATTERN_JP: &str = "日本|川日|东京|大阪|泉日|埼玉|沪日|深日|JP|Japan";
const PATTERN_SG: &str = "新加坡|坡|狮城|SG|Singapore";
const PATTERN_US: &str = "美国|波特兰|达拉斯|俄勒冈|凤凰城|费利蒙|硅谷|拉斯维加斯|洛杉矶|圣何塞|圣克拉拉|西雅图|芝加哥|US|United States";
const PATTERN_TW: &str = "台湾|TW|taiwan|台湾地区|Taiwan";
const PATTERN_KR: &str = "KR|Korea|KOR|首尔|韩|韓";
const PATTERN_AI: &str = "AI";

// ========================================
// 分类枚举
// ========================================

/// 节点分类
///
/// 声明顺序即输出顺序（`Ord` 由 derive 按声明顺序生成）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    /// 家宽 / 住宅 / 原生 IP
    Home,
    /// 游戏专线
    Game,
    HongKong,
    Japan,
    Singapore,
    UnitedStates,
    Taiwan,
    Korea,
    /// 主要地区之外、且非家宽的节点
    Other,
    UsAi,
    SgAi,
    KrAi,
    JpAi,
    /// 带 AI 标记但不属于 US/SG/KR/JP 的节点
    OtherAi,
    /// 自动优选池：排除家宽节点
    Auto,
}

impl Category {
    /// 所有分类，按输出顺序排列
    pub const ALL: [Category; 15] = [
        Category::Home,
        Category::Game,
        Category::HongKong,
        Category::Japan,
        Category::Singapore,
        Category::UnitedStates,
        Category::Taiwan,
        Category::Korea,
        Category::Other,
        Category::UsAi,
        Category::SgAi,
        Category::KrAi,
        Category::JpAi,
        Category::OtherAi,
        Category::Auto,
    ];

    /// 分类的英文显示名
    pub fn label(&self) -> &'static str {
        match self {
            Category::Home => "Home",
            Category::Game => "Game",
            Category::HongKong => "Hong Kong",
            Category::Japan => "Japan",
            Category::Singapore => "Singapore",
            Category::UnitedStates => "United States",
            Category::Taiwan => "Taiwan",
            Category::Korea => "Korea",
            Category::Other => "Other",
            Category::UsAi => "US AI",
            Category::SgAi => "SG AI",
            Category::KrAi => "KR AI",
            Category::JpAi => "JP AI",
            Category::OtherAi => "Other AI",
            Category::Auto => "Auto",
        }
    }

    /// 判断节点特征是否满足该分类
    pub fn accepts(&self, t: &NodeTraits) -> bool {
        match self {
            Category::Home => t.home,
            Category::Game => t.game,
            Category::HongKong => t.hk,
            Category::Japan => t.jp,
            Category::Singapore => t.sg,
            Category::UnitedStates => t.us,
            Category::Taiwan => t.tw,
            Category::Korea => t.kr,
            Category::Other => !t.in_major_region() && !t.home,
            Category::UsAi => t.us && t.ai,
            Category::SgAi => t.sg && t.ai,
            Category::KrAi => t.kr && t.ai,
            Category::JpAi => t.jp && t.ai,
            Category::OtherAi => t.ai && !t.us && !t.sg && !t.kr && !t.jp,
            Category::Auto => !t.home,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ========================================
// 节点特征
// ========================================

/// 单个节点名称命中的基础关键字
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeTraits {
    pub home: bool,
    pub game: bool,
    pub hk: bool,
    pub jp: bool,
    pub sg: bool,
    pub us: bool,
    pub tw: bool,
    pub kr: bool,
    pub ai: bool,
}

impl NodeTraits {
    /// 是否命中任一主要地区 (HK/JP/SG/US/TW/KR)
    pub fn in_major_region(&self) -> bool {
        self.hk || self.jp || self.sg || self.us || self.tw || self.kr
    }
}

// ========================================
// 分类器
// ========================================

/// 节点分类器，持有编译好的基础正则
pub struct NodeClassifier {
    home: Regex,
    game: Regex,
    hk: Regex,
    jp: Regex,
    sg: Regex,
    us: Regex,
    tw: Regex,
    kr: Regex,
    ai: Regex,
}

impl NodeClassifier {
    /// 编译全部基础正则
    pub fn new() -> Result<Self> {
        let compile = |name: &str, pattern: &str| {
            Regex::new(pattern).with_context(|| format!("Invalid {} pattern: {}", name, pattern))
        };

        Ok(Self {
            home: compile("home", PATTERN_HOME)?,
            game: compile("game", PATTERN_GAME)?,
            hk: compile("hk", PATTERN_HK)?,
            jp: compile("jp", PATTERN_JP)?,
            sg: compile("sg", PATTERN_SG)?,
            us: compile("us", PATTERN_US)?,
            tw: compile("tw", PATTERN_TW)?,
            kr: compile("kr", PATTERN_KR)?,
            ai: compile("ai", PATTERN_AI)?,
        })
    }

    /// 计算单个节点名称的特征
    pub fn traits(&self, name: &str) -> NodeTraits {
        NodeTraits {
            home: self.home.is_match(name),
            game: self.game.is_match(name),
            hk: self.hk.is_match(name),
            jp: self.jp.is_match(name),
            sg: self.sg.is_match(name),
            us: self.us.is_match(name),
            tw: self.tw.is_match(name),
            kr: self.kr.is_match(name),
            ai: self.ai.is_match(name),
        }
    }

    /// 对节点列表分类
    ///
    /// 每个分类都会出现在结果中，即使没有任何节点命中。
    pub fn classify(&self, nodes: &[String]) -> Classification {
        let mut buckets: BTreeMap<Category, Vec<String>> =
            Category::ALL.iter().map(|c| (*c, Vec::new())).collect();

        for name in nodes {
            let traits = self.traits(name);
            for category in Category::ALL {
                if category.accepts(&traits) {
                    if let Some(bucket) = buckets.get_mut(&category) {
                        bucket.push(name.clone());
                    }
                }
            }
        }

        Classification { buckets }
    }
}

// ========================================
// 分类结果
// ========================================

/// 分类结果：分类 -> 按输入顺序排列的节点名
#[derive(Debug, Clone, Default)]
pub struct Classification {
    buckets: BTreeMap<Category, Vec<String>>,
}

impl Classification {
    /// 获取某个分类下的节点（未知分类返回空切片）
    pub fn get(&self, category: Category) -> &[String] {
        self.buckets
            .get(&category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// 按输出顺序遍历所有分类
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.buckets.iter().map(|(c, v)| (*c, v.as_slice()))
    }
}

/// `classify` 命令的 JSON 输出行
#[derive(Debug, Serialize)]
pub struct CategoryReport<'a> {
    pub category: &'static str,
    pub count: usize,
    pub nodes: &'a [String],
}

impl Classification {
    pub fn report(&self) -> Vec<CategoryReport<'_>> {
        self.iter()
            .map(|(category, nodes)| CategoryReport {
                category: category.label(),
                count: nodes.len(),
                nodes,
            })
            .collect()
    }
}

// ========================================
// 测试模块
// ========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_example_nodes() {
        let classifier = NodeClassifier::new().unwrap();
        let nodes = names(&["HK-01 香港", "US-AI-Node", "SG-AI"]);
        let result = classifier.classify(&nodes);

        assert_eq!(result.get(Category::HongKong), ["HK-01 香港"]);
        assert_eq!(result.get(Category::UsAi), ["US-AI-Node"]);
        assert_eq!(result.get(Category::SgAi), ["SG-AI"]);
        assert!(result.get(Category::Korea).is_empty());
        assert!(result.get(Category::OtherAi).is_empty());
    }

    #[test]
    fn test_compound_and_residual_categories() {
        let classifier = NodeClassifier::new().unwrap();
        let nodes = names(&[
            "🇩🇪 德国 01",
            "德国 家宽",
            "AI 德国",
            "首尔 AI",
            "日本 游戏",
        ]);
        let result = classifier.classify(&nodes);

        // 其他地区：不属于主要地区且不是家宽
        assert_eq!(result.get(Category::Other), ["🇩🇪 德国 01", "AI 德国"]);
        assert_eq!(result.get(Category::OtherAi), ["AI 德国"]);
        assert_eq!(result.get(Category::KrAi), ["首尔 AI"]);
        assert_eq!(result.get(Category::Game), ["日本 游戏"]);
        assert_eq!(result.get(Category::Home), ["德国 家宽"]);
        // 自动优选排除家宽
        assert_eq!(
            result.get(Category::Auto),
            ["🇩🇪 德国 01", "AI 德国", "首尔 AI", "日本 游戏"]
        );
    }

    #[test]
    fn test_patterns_are_case_sensitive() {
        let classifier = NodeClassifier::new().unwrap();
        assert!(classifier.traits("taiwan-1").tw);
        assert!(classifier.traits("Taiwan-1").tw);
        assert!(!classifier.traits("TAIWAN").tw);
        assert!(!classifier.traits("hk-01").hk);
        assert!(!classifier.traits("ai-node").ai);
    }

    #[test]
    fn test_node_can_match_several_categories() {
        let classifier = NodeClassifier::new().unwrap();
        let traits = classifier.traits("🇺🇸 US 洛杉矶 家宽 AI");
        assert!(traits.us && traits.home && traits.ai);

        let hits: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| c.accepts(&traits))
            .collect();
        assert_eq!(
            hits,
            vec![Category::Home, Category::UnitedStates, Category::UsAi]
        );
    }

    #[test]
    fn test_results_are_ordered_subsequences() {
        let classifier = NodeClassifier::new().unwrap();
        let nodes = names(&["JP 2", "HK 1", "JP 1", "JP 2", "无名节点"]);
        let result = classifier.classify(&nodes);

        // 保持输入顺序与重复
        assert_eq!(result.get(Category::Japan), ["JP 2", "JP 1", "JP 2"]);

        for (_, members) in result.iter() {
            let mut cursor = nodes.iter();
            for m in members {
                assert!(cursor.any(|n| n == m), "{} is out of order", m);
            }
        }
    }

    #[test]
    fn test_empty_input_yields_empty_buckets() {
        let classifier = NodeClassifier::new().unwrap();
        let result = classifier.classify(&[]);
        assert_eq!(result.iter().count(), Category::ALL.len());
        assert!(result.iter().all(|(_, nodes)| nodes.is_empty()));
    }
}

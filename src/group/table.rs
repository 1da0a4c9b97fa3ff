//! # 策略组蓝图
//!
//! 全部策略组的名称、类型与成员来源，以静态表格给出。
//! 表格顺序即输出顺序；组合组的成员顺序决定客户端默认选中的第一项，必须原样保留。

use crate::node::Category;

use super::{DIRECT, REJECT};

// ========================================
// 策略组名称
// ========================================

pub const UMBRELLA: &str = "🚀 万金油";
pub const AUTO: &str = "♻️ 自动优选";
pub const MANUAL: &str = "🚀 手动切换";

pub const HOME: &str = "🏡 家宽节点";
pub const GAME: &str = "🎮 游戏节点";
pub const HONG_KONG: &str = "🇭🇰 香港节点";
pub const JAPAN: &str = "🇯🇵 日本节点";
pub const SINGAPORE: &str = "🇸🇬 新加坡节点";
pub const UNITED_STATES: &str = "🇺🇲 美国节点";
pub const TAIWAN: &str = "🇨🇳 台湾节点";
pub const KOREA: &str = "🇰🇷 韩国节点";
pub const OTHER: &str = "🌐 其他地区";

pub const US_AI: &str = "🇺🇲 美国AI节点";
pub const SG_AI: &str = "🇸🇬 新加坡AI节点";
pub const KR_AI: &str = "🇰🇷 韩国AI节点";
pub const JP_AI: &str = "🇯🇵 日本AI节点";
pub const OTHER_AI: &str = "🌐 其他AI节点";

pub const AI_PLATFORM: &str = "🤖 AI平台";
pub const TALKATONE: &str = "📱 Talkatone";
pub const VIRTUAL_CARD: &str = "😏 虚拟卡服务";
pub const SCHOOL: &str = "㉆ 学校服务";
pub const PRIVATE_TRACKER: &str = "🍇 PT服务";
pub const TELEGRAM: &str = "📲 电报消息";
pub const GOOGLE_FCM: &str = "📢 谷歌FCM";
pub const MS_BING: &str = "Ⓜ️ 微软Bing";
pub const MS_ONEDRIVE: &str = "Ⓜ️ 微软云盘";
pub const MS_SERVICES: &str = "Ⓜ️ 微软服务";
pub const APPLE: &str = "🍎 苹果服务";
pub const YOUTUBE: &str = "📹 油管视频";
pub const NETFLIX: &str = "🎥 奈飞视频";
pub const FOREIGN_MEDIA: &str = "🌍 国外媒体";
pub const DOMESTIC_MEDIA: &str = "🌏 国内媒体";
pub const GAME_PLATFORM: &str = "🎮 游戏平台";
pub const GLOBAL_DIRECT: &str = "🎯 全球直连";
pub const AD_BLOCK: &str = "🛑 广告拦截";
pub const APP_PURIFY: &str = "🍃 应用净化";
pub const FINAL: &str = "🐟 漏网之鱼";

/// 通用候选列表，供伞形组与多个业务组复用
///
/// 第一项是伞形组自身；伞形组引用时从第 1 项开始切片。
pub const COMMON_GROUPS: [&str; 10] = [
    UMBRELLA,
    HOME,
    MANUAL,
    UNITED_STATES,
    HONG_KONG,
    TAIWAN,
    SINGAPORE,
    JAPAN,
    KOREA,
    OTHER,
];

/// 跳过伞形组自身的切片起点，避免伞形组引用自己
pub const COMMON_WITHOUT_UMBRELLA: usize = 1;

// ========================================
// 蓝图结构
// ========================================

/// 组合组的成员
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    /// 引用另一个策略组或内置出口
    Name(&'static str),
    /// 展开 `COMMON_GROUPS[n..]`
    CommonFrom(usize),
}

/// 策略组成员来源
#[derive(Debug, Clone, Copy)]
pub enum Source {
    /// 某个节点分类，空时回退为 `DIRECT`
    Category(Category),
    /// 全部节点，空时回退为 `DIRECT`
    AllNodes,
    /// 固定成员列表
    Members(&'static [Member]),
}

/// 策略组类型（蓝图层面）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Select,
    /// 使用生成参数中的测速配置
    UrlTest,
}

/// 单个策略组蓝图
#[derive(Debug, Clone, Copy)]
pub struct GroupSpec {
    pub name: &'static str,
    pub mode: Mode,
    pub source: Source,
}

impl Member {
    /// 把成员展开为名称序列
    pub fn expand(&self) -> &[&'static str] {
        match self {
            Member::Name(name) => std::slice::from_ref(name),
            Member::CommonFrom(start) => &COMMON_GROUPS[(*start).min(COMMON_GROUPS.len())..],
        }
    }
}

const fn select(name: &'static str, source: Source) -> GroupSpec {
    GroupSpec {
        name,
        mode: Mode::Select,
        source,
    }
}

use Member::{CommonFrom, Name};

// ========================================
// 策略组总表
// ========================================

pub const GROUPS: &[GroupSpec] = &[
    // --- 核心入口组 ---
    select(
        UMBRELLA,
        Source::Members(&[Name(AUTO), Name(MANUAL), CommonFrom(COMMON_WITHOUT_UMBRELLA)]),
    ),
    GroupSpec {
        name: AUTO,
        mode: Mode::UrlTest,
        source: Source::Category(Category::Auto),
    },
    select(MANUAL, Source::AllNodes),
    // --- 地区/功能组 ---
    select(HOME, Source::Category(Category::Home)),
    select(GAME, Source::Category(Category::Game)),
    select(HONG_KONG, Source::Category(Category::HongKong)),
    select(JAPAN, Source::Category(Category::Japan)),
    select(SINGAPORE, Source::Category(Category::Singapore)),
    select(UNITED_STATES, Source::Category(Category::UnitedStates)),
    select(TAIWAN, Source::Category(Category::Taiwan)),
    select(KOREA, Source::Category(Category::Korea)),
    select(OTHER, Source::Category(Category::Other)),
    // --- AI 组 ---
    select(US_AI, Source::Category(Category::UsAi)),
    select(SG_AI, Source::Category(Category::SgAi)),
    select(KR_AI, Source::Category(Category::KrAi)),
    select(JP_AI, Source::Category(Category::JpAi)),
    select(OTHER_AI, Source::Category(Category::OtherAi)),
    // --- 业务组 ---
    select(
        AI_PLATFORM,
        Source::Members(&[
            Name(US_AI),
            Name(UMBRELLA),
            Name(HOME),
            Name(MANUAL),
            Name(SG_AI),
            Name(JP_AI),
            Name(KR_AI),
            Name(OTHER_AI),
        ]),
    ),
    select(
        TALKATONE,
        Source::Members(&[Name(UMBRELLA), CommonFrom(COMMON_WITHOUT_UMBRELLA)]),
    ),
    select(
        VIRTUAL_CARD,
        Source::Members(&[Name(SINGAPORE), Name(UMBRELLA), CommonFrom(COMMON_WITHOUT_UMBRELLA)]),
    ),
    select(
        SCHOOL,
        Source::Members(&[Name(UNITED_STATES), Name(UMBRELLA), CommonFrom(COMMON_WITHOUT_UMBRELLA)]),
    ),
    select(
        PRIVATE_TRACKER,
        Source::Members(&[Name(UMBRELLA), CommonFrom(COMMON_WITHOUT_UMBRELLA)]),
    ),
    select(
        TELEGRAM,
        Source::Members(&[
            Name(UMBRELLA),
            Name(MANUAL),
            Name(UNITED_STATES),
            Name(HONG_KONG),
            Name(TAIWAN),
            Name(SINGAPORE),
            Name(JAPAN),
            Name(KOREA),
            Name(OTHER),
        ]),
    ),
    select(
        GOOGLE_FCM,
        Source::Members(&[
            Name(US_AI),
            Name(UMBRELLA),
            Name(MANUAL),
            Name(UNITED_STATES),
            Name(HONG_KONG),
            Name(TAIWAN),
            Name(SINGAPORE),
            Name(JAPAN),
            Name(KOREA),
            Name(OTHER),
        ]),
    ),
    select(
        MS_BING,
        Source::Members(&[Name(US_AI), Name(UMBRELLA), CommonFrom(2)]),
    ),
    select(
        MS_ONEDRIVE,
        Source::Members(&[Name(UMBRELLA), Name(MANUAL), Name(GLOBAL_DIRECT), CommonFrom(3)]),
    ),
    select(
        MS_SERVICES,
        Source::Members(&[Name(UMBRELLA), Name(MANUAL), Name(GLOBAL_DIRECT), CommonFrom(3)]),
    ),
    select(
        APPLE,
        Source::Members(&[Name(UMBRELLA), Name(MANUAL), Name(GLOBAL_DIRECT), CommonFrom(3)]),
    ),
    select(
        YOUTUBE,
        Source::Members(&[Name(AUTO), Name(UMBRELLA), Name(MANUAL)]),
    ),
    select(
        NETFLIX,
        Source::Members(&[
            Name(UMBRELLA),
            Name(MANUAL),
            Name(UNITED_STATES),
            Name(HONG_KONG),
            Name(TAIWAN),
            Name(SINGAPORE),
            Name(JAPAN),
            Name(KOREA),
            Name(OTHER),
        ]),
    ),
    select(
        FOREIGN_MEDIA,
        Source::Members(&[
            Name(UMBRELLA),
            Name(AUTO),
            Name(MANUAL),
            Name(UNITED_STATES),
            Name(HONG_KONG),
            Name(TAIWAN),
            Name(SINGAPORE),
            Name(JAPAN),
            Name(KOREA),
            Name(OTHER),
        ]),
    ),
    select(
        DOMESTIC_MEDIA,
        Source::Members(&[
            Name(GLOBAL_DIRECT),
            Name(MANUAL),
            Name(HONG_KONG),
            Name(TAIWAN),
            Name(SINGAPORE),
            Name(JAPAN),
        ]),
    ),
    select(
        GAME_PLATFORM,
        Source::Members(&[
            Name(GAME),
            Name(AUTO),
            Name(MANUAL),
            Name(HOME),
            Name(UNITED_STATES),
            Name(HONG_KONG),
            Name(TAIWAN),
            Name(SINGAPORE),
            Name(JAPAN),
            Name(KOREA),
            Name(OTHER),
            Name(DIRECT),
        ]),
    ),
    select(
        GLOBAL_DIRECT,
        Source::Members(&[Name(DIRECT), Name(MANUAL)]),
    ),
    select(AD_BLOCK, Source::Members(&[Name(REJECT), Name(DIRECT)])),
    select(APP_PURIFY, Source::Members(&[Name(REJECT), Name(DIRECT)])),
    select(
        FINAL,
        Source::Members(&[
            Name(DIRECT),
            Name(UMBRELLA),
            Name(MANUAL),
            Name(UNITED_STATES),
            Name(HONG_KONG),
            Name(TAIWAN),
            Name(SINGAPORE),
            Name(JAPAN),
            Name(KOREA),
            Name(OTHER),
        ]),
    ),
];

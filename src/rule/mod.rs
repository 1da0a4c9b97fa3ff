//! # 规则模块
//!
//! 此模块负责：
//! 1. 生成 `rule-providers` 规则集引用表
//! 2. 生成有序的 `rules` 分流规则
//! 3. 规则集文件在 list / yaml 两种写法之间互转

pub mod converter;
pub mod formatter;
pub mod provider;
pub mod table;

pub use converter::RuleSetConverter;
pub use formatter::RuleFormat;
pub use provider::ProviderTable;
pub use table::RuleList;

//! # 配置模块
//!
//! - `settings`：生成参数（测速、规则集刷新间隔）的分层加载
//! - `profile`：读取 Mihomo 配置文件并写回覆盖后的结果

pub mod profile;
pub mod settings;

// 重新导出常用类型
pub use profile::Profile;
pub use settings::{ProbeSettings, RouteSettings, SettingsOverrides};

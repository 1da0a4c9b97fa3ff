//! # 生成参数
//!
//! 自动优选组的测速参数与规则集刷新间隔。
//!
//! ## 优先级
//! 1. 命令行参数（`--probe-url` 等）
//! 2. `--settings` 指定的文件，或 `~/.config/mihomo-route/settings.yaml`
//! 3. 内置默认值
//!
//! 配置文件示例：
//! ```yaml
//! probe:
//!   url: http://www.gstatic.com/generate_204
//!   interval: 300
//!   tolerance: 50
//! provider-interval: 86400
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 默认测速地址
pub const DEFAULT_PROBE_URL: &str = "http://www.gstatic.com/generate_204";
/// 默认测速间隔（秒）
pub const DEFAULT_PROBE_INTERVAL: u64 = 300;
/// 默认切换容差（毫秒）
pub const DEFAULT_PROBE_TOLERANCE: u64 = 50;
/// 默认规则集刷新间隔（秒）
pub const DEFAULT_PROVIDER_INTERVAL: u64 = 86400;

/// 自动优选组的测速参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    pub url: String,
    pub interval: u64,
    pub tolerance: u64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_PROBE_URL.to_string(),
            interval: DEFAULT_PROBE_INTERVAL,
            tolerance: DEFAULT_PROBE_TOLERANCE,
        }
    }
}

/// 生成参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RouteSettings {
    pub probe: ProbeSettings,
    pub provider_interval: u64,
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            probe: ProbeSettings::default(),
            provider_interval: DEFAULT_PROVIDER_INTERVAL,
        }
    }
}

/// 命令行上的单项覆盖
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub probe_url: Option<String>,
    pub probe_interval: Option<u64>,
    pub tolerance: Option<u64>,
    pub provider_interval: Option<u64>,
}

impl RouteSettings {
    /// 从 YAML 文件读取参数，缺省字段使用默认值
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // 空文件视为全部默认
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// 按优先级解析最终参数
    ///
    /// `explicit` 为 `--settings` 参数；未指定时尝试默认路径，不存在则使用默认值。
    pub fn resolve(
        explicit: Option<&Path>,
        default_path: &Path,
        overrides: SettingsOverrides,
    ) -> Result<Self> {
        let mut settings = match explicit {
            Some(path) => Self::from_file(path)?,
            None if default_path.exists() => {
                debug!(path = %default_path.display(), "loading default settings file");
                Self::from_file(default_path)?
            }
            None => Self::default(),
        };

        settings.apply(overrides);
        Ok(settings)
    }

    /// 应用命令行覆盖
    pub fn apply(&mut self, overrides: SettingsOverrides) {
        if let Some(url) = overrides.probe_url {
            self.probe.url = url;
        }
        if let Some(interval) = overrides.probe_interval {
            self.probe.interval = interval;
        }
        if let Some(tolerance) = overrides.tolerance {
            self.probe.tolerance = tolerance;
        }
        if let Some(interval) = overrides.provider_interval {
            self.provider_interval = interval;
        }
    }
}

/// 默认配置目录: ~/.config/mihomo-route/
pub fn default_config_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(format!("{}/.config/mihomo-route", home))
}

/// 默认参数文件路径
pub fn default_settings_path() -> PathBuf {
    default_config_dir().join("settings.yaml")
}

//! # 规则集目录转换器
//!
//! 把源目录下的每个规则集文件转换为另一种格式，写入目标目录。
//!
//! ## 方向判定
//! 未显式指定目标格式时，取源目录中（按文件名排序）第一个带扩展名的条目：
//! 扩展名为 `.list` 则转为 yaml，否则转为 list。

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::formatter::{create_formatter, RuleFormat};

/// 单个文件的转换记录
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub source: String,
    pub output: String,
}

/// 一次目录转换的结果汇总
#[derive(Debug, Clone, Serialize)]
pub struct ConvertSummary {
    #[serde(serialize_with = "serialize_format")]
    pub target: RuleFormat,
    pub converted: Vec<Conversion>,
}

fn serialize_format<S: serde::Serializer>(
    format: &RuleFormat,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(format.extension())
}

/// 规则集目录转换器
pub struct RuleSetConverter {
    src_dir: PathBuf,
    dest_dir: PathBuf,
    /// 显式指定的目标格式
    target: Option<RuleFormat>,
}

impl RuleSetConverter {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(src_dir: P, dest_dir: Q) -> Self {
        Self {
            src_dir: src_dir.into(),
            dest_dir: dest_dir.into(),
            target: None,
        }
    }

    /// 强制指定目标格式
    pub fn with_target(mut self, target: Option<RuleFormat>) -> Self {
        self.target = target;
        self
    }

    /// 执行转换
    pub fn run(&self) -> Result<ConvertSummary> {
        let entries = self.list_entries()?;

        let target = match self.target {
            Some(t) => t,
            None => detect_target(&entries),
        };
        debug!(%target, src = %self.src_dir.display(), "converting rule sets");

        // 确保目标目录存在
        fs::create_dir_all(&self.dest_dir).with_context(|| {
            format!(
                "Failed to create destination directory: {}",
                self.dest_dir.display()
            )
        })?;

        let formatter = create_formatter(target);
        let mut converted = Vec::new();

        for path in entries {
            if !path.is_file() {
                debug!(path = %path.display(), "skipping non-file entry");
                continue;
            }

            let file_name = file_name_of(&path);
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| file_name.clone());
            let output_name = format!("{}.{}", stem, formatter.file_extension());
            let output_path = self.dest_dir.join(&output_name);

            let bytes = fs::read(&path)
                .with_context(|| format!("Failed to read rule set: {}", path.display()))?;
            let content = String::from_utf8_lossy(&bytes);
            if let Cow::Owned(_) = content {
                warn!(file = %file_name, "rule set is not valid UTF-8, invalid bytes replaced");
            }
            let result = formatter.generate_file_content(&content);
            fs::write(&output_path, result)
                .with_context(|| format!("Failed to write rule set: {}", output_path.display()))?;

            info!("✅ {} → {}", file_name, output_name);
            converted.push(Conversion {
                source: file_name,
                output: output_name,
            });
        }

        Ok(ConvertSummary { target, converted })
    }

    /// 列出源目录条目，按文件名排序
    fn list_entries(&self) -> Result<Vec<PathBuf>> {
        let read_dir = fs::read_dir(&self.src_dir).with_context(|| {
            format!("Failed to read source directory: {}", self.src_dir.display())
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.with_context(|| {
                format!("Failed to read source directory: {}", self.src_dir.display())
            })?;
            entries.push(entry.path());
        }
        entries.sort();
        Ok(entries)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 根据第一个带点的条目名推断目标格式
fn detect_target(entries: &[PathBuf]) -> RuleFormat {
    let ext = entries
        .iter()
        .map(|p| file_name_of(p))
        .find(|name| name.contains('.'))
        .and_then(|name| {
            Path::new(&name)
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
        })
        .unwrap_or_default();
    RuleFormat::target_for_source_extension(&ext)
}

// ========================================
// 测试模块
// ========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_directory_to_yaml() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::write(src.path().join("AI.list"), "# note\nDOMAIN,example.com\n").unwrap();
        fs::write(src.path().join("Card.list"), "DOMAIN-SUFFIX,card.com").unwrap();
        fs::create_dir(src.path().join("nested")).unwrap();

        let out = dest.path().join("yaml");
        let summary = RuleSetConverter::new(src.path(), &out).run().unwrap();

        assert_eq!(summary.target, RuleFormat::Yaml);
        assert_eq!(summary.converted.len(), 2);
        assert_eq!(summary.converted[0].output, "AI.yaml");
        assert_eq!(
            fs::read_to_string(out.join("AI.yaml")).unwrap(),
            "payload:\n  # note\n  - DOMAIN,example.com\n"
        );
        assert_eq!(
            fs::read_to_string(out.join("Card.yaml")).unwrap(),
            "payload:\n  - DOMAIN-SUFFIX,card.com"
        );
    }

    #[test]
    fn test_yaml_directory_to_list() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::write(
            src.path().join("Direct.yaml"),
            "payload:\n  # 直连\n  - DOMAIN,a.cn\n",
        )
        .unwrap();

        let summary = RuleSetConverter::new(src.path(), dest.path()).run().unwrap();
        assert_eq!(summary.target, RuleFormat::List);
        assert_eq!(
            fs::read_to_string(dest.path().join("Direct.list")).unwrap(),
            "# 直连\nDOMAIN,a.cn\n"
        );
    }

    #[test]
    fn test_directory_round_trip() {
        let src = tempfile::tempdir().unwrap();
        let mid = tempfile::tempdir().unwrap();
        let back = tempfile::tempdir().unwrap();
        let original = "# 广告\nDOMAIN-KEYWORD,ads\n\nIP-CIDR,1.1.1.1/32\n";
        fs::write(src.path().join("BanAD.list"), original).unwrap();

        RuleSetConverter::new(src.path(), mid.path()).run().unwrap();
        RuleSetConverter::new(mid.path(), back.path()).run().unwrap();

        assert_eq!(
            fs::read_to_string(back.path().join("BanAD.list")).unwrap(),
            original
        );
    }

    #[test]
    fn test_explicit_target_overrides_detection() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::write(src.path().join("rules.txt"), "DOMAIN,a.com\n").unwrap();

        let summary = RuleSetConverter::new(src.path(), dest.path())
            .with_target(Some(RuleFormat::Yaml))
            .run()
            .unwrap();
        assert_eq!(summary.converted[0].output, "rules.yaml");
    }

    #[test]
    fn test_invalid_utf8_does_not_abort_run() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::write(src.path().join("A.list"), "DOMAIN,a.com\n").unwrap();
        fs::write(src.path().join("B.list"), b"DOMAIN,b\xff.com\n").unwrap();
        fs::write(src.path().join("C.list"), "DOMAIN,c.com\n").unwrap();

        let summary = RuleSetConverter::new(src.path(), dest.path()).run().unwrap();
        assert_eq!(summary.converted.len(), 3);
        assert_eq!(
            fs::read_to_string(dest.path().join("B.yaml")).unwrap(),
            "payload:\n  - DOMAIN,b\u{FFFD}.com\n"
        );
        assert!(dest.path().join("C.yaml").is_file());
    }

    #[test]
    fn test_missing_source_directory() {
        let dest = tempfile::tempdir().unwrap();
        let err = RuleSetConverter::new(dest.path().join("nope"), dest.path().join("out"))
            .run()
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read source directory"));
        assert!(!dest.path().join("out").exists());
    }

    #[test]
    fn test_empty_source_directory() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let out = dest.path().join("out");
        let summary = RuleSetConverter::new(src.path(), &out).run().unwrap();
        assert!(summary.converted.is_empty());
        assert!(out.is_dir());
    }
}

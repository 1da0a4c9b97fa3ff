//! # 规则集格式化器
//!
//! 规则集文件有两种等价的纯文本写法：
//! - list：每行一条规则，如 `DOMAIN-SUFFIX,example.com`
//! - yaml：以 `payload:` 开头，规则缩进两格并加 `- ` 前缀
//!
//! 两种写法都保留空行和注释；注释统一为 `# 内容` 的形式，yaml 中缩进到与规则对齐。

use std::fmt;

/// 规则集文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RuleFormat {
    /// 每行一条规则
    List,
    /// `payload:` + 缩进列表
    Yaml,
}

impl fmt::Display for RuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl RuleFormat {
    /// 文件扩展名（不含点）
    pub fn extension(&self) -> &'static str {
        match self {
            RuleFormat::List => "list",
            RuleFormat::Yaml => "yaml",
        }
    }

    /// 根据源文件扩展名推断转换目标
    ///
    /// `.list` 转为 yaml，其余一律转为 list。
    pub fn target_for_source_extension(ext: &str) -> Self {
        if ext == "list" {
            RuleFormat::Yaml
        } else {
            RuleFormat::List
        }
    }
}

/// 单行内容分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    /// 空行（可能含空白）
    Blank,
    /// 注释，内容为 `#` 之后去除首尾空白的文本
    Comment(&'a str),
    /// 规则或其他内容，已去除首尾空白
    Entry(&'a str),
}

impl<'a> Line<'a> {
    fn parse(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Line::Blank
        } else if let Some(rest) = trimmed.strip_prefix('#') {
            Line::Comment(rest.trim())
        } else {
            Line::Entry(trimmed)
        }
    }
}

/// 规则集格式化 trait
pub trait Formatter {
    /// 转换单行，返回 `None` 表示丢弃该行
    fn format_line(&self, line: &str) -> Option<String>;

    /// 目标文件扩展名
    fn file_extension(&self) -> &'static str;

    /// 转换整个文件内容
    fn generate_file_content(&self, content: &str) -> String;
}

// ========================================
// yaml 格式化器 (list -> yaml)
// ========================================

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn format_line(&self, line: &str) -> Option<String> {
        let formatted = match Line::parse(line) {
            // 空行保持原样（包括其中的空白）
            Line::Blank => line.to_string(),
            Line::Comment(text) => format!("  # {}", text),
            Line::Entry(rule) => format!("  - {}", rule),
        };
        Some(formatted)
    }

    fn file_extension(&self) -> &'static str {
        "yaml"
    }

    fn generate_file_content(&self, content: &str) -> String {
        let body = content
            .split('\n')
            .filter_map(|line| self.format_line(line))
            .collect::<Vec<_>>()
            .join("\n");
        format!("payload:\n{}", body)
    }
}

// ========================================
// list 格式化器 (yaml -> list)
// ========================================

pub struct ListFormatter;

impl Formatter for ListFormatter {
    fn format_line(&self, line: &str) -> Option<String> {
        let formatted = match Line::parse(line) {
            Line::Entry("payload:") => return None,
            Line::Blank => String::new(),
            Line::Comment(text) => format!("# {}", text),
            // 去掉 yaml 列表前缀 `\s*-\s*`；没有前缀的行原样保留
            Line::Entry(_) => match line.trim_start().strip_prefix('-') {
                Some(rest) => rest.trim_start().to_string(),
                None => line.to_string(),
            },
        };
        Some(formatted)
    }

    fn file_extension(&self) -> &'static str {
        "list"
    }

    fn generate_file_content(&self, content: &str) -> String {
        content
            .split('\n')
            .filter_map(|line| self.format_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// 根据目标格式创建格式化器
pub fn create_formatter(format: RuleFormat) -> Box<dyn Formatter> {
    match format {
        RuleFormat::List => Box::new(ListFormatter),
        RuleFormat::Yaml => Box::new(YamlFormatter),
    }
}

// ========================================
// 测试模块
// ========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_to_yaml() {
        let input = "# note\nDOMAIN,example.com\n";
        let output = YamlFormatter.generate_file_content(input);
        assert_eq!(output, "payload:\n  # note\n  - DOMAIN,example.com\n");
    }

    #[test]
    fn test_yaml_to_list() {
        let input = "payload:\n  # note\n  - DOMAIN,example.com\n\n  -IP-CIDR,10.0.0.0/8,no-resolve\n";
        let output = ListFormatter.generate_file_content(input);
        assert_eq!(output, "# note\nDOMAIN,example.com\n\nIP-CIDR,10.0.0.0/8,no-resolve\n");
    }

    #[test]
    fn test_comment_spacing_is_normalized() {
        assert_eq!(YamlFormatter.format_line("#x").unwrap(), "  # x");
        assert_eq!(YamlFormatter.format_line("   #   spaced  ").unwrap(), "  # spaced");
        assert_eq!(ListFormatter.format_line("    #x").unwrap(), "# x");
    }

    #[test]
    fn test_blank_lines_preserved() {
        // list -> yaml 保留空行原样，yaml -> list 统一为空串
        assert_eq!(YamlFormatter.format_line("   ").unwrap(), "   ");
        assert_eq!(ListFormatter.format_line("   ").unwrap(), "");
    }

    #[test]
    fn test_yaml_line_without_dash_kept() {
        assert_eq!(ListFormatter.format_line("  DOMAIN,a.com").unwrap(), "  DOMAIN,a.com");
        assert!(ListFormatter.format_line("  payload:  ").is_none());
    }

    #[test]
    fn test_round_trip_list_yaml_list() {
        let original = "# 局域网\nDOMAIN-SUFFIX,local\n\nIP-CIDR,192.168.0.0/16,no-resolve\n# end\n";
        let yaml = YamlFormatter.generate_file_content(original);
        let back = ListFormatter.generate_file_content(&yaml);
        assert_eq!(back, original);
    }

    #[test]
    fn test_round_trip_normalizes_comment_marker() {
        let original = "#tight\nDOMAIN,a.com";
        let yaml = YamlFormatter.generate_file_content(original);
        let back = ListFormatter.generate_file_content(&yaml);
        assert_eq!(back, "# tight\nDOMAIN,a.com");
    }

    #[test]
    fn test_target_detection() {
        assert_eq!(RuleFormat::target_for_source_extension("list"), RuleFormat::Yaml);
        assert_eq!(RuleFormat::target_for_source_extension("yaml"), RuleFormat::List);
        assert_eq!(RuleFormat::target_for_source_extension(""), RuleFormat::List);
        assert_eq!(create_formatter(RuleFormat::Yaml).file_extension(), "yaml");
    }
}

//! # 节点来源
//!
//! 节点名称可以来自 Mihomo 配置文件、纯文本节点列表文件或命令行参数，
//! 按添加顺序拼接成一个清单。重复名称原样保留。

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// 节点清单：按来源顺序拼接的节点名称
#[derive(Debug, Clone, Default)]
pub struct NodeInventory {
    names: Vec<String>,
}

impl NodeInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一批节点名称
    pub fn extend<I>(&mut self, source: &str, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.names.len();
        self.names.extend(names);
        debug!(
            source,
            added = self.names.len() - before,
            "collected node names"
        );
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}

/// 读取纯文本节点列表文件
pub fn read_node_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read node list: {}", path.display()))?;
    Ok(parse_node_list(&content))
}

/// 解析节点列表：每行一个名称，忽略空行和 `#` 注释行
pub fn parse_node_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

// ========================================
// 测试模块
// ========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_node_list() {
        let content = "# 订阅导出\nHK-01 香港\n\n  US-AI-Node  \r\n#SG\nSG-AI\n";
        assert_eq!(
            parse_node_list(content),
            vec!["HK-01 香港", "US-AI-Node", "SG-AI"]
        );
    }

    #[test]
    fn test_inventory_keeps_order_and_duplicates() {
        let mut inventory = NodeInventory::new();
        inventory.extend("profile", vec!["A".to_string(), "B".to_string()]);
        inventory.extend("cli", vec!["A".to_string()]);
        assert_eq!(inventory.names(), ["A", "B", "A"]);
    }

    #[test]
    fn test_read_node_list_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_node_list(dir.path().join("missing.txt")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read node list"));
    }
}

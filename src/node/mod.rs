//! # 节点模块
//!
//! 负责获取节点名称列表，并按名称关键字对节点分类。

pub mod classifier;
pub mod source;

// 重新导出常用类型
pub use classifier::{Category, Classification, NodeClassifier};
pub use source::{read_node_list, NodeInventory};

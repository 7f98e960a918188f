//! 顶点定义
//!
//! 顶点只有名字这一身份，比较与排序都只看名字

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// 顶点
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vertex {
    /// 顶点名（唯一标识）
    name: String,
}

impl Vertex {
    /// 创建新顶点
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// 获取顶点名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 序列化为字节
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap_or_default()
    }

    /// 从字节反序列化
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        bincode::deserialize(bytes).ok()
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vertex [{}]", self.name)
    }
}

// 允许集合直接用 &str 查找顶点，哈希与相等均只依赖名字
impl Borrow<str> for Vertex {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Vertex {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

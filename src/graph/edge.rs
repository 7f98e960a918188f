//! 边定义
//!
//! 有向、带名字、带权重的边。相等性按结构判断：名字、起点、终点、权重全部相同才相等

use crate::types::Weight;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 边
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// 边名
    name: String,
    /// 起点顶点名
    from: String,
    /// 终点顶点名
    to: String,
    /// 权重
    weight: Weight,
}

impl Edge {
    /// 创建新边
    pub fn new(
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        weight: Weight,
    ) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
            weight,
        }
    }

    /// 获取边名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 获取起点顶点名
    pub fn from(&self) -> &str {
        &self.from
    }

    /// 获取终点顶点名
    pub fn to(&self) -> &str {
        &self.to
    }

    /// 获取权重
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// 双向图中自动生成的反向边，名字为 "{to} : {from}"
    pub fn mirrored(&self) -> Self {
        Self {
            name: format!("{} : {}", self.to, self.from),
            from: self.to.clone(),
            to: self.from.clone(),
            weight: self.weight,
        }
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

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Edge [name={}, from={}, to={}, weight={}]",
            self.name, self.from, self.to, self.weight
        )
    }
}

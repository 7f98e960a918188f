//! 通用类型定义

use crate::graph::Vertex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 边权重（同时用作累计距离）
pub type Weight = i64;

/// 顶点名序列表示的路径
pub type NamePath = Vec<String>;

/// 带权邻居：出边指向的顶点及该边的权重
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Neighbor {
    pub vertex: Vertex,
    pub weight: Weight,
}

impl Neighbor {
    pub fn new(vertex: Vertex, weight: Weight) -> Self {
        Self { vertex, weight }
    }
}

impl fmt::Display for Neighbor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.vertex.name(), self.weight)
    }
}

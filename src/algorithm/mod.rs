//! 图算法模块
//!
//! 包含简单路径枚举和 Dijkstra 最短路径

pub mod connectivity;
mod shortest_path;

pub use connectivity::enumerate_simple_paths;
pub use shortest_path::{format_path, PathStep, ShortestPath, ShortestPathGraph};

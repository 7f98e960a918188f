//! RouteGraph - 内存带权图库
//!
//! 面向网络拓扑分析、路由等场景：
//! - 有向 / 双向带权图，线程安全的增删边
//! - 邻接查询与全部简单路径枚举
//! - Dijkstra 单源最短路径及路径格式化
//! - 图快照持久化与 CSV / JSON Lines 边导入

pub mod algorithm;
pub mod cli;
pub mod error;
pub mod graph;
pub mod import;
pub mod metrics;
pub mod storage;
pub mod types;

// 重导出常用类型
pub use algorithm::{format_path, PathStep, ShortestPath, ShortestPathGraph};
pub use error::{Error, Result};
pub use graph::{Edge, Graph, GraphRecord, Vertex};
pub use storage::{load_graph, save_graph, SnapshotOptions};
pub use types::{NamePath, Neighbor, Weight};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! 存储模块
//!
//! 图快照文件的读写：
//! - 固定 32 字节头部（魔数、版本、标志、负载长度、CRC32）
//! - bincode 编码负载，可选 lz4 压缩

mod snapshot;

pub use snapshot::{decode_snapshot, encode_snapshot, load_graph, save_graph, SnapshotOptions};

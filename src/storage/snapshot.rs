//! 图快照文件
//!
//! 文件布局：32 字节头部 + 负载。负载是 bincode 编码的 `GraphRecord`，
//! 可选 lz4 压缩。校验和覆盖写入文件的负载字节。

use crate::error::{Error, Result};
use crate::graph::{Graph, GraphRecord};
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// 文件魔数
const MAGIC_NUMBER: u64 = 0x5254_4752_4150_4800; // "RTGRAPH\0"
/// 文件版本
const FILE_VERSION: u32 = 1;
/// 头部大小
const HEADER_SIZE: usize = 32;
/// 负载已压缩
const FLAG_COMPRESSED: u32 = 0x1;

/// 快照写入选项
#[derive(Debug, Clone, Copy)]
pub struct SnapshotOptions {
    /// 是否 lz4 压缩负载
    pub compress: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self { compress: true }
    }
}

/// 文件头部
#[derive(Debug, PartialEq)]
struct SnapshotHeader {
    magic: u64,
    version: u32,
    flags: u32,
    payload_len: u64,
    checksum: u32,
}

impl SnapshotHeader {
    fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..8].copy_from_slice(&self.magic.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.version.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.flags.to_le_bytes());
        bytes[16..24].copy_from_slice(&self.payload_len.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.checksum.to_le_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::StorageError("快照头部数据不足".to_string()));
        }

        let magic = u64::from_le_bytes(read_array(&bytes[0..8])?);
        if magic != MAGIC_NUMBER {
            return Err(Error::StorageError("无效的快照文件格式".to_string()));
        }

        let version = u32::from_le_bytes(read_array(&bytes[8..12])?);
        if version != FILE_VERSION {
            return Err(Error::StorageError(format!(
                "不支持的快照版本: {}",
                version
            )));
        }

        Ok(Self {
            magic,
            version,
            flags: u32::from_le_bytes(read_array(&bytes[12..16])?),
            payload_len: u64::from_le_bytes(read_array(&bytes[16..24])?),
            checksum: u32::from_le_bytes(read_array(&bytes[24..28])?),
        })
    }
}

fn read_array<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| Error::StorageError("头部字段长度错误".to_string()))
}

/// 把图编码为快照字节
pub fn encode_snapshot(graph: &Graph, options: SnapshotOptions) -> Result<Vec<u8>> {
    let raw = bincode::serialize(&graph.to_record())?;

    let (flags, payload) = if options.compress {
        (FLAG_COMPRESSED, compress_prepend_size(&raw))
    } else {
        (0, raw)
    };

    let header = SnapshotHeader {
        magic: MAGIC_NUMBER,
        version: FILE_VERSION,
        flags,
        payload_len: payload.len() as u64,
        checksum: crc32fast::hash(&payload),
    };

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// 从快照字节解码图
pub fn decode_snapshot(bytes: &[u8]) -> Result<Graph> {
    let header = SnapshotHeader::from_bytes(bytes)?;
    let payload = &bytes[HEADER_SIZE..];

    if payload.len() as u64 != header.payload_len {
        return Err(Error::StorageError(format!(
            "快照负载长度错误: 期望 {}, 实际 {}",
            header.payload_len,
            payload.len()
        )));
    }

    let actual = crc32fast::hash(payload);
    if actual != header.checksum {
        return Err(Error::ChecksumMismatch {
            expected: header.checksum,
            actual,
        });
    }

    let record: GraphRecord = if header.flags & FLAG_COMPRESSED != 0 {
        let raw = decompress_size_prepended(payload)
            .map_err(|e| Error::StorageError(format!("解压失败: {}", e)))?;
        bincode::deserialize(&raw)?
    } else {
        bincode::deserialize(payload)?
    };

    Ok(Graph::from_record(record))
}

/// 保存图快照到文件
pub fn save_graph<P: AsRef<Path>>(path: P, graph: &Graph, options: SnapshotOptions) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode_snapshot(graph, options)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;

    info!(
        path = %path.display(),
        bytes = bytes.len(),
        compressed = options.compress,
        "快照已保存"
    );
    Ok(())
}

/// 从文件加载图快照
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<Graph> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let graph = decode_snapshot(&bytes)?;

    debug!(
        path = %path.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "快照已加载"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use tempfile::tempdir;

    fn sample_graph() -> Graph {
        Graph::from_edges(
            vec![
                Edge::new("Edge 1_2", "Node_1", "Node_2", 12),
                Edge::new("Edge 1_3", "Node_1", "Node_3", 13),
                Edge::new("Edge 2_2", "Node_2", "Node_3", 22),
                Edge::new("Edge 2_1", "Node_2", "Node_1", 21),
            ],
            false,
        )
    }

    #[test]
    fn test_header_roundtrip() {
        let header = SnapshotHeader {
            magic: MAGIC_NUMBER,
            version: FILE_VERSION,
            flags: FLAG_COMPRESSED,
            payload_len: 1234,
            checksum: 0xdead_beef,
        };
        assert_eq!(SnapshotHeader::from_bytes(&header.to_bytes()).unwrap(), header);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let graph = sample_graph();
        graph.add_vertex("Isolated");

        for compress in [true, false] {
            let path = dir.path().join(format!("graph_{}.rtg", compress));
            save_graph(&path, &graph, SnapshotOptions { compress }).unwrap();

            let restored = load_graph(&path).unwrap();
            assert_eq!(restored.vertices(), graph.vertices());
            assert_eq!(restored.edges(), graph.edges());
            assert_eq!(restored.is_bidirectional(), graph.is_bidirectional());
        }
    }

    #[test]
    fn test_bidirectional_flag_is_preserved() {
        let graph = Graph::with_direction(true);
        graph.add_edge(&Edge::new("A_B", "A", "B", 1));

        let bytes = encode_snapshot(&graph, SnapshotOptions::default()).unwrap();
        let restored = decode_snapshot(&bytes).unwrap();
        assert!(restored.is_bidirectional());
        assert_eq!(restored.edge_count(), 2);

        // 恢复后的图继续按双向规则工作
        restored.add_edge(&Edge::new("B_C", "B", "C", 2));
        assert_eq!(restored.edge_count(), 4);
    }

    #[test]
    fn test_corrupted_payload() {
        let mut bytes = encode_snapshot(&sample_graph(), SnapshotOptions::default()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;

        assert!(matches!(
            decode_snapshot(&bytes),
            Err(Error::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_header() {
        assert!(matches!(
            decode_snapshot(&[0u8; 8]),
            Err(Error::StorageError(_))
        ));

        // 魔数最低字节本身为 0，改动高位字节
        let mut bytes = encode_snapshot(&sample_graph(), SnapshotOptions::default()).unwrap();
        bytes[7] = 0;
        assert!(matches!(decode_snapshot(&bytes), Err(Error::StorageError(_))));

        let mut bytes = encode_snapshot(&sample_graph(), SnapshotOptions::default()).unwrap();
        bytes[8] = 9;
        assert!(matches!(decode_snapshot(&bytes), Err(Error::StorageError(_))));

        let bytes = encode_snapshot(&sample_graph(), SnapshotOptions::default()).unwrap();
        assert!(matches!(
            decode_snapshot(&bytes[..bytes.len() - 3]),
            Err(Error::StorageError(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_graph(dir.path().join("missing.rtg")),
            Err(Error::IoError(_))
        ));
    }
}

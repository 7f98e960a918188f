//! 数据导入模块
//!
//! 从 CSV 或 JSON Lines 批量导入边，端点顶点随边自动创建

use crate::error::{Error, Result};
use crate::graph::{Edge, Graph};
use crate::types::Weight;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// 导入统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    /// 新增的边
    pub edges_imported: usize,
    /// 已存在而被忽略的边
    pub duplicates: usize,
    /// 无法解析的记录
    pub errors: usize,
    pub duration_ms: u64,
}

/// 边记录（CSV 表头 / JSON 字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub name: String,
    pub from: String,
    pub to: String,
    pub weight: Weight,
}

impl From<EdgeRecord> for Edge {
    fn from(r: EdgeRecord) -> Self {
        Edge::new(r.name, r.from, r.to, r.weight)
    }
}

/// 边导入器
pub struct EdgeImporter {
    graph: Arc<Graph>,
}

impl EdgeImporter {
    /// 创建导入器
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    /// 从 CSV 导入，表头为 `name,from,to,weight`
    pub fn import_csv<P: AsRef<Path>>(&self, path: P) -> Result<ImportStats> {
        let start = std::time::Instant::now();
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;

        let mut stats = ImportStats::default();
        for (line, record) in reader.deserialize::<EdgeRecord>().enumerate() {
            match record {
                Ok(record) => self.insert(record.into(), &mut stats),
                Err(e) => {
                    // 表头占第 1 行
                    warn!(line = line + 2, error = %e, "跳过无效 CSV 记录");
                    stats.errors += 1;
                }
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            edges = stats.edges_imported,
            duplicates = stats.duplicates,
            errors = stats.errors,
            "CSV 导入完成"
        );
        Ok(stats)
    }

    /// 从 JSON Lines 导入，每行一个边对象，空行忽略
    pub fn import_jsonl<P: AsRef<Path>>(&self, path: P) -> Result<ImportStats> {
        let start = std::time::Instant::now();
        let reader = BufReader::new(File::open(path)?);

        let mut stats = ImportStats::default();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match parse_json_edge(&line) {
                Ok(edge) => self.insert(edge, &mut stats),
                Err(e) => {
                    warn!(line = line_no + 1, error = %e, "跳过无效 JSON 记录");
                    stats.errors += 1;
                }
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            edges = stats.edges_imported,
            duplicates = stats.duplicates,
            errors = stats.errors,
            "JSON Lines 导入完成"
        );
        Ok(stats)
    }

    fn insert(&self, edge: Edge, stats: &mut ImportStats) {
        if self.graph.add_edge(&edge) {
            stats.edges_imported += 1;
        } else {
            stats.duplicates += 1;
        }
    }
}

/// 解析单条 JSON 边记录
fn parse_json_edge(line: &str) -> Result<Edge> {
    let record: EdgeRecord = serde_json::from_str(line)
        .map_err(|e| Error::ImportError(format!("JSON 解析错误: {}", e)))?;
    Ok(record.into())
}

/// 从 CSV 导入
pub fn import_csv<P: AsRef<Path>>(graph: Arc<Graph>, path: P) -> Result<ImportStats> {
    EdgeImporter::new(graph).import_csv(path)
}

/// 从 JSON Lines 导入
pub fn import_jsonl<P: AsRef<Path>>(graph: Arc<Graph>, path: P) -> Result<ImportStats> {
    EdgeImporter::new(graph).import_jsonl(path)
}

//! 运行指标收集模块
//!
//! 统计图修改次数与路径查询的次数、耗时，支持快照和 Prometheus 文本导出

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 全局指标
#[derive(Debug)]
pub struct Metrics {
    /// 查询统计
    query_stats: QueryStats,
    /// 图修改统计
    graph_stats: GraphStats,
    /// 启动时间
    start_time: Instant,
}

/// 查询统计
#[derive(Debug, Default)]
struct QueryStats {
    /// 最短路径查询数
    shortest_path_queries: AtomicU64,
    /// 找到路径的最短路径查询数
    shortest_path_found: AtomicU64,
    /// 简单路径枚举查询数
    connectivity_queries: AtomicU64,
    /// 枚举得到的路径总数
    paths_enumerated: AtomicU64,
    /// 查询总耗时（微秒）
    total_duration_us: AtomicU64,
    /// 慢查询数（>1s）
    slow_queries: AtomicU64,
}

/// 图修改统计
#[derive(Debug, Default)]
struct GraphStats {
    /// 顶点插入数
    vertices_inserted: AtomicU64,
    /// 孤立顶点删除数
    vertices_pruned: AtomicU64,
    /// 边插入数（含反向边）
    edges_inserted: AtomicU64,
    /// 边删除数（含反向边）
    edges_removed: AtomicU64,
}

/// 可导出的指标快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    // 查询指标
    pub shortest_path_queries: u64,
    pub shortest_path_found: u64,
    pub connectivity_queries: u64,
    pub paths_enumerated: u64,
    pub avg_query_duration_ms: f64,
    pub slow_queries: u64,

    // 图修改指标
    pub vertices_inserted: u64,
    pub vertices_pruned: u64,
    pub edges_inserted: u64,
    pub edges_removed: u64,

    // 系统指标
    pub uptime_seconds: u64,
}

/// Prometheus 格式指标
#[derive(Debug, Clone)]
pub struct PrometheusMetrics {
    pub content: String,
}

impl Metrics {
    /// 创建新的指标收集器
    pub fn new() -> Self {
        Self {
            query_stats: QueryStats::default(),
            graph_stats: GraphStats::default(),
            start_time: Instant::now(),
        }
    }

    /// 记录查询开始
    pub fn record_query_start(&self) -> QueryTimer {
        QueryTimer::new()
    }

    fn record_duration(&self, timer: QueryTimer) {
        let duration = timer.elapsed();
        self.query_stats
            .total_duration_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);

        // 慢查询：超过1秒
        if duration.as_secs() >= 1 {
            self.query_stats.slow_queries.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// 记录最短路径查询完成
    pub fn record_shortest_path_complete(&self, timer: QueryTimer, found: bool) {
        self.query_stats
            .shortest_path_queries
            .fetch_add(1, Ordering::Relaxed);
        if found {
            self.query_stats
                .shortest_path_found
                .fetch_add(1, Ordering::Relaxed);
        }
        self.record_duration(timer);
    }

    /// 记录简单路径枚举完成
    pub fn record_connectivity_complete(&self, timer: QueryTimer, paths: usize) {
        self.query_stats
            .connectivity_queries
            .fetch_add(1, Ordering::Relaxed);
        self.query_stats
            .paths_enumerated
            .fetch_add(paths as u64, Ordering::Relaxed);
        self.record_duration(timer);
    }

    /// 记录顶点插入
    pub fn record_vertex_insert(&self) {
        self.graph_stats
            .vertices_inserted
            .fetch_add(1, Ordering::Relaxed);
    }

    /// 记录孤立顶点删除
    pub fn record_vertex_prune(&self, count: u64) {
        self.graph_stats
            .vertices_pruned
            .fetch_add(count, Ordering::Relaxed);
    }

    /// 记录边插入
    pub fn record_edge_insert(&self) {
        self.graph_stats.edges_inserted.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录边删除
    pub fn record_edge_remove(&self) {
        self.graph_stats.edges_removed.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        let shortest_path_queries = self.query_stats.shortest_path_queries.load(Ordering::Relaxed);
        let connectivity_queries = self.query_stats.connectivity_queries.load(Ordering::Relaxed);
        let total_duration_us = self.query_stats.total_duration_us.load(Ordering::Relaxed);
        let total_queries = shortest_path_queries + connectivity_queries;

        let avg_query_duration_ms = if total_queries > 0 {
            (total_duration_us as f64) / (total_queries as f64) / 1000.0
        } else {
            0.0
        };

        MetricsSnapshot {
            shortest_path_queries,
            shortest_path_found: self.query_stats.shortest_path_found.load(Ordering::Relaxed),
            connectivity_queries,
            paths_enumerated: self.query_stats.paths_enumerated.load(Ordering::Relaxed),
            avg_query_duration_ms,
            slow_queries: self.query_stats.slow_queries.load(Ordering::Relaxed),
            vertices_inserted: self.graph_stats.vertices_inserted.load(Ordering::Relaxed),
            vertices_pruned: self.graph_stats.vertices_pruned.load(Ordering::Relaxed),
            edges_inserted: self.graph_stats.edges_inserted.load(Ordering::Relaxed),
            edges_removed: self.graph_stats.edges_removed.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// 导出为 Prometheus 格式
    pub fn to_prometheus(&self) -> PrometheusMetrics {
        let s = self.snapshot();

        let entries: [(&str, &str, &str, String); 11] = [
            (
                "routegraph_shortest_path_queries_total",
                "counter",
                "Number of shortest path queries",
                s.shortest_path_queries.to_string(),
            ),
            (
                "routegraph_shortest_path_found_total",
                "counter",
                "Shortest path queries that found a path",
                s.shortest_path_found.to_string(),
            ),
            (
                "routegraph_connectivity_queries_total",
                "counter",
                "Number of all-simple-paths queries",
                s.connectivity_queries.to_string(),
            ),
            (
                "routegraph_paths_enumerated_total",
                "counter",
                "Simple paths returned by connectivity queries",
                s.paths_enumerated.to_string(),
            ),
            (
                "routegraph_query_duration_avg_ms",
                "gauge",
                "Average query duration in milliseconds",
                format!("{:.2}", s.avg_query_duration_ms),
            ),
            (
                "routegraph_slow_queries_total",
                "counter",
                "Number of slow queries (>1s)",
                s.slow_queries.to_string(),
            ),
            (
                "routegraph_vertices_inserted_total",
                "counter",
                "Total vertices inserted",
                s.vertices_inserted.to_string(),
            ),
            (
                "routegraph_vertices_pruned_total",
                "counter",
                "Vertices removed after losing their last edge",
                s.vertices_pruned.to_string(),
            ),
            (
                "routegraph_edges_inserted_total",
                "counter",
                "Total edges inserted",
                s.edges_inserted.to_string(),
            ),
            (
                "routegraph_edges_removed_total",
                "counter",
                "Total edges removed",
                s.edges_removed.to_string(),
            ),
            (
                "routegraph_uptime_seconds",
                "counter",
                "Uptime in seconds",
                s.uptime_seconds.to_string(),
            ),
        ];

        let mut content = String::new();
        for (name, kind, help, value) in entries {
            content.push_str(&format!("# HELP {} {}\n", name, help));
            content.push_str(&format!("# TYPE {} {}\n", name, kind));
            content.push_str(&format!("{} {}\n", name, value));
        }

        PrometheusMetrics { content }
    }

    /// 重置所有指标
    pub fn reset(&self) {
        let counters = [
            &self.query_stats.shortest_path_queries,
            &self.query_stats.shortest_path_found,
            &self.query_stats.connectivity_queries,
            &self.query_stats.paths_enumerated,
            &self.query_stats.total_duration_us,
            &self.query_stats.slow_queries,
            &self.graph_stats.vertices_inserted,
            &self.graph_stats.vertices_pruned,
            &self.graph_stats.edges_inserted,
            &self.graph_stats.edges_removed,
        ];
        for counter in counters {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// 查询计时器
pub struct QueryTimer {
    start: Instant,
}

impl QueryTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// 全局指标实例
static METRICS: once_cell::sync::Lazy<Arc<Metrics>> =
    once_cell::sync::Lazy::new(|| Arc::new(Metrics::new()));

/// 获取全局指标实例
pub fn global_metrics() -> Arc<Metrics> {
    METRICS.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_snapshot() {
        let metrics = Metrics::new();

        let timer = metrics.record_query_start();
        std::thread::sleep(Duration::from_millis(10));
        metrics.record_shortest_path_complete(timer, true);

        let timer = metrics.record_query_start();
        metrics.record_connectivity_complete(timer, 3);

        metrics.record_edge_insert();
        metrics.record_edge_insert();
        metrics.record_edge_remove();
        metrics.record_vertex_insert();
        metrics.record_vertex_prune(2);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.shortest_path_queries, 1);
        assert_eq!(snapshot.shortest_path_found, 1);
        assert_eq!(snapshot.connectivity_queries, 1);
        assert_eq!(snapshot.paths_enumerated, 3);
        assert_eq!(snapshot.edges_inserted, 2);
        assert_eq!(snapshot.edges_removed, 1);
        assert_eq!(snapshot.vertices_pruned, 2);
        assert!(snapshot.avg_query_duration_ms >= 5.0);
    }

    #[test]
    fn test_prometheus_export() {
        let metrics = Metrics::new();
        metrics.record_edge_insert();

        let prom = metrics.to_prometheus();
        assert!(prom.content.contains("routegraph_edges_inserted_total 1"));
        assert!(prom.content.contains("# TYPE routegraph_shortest_path_queries_total counter"));
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = Metrics::new();
        metrics.record_edge_insert();
        metrics.record_vertex_prune(4);
        metrics.reset();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.edges_inserted, 0);
        assert_eq!(snapshot.vertices_pruned, 0);
    }
}

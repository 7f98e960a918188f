//! 图数据结构
//!
//! 顶点集合与边集合放在同一个 `GraphState` 中，由一把互斥锁整体保护，
//! 任何修改或快照读取都在同一个临界区内完成。

use super::edge::Edge;
use super::vertex::Vertex;
use crate::algorithm::connectivity::enumerate_simple_paths;
use crate::error::{Error, Result};
use crate::metrics::global_metrics;
use crate::types::{NamePath, Neighbor};
use indexmap::IndexSet;
use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// 锁内状态：顶点集合 + 边集合
#[derive(Debug, Clone, Default)]
pub(crate) struct GraphState {
    vertices: IndexSet<Vertex>,
    edges: IndexSet<Edge>,
}

impl GraphState {
    /// 确保顶点存在，返回是否新建
    fn ensure_vertex(&mut self, name: &str) -> bool {
        if self.vertices.contains(name) {
            return false;
        }
        self.vertices.insert(Vertex::new(name));
        global_metrics().record_vertex_insert();
        true
    }

    /// 按名字查找顶点
    pub(crate) fn vertex(&self, name: &str) -> Option<&Vertex> {
        self.vertices.get(name)
    }

    /// 出边指向的顶点列表（按边集合迭代顺序）
    pub(crate) fn adjacency_list(&self, source: &str) -> Vec<Vertex> {
        self.edges
            .iter()
            .filter(|e| e.from() == source)
            .filter_map(|e| self.vertex(e.to()).cloned())
            .collect()
    }

    /// 出边指向的顶点及权重，同一终点的多条边各占一项
    pub(crate) fn adjacency_list_with_weight(&self, source: &str) -> Vec<Neighbor> {
        self.edges
            .iter()
            .filter(|e| e.from() == source)
            .filter_map(|e| {
                self.vertex(e.to())
                    .map(|v| Neighbor::new(v.clone(), e.weight()))
            })
            .collect()
    }

    /// 整图邻接表（顶点名 -> 后继顶点名），供路径枚举使用
    ///
    /// 与 [`GraphState::adjacency_list`] 一致，每条边一项，平行边不合并。
    pub(crate) fn adjacency_map(&self) -> HashMap<String, Vec<String>> {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for edge in &self.edges {
            map.entry(edge.from().to_string())
                .or_default()
                .push(edge.to().to_string());
        }
        map
    }

    /// 删除所有没有关联边的顶点，返回删除数量
    fn prune_isolated(&mut self) -> usize {
        let connected: HashSet<&str> = self
            .edges
            .iter()
            .flat_map(|e| [e.from(), e.to()])
            .collect();

        let before = self.vertices.len();
        self.vertices.retain(|v| connected.contains(v.name()));
        before - self.vertices.len()
    }
}

/// 带权有向图（可配置为双向）
///
/// 多线程共享时用 `Arc<Graph>`。所有访问器返回独立副本，不暴露内部存储。
pub struct Graph {
    /// 顶点与边
    state: Mutex<GraphState>,
    /// 是否双向（构造后不可变）
    bidirectional: bool,
}

impl Graph {
    /// 创建空的有向图
    pub fn new() -> Self {
        Self::with_direction(false)
    }

    /// 创建空图，指定是否双向
    pub fn with_direction(bidirectional: bool) -> Self {
        Self {
            state: Mutex::new(GraphState::default()),
            bidirectional,
        }
    }

    /// 由初始边集合创建图，顶点由边的端点推导
    ///
    /// 即使 `bidirectional` 为 true，初始边也不会自动生成反向边，只有之后的
    /// [`Graph::add_edge`] 才会生成。需要反向边时使用
    /// [`Graph::bidirectional_from_edges`]。
    pub fn from_edges<I>(edges: I, bidirectional: bool) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut state = GraphState::default();
        for edge in edges {
            state.ensure_vertex(edge.from());
            state.ensure_vertex(edge.to());
            if state.edges.insert(edge) {
                global_metrics().record_edge_insert();
            }
        }

        debug!(
            vertices = state.vertices.len(),
            edges = state.edges.len(),
            bidirectional,
            "图已由初始边集合构建"
        );

        Self {
            state: Mutex::new(state),
            bidirectional,
        }
    }

    /// 同 [`Graph::from_edges`]，但边集合缺失时返回 `InvalidArgument`
    pub fn try_from_edges<I>(edges: Option<I>, bidirectional: bool) -> Result<Self>
    where
        I: IntoIterator<Item = Edge>,
    {
        match edges {
            Some(edges) => Ok(Self::from_edges(edges, bidirectional)),
            None => Err(Error::InvalidArgument("null edges".to_string())),
        }
    }

    /// 创建双向图，每条初始边都经过 `add_edge`，因此会生成反向边
    pub fn bidirectional_from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let graph = Self::with_direction(true);
        for edge in edges {
            graph.add_edge(&edge);
        }
        graph
    }

    /// 是否双向
    pub fn is_bidirectional(&self) -> bool {
        self.bidirectional
    }

    // ==================== 修改操作 ====================

    /// 显式添加一个孤立顶点，返回是否新建
    ///
    /// 孤立顶点会在下一次 [`Graph::remove_edge`] 的重新扫描中被删除。
    pub fn add_vertex(&self, name: &str) -> bool {
        self.state.lock().ensure_vertex(name)
    }

    /// 添加边
    ///
    /// 边已存在（结构相等）时不做任何事并返回 false。端点顶点不存在时自动创建；
    /// 双向图还会插入名为 `"{to} : {from}"` 的反向边。
    pub fn add_edge(&self, edge: &Edge) -> bool {
        let mut state = self.state.lock();
        if state.edges.contains(edge) {
            return false;
        }

        state.ensure_vertex(edge.from());
        state.ensure_vertex(edge.to());

        let stored = Edge::new(edge.name(), edge.from(), edge.to(), edge.weight());
        state.edges.insert(stored);
        global_metrics().record_edge_insert();
        debug!(edge = %edge, "添加边");

        if self.bidirectional {
            let mirror = edge.mirrored();
            debug!(edge = %mirror, "添加反向边");
            if state.edges.insert(mirror) {
                global_metrics().record_edge_insert();
            }
        }

        true
    }

    /// 删除边
    ///
    /// 边不存在时视为成功。双向图同时删除对应的反向边。删除后重新扫描顶点，
    /// 去掉没有任何关联边的顶点。返回主边是否删除成功。
    pub fn remove_edge(&self, edge: &Edge) -> bool {
        let mut state = self.state.lock();
        if !state.edges.contains(edge) {
            return true;
        }

        let removed = state.edges.shift_remove(edge);
        if removed {
            global_metrics().record_edge_remove();
        }
        debug!(edge = %edge, "删除边");

        if self.bidirectional {
            let mirror = edge.mirrored();
            if state.edges.shift_remove(&mirror) {
                global_metrics().record_edge_remove();
                debug!(edge = %mirror, "删除反向边");
            }
        }

        let pruned = state.prune_isolated();
        if pruned > 0 {
            global_metrics().record_vertex_prune(pruned as u64);
            debug!(pruned, "删除孤立顶点");
        }

        removed
    }

    // ==================== 快照读取 ====================

    /// 顶点集合的独立副本
    pub fn vertices(&self) -> IndexSet<Vertex> {
        self.state.lock().vertices.clone()
    }

    /// 边集合的独立副本
    pub fn edges(&self) -> IndexSet<Edge> {
        self.state.lock().edges.clone()
    }

    /// 顶点数量
    pub fn vertex_count(&self) -> usize {
        self.state.lock().vertices.len()
    }

    /// 边数量
    pub fn edge_count(&self) -> usize {
        self.state.lock().edges.len()
    }

    /// 按名字获取顶点
    pub fn get_vertex(&self, name: &str) -> Option<Vertex> {
        self.state.lock().vertex(name).cloned()
    }

    // ==================== 邻居查询 ====================

    /// 获取以 `source` 为起点的所有出边的终点顶点
    pub fn adjacency_list(&self, source: &str) -> Vec<Vertex> {
        self.state.lock().adjacency_list(source)
    }

    /// 获取以 `source` 为起点的所有出边的终点顶点及权重
    pub fn adjacency_list_with_weight(&self, source: &str) -> Vec<Neighbor> {
        self.state.lock().adjacency_list_with_weight(source)
    }

    /// 在持锁状态下执行只读操作，保证整个过程看到一致的快照
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&GraphState) -> R) -> R {
        let state = self.state.lock();
        f(&state)
    }

    // ==================== 路径枚举 ====================

    /// 枚举 `start` 到 `end` 的所有简单路径（路径内不重复经过顶点）
    ///
    /// 任一端点不存在时返回空集合。到达终点的判断不区分大小写。
    /// 复杂度在稠密或有环的图上是指数级的，只适合小图或稀疏/无环拓扑，
    /// 不做深度限制或记忆化。
    pub fn show_connectivity(&self, start: &str, end: &str) -> Vec<NamePath> {
        let metrics = global_metrics();
        let timer = metrics.record_query_start();

        // 锁内只取邻接表，枚举在锁外进行
        let adjacency = {
            let state = self.state.lock();
            if state.vertex(start).is_none() || state.vertex(end).is_none() {
                metrics.record_connectivity_complete(timer, 0);
                return Vec::new();
            }
            state.adjacency_map()
        };

        let paths = enumerate_simple_paths(&adjacency, start, end);
        debug!(start, end, paths = paths.len(), "简单路径枚举完成");
        metrics.record_connectivity_complete(timer, paths.len());
        paths
    }

    // ==================== 序列化 ====================

    /// 导出为可序列化记录
    pub fn to_record(&self) -> GraphRecord {
        let state = self.state.lock();
        GraphRecord {
            bidirectional: self.bidirectional,
            vertices: state.vertices.iter().cloned().collect(),
            edges: state.edges.iter().cloned().collect(),
        }
    }

    /// 由记录重建图，缺失的端点顶点会被补齐
    pub fn from_record(record: GraphRecord) -> Self {
        let mut state = GraphState::default();
        state.vertices.extend(record.vertices);
        for edge in record.edges {
            if !state.vertices.contains(edge.from()) {
                state.vertices.insert(Vertex::new(edge.from()));
            }
            if !state.vertices.contains(edge.to()) {
                state.vertices.insert(Vertex::new(edge.to()));
            }
            state.edges.insert(edge);
        }

        Self {
            state: Mutex::new(state),
            bidirectional: record.bidirectional,
        }
    }

    /// 序列化为字节
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self.to_record())?)
    }

    /// 从字节反序列化
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let record: GraphRecord = bincode::deserialize(bytes)?;
        Ok(Self::from_record(record))
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Graph")
            .field("bidirectional", &self.bidirectional)
            .field("vertices", &state.vertices.len())
            .field("edges", &state.edges.len())
            .finish()
    }
}

/// 图的可序列化表示（不含锁）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphRecord {
    pub bidirectional: bool,
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

impl Serialize for Graph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Graph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        GraphRecord::deserialize(deserializer).map(Graph::from_record)
    }
}

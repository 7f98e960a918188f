//! 最短路径算法
//!
//! Dijkstra 单源最短路径，建立在图的带权邻接查询之上。
//!
//! 未确定集合使用 `priority_queue::PriorityQueue`，通过 `push_increase`
//! 实现 decrease-key：顶点在队列中始终只有一项，优先级即当前已知最短距离，
//! 因此出队时不存在过期条目。距离相同的顶点出队顺序不做保证。
//!
//! 权重按非负处理，不做校验。负权重时结果不保证最短，但算法一定终止
//! （已确定的顶点不会再次入队）。

use crate::graph::{Graph, GraphState, Vertex};
use crate::metrics::global_metrics;
use crate::types::Weight;
use priority_queue::PriorityQueue;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// 路径上的一步：顶点及从源点到该顶点的累计距离
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub vertex: Vertex,
    pub distance: Weight,
}

/// 最短路径结果，按源点到终点排列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPath {
    steps: Vec<PathStep>,
}

impl ShortestPath {
    /// 路径上的所有步骤
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// 路径经过的顶点名
    pub fn vertex_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.vertex.name()).collect()
    }

    /// 终点的累计距离
    pub fn total_weight(&self) -> Weight {
        self.steps.last().map(|s| s.distance).unwrap_or(0)
    }

    /// 边数
    pub fn len(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for ShortestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_path(&self.steps))
    }
}

/// 格式化为 `name1 (w1) -> name2 (w2) -> ...`
///
/// 严格保持输入顺序，重复顶点也原样输出。空输入返回空字符串。
pub fn format_path(steps: &[PathStep]) -> String {
    steps
        .iter()
        .map(|s| format!("{} ({})", s.vertex.name(), s.distance))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// 支持最短路径查询的图
pub struct ShortestPathGraph {
    graph: Arc<Graph>,
}

impl ShortestPathGraph {
    /// 基于已有图创建
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    /// 由边集合创建有向图
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = crate::graph::Edge>,
    {
        Self::new(Arc::new(Graph::from_edges(edges, false)))
    }

    /// 底层图
    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    /// 查找 `from_name` 到 `dest_name` 的最短路径
    ///
    /// 任一顶点不存在或终点不可达时返回 `None`。顶点从不是自己的前驱，
    /// 因此 `from_name == dest_name` 时同样返回 `None`（即使存在自环）。
    /// 整个计算在图锁内完成，看到的是一致的快照。
    pub fn find_shortest_path(&self, from_name: &str, dest_name: &str) -> Option<ShortestPath> {
        let metrics = global_metrics();
        let timer = metrics.record_query_start();

        let result = self
            .graph
            .with_state(|state| dijkstra(state, from_name, dest_name));

        match &result {
            Some(path) => debug!(
                from = from_name,
                dest = dest_name,
                total = path.total_weight(),
                hops = path.len(),
                "找到最短路径"
            ),
            None => debug!(from = from_name, dest = dest_name, "未找到路径"),
        }

        metrics.record_shortest_path_complete(timer, result.is_some());
        result
    }

    /// 把最短路径结果转换为可打印字符串，`None` 返回空字符串
    pub fn path_to_string(&self, found: Option<&ShortestPath>) -> String {
        found.map(|p| format_path(p.steps())).unwrap_or_default()
    }
}

fn dijkstra(state: &GraphState, from_name: &str, dest_name: &str) -> Option<ShortestPath> {
    let source = state.vertex(from_name)?.clone();
    let dest = state.vertex(dest_name)?.clone();

    // 源点到各顶点的已知最短距离，缺失视为无穷大
    let mut distance: HashMap<Vertex, Weight> = HashMap::new();
    // 前驱顶点
    let mut previous: HashMap<Vertex, Vertex> = HashMap::new();
    let mut settled: HashSet<String> = HashSet::new();
    let mut unsettled: PriorityQueue<Vertex, Reverse<Weight>> = PriorityQueue::new();

    distance.insert(source.clone(), 0);
    unsettled.push(source, Reverse(0));

    // 不提前退出，遍历所有可达顶点
    while let Some((node, Reverse(node_distance))) = unsettled.pop() {
        trace!(vertex = node.name(), distance = node_distance, "确定顶点");
        settled.insert(node.name().to_string());

        for neighbor in state.adjacency_list_with_weight(node.name()) {
            if settled.contains(neighbor.vertex.name()) {
                continue;
            }

            let known = distance
                .get(&neighbor.vertex)
                .copied()
                .unwrap_or(Weight::MAX);
            let candidate = node_distance.saturating_add(neighbor.weight);

            if candidate < known {
                distance.insert(neighbor.vertex.clone(), candidate);
                previous.insert(neighbor.vertex.clone(), node.clone());
                unsettled.push_increase(neighbor.vertex, Reverse(candidate));
            }
        }
    }

    if !previous.contains_key(&dest) {
        return None;
    }

    // 从终点沿前驱回溯到源点
    let mut steps = Vec::new();
    let mut current = Some(dest);
    while let Some(vertex) = current {
        let d = distance.get(&vertex).copied().unwrap_or(Weight::MAX);
        current = previous.get(&vertex).cloned();
        steps.push(PathStep {
            vertex,
            distance: d,
        });
    }
    steps.reverse();

    Some(ShortestPath { steps })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use rand::{Rng, SeedableRng};

    fn network_edges() -> Vec<Edge> {
        vec![
            Edge::new("Edge 0_1", "Node_0", "Node_1", 1),
            Edge::new("Edge 0_2", "Node_0", "Node_2", 1),
            Edge::new("Edge 0_4", "Node_0", "Node_4", 1),
            Edge::new("Edge 0_10", "Node_0", "Node_10", 7),
            Edge::new("Edge 1_10", "Node_1", "Node_10", 5),
            Edge::new("Edge 2_6", "Node_2", "Node_6", 186),
            Edge::new("Edge 2_7", "Node_2", "Node_7", 103),
            Edge::new("Edge 3_7", "Node_3", "Node_7", 183),
            Edge::new("Edge 4_9", "Node_4", "Node_9", 2),
            Edge::new("Edge 5_8", "Node_5", "Node_8", 250),
            Edge::new("Edge 7_9", "Node_7", "Node_9", 1),
            Edge::new("Edge 8_9", "Node_8", "Node_9", 84),
            Edge::new("Edge 9_10", "Node_9", "Node_10", 1),
        ]
    }

    #[test]
    fn test_shortest_path_list() {
        let sp = ShortestPathGraph::from_edges(network_edges());
        let found = sp.find_shortest_path("Node_0", "Node_10");

        assert_eq!(
            sp.path_to_string(found.as_ref()),
            "Node_0 (0) -> Node_4 (1) -> Node_9 (3) -> Node_10 (4)"
        );

        let path = found.unwrap();
        assert_eq!(path.total_weight(), 4);
        assert_eq!(path.len(), 3);
        assert_eq!(path.vertex_names(), vec!["Node_0", "Node_4", "Node_9", "Node_10"]);
        assert_eq!(
            path.to_string(),
            "Node_0 (0) -> Node_4 (1) -> Node_9 (3) -> Node_10 (4)"
        );
    }

    #[test]
    fn test_shortest_path_to_self_is_not_found() {
        let sp = ShortestPathGraph::from_edges(network_edges());
        assert!(sp.find_shortest_path("Node_0", "Node_0").is_none());

        // 自环也不会让顶点成为自己的前驱
        sp.graph().add_edge(&Edge::new("Loop", "Node_0", "Node_0", 3));
        assert!(sp.find_shortest_path("Node_0", "Node_0").is_none());
    }

    #[test]
    fn test_shortest_path_disconnected() {
        let mut edges = network_edges();
        edges.push(Edge::new("Edge X_Y", "Node_X", "Node_Y", 1));
        let sp = ShortestPathGraph::from_edges(edges);

        assert!(sp.find_shortest_path("Node_0", "Node_Y").is_none());
        assert!(sp.find_shortest_path("Node_X", "Node_10").is_none());
        // 有向：反方向不可达
        assert!(sp.find_shortest_path("Node_10", "Node_0").is_none());
    }

    #[test]
    fn test_shortest_path_unknown_vertex() {
        let sp = ShortestPathGraph::from_edges(network_edges());
        assert!(sp.find_shortest_path("Node_0", "Nope").is_none());
        assert!(sp.find_shortest_path("Nope", "Node_10").is_none());
        assert_eq!(sp.path_to_string(None), "");
    }

    #[test]
    fn test_shortest_path_bidirectional_graph() {
        let graph = Arc::new(Graph::bidirectional_from_edges(network_edges()));
        let sp = ShortestPathGraph::new(graph);

        let path = sp.find_shortest_path("Node_10", "Node_0").unwrap();
        assert_eq!(
            path.to_string(),
            "Node_10 (0) -> Node_9 (1) -> Node_4 (3) -> Node_0 (4)"
        );
    }

    #[test]
    fn test_shortest_path_parallel_edges() {
        let sp = ShortestPathGraph::from_edges(vec![
            Edge::new("slow", "A", "B", 10),
            Edge::new("fast", "A", "B", 2),
            Edge::new("B_C", "B", "C", 1),
        ]);

        let path = sp.find_shortest_path("A", "C").unwrap();
        assert_eq!(path.to_string(), "A (0) -> B (2) -> C (3)");
    }

    #[test]
    fn test_format_path_keeps_order() {
        let steps = vec![
            PathStep { vertex: Vertex::new("A"), distance: 0 },
            PathStep { vertex: Vertex::new("B"), distance: 2 },
            PathStep { vertex: Vertex::new("A"), distance: 5 },
        ];
        assert_eq!(format_path(&steps), "A (0) -> B (2) -> A (5)");
        assert_eq!(format_path(&[]), "");
    }

    /// Bellman 式松弛求出的最短距离，用于对照
    fn reference_distance(edges: &[Edge], from: &str, dest: &str) -> Option<Weight> {
        let mut dist: HashMap<&str, Weight> = HashMap::new();
        dist.insert(from, 0);
        for _ in 0..edges.len() {
            for e in edges {
                if let Some(&d) = dist.get(e.from()) {
                    let candidate = d + e.weight();
                    if dist.get(e.to()).map_or(true, |&cur| candidate < cur) {
                        dist.insert(e.to(), candidate);
                    }
                }
            }
        }
        dist.get(dest).copied()
    }

    #[test]
    fn test_shortest_path_matches_reference_on_random_graphs() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        for round in 0..20 {
            let edges: Vec<Edge> = (0..40)
                .map(|i| {
                    let from = format!("V{}", rng.gen_range(0..12));
                    let to = format!("V{}", rng.gen_range(0..12));
                    Edge::new(format!("E{}_{}", round, i), from, to, rng.gen_range(0..20))
                })
                .collect();
            let sp = ShortestPathGraph::from_edges(edges.clone());

            for target in 1..12 {
                let dest = format!("V{}", target);
                if sp.graph().get_vertex("V0").is_none() || sp.graph().get_vertex(&dest).is_none() {
                    continue;
                }

                let expected = reference_distance(&edges, "V0", &dest);
                let found = sp.find_shortest_path("V0", &dest);
                assert_eq!(found.as_ref().map(|p| p.total_weight()), expected);

                if let Some(path) = found {
                    // 相邻两步之间必须存在权重等于距离差的边
                    for pair in path.steps().windows(2) {
                        let delta = pair[1].distance - pair[0].distance;
                        assert!(edges.iter().any(|e| e.from() == pair[0].vertex.name()
                            && e.to() == pair[1].vertex.name()
                            && e.weight() == delta));
                    }
                }
            }
        }
    }
}

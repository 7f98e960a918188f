//! 简单路径枚举
//!
//! 深度优先、显式栈实现，不依赖递归深度。路径中已出现的顶点不再进入，
//! 保证每条结果都是简单路径。

use crate::types::NamePath;
use std::collections::HashMap;

/// 栈帧：当前顶点及下一个待尝试的后继下标
struct Frame<'a> {
    node: &'a str,
    cursor: usize,
}

/// 不区分大小写的顶点名比较
fn is_target(node: &str, target_lower: &str) -> bool {
    node.to_lowercase() == target_lower
}

/// 枚举 `start` 到 `end` 的所有简单路径
///
/// `adjacency` 为顶点名到后继顶点名的映射。到达与 `end` 大小写无关相等的顶点即
/// 记录一条结果并回溯。结果之间的顺序取决于邻接表顺序。
pub fn enumerate_simple_paths(
    adjacency: &HashMap<String, Vec<String>>,
    start: &str,
    end: &str,
) -> Vec<NamePath> {
    let target = end.to_lowercase();
    let mut results = Vec::new();

    let mut path: Vec<&str> = vec![start];
    if is_target(start, &target) {
        results.push(to_owned_path(&path));
        return results;
    }

    let mut stack = vec![Frame {
        node: start,
        cursor: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let next = adjacency
            .get(frame.node)
            .and_then(|targets| targets.get(frame.cursor));

        let Some(next) = next else {
            // 后继已尝试完，回溯
            stack.pop();
            path.pop();
            continue;
        };
        frame.cursor += 1;

        let next = next.as_str();
        if path.contains(&next) {
            continue;
        }

        path.push(next);
        if is_target(next, &target) {
            results.push(to_owned_path(&path));
            path.pop();
            continue;
        }

        stack.push(Frame {
            node: next,
            cursor: 0,
        });
    }

    results
}

fn to_owned_path(path: &[&str]) -> NamePath {
    path.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (from, to) in pairs {
            map.entry(from.to_string()).or_default().push(to.to_string());
        }
        map
    }

    fn sorted(mut paths: Vec<NamePath>) -> Vec<NamePath> {
        paths.sort();
        paths
    }

    fn path(names: &[&str]) -> NamePath {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_two_paths() {
        let adj = adjacency(&[
            ("Node_1", "Node_2"),
            ("Node_1", "Node_3"),
            ("Node_2", "Node_3"),
            ("Node_2", "Node_1"),
        ]);

        let paths = sorted(enumerate_simple_paths(&adj, "Node_1", "Node_3"));
        assert_eq!(
            paths,
            vec![
                path(&["Node_1", "Node_2", "Node_3"]),
                path(&["Node_1", "Node_3"]),
            ]
        );
    }

    #[test]
    fn test_cycles_are_not_revisited() {
        // A <-> B <-> C <-> A，全连接环
        let adj = adjacency(&[
            ("A", "B"),
            ("B", "A"),
            ("B", "C"),
            ("C", "B"),
            ("C", "A"),
            ("A", "C"),
        ]);

        let paths = sorted(enumerate_simple_paths(&adj, "A", "C"));
        assert_eq!(paths, vec![path(&["A", "B", "C"]), path(&["A", "C"])]);
    }

    #[test]
    fn test_parallel_successors_yield_separate_paths() {
        let adj = adjacency(&[("A", "B"), ("A", "B"), ("B", "C")]);

        assert_eq!(
            enumerate_simple_paths(&adj, "A", "C"),
            vec![path(&["A", "B", "C"]), path(&["A", "B", "C"])]
        );
    }

    #[test]
    fn test_start_equals_end() {
        let adj = adjacency(&[("A", "B"), ("B", "A")]);
        assert_eq!(enumerate_simple_paths(&adj, "A", "A"), vec![path(&["A"])]);
    }

    #[test]
    fn test_case_insensitive_target() {
        let adj = adjacency(&[("A", "b"), ("b", "c")]);
        assert_eq!(enumerate_simple_paths(&adj, "A", "B"), vec![path(&["A", "b"])]);
    }

    #[test]
    fn test_unreachable() {
        let adj = adjacency(&[("A", "B"), ("C", "D")]);
        assert!(enumerate_simple_paths(&adj, "A", "D").is_empty());
    }

    #[test]
    fn test_deep_chain_without_recursion() {
        let names: Vec<String> = (0..5_000).map(|i| format!("N{}", i)).collect();
        let mut adj: HashMap<String, Vec<String>> = HashMap::new();
        for pair in names.windows(2) {
            adj.insert(pair[0].clone(), vec![pair[1].clone()]);
        }

        let paths = enumerate_simple_paths(&adj, "N0", "N4999");
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 5_000);
    }
}

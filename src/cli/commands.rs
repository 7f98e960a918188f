//! 交互命令参数解析

use crate::error::{Error, Result};
use crate::graph::Edge;
use crate::types::Weight;

/// 拆分命令名与其余参数，参数保留原样（仅去掉首尾空白）
pub fn split_command(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (input, ""),
    }
}

/// 解析 `<边名> <起点> <终点> <权重>`
///
/// 起点、终点、权重从右侧取，其余部分整体作为边名，因此边名可以含空格，
/// 例如双向图自动生成的 `Node_B : Node_A`。边名两侧的双引号会被去掉。
pub fn parse_edge(args: &str) -> Result<Edge> {
    let (rest, weight) = split_last_field(args)?;
    let (rest, to) = split_last_field(rest)?;
    let (name, from) = split_last_field(rest)?;

    let name = name.trim().trim_matches('"');
    if name.is_empty() {
        return Err(Error::InvalidArgument("边名不能为空".to_string()));
    }

    let weight: Weight = weight
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("无效的权重: {}", weight)))?;

    Ok(Edge::new(name, from, to, weight))
}

fn split_last_field(input: &str) -> Result<(&str, &str)> {
    input
        .trim_end()
        .rsplit_once(char::is_whitespace)
        .map(|(head, field)| (head.trim_end(), field))
        .ok_or_else(|| Error::InvalidArgument("参数个数错误".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("  shortest A  B "), ("shortest", "A  B"));
        assert_eq!(split_command("stats"), ("stats", ""));
    }

    #[test]
    fn test_parse_edge() {
        let edge = parse_edge("E1 Node_0 Node_1 5").unwrap();
        assert_eq!(edge, Edge::new("E1", "Node_0", "Node_1", 5));
    }

    #[test]
    fn test_parse_edge_name_with_spaces() {
        // 双向图的反向边名含空格
        let mirror = Edge::new("A_B", "A", "B", 3).mirrored();
        let edge = parse_edge("B : A  B   A 3").unwrap();
        assert_eq!(edge, mirror);

        let quoted = parse_edge("\"Edge 1_2\" Node_1 Node_2 12").unwrap();
        assert_eq!(quoted.name(), "Edge 1_2");
    }

    #[test]
    fn test_parse_edge_invalid() {
        assert!(matches!(parse_edge("A B 3"), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse_edge("E A B x"), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse_edge("\"\" A B 1"), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse_edge(""), Err(Error::InvalidArgument(_))));
    }
}

//! 结果打印器
//!
//! 提供表格和垂直格式的结果输出

use crate::algorithm::ShortestPath;
use crate::graph::{Edge, Vertex};
use crate::types::{NamePath, Neighbor};
use prettytable::{format, row, Cell, Row, Table};

/// 打印模式
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PrintMode {
    /// 表格模式
    Table,
    /// 垂直模式 (\G)
    Vertical,
}

/// 结果打印器
pub struct Printer {
    mode: PrintMode,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(PrintMode::Table)
    }
}

impl Printer {
    pub fn new(mode: PrintMode) -> Self {
        Self { mode }
    }

    /// 设置打印模式
    pub fn set_mode(&mut self, mode: PrintMode) {
        self.mode = mode;
    }

    /// 打印通用结果
    pub fn print_result(&self, columns: &[&str], rows: &[Vec<String>], elapsed_ms: u64) -> String {
        if columns.is_empty() || rows.is_empty() {
            return format!("Empty set ({} ms)\n", elapsed_ms);
        }

        let output = match self.mode {
            PrintMode::Table => self.format_table(columns, rows),
            PrintMode::Vertical => self.format_vertical(columns, rows),
        };

        format!("{}\n{} row(s) in set ({} ms)\n", output, rows.len(), elapsed_ms)
    }

    /// 顶点列表
    pub fn print_vertices<'a, I>(&self, vertices: I, elapsed_ms: u64) -> String
    where
        I: IntoIterator<Item = &'a Vertex>,
    {
        let mut names: Vec<&str> = vertices.into_iter().map(|v| v.name()).collect();
        names.sort_unstable();
        let rows: Vec<Vec<String>> = names.into_iter().map(|n| vec![n.to_string()]).collect();
        self.print_result(&["Vertex"], &rows, elapsed_ms)
    }

    /// 边列表
    pub fn print_edges<'a, I>(&self, edges: I, elapsed_ms: u64) -> String
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        let rows: Vec<Vec<String>> = edges
            .into_iter()
            .map(|e| {
                vec![
                    e.name().to_string(),
                    e.from().to_string(),
                    e.to().to_string(),
                    e.weight().to_string(),
                ]
            })
            .collect();
        self.print_result(&["Name", "From", "To", "Weight"], &rows, elapsed_ms)
    }

    /// 带权邻居列表
    pub fn print_neighbors(&self, neighbors: &[Neighbor], elapsed_ms: u64) -> String {
        let rows: Vec<Vec<String>> = neighbors
            .iter()
            .map(|n| vec![n.vertex.name().to_string(), n.weight.to_string()])
            .collect();
        self.print_result(&["Neighbor", "Weight"], &rows, elapsed_ms)
    }

    /// 简单路径列表
    pub fn print_paths(&self, paths: &[NamePath], elapsed_ms: u64) -> String {
        let rows: Vec<Vec<String>> = paths
            .iter()
            .enumerate()
            .map(|(i, p)| {
                vec![
                    (i + 1).to_string(),
                    p.len().saturating_sub(1).to_string(),
                    p.join(" -> "),
                ]
            })
            .collect();
        self.print_result(&["#", "Hops", "Path"], &rows, elapsed_ms)
    }

    /// 最短路径逐步明细
    pub fn print_shortest_path(&self, path: &ShortestPath, elapsed_ms: u64) -> String {
        let rows: Vec<Vec<String>> = path
            .steps()
            .iter()
            .enumerate()
            .map(|(i, s)| vec![i.to_string(), s.vertex.name().to_string(), s.distance.to_string()])
            .collect();
        self.print_result(&["Step", "Vertex", "Distance"], &rows, elapsed_ms)
    }

    /// 表格格式
    fn format_table(&self, columns: &[&str], rows: &[Vec<String>]) -> String {
        let mut table = Table::new();

        // 设置表格格式
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        let header: Vec<Cell> = columns.iter().map(|c| Cell::new(c)).collect();
        table.set_titles(Row::new(header));

        for row_data in rows {
            let cells: Vec<Cell> = row_data.iter().map(|v| Cell::new(v)).collect();
            table.add_row(Row::new(cells));
        }

        table.to_string()
    }

    /// 垂直格式
    fn format_vertical(&self, columns: &[&str], rows: &[Vec<String>]) -> String {
        let max_col_width = columns.iter().map(|c| c.len()).max().unwrap_or(0);
        let mut output = String::new();

        for (i, row_data) in rows.iter().enumerate() {
            output.push_str(&format!(
                "*************************** {}. row ***************************\n",
                i + 1
            ));

            for (j, col) in columns.iter().enumerate() {
                let value = row_data.get(j).map(|s| s.as_str()).unwrap_or("");
                output.push_str(&format!("{:>width$}: {}\n", col, value, width = max_col_width));
            }
        }

        output
    }

    /// 打印统计信息
    pub fn print_stats(
        &self,
        vertex_count: usize,
        edge_count: usize,
        bidirectional: bool,
    ) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Property", "Value"]);
        table.add_row(row!["Vertex Count", vertex_count.to_string()]);
        table.add_row(row!["Edge Count", edge_count.to_string()]);
        table.add_row(row!["Bidirectional", bidirectional.to_string()]);
        table.to_string()
    }

    /// 打印帮助信息
    pub fn print_help() -> String {
        r#"
═══════════════════════════════════════════════════════════════
                   RouteGraph CLI 命令帮助
═══════════════════════════════════════════════════════════════

基础命令:
  help, h, ?                     显示帮助
  quit, exit, q                  退出程序
  stats, info                    显示图统计信息
  metrics                        显示运行指标 (Prometheus 格式)

查询:
  vertices                       列出所有顶点
  edges                          列出所有边
  neighbors, n <顶点>            查看出边邻居及权重
                                 示例: neighbors Node_0
  paths <起点> <终点>            枚举所有简单路径（仅适合小图）
                                 示例: paths Node_1 Node_3
  shortest, path <起点> <终点>   Dijkstra 最短路径
                                 示例: shortest Node_0 Node_10

修改:
  add <边名> <起点> <终点> <权重>
                                 示例: add E1 Node_0 Node_1 5
  remove <边名> <起点> <终点> <权重>
                                 示例: remove E1 Node_0 Node_1 5
  save <文件>                    保存图快照

提示: 在命令末尾加 \G 可垂直显示结果
      边名可以含空格，起点、终点、权重取最后三项
                                 示例: remove Node_1 : Node_0 Node_1 Node_0 5

═══════════════════════════════════════════════════════════════
"#
        .to_string()
    }
}

/// 检查命令是否以 \G 结尾（垂直显示）
pub fn check_vertical_display(input: &str) -> (String, bool) {
    let trimmed = input.trim();
    if trimmed.ends_with("\\G") || trimmed.ends_with("\\g") {
        let clean = trimmed[..trimmed.len() - 2].trim().to_string();
        (clean, true)
    } else {
        (trimmed.to_string(), false)
    }
}

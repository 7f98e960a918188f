//! RouteGraph CLI 工具
//!
//! 交互式命令行界面

use anyhow::{bail, Context};
use clap::Parser;
use colored::Colorize;
use routegraph::cli::{check_vertical_display, parse_edge, split_command, PrintMode, Printer};
use routegraph::import::EdgeImporter;
use routegraph::metrics::global_metrics;
use routegraph::{load_graph, save_graph, Graph, ShortestPathGraph, SnapshotOptions};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "routegraph-cli")]
#[command(about = "RouteGraph 命令行工具")]
struct Args {
    /// 边数据文件
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// 输入格式: csv, jsonl
    #[arg(short, long, default_value = "csv")]
    format: String,

    /// 从快照文件加载（与 --input 互斥）
    #[arg(short, long, conflicts_with = "input")]
    snapshot: Option<PathBuf>,

    /// 双向图：每条边自动生成反向边
    #[arg(short, long)]
    bidirectional: bool,

    /// 执行单个命令后退出
    #[arg(short = 'e', long)]
    execute: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("routegraph=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    println!("{}", "RouteGraph CLI - 内存带权图".bold());
    println!("=============================");

    let graph = open_graph(&args)?;

    println!("  顶点数: {}", graph.vertex_count());
    println!("  边数: {}", graph.edge_count());
    println!("  双向: {}", graph.is_bidirectional());

    let mut printer = Printer::default();

    // 单个命令模式
    if let Some(command) = args.execute {
        handle_command(&graph, &mut printer, &command)?;
        return Ok(());
    }

    // 交互模式
    println!("\n输入 'help' 查看命令列表，'quit' 退出\n");

    let stdin = io::stdin();
    loop {
        print!("routegraph> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match handle_command(&graph, &mut printer, line) {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => println!("{} {:#}", "错误:".red(), e),
        }
    }

    println!("再见！");
    Ok(())
}

fn open_graph(args: &Args) -> anyhow::Result<Arc<Graph>> {
    if let Some(path) = &args.snapshot {
        let graph = load_graph(path).with_context(|| format!("无法加载快照 {}", path.display()))?;
        println!("快照已加载: {}", path.display());
        return Ok(Arc::new(graph));
    }

    let graph = Arc::new(Graph::with_direction(args.bidirectional));
    if let Some(path) = &args.input {
        let importer = EdgeImporter::new(graph.clone());
        let stats = match args.format.as_str() {
            "csv" => importer.import_csv(path)?,
            "jsonl" | "json" => importer.import_jsonl(path)?,
            other => bail!("不支持的格式: {}", other),
        };
        println!(
            "已导入 {} 条边（重复 {}，错误 {}，耗时 {} ms）",
            stats.edges_imported, stats.duplicates, stats.errors, stats.duration_ms
        );
    }
    Ok(graph)
}

fn handle_command(
    graph: &Arc<Graph>,
    printer: &mut Printer,
    input: &str,
) -> anyhow::Result<bool> {
    let (input, vertical) = check_vertical_display(input);
    printer.set_mode(if vertical {
        PrintMode::Vertical
    } else {
        PrintMode::Table
    });

    let (cmd, raw_args) = split_command(&input);
    if cmd.is_empty() {
        return Ok(false);
    }
    let cmd = cmd.to_lowercase();
    let args: Vec<&str> = raw_args.split_whitespace().collect();
    let start = Instant::now();

    match cmd.as_str() {
        "quit" | "exit" | "q" => return Ok(true),

        "help" | "h" | "?" => {
            print!("{}", Printer::print_help());
        }

        "stats" | "info" => {
            let stats = printer.print_stats(
                graph.vertex_count(),
                graph.edge_count(),
                graph.is_bidirectional(),
            );
            print!("{}", stats);
        }

        "metrics" => {
            print!("{}", global_metrics().to_prometheus().content);
        }

        "vertices" => {
            let vertices = graph.vertices();
            print!("{}", printer.print_vertices(vertices.iter(), elapsed_ms(start)));
        }

        "edges" => {
            let edges = graph.edges();
            print!("{}", printer.print_edges(edges.iter(), elapsed_ms(start)));
        }

        "neighbors" | "n" => match args.as_slice() {
            [name] => {
                if graph.get_vertex(name).is_none() {
                    println!("顶点不存在: {}", name);
                } else {
                    let neighbors = graph.adjacency_list_with_weight(name);
                    print!("{}", printer.print_neighbors(&neighbors, elapsed_ms(start)));
                }
            }
            _ => println!("用法: neighbors <顶点>"),
        },

        "paths" => match args.as_slice() {
            [from, to] => {
                let paths = graph.show_connectivity(from, to);
                print!("{}", printer.print_paths(&paths, elapsed_ms(start)));
            }
            _ => println!("用法: paths <起点> <终点>"),
        },

        "shortest" | "path" => match args.as_slice() {
            [from, to] => {
                let engine = ShortestPathGraph::new(graph.clone());
                match engine.find_shortest_path(from, to) {
                    Some(path) => {
                        print!("{}", printer.print_shortest_path(&path, elapsed_ms(start)));
                        println!("{}", engine.path_to_string(Some(&path)).green());
                        println!("总权重: {}", path.total_weight());
                    }
                    None => println!("{}", "未找到路径".yellow()),
                }
            }
            _ => println!("用法: shortest <起点> <终点>"),
        },

        "add" => {
            let edge = parse_edge(raw_args).context("用法: add <边名> <起点> <终点> <权重>")?;
            if graph.add_edge(&edge) {
                println!("已添加: {}", edge);
            } else {
                println!("边已存在: {}", edge);
            }
        }

        "remove" | "rm" => {
            let edge = parse_edge(raw_args).context("用法: remove <边名> <起点> <终点> <权重>")?;
            if !graph.edges().contains(&edge) {
                println!("边不存在: {}", edge);
            } else if graph.remove_edge(&edge) {
                println!("已删除: {}", edge);
            } else {
                println!("删除失败: {}", edge);
            }
        }

        "save" => match args.as_slice() {
            [path] => {
                save_graph(path, graph, SnapshotOptions::default())?;
                println!("快照已保存: {}", path);
            }
            _ => println!("用法: save <文件>"),
        },

        _ => {
            println!("未知命令: {}。输入 'help' 查看帮助。", cmd);
        }
    }

    Ok(false)
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

//! RouteGraph 数据导入工具
//!
//! 从 CSV 或 JSON Lines 文件批量导入边并写出图快照

use clap::Parser;
use routegraph::graph::Graph;
use routegraph::import::EdgeImporter;
use routegraph::{save_graph, SnapshotOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "routegraph-import")]
#[command(about = "RouteGraph 数据导入工具")]
struct Args {
    /// 输入文件路径
    #[arg(short, long)]
    input: PathBuf,

    /// 输入格式: csv, jsonl
    #[arg(short, long, default_value = "csv")]
    format: String,

    /// 快照输出路径
    #[arg(short, long, default_value = "./graph.rtg")]
    output: PathBuf,

    /// 不压缩快照负载
    #[arg(long)]
    no_compress: bool,

    /// 双向图：每条边自动生成反向边
    #[arg(short, long)]
    bidirectional: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("routegraph=info")),
        )
        .init();

    let args = Args::parse();

    println!("RouteGraph 数据导入工具");
    println!("========================");
    println!("输入文件: {:?}", args.input);
    println!("输出快照: {:?}", args.output);
    println!("格式: {}", args.format);
    println!("双向: {}", args.bidirectional);

    let graph = Arc::new(Graph::with_direction(args.bidirectional));

    println!("\n开始导入...");

    let importer = EdgeImporter::new(graph.clone());
    let stats = match args.format.as_str() {
        "csv" => importer.import_csv(&args.input)?,
        "jsonl" | "json" => importer.import_jsonl(&args.input)?,
        _ => {
            eprintln!("不支持的格式: {}", args.format);
            std::process::exit(1);
        }
    };

    save_graph(
        &args.output,
        &graph,
        SnapshotOptions {
            compress: !args.no_compress,
        },
    )?;

    println!("\n导入完成!");
    println!("  边导入: {}", stats.edges_imported);
    println!("  重复: {}", stats.duplicates);
    println!("  错误数: {}", stats.errors);
    println!("  耗时: {} ms", stats.duration_ms);
    println!("\n当前图大小:");
    println!("  顶点数: {}", graph.vertex_count());
    println!("  边数: {}", graph.edge_count());

    Ok(())
}

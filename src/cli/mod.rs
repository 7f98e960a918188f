//! 命令行支持：命令参数解析与结果输出

pub mod commands;
pub mod printer;

pub use commands::{parse_edge, split_command};
pub use printer::{check_vertical_display, PrintMode, Printer};

//! 工具模块集合
//!
//! 包含CLI、基准运行器、报告输出等工具模块，支持main.rs的流程控制。

pub mod cli;
pub mod report;
pub mod runner;
pub mod utils;

// 重新导出主要的公共接口
pub use cli::{AppConfig, parse_args, show_completion_info, show_startup_info};
pub use report::{print_summary_table, write_reports};
pub use runner::{SweepRow, run_benchmark};

//! 命令行接口模块
//!
//! 负责命令行参数解析、配置管理和程序信息展示。

use crate::engine::EngineKind;
use crate::error::{BenchError, BenchResult};
use clap::{Arg, Command};
use std::path::PathBuf;
use std::str::FromStr;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 默认随机种子：同时用于数据集洗牌与噪声混合
const DEFAULT_SEED: u64 = 666;

/// 默认目标信噪比 (dB)，中等强度噪声
const DEFAULT_SNR_DB: f64 = 10.0;

/// 应用程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 待检测关键词
    pub keyword: String,

    /// 关键词语料目录
    pub keyword_dir: PathBuf,

    /// 背景语料目录（Common Voice布局）
    pub background_dir: PathBuf,

    /// 噪声语料目录；提供即启用混噪
    pub noise_dir: Option<PathBuf>,

    /// 噪声目录是否为DEMAND布局（每场景取ch01.wav）
    pub demand_layout: bool,

    /// 引擎模型文件目录
    pub models_dir: PathBuf,

    /// Porcupine访问密钥
    pub access_key: Option<String>,

    /// 待评测引擎列表
    pub engines: Vec<EngineKind>,

    /// 目标信噪比 (dB)
    pub snr_db: f64,

    /// 随机种子（洗牌 + 混噪）
    pub seed: u64,

    /// 并行配置数（None表示按配置数与CPU核数自动决定）
    pub parallel: Option<usize>,

    /// 结果输出目录
    pub output_dir: Option<PathBuf>,

    /// 是否显示详细信息
    pub verbose: bool,
}

/// 解析命令行参数并创建配置
pub fn parse_args() -> BenchResult<AppConfig> {
    let matches = Command::new("kws-bench")
        .version(VERSION)
        .about(DESCRIPTION)
        .author("WakeMeter Team")
        .arg(
            Arg::new("keyword")
                .long("keyword")
                .short('k')
                .help("待检测关键词")
                .default_value("alexa"),
        )
        .arg(
            Arg::new("keyword-dir")
                .long("keyword-dir")
                .help("关键词语料根目录（递归扫描WAV）")
                .value_name("DIR")
                .required(true),
        )
        .arg(
            Arg::new("background-dir")
                .long("background-dir")
                .help("背景语料根目录（Common Voice布局）")
                .value_name("DIR")
                .required(true),
        )
        .arg(
            Arg::new("noise-dir")
                .long("noise-dir")
                .help("噪声语料根目录；提供即启用混噪")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("demand-layout")
                .long("demand-layout")
                .help("噪声目录为DEMAND布局（每场景只取ch01.wav）")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("models-dir")
                .long("models-dir")
                .help("引擎模型文件目录（<keyword>.ppn / <keyword>.rpw）")
                .value_name("DIR")
                .default_value("models"),
        )
        .arg(
            Arg::new("access-key")
                .long("access-key")
                .help("Porcupine访问密钥（也可用环境变量 PV_ACCESS_KEY）")
                .value_name("KEY"),
        )
        .arg(
            Arg::new("engines")
                .long("engines")
                .help("待评测引擎，逗号分隔（porcupine,rustpotter）；默认全部")
                .value_name("LIST"),
        )
        .arg(
            Arg::new("snr-db")
                .long("snr-db")
                .help("混噪目标信噪比 (dB)")
                .value_name("DB"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("随机种子（数据集洗牌与噪声抽取）")
                .value_name("N"),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .short('j')
                .help("并行评测的配置数")
                .value_name("N"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("结果输出目录（CSV + JSON）")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // 引擎列表：默认评测全部已知引擎
    let engines = match matches.get_one::<String>("engines") {
        Some(list) => list
            .split(',')
            .map(|s| EngineKind::from_str(s.trim()))
            .collect::<BenchResult<Vec<_>>>()?,
        None => EngineKind::ALL.to_vec(),
    };

    if engines.is_empty() {
        return Err(BenchError::InvalidInput(
            "引擎列表不能为空".to_string(),
        ));
    }

    let parse_f64 = |name: &str, default: f64| -> BenchResult<f64> {
        match matches.get_one::<String>(name) {
            Some(v) => v.parse().map_err(|_| {
                BenchError::InvalidInput(format!("参数 --{name} 不是合法数值: {v}"))
            }),
            None => Ok(default),
        }
    };

    let seed = match matches.get_one::<String>("seed") {
        Some(v) => v
            .parse()
            .map_err(|_| BenchError::InvalidInput(format!("参数 --seed 不是合法整数: {v}")))?,
        None => DEFAULT_SEED,
    };

    let parallel = match matches.get_one::<String>("parallel") {
        Some(v) => Some(v.parse().map_err(|_| {
            BenchError::InvalidInput(format!("参数 --parallel 不是合法整数: {v}"))
        })?),
        None => None,
    };

    // 访问密钥：命令行优先，环境变量兜底
    let access_key = matches
        .get_one::<String>("access-key")
        .cloned()
        .or_else(|| std::env::var("PV_ACCESS_KEY").ok());

    Ok(AppConfig {
        keyword: matches.get_one::<String>("keyword").unwrap().clone(),
        keyword_dir: PathBuf::from(matches.get_one::<String>("keyword-dir").unwrap()),
        background_dir: PathBuf::from(matches.get_one::<String>("background-dir").unwrap()),
        noise_dir: matches.get_one::<String>("noise-dir").map(PathBuf::from),
        demand_layout: matches.get_flag("demand-layout"),
        models_dir: PathBuf::from(matches.get_one::<String>("models-dir").unwrap()),
        access_key,
        engines,
        snr_db: parse_f64("snr-db", DEFAULT_SNR_DB)?,
        seed,
        parallel,
        output_dir: matches.get_one::<String>("output").map(PathBuf::from),
        verbose: matches.get_flag("verbose"),
    })
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    println!("🚀 WakeMeter KwsBench v{VERSION} 启动");
    println!("📝 {DESCRIPTION}");
    println!(
        "🎯 关键词: {} | 引擎: {}",
        config.keyword,
        config
            .engines
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    if config.noise_dir.is_some() {
        println!("🔊 混噪评测: SNR {} dB, 种子 {}", config.snr_db, config.seed);
    } else {
        println!("🔇 干净语音评测（未提供噪声语料）");
    }
    println!();
}

/// 显示程序完成信息
pub fn show_completion_info(config: &AppConfig) {
    if config.verbose {
        println!("✅ 所有评测配置处理完成！");
    }
}

//! WakeMeter KwsBench - 主程序入口
//!
//! 纯流程控制器，负责协调语料扫描、基准扫描与报告输出。

use wakemeter_kws_bench::{
    dataset::{NoiseDataset, SpeechDataset, SpeechSource},
    error::{BenchError, ErrorCategory},
    tools::{self, AppConfig},
};
use std::process;

/// 错误退出码定义
mod exit_codes {
    /// 通用错误
    pub const GENERAL_ERROR: i32 = 1;
    /// 前置条件/输入错误
    pub const PRECONDITION_ERROR: i32 = 2;
    /// 解码失败
    pub const DECODING_ERROR: i32 = 3;
    /// 数据不可用
    pub const DATA_ERROR: i32 = 4;
    /// 引擎错误
    pub const ENGINE_ERROR: i32 = 5;
}

/// 获取错误建议文本
fn get_error_suggestion(error: &BenchError) -> &'static str {
    match ErrorCategory::from_bench_error(error) {
        ErrorCategory::Precondition => {
            "检查语料是否为16kHz单声道、数据集是否同时包含关键词与背景样本 / Check that corpora are 16 kHz mono and contain both keyword and background samples"
        }
        ErrorCategory::Io => {
            "检查目录路径是否正确，文件是否存在且可读 / Check directory paths exist and are readable"
        }
        ErrorCategory::Format => {
            "确保语料文件为支持的格式（WAV/MP3/FLAC） / Ensure corpus files are in a supported format (WAV/MP3/FLAC)"
        }
        ErrorCategory::Decoding => {
            "文件可能损坏或使用不支持的音频编码 / File may be corrupted or use unsupported audio encoding"
        }
        ErrorCategory::Data => {
            "噪声语料目录为空；检查 --noise-dir 与 --demand-layout 设置 / Noise corpus is empty; check --noise-dir and --demand-layout"
        }
        ErrorCategory::Engine => {
            "检查引擎feature是否编译、模型文件与访问密钥是否就位 / Check engine features are compiled in and model files / access key are present"
        }
    }
}

/// 错误处理和建议
fn handle_error(error: BenchError) -> ! {
    eprintln!("[ERROR] 错误 / Error: {error}");
    eprintln!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(&error));

    let exit_code = match ErrorCategory::from_bench_error(&error) {
        ErrorCategory::Precondition => exit_codes::PRECONDITION_ERROR,
        ErrorCategory::Format => exit_codes::PRECONDITION_ERROR,
        ErrorCategory::Decoding => exit_codes::DECODING_ERROR,
        ErrorCategory::Data => exit_codes::DATA_ERROR,
        ErrorCategory::Engine => exit_codes::ENGINE_ERROR,
        ErrorCategory::Io => exit_codes::GENERAL_ERROR,
    };

    process::exit(exit_code);
}

/// 构建评测数据集：关键词语料 + 过滤后的背景语料，洗牌交织
fn build_dataset(config: &AppConfig) -> Result<SpeechDataset, BenchError> {
    let keyword_dataset = SpeechDataset::from_keyword_corpus(&config.keyword_dir)?;
    let background_dataset =
        SpeechDataset::from_common_voice(&config.background_dir, &[config.keyword.clone()])?;

    // 关键词与背景交织洗牌，模拟真实环境中关键词随机出现
    let dataset =
        SpeechDataset::merged(vec![background_dataset, keyword_dataset]).shuffled(config.seed);

    println!(
        "[INFO] 评测集共 {} 个样本，其中关键词 {} 个 / {} samples total, {} keyword",
        dataset.size(),
        dataset.keyword_count(),
        dataset.size(),
        dataset.keyword_count()
    );

    Ok(dataset)
}

/// 加载噪声语料（可选）
fn build_noise(config: &AppConfig) -> Result<Option<NoiseDataset>, BenchError> {
    let Some(noise_dir) = config.noise_dir.as_ref() else {
        return Ok(None);
    };

    println!("[INFO] 启用混噪评测 / Running benchmark with noise injection");
    let noise = if config.demand_layout {
        NoiseDataset::from_demand(noise_dir)?
    } else {
        NoiseDataset::from_dir(noise_dir)?
    };

    Ok(Some(noise))
}

/// 应用程序主逻辑（便于测试和复用）
fn run() -> Result<(), BenchError> {
    // 1. 解析命令行参数
    let config = tools::parse_args()?;

    // 2. 显示启动信息
    tools::show_startup_info(&config);

    // 3. 构建数据集（一次扫描，全部配置共享）
    let dataset = build_dataset(&config)?;
    let noise = build_noise(&config)?;

    // 4. 运行基准扫描
    let rows = tools::run_benchmark(
        &config,
        &dataset,
        noise.as_ref().map(|n| n as &dyn wakemeter_kws_bench::NoiseSource),
    )?;

    // 5. 输出结果
    tools::print_summary_table(&rows);
    tools::write_reports(&config, &rows)?;

    tools::show_completion_info(&config);
    Ok(())
}

fn main() {
    // 性能优化：提升线程优先级，评测计时更稳定
    // 静默失败：优化失败不影响程序功能
    let _ = wakemeter_kws_bench::tools::utils::optimize_for_performance();

    // 可选：CPU火焰图分析（需开启 feature: flame-prof 且设置 KWS_FLAME=1）
    #[cfg(feature = "flame-prof")]
    let _guard = {
        let enabled = std::env::var("KWS_FLAME").map(|v| v == "1").unwrap_or(false);
        if enabled {
            match pprof::ProfilerGuard::new(250) {
                Ok(g) => Some(g),
                Err(e) => {
                    eprintln!(
                        "[WARNING] 启用火焰图采样失败 / Failed to enable flame graph sampling: {e}"
                    );
                    None
                }
            }
        } else {
            None
        }
    };

    let result = run();

    // 在退出前生成火焰图（仅在启用时）
    #[cfg(feature = "flame-prof")]
    if let Some(guard) = _guard
        && let Ok(report) = guard.report().build()
    {
        use std::fs::File;
        let mut options = pprof::flamegraph::Options::default();
        let out_path =
            std::env::var("KWS_FLAME_FILE").unwrap_or_else(|_| "flamegraph.svg".to_string());
        if let Ok(file) = File::create(&out_path)
            && report.flamegraph_with_options(file, &mut options).is_ok()
        {
            eprintln!("FlameGraph generated successfully / 生成成功: {out_path}");
        }
    }

    if let Err(error) = result {
        handle_error(error);
    }
}

//! 基准运行器
//!
//! 展开(引擎 × 灵敏度)配置并逐一评测。各配置完全隔离：自有引擎
//! 实例、自有噪声混合器（同一种子，听到逐字节相同的噪声）；并行
//! 只发生在配置粒度，配置内部严格串行。

use super::cli::AppConfig;
use super::utils;
use crate::core::{NoiseMixer, WakeWordExecutor};
use crate::core::executor::AccuracyResult;
use crate::dataset::{NoiseSource, SpeechDataset};
use crate::engine::{EngineKind, EngineParams};
use crate::error::BenchResult;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// 扫描结果中的一行：一个(引擎, 灵敏度)配置的准确率
#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
    /// 引擎名称
    pub engine: String,

    /// 灵敏度
    pub sensitivity: f64,

    /// 准确率结果
    #[serde(flatten)]
    pub result: AccuracyResult,
}

/// 有序结果容器（保证输出顺序与配置展开顺序一致）
struct OrderedResult {
    index: usize,
    row: BenchResult<SweepRow>,
}

/// 运行整个基准扫描
///
/// 任何一个配置失败都会中止整个基准并上抛错误：全零指标只能
/// 来自真实的零计数，绝不能来自被吞掉的异常。
pub fn run_benchmark(
    config: &AppConfig,
    dataset: &SpeechDataset,
    noise: Option<&dyn NoiseSource>,
) -> BenchResult<Vec<SweepRow>> {
    // 展开全部(引擎, 灵敏度)配置
    let configs: Vec<(EngineKind, f64)> = config
        .engines
        .iter()
        .flat_map(|&kind| {
            kind.sensitivity_info()
                .sweep()
                .into_iter()
                .map(move |s| (kind, s))
        })
        .collect();

    let degree = utils::effective_parallel_degree(config.parallel, configs.len());
    println!(
        "[INFO] 共 {} 个评测配置，{} 并发度 / {} configurations, parallelism {}",
        configs.len(),
        degree,
        configs.len(),
        degree
    );

    let params = EngineParams {
        keyword: config.keyword.clone(),
        models_dir: config.models_dir.clone(),
        access_key: config.access_key.clone(),
    };

    // 自定义rayon线程池，精确控制并发度
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(degree)
        .thread_name(|i| format!("kws-worker-{i}"))
        .build()
        .map_err(|e| {
            crate::error::BenchError::EngineError(format!("线程池创建失败: {e}"))
        })?;

    let completed = AtomicUsize::new(0);
    let total = configs.len();

    let mut results: Vec<OrderedResult> = pool.install(|| {
        configs
            .par_iter()
            .enumerate()
            .map(|(index, &(kind, sensitivity))| {
                let row = run_one_config(config, &params, dataset, noise, kind, sensitivity);

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if config.verbose {
                    match &row {
                        Ok(_) => println!("✅ [{done}/{total}] {kind} @ {sensitivity:.2}"),
                        Err(e) => println!("❌ [{done}/{total}] {kind} @ {sensitivity:.2} - {e}"),
                    }
                }

                OrderedResult { index, row }
            })
            .collect()
    });

    // 按配置展开顺序排序，保证报告行序确定
    results.sort_by_key(|r| r.index);

    // 第一个失败的配置中止整个基准
    results.into_iter().map(|r| r.row).collect()
}

/// 评测单个(引擎, 灵敏度)配置
fn run_one_config(
    config: &AppConfig,
    params: &EngineParams,
    dataset: &SpeechDataset,
    noise: Option<&dyn NoiseSource>,
    kind: EngineKind,
    sensitivity: f64,
) -> BenchResult<SweepRow> {
    let engine = kind.create(params, sensitivity)?;

    // 混合器的能量窗口取引擎帧长；所有配置共用同一种子，
    // 保证每个引擎听到的噪声逐字节一致
    let mixer = match noise {
        Some(source) => Some(NoiseMixer::new(
            source,
            config.snr_db,
            engine.frame_length(),
            config.seed,
        )?),
        None => None,
    };

    let mut executor = WakeWordExecutor::new(engine, dataset, mixer, sensitivity)?;

    let start = Instant::now();
    let result = executor.execute()?;

    if config.verbose {
        let minutes = start.elapsed().as_secs_f64() / 60.0;
        println!("[INFO] [{kind}][{sensitivity:.2}] 耗时 {minutes:.1} 分钟 / took {minutes:.1} minutes");
    }

    // 释放失败只记录（release内部已输出警告日志），绝不丢弃已算出的结果
    let _ = executor.release();

    Ok(SweepRow {
        engine: kind.to_string(),
        sensitivity,
        result,
    })
}

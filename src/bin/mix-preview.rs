//! mix-preview - 混噪试听工具
//!
//! 把噪声语料按目标SNR混入单个语音文件并写出WAV，用于人耳
//! 校验混噪强度是否符合预期。与正式评测共用同一条混噪代码路径，
//! 相同种子下写出的就是引擎实际听到的音频。

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use wakemeter_kws_bench::audio::frame::quantize_i16;
use wakemeter_kws_bench::audio::reader::AudioReader;
use wakemeter_kws_bench::core::NoiseMixer;
use wakemeter_kws_bench::dataset::{NoiseDataset, SAMPLE_RATE};
use wakemeter_kws_bench::engine::DEFAULT_FRAME_LENGTH;

#[derive(Parser)]
#[command(name = "mix-preview")]
#[command(about = "混噪试听工具 / Noise-mixing preview tool")]
#[command(version)]
struct Cli {
    /// 语音WAV文件（16kHz单声道）
    /// Speech WAV file (16 kHz mono)
    #[arg(long)]
    speech: PathBuf,

    /// 噪声语料目录
    /// Noise corpus directory
    #[arg(long)]
    noise_dir: PathBuf,

    /// 噪声目录为DEMAND布局（每场景只取ch01.wav）
    #[arg(long)]
    demand_layout: bool,

    /// 目标信噪比 (dB)
    #[arg(long, default_value_t = 10.0)]
    snr_db: f64,

    /// 随机种子
    #[arg(long, default_value_t = 666)]
    seed: u64,

    /// 输出WAV路径
    #[arg(long, short, default_value = "mix_preview.wav")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let reader = AudioReader::new(SAMPLE_RATE);
    let speech = reader
        .read(&cli.speech, false)
        .with_context(|| format!("读取语音文件失败: {}", cli.speech.display()))?;

    let noise = if cli.demand_layout {
        NoiseDataset::from_demand(&cli.noise_dir)
    } else {
        NoiseDataset::from_dir(&cli.noise_dir)
    }
    .with_context(|| format!("加载噪声语料失败: {}", cli.noise_dir.display()))?;

    let mut mixer = NoiseMixer::new(&noise, cli.snr_db, DEFAULT_FRAME_LENGTH, cli.seed)
        .context("创建噪声混合器失败")?;

    println!(
        "🔊 混噪: {} + {} (SNR {} dB, 种子 {})",
        cli.speech.display(),
        cli.noise_dir.display(),
        cli.snr_db,
        cli.seed
    );

    let mixed = mixer.mix(&speech.pcm);

    // 写出16位WAV，量化路径与评测一致
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&cli.output, spec)
        .with_context(|| format!("创建输出文件失败: {}", cli.output.display()))?;
    for sample in quantize_i16(&mixed) {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    println!(
        "✅ 已写出 {} ({:.2}秒) / Written ({:.2}s)",
        cli.output.display(),
        speech.duration_seconds,
        speech.duration_seconds
    );
    Ok(())
}

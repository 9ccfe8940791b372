//! WakeMeter KwsBench - 唤醒词引擎准确率基准测试
//!
//! 在受控、可复现的声学条件下对比唤醒词（关键词检测）引擎：
//! 对同一份带标签语料做SNR受控混噪，逐帧流式送入各引擎，统计
//! 误报率与漏检率随灵敏度的变化。
//!
//! ## 核心特性
//! - 分窗峰值能量标定SNR，对静音占比高的语音稳健
//! - 噪声注入确定性可复现（显式种子，逐字节一致）
//! - 混噪输出恒定长度且带防削波余量
//! - 逐帧流式评测：关键词段内去重计检出，背景误报不去重
//! - (引擎 × 灵敏度)配置粒度的隔离并行

pub mod audio;
pub mod core;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod tools;

// 重新导出核心类型
pub use audio::{AudioFormat, AudioReader};
pub use crate::core::executor::AccuracyResult;
pub use crate::core::{NoiseMixer, WakeWordExecutor, windowed_peak_energy};
pub use dataset::{LabeledSample, NoiseDataset, NoiseSource, SpeechDataset, SpeechSource};
pub use engine::{EngineKind, EngineParams, SensitivityInfo, WakeWordEngine};
pub use error::{BenchError, BenchResult, ErrorCategory};

//! 评测核心
//!
//! 信号能量计算、SNR受控混噪与逐帧流式评测三个核心算法。

pub mod energy;
pub mod executor;
pub mod mixer;

pub use energy::windowed_peak_energy;
pub use executor::{AccuracyResult, WakeWordExecutor};
pub use mixer::NoiseMixer;

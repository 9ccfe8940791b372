//! 音频格式信息与校验
//!
//! 基准测试对输入音频有硬性前置条件：引擎期望的采样率、单声道。
//! 不满足时立即失败，绝不静默重采样。

use crate::error::{BenchError, BenchResult};

/// 音频格式信息
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFormat {
    /// 采样率 (Hz)
    pub sample_rate: u32,

    /// 声道数
    pub channels: u16,

    /// 位深度
    pub bits_per_sample: u16,

    /// 总样本数（单声道帧数）
    pub sample_count: u64,

    /// 音频时长（秒）
    pub duration_seconds: f64,
}

impl AudioFormat {
    /// 创建新的音频格式信息
    pub fn new(sample_rate: u32, channels: u16, bits_per_sample: u16, sample_count: u64) -> Self {
        let duration_seconds = if sample_rate > 0 {
            sample_count as f64 / sample_rate as f64
        } else {
            0.0
        };

        Self {
            sample_rate,
            channels,
            bits_per_sample,
            sample_count,
            duration_seconds,
        }
    }

    /// 验证音频格式本身是否合法
    pub fn validate(&self) -> BenchResult<()> {
        if self.channels == 0 {
            return Err(BenchError::FormatError("声道数不能为0".to_string()));
        }

        if self.sample_rate == 0 {
            return Err(BenchError::FormatError("采样率不能为0".to_string()));
        }

        if self.sample_rate > 384_000 {
            return Err(BenchError::FormatError(format!(
                "采样率({})超出支持范围(最大384kHz)",
                self.sample_rate
            )));
        }

        Ok(())
    }

    /// 校验格式是否符合基准测试的前置条件（采样率 + 单声道）
    ///
    /// 不匹配属于致命前置条件违例：上游必须预先把语料转换到
    /// 引擎期望的格式，本工具不做任何重采样。
    pub fn ensure_matches(&self, expected_rate: u32, path_hint: &str) -> BenchResult<()> {
        if self.sample_rate != expected_rate {
            return Err(BenchError::InvalidInput(format!(
                "采样率不匹配: {} 为 {} Hz，期望 {} Hz",
                path_hint, self.sample_rate, expected_rate
            )));
        }

        if self.channels != 1 {
            return Err(BenchError::InvalidInput(format!(
                "声道数不匹配: {} 为 {} 声道，期望单声道",
                path_hint, self.channels
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_format_new() {
        let format = AudioFormat::new(16000, 1, 16, 16000);

        assert_eq!(format.sample_rate, 16000);
        assert_eq!(format.channels, 1);
        assert_eq!(format.bits_per_sample, 16);
        assert!((format.duration_seconds - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_audio_format_validation() {
        // 有效格式
        assert!(AudioFormat::new(16000, 1, 16, 1000).validate().is_ok());

        // 无效声道数
        assert!(AudioFormat::new(16000, 0, 16, 1000).validate().is_err());

        // 无效采样率
        assert!(AudioFormat::new(0, 1, 16, 1000).validate().is_err());
        assert!(AudioFormat::new(500_000, 1, 16, 1000).validate().is_err());
    }

    #[test]
    fn test_ensure_matches() {
        let format = AudioFormat::new(16000, 1, 16, 1000);
        assert!(format.ensure_matches(16000, "a.wav").is_ok());

        // 采样率不符
        let format = AudioFormat::new(44100, 1, 16, 1000);
        assert!(matches!(
            format.ensure_matches(16000, "a.wav"),
            Err(BenchError::InvalidInput(_))
        ));

        // 非单声道
        let format = AudioFormat::new(16000, 2, 16, 1000);
        assert!(matches!(
            format.ensure_matches(16000, "a.wav"),
            Err(BenchError::InvalidInput(_))
        ));
    }
}

//! 语料音频读取器
//!
//! 按扩展名分派解码路径（WAV走hound快速路径，其余走symphonia），
//! 校验采样率/声道前置条件，并为关键词样本补尾部静音。

use crate::audio::format::AudioFormat;
use crate::audio::multi_decoder::MultiDecoder;
use crate::audio::wav_decoder::WavDecoder;
use crate::error::{BenchError, BenchResult};
use std::path::Path;

/// 关键词样本尾部补充的静音时长（秒）
///
/// 录音经常在说完关键词后立刻截止；需要端点检测时间的引擎
/// 会因此出现虚高的漏检率，补0.5秒静音抵消这一采集偏差。
const KEYWORD_PADDING_SECONDS: f64 = 0.5;

/// 读取结果：归一化PCM与补静音前的原始时长
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// 单声道f32样本，范围[-1, 1]
    pub pcm: Vec<f32>,

    /// 原始文件时长（秒，不含补充静音）
    pub duration_seconds: f64,
}

/// 语料音频读取器
///
/// 无状态，可在多线程间共享（每次读取内部各自建解码器）。
#[derive(Debug, Clone)]
pub struct AudioReader {
    /// 引擎期望的采样率
    expected_rate: u32,
}

impl AudioReader {
    /// 创建新的读取器
    pub fn new(expected_rate: u32) -> Self {
        Self { expected_rate }
    }

    /// 读取一个语料文件
    ///
    /// # 参数
    ///
    /// * `path` - 音频文件路径
    /// * `is_keyword` - 是否为关键词样本（决定是否补尾部静音）
    ///
    /// # 错误
    ///
    /// * `BenchError::InvalidInput` - 采样率或声道数与引擎期望不符
    /// * `BenchError::DecodingError` - 解码失败
    pub fn read(&self, path: &Path, is_keyword: bool) -> BenchResult<DecodedAudio> {
        let (format, mut pcm) = self.decode(path)?;

        let path_hint = path.display().to_string();
        format.ensure_matches(self.expected_rate, &path_hint)?;

        // 时长按补静音前的原始样本数入账
        let duration_seconds = format.duration_seconds;

        if is_keyword {
            let padding = (self.expected_rate as f64 * KEYWORD_PADDING_SECONDS) as usize;
            pcm.extend(std::iter::repeat(0.0f32).take(padding));
        }

        Ok(DecodedAudio {
            pcm,
            duration_seconds,
        })
    }

    /// 按扩展名选择解码器
    fn decode(&self, path: &Path) -> BenchResult<(AudioFormat, Vec<f32>)> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .ok_or_else(|| BenchError::FormatError("文件缺少扩展名".to_string()))?;

        match ext.as_str() {
            "wav" => {
                let mut decoder = WavDecoder::new();
                let format = decoder.load_file(path)?;
                Ok((format, decoder.take_samples()))
            }
            "mp3" | "flac" => {
                let mut decoder = MultiDecoder::new();
                let format = decoder.load_file(path)?;
                Ok((format, decoder.take_samples()))
            }
            _ => Err(BenchError::FormatError(format!(
                "不支持的文件格式: .{ext}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, sample_rate: u32, frames: usize) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..frames {
            writer.write_sample((i % 100) as i16 * 100).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_read_background_no_padding() {
        let path = std::env::temp_dir().join("kws_bench_reader_bg.wav");
        write_wav(&path, 16000, 16000);

        let reader = AudioReader::new(16000);
        let decoded = reader.read(&path, false).unwrap();

        assert_eq!(decoded.pcm.len(), 16000);
        assert!((decoded.duration_seconds - 1.0).abs() < 1e-9);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_read_keyword_appends_padding() {
        let path = std::env::temp_dir().join("kws_bench_reader_kw.wav");
        write_wav(&path, 16000, 16000);

        let reader = AudioReader::new(16000);
        let decoded = reader.read(&path, true).unwrap();

        // 补0.5秒 = 8000样本静音
        assert_eq!(decoded.pcm.len(), 16000 + 8000);
        assert!(decoded.pcm[16000..].iter().all(|&s| s == 0.0));

        // 时长统计不含补充静音
        assert!((decoded.duration_seconds - 1.0).abs() < 1e-9);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_read_rejects_rate_mismatch() {
        let path = std::env::temp_dir().join("kws_bench_reader_44k.wav");
        write_wav(&path, 44100, 4410);

        let reader = AudioReader::new(16000);
        assert!(matches!(
            reader.read(&path, false),
            Err(BenchError::InvalidInput(_))
        ));

        let _ = std::fs::remove_file(&path);
    }
}

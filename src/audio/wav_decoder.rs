//! WAV文件解码器
//!
//! 基于hound库实现高效的WAV文件读取和解码，语料中绝大多数
//! 关键词/噪声文件走这条快速路径。

use crate::audio::format::AudioFormat;
use crate::error::{BenchError, BenchResult};
use std::path::Path;

/// WAV文件解码器
///
/// 支持16/24/32位整数PCM与32位浮点，统一转换为[-1, 1]范围的f32。
pub struct WavDecoder {
    /// 音频格式信息
    format: Option<AudioFormat>,

    /// 样本数据（交错格式；基准语料应为单声道）
    samples: Vec<f32>,
}

impl WavDecoder {
    /// 创建新的WAV解码器
    pub fn new() -> Self {
        Self {
            format: None,
            samples: Vec::new(),
        }
    }

    /// 从文件路径加载WAV文件
    ///
    /// # 参数
    ///
    /// * `path` - WAV文件路径
    ///
    /// # 返回值
    ///
    /// 返回音频格式信息
    ///
    /// # 错误
    ///
    /// * `BenchError::IoError` - 文件读取失败
    /// * `BenchError::FormatError` - 不支持的音频格式
    /// * `BenchError::DecodingError` - 解码过程失败
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> BenchResult<AudioFormat> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BenchError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("文件不存在: {}", path.display()),
            )));
        }

        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();

        let format = AudioFormat::new(
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample,
            reader.len() as u64 / spec.channels.max(1) as u64,
        );
        format.validate()?;

        self.samples = Self::decode_samples(&mut reader, &spec)?;
        self.format = Some(format.clone());

        Ok(format)
    }

    /// 解码音频样本数据并归一化为f32
    fn decode_samples(
        reader: &mut hound::WavReader<std::io::BufReader<std::fs::File>>,
        spec: &hound::WavSpec,
    ) -> BenchResult<Vec<f32>> {
        let mut samples = Vec::with_capacity(reader.len() as usize);

        match (spec.sample_format, spec.bits_per_sample) {
            (hound::SampleFormat::Int, 16) => {
                // 16位PCM: -32768 到 32767
                for sample_result in reader.samples::<i16>() {
                    let sample = sample_result?;
                    samples.push(sample as f32 / 32768.0);
                }
            }
            (hound::SampleFormat::Int, 24) => {
                // 24位PCM: -8388608 到 8388607
                for sample_result in reader.samples::<i32>() {
                    let sample = sample_result?;
                    samples.push(sample as f32 / 8_388_608.0);
                }
            }
            (hound::SampleFormat::Int, 32) => {
                for sample_result in reader.samples::<i32>() {
                    let sample = sample_result?;
                    samples.push((sample as f64 / 2_147_483_648.0) as f32);
                }
            }
            (hound::SampleFormat::Float, 32) => {
                for sample_result in reader.samples::<f32>() {
                    samples.push(sample_result?);
                }
            }
            (_, bits) => {
                return Err(BenchError::DecodingError(format!(
                    "不支持的位深度: {bits}位"
                )));
            }
        }

        Ok(samples)
    }

    /// 获取音频格式信息
    pub fn format(&self) -> Option<&AudioFormat> {
        self.format.as_ref()
    }

    /// 获取归一化后的样本数据
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// 取走样本数据（避免一次拷贝）
    pub fn take_samples(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.samples)
    }

    /// 检查是否已加载音频数据
    pub fn is_loaded(&self) -> bool {
        self.format.is_some() && !self.samples.is_empty()
    }
}

impl Default for WavDecoder {
    fn default() -> Self {
        Self::new()
    }
}

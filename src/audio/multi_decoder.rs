//! 多格式音频解码器
//!
//! 基于symphonia库实现MP3、FLAC等格式的解码支持。
//! Common Voice背景语料以MP3分发，走这条路径。

use crate::audio::format::AudioFormat;
use crate::error::{BenchError, BenchResult, decoding_error, format_error};
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// 多格式音频解码器
///
/// 支持MP3、FLAC、WAV等格式，自动转换为f32处理格式。
pub struct MultiDecoder {
    /// 音频格式信息
    format: Option<AudioFormat>,

    /// 样本数据（交错格式）
    samples: Vec<f32>,
}

impl MultiDecoder {
    /// 创建新的多格式解码器
    pub fn new() -> Self {
        Self {
            format: None,
            samples: Vec::new(),
        }
    }

    /// 从文件路径加载音频文件
    ///
    /// # 参数
    ///
    /// * `path` - 音频文件路径
    ///
    /// # 返回值
    ///
    /// 返回音频格式信息
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> BenchResult<AudioFormat> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BenchError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("文件不存在: {}", path.display()),
            )));
        }

        let src = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(src), Default::default());

        // 创建格式提示
        let mut hint = Hint::new();
        if let Some(ext) = path.extension() {
            hint.with_extension(&ext.to_string_lossy());
        }

        let format_opts: FormatOptions = Default::default();
        let metadata_opts: MetadataOptions = Default::default();
        let decoder_opts: DecoderOptions = Default::default();

        // 探测音频格式
        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &format_opts, &metadata_opts)
            .map_err(|e| format_error("无法识别音频格式", e))?;

        let mut format_reader = probed.format;

        // 查找第一个音频流
        let track = format_reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| BenchError::FormatError("未找到音频流".to_string()))?;

        let track_id = track.id;
        let codec_params = &track.codec_params;

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| BenchError::FormatError("未找到采样率信息".to_string()))?;

        let channels = codec_params
            .channels
            .ok_or_else(|| BenchError::FormatError("未找到声道信息".to_string()))?
            .count() as u16;

        let bits_per_sample = codec_params
            .bits_per_sample
            .unwrap_or(codec_params.bits_per_coded_sample.unwrap_or(16))
            as u16;

        // 创建解码器
        let mut decoder = symphonia::default::get_codecs()
            .make(codec_params, &decoder_opts)
            .map_err(|e| decoding_error("创建解码器失败", e))?;

        // 解码音频数据
        let mut samples = Vec::new();
        let mut total_frames = 0u64;

        loop {
            match format_reader.next_packet() {
                Ok(packet) => {
                    if packet.track_id() != track_id {
                        continue;
                    }

                    match decoder.decode(&packet) {
                        Ok(audio_buf) => {
                            total_frames += audio_buf.frames() as u64;
                            Self::convert_audio_buffer(&audio_buf, &mut samples);
                        }
                        Err(symphonia::core::errors::Error::DecodeError(err)) => {
                            // 跳过损坏的包，MP3语料中偶有坏帧
                            eprintln!("[WARNING] 解码错误(跳过坏包) / decode error, skipping: {err}");
                            continue;
                        }
                        Err(err) => {
                            return Err(decoding_error("解码失败", err));
                        }
                    }
                }
                Err(symphonia::core::errors::Error::IoError(err)) => match err.kind() {
                    std::io::ErrorKind::UnexpectedEof => break,
                    _ => return Err(BenchError::IoError(err)),
                },
                Err(symphonia::core::errors::Error::ResetRequired) => break,
                Err(err) => {
                    return Err(decoding_error("读取包失败", err));
                }
            }
        }

        let format = AudioFormat::new(sample_rate, channels, bits_per_sample, total_frames);
        format.validate()?;

        self.format = Some(format.clone());
        self.samples = samples;

        Ok(format)
    }

    /// 转换symphonia音频缓冲区到交错f32样本
    fn convert_audio_buffer(audio_buf: &AudioBufferRef, output: &mut Vec<f32>) {
        match audio_buf {
            AudioBufferRef::U8(buf) => {
                Self::interleave(buf, output, |s: u8| (s as i32 - 128) as f32 / 128.0);
            }
            AudioBufferRef::U16(buf) => {
                Self::interleave(buf, output, |s: u16| (s as i32 - 32768) as f32 / 32768.0);
            }
            AudioBufferRef::U24(buf) => {
                Self::interleave(buf, output, |s| {
                    (s.inner() as i32 - 8_388_608) as f32 / 8_388_608.0
                });
            }
            AudioBufferRef::U32(buf) => {
                Self::interleave(buf, output, |s: u32| {
                    ((s as i64 - 2_147_483_648) as f64 / 2_147_483_648.0) as f32
                });
            }
            AudioBufferRef::S8(buf) => {
                Self::interleave(buf, output, |s: i8| s as f32 / 128.0);
            }
            AudioBufferRef::S16(buf) => {
                Self::interleave(buf, output, |s: i16| s as f32 / 32768.0);
            }
            AudioBufferRef::S24(buf) => {
                Self::interleave(buf, output, |s| s.inner() as f32 / 8_388_608.0);
            }
            AudioBufferRef::S32(buf) => {
                Self::interleave(buf, output, |s: i32| {
                    (s as f64 / 2_147_483_648.0) as f32
                });
            }
            AudioBufferRef::F32(buf) => {
                Self::interleave(buf, output, |s: f32| s);
            }
            AudioBufferRef::F64(buf) => {
                Self::interleave(buf, output, |s: f64| s as f32);
            }
        }
    }

    /// 将平面(planar)缓冲区转为交错输出
    fn interleave<S: symphonia::core::sample::Sample, F: Fn(S) -> f32>(
        buf: &symphonia::core::audio::AudioBuffer<S>,
        output: &mut Vec<f32>,
        convert: F,
    ) {
        let channels = buf.spec().channels.count();
        let frames = buf.frames();

        output.reserve(frames * channels);
        for frame in 0..frames {
            for channel in 0..channels {
                output.push(convert(buf.chan(channel)[frame]));
            }
        }
    }

    /// 获取音频格式信息
    pub fn format(&self) -> Option<&AudioFormat> {
        self.format.as_ref()
    }

    /// 获取样本数据
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// 取走样本数据（避免一次拷贝）
    pub fn take_samples(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.samples)
    }
}

impl Default for MultiDecoder {
    fn default() -> Self {
        Self::new()
    }
}

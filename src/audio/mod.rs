//! 音频加载与预处理模块
//!
//! 负责语料文件解码（WAV快速路径 + symphonia多格式路径）、
//! 格式校验、帧切分与int16量化。

pub mod format;
pub mod frame;
pub mod multi_decoder;
pub mod reader;
pub mod wav_decoder;

pub use format::AudioFormat;
pub use frame::{frame_count, frames, quantize_i16};
pub use multi_decoder::MultiDecoder;
pub use reader::AudioReader;
pub use wav_decoder::WavDecoder;

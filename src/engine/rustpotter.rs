//! Rustpotter引擎适配器
//!
//! 封装纯Rust实现的rustpotter检测器。模型文件约定为
//! `<models_dir>/<keyword>.rpw`。

use crate::engine::{EngineParams, WakeWordEngine};
use crate::error::{BenchError, BenchResult, engine_error};
use rustpotter::{Rustpotter, RustpotterConfig, SampleFormat};

/// Rustpotter适配器
pub struct RustpotterEngine {
    inner: Rustpotter,
    frame_length: usize,
    released: bool,
}

impl RustpotterEngine {
    /// 创建Rustpotter实例
    pub fn new(params: &EngineParams, sensitivity: f64) -> BenchResult<Self> {
        let model_path = params
            .models_dir
            .join(format!("{}.rpw", params.keyword.to_lowercase()));
        if !model_path.exists() {
            return Err(BenchError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("未找到关键词模型: {}", model_path.display()),
            )));
        }

        let mut config = RustpotterConfig::default();
        config.fmt.sample_rate = 16_000;
        config.fmt.channels = 1;
        config.fmt.sample_format = SampleFormat::I16;
        config.detector.threshold = sensitivity as f32;

        let mut inner =
            Rustpotter::new(&config).map_err(|e| engine_error("Rustpotter初始化失败", e))?;

        inner
            .add_wakeword_from_file(&params.keyword, &model_path.to_string_lossy())
            .map_err(|e| engine_error("加载Rustpotter模型失败", e))?;

        let frame_length = inner.get_samples_per_frame();

        Ok(Self {
            inner,
            frame_length,
            released: false,
        })
    }
}

impl WakeWordEngine for RustpotterEngine {
    fn process(&mut self, frame: &[i16]) -> BenchResult<bool> {
        if self.released {
            return Err(BenchError::EngineError("Rustpotter已释放".to_string()));
        }

        Ok(self.inner.process_samples(frame.to_vec()).is_some())
    }

    fn release(&mut self) -> BenchResult<()> {
        // 纯Rust实现无外部句柄，标记即可
        self.released = true;
        Ok(())
    }

    fn frame_length(&self) -> usize {
        self.frame_length
    }

    fn label(&self) -> &str {
        "Rustpotter"
    }
}

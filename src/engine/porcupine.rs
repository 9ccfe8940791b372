//! Porcupine引擎适配器
//!
//! 封装Picovoice官方Rust SDK。模型文件约定为
//! `<models_dir>/<keyword>.ppn`，访问密钥从参数传入。

use crate::engine::{EngineParams, WakeWordEngine};
use crate::error::{BenchError, BenchResult, engine_error};
use porcupine::{Porcupine, PorcupineBuilder};

/// Porcupine适配器
pub struct PorcupineEngine {
    /// SDK句柄；release后置None
    inner: Option<Porcupine>,
}

impl PorcupineEngine {
    /// 创建Porcupine实例
    pub fn new(params: &EngineParams, sensitivity: f64) -> BenchResult<Self> {
        let access_key = params.access_key.as_deref().ok_or_else(|| {
            BenchError::InvalidInput(
                "Porcupine需要访问密钥（--access-key 或 PV_ACCESS_KEY）".to_string(),
            )
        })?;

        let keyword_path = params
            .models_dir
            .join(format!("{}.ppn", params.keyword.to_lowercase()));
        if !keyword_path.exists() {
            return Err(BenchError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("未找到关键词模型: {}", keyword_path.display()),
            )));
        }

        let inner = PorcupineBuilder::new_with_keyword_paths(access_key, &[keyword_path])
            .sensitivities(&[sensitivity as f32])
            .init()
            .map_err(|e| engine_error("Porcupine初始化失败", format!("{e:?}")))?;

        Ok(Self { inner: Some(inner) })
    }

    fn inner(&self) -> BenchResult<&Porcupine> {
        self.inner
            .as_ref()
            .ok_or_else(|| BenchError::EngineError("Porcupine已释放".to_string()))
    }
}

impl WakeWordEngine for PorcupineEngine {
    fn process(&mut self, frame: &[i16]) -> BenchResult<bool> {
        let keyword_index = self
            .inner()?
            .process(frame)
            .map_err(|e| engine_error("Porcupine处理帧失败", format!("{e:?}")))?;

        Ok(keyword_index >= 0)
    }

    fn release(&mut self) -> BenchResult<()> {
        // SDK在Drop中删除底层句柄
        self.inner = None;
        Ok(())
    }

    fn frame_length(&self) -> usize {
        self.inner
            .as_ref()
            .map(|p| p.frame_length() as usize)
            .unwrap_or(crate::engine::DEFAULT_FRAME_LENGTH)
    }

    fn sample_rate(&self) -> u32 {
        self.inner.as_ref().map(|p| p.sample_rate()).unwrap_or(16_000)
    }

    fn label(&self) -> &str {
        "Porcupine"
    }
}

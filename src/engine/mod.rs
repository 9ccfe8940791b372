//! 唤醒词引擎适配层
//!
//! 统一能力接口 + 引擎注册表。评测核心只依赖`WakeWordEngine`
//! trait，从不关心具体引擎身份（除日志标签外）；每个第三方引擎
//! 对应一个薄适配器（构造函数 + process/release两个方法），按
//! cargo feature按需编译。

#[cfg(feature = "engine-porcupine")]
pub mod porcupine;
#[cfg(feature = "engine-rustpotter")]
pub mod rustpotter;

use crate::error::{BenchError, BenchResult};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// 所有已知引擎共用的帧长（样本数）
pub const DEFAULT_FRAME_LENGTH: usize = 512;

/// 唤醒词引擎能力接口
///
/// 适配器内部持有流式解码状态，帧必须按时间顺序喂入；检测命中
/// 后是否重置内部话语状态由适配器自行决定，执行器不感知。
pub trait WakeWordEngine {
    /// 处理一帧int16 PCM，返回该帧是否触发检测
    fn process(&mut self, frame: &[i16]) -> BenchResult<bool>;

    /// 释放引擎资源（显式调用，只调一次）
    fn release(&mut self) -> BenchResult<()>;

    /// 引擎期望的帧长（样本数）
    fn frame_length(&self) -> usize {
        DEFAULT_FRAME_LENGTH
    }

    /// 引擎期望的采样率 (Hz)
    fn sample_rate(&self) -> u32 {
        16_000
    }

    /// 引擎期望的声道数
    fn channel_count(&self) -> u16 {
        1
    }

    /// 引擎期望的位深度
    fn bits_per_sample(&self) -> u16 {
        16
    }

    /// 日志标签
    fn label(&self) -> &str;
}

/// 灵敏度扫描范围
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityInfo {
    /// 最小灵敏度
    pub min: f64,

    /// 最大灵敏度
    pub max: f64,

    /// 扫描步长
    pub step: f64,
}

impl SensitivityInfo {
    /// 枚举扫描点
    ///
    /// 用整数步数生成，避免浮点累加误差丢掉端点。
    pub fn sweep(&self) -> Vec<f64> {
        let count = ((self.max - self.min) / self.step).round() as usize + 1;
        (0..count).map(|i| self.min + i as f64 * self.step).collect()
    }
}

/// 支持的引擎类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// Picovoice Porcupine（官方Rust SDK）
    Porcupine,
    /// Rustpotter（纯Rust实现）
    Rustpotter,
}

impl EngineKind {
    /// 全部已知引擎类型
    pub const ALL: &'static [EngineKind] = &[EngineKind::Porcupine, EngineKind::Rustpotter];

    /// 该引擎的灵敏度扫描范围
    pub fn sensitivity_info(&self) -> SensitivityInfo {
        match self {
            EngineKind::Porcupine => SensitivityInfo {
                min: 0.0,
                max: 1.0,
                step: 0.1,
            },
            EngineKind::Rustpotter => SensitivityInfo {
                min: 0.0,
                max: 1.0,
                step: 0.05,
            },
        }
    }

    /// 对应的cargo feature名（用于错误提示）
    fn feature_name(&self) -> &'static str {
        match self {
            EngineKind::Porcupine => "engine-porcupine",
            EngineKind::Rustpotter => "engine-rustpotter",
        }
    }

    /// 创建引擎实例
    ///
    /// 相应feature未启用时返回`EngineError`并提示启用方法，而不是
    /// 静默跳过；缺引擎跑出的空结果比报错更危险。
    pub fn create(
        &self,
        params: &EngineParams,
        sensitivity: f64,
    ) -> BenchResult<Box<dyn WakeWordEngine>> {
        match self {
            #[cfg(feature = "engine-porcupine")]
            EngineKind::Porcupine => Ok(Box::new(porcupine::PorcupineEngine::new(
                params,
                sensitivity,
            )?)),

            #[cfg(feature = "engine-rustpotter")]
            EngineKind::Rustpotter => Ok(Box::new(rustpotter::RustpotterEngine::new(
                params,
                sensitivity,
            )?)),

            #[allow(unreachable_patterns)]
            _ => {
                let _ = (params, sensitivity);
                Err(BenchError::EngineError(format!(
                    "引擎 {self} 未编译进本二进制，请使用 --features {} 重新构建",
                    self.feature_name()
                )))
            }
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Porcupine => write!(f, "Porcupine"),
            EngineKind::Rustpotter => write!(f, "Rustpotter"),
        }
    }
}

impl FromStr for EngineKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "porcupine" => Ok(EngineKind::Porcupine),
            "rustpotter" => Ok(EngineKind::Rustpotter),
            other => Err(BenchError::InvalidInput(format!(
                "未知引擎类型: {other}（可选: porcupine, rustpotter）"
            ))),
        }
    }
}

/// 引擎构造参数
///
/// 模型文件按约定从`models_dir/<keyword>.<ext>`解析，扩展名由
/// 各适配器决定（Porcupine为.ppn，Rustpotter为.rpw）。
#[derive(Debug, Clone)]
pub struct EngineParams {
    /// 待检测关键词
    pub keyword: String,

    /// 模型文件目录
    pub models_dir: PathBuf,

    /// 访问密钥（Porcupine需要，其余引擎忽略）
    pub access_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitivity_sweep_endpoints() {
        let sweep = EngineKind::Porcupine.sensitivity_info().sweep();
        assert_eq!(sweep.len(), 11);
        assert!((sweep[0] - 0.0).abs() < 1e-12);
        assert!((sweep[10] - 1.0).abs() < 1e-9);

        let sweep = EngineKind::Rustpotter.sensitivity_info().sweep();
        assert_eq!(sweep.len(), 21);
        assert!((sweep[20] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_engine_kind_from_str() {
        assert_eq!(
            EngineKind::from_str("porcupine").unwrap(),
            EngineKind::Porcupine
        );
        assert_eq!(
            EngineKind::from_str("RUSTPOTTER").unwrap(),
            EngineKind::Rustpotter
        );
        assert!(EngineKind::from_str("snowboy").is_err());
    }

    #[cfg(not(any(feature = "engine-porcupine", feature = "engine-rustpotter")))]
    #[test]
    fn test_create_without_feature_fails_loudly() {
        let params = EngineParams {
            keyword: "alexa".to_string(),
            models_dir: PathBuf::from("/tmp"),
            access_key: None,
        };

        let result = EngineKind::Porcupine.create(&params, 0.5);
        match result {
            Err(BenchError::EngineError(msg)) => {
                assert!(msg.contains("engine-porcupine"));
            }
            _ => panic!("缺少feature时必须显式报错"),
        }
    }
}

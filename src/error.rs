//! 统一错误处理框架
//!
//! 基准测试全流程共享的错误类型定义：前置条件校验、语料加载、
//! 引擎适配与资源释放各环节的失败都归入同一个枚举。

use std::fmt;
use std::io;

/// 基准测试相关的统一错误类型
#[derive(Debug)]
pub enum BenchError {
    /// 前置条件违例 - 采样率/声道/位深不匹配、空数据集、缺少关键词样本等
    InvalidInput(String),

    /// 文件I/O错误
    IoError(io::Error),

    /// 音频格式错误
    FormatError(String),

    /// 解码错误
    DecodingError(String),

    /// 数据不可用 - 请求混噪但噪声语料为空
    DataUnavailable(String),

    /// 引擎适配器错误 - 创建或process调用失败
    EngineError(String),

    /// 资源释放失败 - 仅记录，不得掩盖已产出的结果
    ReleaseError(String),
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::InvalidInput(msg) => write!(f, "前置条件校验失败: {msg}"),
            BenchError::IoError(err) => write!(f, "文件I/O错误: {err}"),
            BenchError::FormatError(msg) => write!(f, "音频格式错误: {msg}"),
            BenchError::DecodingError(msg) => write!(f, "音频解码失败: {msg}"),
            BenchError::DataUnavailable(msg) => write!(f, "数据不可用: {msg}"),
            BenchError::EngineError(msg) => write!(f, "引擎适配器错误: {msg}"),
            BenchError::ReleaseError(msg) => write!(f, "资源释放失败: {msg}"),
        }
    }
}

impl std::error::Error for BenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BenchError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for BenchError {
    fn from(err: io::Error) -> Self {
        BenchError::IoError(err)
    }
}

impl From<hound::Error> for BenchError {
    fn from(err: hound::Error) -> Self {
        BenchError::DecodingError(format!("WAV解码错误: {err}"))
    }
}

/// 基准测试操作的标准Result类型
pub type BenchResult<T> = Result<T, BenchError>;

// ==================== 错误转换Helper函数 ====================
// 消除重复的 .map_err(|e| BenchError::XXX(format!(...))) 模式

/// 创建格式错误的helper函数
#[inline]
pub fn format_error<E: fmt::Display>(context: &str, err: E) -> BenchError {
    BenchError::FormatError(format!("{context}: {err}"))
}

/// 创建解码错误的helper函数
#[inline]
pub fn decoding_error<E: fmt::Display>(context: &str, err: E) -> BenchError {
    BenchError::DecodingError(format!("{context}: {err}"))
}

/// 创建引擎错误的helper函数
#[inline]
pub fn engine_error<E: fmt::Display>(context: &str, err: E) -> BenchError {
    BenchError::EngineError(format!("{context}: {err}"))
}

// ==================== 错误分类系统 ====================
// 用于整个sweep中的错误统计与退出码映射

/// 错误类别枚举
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ErrorCategory {
    /// 前置条件违例（数据集与引擎参数不符等）
    Precondition,
    /// 格式相关错误（不支持的格式、格式损坏等）
    Format,
    /// 解码相关错误（解码器失败、音频数据损坏等）
    Decoding,
    /// I/O相关错误（文件不存在、权限不足等）
    Io,
    /// 数据相关错误（噪声语料为空等）
    Data,
    /// 引擎相关错误（适配器创建/处理/释放失败）
    Engine,
}

impl ErrorCategory {
    /// 从BenchError提取错误类别
    pub fn from_bench_error(e: &BenchError) -> Self {
        match e {
            BenchError::InvalidInput(_) => Self::Precondition,
            BenchError::FormatError(_) => Self::Format,
            BenchError::DecodingError(_) => Self::Decoding,
            BenchError::IoError(_) => Self::Io,
            BenchError::DataUnavailable(_) => Self::Data,
            BenchError::EngineError(_) | BenchError::ReleaseError(_) => Self::Engine,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Precondition => "前置条件错误",
            Self::Format => "格式错误",
            Self::Decoding => "解码错误",
            Self::Io => "I/O错误",
            Self::Data => "数据错误",
            Self::Engine => "引擎错误",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BenchError::InvalidInput("采样率不匹配".to_string());
        assert!(format!("{err}").contains("前置条件"));

        let err = BenchError::DataUnavailable("噪声语料为空".to_string());
        assert!(format!("{err}").contains("数据不可用"));
    }

    #[test]
    fn test_error_category_mapping() {
        let err = BenchError::InvalidInput("x".to_string());
        assert_eq!(
            ErrorCategory::from_bench_error(&err),
            ErrorCategory::Precondition
        );

        let err = BenchError::ReleaseError("x".to_string());
        assert_eq!(ErrorCategory::from_bench_error(&err), ErrorCategory::Engine);

        let err = BenchError::IoError(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert_eq!(ErrorCategory::from_bench_error(&err), ErrorCategory::Io);
    }

    #[test]
    fn test_io_error_source_chain() {
        let err = BenchError::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(std::error::Error::source(&err).is_some());
    }
}

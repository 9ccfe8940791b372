//! 工具函数模块
//!
//! 提供并发度计算、线程优先级与文件路径处理等通用工具函数。

/// 计算实际并发度
///
/// 用户显式指定则用指定值（最少1），否则取配置数与CPU核数的
/// 较小值。
pub fn effective_parallel_degree(requested: Option<usize>, config_count: usize) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    match requested {
        Some(n) => n.max(1).min(config_count.max(1)),
        None => cores.min(config_count.max(1)),
    }
}

/// 性能优化：提升线程优先级
///
/// 评测耗时以分钟计，避免后台调度抖动影响进度。静默失败：
/// 优化失败不影响功能。
pub fn optimize_for_performance() -> Result<(), String> {
    thread_priority::set_current_thread_priority(thread_priority::ThreadPriority::Max)
        .map_err(|e| format!("{e:?}"))
}

/// 文件路径处理工具函数
pub mod path {
    use std::path::Path;

    /// 提取文件名（返回String，用于日志显示）
    #[inline]
    pub fn extract_filename_lossy(path: &Path) -> String {
        path.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// 提取文件stem（不含扩展名）
    #[inline]
    pub fn extract_file_stem(path: &Path) -> &str {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("audio")
    }
}

pub use path::{extract_file_stem, extract_filename_lossy};

//! 语料目录扫描
//!
//! 负责从磁盘目录发现语料文件并产出元数据条目。

use crate::dataset::AudioMetadata;
use crate::error::{BenchError, BenchResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 校验根目录存在且是目录
fn ensure_dir(root: &Path) -> BenchResult<()> {
    if !root.exists() {
        return Err(BenchError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("目录不存在: {}", root.display()),
        )));
    }

    if !root.is_dir() {
        return Err(BenchError::InvalidInput(format!(
            "路径不是目录: {}",
            root.display()
        )));
    }

    Ok(())
}

/// 判断路径扩展名（忽略大小写）
fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// 扫描关键词语料：递归收集目录下全部WAV，全部标记为关键词
pub fn scan_keyword_corpus(root: &Path) -> BenchResult<Vec<AudioMetadata>> {
    ensure_dir(root)?;

    println!("[INFO] 扫描关键词语料 / Exploring keyword corpus: {}", root.display());

    let mut entries = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_file() && has_extension(path, "wav") {
            entries.push(AudioMetadata {
                path: path.to_path_buf(),
                is_keyword: true,
            });
        }
    }

    // 按路径排序保证扫描结果稳定（洗牌前的基准顺序必须可复现）
    entries.sort_by(|a, b| a.path.cmp(&b.path));

    println!(
        "[INFO] 关键词语料共 {} 个文件 / Found {} keyword audio files",
        entries.len(),
        entries.len()
    );
    Ok(entries)
}

/// 扫描通用噪声目录：递归收集全部WAV路径
pub fn scan_noise_dir(root: &Path) -> BenchResult<Vec<PathBuf>> {
    ensure_dir(root)?;

    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && has_extension(p, "wav"))
        .collect();

    paths.sort();
    Ok(paths)
}

/// 扫描DEMAND噪声库：每个录音环境目录只取ch01.wav
///
/// DEMAND（http://parole.loria.fr/DEMAND/）的每个场景含16路同步
/// 录音，混噪只需要一路。
pub fn scan_demand_corpus(root: &Path) -> BenchResult<Vec<PathBuf>> {
    ensure_dir(root)?;

    println!("[INFO] 扫描DEMAND噪声库 / Exploring DEMAND corpus: {}", root.display());

    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n == "ch01.wav")
        })
        .collect();

    paths.sort();

    println!(
        "[INFO] DEMAND噪声库共 {} 个场景 / Found {} noise recordings",
        paths.len(),
        paths.len()
    );
    Ok(paths)
}

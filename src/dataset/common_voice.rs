//! Common Voice背景语料
//!
//! Mozilla Common Voice（https://voice.mozilla.org）目录布局：
//! 根目录下每个数据子目录对应一个同名CSV元数据文件。只收录
//! 投票可靠、转写不含排除词的条目作为背景（非关键词）样本。

use crate::dataset::AudioMetadata;
use crate::error::{BenchError, BenchResult};
use std::collections::HashMap;
use std::path::Path;

/// 只读取已验证的数据子目录
const INCLUDE_DIRS: &[&str] = &["cv-valid-train", "cv-valid-test"];

/// 一条CSV元数据记录
#[derive(Debug, Clone)]
struct ClipMetadata {
    text: String,
    up_votes: u32,
    down_votes: u32,
}

/// 扫描Common Voice数据集，返回过滤后的背景样本元数据
///
/// 过滤规则（与语料发布方的质检字段对应）：
/// - 至少2个赞成票且0个反对票
/// - 转写文本非空
/// - 转写文本不含任何排除词（防止背景语料里混入待测关键词）
pub fn scan_common_voice(root: &Path, exclude_words: &[String]) -> BenchResult<Vec<AudioMetadata>> {
    if !root.exists() || !root.is_dir() {
        return Err(BenchError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Common Voice目录不存在: {}", root.display()),
        )));
    }

    println!("[INFO] 扫描Common Voice语料 / Exploring Common Voice corpus...");

    let exclude_lower: Vec<String> = exclude_words.iter().map(|w| w.to_lowercase()).collect();

    let mut entries = Vec::new();
    for dirname in INCLUDE_DIRS {
        let dir = root.join(dirname);
        if !dir.is_dir() {
            continue;
        }

        let metadata = load_directory_metadata(root, dirname)?;

        let mut filenames: Vec<_> = std::fs::read_dir(&dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case("mp3"))
            })
            .collect();
        filenames.sort();

        for path in filenames {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            // 只收录通过质检且不含排除词的条目
            if let Some(md) = metadata.get(name)
                && md.up_votes >= 2
                && md.down_votes == 0
                && !md.text.is_empty()
                && !exclude_lower.iter().any(|w| md.text.contains(w.as_str()))
            {
                entries.push(AudioMetadata {
                    path,
                    is_keyword: false,
                });
            }
        }
    }

    println!(
        "[INFO] Common Voice有效背景样本 {} 个 / Found {} valid background clips",
        entries.len(),
        entries.len()
    );
    Ok(entries)
}

/// 读取一个数据子目录的CSV元数据
///
/// CSV位于根目录，文件名为`<dirname>.csv`；`filename`列的取值形如
/// `<dirname>/<file>.mp3`，这里只留文件名部分作为键。
fn load_directory_metadata(
    root: &Path,
    dirname: &str,
) -> BenchResult<HashMap<String, ClipMetadata>> {
    let csv_path = root.join(format!("{dirname}.csv"));
    let content = std::fs::read_to_string(&csv_path).map_err(|e| {
        BenchError::IoError(std::io::Error::new(
            e.kind(),
            format!("读取元数据失败 {}: {e}", csv_path.display()),
        ))
    })?;

    let mut lines = content.lines();
    let header = lines
        .next()
        .ok_or_else(|| BenchError::FormatError(format!("{dirname}.csv 为空")))?;

    let columns = split_csv_line(header);
    let find_column = |name: &str| -> BenchResult<usize> {
        columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| BenchError::FormatError(format!("{dirname}.csv 缺少列: {name}")))
    };

    let filename_idx = find_column("filename")?;
    let text_idx = find_column("text")?;
    let up_idx = find_column("up_votes")?;
    let down_idx = find_column("down_votes")?;

    let mut metadata = HashMap::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_csv_line(line);
        let max_idx = filename_idx.max(text_idx).max(up_idx).max(down_idx);
        if fields.len() <= max_idx {
            continue; // 截断的行直接跳过
        }

        // filename形如 cv-valid-train/sample-000001.mp3
        let filename = fields[filename_idx]
            .rsplit('/')
            .next()
            .unwrap_or(&fields[filename_idx])
            .to_string();

        metadata.insert(
            filename,
            ClipMetadata {
                text: fields[text_idx].to_lowercase(),
                up_votes: fields[up_idx].parse().unwrap_or(0),
                down_votes: fields[down_idx].parse().unwrap_or(0),
            },
        );
    }

    Ok(metadata)
}

/// 切分一行CSV，支持双引号包裹的字段（转写文本可能含逗号）
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // 转义的双引号
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

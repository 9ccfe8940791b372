//! 语料数据集模块
//!
//! 统一的带标签样本记录类型 + 两个能力接口（语音源/噪声源），
//! 各语料来源用独立构造函数产出同一种记录，组合优于继承。

pub mod common_voice;
pub mod scanner;

use crate::audio::reader::AudioReader;
use crate::error::{BenchError, BenchResult};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};

/// 全部语料统一的采样率 (Hz)
pub const SAMPLE_RATE: u32 = 16_000;

/// 单个语料文件的元数据
#[derive(Debug, Clone)]
pub struct AudioMetadata {
    /// 音频文件绝对路径
    pub path: PathBuf,

    /// 是否为关键词样本
    pub is_keyword: bool,
}

/// 一条带标签的语音样本
///
/// PCM为归一化到[-1, 1]的单声道f32；`duration_seconds`记录的是
/// 补静音前的原始文件时长，时长统计以它为准。
#[derive(Debug, Clone)]
pub struct LabeledSample {
    /// 单声道PCM样本
    pub pcm: Vec<f32>,

    /// 是否包含关键词
    pub contains_keyword: bool,

    /// 采样率 (Hz)
    pub sample_rate: u32,

    /// 原始时长（秒，不含关键词补静音）
    pub duration_seconds: f64,
}

/// 语音数据集能力接口
///
/// 迭代顺序由数据集自身决定（可能已被上游洗牌），执行器不得重排。
pub trait SpeechSource: Sync {
    /// 样本总数
    fn size(&self) -> usize;

    /// 查询样本标签（无需加载PCM）
    fn is_keyword(&self, index: usize) -> bool;

    /// 按索引加载样本
    fn get(&self, index: usize) -> BenchResult<LabeledSample>;
}

/// 噪声语料能力接口：按索引随机访问原始PCM
pub trait NoiseSource: Sync {
    /// 噪声片段总数
    fn size(&self) -> usize;

    /// 按索引取噪声片段PCM
    fn clip(&self, index: usize) -> &[f32];
}

// ==================== 语音数据集 ====================

/// 基于文件元数据的语音数据集
///
/// 构造时只扫描元数据，PCM按需从磁盘加载（语料可能远大于内存）。
pub struct SpeechDataset {
    entries: Vec<AudioMetadata>,
    reader: AudioReader,
}

impl SpeechDataset {
    /// 从元数据列表构建数据集
    pub fn from_entries(entries: Vec<AudioMetadata>) -> Self {
        Self {
            entries,
            reader: AudioReader::new(SAMPLE_RATE),
        }
    }

    /// 关键词语料：递归扫描目录下全部WAV，全部标记为关键词样本
    pub fn from_keyword_corpus(root: &Path) -> BenchResult<Self> {
        let entries = scanner::scan_keyword_corpus(root)?;
        Ok(Self::from_entries(entries))
    }

    /// 背景语料：Common Voice目录布局，按CSV元数据过滤
    ///
    /// 只收录有效投票且转写文本不含排除词的条目，全部标记为背景。
    pub fn from_common_voice(root: &Path, exclude_words: &[String]) -> BenchResult<Self> {
        let entries = common_voice::scan_common_voice(root, exclude_words)?;
        Ok(Self::from_entries(entries))
    }

    /// 合并多个数据集（关键词语料与背景语料交织成一个测试集）
    pub fn merged(parts: Vec<SpeechDataset>) -> Self {
        let entries = parts.into_iter().flat_map(|p| p.entries).collect();
        Self::from_entries(entries)
    }

    /// 用显式种子洗牌，模拟真实环境中关键词随机出现的分布
    ///
    /// 随机源必须显式传入种子：并行运行的各配置都基于同一份
    /// 洗牌结果，且重复运行可复现。
    pub fn shuffled(mut self, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        self.entries.shuffle(&mut rng);
        self
    }

    /// 关键词样本数量
    pub fn keyword_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_keyword).count()
    }

    /// 访问元数据条目（用于日志展示）
    pub fn entries(&self) -> &[AudioMetadata] {
        &self.entries
    }
}

impl SpeechSource for SpeechDataset {
    fn size(&self) -> usize {
        self.entries.len()
    }

    fn is_keyword(&self, index: usize) -> bool {
        self.entries[index].is_keyword
    }

    fn get(&self, index: usize) -> BenchResult<LabeledSample> {
        let entry = &self.entries[index];
        let decoded = self.reader.read(&entry.path, entry.is_keyword)?;

        Ok(LabeledSample {
            pcm: decoded.pcm,
            contains_keyword: entry.is_keyword,
            sample_rate: SAMPLE_RATE,
            duration_seconds: decoded.duration_seconds,
        })
    }
}

// ==================== 噪声语料 ====================

/// 预加载的噪声语料
///
/// 噪声片段在构造时一次性解码进内存：混音时按索引反复随机抽取，
/// 避免每次混音都回盘重读。
pub struct NoiseDataset {
    clips: Vec<Vec<f32>>,
}

impl NoiseDataset {
    /// 通用目录布局：递归扫描全部WAV
    pub fn from_dir(root: &Path) -> BenchResult<Self> {
        Self::load(scanner::scan_noise_dir(root)?)
    }

    /// DEMAND噪声库布局：每个录音环境只取ch01.wav
    pub fn from_demand(root: &Path) -> BenchResult<Self> {
        Self::load(scanner::scan_demand_corpus(root)?)
    }

    /// 从内存片段直接构建（测试用）
    pub fn from_clips(clips: Vec<Vec<f32>>) -> Self {
        Self { clips }
    }

    fn load(paths: Vec<PathBuf>) -> BenchResult<Self> {
        if paths.is_empty() {
            return Err(BenchError::DataUnavailable(
                "噪声语料目录中没有可用的音频文件".to_string(),
            ));
        }

        let reader = AudioReader::new(SAMPLE_RATE);
        let mut clips = Vec::with_capacity(paths.len());
        for path in &paths {
            clips.push(reader.read(path, false)?.pcm);
        }

        Ok(Self { clips })
    }
}

impl NoiseSource for NoiseDataset {
    fn size(&self) -> usize {
        self.clips.len()
    }

    fn clip(&self, index: usize) -> &[f32] {
        &self.clips[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_is_deterministic() {
        let entries = |n: usize| {
            (0..n)
                .map(|i| AudioMetadata {
                    path: PathBuf::from(format!("{i}.wav")),
                    is_keyword: i % 3 == 0,
                })
                .collect::<Vec<_>>()
        };

        let a = SpeechDataset::from_entries(entries(50)).shuffled(666);
        let b = SpeechDataset::from_entries(entries(50)).shuffled(666);

        let order_a: Vec<&PathBuf> = a.entries().iter().map(|e| &e.path).collect();
        let order_b: Vec<&PathBuf> = b.entries().iter().map(|e| &e.path).collect();
        assert_eq!(order_a, order_b);

        // 不同种子应得到不同排列（50个条目碰撞概率可忽略）
        let c = SpeechDataset::from_entries(entries(50)).shuffled(667);
        let order_c: Vec<&PathBuf> = c.entries().iter().map(|e| &e.path).collect();
        assert_ne!(order_a, order_c);
    }

    #[test]
    fn test_merged_keyword_count() {
        let keyword = SpeechDataset::from_entries(vec![
            AudioMetadata {
                path: PathBuf::from("kw1.wav"),
                is_keyword: true,
            },
            AudioMetadata {
                path: PathBuf::from("kw2.wav"),
                is_keyword: true,
            },
        ]);
        let background = SpeechDataset::from_entries(vec![AudioMetadata {
            path: PathBuf::from("bg1.wav"),
            is_keyword: false,
        }]);

        let merged = SpeechDataset::merged(vec![keyword, background]);
        assert_eq!(merged.size(), 3);
        assert_eq!(merged.keyword_count(), 2);
    }

    #[test]
    fn test_noise_dataset_from_clips() {
        let noise = NoiseDataset::from_clips(vec![vec![0.1; 100], vec![0.2; 200]]);
        assert_eq!(noise.size(), 2);
        assert_eq!(noise.clip(1).len(), 200);
    }
}

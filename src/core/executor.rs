//! 评测执行器
//!
//! 驱动一个引擎适配器走完一遍带标签数据集（可选混噪），逐帧
//! 流式送检并累计误报/漏检，最终产出速率指标。
//!
//! 单次运行严格串行：适配器内部持有非线程安全的流式解码状态，
//! 帧必须按时间顺序到达。并行只存在于外层的(引擎, 灵敏度)配置
//! 粒度，各配置完全隔离。

use crate::audio::frame::{frames, quantize_i16};
use crate::core::mixer::NoiseMixer;
use crate::dataset::SpeechSource;
use crate::engine::WakeWordEngine;
use crate::error::{BenchError, BenchResult};
use serde::Serialize;

/// 一次评测运行的准确率结果
///
/// 在`execute`成功收尾时一次性构建，之后不再变更。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyResult {
    /// 每小时误报次数
    pub false_alarms_per_hour: f64,

    /// 漏检率（漏检样本数 / 关键词样本总数）
    pub miss_rate: f64,

    /// 误报总次数
    pub false_alarm_count: u64,

    /// 漏检总次数
    pub miss_count: u64,

    /// 关键词样本总数
    pub keyword_sample_count: usize,

    /// 评测音频总时长（小时，按补静音前的原始时长累计）
    pub total_duration_hours: f64,
}

/// 评测执行器
///
/// 不拥有数据集与噪声语料，只借用；引擎实例归执行器所有，
/// 但释放时机由调用方通过显式`release()`控制。
pub struct WakeWordExecutor<'a> {
    engine: Box<dyn WakeWordEngine>,
    dataset: &'a dyn SpeechSource,
    mixer: Option<NoiseMixer<'a>>,
    sensitivity: f64,
    keyword_count: usize,
    released: bool,
}

impl<'a> WakeWordExecutor<'a> {
    /// 创建评测执行器
    ///
    /// # 参数
    ///
    /// * `engine` - 引擎适配器实例（归执行器所有）
    /// * `dataset` - 带标签语音数据集（迭代顺序由数据集决定）
    /// * `mixer` - 可选噪声混合器；None表示干净语音评测
    /// * `sensitivity` - 当前配置的灵敏度（仅用于日志）
    ///
    /// # 错误
    ///
    /// 以下前置条件违例立即失败，不产出任何指标：
    /// * 数据集为空，或不含任何关键词样本（速率分母会为零）
    /// * 引擎期望非单声道或非16位输入
    pub fn new(
        engine: Box<dyn WakeWordEngine>,
        dataset: &'a dyn SpeechSource,
        mixer: Option<NoiseMixer<'a>>,
        sensitivity: f64,
    ) -> BenchResult<Self> {
        if dataset.size() == 0 {
            return Err(BenchError::InvalidInput(
                "数据集为空，无法评测".to_string(),
            ));
        }

        let keyword_count = (0..dataset.size())
            .filter(|&i| dataset.is_keyword(i))
            .count();
        if keyword_count == 0 {
            return Err(BenchError::InvalidInput(
                "数据集不含关键词样本，漏检率分母为零".to_string(),
            ));
        }

        if engine.channel_count() != 1 {
            return Err(BenchError::InvalidInput(format!(
                "引擎 {} 期望 {} 声道，本工具只支持单声道语料",
                engine.label(),
                engine.channel_count()
            )));
        }

        if engine.bits_per_sample() != 16 {
            return Err(BenchError::InvalidInput(format!(
                "引擎 {} 期望 {} 位输入，量化层只支持16位",
                engine.label(),
                engine.bits_per_sample()
            )));
        }

        Ok(Self {
            engine,
            dataset,
            mixer,
            sensitivity,
            keyword_count,
            released: false,
        })
    }

    /// 执行一遍完整评测
    ///
    /// 对每个样本：校验采样率 → 可选混噪 → int16量化 → 按引擎帧长
    /// 切分（尾部余量丢弃）→ 逐帧送检。关键词样本整段零触发记一次
    /// 漏检（段内多次触发只算检出一次）；背景样本每个触发帧记一次
    /// 误报（不去重）。
    ///
    /// 任何样本上的错误都会中止整次运行，绝不吞掉异常返回全零
    /// 指标。
    pub fn execute(&mut self) -> BenchResult<AccuracyResult> {
        let mut false_alarm_count = 0u64;
        let mut miss_count = 0u64;
        let mut total_duration_seconds = 0.0f64;

        let frame_length = self.engine.frame_length();
        let expected_rate = self.engine.sample_rate();

        for index in 0..self.dataset.size() {
            let sample = self.dataset.get(index)?;

            if sample.sample_rate != expected_rate {
                return Err(BenchError::InvalidInput(format!(
                    "样本#{index}采样率 {} Hz 与引擎期望 {} Hz 不符",
                    sample.sample_rate, expected_rate
                )));
            }

            // 时长按原始样本时长入账，与是否混噪无关
            total_duration_seconds += sample.duration_seconds;

            let pcm = match self.mixer.as_mut() {
                Some(mixer) => mixer.mix(&sample.pcm),
                None => sample.pcm,
            };

            // 显式量化：引擎消费int16，不藏在调用包装里
            let pcm = quantize_i16(&pcm);

            let mut detected_frames = 0u64;
            for frame in frames(&pcm, frame_length) {
                if self.engine.process(frame)? {
                    detected_frames += 1;
                }
            }

            if sample.contains_keyword {
                // 整段一次都没触发才算漏检；多次触发不重复计功
                if detected_frames == 0 {
                    miss_count += 1;
                }
            } else {
                // 背景样本的每个触发帧都是一次独立误报
                false_alarm_count += detected_frames;
            }
        }

        if total_duration_seconds <= 0.0 {
            return Err(BenchError::InvalidInput(
                "数据集总时长为零，无法计算误报速率".to_string(),
            ));
        }

        let total_duration_hours = total_duration_seconds / 3600.0;
        let result = AccuracyResult {
            false_alarms_per_hour: false_alarm_count as f64 / total_duration_hours,
            miss_rate: miss_count as f64 / self.keyword_count as f64,
            false_alarm_count,
            miss_count,
            keyword_sample_count: self.keyword_count,
            total_duration_hours,
        };

        println!(
            "[INFO] {} (灵敏度 {:.2}): 误报 {:.3}/小时 ({} / {:.3} h)，漏检率 {:.3} ({} / {})",
            self.engine.label(),
            self.sensitivity,
            result.false_alarms_per_hour,
            result.false_alarm_count,
            result.total_duration_hours,
            result.miss_rate,
            result.miss_count,
            result.keyword_sample_count
        );

        Ok(result)
    }

    /// 释放引擎资源
    ///
    /// 由调用方在全部样本处理完后显式调用一次。释放失败会被记录
    /// 并返回错误，但绝不影响已经产出的评测结果。
    pub fn release(&mut self) -> BenchResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        self.engine.release().map_err(|e| {
            eprintln!(
                "[WARNING] 引擎 {} 释放失败 / engine release failed: {e}",
                self.engine.label()
            );
            BenchError::ReleaseError(format!("{}: {e}", self.engine.label()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{LabeledSample, SAMPLE_RATE};

    /// 按预置脚本逐帧应答的测试引擎
    struct ScriptedEngine {
        responses: Vec<bool>,
        cursor: usize,
    }

    impl ScriptedEngine {
        fn new(responses: Vec<bool>) -> Self {
            Self {
                responses,
                cursor: 0,
            }
        }
    }

    impl WakeWordEngine for ScriptedEngine {
        fn process(&mut self, frame: &[i16]) -> BenchResult<bool> {
            assert_eq!(frame.len(), self.frame_length());
            let fired = self.responses.get(self.cursor).copied().unwrap_or(false);
            self.cursor += 1;
            Ok(fired)
        }

        fn release(&mut self) -> BenchResult<()> {
            Ok(())
        }

        fn label(&self) -> &str {
            "Scripted"
        }
    }

    /// 内存数据集
    struct MemoryDataset {
        samples: Vec<LabeledSample>,
    }

    impl SpeechSource for MemoryDataset {
        fn size(&self) -> usize {
            self.samples.len()
        }

        fn is_keyword(&self, index: usize) -> bool {
            self.samples[index].contains_keyword
        }

        fn get(&self, index: usize) -> BenchResult<LabeledSample> {
            Ok(self.samples[index].clone())
        }
    }

    fn sample(frames: usize, keyword: bool, duration: f64) -> LabeledSample {
        LabeledSample {
            pcm: vec![0.1f32; frames * 512],
            contains_keyword: keyword,
            sample_rate: SAMPLE_RATE,
            duration_seconds: duration,
        }
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let dataset = MemoryDataset { samples: vec![] };
        let engine = Box::new(ScriptedEngine::new(vec![]));
        assert!(matches!(
            WakeWordExecutor::new(engine, &dataset, None, 0.5),
            Err(BenchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_no_keyword_samples_rejected() {
        let dataset = MemoryDataset {
            samples: vec![sample(2, false, 1.0)],
        };
        let engine = Box::new(ScriptedEngine::new(vec![]));
        assert!(matches!(
            WakeWordExecutor::new(engine, &dataset, None, 0.5),
            Err(BenchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_miss_rate_zero_when_detected_once() {
        // 1个关键词样本，引擎只在第1帧触发 => 漏检率0
        let dataset = MemoryDataset {
            samples: vec![sample(4, true, 1.0)],
        };
        let engine = Box::new(ScriptedEngine::new(vec![true, false, false, false]));

        let mut executor = WakeWordExecutor::new(engine, &dataset, None, 0.5).unwrap();
        let result = executor.execute().unwrap();

        assert_eq!(result.miss_rate, 0.0);
        assert_eq!(result.miss_count, 0);
        assert_eq!(result.false_alarm_count, 0);
    }

    #[test]
    fn test_miss_rate_one_when_never_detected() {
        let dataset = MemoryDataset {
            samples: vec![sample(4, true, 1.0)],
        };
        let engine = Box::new(ScriptedEngine::new(vec![false; 4]));

        let mut executor = WakeWordExecutor::new(engine, &dataset, None, 0.5).unwrap();
        let result = executor.execute().unwrap();

        assert_eq!(result.miss_rate, 1.0);
        assert_eq!(result.miss_count, 1);
    }

    #[test]
    fn test_multiple_triggers_count_once_for_keyword() {
        // 关键词样本内3次触发只算一次检出，不是3次
        let dataset = MemoryDataset {
            samples: vec![sample(4, true, 1.0)],
        };
        let engine = Box::new(ScriptedEngine::new(vec![true, true, true, false]));

        let mut executor = WakeWordExecutor::new(engine, &dataset, None, 0.5).unwrap();
        let result = executor.execute().unwrap();

        assert_eq!(result.miss_count, 0);
        assert_eq!(result.false_alarm_count, 0);
    }

    #[test]
    fn test_false_alarms_not_deduplicated() {
        // 背景样本3次触发 + 数据集总时长恰为1小时 => 3.0次/小时
        let dataset = MemoryDataset {
            samples: vec![
                sample(4, false, 3599.0),
                sample(1, true, 1.0),
            ],
        };
        // 背景4帧中3帧触发；关键词1帧触发（避免漏检干扰）
        let engine = Box::new(ScriptedEngine::new(vec![true, true, true, false, true]));

        let mut executor = WakeWordExecutor::new(engine, &dataset, None, 0.5).unwrap();
        let result = executor.execute().unwrap();

        assert!((result.total_duration_hours - 1.0).abs() < 1e-12);
        assert_eq!(result.false_alarm_count, 3);
        assert!((result.false_alarms_per_hour - 3.0).abs() < 1e-9);
        assert_eq!(result.miss_rate, 0.0);
    }

    #[test]
    fn test_remainder_frames_never_reach_engine() {
        // 512*2 + 100 个样本：只应送检2帧
        let dataset = MemoryDataset {
            samples: vec![LabeledSample {
                pcm: vec![0.1f32; 512 * 2 + 100],
                contains_keyword: true,
                sample_rate: SAMPLE_RATE,
                duration_seconds: 1.0,
            }],
        };
        let engine = Box::new(ScriptedEngine::new(vec![true, false]));

        let mut executor = WakeWordExecutor::new(engine, &dataset, None, 0.5).unwrap();
        // ScriptedEngine::process内部断言帧长恒为512；多送或短帧会panic
        let result = executor.execute().unwrap();
        assert_eq!(result.miss_count, 0);
    }

    #[test]
    fn test_sample_rate_mismatch_aborts() {
        let dataset = MemoryDataset {
            samples: vec![LabeledSample {
                pcm: vec![0.1f32; 512],
                contains_keyword: true,
                sample_rate: 44_100,
                duration_seconds: 1.0,
            }],
        };
        let engine = Box::new(ScriptedEngine::new(vec![false]));

        let mut executor = WakeWordExecutor::new(engine, &dataset, None, 0.5).unwrap();
        assert!(matches!(
            executor.execute(),
            Err(BenchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_release_idempotent() {
        let dataset = MemoryDataset {
            samples: vec![sample(1, true, 1.0)],
        };
        let engine = Box::new(ScriptedEngine::new(vec![true]));

        let mut executor = WakeWordExecutor::new(engine, &dataset, None, 0.5).unwrap();
        assert!(executor.release().is_ok());
        assert!(executor.release().is_ok());
    }
}

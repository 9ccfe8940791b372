//! SNR受控混噪
//!
//! 把噪声语料中的素材按目标信噪比注入干净语音，输出长度恒等于
//! 输入长度且保证不削波。随机源为显式传入种子的独立实例：同一
//! (语料, 语音, 种子)组合产出逐字节一致的结果，这是跨引擎对比
//! 可复现的前提。

use crate::core::energy::windowed_peak_energy;
use crate::dataset::NoiseSource;
use crate::error::{BenchError, BenchResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 噪声混合器
///
/// 持有噪声语料的只读引用与自己的随机数发生器。每个评测配置
/// 各建一个实例（相同种子），互不干扰。
pub struct NoiseMixer<'a> {
    /// 噪声语料
    noise: &'a dyn NoiseSource,

    /// 目标信噪比 (dB)
    snr_db: f64,

    /// 能量计算的窗口长度（取引擎帧长）
    window_length: usize,

    /// 显式种子的随机数发生器
    rng: StdRng,
}

impl<'a> NoiseMixer<'a> {
    /// 创建噪声混合器
    ///
    /// # 参数
    ///
    /// * `noise` - 噪声语料（至少含一个非空片段）
    /// * `snr_db` - 目标信噪比，常用10dB（中等噪声）
    /// * `window_length` - 能量分窗长度，取引擎帧长
    /// * `seed` - 随机种子；相同种子保证混噪结果可复现
    ///
    /// # 错误
    ///
    /// * `BenchError::DataUnavailable` - 噪声语料为空或全部片段为空
    pub fn new(
        noise: &'a dyn NoiseSource,
        snr_db: f64,
        window_length: usize,
        seed: u64,
    ) -> BenchResult<Self> {
        let total: usize = (0..noise.size()).map(|i| noise.clip(i).len()).sum();
        if total == 0 {
            return Err(BenchError::DataUnavailable(
                "噪声语料为空，无法混噪".to_string(),
            ));
        }

        Ok(Self {
            noise,
            snr_db,
            window_length,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// 把噪声按目标SNR混入语音
    ///
    /// 输出长度恒等于`speech.len()`；任何输入都不会产生NaN或
    /// 超出[-1, 1]的样本。
    pub fn mix(&mut self, speech: &[f32]) -> Vec<f32> {
        let noise = self.assemble_noise(speech.len());
        let scale = self.noise_scale(speech, &noise);

        let mut mixed: Vec<f32> = speech
            .iter()
            .zip(noise.iter())
            .map(|(&s, &n)| s + n * scale as f32)
            .collect();

        // 防削波：按峰值的两倍回缩，留出下游int16量化的余量
        let peak = mixed.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        if peak > 0.0 {
            let guard = 1.0 / (2.0 * peak);
            for s in mixed.iter_mut() {
                *s *= guard;
            }
        }

        mixed
    }

    /// 组装一段指定长度的噪声
    ///
    /// 均匀有放回地抽取整个噪声片段并拼接，直到总长覆盖需求；
    /// 再在拼接结果上取一次均匀随机起点，截出所需长度。
    fn assemble_noise(&mut self, length: usize) -> Vec<f32> {
        if length == 0 {
            return Vec::new();
        }

        let mut assembled: Vec<f32> = Vec::with_capacity(length * 2);
        while assembled.len() < length {
            let index = self.rng.gen_range(0..self.noise.size());
            assembled.extend_from_slice(self.noise.clip(index));
        }

        let start = self.rng.gen_range(0..=(assembled.len() - length));
        assembled[start..start + length].to_vec()
    }

    /// 计算噪声缩放系数
    ///
    /// 由SNR恒等式 snr_db = 10*log10(Ps / (Pn * g^2)) 解出
    /// g = sqrt(Ps / (Pn * 10^(snr_db/10)))。语音或噪声能量为零的
    /// 退化输入返回0，而不是抛出除零错误。
    fn noise_scale(&self, speech: &[f32], noise: &[f32]) -> f64 {
        let speech_energy = windowed_peak_energy(speech, self.window_length);
        let noise_energy = windowed_peak_energy(noise, self.window_length);

        if speech_energy <= 0.0 || noise_energy <= 0.0 {
            return 0.0;
        }

        (speech_energy / (noise_energy * 10f64.powf(self.snr_db / 10.0))).sqrt()
    }
}

//! 信号能量计算
//!
//! SNR标定所用的能量度量。语音样本往往是大段静音包着一小段
//! 发声，全局平均能量会严重低估语音响度、导致噪声被过度放大；
//! 因此取分窗能量的最大值而不是均值。

/// 计算分窗峰值能量
///
/// 把`signal`切成`window_length`个样本的非重叠窗口（不足一窗的
/// 尾部丢弃），对每个窗口求平方和，返回所有窗口中的最大能量。
///
/// 不足一个完整窗口（或`window_length`为0）时返回0.0，调用方
/// 据此走零能量退化路径，绝不发生除零。
pub fn windowed_peak_energy(signal: &[f32], window_length: usize) -> f64 {
    if window_length == 0 {
        return 0.0;
    }

    signal
        .chunks_exact(window_length)
        .map(|window| {
            window
                .iter()
                .map(|&s| {
                    let s = s as f64;
                    s * s
                })
                .sum::<f64>()
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_energy_takes_max_window() {
        // 前4个样本能量 4*0.01 = 0.04，后4个样本能量 4*0.25 = 1.0
        let signal = vec![0.1, 0.1, 0.1, 0.1, 0.5, 0.5, 0.5, 0.5];
        let energy = windowed_peak_energy(&signal, 4);
        assert!((energy - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_peak_energy_discards_remainder() {
        // 尾部能量最高的样本落在不完整窗口里，不得参与统计
        let mut signal = vec![0.1f32; 8];
        signal.push(1.0);
        let energy = windowed_peak_energy(&signal, 4);
        assert!((energy - 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_peak_energy_short_signal() {
        // 不足一窗：返回0而不是除零或panic
        assert_eq!(windowed_peak_energy(&[0.5, 0.5], 4), 0.0);
        assert_eq!(windowed_peak_energy(&[], 4), 0.0);
        assert_eq!(windowed_peak_energy(&[0.5; 16], 0), 0.0);
    }

    #[test]
    fn test_peak_energy_silence() {
        assert_eq!(windowed_peak_energy(&vec![0.0; 1024], 512), 0.0);
    }
}

//! 帧切分与量化
//!
//! 引擎以固定帧长消费int16 PCM。切分规则：非重叠、不足一帧的
//! 尾部直接丢弃，绝不喂给引擎。

/// 计算一段PCM能切出的完整帧数
///
/// 等于 `floor(len / frame_length)`；`frame_length`为0时返回0。
#[inline]
pub fn frame_count(pcm_len: usize, frame_length: usize) -> usize {
    if frame_length == 0 {
        return 0;
    }
    pcm_len / frame_length
}

/// 按固定帧长切分PCM，返回非重叠完整帧的迭代器
///
/// 尾部不足一帧的余量被丢弃。对同一缓冲区重复调用产生完全相同
/// 的帧边界（切分是纯函数）。
#[inline]
pub fn frames(pcm: &[i16], frame_length: usize) -> impl Iterator<Item = &[i16]> {
    pcm.chunks_exact(frame_length.max(1))
}

/// 将[-1, 1]范围的f32样本量化为int16
///
/// 引擎适配层统一消费16位整型PCM，量化在喂入引擎前由执行器
/// 显式完成（而不是隐藏在每次调用的包装器里）。超出[-1, 1]的
/// 值先截断再量化，避免环绕失真。
pub fn quantize_i16(pcm: &[f32]) -> Vec<i16> {
    pcm.iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0).round() as i16)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_floor() {
        assert_eq!(frame_count(0, 512), 0);
        assert_eq!(frame_count(511, 512), 0);
        assert_eq!(frame_count(512, 512), 1);
        assert_eq!(frame_count(1023, 512), 1);
        assert_eq!(frame_count(1024, 512), 2);
        assert_eq!(frame_count(100, 0), 0);
    }

    #[test]
    fn test_frames_drop_remainder() {
        let pcm: Vec<i16> = (0..1100).map(|i| i as i16).collect();
        let collected: Vec<&[i16]> = frames(&pcm, 512).collect();

        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0][0], 0);
        assert_eq!(collected[1][0], 512);
        // 余下的76个样本不出现在任何帧中
        assert!(collected.iter().all(|f| f.len() == 512));
    }

    #[test]
    fn test_frames_idempotent() {
        let pcm: Vec<i16> = (0..2048).map(|i| (i % 97) as i16).collect();

        let first: Vec<Vec<i16>> = frames(&pcm, 512).map(|f| f.to_vec()).collect();
        let second: Vec<Vec<i16>> = frames(&pcm, 512).map(|f| f.to_vec()).collect();

        assert_eq!(first, second);
        assert_eq!(first.len(), frame_count(pcm.len(), 512));
    }

    #[test]
    fn test_quantize_range() {
        let pcm = vec![0.0, 1.0, -1.0, 0.5, 2.0, -2.0];
        let quantized = quantize_i16(&pcm);

        assert_eq!(quantized[0], 0);
        assert_eq!(quantized[1], 32767);
        assert_eq!(quantized[2], -32767);
        assert_eq!(quantized[3], 16384);
        // 超限值被截断而不是环绕
        assert_eq!(quantized[4], 32767);
        assert_eq!(quantized[5], -32767);
    }
}

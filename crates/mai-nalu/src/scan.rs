//! Annex B 起始码搜索.
//!
//! 起始码 (start code) 是裸码流中分隔 NAL 单元的标记:
//! - 3 字节形式: `00 00 01`
//! - 4 字节形式: `00 00 00 01`
//!
//! 多兆字节裸流的逐字节扫描开销可观, 本模块按 "头部逐字节, 中段按字
//! 批量, 尾部逐字节" 三段式扫描: 中段每次取 4 字节一组, 用零字节魔数
//! 测试 `(x - 0x01010101) & !x & 0x80808080` 快速排除不含零字节的字组,
//! 仅对可能命中的字组做精确逐字节比对. 起始码至少含两个零字节,
//! 不含零字节的字组内不可能出现起始码的开头.

/// 判断 32 位字组中是否存在零字节
#[inline]
fn has_zero_byte(word: u32) -> bool {
    (word.wrapping_sub(0x0101_0101) & !word & 0x8080_8080) != 0
}

/// 在 `data[from..]` 中查找第一个 3 字节序列 `00 00 01` 的起始位置
///
/// 未找到时返回 `data.len()`.
fn find_start_code_3(data: &[u8], from: usize) -> usize {
    let len = data.len();
    if from >= len {
        return len;
    }

    let mut i = from;

    // 头部: 对齐到 4 字节边界前逐字节检查
    let head_end = (i + 4 - (i & 3)).min(len);
    while i < head_end {
        if i + 3 <= len && data[i] == 0 && data[i + 1] == 0 && data[i + 2] == 1 {
            return i;
        }
        i += 1;
    }

    // 中段: 按 4 字节一组批量检查.
    // 候选位置 j ∈ [i, i+4) 的精确比对最多访问 data[j+2],
    // 因此要求 i + 6 <= len 才进入字组快速路径.
    while i + 6 <= len {
        let word = u32::from_ne_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);
        if has_zero_byte(word) {
            for j in i..i + 4 {
                if data[j] == 0 && data[j + 1] == 0 && data[j + 2] == 1 {
                    return j;
                }
            }
        }
        i += 4;
    }

    // 尾部: 剩余不足一组的字节逐字节检查
    while i + 3 <= len {
        if data[i] == 0 && data[i + 1] == 0 && data[i + 2] == 1 {
            return i;
        }
        i += 1;
    }

    len
}

/// 查找下一个起始码, 返回其在 `data` 中的位置
///
/// 返回位置指向 3 字节形式 `00 00 01` 的首字节; 当其前一字节恰为零
/// (即 4 字节形式 `00 00 00 01` 的前导零) 时回退一个字节, 指向该
/// 前导零. 回退只做一次: 更长零串中再往前的零字节归属前一单元的载荷.
/// 未找到时返回 `data.len()`.
pub fn find_start_code(data: &[u8], from: usize) -> usize {
    let pos = find_start_code_3(data, from);
    if pos > from && pos < data.len() && data[pos - 1] == 0 {
        pos - 1
    } else {
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_3byte_start_code() {
        let data = [0xFF, 0x00, 0x00, 0x01, 0x67];
        assert_eq!(find_start_code(&data, 0), 1);
    }

    #[test]
    fn test_find_4byte_start_code_backs_off_one() {
        let data = [0xFF, 0x00, 0x00, 0x00, 0x01, 0x67];
        // 3 字节模式命中于 2, 前一字节为零, 回退到前导零的位置
        assert_eq!(find_start_code(&data, 0), 1);
    }

    #[test]
    fn test_start_code_at_buffer_head() {
        let data = [0x00, 0x00, 0x01, 0x67];
        assert_eq!(find_start_code(&data, 0), 0);

        let data4 = [0x00, 0x00, 0x00, 0x01, 0x67];
        assert_eq!(find_start_code(&data4, 0), 0);
    }

    #[test]
    fn test_backoff_never_crosses_from() {
        // from 位置本身是零, 但回退不得越过 from
        let data = [0x00, 0x00, 0x00, 0x01, 0x67];
        assert_eq!(find_start_code(&data, 1), 1);
        assert_eq!(find_start_code(&data, 2), 2);
    }

    #[test]
    fn test_extra_zeros_only_back_off_once() {
        // 00 00 00 00 01: 模式命中于 2, 仅回退到 1, data[0] 归前一载荷
        let data = [0x00, 0x00, 0x00, 0x00, 0x01, 0x67];
        assert_eq!(find_start_code(&data, 0), 1);
    }

    #[test]
    fn test_not_found_returns_len() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A];
        assert_eq!(find_start_code(&data, 0), data.len());

        let zeros = [0x00; 16];
        assert_eq!(find_start_code(&zeros, 0), zeros.len(), "纯零流中不存在起始码");
    }

    #[test]
    fn test_empty_and_short_input() {
        assert_eq!(find_start_code(&[], 0), 0);
        assert_eq!(find_start_code(&[0x00], 0), 1);
        assert_eq!(find_start_code(&[0x00, 0x00], 0), 2);
        assert_eq!(find_start_code(&[0x00, 0x00, 0x01], 0), 0);
    }

    #[test]
    fn test_from_beyond_match_skips_it() {
        let data = [0x00, 0x00, 0x01, 0x67, 0x00, 0x00, 0x01, 0x68];
        assert_eq!(find_start_code(&data, 0), 0);
        assert_eq!(find_start_code(&data, 1), 4);
        assert_eq!(find_start_code(&data, 5), data.len());
    }

    #[test]
    fn test_match_at_every_word_offset() {
        // 起始码可能落在字组内的任意偏移, 逐一验证快速路径无遗漏
        for offset in 0..32 {
            let mut data = vec![0xEE; 64];
            data[offset] = 0x00;
            data[offset + 1] = 0x00;
            data[offset + 2] = 0x01;
            assert_eq!(
                find_start_code(&data, 0),
                offset,
                "offset={offset} 处的起始码未被找到"
            );
        }
    }

    #[test]
    fn test_match_straddling_word_groups() {
        // 零字节在一组末尾, 0x01 在下一组开头
        let mut data = vec![0xEE; 24];
        data[6] = 0x00;
        data[7] = 0x00;
        data[8] = 0x01;
        assert_eq!(find_start_code(&data, 0), 6);
    }

    #[test]
    fn test_match_in_tail_phase() {
        // 起始码恰好落在缓冲区末尾, 由尾部逐字节阶段命中
        let mut data = vec![0xEE; 21];
        let n = data.len();
        data[n - 3] = 0x00;
        data[n - 2] = 0x00;
        data[n - 1] = 0x01;
        assert_eq!(find_start_code(&data, 0), n - 3);
    }

    #[test]
    fn test_first_match_wins() {
        let data = [
            0xEE, 0x00, 0x00, 0x01, 0x67, 0x00, 0x00, 0x01, 0x68, 0xEE,
        ];
        assert_eq!(find_start_code(&data, 0), 1);
    }

    #[test]
    fn test_zero_runs_without_one_are_not_matches() {
        // 00 00 00 02: 有零字节触发精确比对, 但不是起始码
        let data = [0x00, 0x00, 0x00, 0x02, 0xEE, 0xEE, 0xEE, 0xEE];
        assert_eq!(find_start_code(&data, 0), data.len());
    }
}

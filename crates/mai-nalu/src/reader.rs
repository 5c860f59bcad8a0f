//! Annex B 裸码流 NAL 单元读取器.
//!
//! 将整个裸流文件载入内存, 每次调用产出一个 NAL 单元, 规范化为
//! 4 字节起始码 + 载荷后写入调用方提供的输出缓冲区.
//!
//! # 裸流结构
//! ```text
//! [起始码][NAL 载荷][起始码][NAL 载荷]...
//! ```
//!
//! 读取器只做字节层面的单元切分, 不关心载荷属于 H.264 还是 HEVC;
//! 类型识别见 [`crate::h264`] 与 [`crate::h265`].

use std::path::Path;

use log::debug;
use mai_core::{MaiError, MaiResult};

use crate::scan::find_start_code;

/// 规范化输出使用的 4 字节起始码
pub const START_CODE: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// 单次读取产出的 NAL 单元信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NalUnitInfo {
    /// 写入输出缓冲区的总字节数 (4 字节起始码 + 载荷)
    pub size: usize,
    /// 该单元起始码在源流中的偏移
    pub offset: usize,
    /// 载荷首字节 (NAL 头部首字节); 零长度载荷时为 `None`
    pub header: Option<u8>,
}

impl NalUnitInfo {
    /// 载荷字节数 (不含 4 字节起始码)
    pub fn payload_len(&self) -> usize {
        self.size - START_CODE.len()
    }
}

/// Annex B 裸码流读取器
///
/// 独占持有完整载入的流数据与读取游标, 可多次构造, 无任何全局状态.
/// 游标单调前进, 每次 [`read_next`](Self::read_next) 至多产出一个单元.
/// 单线程使用; 跨线程共享需外部加锁.
#[derive(Debug)]
pub struct AnnexBReader {
    /// 完整载入的流数据, 载入后不再变更
    data: Vec<u8>,
    /// 下一个未读位置
    cursor: usize,
}

impl AnnexBReader {
    /// 打开并完整读取裸流文件
    ///
    /// 文件无法打开或读取时返回 [`MaiError::Io`], 与合法的空流
    /// (长度为 0, 首次读取即返回 `None`) 严格区分.
    pub fn open(path: impl AsRef<Path>) -> MaiResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        debug!("载入裸流文件: {} ({} 字节)", path.display(), data.len());
        Ok(Self::from_bytes(data))
    }

    /// 从内存数据构造读取器
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data, cursor: 0 }
    }

    /// 流的总字节数
    pub fn total_size(&self) -> usize {
        self.data.len()
    }

    /// 当前游标位置 (已消费的字节数)
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// 读取下一个 NAL 单元, 写入 `out`
    ///
    /// 产出形式固定为 4 字节起始码 `00 00 00 01` + 载荷, 与源流中该
    /// 单元使用 3 字节还是 4 字节起始码无关. 每次调用至多产出一个
    /// 单元, 即便流中出现连续紧邻的起始码 (如访问单元分隔符);
    /// 调用方通过反复调用逐单元推进, 直到返回 `None`.
    ///
    /// 返回值:
    /// - `Ok(Some(info))`: 产出一个单元, `info.size` 为写入的字节数
    /// - `Ok(None)`: 流已读尽, 正常终止 (不是错误)
    /// - `Err(MaiError::BufferTooSmall { .. })`: `out` 容量不足.
    ///   游标不前进, 不写入任何字节, 换更大的缓冲区重试即可
    pub fn read_next(&mut self, out: &mut [u8]) -> MaiResult<Option<NalUnitInfo>> {
        let len = self.data.len();
        if self.cursor >= len {
            return Ok(None);
        }

        let unit_start = find_start_code(&self.data, self.cursor);
        if unit_start >= len {
            // 余下字节中不存在起始码, 消费掉流尾并终止
            self.cursor = len;
            return Ok(None);
        }

        // 跳过起始码处的零字节串与 0x01 标志字节, 抵达载荷.
        // find_start_code 保证零串之后必有 0x01, 不会越界.
        let mut payload_start = unit_start;
        while self.data[payload_start] == 0 {
            payload_start += 1;
        }
        payload_start += 1;

        // 下一个起始码 (或流尾) 即本单元载荷的结束边界
        let payload_end = find_start_code(&self.data, payload_start);
        let payload = &self.data[payload_start..payload_end];

        let produced = START_CODE.len() + payload.len();
        if produced > out.len() {
            return Err(MaiError::BufferTooSmall {
                needed: produced,
                capacity: out.len(),
            });
        }

        out[..START_CODE.len()].copy_from_slice(&START_CODE);
        out[START_CODE.len()..produced].copy_from_slice(payload);
        self.cursor = payload_end;

        Ok(Some(NalUnitInfo {
            size: produced,
            offset: unit_start,
            header: payload.first().copied(),
        }))
    }
}

//! # Mai (脉)
//!
//! 纯 Rust 实现的 Annex B 裸码流 NAL 单元读取工具集.
//!
//! 面向原始 H.264/HEVC 裸流 (`.264`/`.265`), 提供按单元读取、
//! 起始码规范化与 NAL 类型识别能力:
//! - **读取**: 一次一单元的 [`AnnexBReader`](mai_nalu::AnnexBReader),
//!   产出统一规范化为 4 字节起始码
//! - **识别**: H.264 与 HEVC 的 NAL 头部类型解析
//! - **工具**: `mai-probe` (码流探测) 与 `mai-copy` (规范化复制)
//!
//! # 快速开始
//!
//! ```rust
//! use mai::nalu::AnnexBReader;
//!
//! let data = vec![0x00, 0x00, 0x00, 0x01, 0x67, 0xAA];
//! let mut reader = AnnexBReader::from_bytes(data);
//! let mut buf = [0u8; 16];
//! while let Some(unit) = reader.read_next(&mut buf).unwrap() {
//!     println!("NAL 单元: {} 字节", unit.size);
//! }
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `mai-core` | 核心类型与错误定义 |
//! | `mai-nalu` | Annex B NAL 单元读取库 |

/// 核心类型与错误定义
pub use mai_core as core;

/// Annex B NAL 单元读取库
pub use mai_nalu as nalu;

/// 获取 Mai 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

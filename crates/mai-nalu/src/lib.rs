//! # mai-nalu
//!
//! Annex B 裸码流 NAL 单元读取库.
//!
//! 面向原始 H.264/HEVC 裸流 (`.264`/`.265`), 提供:
//! - 起始码搜索 (三段式字并行扫描, 见 [`scan`])
//! - 一次一单元的读取器 [`AnnexBReader`], 产出统一规范化为 4 字节起始码
//! - H.264 与 HEVC 的 NAL 头部类型识别 (见 [`h264`] / [`h265`])
//!
//! ## 使用示例
//!
//! ```rust
//! use mai_nalu::AnnexBReader;
//!
//! let data = vec![
//!     0x00, 0x00, 0x00, 0x01, 0x67, 0xAA, // SPS (4 字节起始码)
//!     0x00, 0x00, 0x01, 0x68, 0xBB, // PPS (3 字节起始码)
//! ];
//! let mut reader = AnnexBReader::from_bytes(data);
//! let mut buf = [0u8; 16];
//! while let Some(unit) = reader.read_next(&mut buf).unwrap() {
//!     println!("NAL 单元: {} 字节", unit.size);
//! }
//! ```

pub mod h264;
pub mod h265;
pub mod reader;
pub mod scan;

// 重导出常用类型
pub use reader::{AnnexBReader, NalUnitInfo, START_CODE};
pub use scan::find_start_code;

//! 统一错误类型定义.
//!
//! Mai 工具集各 crate 共用的错误类型, 支持跨模块传播.

use thiserror::Error;

/// Mai 工具集统一错误类型
#[derive(Debug, Error)]
pub enum MaiError {
    /// I/O 错误 (文件无法打开或读取)
    ///
    /// 与合法的空码流严格区分: 空文件不是错误, 缺失的文件才是.
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 调用方提供的输出缓冲区容量不足
    ///
    /// 检测发生在任何写入之前, 读取器状态不变, 可换更大的缓冲区重试.
    #[error("输出缓冲区不足: 需要 {needed} 字节, 实际容量 {capacity} 字节")]
    BufferTooSmall {
        /// 本次产出所需的字节数
        needed: usize,
        /// 调用方缓冲区的实际容量
        capacity: usize,
    },

    /// 无效数据 (损坏的码流等)
    #[error("无效数据: {0}")]
    InvalidData(String),
}

/// Mai 工具集统一 Result 类型
pub type MaiResult<T> = Result<T, MaiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: MaiError = io.into();
        assert!(matches!(err, MaiError::Io(_)));
    }

    #[test]
    fn test_buffer_too_small_display() {
        let err = MaiError::BufferTooSmall {
            needed: 1024,
            capacity: 16,
        };
        let msg = format!("{err}");
        assert!(msg.contains("1024"), "错误信息应包含所需字节数, actual={msg}");
        assert!(msg.contains("16"), "错误信息应包含实际容量, actual={msg}");
    }
}

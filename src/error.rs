//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    #[error("导入错误: {0}")]
    ImportError(String),

    #[error("存储错误: {0}")]
    StorageError(String),

    #[error("数据校验失败: 期望 CRC {expected}, 实际 {actual}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("序列化错误: {0}")]
    SerializationError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::ImportError(e.to_string())
    }
}

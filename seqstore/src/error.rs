//! 存储层统一错误定义
//!
//! 按错误“种类”划分：不存在、并发冲突、版本溢出、批量参数不匹配、序列化失败与后端失败。
//! 序列化失败与后端失败原样透传自编解码器与后端，不做重新解释；其余由引擎产生。
//!
use crate::version::Version;
use std::error::Error as StdError;
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entity not found: id={id}")]
    NotFound { id: String },

    /// 调用方持有的版本与存储中的版本不相等；唯一适合“重读-重放-重试”的错误
    #[error("concurrency conflict: id={id}, expected={expected}, actual={actual}")]
    ConcurrencyConflict {
        id: String,
        expected: Version,
        actual: Version,
    },

    /// 存储中的版本已达上限，无法再递增
    #[error("version overflow: id={id}, version={version}")]
    VersionOverflow { id: String, version: Version },

    #[error("length mismatch: ids={ids}, entities={entities}")]
    LengthMismatch { ids: usize, entities: usize },

    #[error("serialization error: {source}")]
    Serialization { source: BoxError },

    #[error("backend error: {source}")]
    Backend { source: BoxError },
}

/// 统一 Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound { id: id.into() }
    }

    pub fn serialization(source: impl Into<BoxError>) -> Self {
        StoreError::Serialization {
            source: source.into(),
        }
    }

    pub fn backend(source: impl Into<BoxError>) -> Self {
        StoreError::Backend {
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::ConcurrencyConflict { .. })
    }
}

// ---- 基础设施错误转换 ----
// 允许在适配器中直接使用 `?`

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::serialization(err)
    }
}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        StoreError::serialization(err)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::backend(err)
    }
}

#[cfg(feature = "sled")]
impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::backend(err)
    }
}

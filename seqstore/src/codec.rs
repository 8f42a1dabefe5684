//! 序列化适配（Codec）
//!
//! 仅字节型后端（内存字节表、文件）使用；直接保存结构化实体的后端绕过本模块。
//! 编解码错误统一转换为 `StoreError::Serialization` 并原样向调用方传播。
//!
use crate::error::StoreResult;
use serde::{Serialize, de::DeserializeOwned};

/// 实体与字节序列之间的无状态转换
pub trait Codec<E>: Send + Sync {
    fn marshal(&self, entity: &E) -> StoreResult<Vec<u8>>;

    fn unmarshal(&self, data: &[u8]) -> StoreResult<E>;
}

/// JSON 编解码（字节型后端的默认选择）
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<E> Codec<E> for JsonCodec
where
    E: Serialize + DeserializeOwned,
{
    fn marshal(&self, entity: &E) -> StoreResult<Vec<u8>> {
        Ok(serde_json::to_vec(entity)?)
    }

    fn unmarshal(&self, data: &[u8]) -> StoreResult<E> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// bincode 紧凑二进制编解码
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl<E> Codec<E> for BincodeCodec
where
    E: Serialize + DeserializeOwned,
{
    fn marshal(&self, entity: &E) -> StoreResult<Vec<u8>> {
        Ok(bincode::serialize(entity)?)
    }

    fn unmarshal(&self, data: &[u8]) -> StoreResult<E> {
        Ok(bincode::deserialize(data)?)
    }
}

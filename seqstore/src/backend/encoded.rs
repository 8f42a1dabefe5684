//! 字节表与编解码组合
//!
//! `ByteTable` 只负责按 id 存取字节；`Encoded` 把字节表与 `Codec` 组合为 `Transaction<E>`。
//!
use super::Transaction;
use crate::codec::Codec;
use crate::error::{StoreError, StoreResult};
use tracing::trace;

/// 以字节为单位的单键存储
pub trait ByteTable {
    /// 不存在时返回 `Ok(None)`
    fn get(&self, id: &str) -> StoreResult<Option<Vec<u8>>>;

    fn put(&mut self, id: &str, data: Vec<u8>) -> StoreResult<()>;

    /// 删除不存在的 id 视为成功
    fn delete(&mut self, id: &str) -> StoreResult<()>;
}

/// 字节表 + 编解码器
#[derive(Debug, Default)]
pub struct Encoded<T, C> {
    table: T,
    codec: C,
}

impl<T, C> Encoded<T, C> {
    pub fn new(table: T, codec: C) -> Self {
        Self { table, codec }
    }

    pub fn table(&self) -> &T {
        &self.table
    }
}

impl<E, T, C> Transaction<E> for Encoded<T, C>
where
    T: ByteTable,
    C: Codec<E>,
{
    fn get_multi(&mut self, ids: &[String]) -> StoreResult<Vec<E>> {
        ids.iter()
            .map(|id| {
                let data = self
                    .table
                    .get(id)?
                    .ok_or_else(|| StoreError::not_found(id.as_str()))?;
                self.codec.unmarshal(&data)
            })
            .collect()
    }

    fn put_multi(&mut self, ids: &[String], entities: &[E]) -> StoreResult<()> {
        // 先全部编码，编码失败时不写入任何数据
        let encoded = entities
            .iter()
            .map(|entity| self.codec.marshal(entity))
            .collect::<StoreResult<Vec<_>>>()?;

        for (id, data) in ids.iter().zip(encoded) {
            trace!(%id, bytes = data.len(), "put");
            self.table.put(id, data)?;
        }
        Ok(())
    }

    fn delete_multi(&mut self, ids: &[String]) -> StoreResult<()> {
        for id in ids {
            trace!(%id, "delete");
            self.table.delete(id)?;
        }
        Ok(())
    }
}

//! 进程内存储表
//!
//! - `EntityTable`：直接保存结构化实体（无需编解码）；
//! - `MemoryTable`：保存字节，配合 `Encoded` 与任意 `Codec` 使用。
//!
//! 两者都不提供事务，需由 `MutexGuarded` 守护后作为后端使用，生命周期随存储实例。
//!
use super::{ByteTable, Transaction};
use crate::error::{StoreError, StoreResult};
use std::collections::HashMap;

/// 结构化实体表
#[derive(Debug, Clone)]
pub struct EntityTable<E> {
    entities: HashMap<String, E>,
}

impl<E> Default for EntityTable<E> {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
        }
    }
}

impl<E> EntityTable<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<E> Transaction<E> for EntityTable<E>
where
    E: Clone,
{
    fn get_multi(&mut self, ids: &[String]) -> StoreResult<Vec<E>> {
        ids.iter()
            .map(|id| {
                self.entities
                    .get(id)
                    .cloned()
                    .ok_or_else(|| StoreError::not_found(id.as_str()))
            })
            .collect()
    }

    fn put_multi(&mut self, ids: &[String], entities: &[E]) -> StoreResult<()> {
        for (id, entity) in ids.iter().zip(entities) {
            self.entities.insert(id.clone(), entity.clone());
        }
        Ok(())
    }

    fn delete_multi(&mut self, ids: &[String]) -> StoreResult<()> {
        for id in ids {
            self.entities.remove(id);
        }
        Ok(())
    }
}

/// 字节表
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ByteTable for MemoryTable {
    fn get(&self, id: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.get(id).cloned())
    }

    fn put(&mut self, id: &str, data: Vec<u8>) -> StoreResult<()> {
        self.entries.insert(id.to_string(), data);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> StoreResult<()> {
        self.entries.remove(id);
        Ok(())
    }
}

//! sled 后端（原生多键事务）
//!
//! 事务边界直接使用 sled 的可串行化事务，不经过 `MutexGuarded`。
//! - 存储层写冲突时 sled 会重新执行 `body`；
//! - `body` 返回错误时事务中止，事务内的所有写入一并回滚。
//!
use super::{Backend, Transaction};
use crate::codec::Codec;
use crate::error::{StoreError, StoreResult};
use sled::Tree;
use sled::transaction::{
    ConflictableTransactionError, TransactionError, TransactionalTree, UnabortableTransactionError,
};
use tracing::trace;

/// 基于单个 `sled::Tree` 的后端，实体经 `Codec` 编码后以 id 为键保存
#[derive(Debug, Clone)]
pub struct SledBackend<C> {
    tree: Tree,
    codec: C,
}

impl<C> SledBackend<C> {
    pub fn new(tree: Tree, codec: C) -> Self {
        Self { tree, codec }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }
}

impl<E, C> Backend<E> for SledBackend<C>
where
    C: Codec<E>,
{
    fn run_in_transaction<R, F>(&self, body: F) -> StoreResult<R>
    where
        F: Fn(&mut dyn Transaction<E>) -> StoreResult<R>,
    {
        let codec = &self.codec;
        let outcome = self.tree.transaction(|tree| {
            let mut tx = SledTransaction {
                tree,
                codec,
                unabortable: None,
            };
            match body(&mut tx) {
                Ok(value) => Ok(value),
                // sled 自身的冲突/存储错误必须原样交还，冲突时才会重试
                Err(err) => match tx.unabortable.take() {
                    Some(unabortable) => Err(unabortable.into()),
                    None => Err(ConflictableTransactionError::Abort(err)),
                },
            }
        });

        match outcome {
            Ok(value) => Ok(value),
            Err(TransactionError::Abort(err)) => Err(err),
            Err(TransactionError::Storage(err)) => Err(err.into()),
        }
    }
}

struct SledTransaction<'a, C> {
    tree: &'a TransactionalTree,
    codec: &'a C,
    unabortable: Option<UnabortableTransactionError>,
}

impl<C> SledTransaction<'_, C> {
    fn stash(&mut self, err: UnabortableTransactionError) -> StoreError {
        let reported = match &err {
            UnabortableTransactionError::Storage(source) => {
                StoreError::backend(source.to_string())
            }
            UnabortableTransactionError::Conflict => {
                StoreError::backend("sled transaction conflict")
            }
        };
        self.unabortable = Some(err);
        reported
    }
}

impl<E, C> Transaction<E> for SledTransaction<'_, C>
where
    C: Codec<E>,
{
    fn get_multi(&mut self, ids: &[String]) -> StoreResult<Vec<E>> {
        let tree = self.tree;
        let mut entities = Vec::with_capacity(ids.len());
        for id in ids {
            let data = tree
                .get(id.as_bytes())
                .map_err(|err| self.stash(err))?
                .ok_or_else(|| StoreError::not_found(id.as_str()))?;
            entities.push(self.codec.unmarshal(&data)?);
        }
        Ok(entities)
    }

    fn put_multi(&mut self, ids: &[String], entities: &[E]) -> StoreResult<()> {
        let encoded = entities
            .iter()
            .map(|entity| self.codec.marshal(entity))
            .collect::<StoreResult<Vec<_>>>()?;

        let tree = self.tree;
        for (id, data) in ids.iter().zip(encoded) {
            trace!(%id, bytes = data.len(), "sled put");
            tree.insert(id.as_bytes(), data)
                .map_err(|err| self.stash(err))?;
        }
        Ok(())
    }

    fn delete_multi(&mut self, ids: &[String]) -> StoreResult<()> {
        let tree = self.tree;
        for id in ids {
            trace!(%id, "sled delete");
            tree.remove(id.as_bytes()).map_err(|err| self.stash(err))?;
        }
        Ok(())
    }
}

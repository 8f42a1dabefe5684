//! 版本化存储引擎（Store）
//!
//! 以后端的批量原语与事务边界实现 CRUD 及其批量形式，单条操作即“批量为一”：
//! - 创建：生成 id 与版本为 0 的新实体，在一个事务边界内整体写入；
//! - 更新：读全部 → 校验全部版本 → 写全部，任一版本不等即以 `ConcurrencyConflict` 中止且不写入；
//! - 成功更新后，存储副本与调用方手中的实体版本同时加 1，调用方可直接继续下一次更新。
//!
//! 引擎不重试、不吞错，所有失败均中止当前事务边界并原样返回。
//!
use crate::backend::{
    Backend, Encoded, EntityTable, FileTable, FileTableConfig, MemoryTable, MutexGuarded,
};
use crate::codec::{Codec, JsonCodec};
use crate::error::{StoreError, StoreResult};
use crate::id::{IdGenerator, UuidIdGenerator};
use crate::version::Versioned;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, instrument, warn};

/// 绑定单一实体类型的版本化存储
pub struct Store<E, B> {
    backend: B,
    id_generator: Box<dyn IdGenerator>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, B> fmt::Debug for Store<E, B>
where
    B: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl<E, B> Store<E, B>
where
    E: Versioned + Default + Clone,
    B: Backend<E>,
{
    /// 使用给定后端创建存储，默认以 UUID v4 生成 id
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            id_generator: Box::new(UuidIdGenerator),
            _entity: PhantomData,
        }
    }

    pub fn with_id_generator(mut self, id_generator: impl IdGenerator + 'static) -> Self {
        self.id_generator = Box::new(id_generator);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 创建一个新实体（版本为 0）
    pub fn create(&self) -> StoreResult<(String, E)> {
        let id = self.id_generator.next_id();
        let entity = fresh_entity::<E>();
        self.insert(std::slice::from_ref(&id), std::slice::from_ref(&entity))?;
        Ok((id, entity))
    }

    /// 批量创建；`count == 0` 时直接返回空结果，不访问后端
    pub fn create_multi(&self, count: usize) -> StoreResult<(Vec<String>, Vec<E>)> {
        if count == 0 {
            return Ok((Vec::new(), Vec::new()));
        }

        let ids: Vec<String> = (0..count).map(|_| self.id_generator.next_id()).collect();
        let entities: Vec<E> = (0..count).map(|_| fresh_entity()).collect();
        self.insert(&ids, &entities)?;
        Ok((ids, entities))
    }

    // 新实体没有可冲突的对象，无需回读
    #[instrument(level = "debug", skip_all, fields(count = ids.len()))]
    fn insert(&self, ids: &[String], entities: &[E]) -> StoreResult<()> {
        self.backend
            .run_in_transaction(|tx| tx.put_multi(ids, entities))?;
        debug!(count = ids.len(), "entities created");
        Ok(())
    }

    pub fn read(&self, id: &str) -> StoreResult<E> {
        let ids = [id.to_string()];
        self.read_multi(&ids)?
            .pop()
            .ok_or_else(|| StoreError::not_found(id))
    }

    /// 批量读取，结果与 `ids` 顺序一致；任一 id 不存在即整体失败
    #[instrument(level = "debug", skip_all, fields(count = ids.len()))]
    pub fn read_multi(&self, ids: &[String]) -> StoreResult<Vec<E>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.backend.run_in_transaction(|tx| {
            let entities = tx.get_multi(ids)?;
            ensure_complete(ids, &entities)?;
            Ok(entities)
        })
    }

    /// 更新实体；成功后 `entity` 的版本原地加 1
    pub fn update(&self, id: &str, entity: &mut E) -> StoreResult<()> {
        let ids = [id.to_string()];
        self.update_multi(&ids, std::slice::from_mut(entity))
    }

    /// 批量更新：先校验全部版本，再写入全部
    ///
    /// - 长度不等时在访问后端之前返回 `LengthMismatch`；
    /// - 任一 id 不存在返回 `NotFound`，任一版本不等返回 `ConcurrencyConflict`，均不写入任何数据；
    /// - 仅在事务提交后才递增调用方实体的版本，失败时调用方实体保持不变。
    #[instrument(level = "debug", skip_all, fields(count = ids.len()))]
    pub fn update_multi(&self, ids: &[String], entities: &mut [E]) -> StoreResult<()> {
        if ids.len() != entities.len() {
            return Err(StoreError::LengthMismatch {
                ids: ids.len(),
                entities: entities.len(),
            });
        }
        if ids.is_empty() {
            return Ok(());
        }

        let supplied: &[E] = entities;
        self.backend.run_in_transaction(|tx| {
            let stored = tx.get_multi(ids)?;
            ensure_complete(ids, &stored)?;
            ensure_sequential(ids, &stored, supplied)?;

            let next = bumped(ids, supplied)?;
            tx.put_multi(ids, &next)
        })?;

        // 事务内已确认每个版本都可递增
        entities.iter_mut().for_each(Versioned::increment_version);
        debug!(count = ids.len(), "entities updated");
        Ok(())
    }

    pub fn delete(&self, id: &str) -> StoreResult<()> {
        let ids = [id.to_string()];
        self.delete_multi(&ids)
    }

    #[instrument(level = "debug", skip_all, fields(count = ids.len()))]
    pub fn delete_multi(&self, ids: &[String]) -> StoreResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        self.backend.run_in_transaction(|tx| tx.delete_multi(ids))
    }
}

fn fresh_entity<E>() -> E
where
    E: Versioned + Default,
{
    let mut entity = E::default();
    entity.reset_version();
    entity
}

// 后端必须为每个 id 返回一个实体
fn ensure_complete<E>(ids: &[String], entities: &[E]) -> StoreResult<()> {
    if entities.len() == ids.len() {
        return Ok(());
    }
    Err(StoreError::backend(format!(
        "backend returned {} entities for {} ids",
        entities.len(),
        ids.len()
    )))
}

fn ensure_sequential<E>(ids: &[String], stored: &[E], supplied: &[E]) -> StoreResult<()>
where
    E: Versioned,
{
    for ((id, old), new) in ids.iter().zip(stored).zip(supplied) {
        if old.version() != new.version() {
            warn!(
                %id,
                expected = %new.version(),
                actual = %old.version(),
                "nonsequential update rejected"
            );
            return Err(StoreError::ConcurrencyConflict {
                id: id.clone(),
                expected: new.version(),
                actual: old.version(),
            });
        }
    }
    Ok(())
}

// 版本加 1 后的副本；任一版本已达上限则整体失败
fn bumped<E>(ids: &[String], supplied: &[E]) -> StoreResult<Vec<E>>
where
    E: Versioned + Clone,
{
    ids.iter()
        .zip(supplied)
        .map(|(id, entity)| {
            let version = entity.version();
            let next = version
                .checked_next()
                .ok_or_else(|| StoreError::VersionOverflow {
                    id: id.clone(),
                    version,
                })?;
            let mut entity = entity.clone();
            *entity.version_mut() = next;
            Ok(entity)
        })
        .collect()
}

// ---- 预置组合 ----

/// 以字节形式保存在进程内存中的存储
pub type MemoryStore<E, C = JsonCodec> = Store<E, MutexGuarded<Encoded<MemoryTable, C>>>;

/// 直接保存结构化实体的进程内存储
pub type LocalMemoryStore<E> = Store<E, MutexGuarded<EntityTable<E>>>;

/// 每个 id 一个文件的存储
pub type FileStore<E, C = JsonCodec> = Store<E, MutexGuarded<Encoded<FileTable, C>>>;

/// 基于 sled 原生事务的存储
#[cfg(feature = "sled")]
pub type SledStore<E, C = JsonCodec> = Store<E, crate::backend::SledBackend<C>>;

impl<E, C> Store<E, MutexGuarded<Encoded<MemoryTable, C>>>
where
    E: Versioned + Default + Clone,
    C: Codec<E>,
{
    pub fn memory(codec: C) -> Self {
        Self::new(MutexGuarded::new(Encoded::new(MemoryTable::new(), codec)))
    }
}

impl<E> Store<E, MutexGuarded<Encoded<MemoryTable, JsonCodec>>>
where
    E: Versioned + Default + Clone + Serialize + DeserializeOwned,
{
    pub fn json_memory() -> Self {
        Self::memory(JsonCodec)
    }
}

impl<E> Store<E, MutexGuarded<EntityTable<E>>>
where
    E: Versioned + Default + Clone + Send,
{
    pub fn local_memory() -> Self {
        Self::new(MutexGuarded::new(EntityTable::new()))
    }
}

impl<E, C> Store<E, MutexGuarded<Encoded<FileTable, C>>>
where
    E: Versioned + Default + Clone,
    C: Codec<E>,
{
    /// 打开（必要时创建）目录并以其为存储
    pub fn file(config: FileTableConfig, codec: C) -> StoreResult<Self> {
        let table = FileTable::open(config)?;
        Ok(Self::new(MutexGuarded::new(Encoded::new(table, codec))))
    }
}

#[cfg(feature = "sled")]
impl<E, C> Store<E, crate::backend::SledBackend<C>>
where
    E: Versioned + Default + Clone,
    C: Codec<E>,
{
    pub fn sled(tree: sled::Tree, codec: C) -> Self {
        Self::new(crate::backend::SledBackend::new(tree, codec))
    }
}

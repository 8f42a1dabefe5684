//! 后端适配契约（backend）
//!
//! 引擎只依赖两项能力：
//! - `Backend::run_in_transaction`：事务边界，保证边界内的读写对引擎而言原子且相互隔离；
//! - `Transaction`：事务句柄上的批量 `get_multi/put_multi/delete_multi` 原语。
//!
//! 数据原语只能通过事务句柄访问，因此“仅在事务边界内修改数据”由类型系统保证。
//! 事务如何实现（原生多键事务或全局互斥锁）由后端决定，对引擎不可见：
//! - 无原生事务的后端（内存表、文件表）由 `MutexGuarded` 提供边界；
//! - 具备原生事务的后端（`SledBackend`）直接使用自身事务。
//!
mod encoded;
mod file;
mod guard;
mod memory;
#[cfg(feature = "sled")]
mod sled_tree;

pub use encoded::{ByteTable, Encoded};
pub use file::{FileTable, FileTableConfig};
pub use guard::MutexGuarded;
pub use memory::{EntityTable, MemoryTable};
#[cfg(feature = "sled")]
pub use sled_tree::SledBackend;

use crate::error::StoreResult;

/// 事务句柄上的批量原语
pub trait Transaction<E> {
    /// 按顺序读取；任一 id 不存在即返回 `NotFound`，不返回部分结果
    fn get_multi(&mut self, ids: &[String]) -> StoreResult<Vec<E>>;

    /// 整体覆盖写入
    fn put_multi(&mut self, ids: &[String], entities: &[E]) -> StoreResult<()>;

    fn delete_multi(&mut self, ids: &[String]) -> StoreResult<()>;
}

/// 存储后端
///
/// `body` 为 `Fn`：原生事务后端在存储层冲突时可能重新执行它，
/// 因此 `body` 不得修改事务之外的状态。
pub trait Backend<E>: Send + Sync {
    fn run_in_transaction<R, F>(&self, body: F) -> StoreResult<R>
    where
        F: Fn(&mut dyn Transaction<E>) -> StoreResult<R>;
}

impl<E, B> Backend<E> for std::sync::Arc<B>
where
    B: Backend<E>,
{
    fn run_in_transaction<R, F>(&self, body: F) -> StoreResult<R>
    where
        F: Fn(&mut dyn Transaction<E>) -> StoreResult<R>,
    {
        (**self).run_in_transaction(body)
    }
}

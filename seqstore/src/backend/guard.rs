//! 并发守卫（MutexGuarded）
//!
//! 为不具备跨键事务的后端提供事务边界：持有单一互斥锁 → 执行 `body` → 无条件释放。
//! 所有操作因此全局串行化：没有按键加锁，也就没有死锁，但不相关的 id 之间同样无法并行。
//!
//! 被守护的表由守卫独占持有，`body` 只能拿到表本身而拿不到守卫，
//! 不存在共享的“当前事务上下文”，也就不会出现嵌套事务复用外层上下文的问题。
//!
use super::{Backend, Transaction};
use crate::error::StoreResult;
use parking_lot::Mutex;
use tracing::trace;

/// 以一把互斥锁守护的表
#[derive(Debug, Default)]
pub struct MutexGuarded<T> {
    table: Mutex<T>,
}

impl<T> MutexGuarded<T> {
    pub fn new(table: T) -> Self {
        Self {
            table: Mutex::new(table),
        }
    }

    pub fn into_inner(self) -> T {
        self.table.into_inner()
    }
}

impl<E, T> Backend<E> for MutexGuarded<T>
where
    T: Transaction<E> + Send,
{
    fn run_in_transaction<R, F>(&self, body: F) -> StoreResult<R>
    where
        F: Fn(&mut dyn Transaction<E>) -> StoreResult<R>,
    {
        // 锁守卫在任何退出路径（含错误与 panic 展开）上都会释放
        let mut table = self.table.lock();
        trace!("transaction lock acquired");
        let result = body(&mut *table);
        trace!(ok = result.is_ok(), "transaction lock released");
        result
    }
}

//! 标识生成（IdGenerator）
//!
//! 实体标识在创建时由生成器产生，此后不可变。生成器只需保证同一存储实例内唯一。
//!
use std::sync::atomic::{AtomicU64, Ordering};

/// 标识生成器
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// 允许直接使用闭包作为生成器
impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_id(&self) -> String {
        self()
    }
}

/// UUID v4（默认）
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// ULID：按时间可排序
#[derive(Debug, Clone, Copy, Default)]
pub struct UlidIdGenerator;

impl IdGenerator for UlidIdGenerator {
    fn next_id(&self) -> String {
        ulid::Ulid::new().to_string()
    }
}

/// 自增序列："1"、"2"、"3"……
///
/// 计数只存在于内存中，仅保证同一存储实例内唯一。对已有数据的目录重新打开文件存储时，
/// `new()` 会再次从 "1" 开始并覆盖已有实体，此时应使用 `starting_after` 接续已用的最大编号。
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    last: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从给定值之后继续编号
    pub fn starting_after(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        (self.last.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}

//! 顺序更新存储（seqstore）
//!
//! 以乐观并发控制（OCC）读写实体：每个实体携带单调递增的版本号，
//! 只有当调用方提供的版本与存储中的版本相等时更新才会被接受。
//!
//! 引擎与后端解耦，同一套 CRUD/OCC 语义适用于：
//! - 进程内存（结构化实体或字节）；
//! - 本地文件系统（每个 id 一个文件）；
//! - 具备原生事务的存储（sled）。
//!
//! 典型用法：
//! 1. 使用 `#[versioned]`（`seqstore-macros`）为实体组合 `version` 字段并实现 `Versioned`；
//! 2. 选择后端构造 `Store`，例如 `Store::json_memory()` 或 `Store::file(config, JsonCodec)`；
//! 3. `create` 得到 id 与版本为 0 的实体，修改后 `update`，冲突时按 `ConcurrencyConflict` 重读重试。
//!
//! ```
//! use seqstore::{MemoryStore, Store, Version, Versioned};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! struct Counter {
//!     version: Version,
//!     value: i64,
//! }
//!
//! impl Versioned for Counter {
//!     fn version(&self) -> Version {
//!         self.version
//!     }
//!
//!     fn version_mut(&mut self) -> &mut Version {
//!         &mut self.version
//!     }
//! }
//!
//! let store: MemoryStore<Counter> = Store::json_memory();
//! let (id, mut counter) = store.create().unwrap();
//! counter.value += 1;
//! store.update(&id, &mut counter).unwrap();
//! assert_eq!(counter.version().value(), 1);
//! ```
//!
pub mod backend;
pub mod codec;
pub mod error;
pub mod id;
pub mod store;
pub mod version;

pub use codec::{BincodeCodec, Codec, JsonCodec};
pub use error::{StoreError, StoreResult};
pub use id::{IdGenerator, SequentialIdGenerator, UlidIdGenerator, UuidIdGenerator};
#[cfg(feature = "sled")]
pub use store::SledStore;
pub use store::{FileStore, LocalMemoryStore, MemoryStore, Store};
pub use version::{Version, Versioned};

// 允许在本 crate 内部通过 ::seqstore 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::seqstore 路径。
extern crate self as seqstore;

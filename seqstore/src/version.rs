//! 版本号与版本访问契约
//!
//! 每个存储实体都携带一个单调递增的版本号，作为乐观并发控制（OCC）的比较令牌。
//! 版本号只由引擎修改：创建时为 0，每次成功更新时恰好加 1。
//!
use serde::{Deserialize, Serialize};
use std::fmt;

/// 版本号（用于乐观锁和并发控制）
///
/// # 示例
///
/// ```
/// use seqstore::Version;
///
/// let v1 = Version::new();
/// assert_eq!(v1.value(), 0);
/// assert!(v1.is_new());
///
/// let v2 = v1.next();
/// assert_eq!(v2.value(), 1);
/// assert!(v2 > v1);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// 创建初始版本（版本号为 0）
    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn from_value(value: u64) -> Self {
        Self(value)
    }

    /// 获取下一个版本号
    ///
    /// ```
    /// use seqstore::Version;
    ///
    /// let v = Version::from_value(10);
    /// assert_eq!(v.next().value(), 11);
    /// ```
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// 下一个版本号；已达 `u64::MAX` 时返回 `None`
    pub const fn checked_next(&self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    pub const fn is_new(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u64> for Version {
    fn from(value: u64) -> Self {
        Self::from_value(value)
    }
}

impl From<Version> for u64 {
    fn from(version: Version) -> Self {
        version.value()
    }
}

/// 带版本的实体
///
/// 实体以具名的 `version` 字段组合版本号，引擎通过本契约读取与递增版本。
/// 通常由 `#[versioned]` 宏生成实现。
pub trait Versioned {
    /// 当前版本
    fn version(&self) -> Version;

    fn version_mut(&mut self) -> &mut Version;

    /// 版本号加 1
    fn increment_version(&mut self) {
        let version = self.version_mut();
        *version = version.next();
    }

    /// 版本号归零（仅用于新建实体）
    fn reset_version(&mut self) {
        *self.version_mut() = Version::new();
    }
}

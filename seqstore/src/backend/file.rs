//! 文件表（每个 id 一个文件）
//!
//! 布局：`<dir>/<id>.<extension>`。写入先落到同目录下的临时文件，再原子重命名到目标路径，
//! 读者不会看到写了一半的文件。
//!
//! 不能作为普通文件名的 id（空串、`.`、`..`、包含路径分隔符）读取/删除时视为不存在，写入时拒绝。
//!
use super::ByteTable;
use crate::error::{StoreError, StoreResult};
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

const DEFAULT_EXTENSION: &str = "json";

/// 文件表配置
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct FileTableConfig {
    #[builder(into)]
    dir: PathBuf,
    /// 文件扩展名（不含前导 `.`）
    #[builder(into, default = String::from(DEFAULT_EXTENSION))]
    #[serde(default = "default_extension")]
    extension: String,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl FileTableConfig {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

#[derive(Debug, Clone)]
pub struct FileTable {
    dir: PathBuf,
    extension: String,
}

impl FileTable {
    /// 打开（必要时创建）存储目录
    pub fn open(config: FileTableConfig) -> StoreResult<Self> {
        fs::create_dir_all(&config.dir)?;
        debug!(dir = %config.dir.display(), extension = %config.extension, "file table opened");
        Ok(Self {
            dir: config.dir,
            extension: config.extension.trim_start_matches('.').to_string(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// id 对应的文件路径；非法文件名返回 `None`
    pub fn path_of(&self, id: &str) -> Option<PathBuf> {
        if !is_plain_file_name(id) {
            return None;
        }
        let file_name = if self.extension.is_empty() {
            id.to_string()
        } else {
            format!("{id}.{}", self.extension)
        };
        Some(self.dir.join(file_name))
    }
}

fn is_plain_file_name(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(|c: char| c == '/' || c == '\\' || c == '\0')
}

impl ByteTable for FileTable {
    fn get(&self, id: &str) -> StoreResult<Option<Vec<u8>>> {
        let Some(path) = self.path_of(id) else {
            return Ok(None);
        };
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&mut self, id: &str, data: Vec<u8>) -> StoreResult<()> {
        let path = self.path_of(id).ok_or_else(|| {
            StoreError::backend(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("id {id:?} is not a valid file name"),
            ))
        })?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_data()?;
        tmp.persist(&path).map_err(|err| err.error)?;
        trace!(path = %path.display(), "file written");
        Ok(())
    }

    fn delete(&mut self, id: &str) -> StoreResult<()> {
        let Some(path) = self.path_of(id) else {
            return Ok(());
        };
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

//! 本地 key-value 持久化
//!
//! localStorage 的等价物：字符串键到字符串值。会话（`user`、`cookie`）与
//! `playlist` 快照都存在这里。损坏的值不在本层处理，消费方自行兜底。

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

pub trait KvStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// 单文件 JSON object 实现，写入走 tmp + rename
pub struct FileStorage {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStorage {
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(data_dir).map_err(StorageError::Io)?;
        let path = data_dir.join("storage.json");
        let entries = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
                Ok(Value::Object(map)) => map
                    .into_iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_owned())))
                    .collect(),
                _ => {
                    tracing::warn!(path = %path.display(), "存储文件损坏，按空库处理");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Ok(Self { path, entries })
    }

    /// 默认数据目录（系统 data_local_dir）
    pub fn default_data_dir() -> PathBuf {
        directories::ProjectDirs::from("dev", "ncm", "ncm-core")
            .map(|p| p.data_local_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("ncm-core"))
    }

    fn flush(&self) -> Result<(), StorageError> {
        let map: serde_json::Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        let bytes = serde_json::to_vec_pretty(&Value::Object(map)).map_err(StorageError::Serde)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(StorageError::Io)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(StorageError::Io(e));
        }
        Ok(())
    }
}

impl KvStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// 测试用内存实现
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let mut s = MemoryStorage::new();
        assert_eq!(s.get("user"), None);
        s.set("user", "{\"id\":1}").unwrap();
        assert_eq!(s.get("user").as_deref(), Some("{\"id\":1}"));
        s.remove("user").unwrap();
        assert_eq!(s.get("user"), None);
    }

    #[test]
    fn test_file_storage_persists_across_open() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let mut s = FileStorage::open(dir.path()).unwrap();
            s.set("cookie", "MUSIC_U=abc").unwrap();
        }
        let s = FileStorage::open(dir.path()).unwrap();
        assert_eq!(s.get("cookie").as_deref(), Some("MUSIC_U=abc"));
    }

    #[test]
    fn test_file_storage_corrupted_file_treated_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("storage.json"), b"{not json").unwrap();
        let s = FileStorage::open(dir.path()).unwrap();
        assert_eq!(s.get("user"), None);
    }

    #[test]
    fn test_file_storage_remove_missing_key_is_noop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut s = FileStorage::open(dir.path()).unwrap();
        s.remove("missing").unwrap();
        assert_eq!(s.get("missing"), None);
    }
}

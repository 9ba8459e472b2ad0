//! Filesystem object store: `<root>/<bucket>/<key>`.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use jobledger_core::error::{LedgerError, Result};
use jobledger_core::event::Destination;

use super::ObjectStore;

#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Bucket and key must be plain relative paths; `..` and absolute
    /// paths are rejected so objects stay under `root`.
    fn object_path(&self, dest: &Destination) -> Result<PathBuf> {
        for part in [&dest.bucket, &dest.key] {
            let clean = !part.is_empty()
                && Path::new(part)
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)));
            if !clean {
                return Err(LedgerError::BadRequest(format!(
                    "object path component not allowed: {part:?}"
                )));
            }
        }
        Ok(self.root.join(&dest.bucket).join(&dest.key))
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    fn name(&self) -> &'static str {
        "fs"
    }

    async fn get(&self, dest: &Destination) -> Result<Option<Bytes>> {
        let path = self.object_path(dest)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LedgerError::Storage(format!("read {}: {e}", path.display()))),
        }
    }

    async fn put(&self, dest: &Destination, body: Bytes) -> Result<()> {
        let path = self.object_path(dest)?;
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| LedgerError::Storage(format!("mkdir {}: {e}", dir.display())))?;
        }
        tokio::fs::write(&path, &body)
            .await
            .map_err(|e| LedgerError::Storage(format!("write {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest(key: &str) -> Destination {
        Destination::new("ml-metrics", key)
    }

    #[tokio::test]
    async fn missing_object_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        assert!(store.get(&dest("model_metrics.csv")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_creates_nested_dirs_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        let d = dest("reports/2024/model_metrics.csv");

        store.put(&d, Bytes::from_static(b"first")).await.unwrap();
        store.put(&d, Bytes::from_static(b"second")).await.unwrap();

        let got = store.get(&d).await.unwrap().unwrap();
        assert_eq!(&got[..], b"second");
        assert!(dir.path().join("ml-metrics/reports/2024/model_metrics.csv").exists());
    }

    #[tokio::test]
    async fn escaping_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        for key in ["../outside.csv", "/etc/passwd", ""] {
            let err = store.get(&dest(key)).await.unwrap_err();
            assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "key={key}");
        }
    }
}

//! Ledger object stores.
//!
//! Objects are addressed by `Destination` (bucket + key). A missing object
//! is `Ok(None)`, never an error; callers start a fresh ledger on it.

pub mod fs;
pub mod memory;

#[cfg(feature = "aws")]
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use jobledger_core::error::{LedgerError, Result};
use jobledger_core::event::Destination;

use crate::config::{StorageBackend, StorageSection};

pub use fs::FsStore;
pub use memory::MemoryStore;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whole object, or `None` if it does not exist.
    async fn get(&self, dest: &Destination) -> Result<Option<Bytes>>;

    /// Overwrite the object unconditionally.
    async fn put(&self, dest: &Destination, body: Bytes) -> Result<()>;
}

/// Build the configured object store.
pub async fn from_config(section: &StorageSection) -> Result<Arc<dyn ObjectStore>> {
    match section.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::Fs => {
            let root = section
                .root
                .as_deref()
                .ok_or_else(|| LedgerError::Config("storage.root is required".into()))?;
            Ok(Arc::new(FsStore::new(root)))
        }
        #[cfg(feature = "aws")]
        StorageBackend::S3 => {
            let sdk = crate::aws::load_sdk_config(section.region.as_deref()).await;
            Ok(Arc::new(s3::S3Store::new(&sdk)))
        }
        #[cfg(not(feature = "aws"))]
        StorageBackend::S3 => Err(LedgerError::Config(
            "storage.backend=s3 needs the `aws` feature".into(),
        )),
    }
}

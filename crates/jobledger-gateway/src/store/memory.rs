use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use jobledger_core::error::Result;
use jobledger_core::event::Destination;

use super::ObjectStore;

/// In-process object store. Counts writes so callers can assert that an
/// invocation left storage untouched.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: DashMap<(String, String), Bytes>,
    puts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without counting it as a write.
    pub fn insert(&self, dest: &Destination, body: impl Into<Bytes>) {
        self.objects.insert(key_of(dest), body.into());
    }

    pub fn object(&self, dest: &Destination) -> Option<Bytes> {
        self.objects.get(&key_of(dest)).map(|e| e.value().clone())
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::Relaxed)
    }
}

fn key_of(dest: &Destination) -> (String, String) {
    (dest.bucket.clone(), dest.key.clone())
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, dest: &Destination) -> Result<Option<Bytes>> {
        Ok(self.object(dest))
    }

    async fn put(&self, dest: &Destination, body: Bytes) -> Result<()> {
        self.objects.insert(key_of(dest), body);
        self.puts.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

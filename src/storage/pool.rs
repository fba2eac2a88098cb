//! Bounded connection pool for async storage access
//!
//! The bounded-async strategy and the job executor share one pool sized
//! independently of batch size. Connections are opened lazily up to the
//! configured capacity; acquiring waits on a counting semaphore and the
//! guard returns its connection when dropped.

use crate::storage::sqlite::CategoryStore;
use crate::storage::{StorageError, StorageResult};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Shared handle to the bounded store pool
#[derive(Clone)]
pub struct StorePool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    path: PathBuf,
    idle: Mutex<Vec<CategoryStore>>,
    slots: Arc<Semaphore>,
}

impl StorePool {
    /// Creates a pool of at most `size` connections to the store at `path`
    pub fn new(path: &Path, size: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                path: path.to_path_buf(),
                idle: Mutex::new(Vec::with_capacity(size)),
                slots: Arc::new(Semaphore::new(size)),
            }),
        }
    }

    /// Waits for a free slot and hands out a connection
    pub async fn acquire(&self) -> StorageResult<PooledStore> {
        let permit = Arc::clone(&self.inner.slots)
            .acquire_owned()
            .await
            .map_err(|_| StorageError::PoolClosed)?;

        let idle = self.inner.idle.lock().unwrap().pop();
        let store = match idle {
            Some(store) => store,
            None => CategoryStore::open(&self.inner.path)?,
        };

        Ok(PooledStore {
            store: Some(store),
            pool: Arc::clone(&self.inner),
            _permit: permit,
        })
    }
}

/// A pooled connection; returns to the pool on drop
pub struct PooledStore {
    store: Option<CategoryStore>,
    pool: Arc<PoolInner>,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledStore {
    type Target = CategoryStore;

    fn deref(&self) -> &CategoryStore {
        self.store.as_ref().expect("connection held until drop")
    }
}

impl Drop for PooledStore {
    fn drop(&mut self) {
        if let Some(store) = self.store.take() {
            self.pool.idle.lock().unwrap().push(store);
        }
    }
}

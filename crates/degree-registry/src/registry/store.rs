//! Persistent storage backends for the registry.

use super::Registry;
use crate::error::RegistryError;
use crate::fingerprint::FingerprintScheme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// On-disk layout written by [`FileStore::save`].
#[derive(Serialize)]
struct DocumentRef<'a> {
    fingerprint_scheme: FingerprintScheme,
    #[serde(flatten)]
    registry: &'a Registry,
}

/// On-disk layout read by [`FileStore::load`].
#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    fingerprint_scheme: FingerprintScheme,
    #[serde(flatten)]
    registry: Registry,
}

/// JSON file store for the registry.
///
/// Writes are serialized by an internal lock that remembers the last
/// revision written, so a stale snapshot never replaces a newer one.
pub struct FileStore {
    storage_path: PathBuf,
    written: Mutex<u64>,
}

impl FileStore {
    /// Create a new file store.
    pub fn new(storage_path: PathBuf) -> Self {
        Self {
            storage_path,
            written: Mutex::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Save a registry snapshot to disk.
    ///
    /// The file is replaced atomically via a temp file and rename. A snapshot
    /// whose revision is not newer than the last one written is skipped.
    #[instrument(skip(self, registry), fields(path = ?self.storage_path, revision = registry.revision()))]
    pub async fn save(
        &self,
        scheme: FingerprintScheme,
        registry: &Registry,
    ) -> Result<(), RegistryError> {
        let mut written = self.written.lock().await;
        if registry.revision() <= *written {
            debug!(written = *written, "Newer snapshot already on disk, skipping");
            return Ok(());
        }

        let data = serde_json::to_vec_pretty(&DocumentRef {
            fingerprint_scheme: scheme,
            registry,
        })?;

        if let Some(parent) = self.storage_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = self.storage_path.with_extension("tmp");
        fs::write(&temp_path, &data).await?;
        if let Err(e) = fs::rename(&temp_path, &self.storage_path).await {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                warn!(path = ?temp_path, "Failed to remove temp file: {}", cleanup);
            }
            return Err(e.into());
        }

        *written = registry.revision();
        debug!(
            "Saved registry ({} records, {} bytes)",
            registry.count(),
            data.len()
        );
        Ok(())
    }

    /// Load the registry from disk.
    ///
    /// Returns an empty registry if the file doesn't exist. A non-empty file
    /// written under a different scheme than `scheme` is refused.
    #[instrument(skip(self), fields(path = ?self.storage_path))]
    pub async fn load(&self, scheme: FingerprintScheme) -> Result<Registry, RegistryError> {
        if !fs::try_exists(&self.storage_path).await? {
            info!("Registry file not found, starting with empty registry");
            return Ok(Registry::new());
        }

        let data = fs::read(&self.storage_path).await?;
        let document: Document = serde_json::from_slice(&data)?;

        if document.fingerprint_scheme != scheme && !document.registry.is_empty() {
            return Err(RegistryError::Storage(format!(
                "{} holds {} records fingerprinted with the {} scheme, but {} is configured",
                self.storage_path.display(),
                document.registry.count(),
                document.fingerprint_scheme,
                scheme
            )));
        }

        info!("Loaded registry with {} records", document.registry.count());
        Ok(document.registry)
    }

    /// Check if a registry file exists.
    pub fn exists(&self) -> bool {
        self.storage_path.exists()
    }

    /// Hold the write lock, stalling every save until the guard drops.
    #[cfg(test)]
    pub(crate) async fn hold_writes(&self) -> tokio::sync::MutexGuard<'_, u64> {
        self.written.lock().await
    }
}

/// In-memory store for testing or when persistence is disabled.
pub struct MemoryStore;

impl MemoryStore {
    /// "Save" does nothing for memory store.
    pub async fn save(
        &self,
        _scheme: FingerprintScheme,
        _registry: &Registry,
    ) -> Result<(), RegistryError> {
        debug!("Memory store: save is a no-op");
        Ok(())
    }

    /// "Load" returns an empty registry.
    pub async fn load(&self, _scheme: FingerprintScheme) -> Result<Registry, RegistryError> {
        debug!("Memory store: returning empty registry");
        Ok(Registry::new())
    }
}

/// Storage backend the registry writes through to.
pub enum Store {
    /// JSON file storage
    File(FileStore),
    /// In-memory only (no persistence)
    Memory(MemoryStore),
}

impl Store {
    /// File-backed store at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Store::File(FileStore::new(path.into()))
    }

    /// Memory-only store.
    pub fn memory() -> Self {
        Store::Memory(MemoryStore)
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Store::File(_))
    }

    /// Save a registry snapshot.
    pub async fn save(
        &self,
        scheme: FingerprintScheme,
        registry: &Registry,
    ) -> Result<(), RegistryError> {
        match self {
            Store::File(s) => s.save(scheme, registry).await,
            Store::Memory(s) => s.save(scheme, registry).await,
        }
    }

    /// Load the registry.
    pub async fn load(&self, scheme: FingerprintScheme) -> Result<Registry, RegistryError> {
        match self {
            Store::File(s) => s.load(scheme).await,
            Store::Memory(s) => s.load(scheme).await,
        }
    }
}

//! Shared, concurrency-safe registry handle.

use super::{DegreeFields, DegreeRecord, IssueOutcome, IssueStatus, Registry, Store};
use crate::error::RegistryError;
use crate::fingerprint::FingerprintScheme;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Issue/verify/list service over a single registry.
///
/// Cloning yields another handle to the same registry. All mutation goes
/// through one write lock, so the check-and-insert in [`issue`] is atomic.
/// The lock covers only the map itself; persistence happens after it is
/// released.
///
/// [`issue`]: RegistryService::issue
#[derive(Clone)]
pub struct RegistryService {
    registry: Arc<RwLock<Registry>>,
    store: Arc<Store>,
    scheme: FingerprintScheme,
}

impl RegistryService {
    /// Empty, memory-only registry.
    pub fn new(scheme: FingerprintScheme) -> Self {
        Self::with_store(Registry::new(), Store::memory(), scheme)
    }

    /// Registry seeded from `registry`, writing new records through to `store`.
    pub fn with_store(registry: Registry, store: Store, scheme: FingerprintScheme) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            store: Arc::new(store),
            scheme,
        }
    }

    /// Load the registry from `store` and wrap it.
    ///
    /// Fails if any loaded record's fingerprint does not match its fields
    /// under `scheme`. The store is left untouched in that case.
    pub async fn open(store: Store, scheme: FingerprintScheme) -> Result<Self, RegistryError> {
        let registry = store.load(scheme).await?;

        let inconsistent = registry.inconsistent(scheme);
        if !inconsistent.is_empty() {
            for fingerprint in &inconsistent {
                warn!(%fingerprint, %scheme, "Stored record does not match its fingerprint");
            }
            return Err(RegistryError::Storage(format!(
                "{} stored records do not match their fingerprints under the {} scheme",
                inconsistent.len(),
                scheme
            )));
        }

        Ok(Self::with_store(registry, store, scheme))
    }

    pub fn scheme(&self) -> FingerprintScheme {
        self.scheme
    }

    /// Fingerprint `fields` with this registry's scheme.
    pub fn fingerprint(&self, fields: &DegreeFields) -> String {
        fields.fingerprint(self.scheme)
    }

    /// Issue a degree record.
    ///
    /// Re-issuing identical fields is a no-op reporting `AlreadyExists`.
    /// With a persistent store a snapshot taken under the lock is written
    /// once the lock is released; a failed write rolls the insert back.
    #[instrument(skip(self, degree), fields(student_id = %degree.student_id))]
    pub async fn issue(&self, degree: DegreeFields) -> Result<IssueOutcome, RegistryError> {
        let fingerprint = self.fingerprint(&degree);
        let record = DegreeRecord::issue(degree, fingerprint.clone());

        let (status, stored, snapshot) = {
            let mut registry = self.registry.write().await;
            let (status, stored) = registry.insert_if_absent(record);
            let stored = stored.clone();
            let snapshot = (status == IssueStatus::Created && self.store.is_persistent())
                .then(|| registry.clone());
            (status, stored, snapshot)
        };

        if status == IssueStatus::AlreadyExists {
            debug!(%fingerprint, "Degree already issued");
        } else {
            if let Some(snapshot) = snapshot {
                if let Err(e) = self.store.save(self.scheme, &snapshot).await {
                    error!(%fingerprint, "Failed to persist registry: {}", e);
                    self.roll_back(&fingerprint).await;
                    return Err(e);
                }
            }
            info!(%fingerprint, "Degree issued");
        }

        Ok(IssueOutcome {
            fingerprint,
            status,
            record: stored,
        })
    }

    /// Remove a record whose write failed.
    ///
    /// A concurrent issuance may already have written a snapshot holding
    /// it, so the reduced map is saved as well.
    async fn roll_back(&self, fingerprint: &str) {
        let snapshot = {
            let mut registry = self.registry.write().await;
            registry.remove(fingerprint);
            registry.clone()
        };

        if let Err(e) = self.store.save(self.scheme, &snapshot).await {
            warn!(%fingerprint, "Rolled back record stays on disk until the next write: {}", e);
        }
    }

    /// Look up a record by fingerprint.
    ///
    /// Exact match only; surrounding whitespace is ignored.
    pub async fn verify(&self, fingerprint: &str) -> Option<DegreeRecord> {
        let registry = self.registry.read().await;
        registry.get(fingerprint.trim()).cloned()
    }

    /// Snapshot of all records in issuance order.
    pub async fn list(&self) -> Vec<DegreeRecord> {
        let registry = self.registry.read().await;
        registry.list().into_iter().cloned().collect()
    }

    /// Number of stored records.
    pub async fn count(&self) -> usize {
        self.registry.read().await.count()
    }
}

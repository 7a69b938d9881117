//! In-memory registry implementation.

use super::{DegreeRecord, IssueStatus};
use crate::fingerprint::FingerprintScheme;
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// In-memory degree registry.
///
/// Records are kept in issuance order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    /// Degree records indexed by fingerprint
    records: IndexMap<String, DegreeRecord>,

    /// Bumped on every insert and removal
    #[serde(skip)]
    revision: u64,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            records: IndexMap::new(),
            revision: 0,
        }
    }

    /// Get a record by fingerprint.
    pub fn get(&self, fingerprint: &str) -> Option<&DegreeRecord> {
        self.records.get(fingerprint)
    }

    /// Check if a fingerprint is present.
    pub fn contains(&self, fingerprint: &str) -> bool {
        self.records.contains_key(fingerprint)
    }

    /// Insert a record unless its fingerprint is already taken.
    ///
    /// An existing record is never overwritten. Returns the stored record,
    /// which is the new one only when the status is `Created`.
    pub fn insert_if_absent(&mut self, record: DegreeRecord) -> (IssueStatus, &DegreeRecord) {
        match self.records.entry(record.fingerprint.clone()) {
            Entry::Occupied(entry) => (IssueStatus::AlreadyExists, &*entry.into_mut()),
            Entry::Vacant(entry) => {
                self.revision += 1;
                (IssueStatus::Created, &*entry.insert(record))
            }
        }
    }

    /// Remove a record, keeping the order of the rest.
    pub(crate) fn remove(&mut self, fingerprint: &str) -> Option<DegreeRecord> {
        let removed = self.records.shift_remove(fingerprint);
        if removed.is_some() {
            self.revision += 1;
        }
        removed
    }

    /// Fingerprints of records whose key or stored fingerprint does not
    /// match their fields under `scheme`.
    pub fn inconsistent(&self, scheme: FingerprintScheme) -> Vec<&str> {
        self.records
            .iter()
            .filter(|(key, record)| *key != &record.fingerprint || !record.is_consistent(scheme))
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Mutation counter; a higher revision is a later state of the same map.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// List all records in issuance order.
    pub fn list(&self) -> Vec<&DegreeRecord> {
        self.records.values().collect()
    }

    /// Get the number of stored records.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DegreeFields;

    fn record(name: &str, id: &str) -> DegreeRecord {
        let fields = DegreeFields::new(name, id, "BSc Computer Science", "2023");
        let fingerprint = fields.fingerprint(FingerprintScheme::Legacy);
        DegreeRecord::issue(fields, fingerprint)
    }

    #[test]
    fn test_registry_insert_and_get() {
        let mut registry = Registry::new();
        let alice = record("Alice Smith", "S123");

        let (status, stored) = registry.insert_if_absent(alice.clone());
        assert_eq!(status, IssueStatus::Created);
        assert_eq!(stored, &alice);

        let retrieved = registry.get(&alice.fingerprint).unwrap();
        assert_eq!(retrieved.student_name, "Alice Smith");
        assert!(registry.contains(&alice.fingerprint));
    }

    #[test]
    fn test_registry_does_not_overwrite() {
        let mut registry = Registry::new();
        let first = record("Alice Smith", "S123");
        registry.insert_if_absent(first.clone());

        let mut second = record("Alice Smith", "S123");
        second.issued_at = first.issued_at + chrono::Duration::seconds(60);

        let (status, stored) = registry.insert_if_absent(second);
        assert_eq!(status, IssueStatus::AlreadyExists);
        assert_eq!(stored.issued_at, first.issued_at);
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_registry_get_missing() {
        let registry = Registry::new();
        assert!(registry.get(&format!("0x{}", "0".repeat(64))).is_none());
        assert!(registry.get("garbage").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_list_in_insertion_order() {
        let mut registry = Registry::new();
        let names = ["Carol", "Alice", "Bob"];
        for (i, name) in names.iter().enumerate() {
            registry.insert_if_absent(record(name, &format!("S{}", i)));
        }

        let listed: Vec<&str> = registry
            .list()
            .into_iter()
            .map(|r| r.student_name.as_str())
            .collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn test_registry_remove_keeps_order() {
        let mut registry = Registry::new();
        let a = record("A", "1");
        let b = record("B", "2");
        let c = record("C", "3");
        registry.insert_if_absent(a.clone());
        registry.insert_if_absent(b.clone());
        registry.insert_if_absent(c.clone());

        assert!(registry.remove(&b.fingerprint).is_some());
        let listed: Vec<&DegreeRecord> = registry.list();
        assert_eq!(listed, vec![&a, &c]);
    }

    #[test]
    fn test_inconsistent_reports_without_removing() {
        let mut registry = Registry::new();
        let good = record("Alice Smith", "S123");
        let mut tampered = record("Bob Jones", "S456");
        tampered.degree_name = "PhD Physics".into();

        registry.insert_if_absent(good.clone());
        registry.insert_if_absent(tampered.clone());

        assert_eq!(
            registry.inconsistent(FingerprintScheme::Legacy),
            vec![tampered.fingerprint.as_str()]
        );
        assert_eq!(registry.count(), 2);
        assert!(registry.contains(&good.fingerprint));

        // Under the other scheme every record is off
        assert_eq!(registry.inconsistent(FingerprintScheme::LengthPrefixed).len(), 2);
    }

    #[test]
    fn test_revision_tracks_mutations() {
        let mut registry = Registry::new();
        let alice = record("Alice Smith", "S123");
        assert_eq!(registry.revision(), 0);

        registry.insert_if_absent(alice.clone());
        assert_eq!(registry.revision(), 1);

        // Duplicates and misses leave it alone
        registry.insert_if_absent(alice.clone());
        registry.remove("0xmissing");
        assert_eq!(registry.revision(), 1);

        registry.remove(&alice.fingerprint);
        assert_eq!(registry.revision(), 2);
    }

    #[test]
    fn test_registry_serialization() {
        let mut registry = Registry::new();
        let alice = record("Alice Smith", "S123");
        let bob = record("Bob Jones", "S456");
        registry.insert_if_absent(alice.clone());
        registry.insert_if_absent(bob.clone());

        let json = serde_json::to_string(&registry).unwrap();
        let deserialized: Registry = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.list(), vec![&alice, &bob]);
    }
}

//! Vendor memory: key normalization, entry model, and the store contract.
//!
//! The engine only needs `get` and `put` over normalized keys; persistence
//! mechanics (file, database) belong to the caller. Concurrent approvals
//! for the same vendor key must be serialized by the caller, since merge
//! semantics are last-write-wins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Category;

/// Normalize a raw vendor string into its memory key.
///
/// Lowercased, trimmed, punctuation stripped except internal hyphens and
/// spaces, whitespace collapsed. Case and punctuation variants of one
/// merchant collapse to a single key.
pub fn normalize_vendor_key(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One learned vendor-to-category mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorMemoryEntry {
    /// Last-approved category.
    pub category: Category,

    /// Last-approved account code.
    pub account_code: String,

    /// Number of approved receipts observed for this vendor.
    pub count: u32,
}

/// Storage contract the engine requires.
pub trait VendorStore {
    /// Look up an entry by its normalized key.
    fn get(&self, key: &str) -> Option<VendorMemoryEntry>;

    /// Store an entry under its normalized key, replacing any prior value.
    fn put(&mut self, key: &str, entry: VendorMemoryEntry);
}

/// Record an approved categorization for a vendor.
///
/// Category and account code are replaced outright (last-write-wins, never
/// averaged); the observation count increments. Entries are created on the
/// first approval and never deleted here.
pub fn record_approval(
    store: &mut dyn VendorStore,
    vendor: &str,
    category: Category,
    account_code: &str,
) {
    let key = normalize_vendor_key(vendor);
    if key.is_empty() {
        return;
    }
    let count = store.get(&key).map(|e| e.count + 1).unwrap_or(1);
    store.put(
        &key,
        VendorMemoryEntry {
            category,
            account_code: account_code.to_string(),
            count,
        },
    );
}

/// Simple in-process store; also the decoded form of a persisted snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryVendorStore {
    vendors: HashMap<String, VendorMemoryEntry>,
}

impl InMemoryVendorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }

    /// Decode a persisted snapshot string. Entries whose category label
    /// does not parse are dropped - a memory miss, not an error.
    pub fn from_snapshot_json(json: &str) -> Result<Self> {
        let snapshot: MemorySnapshot = serde_json::from_str(json)?;
        Ok(snapshot.into())
    }

    /// Encode the store into the snapshot wire form.
    pub fn to_snapshot_json(&self) -> Result<String> {
        let snapshot = MemorySnapshot::from(self);
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }
}

impl VendorStore for InMemoryVendorStore {
    fn get(&self, key: &str) -> Option<VendorMemoryEntry> {
        self.vendors.get(key).cloned()
    }

    fn put(&mut self, key: &str, entry: VendorMemoryEntry) {
        self.vendors.insert(key.to_string(), entry);
    }
}

/// Wire form of a persisted vendor memory, tolerant of malformed entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySnapshot {
    #[serde(default)]
    pub vendors: HashMap<String, SnapshotEntry>,
}

/// Untyped snapshot entry; the category is validated on decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotEntry {
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub account_code: String,

    #[serde(default)]
    pub count: u32,
}

impl From<MemorySnapshot> for InMemoryVendorStore {
    fn from(snapshot: MemorySnapshot) -> Self {
        let vendors = snapshot
            .vendors
            .into_iter()
            .filter_map(|(key, entry)| {
                let category = Category::from_label(&entry.category)?;
                let key = normalize_vendor_key(&key);
                if key.is_empty() {
                    return None;
                }
                Some((
                    key,
                    VendorMemoryEntry {
                        category,
                        account_code: entry.account_code,
                        count: entry.count.max(1),
                    },
                ))
            })
            .collect();
        Self { vendors }
    }
}

impl From<&InMemoryVendorStore> for MemorySnapshot {
    fn from(store: &InMemoryVendorStore) -> Self {
        let vendors = store
            .vendors
            .iter()
            .map(|(key, entry)| {
                (
                    key.clone(),
                    SnapshotEntry {
                        category: entry.category.label().to_string(),
                        account_code: entry.account_code.clone(),
                        count: entry.count,
                    },
                )
            })
            .collect();
        Self { vendors }
    }
}

//! In-memory store backed by a JSON dataset fixture.
//!
//! Used by the CLI (which loads a whole dataset from disk) and by tests.
//! Rows are kept in insertion order, which is what the resolver's
//! first-wins policy observes on join tables.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use indicativo_model::{SnapshotRecord, SnapshotSummary};

use crate::error::StoreError;
use crate::store::{Filter, ReferenceStore, SnapshotListFilter, SnapshotStore, Table};

/// On-disk fixture shape: captured snapshots plus the live lookup tables
/// keyed by table name.
#[derive(Debug, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub snapshots: Vec<SnapshotRecord>,
    #[serde(default)]
    pub tables: BTreeMap<String, Vec<serde_json::Value>>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    snapshots: Vec<SnapshotRecord>,
    tables: HashMap<Table, Vec<serde_json::Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a parsed dataset. Unknown table names are
    /// rejected rather than silently dropped; a fixture typo would
    /// otherwise masquerade as an empty lookup table.
    pub fn from_dataset(dataset: Dataset) -> Result<Self, StoreError> {
        let mut store = Self {
            snapshots: dataset.snapshots,
            tables: HashMap::new(),
        };
        for (name, rows) in dataset.tables {
            let table = Table::from_name(&name).ok_or(StoreError::Query {
                table: "dataset",
                message: format!("unknown table `{name}` in dataset"),
            })?;
            store.tables.insert(table, rows);
        }
        Ok(store)
    }

    pub fn insert_snapshot(&mut self, record: SnapshotRecord) {
        self.snapshots.push(record);
    }

    /// Append one row to a table, preserving insertion order.
    pub fn insert_row(&mut self, table: Table, row: serde_json::Value) {
        self.tables.entry(table).or_default().push(row);
    }
}

impl ReferenceStore for InMemoryStore {
    fn select(&self, table: Table, filter: &Filter) -> Result<Vec<serde_json::Value>, StoreError> {
        let rows = self.tables.get(&table).map(Vec::as_slice).unwrap_or(&[]);
        Ok(rows
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect())
    }
}

impl SnapshotStore for InMemoryStore {
    fn fetch(&self, id: i64) -> Result<Option<SnapshotRecord>, StoreError> {
        Ok(self
            .snapshots
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    fn list(&self, filter: &SnapshotListFilter) -> Result<Vec<SnapshotSummary>, StoreError> {
        Ok(self
            .snapshots
            .iter()
            .filter(|record| filter.matches(record.captured_at))
            .map(SnapshotSummary::from)
            .collect())
    }
}

//! The store seam.
//!
//! The engine never talks SQL. It sees two narrow traits: a snapshot store
//! (the audit table) and a reference store exposing a generic
//! `select(table, filter)` over the live lookup tables. Rows travel as JSON
//! objects and are decoded into typed records at the call site, so any
//! relational backend can sit behind the trait.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use indicativo_model::{SnapshotRecord, SnapshotSummary};

use crate::error::StoreError;

/// Live lookup tables the resolver reads.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Areas,
    OdsObjectives,
    Mga,
    StrategicLines,
    ResultGoals,
    Programs,
    FinancingSources,
    PopulationFocusCategories,
    /// Join table: product goal <-> result goal, insertion-ordered.
    ProductGoalResultGoals,
    /// Join table: product goal <-> population-focus category.
    ProductGoalPopulationFocus,
}

impl Table {
    pub const fn name(self) -> &'static str {
        match self {
            Table::Areas => "areas",
            Table::OdsObjectives => "ods_objectives",
            Table::Mga => "mga",
            Table::StrategicLines => "strategic_lines",
            Table::ResultGoals => "result_goals",
            Table::Programs => "programs",
            Table::FinancingSources => "financing_sources",
            Table::PopulationFocusCategories => "population_focus_categories",
            Table::ProductGoalResultGoals => "product_goal_result_goals",
            Table::ProductGoalPopulationFocus => "product_goal_population_focus",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "areas" => Table::Areas,
            "ods_objectives" => Table::OdsObjectives,
            "mga" => Table::Mga,
            "strategic_lines" => Table::StrategicLines,
            "result_goals" => Table::ResultGoals,
            "programs" => Table::Programs,
            "financing_sources" => Table::FinancingSources,
            "population_focus_categories" => Table::PopulationFocusCategories,
            "product_goal_result_goals" => Table::ProductGoalResultGoals,
            "product_goal_population_focus" => Table::ProductGoalPopulationFocus,
            _ => return None,
        })
    }
}

/// A relational filter: everything, one key, or a batched id set
/// (`WHERE column IN (...)`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    All,
    Eq { column: &'static str, value: i64 },
    In { column: &'static str, values: Vec<i64> },
}

impl Filter {
    pub fn id_eq(value: i64) -> Self {
        Filter::Eq { column: "id", value }
    }

    pub fn id_in(values: Vec<i64>) -> Self {
        Filter::In { column: "id", values }
    }

    /// Whether a JSON row passes the filter.
    pub fn matches(&self, row: &serde_json::Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { column, value } => {
                row.get(column).and_then(serde_json::Value::as_i64) == Some(*value)
            }
            Filter::In { column, values } => row
                .get(column)
                .and_then(serde_json::Value::as_i64)
                .is_some_and(|v| values.contains(&v)),
        }
    }
}

/// Read access to the live lookup tables. Implementations must preserve
/// backend row order: join tables are insertion-ordered and that order is
/// semantically significant (first-wins selection).
pub trait ReferenceStore: Send + Sync {
    fn select(&self, table: Table, filter: &Filter) -> Result<Vec<serde_json::Value>, StoreError>;
}

/// Optional date-range filter for the snapshot listing endpoint.
#[derive(Clone, Debug, Default)]
pub struct SnapshotListFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl SnapshotListFilter {
    pub fn matches(&self, captured_at: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| captured_at >= from)
            && self.to.is_none_or(|to| captured_at <= to)
    }
}

/// Read access to the audit store of captured snapshots.
pub trait SnapshotStore: Send + Sync {
    fn fetch(&self, id: i64) -> Result<Option<SnapshotRecord>, StoreError>;
    fn list(&self, filter: &SnapshotListFilter) -> Result<Vec<SnapshotSummary>, StoreError>;
}

/// Decode a batch of JSON rows into typed records.
pub(crate) fn decode_rows<T: DeserializeOwned>(
    table: Table,
    rows: Vec<serde_json::Value>,
) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|source| StoreError::Decode {
                table: table.name(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches_json_rows() {
        let row = serde_json::json!({"id": 7, "strategic_line_id": 2});
        assert!(Filter::All.matches(&row));
        assert!(Filter::id_eq(7).matches(&row));
        assert!(!Filter::id_eq(8).matches(&row));
        assert!(Filter::In {
            column: "strategic_line_id",
            values: vec![1, 2]
        }
        .matches(&row));
        assert!(!Filter::id_in(vec![]).matches(&row));
    }

    #[test]
    fn table_names_roundtrip() {
        for table in [
            Table::Areas,
            Table::OdsObjectives,
            Table::Mga,
            Table::StrategicLines,
            Table::ResultGoals,
            Table::Programs,
            Table::FinancingSources,
            Table::PopulationFocusCategories,
            Table::ProductGoalResultGoals,
            Table::ProductGoalPopulationFocus,
        ] {
            assert_eq!(Table::from_name(table.name()), Some(table));
        }
        assert_eq!(Table::from_name("nope"), None);
    }
}

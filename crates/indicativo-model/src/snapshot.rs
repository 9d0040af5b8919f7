//! The captured snapshot document.
//!
//! A snapshot is an immutable JSON copy of the planning tables as they
//! existed at mutation time. Foreign keys are stored as plain ids, not
//! embedded objects; the engine reconciles them against the *current*
//! lookup tables when a document is built.
//!
//! Decoding is deliberately lenient: a snapshot whose expected array is
//! missing, `null`, or not a list decodes as zero records for that array.
//! Historical snapshots outlive schema changes and must never fail a build
//! over shape drift.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A stored capture: the audit-store row wrapping one [`Snapshot`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub id: i64,
    pub captured_at: DateTime<Utc>,
    pub snapshot: Snapshot,
}

/// Listing projection for the retrieval surface; the snapshot body is not
/// materialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub id: i64,
    pub captured_at: DateTime<Utc>,
}

impl From<&SnapshotRecord> for SnapshotSummary {
    fn from(record: &SnapshotRecord) -> Self {
        Self {
            id: record.id,
            captured_at: record.captured_at,
        }
    }
}

/// The denormalized planning tree captured at mutation time.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "lenient_records")]
    pub product_goals: Vec<ProductGoal>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub physical_programming: Vec<PhysicalProgramming>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub financial_programming: Vec<FinancialProgramming>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub project_bank: Vec<ProjectBankEntry>,
}

/// One product goal as captured. Reference fields are ids into the live
/// lookup tables and may be null or stale.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProductGoal {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub indicator: String,
    #[serde(default)]
    pub baseline: Option<f64>,
    #[serde(default)]
    pub quadrennium_target: Option<f64>,
    #[serde(default)]
    pub area_id: Option<i64>,
    #[serde(default)]
    pub ods_id: Option<i64>,
    #[serde(default)]
    pub mga_id: Option<i64>,
    /// Territorial focus markers; values are 1 (urban) and 2 (rural).
    #[serde(default)]
    pub territorial_focus: Vec<i64>,
    /// Population-focus category ids embedded at capture time. The live
    /// join table may carry additional links; the report marks the union.
    #[serde(default)]
    pub population_focus_ids: Vec<i64>,
}

/// Physical programming for one product goal: one target per reporting
/// period of the quadrennium.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PhysicalProgramming {
    pub product_goal_id: i64,
    #[serde(default)]
    pub year_1: Option<f64>,
    #[serde(default)]
    pub year_2: Option<f64>,
    #[serde(default)]
    pub year_3: Option<f64>,
    #[serde(default)]
    pub year_4: Option<f64>,
}

impl PhysicalProgramming {
    /// Period targets in reporting order.
    pub fn periods(&self) -> [Option<f64>; 4] {
        [self.year_1, self.year_2, self.year_3, self.year_4]
    }
}

/// One financing amount: product goal x financing source x calendar year.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinancialProgramming {
    pub product_goal_id: i64,
    pub source_id: i64,
    pub year: i32,
    #[serde(default)]
    pub amount: f64,
}

/// Project-bank registration captured alongside the goal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectBankEntry {
    pub product_goal_id: i64,
    #[serde(default)]
    pub bpin_code: String,
}

/// Decode a snapshot array, treating a missing/mistyped array as empty and
/// skipping elements that no longer decode under the current schema.
fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_arrays_decode_as_empty() {
        let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
            "product_goals": [{"id": 1, "name": "Aqueduct coverage"}]
        }))
        .unwrap();
        assert_eq!(snapshot.product_goals.len(), 1);
        assert!(snapshot.physical_programming.is_empty());
        assert!(snapshot.project_bank.is_empty());
    }

    #[test]
    fn mistyped_array_decodes_as_empty() {
        let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
            "product_goals": "corrupted",
            "physical_programming": {"product_goal_id": 1},
            "financial_programming": null
        }))
        .unwrap();
        assert!(snapshot.product_goals.is_empty());
        assert!(snapshot.physical_programming.is_empty());
        assert!(snapshot.financial_programming.is_empty());
    }

    #[test]
    fn undecodable_elements_are_skipped() {
        let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
            "product_goals": [{"id": 1}, 42, {"id": "not-a-number"}]
        }))
        .unwrap();
        assert_eq!(snapshot.product_goals.len(), 1);
        assert_eq!(snapshot.product_goals[0].id, 1);
    }

    #[test]
    fn goal_reference_fields_tolerate_null() {
        let goal: ProductGoal = serde_json::from_value(serde_json::json!({
            "id": 9,
            "area_id": null,
            "territorial_focus": [1, 2]
        }))
        .unwrap();
        assert_eq!(goal.area_id, None);
        assert_eq!(goal.territorial_focus, vec![1, 2]);
    }
}

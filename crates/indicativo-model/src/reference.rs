//! Rows of the live lookup tables the engine reconciles a snapshot against.

use serde::{Deserialize, Serialize};

/// A responsible area (secretariat/office) of the municipality.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Area {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// A Sustainable Development Goal objective a product goal is aligned to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OdsObjective {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// MGA catalog characterization (sector/program/product coding).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MgaRecord {
    pub id: i64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub sector: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StrategicLine {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultGoal {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub strategic_line_id: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Program {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub strategic_line_id: i64,
}

/// Row of the product-goal <-> result-goal join table. Row order is the
/// insertion order and is semantically load-bearing (first-wins selection).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultGoalLink {
    pub product_goal_id: i64,
    pub result_goal_id: i64,
}

/// Row of the product-goal <-> population-focus join table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PopulationFocusLink {
    pub product_goal_id: i64,
    pub focus_id: i64,
}

/// One entry of a small reference category (financing source,
/// population-focus category).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// An ordered reference category. Entries are held in ascending-id order;
/// the order fixes dynamic column order for the whole build, so it must not
/// change between header rendering and row population.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupSet {
    entries: Vec<LookupEntry>,
}

impl LookupSet {
    /// Build a set from unordered rows, sorting by ascending id.
    pub fn from_entries(mut entries: Vec<LookupEntry>) -> Self {
        entries.sort_by_key(|entry| entry.id);
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LookupEntry> {
        self.entries.iter()
    }
}

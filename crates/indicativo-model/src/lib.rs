//! Core value types for the Plan Indicativo synthesis engine.
//!
//! This crate is pure data: the captured snapshot document, the live
//! lookup-table rows it is reconciled against, the sparse output grid, and
//! the column algebra used to lay sections out. It performs no I/O; the
//! store seam lives in `indicativo-store` and the report pipeline in
//! `indicativo-report`.

pub mod column;
pub mod grid;
pub mod reference;
pub mod snapshot;

pub use column::{column_index, column_label, ColumnLabelError, ColumnRange};
pub use grid::{CellValue, Grid, MergeSpan};
pub use reference::{
    Area, LookupEntry, LookupSet, MgaRecord, OdsObjective, PopulationFocusLink, Program,
    ResultGoal, ResultGoalLink, StrategicLine,
};
pub use snapshot::{
    FinancialProgramming, PhysicalProgramming, ProductGoal, ProjectBankEntry, Snapshot,
    SnapshotRecord, SnapshotSummary,
};

//! Store seam and reference resolution for the Plan Indicativo engine.
//!
//! `store` defines the two traits the engine depends on (snapshot store,
//! generic reference store); `memory` is the dataset-fixture-backed
//! implementation used by the CLI and tests; `cache` memoizes the two
//! section-sizing lookup sets for one build; `resolver` reconciles a frozen
//! snapshot's foreign keys against the live tables.

pub mod cache;
pub mod error;
pub mod memory;
pub mod resolver;
pub mod store;

pub use cache::LookupCache;
pub use error::StoreError;
pub use memory::{Dataset, InMemoryStore};
pub use resolver::{Lineage, ReferenceResolver};
pub use store::{Filter, ReferenceStore, SnapshotListFilter, SnapshotStore, Table};

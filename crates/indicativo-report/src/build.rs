//! Build orchestration.
//!
//! One build = one snapshot id = one document. The lookup sets and section
//! layout travel in an explicit [`BuildContext`] value threaded through the
//! header renderer and row populator, so nothing is kept as hidden mutable
//! state and distinct builds are independent of each other.

use chrono::{DateTime, Datelike, Utc};
use tracing::debug;

use indicativo_model::{Grid, LookupSet, SnapshotRecord};
use indicativo_store::{
    LookupCache, ReferenceResolver, ReferenceStore, SnapshotStore, StoreError,
};

use crate::emit::{download_filename, emit_workbook, DocumentDownload, CONTENT_TYPE};
use crate::error::ReportError;
use crate::header::render_headers;
use crate::layout::SectionLayout;
use crate::populate::populate_rows;

/// Sheet name of the generated workbook.
pub const SHEET_NAME: &str = "Plan Indicativo";

#[derive(Clone, Debug, Default)]
pub struct BuildOptions {
    /// First reporting year; defaults to the capture year.
    pub first_year: Option<i32>,
}

/// Everything fixed at build start: the two section-sizing lookup sets and
/// the layout derived from them. Immutable once constructed.
#[derive(Clone, Debug)]
pub struct BuildContext {
    pub financing_sources: LookupSet,
    pub population_focus: LookupSet,
    pub first_year: i32,
    pub layout: SectionLayout,
}

impl BuildContext {
    pub fn prepare(
        store: &dyn ReferenceStore,
        captured_at: DateTime<Utc>,
        options: &BuildOptions,
    ) -> Result<Self, StoreError> {
        let mut cache = LookupCache::new(store);
        let financing_sources = cache.financing_sources()?.clone();
        let population_focus = cache.population_focus_categories()?.clone();
        let first_year = options.first_year.unwrap_or_else(|| captured_at.year());
        let layout = SectionLayout::allocate(1, &financing_sources, &population_focus, first_year);
        debug!(
            first_year,
            financing_sources = financing_sources.len(),
            population_focus = population_focus.len(),
            total_col = layout.total_col,
            "build context prepared"
        );
        Ok(Self {
            financing_sources,
            population_focus,
            first_year,
            layout,
        })
    }
}

/// Build the populated grid for an already-fetched snapshot. Exposed
/// separately from [`build_document`] so tests and callers can inspect the
/// grid without serializing it.
pub fn build_grid(
    record: &SnapshotRecord,
    references: &dyn ReferenceStore,
    options: &BuildOptions,
) -> Result<(Grid, BuildContext), ReportError> {
    let context = BuildContext::prepare(references, record.captured_at, options)?;
    let mut resolver = ReferenceResolver::prefetch(references, &record.snapshot)?;
    let mut grid = Grid::new();
    render_headers(&mut grid, &context.layout, record.id, record.captured_at);
    populate_rows(&mut grid, &context.layout, &record.snapshot, &mut resolver);
    Ok((grid, context))
}

/// Build the document for a snapshot id: fetch, lay out, populate, emit.
pub fn build_document(
    snapshots: &dyn SnapshotStore,
    references: &dyn ReferenceStore,
    snapshot_id: i64,
    options: &BuildOptions,
) -> Result<DocumentDownload, ReportError> {
    let record = snapshots
        .fetch(snapshot_id)?
        .ok_or(ReportError::SnapshotNotFound(snapshot_id))?;
    debug!(snapshot_id, captured_at = %record.captured_at, "building document");
    let (grid, _context) = build_grid(&record, references, options)?;
    let bytes = emit_workbook(&grid, SHEET_NAME)?;
    Ok(DocumentDownload {
        filename: download_filename(snapshot_id, Utc::now()),
        content_type: CONTENT_TYPE,
        bytes,
    })
}

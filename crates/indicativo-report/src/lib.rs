//! Snapshot-to-document synthesis.
//!
//! Pipeline: fetch snapshot -> warm lookup cache -> allocate section
//! layout -> render headers -> resolve references and populate rows ->
//! emit the XLSX artifact. Each stage is a pure function over immutable
//! values where it can be; `build::build_document` composes them.

pub mod build;
pub mod emit;
pub mod error;
pub mod header;
pub mod layout;
pub mod populate;

pub use build::{build_document, build_grid, BuildContext, BuildOptions, SHEET_NAME};
pub use emit::{download_filename, emit_workbook, DocumentDownload, CONTENT_TYPE};
pub use error::ReportError;
pub use header::{
    render_headers, DATA_START_ROW, LABEL_ROW, SECTION_ROW, TITLE_FIRST_ROW, TITLE_LAST_ROW,
};
pub use layout::{
    FinancingBlock, Section, SectionColumn, SectionLayout, DESCRIPTIVE_COLUMNS,
    EXECUTION_SUBMETRICS, PLACEHOLDER_LABEL, REPORTING_YEARS, TERRITORIAL,
};
pub use populate::{populate_rows, MARKER};

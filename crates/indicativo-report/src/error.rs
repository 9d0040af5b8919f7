use indicativo_store::StoreError;

/// Build-level failures. Per-record resolution problems never surface
/// here; they degrade to blank cells inside the resolver.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The requested snapshot id does not exist in the audit store.
    #[error("no snapshot found with id {0}")]
    SnapshotNotFound(i64),
    /// A batched read against the snapshot or reference store failed.
    #[error("reference data could not be read: {0}")]
    Store(#[from] StoreError),
    /// The populated grid could not be serialized to a workbook.
    #[error("failed to serialize the spreadsheet document: {0}")]
    Document(#[from] rust_xlsxwriter::XlsxError),
}

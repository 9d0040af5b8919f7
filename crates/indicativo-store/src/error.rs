/// Failures of the underlying store.
///
/// `Query` covers connectivity and query execution; `Decode` covers rows
/// that no longer match the expected shape. Both abort a build when raised
/// from a batched prefetch; single-row fallback fetches swallow them at the
/// record level (see `resolver`).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("query against `{table}` failed: {message}")]
    Query { table: &'static str, message: String },
    #[error("failed to decode a `{table}` row")]
    Decode {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

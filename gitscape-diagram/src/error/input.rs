/// Errors reading a path entry document.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The document is not valid JSON or matches none of the accepted shapes
    #[error("Entry document parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

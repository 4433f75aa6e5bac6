use crate::model::NodeKind;

/// Inconsistencies the tree builder tolerates.
///
/// None of these abort a build. They are logged as warnings and collected by
/// [`crate::build_with_report`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildIssue {
    /// An explicit entry disagrees with the kind a node already had
    #[error("Kind conflict at '{path}': {previous:?} replaced by {current:?}")]
    KindConflict {
        path: String,
        previous: NodeKind,
        current: NodeKind,
    },

    /// A file was found where a directory segment was expected
    #[error("File '{file}' found in intermediate path of '{entry}'")]
    FileInIntermediatePath { file: String, entry: String },

    /// The entry path contains an empty segment (`a//b`, trailing slash)
    #[error("Empty segment in path '{path}'")]
    EmptySegment { path: String },
}

//! Node label text.

use crate::model::NodeKind;

/// Marker appended to truncated labels.
pub const ELLIPSIS: &str = "...";

/// Shorten `name` to `keep` characters plus [`ELLIPSIS`] when it is longer
/// than `budget` characters.
pub fn truncate_label(name: &str, budget: usize, keep: usize) -> String {
    if name.chars().count() <= budget {
        return name.to_string();
    }
    let mut label: String = name.chars().take(keep.min(budget)).collect();
    label.push_str(ELLIPSIS);
    label
}

/// Hover text: kind and full path, or just the name for the root.
pub fn tooltip(kind: NodeKind, path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{kind}: {path}")
    }
}

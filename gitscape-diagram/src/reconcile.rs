//! Keyed enter/update/exit diff between two visible sets.

use std::collections::HashSet;
use std::hash::Hash;

/// What happened to each key between two states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff<K> {
    /// Present now, absent before. In `next` order.
    pub enter: Vec<K>,
    /// Present in both. In `next` order.
    pub update: Vec<K>,
    /// Present before, absent now. In `previous` order.
    pub exit: Vec<K>,
}

impl<K> Diff<K> {
    pub fn is_empty(&self) -> bool {
        self.enter.is_empty() && self.update.is_empty() && self.exit.is_empty()
    }

    /// True when nothing appears or disappears.
    pub fn is_stable(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty()
    }
}

/// Diff `previous` against `next` by key identity.
///
/// Duplicate keys within one side are treated as a single element.
pub fn reconcile<K>(previous: &[K], next: &[K]) -> Diff<K>
where
    K: Eq + Hash + Clone,
{
    let before: HashSet<&K> = previous.iter().collect();
    let after: HashSet<&K> = next.iter().collect();

    let mut seen = HashSet::new();
    let mut enter = Vec::new();
    let mut update = Vec::new();
    for key in next {
        if !seen.insert(key) {
            continue;
        }
        if before.contains(key) {
            update.push(key.clone());
        } else {
            enter.push(key.clone());
        }
    }

    let mut seen = HashSet::new();
    let exit = previous
        .iter()
        .filter(|key| seen.insert(*key) && !after.contains(*key))
        .cloned()
        .collect();

    Diff {
        enter,
        update,
        exit,
    }
}

/// Key of the link from `parent` to `child`.
pub fn link_key(parent: &str, child: &str) -> String {
    format!("{parent}->{child}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_key_concatenates_ids() {
        assert_eq!(link_key("", "src"), "->src");
        assert_eq!(link_key("src", "src/lib.rs"), "src->src/lib.rs");
    }

    #[test]
    fn test_duplicates_collapse() {
        let diff = reconcile(&["a", "a", "b"], &["b", "c", "c"]);
        assert_eq!(diff.enter, vec!["c"]);
        assert_eq!(diff.update, vec!["b"]);
        assert_eq!(diff.exit, vec!["a"]);
    }
}

//! Tag-set diffing for the registration layer.
//!
//! The backend treats tags case-insensitively, so both sides of a diff are
//! lowercased before comparison. Pure set logic; the caller decides what to
//! do with the resulting subscribe/unsubscribe sets.

use std::collections::BTreeSet;

/// The tag changes needed to move a registration from `saved` to `new`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagsDiff {
    /// Tags present in the new set but not yet subscribed.
    pub subscribe: BTreeSet<String>,
    /// Tags currently subscribed but absent from the new set.
    pub unsubscribe: BTreeSet<String>,
}

impl TagsDiff {
    pub fn is_empty(&self) -> bool {
        self.subscribe.is_empty() && self.unsubscribe.is_empty()
    }
}

/// Lowercase every tag in the set.
pub fn lowercase_tags(tags: &BTreeSet<String>) -> BTreeSet<String> {
    tags.iter().map(|t| t.to_lowercase()).collect()
}

/// Compute the subscribe/unsubscribe sets that reconcile `saved` with `new`.
///
/// Both inputs are lowercased first, so `"NYC"` and `"nyc"` are the same tag.
pub fn diff_tags(saved: &BTreeSet<String>, new: &BTreeSet<String>) -> TagsDiff {
    let saved = lowercase_tags(saved);
    let new = lowercase_tags(new);
    TagsDiff {
        subscribe: new.difference(&saved).cloned().collect(),
        unsubscribe: saved.difference(&new).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn disjoint_sets_swap_entirely() {
        let d = diff_tags(&set(&["a", "b"]), &set(&["c"]));
        assert_eq!(d.subscribe, set(&["c"]));
        assert_eq!(d.unsubscribe, set(&["a", "b"]));
    }

    #[test]
    fn equal_sets_diff_empty() {
        let d = diff_tags(&set(&["a", "b"]), &set(&["b", "a"]));
        assert!(d.is_empty());
    }

    #[test]
    fn comparison_is_case_insensitive() {
        let d = diff_tags(&set(&["NYC", "sfo"]), &set(&["nyc", "SFO"]));
        assert!(d.is_empty());
    }

    #[test]
    fn output_is_lowercased() {
        let d = diff_tags(&set(&[]), &set(&["NYC"]));
        assert_eq!(d.subscribe, set(&["nyc"]));
    }

    #[test]
    fn empty_new_set_unsubscribes_all() {
        let d = diff_tags(&set(&["a"]), &set(&[]));
        assert_eq!(d.unsubscribe, set(&["a"]));
        assert!(d.subscribe.is_empty());
    }
}

//! Connect/disconnect deltas for many-to-many relations.
//!
//! Everything here is pure: callers load the current association set first
//! and apply the resulting delta afterwards.

use std::collections::BTreeSet;

/// Operations needed to turn the current association set into the desired one.
/// Both lists are sorted and never share an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDelta<T> {
    pub to_connect: Vec<T>,
    pub to_disconnect: Vec<T>,
}

impl<T> RelationDelta<T> {
    pub fn is_empty(&self) -> bool {
        self.to_connect.is_empty() && self.to_disconnect.is_empty()
    }
}

impl<T> Default for RelationDelta<T> {
    fn default() -> Self {
        Self {
            to_connect: Vec::new(),
            to_disconnect: Vec::new(),
        }
    }
}

/// Set difference in both directions. Input order and duplicates are ignored.
pub fn reconcile<T, C, D>(current: C, desired: D) -> RelationDelta<T>
where
    T: Ord + Clone,
    C: IntoIterator<Item = T>,
    D: IntoIterator<Item = T>,
{
    let current: BTreeSet<T> = current.into_iter().collect();
    let desired: BTreeSet<T> = desired.into_iter().collect();

    RelationDelta {
        to_connect: desired.difference(&current).cloned().collect(),
        to_disconnect: current.difference(&desired).cloned().collect(),
    }
}

/// Tag delta keyed by name. `to_connect` entries are connect-or-create since
/// the tag row may not exist yet. Names are trimmed and blanks dropped.
pub fn reconcile_tags<'a, C, D>(current: C, desired: D) -> RelationDelta<String>
where
    C: IntoIterator<Item = &'a str>,
    D: IntoIterator<Item = &'a str>,
{
    reconcile(normalize_tag_names(current), normalize_tag_names(desired))
}

/// Image delta keyed by photo id. `to_connect` entries must already exist.
pub fn reconcile_images<C, D>(current: C, desired: D) -> RelationDelta<i32>
where
    C: IntoIterator<Item = i32>,
    D: IntoIterator<Item = i32>,
{
    reconcile(current, desired)
}

fn normalize_tag_names<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(current: &[&str], delta: &RelationDelta<String>) -> BTreeSet<String> {
        let mut out: BTreeSet<String> = current.iter().map(|s| s.to_string()).collect();
        for name in &delta.to_disconnect {
            out.remove(name);
        }
        out.extend(delta.to_connect.iter().cloned());
        out
    }

    #[test]
    fn test_reconcile_is_exact() {
        let cases: &[(&[&str], &[&str])] = &[
            (&["opera", "ballet"], &["ballet", "drama"]),
            (&[], &["premiere"]),
            (&["premiere"], &[]),
            (&["a", "b", "c"], &["c", "b", "a"]),
            (&["x"], &["y", "z", "y"]),
        ];

        for (current, desired) in cases {
            let delta = reconcile_tags(current.iter().copied(), desired.iter().copied());

            let connect: BTreeSet<_> = delta.to_connect.iter().collect();
            let disconnect: BTreeSet<_> = delta.to_disconnect.iter().collect();
            assert!(connect.is_disjoint(&disconnect));

            let expected: BTreeSet<String> = desired.iter().map(|s| s.to_string()).collect();
            assert_eq!(apply(current, &delta), expected);
        }
    }

    #[test]
    fn test_reconcile_against_itself_is_empty() {
        let delta = reconcile_images(vec![3, 1, 2], vec![1, 2, 3]);
        assert!(delta.is_empty());

        let delta = reconcile_tags(["opera", "drama"], ["drama", "opera"]);
        assert!(delta.is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let delta = reconcile_images(Vec::new(), vec![7, 7, 7, 2]);
        assert_eq!(delta.to_connect, vec![2, 7]);
        assert!(delta.to_disconnect.is_empty());
    }

    #[test]
    fn test_output_is_order_independent() {
        let a = reconcile_tags(["c", "a"], ["d", "b", "a"]);
        let b = reconcile_tags(["a", "c"], ["a", "b", "d"]);
        assert_eq!(a, b);
        assert_eq!(a.to_connect, vec!["b".to_string(), "d".to_string()]);
        assert_eq!(a.to_disconnect, vec!["c".to_string()]);
    }

    #[test]
    fn test_blank_tag_names_are_ignored() {
        let delta = reconcile_tags(["opera"], ["  opera ", "", "   "]);
        assert!(delta.is_empty());
    }
}

//! Atom names as seen from outside the session

use super::variables::Literal;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// An atom of the loaded program together with its literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicAtom {
    pub name: String,
    pub literal: Literal,
}

/// Order-independent set of atom names.
///
/// Equality and hashing are structural, so two sets built in different orders
/// compare equal and can key the same map entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AtomSet(BTreeSet<String>);

impl AtomSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    pub fn difference(&self, other: &AtomSet) -> AtomSet {
        AtomSet(self.0.difference(&other.0).cloned().collect())
    }

    pub fn intersection(&self, other: &AtomSet) -> AtomSet {
        AtomSet(self.0.intersection(&other.0).cloned().collect())
    }

    pub fn union(&self, other: &AtomSet) -> AtomSet {
        AtomSet(self.0.union(&other.0).cloned().collect())
    }

    pub fn is_subset(&self, other: &AtomSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn is_disjoint(&self, other: &AtomSet) -> bool {
        self.0.is_disjoint(&other.0)
    }
}

impl<S: Into<String>> FromIterator<S> for AtomSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        AtomSet(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a AtomSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for AtomSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", name)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_equality_ignores_construction_order() {
        let left: AtomSet = ["c", "a", "b"].into_iter().collect();
        let right: AtomSet = ["b", "c", "a"].into_iter().collect();
        assert_eq!(left, right);

        let mut groups = HashMap::new();
        groups.insert(left, 1);
        assert_eq!(groups.get(&right), Some(&1));
    }

    #[test]
    fn test_set_operations() {
        let brave: AtomSet = ["a", "b", "c"].into_iter().collect();
        let cautious: AtomSet = ["a"].into_iter().collect();

        let facets = brave.difference(&cautious);
        assert_eq!(facets.iter().collect::<Vec<_>>(), vec!["b", "c"]);
        assert!(cautious.is_subset(&brave));
        assert!(facets.is_disjoint(&cautious));
        assert_eq!(brave.intersection(&cautious), cautious);
        assert_eq!(facets.union(&cautious), brave);
    }

    #[test]
    fn test_display() {
        let set: AtomSet = ["q(1)", "p"].into_iter().collect();
        assert_eq!(set.to_string(), "{p, q(1)}");
        assert_eq!(AtomSet::new().to_string(), "{}");
    }
}

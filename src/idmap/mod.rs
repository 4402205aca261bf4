//! External integer codes for atoms

pub mod loader;

pub use loader::{load_id_map_from_file, parse_id_map};

use crate::error::{AnalysisError, Result};
use std::collections::HashMap;

/// Prefix of classically negated atom names
pub const NEGATION_MARKER: char = '-';

/// Immutable name to code table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdMap {
    codes: HashMap<String, i64>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the code previously stored for `name`, if any
    pub fn insert(&mut self, name: impl Into<String>, code: i64) -> Option<i64> {
        self.codes.insert(name.into(), code)
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.codes.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Code of an atom name; a `-` prefix negates the code of the bare name
    pub fn remap(&self, name: &str) -> Result<i64> {
        match name.strip_prefix(NEGATION_MARKER) {
            Some(bare) => self.lookup(bare).map(|code| -code),
            None => self.lookup(name),
        }
    }

    fn lookup(&self, name: &str) -> Result<i64> {
        self.get(name)
            .ok_or_else(|| AnalysisError::Lookup(name.to_string()))
    }

    pub fn remap_all<'a, I>(&self, names: I) -> Result<Vec<i64>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().map(|name| self.remap(name)).collect()
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for IdMap {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        let mut map = IdMap::new();
        for (name, code) in iter {
            map.insert(name, code);
        }
        map
    }
}

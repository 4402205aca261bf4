//! Resolving atom names to solver literals

use crate::asp::{Literal, Session};
use crate::error::{AnalysisError, Result};
use crate::program::parse_atom;
use std::ops::Deref;

/// Prefix selecting the negated literal of a route element
pub const NEGATION_PREFIX: char = '~';

/// Literals fixed before enumerating
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route(Vec<Literal>);

impl Route {
    pub fn empty() -> Self {
        Self::default()
    }
}

impl Deref for Route {
    type Target = [Literal];

    fn deref(&self) -> &[Literal] {
        &self.0
    }
}

impl From<Vec<Literal>> for Route {
    fn from(literals: Vec<Literal>) -> Self {
        Route(literals)
    }
}

/// Literals of every atom whose name is exactly `name`.
///
/// An unknown name yields no literals; assuming nothing is a valid query.
pub fn literals_for(session: &Session, name: &str) -> Vec<Literal> {
    session
        .symbolic_atoms()
        .iter()
        .filter(|atom| atom.name == name)
        .map(|atom| atom.literal)
        .collect()
}

/// Resolve one route element; `~name` selects the negated literal.
///
/// The name is canonicalized first, so `p( 1 )` finds `p(1)`.
pub fn literal(session: &Session, text: &str) -> Result<Literal> {
    let text = text.trim();
    let (negated, name) = match text.strip_prefix(NEGATION_PREFIX) {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };
    let name = parse_atom(name).map_err(|_| AnalysisError::UnknownAtom(text.to_string()))?;

    let literal = literals_for(session, &name)
        .into_iter()
        .next()
        .ok_or_else(|| AnalysisError::UnknownAtom(text.to_string()))?;

    Ok(if negated { literal.negate() } else { literal })
}

/// Build a route from textual elements
pub fn route<S: AsRef<str>>(session: &Session, elements: &[S]) -> Result<Route> {
    elements
        .iter()
        .map(|element| literal(session, element.as_ref()))
        .collect::<Result<Vec<_>>>()
        .map(Route::from)
}

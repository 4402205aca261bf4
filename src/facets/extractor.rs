//! Facets: atoms a route leaves undetermined

use super::consequences::ConsequenceEngine;
use crate::asp::{AtomSet, Literal};
use crate::error::Result;
use log::debug;

/// Brave consequences minus cautious consequences under `route`.
///
/// An empty result means the route fixes every atom.
pub fn facets(engine: &mut ConsequenceEngine, route: &[Literal]) -> Result<AtomSet> {
    let brave = engine.brave(route)?;
    let cautious = engine.cautious(route)?;
    debug_assert!(cautious.is_subset(&brave));

    let facets = brave.difference(&cautious);
    debug!(
        "{} brave, {} cautious, {} facets",
        brave.len(),
        cautious.len(),
        facets.len()
    );
    Ok(facets)
}

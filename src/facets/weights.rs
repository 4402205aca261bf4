//! How much of the solution space a facet cuts away
//!
//! A route element is a current facet `f` (include it) or `~f` (exclude it).
//! Its weight measures how far taking that step narrows the program under the
//! route; its zoom expresses the weight relative to the unconstrained program.

use super::consequences::ConsequenceEngine;
use super::extractor::facets;
use super::resolver::{self, NEGATION_PREFIX};
use crate::asp::Literal;
use crate::error::{AnalysisError, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// Measure used for weights and zooms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weight {
    /// Stable models removed by the step
    #[default]
    Absolute,
    /// Facets removed by the step, counting both polarities of each
    FacetCounting,
}

/// Weight of one step; `inverse` is the weight of the opposite step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetWeight {
    pub facet: String,
    pub weight: usize,
    pub inverse: Option<usize>,
}

/// Share of the unconstrained program a step removes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Zoom {
    pub zoom: f64,
    pub inverse: Option<f64>,
}

/// Zoom bound for [`find_by_zoom`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomBound {
    AtLeast(f64),
    AtMost(f64),
}

/// Weight of stepping from `route` along `facet`.
///
/// `facet` must be a current facet under `route`, optionally prefixed with
/// `~`. Only [`Weight::Absolute`] reports an inverse: the models the step
/// keeps are exactly the ones the opposite step removes.
pub fn weight(
    engine: &mut ConsequenceEngine,
    route: &[Literal],
    kind: Weight,
    facet: &str,
) -> Result<FacetWeight> {
    let step = current_step(engine, route, facet)?;
    let extended: Vec<Literal> = route.iter().copied().chain([step]).collect();

    let (weight, inverse) = match kind {
        Weight::Absolute => {
            let count = engine.count(route)?;
            let narrowed = engine.count(&extended)?;
            (count.saturating_sub(narrowed), Some(narrowed))
        }
        Weight::FacetCounting => {
            let current = facets(engine, route)?.len();
            let narrowed = facets(engine, &extended)?.len();
            (current.saturating_sub(narrowed) * 2, None)
        }
    };

    debug!("{:?} weight of `{}`: {} ({:?})", kind, facet, weight, inverse);
    Ok(FacetWeight {
        facet: facet.trim().to_string(),
        weight,
        inverse,
    })
}

/// Weight of the step as a fraction of the unconstrained program's size
pub fn zoom(
    engine: &mut ConsequenceEngine,
    route: &[Literal],
    kind: Weight,
    facet: &str,
) -> Result<Zoom> {
    let weighed = weight(engine, route, kind, facet)?;
    // a facet under any route is also a facet of the unconstrained program
    let initial = initial_size(engine, kind)? as f64;

    Ok(Zoom {
        zoom: weighed.weight as f64 / initial,
        inverse: weighed.inverse.map(|w| w as f64 / initial),
    })
}

/// Fraction of the unconstrained program `route` has already cut away
pub fn pace(engine: &mut ConsequenceEngine, route: &[Literal], kind: Weight) -> Result<f64> {
    let initial = initial_size(engine, kind)?;
    if initial == 0 {
        return Ok(0.0);
    }
    let current = match kind {
        Weight::Absolute => engine.count(route)?,
        Weight::FacetCounting => facets(engine, route)?.len() * 2,
    };
    Ok(initial.saturating_sub(current) as f64 / initial as f64)
}

/// Weights of every current facet under `route`.
///
/// Absolute weights list each facet once with its inverse; facet-counting
/// weights list `f` and `~f` separately.
pub fn weights(
    engine: &mut ConsequenceEngine,
    route: &[Literal],
    kind: Weight,
) -> Result<Vec<FacetWeight>> {
    let current = facets(engine, route)?;
    let mut result = Vec::new();

    for facet in current.iter() {
        result.push(weight(engine, route, kind, facet)?);
        if kind == Weight::FacetCounting {
            result.push(weight(engine, route, kind, &excluded(facet))?);
        }
    }
    Ok(result)
}

/// First step whose zoom satisfies `bound`.
///
/// Including steps are tried before excluding ones when looking for a large
/// zoom, and the other way round when looking for a small one.
pub fn find_by_zoom(
    engine: &mut ConsequenceEngine,
    route: &[Literal],
    kind: Weight,
    bound: ZoomBound,
) -> Result<Option<String>> {
    let current = facets(engine, route)?;
    let including: Vec<String> = current.iter().map(str::to_string).collect();
    let excluding: Vec<String> = current.iter().map(excluded).collect();

    let candidates = match bound {
        ZoomBound::AtLeast(_) => including.into_iter().chain(excluding),
        ZoomBound::AtMost(_) => excluding.into_iter().chain(including),
    };

    for candidate in candidates {
        let zoom = zoom(engine, route, kind, &candidate)?.zoom;
        let hit = match bound {
            ZoomBound::AtLeast(limit) => zoom >= limit,
            ZoomBound::AtMost(limit) => zoom <= limit,
        };
        if hit {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

fn excluded(facet: &str) -> String {
    format!("{}{}", NEGATION_PREFIX, facet)
}

fn initial_size(engine: &mut ConsequenceEngine, kind: Weight) -> Result<usize> {
    match kind {
        Weight::Absolute => engine.count(&[]),
        Weight::FacetCounting => Ok(facets(engine, &[])?.len() * 2),
    }
}

/// Literal for `facet`, which must be undetermined under `route`
fn current_step(engine: &mut ConsequenceEngine, route: &[Literal], facet: &str) -> Result<Literal> {
    let step = resolver::literal(engine.session(), facet)?;
    let name = engine.session().atom_name(step)?.to_string();

    if !facets(engine, route)?.contains(&name) {
        return Err(AnalysisError::NotAFacet(facet.trim().to_string()));
    }
    Ok(step)
}

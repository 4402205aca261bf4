//! Grouping facets by the consequences they force

use super::consequences::ConsequenceEngine;
use super::resolver::literals_for;
use crate::asp::{AtomSet, Session};
use crate::error::{AnalysisError, Result};
use crate::program::Program;
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

/// Facets sharing one closure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageGroup {
    pub closure: AtomSet,
    pub facets: Vec<String>,
}

/// Partition of a facet list by closure, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct CoverageGroups {
    groups: Vec<CoverageGroup>,
    index: HashMap<AtomSet, usize>,
}

impl CoverageGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `facet` to the group keyed by `closure`
    pub fn insert(&mut self, closure: AtomSet, facet: impl Into<String>) {
        match self.index.get(&closure) {
            Some(&idx) => self.groups[idx].facets.push(facet.into()),
            None => {
                self.index.insert(closure.clone(), self.groups.len());
                self.groups.push(CoverageGroup {
                    closure,
                    facets: vec![facet.into()],
                });
            }
        }
    }

    pub fn get(&self, closure: &AtomSet) -> Option<&CoverageGroup> {
        self.index.get(closure).map(|&idx| &self.groups[idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CoverageGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn facet_count(&self) -> usize {
        self.groups.iter().map(|group| group.facets.len()).sum()
    }
}

impl PartialEq for CoverageGroups {
    fn eq(&self, other: &Self) -> bool {
        self.groups == other.groups
    }
}

impl Eq for CoverageGroups {}

impl<'a> IntoIterator for &'a CoverageGroups {
    type Item = &'a CoverageGroup;
    type IntoIter = std::slice::Iter<'a, CoverageGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Cautious consequences with every atom named `facet` assumed true
pub fn closure(engine: &mut ConsequenceEngine, facet: &str) -> Result<AtomSet> {
    let assumptions = literals_for(engine.session(), facet);
    if assumptions.is_empty() {
        debug!("facet `{}` names no atom, closing over the empty route", facet);
    }
    engine.cautious(&assumptions)
}

/// Group facets by their closure, one query per facet
pub fn group<I, S>(engine: &mut ConsequenceEngine, facets: I) -> Result<CoverageGroups>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups = CoverageGroups::new();
    for facet in facets {
        let facet = facet.as_ref();
        let closure = closure(engine, facet)?;
        debug!("closure of `{}` has {} atom(s)", facet, closure.len());
        groups.insert(closure, facet);
    }

    info!("{} facet(s) in {} group(s)", groups.facet_count(), groups.len());
    Ok(groups)
}

/// Like [`group`], with closures computed on `workers` threads.
///
/// Every worker loads its own session from `program`; sessions are never
/// shared between threads. The result equals the sequential grouping.
pub fn group_parallel(program: &Program, facets: &[String], workers: usize) -> Result<CoverageGroups> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| AnalysisError::Backend(format!("failed to start worker pool: {}", e)))?;

    let closures: Vec<AtomSet> = pool.install(|| {
        facets
            .par_iter()
            .map_init(
                || Session::new(program.clone()).map(ConsequenceEngine::new),
                |engine, facet| match engine {
                    Ok(engine) => closure(engine, facet),
                    Err(e) => Err(AnalysisError::Backend(format!(
                        "worker failed to load the program: {}",
                        e
                    ))),
                },
            )
            .collect::<Result<Vec<_>>>()
    })?;

    let mut groups = CoverageGroups::new();
    for (closure, facet) in closures.into_iter().zip(facets) {
        groups.insert(closure, facet.as_str());
    }

    info!(
        "{} facet(s) in {} group(s) using {} worker(s)",
        groups.facet_count(),
        groups.len(),
        workers
    );
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::extractor::facets;
    use crate::program::parse_program;

    fn set(names: &[&str]) -> AtomSet {
        names.iter().copied().collect()
    }

    const SCHEDULE: &str = "
        {mon; tue; wed}.
        :- mon, tue.  :- tue, wed.  :- mon, wed.
        :- not mon, not tue, not wed.
        early :- mon.  early :- tue.
        {coffee} :- early.
    ";

    #[test]
    fn test_optional_chain_groups() {
        let mut engine = ConsequenceEngine::from_source("a. {b}. {c} :- b.").unwrap();
        let facets = facets(&mut engine, &[]).unwrap();
        let groups = group(&mut engine, facets.iter()).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get(&set(&["a", "b"])).unwrap().facets, vec!["b"]);
        // c is only derivable together with b
        assert_eq!(groups.get(&set(&["a", "b", "c"])).unwrap().facets, vec!["c"]);
    }

    #[test]
    fn test_interchangeable_facets_share_a_group() {
        // p and q force each other
        let mut engine = ConsequenceEngine::from_source("{p}. q :- p. :- q, not p. {r}.").unwrap();
        let facets = facets(&mut engine, &[]).unwrap();
        let groups = group(&mut engine, facets.iter()).unwrap();

        let shared = groups.get(&set(&["p", "q"])).unwrap();
        assert_eq!(shared.facets, vec!["p", "q"]);
        assert_eq!(groups.get(&set(&["r"])).unwrap().facets, vec!["r"]);
    }

    #[test]
    fn test_groups_partition_the_facets() {
        let mut engine = ConsequenceEngine::from_source(SCHEDULE).unwrap();
        let facets = facets(&mut engine, &[]).unwrap();
        let groups = group(&mut engine, facets.iter()).unwrap();

        let mut grouped: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.facets.iter().map(String::as_str))
            .collect();
        grouped.sort();
        assert_eq!(grouped, facets.iter().collect::<Vec<_>>());
        assert_eq!(groups.facet_count(), facets.len());
    }

    #[test]
    fn test_unknown_facet_closes_over_empty_route() {
        let mut engine = ConsequenceEngine::from_source("a. {b}.").unwrap();
        let unconstrained = engine.cautious(&[]).unwrap();

        assert_eq!(closure(&mut engine, "nowhere").unwrap(), unconstrained);
        let groups = group(&mut engine, ["nowhere"]).unwrap();
        assert_eq!(groups.get(&set(&["a"])).unwrap().facets, vec!["nowhere"]);
    }

    #[test]
    fn test_closure_is_idempotent() {
        let mut engine = ConsequenceEngine::from_source(SCHEDULE).unwrap();
        let first = closure(&mut engine, "coffee").unwrap();
        let second = closure(&mut engine, "coffee").unwrap();

        assert_eq!(first, second);
        assert!(first.contains("early"));
    }

    #[test]
    fn test_insert_keeps_first_seen_order() {
        let mut groups = CoverageGroups::new();
        groups.insert(set(&["x"]), "f1");
        groups.insert(set(&["y"]), "f2");
        groups.insert(set(&["x"]), "f3");

        let order: Vec<_> = groups.iter().map(|g| g.facets.clone()).collect();
        assert_eq!(order, vec![vec!["f1", "f3"], vec!["f2"]]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let program = parse_program(SCHEDULE).unwrap();
        let mut engine = ConsequenceEngine::new(Session::new(program.clone()).unwrap());
        let facets: Vec<String> = facets(&mut engine, &[])
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();

        let sequential = group(&mut engine, &facets).unwrap();
        let parallel = group_parallel(&program, &facets, 3).unwrap();
        assert_eq!(sequential, parallel);
    }
}

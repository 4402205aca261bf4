//! End-to-end facet community analysis

use super::consequences::ConsequenceEngine;
use super::extractor::facets;
use super::grouper::{group, group_parallel, CoverageGroups};
use super::resolver::{self, Route};
use super::weights::{self, FacetWeight, Zoom};
use crate::asp::{AtomSet, Session};
use crate::config::Settings;
use crate::error::Result;
use crate::idmap::{load_id_map_from_file, IdMap};
use crate::program::load_program_from_file;
use crate::utils::ReportFormatter;
use log::{debug, info};
use std::time::{Duration, Instant};

/// Facets under a route and their coverage groups
#[derive(Debug, Clone)]
pub struct Analysis {
    pub facets: AtomSet,
    pub groups: CoverageGroups,
    pub elapsed: Duration,
}

/// A loaded program, its id map and the route to analyse under
pub struct Analyzer {
    settings: Settings,
    engine: ConsequenceEngine,
    id_map: IdMap,
    route: Route,
}

impl Analyzer {
    /// Load every input; malformed inputs fail here, before any query runs
    pub fn new(settings: Settings) -> Result<Self> {
        let program = load_program_from_file(&settings.input.program_file)?;
        let id_map = load_id_map_from_file(&settings.input.id_map_file)?;
        Self::with_inputs(settings, Session::new(program)?, id_map)
    }

    /// Build an analyzer from an already loaded session and id map
    pub fn with_inputs(settings: Settings, session: Session, id_map: IdMap) -> Result<Self> {
        let route = resolver::route(&session, &settings.analysis.route)?;
        Ok(Self {
            settings,
            engine: ConsequenceEngine::new(session),
            id_map,
            route,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn id_map(&self) -> &IdMap {
        &self.id_map
    }

    pub fn engine(&mut self) -> &mut ConsequenceEngine {
        &mut self.engine
    }

    /// Compute facets under the configured route and group them
    pub fn analyze(&mut self) -> Result<Analysis> {
        let start_time = Instant::now();

        let facets = facets(&mut self.engine, &self.route)?;
        info!(
            "{} facet(s) under a route of {} literal(s)",
            facets.len(),
            self.route.len()
        );

        let groups = if self.settings.analysis.parallel {
            let names: Vec<String> = facets.iter().map(str::to_string).collect();
            group_parallel(
                self.engine.session().program(),
                &names,
                self.settings.analysis.workers,
            )?
        } else {
            group(&mut self.engine, facets.iter())?
        };

        Ok(Analysis {
            facets,
            groups,
            elapsed: start_time.elapsed(),
        })
    }

    /// Weights of every current facet, measured as configured
    pub fn weights(&mut self) -> Result<Vec<FacetWeight>> {
        weights::weights(&mut self.engine, &self.route, self.settings.analysis.weight)
    }

    /// Zoom of stepping along `facet` (`f` or `~f`) from the configured route
    pub fn zoom(&mut self, facet: &str) -> Result<Zoom> {
        weights::zoom(&mut self.engine, &self.route, self.settings.analysis.weight, facet)
    }

    /// Analyse and render the configured report
    pub fn report(&mut self) -> Result<String> {
        let analysis = self.analyze()?;
        info!("analysis finished in {:.3}s", analysis.elapsed.as_secs_f64());
        debug!("{}", self.engine.session().statistics());

        ReportFormatter::render(
            &analysis.groups,
            &analysis.facets,
            &self.id_map,
            &self.settings.output.format,
            self.settings.output.show_facets,
        )
    }
}

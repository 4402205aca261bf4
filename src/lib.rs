//! Facet community analysis for answer set programs
//!
//! This library finds the facets of a ground logic program (atoms that hold in
//! some but not all stable models under a route) and groups them by the
//! cautious consequences each facet forces on its own.

pub mod asp;
pub mod config;
pub mod error;
pub mod facets;
pub mod idmap;
pub mod program;
pub mod utils;

pub use config::Settings;
pub use error::{AnalysisError, Result};
pub use facets::{Analysis, Analyzer, ConsequenceEngine, CoverageGroups};

/// Main entry point: analyse the configured inputs and render the report
pub fn run_analysis(settings: Settings) -> Result<String> {
    let mut analyzer = Analyzer::new(settings)?;
    analyzer.report()
}

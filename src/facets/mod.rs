//! Facets of a program and their coverage groups

pub mod analysis;
pub mod consequences;
pub mod extractor;
pub mod grouper;
pub mod resolver;
pub mod weights;

pub use analysis::{Analysis, Analyzer};
pub use consequences::ConsequenceEngine;
pub use extractor::facets;
pub use grouper::{closure, group, group_parallel, CoverageGroup, CoverageGroups};
pub use resolver::{literals_for, Route};
pub use weights::{FacetWeight, Weight, Zoom, ZoomBound};

//! Configuration management for facet analysis

pub mod settings;

pub use settings::{AnalysisConfig, CliOverrides, InputConfig, OutputConfig, OutputFormat, Settings};

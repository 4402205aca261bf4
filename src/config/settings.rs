//! Configuration settings for facet analysis

use crate::error::AnalysisError;
use crate::facets::Weight;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub input: InputConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub program_file: PathBuf,
    pub id_map_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Route elements; `~name` assumes the atom false
    #[serde(default)]
    pub route: Vec<String>,
    /// Compute closures on several independently loaded sessions
    #[serde(default)]
    pub parallel: bool,
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Measure for facet weights and zooms
    #[serde(default)]
    pub weight: Weight,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Print the facet codes before the groups
    #[serde(default)]
    pub show_facets: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            route: Vec::new(),
            parallel: false,
            workers: default_workers(),
            weight: Weight::default(),
        }
    }
}

impl Settings {
    /// Settings for a program and id map with everything else defaulted
    pub fn for_inputs(program_file: impl Into<PathBuf>, id_map_file: impl Into<PathBuf>) -> Self {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            program_file: Some(program_file.into()),
            id_map_file: Some(id_map_file.into()),
        });
        settings
    }

    /// Load settings from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Missing inputs are reported as [`AnalysisError::Io`]
    pub fn validate(&self) -> Result<()> {
        for path in [&self.input.program_file, &self.input.id_map_file] {
            if !path.is_file() {
                return Err(AnalysisError::Io {
                    path: path.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
                }
                .into());
            }
        }

        if self.analysis.parallel && self.analysis.workers == 0 {
            anyhow::bail!("Parallel analysis needs at least one worker");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref program_file) = cli_overrides.program_file {
            self.input.program_file = program_file.clone();
        }
        if let Some(ref id_map_file) = cli_overrides.id_map_file {
            self.input.id_map_file = id_map_file.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub program_file: Option<PathBuf>,
    pub id_map_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.analysis.route.is_empty());
        assert!(!settings.analysis.parallel);
        assert!(settings.analysis.workers >= 1);
        assert_eq!(settings.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_yaml_round_trip_and_partial_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config/analysis.yaml");

        let mut settings = Settings::for_inputs("rules.lp", "rules.map");
        settings.analysis.route = vec!["~b".to_string()];
        settings.analysis.weight = Weight::FacetCounting;
        settings.output.format = OutputFormat::Json;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.input.program_file, PathBuf::from("rules.lp"));
        assert_eq!(loaded.analysis.route, vec!["~b"]);
        assert_eq!(loaded.analysis.weight, Weight::FacetCounting);
        assert_eq!(loaded.output.format, OutputFormat::Json);

        let minimal = dir.path().join("minimal.yaml");
        std::fs::write(&minimal, "input:\n  program_file: a.lp\n  id_map_file: a.map\n").unwrap();
        let loaded = Settings::from_file(&minimal).unwrap();
        assert!(!loaded.output.show_facets);
        assert!(loaded.analysis.workers >= 1);
        assert_eq!(loaded.analysis.weight, Weight::Absolute);
    }

    #[test]
    fn test_validate_checks_inputs() {
        let dir = tempdir().unwrap();
        let program = dir.path().join("p.lp");
        let id_map = dir.path().join("p.map");
        std::fs::write(&program, "a.").unwrap();

        let settings = Settings::for_inputs(&program, &id_map);
        let err = settings.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::Io { path, .. }) if path == &id_map
        ));

        std::fs::write(&id_map, "c 1 a\n").unwrap();
        assert!(settings.validate().is_ok());

        let mut parallel = settings.clone();
        parallel.analysis.parallel = true;
        parallel.analysis.workers = 0;
        assert!(parallel.validate().is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let mut settings = Settings::for_inputs("a.lp", "a.map");
        settings.merge_with_cli(&CliOverrides {
            program_file: Some(PathBuf::from("b.lp")),
            id_map_file: None,
        });
        assert_eq!(settings.input.program_file, PathBuf::from("b.lp"));
        assert_eq!(settings.input.id_map_file, PathBuf::from("a.map"));
    }
}

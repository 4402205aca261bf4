//! Rendering coverage groups as text or JSON

use crate::asp::AtomSet;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::facets::{CoverageGroup, CoverageGroups};
use crate::idmap::IdMap;
use itertools::Itertools;
use serde::Serialize;

/// One group with every atom translated to its code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    pub facets: Vec<i64>,
    pub closure: Vec<i64>,
    pub facet_names: Vec<String>,
    pub closure_names: Vec<String>,
}

impl GroupReport {
    pub fn from_group(group: &CoverageGroup, id_map: &IdMap) -> Result<Self> {
        Ok(Self {
            facets: id_map.remap_all(group.facets.iter().map(String::as_str))?,
            closure: id_map.remap_all(group.closure.iter())?,
            facet_names: group.facets.clone(),
            closure_names: group.closure.iter().map(str::to_string).collect(),
        })
    }
}

/// Formats analysis results for output
pub struct ReportFormatter;

impl ReportFormatter {
    /// Render every group; nothing is returned unless all atoms have a code
    pub fn render(
        groups: &CoverageGroups,
        facets: &AtomSet,
        id_map: &IdMap,
        format: &OutputFormat,
        show_facets: bool,
    ) -> Result<String> {
        let reports = groups
            .iter()
            .map(|group| GroupReport::from_group(group, id_map))
            .collect::<Result<Vec<_>>>()?;

        match format {
            OutputFormat::Text => {
                let mut output = String::new();
                if show_facets {
                    output.push_str(&Self::format_codes(&id_map.remap_all(facets.iter())?));
                    output.push_str("\n\n");
                }
                output.push_str(&Self::format_text(&reports));
                Ok(output)
            }
            OutputFormat::Json => Self::format_json(&reports, show_facets.then_some(facets)),
        }
    }

    /// Facet line, closure line, blank line per group
    pub fn format_text(reports: &[GroupReport]) -> String {
        let mut output = String::new();
        for report in reports {
            output.push_str(&Self::format_codes(&report.facets));
            output.push('\n');
            output.push_str(&Self::format_codes(&report.closure));
            output.push_str("\n\n");
        }
        output
    }

    pub fn format_json(reports: &[GroupReport], facets: Option<&AtomSet>) -> Result<String> {
        #[derive(Serialize)]
        struct JsonReport<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            facets: Option<&'a AtomSet>,
            groups: &'a [GroupReport],
        }

        let mut output = serde_json::to_string_pretty(&JsonReport {
            facets,
            groups: reports,
        })?;
        output.push('\n');
        Ok(output)
    }

    pub fn format_codes(codes: &[i64]) -> String {
        codes.iter().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> AtomSet {
        names.iter().copied().collect()
    }

    fn sample() -> (CoverageGroups, AtomSet, IdMap) {
        let mut groups = CoverageGroups::new();
        groups.insert(set(&["a", "b"]), "b");
        groups.insert(set(&["a", "b", "c"]), "c");
        let facets = set(&["b", "c"]);
        let id_map: IdMap = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        (groups, facets, id_map)
    }

    #[test]
    fn test_text_layout() {
        let (groups, facets, id_map) = sample();
        let text =
            ReportFormatter::render(&groups, &facets, &id_map, &OutputFormat::Text, false).unwrap();
        assert_eq!(text, "2\n1 2\n\n3\n1 2 3\n\n");
    }

    #[test]
    fn test_text_with_facet_line() {
        let (groups, facets, id_map) = sample();
        let text =
            ReportFormatter::render(&groups, &facets, &id_map, &OutputFormat::Text, true).unwrap();
        assert!(text.starts_with("2 3\n\n2\n"));
    }

    #[test]
    fn test_negated_atoms_get_negative_codes() {
        let mut groups = CoverageGroups::new();
        groups.insert(set(&["-a"]), "-a");
        let id_map: IdMap = [("a", 4)].into_iter().collect();

        let text = ReportFormatter::render(
            &groups,
            &set(&["-a"]),
            &id_map,
            &OutputFormat::Text,
            false,
        )
        .unwrap();
        assert_eq!(text, "-4\n-4\n\n");
    }

    #[test]
    fn test_missing_code_renders_nothing() {
        let (groups, facets, _) = sample();
        let partial: IdMap = [("a", 1), ("b", 2)].into_iter().collect();
        assert!(
            ReportFormatter::render(&groups, &facets, &partial, &OutputFormat::Text, false).is_err()
        );
    }

    #[test]
    fn test_json_output() {
        let (groups, facets, id_map) = sample();
        let json =
            ReportFormatter::render(&groups, &facets, &id_map, &OutputFormat::Json, true).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["facets"], serde_json::json!(["b", "c"]));
        assert_eq!(value["groups"][1]["closure"], serde_json::json!([1, 2, 3]));
        assert_eq!(value["groups"][0]["facet_names"], serde_json::json!(["b"]));
    }

    #[test]
    fn test_empty_closure_prints_empty_line() {
        assert_eq!(
            ReportFormatter::format_text(&[GroupReport {
                facets: vec![5],
                closure: vec![],
                facet_names: vec!["e".to_string()],
                closure_names: vec![],
            }]),
            "5\n\n\n"
        );
    }
}

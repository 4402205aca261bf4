//! Reading id maps from DIMACS-style comment lines
//!
//! A line `c <code> <name>` maps `name` to `code`. Other lines, including
//! free-text comments whose first token is not an integer, are ignored. When
//! a name is declared twice the last declaration wins.

use super::IdMap;
use crate::error::{AnalysisError, Result};
use log::{debug, warn};
use std::path::Path;

/// Comment marker introducing a mapping line
pub const COMMENT_MARKER: &str = "c";

pub fn load_id_map_from_file<P: AsRef<Path>>(path: P) -> Result<IdMap> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let map = parse_id_map_named(&content, &path.display().to_string())?;
    debug!("loaded {} id map entries from {}", map.len(), path.display());
    Ok(map)
}

pub fn parse_id_map(content: &str) -> Result<IdMap> {
    parse_id_map_named(content, "<id map>")
}

fn parse_id_map_named(content: &str, origin: &str) -> Result<IdMap> {
    let mut map = IdMap::new();

    for (idx, line) in content.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some(COMMENT_MARKER) {
            continue;
        }

        let Some(code) = tokens.next().and_then(|token| token.parse::<i64>().ok()) else {
            continue;
        };
        let name = tokens.next().ok_or_else(|| {
            AnalysisError::malformed(origin, idx + 1, format!("code {} has no atom name", code))
        })?;
        if code <= 0 {
            return Err(AnalysisError::malformed(
                origin,
                idx + 1,
                format!("code {} of `{}` must be positive", code, name),
            ));
        }

        if let Some(previous) = map.insert(name, code) {
            warn!(
                "{}:{}: `{}` remapped from {} to {}",
                origin,
                idx + 1,
                name,
                previous,
                code
            );
        }
    }

    Ok(map)
}

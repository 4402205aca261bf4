//! Error taxonomy for facet analysis

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The assumption set admits no stable model.
    #[error("no solution exists under {assumptions} assumption(s)")]
    Unsatisfiable { assumptions: usize },

    /// An atom of the program has no code in the id map.
    #[error("atom `{0}` has no entry in the id map")]
    Lookup(String),

    /// A route element names an atom the program never derives.
    #[error("unknown atom `{0}` in route")]
    UnknownAtom(String),

    /// A step is only defined for atoms the route leaves open.
    #[error("`{0}` is not a facet under the current route")]
    NotAFacet(String),

    #[error("{origin}:{line}: {message}")]
    MalformedInput {
        origin: String,
        line: usize,
        message: String,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The SAT backend was interrupted or misused.
    #[error("reasoning backend failure: {0}")]
    Backend(String),
}

impl AnalysisError {
    pub(crate) fn malformed(origin: &str, line: usize, message: impl Into<String>) -> Self {
        AnalysisError::MalformedInput {
            origin: origin.to_string(),
            line,
            message: message.into(),
        }
    }

    /// True for the conditions that stem from the inputs rather than the backend.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::Lookup(_)
                | AnalysisError::UnknownAtom(_)
                | AnalysisError::NotAFacet(_)
                | AnalysisError::MalformedInput { .. }
                | AnalysisError::Io { .. }
        )
    }
}

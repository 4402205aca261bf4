//! Brave and cautious consequences of a loaded program

use crate::asp::{AtomSet, EnumMode, Literal, Session};
use crate::error::{AnalysisError, Result};
use std::path::Path;

/// Answers consequence queries against one session.
///
/// Queries run one at a time; `&mut self` keeps two of them from sharing the
/// session's enumeration mode.
pub struct ConsequenceEngine {
    session: Session,
}

impl ConsequenceEngine {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Session::load(path).map(Self::new)
    }

    pub fn from_source(source: &str) -> Result<Self> {
        Session::from_source(source).map(Self::new)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Atoms true in at least one stable model under `route`
    pub fn brave(&mut self, route: &[Literal]) -> Result<AtomSet> {
        self.consequences(EnumMode::Brave, route)
    }

    /// Atoms true in every stable model under `route`
    pub fn cautious(&mut self, route: &[Literal]) -> Result<AtomSet> {
        self.consequences(EnumMode::Cautious, route)
    }

    fn consequences(&mut self, mode: EnumMode, route: &[Literal]) -> Result<AtomSet> {
        let mut guard = self.session.scoped_mode(mode);
        let mut last = None;
        guard.solve(route, |model| last = Some(model.clone()))?;

        last.ok_or(AnalysisError::Unsatisfiable {
            assumptions: route.len(),
        })
    }

    pub fn satisfiable(&mut self, route: &[Literal]) -> Result<bool> {
        Ok(self.find_one(route)?.is_some())
    }

    /// Some stable model under `route`
    pub fn find_one(&mut self, route: &[Literal]) -> Result<Option<AtomSet>> {
        // cautious enumeration reports the first model before narrowing it
        let mut guard = self.session.scoped_mode(EnumMode::Cautious);
        let mut first = None;
        guard.solve(route, |model| {
            if first.is_none() {
                first = Some(model.clone());
            }
        })?;
        Ok(first)
    }

    /// Every stable model under `route`
    pub fn models(&mut self, route: &[Literal]) -> Result<Vec<AtomSet>> {
        let mut guard = self.session.scoped_mode(EnumMode::Auto);
        let mut models = Vec::new();
        guard.solve(route, |model| models.push(model.clone()))?;
        Ok(models)
    }

    pub fn count(&mut self, route: &[Literal]) -> Result<usize> {
        let mut guard = self.session.scoped_mode(EnumMode::Auto);
        guard.solve(route, |_| {})
    }
}

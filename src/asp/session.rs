//! A loaded program and its solver state
//!
//! The session owns the translated program and a session-wide enumeration
//! mode. In [`EnumMode::Brave`] every reported model is the union of all
//! stable models found so far, in [`EnumMode::Cautious`] the intersection, so
//! the last reported model of a run is the full brave or cautious answer.

use super::constraints::{Clause, CompletionEncoder};
use super::solver::{SatSolver, SolverStatistics};
use super::symbols::{AtomSet, SymbolicAtom};
use super::variables::Literal;
use crate::error::{AnalysisError, Result};
use crate::program::{load_program_from_file, parse_program, Program};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// How `Session::solve` reports models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumMode {
    /// Every stable model, once
    #[default]
    Auto,
    /// Running union of stable models
    Brave,
    /// Running intersection of stable models
    Cautious,
}

pub struct Session {
    program: Program,
    encoder: CompletionEncoder,
    solver: SatSolver,
    symbolic_atoms: Vec<SymbolicAtom>,
    mode: EnumMode,
    loop_nogoods: usize,
}

impl Session {
    /// Translate a program and load it into a fresh solver
    pub fn new(program: Program) -> Result<Self> {
        let mut encoder = CompletionEncoder::new(&program);
        let clauses = encoder.generate_all_constraints(&program)?;

        let mut solver = SatSolver::new();
        solver.add_clauses(&clauses)?;

        let symbolic_atoms = program
            .derivable_atoms()
            .into_iter()
            .map(|atom| SymbolicAtom {
                name: program.atom_name(atom).to_string(),
                literal: encoder.variable_manager().atom_literal(atom),
            })
            .collect();

        debug!(
            "session ready: {} clauses over {} variables",
            solver.clause_count(),
            encoder.variable_manager().variable_count()
        );

        Ok(Self {
            program,
            encoder,
            solver,
            symbolic_atoms,
            mode: EnumMode::Auto,
            loop_nogoods: 0,
        })
    }

    pub fn from_source(source: &str) -> Result<Self> {
        Self::new(parse_program(source)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(load_program_from_file(path)?)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Atoms the program can derive, with their literals
    pub fn symbolic_atoms(&self) -> &[SymbolicAtom] {
        &self.symbolic_atoms
    }

    pub fn enum_mode(&self) -> EnumMode {
        self.mode
    }

    /// Switch the enumeration mode until the returned guard is dropped
    pub fn scoped_mode(&mut self, mode: EnumMode) -> ModeGuard<'_> {
        trace!("enumeration mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        ModeGuard { session: self }
    }

    /// Enumerate under `assumptions` in the current mode.
    ///
    /// Calls `on_model` for each reported model and returns how many were
    /// reported; zero means the assumptions are unsatisfiable.
    pub fn solve<F>(&mut self, assumptions: &[Literal], mut on_model: F) -> Result<usize>
    where
        F: FnMut(&AtomSet),
    {
        let selector = self.encoder.variable_manager_mut().fresh_selector()?;
        let mut sat_assumptions: Vec<i32> = assumptions.iter().map(|l| l.get_integer()).collect();
        sat_assumptions.push(selector);

        let result = match self.mode {
            EnumMode::Auto => self.enumerate_all(&sat_assumptions, selector, &mut on_model),
            EnumMode::Brave => self.enumerate_brave(&sat_assumptions, selector, &mut on_model),
            EnumMode::Cautious => self.enumerate_cautious(&sat_assumptions, selector, &mut on_model),
        };

        // the enumeration clauses of this run must not constrain later runs
        let retired = self.solver.add_clause(&Clause::unit(-selector));
        let reported = result?;
        retired?;

        debug!(
            "{:?} enumeration under {} assumption(s): {} model(s)",
            self.mode,
            assumptions.len(),
            reported
        );
        Ok(reported)
    }

    fn enumerate_all(
        &mut self,
        assumptions: &[i32],
        selector: i32,
        on_model: &mut dyn FnMut(&AtomSet),
    ) -> Result<usize> {
        let mut reported = 0;
        while let Some(model) = self.next_stable_model(assumptions)? {
            on_model(&self.atom_set(&model));
            reported += 1;

            let mut blocking = vec![-selector];
            blocking.extend(model.iter().enumerate().map(|(atom, &value)| {
                let var = self.encoder.variable_manager().atom_variable(atom);
                if value {
                    -var
                } else {
                    var
                }
            }));
            self.solver.add_clause(&Clause::new(blocking))?;
        }
        Ok(reported)
    }

    fn enumerate_brave(
        &mut self,
        assumptions: &[i32],
        selector: i32,
        on_model: &mut dyn FnMut(&AtomSet),
    ) -> Result<usize> {
        let mut union = vec![false; self.program.atom_count()];
        let mut reported = 0;

        while let Some(model) = self.next_stable_model(assumptions)? {
            for (acc, value) in union.iter_mut().zip(&model) {
                *acc |= *value;
            }
            on_model(&self.atom_set(&union));
            reported += 1;

            // the next model must add an atom outside the union
            let outside: Vec<i32> = union
                .iter()
                .enumerate()
                .filter(|(_, &value)| !value)
                .map(|(atom, _)| self.encoder.variable_manager().atom_variable(atom))
                .collect();
            if outside.is_empty() {
                break;
            }
            let mut clause = vec![-selector];
            clause.extend(outside);
            self.solver.add_clause(&Clause::new(clause))?;
        }
        Ok(reported)
    }

    fn enumerate_cautious(
        &mut self,
        assumptions: &[i32],
        selector: i32,
        on_model: &mut dyn FnMut(&AtomSet),
    ) -> Result<usize> {
        let mut common: Option<Vec<bool>> = None;
        let mut reported = 0;

        while let Some(model) = self.next_stable_model(assumptions)? {
            let current = match common.take() {
                Some(previous) => previous.iter().zip(&model).map(|(a, b)| *a && *b).collect(),
                None => model,
            };
            on_model(&self.atom_set(&current));
            reported += 1;

            // the next model must drop an atom of the intersection
            let inside: Vec<i32> = current
                .iter()
                .enumerate()
                .filter(|(_, &value)| value)
                .map(|(atom, _)| -self.encoder.variable_manager().atom_variable(atom))
                .collect();
            if inside.is_empty() {
                break;
            }
            let mut clause = vec![-selector];
            clause.extend(inside);
            self.solver.add_clause(&Clause::new(clause))?;
            common = Some(current);
        }
        Ok(reported)
    }

    /// Next stable model under the assumptions, as atom truth values
    fn next_stable_model(&mut self, assumptions: &[i32]) -> Result<Option<Vec<bool>>> {
        loop {
            if !self.solver.solve_with(assumptions)? {
                return Ok(None);
            }

            let model: Vec<bool> = (0..self.program.atom_count())
                .map(|atom| {
                    self.solver
                        .value(self.encoder.variable_manager().atom_variable(atom))
                })
                .collect();

            let unfounded = self.program.unfounded_atoms(&model);
            if unfounded.is_empty() {
                return Ok(Some(model));
            }

            trace!("unfounded set of {} atom(s), adding loop nogoods", unfounded.len());
            let nogoods = self.encoder.loop_nogoods(&self.program, &unfounded)?;
            self.solver.add_clauses(&nogoods)?;
            self.loop_nogoods += 1;
        }
    }

    fn atom_set(&self, values: &[bool]) -> AtomSet {
        values
            .iter()
            .enumerate()
            .filter(|(_, &value)| value)
            .map(|(atom, _)| self.program.atom_name(atom))
            .collect()
    }

    /// Atom name of a literal produced by this session
    pub fn atom_name(&self, literal: Literal) -> Result<&str> {
        self.encoder
            .variable_manager()
            .atom_of(literal)
            .map(|atom| self.program.atom_name(atom))
            .ok_or_else(|| {
                AnalysisError::Backend(format!(
                    "literal {} does not belong to this session",
                    literal.get_integer()
                ))
            })
    }

    pub fn statistics(&self) -> SessionStatistics {
        SessionStatistics {
            program: self.program.statistics().to_string(),
            solver: self.solver.statistics(),
            loop_nogoods: self.loop_nogoods,
        }
    }
}

/// Keeps a session in a temporary enumeration mode.
///
/// Dropping the guard puts the session back into [`EnumMode::Auto`], on the
/// error path as well as on success.
pub struct ModeGuard<'a> {
    session: &'a mut Session,
}

impl Deref for ModeGuard<'_> {
    type Target = Session;

    fn deref(&self) -> &Session {
        self.session
    }
}

impl DerefMut for ModeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Session {
        self.session
    }
}

impl Drop for ModeGuard<'_> {
    fn drop(&mut self) {
        trace!("enumeration mode {:?} -> Auto", self.session.mode);
        self.session.mode = EnumMode::Auto;
    }
}

/// Statistics about a session
#[derive(Debug, Clone)]
pub struct SessionStatistics {
    pub program: String,
    pub solver: SolverStatistics,
    pub loop_nogoods: usize,
}

impl std::fmt::Display for SessionStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Program: {}", self.program)?;
        write!(f, "{}", self.solver)?;
        writeln!(f, "  Loop nogood rounds: {}", self.loop_nogoods)?;
        Ok(())
    }
}

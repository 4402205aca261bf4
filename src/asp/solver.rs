//! SAT solver integration using CaDiCaL

use super::constraints::Clause;
use crate::error::{AnalysisError, Result};
use cadical::Solver;
use std::time::{Duration, Instant};

/// SAT solver wrapper for CaDiCaL
pub struct SatSolver {
    solver: Solver,
    variable_count: usize,
    clause_count: usize,
    solve_calls: usize,
    solve_time: Duration,
}

/// Statistics about the solving process
#[derive(Debug, Clone)]
pub struct SolverStatistics {
    pub variable_count: usize,
    pub clause_count: usize,
    pub solve_calls: usize,
    pub solve_time: Duration,
}

impl SatSolver {
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            variable_count: 0,
            clause_count: 0,
            solve_calls: 0,
            solve_time: Duration::ZERO,
        }
    }

    pub fn add_clauses(&mut self, clauses: &[Clause]) -> Result<()> {
        for clause in clauses {
            self.add_clause(clause)?;
        }
        Ok(())
    }

    pub fn add_clause(&mut self, clause: &Clause) -> Result<()> {
        if clause.is_empty() {
            return Err(AnalysisError::Backend(
                "cannot add empty clause (unsatisfiable)".to_string(),
            ));
        }

        for &literal in &clause.literals {
            let var = literal.unsigned_abs() as usize;
            if var > self.variable_count {
                self.variable_count = var;
            }
        }

        self.solver.add_clause(clause.literals.iter().copied());

        self.clause_count += 1;
        Ok(())
    }

    /// Solve under assumptions; `Ok(true)` when satisfiable
    pub fn solve_with(&mut self, assumptions: &[i32]) -> Result<bool> {
        let start_time = Instant::now();
        let result = self.solver.solve_with(assumptions.iter().copied());
        self.solve_time += start_time.elapsed();
        self.solve_calls += 1;

        result.ok_or_else(|| AnalysisError::Backend("SAT solver was interrupted".to_string()))
    }

    /// Value of a variable in the last model; unassigned variables read as false
    pub fn value(&self, var: i32) -> bool {
        self.solver.value(var).unwrap_or(false)
    }

    pub fn statistics(&self) -> SolverStatistics {
        SolverStatistics {
            variable_count: self.variable_count,
            clause_count: self.clause_count,
            solve_calls: self.solve_calls,
            solve_time: self.solve_time,
        }
    }

    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn clause_count(&self) -> usize {
        self.clause_count
    }
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Solver Statistics:")?;
        writeln!(f, "  Variables: {}", self.variable_count)?;
        writeln!(f, "  Clauses: {}", self.clause_count)?;
        writeln!(f, "  Solve calls: {}", self.solve_calls)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        Ok(())
    }
}

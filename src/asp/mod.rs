//! Stable model reasoning on top of a SAT solver

pub mod constraints;
pub mod session;
pub mod solver;
pub mod symbols;
pub mod variables;

pub use constraints::{Clause, CompletionEncoder};
pub use session::{EnumMode, ModeGuard, Session, SessionStatistics};
pub use solver::{SatSolver, SolverStatistics};
pub use symbols::{AtomSet, SymbolicAtom};
pub use variables::{Literal, VariableManager};

//! Ground logic programs: representation and parsing

pub mod parser;
pub mod rules;

pub use parser::{load_program_from_file, parse_atom, parse_program};
pub use rules::{Head, Program, ProgramStatistics, Rule};

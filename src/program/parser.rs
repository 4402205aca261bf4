//! Reading ground logic programs from text
//!
//! Supported statements (each terminated by `.`):
//!
//! ```text
//! a.                      fact
//! h :- b, not c.          normal rule
//! {h1; h2} :- b.          choice rule
//! :- a, b.                integrity constraint
//! ```
//!
//! `%` starts a line comment and `%* ... *%` encloses a block comment. Atoms
//! are ground: a lowercase identifier with an optional argument list of
//! constants, numbers, strings (with `\` escapes) or nested terms. A leading
//! `-` marks classical negation. `#show` directives are accepted and ignored;
//! every other directive (`#const`, `#include`, ...) is rejected, as are
//! variables, cardinality bounds and disjunctive heads.

use super::rules::{Head, Program, Rule};
use crate::error::{AnalysisError, Result};
use log::debug;
use pest::Parser;
use std::path::Path;

mod grammar {
    #[derive(pest_derive::Parser)]
    #[grammar = "program/program.pest"]
    pub struct ProgramParser;
}

use grammar::{ProgramParser, Rule as Syntax};

type Pair<'a> = pest::iterators::Pair<'a, Syntax>;

/// Load a program from a file
pub fn load_program_from_file<P: AsRef<Path>>(path: P) -> Result<Program> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let program = parse_program_named(&content, &path.display().to_string())?;
    debug!("loaded {}: {}", path.display(), program.statistics());
    Ok(program)
}

/// Parse a program from its textual representation
pub fn parse_program(source: &str) -> Result<Program> {
    parse_program_named(source, "<program>")
}

/// Canonical (whitespace free) name of a single atom such as `p( 1, "a b" )`
pub fn parse_atom(text: &str) -> Result<String> {
    let origin = "<atom>";
    let lone = ProgramParser::parse(Syntax::lone_atom, text.trim())
        .map_err(|e| syntax_error(e, origin))?
        .next()
        .and_then(|pair| pair.into_inner().next())
        .ok_or_else(|| AnalysisError::malformed(origin, 1, "expected an atom"))?;

    atom_name(lone).map_err(|(line, message)| AnalysisError::malformed(origin, line, message))
}

fn parse_program_named(source: &str, origin: &str) -> Result<Program> {
    let statements = ProgramParser::parse(Syntax::program, source)
        .map_err(|e| syntax_error(e, origin))?
        .next()
        .ok_or_else(|| AnalysisError::malformed(origin, 1, "empty parse"))?;

    let mut program = Program::new();
    for statement in statements.into_inner() {
        match statement.as_rule() {
            Syntax::show | Syntax::EOI => {}
            Syntax::constraint | Syntax::rule => {
                let rule = build_rule(statement, &mut program)
                    .map_err(|(line, message)| AnalysisError::malformed(origin, line, message))?;
                program.add_rule(rule);
            }
            other => {
                return Err(AnalysisError::malformed(
                    origin,
                    line_of(&statement),
                    format!("unexpected {:?}", other),
                ))
            }
        }
    }

    program.add_classical_negation_constraints();
    Ok(program)
}

fn syntax_error(error: pest::error::Error<Syntax>, origin: &str) -> AnalysisError {
    let line = match error.line_col {
        pest::error::LineColLocation::Pos((line, _)) => line,
        pest::error::LineColLocation::Span((line, _), _) => line,
    };
    let error = error.renamed_rules(|kind| match kind {
        Syntax::EOI => "end of input".to_string(),
        Syntax::rule | Syntax::constraint | Syntax::show => "statement".to_string(),
        Syntax::choice => "choice head".to_string(),
        Syntax::body => "rule body".to_string(),
        Syntax::atom | Syntax::lone_atom => "atom".to_string(),
        Syntax::negated | Syntax::not_keyword => "negated atom".to_string(),
        Syntax::arguments => "argument list".to_string(),
        Syntax::function | Syntax::number | Syntax::string | Syntax::variable => {
            "term".to_string()
        }
        other => format!("{:?}", other),
    });
    AnalysisError::malformed(origin, line, error.variant.message())
}

/// Errors while building carry the line of the offending pair
type BuildResult<T> = std::result::Result<T, (usize, String)>;

fn line_of(pair: &Pair<'_>) -> usize {
    pair.as_span().start_pos().line_col().0
}

fn build_rule(statement: Pair<'_>, program: &mut Program) -> BuildResult<Rule> {
    let is_constraint = statement.as_rule() == Syntax::constraint;
    let mut head = Head::Falsum;
    let mut positive = Vec::new();
    let mut negative = Vec::new();

    for part in statement.into_inner() {
        match part.as_rule() {
            Syntax::atom if !is_constraint => {
                head = Head::Atom(program.intern(&atom_name(part)?));
            }
            Syntax::choice => {
                let atoms = part
                    .into_inner()
                    .map(|atom| atom_name(atom).map(|name| program.intern(&name)))
                    .collect::<BuildResult<Vec<_>>>()?;
                head = Head::Choice(atoms);
            }
            Syntax::body => {
                for literal in part.into_inner() {
                    match literal.as_rule() {
                        Syntax::negated => {
                            let line = line_of(&literal);
                            let atom = literal
                                .into_inner()
                                .find(|p| p.as_rule() == Syntax::atom)
                                .ok_or_else(|| (line, "negation without an atom".to_string()))?;
                            negative.push(program.intern(&atom_name(atom)?));
                        }
                        _ => positive.push(program.intern(&atom_name(literal)?)),
                    }
                }
            }
            other => return Err((line_of(&part), format!("unexpected {:?}", other))),
        }
    }

    Ok(Rule {
        head,
        positive,
        negative,
    })
}

fn atom_name(atom: Pair<'_>) -> BuildResult<String> {
    let mut name = String::new();
    for part in atom.into_inner() {
        match part.as_rule() {
            Syntax::classical => name.push('-'),
            Syntax::identifier => name.push_str(part.as_str()),
            Syntax::arguments => push_arguments(part, &mut name)?,
            _ => {}
        }
    }
    Ok(name)
}

fn push_arguments(arguments: Pair<'_>, out: &mut String) -> BuildResult<()> {
    out.push('(');
    for (idx, term) in arguments.into_inner().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        match term.as_rule() {
            Syntax::variable => {
                return Err((
                    line_of(&term),
                    format!("variable `{}` in a ground program", term.as_str()),
                ))
            }
            Syntax::function => {
                for part in term.into_inner() {
                    match part.as_rule() {
                        Syntax::arguments => push_arguments(part, out)?,
                        _ => out.push_str(part.as_str()),
                    }
                }
            }
            _ => out.push_str(term.as_str()),
        }
    }
    out.push(')');
    Ok(())
}

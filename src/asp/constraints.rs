//! Clause generation for the stable model translation
//!
//! A ground program is translated into its Clark completion. Models of the
//! completion that are not stable are ruled out later, one unfounded set at a
//! time, with [`CompletionEncoder::loop_nogoods`].

use super::variables::VariableManager;
use crate::error::Result;
use crate::program::{Head, Program};

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    pub fn unit(literal: i32) -> Self {
        Self {
            literals: vec![literal],
        }
    }

    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self {
            literals: vec![lit1, lit2],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }
}

/// Generates the completion clauses of a program
#[derive(Debug)]
pub struct CompletionEncoder {
    variable_manager: VariableManager,
    /// Rules with the atom in their head, per atom
    supports: Vec<Vec<usize>>,
}

impl CompletionEncoder {
    pub fn new(program: &Program) -> Self {
        let mut supports = vec![Vec::new(); program.atom_count()];
        for (rule_idx, rule) in program.rules().iter().enumerate() {
            for &atom in rule.heads() {
                supports[atom].push(rule_idx);
            }
        }

        Self {
            variable_manager: VariableManager::new(program.atom_count(), program.rules().len()),
            supports,
        }
    }

    pub fn variable_manager(&self) -> &VariableManager {
        &self.variable_manager
    }

    pub fn variable_manager_mut(&mut self) -> &mut VariableManager {
        &mut self.variable_manager
    }

    /// Generate all completion clauses for the program
    pub fn generate_all_constraints(&mut self, program: &Program) -> Result<Vec<Clause>> {
        let mut clauses = Vec::new();

        // 1. Body definitions and rule implications
        for rule_idx in 0..program.rules().len() {
            clauses.extend(self.generate_rule_constraints(program, rule_idx)?);
        }

        // 2. Every true atom needs a rule with a true body
        for atom in 0..program.atom_count() {
            clauses.push(self.generate_support_constraint(atom)?);
        }

        Ok(clauses)
    }

    /// `b <-> (p1 & .. & pn & !n1 & .. & !nm)` plus the head implication
    fn generate_rule_constraints(&mut self, program: &Program, rule_idx: usize) -> Result<Vec<Clause>> {
        let rule = &program.rules()[rule_idx];
        let body = self.variable_manager.body_variable(rule_idx)?;
        let mut clauses = Vec::new();

        let body_literals: Vec<i32> = rule
            .positive
            .iter()
            .map(|&atom| self.variable_manager.atom_variable(atom))
            .chain(
                rule.negative
                    .iter()
                    .map(|&atom| -self.variable_manager.atom_variable(atom)),
            )
            .collect();

        // b -> l for every body literal
        for &lit in &body_literals {
            clauses.push(Clause::binary(-body, lit));
        }

        // (l1 & .. & lk) -> b
        let mut definition = vec![body];
        definition.extend(body_literals.iter().map(|&lit| -lit));
        clauses.push(Clause::new(definition));

        match &rule.head {
            Head::Atom(atom) => {
                clauses.push(Clause::binary(-body, self.variable_manager.atom_variable(*atom)));
            }
            Head::Falsum => clauses.push(Clause::unit(-body)),
            Head::Choice(_) => {}
        }

        Ok(clauses)
    }

    /// `a -> b1 | .. | bk` over the bodies of rules deriving `a`
    fn generate_support_constraint(&mut self, atom: usize) -> Result<Clause> {
        let mut literals = vec![-self.variable_manager.atom_variable(atom)];
        for &rule_idx in &self.supports[atom] {
            literals.push(self.variable_manager.body_variable(rule_idx)?);
        }
        Ok(Clause::new(literals))
    }

    /// Nogoods forbidding `unfounded` to hold without external support.
    ///
    /// For each atom `u` of the set: `u -> b1 | .. | bk` where the `bi` are the
    /// bodies of rules deriving an atom of the set whose positive body avoids
    /// the set. Every stable model satisfies these clauses.
    pub fn loop_nogoods(&mut self, program: &Program, unfounded: &[usize]) -> Result<Vec<Clause>> {
        let mut in_set = vec![false; program.atom_count()];
        for &atom in unfounded {
            in_set[atom] = true;
        }

        let mut external = Vec::new();
        let mut seen = vec![false; program.rules().len()];
        for &atom in unfounded {
            for &rule_idx in &self.supports[atom] {
                if seen[rule_idx] {
                    continue;
                }
                seen[rule_idx] = true;
                if program.rules()[rule_idx]
                    .positive
                    .iter()
                    .all(|&body_atom| !in_set[body_atom])
                {
                    external.push(self.variable_manager.body_variable(rule_idx)?);
                }
            }
        }

        Ok(unfounded
            .iter()
            .map(|&atom| {
                let mut literals = vec![-self.variable_manager.atom_variable(atom)];
                literals.extend(&external);
                Clause::new(literals)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::parse_program;

    #[test]
    fn test_clause_creation() {
        let clause = Clause::new(vec![1, -2, 3]);
        assert_eq!(clause.literals.len(), 3);
        assert!(!clause.is_empty());
        assert!(!clause.is_unit());
        assert!(Clause::unit(5).is_unit());
        assert!(Clause::new(vec![]).is_empty());
    }

    #[test]
    fn test_fact_translation() {
        let program = parse_program("a.").unwrap();
        let mut encoder = CompletionEncoder::new(&program);
        let clauses = encoder.generate_all_constraints(&program).unwrap();

        // body definition (unit), head implication, support
        let body = encoder.variable_manager().variable_count() as i32;
        assert!(clauses.contains(&Clause::unit(body)));
        assert!(clauses.contains(&Clause::binary(-body, 1)));
        assert!(clauses.contains(&Clause::binary(-1, body)));
    }

    #[test]
    fn test_atom_without_rules_is_false() {
        let program = parse_program("a :- x.").unwrap();
        let mut encoder = CompletionEncoder::new(&program);
        let clauses = encoder.generate_all_constraints(&program).unwrap();

        let x = encoder.variable_manager().atom_variable(program.lookup("x").unwrap());
        assert!(clauses.contains(&Clause::unit(-x)));
    }

    #[test]
    fn test_constraint_forbids_body() {
        let program = parse_program("{a}. :- a.").unwrap();
        let mut encoder = CompletionEncoder::new(&program);
        let clauses = encoder.generate_all_constraints(&program).unwrap();

        let constraint_body = encoder.variable_manager_mut().body_variable(1).unwrap();
        assert!(clauses.contains(&Clause::unit(-constraint_body)));
    }

    #[test]
    fn test_loop_nogoods_use_external_support_only() {
        // a :- b.  b :- a.  a :- not c.
        let program = parse_program("a :- b. b :- a. a :- not c.").unwrap();
        let mut encoder = CompletionEncoder::new(&program);
        encoder.generate_all_constraints(&program).unwrap();

        let a = program.lookup("a").unwrap();
        let b = program.lookup("b").unwrap();
        let nogoods = encoder.loop_nogoods(&program, &[a, b]).unwrap();

        let external = encoder.variable_manager_mut().body_variable(2).unwrap();
        assert_eq!(nogoods.len(), 2);
        for nogood in &nogoods {
            assert_eq!(nogood.literals.len(), 2);
            assert_eq!(nogood.literals[1], external);
        }
    }
}

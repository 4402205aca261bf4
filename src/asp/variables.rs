//! SAT variable management for the program translation

use crate::error::{AnalysisError, Result};
use std::collections::HashMap;

/// Kinds of variables used in the translation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariableType {
    /// Truth value of a program atom
    Atom(usize),
    /// Truth value of a rule body
    Body(usize),
    /// Activation literal guarding the clauses of one enumeration
    Selector(usize),
}

/// Signed reference to a program atom, usable as an assumption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(i32);

impl Literal {
    pub(crate) fn positive(variable: i32) -> Self {
        debug_assert!(variable > 0);
        Literal(variable)
    }

    pub fn negate(self) -> Self {
        Literal(-self.0)
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Signed SAT variable
    pub fn get_integer(self) -> i32 {
        self.0
    }
}

/// Maps translation variables to SAT variable ids
#[derive(Debug)]
pub struct VariableManager {
    variable_map: HashMap<VariableType, i32>,
    next_id: i32,
    atom_count: usize,
    rule_count: usize,
    selector_count: usize,
}

impl VariableManager {
    /// Atom variables are allocated eagerly so that atom `i` is variable `i + 1`
    pub fn new(atom_count: usize, rule_count: usize) -> Self {
        let mut manager = Self {
            variable_map: HashMap::new(),
            next_id: 1,
            atom_count,
            rule_count,
            selector_count: 0,
        };
        for atom in 0..atom_count {
            let id = manager.next_id;
            manager.next_id += 1;
            manager.variable_map.insert(VariableType::Atom(atom), id);
        }
        manager
    }

    /// Get or create a variable id for the given variable type
    pub fn get_variable(&mut self, var_type: VariableType) -> Result<i32> {
        if let Some(&id) = self.variable_map.get(&var_type) {
            return Ok(id);
        }

        self.validate_variable(&var_type)?;

        let id = self.next_id;
        self.next_id += 1;
        self.variable_map.insert(var_type, id);
        Ok(id)
    }

    pub fn atom_variable(&self, atom: usize) -> i32 {
        debug_assert!(atom < self.atom_count);
        atom as i32 + 1
    }

    pub fn atom_literal(&self, atom: usize) -> Literal {
        Literal::positive(self.atom_variable(atom))
    }

    /// Atom index of a literal, if it refers to an atom
    pub fn atom_of(&self, literal: Literal) -> Option<usize> {
        let var = literal.get_integer().unsigned_abs() as usize;
        (1..=self.atom_count).contains(&var).then(|| var - 1)
    }

    pub fn body_variable(&mut self, rule: usize) -> Result<i32> {
        self.get_variable(VariableType::Body(rule))
    }

    /// A variable that has never been used before
    pub fn fresh_selector(&mut self) -> Result<i32> {
        let selector = self.selector_count;
        self.selector_count += 1;
        self.get_variable(VariableType::Selector(selector))
    }

    pub fn variable_count(&self) -> usize {
        (self.next_id - 1) as usize
    }

    fn validate_variable(&self, var_type: &VariableType) -> Result<()> {
        match var_type {
            VariableType::Atom(atom) if *atom >= self.atom_count => Err(AnalysisError::Backend(
                format!("atom {} out of bounds (atoms: {})", atom, self.atom_count),
            )),
            VariableType::Body(rule) if *rule >= self.rule_count => Err(AnalysisError::Backend(
                format!("rule {} out of bounds (rules: {})", rule, self.rule_count),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atoms_come_first() {
        let mut vm = VariableManager::new(3, 2);
        assert_eq!(vm.atom_variable(0), 1);
        assert_eq!(vm.atom_variable(2), 3);

        let body = vm.body_variable(0).unwrap();
        assert_eq!(body, 4);
        assert_eq!(vm.body_variable(0).unwrap(), body);
    }

    #[test]
    fn test_selectors_are_always_fresh() {
        let mut vm = VariableManager::new(1, 0);
        let s1 = vm.fresh_selector().unwrap();
        let s2 = vm.fresh_selector().unwrap();
        assert_ne!(s1, s2);
        assert_eq!(vm.variable_count(), 3);
    }

    #[test]
    fn test_variable_bounds() {
        let mut vm = VariableManager::new(2, 1);
        assert!(vm.body_variable(0).is_ok());
        assert!(vm.body_variable(1).is_err());
        assert!(vm.get_variable(VariableType::Atom(5)).is_err());
    }

    #[test]
    fn test_literal_sign() {
        let vm = VariableManager::new(2, 0);
        let lit = vm.atom_literal(1);
        assert!(lit.is_positive());
        assert_eq!(lit.negate().get_integer(), -2);
        assert_eq!(vm.atom_of(lit.negate()), Some(1));
        assert_eq!(vm.atom_of(Literal::positive(7)), None);
    }
}

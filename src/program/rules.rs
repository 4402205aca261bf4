//! Ground rules and the reduct-based stability check

use std::collections::HashMap;

/// Head of a ground rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// `h :- body.`
    Atom(usize),
    /// `{h1; h2} :- body.`: any subset of the heads may be derived
    Choice(Vec<usize>),
    /// `:- body.`
    Falsum,
}

/// A ground rule over interned atom indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub head: Head,
    pub positive: Vec<usize>,
    pub negative: Vec<usize>,
}

impl Rule {
    pub fn fact(atom: usize) -> Self {
        Self {
            head: Head::Atom(atom),
            positive: Vec::new(),
            negative: Vec::new(),
        }
    }

    /// Atoms this rule can derive
    pub fn heads(&self) -> &[usize] {
        match &self.head {
            Head::Atom(atom) => std::slice::from_ref(atom),
            Head::Choice(atoms) => atoms,
            Head::Falsum => &[],
        }
    }

    pub fn is_constraint(&self) -> bool {
        matches!(self.head, Head::Falsum)
    }
}

/// A ground logic program
#[derive(Debug, Clone, Default)]
pub struct Program {
    atoms: Vec<String>,
    index: HashMap<String, usize>,
    rules: Vec<Rule>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the index of an atom by canonical name
    pub fn intern(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.atoms.len();
        self.atoms.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Forbid `a` and `-a` from holding together
    pub fn add_classical_negation_constraints(&mut self) {
        let pairs: Vec<(usize, usize)> = self
            .atoms
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| {
                let positive = name.strip_prefix('-')?;
                self.index.get(positive).map(|&pos| (pos, idx))
            })
            .collect();

        for (pos, neg) in pairs {
            self.rules.push(Rule {
                head: Head::Falsum,
                positive: vec![pos, neg],
                negative: Vec::new(),
            });
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn atom_name(&self, atom: usize) -> &str {
        &self.atoms[atom]
    }

    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Atoms occurring in some rule head, in interning order.
    ///
    /// Atoms that only occur in bodies can never hold and are not part of the
    /// program's vocabulary.
    pub fn derivable_atoms(&self) -> Vec<usize> {
        let mut derivable = vec![false; self.atoms.len()];
        for rule in &self.rules {
            for &atom in rule.heads() {
                derivable[atom] = true;
            }
        }
        (0..self.atoms.len()).filter(|&atom| derivable[atom]).collect()
    }

    /// Atoms true in `model` but missing from the least model of the reduct.
    ///
    /// `model` must satisfy the program's completion. An empty result means
    /// `model` is a stable model.
    pub fn unfounded_atoms(&self, model: &[bool]) -> Vec<usize> {
        let atom_count = self.atoms.len();
        let mut derived = vec![false; atom_count];
        let mut remaining = vec![0usize; self.rules.len()];
        let mut watchers: Vec<Vec<usize>> = vec![Vec::new(); atom_count];
        let mut queue = Vec::new();

        for (rule_idx, rule) in self.rules.iter().enumerate() {
            if rule.is_constraint() || rule.negative.iter().any(|&atom| model[atom]) {
                continue;
            }
            remaining[rule_idx] = rule.positive.len();
            for &atom in &rule.positive {
                watchers[atom].push(rule_idx);
            }
            if rule.positive.is_empty() {
                self.fire(rule, model, &mut derived, &mut queue);
            }
        }

        while let Some(atom) = queue.pop() {
            for &rule_idx in &watchers[atom] {
                remaining[rule_idx] -= 1;
                if remaining[rule_idx] == 0 {
                    self.fire(&self.rules[rule_idx], model, &mut derived, &mut queue);
                }
            }
        }

        (0..atom_count)
            .filter(|&atom| model[atom] && !derived[atom])
            .collect()
    }

    fn fire(&self, rule: &Rule, model: &[bool], derived: &mut [bool], queue: &mut Vec<usize>) {
        let heads = rule.heads();
        for &atom in heads {
            // the reduct keeps a choice head only when the candidate chose it
            if matches!(rule.head, Head::Choice(_)) && !model[atom] {
                continue;
            }
            if !derived[atom] {
                derived[atom] = true;
                queue.push(atom);
            }
        }
    }

    pub fn statistics(&self) -> ProgramStatistics {
        let mut stats = ProgramStatistics {
            atoms: self.atoms.len(),
            ..ProgramStatistics::default()
        };
        for rule in &self.rules {
            match &rule.head {
                Head::Atom(_) if rule.positive.is_empty() && rule.negative.is_empty() => {
                    stats.facts += 1
                }
                Head::Atom(_) => stats.normal_rules += 1,
                Head::Choice(_) => stats.choice_rules += 1,
                Head::Falsum => stats.constraints += 1,
            }
        }
        stats
    }
}

/// Rule and atom counts of a program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramStatistics {
    pub atoms: usize,
    pub facts: usize,
    pub normal_rules: usize,
    pub choice_rules: usize,
    pub constraints: usize,
}

impl std::fmt::Display for ProgramStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} atoms, {} facts, {} rules, {} choice rules, {} constraints",
            self.atoms, self.facts, self.normal_rules, self.choice_rules, self.constraints
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(program: &Program, true_atoms: &[&str]) -> Vec<bool> {
        let mut values = vec![false; program.atom_count()];
        for name in true_atoms {
            values[program.lookup(name).unwrap()] = true;
        }
        values
    }

    #[test]
    fn test_intern_is_stable() {
        let mut program = Program::new();
        let a = program.intern("a");
        let b = program.intern("b");
        assert_eq!(program.intern("a"), a);
        assert_ne!(a, b);
        assert_eq!(program.atom_name(b), "b");
        assert_eq!(program.lookup("c"), None);
    }

    #[test]
    fn test_positive_loop_is_unfounded() {
        // a :- b.  b :- a.
        let mut program = Program::new();
        let a = program.intern("a");
        let b = program.intern("b");
        program.add_rule(Rule { head: Head::Atom(a), positive: vec![b], negative: vec![] });
        program.add_rule(Rule { head: Head::Atom(b), positive: vec![a], negative: vec![] });

        let candidate = model(&program, &["a", "b"]);
        let mut unfounded = program.unfounded_atoms(&candidate);
        unfounded.sort();
        assert_eq!(unfounded, vec![a, b]);

        assert!(program.unfounded_atoms(&model(&program, &[])).is_empty());
    }

    #[test]
    fn test_choice_head_only_derived_when_chosen() {
        // {b}.  c :- b.
        let mut program = Program::new();
        let b = program.intern("b");
        let c = program.intern("c");
        program.add_rule(Rule { head: Head::Choice(vec![b]), positive: vec![], negative: vec![] });
        program.add_rule(Rule { head: Head::Atom(c), positive: vec![b], negative: vec![] });

        assert!(program.unfounded_atoms(&model(&program, &["b", "c"])).is_empty());
        assert!(program.unfounded_atoms(&model(&program, &[])).is_empty());
        assert_eq!(program.unfounded_atoms(&model(&program, &["c"])), vec![c]);
    }

    #[test]
    fn test_negative_body_blocks_rule() {
        // a :- not b.  b :- not a.
        let mut program = Program::new();
        let a = program.intern("a");
        let b = program.intern("b");
        program.add_rule(Rule { head: Head::Atom(a), positive: vec![], negative: vec![b] });
        program.add_rule(Rule { head: Head::Atom(b), positive: vec![], negative: vec![a] });

        assert!(program.unfounded_atoms(&model(&program, &["a"])).is_empty());
        assert!(program.unfounded_atoms(&model(&program, &["b"])).is_empty());
        assert_eq!(program.unfounded_atoms(&model(&program, &["a", "b"])).len(), 2);
    }

    #[test]
    fn test_derivable_atoms_skip_body_only() {
        let mut program = Program::new();
        let a = program.intern("a");
        let x = program.intern("x");
        program.add_rule(Rule { head: Head::Atom(a), positive: vec![x], negative: vec![] });
        assert_eq!(program.derivable_atoms(), vec![a]);
    }

    #[test]
    fn test_classical_negation_constraint() {
        let mut program = Program::new();
        let a = program.intern("a");
        let neg_a = program.intern("-a");
        program.intern("-b");
        program.add_classical_negation_constraints();

        let constraints: Vec<_> = program.rules().iter().filter(|r| r.is_constraint()).collect();
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].positive, vec![a, neg_a]);
    }

    #[test]
    fn test_statistics() {
        let mut program = Program::new();
        let a = program.intern("a");
        let b = program.intern("b");
        program.add_rule(Rule::fact(a));
        program.add_rule(Rule { head: Head::Choice(vec![b]), positive: vec![], negative: vec![] });
        program.add_rule(Rule { head: Head::Falsum, positive: vec![a, b], negative: vec![] });

        let stats = program.statistics();
        assert_eq!(stats.atoms, 2);
        assert_eq!(stats.facts, 1);
        assert_eq!(stats.choice_rules, 1);
        assert_eq!(stats.constraints, 1);
        assert_eq!(stats.normal_rules, 0);
    }
}

use std::fmt;
use std::iter::FromIterator;

use itertools::Itertools;

use crate::util::{BuildHasher, IndexSet};

/// A partial assignment of truth values to variables. Absent keys are
/// unassigned. Insertion order is preserved and observable.
pub type Interpretation = indexmap::IndexMap<String, bool, BuildHasher>;

/// A variable or its negation
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    pub variable: String,
    pub negated: bool,
}

/// A disjunction of literals. The empty clause denotes ⊥.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Clause {
    pub literals: Vec<Literal>,
}

/// A conjunction of clauses. The empty conjunction denotes ⊤.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CNFFormula {
    pub clauses: Vec<Clause>,
}

impl Literal {
    #[inline]
    pub fn new(variable: impl Into<String>, negated: bool) -> Literal {
        Literal {
            variable: variable.into(),
            negated,
        }
    }

    /// Creates a positive literal over the given variable
    #[inline]
    pub fn pos(variable: impl Into<String>) -> Literal {
        Literal::new(variable, false)
    }

    /// Creates a negative literal over the given variable
    #[inline]
    pub fn neg(variable: impl Into<String>) -> Literal {
        Literal::new(variable, true)
    }

    /// The literal over the same variable with the opposite polarity
    #[inline]
    pub fn complement(&self) -> Literal {
        Literal {
            variable: self.variable.clone(),
            negated: !self.negated,
        }
    }

    /// Two literals are complementary iff they share a variable and
    /// differ in polarity.
    #[inline]
    pub fn is_complement_of(&self, other: &Literal) -> bool {
        self.variable == other.variable && self.negated != other.negated
    }

    /// `Some(true)` if the literal is satisfied, `Some(false)` if
    /// falsified, `None` if its variable is unassigned.
    #[inline]
    pub fn eval(&self, interpretation: &Interpretation) -> Option<bool> {
        interpretation
            .get(&self.variable)
            .map(|value| *value != self.negated)
    }

    /// The value the variable must take for this literal to hold
    #[inline]
    pub fn satisfying_value(&self) -> bool {
        !self.negated
    }
}

impl Clause {
    /// Creates a clause from its literals, keeping their order
    #[inline]
    pub fn new(literals: Vec<Literal>) -> Clause {
        Clause { literals }
    }

    /// Creates a unit clause
    #[inline]
    pub fn unit(literal: Literal) -> Clause {
        Clause {
            literals: vec![literal],
        }
    }

    #[inline]
    pub fn push(&mut self, literal: Literal) {
        self.literals.push(literal);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Evaluates the clause under a partial assignment: `Some(true)`
    /// once any literal is satisfied, `Some(false)` once every literal
    /// is falsified, `None` otherwise.
    pub fn eval(&self, interpretation: &Interpretation) -> Option<bool> {
        let mut undetermined = false;
        for literal in &self.literals {
            match literal.eval(interpretation) {
                Some(true) => return Some(true),
                Some(false) => {}
                None => undetermined = true,
            }
        }
        if undetermined {
            None
        } else {
            Some(false)
        }
    }

    /// The distinct unassigned literals of the clause, deduplicated by
    /// variable and polarity. Repeated literals count once.
    pub fn unassigned_literals(&self, interpretation: &Interpretation) -> Vec<&Literal> {
        self.literals
            .iter()
            .filter(|literal| !interpretation.contains_key(&literal.variable))
            .unique()
            .collect()
    }
}

impl CNFFormula {
    /// Creates a CNF formula from its clauses
    #[inline]
    pub fn new(clauses: Vec<Clause>) -> CNFFormula {
        CNFFormula { clauses }
    }

    /// Creates the empty conjunction
    #[inline]
    pub fn empty() -> CNFFormula {
        CNFFormula::default()
    }

    /// Adds a clause to the end of the formula
    #[inline]
    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Appends all clauses of another formula
    #[inline]
    pub fn extend(&mut self, other: CNFFormula) {
        self.clauses.extend(other.clauses);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Collects the variable names of the formula in first-occurrence
    /// order (clause order, literal order). Both solvers use this as
    /// their stable enumeration when picking decision variables.
    pub fn variables(&self) -> IndexSet<String> {
        let mut vars = IndexSet::default();
        for clause in &self.clauses {
            for literal in &clause.literals {
                if !vars.contains(&literal.variable) {
                    vars.insert(literal.variable.clone());
                }
            }
        }
        vars
    }

    /// Evaluates the conjunction under a partial assignment
    pub fn eval(&self, interpretation: &Interpretation) -> Option<bool> {
        let mut undetermined = false;
        for clause in &self.clauses {
            match clause.eval(interpretation) {
                Some(false) => return Some(false),
                None => undetermined = true,
                Some(true) => {}
            }
        }
        if undetermined {
            None
        } else {
            Some(true)
        }
    }

    /// Checks that every clause is satisfied
    #[inline]
    pub fn is_satisfied_by(&self, interpretation: &Interpretation) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.eval(interpretation) == Some(true))
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        Clause {
            literals: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Clause {
    type Item = Literal;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.into_iter()
    }
}

impl FromIterator<Clause> for CNFFormula {
    fn from_iter<I: IntoIterator<Item = Clause>>(iter: I) -> Self {
        CNFFormula {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CNFFormula {
    type Item = Clause;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_iter()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "¬{}", self.variable)
        } else {
            write!(f, "{}", self.variable)
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literals.is_empty() {
            return write!(f, "(⊥)");
        }
        write!(f, "({})", self.literals.iter().join(" ∨ "))
    }
}

impl fmt::Display for CNFFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return write!(f, "⊤");
        }
        write!(f, "{}", self.clauses.iter().join(" ∧ "))
    }
}

use std::fmt;

use crate::cnf::Interpretation;
use crate::util::IndexSet;

/// A propositional formula.
///
/// Trees are built bottom-up by the parser, consumed by the
/// preprocessing pipeline and never mutated. Every node owns its
/// children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    Var(String),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Biconditional(Box<Formula>, Box<Formula>),
}

impl Formula {
    /// Creates a variable leaf
    #[inline]
    pub fn var(name: impl Into<String>) -> Formula {
        Formula::Var(name.into())
    }

    #[inline]
    pub fn not(operand: Formula) -> Formula {
        Formula::Not(Box::new(operand))
    }

    #[inline]
    pub fn and(left: Formula, right: Formula) -> Formula {
        Formula::And(Box::new(left), Box::new(right))
    }

    #[inline]
    pub fn or(left: Formula, right: Formula) -> Formula {
        Formula::Or(Box::new(left), Box::new(right))
    }

    #[inline]
    pub fn implies(left: Formula, right: Formula) -> Formula {
        Formula::Implies(Box::new(left), Box::new(right))
    }

    #[inline]
    pub fn biconditional(left: Formula, right: Formula) -> Formula {
        Formula::Biconditional(Box::new(left), Box::new(right))
    }

    /// Checks whether the formula is a variable or a negated variable
    pub fn is_literal(&self) -> bool {
        match self {
            Formula::Var(_) => true,
            Formula::Not(operand) => matches!(**operand, Formula::Var(_)),
            _ => false,
        }
    }

    /// Collects the variable names of the formula in first-occurrence
    /// order (pre-order, left to right).
    pub fn variables(&self) -> IndexSet<String> {
        let mut vars = IndexSet::default();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut IndexSet<String>) {
        match self {
            Formula::Var(name) => {
                if !vars.contains(name) {
                    vars.insert(name.clone());
                }
            }
            Formula::Not(operand) => operand.collect_variables(vars),
            Formula::And(left, right)
            | Formula::Or(left, right)
            | Formula::Implies(left, right)
            | Formula::Biconditional(left, right) => {
                left.collect_variables(vars);
                right.collect_variables(vars);
            }
        }
    }

    /// Evaluates the formula under a partial assignment using
    /// three-valued logic; `None` means the value is not yet determined.
    pub fn eval(&self, interpretation: &Interpretation) -> Option<bool> {
        match self {
            Formula::Var(name) => interpretation.get(name).copied(),
            Formula::Not(operand) => operand.eval(interpretation).map(|value| !value),
            Formula::And(left, right) => {
                match (left.eval(interpretation), right.eval(interpretation)) {
                    (Some(false), _) | (_, Some(false)) => Some(false),
                    (Some(true), Some(true)) => Some(true),
                    _ => None,
                }
            }
            Formula::Or(left, right) => {
                match (left.eval(interpretation), right.eval(interpretation)) {
                    (Some(true), _) | (_, Some(true)) => Some(true),
                    (Some(false), Some(false)) => Some(false),
                    _ => None,
                }
            }
            Formula::Implies(left, right) => {
                match (left.eval(interpretation), right.eval(interpretation)) {
                    (Some(false), _) | (_, Some(true)) => Some(true),
                    (Some(true), Some(false)) => Some(false),
                    _ => None,
                }
            }
            Formula::Biconditional(left, right) => {
                match (left.eval(interpretation), right.eval(interpretation)) {
                    (Some(left), Some(right)) => Some(left == right),
                    _ => None,
                }
            }
        }
    }
}

// Variables print bare; everything else is parenthesized inside a
// surrounding operator, except that disjunctions keep negated
// variables bare.
fn operand(formula: &Formula) -> String {
    match formula {
        Formula::Var(name) => name.clone(),
        _ => format!("({})", formula),
    }
}

fn or_operand(formula: &Formula) -> String {
    match formula {
        Formula::Var(_) | Formula::Not(_) => format!("{}", formula),
        _ => format!("({})", formula),
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Var(name) => write!(f, "{}", name),
            Formula::Not(inner) => match **inner {
                Formula::Var(ref name) => write!(f, "¬{}", name),
                _ => write!(f, "¬({})", inner),
            },
            Formula::And(left, right) => write!(f, "{} ∧ {}", operand(left), operand(right)),
            Formula::Or(left, right) => write!(f, "{} ∨ {}", or_operand(left), or_operand(right)),
            Formula::Implies(left, right) => write!(f, "{} → {}", operand(left), operand(right)),
            Formula::Biconditional(left, right) => {
                write!(f, "{} ↔ {}", operand(left), operand(right))
            }
        }
    }
}

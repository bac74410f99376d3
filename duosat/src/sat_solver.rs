use std::fmt;

use crate::cnf::Interpretation;

/// The decision a solver reaches for its formula. `Unsat` is a normal
/// return value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionResult {
    Sat,
    Unsat,
}

impl DecisionResult {
    #[inline]
    pub fn is_sat(&self) -> bool {
        *self == DecisionResult::Sat
    }

    #[inline]
    pub fn is_unsat(&self) -> bool {
        *self == DecisionResult::Unsat
    }
}

impl fmt::Display for DecisionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionResult::Sat => write!(f, "SAT"),
            DecisionResult::Unsat => write!(f, "UNSAT"),
        }
    }
}

/// The contract both engines implement. `solve` runs to completion;
/// after a `Sat` result, `assignment` satisfies every clause of the
/// input formula.
pub trait Solver {
    fn solve(&mut self) -> DecisionResult;
    fn assignment(&self) -> &Interpretation;
}

use log::{debug, trace};

use crate::cnf::{CNFFormula, Interpretation};
use crate::sat_solver::{DecisionResult, Solver};
use crate::util::{IndexMap, IndexSet};

/// A classical DPLL solver: recursive backtracking search with unit
/// propagation and pure-literal elimination over an immutable formula.
/// Each branch works on a value copy of the assignment, so failed
/// branches never leak assignments into their siblings.
pub struct DPLLSolver {
    cnf: CNFFormula,
    variables: IndexSet<String>,
    assignment: Interpretation,
}

impl DPLLSolver {
    pub fn new(cnf: CNFFormula) -> DPLLSolver {
        let variables = cnf.variables();
        DPLLSolver {
            cnf,
            variables,
            assignment: Interpretation::default(),
        }
    }

    /// The satisfying assignment found by the last `solve` call, empty
    /// after an UNSAT result.
    pub fn assignment(&self) -> &Interpretation {
        &self.assignment
    }

    pub fn solve(&mut self) -> DecisionResult {
        match self.search(Interpretation::default()) {
            Some(model) => {
                self.assignment = model;
                DecisionResult::Sat
            }
            None => {
                self.assignment.clear();
                DecisionResult::Unsat
            }
        }
    }

    /// One node of the search tree. Returns a satisfying assignment
    /// extending `assignment`, or `None` if none exists below it.
    fn search(&self, mut assignment: Interpretation) -> Option<Interpretation> {
        if !self.propagate_units(&mut assignment) {
            return None;
        }

        self.assign_pure_literals(&mut assignment);

        if self.cnf.is_satisfied_by(&assignment) {
            return Some(assignment);
        }

        let variable = match self.pick_variable(&assignment) {
            Some(variable) => variable,
            None => {
                debug_assert!(
                    self.cnf.is_satisfied_by(&assignment),
                    "no unassigned variable left while clauses remain unsatisfied"
                );
                return Some(assignment);
            }
        };

        debug!("branching on {}", variable);
        let mut positive = assignment.clone();
        positive.insert(variable.clone(), true);
        if let Some(model) = self.search(positive) {
            return Some(model);
        }

        assignment.insert(variable, false);
        self.search(assignment)
    }

    /// Boolean constraint propagation to fixpoint. Returns `false` as
    /// soon as some clause is falsified under the assignment.
    fn propagate_units(&self, assignment: &mut Interpretation) -> bool {
        loop {
            let mut progress = false;
            for clause in &self.cnf.clauses {
                match clause.eval(assignment) {
                    Some(true) => {}
                    Some(false) => return false,
                    None => {
                        let unassigned = clause.unassigned_literals(assignment);
                        if let [literal] = unassigned.as_slice() {
                            trace!("unit {} forced by {}", literal, clause);
                            let value = literal.satisfying_value();
                            assignment.insert(literal.variable.clone(), value);
                            progress = true;
                        }
                    }
                }
            }
            if !progress {
                return true;
            }
        }
    }

    /// Assigns every variable that occurs with a single polarity among
    /// the not-yet-satisfied clauses. This can only satisfy clauses,
    /// never falsify one, so no conflict check is needed here.
    fn assign_pure_literals(&self, assignment: &mut Interpretation) {
        let mut polarities: IndexMap<String, (bool, bool)> = IndexMap::default();

        for clause in &self.cnf.clauses {
            if clause.eval(assignment) == Some(true) {
                continue;
            }
            for literal in &clause.literals {
                if assignment.contains_key(&literal.variable) {
                    continue;
                }
                let seen = polarities
                    .entry(literal.variable.clone())
                    .or_insert((false, false));
                if literal.negated {
                    seen.1 = true;
                } else {
                    seen.0 = true;
                }
            }
        }

        for (variable, (positive, negative)) in polarities {
            if positive != negative {
                trace!("pure literal {} = {}", variable, positive);
                assignment.insert(variable, positive);
            }
        }
    }

    /// The first unassigned variable in the formula's stable
    /// enumeration order (clause order, literal order).
    fn pick_variable(&self, assignment: &Interpretation) -> Option<String> {
        self.variables
            .iter()
            .find(|variable| !assignment.contains_key(*variable))
            .cloned()
    }
}

impl Solver for DPLLSolver {
    fn solve(&mut self) -> DecisionResult {
        DPLLSolver::solve(self)
    }

    fn assignment(&self) -> &Interpretation {
        DPLLSolver::assignment(self)
    }
}

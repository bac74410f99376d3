use itertools::Itertools;
use log::{debug, trace};

use super::clause::{ClauseDb, ClauseRef};
use super::trail::{ImplicationNode, TrailEntry};
use crate::cnf::{CNFFormula, Clause, Interpretation, Literal};
use crate::sat_solver::{DecisionResult, Solver};
use crate::util::{HashMap, HashSet, IndexSet};

/// A CDCL solver: iterative search with a trail, an implication
/// graph, 1-UIP conflict analysis, clause learning and
/// non-chronological backjumping. The input formula is never mutated;
/// learned clauses live in their own index space behind [`ClauseRef`].
pub struct CDCLSolver {
    clauses: ClauseDb,
    variables: IndexSet<String>,
    assignment: Interpretation,
    trail: Vec<TrailEntry>,
    implication_graph: HashMap<String, ImplicationNode>,
    decision_level: u32,
}

impl CDCLSolver {
    pub fn new(cnf: CNFFormula) -> CDCLSolver {
        let variables = cnf.variables();
        CDCLSolver {
            clauses: ClauseDb::new(cnf),
            variables,
            assignment: Interpretation::default(),
            trail: Vec::new(),
            implication_graph: HashMap::default(),
            decision_level: 0,
        }
    }

    /// The current (partial) assignment. After a `Sat` result it
    /// satisfies every original and learned clause.
    pub fn assignment(&self) -> &Interpretation {
        &self.assignment
    }

    /// The clauses learned from conflicts so far, in learning order.
    pub fn learned_clauses(&self) -> &[Clause] {
        self.clauses.learned()
    }

    /// The trail in assignment order.
    pub fn trail(&self) -> &[TrailEntry] {
        &self.trail
    }

    pub fn implication_graph(&self) -> &HashMap<String, ImplicationNode> {
        &self.implication_graph
    }

    pub fn solve(&mut self) -> DecisionResult {
        loop {
            if let Some(conflict) = self.propagate() {
                if self.decision_level == 0 {
                    debug!("conflict {} at level 0", self.clauses[conflict]);
                    return DecisionResult::Unsat;
                }
                let learned = self.analyze_conflict(conflict);
                let level = self.backjump_level(&learned);
                debug!("learned {}, backjumping to level {}", learned, level);
                self.clauses.push_learned(learned);
                self.backtrack_to(level);
                continue;
            }

            if self.all_clauses_satisfied() {
                return DecisionResult::Sat;
            }

            match self.pick_variable() {
                Some(variable) => self.decide(variable, true),
                None => {
                    debug_assert!(
                        self.all_clauses_satisfied(),
                        "no unassigned variable left while clauses remain unsatisfied"
                    );
                    return DecisionResult::Sat;
                }
            }
        }
    }

    /// Scans originals then learned clauses in insertion order until a
    /// full pass yields no propagation. Returns the first falsified
    /// clause found, if any.
    fn propagate(&mut self) -> Option<ClauseRef> {
        loop {
            let mut progress = false;
            for reference in self.clauses.refs() {
                match self.clauses[reference].eval(&self.assignment) {
                    Some(true) => {}
                    Some(false) => return Some(reference),
                    None => {
                        let unit = {
                            let unassigned =
                                self.clauses[reference].unassigned_literals(&self.assignment);
                            match unassigned.as_slice() {
                                [literal] => Some((*literal).clone()),
                                _ => None,
                            }
                        };
                        if let Some(literal) = unit {
                            self.imply(literal, reference);
                            progress = true;
                        }
                    }
                }
            }
            if !progress {
                return None;
            }
        }
    }

    /// Records a propagated assignment at the current level, with the
    /// unit clause as its reason and the clause's other variables as
    /// antecedents.
    fn imply(&mut self, literal: Literal, reason: ClauseRef) {
        let value = literal.satisfying_value();
        let antecedents: Vec<String> = self.clauses[reason]
            .literals
            .iter()
            .map(|other| &other.variable)
            .filter(|variable| **variable != literal.variable)
            .unique()
            .cloned()
            .collect();

        trace!(
            "propagating {} = {} at level {} from {}",
            literal.variable,
            value,
            self.decision_level,
            self.clauses[reason]
        );
        self.trail.push(TrailEntry {
            variable: literal.variable.clone(),
            value,
            decision_level: self.decision_level,
            reason: Some(reason),
        });
        self.assignment.insert(literal.variable.clone(), value);
        self.implication_graph.insert(
            literal.variable,
            ImplicationNode {
                value,
                decision_level: self.decision_level,
                reason: Some(reason),
                antecedents,
            },
        );
    }

    /// Opens a new decision level and assigns the variable with no
    /// reason clause.
    fn decide(&mut self, variable: String, value: bool) {
        self.decision_level += 1;
        debug!(
            "decision {} = {} at level {}",
            variable, value, self.decision_level
        );
        self.trail.push(TrailEntry {
            variable: variable.clone(),
            value,
            decision_level: self.decision_level,
            reason: None,
        });
        self.assignment.insert(variable.clone(), value);
        self.implication_graph.insert(
            variable,
            ImplicationNode {
                value,
                decision_level: self.decision_level,
                reason: None,
                antecedents: Vec::new(),
            },
        );
    }

    /// Derives the 1-UIP clause from a falsified clause by resolving
    /// against reason clauses in reverse trail order until at most one
    /// literal of the current decision level remains. At level 0 the
    /// conflict is returned unchanged.
    fn analyze_conflict(&self, conflict: ClauseRef) -> Clause {
        let mut current: Vec<Literal> = self.clauses[conflict]
            .literals
            .iter()
            .unique()
            .cloned()
            .collect();

        if self.decision_level == 0 {
            return Clause::new(current);
        }

        loop {
            let at_current_level: Vec<&Literal> = current
                .iter()
                .filter(|literal| {
                    self.level_of(&literal.variable) == Some(self.decision_level)
                })
                .collect();
            if at_current_level.len() <= 1 {
                break;
            }

            let candidates: HashSet<&str> = at_current_level
                .iter()
                .map(|literal| literal.variable.as_str())
                .collect();
            let pivot = self
                .trail
                .iter()
                .rev()
                .find(|entry| candidates.contains(entry.variable.as_str()));
            let (pivot_variable, reason) = match pivot {
                // A decision pivot cannot be resolved away; stop with
                // what we have.
                Some(entry) => match entry.reason {
                    Some(reason) => (entry.variable.clone(), reason),
                    None => break,
                },
                None => break,
            };

            trace!("resolving on {} with {}", pivot_variable, self.clauses[reason]);
            current = resolve(&current, &self.clauses[reason].literals, &pivot_variable);
        }

        Clause::new(current)
    }

    /// The second-highest distinct decision level among the learned
    /// clause's variables, 0 for units and single-level clauses.
    fn backjump_level(&self, learned: &Clause) -> u32 {
        if learned.len() <= 1 {
            return 0;
        }
        let mut levels: Vec<u32> = learned
            .literals
            .iter()
            .filter_map(|literal| self.level_of(&literal.variable))
            .collect();
        levels.sort_unstable();
        levels.dedup();
        if levels.len() < 2 {
            0
        } else {
            levels[levels.len() - 2]
        }
    }

    /// Pops every trail entry above `level`, unassigning its variable.
    /// Learned clauses and level-0 assignments survive.
    fn backtrack_to(&mut self, level: u32) {
        while let Some(entry) = self.trail.last() {
            if entry.decision_level <= level {
                break;
            }
            let entry = self.trail.pop().expect("trail entry vanished");
            self.assignment.shift_remove(&entry.variable);
            self.implication_graph.remove(&entry.variable);
        }
        self.decision_level = level;
    }

    fn level_of(&self, variable: &str) -> Option<u32> {
        self.implication_graph
            .get(variable)
            .map(|node| node.decision_level)
    }

    fn all_clauses_satisfied(&self) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.eval(&self.assignment) == Some(true))
    }

    /// The first unassigned variable in the formula's stable
    /// enumeration order; the same policy as the DPLL engine.
    fn pick_variable(&self) -> Option<String> {
        self.variables
            .iter()
            .find(|variable| !self.assignment.contains_key(*variable))
            .cloned()
    }
}

/// Resolution on `pivot`: the union of both clauses' literals minus
/// every literal over the pivot variable, deduplicated by variable and
/// polarity, keeping first-seen order.
fn resolve(left: &[Literal], right: &[Literal], pivot: &str) -> Vec<Literal> {
    let mut seen: HashSet<(String, bool)> = HashSet::default();
    let mut result = Vec::new();
    for literal in left.iter().chain(right.iter()) {
        if literal.variable == pivot {
            continue;
        }
        if seen.insert((literal.variable.clone(), literal.negated)) {
            result.push(literal.clone());
        }
    }
    result
}

impl Solver for CDCLSolver {
    fn solve(&mut self) -> DecisionResult {
        CDCLSolver::solve(self)
    }

    fn assignment(&self) -> &Interpretation {
        CDCLSolver::assignment(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(variable: &str, negated: bool) -> Literal {
        Literal::new(variable, negated)
    }

    fn implication_chain() -> CNFFormula {
        // a forces b, b forces c and (with c) d, d forces both e and
        // ¬e: every conflict path at level 1 runs through d.
        CNFFormula::new(vec![
            Clause::new(vec![lit("a", true), lit("b", false)]),
            Clause::new(vec![lit("b", true), lit("c", false)]),
            Clause::new(vec![lit("b", true), lit("c", true), lit("d", false)]),
            Clause::new(vec![lit("d", true), lit("e", false)]),
            Clause::new(vec![lit("d", true), lit("e", true)]),
        ])
    }

    #[test]
    fn analysis_stops_at_first_uip() {
        let mut solver = CDCLSolver::new(implication_chain());
        solver.decide("a".to_string(), true);
        let conflict = solver.propagate().expect("decision must conflict");

        let learned = solver.analyze_conflict(conflict);

        let at_current_level = learned
            .literals
            .iter()
            .filter(|literal| solver.level_of(&literal.variable) == Some(solver.decision_level))
            .count();
        assert!(at_current_level <= 1);
        assert_eq!(learned, Clause::unit(lit("d", true)));
    }

    #[test]
    fn unit_learned_clause_backjumps_to_level_zero() {
        let mut solver = CDCLSolver::new(implication_chain());
        solver.decide("a".to_string(), true);
        let conflict = solver.propagate().expect("decision must conflict");
        let learned = solver.analyze_conflict(conflict);

        assert_eq!(solver.backjump_level(&learned), 0);
    }

    #[test]
    fn backtrack_keeps_level_zero_assignments() {
        let mut formula = implication_chain();
        formula.push(Clause::unit(lit("f", false)));

        let mut solver = CDCLSolver::new(formula);
        assert!(solver.propagate().is_none());
        solver.decide("a".to_string(), true);
        assert!(solver.propagate().is_some());

        solver.backtrack_to(0);
        assert_eq!(solver.assignment().get("f"), Some(&true));
        assert!(solver.assignment().get("a").is_none());
        assert_eq!(solver.trail().len(), 1);
    }
}

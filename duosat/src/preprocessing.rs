//! Pure transformations from formula trees into CNF: implication
//! elimination, negation normal form, OR-over-AND distribution, the
//! structure-preserving Tseytin encoding and 3-CNF flattening.

use thiserror::Error;

use crate::ast::Formula;
use crate::cnf::{CNFFormula, Clause, Literal};

/// Failures of the preprocessing pipeline. These indicate a caller
/// handing a tree to a step whose precondition it violates, e.g. a
/// biconditional reaching the NNF rewriting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreprocessError {
    #[error("invalid formula: {0}")]
    InvalidFormula(String),
}

/// Rewrites `A → B` into `¬A ∨ B` and `A ↔ B` into
/// `(¬A ∨ B) ∧ (¬B ∨ A)`. The result contains neither `Implies` nor
/// `Biconditional` nodes.
pub fn eliminate_implications(formula: &Formula) -> Formula {
    match formula {
        Formula::Var(_) => formula.clone(),
        Formula::Not(operand) => Formula::not(eliminate_implications(operand)),
        Formula::And(left, right) => Formula::and(
            eliminate_implications(left),
            eliminate_implications(right),
        ),
        Formula::Or(left, right) => Formula::or(
            eliminate_implications(left),
            eliminate_implications(right),
        ),
        Formula::Implies(left, right) => Formula::or(
            Formula::not(eliminate_implications(left)),
            eliminate_implications(right),
        ),
        Formula::Biconditional(left, right) => {
            let left = eliminate_implications(left);
            let right = eliminate_implications(right);
            Formula::and(
                Formula::or(Formula::not(left.clone()), right.clone()),
                Formula::or(Formula::not(right), left),
            )
        }
    }
}

/// Drives negations down to the variables with De Morgan's laws,
/// eliminating double negations on the way. Expects an
/// implication-free input and produces NNF; the transformation is
/// idempotent on its own output.
pub fn push_negations_inward(formula: &Formula) -> Result<Formula, PreprocessError> {
    match formula {
        Formula::Var(_) => Ok(formula.clone()),
        Formula::Not(operand) => push_negated(operand),
        Formula::And(left, right) => Ok(Formula::and(
            push_negations_inward(left)?,
            push_negations_inward(right)?,
        )),
        Formula::Or(left, right) => Ok(Formula::or(
            push_negations_inward(left)?,
            push_negations_inward(right)?,
        )),
        Formula::Implies(_, _) | Formula::Biconditional(_, _) => Err(PreprocessError::InvalidFormula(
            format!("implication not eliminated before NNF: {}", formula),
        )),
    }
}

/// Pushes a negation over `formula` inward by one level and recurses.
fn push_negated(formula: &Formula) -> Result<Formula, PreprocessError> {
    match formula {
        Formula::Var(_) => Ok(Formula::not(formula.clone())),
        Formula::Not(operand) => push_negations_inward(operand),
        Formula::And(left, right) => Ok(Formula::or(push_negated(left)?, push_negated(right)?)),
        Formula::Or(left, right) => Ok(Formula::and(push_negated(left)?, push_negated(right)?)),
        Formula::Implies(_, _) | Formula::Biconditional(_, _) => Err(PreprocessError::InvalidFormula(
            format!("implication not eliminated before NNF: {}", formula),
        )),
    }
}

/// Converts a formula to negation normal form.
pub fn to_nnf(formula: &Formula) -> Result<Formula, PreprocessError> {
    push_negations_inward(&eliminate_implications(formula))
}

/// Distributes OR over AND until no OR has an AND operand:
/// `A ∨ (B ∧ C)` becomes `(A ∨ B) ∧ (A ∨ C)` and symmetrically.
/// Expects NNF input. Worst-case exponential; meant for small inputs.
pub fn distribute_or_over_and(formula: &Formula) -> Result<Formula, PreprocessError> {
    match formula {
        Formula::Var(_) => Ok(formula.clone()),
        Formula::Not(operand) => Ok(Formula::not(distribute_or_over_and(operand)?)),
        Formula::And(left, right) => Ok(Formula::and(
            distribute_or_over_and(left)?,
            distribute_or_over_and(right)?,
        )),
        Formula::Or(left, right) => {
            let left = distribute_or_over_and(left)?;
            let right = distribute_or_over_and(right)?;
            distribute_disjunction(left, right)
        }
        Formula::Implies(_, _) | Formula::Biconditional(_, _) => Err(PreprocessError::InvalidFormula(
            format!("implication not eliminated before distribution: {}", formula),
        )),
    }
}

fn distribute_disjunction(left: Formula, right: Formula) -> Result<Formula, PreprocessError> {
    if let Formula::And(right_left, right_right) = right {
        return Ok(Formula::and(
            distribute_disjunction(left.clone(), *right_left)?,
            distribute_disjunction(left, *right_right)?,
        ));
    }
    if let Formula::And(left_left, left_right) = left {
        return Ok(Formula::and(
            distribute_disjunction(*left_left, right.clone())?,
            distribute_disjunction(*left_right, right)?,
        ));
    }
    Ok(Formula::or(left, right))
}

/// Converts a formula to an equivalent CNF by distribution.
pub fn to_cnf_classical(formula: &Formula) -> Result<CNFFormula, PreprocessError> {
    let nnf = to_nnf(formula)?;
    let distributed = distribute_or_over_and(&nnf)?;
    flatten_cnf_shaped(&distributed)
}

/// Walks a distributed formula into clauses. Conjunctions split,
/// maximal OR-chains become single clauses. Both walks use explicit
/// stacks so deeply nested inputs cannot overflow the call stack.
fn flatten_cnf_shaped(formula: &Formula) -> Result<CNFFormula, PreprocessError> {
    let mut cnf = CNFFormula::empty();
    let mut pending = vec![formula];

    while let Some(current) = pending.pop() {
        match current {
            Formula::And(left, right) => {
                pending.push(right);
                pending.push(left);
            }
            _ => cnf.push(clause_from_or_chain(current)?),
        }
    }

    Ok(cnf)
}

fn clause_from_or_chain(formula: &Formula) -> Result<Clause, PreprocessError> {
    let mut literals = Vec::new();
    let mut pending = vec![formula];

    while let Some(current) = pending.pop() {
        match current {
            Formula::Or(left, right) => {
                pending.push(right);
                pending.push(left);
            }
            _ => literals.push(literal_from(current)?),
        }
    }

    Ok(Clause::new(literals))
}

fn literal_from(formula: &Formula) -> Result<Literal, PreprocessError> {
    match formula {
        Formula::Var(name) => Ok(Literal::pos(name.clone())),
        Formula::Not(operand) => match &**operand {
            Formula::Var(name) => Ok(Literal::neg(name.clone())),
            _ => Err(PreprocessError::InvalidFormula(format!(
                "expected a literal, got {}",
                formula
            ))),
        },
        _ => Err(PreprocessError::InvalidFormula(format!(
            "expected a literal, got {}",
            formula
        ))),
    }
}

/// Assigns auxiliary `z_<n>` names to the non-leaf subformulas of an
/// NNF tree. Numbers are handed out top-down (the root is `z_1`);
/// definitions are emitted child-first so a definition only refers to
/// auxiliaries already defined.
#[derive(Default)]
struct TseytinEncoder {
    counter: usize,
    definitions: Vec<Formula>,
}

impl TseytinEncoder {
    fn fresh(&mut self) -> String {
        self.counter += 1;
        format!("z_{}", self.counter)
    }

    /// Returns the literal standing for `formula` in its parent's
    /// definition: the literal itself for leaves, a fresh positive
    /// auxiliary for connectives.
    fn encode(&mut self, formula: &Formula) -> Result<Literal, PreprocessError> {
        match formula {
            Formula::Var(name) => Ok(Literal::pos(name.clone())),
            Formula::Not(operand) => match &**operand {
                Formula::Var(name) => Ok(Literal::neg(name.clone())),
                _ => Err(PreprocessError::InvalidFormula(format!(
                    "negation not pushed to a variable: {}",
                    formula
                ))),
            },
            Formula::And(left, right) | Formula::Or(left, right) => {
                let auxiliary = self.fresh();
                let left = literal_formula(&self.encode(left)?);
                let right = literal_formula(&self.encode(right)?);
                let body = match formula {
                    Formula::And(_, _) => Formula::And(Box::new(left), Box::new(right)),
                    _ => Formula::Or(Box::new(left), Box::new(right)),
                };
                self.definitions
                    .push(Formula::biconditional(Formula::var(auxiliary.clone()), body));
                Ok(Literal::pos(auxiliary))
            }
            Formula::Implies(_, _) | Formula::Biconditional(_, _) => {
                Err(PreprocessError::InvalidFormula(format!(
                    "implication not eliminated before Tseytin encoding: {}",
                    formula
                )))
            }
        }
    }
}

fn literal_formula(literal: &Literal) -> Formula {
    if literal.negated {
        Formula::not(Formula::var(literal.variable.clone()))
    } else {
        Formula::var(literal.variable.clone())
    }
}

/// Converts a formula to an equisatisfiable CNF by the Tseytin
/// encoding: one biconditional definition per non-leaf subformula,
/// each converted by distribution, plus a unit clause asserting the
/// root. Satisfying assignments project onto the original variables by
/// ignoring the `z_` auxiliaries. When the NNF input is a bare
/// literal there is nothing to define and the literal is asserted
/// directly.
pub fn to_cnf_tseytin(formula: &Formula) -> Result<CNFFormula, PreprocessError> {
    let nnf = to_nnf(formula)?;

    let mut encoder = TseytinEncoder::default();
    let root = encoder.encode(&nnf)?;

    let mut cnf = CNFFormula::empty();
    for definition in &encoder.definitions {
        cnf.extend(to_cnf_classical(definition)?);
    }
    cnf.push(Clause::unit(root));
    Ok(cnf)
}

/// Checks that every clause has at most three literals.
pub fn is_3cnf(cnf: &CNFFormula) -> bool {
    cnf.clauses.iter().all(|clause| clause.len() <= 3)
}

/// Splits clauses wider than three literals with the ladder encoding:
/// `(ℓ₁ ∨ ℓ₂ ∨ … ∨ ℓₖ)` becomes
/// `(ℓ₁ ∨ ℓ₂ ∨ a₁) ∧ (¬a₁ ∨ ℓ₃ ∨ a₂) ∧ … ∧ (¬aₖ₋₃ ∨ ℓₖ₋₁ ∨ ℓₖ)`.
/// The `a_<n>` counter runs across the whole formula so fresh names
/// never collide. Equisatisfiable; solutions on the original
/// variables are preserved.
pub fn ensure_3cnf(cnf: &CNFFormula) -> CNFFormula {
    let mut counter = 0usize;
    let mut fresh = || {
        counter += 1;
        format!("a_{}", counter)
    };

    let mut result = CNFFormula::empty();
    for clause in &cnf.clauses {
        if clause.len() <= 3 {
            result.push(clause.clone());
            continue;
        }

        let literals = &clause.literals;
        let last = literals.len() - 1;

        let mut carry = fresh();
        result.push(Clause::new(vec![
            literals[0].clone(),
            literals[1].clone(),
            Literal::pos(carry.clone()),
        ]));

        for literal in &literals[2..last - 1] {
            let next = fresh();
            result.push(Clause::new(vec![
                Literal::neg(carry),
                literal.clone(),
                Literal::pos(next.clone()),
            ]));
            carry = next;
        }

        result.push(Clause::new(vec![
            Literal::neg(carry),
            literals[last - 1].clone(),
            literals[last].clone(),
        ]));
    }
    result
}

use thiserror::Error;

use crate::cnf::{CNFFormula, Clause, Literal};

/// Failures of the DIMACS CNF reader
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimacsError {
    #[error("invalid DIMACS header: {0}")]
    InvalidHeader(String),
    #[error("clause must end with 0: {0}")]
    ClauseMissingZero(String),
    #[error("invalid literal '{0}' in clause")]
    InvalidLiteral(String),
    #[error("variable {variable} exceeds declared variable count {declared}")]
    VariableOutOfRange { variable: u64, declared: u64 },
    #[error("expected {expected} clauses, found {found}")]
    ClauseCountMismatch { expected: usize, found: usize },
}

/// Reads a DIMACS CNF document into a [`CNFFormula`].
///
/// Literal `k` becomes the variable `x<k>`, `-k` its negation. Comment
/// lines (`c`), blank lines, `%` markers and lone `0` lines are
/// skipped. The clause count must match the `p cnf` header.
pub fn parse_dimacs(input: &str) -> Result<CNFFormula, DimacsError> {
    let mut declared_variables: u64 = 0;
    let mut declared_clauses: usize = 0;
    let mut clauses: Vec<Clause> = Vec::new();

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('c') || line == "%" {
            continue;
        }

        if line.starts_with('p') {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 4 || parts[0] != "p" || parts[1] != "cnf" {
                return Err(DimacsError::InvalidHeader(line.to_string()));
            }
            declared_variables = parts[2]
                .parse()
                .map_err(|_| DimacsError::InvalidHeader(line.to_string()))?;
            declared_clauses = parts[3]
                .parse()
                .map_err(|_| DimacsError::InvalidHeader(line.to_string()))?;
            continue;
        }

        if line == "0" {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.last() != Some(&"0") {
            return Err(DimacsError::ClauseMissingZero(line.to_string()));
        }

        let mut literals: Vec<Literal> = Vec::with_capacity(tokens.len() - 1);
        for token in &tokens[..tokens.len() - 1] {
            let number: i64 = token
                .parse()
                .map_err(|_| DimacsError::InvalidLiteral(token.to_string()))?;
            if number == 0 {
                break;
            }

            let magnitude = number.unsigned_abs();
            if magnitude > declared_variables {
                return Err(DimacsError::VariableOutOfRange {
                    variable: magnitude,
                    declared: declared_variables,
                });
            }

            literals.push(Literal::new(format!("x{}", magnitude), number < 0));
        }

        if !literals.is_empty() {
            clauses.push(Clause::new(literals));
        }
    }

    if clauses.len() != declared_clauses {
        return Err(DimacsError::ClauseCountMismatch {
            expected: declared_clauses,
            found: clauses.len(),
        });
    }

    Ok(CNFFormula::new(clauses))
}

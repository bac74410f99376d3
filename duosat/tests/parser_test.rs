use duosat::{parse_formula, Formula, ParseError};

fn var(name: &str) -> Formula {
    Formula::var(name)
}

#[test]
fn parses_single_variable() {
    assert_eq!(parse_formula("p"), Ok(var("p")));
}

#[test]
fn parses_alphanumeric_identifiers() {
    assert_eq!(parse_formula("x12"), Ok(var("x12")));
}

#[test]
fn parses_unicode_operators() {
    assert_eq!(
        parse_formula("¬p ∧ q ∨ r → s ↔ t"),
        Ok(Formula::biconditional(
            Formula::implies(
                Formula::or(Formula::and(Formula::not(var("p")), var("q")), var("r")),
                var("s"),
            ),
            var("t"),
        ))
    );
}

#[test]
fn parses_ascii_aliases() {
    assert_eq!(
        parse_formula("not p and q"),
        Ok(Formula::and(Formula::not(var("p")), var("q")))
    );
    assert_eq!(
        parse_formula("p or q"),
        Ok(Formula::or(var("p"), var("q")))
    );
    assert_eq!(
        parse_formula("p -> q"),
        Ok(Formula::implies(var("p"), var("q")))
    );
    assert_eq!(
        parse_formula("p <-> q"),
        Ok(Formula::biconditional(var("p"), var("q")))
    );
}

#[test]
fn conjunction_binds_tighter_than_disjunction() {
    assert_eq!(
        parse_formula("p ∨ q ∧ r"),
        Ok(Formula::or(var("p"), Formula::and(var("q"), var("r"))))
    );
}

#[test]
fn negation_binds_tightest() {
    assert_eq!(
        parse_formula("¬p ∧ q"),
        Ok(Formula::and(Formula::not(var("p")), var("q")))
    );
}

#[test]
fn double_negation_nests() {
    assert_eq!(
        parse_formula("¬¬p"),
        Ok(Formula::not(Formula::not(var("p"))))
    );
}

#[test]
fn implication_is_right_associative() {
    assert_eq!(
        parse_formula("p → q → r"),
        Ok(Formula::implies(
            var("p"),
            Formula::implies(var("q"), var("r")),
        ))
    );
}

#[test]
fn biconditional_is_left_associative() {
    assert_eq!(
        parse_formula("p ↔ q ↔ r"),
        Ok(Formula::biconditional(
            Formula::biconditional(var("p"), var("q")),
            var("r"),
        ))
    );
}

#[test]
fn parentheses_override_precedence() {
    assert_eq!(
        parse_formula("(p ∨ q) ∧ r"),
        Ok(Formula::and(Formula::or(var("p"), var("q")), var("r")))
    );
}

#[test]
fn whitespace_is_insignificant() {
    assert_eq!(parse_formula("  p∧q  "), parse_formula("p ∧ q"));
}

#[test]
fn rejects_invalid_characters() {
    assert_eq!(
        parse_formula("p & q"),
        Err(ParseError::InvalidCharacter('&'))
    );
}

#[test]
fn rejects_empty_input() {
    assert_eq!(parse_formula(""), Err(ParseError::UnexpectedEnd));
}

#[test]
fn rejects_dangling_operator() {
    assert_eq!(parse_formula("p ∧"), Err(ParseError::UnexpectedEnd));
}

#[test]
fn rejects_missing_closing_parenthesis() {
    assert_eq!(
        parse_formula("(p ∨ q"),
        Err(ParseError::MissingClosingParen)
    );
}

#[test]
fn rejects_trailing_input() {
    assert_eq!(
        parse_formula("p q"),
        Err(ParseError::TrailingInput("q".to_string()))
    );
}

#[test]
fn rejects_leading_operator() {
    assert_eq!(
        parse_formula("∧ p"),
        Err(ParseError::UnexpectedToken("∧".to_string()))
    );
}

#[test]
fn display_round_trips_through_parser() {
    let inputs = ["¬p ∧ (q ∨ r)", "p → q → r", "(p ↔ q) ∧ ¬(r ∨ s)"];
    for input in &inputs {
        let formula = parse_formula(input).unwrap();
        assert_eq!(parse_formula(&formula.to_string()), Ok(formula));
    }
}

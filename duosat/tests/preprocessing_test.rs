use proptest::prelude::*;

use duosat::{
    distribute_or_over_and, eliminate_implications, ensure_3cnf, is_3cnf, push_negations_inward,
    to_cnf_classical, to_cnf_tseytin, to_nnf, CNFFormula, Clause, DPLLSolver, Formula,
    Interpretation, Literal, PreprocessError,
};

fn var(name: &str) -> Formula {
    Formula::var(name)
}

/// Every total assignment over the given variables, in a fixed order.
fn all_assignments(variables: &[String]) -> Vec<Interpretation> {
    (0..1u32 << variables.len())
        .map(|bits| {
            variables
                .iter()
                .enumerate()
                .map(|(index, variable)| (variable.clone(), bits & (1 << index) != 0))
                .collect()
        })
        .collect()
}

fn arb_formula() -> impl Strategy<Value = Formula> {
    let leaf = (0..4usize).prop_map(|index| Formula::var(format!("v{}", index)));
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(Formula::not),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Formula::and(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Formula::or(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Formula::implies(l, r)),
            (inner.clone(), inner).prop_map(|(l, r)| Formula::biconditional(l, r)),
        ]
    })
}

#[test]
fn implication_becomes_disjunction() {
    let result = eliminate_implications(&Formula::implies(var("p"), var("q")));
    assert_eq!(result, Formula::or(Formula::not(var("p")), var("q")));
}

#[test]
fn biconditional_becomes_two_disjunctions() {
    let result = eliminate_implications(&Formula::biconditional(var("p"), var("q")));
    assert_eq!(
        result,
        Formula::and(
            Formula::or(Formula::not(var("p")), var("q")),
            Formula::or(Formula::not(var("q")), var("p")),
        )
    );
}

#[test]
fn connectives_recurse_structurally() {
    let nested = Formula::and(Formula::implies(var("p"), var("q")), var("r"));
    assert_eq!(
        eliminate_implications(&nested),
        Formula::and(Formula::or(Formula::not(var("p")), var("q")), var("r"))
    );
}

#[test]
fn double_negation_is_eliminated() {
    let result = push_negations_inward(&Formula::not(Formula::not(var("p")))).unwrap();
    assert_eq!(result, var("p"));
}

#[test]
fn de_morgan_over_conjunction() {
    let result = push_negations_inward(&Formula::not(Formula::and(var("p"), var("q")))).unwrap();
    assert_eq!(
        result,
        Formula::or(Formula::not(var("p")), Formula::not(var("q")))
    );
}

#[test]
fn de_morgan_over_disjunction() {
    let result = push_negations_inward(&Formula::not(Formula::or(var("p"), var("q")))).unwrap();
    assert_eq!(
        result,
        Formula::and(Formula::not(var("p")), Formula::not(var("q")))
    );
}

#[test]
fn nnf_rejects_remaining_implications() {
    let formula = Formula::not(Formula::implies(var("p"), var("q")));
    assert!(matches!(
        push_negations_inward(&formula),
        Err(PreprocessError::InvalidFormula(_))
    ));
}

#[test]
fn distribution_splits_or_over_and() {
    let formula = Formula::or(var("a"), Formula::and(var("b"), var("c")));
    assert_eq!(
        distribute_or_over_and(&formula).unwrap(),
        Formula::and(
            Formula::or(var("a"), var("b")),
            Formula::or(var("a"), var("c")),
        )
    );
}

#[test]
fn classical_cnf_of_a_literal_is_a_unit_clause() {
    let cnf = to_cnf_classical(&Formula::not(var("p"))).unwrap();
    assert_eq!(cnf, CNFFormula::new(vec![Clause::unit(Literal::neg("p"))]));
}

#[test]
fn tseytin_of_a_literal_keeps_its_polarity() {
    let cnf = to_cnf_tseytin(&Formula::not(var("p"))).unwrap();
    assert_eq!(cnf, CNFFormula::new(vec![Clause::unit(Literal::neg("p"))]));
}

#[test]
fn tseytin_asserts_the_root_auxiliary() {
    // (p ∨ q) ∧ r gets z_1 for the conjunction and z_2 for the
    // disjunction; the last clause asserts z_1.
    let formula = Formula::and(Formula::or(var("p"), var("q")), var("r"));
    let cnf = to_cnf_tseytin(&formula).unwrap();

    let variables = cnf.variables();
    assert!(variables.contains("z_1"));
    assert!(variables.contains("z_2"));
    assert_eq!(
        cnf.clauses.last(),
        Some(&Clause::unit(Literal::pos("z_1")))
    );

    let mut solver = DPLLSolver::new(cnf);
    assert!(solver.solve().is_sat());

    let mut projected = Interpretation::default();
    for name in ["p", "q", "r"].iter() {
        let value = solver.assignment().get(*name).copied().unwrap_or(false);
        projected.insert(name.to_string(), value);
    }
    assert_eq!(formula.eval(&projected), Some(true));
}

#[test]
fn ensure_3cnf_splits_wide_clauses() {
    let wide = Clause::new(vec![
        Literal::pos("p"),
        Literal::pos("q"),
        Literal::pos("r"),
        Literal::pos("s"),
        Literal::pos("t"),
    ]);
    let cnf = ensure_3cnf(&CNFFormula::new(vec![wide]));

    assert!(is_3cnf(&cnf));
    assert_eq!(cnf.len(), 3);
    assert_eq!(
        cnf.clauses[0],
        Clause::new(vec![
            Literal::pos("p"),
            Literal::pos("q"),
            Literal::pos("a_1"),
        ])
    );
    assert_eq!(
        cnf.clauses[1],
        Clause::new(vec![
            Literal::neg("a_1"),
            Literal::pos("r"),
            Literal::pos("a_2"),
        ])
    );
    assert_eq!(
        cnf.clauses[2],
        Clause::new(vec![
            Literal::neg("a_2"),
            Literal::pos("s"),
            Literal::pos("t"),
        ])
    );
}

#[test]
fn ensure_3cnf_keeps_narrow_clauses() {
    let cnf = CNFFormula::new(vec![
        Clause::new(vec![Literal::pos("p"), Literal::neg("q"), Literal::pos("r")]),
        Clause::unit(Literal::neg("p")),
    ]);
    assert!(is_3cnf(&cnf));
    assert_eq!(ensure_3cnf(&cnf), cnf);
}

proptest! {
    #[test]
    fn classical_cnf_is_equivalent(formula in arb_formula()) {
        let cnf = to_cnf_classical(&formula).unwrap();
        let variables: Vec<String> = formula.variables().into_iter().collect();

        for assignment in all_assignments(&variables) {
            prop_assert_eq!(formula.eval(&assignment), cnf.eval(&assignment));
        }
    }

    #[test]
    fn nnf_is_idempotent(formula in arb_formula()) {
        let nnf = to_nnf(&formula).unwrap();
        prop_assert_eq!(push_negations_inward(&nnf).unwrap(), nnf);
    }

    #[test]
    fn double_negation_of_nnf_is_identity(formula in arb_formula()) {
        let nnf = to_nnf(&formula).unwrap();
        let double_negated = Formula::not(Formula::not(nnf.clone()));
        prop_assert_eq!(push_negations_inward(&double_negated).unwrap(), nnf);
    }

    #[test]
    fn tseytin_is_equisatisfiable(formula in arb_formula()) {
        let variables: Vec<String> = formula.variables().into_iter().collect();
        let directly_satisfiable = all_assignments(&variables)
            .iter()
            .any(|assignment| formula.eval(assignment) == Some(true));

        let cnf = to_cnf_tseytin(&formula).unwrap();
        let mut solver = DPLLSolver::new(cnf);
        let result = solver.solve();

        prop_assert_eq!(result.is_sat(), directly_satisfiable);

        if result.is_sat() {
            // Projecting the model onto the original variables must
            // satisfy the original formula.
            let projected: Interpretation = variables
                .iter()
                .map(|variable| {
                    let value = solver.assignment().get(variable).copied().unwrap_or(false);
                    (variable.clone(), value)
                })
                .collect();
            prop_assert_eq!(formula.eval(&projected), Some(true));
        }
    }

    #[test]
    fn tseytin_auxiliaries_never_collide(formula in arb_formula()) {
        let original = formula.variables();
        let cnf = to_cnf_tseytin(&formula).unwrap();
        for variable in cnf.variables() {
            prop_assert!(variable.starts_with("z_") || original.contains(&variable));
        }
    }

    #[test]
    fn ensure_3cnf_output_is_3cnf(formula in arb_formula()) {
        let cnf = to_cnf_classical(&formula).unwrap();
        prop_assert!(is_3cnf(&ensure_3cnf(&cnf)));
    }
}

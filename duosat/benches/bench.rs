use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use duosat::{CDCLSolver, CNFFormula, Clause, DPLLSolver, Literal};

/// Pigeonhole principle with one pigeon too many: UNSAT, and hard for
/// resolution-based solvers, which makes it a good worst-case probe.
fn pigeonhole(holes: usize) -> CNFFormula {
    let pigeons = holes + 1;
    let mut formula = CNFFormula::empty();

    for pigeon in 0..pigeons {
        let clause = (0..holes)
            .map(|hole| Literal::pos(format!("p{}h{}", pigeon, hole)))
            .collect();
        formula.push(clause);
    }

    for hole in 0..holes {
        for first in 0..pigeons {
            for second in (first + 1)..pigeons {
                formula.push(Clause::new(vec![
                    Literal::neg(format!("p{}h{}", first, hole)),
                    Literal::neg(format!("p{}h{}", second, hole)),
                ]));
            }
        }
    }

    formula
}

/// Random 3-SAT at a fixed seed so every run measures the same
/// instance.
fn random_3sat(variables: usize, clauses: usize, seed: u64) -> CNFFormula {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..clauses)
        .map(|_| {
            (0..3)
                .map(|_| {
                    let index = rng.gen_range(0, variables);
                    Literal::new(format!("v{}", index), rng.gen::<bool>())
                })
                .collect::<Clause>()
        })
        .collect()
}

fn instances() -> Vec<(String, CNFFormula)> {
    vec![
        ("pigeonhole-3".to_string(), pigeonhole(3)),
        ("pigeonhole-4".to_string(), pigeonhole(4)),
        ("random-3sat-15".to_string(), random_3sat(15, 64, 42)),
        ("random-3sat-20".to_string(), random_3sat(20, 86, 7)),
    ]
}

fn criterion_benchmark(c: &mut Criterion) {
    let instances = instances();

    let mut group = c.benchmark_group("dpll");
    for (name, formula) in &instances {
        group.bench_function(name.as_str(), |b| {
            b.iter_batched(
                || DPLLSolver::new(formula.clone()),
                |mut solver| black_box(solver.solve()),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();

    let mut group = c.benchmark_group("cdcl");
    for (name, formula) in &instances {
        group.bench_function(name.as_str(), |b| {
            b.iter_batched(
                || CDCLSolver::new(formula.clone()),
                |mut solver| black_box(solver.solve()),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = criterion_benchmark
}
criterion_main!(benches);

mod config;

use std::path::PathBuf;
use std::process::exit;
use std::time::Instant;

use clap::{App, Arg};

use config::{Config, EngineChoice, Input};
use duosat::{
    ensure_3cnf, parse_dimacs, parse_formula, to_cnf_classical, to_cnf_tseytin, CDCLSolver,
    CNFFormula, DPLLSolver, DecisionResult, Solver,
};

fn make_config() -> Config {
    let matches = App::new("duosat")
        .version("0.1.0")
        .about("Decides propositional satisfiability with DPLL and CDCL side by side")
        .arg(
            Arg::with_name("formula")
                .index(1)
                .required_unless("dimacs")
                .conflicts_with("dimacs")
                .help("Formula to decide, e.g. \"(p -> q) and not q\""),
        )
        .arg(
            Arg::with_name("dimacs")
                .long("dimacs")
                .short("d")
                .takes_value(true)
                .help("Read a DIMACS CNF file instead of parsing a formula"),
        )
        .arg(
            Arg::with_name("engine")
                .long("engine")
                .short("e")
                .takes_value(true)
                .possible_values(&["dpll", "cdcl", "both"])
                .default_value("both")
                .help("Decision procedure to run"),
        )
        .arg(
            Arg::with_name("tseytin")
                .long("tseytin")
                .short("t")
                .help("Use the structure-preserving Tseytin encoding instead of distribution"),
        )
        .arg(
            Arg::with_name("3cnf")
                .long("3cnf")
                .help("Flatten the CNF to clauses of at most three literals"),
        )
        .arg(
            Arg::with_name("return-code")
                .long("return-code")
                .short("r")
                .help("Exit with 10 if satisfiable and 20 if not (useful for scripting)"),
        )
        .get_matches();

    let input = match matches.value_of("dimacs") {
        Some(path) => Input::Dimacs(PathBuf::from(path)),
        None => Input::Formula(matches.value_of("formula").unwrap().to_string()),
    };
    let engine = match matches.value_of("engine").unwrap() {
        "dpll" => EngineChoice::Dpll,
        "cdcl" => EngineChoice::Cdcl,
        _ => EngineChoice::Both,
    };

    Config {
        input,
        engine,
        tseytin: matches.is_present("tseytin"),
        three_cnf: matches.is_present("3cnf"),
        return_code: matches.is_present("return-code"),
    }
}

fn load_cnf(config: &Config) -> Result<CNFFormula, String> {
    match &config.input {
        Input::Dimacs(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|error| format!("cannot read {}: {}", path.display(), error))?;
            parse_dimacs(&text).map_err(|error| error.to_string())
        }
        Input::Formula(text) => {
            let formula = parse_formula(text).map_err(|error| error.to_string())?;
            let cnf = if config.tseytin {
                to_cnf_tseytin(&formula)
            } else {
                to_cnf_classical(&formula)
            };
            cnf.map_err(|error| error.to_string())
        }
    }
}

fn report(name: &str, solver: &mut dyn Solver, variables: &[String]) -> DecisionResult {
    let start = Instant::now();
    let result = solver.solve();
    let elapsed = start.elapsed();

    println!(
        "{:<5} {:<6} {:.4}s",
        name,
        result.to_string(),
        elapsed.as_secs_f64()
    );
    if result.is_sat() {
        for variable in variables {
            let value = solver.assignment().get(variable).copied().unwrap_or(false);
            println!("    {} = {}", variable, value);
        }
    }
    result
}

fn run(config: &Config) -> i32 {
    let cnf = match load_cnf(config) {
        Ok(cnf) => cnf,
        Err(message) => {
            eprintln!("error: {}", message);
            return 1;
        }
    };
    let cnf = if config.three_cnf {
        ensure_3cnf(&cnf)
    } else {
        cnf
    };

    println!("cnf: {}", cnf);
    let variables: Vec<String> = cnf.variables().into_iter().collect();

    let mut decisions = Vec::new();
    if config.engine != EngineChoice::Cdcl {
        let mut solver = DPLLSolver::new(cnf.clone());
        decisions.push(report("dpll", &mut solver, &variables));
    }
    if config.engine != EngineChoice::Dpll {
        let mut solver = CDCLSolver::new(cnf);
        decisions.push(report("cdcl", &mut solver, &variables));
    }

    if decisions.windows(2).any(|pair| pair[0] != pair[1]) {
        eprintln!("error: the engines disagree, this is a solver bug");
        return 2;
    }

    if config.return_code {
        match decisions[0] {
            DecisionResult::Sat => 10,
            DecisionResult::Unsat => 20,
        }
    } else {
        0
    }
}

fn main() {
    env_logger::init();
    let config = make_config();
    exit(run(&config));
}

mod config;
mod plotting;

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{App, Arg};

use config::Config;
use duosat::{parse_dimacs, CDCLSolver, CNFFormula, DPLLSolver, DecisionResult};

fn make_config() -> Config {
    let matches = App::new("duosat benchmarking")
        .version("0.1.0")
        .about("Races the DPLL and CDCL engines over a directory of DIMACS files")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .required(true)
                .help("Directory of .cnf testing cases"),
        )
        .arg(
            Arg::with_name("plot")
                .short("p")
                .long("plot")
                .takes_value(true)
                .help("Write a cactus plot of the runtimes to this SVG file"),
        )
        .get_matches();

    Config {
        input: PathBuf::from(matches.value_of("input").unwrap()),
        plot: matches.value_of("plot").map(PathBuf::from),
    }
}

fn load_files(dir: &Path) -> io::Result<Vec<(String, CNFFormula)>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "cnf") {
            continue;
        }

        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("???")
            .to_string();
        let content = std::fs::read_to_string(&path)?;
        match parse_dimacs(&content) {
            Ok(formula) => out.push((name, formula)),
            Err(error) => eprintln!("skipping {}: {}", name, error),
        }
    }
    out.sort_by(|left, right| left.0.cmp(&right.0));
    Ok(out)
}

fn time_solve<S, F>(make_solver: F, formula: &CNFFormula) -> (DecisionResult, Duration)
where
    S: duosat::Solver,
    F: FnOnce(CNFFormula) -> S,
{
    let mut solver = make_solver(formula.clone());
    let start = Instant::now();
    let result = solver.solve();
    (result, start.elapsed())
}

fn main() {
    env_logger::init();
    let config = make_config();

    let formulae = match load_files(&config.input) {
        Ok(formulae) => formulae,
        Err(error) => {
            eprintln!("error: cannot read {}: {}", config.input.display(), error);
            std::process::exit(1);
        }
    };

    println!(
        "{:<20} {:<8} {:<10} {:<8} {:<10}",
        "File", "CDCL", "Time", "DPLL", "Time"
    );
    println!("{}", "-".repeat(60));

    let mut cdcl_times = Vec::with_capacity(formulae.len());
    let mut dpll_times = Vec::with_capacity(formulae.len());
    let mut disagreements = 0usize;

    for (name, formula) in &formulae {
        let (cdcl_result, cdcl_time) = time_solve(CDCLSolver::new, formula);
        let (dpll_result, dpll_time) = time_solve(DPLLSolver::new, formula);

        println!(
            "{:<20} {:<8} {:<10.4} {:<8} {:<10.4}",
            name,
            cdcl_result.to_string(),
            cdcl_time.as_secs_f64(),
            dpll_result.to_string(),
            dpll_time.as_secs_f64(),
        );

        if cdcl_result != dpll_result {
            eprintln!("{}: the engines disagree, this is a solver bug", name);
            disagreements += 1;
        }

        cdcl_times.push(cdcl_time);
        dpll_times.push(dpll_time);
    }

    let total_cdcl: f64 = cdcl_times.iter().map(Duration::as_secs_f64).sum();
    let total_dpll: f64 = dpll_times.iter().map(Duration::as_secs_f64).sum();
    println!("{}", "-".repeat(60));
    println!(
        "{:<20} {:<8} {:<10.4} {:<8} {:<10.4}",
        "TOTAL", "", total_cdcl, "", total_dpll
    );
    if total_cdcl > 0.0 {
        println!(
            "DPLL is {:.1}% slower than CDCL overall",
            (total_dpll / total_cdcl - 1.0) * 100.0
        );
    }

    if let Some(path) = &config.plot {
        let measurements = vec![
            ("cdcl".to_string(), cdcl_times),
            ("dpll".to_string(), dpll_times),
        ];
        if let Err(error) = plotting::plot_runtimes(&measurements, path, (1000, 800)) {
            eprintln!("error: cannot write plot {}: {}", path.display(), error);
            std::process::exit(1);
        }
    }

    if disagreements > 0 {
        std::process::exit(2);
    }
}

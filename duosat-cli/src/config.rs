use std::path::PathBuf;

/// Where the problem comes from: a formula string to preprocess, or a
/// DIMACS file that is already CNF.
pub enum Input {
    Formula(String),
    Dimacs(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineChoice {
    Dpll,
    Cdcl,
    Both,
}

pub struct Config {
    pub input: Input,
    pub engine: EngineChoice,
    pub tseytin: bool,
    pub three_cnf: bool,
    pub return_code: bool,
}

use std::path::PathBuf;

pub struct Config {
    pub input: PathBuf,
    pub plot: Option<PathBuf>,
}

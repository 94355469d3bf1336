use std::{path::PathBuf, str::FromStr as _};

use clap::Parser;

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Stop after lexing.
    #[arg(long, group = "stage")]
    pub lex: bool,

    /// Stop after parsing.
    #[arg(long, group = "stage")]
    pub parse: bool,

    /// Stop after semantic analysis.
    #[arg(long, group = "stage")]
    pub validate: bool,

    /// Stop after producing the TAC IR.
    #[arg(long, group = "stage")]
    pub tacky: bool,

    /// Stop after code generation.
    #[arg(long, group = "stage")]
    pub codegen: bool,

    #[arg(value_parser = path_exists)]
    pub input_path: PathBuf,

    #[clap(env, long, short)]
    pub verbose: bool,
}

pub fn path_exists(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from_str(s).map_err(|e| format!("Invalid path: {}", e))?;
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("Path does not exist: {}", s))
    }
}

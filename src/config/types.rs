use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

pub const DEFAULT_IMAGE: &str = "rust:1.55";

/// Steps run inside the container, in order.
pub const DEFAULT_COMMANDS: [&str; 5] = [
    "rustup component add clippy rustfmt",
    "cargo build --release --verbose",
    "cargo test --verbose",
    "cargo fmt --all -- --check",
    "cargo clippy -- -D warnings",
];

const KEEP_ALIVE: [&str; 3] = ["tail", "-f", "/dev/null"];

const COLOR_ENV: &str = "CARGO_TERM_COLOR=always";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub image: String,
    /// Host directory mounted at the identical path and used as the
    /// container's working directory.
    pub work_dir: PathBuf,
    pub env: Vec<String>,
    /// Blocks forever so the container stays up for later execs.
    pub keep_alive: Vec<String>,
    pub commands: Vec<String>,
}

impl Config {
    pub fn for_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            image: DEFAULT_IMAGE.to_string(),
            work_dir: dir.as_ref().to_path_buf(),
            env: vec![COLOR_ENV.to_string()],
            keep_alive: KEEP_ALIVE.iter().map(|s| s.to_string()).collect(),
            commands: DEFAULT_COMMANDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Rooted at the process's current directory.
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to read the current directory")?;
        Ok(Self::for_dir(cwd))
    }
}

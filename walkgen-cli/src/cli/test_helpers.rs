//! Helpers shared across CLI tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::{Cli, CliError, Command, PolicyArg, SampleCommand, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_text_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

pub(super) fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::to_owned)
        .collect())
}

/// Sample command writing both streams into `dir`.
pub(super) fn sample_command(
    dir: &TempDir,
    graph: PathBuf,
    length: usize,
    count: usize,
    seed: u64,
) -> SampleCommand {
    SampleCommand {
        graph,
        length,
        count,
        output: dir.path().join("paths.txt"),
        seed: Some(seed),
        queries: Some(dir.path().join("queries.txt")),
        policy: PolicyArg::Uniform,
        forbid: String::new(),
        max_attempts: 1_000,
    }
}

pub(super) fn run_expecting_error(command: Command, panic_msg: &str) -> CliError {
    match run_cli(Cli { command }) {
        Ok(outcome) => panic!("{panic_msg}: {outcome:?}"),
        Err(err) => err,
    }
}

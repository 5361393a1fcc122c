//! Command-line interface for sampling, generating and verifying query
//! workloads.

mod commands;

pub use commands::{
    Cli, CliError, Command, CommandOutcome, GenerateCommand, GraphShape, PolicyArg, RandomArgs,
    SampleCommand, VerifyCommand, render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;

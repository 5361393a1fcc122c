//! Support library for the walkgen binary.
//!
//! Exposes the command pipeline and logging setup so doctests and tests can
//! drive commands in-process.

pub mod cli;
pub mod logging;

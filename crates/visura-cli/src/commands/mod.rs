//! CLI subcommands.

pub mod ateco;
pub mod batch;
pub mod config;
pub mod process;

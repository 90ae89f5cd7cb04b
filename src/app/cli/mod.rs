//! CLI module containing argument parsing, configuration and errors

pub mod args;
pub mod config;
pub mod error;

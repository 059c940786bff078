//! Command-line interface for tamostudy.

pub mod args;
pub mod commands;

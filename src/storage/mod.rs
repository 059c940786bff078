//! Storage layer for tamostudy.
//!
//! SQLite-based persistence for the study profile, achievements and the
//! focus phase history.

mod database;
mod migrations;

pub use database::Database;

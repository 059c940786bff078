//! Feature implementations for tamostudy.
//!
//! - Focus timer, history and reports
//! - Study profile and achievements

pub mod focus;
pub mod profile;

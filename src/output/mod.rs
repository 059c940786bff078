//! Output formatting for tamostudy.
//!
//! Every listing command renders either pretty text or JSON.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::TamoError;
use crate::features::focus::SessionRecord;
use crate::features::profile::{Profile, ShopReceipt};

pub use json::*;
pub use pretty::*;

/// Format phase history based on output format
///
/// # Errors
///
/// Returns `TamoError::Json` if JSON serialization fails.
pub fn format_history(records: &[SessionRecord], format: OutputFormat) -> Result<String, TamoError> {
    match format {
        OutputFormat::Pretty => Ok(format_history_pretty(records)),
        OutputFormat::Json => format_history_json(records),
    }
}

/// Format the profile based on output format
///
/// # Errors
///
/// Returns `TamoError::Json` if JSON serialization fails.
pub fn format_profile(profile: &Profile, format: OutputFormat) -> Result<String, TamoError> {
    match format {
        OutputFormat::Pretty => Ok(format_profile_pretty(profile)),
        OutputFormat::Json => to_json(profile),
    }
}

/// Format the achievement list based on output format
///
/// # Errors
///
/// Returns `TamoError::Json` if JSON serialization fails.
pub fn format_achievements(profile: &Profile, format: OutputFormat) -> Result<String, TamoError> {
    match format {
        OutputFormat::Pretty => Ok(format_achievements_pretty(profile)),
        OutputFormat::Json => format_achievements_json(profile),
    }
}

/// Format the food shop based on output format
///
/// # Errors
///
/// Returns `TamoError::Json` if JSON serialization fails.
pub fn format_shop(receipt: &ShopReceipt, format: OutputFormat) -> Result<String, TamoError> {
    match format {
        OutputFormat::Pretty => Ok(format_shop_pretty(&receipt.profile, &receipt.unlocked)),
        OutputFormat::Json => format_shop_json(receipt),
    }
}

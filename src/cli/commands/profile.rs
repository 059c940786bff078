//! Profile and achievement commands.

use chrono::Local;
use tracing::info;

use crate::cli::args::{OutputFormat, ProfileCommands};
use crate::config::{Config, Paths};
use crate::error::TamoError;
use crate::features::profile::ProfileStore;
use crate::output::{format_achievements, format_profile, to_json};
use crate::storage::Database;

/// Execute profile subcommands.
///
/// # Errors
///
/// Returns an error if the database cannot be used or the new name is blank.
pub fn profile(
    cmd: Option<ProfileCommands>,
    config: &Config,
    paths: &Paths,
    format: OutputFormat,
) -> Result<String, TamoError> {
    let mut db = Database::open_in(paths)?;
    let current = db.transaction(|tx| {
        let store = ProfileStore::new(tx);
        store.load_or_create(&config.general.profile_name)?;
        store.settle_pet(Local::now().date_naive())?;
        store.require()
    })?;
    let store = ProfileStore::new(db.connection());

    match cmd.unwrap_or(ProfileCommands::Show) {
        ProfileCommands::Show => format_profile(&current, format),
        ProfileCommands::Rename { name } => {
            store.rename(&name)?;
            info!(from = %current.name, to = %name.trim(), "profile renamed");
            match format {
                OutputFormat::Json => to_json(&serde_json::json!({ "name": name.trim() })),
                OutputFormat::Pretty => Ok(format!("Profile renamed to {}", name.trim())),
            }
        }
    }
}

/// List achievements.
///
/// # Errors
///
/// Returns an error if the database cannot be used.
pub fn achievements(
    config: &Config,
    paths: &Paths,
    format: OutputFormat,
) -> Result<String, TamoError> {
    let db = Database::open_in(paths)?;
    let profile = ProfileStore::new(db.connection()).load_or_create(&config.general.profile_name)?;
    format_achievements(&profile, format)
}

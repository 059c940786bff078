//! Shop and feeding commands.

use chrono::Utc;
use colored::Colorize;

use crate::cli::args::{OutputFormat, ShopCommands};
use crate::config::{Config, Paths};
use crate::error::TamoError;
use crate::features::profile::{shop, Food, ProfileStore};
use crate::output::{format_pet_pretty, format_shop, format_unlocked, to_json};
use crate::storage::Database;

/// Show the shop or buy food.
///
/// # Errors
///
/// Returns `TamoError::InvalidInput` if the count is out of range or the
/// tokens do not cover the price.
pub fn shop(
    cmd: Option<ShopCommands>,
    config: &Config,
    paths: &Paths,
    format: OutputFormat,
) -> Result<String, TamoError> {
    let mut db = Database::open_in(paths)?;
    let name = &config.general.profile_name;

    match cmd.unwrap_or(ShopCommands::Menu) {
        ShopCommands::Menu => {
            let receipt = db.transaction(|tx| {
                ProfileStore::new(tx).load_or_create(name)?;
                shop::visit(tx, Utc::now())
            })?;
            format_shop(&receipt, format)
        }
        ShopCommands::Buy { food, count } => {
            let receipt = db.transaction(|tx| {
                ProfileStore::new(tx).load_or_create(name)?;
                shop::buy(tx, food, count, Utc::now())
            })?;
            match format {
                OutputFormat::Json => format_shop(&receipt, format),
                OutputFormat::Pretty => {
                    let cost = food.price() * i64::from(count);
                    Ok(format!(
                        "Bought {count} x {food} for {cost} tokens ({} left)\n\n{}",
                        receipt.profile.tokens,
                        format_shop(&receipt, format)?
                    ))
                }
            }
        }
    }
}

/// Feed Tamo one portion from the inventory.
///
/// # Errors
///
/// Returns `TamoError::NotFound` if the inventory has none of `food`, or
/// `TamoError::InvalidInput` if Tamo is full.
pub fn feed(
    food: Food,
    config: &Config,
    paths: &Paths,
    format: OutputFormat,
) -> Result<String, TamoError> {
    let mut db = Database::open_in(paths)?;
    let receipt = db.transaction(|tx| {
        ProfileStore::new(tx).load_or_create(&config.general.profile_name)?;
        shop::feed(tx, food, Utc::now())
    })?;

    match format {
        OutputFormat::Json => to_json(&receipt),
        OutputFormat::Pretty => {
            let mut lines = vec![
                format!("Tamo ate the {}.", food.name().bold()),
                format_pet_pretty(&receipt.profile.pet),
            ];
            lines.extend(receipt.unlocked.iter().map(|a| format_unlocked(*a)));
            Ok(lines.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(minutes: i64) -> (TempDir, Paths, Config) {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().to_path_buf());
        let config = Config::default();
        let db = Database::open_in(&paths).unwrap();
        let store = ProfileStore::new(db.connection());
        store.load_or_create(&config.general.profile_name).unwrap();
        store.report(minutes * 60).unwrap();
        (temp_dir, paths, config)
    }

    #[test]
    fn test_buy_then_feed() {
        let (_temp_dir, paths, config) = setup(300);

        let bought = shop(
            Some(ShopCommands::Buy {
                food: Food::Onigiri,
                count: 2,
            }),
            &config,
            &paths,
            OutputFormat::Pretty,
        )
        .unwrap();
        assert!(bought.contains("Bought 2 x Onigiri for 200 tokens (100 left)"));

        let fed = feed(Food::Onigiri, &config, &paths, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&fed).unwrap();
        assert_eq!(json["profile"]["pet"]["hunger"], 6);
        assert_eq!(json["profile"]["inventory"]["onigiri"], 1);
    }

    #[test]
    fn test_menu_json() {
        let (_temp_dir, paths, config) = setup(5);

        let output = shop(None, &config, &paths, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["tokens"], 5);
        assert_eq!(json["menu"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_feed_without_food() {
        let (_temp_dir, paths, config) = setup(0);
        let err = feed(Food::Cheesecake, &config, &paths, OutputFormat::Pretty).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}

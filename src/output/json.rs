//! JSON output formatting for tamostudy.

use serde::Serialize;
use serde_json::json;

use crate::error::TamoError;
use crate::features::focus::SessionRecord;
use crate::features::profile::{Achievement, Food, Profile, ShopReceipt};

/// Format phase history as JSON
///
/// # Errors
///
/// Returns `TamoError::Json` if JSON serialization fails.
pub fn format_history_json(records: &[SessionRecord]) -> Result<String, TamoError> {
    let output = json!({
        "count": records.len(),
        "items": records
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format every achievement with its unlock time as JSON
///
/// # Errors
///
/// Returns `TamoError::Json` if JSON serialization fails.
pub fn format_achievements_json(profile: &Profile) -> Result<String, TamoError> {
    let items: Vec<_> = Achievement::ALL
        .iter()
        .map(|achievement| {
            let unlocked_at = profile
                .achievements
                .iter()
                .find(|u| u.achievement == *achievement)
                .map(|u| u.unlocked_at);
            json!({
                "achievement": achievement,
                "title": achievement.title(),
                "description": achievement.description(),
                "threshold_seconds": achievement.threshold_seconds(),
                "unlocked_at": unlocked_at,
            })
        })
        .collect();

    Ok(serde_json::to_string_pretty(&json!({
        "total_focus_seconds": profile.total_focus_seconds,
        "items": items
    }))?)
}

/// Format the shop menu, wallet and pet as JSON
///
/// # Errors
///
/// Returns `TamoError::Json` if JSON serialization fails.
pub fn format_shop_json(receipt: &ShopReceipt) -> Result<String, TamoError> {
    let profile = &receipt.profile;
    let menu: Vec<_> = Food::ALL
        .iter()
        .map(|food| {
            json!({
                "food": food,
                "name": food.name(),
                "description": food.description(),
                "price": food.price(),
                "restores": food.restores(),
                "owned": profile.portions(*food),
            })
        })
        .collect();

    Ok(serde_json::to_string_pretty(&json!({
        "tokens": profile.tokens,
        "pet": profile.pet,
        "menu": menu,
        "unlocked": receipt.unlocked,
    }))?)
}

/// Format any serializable value as JSON
///
/// # Errors
///
/// Returns `TamoError::Json` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, TamoError> {
    Ok(serde_json::to_string_pretty(value)?)
}

//! The food shop.
//!
//! Tokens earned by studying buy food; food goes into the inventory until
//! it is fed to Tamo.

use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::achievements::Achievement;
use super::store::{Profile, ProfileStore};
use crate::error::TamoError;

/// Most portions bought in one go.
pub const MAX_PURCHASE: u32 = 99;

/// Something Tamo can eat.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Food {
    /// Small and cheap
    Onigiri,
    /// A proper meal
    ChickenPlate,
    /// A treat
    Cheesecake,
}

impl Food {
    /// Everything on the menu, cheapest first.
    pub const ALL: [Self; 3] = [Self::Onigiri, Self::ChickenPlate, Self::Cheesecake];

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Onigiri => "Onigiri",
            Self::ChickenPlate => "Chicken Plate",
            Self::Cheesecake => "Cheesecake",
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Onigiri => "Seasoned rice shaped into a ball and wrapped in seaweed",
            Self::ChickenPlate => "Cooked chicken served with a variety of sides",
            Self::Cheesecake => "A rich and creamy dessert on a biscuit crust",
        }
    }

    /// Price in tokens.
    #[must_use]
    pub const fn price(&self) -> i64 {
        match self {
            Self::Onigiri => 100,
            Self::ChickenPlate => 200,
            Self::Cheesecake => 800,
        }
    }

    /// Hunger points restored by one portion.
    #[must_use]
    pub const fn restores(&self) -> u8 {
        match self {
            Self::Onigiri => 1,
            Self::ChickenPlate => 3,
            Self::Cheesecake => 8,
        }
    }

    /// Database key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Onigiri => "onigiri",
            Self::ChickenPlate => "chicken_plate",
            Self::Cheesecake => "cheesecake",
        }
    }

    /// Parse a database key.
    #[must_use]
    pub fn from_db(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

impl std::fmt::Display for Food {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Result of a shop action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopReceipt {
    /// Profile after the action
    pub profile: Profile,
    /// Achievements unlocked by the action
    pub unlocked: Vec<Achievement>,
}

/// Walk into the shop: bring the pet up to date and check achievements.
///
/// # Errors
///
/// Returns an error if the profile cannot be read or written.
pub fn visit(conn: &Connection, now: DateTime<Utc>) -> Result<ShopReceipt, TamoError> {
    let store = ProfileStore::new(conn);
    store.settle_pet(now.with_timezone(&Local).date_naive())?;
    receipt(&store, now)
}

/// Buy `count` portions of `food`.
///
/// # Errors
///
/// Returns `TamoError::InvalidInput` for a bad count or when the tokens do
/// not cover the price.
pub fn buy(
    conn: &Connection,
    food: Food,
    count: u32,
    now: DateTime<Utc>,
) -> Result<ShopReceipt, TamoError> {
    if count == 0 || count > MAX_PURCHASE {
        return Err(TamoError::InvalidInput(format!(
            "can buy between 1 and {MAX_PURCHASE} portions at a time, got {count}"
        )));
    }

    let store = ProfileStore::new(conn);
    let cost = food.price() * i64::from(count);
    if !store.spend(cost)? {
        let tokens = store.require()?.tokens;
        return Err(TamoError::InvalidInput(format!(
            "{count} x {food} costs {cost} tokens, you have {tokens}"
        )));
    }
    store.add_food(food, count)?;
    info!(food = food.as_str(), count, cost, "food bought");

    receipt(&store, now)
}

/// Feed one portion of `food` from the inventory.
///
/// # Errors
///
/// Returns `TamoError::NotFound` if the inventory has none, or
/// `TamoError::InvalidInput` if Tamo is full.
pub fn feed(conn: &Connection, food: Food, now: DateTime<Utc>) -> Result<ShopReceipt, TamoError> {
    let store = ProfileStore::new(conn);
    let mut pet = store.settle_pet(now.with_timezone(&Local).date_naive())?;

    pet.feed(food)?;
    if !store.take_food(food)? {
        let arg = food
            .to_possible_value()
            .map_or_else(|| food.as_str().to_string(), |v| v.get_name().to_string());
        return Err(TamoError::NotFound(format!(
            "{food} in inventory (buy one with `tamo shop buy {arg}`)"
        )));
    }
    store.save_pet(&pet)?;
    info!(food = food.as_str(), hunger = pet.hunger, "fed Tamo");

    receipt(&store, now)
}

fn receipt(store: &ProfileStore<'_>, now: DateTime<Utc>) -> Result<ShopReceipt, TamoError> {
    let mut profile = store.require()?;
    let unlocked = profile.unlock_reached(now);
    if !unlocked.is_empty() {
        store.save_achievements(&profile.achievements)?;
        for achievement in &unlocked {
            info!(achievement = achievement.as_str(), "achievement unlocked");
        }
    }
    Ok(ShopReceipt { profile, unlocked })
}

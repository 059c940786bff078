//! The local study profile.
//!
//! Every write is a single statement that touches only the columns it
//! owns. Nothing writes back a whole cached profile.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::achievements::Achievement;
use super::pet::{Pet, MAX_LEVEL};
use super::shop::Food;
use crate::error::TamoError;
use crate::features::focus::storage::parse_timestamp;
use crate::features::focus::timer::format_hours;

/// Seconds of credited time per token.
pub const SECONDS_PER_TOKEN: i64 = 60;

/// An achievement and when it was unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    /// Which achievement
    pub achievement: Achievement,
    /// When it was unlocked
    pub unlocked_at: DateTime<Utc>,
}

/// Accumulated focus time, the pet and its belongings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name
    pub name: String,
    /// Total credited time in seconds
    pub total_focus_seconds: i64,
    /// Tokens available to spend in the shop
    pub tokens: i64,
    /// Tamo's meters
    pub pet: Pet,
    /// Food bought but not eaten yet
    pub inventory: BTreeMap<Food, u32>,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
    /// Unlocked achievements, oldest first
    pub achievements: Vec<UnlockedAchievement>,
}

impl Profile {
    /// Achievements already held.
    #[must_use]
    pub fn held(&self) -> Vec<Achievement> {
        self.achievements.iter().map(|u| u.achievement).collect()
    }

    /// Unlock every achievement the profile has reached, returning the new
    /// ones.
    pub fn unlock_reached(&mut self, at: DateTime<Utc>) -> Vec<Achievement> {
        let held = self.held();
        let mut unlocked = Achievement::newly_unlocked(self.total_focus_seconds, &held);
        if self.pet.is_full() && !held.contains(&Achievement::TamoFull) {
            unlocked.push(Achievement::TamoFull);
        }
        if self.pet.is_overjoyed() && !held.contains(&Achievement::TamoLove) {
            unlocked.push(Achievement::TamoLove);
        }

        self.achievements
            .extend(unlocked.iter().map(|&achievement| UnlockedAchievement {
                achievement,
                unlocked_at: at,
            }));
        unlocked
    }

    /// Portions of `food` in the inventory.
    #[must_use]
    pub fn portions(&self, food: Food) -> u32 {
        self.inventory.get(&food).copied().unwrap_or(0)
    }

    /// Total focus time as "N.N hrs".
    #[must_use]
    pub fn total_hours(&self) -> String {
        format_hours(self.total_focus_seconds)
    }
}

/// Reads and updates the single profile row.
pub struct ProfileStore<'a> {
    conn: &'a Connection,
}

impl<'a> ProfileStore<'a> {
    /// Use an open connection (or transaction).
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Load the profile, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load(&self) -> Result<Option<Profile>, TamoError> {
        let row = self
            .conn
            .query_row(
                r"SELECT name, total_focus_seconds, tokens, hunger, happiness,
                         pet_checked_on, created_at
                  FROM profile WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, u8>(3)?,
                        row.get::<_, u8>(4)?,
                        parse_date(row, 5)?,
                        parse_timestamp(row, 6)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| TamoError::Database(format!("Failed to load profile: {e}")))?;

        let Some((name, total_focus_seconds, tokens, hunger, happiness, checked_on, created_at)) =
            row
        else {
            return Ok(None);
        };

        Ok(Some(Profile {
            name,
            total_focus_seconds,
            tokens,
            pet: Pet {
                hunger,
                happiness,
                checked_on: checked_on
                    .unwrap_or_else(|| created_at.with_timezone(&Local).date_naive()),
            },
            inventory: self.inventory()?,
            created_at,
            achievements: self.achievements()?,
        }))
    }

    /// Load the profile, failing if none exists.
    ///
    /// # Errors
    ///
    /// Returns `TamoError::NotFound` if no profile exists yet.
    pub fn require(&self) -> Result<Profile, TamoError> {
        self.load()?
            .ok_or_else(|| TamoError::NotFound("profile".to_string()))
    }

    /// Load the profile, creating it with `name` on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be read or created.
    pub fn load_or_create(&self, name: &str) -> Result<Profile, TamoError> {
        let now = Utc::now();
        let pet = Pet::new(now.with_timezone(&Local).date_naive());

        let created = self
            .conn
            .execute(
                r"INSERT OR IGNORE INTO profile
                      (id, name, total_focus_seconds, tokens, hunger, happiness, pet_checked_on, created_at)
                  VALUES (1, ?1, 0, 0, ?2, ?3, ?4, ?5)",
                params![
                    name,
                    pet.hunger,
                    pet.happiness,
                    pet.checked_on.to_string(),
                    now.to_rfc3339()
                ],
            )
            .map_err(|e| TamoError::Database(format!("Failed to create profile: {e}")))?;

        if created > 0 {
            info!(name, "created profile");
        }
        self.require()
    }

    /// Credit `seconds` of study time, paying one token per whole minute
    /// the total crosses.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails or no profile exists.
    pub fn report(&self, seconds: i64) -> Result<(), TamoError> {
        let changed = self
            .conn
            .execute(
                r"UPDATE profile SET
                      tokens = tokens + (total_focus_seconds + ?1) / ?2 - total_focus_seconds / ?2,
                      total_focus_seconds = total_focus_seconds + ?1
                  WHERE id = 1",
                params![seconds, SECONDS_PER_TOKEN],
            )
            .map_err(|e| TamoError::Database(format!("Failed to credit profile: {e}")))?;

        if changed == 0 {
            return Err(TamoError::NotFound("profile".to_string()));
        }
        debug!(seconds, "profile credited");
        Ok(())
    }

    /// Store unlocked achievements. Ones already stored keep their time.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails.
    pub fn save_achievements(&self, unlocked: &[UnlockedAchievement]) -> Result<(), TamoError> {
        for u in unlocked {
            self.conn
                .execute(
                    "INSERT OR IGNORE INTO achievements (achievement, unlocked_at) VALUES (?1, ?2)",
                    params![u.achievement.as_str(), u.unlocked_at.to_rfc3339()],
                )
                .map_err(|e| TamoError::Database(format!("Failed to save achievement: {e}")))?;
        }
        Ok(())
    }

    /// Bring the pet's meters up to `today` and store them.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be read or written.
    pub fn settle_pet(&self, today: NaiveDate) -> Result<Pet, TamoError> {
        let mut pet = self.require()?.pet;
        if pet.settle(today) {
            self.save_pet(&pet)?;
            debug!(hunger = pet.hunger, happiness = pet.happiness, "pet settled");
        }
        Ok(pet)
    }

    /// Store the pet's meters.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn save_pet(&self, pet: &Pet) -> Result<(), TamoError> {
        self.conn
            .execute(
                "UPDATE profile SET hunger = ?1, happiness = ?2, pet_checked_on = ?3 WHERE id = 1",
                params![pet.hunger, pet.happiness, pet.checked_on.to_string()],
            )
            .map_err(|e| TamoError::Database(format!("Failed to save pet: {e}")))?;
        Ok(())
    }

    /// One happiness point for a finished session.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn cheer(&self) -> Result<(), TamoError> {
        self.conn
            .execute(
                "UPDATE profile SET happiness = MIN(?1, happiness + 1) WHERE id = 1",
                [MAX_LEVEL],
            )
            .map_err(|e| TamoError::Database(format!("Failed to cheer pet: {e}")))?;
        Ok(())
    }

    /// Take `cost` tokens.
    ///
    /// Returns `false` and changes nothing if there are not enough tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn spend(&self, cost: i64) -> Result<bool, TamoError> {
        let changed = self
            .conn
            .execute(
                "UPDATE profile SET tokens = tokens - ?1 WHERE id = 1 AND tokens >= ?1",
                [cost],
            )
            .map_err(|e| TamoError::Database(format!("Failed to spend tokens: {e}")))?;
        Ok(changed > 0)
    }

    /// Put `count` portions of `food` in the inventory.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn add_food(&self, food: Food, count: u32) -> Result<(), TamoError> {
        self.conn
            .execute(
                r"INSERT INTO inventory (food, count) VALUES (?1, ?2)
                  ON CONFLICT(food) DO UPDATE SET count = count + excluded.count",
                params![food.as_str(), count],
            )
            .map_err(|e| TamoError::Database(format!("Failed to store food: {e}")))?;
        Ok(())
    }

    /// Take one portion of `food` out of the inventory.
    ///
    /// Returns `false` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn take_food(&self, food: Food) -> Result<bool, TamoError> {
        let changed = self
            .conn
            .execute(
                "UPDATE inventory SET count = count - 1 WHERE food = ?1 AND count > 0",
                [food.as_str()],
            )
            .map_err(|e| TamoError::Database(format!("Failed to take food: {e}")))?;
        Ok(changed > 0)
    }

    /// Change the profile name.
    ///
    /// # Errors
    ///
    /// Returns `TamoError::InvalidInput` for a blank name, or
    /// `TamoError::NotFound` if no profile exists yet.
    pub fn rename(&self, name: &str) -> Result<(), TamoError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TamoError::InvalidInput(
                "profile name cannot be empty".to_string(),
            ));
        }

        let changed = self
            .conn
            .execute("UPDATE profile SET name = ?1 WHERE id = 1", [name])
            .map_err(|e| TamoError::Database(format!("Failed to rename profile: {e}")))?;

        if changed == 0 {
            return Err(TamoError::NotFound("profile".to_string()));
        }
        Ok(())
    }

    fn inventory(&self) -> Result<BTreeMap<Food, u32>, TamoError> {
        let mut stmt = self
            .conn
            .prepare("SELECT food, count FROM inventory WHERE count > 0")
            .map_err(|e| TamoError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))
            .map_err(|e| TamoError::Database(format!("Failed to query inventory: {e}")))?;

        let mut inventory = BTreeMap::new();
        for row in rows {
            let (key, count) =
                row.map_err(|e| TamoError::Database(format!("Failed to read inventory: {e}")))?;
            if let Some(food) = Food::from_db(&key) {
                inventory.insert(food, count);
            }
        }
        Ok(inventory)
    }

    fn achievements(&self) -> Result<Vec<UnlockedAchievement>, TamoError> {
        let mut stmt = self
            .conn
            .prepare("SELECT achievement, unlocked_at FROM achievements ORDER BY unlocked_at, rowid")
            .map_err(|e| TamoError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                let key: String = row.get(0)?;
                Ok((key, parse_timestamp(row, 1)?))
            })
            .map_err(|e| TamoError::Database(format!("Failed to query achievements: {e}")))?;

        let mut unlocked = Vec::new();
        for row in rows {
            let (key, unlocked_at) =
                row.map_err(|e| TamoError::Database(format!("Failed to read achievement: {e}")))?;
            // Keys from newer versions are skipped
            if let Some(achievement) = Achievement::from_db(&key) {
                unlocked.push(UnlockedAchievement {
                    achievement,
                    unlocked_at,
                });
            }
        }
        Ok(unlocked)
    }
}

fn parse_date(row: &Row<'_>, idx: usize) -> Result<Option<NaiveDate>, rusqlite::Error> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        raw.parse::<NaiveDate>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

//! The study pet.
//!
//! Tamo has two meters from 0 to [`MAX_LEVEL`]. Hunger is a fill level, so
//! a full Tamo sits at the top. Every calendar day without food takes one
//! hunger point; once hunger is empty the days take happiness instead.
//! Food refills hunger and completed sessions cheer Tamo up.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::shop::Food;
use crate::error::TamoError;

/// Top of both meters.
pub const MAX_LEVEL: u8 = 10;
/// Meters of a new pet.
pub const START_LEVEL: u8 = 5;
/// At or below this hunger Tamo asks for food.
pub const HUNGRY_LEVEL: u8 = 2;

/// Hunger, happiness and the day they were last brought up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    /// Hunger fill level
    pub hunger: u8,
    /// Happiness level
    pub happiness: u8,
    /// Last day the meters were settled
    pub checked_on: NaiveDate,
}

impl Pet {
    /// A new pet on `today`.
    #[must_use]
    pub const fn new(today: NaiveDate) -> Self {
        Self {
            hunger: START_LEVEL,
            happiness: START_LEVEL,
            checked_on: today,
        }
    }

    /// Apply the days passed since the last check.
    ///
    /// Returns `true` if anything changed.
    pub fn settle(&mut self, today: NaiveDate) -> bool {
        let days = (today - self.checked_on).num_days();
        if days <= 0 {
            return false;
        }

        // Both meters are empty after this many days
        for _ in 0..days.min(i64::from(MAX_LEVEL) * 2) {
            if self.hunger > 0 {
                self.hunger -= 1;
            } else {
                self.happiness = self.happiness.saturating_sub(1);
            }
        }
        self.checked_on = today;
        true
    }

    /// Feed one portion of `food`.
    ///
    /// # Errors
    ///
    /// Returns `TamoError::InvalidInput` if Tamo is already full.
    pub fn feed(&mut self, food: Food) -> Result<(), TamoError> {
        if self.is_full() {
            return Err(TamoError::InvalidInput(format!(
                "Tamo is full and does not want the {}",
                food.name()
            )));
        }

        self.hunger = (self.hunger + food.restores()).min(MAX_LEVEL);
        self.cheer();
        Ok(())
    }

    /// One happiness point, up to the maximum.
    pub fn cheer(&mut self) {
        self.happiness = (self.happiness + 1).min(MAX_LEVEL);
    }

    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.hunger >= MAX_LEVEL
    }

    #[must_use]
    pub const fn is_hungry(&self) -> bool {
        self.hunger <= HUNGRY_LEVEL
    }

    #[must_use]
    pub const fn is_overjoyed(&self) -> bool {
        self.happiness >= MAX_LEVEL
    }
}

/// Render a meter as "■■■■□□□□□□".
#[must_use]
pub fn meter(level: u8) -> String {
    let filled = usize::from(level.min(MAX_LEVEL));
    format!(
        "{}{}",
        "■".repeat(filled),
        "□".repeat(usize::from(MAX_LEVEL) - filled)
    )
}

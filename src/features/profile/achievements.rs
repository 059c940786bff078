//! Study and pet achievements.

use serde::{Deserialize, Serialize};

/// An achievement unlocked by total focus time or by caring for Tamo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    /// 3 hours of focus
    FocusThreeHours,
    /// 1 day of focus
    FocusOneDay,
    /// 7 days of focus
    FocusSevenDays,
    /// 30 days of focus
    FocusThirtyDays,
    /// Hunger filled to the top
    TamoFull,
    /// Happiness at the maximum
    TamoLove,
}

impl Achievement {
    /// Every achievement, focus tiers first.
    pub const ALL: [Self; 6] = [
        Self::FocusThreeHours,
        Self::FocusOneDay,
        Self::FocusSevenDays,
        Self::FocusThirtyDays,
        Self::TamoFull,
        Self::TamoLove,
    ];

    /// Total focus seconds needed to unlock, for the focus tiers.
    #[must_use]
    pub const fn threshold_seconds(&self) -> Option<i64> {
        match self {
            Self::FocusThreeHours => Some(3 * 60 * 60),
            Self::FocusOneDay => Some(24 * 60 * 60),
            Self::FocusSevenDays => Some(7 * 24 * 60 * 60),
            Self::FocusThirtyDays => Some(30 * 24 * 60 * 60),
            Self::TamoFull | Self::TamoLove => None,
        }
    }

    /// Short title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::FocusThreeHours => "The Beginning",
            Self::FocusOneDay => "Nothing can stop you!",
            Self::FocusSevenDays => "Never give up!",
            Self::FocusThirtyDays => "Unstoppable",
            Self::TamoFull => "Tamo full",
            Self::TamoLove => "Tamo Love",
        }
    }

    /// What it takes to unlock.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::FocusThreeHours => "Reach total focus time of 3 hours",
            Self::FocusOneDay => "Reach total focus time of 1 day",
            Self::FocusSevenDays => "Reach total focus time of 7 days",
            Self::FocusThirtyDays => "Reach total focus time of 30 days",
            Self::TamoFull => "Achieve maximum Tamo hunger",
            Self::TamoLove => "Achieve maximum Tamo happiness",
        }
    }

    /// Database key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FocusThreeHours => "focus_three_hours",
            Self::FocusOneDay => "focus_one_day",
            Self::FocusSevenDays => "focus_seven_days",
            Self::FocusThirtyDays => "focus_thirty_days",
            Self::TamoFull => "tamo_full",
            Self::TamoLove => "tamo_love",
        }
    }

    /// Parse a database key.
    #[must_use]
    pub fn from_db(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }

    /// Focus tiers reached at `total_seconds` that are not in `held`.
    #[must_use]
    pub fn newly_unlocked(total_seconds: i64, held: &[Self]) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|a| {
                a.threshold_seconds()
                    .is_some_and(|threshold| total_seconds >= threshold)
                    && !held.contains(a)
            })
            .collect()
    }
}

impl std::fmt::Display for Achievement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

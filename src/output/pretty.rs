use chrono::Duration;
use colored::Colorize;

use crate::features::focus::timer::format_duration_mmss;
use crate::features::focus::{Phase, SessionRecord};
use crate::features::profile::pet::{meter, MAX_LEVEL};
use crate::features::profile::{Achievement, Food, Pet, Profile};

/// Format phase history as a pretty table
pub fn format_history_pretty(records: &[SessionRecord]) -> String {
    if records.is_empty() {
        return "No focus sessions found.\n\nStart one with: tamo focus start".to_string();
    }

    let mut output = Vec::new();
    output.push("Focus History".bold().to_string());
    output.push("═".repeat(60));
    output.push(format!(
        "{:<17} {:<9} {:<10} {:>7}  {}",
        "Started", "Mode", "Phase", "Time", "Status"
    ));
    output.push("─".repeat(60));

    for record in records {
        let started = record.started_at_local().format("%Y-%m-%d %H:%M");
        let phase = match (record.phase, record.pomodoro_index) {
            (Phase::Focusing, Some(index)) => format!("Focus #{index}"),
            (Phase::Focusing, None) => "Focus".to_string(),
            (phase, _) => phase.to_string(),
        };
        let status = if record.completed {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        };

        output.push(format!(
            "{:<17} {:<9} {:<10} {:>7}  {}",
            started,
            record.mode.as_str(),
            phase,
            format_duration_mmss(record.elapsed()),
            status
        ));
    }

    output.join("\n")
}

/// Format the profile summary
pub fn format_profile_pretty(profile: &Profile) -> String {
    let mut lines = vec![
        profile.name.bold().to_string(),
        "─".repeat(40),
        format!(
            "  Total focus:   {} ({})",
            profile.total_hours().cyan(),
            format_duration_mmss(Duration::seconds(profile.total_focus_seconds))
        ),
        format!("  Tokens:        {}", profile.tokens.to_string().yellow()),
        format!(
            "  Member since:  {}",
            profile.created_at.format("%Y-%m-%d")
        ),
        format!(
            "  Achievements:  {} / {}",
            profile.achievements.len(),
            Achievement::ALL.len()
        ),
    ];

    let held = profile.held();
    let next = Achievement::ALL
        .iter()
        .filter(|a| !held.contains(*a))
        .find_map(|a| a.threshold_seconds().map(|threshold| (a, threshold)));
    if let Some((next, threshold)) = next {
        let remaining = threshold - profile.total_focus_seconds;
        lines.push(format!(
            "  Next:          {} in {}",
            next.title().yellow(),
            crate::features::focus::format_duration(Duration::seconds(remaining.max(0)))
        ));
    }

    lines.push(String::new());
    lines.push(format_pet_pretty(&profile.pet));

    if !profile.inventory.is_empty() {
        let items: Vec<_> = profile
            .inventory
            .iter()
            .map(|(food, count)| format!("{count} x {food}"))
            .collect();
        lines.push(format!("  Inventory:     {}", items.join(", ")));
    }

    lines.join("\n")
}

/// Tamo's two meters
pub fn format_pet_pretty(pet: &Pet) -> String {
    let hunger = meter(pet.hunger);
    let hunger = if pet.is_hungry() {
        hunger.red()
    } else {
        hunger.green()
    };

    let mut lines = vec![
        format!("  Hunger:        {hunger} {}/{MAX_LEVEL}", pet.hunger),
        format!(
            "  Happiness:     {} {}/{MAX_LEVEL}",
            meter(pet.happiness).magenta(),
            pet.happiness
        ),
    ];
    if pet.is_hungry() {
        lines.push(format!("  {}", "Tamo is hungry! Try: tamo feed onigiri".red()));
    }
    lines.join("\n")
}

/// Format the food shop menu
pub fn format_shop_pretty(profile: &Profile, unlocked: &[Achievement]) -> String {
    let mut lines = vec![
        format!(
            "{}{:>28}",
            "Food Shop".bold(),
            format!("Tokens: {}", profile.tokens)
        ),
        "─".repeat(50),
        format!(
            "  {:<15} {:>7}  {:>7}  {:>5}",
            "Food", "Price", "Hunger", "Owned"
        ),
    ];

    for food in Food::ALL {
        let price = format!("{:>7}", food.price());
        let price = if food.price() > profile.tokens {
            price.dimmed()
        } else {
            price.yellow()
        };
        lines.push(format!(
            "  {:<15} {}  {:>7}  {:>5}",
            food.name(),
            price,
            format!("+{}", food.restores()),
            profile.portions(food)
        ));
    }

    lines.push(String::new());
    lines.push(format_pet_pretty(&profile.pet));
    lines.push(String::new());
    lines.push("Buy with: tamo shop buy <food>    Feed with: tamo feed <food>".dimmed().to_string());
    lines.extend(unlocked.iter().map(|a| format_unlocked(*a)));

    lines.join("\n")
}

/// Format every achievement with its unlock state
pub fn format_achievements_pretty(profile: &Profile) -> String {
    let mut lines = vec!["Achievements".bold().to_string(), "─".repeat(50)];

    for achievement in Achievement::ALL {
        let unlocked = profile
            .achievements
            .iter()
            .find(|u| u.achievement == achievement);

        let line = match unlocked {
            Some(u) => format!(
                "{} {}  {}  {}",
                "[x]".green(),
                achievement.title().bold(),
                achievement.description().dimmed(),
                u.unlocked_at.format("%Y-%m-%d").to_string().yellow()
            ),
            None => format!(
                "{} {}  {}",
                "[ ]".white(),
                achievement.title(),
                achievement.description().dimmed()
            ),
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// One-line announcement for a newly unlocked achievement
pub fn format_unlocked(achievement: Achievement) -> String {
    format!(
        "{} {}: {}",
        "Achievement unlocked!".green().bold(),
        achievement.title().bold(),
        achievement.description()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::FocusMode;
    use chrono::{Local, Utc};
    use std::collections::BTreeMap;

    fn make_profile(total_focus_seconds: i64) -> Profile {
        Profile {
            name: "amy".to_string(),
            total_focus_seconds,
            tokens: total_focus_seconds / 60,
            pet: Pet::new(Local::now().date_naive()),
            inventory: BTreeMap::new(),
            created_at: Utc::now(),
            achievements: Vec::new(),
        }
    }

    fn make_record(phase: Phase, completed: bool, index: Option<u32>) -> SessionRecord {
        let now = Utc::now();
        SessionRecord {
            id: Some(1),
            mode: FocusMode::Pomodoro,
            phase,
            started_at: now - Duration::seconds(90),
            ended_at: now,
            planned_seconds: 1500,
            elapsed_seconds: 90,
            completed,
            pomodoro_index: index,
        }
    }

    #[test]
    fn test_format_history_empty() {
        let output = format_history_pretty(&[]);
        assert!(output.contains("No focus sessions found"));
    }

    #[test]
    fn test_format_history_rows() {
        let output = format_history_pretty(&[
            make_record(Phase::Focusing, true, Some(2)),
            make_record(Phase::OnBreak, false, Some(1)),
        ]);

        assert!(output.contains("Focus #2"));
        assert!(output.contains("Break"));
        assert!(output.contains("01:30"));
        assert!(output.contains("pomodoro"));
    }

    #[test]
    fn test_format_profile_next_achievement() {
        let output = format_profile_pretty(&make_profile(60 * 60));
        assert!(output.contains("amy"));
        assert!(output.lines().any(|l| l.contains("Tokens:") && l.contains("60")));
        assert!(output.contains("0 / 6"));
        assert!(output.contains("The Beginning"));
        assert!(output.contains("2 hours"));
        assert!(output.contains("■■■■■□□□□□"));
        assert!(output.contains("5/10"));
        assert!(!output.contains("Inventory"));
    }

    #[test]
    fn test_format_profile_skips_pet_achievements_for_next() {
        let mut profile = make_profile(31 * 24 * 60 * 60);
        profile.unlock_reached(Utc::now());
        profile.inventory.insert(Food::Onigiri, 2);
        profile.pet.hunger = 1;

        let output = format_profile_pretty(&profile);
        assert!(output.contains("4 / 6"));
        assert!(!output.contains("Next:"));
        assert!(output.contains("Inventory:     2 x Onigiri"));
        assert!(output.contains("Tamo is hungry"));
    }

    #[test]
    fn test_format_shop() {
        let mut profile = make_profile(250 * 60);
        profile.inventory.insert(Food::Cheesecake, 1);

        let output = format_shop_pretty(&profile, &[Achievement::TamoLove]);
        assert!(output.contains("Tokens: 250"));
        assert!(output.contains("Chicken Plate"));
        assert!(output.contains("+8"));
        assert!(output.contains("Tamo Love"));
    }

    #[test]
    fn test_format_achievements_marks_unlocked() {
        let mut profile = make_profile(180 * 60);
        profile.unlock_reached(Utc::now());

        let output = format_achievements_pretty(&profile);
        assert_eq!(output.matches("[x]").count(), 1);
        assert_eq!(output.matches("[ ]").count(), 5);
    }

    #[test]
    fn test_format_unlocked() {
        let output = format_unlocked(Achievement::FocusOneDay);
        assert!(output.contains("Nothing can stop you!"));
    }
}

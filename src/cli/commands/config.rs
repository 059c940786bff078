//! Configuration commands.

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::TamoError;
use crate::output::to_json;

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the file exists without `--force` or cannot be written.
pub fn config(
    cmd: ConfigCommands,
    config: &Config,
    paths: &Paths,
    format: OutputFormat,
) -> Result<String, TamoError> {
    match cmd {
        ConfigCommands::Show => match format {
            OutputFormat::Json => to_json(config),
            OutputFormat::Pretty => Ok(serde_yaml::to_string(config)?.trim_end().to_string()),
        },

        ConfigCommands::Init { force } => {
            if paths.config_file.exists() && !force {
                return Err(TamoError::InvalidInput(format!(
                    "{} already exists. Use --force to overwrite.",
                    paths.config_file.display()
                )));
            }

            paths.ensure_dirs()?;
            Config::default().save_to_path(&paths.config_file)?;
            Ok(format!("Wrote {}", paths.config_file.display()))
        }

        ConfigCommands::Path => Ok(paths.config_file.display().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_overwrite() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().to_path_buf());
        let current = Config::default();

        config(ConfigCommands::Init { force: false }, &current, &paths, OutputFormat::Pretty).unwrap();
        assert!(paths.config_file.exists());

        let again = config(ConfigCommands::Init { force: false }, &current, &paths, OutputFormat::Pretty);
        assert!(matches!(again, Err(TamoError::InvalidInput(_))));

        config(ConfigCommands::Init { force: true }, &current, &paths, OutputFormat::Pretty).unwrap();
    }

    #[test]
    fn test_show_round_trips() {
        let paths = Paths::with_root(std::path::PathBuf::from("/nonexistent"));
        let shown = config(ConfigCommands::Show, &Config::default(), &paths, OutputFormat::Pretty).unwrap();

        let parsed: Config = serde_yaml::from_str(&shown).unwrap();
        assert_eq!(parsed.focus.pomodoro_sessions, 4);
        assert_eq!(parsed.logging.level, "warn");
    }
}

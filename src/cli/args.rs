use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::features::focus::{FocusMode, ReportPeriod};
use crate::features::profile::Food;

#[derive(Parser)]
#[command(name = "tamo")]
#[command(about = "A study companion with a focus timer, a pet and achievements")]
#[command(long_about = "tamo - a virtual pet study companion

Run focus sessions in one of three modes while your Tamo keeps you company.
Focus time is credited to your profile, unlocks achievements and earns
tokens that buy food for Tamo.

QUICK START:
  tamo focus start                       Pomodoro with your configured lengths
  tamo focus start -m custom -d 45m      One 45-minute countdown
  tamo focus start -m interval -d 30     30 minutes in 5-minute steps
  tamo focus report                      Focus time over the last 7 days
  tamo shop buy onigiri                  Spend 100 tokens on an Onigiri
  tamo feed onigiri                      Feed it to Tamo

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  tamo <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Log debug events to stderr (or to the log file while the timer screen is open)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Focus sessions, history and reports
    ///
    /// # Subcommands
    ///
    ///   start    Run a focus session in the foreground
    ///   history  View past phases
    ///   report   Focus time over a period
    ///   clear    Delete the phase history
    ///
    /// # Examples
    ///
    ///   tamo focus start                         Pomodoro from config
    ///   tamo focus start -m pomodoro -s 2        Two Pomodoro sessions
    ///   tamo focus start -m custom -d 1m30s      A 90-second countdown
    ///   tamo focus start --plain                 Line mode, no timer screen
    ///   tamo focus report -p month               Last 30 days
    #[command(alias = "f")]
    Focus(FocusArgs),

    /// Show or rename your profile
    Profile(ProfileArgs),

    /// List achievements and which ones you have unlocked
    Achievements,

    /// Spend tokens on food for Tamo
    ///
    /// Every credited minute of study earns one token.
    ///
    /// # Examples
    ///
    ///   tamo shop                            Menu, tokens and Tamo's meters
    ///   tamo shop buy onigiri                One Onigiri
    ///   tamo shop buy chicken-plate -n 2     Two Chicken Plates
    Shop(ShopArgs),

    /// Feed Tamo something from your inventory
    ///
    /// # Examples
    ///
    ///   tamo feed cheesecake
    Feed {
        /// Food to feed
        #[arg(value_enum)]
        food: Food,
    },

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   tamo completions bash > ~/.local/share/bash-completion/completions/tamo
    ///   tamo completions zsh > ~/.zfunc/_tamo
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for focus sessions.
#[derive(Args)]
pub struct FocusArgs {
    #[command(subcommand)]
    pub command: FocusCommands,
}

/// Focus subcommands.
#[derive(Subcommand)]
pub enum FocusCommands {
    /// Run a focus session
    ///
    /// Options left out are taken from the [focus] section of the config file.
    ///
    /// Keys on the timer screen:
    ///   space   pause / resume
    ///   b       break the session off now
    ///   s       start again once idle
    ///   q       quit (breaks the session off first)
    ///
    /// Examples:
    ///   tamo focus start
    ///   tamo focus start --mode custom --duration 50m
    ///   tamo focus start --mode interval --duration 25
    ///   tamo focus start --mode pomodoro --sessions 4 --focus 25 --break 5
    Start(StartArgs),

    /// View phase history
    ///
    /// Shows the most recent focus and break phases.
    History {
        /// Number of phases to show
        #[arg(long, short = 'n', default_value = "10")]
        limit: usize,
    },

    /// Generate a focus report
    ///
    /// Summarizes focus time over a period.
    ///
    /// Examples:
    ///   tamo focus report
    ///   tamo focus report --period today
    ///   tamo focus report -p all
    Report {
        /// Report period
        #[arg(long, short = 'p', value_enum, default_value = "week")]
        period: ReportPeriod,
    },

    /// Delete the phase history
    ///
    /// Profile totals and achievements are kept.
    Clear {
        /// Confirm deletion
        #[arg(long)]
        force: bool,
    },
}

/// Options for `focus start`.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct StartArgs {
    /// Timer mode
    #[arg(long, short = 'm', value_enum)]
    pub mode: Option<FocusMode>,

    /// Countdown length for custom and interval modes (e.g. 25, 45m, 1m30s)
    #[arg(long, short = 'd')]
    pub duration: Option<String>,

    /// Number of Pomodoro sessions
    #[arg(long, short = 's')]
    pub sessions: Option<u32>,

    /// Pomodoro focus length in minutes
    #[arg(long, short = 'f')]
    pub focus: Option<u32>,

    /// Pomodoro break length in minutes
    #[arg(long = "break", short = 'b')]
    pub break_minutes: Option<u32>,

    /// Print progress lines instead of opening the timer screen
    #[arg(long)]
    pub plain: bool,

    /// Do not play completion sounds
    #[arg(long)]
    pub no_sound: bool,
}

/// Arguments for the profile command.
#[derive(Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: Option<ProfileCommands>,
}

/// Profile subcommands.
#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show name, total focus time and achievements (default)
    Show,

    /// Change the profile name
    Rename {
        /// New name
        name: String,
    },
}

/// Arguments for the shop command.
#[derive(Args)]
pub struct ShopArgs {
    #[command(subcommand)]
    pub command: Option<ShopCommands>,
}

/// Shop subcommands.
#[derive(Subcommand)]
pub enum ShopCommands {
    /// Show the menu, your tokens and inventory (default)
    Menu,

    /// Buy food with tokens
    Buy {
        /// Food to buy
        #[arg(value_enum)]
        food: Food,

        /// Number of portions
        #[arg(long, short = 'n', default_value = "1")]
        count: u32,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    // ==================== Focus Subcommand Tests ====================

    #[test]
    fn test_cli_focus_start_defaults() {
        let cli = Cli::try_parse_from(["tamo", "focus", "start"]).unwrap();
        if let Commands::Focus(args) = cli.command {
            if let FocusCommands::Start(start) = args.command {
                assert_eq!(start, StartArgs::default());
            } else {
                panic!("Expected Start subcommand");
            }
        } else {
            panic!("Expected Focus command");
        }
    }

    #[test]
    fn test_cli_focus_start_pomodoro() {
        let cli = Cli::try_parse_from([
            "tamo", "f", "start", "-m", "pomodoro", "-s", "2", "--focus", "50", "--break", "10",
            "--plain",
        ])
        .unwrap();
        if let Commands::Focus(args) = cli.command {
            if let FocusCommands::Start(start) = args.command {
                assert_eq!(start.mode, Some(FocusMode::Pomodoro));
                assert_eq!(start.sessions, Some(2));
                assert_eq!(start.focus, Some(50));
                assert_eq!(start.break_minutes, Some(10));
                assert!(start.plain);
            } else {
                panic!("Expected Start subcommand");
            }
        } else {
            panic!("Expected Focus command");
        }
    }

    #[test]
    fn test_cli_focus_start_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["tamo", "focus", "start", "-m", "stopwatch"]).is_err());
    }

    #[test]
    fn test_cli_focus_report_period() {
        let cli = Cli::try_parse_from(["tamo", "focus", "report", "-p", "all"]).unwrap();
        if let Commands::Focus(args) = cli.command {
            assert!(matches!(
                args.command,
                FocusCommands::Report {
                    period: ReportPeriod::AllTime
                }
            ));
        } else {
            panic!("Expected Focus command");
        }
    }

    #[test]
    fn test_cli_focus_history_limit() {
        let cli = Cli::try_parse_from(["tamo", "focus", "history", "-n", "3"]).unwrap();
        if let Commands::Focus(args) = cli.command {
            assert!(matches!(args.command, FocusCommands::History { limit: 3 }));
        } else {
            panic!("Expected Focus command");
        }
    }

    // ==================== Other Commands ====================

    #[test]
    fn test_cli_profile_defaults_to_show() {
        let cli = Cli::try_parse_from(["tamo", "profile"]).unwrap();
        assert!(matches!(cli.command, Commands::Profile(ProfileArgs { command: None })));
    }

    #[test]
    fn test_cli_profile_rename() {
        let cli = Cli::try_parse_from(["tamo", "profile", "rename", "Amy"]).unwrap();
        if let Commands::Profile(ProfileArgs {
            command: Some(ProfileCommands::Rename { name }),
        }) = cli.command
        {
            assert_eq!(name, "Amy");
        } else {
            panic!("Expected profile rename");
        }
    }

    #[test]
    fn test_cli_shop_defaults_to_menu() {
        let cli = Cli::try_parse_from(["tamo", "shop"]).unwrap();
        assert!(matches!(cli.command, Commands::Shop(ShopArgs { command: None })));
    }

    #[test]
    fn test_cli_shop_buy() {
        let cli = Cli::try_parse_from(["tamo", "shop", "buy", "chicken-plate", "-n", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Shop(ShopArgs {
                command: Some(ShopCommands::Buy {
                    food: Food::ChickenPlate,
                    count: 2
                })
            })
        ));
    }

    #[test]
    fn test_cli_feed_rejects_unknown_food() {
        let cli = Cli::try_parse_from(["tamo", "feed", "cheesecake"]).unwrap();
        assert!(matches!(cli.command, Commands::Feed { food: Food::Cheesecake }));
        assert!(Cli::try_parse_from(["tamo", "feed", "pizza"]).is_err());
    }

    #[test]
    fn test_cli_completions() {
        let cli = Cli::try_parse_from(["tamo", "completions", "zsh"]).unwrap();
        assert!(matches!(cli.command, Commands::Completions { shell: Shell::Zsh }));
    }

    // ==================== Global Flags ====================

    #[test]
    fn test_output_format_default() {
        assert!(matches!(OutputFormat::default(), OutputFormat::Pretty));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tamo", "achievements", "-o", "json", "-v"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(cli.verbose);
    }
}

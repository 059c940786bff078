use clap::Parser;
use colored::Colorize;

use tamostudy::cli::args::{Cli, Commands};
use tamostudy::cli::commands;
use tamostudy::config::{Config, Paths};
use tamostudy::error::TamoError;
use tamostudy::logging::{self, LogTarget};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<(), TamoError> {
    let cli = Cli::parse();
    let paths = Paths::new()?;
    let config = Config::load_from_path(&paths.config_file)?;
    config.general.color.apply();

    let target = match &cli.command {
        Commands::Focus(args) => commands::log_target(&args.command, &paths),
        _ => LogTarget::Stderr,
    };
    logging::init(&config.logging, cli.verbose, &target)?;

    let format = cli.output.unwrap_or(config.general.default_output);

    let output = match cli.command {
        Commands::Focus(args) => commands::focus(args.command, &config, &paths, format)?,
        Commands::Profile(args) => commands::profile(args.command, &config, &paths, format)?,
        Commands::Achievements => commands::achievements(&config, &paths, format)?,
        Commands::Shop(args) => commands::shop(args.command, &config, &paths, format)?,
        Commands::Feed { food } => commands::feed(food, &config, &paths, format)?,
        Commands::Config(args) => commands::config(args.command, &config, &paths, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

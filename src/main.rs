use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mythly::cli::args::{Cli, Commands};
use mythly::cli::commands;
use mythly::config::Config;
use mythly::App;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {e:#}", "error".red().bold());
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load().context("Failed to load configuration")?;
    config.general.color.apply();
    let format = cli.output.unwrap_or(config.general.default_output);

    if let Commands::Completions { shell } = cli.command {
        print!("{}", commands::completions(shell)?);
        return Ok(());
    }

    let app = App::open(cli.database.as_deref(), config)?;

    let output = match cli.command {
        Commands::Load(args) => commands::load(&app, args.file, format)?,
        Commands::Today => commands::today(&app, format)?,
        Commands::Library(args) => commands::library(&app, &args, format)?,
        Commands::Show { id } => commands::show(&app, &id, format)?,
        Commands::Read(args) => commands::read(&app, &args, format)?,
        Commands::Favorite { id } => commands::favorite(&app, &id, format)?,
        Commands::Stats => commands::stats(&app, format)?,
        Commands::Sessions(args) => commands::sessions(&app, &args, format)?,
        Commands::Completions { .. } => String::new(),
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

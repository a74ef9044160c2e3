use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use timebar::cli::commands::{Cli, Commands, ConfigArgs};
use timebar::io::config_io;
use timebar::tui::RunOptions;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| std::env::var_os("TIMEBAR_LOG").map(PathBuf::from));
    if let Some(path) = log_file
        && let Err(e) = init_logging(&path)
    {
        eprintln!("error: could not open log file {}: {}", path.display(), e);
        std::process::exit(1);
    }

    let result = match cli.command {
        None => timebar::tui::run(RunOptions {
            config_path: cli.config,
            todos_file: cli.todos,
        }),
        Some(Commands::Config(args)) => cmd_config(cli.config.as_deref(), args),
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// The TUI owns the terminal, so diagnostics go to a file
fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("timebar=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn cmd_config(path: Option<&Path>, args: ConfigArgs) -> Result<(), Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_io::default_config_path()?,
    };
    if args.path {
        println!("{}", path.display());
        return Ok(());
    }
    let (config, _) = config_io::read_config(&path)?;
    print!("{}", config_io::render_config(&config)?);
    Ok(())
}

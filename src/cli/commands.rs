use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "timebar", about = concat!("timebar v", env!("CARGO_PKG_VERSION"), " - todos with countdown bars"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: <config dir>/timebar/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Preload the todo input from a file, one todo per line
    #[arg(long, value_name = "FILE")]
    pub todos: Option<PathBuf>,

    /// Write diagnostics to this file (also: TIMEBAR_LOG)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Print only the config file path
    #[arg(long)]
    pub path: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tui_flags() {
        let cli = Cli::try_parse_from([
            "timebar",
            "--config",
            "/tmp/c.toml",
            "--todos",
            "todo.txt",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(cli.todos, Some(PathBuf::from("todo.txt")));
    }

    #[test]
    fn parses_config_subcommand() {
        let cli = Cli::try_parse_from(["timebar", "config", "--path"]).unwrap();
        match cli.command {
            Some(Commands::Config(args)) => assert!(args.path),
            None => panic!("expected config subcommand"),
        }
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

//! polymsg CLI - Message type generator
//!
//! Commands:
//! - `polymsg generate` - Generate code for every message and backend
//! - `polymsg check` - Project every message without writing files
//! - `polymsg init` - Write a default polymsg.toml

use anyhow::Context;
use clap::{Parser, Subcommand};
use polymsg_logging::{LogLevel, ReloadHandle, init_logging};
use std::path::PathBuf;

mod check;
mod config;
mod generate;
mod init;
mod loader;
mod writer;

#[cfg(test)]
mod test_fixtures;

use config::{Config, DEFAULT_CONFIG};
use generate::Inputs;

#[derive(Parser)]
#[command(name = "polymsg")]
#[command(author, version, about = "Generate typed message code from a GraphQL schema", long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Log errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the config file (default: ./polymsg.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate code for every message with every enabled backend
    Generate {
        /// Schema document (AST JSON)
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Directory containing message documents
        #[arg(short, long)]
        messages: Option<PathBuf>,

        /// Backend to run (repeatable; default: enabled backends from config)
        #[arg(short, long = "backend")]
        backend: Vec<String>,

        /// Exit with an error when any message fails
        #[arg(long)]
        strict: bool,
    },

    /// Project every message and report problems without writing files
    Check {
        /// Schema document (AST JSON)
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Directory containing message documents
        #[arg(short, long)]
        messages: Option<PathBuf>,

        /// Backend to check (repeatable; default: enabled backends from config)
        #[arg(short, long = "backend")]
        backend: Vec<String>,
    },

    /// Write a default polymsg.toml
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    fn flag_level(&self) -> Option<LogLevel> {
        if self.verbose {
            Some(LogLevel::Debug)
        } else if self.quiet {
            Some(LogLevel::Error)
        } else {
            None
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = Config::load(cli.config.as_deref())?;
    if cli.flag_level().is_none() && config.logging.level != LogLevel::default() {
        ReloadHandle::global()
            .reload_level(config.logging.level)
            .context("Failed to apply configured log level")?;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.flag_level().unwrap_or_default()).context("Failed to initialize logging")?;

    match &cli.command {
        Commands::Generate {
            schema,
            messages,
            backend,
            strict,
        } => {
            let config = load_config(&cli)?;
            let inputs = Inputs {
                schema: schema.clone(),
                messages: messages.clone(),
                backends: backend.clone(),
            };
            generate::run(&config, &inputs, *strict)?;
        }
        Commands::Check {
            schema,
            messages,
            backend,
        } => {
            let config = load_config(&cli)?;
            let inputs = Inputs {
                schema: schema.clone(),
                messages: messages.clone(),
                backends: backend.clone(),
            };
            check::run(&config, &inputs)?;
        }
        Commands::Init { force } => {
            let path = cli.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
            init::run(&path, *force)?;
        }
    }

    Ok(())
}

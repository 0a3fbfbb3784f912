// src/bin/stackvault.rs
//! stackvault command-line interface
//!
//! Exit status: 0 success, 1 validation/config, 2 I/O or state, 3 crypto,
//! 4 rollback failure (vault integrity no longer guaranteed).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use stackvault::{default_record_path, provision, VaultConfig, VaultController, VaultError};

#[derive(Parser)]
#[command(name = "stackvault")]
#[command(about = "Personal LIFO file vault: push files in, pop them back out")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Config record location (defaults to the per-user config directory).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new vault and its config record.
    Install {
        /// Vault directory (default: ~/.stackvault).
        dir: Option<PathBuf>,
    },

    /// Relocate the vault directory.
    Setup {
        /// New vault directory.
        new_dir: PathBuf,
    },

    /// Push a file or directory onto the vault stack.
    Push {
        /// Item to push.
        item: PathBuf,

        /// Encrypt the vault with a passphrase (required once the vault
        /// is encrypted).
        #[arg(short = 'p', long = "password")]
        password: bool,
    },

    /// Pop the most recently pushed item into the current directory.
    Pop {
        /// Supply the vault passphrase.
        #[arg(short = 'p', long = "password")]
        password: bool,
    },

    /// Remove the vault directory and config record.
    Uninstall,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: logging already initialized");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<VaultError>()
                .map(VaultError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let record_path = cli.config.unwrap_or_else(default_record_path);

    match cli.command {
        Commands::Install { dir } => {
            let config = provision::install(&record_path, dir)?;
            println!("vault installed at {}", config.vault_dir.display());
        }
        Commands::Setup { new_dir } => {
            let mut config = load(&record_path)?;
            provision::setup(&mut config, &new_dir)?;
            println!("vault moved to {}", new_dir.display());
        }
        Commands::Push { item, password } => {
            let config = load(&record_path)?;
            let mut controller = VaultController::new(config);
            controller.push(&item, password)?;
            println!("pushed {}", item.display());
        }
        Commands::Pop { password } => {
            let config = load(&record_path)?;
            let dest = std::env::current_dir().context("cannot resolve current directory")?;
            let mut controller = VaultController::new(config);
            let name = controller.pop(password, &dest)?;
            println!("popped {name}");
        }
        Commands::Uninstall => {
            let config = load(&record_path)?;
            provision::uninstall(&config)?;
            println!("vault uninstalled");
        }
    }
    Ok(())
}

fn load(record_path: &std::path::Path) -> Result<VaultConfig> {
    VaultConfig::load(record_path)
        .with_context(|| format!("loading config record {}", record_path.display()))
}

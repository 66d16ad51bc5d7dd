use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use storefront_cli::OutputFormat;
use storefront_cli::commands;
use storefront_cli::commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "storefront-e2e")]
#[command(author, version)]
#[command(
    about = "End-to-end checkout tests for the demo web shop",
    long_about = "Drives a real Chrome through registration, login, cart and the full checkout \
                  wizard of the demo web shop, recording every step in a CSV report. \
                  Without a subcommand the checkout run is started."
)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Also write logs to a timestamped file in this directory
    #[arg(long, global = true, value_name = "DIR", conflicts_with = "log_file")]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the checkout flow against the storefront (default)
    Run(RunArgs),

    /// Print an exported step report
    Report {
        /// Path to the CSV report
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Remove old screenshots
    Clean {
        /// Screenshot directory
        #[arg(long, value_name = "DIR", default_value = "screenshots")]
        dir: PathBuf,

        /// Remove files older than this many days
        #[arg(long, default_value_t = 7)]
        days: u64,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for storefront-e2e.

SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    Bash:
        storefront-e2e completion --shell bash > ~/.local/share/bash-completion/completions/storefront-e2e
        # or source it from ~/.bashrc

    Zsh:
        storefront-e2e completion --shell zsh > ~/.zfunc/_storefront-e2e
        # and add ~/.zfunc to fpath in ~/.zshrc

    Fish:
        storefront-e2e completion --shell fish > ~/.config/fish/completions/storefront-e2e.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_file = match (&cli.log_file, &cli.log_dir) {
        (Some(file), _) => Some(file.clone()),
        (None, Some(dir)) => Some(timestamped_log_file(dir)),
        (None, None) => None,
    };
    if let Err(e) = init_logging(cli.verbose, log_file.as_deref()) {
        eprintln!("❌ {:#}", e);
        return ExitCode::from(2);
    }

    let outcome = match cli.command {
        Some(Commands::Run(args)) => commands::run::execute(&args),
        None => commands::run::execute(&cli.run),
        Some(Commands::Report { file, format }) => commands::report::execute(&file, format),
        Some(Commands::Clean { dir, days }) => commands::clean::execute(&dir, days).map(|_| true),
        Some(Commands::Completion { shell }) => {
            commands::completion::execute(shell, &mut Cli::command()).map(|_| true)
        }
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("❌ {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn timestamped_log_file(dir: &Path) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("test_execution_{}.log", stamp))
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    use std::sync::Mutex;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = if verbose {
        EnvFilter::new(
            "storefront_e2e=debug,storefront_cli=debug,storefront_core=debug,storefront_browser=debug",
        )
    } else {
        EnvFilter::new(
            "storefront_e2e=info,storefront_cli=info,storefront_core=info,storefront_browser=info",
        )
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
            }
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();
    Ok(())
}

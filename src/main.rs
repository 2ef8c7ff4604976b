use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "overviewgen")]
#[command(
    version,
    about = "Generate markdown project overviews from C#, TypeScript and GDScript sources"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        long,
        short,
        global = true,
        help = "Configuration file (default: ai-scan-config.json in the project root)"
    )]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a project and write the overview documents
    Generate {
        #[arg(help = "Project root (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(long, short, help = "Output directory (overrides outputDir)")]
        output: Option<PathBuf>,
    },

    /// Show the category each file is assigned to, without writing anything
    Classify {
        #[arg(help = "Project root (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(long, short, help = "List every file instead of a preview")]
        all: bool,
    },

    /// Print what the scanner extracts from a single file
    Inspect {
        #[arg(help = "Source file to scan")]
        file: PathBuf,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration (file merged with environment)
    Show {
        #[arg(help = "Project root (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(
            short = 'f',
            long,
            default_value = "json",
            help = "Output format: json, yaml, toml"
        )]
        format: String,
    },
    /// Validate the configuration without scanning
    Validate {
        #[arg(help = "Project root (default: current directory)")]
        path: Option<PathBuf>,
    },
    /// Write a starter configuration
    Init {
        #[arg(help = "Project root (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(
            short = 'f',
            long,
            default_value = "json",
            help = "File format: json, toml"
        )]
        format: String,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31moverviewgen encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Generate { path, output } => {
            overviewgen::cli::commands::generate::run(path, config, output)?;
        }
        Commands::Classify { path, all } => {
            overviewgen::cli::commands::classify::run(path, config, all)?;
        }
        Commands::Inspect { file, format } => {
            overviewgen::cli::commands::inspect::run(&file, &format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { path, format } => {
                overviewgen::cli::commands::config::show(path, config, &format)?;
            }
            ConfigAction::Validate { path } => {
                overviewgen::cli::commands::config::validate(path, config)?;
            }
            ConfigAction::Init {
                path,
                format,
                force,
            } => {
                overviewgen::cli::commands::config::init(path, &format, force)?;
            }
        },
    }

    Ok(())
}

pub mod commands;
pub mod render;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use culturehub_core::config::{AppConfig, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "culturehub",
    about = "CultureHub cultural recommendation CLI",
    long_about = "Turn free-text preferences into personalized cultural insights using Qloo's Taste AI and Google Gemini.",
    after_help = "Examples:\n  culturehub generate --use-case trip --input \"I love jazz and Italian food, plan a trip to New Orleans\"\n  culturehub use-cases\n  culturehub doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Generate insights for a use case from free-text preferences")]
    Generate {
        #[arg(long, short = 'u', help = "Use case label or slug (see `culturehub use-cases`)")]
        use_case: String,
        #[arg(long, short = 'i', help = "Your preferences or goals")]
        input: String,
        #[arg(long, help = "Emit the full report as JSON")]
        json: bool,
    },
    #[command(about = "List the supported use cases")]
    UseCases,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate configuration and credential readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate { use_case, input, json } => {
            commands::generate::run(&use_case, &input, json)
        }
        Command::UseCases => {
            commands::CommandResult { exit_code: 0, output: commands::use_cases::run() }
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Installs the global subscriber on stderr. Later calls are no-ops.
pub fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(log_level);

    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

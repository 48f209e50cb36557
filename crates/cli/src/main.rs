//! bizpilot CLI: the main entry point.
//!
//! Commands:
//! - `ask`      Run one business query
//! - `action`   Run a preset action
//! - `actions`  List the preset actions
//! - `estimate` Show the output-token ceiling and worst-case cost
//! - `serve`    Start the HTTP gateway
//! - `config`   Print the default or effective configuration

use std::path::PathBuf;

use bizpilot_core::{Domain, OutputFormat, Urgency};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "bizpilot",
    about = "bizpilot: business intelligence assistant for the ERP",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.bizpilot/config.toml)
    #[arg(short, long, global = true, env = "BIZPILOT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a business question
    Ask {
        /// What you want done or answered
        task: String,

        /// sales, operations, analytics, strategy, marketing or finance
        #[arg(short, long)]
        domain: Option<Domain>,

        /// low, medium or high
        #[arg(short, long)]
        urgency: Option<Urgency>,

        /// text, json, markdown or action-items
        #[arg(short, long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Include a live business-data snapshot in the prompt
        #[arg(long)]
        deep: bool,

        /// Attach a text file (repeatable)
        #[arg(short, long = "attach", value_name = "FILE")]
        attach: Vec<PathBuf>,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a preset action
    Action {
        /// Preset name, e.g. quick-decision
        name: String,

        /// Action parameter (repeatable)
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        param: Vec<String>,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the preset actions
    Actions,

    /// Show the output-token ceiling and worst-case cost
    Estimate {
        /// Only this output format
        #[arg(short, long)]
        format: Option<OutputFormat>,

        #[arg(short, long)]
        urgency: Option<Urgency>,
    },

    /// Start the HTTP gateway server
    Serve {
        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print configuration
    Config {
        /// Show the effective configuration (API keys redacted)
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Ask {
            task,
            domain,
            urgency,
            format,
            deep,
            attach,
            json,
        } => {
            let args = commands::ask::AskArgs {
                task,
                domain,
                urgency,
                format,
                deep,
                attach,
                json,
            };
            commands::ask::run(config_path, args).await?
        }
        Commands::Action { name, param, json } => {
            commands::action::run(config_path, &name, &param, json).await?
        }
        Commands::Actions => commands::action::list(),
        Commands::Estimate { format, urgency } => {
            commands::estimate::run(config_path, format, urgency)?
        }
        Commands::Serve { host, port } => commands::serve::run(config_path, host, port).await?,
        Commands::Config { show } => commands::config_cmd::run(config_path, show)?,
    }

    Ok(())
}

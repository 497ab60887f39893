//! vapid-push CLI - send a Web Push notification to the configured browser.
//!
//! This is the main binary entry point. See the `vapid_push` library for
//! the core functionality.

// Rust guideline compliant 2026-02

use anyhow::Result;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use std::path::{Path, PathBuf};

use vapid_push::commands::{self, SendArgs};
use vapid_push::env::Environment;
use vapid_push::notifications::{push::DEFAULT_TTL, DeliveryOptions, Urgency};
use vapid_push::Config;

/// Global allocator configured per M-MIMALLOC-APPS guideline.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

// CLI
#[derive(Parser)]
#[command(name = "vapid-push")]
#[command(version)]
#[command(about = "Send a VAPID-signed Web Push notification")]
struct Cli {
    /// Path to the config file (defaults to config.json in the config directory)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a notification to the configured subscription
    Send {
        /// Notification title (prompted for when omitted on a terminal)
        #[arg(long)]
        title: Option<String>,
        /// Notification body (prompted for when omitted on a terminal)
        #[arg(long)]
        body: Option<String>,
        /// Seconds the push service keeps an undelivered message
        #[arg(long, default_value_t = DEFAULT_TTL)]
        ttl: u32,
        /// Delivery urgency hint
        #[arg(long, value_enum)]
        urgency: Option<Urgency>,
        /// Topic that replaces pending messages with the same topic
        #[arg(long)]
        topic: Option<String>,
    },
    /// Show the resolved configuration (secrets redacted)
    Config,
}

/// Set up logging to a file so log lines don't mix with prompts.
///
/// Uses `VAPID_PUSH_LOG_FILE`, else `vapid-push.log` in the config
/// directory, else stderr.
fn init_logging(config_dir: Option<&Path>, environment: Environment) {
    let log_path = std::env::var("VAPID_PUSH_LOG_FILE")
        .map(PathBuf::from)
        .ok()
        .or_else(|| config_dir.map(|dir| dir.join("vapid-push.log")));

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(environment.default_log_filter()),
    );
    builder.format_timestamp_secs();

    match log_path.as_deref().map(std::fs::File::create) {
        Some(Ok(file)) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Some(Err(e)) => {
            eprintln!("Warning: could not create log file ({e}), logging to stderr");
        }
        None => {}
    }
    builder.init();
}

/// Prompt only on a real terminal outside CI, and only when a field is
/// missing.
fn is_interactive(
    title: Option<&String>,
    body: Option<&String>,
    stdin_is_tty: bool,
    in_ci: bool,
) -> bool {
    (title.is_none() || body.is_none()) && stdin_is_tty && !in_ci
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let environment = Environment::current();

    let config_dir = Config::config_dir();
    init_logging(config_dir.as_deref().ok(), environment);
    let config_dir = config_dir?;

    let config_path = cli
        .config
        .as_deref()
        .map(|path| PathBuf::from(shellexpand::tilde(path).as_ref()));
    let config = Config::load(config_path.as_deref())?;

    log::info!(
        "vapid-push v{} started ({environment})",
        env!("CARGO_PKG_VERSION")
    );

    match cli.command {
        Commands::Send {
            title,
            body,
            ttl,
            urgency,
            topic,
        } => {
            let interactive = is_interactive(
                title.as_ref(),
                body.as_ref(),
                atty::is(atty::Stream::Stdin),
                std::env::var("CI").is_ok(),
            );
            let args = SendArgs {
                title,
                body,
                options: DeliveryOptions {
                    ttl,
                    urgency,
                    topic,
                },
                interactive,
            };
            if !commands::send::run(config, &config_dir, args).await? {
                std::process::exit(1);
            }
        }
        Commands::Config => {
            commands::config::show(&config, &config_dir).await?;
        }
    }

    Ok(())
}

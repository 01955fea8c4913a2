//! Encore CLI - operator tool for the storefront.
//!
//! Commands:
//! - `encore quote` - Quote shipping for catalog products
//! - `encore payment status` - Show a payment's status
//! - `encore payment watch` - Poll a payment until it settles
//! - `encore config check` - Report missing credentials

mod commands;
mod context;
mod output;
mod transport;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{ConfigArgs, PaymentArgs, QuoteArgs};

/// Encore CLI - Quote shipping and follow payments for the storefront
#[derive(Parser)]
#[command(name = "encore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path (TOML). Defaults to environment variables.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote shipping for catalog products
    Quote(QuoteArgs),

    /// Look up or watch a payment
    Payment(PaymentArgs),

    /// Inspect configuration
    Config(ConfigArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Quote(args) => commands::quote::run(args, &ctx).await,
        Commands::Payment(args) => commands::payment::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    match result {
        Ok(commands::Outcome::Success) => Ok(()),
        Ok(commands::Outcome::Failure) => std::process::exit(1),
        Err(e) => {
            ctx.output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

//! CLI command implementations.

pub mod config;
pub mod payment;
pub mod quote;

use clap::{Args, Subcommand};

/// How a command that ran to completion should exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Nothing went wrong, but the answer is "no" (exit code 1).
    Failure,
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// Destination postal code (CEP).
    #[arg(short, long)]
    pub postal_code: String,

    /// Product slug; repeat to add more units.
    #[arg(short, long = "slug")]
    pub slugs: Vec<String>,

    /// Catalog file (default: the catalog built into the storefront).
    #[arg(long)]
    pub catalog: Option<String>,
}

/// Arguments for the payment command.
#[derive(Args)]
pub struct PaymentArgs {
    #[command(subcommand)]
    pub command: PaymentCommand,
}

#[derive(Subcommand)]
pub enum PaymentCommand {
    /// Show the current status of a payment.
    Status {
        /// Mercado Pago payment id.
        id: String,
    },
    /// Poll a payment until its status is final.
    Watch {
        /// Mercado Pago payment id.
        id: String,

        /// Seconds between polls.
        #[arg(long, default_value = "5")]
        interval_secs: u64,

        /// Give up after this many polls.
        #[arg(long, default_value = "60")]
        max_polls: u32,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Validate the configuration and report missing credentials.
    Check,
}

//! CLI definition using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use fieldbill_domain::model::Theme;
use fieldbill_domain::service::{LastRowPolicy, StyleVariant};
use fieldbill_types::OutputFormat;

#[derive(Parser)]
#[command(name = "fieldbill")]
#[command(version)]
#[command(about = "Field-service invoicing: labor and consumables ledgers, JSA forms")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a recorded invoice session and print the ledger
    Invoice {
        /// Path to the session script (JSON: header + edits)
        script: PathBuf,

        /// Pricing plan (TOML). Uses config value if not specified.
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Additional consumables catalog (CSV)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Last-row removal policy. Uses config value if not specified.
        #[arg(long, value_parser = parse_policy)]
        last_row: Option<LastRowPolicy>,

        /// Export the invoice to an Excel file
        #[arg(long, short = 'o')]
        export: Option<PathBuf>,

        /// Queue the invoice in the submission outbox
        #[arg(long)]
        submit: bool,
    },

    /// List or drop queued submissions
    Outbox {
        /// Remove the submission with this id
        #[arg(long)]
        remove: Option<String>,
    },

    /// Print the items of a catalog CSV or pricing plan TOML
    Catalog {
        /// Path to .csv or .toml file
        file: PathBuf,
    },

    /// Validate a JSA form
    Jsa {
        /// Path to the form (JSON)
        form: PathBuf,
    },

    /// Show or change the theme
    Theme {
        /// Set theme (light, dark)
        #[arg(long, value_parser = parse_theme, conflicts_with = "toggle")]
        set: Option<Theme>,

        /// Switch between light and dark
        #[arg(long)]
        toggle: bool,
    },

    /// Print the computed style for a variant under the current theme
    Style {
        /// Variant (screen, card, input, primary-button, text, muted-text, total-banner)
        #[arg(value_parser = parse_variant)]
        variant: StyleVariant,

        /// Theme override
        #[arg(long, value_parser = parse_theme)]
        theme: Option<Theme>,
    },

    /// Record a signed-in user
    Login {
        /// Account email
        email: String,
    },

    /// Clear the signed-in user
    Logout,

    /// Show theme and sign-in status
    Status,

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set last-row removal policy (keep_row, reset_row)
        #[arg(long, value_parser = parse_policy)]
        set_last_row: Option<LastRowPolicy>,

        /// Set default pricing plan path
        #[arg(long)]
        set_plan: Option<PathBuf>,

        /// Set data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Reset config to defaults
        #[arg(long)]
        reset: bool,
    },
}

fn parse_policy(s: &str) -> Result<LastRowPolicy, String> {
    s.parse().map_err(|e: fieldbill_types::Error| e.to_string())
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    s.parse().map_err(|e: fieldbill_types::Error| e.to_string())
}

fn parse_variant(s: &str) -> Result<StyleVariant, String> {
    s.parse().map_err(|e: fieldbill_types::Error| e.to_string())
}

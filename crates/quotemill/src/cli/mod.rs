pub mod body;
pub mod extract;
pub mod generate;
pub mod match_rows;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use quotemill_core::config::{master_path_from_env, MASTER_ENV_VAR};

#[derive(Parser)]
#[command(
    name = "qmill",
    about = "Quotation generation from customer emails",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: extract, match, render the letter, write the
    /// summary workbook
    Generate {
        /// Email file (.eml, .html or .txt)
        input: String,
        /// Master pricing workbook (falls back to QUOTEMILL_MASTER)
        #[arg(long)]
        master: Option<String>,
        /// Output workbook path
        #[arg(long, default_value = "investment_summary.xlsx")]
        out: String,
    },
    /// Extract details and the line-item table, without matching
    Extract {
        /// Email file (.eml, .html or .txt)
        input: String,
    },
    /// Match a saved markdown table against the master workbook (offline)
    Match {
        /// File holding the markdown line-item table
        table: String,
        /// Master pricing workbook (falls back to QUOTEMILL_MASTER)
        #[arg(long)]
        master: Option<String>,
    },
    /// Print the extracted email body
    Body {
        /// Email file (.eml, .html or .txt)
        input: String,
        /// Skip disclaimer stripping
        #[arg(long)]
        keep_boilerplate: bool,
    },
}

pub(crate) fn resolve_master(flag: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = master_path_from_env() {
        return Ok(path);
    }
    bail!("master workbook not specified (use --master or {MASTER_ENV_VAR})");
}

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use quotemill_core::export;
use quotemill_core::{LlmConfig, QuotePipeline, WatsonxClient};

pub async fn run(input: &str, master: Option<&str>, out: &str) -> Result<()> {
    let master = super::resolve_master(master)?;

    let config = LlmConfig::from_env()?;
    let client = Arc::new(WatsonxClient::new(config)?);
    let pipeline = QuotePipeline::new(client, master)?;

    let output = pipeline
        .run(Path::new(input))
        .await
        .with_context(|| format!("quotation run failed for {input}"))?;

    println!("{}", output.letter);

    export::write_summary(&output.quotation, Path::new(out))?;
    eprintln!(
        "Summary written: {out} ({} line items, {} matched, {} unmatched)",
        output.stats.line_items, output.stats.matched, output.stats.unmatched
    );

    Ok(())
}

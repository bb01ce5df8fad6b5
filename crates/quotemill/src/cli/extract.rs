use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use quotemill_core::ingest::{reader, BoilerplateStripper};
use quotemill_core::{FieldExtractor, LlmConfig, WatsonxClient};

pub async fn run(input: &str) -> Result<()> {
    let body = reader::read_body(Path::new(input))?;
    let body = BoilerplateStripper::new()?.strip(&body);

    let config = LlmConfig::from_env()?;
    let client = Arc::new(WatsonxClient::new(config)?);
    let extractor = FieldExtractor::new(client);

    let details = extractor.extract_details(&body).await?;
    let table = extractor.extract_table(&body).await?;

    println!("Our Ref: {}", details.our_ref);
    println!("Date: {}", details.date);
    println!("To: {}", details.to);
    println!("From: {}", details.from);
    println!("Subject: {}", details.subject);
    println!();
    println!("{table}");

    Ok(())
}

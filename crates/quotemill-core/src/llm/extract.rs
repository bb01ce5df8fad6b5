use std::sync::Arc;

use crate::llm::client::{LlmClient, LlmResult};
use crate::llm::{prompts, response};
use crate::quotation::QuotationDetails;

/// Runs the two extraction calls against an injected model client.
pub struct FieldExtractor {
    client: Arc<dyn LlmClient>,
}

impl FieldExtractor {
    #[must_use]
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Extract the quotation header fields from the email body.
    pub async fn extract_details(&self, body: &str) -> LlmResult<QuotationDetails> {
        let raw = self.client.generate(&prompts::details_prompt(body)).await?;
        Ok(response::parse_details(&raw))
    }

    /// Extract the line-item table from the email body, as markdown.
    pub async fn extract_table(&self, body: &str) -> LlmResult<String> {
        self.client.generate(&prompts::table_prompt(body)).await
    }
}

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::info;

use crate::ingest::normalizer::{BoilerplateStripper, NormalizeError};
use crate::ingest::reader::{self, ReadError};
use crate::llm::client::{LlmClient, LlmError};
use crate::llm::extract::FieldExtractor;
use crate::master::{self, MasterError};
use crate::matcher;
use crate::quotation::{Quotation, RenderError};
use crate::table::{self, TableError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Read error: {0}")]
    Read(#[from] ReadError),
    #[error("Normalizer error: {0}")]
    Normalize(#[from] NormalizeError),
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("Table error: {0}")]
    Table(#[from] TableError),
    #[error("Master data error: {0}")]
    Master(#[from] MasterError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Clone)]
pub struct QuoteStats {
    pub line_items: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub duration_ms: u64,
}

/// Everything one run produces: the cleaned body, the assembled quotation,
/// the rendered letter, and run stats.
#[derive(Debug)]
pub struct QuoteOutput {
    pub body: String,
    pub quotation: Quotation,
    pub letter: String,
    pub stats: QuoteStats,
}

/// The end-to-end quotation pipeline.
///
/// Dependencies are injected: the model client at construction, the master
/// workbook as a path read fresh on every run. No global state.
pub struct QuotePipeline {
    extractor: FieldExtractor,
    stripper: BoilerplateStripper,
    master_path: PathBuf,
}

impl QuotePipeline {
    pub fn new(
        client: Arc<dyn LlmClient>,
        master_path: impl Into<PathBuf>,
    ) -> PipelineResult<Self> {
        Ok(Self {
            extractor: FieldExtractor::new(client),
            stripper: BoilerplateStripper::new()?,
            master_path: master_path.into(),
        })
    }

    #[must_use]
    pub fn with_stripper(mut self, stripper: BoilerplateStripper) -> Self {
        self.stripper = stripper;
        self
    }

    /// Run the pipeline over one email file.
    pub async fn run(&self, input: &Path) -> PipelineResult<QuoteOutput> {
        let start = Instant::now();

        let body = reader::read_body(input)?;
        let body = self.stripper.strip(&body);

        let details = self.extractor.extract_details(&body).await?;
        let table_md = self.extractor.extract_table(&body).await?;

        let items = table::parse_markdown_table(&table_md)?;
        let master = master::load_master(&self.master_path)?;
        let matched = matcher::match_items(&items, &master);

        let matched_count = matched.iter().filter(|m| m.is_matched()).count();
        let stats = QuoteStats {
            line_items: matched.len(),
            matched: matched_count,
            unmatched: matched.len() - matched_count,
            duration_ms: duration_ms(start),
        };

        let quotation = Quotation::assemble(details, matched);
        let letter = quotation.render_letter()?;

        info!(
            line_items = stats.line_items,
            matched = stats.matched,
            unmatched = stats.unmatched,
            duration_ms = stats.duration_ms,
            "quotation assembled"
        );

        Ok(QuoteOutput {
            body,
            quotation,
            letter,
            stats,
        })
    }
}

#[allow(clippy::cast_possible_truncation)]
fn duration_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::LlmResult;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    struct CannedClient {
        details: &'static str,
        table: &'static str,
    }

    #[async_trait]
    impl LlmClient for CannedClient {
        async fn generate(&self, prompt: &str) -> LlmResult<String> {
            if prompt.contains("Extract the table") {
                Ok(self.table.into())
            } else {
                Ok(self.details.into())
            }
        }
    }

    fn write_master(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("master.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        let headers = [
            "Req. Ref.",
            "Project",
            "Site",
            "Env.",
            "Type",
            "Description",
            "Unit Cost",
            "Total Cost",
            "Quote Reference #",
        ];
        for (c, header) in headers.iter().enumerate() {
            sheet.write_string(0, c as u16, *header).unwrap();
        }
        for (c, value) in ["r1", "p1", "s1", "prod", "storage", "2TB SSD"]
            .iter()
            .enumerate()
        {
            sheet.write_string(1, c as u16, *value).unwrap();
        }
        sheet.write_number(1, 6, 100.0).unwrap();
        sheet.write_number(1, 7, 200.0).unwrap();
        sheet.write_string(1, 8, "Q1").unwrap();

        workbook.save(&path).unwrap();
        path
    }

    fn write_email(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("request.eml");
        std::fs::write(
            &path,
            "From: ops@example.com\r\nSubject: uplift\r\nContent-Type: text/plain\r\n\r\n\
Hi Lionel, requirements attached.\r\n\r\nUOB EMAIL DISCLAIMER\r\nconfidential\r\n",
        )
        .unwrap();
        path
    }

    #[tokio::test]
    async fn test_end_to_end_run() {
        let dir = TempDir::new().unwrap();
        let master_path = write_master(&dir);
        let email_path = write_email(&dir);

        let client = Arc::new(CannedClient {
            details: "**Our Ref**: SSR2024-040\n**Date**: Monday, 02 December 2024\n**To**: Jake @ 64138413\n**From**: Lionel\n**Subject/Prj Name**: Capacity Uplift",
            table: "| Req. Ref. | Project | Site | Env. | Type | Items | Qty (GiB) |\n\
| --- | --- | --- | --- | --- | --- | --- |\n\
| R1 | P1 | S1 | Prod | Storage | 2 TB ssd | 2 |\n\
| R9 | P9 | S9 | Prod | Storage | unknown widget | 1 |",
        });

        let pipeline = QuotePipeline::new(client, &master_path).unwrap();
        let output = pipeline.run(&email_path).await.unwrap();

        // Disclaimer stripped before extraction.
        assert!(!output.body.contains("DISCLAIMER"));

        assert_eq!(output.stats.line_items, 2);
        assert_eq!(output.stats.matched, 1);
        assert_eq!(output.stats.unmatched, 1);

        let q = &output.quotation;
        assert_eq!(q.items[0].total_cost, Some(Decimal::from(200)));
        assert!(!q.items[1].is_matched());
        assert_eq!(q.total_investment, Decimal::from(200));
        assert_eq!(q.total_with_gst, Decimal::new(21600, 2));

        // First matched row's reference supersedes the extracted one.
        assert_eq!(q.details.our_ref, "Q1");
        assert!(output.letter.contains("Dear Jake,"));
    }

    #[tokio::test]
    async fn test_malformed_table_is_typed_error() {
        let dir = TempDir::new().unwrap();
        let master_path = write_master(&dir);
        let email_path = write_email(&dir);

        let client = Arc::new(CannedClient {
            details: "**Our Ref**: X",
            table: "sorry, I could not find a table",
        });

        let pipeline = QuotePipeline::new(client, &master_path).unwrap();
        let err = pipeline.run(&email_path).await.unwrap_err();

        assert!(matches!(err, PipelineError::Table(TableError::Empty)));
    }
}

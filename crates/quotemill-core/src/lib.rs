#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod export;
pub mod fuzzy;
pub mod ingest;
pub mod llm;
pub mod master;
pub mod matcher;
pub mod pipeline;
pub mod quotation;
pub mod table;

pub use config::{ConfigError, LlmConfig};
pub use ingest::{BoilerplateStripper, MessageFormat};
pub use llm::{FieldExtractor, LlmClient, LlmError, WatsonxClient};
pub use master::{load_master, MasterError, MasterRecord};
pub use matcher::{match_items, CompositeKey, MatchedItem, NOT_AVAILABLE};
pub use pipeline::{PipelineError, QuoteOutput, QuotePipeline, QuoteStats};
pub use quotation::{Quotation, QuotationDetails, SUMMARY_HEADERS};
pub use table::{parse_markdown_table, LineItem, TableError};

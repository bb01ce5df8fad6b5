pub mod client;
pub mod extract;
pub mod prompts;
pub mod response;

pub use client::{LlmClient, LlmError, LlmResult, WatsonxClient};
pub use extract::FieldExtractor;

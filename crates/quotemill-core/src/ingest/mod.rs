pub mod normalizer;
pub mod reader;

pub use normalizer::{BoilerplateStripper, NormalizeError};
pub use reader::{extract_body, read_body, MessageFormat, ReadError};

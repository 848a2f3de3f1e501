pub mod archive;
pub mod engine;
pub mod prompt;
pub mod response;

pub use crate::domain::model::{FileSet, FixOptions, FixOutcome, FixRequest, FixedFiles};
pub use crate::domain::ports::{LanguageModel, ModelSettings};
pub use crate::utils::error::Result;

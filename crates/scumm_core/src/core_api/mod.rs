mod engine;
mod error;
mod types;

pub use engine::Engine;
pub use error::{CoreError, CoreErrorCode, CorruptionKind};
pub use types::{DescummConfig, Extraction, ExtractorConfig, ScummVersion};

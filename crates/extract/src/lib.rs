pub mod enrich;
pub mod extract;
pub mod pipeline;

pub use enrich::{fields_from_json, EnrichError, NoopEnricher, OllamaEnricher, StaticEnricher, TextEnricher};
pub use extract::Extractor;
pub use pipeline::{InvoicePipeline, PipelineError};

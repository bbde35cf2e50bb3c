pub mod extract;
pub mod reconcile;
pub mod statement;

use std::path::{Path, PathBuf};

use anyhow::Context;
use lettrage_core::{EnrichmentConfig, InvoiceRecord};
use lettrage_extract::{InvoicePipeline, OllamaEnricher};
use tracing::info;

/// Enrichment flags shared by `extract` and `match`.
#[derive(clap::Args, Debug, Default)]
pub struct EnrichArgs {
    /// Ask the local LLM service to refine the extracted fields
    #[arg(long)]
    pub llm: bool,

    /// Model name for the LLM service
    #[arg(long)]
    pub model: Option<String>,
}

impl EnrichArgs {
    pub fn apply(&self, config: &mut EnrichmentConfig) {
        if self.llm {
            config.enabled = true;
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
    }
}

/// Run the invoice pipeline over `files`, with enrichment when enabled.
pub async fn extract_invoices(files: &[PathBuf], config: &EnrichmentConfig) -> anyhow::Result<Vec<InvoiceRecord>> {
    let enricher = if config.enabled {
        info!(model = %config.model, base_url = %config.base_url, "LLM enrichment enabled");
        Some(OllamaEnricher::new(config).context("building the LLM client")?)
    } else {
        None
    };
    let records = InvoicePipeline::new(enricher)
        .process_files(files)
        .await
        .context("invoice extraction failed")?;
    Ok(records)
}

pub fn write_file(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, data).with_context(|| format!("writing {}", path.display()))?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}

pub fn show(value: Option<impl ToString>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

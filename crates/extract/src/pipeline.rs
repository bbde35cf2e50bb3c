use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use lettrage_core::InvoiceRecord;

use crate::enrich::{NoopEnricher, TextEnricher};
use crate::extract::Extractor;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("PDF text extraction failed for {filename}: {source}")]
    Pdf {
        filename: String,
        #[source]
        source: lettrage_pdf::PdfError,
    },
}

/// Orchestrates: read → PDF text layer → heuristic extraction → enrichment overlay.
pub struct InvoicePipeline<E: TextEnricher = NoopEnricher> {
    enricher: E,
}

impl InvoicePipeline<NoopEnricher> {
    /// Heuristics only.
    pub fn heuristic() -> Self {
        Self { enricher: NoopEnricher }
    }
}

impl Default for InvoicePipeline<NoopEnricher> {
    fn default() -> Self {
        Self::heuristic()
    }
}

impl<E: TextEnricher> InvoicePipeline<E> {
    pub fn new(enricher: E) -> Self {
        Self { enricher }
    }

    /// Process every file in order. The batch stops at the first document
    /// that cannot be read.
    pub async fn process_files(&self, paths: &[PathBuf]) -> Result<Vec<InvoiceRecord>, PipelineError> {
        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            records.push(self.process_file(path).await?);
        }
        info!(
            documents = records.len(),
            with_total = records.iter().filter(|r| r.total_amount.is_some()).count(),
            "invoice extraction done"
        );
        Ok(records)
    }

    /// Process a PDF on disk. The record is named after the file name.
    pub async fn process_file(&self, path: &Path) -> Result<InvoiceRecord, PipelineError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.process_bytes(&filename, &bytes).await
    }

    /// Process PDF bytes already in memory.
    pub async fn process_bytes(&self, filename: &str, data: &[u8]) -> Result<InvoiceRecord, PipelineError> {
        let text = lettrage_pdf::extract_text(data).map_err(|source| PipelineError::Pdf {
            filename: filename.to_string(),
            source,
        })?;
        Ok(self.process_text(filename, text).await)
    }

    /// Extract fields from text that has already been pulled out of a
    /// document. Never fails; empty text gives a record with no fields.
    pub async fn process_text(&self, filename: &str, text: String) -> InvoiceRecord {
        let mut fields = Extractor::extract(&text);
        match self.enricher.enrich(&text).await {
            Some(enriched) if !enriched.is_empty() => fields.overlay(enriched),
            Some(_) => debug!(filename, "enrichment returned no fields"),
            None => {}
        }
        debug!(
            filename,
            number = fields.invoice_number.as_deref().unwrap_or(""),
            total = ?fields.total_amount,
            "invoice extracted"
        );
        InvoiceRecord::new(filename, fields, text)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

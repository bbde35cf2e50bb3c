//! Text-layer extraction for PDF invoices and statements.
//!
//! Only the embedded text layer is read; scanned documents yield empty text.

use lopdf::Document;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("failed to parse PDF: {0}")]
    Parse(String),
    #[error("PDF is encrypted")]
    Encrypted,
    #[error("PDF has no pages")]
    NoPages,
}

pub type Result<T> = std::result::Result<T, PdfError>;

/// A parsed document, decrypted when it was protected by an empty password.
pub struct LoadedPdf {
    document: Document,
    raw: Vec<u8>,
}

impl LoadedPdf {
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("decrypted PDF with empty password");
            let mut buf = Vec::new();
            document
                .save_to(&mut buf)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {e}")))?;
            buf
        } else {
            data.to_vec()
        };

        let pdf = Self { document, raw };
        if pdf.page_count() == 0 {
            return Err(PdfError::NoPages);
        }
        debug!(pages = pdf.page_count(), "loaded PDF");
        Ok(pdf)
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Text of each page in order. A page whose text cannot be decoded
    /// contributes an empty string.
    pub fn pages(&self) -> Vec<String> {
        self.document
            .get_pages()
            .keys()
            .map(|&n| match self.document.extract_text(&[n]) {
                Ok(text) => text,
                Err(e) => {
                    warn!(page = n, "unreadable PDF page: {e}");
                    String::new()
                }
            })
            .collect()
    }

    /// Full document text. Falls back to the per-page text when the layout
    /// extractor rejects the document.
    pub fn text(&self) -> String {
        match pdf_extract::extract_text_from_mem(&self.raw) {
            Ok(text) => text,
            Err(e) => {
                warn!("layout text extraction failed, using page text: {e}");
                self.pages().join("\n")
            }
        }
    }
}

/// Full text of a PDF held in memory.
pub fn extract_text(data: &[u8]) -> Result<String> {
    Ok(LoadedPdf::load(data)?.text())
}

/// Per-page text of a PDF held in memory.
pub fn extract_pages(data: &[u8]) -> Result<Vec<String>> {
    Ok(LoadedPdf::load(data)?.pages())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn rejects_non_pdf_bytes() {
        assert!(matches!(extract_text(b"date,amount\n"), Err(PdfError::Parse(_))));
        assert!(matches!(extract_pages(b""), Err(PdfError::Parse(_))));
    }

    #[test]
    fn reads_pages_in_order() {
        let data = build_pdf(&["Facture N INV-042", "Total TTC 150,00"]);
        let pdf = LoadedPdf::load(&data).unwrap();
        assert_eq!(pdf.page_count(), 2);
        let pages = pdf.pages();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("INV-042"));
        assert!(pages[1].contains("150,00"));
    }

    #[test]
    fn full_text_never_errors_on_valid_pdf() {
        let data = build_pdf(&["Invoice #A-1"]);
        assert!(extract_text(&data).is_ok());
    }
}

//! Document extraction: PDF bytes to plain text.
//!
//! No OCR: a PDF without a text layer yields an empty string, which is passed on
//! downstream like any other text.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::warn;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Not a PDF document: missing %PDF- header")]
    BadHeader,

    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("PDF extraction aborted: {0}")]
    Aborted(String),
}

/// Turns an uploaded document into text. Carried by the pipeline as `Arc<dyn DocumentExtractor>`.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, bytes: Bytes) -> Result<String, ExtractionError>;
}

/// Text-layer extractor backed by `pdf-extract`.
///
/// Parsing is CPU-bound and the parser can panic on hostile input, so it runs inside
/// `tokio::task::spawn_blocking` and a panic surfaces as `ExtractionError::Aborted`.
pub struct PdfTextExtractor;

#[async_trait]
impl DocumentExtractor for PdfTextExtractor {
    async fn extract(&self, bytes: Bytes) -> Result<String, ExtractionError> {
        if !has_pdf_header(&bytes) {
            return Err(ExtractionError::BadHeader);
        }

        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| ExtractionError::Aborted(e.to_string()))?
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;

        Ok(normalize_text(text))
    }
}

/// True when the buffer starts with the PDF magic, ignoring leading whitespace.
pub fn has_pdf_header(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(PDF_MAGIC)
}

fn normalize_text(text: String) -> String {
    if text.trim().is_empty() {
        warn!("PDF has no extractable text layer; continuing with empty text");
        String::new()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_detected() {
        assert!(has_pdf_header(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n"));
    }

    #[test]
    fn test_header_after_leading_whitespace() {
        assert!(has_pdf_header(b"\r\n  %PDF-1.4\n"));
    }

    #[test]
    fn test_header_missing() {
        assert!(!has_pdf_header(b"PK\x03\x04 this is a zip"));
        assert!(!has_pdf_header(b"Jane Doe, Software Engineer"));
        assert!(!has_pdf_header(b""));
        assert!(!has_pdf_header(b"%PD"));
    }

    #[test]
    fn test_whitespace_only_text_becomes_empty() {
        assert_eq!(normalize_text(" \n\t \n".to_string()), "");
    }

    #[test]
    fn test_real_text_is_kept_verbatim() {
        let text = "  Jane Doe\nRust Engineer\n".to_string();
        assert_eq!(normalize_text(text.clone()), text);
    }

    #[tokio::test]
    async fn test_plain_text_upload_is_rejected() {
        let err = PdfTextExtractor
            .extract(Bytes::from_static(b"Jane Doe\nSenior Engineer"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::BadHeader));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_body_fails_without_panicking() {
        let err = PdfTextExtractor
            .extract(Bytes::from_static(b"%PDF-1.4\nthis is not really a pdf\n%%EOF"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Parse(_) | ExtractionError::Aborted(_)
        ));
    }
}

//! Document text extraction for uploaded job descriptions and resumes.

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, error};

const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("PDF extraction aborted: {0}")]
    Aborted(String),
}

/// A single uploaded file (or pasted text wrapped as one).
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn from_text(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content_type: Some("text/plain".to_string()),
            bytes: Bytes::from(text.into()),
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type.as_deref() == Some("application/pdf")
            || self.filename.to_ascii_lowercase().ends_with(".pdf")
            || self.bytes.starts_with(PDF_MAGIC)
    }
}

/// Returns the document's text, or an empty string if it cannot be read.
/// The failure is logged; callers treat blank text as "skip this file".
pub async fn read_text(document: &UploadedDocument) -> String {
    if !document.is_pdf() {
        return String::from_utf8_lossy(&document.bytes).into_owned();
    }

    match extract_pdf_text(document.bytes.clone()).await {
        Ok(text) => {
            debug!(filename = %document.filename, chars = text.len(), "PDF text extracted");
            text
        }
        Err(e) => {
            error!(filename = %document.filename, "Error reading PDF: {e}");
            String::new()
        }
    }
}

/// Extracts text page by page and joins the pages, each followed by a newline.
/// Parsing runs on the blocking pool; a panic inside the parser is reported as `Aborted`.
pub async fn extract_pdf_text(bytes: Bytes) -> Result<String, DocumentError> {
    let pages = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| DocumentError::Aborted(e.to_string()))?
    .map_err(DocumentError::Pdf)?;

    debug!(pages = pages.len(), "PDF pages parsed");
    Ok(join_pages(&pages))
}

fn join_pages(pages: &[String]) -> String {
    let mut text = String::with_capacity(pages.iter().map(|p| p.len() + 1).sum());
    for page in pages {
        text.push_str(page.trim_end());
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(filename: &str, content_type: Option<&str>, bytes: &'static [u8]) -> UploadedDocument {
        UploadedDocument {
            filename: filename.to_string(),
            content_type: content_type.map(str::to_string),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn test_pdf_detected_by_extension() {
        assert!(doc("Resume.PDF", None, b"whatever").is_pdf());
    }

    #[test]
    fn test_pdf_detected_by_content_type() {
        assert!(doc("resume", Some("application/pdf"), b"whatever").is_pdf());
    }

    #[test]
    fn test_pdf_detected_by_magic_bytes() {
        assert!(doc("upload.bin", None, b"%PDF-1.7\n").is_pdf());
    }

    #[test]
    fn test_text_document_not_pdf() {
        assert!(!UploadedDocument::from_text("notes.txt", "hello").is_pdf());
    }

    /// Builds a minimal two-page PDF using the standard Helvetica font,
    /// with a correct cross-reference table.
    fn two_page_pdf(first: &str, second: &str) -> Vec<u8> {
        let page = |contents: usize| {
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 7 0 R >> >> /Contents {contents} 0 R >>"
            )
        };
        let stream = |text: &str| {
            let ops = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
            format!("<< /Length {} >>\nstream\n{ops}\nendstream", ops.len())
        };
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R 4 0 R] /Count 2 >>".to_string(),
            page(5),
            page(6),
            stream(first),
            stream(second),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (idx, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", idx + 1).as_bytes());
        }

        let xref_at = pdf.len();
        let size = objects.len() + 1;
        pdf.extend_from_slice(format!("xref\n0 {size}\n0000000000 65535 f \n").as_bytes());
        for offset in offsets {
            pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        pdf.extend_from_slice(
            format!("trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n")
                .as_bytes(),
        );
        pdf
    }

    #[test]
    fn test_join_pages_adds_newline_per_page() {
        let pages = vec!["page one  ".to_string(), "page two".to_string()];
        assert_eq!(join_pages(&pages), "page one\npage two\n");
    }

    #[tokio::test]
    async fn test_extract_pdf_text_separates_pages() {
        let pdf = two_page_pdf("Ada Lovelace Python", "Second page SQL");
        let text = extract_pdf_text(Bytes::from(pdf)).await.unwrap();

        let first = text.find("Ada Lovelace Python").expect("first page text");
        let second = text.find("Second page SQL").expect("second page text");
        assert!(first < second);
        assert!(text[first..second].contains('\n'), "pages joined: {text:?}");
        assert!(!text.contains("PythonSecond"));
        assert!(text.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_read_text_plain_document() {
        let document = UploadedDocument::from_text("jd.txt", "Senior Rust Engineer");
        assert_eq!(read_text(&document).await, "Senior Rust Engineer");
    }

    #[tokio::test]
    async fn test_read_text_malformed_pdf_is_empty() {
        let document = doc("broken.pdf", Some("application/pdf"), b"%PDF-1.4 truncated garbage");
        assert!(read_text(&document).await.trim().is_empty());
    }

    #[tokio::test]
    async fn test_extract_pdf_text_malformed_is_error() {
        let result = extract_pdf_text(Bytes::from_static(b"not a pdf at all")).await;
        assert!(result.is_err());
    }
}

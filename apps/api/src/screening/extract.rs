//! Resume text extraction. PDF and DOCX parsing are CPU-bound and run on the
//! blocking pool.

use std::path::Path;

use bytes::Bytes;
use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};
use thiserror::Error;

/// File extensions accepted for resume uploads.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".docx", ".txt"];

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file format '{0}'. Supported: PDF, DOCX, TXT")]
    UnsupportedFormat(String),

    #[error("Could not extract text from resume. File may be empty or corrupted.")]
    EmptyText,

    #[error("PDF parsing failed: {0}")]
    Pdf(String),

    #[error("DOCX parsing failed: {0}")]
    Docx(String),

    #[error("Extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Lowercased extension including the leading dot, e.g. `.pdf`.
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

pub fn is_allowed_extension(filename: &str) -> bool {
    file_extension(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Extracts plain text from a resume file based on its extension.
pub async fn extract_text(filename: &str, data: Bytes) -> Result<String, ExtractionError> {
    let ext = file_extension(filename).unwrap_or_default();

    let text = match ext.as_str() {
        ".pdf" => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data).map_err(|e| ExtractionError::Pdf(e.to_string()))
        })
        .await??,
        ".docx" => tokio::task::spawn_blocking(move || docx_text(&data)).await??,
        ".txt" => String::from_utf8_lossy(&data).into_owned(),
        _ => return Err(ExtractionError::UnsupportedFormat(ext)),
    };

    // Postgres TEXT columns reject NUL.
    let text = text.replace('\0', "");
    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyText);
    }
    Ok(text)
}

/// Paragraph text of a Word document, one paragraph per line.
fn docx_text(data: &[u8]) -> Result<String, ExtractionError> {
    let docx = read_docx(data).map_err(|e| ExtractionError::Docx(format!("{e:?}")))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();
    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    _ => {}
                }
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension_lowercases() {
        assert_eq!(file_extension("Jane_Doe.PDF").as_deref(), Some(".pdf"));
        assert_eq!(file_extension("resume"), None);
    }

    #[test]
    fn test_allowed_extensions() {
        assert!(is_allowed_extension("cv.pdf"));
        assert!(is_allowed_extension("cv.txt"));
        assert!(is_allowed_extension("CV.DOCX"));
        assert!(!is_allowed_extension("cv.doc"));
        assert!(!is_allowed_extension("cv.exe"));
        assert!(!is_allowed_extension("cv"));
    }

    #[tokio::test]
    async fn test_extract_plain_text() {
        let text = extract_text("cv.txt", Bytes::from_static(b"Rust engineer, 5 years experience"))
            .await
            .unwrap();
        assert!(text.contains("Rust engineer"));
    }

    #[tokio::test]
    async fn test_extract_rejects_whitespace_only() {
        let result = extract_text("cv.txt", Bytes::from_static(b"  \n\t ")).await;
        assert!(matches!(result, Err(ExtractionError::EmptyText)));
    }

    #[tokio::test]
    async fn test_extract_rejects_unknown_format() {
        let result = extract_text("cv.odt", Bytes::from_static(b"hello")).await;
        assert!(matches!(result, Err(ExtractionError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_extract_strips_nul_bytes() {
        let text = extract_text("cv.txt", Bytes::from_static(b"Rust\0 engineer"))
            .await
            .unwrap();
        assert_eq!(text, "Rust engineer");

        let result = extract_text("cv.txt", Bytes::from_static(b"\0\0 \0")).await;
        assert!(matches!(result, Err(ExtractionError::EmptyText)));
    }

    #[tokio::test]
    async fn test_extract_docx_paragraphs() {
        use docx_rs::{Docx, Run};

        let mut buf = std::io::Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Jane Doe")))
            .add_paragraph(Paragraph::new())
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Senior Rust engineer, "))
                    .add_run(Run::new().add_text("7 years of experience")),
            )
            .build()
            .pack(&mut buf)
            .unwrap();

        let text = extract_text("cv.docx", Bytes::from(buf.into_inner()))
            .await
            .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Jane Doe");
        assert!(lines[1].contains("Senior Rust engineer"));
        assert!(lines[1].contains("7 years of experience"));
    }

    #[tokio::test]
    async fn test_extract_reports_corrupt_docx() {
        let result = extract_text("cv.docx", Bytes::from_static(b"not a zip")).await;
        assert!(matches!(result, Err(ExtractionError::Docx(_))));
    }

    #[tokio::test]
    async fn test_extract_reports_corrupt_pdf() {
        let result = extract_text("cv.pdf", Bytes::from_static(b"not a pdf")).await;
        assert!(result.is_err());
    }
}

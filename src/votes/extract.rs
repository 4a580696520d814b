//! PDF text extraction via pdfium.
//!
//! Each page is read through pdfium's page text API, which covers text
//! nested inside form objects as well as top-level runs. Pages are joined
//! with newlines. No column or layout reconstruction is attempted, so
//! reading order is whatever pdfium's text layer reports.
//!
//! pdfium is blocking and keeps thread-local state, so extraction runs
//! inside `tokio::task::spawn_blocking`.

use crate::error::{byte_preview, CivicError};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Canonical signature every PDF starts with.
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Reject payloads that are not PDFs before pdfium sees them.
pub fn check_signature(url: &str, bytes: &[u8]) -> Result<(), CivicError> {
    if bytes.starts_with(PDF_SIGNATURE) {
        Ok(())
    } else {
        Err(CivicError::NotAPdf {
            url: url.to_string(),
            preview: byte_preview(bytes, 32),
        })
    }
}

/// Flatten per-page text into one string.
pub fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Extract the full text of a PDF held in memory.
///
/// An empty string is a valid result (zero pages, or pages without a text
/// layer); only a bad signature or an unreadable document is an error.
pub async fn extract_text(
    url: &str,
    bytes: Vec<u8>,
    pdfium_lib: Option<&Path>,
) -> Result<String, CivicError> {
    check_signature(url, &bytes)?;

    let url_owned = url.to_string();
    let lib = pdfium_lib.map(Path::to_path_buf);

    tokio::task::spawn_blocking(move || extract_text_blocking(&url_owned, &bytes, lib))
        .await
        .map_err(|e| CivicError::Internal(format!("Extraction task panicked: {e}")))?
}

/// Blocking implementation of text extraction.
fn extract_text_blocking(
    url: &str,
    bytes: &[u8],
    pdfium_lib: Option<PathBuf>,
) -> Result<String, CivicError> {
    let pdfium = bind_pdfium(pdfium_lib.as_deref())?;

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| CivicError::CorruptPdf {
            url: url.to_string(),
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    info!("PDF loaded: {} pages", pages.len());

    let mut page_texts: Vec<String> = Vec::with_capacity(pages.len() as usize);
    for (idx, page) in pages.iter().enumerate() {
        let text = page
            .text()
            .map_err(|e| CivicError::CorruptPdf {
                url: url.to_string(),
                detail: format!("page {}: text layer unreadable: {e:?}", idx + 1),
            })?
            .all();
        debug!("Page {}: {} chars", idx + 1, text.chars().count());
        page_texts.push(text);
    }

    let text = join_pages(&page_texts);
    if text.is_empty() {
        warn!("No extractable text in {}", url);
    }
    Ok(text)
}

/// Bind pdfium from an explicit library file or directory, else the system.
fn bind_pdfium(lib: Option<&Path>) -> Result<Pdfium, CivicError> {
    let bindings = match lib {
        Some(path) if path.is_dir() => {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(path))
        }
        Some(path) => Pdfium::bind_to_library(path),
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| CivicError::PdfiumBindingFailed(format!("{e:?}")))?;

    Ok(Pdfium::new(bindings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_accepts_pdf() {
        assert!(check_signature("u", b"%PDF-1.7\n%\xe2\xe3").is_ok());
    }

    #[test]
    fn signature_rejects_html_with_preview() {
        let err = check_signature("https://x.test/vp.pdf", b"<!DOCTYPE html><html>").unwrap_err();
        match err {
            CivicError::NotAPdf { url, preview } => {
                assert_eq!(url, "https://x.test/vp.pdf");
                assert!(preview.starts_with("<!DOCTYPE"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn signature_rejects_empty_payload() {
        assert!(matches!(check_signature("u", b""), Err(CivicError::NotAPdf { .. })));
    }

    #[test]
    fn pages_join_with_newlines() {
        let pages = vec![
            "For the motion:\n".to_string(),
            String::new(),
            "  Smith".to_string(),
        ];
        assert_eq!(join_pages(&pages), "For the motion:\n\nSmith");
    }

    #[test]
    fn no_pages_is_empty_text() {
        assert_eq!(join_pages(&[]), "");
    }

    #[tokio::test]
    async fn extraction_checks_signature_before_binding() {
        let err = extract_text("https://x.test/a.pdf", b"GIF89a".to_vec(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CivicError::NotAPdf { .. }));
    }
}

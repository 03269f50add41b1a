use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::debug;

use crate::error::{RagError, Result};

/// Turns a document file into its raw text.
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<String>;
}

/// Extracts the text layer of a PDF, page by page, with `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let file = file_label(path);
        let bytes = std::fs::read(path).map_err(|e| RagError::Extraction {
            file: file.clone(),
            message: e.to_string(),
        })?;

        // pdf-extract panics on some malformed streams instead of returning Err.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&bytes)
        }));

        let text = match outcome {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                return Err(RagError::Extraction {
                    file,
                    message: e.to_string(),
                });
            }
            Err(_) => {
                return Err(RagError::Extraction {
                    file,
                    message: "PDF decoder panicked on malformed input".to_string(),
                });
            }
        };

        debug!(file = %file, text_len = text.len(), "Extracted PDF text");
        Ok(text)
    }
}

/// File name used as the chunk `source` label.
pub fn file_label(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_label_is_the_file_name() {
        assert_eq!(file_label(Path::new("/tmp/docs/report.pdf")), "report.pdf");
        assert_eq!(file_label(Path::new("notes.pdf")), "notes.pdf");
    }

    #[test]
    fn two_page_pdf_yields_both_pages() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/alpha_beta.pdf");

        let text = PdfExtractor.extract(&path).unwrap();
        let alpha = text.find("Alpha section").expect("first page text");
        let beta = text.find("Beta section").expect("second page text");
        assert!(alpha < beta);
        assert!(text.contains("Alpha section ends here."));
        assert!(text.contains("Beta section ends here."));
        assert!(text.len() > 1000, "extracted only {} bytes", text.len());
    }

    #[test]
    fn corrupt_pdf_is_an_extraction_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf at all").unwrap();

        let err = PdfExtractor.extract(&path).unwrap_err();
        assert!(
            matches!(&err, RagError::Extraction { file, .. } if file == "broken.pdf"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn missing_file_is_an_extraction_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = PdfExtractor
            .extract(&tmp.path().join("missing.pdf"))
            .unwrap_err();
        assert!(matches!(err, RagError::Extraction { .. }));
    }
}

use std::path::{Path, PathBuf};

/// Create `dir` (if needed) and write each `(file name, content)` pair into it.
///
/// Tests pair this with a plain-text extractor, so the "PDFs" are UTF-8 text.
/// Returns the written paths in input order.
pub fn write_docs(dir: &Path, files: &[(&str, &str)]) -> Vec<PathBuf> {
    std::fs::create_dir_all(dir).unwrap();
    files
        .iter()
        .map(|(name, content)| {
            let path = dir.join(name);
            std::fs::write(&path, content).unwrap();
            path
        })
        .collect()
}

/// Write raw bytes that no extractor can decode as text.
pub fn write_corrupt_pdf(dir: &Path, name: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, [0xff, 0xfe, 0x00, 0x80, 0x25, 0x50]).unwrap();
    path
}

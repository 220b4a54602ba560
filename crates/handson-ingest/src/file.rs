//! Input file classification and validation.

use std::path::Path;

use handson_core::{Error, Result};

/// File types the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Json,
    Unknown,
}

impl FileType {
    /// Detect file type from extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "json" => Self::Json,
            _ => Self::Unknown,
        }
    }

    pub fn of(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }
}

/// Check that `path` is an existing file of the expected type.
///
/// Wrong extension is `InvalidInput`; a missing file is `NotFound`.
pub fn require_file(path: &Path, expected: FileType, label: &str) -> Result<()> {
    if FileType::of(path) != expected {
        let kind = match expected {
            FileType::Pdf => "PDF",
            FileType::Json => "JSON",
            FileType::Unknown => "supported",
        };
        return Err(Error::InvalidInput(format!(
            "Invalid file type for {}: {}. Only {} files are supported.",
            label,
            path.display(),
            kind
        )));
    }
    if !path.is_file() {
        return Err(Error::NotFound(format!(
            "{} not found: {}",
            label,
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("json"), FileType::Json);
        assert_eq!(FileType::from_extension("docx"), FileType::Unknown);
        assert_eq!(FileType::of(Path::new("book")), FileType::Unknown);
    }

    #[test]
    fn test_require_file() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("book.pdf");
        std::fs::write(&pdf, b"%PDF-1.5").unwrap();

        assert!(require_file(&pdf, FileType::Pdf, "PDF file").is_ok());
        assert!(matches!(
            require_file(&pdf, FileType::Json, "Master JSON file"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            require_file(&dir.path().join("missing.pdf"), FileType::Pdf, "PDF file"),
            Err(Error::NotFound(_))
        ));
    }
}

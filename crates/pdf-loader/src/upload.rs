use std::path::{Path, PathBuf};

use crate::types::PDF_MEDIA_TYPE;

/// A local file offered by the picker or dropped on the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    /// Declared media type, derived from the file extension
    pub media_type: String,
    pub path: PathBuf,
}

impl FileUpload {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            name,
            media_type: media_type_for(&path).to_string(),
            path,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.media_type == PDF_MEDIA_TYPE
    }
}

fn media_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("pdf") => PDF_MEDIA_TYPE,
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("html" | "htm") => "text/html",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_is_case_insensitive() {
        let upload = FileUpload::from_path("/tmp/Report.PDF");
        assert_eq!(upload.name, "Report.PDF");
        assert_eq!(upload.media_type, PDF_MEDIA_TYPE);
        assert!(upload.is_pdf());
    }

    #[test]
    fn other_extensions_are_not_pdf() {
        assert!(!FileUpload::from_path("notes.txt").is_pdf());
        assert!(!FileUpload::from_path("archive.pdf.zip").is_pdf());
        assert!(!FileUpload::from_path("no_extension").is_pdf());
    }
}

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Media type a file must declare to be accepted as a PDF upload.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid file type: expected application/pdf, got {0}")]
    InvalidFileType(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to load PDF: {0}")]
    Load(String),
    #[error("Failed to render page {page}: {message}")]
    Render { page: u16, message: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("PDF engine error: {0}")]
    Engine(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, LoaderError>;

/// Where a PDF comes from: a remote URL or bytes already in memory
#[derive(Clone, PartialEq, Eq)]
pub enum PdfSource {
    Url(String),
    Bytes(Arc<[u8]>),
}

impl PdfSource {
    pub fn bytes(data: impl Into<Arc<[u8]>>) -> Self {
        PdfSource::Bytes(data.into())
    }

    pub fn as_url(&self) -> Option<&str> {
        match self {
            PdfSource::Url(url) => Some(url),
            PdfSource::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            PdfSource::Url(_) => None,
            PdfSource::Bytes(data) => Some(data),
        }
    }
}

// Byte buffers can be tens of megabytes; print the length only.
impl fmt::Debug for PdfSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
            PdfSource::Bytes(data) => write!(f, "Bytes({} bytes)", data.len()),
        }
    }
}

impl fmt::Display for PdfSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfSource::Url(url) => write!(f, "{url}"),
            PdfSource::Bytes(data) => write!(f, "<{} bytes in memory>", data.len()),
        }
    }
}

/// Identifies one accepted submission. Every asynchronous completion carries
/// the token of the submission that started it. The default is
/// [`RequestToken::NONE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(pub u64);

impl RequestToken {
    pub const NONE: RequestToken = RequestToken(0);

    pub fn next(self) -> RequestToken {
        RequestToken(self.0 + 1)
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//! Source selection: turns URL text or an uploaded file into the single
//! active [`PdfSource`].
//!
//! Each accepted submission mints a new [`RequestToken`]. A file read is
//! asynchronous, so its completion is matched against the current token and
//! dropped if a newer submission happened in the meantime.

use crate::types::{LoaderError, PdfSource, RequestToken, Result};
use crate::upload::FileUpload;

/// A new active source, ready to hand to the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChange {
    pub token: RequestToken,
    pub source: PdfSource,
}

/// The one human-readable label shown for the active source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLabel<'a> {
    Url(&'a str),
    File(&'a str),
}

#[derive(Debug, Clone)]
struct PendingRead {
    token: RequestToken,
    file_name: String,
}

#[derive(Debug, Default)]
pub struct SourceSelector {
    url_text: String,
    uploaded_file_name: String,
    source: Option<PdfSource>,
    page_count: usize,
    current: Option<RequestToken>,
    last_issued: RequestToken,
    pending_read: Option<PendingRead>,
}

impl SourceSelector {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint_token(&mut self) -> RequestToken {
        self.last_issued = self.last_issued.next();
        self.current = Some(self.last_issued);
        self.last_issued
    }

    /// Submit the URL form. Blank input is ignored.
    pub fn submit_url(&mut self, text: &str) -> Option<SourceChange> {
        let url = text.trim();
        if url.is_empty() {
            return None;
        }

        let token = self.mint_token();
        let source = PdfSource::Url(url.to_string());
        self.source = Some(source.clone());
        self.uploaded_file_name.clear();
        self.page_count = 0;
        self.pending_read = None;

        log::info!("Submitted URL {} ({})", url, token);
        Some(SourceChange { token, source })
    }

    /// Accept a file for reading. The caller reads the bytes and reports back
    /// through [`Self::complete_file_read`] or [`Self::fail_file_read`].
    pub fn submit_file(&mut self, upload: &FileUpload) -> Result<RequestToken> {
        if !upload.is_pdf() {
            log::warn!(
                "Rejected {}: declared type is {}",
                upload.name,
                upload.media_type
            );
            return Err(LoaderError::InvalidFileType(upload.media_type.clone()));
        }

        let token = self.mint_token();
        self.pending_read = Some(PendingRead {
            token,
            file_name: upload.name.clone(),
        });

        log::info!("Reading {} ({})", upload.name, token);
        Ok(token)
    }

    pub fn complete_file_read(
        &mut self,
        token: RequestToken,
        bytes: impl Into<std::sync::Arc<[u8]>>,
    ) -> Option<SourceChange> {
        let Some(pending) = self.take_pending(token) else {
            log::debug!("Dropping stale file read {}", token);
            return None;
        };

        let source = PdfSource::bytes(bytes);
        self.source = Some(source.clone());
        self.uploaded_file_name = pending.file_name;
        self.url_text.clear();
        self.page_count = 0;

        Some(SourceChange { token, source })
    }

    /// Returns `true` if the failed read belonged to the current submission
    pub fn fail_file_read(&mut self, token: RequestToken) -> bool {
        self.take_pending(token).is_some()
    }

    fn take_pending(&mut self, token: RequestToken) -> Option<PendingRead> {
        match &self.pending_read {
            Some(pending) if pending.token == token && self.current == Some(token) => {
                self.pending_read.take()
            }
            _ => None,
        }
    }

    /// Drop the active source. Any read still in flight is invalidated.
    pub fn clear(&mut self) {
        self.mint_token();
        self.current = None;
        self.source = None;
        self.url_text.clear();
        self.uploaded_file_name.clear();
        self.page_count = 0;
        self.pending_read = None;
    }

    pub fn set_page_count(&mut self, page_count: usize) {
        self.page_count = page_count;
    }

    pub fn source(&self) -> Option<&PdfSource> {
        self.source.as_ref()
    }

    pub fn current_token(&self) -> Option<RequestToken> {
        self.current
    }

    pub fn url_text(&self) -> &str {
        &self.url_text
    }

    pub fn url_text_mut(&mut self) -> &mut String {
        &mut self.url_text
    }

    pub fn uploaded_file_name(&self) -> &str {
        &self.uploaded_file_name
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn is_reading(&self) -> bool {
        self.pending_read.is_some()
    }

    pub fn active_label(&self) -> Option<SourceLabel<'_>> {
        if !self.uploaded_file_name.is_empty() {
            return Some(SourceLabel::File(&self.uploaded_file_name));
        }
        match &self.source {
            Some(PdfSource::Url(url)) => Some(SourceLabel::Url(url)),
            _ => None,
        }
    }
}

//! Viewer state machine.
//!
//! `Idle → Loading → Loaded | Failed`. Setting a new source from any state
//! goes back to `Loading` with the page count reset. Completions reported by
//! the engine are only applied when their token matches the active source.
//!
//! Every page is mounted as soon as the page count is known; there is no
//! viewport-based culling.

use crate::options::ViewerOptions;
use crate::selector::SourceChange;
use crate::types::{PdfSource, RequestToken};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded { page_count: usize },
    Failed { error: String },
}

/// How a single page is rasterised
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRenderOptions {
    pub scale: f32,
    pub render_annotations: bool,
    pub render_form_data: bool,
}

impl PageRenderOptions {
    pub fn at_scale(scale: f32) -> Self {
        Self {
            scale,
            render_annotations: false,
            render_form_data: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageStatus {
    Pending,
    Rendered { width: usize, height: usize },
    Failed { error: String },
}

/// One page container; the pixels themselves come from the engine
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlaceholder {
    /// 1-based
    pub page_number: u16,
    pub scale: f32,
    pub status: PageStatus,
}

/// Ask the engine to parse a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub token: RequestToken,
    pub source: PdfSource,
}

/// Ask the engine to rasterise pages, in the given order
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub token: RequestToken,
    pub page_numbers: Vec<u16>,
    pub options: PageRenderOptions,
}

/// Outcome of a document load, reported once per source
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    LoadSucceeded {
        page_count: usize,
        render: RenderRequest,
    },
    LoadFailed {
        error: String,
    },
}

#[derive(Debug)]
pub struct PdfViewer {
    options: ViewerOptions,
    state: LoadState,
    source: Option<PdfSource>,
    token: Option<RequestToken>,
    page_count: usize,
    pages: Vec<PagePlaceholder>,
}

impl PdfViewer {
    pub fn new(options: ViewerOptions) -> Self {
        Self {
            options,
            state: LoadState::Idle,
            source: None,
            token: None,
            page_count: 0,
            pages: Vec::new(),
        }
    }

    pub fn set_source(&mut self, change: SourceChange) -> LoadRequest {
        log::debug!("Viewer loading {} ({})", change.source, change.token);

        self.state = LoadState::Loading;
        self.source = Some(change.source.clone());
        self.token = Some(change.token);
        self.page_count = 0;
        self.pages.clear();

        LoadRequest {
            token: change.token,
            source: change.source,
        }
    }

    pub fn clear(&mut self) {
        self.state = LoadState::Idle;
        self.source = None;
        self.token = None;
        self.page_count = 0;
        self.pages.clear();
    }

    fn accepts(&self, token: RequestToken) -> bool {
        self.token == Some(token) && self.state == LoadState::Loading
    }

    pub fn handle_load_success(
        &mut self,
        token: RequestToken,
        page_count: usize,
    ) -> Option<ViewerEvent> {
        if !self.accepts(token) {
            log::debug!("Ignoring load result for {}", token);
            return None;
        }

        let last_page = u16::try_from(page_count).unwrap_or_else(|_| {
            log::warn!(
                "Document reports {} pages; only the first {} can be shown",
                page_count,
                u16::MAX
            );
            u16::MAX
        });
        let page_count = usize::from(last_page);
        let scale = self.options.scale;

        self.page_count = page_count;
        self.state = LoadState::Loaded { page_count };
        self.pages = (1..=last_page)
            .map(|page_number| PagePlaceholder {
                page_number,
                scale,
                status: PageStatus::Pending,
            })
            .collect();

        Some(ViewerEvent::LoadSucceeded {
            page_count,
            render: RenderRequest {
                token,
                page_numbers: self.pages.iter().map(|p| p.page_number).collect(),
                options: PageRenderOptions::at_scale(scale),
            },
        })
    }

    pub fn handle_load_error(
        &mut self,
        token: RequestToken,
        error: impl Into<String>,
    ) -> Option<ViewerEvent> {
        if !self.accepts(token) {
            log::debug!("Ignoring load error for {}", token);
            return None;
        }

        let error = error.into();
        self.state = LoadState::Failed {
            error: error.clone(),
        };
        self.page_count = 0;
        self.pages.clear();

        Some(ViewerEvent::LoadFailed { error })
    }

    /// Returns `true` if the bitmap belongs to a page currently on display
    pub fn handle_page_rendered(
        &mut self,
        token: RequestToken,
        page_number: u16,
        width: usize,
        height: usize,
    ) -> bool {
        self.resolve_page(token, page_number, PageStatus::Rendered { width, height })
    }

    pub fn handle_page_failed(
        &mut self,
        token: RequestToken,
        page_number: u16,
        error: impl Into<String>,
    ) -> bool {
        self.resolve_page(
            token,
            page_number,
            PageStatus::Failed {
                error: error.into(),
            },
        )
    }

    fn resolve_page(&mut self, token: RequestToken, page_number: u16, status: PageStatus) -> bool {
        if self.token != Some(token) {
            return false;
        }
        match self
            .pages
            .iter_mut()
            .find(|page| page.page_number == page_number)
        {
            Some(page) => {
                page.status = status;
                true
            }
            None => false,
        }
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn source(&self) -> Option<&PdfSource> {
        self.source.as_ref()
    }

    pub fn token(&self) -> Option<RequestToken> {
        self.token
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn pages(&self) -> &[PagePlaceholder] {
        &self.pages
    }

    pub fn pending_pages(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.status == PageStatus::Pending)
            .count()
    }

    pub fn rendered_pages(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p.status, PageStatus::Rendered { .. }))
            .count()
    }
}

impl Default for PdfViewer {
    fn default() -> Self {
        Self::new(ViewerOptions::default())
    }
}

use pdf_loader::{LoaderError, Result};
use pdf_loader_runtime::{ActiveRequest, PdfSource, RequestToken, ViewerUpdate};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::handlers::source::resolve_source;

#[cfg(feature = "pdf-viewer")]
use crate::engine::PdfEngine;
#[cfg(feature = "pdf-viewer")]
use pdf_loader_runtime::PageRenderOptions;

#[cfg(feature = "pdf-viewer")]
use pdfium_render::prelude::*;

/// Bytes of the document on screen. Only one is kept; loading a new source
/// drops the previous one.
#[derive(Default)]
pub struct DocumentStore {
    current: Option<(RequestToken, Arc<[u8]>)>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, token: RequestToken, bytes: Arc<[u8]>) {
        self.current = Some((token, bytes));
    }

    pub fn bytes_for(&self, token: RequestToken) -> Option<Arc<[u8]>> {
        match &self.current {
            Some((current, bytes)) if *current == token => Some(Arc::clone(bytes)),
            _ => None,
        }
    }

    pub fn close(&mut self, token: RequestToken) -> bool {
        if self.bytes_for(token).is_some() {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(feature = "pdf-viewer")]
fn pdfium_error(context: &str) -> impl Fn(PdfiumError) -> LoaderError + '_ {
    move |e| LoaderError::Load(format!("{context}: {e}"))
}

#[cfg(feature = "pdf-viewer")]
fn count_pages(engine: &PdfEngine, bytes: &[u8]) -> Result<usize> {
    let pdfium = engine.bind()?;
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(pdfium_error("Invalid PDF"))?;
    Ok(document.pages().len() as usize)
}

/// What a background load produced, handed back to the worker loop so the
/// [`DocumentStore`] is only touched there
#[derive(Debug)]
pub struct LoadOutcome {
    pub token: RequestToken,
    pub result: Result<(Arc<[u8]>, usize)>,
}

/// Fetch the source and count its pages. Runs on its own task; a stalled
/// fetch only holds up this load.
pub async fn load_document(
    token: RequestToken,
    source: PdfSource,
    #[cfg(feature = "pdf-viewer")] engine: Option<&'static PdfEngine>,
) -> LoadOutcome {
    let result = match resolve_source(source).await {
        Ok(bytes) => {
            count_document_pages(
                bytes,
                #[cfg(feature = "pdf-viewer")]
                engine,
            )
            .await
        }
        Err(e) => Err(e),
    };
    LoadOutcome { token, result }
}

#[cfg(feature = "pdf-viewer")]
async fn count_document_pages(
    bytes: Arc<[u8]>,
    engine: Option<&'static PdfEngine>,
) -> Result<(Arc<[u8]>, usize)> {
    let engine =
        engine.ok_or_else(|| LoaderError::Engine("PDF engine not initialized".to_string()))?;
    let for_count = Arc::clone(&bytes);
    let page_count = tokio::task::spawn_blocking(move || count_pages(engine, &for_count)).await??;
    Ok((bytes, page_count))
}

#[cfg(not(feature = "pdf-viewer"))]
async fn count_document_pages(_bytes: Arc<[u8]>) -> Result<(Arc<[u8]>, usize)> {
    Err(LoaderError::Engine(
        "PDF rendering not available (pdf-viewer feature disabled)".to_string(),
    ))
}

/// Publish a finished load, unless a newer source took over meanwhile
pub fn finish_load(
    outcome: LoadOutcome,
    store: &mut DocumentStore,
    active: &ActiveRequest,
    update_tx: &mpsc::UnboundedSender<ViewerUpdate>,
) {
    let LoadOutcome { token, result } = outcome;
    if !active.is_current(token) {
        log::debug!("Discarding load result for superseded source {}", token);
        return;
    }

    match result {
        Ok((bytes, page_count)) => {
            store.replace(token, bytes);
            let _ = update_tx.send(ViewerUpdate::DocumentLoaded { token, page_count });
        }
        Err(e) => {
            let _ = update_tx.send(ViewerUpdate::DocumentFailed {
                token,
                message: e.to_string(),
            });
        }
    }
}

#[cfg(feature = "pdf-viewer")]
fn render_page(
    document: &PdfDocument,
    page_number: u16,
    options: &PageRenderOptions,
) -> Result<(Vec<u8>, usize, usize)> {
    let render_error = |message: String| LoaderError::Render {
        page: page_number,
        message,
    };

    let index = page_number
        .checked_sub(1)
        .ok_or_else(|| render_error("page numbers start at 1".to_string()))?;
    let page = document
        .pages()
        .get(index)
        .map_err(|e| render_error(e.to_string()))?;

    let config = PdfRenderConfig::new()
        .scale_page_by_factor(options.scale)
        .render_annotations(options.render_annotations)
        .render_form_data(options.render_form_data);

    let bitmap = page
        .render_with_config(&config)
        .map_err(|e| render_error(e.to_string()))?;
    let image: image::RgbaImage = bitmap.as_image().into_rgba8();
    let (width, height) = (image.width() as usize, image.height() as usize);

    Ok((image.into_raw(), width, height))
}

/// Rasterise pages in order, sending each one as soon as it is ready.
/// Stops early once `active` moves on to another source.
#[cfg(feature = "pdf-viewer")]
fn render_pages_blocking(
    token: RequestToken,
    bytes: &[u8],
    page_numbers: &[u16],
    options: &PageRenderOptions,
    engine: &PdfEngine,
    active: &ActiveRequest,
    update_tx: &mpsc::UnboundedSender<ViewerUpdate>,
) -> Result<()> {
    let pdfium = engine.bind()?;
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(pdfium_error("Invalid PDF"))?;
    let total = page_numbers.len();

    for (done, &page_number) in page_numbers.iter().enumerate() {
        if !active.is_current(token) {
            log::debug!(
                "Stopping render of {} after {} of {} pages",
                token,
                done,
                total
            );
            break;
        }

        match render_page(&document, page_number, options) {
            Ok((rgba_data, width, height)) => {
                let _ = update_tx.send(ViewerUpdate::PageRendered {
                    token,
                    page_number,
                    width,
                    height,
                    rgba_data,
                });
            }
            Err(e) => {
                log::warn!("{}", e);
                let _ = update_tx.send(ViewerUpdate::PageFailed {
                    token,
                    page_number,
                    message: e.to_string(),
                });
            }
        }

        let _ = update_tx.send(ViewerUpdate::Progress {
            token,
            operation: "Rendering pages".to_string(),
            current: done + 1,
            total,
        });
    }

    Ok(())
}

#[cfg(feature = "pdf-viewer")]
pub async fn handle_render_pages(
    token: RequestToken,
    page_numbers: Vec<u16>,
    options: PageRenderOptions,
    engine: &'static PdfEngine,
    store: &DocumentStore,
    active: &ActiveRequest,
    update_tx: &mpsc::UnboundedSender<ViewerUpdate>,
) {
    let Some(bytes) = store.bytes_for(token) else {
        log::debug!("No document for {}, skipping render", token);
        return;
    };

    let job_active = active.clone();
    let job_tx = update_tx.clone();
    let job_pages = page_numbers.clone();
    let result = tokio::task::spawn_blocking(move || {
        render_pages_blocking(
            token,
            &bytes,
            &job_pages,
            &options,
            engine,
            &job_active,
            &job_tx,
        )
    })
    .await
    .map_err(LoaderError::from)
    .and_then(|r| r);

    // The document could not be reopened: every requested page failed
    if let Err(e) = result {
        log::warn!("Rendering {} failed: {}", token, e);
        for page_number in page_numbers {
            let _ = update_tx.send(ViewerUpdate::PageFailed {
                token,
                page_number,
                message: e.to_string(),
            });
        }
    }
}

pub async fn handle_close(
    token: RequestToken,
    store: &mut DocumentStore,
    update_tx: &mpsc::UnboundedSender<ViewerUpdate>,
) {
    if store.close(token) {
        let _ = update_tx.send(ViewerUpdate::DocumentClosed { token });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_keeps_only_the_current_document() {
        let mut store = DocumentStore::new();
        store.replace(RequestToken(1), Arc::from(&b"one"[..]));
        store.replace(RequestToken(2), Arc::from(&b"two"[..]));

        assert!(store.bytes_for(RequestToken(1)).is_none());
        assert_eq!(store.bytes_for(RequestToken(2)).as_deref(), Some(&b"two"[..]));
    }

    #[test]
    fn close_ignores_other_tokens() {
        let mut store = DocumentStore::new();
        store.replace(RequestToken(4), Arc::from(&b"pdf"[..]));

        assert!(!store.close(RequestToken(3)));
        assert!(store.bytes_for(RequestToken(4)).is_some());
        assert!(store.close(RequestToken(4)));
        assert!(store.bytes_for(RequestToken(4)).is_none());
    }

    #[test]
    fn finish_load_drops_outcomes_of_superseded_sources() {
        let mut store = DocumentStore::new();
        let active = ActiveRequest::new();
        let (update_tx, mut update_rx) = mpsc::unbounded_channel();
        active.set(RequestToken(2));

        let stale = LoadOutcome {
            token: RequestToken(1),
            result: Ok((Arc::from(&b"old"[..]), 3)),
        };
        finish_load(stale, &mut store, &active, &update_tx);
        assert!(update_rx.try_recv().is_err());
        assert!(store.bytes_for(RequestToken(1)).is_none());

        let current = LoadOutcome {
            token: RequestToken(2),
            result: Ok((Arc::from(&b"new"[..]), 7)),
        };
        finish_load(current, &mut store, &active, &update_tx);
        assert!(matches!(
            update_rx.try_recv(),
            Ok(ViewerUpdate::DocumentLoaded {
                token: RequestToken(2),
                page_count: 7
            })
        ));
        assert_eq!(store.bytes_for(RequestToken(2)).as_deref(), Some(&b"new"[..]));
    }
}

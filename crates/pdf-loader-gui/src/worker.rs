use pdf_loader_runtime::{ActiveRequest, ViewerCommand, ViewerUpdate, WorkerEndpoint};
use tokio::sync::mpsc;

use crate::handlers;
use crate::handlers::document::{DocumentStore, LoadOutcome};

#[cfg(feature = "pdf-viewer")]
use crate::engine::PdfEngine;

/// Channels and state owned by the worker loop
struct WorkerState {
    store: DocumentStore,
    #[cfg(feature = "pdf-viewer")]
    engine: Option<&'static PdfEngine>,
    active: ActiveRequest,
    update_tx: mpsc::UnboundedSender<ViewerUpdate>,
    load_tx: mpsc::UnboundedSender<LoadOutcome>,
}

/// Async worker task that processes viewer commands and sends updates
pub async fn worker_task(
    endpoint: WorkerEndpoint,
    #[cfg(feature = "pdf-viewer")] engine: Option<&'static PdfEngine>,
) {
    let WorkerEndpoint {
        mut command_rx,
        update_tx,
        active,
    } = endpoint;

    // Loads run on their own tasks and report back here
    let (load_tx, mut load_rx) = mpsc::unbounded_channel();
    let mut state = WorkerState {
        store: DocumentStore::new(),
        #[cfg(feature = "pdf-viewer")]
        engine,
        active,
        update_tx,
        load_tx,
    };

    loop {
        tokio::select! {
            Some(outcome) = load_rx.recv() => {
                handlers::document::finish_load(
                    outcome,
                    &mut state.store,
                    &state.active,
                    &state.update_tx,
                );
            }
            cmd = command_rx.recv() => match cmd {
                Some(cmd) => process_command(cmd, &mut state, &mut command_rx).await,
                None => break,
            },
        }
    }

    log::debug!("Viewer worker stopped");
}

async fn process_command(
    cmd: ViewerCommand,
    state: &mut WorkerState,
    command_rx: &mut mpsc::UnboundedReceiver<ViewerCommand>,
) {
    match cmd {
        ViewerCommand::ReadFile { token, path } => {
            // Reads don't touch pdfium, so they needn't wait behind a render
            let update_tx = state.update_tx.clone();
            tokio::spawn(async move {
                handlers::source::handle_read_file(token, path, &update_tx).await;
            });
        }
        ViewerCommand::LoadDocument {
            mut token,
            mut source,
        } => {
            // Only the most recent queued load matters
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let ViewerCommand::LoadDocument {
                    token: new_token,
                    source: new_source,
                } = next_cmd
                {
                    log::debug!("Discarding queued load {}, using {}", token, new_token);
                    token = new_token;
                    source = new_source;
                } else {
                    // Can't put it back; handle it before the load
                    Box::pin(process_command(next_cmd, state, command_rx)).await;
                }
            }

            // Nothing from the previous source is reused
            state.store.clear();

            // A fetch can stall indefinitely, so it must not hold up the loop
            let load_tx = state.load_tx.clone();
            #[cfg(feature = "pdf-viewer")]
            let engine = state.engine;
            tokio::spawn(async move {
                let outcome = handlers::document::load_document(
                    token,
                    source,
                    #[cfg(feature = "pdf-viewer")]
                    engine,
                )
                .await;
                let _ = load_tx.send(outcome);
            });
        }
        #[cfg(feature = "pdf-viewer")]
        ViewerCommand::RenderPages {
            token,
            page_numbers,
            options,
        } => {
            if !state.active.is_current(token) {
                log::debug!("Skipping render for superseded source {}", token);
            } else if let Some(engine) = state.engine {
                handlers::document::handle_render_pages(
                    token,
                    page_numbers,
                    options,
                    engine,
                    &state.store,
                    &state.active,
                    &state.update_tx,
                )
                .await;
            } else {
                let _ = state.update_tx.send(ViewerUpdate::Error {
                    message: "PDF engine not initialized".to_string(),
                });
            }
        }
        #[cfg(not(feature = "pdf-viewer"))]
        ViewerCommand::RenderPages { .. } => {}
        ViewerCommand::CloseDocument { token } => {
            handlers::document::handle_close(token, &mut state.store, &state.update_tx).await;
        }
    }
}

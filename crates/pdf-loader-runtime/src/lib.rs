use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::mpsc;

// Re-export types from the core crate
pub use pdf_loader::{PageRenderOptions, PdfSource, RequestToken};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum ViewerCommand {
    ReadFile {
        token: RequestToken,
        path: PathBuf,
    },
    LoadDocument {
        token: RequestToken,
        source: PdfSource,
    },
    RenderPages {
        token: RequestToken,
        page_numbers: Vec<u16>,
        options: PageRenderOptions,
    },
    CloseDocument {
        token: RequestToken,
    },
}

impl ViewerCommand {
    pub fn token(&self) -> RequestToken {
        match self {
            ViewerCommand::ReadFile { token, .. }
            | ViewerCommand::LoadDocument { token, .. }
            | ViewerCommand::RenderPages { token, .. }
            | ViewerCommand::CloseDocument { token } => *token,
        }
    }
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum ViewerUpdate {
    Progress {
        token: RequestToken,
        operation: String,
        current: usize,
        total: usize,
    },
    FileRead {
        token: RequestToken,
        bytes: Vec<u8>,
    },
    FileReadFailed {
        token: RequestToken,
        message: String,
    },
    DocumentLoaded {
        token: RequestToken,
        page_count: usize,
    },
    DocumentFailed {
        token: RequestToken,
        message: String,
    },
    PageRendered {
        token: RequestToken,
        page_number: u16,
        width: usize,
        height: usize,
        rgba_data: Vec<u8>,
    },
    PageFailed {
        token: RequestToken,
        page_number: u16,
        message: String,
    },
    DocumentClosed {
        token: RequestToken,
    },
    Error {
        message: String,
    },
}

/// The token of the source currently on screen, shared between the UI and
/// blocking worker jobs so long-running renders can stop early.
#[derive(Debug, Clone, Default)]
pub struct ActiveRequest(Arc<AtomicU64>);

impl ActiveRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: RequestToken) {
        self.0.store(token.0, Ordering::SeqCst);
    }

    pub fn get(&self) -> RequestToken {
        RequestToken(self.0.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.get() == token
    }
}

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Worker has shut down")]
    WorkerGone,
}

/// UI side of the worker channels
pub struct WorkerHandle {
    command_tx: mpsc::UnboundedSender<ViewerCommand>,
    update_rx: mpsc::UnboundedReceiver<ViewerUpdate>,
    active: ActiveRequest,
}

/// Worker side of the channels
pub struct WorkerEndpoint {
    pub command_rx: mpsc::UnboundedReceiver<ViewerCommand>,
    pub update_tx: mpsc::UnboundedSender<ViewerUpdate>,
    pub active: ActiveRequest,
}

pub fn channel() -> (WorkerHandle, WorkerEndpoint) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let active = ActiveRequest::new();

    (
        WorkerHandle {
            command_tx,
            update_rx,
            active: active.clone(),
        },
        WorkerEndpoint {
            command_rx,
            update_tx,
            active,
        },
    )
}

impl WorkerHandle {
    pub fn send(&self, command: ViewerCommand) -> Result<(), ChannelError> {
        self.command_tx
            .send(command)
            .map_err(|_| ChannelError::WorkerGone)
    }

    /// Mark `token` as the source on screen; jobs for older tokens wind down
    pub fn activate(&self, token: RequestToken) {
        self.active.set(token);
    }

    pub fn try_recv(&mut self) -> Option<ViewerUpdate> {
        self.update_rx.try_recv().ok()
    }

    pub async fn recv(&mut self) -> Option<ViewerUpdate> {
        self.update_rx.recv().await
    }

    pub fn active(&self) -> &ActiveRequest {
        &self.active
    }
}

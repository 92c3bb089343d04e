use pdf_loader::{LoaderError, PdfSource, Result};
use pdf_loader_runtime::{RequestToken, ViewerUpdate};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn handle_read_file(
    token: RequestToken,
    path: PathBuf,
    update_tx: &mpsc::UnboundedSender<ViewerUpdate>,
) {
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            log::debug!("Read {} bytes from {}", bytes.len(), path.display());
            let _ = update_tx.send(ViewerUpdate::FileRead { token, bytes });
        }
        Err(e) => {
            let _ = update_tx.send(ViewerUpdate::FileReadFailed {
                token,
                message: format!("Failed to read {}: {e}", path.display()),
            });
        }
    }
}

/// Download a URL into memory. No timeout or retry.
pub fn fetch_url(url: &str) -> Result<Vec<u8>> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| LoaderError::Network(e.to_string()))?;

    let mut bytes = Vec::new();
    response.into_reader().read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Get the raw bytes of a source, fetching URLs on a blocking thread
pub async fn resolve_source(source: PdfSource) -> Result<Arc<[u8]>> {
    match source {
        PdfSource::Bytes(bytes) => Ok(bytes),
        PdfSource::Url(url) => {
            let bytes = tokio::task::spawn_blocking(move || fetch_url(&url)).await??;
            Ok(bytes.into())
        }
    }
}

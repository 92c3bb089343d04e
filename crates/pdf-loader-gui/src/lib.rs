pub mod app;
pub mod config;
#[cfg(feature = "pdf-viewer")]
pub mod engine;
pub mod handlers;
pub mod logger;
pub mod views;
pub mod worker;

pub use app::PdfLoaderApp;

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use pdf_loader_gui::PdfLoaderApp;
use pdf_loader_gui::config::{AppConfig, InitialSource, Overrides};
use pdf_loader_gui::logger::AppLogger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdf-loader", about = "View a PDF from a URL or a local file", version)]
struct Cli {
    /// URL (http:// or https://) or path of a PDF to open on startup
    source: Option<String>,

    /// Display width of the page column in pixels
    #[arg(long)]
    width: Option<f32>,

    /// Page zoom factor
    #[arg(long)]
    scale: Option<f32>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing the pdfium shared library
    #[arg(long)]
    pdfium_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;

    let config = runtime
        .block_on(AppConfig::resolve(
            cli.config.as_deref(),
            Overrides {
                width: cli.width,
                scale: cli.scale,
                pdfium_dir: cli.pdfium_dir,
                log_level: cli.log_level,
            },
        ))
        .context("Invalid configuration")?;

    let logger = AppLogger::new(config.max_log_entries).with_level(config.level_filter()?);
    logger.clone().init().context("Failed to install logger")?;

    #[cfg(feature = "pdf-viewer")]
    let engine = match pdf_loader_gui::engine::PdfEngine::initialize(config.pdfium_dir.as_deref())
    {
        Ok(engine) => Some(engine),
        Err(e) => {
            log::error!("Failed to initialize PDF engine: {}", e);
            None
        }
    };

    let (worker, endpoint) = pdf_loader_runtime::channel();
    runtime.spawn(pdf_loader_gui::worker::worker_task(
        endpoint,
        #[cfg(feature = "pdf-viewer")]
        engine,
    ));

    let initial = cli.source.as_deref().map(InitialSource::from_arg);
    let viewer_options = config.viewer.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 900.0])
            .with_title("PDF Loader")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let result = eframe::run_native(
        "PDF Loader",
        options,
        Box::new(move |cc| {
            Ok(Box::new(PdfLoaderApp::new(
                cc,
                worker,
                logger,
                viewer_options,
                initial,
            )))
        }),
    );

    // A URL fetch has no timeout and may still be blocked; don't wait for it
    runtime.shutdown_background();

    result.map_err(|e| anyhow::anyhow!("Failed to run viewer: {e}"))
}

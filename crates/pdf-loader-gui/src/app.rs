use eframe::egui;
use pdf_loader::{
    FileUpload, LoadState, PdfViewer, SourceChange, SourceSelector, ViewerEvent, ViewerOptions,
};
use pdf_loader_runtime::{RequestToken, ViewerCommand, ViewerUpdate, WorkerHandle};

use crate::config::InitialSource;
use crate::logger::AppLogger;
use crate::views::{PageTextures, SelectorAction, show_alert, show_selector, show_viewer};

const INVALID_FILE_ALERT: &str = "Please upload a valid PDF file.";
const LOAD_FAILED_ALERT: &str = "Failed to load PDF. Please check the file or URL and try again.";
const SAMPLE_URL: &str = "https://arxiv.org/pdf/1706.03762.pdf";

#[derive(Clone)]
struct ProgressState {
    operation: String,
    current: usize,
    total: usize,
}

pub struct PdfLoaderApp {
    selector: SourceSelector,
    viewer: PdfViewer,
    textures: PageTextures,
    status: String,
    alert: Option<String>,

    // Async infrastructure
    worker: WorkerHandle,

    // Progress tracking
    progress: Option<ProgressState>,

    logger: AppLogger,
    show_log: bool,
}

impl PdfLoaderApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        worker: WorkerHandle,
        logger: AppLogger,
        options: ViewerOptions,
        initial: Option<InitialSource>,
    ) -> Self {
        let mut app = Self {
            selector: SourceSelector::new(),
            viewer: PdfViewer::new(options),
            textures: PageTextures::default(),
            status: String::new(),
            alert: None,
            worker,
            progress: None,
            logger,
            show_log: false,
        };

        match initial {
            Some(InitialSource::Url(url)) => {
                *app.selector.url_text_mut() = url;
                app.submit_url();
            }
            Some(InitialSource::File(upload)) => app.submit_file(upload),
            None => {}
        }

        app
    }

    fn dispatch(&mut self, command: ViewerCommand) {
        if let Err(e) = self.worker.send(command) {
            log::error!("Failed to reach worker: {}", e);
            self.status = format!("Error: {e}");
        }
    }

    fn submit_url(&mut self) {
        let text = self.selector.url_text().to_string();
        if let Some(change) = self.selector.submit_url(&text) {
            self.show_source(change);
        }
    }

    fn submit_file(&mut self, upload: FileUpload) {
        match self.selector.submit_file(&upload) {
            Ok(token) => {
                self.status = format!("Reading {}...", upload.name);
                self.dispatch(ViewerCommand::ReadFile {
                    token,
                    path: upload.path,
                });
            }
            Err(e) => {
                self.status = format!("Error: {e}");
                self.alert = Some(INVALID_FILE_ALERT.to_string());
            }
        }
    }

    fn show_source(&mut self, change: SourceChange) {
        self.worker.activate(change.token);
        self.textures.clear();
        self.progress = None;
        self.status = "Loading PDF...".to_string();

        let request = self.viewer.set_source(change);
        self.dispatch(ViewerCommand::LoadDocument {
            token: request.token,
            source: request.source,
        });
    }

    fn close(&mut self) {
        let token = self.viewer.token();
        self.selector.clear();
        self.viewer.clear();
        self.textures.clear();
        self.progress = None;
        self.worker.activate(RequestToken::NONE);

        if let Some(token) = token {
            self.dispatch(ViewerCommand::CloseDocument { token });
        }
        self.status = "Closed PDF".to_string();
    }

    fn on_load_success(&mut self, page_count: usize) {
        self.selector.set_page_count(page_count);
        self.status = format!("Loaded PDF with {} pages", page_count);
        log::info!("PDF loaded successfully with {} pages", page_count);
    }

    fn on_load_error(&mut self, error: &str) {
        log::error!("Failed to load PDF: {}", error);
        self.status = format!("Error: {error}");
        self.alert = Some(LOAD_FAILED_ALERT.to_string());
    }

    fn handle_update(&mut self, ctx: &egui::Context, update: ViewerUpdate) {
        match update {
            ViewerUpdate::Progress {
                token,
                operation,
                current,
                total,
            } => {
                if self.viewer.token() == Some(token) {
                    self.progress = (current < total).then_some(ProgressState {
                        operation,
                        current,
                        total,
                    });
                }
            }
            ViewerUpdate::FileRead { token, bytes } => {
                if let Some(change) = self.selector.complete_file_read(token, bytes) {
                    self.show_source(change);
                }
            }
            ViewerUpdate::FileReadFailed { token, message } => {
                if self.selector.fail_file_read(token) {
                    log::error!("{}", message);
                    self.status = format!("Error: {message}");
                    self.alert = Some(message);
                }
            }
            ViewerUpdate::DocumentLoaded { token, page_count } => {
                match self.viewer.handle_load_success(token, page_count) {
                    Some(ViewerEvent::LoadSucceeded { page_count, render }) => {
                        self.on_load_success(page_count);
                        self.dispatch(ViewerCommand::RenderPages {
                            token: render.token,
                            page_numbers: render.page_numbers,
                            options: render.options,
                        });
                    }
                    Some(ViewerEvent::LoadFailed { error }) => self.on_load_error(&error),
                    None => {}
                }
            }
            ViewerUpdate::DocumentFailed { token, message } => {
                if let Some(ViewerEvent::LoadFailed { error }) =
                    self.viewer.handle_load_error(token, message)
                {
                    self.on_load_error(&error);
                }
            }
            ViewerUpdate::PageRendered {
                token,
                page_number,
                width,
                height,
                rgba_data,
            } => {
                if self
                    .viewer
                    .handle_page_rendered(token, page_number, width, height)
                {
                    self.textures
                        .insert(ctx, page_number, width, height, &rgba_data);
                }
            }
            ViewerUpdate::PageFailed {
                token,
                page_number,
                message,
            } => {
                self.viewer.handle_page_failed(token, page_number, message);
            }
            ViewerUpdate::DocumentClosed { token } => {
                log::debug!("Worker released document {}", token);
            }
            ViewerUpdate::Error { message } => {
                log::error!("{}", message);
                self.status = format!("Error: {message}");
                self.progress = None;
            }
        }
    }

    fn awaiting_worker(&self) -> bool {
        self.selector.is_reading()
            || matches!(self.viewer.state(), LoadState::Loading)
            || self.viewer.pending_pages() > 0
    }

    fn show_placeholder(ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(50.0);
            ui.label("Upload a PDF file or enter a PDF URL to get started");
            ui.add_space(10.0);
            ui.weak("Sample URL:");
            ui.weak(SAMPLE_URL);
        });
    }

    fn show_log_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.toggle_value(&mut self.show_log, "Log");
            if self.show_log && ui.button("Clear").clicked() {
                self.logger.clear();
            }
            if !self.status.is_empty() {
                ui.separator();
                ui.label(&self.status);
            }
        });

        if self.show_log {
            egui::ScrollArea::vertical()
                .id_salt("log_panel")
                .max_height(160.0)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for entry in self.logger.get_entries() {
                        let text = egui::RichText::new(entry.format_line()).monospace();
                        let text = match entry.level {
                            log::Level::Error => text.color(ui.visuals().error_fg_color),
                            log::Level::Warn => text.color(ui.visuals().warn_fg_color),
                            _ => text,
                        };
                        ui.label(text);
                    }
                });
        }
    }
}

impl eframe::App for PdfLoaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle drag-and-drop of files; non-PDFs are rejected like uploads
        let dropped: Vec<FileUpload> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .map(FileUpload::from_path)
                .collect()
        });
        if let Some(upload) = dropped.into_iter().next() {
            self.submit_file(upload);
        }

        // Process all pending updates from worker
        let mut received = false;
        while let Some(update) = self.worker.try_recv() {
            self.handle_update(ctx, update);
            received = true;
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading("PDF Loader");
            match show_selector(ui, &mut self.selector) {
                SelectorAction::SubmitUrl => self.submit_url(),
                SelectorAction::OpenFile(upload) => self.submit_file(upload),
                SelectorAction::Close => self.close(),
                SelectorAction::None => {}
            }
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            // Show progress bar
            if let Some(ref progress) = self.progress {
                ui.label(&progress.operation);
                ui.add(
                    egui::ProgressBar::new(progress.current as f32 / progress.total.max(1) as f32)
                        .show_percentage(),
                );
            }
            self.show_log_panel(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.viewer.source().is_some() {
                show_viewer(ui, &self.viewer, &self.textures);
            } else {
                Self::show_placeholder(ui);
            }
        });

        show_alert(ctx, &mut self.alert);

        // Keep polling while the worker has work in flight
        if received || self.awaiting_worker() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }
}

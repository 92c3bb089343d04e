use eframe::egui;
use pdf_loader::{LoadState, PageStatus, PagePlaceholder, PdfViewer};
use std::collections::HashMap;

/// Height/width ratio used to size a page before its bitmap arrives (US Letter)
const PENDING_PAGE_ASPECT: f32 = 11.0 / 8.5;

const PAGE_SPACING: f32 = 12.0;

/// GPU textures for the rendered pages of the current document
#[derive(Default)]
pub struct PageTextures {
    textures: HashMap<u16, egui::TextureHandle>,
}

impl PageTextures {
    pub fn insert(
        &mut self,
        ctx: &egui::Context,
        page_number: u16,
        width: usize,
        height: usize,
        rgba_data: &[u8],
    ) {
        let color_image = egui::ColorImage::from_rgba_unmultiplied([width, height], rgba_data);

        if let Some(texture) = self.textures.get_mut(&page_number) {
            texture.set(color_image, egui::TextureOptions::default());
        } else {
            let texture = ctx.load_texture(
                format!("pdf_page_{page_number}"),
                color_image,
                egui::TextureOptions::default(),
            );
            self.textures.insert(page_number, texture);
        }
    }

    pub fn get(&self, page_number: u16) -> Option<&egui::TextureHandle> {
        self.textures.get(&page_number)
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }
}

pub fn show_viewer(ui: &mut egui::Ui, viewer: &PdfViewer, textures: &PageTextures) {
    let options = viewer.options();

    match viewer.state() {
        LoadState::Idle => {}
        LoadState::Loading => {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.spinner();
                ui.label("Loading PDF...");
            });
        }
        LoadState::Failed { .. } => {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.colored_label(ui.visuals().error_fg_color, "Failed to load PDF");
            });
        }
        LoadState::Loaded { .. } => {
            let id_salt = options.class_name.as_deref().unwrap_or("pdf_viewer");
            egui::ScrollArea::both()
                .id_salt(id_salt)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.vertical(|ui| {
                        ui.set_min_width(options.width);
                        for page in viewer.pages() {
                            show_page(ui, page, textures, options.width);
                            ui.add_space(PAGE_SPACING);
                        }
                    });
                });
        }
    }
}

fn show_page(ui: &mut egui::Ui, page: &PagePlaceholder, textures: &PageTextures, width: f32) {
    egui::Frame::group(ui.style()).show(ui, |ui| match (&page.status, textures.get(page.page_number)) {
        (PageStatus::Rendered { .. }, Some(texture)) => {
            ui.image((texture.id(), texture.size_vec2()));
        }
        (PageStatus::Failed { error }, _) => {
            ui.colored_label(
                ui.visuals().error_fg_color,
                format!("Failed to render page {}: {}", page.page_number, error),
            );
        }
        _ => {
            ui.add_sized([width, width * PENDING_PAGE_ASPECT], egui::Spinner::new());
        }
    });
}

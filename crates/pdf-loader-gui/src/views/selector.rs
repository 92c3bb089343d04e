use eframe::egui;
use pdf_loader::{FileUpload, SourceLabel, SourceSelector};

/// What the user asked for this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorAction {
    None,
    SubmitUrl,
    OpenFile(FileUpload),
    Close,
}

pub fn show_selector(ui: &mut egui::Ui, selector: &mut SourceSelector) -> SelectorAction {
    let mut action = SelectorAction::None;

    ui.label("PDF URL");
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(selector.url_text_mut())
                .hint_text("https://example.com/sample.pdf")
                .desired_width(480.0),
        );
        let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.button("Load").clicked() || entered {
            action = SelectorAction::SubmitUrl;
        }
    });

    ui.label("or");

    ui.horizontal(|ui| {
        if ui.button("Upload PDF...").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("PDF", &["pdf"])
                .pick_file()
            {
                action = SelectorAction::OpenFile(FileUpload::from_path(path));
            }
        }

        if selector.is_reading() {
            ui.spinner();
            ui.label("Reading file...");
        }

        if selector.source().is_some() && ui.button("Close PDF").clicked() {
            action = SelectorAction::Close;
        }
    });

    // Stays put while the URL field is being edited
    match selector.active_label() {
        Some(SourceLabel::File(name)) => {
            ui.label(format!("Loaded file: {name}"));
        }
        Some(SourceLabel::Url(url)) => {
            ui.label(format!("Loaded URL: {url}"));
        }
        None => {}
    }

    if selector.page_count() > 0 {
        ui.label(format!("Total pages: {}", selector.page_count()));
    }

    action
}

use eframe::egui;

/// Modal message box. Blocks the rest of the UI until dismissed.
pub fn show_alert(ctx: &egui::Context, alert: &mut Option<String>) {
    let Some(message) = alert.as_deref() else {
        return;
    };

    let mut dismissed = false;
    let response = egui::Modal::new(egui::Id::new("alert")).show(ctx, |ui| {
        ui.set_max_width(360.0);
        ui.label(message);
        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
    });

    if dismissed || response.should_close() {
        *alert = None;
    }
}

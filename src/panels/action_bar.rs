use crate::WhiteboardApp;
use crate::command::Command;
use crate::dialogs::TextRequest;

/// Position used by the toolbar's "Add Text" button
const TOOLBAR_TEXT_POSITION: egui::Pos2 = egui::pos2(100.0, 100.0);

pub fn action_bar(app: &mut WhiteboardApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("action_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("🖼 Add Image").clicked() {
                app.add_image();
            }
            if ui.button("🔤 Add Text").clicked() {
                app.open_text_dialog(TextRequest::at(TOOLBAR_TEXT_POSITION));
            }
            if ui.button("🗑 Clear").clicked() {
                app.execute_command(Command::Clear);
            }
            let mut grid = app.tool.grid_visible;
            if ui.toggle_value(&mut grid, "📊 Grid").changed() {
                app.execute_command(Command::SetGridVisible(grid));
            }

            ui.separator();

            let saving = app.pending_save.is_some();
            if ui.add_enabled(!saving, egui::Button::new("💾 Save")).clicked() {
                app.save_canvas();
            }
            if ui.button("📂 Load").clicked() {
                app.load_image();
            }
        });
    });
}

pub fn status_bar(app: &mut WhiteboardApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("Status: {}", app.status.current()));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!(
                    "{} | {:.1}px | {} primitives",
                    app.tool().active_tool.name(),
                    app.tool().brush_width(),
                    app.document().len()
                ));
                if app.pending_save.is_some() {
                    ui.spinner();
                }
            });
        });
    });
}

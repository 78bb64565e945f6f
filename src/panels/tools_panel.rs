use egui::{Color32, Slider};

use crate::WhiteboardApp;
use crate::command::Command;
use crate::tool::{ToolKind, BRUSH_WIDTH_RANGE};

const QUICK_COLORS: [(Color32, &str); 5] = [
    (Color32::RED, "Red"),
    (Color32::GREEN, "Green"),
    (Color32::BLUE, "Blue"),
    (Color32::BLACK, "Black"),
    (Color32::WHITE, "White"),
];

pub fn tools_panel(app: &mut WhiteboardApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            for tool in ToolKind::ALL {
                let is_selected = app.tool.active_tool == tool;
                if ui.selectable_label(is_selected, tool.label()).clicked() && !is_selected {
                    log::info!("Tool selected from UI: {}", tool.name());
                    app.set_tool(tool);
                }
            }
            ui.separator();

            ui.label("Color");
            let mut color = app.tool.stroke_color;
            if egui::color_picker::color_edit_button_srgba(
                ui,
                &mut color,
                egui::color_picker::Alpha::Opaque,
            )
            .changed()
            {
                app.execute_command(Command::SetColor(color));
            }
            ui.separator();

            ui.label("Brush Size");
            let mut width = app.tool.brush_width();
            if ui.add(Slider::new(&mut width, BRUSH_WIDTH_RANGE)).changed() {
                app.execute_command(Command::SetBrushWidth(width));
            }
            ui.label(format!("Size: {:.1}", app.tool.brush_width()));
            ui.separator();

            ui.label("Quick Colors");
            ui.horizontal(|ui| {
                for (color, name) in QUICK_COLORS {
                    let button = egui::Button::new("")
                        .fill(color)
                        .stroke(egui::Stroke::new(1.0, Color32::from_gray(0x33)))
                        .min_size(egui::vec2(24.0, 24.0));
                    if ui.add(button).on_hover_text(name).clicked() {
                        app.execute_command(Command::SetColor(color));
                    }
                }
            });
        });
}

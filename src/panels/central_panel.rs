use egui::{Color32, Pos2, Rect, Sense, Vec2};

use crate::WhiteboardApp;
use crate::renderer::preview_shapes;

pub fn central_panel(app: &mut WhiteboardApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(app.config.background))
        .show(ctx, |ui| {
            let available = ui.available_size();
            let (response, painter) = ui.allocate_painter(available, Sense::drag());
            let canvas_rect = response.rect;

            // The surface follows the panel size; a resize replays the document
            app.canvas_size = [
                canvas_rect.width().max(1.0) as u32,
                canvas_rect.height().max(1.0) as u32,
            ];

            app.process_canvas_input(&response, canvas_rect);

            app.refresh_canvas(ctx);

            if let Some(texture) = &app.texture {
                let size = Vec2::new(app.canvas_size[0] as f32, app.canvas_size[1] as f32);
                painter.image(
                    texture.id(),
                    Rect::from_min_size(canvas_rect.min, size),
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            }

            if let Some(preview) = &app.preview {
                painter.extend(preview_shapes(preview, canvas_rect));
            }

            if response.hovered() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }
        });
}

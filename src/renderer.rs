use ab_glyph::FontArc;
use egui::{Color32, Pos2, Rect, Shape, Stroke, Vec2};
use image::RgbaImage;

use crate::document::Document;
use crate::element::DrawCommand;
use crate::error::WhiteboardResult;
use crate::raster::{GridStyle, Surface};

/// Everything besides the document that decides what the canvas looks like
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub background: Color32,
    /// `None` hides the grid
    pub grid: Option<GridStyle>,
}

/// The empty canvas: background, then the grid if visible
fn base_surface(size: [u32; 2], style: &RenderStyle) -> WhiteboardResult<Surface> {
    let mut base = Surface::new(size[0], size[1], style.background)?;
    if let Some(grid) = &style.grid {
        base.draw_grid(grid);
    }
    Ok(base)
}

/// Replay the whole document onto a fresh surface
pub fn render(
    document: &Document,
    size: [u32; 2],
    style: &RenderStyle,
    font: Option<&FontArc>,
) -> WhiteboardResult<Surface> {
    let base = base_surface(size, style)?;
    let mut surface = base.clone();
    for command in document.commands() {
        surface.apply(command, &base, font);
    }
    Ok(surface)
}

/// Keeps a rendered surface in sync with a document.
///
/// Appended commands are painted incrementally; anything else (a clear, a
/// resize, a grid toggle, a background change) triggers a full replay.
pub struct CanvasRenderer {
    font: Option<FontArc>,
    base: Surface,
    surface: Surface,
    style: RenderStyle,
    rendered: usize,
    revision: u64,
}

impl std::fmt::Debug for CanvasRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasRenderer")
            .field("size", &self.surface.size())
            .field("style", &self.style)
            .field("rendered", &self.rendered)
            .field("revision", &self.revision)
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl CanvasRenderer {
    pub fn new(
        size: [u32; 2],
        style: RenderStyle,
        font: Option<FontArc>,
    ) -> WhiteboardResult<Self> {
        if font.is_none() {
            log::warn!("Canvas renderer has no font; text will not be drawn");
        }
        let base = base_surface(size, &style)?;
        Ok(Self {
            font,
            surface: base.clone(),
            base,
            style,
            rendered: 0,
            revision: 0,
        })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn size(&self) -> [u32; 2] {
        self.surface.size()
    }

    /// Copy of the current pixels for export
    pub fn snapshot(&self) -> RgbaImage {
        self.surface.snapshot()
    }

    /// Bring the surface up to date. Returns true if any pixel may have changed.
    pub fn update(
        &mut self,
        document: &Document,
        size: [u32; 2],
        style: RenderStyle,
    ) -> WhiteboardResult<bool> {
        let stale = size != self.surface.size()
            || style != self.style
            || document.revision() != self.revision
            || document.len() < self.rendered;

        if stale {
            log::debug!(
                "Full canvas replay: {} commands at {}x{}",
                document.len(),
                size[0],
                size[1]
            );
            self.base = base_surface(size, &style)?;
            self.surface = self.base.clone();
            self.style = style;
            self.revision = document.revision();
            self.rendered = 0;
        }

        let pending = &document.commands()[self.rendered..];
        for command in pending {
            self.surface.apply(command, &self.base, self.font.as_ref());
        }
        let changed = stale || !pending.is_empty();
        self.rendered = document.len();
        Ok(changed)
    }
}

fn ellipse_points(center: Pos2, radius: Vec2) -> Vec<Pos2> {
    let segments = ((radius.x.max(radius.y) * 0.5) as usize).clamp(16, 256);
    (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            center + Vec2::new(angle.cos() * radius.x, angle.sin() * radius.y)
        })
        .collect()
}

/// egui shapes for a transient preview, with `canvas_rect.min` as the
/// surface origin
pub fn preview_shapes(command: &DrawCommand, canvas_rect: Rect) -> Vec<Shape> {
    let offset = canvas_rect.min.to_vec2();
    match command {
        DrawCommand::Line { from, to, color, width }
        | DrawCommand::Segment { from, to, color, width } => {
            vec![Shape::line_segment(
                [*from + offset, *to + offset],
                Stroke::new(*width, *color),
            )]
        }
        DrawCommand::Rectangle { rect, color, width } => {
            vec![Shape::rect_stroke(rect.translate(offset), 0.0, Stroke::new(*width, *color))]
        }
        DrawCommand::Ellipse { center, radius, color, width } => {
            vec![Shape::closed_line(
                ellipse_points(*center + offset, *radius),
                Stroke::new(*width, *color),
            )]
        }
        // Only the shape tools preview
        DrawCommand::Erase { .. } | DrawCommand::Text { .. } | DrawCommand::Image { .. } => {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> RenderStyle {
        RenderStyle {
            background: Color32::WHITE,
            grid: None,
        }
    }

    fn line(y: f32) -> DrawCommand {
        DrawCommand::Line {
            from: Pos2::new(0.0, y),
            to: Pos2::new(30.0, y),
            color: Color32::BLACK,
            width: 2.0,
        }
    }

    #[test]
    fn test_incremental_matches_full_replay() {
        let mut doc = Document::new();
        let mut renderer = CanvasRenderer::new([32, 32], style(), None).unwrap();

        doc.push(line(5.0));
        assert!(renderer.update(&doc, [32, 32], style()).unwrap());
        doc.push(line(15.0));
        assert!(renderer.update(&doc, [32, 32], style()).unwrap());
        assert!(!renderer.update(&doc, [32, 32], style()).unwrap());

        let full = render(&doc, [32, 32], &style(), None).unwrap();
        assert_eq!(renderer.surface(), &full);
    }

    #[test]
    fn test_clear_triggers_replay() {
        let mut doc = Document::new();
        let mut renderer = CanvasRenderer::new([32, 32], style(), None).unwrap();
        doc.push(line(5.0));
        renderer.update(&doc, [32, 32], style()).unwrap();

        doc.clear();
        assert!(renderer.update(&doc, [32, 32], style()).unwrap());
        assert_eq!(renderer.surface().pixel(10, 5), Some(Color32::WHITE));
    }

    #[test]
    fn test_grid_toggle_keeps_content() {
        let mut doc = Document::new();
        doc.push(line(5.0));
        let mut renderer = CanvasRenderer::new([64, 64], style(), None).unwrap();
        renderer.update(&doc, [64, 64], style()).unwrap();

        let with_grid = RenderStyle {
            grid: Some(GridStyle {
                spacing: 20.0,
                color: Color32::LIGHT_GRAY,
                width: 1.0,
            }),
            ..style()
        };
        renderer.update(&doc, [64, 64], with_grid).unwrap();
        assert_eq!(renderer.surface().pixel(10, 5), Some(Color32::BLACK));
        assert_ne!(renderer.surface().pixel(40, 30), Some(Color32::WHITE));

        renderer.update(&doc, [64, 64], style()).unwrap();
        assert_eq!(renderer.surface().pixel(10, 5), Some(Color32::BLACK));
        assert_eq!(renderer.surface().pixel(40, 30), Some(Color32::WHITE));
    }

    #[test]
    fn test_eraser_restores_grid() {
        let grid = GridStyle {
            spacing: 10.0,
            color: Color32::GRAY,
            width: 1.0,
        };
        let style = RenderStyle {
            background: Color32::WHITE,
            grid: Some(grid),
        };
        let mut doc = Document::new();
        doc.push(DrawCommand::Rectangle {
            rect: Rect::from_min_max(Pos2::new(5.0, 5.0), Pos2::new(25.0, 25.0)),
            color: Color32::RED,
            width: 3.0,
        });
        let empty = render(&Document::new(), [32, 32], &style, None).unwrap();
        doc.push(DrawCommand::Erase {
            from: Pos2::new(5.0, 5.0),
            to: Pos2::new(25.0, 5.0),
            width: 8.0,
        });
        let erased = render(&doc, [32, 32], &style, None).unwrap();

        assert_eq!(erased.pixel(10, 5), empty.pixel(10, 5));
        assert_eq!(erased.pixel(15, 5), empty.pixel(15, 5));
    }

    #[test]
    fn test_resize_rerenders_at_new_size() {
        let mut doc = Document::new();
        doc.push(line(5.0));
        let mut renderer = CanvasRenderer::new([32, 32], style(), None).unwrap();
        renderer.update(&doc, [32, 32], style()).unwrap();
        renderer.update(&doc, [48, 16], style()).unwrap();

        assert_eq!(renderer.size(), [48, 16]);
        assert_eq!(renderer.surface().pixel(10, 5), Some(Color32::BLACK));
    }

    #[test]
    fn test_preview_only_for_shapes() {
        let canvas = Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::splat(200.0));
        assert_eq!(preview_shapes(&line(5.0), canvas).len(), 1);
        let erase = DrawCommand::Erase {
            from: Pos2::ZERO,
            to: Pos2::ZERO,
            width: 1.0,
        };
        assert!(preview_shapes(&erase, canvas).is_empty());
    }
}

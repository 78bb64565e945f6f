//! Raster surface: a `tiny_skia` pixmap with the paint operations the
//! whiteboard replays its document through.
//!
//! Strokes are antialiased paths. Text is rasterized with `ab_glyph` into a
//! coverage mask and filled through it.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use egui::{Color32, Pos2, Rect, Vec2};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tiny_skia::{
    ColorU8, FilterQuality, LineCap, LineJoin, Mask, Paint, Path, PathBuilder, Pattern, Pixmap,
    PixmapPaint, SpreadMode, Stroke, Transform,
};

use crate::element::DrawCommand;
use crate::error::{WhiteboardError, WhiteboardResult};

/// Control-point distance for approximating a quarter ellipse with a cubic
const KAPPA: f32 = 0.552_284_8;

/// Grid overlay appearance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    pub spacing: f32,
    pub color: Color32,
    pub width: f32,
}

/// Load the proportional font egui ships with, for burning text into the canvas
pub fn default_font() -> Option<FontArc> {
    let definitions = egui::FontDefinitions::default();
    let family = definitions.families.get(&egui::FontFamily::Proportional)?;
    family.iter().find_map(|name| {
        let data = definitions.font_data.get(name)?;
        match FontArc::try_from_vec(data.font.to_vec()) {
            Ok(font) => Some(font),
            Err(err) => {
                log::warn!("Skipping font {name}: {err}");
                None
            }
        }
    })
}

fn solid_paint(color: Color32) -> Paint<'static> {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn stroke(width: f32, line_cap: LineCap, line_join: LineJoin) -> Stroke {
    Stroke {
        width,
        line_cap,
        line_join,
        ..Stroke::default()
    }
}

fn segment_path(from: Pos2, to: Pos2) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(from.x, from.y);
    pb.line_to(to.x, to.y);
    pb.finish()
}

fn rect_path(rect: Rect) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(rect.min.x, rect.min.y);
    pb.line_to(rect.max.x, rect.min.y);
    pb.line_to(rect.max.x, rect.max.y);
    pb.line_to(rect.min.x, rect.max.y);
    pb.close();
    pb.finish()
}

fn ellipse_path(center: Pos2, radius: Vec2) -> Option<Path> {
    let (cx, cy) = (center.x, center.y);
    let (rx, ry) = (radius.x.abs(), radius.y.abs());
    let (ox, oy) = (rx * KAPPA, ry * KAPPA);

    let mut pb = PathBuilder::new();
    pb.move_to(cx + rx, cy);
    pb.cubic_to(cx + rx, cy + oy, cx + ox, cy + ry, cx, cy + ry);
    pb.cubic_to(cx - ox, cy + ry, cx - rx, cy + oy, cx - rx, cy);
    pb.cubic_to(cx - rx, cy - oy, cx - ox, cy - ry, cx, cy - ry);
    pb.cubic_to(cx + ox, cy - ry, cx + rx, cy - oy, cx + rx, cy);
    pb.close();
    pb.finish()
}

fn pixmap_from_image(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

#[derive(Clone)]
pub struct Surface {
    pixmap: Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface").field("size", &self.size()).finish()
    }
}

impl PartialEq for Surface {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size() && self.pixmap.data() == other.pixmap.data()
    }
}

impl Surface {
    /// A surface filled with `background`
    pub fn new(width: u32, height: u32, background: Color32) -> WhiteboardResult<Self> {
        let pixmap =
            Pixmap::new(width, height).ok_or(WhiteboardError::InvalidCanvasSize { width, height })?;
        let mut surface = Self { pixmap };
        surface.fill(background);
        Ok(surface)
    }

    /// A surface holding a copy of `image`
    pub fn from_image(image: &RgbaImage) -> WhiteboardResult<Self> {
        let (width, height) = image.dimensions();
        let pixmap =
            pixmap_from_image(image).ok_or(WhiteboardError::InvalidCanvasSize { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn size(&self) -> [u32; 2] {
        [self.width(), self.height()]
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(
            Pos2::ZERO,
            Vec2::new(self.width() as f32, self.height() as f32),
        )
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color32::from_rgba_unmultiplied(
            c.red(),
            c.green(),
            c.blue(),
            c.alpha(),
        ))
    }

    /// Premultiplied RGBA bytes, row by row
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Owned, unmultiplied copy of the pixels, safe to hand to another thread
    pub fn snapshot(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width(), self.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image
    }

    pub fn fill(&mut self, color: Color32) {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    fn stroke_path(&mut self, path: Option<Path>, paint: &Paint<'_>, stroke: &Stroke) {
        if let Some(path) = path {
            self.pixmap
                .stroke_path(&path, paint, stroke, Transform::identity(), None);
        }
    }

    /// Stroke a straight segment with round caps
    pub fn stroke_segment(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        self.stroke_path(
            segment_path(from, to),
            &solid_paint(color),
            &stroke(width, LineCap::Round, LineJoin::Round),
        );
    }

    /// Stroke a segment with the pixels of `base` instead of a color
    pub fn erase_segment(&mut self, from: Pos2, to: Pos2, width: f32, base: &Surface) {
        let paint = Paint {
            shader: Pattern::new(
                base.pixmap.as_ref(),
                SpreadMode::Pad,
                FilterQuality::Nearest,
                1.0,
                Transform::identity(),
            ),
            anti_alias: true,
            ..Paint::default()
        };
        self.stroke_path(
            segment_path(from, to),
            &paint,
            &stroke(width, LineCap::Round, LineJoin::Round),
        );
    }

    pub fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color32) {
        self.stroke_path(
            rect_path(rect),
            &solid_paint(color),
            &stroke(width, LineCap::Square, LineJoin::Miter),
        );
    }

    pub fn stroke_ellipse(&mut self, center: Pos2, radius: Vec2, width: f32, color: Color32) {
        self.stroke_path(
            ellipse_path(center, radius),
            &solid_paint(color),
            &stroke(width, LineCap::Round, LineJoin::Round),
        );
    }

    /// Fill `text` with its first baseline starting at `origin`.
    ///
    /// Lines are separated by `\n` and advance by the font's line height.
    pub fn fill_text(
        &mut self,
        font: &FontArc,
        origin: Pos2,
        text: &str,
        size: f32,
        color: Color32,
    ) {
        if size <= 0.0 {
            return;
        }
        let (width, height) = (self.width() as i64, self.height() as i64);
        let Some(mut mask) = Mask::new(self.width(), self.height()) else {
            return;
        };
        let scale = PxScale::from(size);
        let scaled = font.as_scaled(scale);
        let line_height = scaled.height() + scaled.line_gap();

        let coverage = mask.data_mut();
        for (line_idx, line) in text.split('\n').enumerate() {
            let baseline = origin.y + line_idx as f32 * line_height;
            let mut caret = origin.x;
            let mut previous = None;
            for ch in line.chars() {
                let id = font.glyph_id(ch);
                if let Some(prev) = previous {
                    caret += scaled.kern(prev, id);
                }
                let glyph = id.with_scale_and_position(scale, ab_glyph::point(caret, baseline));
                caret += scaled.h_advance(id);
                previous = Some(id);

                let Some(outlined) = font.outline_glyph(glyph) else {
                    continue;
                };
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, c| {
                    let x = bounds.min.x as i64 + gx as i64;
                    let y = bounds.min.y as i64 + gy as i64;
                    if x < 0 || y < 0 || x >= width || y >= height {
                        return;
                    }
                    let idx = (y * width + x) as usize;
                    let value = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
                    coverage[idx] = coverage[idx].max(value);
                });
            }
        }

        if let Some(area) = tiny_skia::Rect::from_xywh(0.0, 0.0, width as f32, height as f32) {
            self.pixmap.fill_rect(
                area,
                &solid_paint(color),
                Transform::identity(),
                Some(&mask),
            );
        }
    }

    /// Blit `bitmap` stretched into `rect`, honoring its alpha
    pub fn draw_image(&mut self, bitmap: &RgbaImage, rect: Rect) {
        let width = rect.width().round();
        let height = rect.height().round();
        if width < 1.0 || height < 1.0 || bitmap.width() == 0 || bitmap.height() == 0 {
            return;
        }
        let scaled;
        let source = if bitmap.width() == width as u32 && bitmap.height() == height as u32 {
            bitmap
        } else {
            scaled = imageops::resize(bitmap, width as u32, height as u32, FilterType::Triangle);
            &scaled
        };
        let Some(pixmap) = pixmap_from_image(source) else {
            return;
        };
        self.pixmap.draw_pixmap(
            rect.min.x.round() as i32,
            rect.min.y.round() as i32,
            pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// Stroke grid lines every `spacing` pixels across the whole surface
    pub fn draw_grid(&mut self, style: &GridStyle) {
        if style.spacing <= 0.0 {
            return;
        }
        let (w, h) = (self.width() as f32, self.height() as f32);
        let paint = solid_paint(style.color);
        let line = stroke(style.width, LineCap::Butt, LineJoin::Miter);

        let mut pb = PathBuilder::new();
        let mut x = 0.0;
        while x < w {
            pb.move_to(x, 0.0);
            pb.line_to(x, h);
            x += style.spacing;
        }
        let mut y = 0.0;
        while y < h {
            pb.move_to(0.0, y);
            pb.line_to(w, y);
            y += style.spacing;
        }
        self.stroke_path(pb.finish(), &paint, &line);
    }

    /// Paint one draw command.
    ///
    /// `base` is the empty canvas (background plus grid) the eraser restores.
    pub fn apply(&mut self, command: &DrawCommand, base: &Surface, font: Option<&FontArc>) {
        if !command.bounds().intersects(self.rect()) {
            log::trace!("Skipping off-canvas {}", command.name());
            return;
        }
        match command {
            DrawCommand::Segment { from, to, color, width }
            | DrawCommand::Line { from, to, color, width } => {
                self.stroke_segment(*from, *to, *width, *color);
            }
            DrawCommand::Erase { from, to, width } => self.erase_segment(*from, *to, *width, base),
            DrawCommand::Rectangle { rect, color, width } => {
                self.stroke_rect(*rect, *width, *color);
            }
            DrawCommand::Ellipse { center, radius, color, width } => {
                self.stroke_ellipse(*center, *radius, *width, *color);
            }
            DrawCommand::Text { origin, text, color, size } => match font {
                Some(font) => self.fill_text(font, *origin, text, *size, *color),
                None => log::warn!("No font available, dropping text {text:?}"),
            },
            DrawCommand::Image { rect, bitmap } => self.draw_image(bitmap, *rect),
        }
    }
}

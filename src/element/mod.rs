use std::sync::Arc;

use egui::{Color32, Pos2, Rect, Vec2};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

pub(crate) mod common;

/// How a Circle gesture turns into an ellipse.
///
/// The two are not equivalent: a bounding-box ellipse fits inside the
/// rectangle spanned by the drag, a center-radius circle grows around the
/// press point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CircleMode {
    /// Ellipse inscribed in the normalized drag rectangle, independent radii
    #[default]
    BoundingBox,
    /// Circle centered on the press point, radius = distance to the release point
    CenterRadius,
}

/// Rectangle spanned by two corners, with non-negative size whatever the drag direction
pub fn normalized_rect(a: Pos2, b: Pos2) -> Rect {
    Rect::from_min_max(
        Pos2::new(a.x.min(b.x), a.y.min(b.y)),
        Pos2::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

/// Center and radii of the ellipse a Circle gesture from `origin` to `release` commits
pub fn ellipse_from_drag(origin: Pos2, release: Pos2, mode: CircleMode) -> (Pos2, Vec2) {
    match mode {
        CircleMode::BoundingBox => {
            let rect = normalized_rect(origin, release);
            (rect.center(), rect.size() / 2.0)
        }
        CircleMode::CenterRadius => {
            let radius = origin.distance(release);
            (origin, Vec2::splat(radius))
        }
    }
}

/// One immutable drawn primitive.
///
/// The document is an ordered list of these; the canvas is whatever you get
/// by replaying the list onto an empty surface.
#[derive(Clone, PartialEq)]
pub enum DrawCommand {
    /// One pencil segment; consecutive segments form a polyline
    Segment {
        from: Pos2,
        to: Pos2,
        color: Color32,
        width: f32,
    },
    /// One eraser segment, painted in the background color
    Erase { from: Pos2, to: Pos2, width: f32 },
    Line {
        from: Pos2,
        to: Pos2,
        color: Color32,
        width: f32,
    },
    /// Stroked outline; `rect` is always normalized
    Rectangle {
        rect: Rect,
        color: Color32,
        width: f32,
    },
    Ellipse {
        center: Pos2,
        radius: Vec2,
        color: Color32,
        width: f32,
    },
    /// Filled text; `origin` is the left end of the baseline
    Text {
        origin: Pos2,
        text: String,
        color: Color32,
        size: f32,
    },
    /// Bitmap stretched into `rect`
    Image { rect: Rect, bitmap: Arc<RgbaImage> },
}

impl std::fmt::Debug for DrawCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawCommand::Segment { from, to, color, width } => f
                .debug_struct("Segment")
                .field("from", from)
                .field("to", to)
                .field("color", color)
                .field("width", width)
                .finish(),
            DrawCommand::Erase { from, to, width } => f
                .debug_struct("Erase")
                .field("from", from)
                .field("to", to)
                .field("width", width)
                .finish(),
            DrawCommand::Line { from, to, color, width } => f
                .debug_struct("Line")
                .field("from", from)
                .field("to", to)
                .field("color", color)
                .field("width", width)
                .finish(),
            DrawCommand::Rectangle { rect, color, width } => f
                .debug_struct("Rectangle")
                .field("rect", rect)
                .field("color", color)
                .field("width", width)
                .finish(),
            DrawCommand::Ellipse { center, radius, color, width } => f
                .debug_struct("Ellipse")
                .field("center", center)
                .field("radius", radius)
                .field("color", color)
                .field("width", width)
                .finish(),
            DrawCommand::Text { origin, text, color, size } => f
                .debug_struct("Text")
                .field("origin", origin)
                .field("text", text)
                .field("color", color)
                .field("size", size)
                .finish(),
            // Skip the pixel data
            DrawCommand::Image { rect, bitmap } => f
                .debug_struct("Image")
                .field("rect", rect)
                .field("size", &bitmap.dimensions())
                .finish(),
        }
    }
}

impl DrawCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Segment { .. } => "segment",
            Self::Erase { .. } => "erase",
            Self::Line { .. } => "line",
            Self::Rectangle { .. } => "rectangle",
            Self::Ellipse { .. } => "ellipse",
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
        }
    }

    /// Area the command may paint, including half the stroke width.
    ///
    /// Text bounds are a conservative estimate from the font size. The
    /// surface skips commands whose bounds miss it entirely.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Segment { from, to, width, .. }
            | Self::Erase { from, to, width }
            | Self::Line { from, to, width, .. } => {
                common::calculate_bounds(&[*from, *to], width / 2.0)
            }
            Self::Rectangle { rect, width, .. } => rect.expand(width / 2.0),
            Self::Ellipse { center, radius, width, .. } => {
                Rect::from_center_size(*center, *radius * 2.0).expand(width / 2.0)
            }
            Self::Text { origin, text, size, .. } => {
                // At most one em per character, 1.5 em per line
                let columns = text.split('\n').map(|line| line.chars().count()).max().unwrap_or(0);
                let rows = text.split('\n').count();
                Rect::from_min_max(
                    Pos2::new(origin.x - size * 0.25, origin.y - size),
                    Pos2::new(
                        origin.x + size * columns as f32,
                        origin.y + size * (0.5 + 1.5 * (rows - 1) as f32),
                    ),
                )
            }
            Self::Image { rect, .. } => *rect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_rect_any_direction() {
        let a = Pos2::new(80.0, 20.0);
        let b = Pos2::new(30.0, 70.0);
        for (from, to) in [(a, b), (b, a)] {
            let rect = normalized_rect(from, to);
            assert_eq!(rect.min, Pos2::new(30.0, 20.0));
            assert_eq!(rect.size(), Vec2::new(50.0, 50.0));
        }
    }

    #[test]
    fn test_ellipse_modes_differ() {
        let origin = Pos2::new(10.0, 10.0);
        let release = Pos2::new(40.0, 50.0);

        let (center, radius) = ellipse_from_drag(origin, release, CircleMode::BoundingBox);
        assert_eq!(center, Pos2::new(25.0, 30.0));
        assert_eq!(radius, Vec2::new(15.0, 20.0));

        let (center, radius) = ellipse_from_drag(origin, release, CircleMode::CenterRadius);
        assert_eq!(center, origin);
        assert_eq!(radius, Vec2::splat(50.0));
    }

    #[test]
    fn test_bounds_include_stroke_width() {
        let cmd = DrawCommand::Line {
            from: Pos2::new(10.0, 10.0),
            to: Pos2::new(20.0, 10.0),
            color: Color32::RED,
            width: 4.0,
        };
        let bounds = cmd.bounds();
        assert_eq!(bounds.min, Pos2::new(8.0, 8.0));
        assert_eq!(bounds.max, Pos2::new(22.0, 12.0));
    }
}

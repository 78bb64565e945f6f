use std::ops::RangeInclusive;

use egui::Color32;
use serde::{Deserialize, Serialize};

/// Range the brush-size slider is bound to
pub const BRUSH_WIDTH_RANGE: RangeInclusive<f32> = 1.0..=50.0;

/// Drawing mode that decides how a gesture is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Pencil,
    Line,
    Rectangle,
    Circle,
    Text,
    Eraser,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Pencil,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Text,
        ToolKind::Eraser,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pencil => "Pencil",
            Self::Line => "Line",
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
            Self::Text => "Text",
            Self::Eraser => "Eraser",
        }
    }

    /// Toolbar button label
    pub fn label(self) -> &'static str {
        match self {
            Self::Pencil => "✏ Pencil",
            Self::Line => "╱ Line",
            Self::Rectangle => "▭ Rectangle",
            Self::Circle => "◯ Circle",
            Self::Text => "🔤 Text",
            Self::Eraser => "⌫ Eraser",
        }
    }

    /// Tools that only commit a shape on release and preview it while dragging
    pub fn is_shape(self) -> bool {
        matches!(self, Self::Line | Self::Rectangle | Self::Circle)
    }

    /// Tools that paint incrementally on every drag event
    pub fn is_freehand(self) -> bool {
        matches!(self, Self::Pencil | Self::Eraser)
    }
}

/// Toolbar state read by the stroke interpreter.
///
/// There is exactly one of these, owned by the app and threaded through every
/// pointer event. It carries no history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolState {
    pub active_tool: ToolKind,
    pub stroke_color: Color32,
    brush_width: f32,
    pub grid_visible: bool,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            active_tool: ToolKind::Pencil,
            stroke_color: Color32::BLACK,
            brush_width: 2.0,
            grid_visible: false,
        }
    }
}

impl ToolState {
    pub fn new(active_tool: ToolKind, stroke_color: Color32, brush_width: f32) -> Self {
        let mut state = Self {
            active_tool,
            stroke_color,
            ..Self::default()
        };
        state.set_brush_width(brush_width);
        state
    }

    pub fn brush_width(&self) -> f32 {
        self.brush_width
    }

    /// Set the brush width, clamped to [`BRUSH_WIDTH_RANGE`]
    pub fn set_brush_width(&mut self, width: f32) {
        self.brush_width = if width.is_finite() {
            width.clamp(*BRUSH_WIDTH_RANGE.start(), *BRUSH_WIDTH_RANGE.end())
        } else {
            *BRUSH_WIDTH_RANGE.start()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brush_width_is_clamped() {
        let mut state = ToolState::default();
        state.set_brush_width(120.0);
        assert_eq!(state.brush_width(), 50.0);
        state.set_brush_width(0.0);
        assert_eq!(state.brush_width(), 1.0);
        state.set_brush_width(f32::NAN);
        assert_eq!(state.brush_width(), 1.0);
    }

    #[test]
    fn test_tool_categories() {
        let shapes: Vec<_> = ToolKind::ALL.into_iter().filter(|t| t.is_shape()).collect();
        assert_eq!(shapes, vec![ToolKind::Line, ToolKind::Rectangle, ToolKind::Circle]);
        assert!(ToolKind::Eraser.is_freehand());
        assert!(!ToolKind::Text.is_freehand());
        assert!(!ToolKind::Text.is_shape());
    }
}

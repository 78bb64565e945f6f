//! The stroke interpreter: maps pointer events plus the toolbar state onto
//! draw commands.
//!
//! [`step`] is a pure function of its inputs (apart from the text prompt it
//! may call), so gestures can be replayed without a display.

use egui::Pos2;

use crate::config::WhiteboardConfig;
use crate::dialogs::{TextPrompt, TextRequest};
use crate::element::{ellipse_from_drag, normalized_rect, CircleMode, DrawCommand};
use crate::input::PointerEvent;
use crate::tool::{ToolKind, ToolState};

/// Constants the interpreter needs from the configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpreterConfig {
    pub eraser_factor: f32,
    pub text_scale: f32,
    pub circle_mode: CircleMode,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self::from(&WhiteboardConfig::default())
    }
}

impl From<&WhiteboardConfig> for InterpreterConfig {
    fn from(config: &WhiteboardConfig) -> Self {
        Self {
            eraser_factor: config.eraser_factor,
            text_scale: config.text_scale,
            circle_mode: config.circle_mode,
        }
    }
}

/// Per-gesture state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Active {
        /// Press point
        origin: Pos2,
        /// End of the last freehand segment
        last: Pos2,
    },
}

impl Gesture {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Active { .. } => "Active",
        }
    }
}

/// Outcome of feeding one event to the interpreter
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Step {
    pub gesture: Gesture,
    /// Commands to append to the document, in order
    pub commands: Vec<DrawCommand>,
    /// Transient shape to show for this frame only
    pub preview: Option<DrawCommand>,
}

impl Step {
    fn idle() -> Self {
        Self::default()
    }

    fn with_gesture(gesture: Gesture) -> Self {
        Self {
            gesture,
            ..Self::default()
        }
    }
}

/// Text command for `text` placed at `origin`, or `None` if the text is blank
pub fn text_command(
    origin: Pos2,
    text: &str,
    tool: &ToolState,
    config: &InterpreterConfig,
) -> Option<DrawCommand> {
    if text.trim().is_empty() {
        return None;
    }
    Some(DrawCommand::Text {
        origin,
        text: text.to_owned(),
        color: tool.stroke_color,
        size: tool.brush_width() * config.text_scale,
    })
}

/// Shape a discrete tool would commit for a drag from `origin` to `pos`
fn shape_command(
    kind: ToolKind,
    origin: Pos2,
    pos: Pos2,
    tool: &ToolState,
    config: &InterpreterConfig,
) -> Option<DrawCommand> {
    let color = tool.stroke_color;
    let width = tool.brush_width();
    match kind {
        ToolKind::Line => Some(DrawCommand::Line {
            from: origin,
            to: pos,
            color,
            width,
        }),
        ToolKind::Rectangle => Some(DrawCommand::Rectangle {
            rect: normalized_rect(origin, pos),
            color,
            width,
        }),
        ToolKind::Circle => {
            let (center, radius) = ellipse_from_drag(origin, pos, config.circle_mode);
            Some(DrawCommand::Ellipse {
                center,
                radius,
                color,
                width,
            })
        }
        ToolKind::Pencil | ToolKind::Eraser | ToolKind::Text => None,
    }
}

/// Advance the gesture by one pointer event.
///
/// A press while a gesture is already active restarts it at the new point.
/// Drags and releases while idle are ignored.
pub fn step(
    gesture: Gesture,
    tool: &ToolState,
    config: &InterpreterConfig,
    event: PointerEvent,
    prompt: &mut dyn TextPrompt,
) -> Step {
    match (gesture, event) {
        (_, PointerEvent::Press(pos)) => {
            if tool.active_tool == ToolKind::Text {
                let commands = prompt
                    .request_text(&TextRequest::at(pos))
                    .and_then(|text| text_command(pos, &text, tool, config))
                    .into_iter()
                    .collect();
                return Step {
                    gesture: Gesture::Idle,
                    commands,
                    preview: None,
                };
            }
            if gesture.is_active() {
                log::debug!("Press while a gesture is active, restarting at {pos:?}");
            }
            Step::with_gesture(Gesture::Active { origin: pos, last: pos })
        }

        (Gesture::Active { origin, last }, PointerEvent::Drag(pos)) => {
            // Only freehand tools move the segment start
            let next = Gesture::Active {
                origin,
                last: if tool.active_tool.is_freehand() { pos } else { last },
            };
            match tool.active_tool {
                ToolKind::Pencil => Step {
                    gesture: next,
                    commands: vec![DrawCommand::Segment {
                        from: last,
                        to: pos,
                        color: tool.stroke_color,
                        width: tool.brush_width(),
                    }],
                    preview: None,
                },
                ToolKind::Eraser => Step {
                    gesture: next,
                    commands: vec![DrawCommand::Erase {
                        from: last,
                        to: pos,
                        width: tool.brush_width() * config.eraser_factor,
                    }],
                    preview: None,
                },
                kind if kind.is_shape() => Step {
                    gesture: next,
                    commands: Vec::new(),
                    preview: shape_command(kind, origin, pos, tool, config),
                },
                _ => Step::with_gesture(next),
            }
        }

        (Gesture::Active { origin, .. }, PointerEvent::Release(pos)) => Step {
            gesture: Gesture::Idle,
            commands: shape_command(tool.active_tool, origin, pos, tool, config)
                .into_iter()
                .collect(),
            preview: None,
        },

        (Gesture::Idle, PointerEvent::Drag(_) | PointerEvent::Release(_)) => Step::idle(),
    }
}

/// Owns the gesture state between events for the app's event loop
#[derive(Debug, Default)]
pub struct StrokeInterpreter {
    gesture: Gesture,
}

impl StrokeInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_active()
    }

    /// Feed one event; returns the commands and preview it produced
    pub fn handle(
        &mut self,
        tool: &ToolState,
        config: &InterpreterConfig,
        event: PointerEvent,
        prompt: &mut dyn TextPrompt,
    ) -> Step {
        let step = step(self.gesture, tool, config, event, prompt);
        if step.gesture.name() != self.gesture.name() {
            log::debug!(
                "{}: {} -> {} at {:?}",
                tool.active_tool.name(),
                self.gesture.name(),
                step.gesture.name(),
                event.position()
            );
        }
        self.gesture = step.gesture;
        step
    }

    /// Drop an in-progress gesture without committing anything
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }
}

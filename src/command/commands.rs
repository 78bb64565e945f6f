use std::sync::Arc;

use egui::{Color32, Pos2, Rect, Vec2};
use image::RgbaImage;

use super::{CommandContext, CommandError, CommandResult};
use crate::element::DrawCommand;
use crate::interpreter::text_command;
use crate::tool::ToolKind;

/// Toolbar actions the whiteboard can execute
#[derive(Clone)]
pub enum Command {
    /// Change the active tool
    SetTool(ToolKind),

    SetColor(Color32),

    /// Change the brush width; clamped to the slider range
    SetBrushWidth(f32),

    /// Show or hide the grid overlay
    SetGridVisible(bool),

    /// Erase everything drawn so far
    Clear,

    /// Place text without a pointer gesture
    AddText { text: String, position: Pos2 },

    /// Draw an image at half size, centered on the canvas
    AddImage(Arc<RgbaImage>),

    /// Replace the canvas with an image stretched to fill it
    LoadImage(Arc<RgbaImage>),

    /// Append primitives produced by the stroke interpreter
    Draw(Vec<DrawCommand>),
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::SetTool(tool) => f.debug_tuple("SetTool").field(tool).finish(),
            Command::SetColor(color) => f.debug_tuple("SetColor").field(color).finish(),
            Command::SetBrushWidth(width) => f.debug_tuple("SetBrushWidth").field(width).finish(),
            Command::SetGridVisible(visible) => {
                f.debug_tuple("SetGridVisible").field(visible).finish()
            }
            Command::Clear => write!(f, "Clear"),
            Command::AddText { text, position } => f
                .debug_struct("AddText")
                .field("text", text)
                .field("position", position)
                .finish(),
            Command::AddImage(bitmap) => f
                .debug_tuple("AddImage")
                .field(&bitmap.dimensions())
                .finish(),
            Command::LoadImage(bitmap) => f
                .debug_tuple("LoadImage")
                .field(&bitmap.dimensions())
                .finish(),
            Command::Draw(commands) => f.debug_tuple("Draw").field(&commands.len()).finish(),
        }
    }
}

fn bitmap_size(bitmap: &RgbaImage) -> Vec2 {
    Vec2::new(bitmap.width() as f32, bitmap.height() as f32)
}

impl Command {
    /// Execute the command with the given context
    pub fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            Command::SetTool(tool) => {
                ctx.tool.active_tool = *tool;
                ctx.status.status(&format!("Active tool: {}", tool.name()));
                Ok(())
            }

            Command::SetColor(color) => {
                ctx.tool.stroke_color = *color;
                Ok(())
            }

            Command::SetBrushWidth(width) => {
                if !width.is_finite() {
                    return Err(CommandError::InvalidParameters(format!(
                        "brush width must be finite, got {width}"
                    )));
                }
                ctx.tool.set_brush_width(*width);
                Ok(())
            }

            Command::SetGridVisible(visible) => {
                ctx.tool.grid_visible = *visible;
                ctx.status
                    .info("Grid", if *visible { "Grid enabled" } else { "Grid disabled" });
                Ok(())
            }

            Command::Clear => {
                ctx.document.clear();
                ctx.status.status("Canvas cleared");
                Ok(())
            }

            Command::AddText { text, position } => {
                let config = ctx.interpreter_config();
                if let Some(cmd) = text_command(*position, text, ctx.tool, &config) {
                    ctx.document.push(cmd);
                    ctx.status.status("Text added");
                }
                Ok(())
            }

            Command::AddImage(bitmap) => {
                let size = bitmap_size(bitmap) / 2.0;
                let center = (ctx.canvas_size / 2.0).to_pos2();
                ctx.document.push(DrawCommand::Image {
                    rect: Rect::from_center_size(center, size),
                    bitmap: Arc::clone(bitmap),
                });
                ctx.status.info("Success", "Image added successfully!");
                Ok(())
            }

            Command::LoadImage(bitmap) => {
                ctx.document.clear();
                ctx.document.push(DrawCommand::Image {
                    rect: Rect::from_min_size(Pos2::ZERO, ctx.canvas_size),
                    bitmap: Arc::clone(bitmap),
                });
                ctx.status.info("Success", "Image loaded successfully!");
                Ok(())
            }

            Command::Draw(commands) => {
                ctx.document.extend(commands.iter().cloned());
                Ok(())
            }
        }
    }
}

use egui::Vec2;

use crate::config::WhiteboardConfig;
use crate::dialogs::StatusSink;
use crate::document::Document;
use crate::interpreter::InterpreterConfig;
use crate::tool::ToolState;

/// Context for command execution: the state a toolbar action may change and
/// the sink it reports to.
pub struct CommandContext<'a> {
    /// The toolbar state
    pub tool: &'a mut ToolState,
    /// The primitives drawn so far
    pub document: &'a mut Document,
    /// Where status lines and alerts go
    pub status: &'a mut dyn StatusSink,
    pub config: &'a WhiteboardConfig,
    /// Current canvas size in pixels
    pub canvas_size: Vec2,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        tool: &'a mut ToolState,
        document: &'a mut Document,
        status: &'a mut dyn StatusSink,
        config: &'a WhiteboardConfig,
        canvas_size: Vec2,
    ) -> Self {
        Self {
            tool,
            document,
            status,
            config,
            canvas_size,
        }
    }

    pub fn interpreter_config(&self) -> InterpreterConfig {
        InterpreterConfig::from(self.config)
    }
}

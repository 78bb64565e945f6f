#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod config;
pub mod dialogs;
pub mod document;
pub mod element;
pub mod error;
pub mod file_handler;
pub mod input;
pub mod interpreter;
pub mod panels;
pub mod raster;
pub mod renderer;
pub mod tool;

pub use app::WhiteboardApp;
pub use command::{Command, CommandContext, CommandError};
pub use config::WhiteboardConfig;
pub use document::Document;
pub use element::{CircleMode, DrawCommand};
pub use error::{WhiteboardError, WhiteboardResult};
pub use input::PointerEvent;
pub use interpreter::{Gesture, InterpreterConfig, Step, StrokeInterpreter};
pub use raster::Surface;
pub use renderer::{CanvasRenderer, RenderStyle};
pub use tool::{ToolKind, ToolState};

use egui::{ColorImage, TextureHandle, TextureOptions, Vec2};

use crate::command::{Command, CommandContext};
use crate::config::WhiteboardConfig;
use crate::dialogs::{
    DeferredPrompt, FileChooser, FileFilter, FileMode, NativeFileChooser, StatusLog, StatusSink,
    TextRequest,
};
use crate::document::Document;
use crate::element::DrawCommand;
use crate::file_handler::{self, PendingSave};
use crate::input::{PointerEvent, PointerInput};
use crate::interpreter::{InterpreterConfig, StrokeInterpreter};
use crate::panels;
use crate::raster::{self, GridStyle};
use crate::renderer::{CanvasRenderer, RenderStyle};
use crate::tool::ToolState;

/// Text prompt shown as a modal window
#[derive(Debug)]
pub(crate) struct TextDialog {
    pub(crate) request: TextRequest,
    pub(crate) buffer: String,
    pub(crate) focused: bool,
}

impl TextDialog {
    fn new(request: TextRequest) -> Self {
        Self {
            request,
            buffer: String::new(),
            focused: false,
        }
    }
}

/// We derive Deserialize/Serialize so the toolbar state and config persist on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct WhiteboardApp {
    pub(crate) tool: ToolState,
    pub(crate) config: WhiteboardConfig,

    // Drawn content is not persisted
    #[serde(skip)]
    pub(crate) document: Document,
    #[serde(skip)]
    interpreter: StrokeInterpreter,
    #[serde(skip)]
    pointer: PointerInput,
    #[serde(skip)]
    prompt: DeferredPrompt,
    #[serde(skip)]
    pub(crate) text_dialog: Option<TextDialog>,
    #[serde(skip)]
    pub(crate) status: StatusLog,
    #[serde(skip)]
    renderer: Option<CanvasRenderer>,
    #[serde(skip)]
    pub(crate) texture: Option<TextureHandle>,
    #[serde(skip)]
    pub(crate) preview: Option<DrawCommand>,
    #[serde(skip)]
    pub(crate) pending_save: Option<PendingSave>,
    #[serde(skip)]
    file_chooser: NativeFileChooser,
    #[serde(skip)]
    pub(crate) canvas_size: [u32; 2],
}

impl Default for WhiteboardApp {
    fn default() -> Self {
        let config = WhiteboardConfig::default();
        Self {
            tool: ToolState::default(),
            canvas_size: config.canvas_size,
            config,
            document: Document::new(),
            interpreter: StrokeInterpreter::new(),
            pointer: PointerInput::new(),
            prompt: DeferredPrompt::default(),
            text_dialog: None,
            status: StatusLog::new("Ready - Select a tool to start drawing"),
            renderer: None,
            texture: None,
            preview: None,
            pending_save: None,
            file_chooser: NativeFileChooser,
        }
    }
}

impl WhiteboardApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        match WhiteboardConfig::from_env() {
            Some(Ok(config)) => app.config = config,
            Some(Err(err)) => app.status.error(&format!("Error loading config: {err}")),
            None => {}
        }
        if let Err(err) = app.config.validate() {
            log::warn!("Stored config is invalid ({err}), using defaults");
            app.config = WhiteboardConfig::default();
        }
        // Re-clamp in case the stored value predates the slider range
        let width = app.tool.brush_width();
        app.tool.set_brush_width(width);
        app.canvas_size = app.config.canvas_size;

        log::info!("Whiteboard started with {:?}", app.tool);
        app
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tool(&self) -> &ToolState {
        &self.tool
    }

    fn render_style(&self) -> RenderStyle {
        RenderStyle {
            background: self.config.background,
            grid: self.tool.grid_visible.then_some(GridStyle {
                spacing: self.config.grid_spacing,
                color: self.config.grid_color,
                width: self.config.grid_width,
            }),
        }
    }

    fn canvas_vec(&self) -> Vec2 {
        Vec2::new(self.canvas_size[0] as f32, self.canvas_size[1] as f32)
    }

    /// Execute a toolbar command, reporting failures to the user
    pub fn execute_command(&mut self, command: Command) {
        log::debug!("Executing {command:?}");
        let canvas_size = self.canvas_vec();
        let mut ctx = CommandContext::new(
            &mut self.tool,
            &mut self.document,
            &mut self.status,
            &self.config,
            canvas_size,
        );
        if let Err(err) = command.execute(&mut ctx) {
            self.status.error(&err.to_string());
        }
    }

    /// Feed a canvas pointer event through the stroke interpreter
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        let config = InterpreterConfig::from(&self.config);
        let step = self
            .interpreter
            .handle(&self.tool, &config, event, &mut self.prompt);
        self.preview = step.preview;
        if !step.commands.is_empty() {
            self.execute_command(Command::Draw(step.commands));
        }
        if let Some(request) = self.prompt.take_pending() {
            self.open_text_dialog(request);
        }
    }

    /// Translate the canvas response into pointer events.
    ///
    /// The pointer state is always tracked, but events are dropped while the
    /// text prompt is open so the modal owns the pointer.
    pub(crate) fn process_canvas_input(
        &mut self,
        response: &egui::Response,
        canvas_rect: egui::Rect,
    ) {
        let events = self.pointer.process(response, canvas_rect);
        if self.text_dialog.is_some() {
            if !events.is_empty() {
                log::trace!("Text prompt open, dropping {} pointer events", events.len());
            }
            return;
        }
        for event in events {
            self.handle_pointer(event);
        }
    }

    pub(crate) fn open_text_dialog(&mut self, request: TextRequest) {
        self.text_dialog = Some(TextDialog::new(request));
    }

    /// Close the text prompt and place `text` where it was requested
    pub(crate) fn submit_text_dialog(&mut self, text: String) {
        if let Some(dialog) = self.text_dialog.take() {
            let position = dialog.request.position;
            self.execute_command(Command::AddText { text, position });
        }
    }

    pub(crate) fn cancel_text_dialog(&mut self) {
        if self.text_dialog.take().is_some() {
            log::debug!("Text prompt cancelled");
        }
    }

    pub(crate) fn set_tool(&mut self, tool: crate::tool::ToolKind) {
        if self.interpreter.is_active() {
            self.interpreter.cancel();
            self.preview = None;
        }
        self.execute_command(Command::SetTool(tool));
    }

    /// Re-render the canvas if needed and upload it to the GPU
    pub(crate) fn refresh_canvas(&mut self, ctx: &egui::Context) {
        let style = self.render_style();
        if self.renderer.is_none() {
            match CanvasRenderer::new(self.canvas_size, style, raster::default_font()) {
                Ok(renderer) => self.renderer = Some(renderer),
                Err(err) => {
                    log::error!("Failed to create canvas renderer: {err}");
                    return;
                }
            }
        }
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        let changed = match renderer.update(&self.document, self.canvas_size, style) {
            Ok(changed) => changed,
            Err(err) => {
                log::error!("Failed to render canvas: {err}");
                return;
            }
        };

        if changed || self.texture.is_none() {
            let surface = renderer.surface();
            let image = ColorImage::from_rgba_premultiplied(
                [surface.width() as usize, surface.height() as usize],
                surface.data(),
            );
            match &mut self.texture {
                Some(texture) => texture.set(image, TextureOptions::NEAREST),
                None => {
                    self.texture =
                        Some(ctx.load_texture("whiteboard_canvas", image, TextureOptions::NEAREST));
                }
            }
        }
    }

    fn pick_image(&mut self, title: &str) -> Option<std::sync::Arc<image::RgbaImage>> {
        let path = self
            .file_chooser
            .choose(title, FileMode::Open, &FileFilter::images())?;
        match file_handler::load(&path) {
            Ok(bitmap) => Some(bitmap),
            Err(err) => {
                self.status.error(&format!("Error loading image: {err}"));
                None
            }
        }
    }

    pub(crate) fn add_image(&mut self) {
        if let Some(bitmap) = self.pick_image("Open Image File") {
            self.execute_command(Command::AddImage(bitmap));
        }
    }

    pub(crate) fn load_image(&mut self) {
        if let Some(bitmap) = self.pick_image("Load Image to Canvas") {
            self.execute_command(Command::LoadImage(bitmap));
        }
    }

    pub(crate) fn save_canvas(&mut self) {
        if self.pending_save.is_some() {
            self.status.status("A save is already in progress");
            return;
        }
        let Some(path) = self
            .file_chooser
            .choose("Save Whiteboard", FileMode::Save, &FileFilter::exports())
        else {
            return;
        };
        let Some(renderer) = &self.renderer else {
            self.status.error("Error saving file: canvas is not ready");
            return;
        };
        let snapshot = renderer.snapshot();
        self.status.status(&format!("Saving {}...", path.display()));
        self.pending_save = Some(file_handler::save_in_background(
            snapshot,
            path,
            self.config.jpeg_quality,
        ));
    }

    fn poll_pending_save(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.pending_save.as_mut() else {
            return;
        };
        match pending.poll() {
            None => ctx.request_repaint_after(std::time::Duration::from_millis(50)),
            Some(result) => {
                let name = pending
                    .path()
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                match result {
                    Ok(()) => self
                        .status
                        .info("Success", &format!("Canvas saved successfully: {name}")),
                    Err(err) => self.status.error(&format!("Error saving file: {err}")),
                }
                self.pending_save = None;
            }
        }
    }
}

impl eframe::App for WhiteboardApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_pending_save(ctx);

        panels::action_bar(self, ctx);
        panels::status_bar(self, ctx);
        panels::tools_panel(self, ctx);
        panels::central_panel(self, ctx);
        panels::text_prompt_window(self, ctx);
        panels::alert_window(self, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolKind;
    use egui::{Color32, Pos2};

    fn press_release(app: &mut WhiteboardApp, pos: Pos2) {
        app.handle_pointer(PointerEvent::Press(pos));
        app.handle_pointer(PointerEvent::Release(pos));
    }

    #[test]
    fn test_text_press_opens_prompt_and_submit_commits_once() {
        let mut app = WhiteboardApp::default();
        app.set_tool(ToolKind::Text);
        press_release(&mut app, Pos2::new(50.0, 50.0));

        let dialog = app.text_dialog.as_ref().expect("text prompt should be open");
        assert_eq!(dialog.request.position, Pos2::new(50.0, 50.0));
        assert!(app.document().is_empty());

        app.submit_text_dialog("hi".to_owned());
        assert!(app.text_dialog.is_none());
        assert_eq!(
            app.document().commands(),
            &[DrawCommand::Text {
                origin: Pos2::new(50.0, 50.0),
                text: "hi".to_owned(),
                color: Color32::BLACK,
                size: 6.0,
            }]
        );
    }

    #[test]
    fn test_cancelled_or_blank_prompt_commits_nothing() {
        let mut app = WhiteboardApp::default();
        app.set_tool(ToolKind::Text);

        press_release(&mut app, Pos2::new(10.0, 10.0));
        app.cancel_text_dialog();
        press_release(&mut app, Pos2::new(20.0, 20.0));
        app.submit_text_dialog("   ".to_owned());

        assert!(app.text_dialog.is_none());
        assert!(app.document().is_empty());
    }

    #[test]
    fn test_drawing_resumes_after_text_prompt() {
        let mut app = WhiteboardApp::default();
        app.set_tool(ToolKind::Text);
        press_release(&mut app, Pos2::new(50.0, 50.0));
        app.submit_text_dialog("note".to_owned());

        app.set_tool(ToolKind::Line);
        app.handle_pointer(PointerEvent::Press(Pos2::new(0.0, 0.0)));
        app.handle_pointer(PointerEvent::Drag(Pos2::new(5.0, 5.0)));
        assert!(app.preview.is_some());
        app.handle_pointer(PointerEvent::Release(Pos2::new(10.0, 0.0)));

        assert!(app.preview.is_none());
        assert_eq!(app.document().len(), 2);
        assert_eq!(app.document().commands()[1].name(), "line");
    }
}

//! Capabilities the whiteboard core calls out to: text prompts, file
//! choosers and the status/alert sink.

use std::collections::VecDeque;
use std::path::PathBuf;

use egui::Pos2;

/// Extensions offered when opening an image
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// A request for a line of text from the user
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub title: String,
    pub prompt: String,
    /// Where the text will be placed
    pub position: Pos2,
}

impl TextRequest {
    pub fn at(position: Pos2) -> Self {
        Self {
            title: "Add Text".to_owned(),
            prompt: format!(
                "Enter text to add at position ({}, {}):",
                position.x as i32, position.y as i32
            ),
            position,
        }
    }
}

/// Synchronously asks the user for text. `None` means cancelled.
pub trait TextPrompt {
    fn request_text(&mut self, request: &TextRequest) -> Option<String>;
}

/// Prompt for immediate-mode UIs, which cannot block inside an event handler.
///
/// It always answers `None` and remembers the request; the UI shows its own
/// modal and feeds the answer back through
/// [`crate::interpreter::text_command`].
#[derive(Debug, Default)]
pub struct DeferredPrompt {
    pending: Option<TextRequest>,
}

impl DeferredPrompt {
    pub fn take_pending(&mut self) -> Option<TextRequest> {
        self.pending.take()
    }
}

impl TextPrompt for DeferredPrompt {
    fn request_text(&mut self, request: &TextRequest) -> Option<String> {
        log::debug!("Deferring text prompt at {:?}", request.position);
        self.pending = Some(request.clone());
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Open,
    Save,
}

/// A named set of extensions for a file dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

impl FileFilter {
    pub fn images() -> Vec<FileFilter> {
        vec![FileFilter {
            name: "Image Files",
            extensions: IMAGE_EXTENSIONS,
        }]
    }

    pub fn exports() -> Vec<FileFilter> {
        vec![
            FileFilter {
                name: "PNG files (*.png)",
                extensions: &["png"],
            },
            FileFilter {
                name: "JPEG files (*.jpg)",
                extensions: &["jpg", "jpeg"],
            },
            // Unknown extensions are written as PNG
            FileFilter {
                name: "All Files",
                extensions: &["*"],
            },
        ]
    }
}

/// Asks the user for a path. `None` means cancelled.
pub trait FileChooser {
    fn choose(&mut self, title: &str, mode: FileMode, filters: &[FileFilter]) -> Option<PathBuf>;
}

/// File chooser backed by the platform's native dialogs
#[derive(Debug, Default)]
pub struct NativeFileChooser;

impl FileChooser for NativeFileChooser {
    fn choose(&mut self, title: &str, mode: FileMode, filters: &[FileFilter]) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title(title);
        for filter in filters {
            dialog = dialog.add_filter(filter.name, filter.extensions);
        }
        let path = match mode {
            FileMode::Open => dialog.pick_file(),
            FileMode::Save => dialog.set_file_name("whiteboard.png").save_file(),
        };
        if path.is_none() {
            log::debug!("{title}: cancelled");
        }
        path
    }
}

/// Receives human-readable status lines and alert requests
pub trait StatusSink {
    fn status(&mut self, message: &str);
    fn info(&mut self, title: &str, message: &str);
    fn error(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Error,
}

/// An alert the UI still has to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

/// Status sink that keeps the latest status line and queues alerts for the UI
#[derive(Debug, Default)]
pub struct StatusLog {
    status: String,
    alerts: VecDeque<Alert>,
}

impl StatusLog {
    pub fn new(initial: &str) -> Self {
        Self {
            status: initial.to_owned(),
            alerts: VecDeque::new(),
        }
    }

    pub fn current(&self) -> &str {
        &self.status
    }

    pub fn front_alert(&self) -> Option<&Alert> {
        self.alerts.front()
    }

    pub fn dismiss_alert(&mut self) -> Option<Alert> {
        self.alerts.pop_front()
    }
}

impl StatusSink for StatusLog {
    fn status(&mut self, message: &str) {
        log::info!("Status: {message}");
        self.status = message.to_owned();
    }

    fn info(&mut self, title: &str, message: &str) {
        log::info!("{title}: {message}");
        self.status = message.to_owned();
        self.alerts.push_back(Alert {
            kind: AlertKind::Info,
            title: title.to_owned(),
            message: message.to_owned(),
        });
    }

    fn error(&mut self, message: &str) {
        log::error!("{message}");
        self.alerts.push_back(Alert {
            kind: AlertKind::Error,
            title: "Error".to_owned(),
            message: message.to_owned(),
        });
    }
}

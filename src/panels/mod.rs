mod action_bar;
mod central_panel;
mod dialogs;
mod tools_panel;

pub use action_bar::{action_bar, status_bar};
pub use central_panel::central_panel;
pub use dialogs::{alert_window, text_prompt_window};
pub use tools_panel::tools_panel;

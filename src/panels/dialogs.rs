use egui::{Align2, Key};

use crate::WhiteboardApp;
use crate::dialogs::AlertKind;

enum PromptOutcome {
    Open,
    Submit(String),
    Cancel,
}

pub fn text_prompt_window(app: &mut WhiteboardApp, ctx: &egui::Context) {
    let Some(dialog) = app.text_dialog.as_mut() else {
        return;
    };

    let mut outcome = PromptOutcome::Open;
    egui::Window::new(dialog.request.title.as_str())
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(&dialog.request.prompt);
            let edit = ui.text_edit_singleline(&mut dialog.buffer);
            if !dialog.focused {
                edit.request_focus();
                dialog.focused = true;
            }
            let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

            ui.horizontal(|ui| {
                if ui.button("OK").clicked() || entered {
                    outcome = PromptOutcome::Submit(dialog.buffer.clone());
                }
                if ui.button("Cancel").clicked() || ui.input(|i| i.key_pressed(Key::Escape)) {
                    outcome = PromptOutcome::Cancel;
                }
            });
        });

    match outcome {
        PromptOutcome::Open => {}
        PromptOutcome::Cancel => app.cancel_text_dialog(),
        PromptOutcome::Submit(text) => app.submit_text_dialog(text),
    }
}

pub fn alert_window(app: &mut WhiteboardApp, ctx: &egui::Context) {
    let Some(alert) = app.status.front_alert() else {
        return;
    };

    let mut dismissed = false;
    let title = match alert.kind {
        AlertKind::Info => alert.title.clone(),
        AlertKind::Error => format!("⚠ {}", alert.title),
    };
    egui::Window::new(title)
        .id(egui::Id::new("alert_window"))
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_TOP, [0.0, 40.0])
        .show(ctx, |ui| {
            ui.label(&alert.message);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        app.status.dismiss_alert();
    }
}

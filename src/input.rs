use egui::{PointerButton, Pos2, Rect, Response};

/// A pointer-state transition in surface-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press(Pos2),
    Drag(Pos2),
    Release(Pos2),
}

impl PointerEvent {
    pub fn position(&self) -> Pos2 {
        match self {
            Self::Press(pos) | Self::Drag(pos) | Self::Release(pos) => *pos,
        }
    }
}

/// Turns the canvas widget's response into pointer events.
///
/// Only the primary button is interpreted. Positions are converted so the
/// canvas' top-left corner is the origin.
#[derive(Debug, Default)]
pub struct PointerInput {
    pressed: bool,
    last_pos: Option<Pos2>,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_local(canvas_rect: Rect, pos: Pos2) -> Pos2 {
        (pos - canvas_rect.min).to_pos2()
    }

    /// Events for the current frame, in the order they happened.
    ///
    /// A new press always starts a new gesture, even if the release of the
    /// previous one was never seen.
    pub fn process(&mut self, response: &Response, canvas_rect: Rect) -> Vec<PointerEvent> {
        let pointer_pos = response.interact_pointer_pos();
        let mut events = Vec::new();

        let started = response.drag_started_by(PointerButton::Primary)
            || (!self.pressed && response.clicked_by(PointerButton::Primary));
        if started {
            if let Some(pos) = pointer_pos {
                if self.pressed {
                    log::debug!("Press without a matching release, restarting the gesture");
                }
                let local = Self::to_local(canvas_rect, pos);
                events.push(PointerEvent::Press(local));
                self.pressed = true;
                self.last_pos = Some(local);
            }
        }

        if self.pressed && response.dragged_by(PointerButton::Primary) {
            if let Some(pos) = pointer_pos {
                let local = Self::to_local(canvas_rect, pos);
                if self.last_pos != Some(local) {
                    events.push(PointerEvent::Drag(local));
                    self.last_pos = Some(local);
                }
            }
        }

        let released = response.drag_stopped_by(PointerButton::Primary)
            || response.clicked_by(PointerButton::Primary);
        if self.pressed && released {
            let local = pointer_pos
                .map(|pos| Self::to_local(canvas_rect, pos))
                .or(self.last_pos)
                .unwrap_or_default();
            events.push(PointerEvent::Release(local));
            self.pressed = false;
            self.last_pos = None;
        }

        events
    }
}

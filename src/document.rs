use crate::element::DrawCommand;

/// Ordered list of everything drawn on the whiteboard.
///
/// Commands are only ever appended or cleared. `revision` changes whenever
/// the list changes in a way other than appending, so a renderer that has
/// replayed a prefix knows whether that prefix is still valid.
#[derive(Debug, Clone, Default)]
pub struct Document {
    commands: Vec<DrawCommand>,
    revision: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        log::trace!("Document: push {}", command.name());
        self.commands.push(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = DrawCommand>) {
        for command in commands {
            self.push(command);
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Remove every command
    pub fn clear(&mut self) {
        log::debug!("Document: clearing {} commands", self.commands.len());
        self.commands.clear();
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Color32, Pos2};

    fn segment(x: f32) -> DrawCommand {
        DrawCommand::Segment {
            from: Pos2::new(x, 0.0),
            to: Pos2::new(x + 1.0, 0.0),
            color: Color32::BLACK,
            width: 1.0,
        }
    }

    #[test]
    fn test_append_keeps_order_and_revision() {
        let mut doc = Document::new();
        doc.extend([segment(0.0), segment(1.0)]);
        doc.push(segment(2.0));

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.revision(), 0);
        assert_eq!(doc.commands()[2], segment(2.0));
    }

    #[test]
    fn test_clear_bumps_revision() {
        let mut doc = Document::new();
        doc.push(segment(0.0));
        doc.clear();

        assert!(doc.is_empty());
        assert_eq!(doc.revision(), 1);
    }
}

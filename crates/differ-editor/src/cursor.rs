// Caret management for the editor.

use differ_core::Position;

use crate::buffer::Buffer;

pub struct EditorCursor {
    pub position: Position,
}

impl EditorCursor {
    pub fn new() -> Self {
        Self { position: Position::default() }
    }

    /// Move to `pos`, snapped into the buffer.
    pub fn set_position(&mut self, pos: Position, buffer: &Buffer) {
        self.position = buffer.clamp(pos);
    }
}

impl Default for EditorCursor {
    fn default() -> Self {
        Self::new()
    }
}

// Undo/redo subsystem for the editor buffer.

use differ_core::Position;

use crate::buffer::Buffer;

/// A single reversible edit operation.
#[derive(Debug, Clone)]
pub(crate) enum EditOp {
    /// Deleted `start..end`; `deleted` is the removed text.
    DeleteRange { start: Position, end: Position, deleted: String },
    /// Inserted `text` at `pos`, ending at `end`.
    InsertText { pos: Position, text: String, end: Position },
}

impl Buffer {
    /// Undo the last edit. Returns the cursor position to restore, or None if nothing to undo.
    pub fn undo(&mut self) -> Option<Position> {
        let (op, cursor_before) = self.undo_stack.pop()?;
        match &op {
            EditOp::DeleteRange { start, deleted, .. } => {
                self.splice_in(*start, deleted);
            }
            EditOp::InsertText { pos, end, .. } => {
                self.remove_span(*pos, *end);
            }
        }
        self.redo_stack.push((op, cursor_before));
        Some(cursor_before)
    }

    /// Redo the last undone edit. Returns the new cursor position, or None if nothing to redo.
    pub fn redo(&mut self) -> Option<Position> {
        let (op, cursor_before) = self.redo_stack.pop()?;
        let new_cursor = match &op {
            EditOp::DeleteRange { start, end, .. } => {
                self.remove_span(*start, *end);
                *start
            }
            EditOp::InsertText { pos, text, .. } => self.splice_in(*pos, text),
        };
        self.undo_stack.push((op, cursor_before));
        Some(new_cursor)
    }
}

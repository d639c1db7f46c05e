// differ-editor: text buffers for the two sides of a comparison and the
// view controller that keeps them in step.

pub mod buffer;
pub mod cursor;
mod undo;
pub mod view;

use std::io;
use std::ops::Range;
use std::path::Path;

use buffer::Buffer;
use cursor::EditorCursor;
use differ_core::{EditorSurface, Position};

pub use view::{CopyOutcome, DiffView, Direction, JumpOutcome};

/// One side of the diff view: a buffer, its caret and the first visible line.
pub struct EditorState {
    pub buffer: Buffer,
    pub cursor: EditorCursor,
    scroll_offset: usize,
}

impl EditorState {
    pub fn from_text(text: &str) -> Self {
        Self::with_buffer(Buffer::from_text(text))
    }

    /// Open a file for comparison.
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self::with_buffer(Buffer::from_file(path)?))
    }

    fn with_buffer(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor: EditorCursor::new(),
            scroll_offset: 0,
        }
    }

    pub fn undo(&mut self) -> bool {
        match self.buffer.undo() {
            Some(pos) => {
                self.cursor.set_position(pos, &self.buffer);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.buffer.redo() {
            Some(pos) => {
                self.cursor.set_position(pos, &self.buffer);
                true
            }
            None => false,
        }
    }

    pub fn file_name(&self) -> &str {
        self.buffer
            .file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled")
    }

    /// Display name with parent directory: "parent/filename.ext" or just "filename.ext".
    pub fn file_display_name(&self) -> String {
        match self.buffer.file_path.as_ref() {
            Some(path) => {
                let name = self.file_name();
                if let Some(parent) = path.parent().and_then(|p| p.file_name()).and_then(|n| n.to_str()) {
                    format!("{}/{}", parent, name)
                } else {
                    name.to_string()
                }
            }
            None => "Untitled".to_string(),
        }
    }

}

impl EditorSurface for EditorState {
    fn text(&self) -> String {
        self.buffer.text()
    }

    fn delete(&mut self, range: Range<Position>) {
        let pos = self.buffer.delete_range(range.start, range.end);
        self.cursor.set_position(pos, &self.buffer);
    }

    fn insert(&mut self, pos: Position, text: &str) {
        let end = self.buffer.insert_text(pos, text);
        self.cursor.set_position(end, &self.buffer);
    }

    fn caret(&self) -> Position {
        self.cursor.position
    }

    fn set_caret(&mut self, pos: Position) {
        self.cursor.set_position(pos, &self.buffer);
    }

    fn scroll_top(&self) -> usize {
        self.scroll_offset
    }

    fn set_scroll_top(&mut self, line: usize) {
        let max = self.buffer.line_count().saturating_sub(1);
        self.scroll_offset = line.min(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_edits_move_caret() {
        let mut ed = EditorState::from_text("a\nb\n");
        ed.insert(Position::line_start(1), "x\n");
        assert_eq!(ed.text(), "a\nx\nb\n");
        assert_eq!(ed.caret(), Position::line_start(2));

        ed.delete(Position::line_start(0)..Position::line_start(2));
        assert_eq!(ed.text(), "b\n");
        assert_eq!(ed.caret(), Position::line_start(0));
    }

    #[test]
    fn undo_and_redo_restore_caret() {
        let mut ed = EditorState::from_text("one\n");
        ed.insert(Position::line_start(1), "two\n");
        assert!(ed.undo());
        assert_eq!(ed.text(), "one\n");
        assert_eq!(ed.caret(), Position::line_start(1));
        assert!(ed.redo());
        assert_eq!(ed.text(), "one\ntwo\n");
        assert!(!ed.redo());
    }

    #[test]
    fn scroll_top_is_clamped() {
        let mut ed = EditorState::from_text("a\nb\nc");
        ed.set_scroll_top(10);
        assert_eq!(ed.scroll_top(), 2);
        ed.set_scroll_top(1);
        assert_eq!(ed.scroll_top(), 1);
    }

    #[test]
    fn display_name_includes_parent() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("src");
        std::fs::create_dir(&sub).unwrap();
        let path = sub.join("main.rs");
        std::fs::write(&path, "fn main() {}\n").unwrap();

        let ed = EditorState::open(&path).unwrap();
        assert_eq!(ed.file_name(), "main.rs");
        assert_eq!(ed.file_display_name(), "src/main.rs");
        assert_eq!(EditorState::from_text("").file_display_name(), "Untitled");
    }
}

// Text buffer: line-based storage with range editing and undo.
//
// Lines are stored without their `'\n'`; `text()` joins them back, so a
// buffer round-trips its input exactly. A `"\r\n"` file keeps the `'\r'` at
// the end of each stored line.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use differ_core::Position;

use crate::undo::EditOp;

/// Find the largest byte offset <= idx that is a valid char boundary in the string.
pub fn floor_char_boundary(s: &str, idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    let mut i = idx;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

pub struct Buffer {
    pub lines: Vec<String>,
    pub file_path: Option<PathBuf>,
    pub(crate) undo_stack: Vec<(EditOp, Position)>, // (op, cursor_before)
    pub(crate) redo_stack: Vec<(EditOp, Position)>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::from_text("")
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(String::from).collect(),
            file_path: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn from_file(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut buffer = Self::from_text(&content);
        buffer.file_path = Some(path.to_path_buf());
        Ok(buffer)
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(|s| s.as_str())
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Nearest valid position. Anything past the last line is the end of text.
    pub fn clamp(&self, pos: Position) -> Position {
        let last = self.lines.len() - 1;
        if pos.line > last {
            return Position::new(last, self.lines[last].len());
        }
        let line = &self.lines[pos.line];
        Position::new(pos.line, floor_char_boundary(line, pos.col))
    }

    /// Delete text between two positions, returning the new cursor position (start).
    /// Both ends are clamped; an inverted range deletes nothing.
    pub fn delete_range(&mut self, start: Position, end: Position) -> Position {
        let start = self.clamp(start);
        let end = self.clamp(end);
        if end <= start {
            return start;
        }
        let deleted = self.remove_span(start, end);
        self.undo_stack.push((EditOp::DeleteRange { start, end, deleted }, start));
        self.redo_stack.clear();
        start
    }

    /// Insert a block of text at `pos`, returning the end position after insertion.
    /// The entire insertion is a single undo entry.
    pub fn insert_text(&mut self, pos: Position, text: &str) -> Position {
        let pos = self.clamp(pos);
        if text.is_empty() {
            return pos;
        }
        let end = self.splice_in(pos, text);
        self.undo_stack.push((EditOp::InsertText { pos, text: text.to_string(), end }, pos));
        self.redo_stack.clear();
        end
    }

    /// Remove `start..end` (both valid, ordered) and return the removed text.
    pub(crate) fn remove_span(&mut self, start: Position, end: Position) -> String {
        if start.line == end.line {
            return self.lines[start.line].drain(start.col..end.col).collect();
        }
        let mut removed = self.lines[start.line][start.col..].to_string();
        for line in &self.lines[start.line + 1..end.line] {
            removed.push('\n');
            removed.push_str(line);
        }
        removed.push('\n');
        removed.push_str(&self.lines[end.line][..end.col]);

        let suffix = self.lines[end.line][end.col..].to_string();
        self.lines[start.line].truncate(start.col);
        self.lines[start.line].push_str(&suffix);
        self.lines.drain(start.line + 1..=end.line);
        removed
    }

    /// Insert `text` at a valid `pos` and return the position after it.
    pub(crate) fn splice_in(&mut self, pos: Position, text: &str) -> Position {
        let suffix = self.lines[pos.line].split_off(pos.col);
        let mut pieces = text.split('\n');
        if let Some(first) = pieces.next() {
            self.lines[pos.line].push_str(first);
        }
        let mut end = Position::new(pos.line, self.lines[pos.line].len());
        for piece in pieces {
            end = Position::new(end.line + 1, piece.len());
            self.lines.insert(end.line, piece.to_string());
        }
        self.lines[end.line].push_str(&suffix);
        end
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

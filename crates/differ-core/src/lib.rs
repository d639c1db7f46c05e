use std::fmt;
use std::ops::Range;

// ──────────────────────────────────────────────
// Sides & positions
// ──────────────────────────────────────────────

/// One of the two documents being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The original ("left") document.
    A,
    /// The modified ("right") document.
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// A caret position inside an editor. `col` is a byte offset within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Start of `line`.
    pub const fn line_start(line: usize) -> Self {
        Self { line, col: 0 }
    }
}

// ──────────────────────────────────────────────
// Alignment opcodes
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpTag {
    Equal,
    Insert,
    Delete,
    Replace,
}

/// One aligned operation: `a_start..a_end` in A corresponds to
/// `b_start..b_end` in B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opcode {
    pub tag: OpTag,
    pub a_start: usize,
    pub a_end: usize,
    pub b_start: usize,
    pub b_end: usize,
}

impl Opcode {
    pub const fn new(tag: OpTag, a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> Self {
        Self { tag, a_start, a_end, b_start, b_end }
    }

    pub fn is_equal(&self) -> bool {
        self.tag == OpTag::Equal
    }
}

// ──────────────────────────────────────────────
// Difference map entries
// ──────────────────────────────────────────────

/// Line ranges of one non-equal block: `a0..a1` in A, `b0..b1` in B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiffBlock {
    pub a0: usize,
    pub a1: usize,
    pub b0: usize,
    pub b1: usize,
}

impl DiffBlock {
    pub const fn new(a0: usize, a1: usize, b0: usize, b1: usize) -> Self {
        Self { a0, a1, b0, b1 }
    }

    pub fn start(&self, side: Side) -> usize {
        match side {
            Side::A => self.a0,
            Side::B => self.b0,
        }
    }

    pub fn end(&self, side: Side) -> usize {
        match side {
            Side::A => self.a1,
            Side::B => self.b1,
        }
    }

    pub fn range(&self, side: Side) -> Range<usize> {
        self.start(side)..self.end(side)
    }
}

impl From<Opcode> for DiffBlock {
    fn from(op: Opcode) -> Self {
        Self::new(op.a_start, op.a_end, op.b_start, op.b_end)
    }
}

impl fmt::Display for DiffBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.a0, self.a1, self.b0, self.b1)
    }
}

// ──────────────────────────────────────────────
// Diff events
// ──────────────────────────────────────────────

/// Line decoration attached to a fuzzily matched line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoration {
    /// Line shifted or reformatted without losing (A) or gaining (B) text. Yellow.
    Modified,
    /// Line on A lost characters. Red.
    Removed,
    /// Line on B gained characters. Green.
    Added,
}

/// A single rendering instruction produced by a comparison.
///
/// Columns and lengths of span events are counted in `char`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffEvent {
    /// Line of A with no counterpart in B.
    LineDeleted { line: usize },
    /// Line of B with no counterpart in A.
    LineAdded { line: usize },
    /// Line paired with a line on the other side, but not identical in place.
    LineChanged { side: Side, line: usize },
    /// `lines` blank line-units to show on `side` right before `before_line`.
    Gap { side: Side, before_line: usize, lines: usize },
    /// Characters removed from an A line.
    SpanDeleted { line: usize, col: usize, len: usize },
    /// Characters added to a B line.
    SpanAdded { line: usize, col: usize, len: usize },
    Decoration { side: Side, line: usize, class: Decoration },
}

impl DiffEvent {
    pub fn side(&self) -> Side {
        match *self {
            DiffEvent::LineDeleted { .. } | DiffEvent::SpanDeleted { .. } => Side::A,
            DiffEvent::LineAdded { .. } | DiffEvent::SpanAdded { .. } => Side::B,
            DiffEvent::LineChanged { side, .. }
            | DiffEvent::Gap { side, .. }
            | DiffEvent::Decoration { side, .. } => side,
        }
    }

    pub fn line(&self) -> usize {
        match *self {
            DiffEvent::LineDeleted { line }
            | DiffEvent::LineAdded { line }
            | DiffEvent::LineChanged { line, .. }
            | DiffEvent::SpanDeleted { line, .. }
            | DiffEvent::SpanAdded { line, .. }
            | DiffEvent::Decoration { line, .. } => line,
            DiffEvent::Gap { before_line, .. } => before_line,
        }
    }
}

// ──────────────────────────────────────────────
// Colors
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("incorrect color token: {0}")]
pub struct ColorParseError(pub String);

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse an HTML color token, `#RRGGBB` or the `#RGB` shorthand.
    pub fn from_html(token: &str) -> Result<Self, ColorParseError> {
        let hex = token.trim().trim_start_matches('#');
        let err = || ColorParseError(token.trim().to_string());
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return Err(err()),
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| err());
        Ok(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }

    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
}

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiffError {
    #[error("cutoff must be within [0, 1], got {0}")]
    InvalidCutoff(f64),
    #[error("similarity ratio must be within [0, 1], got {0}")]
    InvalidRatio(f64),
    #[error("line {line} is out of range for side {side} ({len} lines)")]
    LineOutOfRange { side: Side, line: usize, len: usize },
}

// ──────────────────────────────────────────────
// Trait: Similarity
// ──────────────────────────────────────────────

/// Scores how alike two lines are, in `[0, 1]`.
///
/// The two quick estimates must never be smaller than `ratio` for the same
/// inputs: the replace refiner skips a pair as soon as an estimate cannot
/// beat the best ratio seen so far. The defaults (`1.0`) never prune.
pub trait Similarity {
    fn ratio(&self, a: &str, b: &str) -> f64;

    fn quick_ratio(&self, _a: &str, _b: &str) -> f64 {
        1.0
    }

    fn real_quick_ratio(&self, _a: &str, _b: &str) -> f64 {
        1.0
    }
}

// ──────────────────────────────────────────────
// Trait: RenderSink
// ──────────────────────────────────────────────

/// Receives the events of a comparison and turns them into something
/// visible: line backgrounds, gap spacers (in whole line units), margin
/// glyphs, bookmarks.
pub trait RenderSink {
    /// Drop everything painted by the previous comparison.
    fn clear(&mut self);
    fn event(&mut self, event: &DiffEvent);
}

// ──────────────────────────────────────────────
// Trait: EditorSurface
// ──────────────────────────────────────────────

/// An opaque mutable text buffer with a caret, as seen by navigation and
/// copy. Line numbers match the line sequences built from `text()`.
pub trait EditorSurface {
    fn text(&self) -> String;
    /// Delete `range`. A position past the last line means end of text.
    fn delete(&mut self, range: Range<Position>);
    fn insert(&mut self, pos: Position, text: &str);
    fn caret(&self) -> Position;
    fn set_caret(&mut self, pos: Position);
    fn scroll_top(&self) -> usize;
    fn set_scroll_top(&mut self, line: usize);
}

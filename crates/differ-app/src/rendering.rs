// Terminal rendering: collects diff events and lays both files out side by
// side, with gap rows keeping equal regions aligned.

use std::collections::HashMap;
use std::fmt::Write;

use differ_core::{Decoration, DiffEvent, RenderSink, Side};
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthChar;

use crate::theme::{decoration_glyph, to_rgb, DiffTheme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Ansi,
    /// No escape codes: spans are bracketed as `[-x-]` and `{+x+}`.
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paint {
    None,
    Line,
    Span,
}

/// What a comparison painted on one side.
#[derive(Debug, Default)]
struct SideMarks {
    /// Margin glyph per marked line.
    glyphs: HashMap<usize, char>,
    decorations: HashMap<usize, Decoration>,
    /// Char ranges `(col, len)` per line.
    spans: HashMap<usize, Vec<(usize, usize)>>,
    /// Blank rows to insert before a line.
    gaps: HashMap<usize, usize>,
}

impl SideMarks {
    fn mark(&mut self, line: usize, glyph: char) {
        self.glyphs.entry(line).or_insert(glyph);
    }

    fn is_marked(&self, line: usize) -> bool {
        self.glyphs.contains_key(&line) || self.decorations.contains_key(&line)
    }

    fn paint_at(&self, line: usize, col: usize) -> Paint {
        let in_span = self
            .spans
            .get(&line)
            .is_some_and(|spans| spans.iter().any(|&(c, len)| col >= c && col < c + len));
        if in_span {
            Paint::Span
        } else if self.is_marked(line) {
            Paint::Line
        } else {
            Paint::None
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Row {
    Line(usize),
    Gap,
}

pub struct TerminalSink {
    theme: DiffTheme,
    mode: ColorMode,
    sides: [SideMarks; 2],
    events: usize,
}

impl TerminalSink {
    pub fn new(theme: DiffTheme, mode: ColorMode) -> Self {
        Self {
            theme,
            mode,
            sides: Default::default(),
            events: 0,
        }
    }

    pub fn event_count(&self) -> usize {
        self.events
    }

    fn side_mut(&mut self, side: Side) -> &mut SideMarks {
        &mut self.sides[side as usize]
    }

    fn side(&self, side: Side) -> &SideMarks {
        &self.sides[side as usize]
    }

    /// Render both sequences as two columns, each `width` cells wide.
    pub fn render(&self, a: &[String], b: &[String], width: usize) -> String {
        let left = self.rows(Side::A, a.len());
        let right = self.rows(Side::B, b.len());
        let number_width = a.len().max(b.len()).max(1).to_string().len();

        let mut out = String::new();
        for i in 0..left.len().max(right.len()) {
            let l = self.cell(Side::A, left.get(i).copied(), a, width, number_width);
            let r = self.cell(Side::B, right.get(i).copied(), b, width, number_width);
            let _ = writeln!(out, "{} │ {}", l, r.trim_end());
        }
        out
    }

    fn rows(&self, side: Side, len: usize) -> Vec<Row> {
        let marks = self.side(side);
        let mut rows = Vec::with_capacity(len);
        for line in 0..=len {
            let gap = marks.gaps.get(&line).copied().unwrap_or(0);
            rows.extend(std::iter::repeat(Row::Gap).take(gap));
            if line < len {
                rows.push(Row::Line(line));
            }
        }
        rows
    }

    fn cell(&self, side: Side, row: Option<Row>, lines: &[String], width: usize, number_width: usize) -> String {
        let line = match row {
            Some(Row::Line(line)) => line,
            Some(Row::Gap) | None => return " ".repeat(number_width + 3 + width),
        };
        let marks = self.side(side);
        let glyph = marks.glyphs.get(&line).copied().unwrap_or(' ');
        let glyph = match marks.decorations.get(&line) {
            Some(&class) => self.decorated(decoration_glyph(class), class),
            None => glyph.to_string(),
        };

        let text = lines[line].trim_end_matches(&['\n', '\r'][..]);
        format!("{:>nw$} {} {}", line + 1, glyph, self.body(side, line, text, width), nw = number_width)
    }

    fn decorated(&self, glyph: char, class: Decoration) -> String {
        match (self.mode, class) {
            (ColorMode::Plain, _) => glyph.to_string(),
            (ColorMode::Ansi, Decoration::Modified) => glyph.yellow().to_string(),
            (ColorMode::Ansi, Decoration::Removed) => glyph.red().to_string(),
            (ColorMode::Ansi, Decoration::Added) => glyph.green().to_string(),
        }
    }

    /// Line text clipped and padded to `width` display cells, painted run by run.
    fn body(&self, side: Side, line: usize, text: &str, width: usize) -> String {
        let marks = self.side(side);
        let mut out = String::new();
        let mut run = String::new();
        let mut run_paint = Paint::None;
        let mut used = 0;

        for (col, ch) in text.chars().enumerate() {
            let ch = if ch == '\t' { ' ' } else { ch };
            let w = ch.width().unwrap_or(0);
            if used + w > width {
                break;
            }
            used += w;
            let paint = marks.paint_at(line, col);
            if paint != run_paint && !run.is_empty() {
                self.flush(&mut out, side, &run, run_paint);
                run.clear();
            }
            run_paint = paint;
            run.push(ch);
        }
        let tail = if marks.is_marked(line) { Paint::Line } else { Paint::None };
        if tail != run_paint && !run.is_empty() {
            self.flush(&mut out, side, &run, run_paint);
            run.clear();
        }
        run.push_str(&" ".repeat(width - used));
        self.flush(&mut out, side, &run, tail);
        out
    }

    fn flush(&self, out: &mut String, side: Side, text: &str, paint: Paint) {
        match (self.mode, paint) {
            (_, Paint::None) => out.push_str(text),
            (ColorMode::Plain, Paint::Line) => out.push_str(text),
            (ColorMode::Plain, Paint::Span) => {
                let (open, close) = match side {
                    Side::A => ("[-", "-]"),
                    Side::B => ("{+", "+}"),
                };
                let _ = write!(out, "{}{}{}", open, text, close);
            }
            (ColorMode::Ansi, Paint::Line) => {
                let _ = write!(out, "{}", text.on_color(to_rgb(self.theme.changed_line)));
            }
            (ColorMode::Ansi, Paint::Span) => {
                let bg = match side {
                    Side::A => self.theme.detail_del,
                    Side::B => self.theme.detail_add,
                };
                let _ = write!(out, "{}", text.on_color(to_rgb(bg)));
            }
        }
    }
}

impl RenderSink for TerminalSink {
    fn clear(&mut self) {
        self.sides = Default::default();
        self.events = 0;
    }

    fn event(&mut self, event: &DiffEvent) {
        self.events += 1;
        match *event {
            DiffEvent::LineDeleted { line } => {
                log::debug!("delete line {} in A", line + 1);
                self.side_mut(Side::A).mark(line, '-');
            }
            DiffEvent::LineAdded { line } => {
                log::debug!("insert line {} in B", line + 1);
                self.side_mut(Side::B).mark(line, '+');
            }
            DiffEvent::LineChanged { side, line } => self.side_mut(side).mark(line, '~'),
            DiffEvent::Gap { side, before_line, lines } => {
                *self.side_mut(side).gaps.entry(before_line).or_insert(0) += lines;
            }
            DiffEvent::SpanDeleted { line, col, len } => {
                self.side_mut(Side::A).spans.entry(line).or_default().push((col, len));
            }
            DiffEvent::SpanAdded { line, col, len } => {
                self.side_mut(Side::B).spans.entry(line).or_default().push((col, len));
            }
            DiffEvent::Decoration { side, line, class } => {
                self.side_mut(side).decorations.insert(line, class);
            }
        }
    }
}

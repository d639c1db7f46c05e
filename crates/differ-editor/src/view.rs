// Diff view: two editor surfaces, a render sink, and the navigation, copy
// and scroll-sync commands that operate on the difference map.

use differ_core::{DiffBlock, DiffError, EditorSurface, Position, RenderSink, Side};
use differ_engine::{split_lines, CompareOptions, DiffSession, DifferenceMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Both carets now sit at the start of this block.
    Moved(DiffBlock),
    NoDifferences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The block was copied from the focused side; the map was rebuilt.
    Copied(DiffBlock),
    /// The caret is not inside a block.
    NoBlock,
    /// The block no longer fits the texts; the map was rebuilt instead.
    Stale,
}

pub struct DiffView<E, S> {
    a: E,
    b: E,
    sink: S,
    session: DiffSession,
    options: CompareOptions,
    map: DifferenceMap,
    focus: Side,
}

impl<E: EditorSurface, S: RenderSink> DiffView<E, S> {
    /// Nothing is compared until the first `refresh()`.
    pub fn new(a: E, b: E, sink: S, options: CompareOptions) -> Self {
        Self::with_session(a, b, sink, options, DiffSession::new())
    }

    pub fn with_session(a: E, b: E, sink: S, options: CompareOptions, session: DiffSession) -> Self {
        Self {
            a,
            b,
            sink,
            session,
            options,
            map: DifferenceMap::new(),
            focus: Side::A,
        }
    }

    pub fn editor(&self, side: Side) -> &E {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    pub fn editor_mut(&mut self, side: Side) -> &mut E {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }

    pub fn focus(&self) -> Side {
        self.focus
    }

    pub fn set_focus(&mut self, side: Side) {
        self.focus = side;
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn session(&self) -> &DiffSession {
        &self.session
    }

    pub fn difference_map(&self) -> &DifferenceMap {
        &self.map
    }

    /// The view's own copy of the map; entries may be dropped freely.
    pub fn difference_map_mut(&mut self) -> &mut DifferenceMap {
        &mut self.map
    }

    /// Re-read both editors, recompare, repaint the sink and replace the map.
    ///
    /// The map is replaced before painting, so it matches the editors' text
    /// even when painting stops on an error.
    pub fn refresh(&mut self) -> Result<(), DiffError> {
        let a = split_lines(&self.a.text());
        let b = split_lines(&self.b.text());
        self.session.set_sequences(a, b);

        let events = self.session.compare(self.options);
        self.map = self.session.difference_map().clone();
        self.sink.clear();
        for event in events {
            self.sink.event(&event?);
        }
        if self.map.is_empty() {
            log::info!("files are identical");
        }
        Ok(())
    }

    /// True when either editor's text no longer matches the compared sequences.
    fn is_stale(&self) -> bool {
        [Side::A, Side::B]
            .into_iter()
            .any(|side| split_lines(&self.editor(side).text()) != *self.session.sequence(side))
    }

    /// Move both carets to the next or previous block, wrapping around.
    pub fn jump(&mut self, direction: Direction) -> Result<JumpOutcome, DiffError> {
        if self.map.is_empty() {
            self.refresh()?;
        }
        let line = self.editor(self.focus).caret().line;
        let target = match direction {
            Direction::Next => self.map.next_after(self.focus, line),
            Direction::Previous => self.map.prev_before(self.focus, line),
        };
        let Some(&block) = target else {
            log::info!("no differences");
            return Ok(JumpOutcome::NoDifferences);
        };
        self.a.set_caret(Position::line_start(block.a0));
        self.b.set_caret(Position::line_start(block.b0));
        log::debug!("jump {:?} to {}", direction, block);
        Ok(JumpOutcome::Moved(block))
    }

    /// Replace the other side's range of the block under the caret with the
    /// focused side's text, then recompare.
    pub fn copy_block(&mut self) -> Result<CopyOutcome, DiffError> {
        let (src, dst) = (self.focus, self.focus.other());
        let line = self.editor(src).caret().line;
        let Some((_, &block)) = self.map.enclosing(src, line) else {
            return Ok(CopyOutcome::NoBlock);
        };

        if self.is_stale() {
            log::warn!("difference map is stale, recomparing");
            self.refresh()?;
            return Ok(CopyOutcome::Stale);
        }
        let (src_lines, dst_len) = (self.session.sequence(src), self.session.sequence(dst).len());

        let mut text = src_lines[block.range(src)].concat();
        // an unterminated last line must not merge with the line after the block
        if !text.is_empty() && !text.ends_with('\n') && block.end(dst) < dst_len {
            text.push('\n');
        }

        let start = Position::line_start(block.start(dst));
        let editor = self.editor_mut(dst);
        editor.delete(start..Position::line_start(block.end(dst)));
        editor.insert(start, &text);
        editor.set_caret(start);
        log::debug!("copied {} from {} to {}", block, src, dst);

        self.refresh()?;
        Ok(CopyOutcome::Copied(block))
    }

    /// Scroll the other editor so its top line corresponds to `from`'s top line.
    /// Recompares first if either text changed since the last comparison.
    pub fn sync_scroll(&mut self, from: Side) -> Result<(), DiffError> {
        if self.is_stale() {
            log::debug!("texts changed since last comparison, recomparing");
            self.refresh()?;
        }
        let len = self.session.sequence(from).len();
        let mapped = self.map.map_position(from, self.editor(from).scroll_top(), len)?;
        self.editor_mut(from.other()).set_scroll_top(mapped);
        Ok(())
    }
}

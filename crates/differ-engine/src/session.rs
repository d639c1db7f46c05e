// Diff session: the entry point tying aligner, refiner and map together.

use std::sync::Arc;

use differ_core::{DiffError, Opcode, Side, Similarity};

use crate::aligner::opcodes;
use crate::config::CompareOptions;
use crate::events::DiffEvents;
use crate::map::DifferenceMap;
use crate::ratio::CharRatio;

/// Split `text` into lines, each keeping its terminator. A final line
/// without a terminator is kept as is; an empty text has no lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_owned).collect()
}

/// Holds the two line sequences and the result of the last comparison.
pub struct DiffSession {
    a: Arc<[String]>,
    b: Arc<[String]>,
    opcodes: Vec<Opcode>,
    map: DifferenceMap,
    scorer: Arc<dyn Similarity + Send + Sync>,
}

impl DiffSession {
    pub fn new() -> Self {
        Self::with_scorer(Arc::new(CharRatio))
    }

    /// Session pairing replaced lines with a custom similarity measure.
    pub fn with_scorer(scorer: Arc<dyn Similarity + Send + Sync>) -> Self {
        Self {
            a: Arc::from(Vec::new()),
            b: Arc::from(Vec::new()),
            opcodes: Vec::new(),
            map: DifferenceMap::new(),
            scorer,
        }
    }

    /// Replace both sequences. The previous result stays until the next
    /// `compare()`.
    pub fn set_sequences(&mut self, a: Vec<String>, b: Vec<String>) {
        self.a = a.into();
        self.b = b.into();
    }

    pub fn sequence(&self, side: Side) -> &[String] {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    /// Align the current sequences, rebuild the difference map, and return
    /// the event stream for rendering.
    pub fn compare(&mut self, options: CompareOptions) -> DiffEvents {
        self.opcodes = opcodes(&self.a[..], &self.b[..]);
        self.map = DifferenceMap::from_opcodes(&self.opcodes);
        log::debug!(
            "compared {} vs {} lines: {} opcodes, {} blocks ({:?}, cutoff {})",
            self.a.len(),
            self.b.len(),
            self.opcodes.len(),
            self.map.len(),
            options.detail,
            options.cutoff()
        );
        DiffEvents::new(
            Arc::clone(&self.a),
            Arc::clone(&self.b),
            self.opcodes.clone(),
            options,
            Arc::clone(&self.scorer),
        )
    }

    pub fn opcodes(&self) -> &[Opcode] {
        &self.opcodes
    }

    pub fn difference_map(&self) -> &DifferenceMap {
        &self.map
    }

    /// Map `line` on `side` to the other side using the last comparison.
    pub fn map_position(&self, side: Side, line: usize) -> Result<usize, DiffError> {
        self.map.map_position(side, line, self.sequence(side).len())
    }

    /// True when the last comparison found no differing block.
    pub fn is_identical(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for DiffSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use differ_core::{DiffBlock, DiffEvent};

    #[test]
    fn split_lines_keeps_terminators() {
        assert_eq!(split_lines("a\nb\r\nc"), vec!["a\n", "b\r\n", "c"]);
        assert_eq!(split_lines("a\n"), vec!["a\n"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn compare_rebuilds_map() {
        let mut session = DiffSession::new();
        session.set_sequences(split_lines("a\nb\n"), split_lines("a\nc\nb\n"));
        let events: Vec<DiffEvent> = session.compare(CompareOptions::default()).map(Result::unwrap).collect();
        assert_eq!(events.len(), 2);
        assert_eq!(session.difference_map().blocks(), &[DiffBlock::new(1, 1, 1, 2)]);
        assert!(!session.is_identical());

        session.set_sequences(split_lines("a\n"), split_lines("a\n"));
        // stale until the next compare
        assert_eq!(session.difference_map().len(), 1);
        assert_eq!(session.compare(CompareOptions::default()).count(), 0);
        assert!(session.is_identical());
    }

    #[test]
    fn map_position_uses_side_length() {
        let mut session = DiffSession::new();
        session.set_sequences(split_lines("a\nb\n"), split_lines("a\nc\nb\n"));
        let _ = session.compare(CompareOptions::default());
        assert_eq!(session.map_position(Side::A, 1), Ok(2));
        assert_eq!(session.map_position(Side::B, 1), Ok(1));
        assert_eq!(session.map_position(Side::A, 2), Ok(3));
        assert_eq!(session.map_position(Side::B, 3), Ok(2));
        assert!(session.map_position(Side::A, 3).is_err());
    }

    #[test]
    fn event_stream_outlives_session_borrow() {
        let mut session = DiffSession::new();
        session.set_sequences(split_lines("x\n"), split_lines("y\n"));
        let events = session.compare(CompareOptions::default());
        session.set_sequences(Vec::new(), Vec::new());
        let events: Vec<_> = events.collect();
        assert_eq!(events.len(), 2);
    }
}

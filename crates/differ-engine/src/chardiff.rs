// Character-level detail for matched lines and replaced blocks.

use differ_core::{DiffEvent, OpTag};

use crate::aligner::opcodes;

/// Span events for one matched line pair. Columns are char offsets.
pub fn line_pair_spans(a_line: usize, a: &str, b_line: usize, b: &str) -> Vec<DiffEvent> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut events = Vec::new();
    for op in opcodes(&a, &b) {
        if matches!(op.tag, OpTag::Delete | OpTag::Replace) {
            events.push(DiffEvent::SpanDeleted {
                line: a_line,
                col: op.a_start,
                len: op.a_end - op.a_start,
            });
        }
        if matches!(op.tag, OpTag::Insert | OpTag::Replace) {
            events.push(DiffEvent::SpanAdded {
                line: b_line,
                col: op.b_start,
                len: op.b_end - op.b_start,
            });
        }
    }
    events
}

/// Span events for a whole replaced block, aligned as one text per side.
/// Spans crossing a line end are split so every event stays on one line.
pub fn block_spans(a_start: usize, a_lines: &[String], b_start: usize, b_lines: &[String]) -> Vec<DiffEvent> {
    let a = JoinedLines::new(a_lines);
    let b = JoinedLines::new(b_lines);

    let mut events = Vec::new();
    for op in opcodes(&a.chars, &b.chars) {
        if matches!(op.tag, OpTag::Delete | OpTag::Replace) {
            for (line, col, len) in a.split(op.a_start, op.a_end) {
                events.push(DiffEvent::SpanDeleted { line: a_start + line, col, len });
            }
        }
        if matches!(op.tag, OpTag::Insert | OpTag::Replace) {
            for (line, col, len) in b.split(op.b_start, op.b_end) {
                events.push(DiffEvent::SpanAdded { line: b_start + line, col, len });
            }
        }
    }
    events
}

struct JoinedLines {
    chars: Vec<char>,
    /// Char offset at which each line starts, plus the total length.
    starts: Vec<usize>,
}

impl JoinedLines {
    fn new(lines: &[String]) -> Self {
        let mut chars = Vec::new();
        let mut starts = Vec::with_capacity(lines.len() + 1);
        for line in lines {
            starts.push(chars.len());
            chars.extend(line.chars());
        }
        starts.push(chars.len());
        Self { chars, starts }
    }

    /// Cut `start..end` of the joined text into `(line, col, len)` pieces.
    fn split(&self, start: usize, end: usize) -> Vec<(usize, usize, usize)> {
        let mut pieces = Vec::new();
        if start >= end {
            return pieces;
        }
        let line_count = self.starts.len() - 1;
        // last line starting at or before `start`
        let mut line = self.starts[..line_count].partition_point(|&s| s <= start).saturating_sub(1);
        while line < line_count && self.starts[line] < end {
            let from = start.max(self.starts[line]);
            let to = end.min(self.starts[line + 1]);
            if to > from {
                pieces.push((line, from - self.starts[line], to - from));
            }
            line += 1;
        }
        pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(s: &[&str]) -> Vec<String> {
        s.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn single_char_replacement() {
        let events = line_pair_spans(3, "foo bar\n", 5, "foo baz\n");
        assert_eq!(
            events,
            vec![
                DiffEvent::SpanDeleted { line: 3, col: 6, len: 1 },
                DiffEvent::SpanAdded { line: 5, col: 6, len: 1 },
            ]
        );
    }

    #[test]
    fn pure_insertion_has_no_deleted_span() {
        // "t x;\n" is the longest run, so the insertion lands as "t mu".
        let events = line_pair_spans(0, "let x;\n", 0, "let mut x;\n");
        assert_eq!(events, vec![DiffEvent::SpanAdded { line: 0, col: 2, len: 4 }]);
    }

    #[test]
    fn columns_are_chars() {
        let events = line_pair_spans(0, "é=1\n", 0, "é=2\n");
        assert_eq!(
            events,
            vec![
                DiffEvent::SpanDeleted { line: 0, col: 2, len: 1 },
                DiffEvent::SpanAdded { line: 0, col: 2, len: 1 },
            ]
        );
    }

    #[test]
    fn identical_pair_has_no_spans() {
        assert!(line_pair_spans(0, "same\n", 0, "same\n").is_empty());
    }

    #[test]
    fn block_spans_split_at_line_ends() {
        // "\nb\nc" is deleted as one run of the joined text "a\nb\nc\nd\n".
        let a = lines(&["a\n", "b\n", "c\n", "d\n"]);
        let b = lines(&["a\n", "d\n"]);
        let events = block_spans(10, &a, 20, &b);
        assert_eq!(
            events,
            vec![
                DiffEvent::SpanDeleted { line: 10, col: 1, len: 1 },
                DiffEvent::SpanDeleted { line: 11, col: 0, len: 2 },
                DiffEvent::SpanDeleted { line: 12, col: 0, len: 1 },
            ]
        );
    }

    #[test]
    fn split_handles_partial_lines() {
        let joined = JoinedLines::new(&lines(&["abc\n", "de\n", "fgh\n"]));
        // chars 2..6 cover "c\n" on line 0 and "de" on line 1
        assert_eq!(joined.split(2, 6), vec![(0, 2, 2), (1, 0, 2)]);
        assert!(joined.split(4, 4).is_empty());
        assert_eq!(joined.split(7, 11), vec![(2, 0, 4)]);
    }
}

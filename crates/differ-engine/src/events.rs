// Lazy event stream produced by a comparison.

use std::collections::VecDeque;
use std::sync::Arc;

use differ_core::{DiffError, DiffEvent, OpTag, Opcode, Similarity};

use crate::chardiff::block_spans;
use crate::config::{CompareOptions, DetailMode};
use crate::refine::{anchor_events, find_anchor, flat_events, Anchor};

/// Pending work, kept on a stack so nested replace blocks are refined
/// without recursion.
#[derive(Debug, Clone, Copy)]
enum Task {
    Flat { alo: usize, ahi: usize, blo: usize, bhi: usize },
    Refine { alo: usize, ahi: usize, blo: usize, bhi: usize },
    Pair(Anchor),
    BlockDetail { alo: usize, ahi: usize, blo: usize, bhi: usize },
}

/// Events of one comparison, generated on demand.
///
/// Single pass: the stream is consumed by value, and replaying it needs a new
/// `compare()`. Yields an error once and then ends if the similarity scorer
/// misbehaves.
pub struct DiffEvents {
    a: Arc<[String]>,
    b: Arc<[String]>,
    opcodes: std::vec::IntoIter<Opcode>,
    options: CompareOptions,
    scorer: Arc<dyn Similarity + Send + Sync>,
    tasks: Vec<Task>,
    pending: VecDeque<DiffEvent>,
    failed: bool,
}

impl DiffEvents {
    pub(crate) fn new(
        a: Arc<[String]>,
        b: Arc<[String]>,
        opcodes: Vec<Opcode>,
        options: CompareOptions,
        scorer: Arc<dyn Similarity + Send + Sync>,
    ) -> Self {
        Self {
            a,
            b,
            opcodes: opcodes.into_iter(),
            options,
            scorer,
            tasks: Vec::new(),
            pending: VecDeque::new(),
            failed: false,
        }
    }

    fn schedule(&mut self, op: Opcode) {
        let (alo, ahi, blo, bhi) = (op.a_start, op.a_end, op.b_start, op.b_end);
        match op.tag {
            OpTag::Equal => {}
            OpTag::Insert | OpTag::Delete => self.tasks.push(Task::Flat { alo, ahi, blo, bhi }),
            OpTag::Replace => match self.options.detail {
                DetailMode::None => self.tasks.push(Task::Flat { alo, ahi, blo, bhi }),
                DetailMode::LinePairs => self.tasks.push(Task::Refine { alo, ahi, blo, bhi }),
                DetailMode::Block => {
                    self.tasks.push(Task::BlockDetail { alo, ahi, blo, bhi });
                    self.tasks.push(Task::Flat { alo, ahi, blo, bhi });
                }
            },
        }
    }

    /// Queue refinement (or flat output) for the sub-block `alo..ahi` × `blo..bhi`.
    fn push_helper(&mut self, alo: usize, ahi: usize, blo: usize, bhi: usize) {
        if alo < ahi && blo < bhi {
            self.tasks.push(Task::Refine { alo, ahi, blo, bhi });
        } else if alo < ahi || blo < bhi {
            self.tasks.push(Task::Flat { alo, ahi, blo, bhi });
        }
    }

    fn run(&mut self, task: Task) -> Result<(), DiffError> {
        match task {
            Task::Flat { alo, ahi, blo, bhi } => {
                self.pending.extend(flat_events(alo..ahi, blo..bhi));
            }
            Task::Refine { alo, ahi, blo, bhi } => {
                let anchor = find_anchor(
                    &self.a,
                    alo..ahi,
                    &self.b,
                    blo..bhi,
                    self.options.cutoff(),
                    &*self.scorer,
                )?;
                match anchor {
                    None => self.pending.extend(flat_events(alo..ahi, blo..bhi)),
                    Some(anchor) => {
                        // LIFO: before-part runs first, then the pair, then the after-part.
                        self.push_helper(anchor.a + 1, ahi, anchor.b + 1, bhi);
                        self.tasks.push(Task::Pair(anchor));
                        self.push_helper(alo, anchor.a, blo, anchor.b);
                    }
                }
            }
            Task::Pair(anchor) => {
                self.pending.extend(anchor_events(&self.a, &self.b, &anchor));
            }
            Task::BlockDetail { alo, ahi, blo, bhi } => {
                self.pending.extend(block_spans(alo, &self.a[alo..ahi], blo, &self.b[blo..bhi]));
            }
        }
        Ok(())
    }
}

impl Iterator for DiffEvents {
    type Item = Result<DiffEvent, DiffError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            if self.failed {
                return None;
            }
            let task = match self.tasks.pop() {
                Some(task) => task,
                None => {
                    let op = self.opcodes.next()?;
                    self.schedule(op);
                    continue;
                }
            };
            if let Err(err) = self.run(task) {
                self.failed = true;
                self.tasks.clear();
                return Some(Err(err));
            }
        }
    }
}

impl std::iter::FusedIterator for DiffEvents {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aligner::opcodes;
    use crate::ratio::CharRatio;
    use differ_core::{Decoration, Side};

    fn run(a: &[&str], b: &[&str], options: CompareOptions) -> Vec<DiffEvent> {
        let a: Arc<[String]> = a.iter().map(|l| l.to_string()).collect();
        let b: Arc<[String]> = b.iter().map(|l| l.to_string()).collect();
        let ops = opcodes(&a[..], &b[..]);
        DiffEvents::new(a, b, ops, options, Arc::new(CharRatio))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn equal_inputs_produce_nothing() {
        assert!(run(&["x\n"], &["x\n"], CompareOptions::default()).is_empty());
        assert!(run(&[], &[], CompareOptions::default()).is_empty());
    }

    #[test]
    fn insert_adds_line_and_gap() {
        let events = run(&["a\n", "b\n"], &["a\n", "c\n", "b\n"], CompareOptions::default());
        assert_eq!(
            events,
            vec![
                DiffEvent::LineAdded { line: 1 },
                DiffEvent::Gap { side: Side::A, before_line: 1, lines: 1 },
            ]
        );
    }

    #[test]
    fn refined_block_orders_before_pair_after() {
        let events = run(
            &["keep\n", "gone\n", "foo bar\n", "keep2\n"],
            &["keep\n", "foo baz\n", "new one here\n", "keep2\n"],
            CompareOptions::default(),
        );
        let lines: Vec<(Side, usize)> = events
            .iter()
            .filter(|ev| !matches!(ev, DiffEvent::SpanDeleted { .. } | DiffEvent::SpanAdded { .. }))
            .map(|ev| (ev.side(), ev.line()))
            .collect();
        assert_eq!(
            lines,
            vec![
                // before the anchor: "gone" has no partner
                (Side::A, 1),
                (Side::B, 1),
                // anchor pair
                (Side::A, 2),
                (Side::B, 1),
                (Side::A, 2),
                (Side::B, 1),
                // after the anchor: "new one here" has no partner
                (Side::B, 2),
                (Side::A, 3),
            ]
        );
        assert!(events.contains(&DiffEvent::Gap { side: Side::B, before_line: 1, lines: 1 }));
        assert!(events.contains(&DiffEvent::Gap { side: Side::A, before_line: 3, lines: 1 }));
        assert!(events.contains(&DiffEvent::Decoration { side: Side::B, line: 1, class: Decoration::Added }));
    }

    #[test]
    fn no_detail_reports_plain_replace() {
        let options = CompareOptions::new(false, 0.75).unwrap();
        let events = run(&["foo bar\n"], &["foo baz\n"], options);
        assert_eq!(events, vec![DiffEvent::LineDeleted { line: 0 }, DiffEvent::LineAdded { line: 0 }]);
    }

    #[test]
    fn block_detail_adds_spans_to_plain_replace() {
        let options = CompareOptions::default().with_detail_mode(DetailMode::Block);
        let events = run(&["foo bar\n"], &["foo baz\n"], options);
        assert_eq!(
            events,
            vec![
                DiffEvent::LineDeleted { line: 0 },
                DiffEvent::LineAdded { line: 0 },
                DiffEvent::SpanDeleted { line: 0, col: 6, len: 1 },
                DiffEvent::SpanAdded { line: 0, col: 6, len: 1 },
            ]
        );
    }

    #[test]
    fn scorer_error_ends_stream() {
        struct Broken;
        impl Similarity for Broken {
            fn ratio(&self, _a: &str, _b: &str) -> f64 {
                -0.5
            }
        }

        let a: Arc<[String]> = vec!["one\n".to_string(), "same\n".to_string(), "two\n".to_string()].into();
        let b: Arc<[String]> = vec!["uno\n".to_string(), "same\n".to_string(), "dos\n".to_string()].into();
        let ops = opcodes(&a[..], &b[..]);
        let mut events = DiffEvents::new(a, b, ops, CompareOptions::default(), Arc::new(Broken));
        assert_eq!(events.next(), Some(Err(DiffError::InvalidRatio(-0.5))));
        assert_eq!(events.next(), None);
        assert_eq!(events.next(), None);
    }
}

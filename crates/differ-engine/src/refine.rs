// Replace-block refinement: pair the most similar lines of a replaced block.

use std::ops::Range;

use differ_core::{Decoration, DiffError, DiffEvent, Side, Similarity};

use crate::chardiff::line_pair_spans;
use crate::ratio::checked;

/// The line pair a replaced block is split around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub a: usize,
    pub b: usize,
    pub ratio: f64,
    /// Both lines are identical; chosen only when no pair reached the cutoff.
    pub exact: bool,
}

/// Best-matching pair inside `a[alo..ahi]` × `b[blo..bhi]`, or `None` when
/// the block should be shown as a plain replace.
///
/// A fuzzy pair must score at least `cutoff`. If none does, the first pair of
/// identical lines is used instead, even though a fuzzy pair elsewhere may
/// have come closer. That can anchor on a surprising line when the block
/// contains duplicated lines.
pub fn find_anchor(
    a: &[String],
    a_range: Range<usize>,
    b: &[String],
    b_range: Range<usize>,
    cutoff: f64,
    scorer: &dyn Similarity,
) -> Result<Option<Anchor>, DiffError> {
    let mut best: Option<Anchor> = None;
    let mut first_equal: Option<(usize, usize)> = None;

    let beats = |best: &Option<Anchor>, score: f64| match best {
        Some(anchor) => score > anchor.ratio,
        None => score >= cutoff,
    };

    for j in b_range.clone() {
        let bj = &b[j];
        for i in a_range.clone() {
            let ai = &a[i];
            if ai == bj {
                if first_equal.is_none() {
                    first_equal = Some((i, j));
                }
                continue;
            }
            // Both estimates are upper bounds: failing one means ratio fails too.
            if !beats(&best, checked(scorer.real_quick_ratio(ai, bj))?)
                || !beats(&best, checked(scorer.quick_ratio(ai, bj))?)
            {
                continue;
            }
            let score = checked(scorer.ratio(ai, bj))?;
            if beats(&best, score) {
                best = Some(Anchor { a: i, b: j, ratio: score, exact: false });
            }
        }
    }

    let anchor = best.or_else(|| {
        first_equal.map(|(i, j)| Anchor { a: i, b: j, ratio: 1.0, exact: true })
    });
    if let Some(anchor) = &anchor {
        log::trace!(
            "anchor A:{} B:{} ratio {:.3}{}",
            anchor.a,
            anchor.b,
            anchor.ratio,
            if anchor.exact { " (exact)" } else { "" }
        );
    }
    Ok(anchor)
}

/// Events for an anchor pair: changed-line markers, character spans and the
/// per-side decoration.
pub fn anchor_events(a: &[String], b: &[String], anchor: &Anchor) -> Vec<DiffEvent> {
    let mut events = vec![
        DiffEvent::LineChanged { side: Side::A, line: anchor.a },
        DiffEvent::LineChanged { side: Side::B, line: anchor.b },
    ];
    if anchor.exact {
        return events;
    }

    let spans = line_pair_spans(anchor.a, &a[anchor.a], anchor.b, &b[anchor.b]);
    let lost = spans.iter().any(|ev| matches!(ev, DiffEvent::SpanDeleted { .. }));
    let gained = spans.iter().any(|ev| matches!(ev, DiffEvent::SpanAdded { .. }));
    events.extend(spans);
    events.push(DiffEvent::Decoration {
        side: Side::A,
        line: anchor.a,
        class: if lost { Decoration::Removed } else { Decoration::Modified },
    });
    events.push(DiffEvent::Decoration {
        side: Side::B,
        line: anchor.b,
        class: if gained { Decoration::Added } else { Decoration::Modified },
    });
    events
}

/// Unpaired lines: every A line deleted, every B line added, and a gap on
/// the shorter side so both stay vertically aligned.
pub fn flat_events(a_range: Range<usize>, b_range: Range<usize>) -> Vec<DiffEvent> {
    let (a_len, b_len) = (a_range.len(), b_range.len());
    let mut events: Vec<DiffEvent> = a_range
        .clone()
        .map(|line| DiffEvent::LineDeleted { line })
        .chain(b_range.clone().map(|line| DiffEvent::LineAdded { line }))
        .collect();
    if a_len < b_len {
        events.push(DiffEvent::Gap { side: Side::A, before_line: a_range.end, lines: b_len - a_len });
    } else if a_len > b_len {
        events.push(DiffEvent::Gap { side: Side::B, before_line: b_range.end, lines: a_len - b_len });
    }
    events
}

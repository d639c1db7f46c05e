// Sequence alignment by recursive longest matching blocks.
//
// Works on any `Eq + Hash` element: whole lines for the line-level pass,
// `char`s inside a matched line pair.

use std::collections::HashMap;
use std::hash::Hash;

use differ_core::{OpTag, Opcode};

/// Sequences of B at least this long get popular elements suppressed.
pub const AUTOJUNK_MIN_LEN: usize = 200;

/// `a[a..a + len] == b[b..b + len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub len: usize,
}

/// Aligns two sequences.
///
/// With autojunk on (the default) and `b.len() >= 200`, every element of B
/// occurring more than `b.len() / 100 + 1` times is "popular": it can never
/// start a match, only extend one found through rarer neighbours. This keeps
/// the search close to linear on long inputs full of blank lines or lone
/// braces, and in exchange may miss alignments built only from such lines.
pub struct Aligner<'a, T> {
    a: &'a [T],
    b: &'a [T],
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> Aligner<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        Self::build(a, b, true)
    }

    /// Aligner that never suppresses popular elements. Exact but can be slow
    /// on long, repetitive inputs.
    pub fn without_autojunk(a: &'a [T], b: &'a [T]) -> Self {
        Self::build(a, b, false)
    }

    fn build(a: &'a [T], b: &'a [T], autojunk: bool) -> Self {
        let mut b2j: HashMap<&T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }
        if autojunk && b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }
        Self { a, b, b2j }
    }

    /// Longest block of equal elements inside `a[alo..ahi]` and `b[blo..bhi]`.
    /// Ties go to the block starting earliest in A, then earliest in B.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let mut best_a = alo;
        let mut best_b = blo;
        let mut best_len = 0;

        // j2len[j] = length of the match ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                    next_j2len.insert(j, k);
                    if k > best_len {
                        best_a = i + 1 - k;
                        best_b = j + 1 - k;
                        best_len = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Popular elements were left out of b2j; grow the block over them.
        while best_a > alo && best_b > blo && self.a[best_a - 1] == self.b[best_b - 1] {
            best_a -= 1;
            best_b -= 1;
            best_len += 1;
        }
        while best_a + best_len < ahi
            && best_b + best_len < bhi
            && self.a[best_a + best_len] == self.b[best_b + best_len]
        {
            best_len += 1;
        }

        Match { a: best_a, b: best_b, len: best_len }
    }

    /// All matching blocks in order, adjacent ones merged, terminated by the
    /// sentinel `Match { a: a.len(), b: b.len(), len: 0 }`.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let (la, lb) = (self.a.len(), self.b.len());

        let mut queue = vec![(0, la, 0, lb)];
        let mut found = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.len == 0 {
                continue;
            }
            if alo < m.a && blo < m.b {
                queue.push((alo, m.a, blo, m.b));
            }
            if m.a + m.len < ahi && m.b + m.len < bhi {
                queue.push((m.a + m.len, ahi, m.b + m.len, bhi));
            }
            found.push(m);
        }
        found.sort_by_key(|m| (m.a, m.b));

        let mut merged: Vec<Match> = Vec::with_capacity(found.len() + 1);
        for m in found {
            match merged.last_mut() {
                Some(last) if last.a + last.len == m.a && last.b + last.len == m.b => {
                    last.len += m.len;
                }
                _ => merged.push(m),
            }
        }
        merged.push(Match { a: la, b: lb, len: 0 });
        merged
    }

    /// Total number of matched elements.
    pub fn matched_len(&self) -> usize {
        self.matching_blocks().iter().map(|m| m.len).sum()
    }

    /// Opcodes turning A into B. They partition both sequences.
    pub fn opcodes(&self) -> Vec<Opcode> {
        let mut ops = Vec::new();
        let (mut i, mut j) = (0, 0);
        for m in self.matching_blocks() {
            let tag = match (i < m.a, j < m.b) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                ops.push(Opcode::new(tag, i, m.a, j, m.b));
            }
            if m.len > 0 {
                ops.push(Opcode::new(OpTag::Equal, m.a, m.a + m.len, m.b, m.b + m.len));
            }
            i = m.a + m.len;
            j = m.b + m.len;
        }
        ops
    }
}

/// Opcodes for `a` → `b` with autojunk on.
pub fn opcodes<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<Opcode> {
    Aligner::new(a, b).opcodes()
}

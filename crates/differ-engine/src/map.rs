// Difference map: the ordered non-equal blocks of a comparison, used for
// navigation, copy and position mapping.

use differ_core::{DiffBlock, DiffError, Opcode, Side};

/// Ordered, disjoint blocks, ascending on both sides.
///
/// Built by `compare()`; afterwards owned by the caller, who may drop
/// entries. The engine never patches it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DifferenceMap {
    blocks: Vec<DiffBlock>,
}

impl DifferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// One block per non-equal opcode, in opcode order.
    pub fn from_opcodes(opcodes: &[Opcode]) -> Self {
        let blocks: Vec<DiffBlock> = opcodes
            .iter()
            .filter(|op| !op.is_equal())
            .map(|&op| DiffBlock::from(op))
            .collect();
        let map = Self { blocks };
        debug_assert!(map.is_monotonic());
        map
    }

    pub fn blocks(&self) -> &[DiffBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffBlock> {
        self.blocks.iter()
    }

    pub fn get(&self, index: usize) -> Option<&DiffBlock> {
        self.blocks.get(index)
    }

    /// Drop the block at `index`. Later blocks keep their coordinates.
    pub fn remove(&mut self, index: usize) -> Option<DiffBlock> {
        (index < self.blocks.len()).then(|| self.blocks.remove(index))
    }

    /// Every block ends at or before the next one starts, on both sides.
    pub fn is_monotonic(&self) -> bool {
        self.blocks.windows(2).all(|w| {
            w[0].a0 <= w[0].a1
                && w[0].b0 <= w[0].b1
                && w[0].a1 <= w[1].a0
                && w[0].b1 <= w[1].b0
        })
    }

    /// Block containing `line` on `side`, with its index.
    pub fn enclosing(&self, side: Side, line: usize) -> Option<(usize, &DiffBlock)> {
        let idx = self.blocks.partition_point(|b| b.end(side) <= line);
        self.blocks
            .get(idx)
            .filter(|b| b.start(side) <= line)
            .map(|b| (idx, b))
    }

    /// First block starting after `line` on `side`, wrapping to the first block.
    pub fn next_after(&self, side: Side, line: usize) -> Option<&DiffBlock> {
        let idx = self.blocks.partition_point(|b| b.start(side) <= line);
        self.blocks.get(idx).or_else(|| self.blocks.first())
    }

    /// Last block starting before `line` on `side`, wrapping to the last block.
    pub fn prev_before(&self, side: Side, line: usize) -> Option<&DiffBlock> {
        let idx = self.blocks.partition_point(|b| b.start(side) < line);
        match idx {
            0 => self.blocks.last(),
            _ => self.blocks.get(idx - 1),
        }
    }

    /// Line on the other side corresponding to `line` on `side`.
    ///
    /// Inside a block, maps to the start of the other side's range: changed
    /// content is only aligned block by block. Between blocks, keeps the
    /// offset into the current equal region. `side_len` is the number of
    /// lines on `side`; `line == side_len` denotes the end of the document.
    pub fn map_position(&self, side: Side, line: usize, side_len: usize) -> Result<usize, DiffError> {
        if line > side_len {
            return Err(DiffError::LineOutOfRange { side, line, len: side_len });
        }
        let other = side.other();
        if let Some((_, block)) = self.enclosing(side, line) {
            return Ok(block.start(other));
        }
        let idx = self.blocks.partition_point(|b| b.end(side) <= line);
        Ok(match idx.checked_sub(1).map(|i| &self.blocks[i]) {
            Some(prev) => prev.end(other) + (line - prev.end(side)),
            None => line,
        })
    }
}

impl<'a> IntoIterator for &'a DifferenceMap {
    type Item = &'a DiffBlock;
    type IntoIter = std::slice::Iter<'a, DiffBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use differ_core::OpTag;

    // A: 0 1 2 3 4 5 6 7        B: 0 1 2 3 4 5 6
    // equal  0..2  ↔ 0..2
    // replace 2..4 ↔ 2..3
    // equal  4..5  ↔ 3..4
    // insert 5..5  ↔ 4..6
    // equal  5..7  ↔ 6..8
    // delete 7..8  ↔ 8..8
    fn sample() -> DifferenceMap {
        DifferenceMap::from_opcodes(&[
            Opcode::new(OpTag::Equal, 0, 2, 0, 2),
            Opcode::new(OpTag::Replace, 2, 4, 2, 3),
            Opcode::new(OpTag::Equal, 4, 5, 3, 4),
            Opcode::new(OpTag::Insert, 5, 5, 4, 6),
            Opcode::new(OpTag::Equal, 5, 7, 6, 8),
            Opcode::new(OpTag::Delete, 7, 8, 8, 8),
        ])
    }

    #[test]
    fn keeps_only_non_equal_blocks() {
        let map = sample();
        assert_eq!(
            map.blocks(),
            &[DiffBlock::new(2, 4, 2, 3), DiffBlock::new(5, 5, 4, 6), DiffBlock::new(7, 8, 8, 8)]
        );
        assert!(map.is_monotonic());
    }

    #[test]
    fn enclosing_respects_empty_ranges() {
        let map = sample();
        assert_eq!(map.enclosing(Side::A, 3).map(|(i, _)| i), Some(0));
        assert_eq!(map.enclosing(Side::A, 4), None);
        // the insert block is empty on A
        assert_eq!(map.enclosing(Side::A, 5), None);
        assert_eq!(map.enclosing(Side::B, 5).map(|(i, _)| i), Some(1));
        assert_eq!(map.enclosing(Side::B, 8), None);
    }

    #[test]
    fn next_and_prev_wrap_around() {
        let map = sample();
        assert_eq!(map.next_after(Side::A, 0), Some(&DiffBlock::new(2, 4, 2, 3)));
        assert_eq!(map.next_after(Side::A, 2), Some(&DiffBlock::new(5, 5, 4, 6)));
        assert_eq!(map.next_after(Side::A, 7), Some(&DiffBlock::new(2, 4, 2, 3)));
        assert_eq!(map.prev_before(Side::B, 8), Some(&DiffBlock::new(5, 5, 4, 6)));
        assert_eq!(map.prev_before(Side::B, 2), Some(&DiffBlock::new(7, 8, 8, 8)));
        assert_eq!(DifferenceMap::new().next_after(Side::A, 0), None);
    }

    #[test]
    fn map_position_inside_and_between_blocks() {
        let map = sample();
        // before any block: identity
        assert_eq!(map.map_position(Side::A, 1, 8), Ok(1));
        // inside the replace: start of B's range
        assert_eq!(map.map_position(Side::A, 3, 8), Ok(2));
        // equal region after the replace
        assert_eq!(map.map_position(Side::A, 4, 8), Ok(3));
        // right after the insert on A: past the inserted lines on B
        assert_eq!(map.map_position(Side::A, 5, 8), Ok(6));
        assert_eq!(map.map_position(Side::A, 6, 8), Ok(7));
        // inside the insert on B: where it would go on A
        assert_eq!(map.map_position(Side::B, 4, 8), Ok(5));
        // deleted line on A maps to the end of B
        assert_eq!(map.map_position(Side::A, 7, 8), Ok(8));
        assert_eq!(map.map_position(Side::A, 8, 8), Ok(8));
    }

    #[test]
    fn map_position_rejects_lines_past_the_end() {
        let err = sample().map_position(Side::B, 9, 8).unwrap_err();
        assert_eq!(err, DiffError::LineOutOfRange { side: Side::B, line: 9, len: 8 });
    }

    #[test]
    fn remove_keeps_remaining_coordinates() {
        let mut map = sample();
        assert_eq!(map.remove(0), Some(DiffBlock::new(2, 4, 2, 3)));
        assert_eq!(map.remove(5), None);
        assert_eq!(map.blocks()[0], DiffBlock::new(5, 5, 4, 6));
        assert!(map.is_monotonic());
    }
}

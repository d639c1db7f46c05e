// Options for a single comparison.

use differ_core::DiffError;
use serde::{Deserialize, Serialize};

/// How much detail a comparison reports inside replaced blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailMode {
    /// Line events only; every replace is reported as a plain replace.
    None,
    /// Pair similar lines inside replaced blocks and mark the changed
    /// characters of each pair.
    #[default]
    LinePairs,
    /// Character-align the whole replaced block at once, spans split per line.
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompareOptions {
    pub detail: DetailMode,
    cutoff: f64,
}

impl CompareOptions {
    /// Minimum similarity for two lines to be paired.
    pub const DEFAULT_CUTOFF: f64 = 0.75;

    pub fn new(with_detail: bool, cutoff: f64) -> Result<Self, DiffError> {
        let detail = if with_detail { DetailMode::LinePairs } else { DetailMode::None };
        Self::default().with_detail_mode(detail).with_cutoff(cutoff)
    }

    pub fn with_detail_mode(mut self, detail: DetailMode) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Result<Self, DiffError> {
        if !(0.0..=1.0).contains(&cutoff) {
            return Err(DiffError::InvalidCutoff(cutoff));
        }
        self.cutoff = cutoff;
        Ok(self)
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            detail: DetailMode::default(),
            cutoff: Self::DEFAULT_CUTOFF,
        }
    }
}

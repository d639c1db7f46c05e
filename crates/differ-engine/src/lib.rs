// differ-engine: line alignment, replace refinement and the difference map.

pub mod aligner;
pub mod chardiff;
pub mod config;
pub mod events;
pub mod map;
pub mod ratio;
pub mod refine;
pub mod session;

pub use aligner::{opcodes, Aligner};
pub use config::{CompareOptions, DetailMode};
pub use events::DiffEvents;
pub use map::DifferenceMap;
pub use ratio::CharRatio;
pub use session::{split_lines, DiffSession};

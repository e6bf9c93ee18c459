/// Page pipeline module
///
/// This module handles:
/// - Filtering and ordering archive entries into a page sequence (sequence.rs)
/// - Progressively decoding pages into display handles (loader.rs)

pub mod loader;
pub mod sequence;

pub use loader::{PageSlot, PageStatus};
pub use sequence::PageEntry;

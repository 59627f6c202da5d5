/// Shared value types: sizes, statuses, loop counts and bitmaps.
pub mod core;
/// Error taxonomy and result alias.
pub mod error;

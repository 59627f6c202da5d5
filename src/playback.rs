//! Turning a source into something a UI can animate.
//!
//! [`loader`] decodes and prepares frames off the caller's thread and builds the timeline,
//! [`player`] is the headless state machine a view drives with it.

/// Background loading into a [`loader::LoadedGif`].
pub mod loader;
/// Headless playback state machine.
pub mod player;
/// Frame preparation capability.
pub mod prepare;

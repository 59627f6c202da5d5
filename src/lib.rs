//! gifreel reads animated GIFs and turns them into loop-aware playback timelines.
//!
//! - Open a source with a [`Reader`]: metadata is read once, frames decode lazily, and a handle
//!   whose container or frame is not yet `Complete` is re-opened from its source on demand
//! - Build a [`PlaybackTimeline`] from frames and their normalized delays
//! - Or let [`load_gif`] / [`spawn_load`] do both and drive the result with a [`GifPlayer`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Container handles and the built-in GIF codec.
pub mod container;
mod foundation;
/// Off-thread loading and the headless player.
pub mod playback;
/// The reader: metadata, recovery and frame access.
pub mod reader;
/// Timeline construction and sampling.
pub mod timeline;

pub use crate::foundation::core::{Bitmap, DecodeStatus, LoopCount, PixelSize};
pub use crate::foundation::error::{GifError, GifResult};

pub use crate::container::codec::{
    ContainerCodec, ContainerHandle, ContainerProperties, FrameProperties,
};
pub use crate::container::gif::{GifCodec, GifCodecOpts, GifHandle};
pub use crate::container::source::ImageSource;
pub use crate::playback::loader::{
    LoadOpts, LoadedGif, PendingLoad, load_gif, load_with, spawn_load,
};
pub use crate::playback::player::{GifPlayer, PlayerState};
pub use crate::playback::prepare::{FramePreparer, PremultipliedPreparer, PreparedFrame};
pub use crate::reader::Reader;
pub use crate::reader::frames::{FrameIter, IndexedFrames};
pub use crate::reader::metadata::{
    DEFAULT_FRAME_DELAY_SECS, MINIMUM_FRAME_DELAY_SECS, ReaderOpts,
};
pub use crate::timeline::{PlaybackTimeline, Repeat, build_timeline};

#[cfg(test)]
#[path = "../tests/support/gif_bytes.rs"]
pub(crate) mod test_gifs;

#[cfg(test)]
#[path = "../tests/support/scripted_codec.rs"]
pub(crate) mod test_codec;

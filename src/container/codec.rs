use crate::{
    container::source::ImageSource,
    foundation::core::{Bitmap, DecodeStatus},
    foundation::error::GifResult,
};

/// Container-level metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContainerProperties {
    /// Raw loop count (`0` = forever), `None` when the container carries none.
    pub loop_count: Option<u32>,
}

/// Per-frame metadata. Every field is optional: codecs report only what the data contains.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameProperties {
    /// Pixel width of the decoded frame.
    pub pixel_width: Option<u32>,
    /// Pixel height of the decoded frame.
    pub pixel_height: Option<u32>,
    /// Delay after the codec's own clamping, in seconds.
    pub delay_secs: Option<f64>,
    /// Delay exactly as stored, in seconds.
    pub unclamped_delay_secs: Option<f64>,
}

/// Opens containers from a source.
///
/// Opening is the only fallible step that prevents a reader from existing; it must fail with
/// [`GifError::NotDecodable`](crate::GifError::NotDecodable) when the bytes are not a container
/// this codec understands.
pub trait ContainerCodec {
    /// Handle type produced by [`ContainerCodec::open`].
    type Handle: ContainerHandle;

    /// Open a fresh handle over `source`.
    fn open(&self, source: &ImageSource) -> GifResult<Self::Handle>;
}

/// Stateful view over one opened container.
///
/// Status contract: a handle that reports anything other than [`DecodeStatus::Complete`] for
/// the container or for a frame must not be asked to decode that frame. `Incomplete` may heal,
/// `Unknown` never does; the owner recovers by opening a new handle.
pub trait ContainerHandle {
    /// Whole-container status.
    fn status(&self) -> DecodeStatus;
    /// Status of one frame; out-of-range indices report `Unknown`.
    fn frame_status(&self, index: usize) -> DecodeStatus;
    /// Number of frames the container announces.
    fn frame_count(&self) -> usize;
    /// Container-level metadata.
    fn properties(&self) -> ContainerProperties;
    /// Frame-level metadata, `None` when the frame has no metadata at all.
    fn frame_properties(&self, index: usize) -> Option<FrameProperties>;
    /// Decode one frame. May cache internally.
    fn decode_frame(&mut self, index: usize) -> GifResult<Bitmap>;
}

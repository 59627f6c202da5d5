//! The owning entity for one GIF resource.
//!
//! A [`Reader`] reads metadata once when it is constructed and decodes frames lazily. Its
//! container handle lives in a replaceable slot: when the handle reports a status that is not
//! `Complete`, the reader re-opens its source and swaps the new handle in, keeping its own
//! identity and precomputed metadata.

/// Lazy frame enumeration.
pub mod frames;
/// Metadata reads and delay normalization.
pub mod metadata;

use crate::{
    container::codec::{ContainerCodec, ContainerHandle},
    container::gif::GifCodec,
    container::source::ImageSource,
    foundation::core::{Bitmap, DecodeStatus, LoopCount, PixelSize},
    foundation::error::{GifError, GifResult},
    reader::frames::{FrameIter, IndexedFrames},
    reader::metadata::ReaderOpts,
};

/// Reader over one GIF source.
///
/// Calls take `&mut self`: a reader is serviced by one worker at a time, and recovery replaces
/// the handle in place.
pub struct Reader<C: ContainerCodec = GifCodec> {
    codec: C,
    source: ImageSource,
    handle: C::Handle,
    opts: ReaderOpts,

    loop_count: LoopCount,
    frame_count: usize,
    frame_delays: Vec<f64>,
    all_delays_same: bool,
    average_delay: f64,
    reported_size: Option<PixelSize>,

    actual_size: Option<PixelSize>,
    frames: Option<Vec<Bitmap>>,
    recoveries: u64,
}

impl Reader<GifCodec> {
    /// Open `source` with the built-in GIF codec and default options.
    pub fn open(source: impl Into<ImageSource>) -> GifResult<Self> {
        Self::with_codec(GifCodec::default(), source.into(), ReaderOpts::default())
    }

    /// Open `source` with the built-in GIF codec.
    pub fn open_with_opts(source: impl Into<ImageSource>, opts: ReaderOpts) -> GifResult<Self> {
        Self::with_codec(GifCodec::default(), source.into(), opts)
    }
}

impl<C: ContainerCodec> Reader<C> {
    /// Open `source` through `codec` and precompute all metadata.
    ///
    /// Fails with [`GifError::NotDecodable`] when the codec cannot open the source, and with
    /// [`GifError::Validation`] for invalid `opts`.
    pub fn with_codec(codec: C, source: ImageSource, opts: ReaderOpts) -> GifResult<Self> {
        opts.validate()?;
        let handle = codec.open(&source)?;

        let loop_count = metadata::loop_count(&handle);
        let frame_count = handle.frame_count();
        let frame_delays = metadata::all_frame_delays(&handle, &opts);
        let all_delays_same = metadata::are_all_same(&frame_delays);
        let average_delay = metadata::average(&frame_delays);
        let reported_size = metadata::reported_size(&handle);

        tracing::debug!(
            %source,
            frame_count,
            ?loop_count,
            ?reported_size,
            "reader ready"
        );

        Ok(Self {
            codec,
            source,
            handle,
            opts,
            loop_count,
            frame_count,
            frame_delays,
            all_delays_same,
            average_delay,
            reported_size,
            actual_size: None,
            frames: None,
            recoveries: 0,
        })
    }

    /// Source this reader (re)opens.
    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    /// Options the delays were normalized with.
    pub fn opts(&self) -> &ReaderOpts {
        &self.opts
    }

    /// Loop count from container metadata.
    pub fn loop_count(&self) -> LoopCount {
        self.loop_count
    }

    /// Number of frames announced by the container at construction.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Normalized per-frame delays in seconds; `frame_count` long.
    pub fn frame_delays(&self) -> &[f64] {
        &self.frame_delays
    }

    /// True iff every frame has the same normalized delay.
    pub fn are_all_frame_delays_the_same(&self) -> bool {
        self.all_delays_same
    }

    /// Mean of [`Reader::frame_delays`].
    pub fn average_frame_delay(&self) -> f64 {
        self.average_delay
    }

    /// Frame-0 size from metadata alone.
    pub fn reported_size(&self) -> Option<PixelSize> {
        self.reported_size
    }

    /// Size of the decoded frame 0, or `0 x 0` if it cannot be decoded. Computed once.
    pub fn actual_size(&mut self) -> PixelSize {
        if let Some(size) = self.actual_size {
            return size;
        }
        let size = self
            .frame(0)
            .map(|frame| frame.size())
            .unwrap_or(PixelSize::ZERO);
        self.actual_size = Some(size);
        size
    }

    /// Currently installed handle.
    pub fn handle(&self) -> &C::Handle {
        &self.handle
    }

    /// Number of successful handle replacements so far.
    pub fn recoveries(&self) -> u64 {
        self.recoveries
    }

    /// Decode one frame; `None` when it is unavailable. See [`Reader::try_frame`].
    pub fn frame(&mut self, index: usize) -> Option<Bitmap> {
        match self.try_frame(index) {
            Ok(frame) => Some(frame),
            Err(e) => {
                tracing::debug!(index, error = %e, "frame unavailable");
                None
            }
        }
    }

    /// Decode one frame.
    ///
    /// If the container or the frame is not `Complete`, the handle is recovered once and the
    /// status re-checked. The codec is never asked to decode while either status is degraded.
    pub fn try_frame(&mut self, index: usize) -> GifResult<Bitmap> {
        if index >= self.frame_count {
            return Err(GifError::frame_unavailable(
                index,
                format!("out of range ({} frames)", self.frame_count),
            ));
        }

        if !self.is_ready(index) {
            self.recover();
            if !self.is_ready(index) {
                let (container, frame) = self.statuses(index);
                return Err(GifError::frame_unavailable(
                    index,
                    format!("container {container:?}, frame {frame:?} after recovery"),
                ));
            }
        }

        self.handle.decode_frame(index)
    }

    /// Re-open the source and install the fresh handle.
    ///
    /// Best-effort: when re-opening fails the previous handle is kept and `false` is returned.
    pub fn recover(&mut self) -> bool {
        match self.codec.open(&self.source) {
            Ok(handle) => {
                self.handle = handle;
                self.recoveries += 1;
                tracing::debug!(
                    source = %self.source,
                    recoveries = self.recoveries,
                    "recovered handle"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    source = %self.source,
                    error = %e,
                    "recovery failed, keeping previous handle"
                );
                false
            }
        }
    }

    /// Lazy, restartable walk over every decodable frame, in order.
    ///
    /// This decodes every index (recovering degraded ones as it goes). Prefer
    /// [`Reader::frame`] when only some frames are needed.
    pub fn frame_iter(&mut self) -> FrameIter<'_, C> {
        FrameIter::new(self.indexed_frames())
    }

    /// Like [`Reader::frame_iter`], yielding each bitmap with its frame index.
    pub fn indexed_frames(&mut self) -> IndexedFrames<'_, C> {
        IndexedFrames::new(self)
    }

    /// All decodable frames, materialized on first access and cached on the reader.
    ///
    /// Frames that fail to decode are omitted, so the result may be shorter than
    /// [`Reader::frame_count`].
    pub fn frames(&mut self) -> &[Bitmap] {
        if self.frames.is_none() {
            let all: Vec<Bitmap> = self.frame_iter().collect();
            self.frames = Some(all);
        }
        self.frames.as_deref().unwrap_or_default()
    }

    fn is_ready(&self, index: usize) -> bool {
        let (container, frame) = self.statuses(index);
        container.is_complete() && frame.is_complete()
    }

    fn statuses(&self, index: usize) -> (DecodeStatus, DecodeStatus) {
        (self.handle.status(), self.handle.frame_status(index))
    }
}

impl<C: ContainerCodec> std::fmt::Debug for Reader<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader")
            .field("source", &self.source.to_string())
            .field("loop_count", &self.loop_count)
            .field("frame_count", &self.frame_count)
            .field("average_frame_delay", &self.average_delay)
            .field("reported_size", &self.reported_size)
            .field("recoveries", &self.recoveries)
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/unit/reader/reader.rs"]
mod tests;

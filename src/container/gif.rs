use std::{io::Cursor, sync::Arc};

use image::{AnimationDecoder, codecs::gif::GifDecoder};

use crate::{
    container::blocks::{self, GifLayout},
    container::codec::{ContainerCodec, ContainerHandle, ContainerProperties, FrameProperties},
    container::source::ImageSource,
    foundation::core::{Bitmap, DecodeStatus},
    foundation::error::{GifError, GifResult},
};

/// Delays at or below this are clamped by browsers.
const BROWSER_CLAMP_THRESHOLD_SECS: f64 = 0.01;
/// Value browsers substitute for clamped delays.
const BROWSER_CLAMPED_DELAY_SECS: f64 = 0.1;

/// Default decoded-frame cache budget per handle.
pub const DEFAULT_MAX_CACHED_FRAME_BYTES: usize = 128 * 1024 * 1024;

/// Options for [`GifCodec`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GifCodecOpts {
    /// Upper bound on decoded RGBA bytes a handle keeps cached. `0` disables caching.
    pub max_cached_frame_bytes: usize,
}

impl Default for GifCodecOpts {
    fn default() -> Self {
        Self {
            max_cached_frame_bytes: DEFAULT_MAX_CACHED_FRAME_BYTES,
        }
    }
}

/// GIF codec: a structural block scan for metadata and status, `image` for pixels.
#[derive(Clone, Copy, Debug, Default)]
pub struct GifCodec {
    opts: GifCodecOpts,
}

impl GifCodec {
    /// Create a codec with explicit options.
    pub fn new(opts: GifCodecOpts) -> Self {
        Self { opts }
    }
}

impl ContainerCodec for GifCodec {
    type Handle = GifHandle;

    #[tracing::instrument(skip_all, fields(source = %source))]
    fn open(&self, source: &ImageSource) -> GifResult<GifHandle> {
        let bytes = source
            .read()
            .map_err(|e| GifError::not_decodable(format!("{e:#}")))?;
        let layout = blocks::scan(&bytes)
            .ok_or_else(|| GifError::not_decodable(format!("{source} is not a GIF stream")))?;

        tracing::debug!(
            frames = layout.frames.len(),
            status = ?layout.status,
            "opened gif container"
        );

        Ok(GifHandle {
            bytes,
            layout,
            cache: FrameCache::new(self.opts.max_cached_frame_bytes),
        })
    }
}

/// Handle over one read of a GIF source.
pub struct GifHandle {
    bytes: Arc<[u8]>,
    layout: GifLayout,
    cache: FrameCache,
}

impl std::fmt::Debug for GifHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GifHandle")
            .field("bytes_len", &self.bytes.len())
            .field("layout", &self.layout)
            .field("cached_frames", &self.cache.frames.len())
            .finish()
    }
}

impl GifHandle {
    /// Number of decoded frames currently cached.
    pub fn cached_frames(&self) -> usize {
        self.cache.frames.len()
    }

    fn decode_through(&mut self, index: usize) -> GifResult<Bitmap> {
        let decoder = GifDecoder::new(Cursor::new(Arc::clone(&self.bytes)))
            .map_err(|e| GifError::decode(format!("open gif decoder: {e}")))?;

        let mut found = None;
        for (idx, frame) in decoder.into_frames().enumerate() {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) if found.is_some() => {
                    tracing::debug!(
                        frame = idx,
                        error = %e,
                        "stopped read-ahead at undecodable frame"
                    );
                    break;
                }
                Err(e) => return Err(GifError::decode(format!("frame {idx}: {e}"))),
            };

            let bitmap = Bitmap::from_rgba_image(frame.into_buffer());
            let cached = idx == self.cache.frames.len() && self.cache.try_push(&bitmap);
            if idx == index {
                found = Some(bitmap);
            }
            // Keep reading ahead only while the cache keeps up.
            if found.is_some() && !cached {
                break;
            }
        }

        found.ok_or_else(|| GifError::decode(format!("frame {index} missing from stream")))
    }
}

impl ContainerHandle for GifHandle {
    fn status(&self) -> DecodeStatus {
        self.layout.status
    }

    fn frame_status(&self, index: usize) -> DecodeStatus {
        self.layout
            .frames
            .get(index)
            .map(|f| f.status)
            .unwrap_or(DecodeStatus::Unknown)
    }

    fn frame_count(&self) -> usize {
        self.layout.frames.len()
    }

    fn properties(&self) -> ContainerProperties {
        ContainerProperties {
            loop_count: self.layout.loop_count,
        }
    }

    fn frame_properties(&self, index: usize) -> Option<FrameProperties> {
        let frame = self.layout.frames.get(index)?;
        // Decoded frames are composited onto the logical screen.
        let screen = self.layout.screen;
        let unclamped = frame.delay_cs.map(|cs| f64::from(cs) / 100.0);

        Some(FrameProperties {
            pixel_width: (screen.width > 0).then_some(screen.width),
            pixel_height: (screen.height > 0).then_some(screen.height),
            delay_secs: unclamped.map(browser_clamp),
            unclamped_delay_secs: unclamped,
        })
    }

    fn decode_frame(&mut self, index: usize) -> GifResult<Bitmap> {
        if let Some(hit) = self.cache.frames.get(index) {
            return Ok(hit.clone());
        }
        self.decode_through(index)
    }
}

fn browser_clamp(delay_secs: f64) -> f64 {
    if delay_secs <= BROWSER_CLAMP_THRESHOLD_SECS {
        BROWSER_CLAMPED_DELAY_SECS
    } else {
        delay_secs
    }
}

/// Cached prefix `0..n` of decoded frames, bounded by a byte budget.
struct FrameCache {
    frames: Vec<Bitmap>,
    bytes_used: usize,
    budget: usize,
    exhausted: bool,
}

impl FrameCache {
    fn new(budget: usize) -> Self {
        Self {
            frames: Vec::new(),
            bytes_used: 0,
            budget,
            exhausted: false,
        }
    }

    fn try_push(&mut self, bitmap: &Bitmap) -> bool {
        if self.exhausted {
            return false;
        }
        let next = self.bytes_used.saturating_add(bitmap.byte_len());
        if next > self.budget {
            self.exhausted = true;
            tracing::debug!(
                cached = self.frames.len(),
                budget = self.budget,
                "frame cache budget reached"
            );
            return false;
        }
        self.bytes_used = next;
        self.frames.push(bitmap.clone());
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/gif.rs"]
mod tests;

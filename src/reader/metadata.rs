//! Metadata reads and the delay-normalization heuristic.
//!
//! Everything here runs once, when a [`Reader`](crate::Reader) is constructed. Missing
//! metadata is never an error: each read falls back to a documented default.

use crate::{
    container::codec::{ContainerHandle, FrameProperties},
    foundation::core::{LoopCount, PixelSize},
    foundation::error::{GifError, GifResult},
};

/// Delay used when a frame has no usable delay (matches Safari).
pub const DEFAULT_FRAME_DELAY_SECS: f64 = 0.1;
/// Shortest delay treated as playable; anything faster (>100 fps) is replaced by the default.
pub const MINIMUM_FRAME_DELAY_SECS: f64 = 0.01;

/// Delay-normalization settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReaderOpts {
    /// Substitute for absent or sub-threshold delays.
    pub default_frame_delay_secs: f64,
    /// Delays below this are replaced by `default_frame_delay_secs`.
    pub minimum_frame_delay_secs: f64,
}

impl Default for ReaderOpts {
    fn default() -> Self {
        Self {
            default_frame_delay_secs: DEFAULT_FRAME_DELAY_SECS,
            minimum_frame_delay_secs: MINIMUM_FRAME_DELAY_SECS,
        }
    }
}

impl ReaderOpts {
    /// Reject settings that would let a normalized delay fall under the minimum.
    pub fn validate(&self) -> GifResult<()> {
        if !(self.minimum_frame_delay_secs.is_finite() && self.minimum_frame_delay_secs > 0.0) {
            return Err(GifError::validation(
                "minimum_frame_delay_secs must be finite and > 0",
            ));
        }
        if !(self.default_frame_delay_secs.is_finite()
            && self.default_frame_delay_secs >= self.minimum_frame_delay_secs)
        {
            return Err(GifError::validation(
                "default_frame_delay_secs must be finite and >= minimum_frame_delay_secs",
            ));
        }
        Ok(())
    }
}

/// Container loop count; [`LoopCount::Undetermined`] when the metadata is absent.
pub fn loop_count(handle: &impl ContainerHandle) -> LoopCount {
    LoopCount::from_metadata(handle.properties().loop_count)
}

/// Frame-0 pixel size, absent unless both dimensions are present.
pub fn reported_size(handle: &impl ContainerHandle) -> Option<PixelSize> {
    let props = handle.frame_properties(0)?;
    Some(PixelSize::new(props.pixel_width?, props.pixel_height?))
}

/// Normalized delay of one frame, in seconds.
pub fn frame_delay(handle: &impl ContainerHandle, index: usize, opts: &ReaderOpts) -> f64 {
    normalize_delay(handle.frame_properties(index).as_ref(), opts)
}

/// Normalized delays for every frame, in order. Always `frame_count` long.
pub fn all_frame_delays(handle: &impl ContainerHandle, opts: &ReaderOpts) -> Vec<f64> {
    (0..handle.frame_count())
        .map(|index| frame_delay(handle, index, opts))
        .collect()
}

/// Prefer the unclamped delay over the clamped one (WebKit convention), fall back to the
/// default when neither exists or the chosen value is below the playable minimum.
pub fn normalize_delay(props: Option<&FrameProperties>, opts: &ReaderOpts) -> f64 {
    let chosen = props.and_then(|p| p.unclamped_delay_secs.or(p.delay_secs));
    match chosen {
        Some(delay) if delay >= opts.minimum_frame_delay_secs => delay,
        _ => opts.default_frame_delay_secs,
    }
}

/// True iff the delays contain exactly one distinct value.
pub fn are_all_same(delays: &[f64]) -> bool {
    !delays.is_empty() && delays.windows(2).all(|w| w[0] == w[1])
}

/// Arithmetic mean; `0.0` for an empty sequence.
pub fn average(delays: &[f64]) -> f64 {
    if delays.is_empty() {
        return 0.0;
    }
    delays.iter().sum::<f64>() / delays.len() as f64
}

#[cfg(test)]
#[path = "../../tests/unit/reader/metadata.rs"]
mod tests;

use std::sync::Arc;

/// Width x height in pixels.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// The `0 x 0` size reported when frame 0 cannot be decoded.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Build a size from its dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero.
    pub fn is_zero(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Readiness of a container, or of one frame inside it, as reported by a codec handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeStatus {
    /// The codec cannot tell what the data is. Never heals on its own; decoding is unsafe.
    Unknown,
    /// Data is present but not fully available yet.
    Incomplete,
    /// Ready to decode.
    Complete,
}

impl DecodeStatus {
    /// True only for [`DecodeStatus::Complete`].
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Loop count read from container metadata.
///
/// "Repeat forever" and "the container did not say" are kept apart so that playback drivers can
/// decide how to surface the latter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopCount {
    /// Metadata value `0`: loop until stopped.
    Forever,
    /// Metadata value `n > 0`.
    Finite(u32),
    /// No (readable) loop metadata.
    Undetermined,
}

impl LoopCount {
    /// Interpret a raw metadata value (`None` when the metadata is absent).
    pub fn from_metadata(raw: Option<u32>) -> Self {
        match raw {
            None => Self::Undetermined,
            Some(0) => Self::Forever,
            Some(n) => Self::Finite(n),
        }
    }

    /// The raw metadata value this loop count was read from.
    pub fn metadata_value(self) -> Option<u32> {
        match self {
            Self::Forever => Some(0),
            Self::Finite(n) => Some(n),
            Self::Undetermined => None,
        }
    }
}

/// A decoded frame in straight (non-premultiplied) RGBA8, composited onto the full canvas.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major, tightly packed RGBA8.
    pub rgba8: Arc<Vec<u8>>,
}

impl Bitmap {
    /// Take ownership of an `image` buffer.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            rgba8: Arc::new(img.into_raw()),
        }
    }

    /// Pixel dimensions.
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    /// Decoded byte footprint.
    pub fn byte_len(&self) -> usize {
        self.rgba8.len()
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba8.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

use std::sync::Arc;

use crate::{
    foundation::core::{Bitmap, PixelSize},
    foundation::error::{GifError, GifResult},
};

/// A frame in the form a renderer draws: premultiplied RGBA8.
#[derive(Clone, PartialEq, Eq)]
pub struct PreparedFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major, premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedFrame {
    /// Pixel dimensions.
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }
}

impl std::fmt::Debug for PreparedFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba8_premul.len())
            .finish()
    }
}

/// Force-decodes a frame into its drawable form. Called from worker threads.
pub trait FramePreparer: Send + Sync {
    /// Prepare one decoded frame.
    fn prepare(&self, frame: &Bitmap) -> GifResult<PreparedFrame>;
}

/// Premultiplies alpha; fully transparent pixels become transparent black.
#[derive(Clone, Copy, Debug, Default)]
pub struct PremultipliedPreparer;

impl FramePreparer for PremultipliedPreparer {
    fn prepare(&self, frame: &Bitmap) -> GifResult<PreparedFrame> {
        let expected = (frame.width as usize)
            .checked_mul(frame.height as usize)
            .and_then(|px| px.checked_mul(4));
        if expected != Some(frame.rgba8.len()) {
            return Err(GifError::decode(format!(
                "bitmap {}x{} carries {} bytes",
                frame.width,
                frame.height,
                frame.rgba8.len()
            )));
        }

        let mut rgba8_premul = frame.rgba8.to_vec();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Ok(PreparedFrame {
            width: frame.width,
            height: frame.height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = if a == 0 {
                0
            } else {
                ((u16::from(*c) * a + 127) / 255) as u8
            };
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/prepare.rs"]
mod tests;

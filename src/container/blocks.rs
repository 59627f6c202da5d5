//! Structural walk over a GIF byte stream.
//!
//! Only block boundaries are followed; LZW data is skipped, not decoded. The walk is what
//! tells a handle how many frames exist, which of them carry a graphic control extension and
//! whether the stream is complete.

use crate::foundation::core::{DecodeStatus, PixelSize};

const HEADER_LEN: usize = 6;
const LOGICAL_SCREEN_END: usize = 13;

const EXTENSION_INTRODUCER: u8 = 0x21;
const IMAGE_SEPARATOR: u8 = 0x2C;
const TRAILER: u8 = 0x3B;

const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;
const APPLICATION_LABEL: u8 = 0xFF;

const COLOR_TABLE_FLAG: u8 = 0x80;

/// What the walk learned about a stream.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GifLayout {
    pub screen: PixelSize,
    pub loop_count: Option<u32>,
    pub frames: Vec<FrameLayout>,
    pub status: DecodeStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FrameLayout {
    /// Delay in centiseconds, `None` when the frame has no graphic control extension.
    pub delay_cs: Option<u16>,
    pub status: DecodeStatus,
}

pub(crate) fn looks_like_gif(bytes: &[u8]) -> bool {
    bytes.len() >= HEADER_LEN
        && (&bytes[..HEADER_LEN] == b"GIF87a" || &bytes[..HEADER_LEN] == b"GIF89a")
}

/// Walk `bytes`. `None` when the header or logical screen descriptor is missing.
pub(crate) fn scan(bytes: &[u8]) -> Option<GifLayout> {
    if !looks_like_gif(bytes) || bytes.len() < LOGICAL_SCREEN_END {
        return None;
    }

    let screen = PixelSize::new(
        u32::from(u16::from_le_bytes([bytes[6], bytes[7]])),
        u32::from(u16::from_le_bytes([bytes[8], bytes[9]])),
    );
    let mut layout = GifLayout {
        screen,
        loop_count: None,
        frames: Vec::new(),
        status: DecodeStatus::Incomplete,
    };

    let mut cur = ByteCursor {
        data: bytes,
        pos: LOGICAL_SCREEN_END,
    };
    if cur.skip(color_table_len(bytes[10])).is_none() {
        return Some(layout);
    }

    layout.status = walk_blocks(&mut cur, &mut layout);
    Some(layout)
}

fn walk_blocks(cur: &mut ByteCursor<'_>, layout: &mut GifLayout) -> DecodeStatus {
    let mut pending_delay: Option<u16> = None;

    loop {
        let Some(introducer) = cur.u8() else {
            // Streams without a trailer are common; ending between blocks is accepted.
            return if layout.frames.is_empty() {
                DecodeStatus::Incomplete
            } else {
                DecodeStatus::Complete
            };
        };

        match introducer {
            EXTENSION_INTRODUCER => {
                let Some(label) = cur.u8() else {
                    return DecodeStatus::Incomplete;
                };
                let read = match label {
                    GRAPHIC_CONTROL_LABEL => read_graphic_control(cur).map(|delay| {
                        pending_delay = Some(delay);
                    }),
                    APPLICATION_LABEL => read_application(cur).map(|looped| {
                        if looped.is_some() {
                            layout.loop_count = looped;
                        }
                    }),
                    _ => cur.skip_sub_blocks(),
                };
                if read.is_none() {
                    return DecodeStatus::Incomplete;
                }
            }
            IMAGE_SEPARATOR => {
                let complete = read_image(cur).is_some();
                layout.frames.push(FrameLayout {
                    delay_cs: pending_delay.take(),
                    status: if complete {
                        DecodeStatus::Complete
                    } else {
                        DecodeStatus::Incomplete
                    },
                });
                if !complete {
                    return DecodeStatus::Incomplete;
                }
            }
            TRAILER => return DecodeStatus::Complete,
            _ => return DecodeStatus::Unknown,
        }
    }
}

/// Returns the delay in centiseconds.
fn read_graphic_control(cur: &mut ByteCursor<'_>) -> Option<u16> {
    let size = usize::from(cur.u8()?);
    let block = cur.take(size)?;
    let delay = if block.len() >= 3 {
        u16::from_le_bytes([block[1], block[2]])
    } else {
        0
    };
    cur.skip_sub_blocks()?;
    Some(delay)
}

/// Returns the loop count when this is a NETSCAPE2.0 / ANIMEXTS1.0 looping extension.
fn read_application(cur: &mut ByteCursor<'_>) -> Option<Option<u32>> {
    let size = usize::from(cur.u8()?);
    let ident = cur.take(size)?;
    let looping = ident == b"NETSCAPE2.0" || ident == b"ANIMEXTS1.0";

    let mut loop_count = None;
    cur.for_each_sub_block(|block| {
        if looping && loop_count.is_none() && block.len() >= 3 && block[0] == 0x01 {
            loop_count = Some(u32::from(u16::from_le_bytes([block[1], block[2]])));
        }
    })?;
    Some(loop_count)
}

fn read_image(cur: &mut ByteCursor<'_>) -> Option<()> {
    // left, top, width, height, packed
    let desc = cur.take(9)?;
    cur.skip(color_table_len(desc[8]))?;
    let _lzw_min_code_size = cur.u8()?;
    cur.skip_sub_blocks()
}

fn color_table_len(packed: u8) -> usize {
    if packed & COLOR_TABLE_FLAG == 0 {
        return 0;
    }
    3 * (1usize << ((packed & 0x07) + 1))
}

struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn u8(&mut self) -> Option<u8> {
        let b = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let out = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(out)
    }

    fn skip(&mut self, n: usize) -> Option<()> {
        self.take(n).map(|_| ())
    }

    fn for_each_sub_block(&mut self, mut f: impl FnMut(&'a [u8])) -> Option<()> {
        loop {
            let len = usize::from(self.u8()?);
            if len == 0 {
                return Some(());
            }
            f(self.take(len)?);
        }
    }

    fn skip_sub_blocks(&mut self) -> Option<()> {
        self.for_each_sub_block(|_| {})
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/blocks.rs"]
mod tests;

use std::iter::FusedIterator;

use crate::{container::codec::ContainerCodec, foundation::core::Bitmap, reader::Reader};

/// Walks frame indices `0..frame_count` through [`Reader::frame`], skipping absent frames.
///
/// Never short-circuits: a failed index is skipped and the walk continues with the next one.
pub struct IndexedFrames<'a, C: ContainerCodec> {
    reader: &'a mut Reader<C>,
    next: usize,
}

impl<'a, C: ContainerCodec> IndexedFrames<'a, C> {
    pub(crate) fn new(reader: &'a mut Reader<C>) -> Self {
        Self { reader, next: 0 }
    }
}

impl<C: ContainerCodec> Iterator for IndexedFrames<'_, C> {
    type Item = (usize, Bitmap);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.reader.frame_count() {
            let index = self.next;
            self.next += 1;
            if let Some(frame) = self.reader.frame(index) {
                return Some((index, frame));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.reader.frame_count().saturating_sub(self.next)))
    }
}

impl<C: ContainerCodec> FusedIterator for IndexedFrames<'_, C> {}

/// Bitmaps of [`IndexedFrames`] without their indices.
pub struct FrameIter<'a, C: ContainerCodec> {
    inner: IndexedFrames<'a, C>,
}

impl<'a, C: ContainerCodec> FrameIter<'a, C> {
    pub(crate) fn new(inner: IndexedFrames<'a, C>) -> Self {
        Self { inner }
    }
}

impl<C: ContainerCodec> Iterator for FrameIter<'_, C> {
    type Item = Bitmap;

    fn next(&mut self) -> Option<Bitmap> {
        self.inner.next().map(|(_, frame)| frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<C: ContainerCodec> FusedIterator for FrameIter<'_, C> {}

use std::sync::mpsc::{self, Receiver, TryRecvError};

use rayon::prelude::*;

use crate::{
    container::codec::ContainerCodec,
    container::gif::{GifCodec, GifCodecOpts},
    container::source::ImageSource,
    foundation::core::{Bitmap, LoopCount, PixelSize},
    foundation::error::{GifError, GifResult},
    playback::prepare::{FramePreparer, PremultipliedPreparer, PreparedFrame},
    reader::{Reader, metadata::ReaderOpts},
    timeline::{PlaybackTimeline, build_timeline},
};

/// Load settings, readable from a JSON config file.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoadOpts {
    /// Repeat forever regardless of the container's loop count.
    pub loop_forever: bool,
    /// Worker threads used to prepare frames. `None` uses one per core.
    pub threads: Option<usize>,
    /// Delay normalization.
    pub reader: ReaderOpts,
    /// Built-in codec settings.
    pub codec: GifCodecOpts,
}

/// Everything a player needs, produced off the UI thread.
#[derive(Debug)]
pub struct LoadedGif {
    /// Prepared frame 0, shown before and outside playback.
    pub first_frame: PreparedFrame,
    /// Present only when the source has more than one frame.
    pub timeline: Option<PlaybackTimeline<PreparedFrame>>,
    /// Frames announced by the container.
    pub frame_count: usize,
    /// Container loop count.
    pub loop_count: LoopCount,
    /// Size of the decoded frame 0.
    pub actual_size: PixelSize,
    /// Frame-0 size from metadata.
    pub reported_size: Option<PixelSize>,
}

/// Load `source` with the built-in codec and premultiplied frames.
pub fn load_gif(source: ImageSource, opts: LoadOpts) -> GifResult<LoadedGif> {
    load_with(GifCodec::new(opts.codec), &PremultipliedPreparer, source, opts)
}

/// Load `source` through any codec and preparer.
///
/// Frame 0 must decode. Other frames that fail are left out of the timeline together with their
/// delays.
#[tracing::instrument(skip_all, fields(source = %source))]
pub fn load_with<C, P>(
    codec: C,
    preparer: &P,
    source: ImageSource,
    opts: LoadOpts,
) -> GifResult<LoadedGif>
where
    C: ContainerCodec,
    P: FramePreparer + ?Sized,
{
    let mut reader = Reader::with_codec(codec, source, opts.reader)?;
    let first = reader.try_frame(0)?;
    let frame_count = reader.frame_count();

    let mut first_frame = None;
    let mut timeline = None;
    if frame_count > 1 {
        let pool = build_thread_pool(opts.threads)?;
        let decoded: Vec<(usize, Bitmap)> = reader.indexed_frames().collect();
        let delays: Vec<f64> = decoded
            .iter()
            .map(|(idx, _)| reader.frame_delays()[*idx])
            .collect();
        if decoded.len() < frame_count {
            tracing::warn!(
                decoded = decoded.len(),
                frame_count,
                "some frames failed to decode and were dropped"
            );
        }

        let prepared = pool.install(|| {
            decoded
                .par_iter()
                .map(|(_, bitmap)| preparer.prepare(bitmap))
                .collect::<GifResult<Vec<_>>>()
        })?;
        if decoded.first().map(|(idx, _)| *idx) == Some(0) {
            first_frame = prepared.first().cloned();
        }
        timeline = Some(build_timeline(
            prepared,
            &delays,
            opts.loop_forever,
            reader.loop_count(),
        )?);
    }

    let first_frame = match first_frame {
        Some(frame) => frame,
        None => preparer.prepare(&first)?,
    };

    tracing::debug!(
        frame_count,
        animated = timeline.is_some(),
        "gif loaded"
    );

    Ok(LoadedGif {
        first_frame,
        timeline,
        frame_count,
        loop_count: reader.loop_count(),
        actual_size: first.size(),
        reported_size: reader.reported_size(),
    })
}

fn build_thread_pool(threads: Option<usize>) -> GifResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(GifError::validation("load 'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| GifError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

/// Load `source` on a worker thread.
///
/// Dropping the returned [`PendingLoad`] abandons the result; the worker finishes and discards it.
pub fn spawn_load(source: ImageSource, opts: LoadOpts) -> PendingLoad {
    let (tx, rx) = mpsc::sync_channel(1);
    std::thread::spawn(move || {
        let outcome = load_gif(source, opts);
        if tx.send(outcome).is_err() {
            tracing::debug!("pending load dropped before completion");
        }
    });
    PendingLoad { rx, taken: false }
}

/// Result of a [`spawn_load`] that may not have arrived yet.
#[derive(Debug)]
pub struct PendingLoad {
    rx: Receiver<GifResult<LoadedGif>>,
    taken: bool,
}

impl PendingLoad {
    /// Block until the worker delivers.
    pub fn wait(self) -> GifResult<LoadedGif> {
        self.rx.recv().map_err(|_| worker_lost())?
    }

    /// Take the result if it is ready. Returns `None` while loading and after it was taken.
    pub fn try_take(&mut self) -> Option<GifResult<LoadedGif>> {
        if self.taken {
            return None;
        }
        let outcome = match self.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(worker_lost()),
        };
        self.taken = true;
        Some(outcome)
    }
}

fn worker_lost() -> GifError {
    GifError::Other(anyhow::anyhow!("load worker exited without a result"))
}

#[cfg(test)]
#[path = "../../tests/unit/playback/loader.rs"]
mod tests;

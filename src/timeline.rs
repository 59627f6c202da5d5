//! Loop-aware playback schedule built from decoded frames and their delays.

use crate::{
    foundation::core::LoopCount,
    foundation::error::{GifError, GifResult},
};

/// How often a timeline plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    /// Loop until stopped.
    Forever,
    /// Play this many passes. `0` plays once.
    Count(u32),
    /// The container did not say; drivers loop as long as they can.
    Unspecified,
}

impl Repeat {
    /// `loop_forever` wins; otherwise the container's loop count decides.
    pub fn from_loop(loop_forever: bool, loop_count: LoopCount) -> Self {
        if loop_forever {
            return Self::Forever;
        }
        match loop_count {
            LoopCount::Forever => Self::Forever,
            LoopCount::Finite(n) => Self::Count(n),
            LoopCount::Undetermined => Self::Unspecified,
        }
    }

    /// Numeric repeat count for animation drivers: `0` repeats until stopped, `Count(0)` plays
    /// once like `Count(1)` and [`Repeat::Unspecified`] maps to `u32::MAX`.
    pub fn repeat_count(self) -> u32 {
        match self {
            Self::Forever => 0,
            Self::Count(n) => n.max(1),
            Self::Unspecified => u32::MAX,
        }
    }

    fn passes(self) -> Option<u32> {
        match self {
            Self::Count(n) => Some(n.max(1)),
            Self::Forever | Self::Unspecified => None,
        }
    }
}

/// Immutable frame schedule.
///
/// `key_times` has one entry per frame plus a closing `1.0`; entry `i` is the fraction of one
/// pass at which frame `i` starts showing.
#[derive(Clone)]
pub struct PlaybackTimeline<F> {
    frames: Vec<F>,
    key_times: Vec<f64>,
    duration_secs: f64,
    repeat: Repeat,
}

/// Build a timeline from frames and their per-frame delays in seconds.
pub fn build_timeline<F>(
    frames: Vec<F>,
    delays: &[f64],
    loop_forever: bool,
    loop_count: LoopCount,
) -> GifResult<PlaybackTimeline<F>> {
    PlaybackTimeline::new(frames, delays, Repeat::from_loop(loop_forever, loop_count))
}

impl<F> PlaybackTimeline<F> {
    /// Build with an explicit repeat policy.
    pub fn new(frames: Vec<F>, delays: &[f64], repeat: Repeat) -> GifResult<Self> {
        if frames.is_empty() {
            return Err(GifError::EmptyTimeline);
        }
        if frames.len() != delays.len() {
            return Err(GifError::FrameDelayMismatch {
                frames: frames.len(),
                delays: delays.len(),
            });
        }
        if let Some(idx) = delays.iter().position(|d| !d.is_finite() || *d < 0.0) {
            return Err(GifError::validation(format!(
                "delay {idx} must be finite and >= 0 (got {})",
                delays[idx]
            )));
        }

        let duration_secs: f64 = delays.iter().sum();
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(GifError::ZeroDurationTimeline {
                total_secs: duration_secs,
            });
        }

        let mut key_times = Vec::with_capacity(frames.len() + 1);
        key_times.push(0.0);
        for delay in &delays[..delays.len() - 1] {
            let prev = key_times[key_times.len() - 1];
            key_times.push((prev + delay / duration_secs).min(1.0));
        }
        key_times.push(1.0);

        Ok(Self {
            frames,
            key_times,
            duration_secs,
            repeat,
        })
    }

    /// Frames in display order.
    pub fn frames(&self) -> &[F] {
        &self.frames
    }

    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Start fraction of each frame, followed by `1.0`.
    pub fn key_times(&self) -> &[f64] {
        &self.key_times
    }

    /// Length of one pass, in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Repeat policy.
    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    /// See [`Repeat::repeat_count`].
    pub fn repeat_count(&self) -> u32 {
        self.repeat.repeat_count()
    }

    /// Index of the frame on screen `elapsed_secs` after playback started.
    ///
    /// Frames hold until the next key time. Negative or NaN elapsed times show frame 0; once a
    /// counted repeat has run out the last frame stays up.
    pub fn frame_index_at(&self, elapsed_secs: f64) -> usize {
        if elapsed_secs.is_nan() || elapsed_secs <= 0.0 {
            return 0;
        }
        if self.is_finished_at(elapsed_secs) || elapsed_secs.is_infinite() {
            return self.frames.len() - 1;
        }

        let fraction = (elapsed_secs % self.duration_secs) / self.duration_secs;
        let starts = &self.key_times[..self.frames.len()];
        let idx = starts.partition_point(|k| *k <= fraction);
        idx.saturating_sub(1).min(self.frames.len() - 1)
    }

    /// Frame on screen at `elapsed_secs`.
    pub fn frame_at(&self, elapsed_secs: f64) -> &F {
        &self.frames[self.frame_index_at(elapsed_secs)]
    }

    /// True once a counted repeat has played all its passes. Never true for looping timelines.
    pub fn is_finished_at(&self, elapsed_secs: f64) -> bool {
        match self.repeat.passes() {
            Some(passes) => elapsed_secs >= self.duration_secs * f64::from(passes),
            None => false,
        }
    }
}

impl<F> std::fmt::Debug for PlaybackTimeline<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackTimeline")
            .field("frames", &self.frames.len())
            .field("key_times", &self.key_times)
            .field("duration_secs", &self.duration_secs)
            .field("repeat", &self.repeat)
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/unit/timeline.rs"]
mod tests;

use std::time::Instant;

use crate::{
    foundation::core::PixelSize, playback::loader::LoadedGif, playback::prepare::PreparedFrame,
};

/// Where a [`GifPlayer`] is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    /// Nothing loaded.
    Idle,
    /// A GIF is loaded and showing its first frame.
    Loaded,
    /// The timeline is running.
    Playing,
    /// Playback stopped; the first frame shows again.
    Paused,
}

/// Headless playback driver.
///
/// Time is passed in by the caller, so the player can be driven by any clock.
#[derive(Debug)]
pub struct GifPlayer {
    loaded: Option<LoadedGif>,
    state: PlayerState,
    started_at: Option<Instant>,
}

impl Default for GifPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl GifPlayer {
    /// An idle player.
    pub fn new() -> Self {
        Self {
            loaded: None,
            state: PlayerState::Idle,
            started_at: None,
        }
    }

    /// Replace whatever is loaded. Playback stops.
    pub fn load(&mut self, gif: LoadedGif) {
        tracing::debug!(
            frame_count = gif.frame_count,
            animated = gif.timeline.is_some(),
            "player loaded"
        );
        self.loaded = Some(gif);
        self.state = PlayerState::Loaded;
        self.started_at = None;
    }

    /// Drop the loaded GIF and return to [`PlayerState::Idle`].
    pub fn clear(&mut self) {
        self.loaded = None;
        self.state = PlayerState::Idle;
        self.started_at = None;
    }

    /// Currently loaded GIF.
    pub fn loaded(&self) -> Option<&LoadedGif> {
        self.loaded.as_ref()
    }

    /// Lifecycle state.
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// True when a timeline is loaded.
    pub fn is_ready_to_play(&self) -> bool {
        self.loaded.as_ref().is_some_and(|gif| gif.timeline.is_some())
    }

    /// True while the timeline runs.
    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    /// Start (or restart after a pause) the timeline from frame 0 at `now`.
    ///
    /// Does nothing while already playing. Returns whether the player is playing afterwards.
    pub fn resume(&mut self, now: Instant) -> bool {
        if !self.is_ready_to_play() {
            return false;
        }
        if self.state != PlayerState::Playing {
            self.state = PlayerState::Playing;
            self.started_at = Some(now);
        }
        true
    }

    /// Stop the timeline. The elapsed position is discarded.
    pub fn pause(&mut self) {
        if self.state == PlayerState::Playing {
            self.state = PlayerState::Paused;
            self.started_at = None;
        }
    }

    /// Index of the frame showing at `now`; `None` when idle.
    pub fn current_frame_index(&self, now: Instant) -> Option<usize> {
        let gif = self.loaded.as_ref()?;
        match (&gif.timeline, self.started_at) {
            (Some(timeline), Some(start)) if self.is_playing() => {
                let elapsed = now.saturating_duration_since(start).as_secs_f64();
                Some(timeline.frame_index_at(elapsed))
            }
            _ => Some(0),
        }
    }

    /// Frame showing at `now`; `None` when idle.
    pub fn current_frame(&self, now: Instant) -> Option<&PreparedFrame> {
        let gif = self.loaded.as_ref()?;
        match (&gif.timeline, self.started_at) {
            (Some(timeline), Some(start)) if self.is_playing() => {
                let elapsed = now.saturating_duration_since(start).as_secs_f64();
                Some(timeline.frame_at(elapsed))
            }
            _ => Some(&gif.first_frame),
        }
    }

    /// Natural display size: the decoded frame-0 size, `0 x 0` when nothing is loaded.
    pub fn intrinsic_size(&self) -> PixelSize {
        self.loaded
            .as_ref()
            .map(|gif| gif.actual_size)
            .unwrap_or(PixelSize::ZERO)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/player.rs"]
mod tests;

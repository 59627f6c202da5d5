/// Convenience result type used across gifreel.
pub type GifResult<T> = Result<T, GifError>;

/// Top-level error taxonomy used by reader, timeline and playback APIs.
///
/// Missing metadata is never an error: loop counts, sizes and delays fall back to documented
/// defaults inside the metadata reader.
#[derive(thiserror::Error, Debug)]
pub enum GifError {
    /// The source could not be opened as a GIF container.
    #[error("not decodable: {0}")]
    NotDecodable(String),

    /// A frame index is out of range or its status never reached `Complete`.
    #[error("frame {index} unavailable: {reason}")]
    FrameUnavailable {
        /// Requested frame index.
        index: usize,
        /// Human-readable cause.
        reason: String,
    },

    /// The codec failed while producing pixels for a frame that reported `Complete`.
    #[error("decode error: {0}")]
    Decode(String),

    /// A timeline was requested for an empty frame sequence.
    #[error("timeline error: no frames to schedule")]
    EmptyTimeline,

    /// The delays of a timeline sum to zero (or less), so key times are undefined.
    #[error("timeline error: total duration must be > 0 (got {total_secs})")]
    ZeroDurationTimeline {
        /// Sum of the provided delays.
        total_secs: f64,
    },

    /// Frames and delays handed to the timeline builder have different lengths.
    #[error("timeline error: {frames} frames but {delays} delays")]
    FrameDelayMismatch {
        /// Number of frames.
        frames: usize,
        /// Number of delays.
        delays: usize,
    },

    /// Invalid user-provided options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifError {
    /// Build a [`GifError::NotDecodable`] value.
    pub fn not_decodable(msg: impl Into<String>) -> Self {
        Self::NotDecodable(msg.into())
    }

    /// Build a [`GifError::FrameUnavailable`] value.
    pub fn frame_unavailable(index: usize, reason: impl Into<String>) -> Self {
        Self::FrameUnavailable {
            index,
            reason: reason.into(),
        }
    }

    /// Build a [`GifError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`GifError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

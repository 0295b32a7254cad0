use thiserror::Error;

use crate::palette::Rgb;

/// Errors raised before or while running the zone pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("palette needs at least 2 anchors, got {0}")]
    TooFewAnchors(usize),

    #[error("palette anchors {first:?} and {second:?} share intensity {intensity}")]
    DuplicateIntensity {
        first: Rgb,
        second: Rgb,
        intensity: u8,
    },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("could not render histogram: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;

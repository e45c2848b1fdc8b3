// Video module
// Contains: exact-timestamp frame extraction, background thumbnail
// generation, ffprobe metadata

mod decoder;
mod generator;
mod probe;

#[allow(unused_imports)]
pub use decoder::FrameDecoder;
pub use decoder::RgbaFrame;
pub use generator::{GeneratorEvent, ThumbnailGenerator};
pub use probe::{probe_video, VideoMetadata};

use std::path::PathBuf;
use thiserror::Error;

/// Errors from opening a video or extracting a single frame.
///
/// A per-offset failure is non-fatal: the affected strip tile renders blank
/// and the batch still completes.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file does not contain a video stream.
    #[error("no video stream in {}", .0.display())]
    NoVideoStream(PathBuf),

    /// No frame at or after the requested offset could be decoded.
    #[error("no frame available at {0:.3}s")]
    FrameUnavailable(f64),

    /// Anything ffmpeg reported while opening, seeking, or decoding.
    #[error(transparent)]
    Ffmpeg(#[from] ffmpeg_next::Error),
}

//! Errors raised while handing finished frames to an output.

use std::fmt;
use std::io;

/// Failure to present a frame.
#[derive(Debug)]
pub enum PresentError {
    /// SDL reported an error (SDL errors are plain strings).
    Sdl(String),
    /// Encoding a frame image failed.
    Image(image::ImageError),
    /// Writing a frame to disk failed.
    Io(io::Error),
}

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentError::Sdl(msg) => write!(f, "SDL error: {}", msg),
            PresentError::Image(err) => write!(f, "image encoding error: {}", err),
            PresentError::Io(err) => write!(f, "frame IO error: {}", err),
        }
    }
}

impl std::error::Error for PresentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PresentError::Sdl(_) => None,
            PresentError::Image(err) => Some(err),
            PresentError::Io(err) => Some(err),
        }
    }
}

impl From<String> for PresentError {
    fn from(msg: String) -> Self {
        PresentError::Sdl(msg)
    }
}

impl From<image::ImageError> for PresentError {
    fn from(err: image::ImageError) -> Self {
        PresentError::Image(err)
    }
}

impl From<io::Error> for PresentError {
    fn from(err: io::Error) -> Self {
        PresentError::Io(err)
    }
}

//! Error taxonomy shared by every component.
//!
//! None of these are panics: a failed frame, a failed write, or a failed
//! pane write are all recoverable, and the caller is always told which of
//! the error kinds below it hit.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("width or height is zero")]
    InvalidDimensions,

    #[error("coordinates are outside the pane")]
    InvalidCoordinates,

    #[error("cell is not owned by this pane")]
    InvalidPane,

    #[error("escape sequence exceeded the scratch buffer")]
    EscapeBufferOverflow,

    #[error("frame byte budget exceeded")]
    WriteBufferOverflow,

    #[error("failed to flush output")]
    FlushFailed(#[source] std::io::Error),

    #[error("failed to grow the input event buffer")]
    AllocFailed,

    #[error("failed to get or set terminal attributes")]
    TerminalAttrFailed(#[source] std::io::Error),

    /// Never produced by this implementation: `std::time::Instant::now()`
    /// cannot fail on any platform Rust supports. Kept so a caller matching
    /// exhaustively on every error kind the spec names still compiles
    /// against one that could, in principle, surface it.
    #[error("failed to read the monotonic clock")]
    TimingFailed,
}

pub type Result<T> = std::result::Result<T, Error>;

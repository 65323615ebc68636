//! # gridterm
//!
//! A grid-based terminal UI core for full-screen POSIX applications: a
//! differential renderer, a pane compositor arbitrated by a render mask, a
//! raw-stdin input pipeline with its own ANSI/mouse parsing, and a
//! fixed-tick main loop. No curses-family dependency, no async runtime.
//!
//! ## Data flow
//!
//! One frame is: [`tick::TickContext::tick`] blocks until the next
//! deadline, the application drains [`input::InputPipeline::drain`] and
//! mutates pane cells through [`screen::Screen`], and
//! [`renderer::render`] diffs the result against the previous frame and
//! writes the minimal ANSI byte stream to bring the terminal up to date.
//!
//! ## Modules
//!
//! - [`style`] — packed `Style`/`Glyph`/`Color` types
//! - [`screen`] — the glyph grid and the `Pane` compositor
//! - [`renderer`] — the differential renderer and its ANSI builders
//! - [`input`] — the reader thread, event buffer, and raw-mode terminal setup
//! - [`tick`] — the fixed-tick loop driver
//! - [`error`] — the shared error taxonomy

pub mod error;
pub mod input;
pub mod renderer;
pub mod screen;
pub mod style;
pub mod tick;

pub use error::{Error, Result};
pub use input::{EventBuffer, InputEvent, InputPipeline, StopFlag};
pub use renderer::render;
pub use screen::{Pane, Screen};
pub use style::{Color, Glyph, Style, StyleFlags};
pub use tick::{TickContext, TickOutcome};

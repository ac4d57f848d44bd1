//! Capture the whole Windows desktop, across all monitors, as one PNG image.
//!
//! Monitors placed left of or above the primary one have negative
//! coordinates; they are composited at their offset from the top-left corner
//! of the virtual desktop bounds.

mod capturer;
mod encode;
mod error;
mod geometry;
mod platform;
mod plugin;
mod source;

#[cfg(windows)]
mod ext;
#[cfg(windows)]
mod gdi;
#[cfg(windows)]
mod scanner;

pub use capturer::*;
pub use encode::*;
pub use error::*;
pub use geometry::*;
pub use platform::*;
pub use plugin::*;
pub use source::*;

#[cfg(windows)]
pub use ext::*;
#[cfg(windows)]
pub use gdi::*;
#[cfg(windows)]
pub use scanner::*;

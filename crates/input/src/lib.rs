//! Input: raw device state collected between frames and folded into one
//! [`FrameInput`] per frame.
//!
//! # Invariants
//! - The game kernel consumes [`FrameInput`] and [`Action`]s, never window
//!   events, so the loop runs the same headless and on the desktop.
//! - Mouse delta, scroll and clicks are per-frame; held keys persist.

pub mod action;
pub mod state;

pub use action::Action;
pub use state::{FrameInput, InputState, Key, MouseButton};

pub fn crate_info() -> &'static str {
    "gridwalk-input v0.1.0"
}

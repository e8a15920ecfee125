//! Drives a mouse-only canvas application from a touchscreen.
//!
//! Raw touches on the designated canvas pass through the interception gate,
//! a gesture classifier decides between tap, right-drag, two-finger pan/zoom
//! and long-press, and the synthesizer dispatches the matching mouse and
//! wheel events on the canvas. Everything except `web` and the page sealing in
//! `broker` is platform-neutral and runs under plain `cargo test`.

pub mod bridge;
pub mod broker;
pub mod config;
pub mod error;
pub mod gate;
pub mod gesture;
pub mod synth;
pub mod touch;
pub mod util;
pub mod web;

pub use bridge::Bridge;
pub use config::{BridgeConfig, GestureConfig};
pub use error::{BridgeError, BridgeResult};
pub use gesture::{Classifier, GestureMode};
pub use web::{install, Installation};

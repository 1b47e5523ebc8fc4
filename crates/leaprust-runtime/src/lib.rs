//! LeapRust Runtime - Controller handle and frame delivery
//!
//! A `Controller` wraps a tracking service, registers one `FrameListener`
//! on its event stream, and hands each new frame's snapshot to a sink:
//! 1. The service fires a frame event on its own thread
//! 2. The listener extracts the latest live frame into a scratch snapshot
//! 3. The snapshot goes to the sink inline, or through a single-slot
//!    mailbox to a dispatcher thread or a polling consumer
//!
//! Lifecycle events are logged through `tracing`; only frame events reach
//! the sink.

pub mod config;
pub mod controller;
pub mod listener;
pub mod logging;
pub mod mailbox;

pub use config::*;
pub use controller::*;
pub use listener::*;
pub use logging::*;
pub use mailbox::*;

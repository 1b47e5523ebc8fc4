//! LeapRust Sim - Stand-in tracking services
//!
//! This crate provides:
//! - `ScriptedService`: frames and events pushed by the caller, delivered
//!   synchronously on the caller's thread
//! - `SimulatedService`: a background event thread producing synthetic
//!   hand motion at a fixed rate
//! - Fixture builders for live hands and fingers

pub mod fixtures;
pub mod scripted;
pub mod simulated;

pub use fixtures::*;
pub use scripted::*;
pub use simulated::*;

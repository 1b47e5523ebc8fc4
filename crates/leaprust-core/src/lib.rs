//! LeapRust Core - Snapshot types and the tracking SDK contract
//!
//! This crate defines everything that crosses the native boundary:
//! - Geometric value types (Vector3, Basis)
//! - The fixed-capacity frame snapshot (Frame, Hand, Finger, Bone, Arm)
//! - Finger, bone and state name tables
//! - The live SDK object contract and an owned implementation of it
//! - The frame extractor that walks a live frame into a snapshot
//! - The tracking service / event contract

pub mod error;
pub mod extract;
pub mod live;
pub mod names;
pub mod schema;
pub mod sdk;
pub mod service;
pub mod vector;

pub use error::*;
pub use extract::*;
pub use live::*;
pub use names::*;
pub use schema::*;
pub use sdk::{TrackedArm, TrackedBone, TrackedFinger, TrackedFrame, TrackedHand};
pub use service::*;
pub use vector::*;

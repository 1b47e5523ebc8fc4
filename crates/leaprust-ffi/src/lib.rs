#![allow(clippy::missing_safety_doc)]
//! LeapRust FFI - Foreign Function Interface
//!
//! C-compatible bindings for hosts embedding the tracking bridge.
//! Snapshots are `#[repr(C)]` records the host reads in place; the
//! generated `leaprust.h` mirrors them.

pub mod controller;
pub mod error;
pub mod service;
pub mod types;

use std::ffi::{c_char, c_int};

use leaprust_core::{BoneType, FingerType, Frame, FrameState};
use leaprust_runtime::{init_logging, LogConfig};

pub use controller::*;
pub use error::*;
pub use service::*;
pub use types::*;

/// Library version
#[no_mangle]
pub extern "C" fn leaprust_version() -> *const c_char {
    static VERSION: &[u8] = b"0.2.0\0";
    VERSION.as_ptr() as *const c_char
}

/// Initialize the LeapRust library
/// Installs logging; `RUST_LOG` overrides the default `info` filter.
/// Safe to call more than once. Returns 0.
#[no_mangle]
pub extern "C" fn leaprust_init() -> c_int {
    init_logging(&LogConfig::default());
    0
}

/// Allocate a zeroed frame owned by the caller
/// Free with `leaprust_frame_free`
#[no_mangle]
pub extern "C" fn leaprust_blank_frame() -> *mut LeapRustFrame {
    Box::into_raw(Frame::blank())
}

/// Free a frame from `leaprust_blank_frame`
#[no_mangle]
pub unsafe extern "C" fn leaprust_frame_free(frame: *mut LeapRustFrame) {
    if !frame.is_null() {
        drop(Box::from_raw(frame));
    }
}

/// Size of `LeapRustFrame` in bytes, for hosts checking their layout
#[no_mangle]
pub extern "C" fn leaprust_frame_size() -> usize {
    std::mem::size_of::<LeapRustFrame>()
}

static FINGER_NAMES_C: [&[u8]; 5] = [b"Thumb\0", b"Index\0", b"Middle\0", b"Ring\0", b"Pinky\0"];
static BONE_NAMES_C: [&[u8]; 4] = [b"Metacarpal\0", b"Proximal\0", b"Middle\0", b"Distal\0"];
static STATE_NAMES_C: [&[u8]; 4] = [
    b"STATE_INVALID\0",
    b"STATE_START\0",
    b"STATE_UPDATE\0",
    b"STATE_END\0",
];

fn table_entry(table: &'static [&'static [u8]], index: c_int) -> *const c_char {
    usize::try_from(index)
        .ok()
        .and_then(|i| table.get(i))
        .map_or(std::ptr::null(), |name| name.as_ptr() as *const c_char)
}

/// Finger name for a finger type, NULL if out of range
#[no_mangle]
pub extern "C" fn leaprust_finger_name(finger_type: c_int) -> *const c_char {
    debug_assert_eq!(FINGER_NAMES_C.len(), FingerType::ALL.len());
    table_entry(&FINGER_NAMES_C, finger_type)
}

/// Bone name for a bone type, NULL if out of range
#[no_mangle]
pub extern "C" fn leaprust_bone_name(bone_type: c_int) -> *const c_char {
    debug_assert_eq!(BONE_NAMES_C.len(), BoneType::ALL.len());
    table_entry(&BONE_NAMES_C, bone_type)
}

/// Gesture state name, NULL if out of range
#[no_mangle]
pub extern "C" fn leaprust_state_name(state: c_int) -> *const c_char {
    debug_assert_eq!(STATE_NAMES_C.len(), FrameState::ALL.len());
    table_entry(&STATE_NAMES_C, state)
}

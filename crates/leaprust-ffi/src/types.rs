//! FFI Types - C-compatible type definitions
//!
//! The snapshot records are already `#[repr(C)]`; they are re-exported here
//! under the names the generated header uses.

use std::ffi::{c_int, c_void};

use leaprust_core::Frame;
use leaprust_runtime::{DeliveryMode, FrameSink};

pub type LeapRustVector = leaprust_core::Vector3;
pub type LeapRustBasis = leaprust_core::Basis;
pub type LeapRustBone = leaprust_core::Bone;
pub type LeapRustFinger = leaprust_core::Finger;
pub type LeapRustArm = leaprust_core::Arm;
pub type LeapRustHand = leaprust_core::Hand;
pub type LeapRustFrame = leaprust_core::Frame;

/// Callback function type for delivered frames.
///
/// `frame` is only valid for the duration of the call. Runs on the tracking
/// service's event thread, or the dispatcher thread in dispatched mode.
/// Once `leaprust_controller_free` or `..._unregister_listener` returns on
/// another thread, the callback is not running and is not called again, so
/// `env` may be released. The callback may free its own controller.
pub type LeapRustFrameCallback = extern "C" fn(env: *mut c_void, frame: *const LeapRustFrame);

/// Delivery mode
///
/// Passed from C as a plain `int` and checked with `TryFrom`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeapRustDeliveryMode {
    /// Callback runs on the service's event thread
    Inline = 0,
    /// Callback runs on a dedicated dispatcher thread; stale frames are dropped
    Dispatched = 1,
    /// No callback; the host pulls with `leaprust_controller_poll_frame`
    Polled = 2,
}

impl TryFrom<c_int> for LeapRustDeliveryMode {
    type Error = c_int;

    fn try_from(value: c_int) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LeapRustDeliveryMode::Inline),
            1 => Ok(LeapRustDeliveryMode::Dispatched),
            2 => Ok(LeapRustDeliveryMode::Polled),
            other => Err(other),
        }
    }
}

impl From<LeapRustDeliveryMode> for DeliveryMode {
    fn from(mode: LeapRustDeliveryMode) -> Self {
        match mode {
            LeapRustDeliveryMode::Inline => DeliveryMode::Inline,
            LeapRustDeliveryMode::Dispatched => DeliveryMode::Dispatched,
            LeapRustDeliveryMode::Polled => DeliveryMode::Polled,
        }
    }
}

/// Host-provided context pointer passed back to every callback
#[derive(Clone, Copy)]
pub(crate) struct HostEnv(*mut c_void);

// The host promises `env` may be used from the delivering thread.
unsafe impl Send for HostEnv {}
unsafe impl Sync for HostEnv {}

impl HostEnv {
    pub(crate) fn new(env: *mut c_void) -> Self {
        HostEnv(env)
    }

    pub(crate) fn as_ptr(self) -> *mut c_void {
        self.0
    }
}

/// Forwards delivered snapshots to a C callback
pub(crate) struct CallbackSink {
    callback: LeapRustFrameCallback,
    env: HostEnv,
}

impl CallbackSink {
    pub(crate) fn new(callback: LeapRustFrameCallback, env: HostEnv) -> Self {
        CallbackSink { callback, env }
    }
}

impl FrameSink for CallbackSink {
    fn deliver(&self, frame: &Frame) {
        (self.callback)(self.env.as_ptr(), frame as *const Frame);
    }
}

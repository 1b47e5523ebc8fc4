//! Controller FFI functions

use std::ffi::{c_int, c_void};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use leaprust_core::{LeapRustError, LeapRustResult, TrackingService};
use leaprust_runtime::{Controller, ControllerConfig, DeliveryMode, FrameSink};

use crate::error::{
    fail, invalid_argument, result_to_int, set_last_error, FfiResult, LeapRustErrorCode,
};
use crate::service::current_service;
use crate::types::{
    CallbackSink, HostEnv, LeapRustDeliveryMode, LeapRustFrame, LeapRustFrameCallback,
};

/// Opaque controller handle
pub struct LeapRustController {
    inner: Controller,
}

impl LeapRustController {
    pub fn controller(&self) -> &Controller {
        &self.inner
    }
}

/// Build a handle over an explicit service.
///
/// `callback` is required unless `mode` is polled.
pub fn create_controller(
    service: Arc<dyn TrackingService>,
    env: *mut c_void,
    callback: Option<LeapRustFrameCallback>,
    mode: LeapRustDeliveryMode,
) -> FfiResult<Box<LeapRustController>> {
    let config = ControllerConfig {
        delivery: DeliveryMode::from(mode),
        ..Default::default()
    };

    let controller: LeapRustResult<Controller> = match (mode, callback) {
        (LeapRustDeliveryMode::Polled, _) => Controller::polled(service, config),
        (_, Some(callback)) => {
            let sink: Arc<dyn FrameSink> =
                Arc::new(CallbackSink::new(callback, HostEnv::new(env)));
            Controller::new(service, sink, config)
        }
        (_, None) => return Err(invalid_argument("callback")),
    };

    let inner = controller.map_err(fail)?;
    debug!(?mode, "ffi controller created");
    Ok(Box::new(LeapRustController { inner }))
}

fn create_with_installed(
    env: *mut c_void,
    callback: Option<LeapRustFrameCallback>,
    mode: LeapRustDeliveryMode,
) -> *mut LeapRustController {
    let result =
        current_service().and_then(|service| create_controller(service, env, callback, mode));
    match result {
        Ok(handle) => Box::into_raw(handle),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Create a controller whose callback runs on the tracking service's thread
/// Returns NULL on error (no service installed, null callback)
#[no_mangle]
pub extern "C" fn leaprust_controller_create(
    env: *mut c_void,
    callback: Option<LeapRustFrameCallback>,
) -> *mut LeapRustController {
    create_with_installed(env, callback, LeapRustDeliveryMode::Inline)
}

/// Create a controller with an explicit delivery mode
/// `mode` is a `LeapRustDeliveryMode` value; `callback` may be NULL only for
/// polled mode. Returns NULL on error (unknown mode included)
#[no_mangle]
pub extern "C" fn leaprust_controller_create_with_mode(
    env: *mut c_void,
    callback: Option<LeapRustFrameCallback>,
    mode: c_int,
) -> *mut LeapRustController {
    match LeapRustDeliveryMode::try_from(mode) {
        Ok(mode) => create_with_installed(env, callback, mode),
        Err(_) => {
            invalid_argument(&format!("delivery mode {mode}"));
            std::ptr::null_mut()
        }
    }
}

/// Free a controller, unregistering its listener first
#[no_mangle]
pub unsafe extern "C" fn leaprust_controller_free(handle: *mut LeapRustController) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Register the controller's listener
/// Returns 0 on success, negative on error
#[no_mangle]
pub unsafe extern "C" fn leaprust_controller_register_listener(
    handle: *mut LeapRustController,
) -> c_int {
    let Some(handle) = handle.as_ref() else {
        return invalid_argument("handle").into();
    };
    result_to_int(handle.inner.register_listener().map_err(fail))
}

/// Unregister the controller's listener
/// Returns 0 on success, negative on error
#[no_mangle]
pub unsafe extern "C" fn leaprust_controller_unregister_listener(
    handle: *mut LeapRustController,
) -> c_int {
    let Some(handle) = handle.as_ref() else {
        return invalid_argument("handle").into();
    };
    result_to_int(handle.inner.unregister_listener().map_err(fail))
}

/// Returns 1 if a listener is registered, 0 if not, negative on error
#[no_mangle]
pub unsafe extern "C" fn leaprust_controller_is_registered(
    handle: *const LeapRustController,
) -> c_int {
    match handle.as_ref() {
        Some(handle) => handle.inner.is_registered() as c_int,
        None => invalid_argument("handle").into(),
    }
}

/// Returns 1 if the service reports a connected device, 0 if not,
/// negative on error
#[no_mangle]
pub unsafe extern "C" fn leaprust_controller_is_connected(
    handle: *const LeapRustController,
) -> c_int {
    match handle.as_ref() {
        Some(handle) => handle.inner.service().is_connected() as c_int,
        None => invalid_argument("handle").into(),
    }
}

/// Extract the service's latest frame into `frame`
/// Without a device the frame gets id 0, timestamp 0 and no hands.
/// Returns 0 on success, negative on error
#[no_mangle]
pub unsafe extern "C" fn leaprust_controller_extract_frame(
    handle: *const LeapRustController,
    frame: *mut LeapRustFrame,
) -> c_int {
    let Some(handle) = handle.as_ref() else {
        return invalid_argument("handle").into();
    };
    let Some(frame) = frame.as_mut() else {
        return invalid_argument("frame").into();
    };
    let summary = handle.inner.extract(frame);
    if summary.truncated() {
        debug!(?summary, "extracted frame truncated");
    }
    LeapRustErrorCode::Ok.into()
}

/// Wait up to `timeout_ms` for a frame on a polled controller
/// Returns 1 when `frame` was filled, 0 on timeout, negative on error
#[no_mangle]
pub unsafe extern "C" fn leaprust_controller_poll_frame(
    handle: *const LeapRustController,
    frame: *mut LeapRustFrame,
    timeout_ms: u32,
) -> c_int {
    let Some(handle) = handle.as_ref() else {
        return invalid_argument("handle").into();
    };
    let Some(frame) = frame.as_mut() else {
        return invalid_argument("frame").into();
    };
    match poll_into(&handle.inner, frame, Duration::from_millis(timeout_ms.into())) {
        Ok(true) => 1,
        Ok(false) => 0,
        Err(code) => code.into(),
    }
}

fn poll_into(
    controller: &Controller,
    out: &mut LeapRustFrame,
    timeout: Duration,
) -> FfiResult<bool> {
    if controller.config().delivery != DeliveryMode::Polled {
        set_last_error("controller was not created in polled mode");
        return Err(LeapRustErrorCode::NotPolled);
    }
    let Some(mailbox) = controller.mailbox() else {
        return Err(fail(LeapRustError::ListenerNotRegistered));
    };
    match mailbox.take_timeout(timeout).map_err(fail)? {
        Some(delivery) => {
            *out = delivery.frame;
            Ok(true)
        }
        None => Ok(false),
    }
}

//! FFI Error handling

use std::ffi::{c_char, c_int, CString};

use leaprust_core::LeapRustError;

/// Error codes for FFI functions
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeapRustErrorCode {
    /// Success
    Ok = 0,
    /// Invalid argument (null handle, null buffer, missing callback)
    InvalidArgument = -1,
    /// No tracking service installed
    NotInitialized = -2,
    /// Listener already registered
    AlreadyRegistered = -3,
    /// No listener registered
    NotRegistered = -4,
    /// Controller was unregistered while waiting
    MailboxClosed = -6,
    /// Controller was not created in polled mode
    NotPolled = -7,
    /// Invalid configuration
    InvalidConfig = -8,
    /// Internal error
    InternalError = -99,
}

impl From<LeapRustErrorCode> for c_int {
    fn from(code: LeapRustErrorCode) -> Self {
        code as c_int
    }
}

impl From<&LeapRustError> for LeapRustErrorCode {
    fn from(err: &LeapRustError) -> Self {
        match err {
            LeapRustError::ListenerAlreadyRegistered => LeapRustErrorCode::AlreadyRegistered,
            LeapRustError::ListenerNotRegistered => LeapRustErrorCode::NotRegistered,
            LeapRustError::MailboxClosed => LeapRustErrorCode::MailboxClosed,
            LeapRustError::Config(_) => LeapRustErrorCode::InvalidConfig,
            LeapRustError::Spawn(_) => LeapRustErrorCode::InternalError,
        }
    }
}

thread_local! {
    static LAST_ERROR: std::cell::RefCell<Option<CString>> =
        const { std::cell::RefCell::new(None) };
}

/// Set the last error message
pub fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Record `err` as the last error and return its code
pub fn fail(err: LeapRustError) -> LeapRustErrorCode {
    set_last_error(&err.to_string());
    LeapRustErrorCode::from(&err)
}

/// Record an invalid-argument error naming `what`
pub fn invalid_argument(what: &str) -> LeapRustErrorCode {
    set_last_error(&format!("invalid argument: {what}"));
    LeapRustErrorCode::InvalidArgument
}

/// Get the last error message
/// Returns NULL if no error
#[no_mangle]
pub extern "C" fn leaprust_get_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(s) => s.as_ptr(),
        None => std::ptr::null(),
    })
}

/// Clear the last error
#[no_mangle]
pub extern "C" fn leaprust_clear_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Result type for FFI functions
pub type FfiResult<T> = Result<T, LeapRustErrorCode>;

/// Convert an FfiResult to a C int
pub fn result_to_int<T>(result: FfiResult<T>) -> c_int {
    match result {
        Ok(_) => 0,
        Err(code) => code as c_int,
    }
}

//! Process-wide tracking service
//!
//! Controllers created through the C ABI share one installed service, the
//! way every SDK controller in a process talks to the same tracking daemon.

use std::ffi::c_int;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use leaprust_core::{LeapRustResult, TrackingService};
use leaprust_sim::{SimulatedConfig, SimulatedService};

use crate::error::{fail, result_to_int, set_last_error, FfiResult, LeapRustErrorCode};

static SERVICE: RwLock<Option<Arc<dyn TrackingService>>> = RwLock::new(None);

/// Install `service` as the frame source for controllers created afterwards.
///
/// Existing controllers keep the service they were created with.
pub fn install_service(service: Arc<dyn TrackingService>) {
    *SERVICE.write() = Some(service);
    info!("tracking service installed");
}

/// Remove the installed service. Returns it if one was installed.
pub fn uninstall_service() -> Option<Arc<dyn TrackingService>> {
    SERVICE.write().take()
}

pub(crate) fn current_service() -> FfiResult<Arc<dyn TrackingService>> {
    SERVICE.read().clone().ok_or_else(|| {
        set_last_error("no tracking service installed");
        LeapRustErrorCode::NotInitialized
    })
}

fn start_simulated(rate_hz: f32) -> LeapRustResult<Arc<SimulatedService>> {
    let config = SimulatedConfig {
        rate_hz,
        ..Default::default()
    };
    let service = Arc::new(SimulatedService::new(config)?);
    service.start()?;
    Ok(service)
}

/// Install a simulated device producing synthetic hands at `rate_hz`
/// Returns 0 on success, negative on error
#[no_mangle]
pub extern "C" fn leaprust_use_simulated_service(rate_hz: f32) -> c_int {
    let result = start_simulated(rate_hz)
        .map(|service| install_service(service))
        .map_err(fail);
    result_to_int(result)
}

/// Returns 1 if a service is installed, 0 otherwise
#[no_mangle]
pub extern "C" fn leaprust_has_service() -> c_int {
    SERVICE.read().is_some() as c_int
}

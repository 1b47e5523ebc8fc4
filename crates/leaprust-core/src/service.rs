//! Tracking service contract
//!
//! A `TrackingService` stands in for the SDK controller object: it owns the
//! device connection, answers with its latest frame, and pushes lifecycle and
//! frame events to attached sinks from its own thread(s).

use std::fmt;
use std::sync::Arc;

use crate::sdk::TrackedFrame;

/// Events pushed by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerEvent {
    Init,
    Connect,
    Disconnect,
    Exit,
    Frame,
    FocusGained,
    FocusLost,
    DeviceChange,
    ServiceConnect,
    ServiceDisconnect,
}

impl ControllerEvent {
    pub fn name(self) -> &'static str {
        match self {
            ControllerEvent::Init => "Initialized",
            ControllerEvent::Connect => "Connected",
            ControllerEvent::Disconnect => "Disconnected",
            ControllerEvent::Exit => "Exited",
            ControllerEvent::Frame => "Frame",
            ControllerEvent::FocusGained => "Focus Gained",
            ControllerEvent::FocusLost => "Focus Lost",
            ControllerEvent::DeviceChange => "Device Changed",
            ControllerEvent::ServiceConnect => "Service Connected",
            ControllerEvent::ServiceDisconnect => "Service Disconnected",
        }
    }
}

impl fmt::Display for ControllerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A tracking device known to the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: String,
    pub is_streaming: bool,
}

/// Handle returned by `TrackingService::attach`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Receiver of service events. Invoked on the service's event thread.
pub trait EventSink: Send + Sync {
    fn on_event(&self, service: &dyn TrackingService, event: ControllerEvent);
}

/// The SDK controller as seen from this side of the boundary
pub trait TrackingService: Send + Sync {
    /// Most recent frame; the SDK's invalid frame when there is none
    fn frame(&self) -> Box<dyn TrackedFrame + '_>;

    /// Currently known devices
    fn devices(&self) -> Vec<DeviceInfo>;

    fn is_connected(&self) -> bool;

    /// Subscribe a sink to the event stream
    fn attach(&self, sink: Arc<dyn EventSink>) -> SubscriptionId;

    /// Returns false if the subscription was not attached
    fn detach(&self, id: SubscriptionId) -> bool;
}

//! Scripted tracking service
//!
//! Deterministic stand-in for the SDK controller. The test decides when
//! frames and events happen; sinks run synchronously on the emitting thread.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use leaprust_core::sdk::TrackedFrame;
use leaprust_core::{
    ControllerEvent, DeviceInfo, EventSink, LiveFrame, SubscriptionId, TrackingService,
};

pub struct ScriptedService {
    frame: Mutex<LiveFrame>,
    devices: Mutex<Vec<DeviceInfo>>,
    connected: AtomicBool,
    sinks: Mutex<Vec<(SubscriptionId, Arc<dyn EventSink>)>>,
    next_subscription: AtomicU64,
}

impl ScriptedService {
    pub fn new() -> Self {
        ScriptedService {
            frame: Mutex::new(LiveFrame::invalid()),
            devices: Mutex::new(Vec::new()),
            connected: AtomicBool::new(false),
            sinks: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Replace the latest frame without announcing it
    pub fn set_frame(&self, frame: LiveFrame) {
        *self.frame.lock() = frame;
    }

    /// Replace the latest frame and fire a frame event
    pub fn push_frame(&self, frame: LiveFrame) {
        self.set_frame(frame);
        self.emit(ControllerEvent::Frame);
    }

    pub fn add_device(&self, id: &str, is_streaming: bool) {
        self.devices.lock().push(DeviceInfo {
            id: id.to_string(),
            is_streaming,
        });
    }

    pub fn clear_devices(&self) {
        self.devices.lock().clear();
    }

    /// Mark connected and fire a connect event
    pub fn connect(&self) {
        self.connected.store(true, Ordering::SeqCst);
        self.emit(ControllerEvent::Connect);
    }

    /// Mark disconnected, drop back to the invalid frame, fire a disconnect event
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.set_frame(LiveFrame::invalid());
        self.emit(ControllerEvent::Disconnect);
    }

    /// Deliver `event` to every attached sink on the calling thread
    pub fn emit(&self, event: ControllerEvent) {
        // Sinks may attach or detach while handling the event
        let sinks: Vec<Arc<dyn EventSink>> =
            self.sinks.lock().iter().map(|(_, s)| Arc::clone(s)).collect();
        for sink in sinks {
            sink.on_event(self, event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sinks.lock().len()
    }
}

impl Default for ScriptedService {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingService for ScriptedService {
    fn frame(&self) -> Box<dyn TrackedFrame + '_> {
        Box::new(self.frame.lock().clone())
    }

    fn devices(&self) -> Vec<DeviceInfo> {
        self.devices.lock().clone()
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// New sinks are told Init, and Connect when a device is already up
    fn attach(&self, sink: Arc<dyn EventSink>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        self.sinks.lock().push((id, Arc::clone(&sink)));

        sink.on_event(self, ControllerEvent::Init);
        if self.is_connected() {
            sink.on_event(self, ControllerEvent::Connect);
        }
        id
    }

    fn detach(&self, id: SubscriptionId) -> bool {
        let mut sinks = self.sinks.lock();
        let before = sinks.len();
        sinks.retain(|(sid, _)| *sid != id);
        sinks.len() != before
    }
}

//! Device-event listener
//!
//! Receives the service's lifecycle and frame events on the service thread.
//! Frame events are extracted into a listener-owned snapshot and delivered;
//! everything else is only logged.

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};
use tracing::{debug, info, trace, warn};

use leaprust_core::{extract_frame, ControllerEvent, EventSink, Frame, TrackingService};

use crate::controller::FrameSink;
use crate::mailbox::FrameMailbox;

/// Connection lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerState {
    Uninitialized,
    Initialized,
    Connected,
    Disconnected,
    /// Terminal
    Exited,
}

impl fmt::Display for ListenerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListenerState::Uninitialized => "uninitialized",
            ListenerState::Initialized => "initialized",
            ListenerState::Connected => "connected",
            ListenerState::Disconnected => "disconnected",
            ListenerState::Exited => "exited",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListenerStats {
    pub frames_delivered: u64,
    pub lifecycle_events: u64,
    pub device_changes: u64,
    /// Events that arrived after Exited or after detach
    pub ignored_events: u64,
    /// Frames whose hands or fingers exceeded snapshot capacity
    pub truncated_frames: u64,
    pub last_frame_id: i32,
}

/// Where delivered snapshots go
#[derive(Clone)]
pub enum Delivery {
    Inline(Arc<dyn FrameSink>),
    Mailbox(Arc<FrameMailbox>),
}

struct Status {
    state: ListenerState,
    service_connected: bool,
    has_focus: bool,
    stats: ListenerStats,
}

pub struct FrameListener {
    status: Mutex<Status>,
    /// Held across extraction and delivery. Reentrant so a sink may tear
    /// its own controller down.
    scratch: ReentrantMutex<RefCell<Box<Frame>>>,
    /// Set once under the scratch lock; no delivery starts afterwards
    detached: AtomicBool,
    delivery: Delivery,
    log_device_changes: bool,
}

impl FrameListener {
    pub fn new(delivery: Delivery, log_device_changes: bool) -> Self {
        FrameListener {
            status: Mutex::new(Status {
                state: ListenerState::Uninitialized,
                service_connected: false,
                has_focus: false,
                stats: ListenerStats::default(),
            }),
            scratch: ReentrantMutex::new(RefCell::new(Frame::blank())),
            detached: AtomicBool::new(false),
            delivery,
            log_device_changes,
        }
    }

    pub fn state(&self) -> ListenerState {
        self.status.lock().state
    }

    pub fn service_connected(&self) -> bool {
        self.status.lock().service_connected
    }

    pub fn has_focus(&self) -> bool {
        self.status.lock().has_focus
    }

    pub fn stats(&self) -> ListenerStats {
        self.status.lock().stats.clone()
    }

    /// Apply one event
    pub fn handle(&self, service: &dyn TrackingService, event: ControllerEvent) {
        {
            let mut status = self.status.lock();
            if status.state == ListenerState::Exited || self.is_detached() {
                status.stats.ignored_events += 1;
                debug!(event = %event, state = %status.state, "event ignored");
                return;
            }
            if event != ControllerEvent::Frame {
                status.stats.lifecycle_events += 1;
                apply_lifecycle(&mut status, event);
            }
        }

        match event {
            ControllerEvent::Frame => self.on_frame(service),
            ControllerEvent::DeviceChange => self.on_device_change(service),
            _ => info!("{}", event),
        }
    }

    /// Stop delivering.
    ///
    /// Waits for a delivery already in progress on another thread, so no
    /// sink call starts or is still running once this returns. Called from
    /// inside the sink it only marks the listener.
    pub fn detach(&self) {
        let _guard = self.scratch.lock();
        self.detached.store(true, Ordering::SeqCst);
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    fn on_frame(&self, service: &dyn TrackingService) {
        let guard = self.scratch.lock();
        if self.is_detached() {
            self.status.lock().stats.ignored_events += 1;
            return;
        }
        let Ok(mut scratch) = guard.try_borrow_mut() else {
            warn!("frame event raised from inside a delivery dropped");
            return;
        };
        let live = service.frame();
        let summary = extract_frame(&*live, &mut **scratch);
        drop(live);

        trace!(
            frame_id = scratch.id,
            timestamp = scratch.timestamp,
            hands = scratch.hand_count,
            "frame extracted"
        );
        if summary.truncated() {
            debug!(
                hands_seen = summary.hands_seen,
                fingers_seen = summary.fingers_seen,
                "frame exceeds snapshot capacity"
            );
        }

        match &self.delivery {
            Delivery::Inline(sink) => sink.deliver(&**scratch),
            Delivery::Mailbox(mailbox) => {
                if let Err(e) = mailbox.post(&**scratch) {
                    warn!(frame_id = scratch.id, "frame not delivered: {}", e);
                    return;
                }
            }
        }

        let mut status = self.status.lock();
        status.stats.frames_delivered += 1;
        status.stats.last_frame_id = scratch.id;
        if summary.truncated() {
            status.stats.truncated_frames += 1;
        }
    }

    fn on_device_change(&self, service: &dyn TrackingService) {
        info!("{}", ControllerEvent::DeviceChange);
        let devices = service.devices();
        self.status.lock().stats.device_changes += 1;
        if !self.log_device_changes {
            return;
        }
        for device in devices {
            info!(id = %device.id, is_streaming = device.is_streaming, "device");
        }
    }
}

fn apply_lifecycle(status: &mut Status, event: ControllerEvent) {
    match event {
        ControllerEvent::Init => {
            if status.state == ListenerState::Uninitialized {
                status.state = ListenerState::Initialized;
            }
        }
        ControllerEvent::Connect => status.state = ListenerState::Connected,
        ControllerEvent::Disconnect => status.state = ListenerState::Disconnected,
        ControllerEvent::Exit => status.state = ListenerState::Exited,
        ControllerEvent::ServiceConnect => status.service_connected = true,
        ControllerEvent::ServiceDisconnect => status.service_connected = false,
        ControllerEvent::FocusGained => status.has_focus = true,
        ControllerEvent::FocusLost => status.has_focus = false,
        ControllerEvent::DeviceChange | ControllerEvent::Frame => {}
    }
}

impl EventSink for FrameListener {
    fn on_event(&self, service: &dyn TrackingService, event: ControllerEvent) {
        self.handle(service, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaprust_core::{LiveFrame, LiveHand};
    use leaprust_sim::ScriptedService;

    fn recording_listener() -> (FrameListener, Arc<Mutex<Vec<Frame>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let sink: Arc<dyn FrameSink> = Arc::new(move |frame: &Frame| {
            sink_seen.lock().push(*frame);
        });
        (FrameListener::new(Delivery::Inline(sink), true), seen)
    }

    #[test]
    fn test_lifecycle_transitions() {
        let service = ScriptedService::new();
        let (listener, seen) = recording_listener();

        assert_eq!(listener.state(), ListenerState::Uninitialized);
        listener.handle(&service, ControllerEvent::Init);
        assert_eq!(listener.state(), ListenerState::Initialized);
        listener.handle(&service, ControllerEvent::ServiceConnect);
        assert!(listener.service_connected());
        listener.handle(&service, ControllerEvent::Connect);
        assert_eq!(listener.state(), ListenerState::Connected);
        listener.handle(&service, ControllerEvent::FocusGained);
        assert!(listener.has_focus());
        listener.handle(&service, ControllerEvent::Disconnect);
        assert_eq!(listener.state(), ListenerState::Disconnected);
        listener.handle(&service, ControllerEvent::Connect);
        assert_eq!(listener.state(), ListenerState::Connected);
        listener.handle(&service, ControllerEvent::FocusLost);
        assert!(!listener.has_focus());
        listener.handle(&service, ControllerEvent::Exit);
        assert_eq!(listener.state(), ListenerState::Exited);

        assert!(seen.lock().is_empty());
        assert_eq!(listener.stats().lifecycle_events, 8);
    }

    #[test]
    fn test_frame_event_delivers_snapshot() {
        let service = ScriptedService::new();
        service.set_frame(LiveFrame::new(42, 1000).with_hand(LiveHand::new(3, true)));
        let (listener, seen) = recording_listener();

        listener.handle(&service, ControllerEvent::Frame);

        let frames = seen.lock();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id, 42);
        assert_eq!(frames[0].hand_count, 1);
        assert_eq!(frames[0].hands[0].is_left, 1);
        assert_eq!(listener.stats().frames_delivered, 1);
        assert_eq!(listener.stats().last_frame_id, 42);
    }

    #[test]
    fn test_device_change_does_not_deliver() {
        let service = ScriptedService::new();
        service.add_device("LP-001", true);
        let (listener, seen) = recording_listener();

        listener.handle(&service, ControllerEvent::DeviceChange);

        assert!(seen.lock().is_empty());
        assert_eq!(listener.stats().device_changes, 1);
    }

    #[test]
    fn test_events_after_exit_ignored() {
        let service = ScriptedService::new();
        service.set_frame(LiveFrame::new(1, 1));
        let (listener, seen) = recording_listener();

        listener.handle(&service, ControllerEvent::Exit);
        listener.handle(&service, ControllerEvent::Frame);
        listener.handle(&service, ControllerEvent::Connect);

        assert!(seen.lock().is_empty());
        assert_eq!(listener.state(), ListenerState::Exited);
        assert_eq!(listener.stats().ignored_events, 2);
    }

    #[test]
    fn test_mailbox_delivery() {
        let service = ScriptedService::new();
        let mailbox = Arc::new(FrameMailbox::new());
        let listener = FrameListener::new(Delivery::Mailbox(Arc::clone(&mailbox)), false);

        service.set_frame(LiveFrame::new(1, 10));
        listener.handle(&service, ControllerEvent::Frame);
        service.set_frame(LiveFrame::new(2, 20));
        listener.handle(&service, ControllerEvent::Frame);

        let delivery = mailbox.try_take().unwrap();
        assert_eq!(delivery.frame.id, 2);
        assert_eq!(mailbox.stats().dropped, 1);
    }

    #[test]
    fn test_detached_listener_ignores_events() {
        let service = ScriptedService::new();
        service.set_frame(LiveFrame::new(5, 50));
        let (listener, seen) = recording_listener();

        listener.detach();
        assert!(listener.is_detached());
        listener.handle(&service, ControllerEvent::Frame);
        listener.handle(&service, ControllerEvent::Connect);

        assert!(seen.lock().is_empty());
        assert_eq!(listener.state(), ListenerState::Uninitialized);
        assert_eq!(listener.stats().ignored_events, 2);
    }
}

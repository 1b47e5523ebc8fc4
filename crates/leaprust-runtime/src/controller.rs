//! Controller handle
//!
//! The one long-lived object a host holds: the tracking service, the frame
//! sink, and at most one registered listener. Dropping the controller
//! detaches the listener and stops the dispatcher.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use leaprust_core::{
    extract_frame, ExtractSummary, Frame, LeapRustError, LeapRustResult, SubscriptionId,
    TrackingService,
};

use crate::config::{ControllerConfig, DeliveryMode};
use crate::listener::{Delivery, FrameListener, ListenerState, ListenerStats};
use crate::mailbox::FrameMailbox;

/// Consumer of delivered snapshots.
///
/// Runs on the service's event thread (inline delivery) or the dispatcher
/// thread. The reference is only valid for the duration of the call.
pub trait FrameSink: Send + Sync {
    fn deliver(&self, frame: &Frame);
}

impl<F> FrameSink for F
where
    F: Fn(&Frame) + Send + Sync,
{
    fn deliver(&self, frame: &Frame) {
        self(frame)
    }
}

struct Registration {
    subscription: SubscriptionId,
    listener: Arc<FrameListener>,
    mailbox: Option<Arc<FrameMailbox>>,
    dispatcher: Option<JoinHandle<()>>,
}

pub struct Controller {
    service: Arc<dyn TrackingService>,
    sink: Option<Arc<dyn FrameSink>>,
    config: ControllerConfig,
    registration: Mutex<Option<Registration>>,
}

impl Controller {
    /// Create a controller delivering to `sink`.
    ///
    /// No device connection is implied; the service connects asynchronously.
    pub fn new(
        service: Arc<dyn TrackingService>,
        sink: Arc<dyn FrameSink>,
        config: ControllerConfig,
    ) -> LeapRustResult<Self> {
        Self::build(service, Some(sink), config)
    }

    /// Create a controller whose frames are pulled from `mailbox()`
    pub fn polled(service: Arc<dyn TrackingService>, config: ControllerConfig) -> LeapRustResult<Self> {
        Self::build(
            service,
            None,
            ControllerConfig {
                delivery: DeliveryMode::Polled,
                ..config
            },
        )
    }

    fn build(
        service: Arc<dyn TrackingService>,
        sink: Option<Arc<dyn FrameSink>>,
        config: ControllerConfig,
    ) -> LeapRustResult<Self> {
        config.validate()?;
        if config.delivery.needs_sink() && sink.is_none() {
            return Err(LeapRustError::Config(format!(
                "{:?} delivery requires a frame sink",
                config.delivery
            )));
        }

        debug!(delivery = ?config.delivery, "controller created");
        Ok(Controller {
            service,
            sink,
            config,
            registration: Mutex::new(None),
        })
    }

    /// A zeroed snapshot owned by the caller
    pub fn blank_frame() -> Box<Frame> {
        Frame::blank()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn service(&self) -> &Arc<dyn TrackingService> {
        &self.service
    }

    /// Attach a listener to the service's event stream.
    ///
    /// Only one listener per controller; a second call is rejected.
    pub fn register_listener(&self) -> LeapRustResult<()> {
        let mut registration = self.registration.lock();
        if registration.is_some() {
            warn!("listener already registered");
            return Err(LeapRustError::ListenerAlreadyRegistered);
        }

        let mailbox = self
            .config
            .delivery
            .uses_mailbox()
            .then(|| Arc::new(FrameMailbox::new()));

        let delivery = match (&mailbox, &self.sink) {
            (Some(mailbox), _) => Delivery::Mailbox(Arc::clone(mailbox)),
            (None, Some(sink)) => Delivery::Inline(Arc::clone(sink)),
            (None, None) => {
                return Err(LeapRustError::Config(
                    "inline delivery requires a frame sink".to_string(),
                ))
            }
        };

        let dispatcher = match (self.config.delivery, &mailbox, &self.sink) {
            (DeliveryMode::Dispatched, Some(mailbox), Some(sink)) => {
                Some(self.spawn_dispatcher(Arc::clone(mailbox), Arc::clone(sink))?)
            }
            _ => None,
        };

        let listener = Arc::new(FrameListener::new(delivery, self.config.log_device_changes));
        let subscription = self.service.attach(listener.clone());
        info!(subscription = subscription.0, "listener registered");

        *registration = Some(Registration {
            subscription,
            listener,
            mailbox,
            dispatcher,
        });
        Ok(())
    }

    /// Detach the listener and stop any dispatcher.
    ///
    /// Once this returns the sink is not running and will not be called
    /// again, unless this is called from inside the sink itself.
    pub fn unregister_listener(&self) -> LeapRustResult<()> {
        let Some(registration) = self.registration.lock().take() else {
            return Err(LeapRustError::ListenerNotRegistered);
        };

        if !self.service.detach(registration.subscription) {
            warn!(
                subscription = registration.subscription.0,
                "service did not know the subscription"
            );
        }
        registration.listener.detach();
        if let Some(mailbox) = &registration.mailbox {
            mailbox.close();
        }
        if let Some(dispatcher) = registration.dispatcher {
            if dispatcher.thread().id() == thread::current().id() {
                // Torn down from inside the sink; the loop ends once it returns
                debug!("unregistered from the dispatcher thread, not joining");
            } else if dispatcher.join().is_err() {
                warn!("dispatcher thread panicked");
            }
        }
        info!(subscription = registration.subscription.0, "listener unregistered");
        Ok(())
    }

    pub fn is_registered(&self) -> bool {
        self.registration.lock().is_some()
    }

    /// Pull the service's latest frame into `out`
    pub fn extract(&self, out: &mut Frame) -> ExtractSummary {
        let live = self.service.frame();
        extract_frame(&*live, out)
    }

    /// Mailbox of the current registration (dispatched and polled modes)
    pub fn mailbox(&self) -> Option<Arc<FrameMailbox>> {
        self.registration
            .lock()
            .as_ref()
            .and_then(|r| r.mailbox.clone())
    }

    pub fn listener_state(&self) -> Option<ListenerState> {
        self.registration.lock().as_ref().map(|r| r.listener.state())
    }

    pub fn stats(&self) -> Option<ListenerStats> {
        self.registration.lock().as_ref().map(|r| r.listener.stats())
    }

    fn spawn_dispatcher(
        &self,
        mailbox: Arc<FrameMailbox>,
        sink: Arc<dyn FrameSink>,
    ) -> LeapRustResult<JoinHandle<()>> {
        let poll = self.config.dispatch_poll_interval;
        thread::Builder::new()
            .name(self.config.dispatcher_name.clone())
            .spawn(move || loop {
                match mailbox.take_timeout(poll) {
                    Ok(Some(delivery)) => sink.deliver(&delivery.frame),
                    Ok(None) => continue,
                    Err(_) => break,
                }
            })
            .map_err(|e| LeapRustError::Spawn(e.to_string()))
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if self.is_registered() {
            let _ = self.unregister_listener();
        }
    }
}

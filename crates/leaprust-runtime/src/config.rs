//! Controller configuration

use std::time::Duration;

use leaprust_core::{LeapRustError, LeapRustResult};

/// How snapshots reach the consumer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Sink runs synchronously on the service's event thread
    #[default]
    Inline,
    /// Listener posts to the mailbox; a dispatcher thread runs the sink
    Dispatched,
    /// Listener posts to the mailbox; the consumer pulls
    Polled,
}

impl DeliveryMode {
    pub fn uses_mailbox(self) -> bool {
        !matches!(self, DeliveryMode::Inline)
    }

    pub fn needs_sink(self) -> bool {
        !matches!(self, DeliveryMode::Polled)
    }
}

/// Controller configuration
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    pub delivery: DeliveryMode,
    /// Log every device on device-change events
    pub log_device_changes: bool,
    /// Thread name for the dispatcher
    pub dispatcher_name: String,
    /// How long the dispatcher waits on an empty mailbox before rechecking
    pub dispatch_poll_interval: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            delivery: DeliveryMode::Inline,
            log_device_changes: true,
            dispatcher_name: "leaprust-dispatch".to_string(),
            dispatch_poll_interval: Duration::from_millis(50),
        }
    }
}

impl ControllerConfig {
    pub fn dispatched() -> Self {
        ControllerConfig {
            delivery: DeliveryMode::Dispatched,
            ..Default::default()
        }
    }

    pub fn polled() -> Self {
        ControllerConfig {
            delivery: DeliveryMode::Polled,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> LeapRustResult<()> {
        if self.delivery == DeliveryMode::Dispatched {
            if self.dispatcher_name.is_empty() {
                return Err(LeapRustError::Config(
                    "dispatcher_name must not be empty".to_string(),
                ));
            }
            if self.dispatch_poll_interval.is_zero() {
                return Err(LeapRustError::Config(
                    "dispatch_poll_interval must be non-zero".to_string(),
                ));
            }
        }
        Ok(())
    }
}

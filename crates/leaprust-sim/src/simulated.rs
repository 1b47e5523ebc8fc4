//! Simulated tracking device
//!
//! Runs its own event thread the way the SDK does: lifecycle events on
//! start, then frame events at a fixed rate with seeded synthetic motion,
//! then disconnect and exit on stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use leaprust_core::sdk::{TrackedFrame, Vector};
use leaprust_core::{
    ControllerEvent, DeviceInfo, EventSink, LeapRustError, LeapRustResult, LiveFrame,
    SubscriptionId, TrackingService,
};

use crate::fixtures::hand_at;
use crate::scripted::ScriptedService;

/// Simulated device configuration
#[derive(Clone, Debug)]
pub struct SimulatedConfig {
    /// Frames per second
    pub rate_hz: f32,
    /// RNG seed for motion jitter
    pub seed: u64,
    /// Hands per frame; more than two exercises truncation
    pub hands: usize,
    pub fingers_per_hand: usize,
    pub device_id: String,
    /// Jitter amplitude (mm)
    pub jitter: f32,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        SimulatedConfig {
            rate_hz: 60.0,
            seed: 0x1EAF,
            hands: 2,
            fingers_per_hand: 5,
            device_id: "LP-SIM-0001".to_string(),
            jitter: 0.5,
        }
    }
}

impl SimulatedConfig {
    /// More hands and fingers than a snapshot holds
    pub fn crowded() -> Self {
        SimulatedConfig {
            hands: 3,
            fingers_per_hand: 6,
            ..Default::default()
        }
    }

    /// Fast, jitter-free frames for tests
    pub fn fast() -> Self {
        SimulatedConfig {
            rate_hz: 500.0,
            jitter: 0.0,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> LeapRustResult<()> {
        if !(self.rate_hz.is_finite() && self.rate_hz > 0.0) {
            return Err(LeapRustError::Config(format!(
                "rate_hz must be positive, got {}",
                self.rate_hz
            )));
        }
        if !(self.jitter.is_finite() && self.jitter >= 0.0) {
            return Err(LeapRustError::Config(format!(
                "jitter must be non-negative, got {}",
                self.jitter
            )));
        }
        Ok(())
    }

    fn period(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.rate_hz)
    }
}

/// Synthetic hand motion: palms circling slowly with seeded jitter
pub struct MotionModel {
    config: SimulatedConfig,
    rng: StdRng,
    next_id: i64,
}

impl MotionModel {
    pub fn new(config: SimulatedConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        MotionModel {
            config,
            rng,
            next_id: 1,
        }
    }

    /// Frame at `elapsed` since the device started streaming
    pub fn frame_at(&mut self, elapsed: Duration) -> LiveFrame {
        let t = elapsed.as_secs_f32();
        let mut frame = LiveFrame::new(self.next_id, elapsed.as_micros() as i64);
        self.next_id += 1;

        for h in 0..self.config.hands {
            let is_left = h % 2 == 0;
            let side = if is_left { -1.0 } else { 1.0 };
            let phase = t + h as f32;
            let palm = Vector::new(
                side * 80.0 + 30.0 * phase.sin() + self.noise(),
                200.0 + 20.0 * phase.cos() + self.noise(),
                10.0 * (0.5 * phase).sin() + self.noise(),
            );

            let mut hand = hand_at(h as i32 + 1, is_left, self.config.fingers_per_hand, palm);
            hand.palm_velocity = Vector::new(
                30.0 * phase.cos(),
                -20.0 * phase.sin(),
                5.0 * (0.5 * phase).cos(),
            );
            hand.pinch_strength = 0.5 + 0.5 * (0.7 * phase).sin();
            hand.grab_strength = 0.5 + 0.5 * (0.3 * phase).cos();
            frame.hands.push(hand);
        }
        frame
    }

    fn noise(&mut self) -> f32 {
        if self.config.jitter == 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-self.config.jitter..=self.config.jitter)
    }
}

/// Background-threaded stand-in for a tracking device
pub struct SimulatedService {
    inner: Arc<ScriptedService>,
    config: SimulatedConfig,
    running: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl SimulatedService {
    pub fn new(config: SimulatedConfig) -> LeapRustResult<Self> {
        config.validate()?;
        Ok(SimulatedService {
            inner: Arc::new(ScriptedService::new()),
            config,
            running: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &SimulatedConfig {
        &self.config
    }

    /// Start the event thread. No-op if already running.
    pub fn start(&self) -> LeapRustResult<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return Ok(());
        }
        self.running.store(true, Ordering::SeqCst);

        let inner = Arc::clone(&self.inner);
        let running = Arc::clone(&self.running);
        let config = self.config.clone();
        let handle = thread::Builder::new()
            .name("leaprust-sim".to_string())
            .spawn(move || run_device(inner, running, config))
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                LeapRustError::Spawn(e.to_string())
            })?;

        *worker = Some(handle);
        Ok(())
    }

    /// Stop streaming, then announce disconnect and exit
    pub fn stop(&self) {
        let Some(handle) = self.worker.lock().take() else {
            return;
        };
        self.running.store(false, Ordering::SeqCst);
        if handle.join().is_err() {
            warn!("simulated device thread panicked");
        }

        self.inner.clear_devices();
        self.inner.disconnect();
        self.inner.emit(ControllerEvent::ServiceDisconnect);
        self.inner.emit(ControllerEvent::Exit);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

fn run_device(inner: Arc<ScriptedService>, running: Arc<AtomicBool>, config: SimulatedConfig) {
    inner.emit(ControllerEvent::ServiceConnect);
    inner.add_device(&config.device_id, true);
    inner.connect();
    inner.emit(ControllerEvent::DeviceChange);
    inner.emit(ControllerEvent::FocusGained);

    let period = config.period();
    let mut motion = MotionModel::new(config);
    let started = Instant::now();
    let mut next_tick = started;

    while running.load(Ordering::SeqCst) {
        inner.push_frame(motion.frame_at(started.elapsed()));

        next_tick += period;
        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        } else {
            // Behind schedule: skip ahead instead of bursting
            next_tick = now;
        }
    }
    debug!("simulated device stopped");
}

impl Drop for SimulatedService {
    fn drop(&mut self) {
        self.stop();
    }
}

impl TrackingService for SimulatedService {
    fn frame(&self) -> Box<dyn TrackedFrame + '_> {
        self.inner.frame()
    }

    fn devices(&self) -> Vec<DeviceInfo> {
        self.inner.devices()
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    fn attach(&self, sink: Arc<dyn EventSink>) -> SubscriptionId {
        self.inner.attach(sink)
    }

    fn detach(&self, id: SubscriptionId) -> bool {
        self.inner.detach(id)
    }
}

//! LeapRust frame monitor
//!
//! Runs a controller against the simulated device and reports:
//! - Frame cadence every 50 frames
//! - A one-line summary of each tracked hand at the same interval
//! - Listener statistics on exit

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::info;

use leaprust_core::{BoneType, FingerType, Frame, Hand};
use leaprust_runtime::{
    init_logging, Controller, ControllerConfig, DeliveryMode, FrameSink, LogConfig,
};
use leaprust_sim::{SimulatedConfig, SimulatedService};

const REPORT_EVERY: u64 = 50;

/// Counts frames and prints cadence
struct Monitor {
    state: Mutex<MonitorState>,
}

struct MonitorState {
    frames: u64,
    window_start: Instant,
}

impl Monitor {
    fn new() -> Self {
        Monitor {
            state: Mutex::new(MonitorState {
                frames: 0,
                window_start: Instant::now(),
            }),
        }
    }

    fn frames(&self) -> u64 {
        self.state.lock().frames
    }
}

impl FrameSink for Monitor {
    fn deliver(&self, frame: &Frame) {
        let mut state = self.state.lock();
        if state.frames % REPORT_EVERY == 0 {
            let now = Instant::now();
            println!(
                "frame {} delay {:?}",
                state.frames,
                now.duration_since(state.window_start)
            );
            state.window_start = now;
            for hand in frame.hands() {
                println!("  {}", describe(hand));
            }
        }
        state.frames += 1;
    }
}

fn describe(hand: &Hand) -> String {
    let side = if hand.left() { "left" } else { "right" };
    let p = hand.palm_position;
    let index_tip = hand
        .fingers()
        .iter()
        .find(|f| f.kind() == Some(FingerType::Index))
        .map(|f| f.bone(BoneType::Distal).next_joint);
    format!(
        "{} hand {} palm ({:.1}, {:.1}, {:.1}) pinch {:.2} grab {:.2} fingers {} index tip {:?}",
        side,
        hand.id,
        p.x,
        p.y,
        p.z,
        hand.pinch_strength,
        hand.grab_strength,
        hand.finger_count,
        index_tip.map(|t| t.to_array())
    )
}

fn parse_mode(arg: Option<&String>) -> Result<DeliveryMode, String> {
    match arg.map(String::as_str) {
        None | Some("inline") => Ok(DeliveryMode::Inline),
        Some("dispatched") => Ok(DeliveryMode::Dispatched),
        Some("polled") => Ok(DeliveryMode::Polled),
        Some(other) => Err(format!("unknown delivery mode: {}", other)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("Usage: frame-monitor [rate_hz] [seconds] [inline|dispatched|polled]");
        println!("Example: frame-monitor 120 5 dispatched");
        return Ok(());
    }

    let rate_hz: f32 = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(60.0);
    let seconds: u64 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(5);
    let mode = parse_mode(args.get(3))?;

    init_logging(&LogConfig::default());

    let service = Arc::new(SimulatedService::new(SimulatedConfig {
        rate_hz,
        ..Default::default()
    })?);
    let monitor = Arc::new(Monitor::new());
    let config = ControllerConfig {
        delivery: mode,
        ..Default::default()
    };

    let controller = match mode {
        DeliveryMode::Polled => Controller::polled(service.clone(), config)?,
        _ => Controller::new(service.clone(), monitor.clone(), config)?,
    };
    controller.register_listener()?;
    service.start()?;
    info!(rate_hz, seconds, ?mode, "monitoring");

    let deadline = Instant::now() + Duration::from_secs(seconds);
    if mode == DeliveryMode::Polled {
        let mailbox = controller
            .mailbox()
            .ok_or("polled controller has no mailbox")?;
        while Instant::now() < deadline {
            if let Some(delivery) = mailbox.take_timeout(Duration::from_millis(100))? {
                monitor.deliver(&delivery.frame);
            }
        }
        let stats = mailbox.stats();
        println!(
            "mailbox: posted {} taken {} dropped {}",
            stats.posted, stats.taken, stats.dropped
        );
    } else {
        thread::sleep(deadline.saturating_duration_since(Instant::now()));
    }

    if let Some(stats) = controller.stats() {
        println!(
            "listener: {} frames delivered, {} lifecycle events, {} truncated, last frame {}",
            stats.frames_delivered, stats.lifecycle_events, stats.truncated_frames, stats.last_frame_id
        );
    }
    println!("monitor saw {} frames", monitor.frames());

    service.stop();
    controller.unregister_listener()?;
    Ok(())
}

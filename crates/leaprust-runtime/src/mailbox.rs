//! Single-slot frame mailbox
//!
//! Latest wins: posting over an unread snapshot replaces it and counts the
//! old one as dropped. The event thread never waits on the consumer.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use leaprust_core::{Frame, LeapRustError, LeapRustResult};

/// A snapshot taken out of the mailbox
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Post sequence number, starting at 1
    pub seq: u64,
    pub frame: Frame,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MailboxStats {
    pub posted: u64,
    pub taken: u64,
    pub dropped: u64,
}

struct Slot {
    latest: Option<Delivery>,
    closed: bool,
    stats: MailboxStats,
}

pub struct FrameMailbox {
    slot: Mutex<Slot>,
    ready: Condvar,
}

impl FrameMailbox {
    pub fn new() -> Self {
        FrameMailbox {
            slot: Mutex::new(Slot {
                latest: None,
                closed: false,
                stats: MailboxStats::default(),
            }),
            ready: Condvar::new(),
        }
    }

    /// Store a copy of `frame`, replacing any unread one
    pub fn post(&self, frame: &Frame) -> LeapRustResult<u64> {
        let mut guard = self.slot.lock();
        let slot = &mut *guard;
        if slot.closed {
            return Err(LeapRustError::MailboxClosed);
        }

        slot.stats.posted += 1;
        let seq = slot.stats.posted;
        match slot.latest.as_mut() {
            Some(unread) => {
                slot.stats.dropped += 1;
                unread.seq = seq;
                unread.frame = *frame;
            }
            None => {
                slot.latest = Some(Delivery { seq, frame: *frame });
            }
        }
        drop(guard);

        self.ready.notify_one();
        Ok(seq)
    }

    pub fn try_take(&self) -> Option<Delivery> {
        let mut slot = self.slot.lock();
        let delivery = slot.latest.take();
        if delivery.is_some() {
            slot.stats.taken += 1;
        }
        delivery
    }

    /// Wait up to `timeout` for a snapshot.
    ///
    /// `Ok(None)` on timeout; `MailboxClosed` once closed and drained.
    pub fn take_timeout(&self, timeout: Duration) -> LeapRustResult<Option<Delivery>> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.slot.lock();
        loop {
            if let Some(delivery) = slot.latest.take() {
                slot.stats.taken += 1;
                return Ok(Some(delivery));
            }
            if slot.closed {
                return Err(LeapRustError::MailboxClosed);
            }
            if self.ready.wait_until(&mut slot, deadline).timed_out() {
                return Ok(None);
            }
        }
    }

    /// Refuse further posts and wake any waiting consumer
    pub fn close(&self) {
        self.slot.lock().closed = true;
        self.ready.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.slot.lock().closed
    }

    pub fn stats(&self) -> MailboxStats {
        self.slot.lock().stats
    }
}

impl Default for FrameMailbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn frame(id: i32) -> Frame {
        Frame {
            id,
            ..Frame::default()
        }
    }

    #[test]
    fn test_latest_wins() {
        let mailbox = FrameMailbox::new();
        mailbox.post(&frame(1)).unwrap();
        mailbox.post(&frame(2)).unwrap();
        let seq = mailbox.post(&frame(3)).unwrap();

        let delivery = mailbox.try_take().unwrap();
        assert_eq!(delivery.frame.id, 3);
        assert_eq!(delivery.seq, seq);
        assert!(mailbox.try_take().is_none());

        let stats = mailbox.stats();
        assert_eq!(stats.posted, 3);
        assert_eq!(stats.dropped, 2);
        assert_eq!(stats.taken, 1);
    }

    #[test]
    fn test_take_timeout_empty() {
        let mailbox = FrameMailbox::new();
        let result = mailbox.take_timeout(Duration::from_millis(5)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_closed_mailbox() {
        let mailbox = FrameMailbox::new();
        mailbox.post(&frame(9)).unwrap();
        mailbox.close();

        assert_eq!(mailbox.post(&frame(10)), Err(LeapRustError::MailboxClosed));
        // Unread snapshot is still handed out before reporting closed
        let delivery = mailbox.take_timeout(Duration::from_millis(5)).unwrap();
        assert_eq!(delivery.unwrap().frame.id, 9);
        assert!(matches!(
            mailbox.take_timeout(Duration::from_millis(5)),
            Err(LeapRustError::MailboxClosed)
        ));
    }

    #[test]
    fn test_cross_thread_handoff() {
        let mailbox = Arc::new(FrameMailbox::new());
        let producer = {
            let mailbox = Arc::clone(&mailbox);
            thread::spawn(move || {
                for id in 1..=20 {
                    mailbox.post(&frame(id)).unwrap();
                }
            })
        };

        let mut last_seq = 0;
        let mut last_id = 0;
        while last_id < 20 {
            if let Some(delivery) = mailbox.take_timeout(Duration::from_secs(1)).unwrap() {
                assert!(delivery.seq > last_seq);
                assert!(delivery.frame.id > last_id);
                last_seq = delivery.seq;
                last_id = delivery.frame.id;
            }
        }
        producer.join().unwrap();
    }

    #[test]
    fn test_close_wakes_waiter() {
        let mailbox = Arc::new(FrameMailbox::new());
        let waiter = {
            let mailbox = Arc::clone(&mailbox);
            thread::spawn(move || mailbox.take_timeout(Duration::from_secs(5)))
        };
        thread::sleep(Duration::from_millis(20));
        mailbox.close();

        assert!(matches!(
            waiter.join().unwrap(),
            Err(LeapRustError::MailboxClosed)
        ));
    }
}

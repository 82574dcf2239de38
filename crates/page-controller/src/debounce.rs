//! # Debounce Timer
//!
//! A cancellable one-shot deadline, owned by the controller and polled inside its
//! `select!` loop. Re-arming pushes the deadline out by a full window; cancelling
//! clears it. While disarmed, [`Debouncer::elapsed`] never resolves, so the branch
//! simply never fires.
//!
//! Uses `tokio::time::Instant`, which makes it deterministic under a paused test clock.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Starts (or restarts) the quiet period.
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.window);
    }

    /// Clears a pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolves once the armed deadline passes, disarming the timer.
    ///
    /// Cancel safe: dropping the future leaves the deadline in place.
    pub async fn elapsed(&mut self) {
        match self.deadline {
            Some(deadline) => {
                sleep_until(deadline).await;
                self.deadline = None;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_rearm_restarts_window() {
        let mut debouncer = Debouncer::new(Duration::from_millis(400));
        let start = Instant::now();

        debouncer.arm();
        tokio::time::advance(Duration::from_millis(300)).await;
        debouncer.arm();
        debouncer.elapsed().await;

        assert!(start.elapsed() >= Duration::from_millis(700));
        assert!(!debouncer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarmed_timer_never_fires() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.arm();
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        let fired = tokio::time::timeout(Duration::from_secs(5), debouncer.elapsed()).await;
        assert!(fired.is_err());
    }
}

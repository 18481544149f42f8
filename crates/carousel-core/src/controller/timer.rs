//! Auto-advance timer slot
//!
//! Holds at most one pending deadline. Starting an already running timer is
//! a no-op, so repeated pointer-leave events can never stack timers.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

#[derive(Debug, Clone)]
pub struct AutoAdvance {
    period: Duration,
    deadline: Option<Instant>,
}

impl AutoAdvance {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Schedule a fresh full period; returns false if already running
    pub fn start(&mut self) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(Instant::now() + self.period);
        true
    }

    /// Drop the pending deadline; returns false if nothing was scheduled
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Move the deadline to the next period after a tick has fired
    pub fn reschedule(&mut self) {
        if let Some(deadline) = self.deadline {
            let next = deadline + self.period;
            let now = Instant::now();
            // Skip missed ticks instead of firing a burst
            self.deadline = Some(if next > now { next } else { now + self.period });
        }
    }

    /// Resolve when the deadline passes; pends forever while cancelled
    pub async fn wait(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}

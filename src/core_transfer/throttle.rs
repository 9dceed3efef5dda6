use std::time::Duration;
use tokio::time::{self, Interval, MissedTickBehavior};

/// Paces transfer loops to one chunk per tick. A zero period disables
/// pacing and leaves flow control to the transport.
pub struct Throttle {
    interval: Option<Interval>,
}

impl Throttle {
    pub fn new(period: Duration) -> Self {
        if period.is_zero() {
            return Self::disabled();
        }
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval: Some(interval),
        }
    }

    pub fn disabled() -> Self {
        Self { interval: None }
    }

    pub async fn tick(&mut self) {
        if let Some(interval) = self.interval.as_mut() {
            interval.tick().await;
        }
    }
}

//! Replay source for captured packets

use std::collections::VecDeque;
use tokio::time::{Duration, Interval, MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::Result;
use crate::provider::PacketSource;

/// Replays a fixed list of packets, optionally paced at a fixed rate.
pub struct ReplaySource {
    packets: VecDeque<Vec<u8>>,
    /// Pacing interval; `None` replays as fast as the consumer reads
    interval: Option<Interval>,
    replayed: usize,
}

impl ReplaySource {
    pub fn new<I>(packets: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        Self { packets: packets.into_iter().collect(), interval: None, replayed: 0 }
    }

    /// Emit at most `rate_hz` packets per second.
    ///
    /// Rates are clamped to 0.1..=10000 Hz; a non-finite rate leaves the replay unpaced.
    /// Must be called from within a Tokio runtime.
    pub fn paced(mut self, rate_hz: f64) -> Self {
        if !rate_hz.is_finite() {
            warn!(rate_hz, "Ignoring non-finite replay rate");
            self.interval = None;
            return self;
        }

        let rate_hz = rate_hz.clamp(0.1, 10_000.0);
        let mut ticker = interval(Duration::from_secs_f64(1.0 / rate_hz));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(ticker);
        self
    }

    /// Packets not yet replayed.
    pub fn remaining(&self) -> usize {
        self.packets.len()
    }
}

#[async_trait::async_trait]
impl PacketSource for ReplaySource {
    async fn next_packet(&mut self) -> Result<Option<Vec<u8>>> {
        // End of replay is paced like any packet.
        if let Some(interval) = self.interval.as_mut() {
            interval.tick().await;
        }

        let Some(packet) = self.packets.pop_front() else {
            debug!(replayed = self.replayed, "Reached end of replay");
            return Ok(None);
        };

        self.replayed += 1;
        Ok(Some(packet))
    }

    fn describe(&self) -> String {
        format!("replay ({} packets queued)", self.packets.len())
    }
}

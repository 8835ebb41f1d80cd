//! Packet source trait

use crate::Result;

/// Trait for sources of raw telemetry packets.
///
/// Sources abstract over where packets come from (a socket, a capture, a
/// test fixture) and handle their own pacing.
#[async_trait::async_trait]
pub trait PacketSource: Send + 'static {
    /// Get the next raw packet.
    ///
    /// Returns:
    /// - `Ok(Some(bytes))` - A packet arrived
    /// - `Ok(None)` - The source is exhausted (normal termination)
    /// - `Err(e)` - The source failed; the driver may retry
    async fn next_packet(&mut self) -> Result<Option<Vec<u8>>>;

    /// Human-readable description used in logs.
    fn describe(&self) -> String {
        "packet source".to_string()
    }
}

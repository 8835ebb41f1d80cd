//! Driver spawns and manages the packet decoding task

use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::provider::PacketSource;
use crate::types::{DecodeOutcome, DecodedRecord, DropReason};
use crate::{TelemetryError, Unpacker};

/// Running counters for a decoding task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Packets read from the source
    pub received: u64,
    /// Packets decoded into records
    pub decoded: u64,
    pub dropped_header: u64,
    pub dropped_checksum: u64,
    pub dropped_truncated: u64,
    /// Packets that arrived before any schema was installed
    pub not_loaded: u64,
}

impl DecodeStats {
    /// Total packets dropped for any reason.
    pub fn dropped(&self) -> u64 {
        self.dropped_header + self.dropped_checksum + self.dropped_truncated
    }

    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::BadHeader => self.dropped_header += 1,
            DropReason::ChecksumMismatch => self.dropped_checksum += 1,
            DropReason::Truncated { .. } => self.dropped_truncated += 1,
        }
    }
}

/// Result of spawning driver tasks
pub struct DriverChannels {
    /// Latest decoded record; `None` until the first decode and after the source ends
    pub records: watch::Receiver<Option<Arc<DecodedRecord>>>,
    /// Running decode counters
    pub stats: watch::Receiver<DecodeStats>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
}

/// Driver spawns the task that pulls packets from a source and decodes them
pub struct Driver;

impl Driver {
    const MAX_ERRORS: u32 = 10;

    /// Spawn a decoding task for `source` against the shared `unpacker`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<S>(source: S, unpacker: Arc<Unpacker>) -> DriverChannels
    where
        S: PacketSource,
    {
        let (record_tx, record_rx) = watch::channel(None);
        let (stats_tx, stats_rx) = watch::channel(DecodeStats::default());
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();

        tokio::spawn(async move {
            Self::decode_task(source, unpacker, record_tx, stats_tx, cancel_task).await;
        });

        DriverChannels { records: record_rx, stats: stats_rx, cancel }
    }

    async fn decode_task<S>(
        mut source: S,
        unpacker: Arc<Unpacker>,
        record_tx: watch::Sender<Option<Arc<DecodedRecord>>>,
        stats_tx: watch::Sender<DecodeStats>,
        cancel: CancellationToken,
    ) where
        S: PacketSource,
    {
        info!(source = %source.describe(), "Decode task started");
        let mut stats = DecodeStats::default();
        let mut error_count = 0u32;

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Decode task cancelled");
                    break;
                }
                result = source.next_packet() => result,
            };

            match result {
                Ok(Some(packet)) => {
                    error_count = 0;
                    stats.received += 1;

                    let record = match unpacker.decode(&packet) {
                        Ok(DecodeOutcome::Decoded(record)) => {
                            stats.decoded += 1;
                            trace!(packet = stats.received, bytes = packet.len(), "Packet decoded");
                            Some(record)
                        }
                        Ok(DecodeOutcome::Dropped(reason)) => {
                            stats.record_drop(reason);
                            debug!(?reason, bytes = packet.len(), "Dropped packet");
                            None
                        }
                        Err(TelemetryError::NotLoaded) => {
                            stats.not_loaded += 1;
                            warn!("Packet received before a schema was loaded");
                            None
                        }
                        Err(e) => {
                            error!("Unexpected decode error: {}", e);
                            None
                        }
                    };

                    // Counters first, so a record subscriber never sees stale stats.
                    stats_tx.send_replace(stats);

                    if let Some(record) = record {
                        if record_tx.send(Some(Arc::new(record))).is_err() {
                            debug!("Record receiver dropped, shutting down");
                            break;
                        }
                    }
                }
                Ok(None) => {
                    info!(
                        received = stats.received,
                        decoded = stats.decoded,
                        dropped = stats.dropped(),
                        "Packet source ended"
                    );
                    let _ = record_tx.send(None);
                    break;
                }
                Err(e) => {
                    error_count += 1;
                    error!("Source error ({}/{}): {}", error_count, Self::MAX_ERRORS, e);

                    if error_count >= Self::MAX_ERRORS {
                        error!("Too many source errors, shutting down");
                        let _ = record_tx.send(None);
                        break;
                    }

                    // Exponential backoff: 50ms, 100ms, 200ms, ...
                    let backoff = std::time::Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        info!("Decode task ended ({} packets)", stats.received);
    }
}

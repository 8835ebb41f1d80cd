//! Decoded telemetry connection over a packet source

use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::driver::{DecodeStats, Driver};
use crate::provider::PacketSource;
use crate::types::DecodedRecord;
use crate::Unpacker;

/// A running decode pipeline: packet source in, decoded records out.
///
/// Records are published latest-wins; a slow subscriber skips intermediate
/// records instead of building a backlog. Dropping the connection stops the
/// decoding task.
pub struct TelemetryConnection {
    records: watch::Receiver<Option<Arc<DecodedRecord>>>,
    stats: watch::Receiver<DecodeStats>,
    unpacker: Arc<Unpacker>,
    cancel: CancellationToken,
}

impl TelemetryConnection {
    /// Start decoding packets from `source` with the shared `unpacker`.
    ///
    /// The unpacker's schema may be installed or replaced at any time; packets
    /// arriving before the first install are counted and skipped.
    pub fn open<S>(source: S, unpacker: Arc<Unpacker>) -> Self
    where
        S: PacketSource,
    {
        info!(source = %source.describe(), "Opening telemetry connection");
        let channels = Driver::spawn(source, Arc::clone(&unpacker));

        Self {
            records: channels.records,
            stats: channels.stats,
            unpacker,
            cancel: channels.cancel,
        }
    }

    /// Stream of decoded records.
    pub fn records(&self) -> impl Stream<Item = Arc<DecodedRecord>> + 'static {
        WatchStream::new(self.records.clone()).filter_map(|opt| async move { opt })
    }

    /// Most recently decoded record.
    pub fn latest(&self) -> Option<Arc<DecodedRecord>> {
        self.records.borrow().clone()
    }

    /// Snapshot of the decode counters.
    pub fn stats(&self) -> DecodeStats {
        *self.stats.borrow()
    }

    pub fn unpacker(&self) -> &Arc<Unpacker> {
        &self.unpacker
    }

    /// Stop the decoding task.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Drop for TelemetryConnection {
    fn drop(&mut self) {
        debug!("Dropping telemetry connection");
        self.cancel.cancel();
    }
}

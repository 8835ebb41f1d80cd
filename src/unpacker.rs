//! Process-wide decoder with an atomically swappable schema

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{info, warn};

use crate::config::CodecConfig;
use crate::schema::{self, CompiledSchema, SchemaNode};
use crate::types::DecodeOutcome;
use crate::{Result, TelemetryError, codec};

/// Decoder holding the active compiled schema.
///
/// Installing a schema replaces the whole compiled pair in one step; a decode
/// that already picked up the previous schema finishes against it. Share an
/// `Unpacker` across tasks with `Arc`.
#[derive(Debug)]
pub struct Unpacker {
    config: CodecConfig,
    schema: watch::Sender<Option<Arc<CompiledSchema>>>,
    generation: AtomicU64,
}

impl Unpacker {
    /// Create an unpacker with no schema installed.
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        let (schema, _) = watch::channel(None);
        Ok(Self { config, schema, generation: AtomicU64::new(0) })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compile `tree` and make it the active schema.
    ///
    /// On a compile error the previously installed schema stays active.
    pub fn install(&self, tree: &SchemaNode) -> Result<Arc<CompiledSchema>> {
        let compiled = match schema::compile(tree) {
            Ok(compiled) => compiled,
            Err(e) => {
                warn!(error = %e, "Schema rejected, keeping previous schema");
                return Err(e.into());
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let compiled = Arc::new(compiled.with_generation(generation));
        info!(
            generation,
            fields = compiled.plan().len(),
            width = compiled.plan().total_width(),
            "Installed telemetry schema"
        );

        self.schema.send_replace(Some(Arc::clone(&compiled)));
        Ok(compiled)
    }

    /// Parse a YAML schema document and install it.
    pub fn load_yaml(&self, yaml: &str) -> Result<Arc<CompiledSchema>> {
        let tree = schema::parse_schema_document(yaml)?;
        self.install(&tree)
    }

    /// Read a YAML schema document from disk and install it.
    pub async fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Arc<CompiledSchema>> {
        let tree = schema::load_schema_file(path).await?;
        self.install(&tree)
    }

    /// Currently installed schema, if any.
    pub fn schema(&self) -> Option<Arc<CompiledSchema>> {
        self.schema.borrow().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.schema.borrow().is_some()
    }

    /// Decode one packet against the active schema.
    ///
    /// Dropped packets are an `Ok` outcome; only a missing schema is an error.
    pub fn decode(&self, packet: &[u8]) -> Result<DecodeOutcome> {
        let schema = self.schema().ok_or(TelemetryError::NotLoaded)?;
        Ok(codec::decode(packet, &schema, &self.config))
    }

    /// Stream of installed schemas, starting with the current one if present.
    pub fn schema_updates(&self) -> impl Stream<Item = Arc<CompiledSchema>> + 'static {
        WatchStream::new(self.schema.subscribe()).filter_map(|opt| async move { opt })
    }
}

use crate::staging::{StagingArea, StagingError};
use soc_parser::{ingest_file, LogFormat, NormalizedEvent, ParserRegistry};
use std::path::Path;

/// Owns the running event collection across ingestions
pub struct Session {
    registry: ParserRegistry,
    staging: StagingArea,
    events: Vec<NormalizedEvent>,
}

impl Session {
    pub fn new(registry: ParserRegistry, staging: StagingArea) -> Self {
        Self {
            registry,
            staging,
            events: Vec::new(),
        }
    }

    /// Stage `path`, parse it as `format` and keep the events.
    ///
    /// A staging failure leaves the collection as it was.
    pub fn load(&mut self, format: LogFormat, path: impl AsRef<Path>) -> Result<usize, StagingError> {
        let staged = self.staging.stage(path)?;
        Ok(ingest_file(&self.registry, format, &staged, &mut self.events))
    }

    pub fn events(&self) -> &[NormalizedEvent] {
        &self.events
    }
}

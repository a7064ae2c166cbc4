use std::path::Path;

use crate::collector::{CollectError, Collector, CollectorConfig, CycleReport};

/// Blocking entry points over [`Collector`] for schedulers and CLIs.
///
/// Owns the tokio runtime the async pipeline runs on.
pub struct CollectorHandle {
    runtime: tokio::runtime::Runtime,
    collector: Collector,
}

impl CollectorHandle {
    pub fn new(config: CollectorConfig) -> Result<Self, CollectError> {
        Self::from_collector(Collector::new(config)?)
    }

    pub fn from_collector(collector: Collector) -> Result<Self, CollectError> {
        let runtime = tokio::runtime::Runtime::new().map_err(CollectError::Runtime)?;
        Ok(Self { runtime, collector })
    }

    pub fn run_cycle(&self, limit: Option<usize>) -> Result<usize, CollectError> {
        self.runtime.block_on(self.collector.run_cycle(limit))
    }

    pub fn collect(&self, limit: Option<usize>) -> Result<CycleReport, CollectError> {
        self.runtime.block_on(self.collector.collect(limit))
    }

    pub fn reset_store(&self) -> Result<(), CollectError> {
        self.collector.reset_store()
    }

    pub fn compact_store(&self) -> Result<usize, CollectError> {
        self.collector.compact_store()
    }

    pub fn store_path(&self) -> &Path {
        self.collector.store().path()
    }
}

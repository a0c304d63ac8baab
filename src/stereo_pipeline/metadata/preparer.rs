use serde_json::Value;
use tracing::{info, instrument};

use crate::stereo_pipeline::common::error::Result;
use crate::stereo_pipeline::common::RunConfig;
use crate::stereo_pipeline::metadata::cleaner::clean_metadata;
use crate::stereo_pipeline::metadata::enricher::enrich_metadata;

/// Turns a raw capture record into the canonical metadata for the configured sensor.
pub struct MetadataPreparer<'a> {
    config: &'a RunConfig,
}

impl<'a> MetadataPreparer<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// Cleans then enriches `raw`. The result is not checked for the sections
    /// conversion needs; missing ones surface when views are extracted.
    #[instrument(skip(self, raw), fields(sensor = %self.config.sensor))]
    pub fn prepare(&self, raw: &Value) -> Result<Value> {
        let sensor = self.config.sensor;

        let cleaned = {
            let _span = tracing::info_span!("clean_metadata").entered();
            clean_metadata(raw, sensor)?
        };

        let enriched = {
            let _span = tracing::info_span!("enrich_metadata").entered();
            enrich_metadata(&cleaned, sensor, self.config)?
        };

        info!("Metadata prepared for {}", sensor);
        Ok(enriched)
    }
}

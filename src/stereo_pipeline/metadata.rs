//! Capture metadata module
//!
//! This module loads the JSON capture record, cleans it into the canonical
//! schema for a sensor and enriches it with sensor, experiment and spatial
//! sections.

mod loader;
mod cleaner;
mod enricher;
mod preparer;
pub mod spatial;
pub mod types;

pub use loader::load_metadata;
pub use cleaner::clean_metadata;
pub use enricher::enrich_metadata;
pub use preparer::MetadataPreparer;
pub use spatial::{geojson_to_bounds, FieldProjection, GpsBounds};
pub use types::SensorId;

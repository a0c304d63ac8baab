use std::path::Path;

use serde_json::Value;

use crate::stereo_pipeline::common::error::Result;
use crate::stereo_pipeline::geotiff::types::GeoTiffConfig;
use crate::stereo_pipeline::metadata::GpsBounds;
use crate::stereo_pipeline::raw::RgbImageData;

pub trait GeoTiffWriter {
    /// Writes `image` spanning `bounds` to `output`, replacing any existing
    /// file and embedding a summary of `system_md` as dataset metadata.
    fn write_geotiff(
        &self,
        image: &RgbImageData,
        bounds: &GpsBounds,
        system_md: &Value,
        output: &Path,
        config: &GeoTiffConfig,
    ) -> Result<()>;
}

//! Georeferencing of the written images
//!
//! Images are north-up rasters in EPSG:4326: the geotransform stretches the
//! view's bounding box over the pixel grid, row 0 at the northern edge.

use serde_json::Value;

use crate::stereo_pipeline::metadata::GpsBounds;

pub const WGS84_EPSG: u32 = 4326;

/// GDAL geotransform placing a `width` x `height` raster over `bounds`.
pub fn geo_transform(bounds: &GpsBounds, width: usize, height: usize) -> [f64; 6] {
    let lon_resolution = (bounds.lon_max - bounds.lon_min) / width as f64;
    let lat_resolution = (bounds.lat_max - bounds.lat_min) / height as f64;
    [bounds.lon_min, lon_resolution, 0.0, bounds.lat_max, 0.0, -lat_resolution]
}

/// Dataset metadata items summarizing `system_md`.
///
/// Items are produced only for the fields present in the metadata.
pub fn metadata_items(system_md: &Value) -> Vec<(&'static str, String)> {
    let mut items = Vec::new();

    let text_at = |section: &str, key: &str| {
        system_md
            .get(section)
            .and_then(|s| s.get(key))
            .and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
    };

    if let Some(datetime) = text_at("gantry_variable_metadata", "datetime") {
        items.push(("datetime", datetime));
    }
    if let Some(sensor_id) = text_at("sensor_fixed_metadata", "sensor_id") {
        items.push(("sensor_id", sensor_id));
    }
    if let Some(url) = text_at("sensor_fixed_metadata", "url") {
        items.push(("sensor_url", url));
    }
    if let Some(Value::Array(experiments)) = system_md.get("experiment_metadata") {
        let names: Vec<&str> = experiments
            .iter()
            .filter_map(|e| e.get("name").and_then(Value::as_str))
            .collect();
        if !names.is_empty() {
            items.push(("experiment_name", names.join(", ")));
        }
    }

    items
}

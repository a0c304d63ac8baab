//! Adds the derived sections of the canonical schema to cleaned metadata.

use std::path::Path;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::stereo_pipeline::common::error::{ConversionError, Result};
use crate::stereo_pipeline::common::{Experiment, RunConfig, StereoView};
use crate::stereo_pipeline::metadata::cleaner::CANONICAL_TIME_FORMAT;
use crate::stereo_pipeline::metadata::spatial::{
    bounds_to_geojson, point_to_geojson, FieldProjection, GpsBounds,
};
use crate::stereo_pipeline::metadata::types::SensorId;

const SENSOR_FIXED_KEY: &str = "sensor_fixed_metadata";
const EXPERIMENT_KEY: &str = "experiment_metadata";
const SPATIAL_KEY: &str = "spatial_metadata";

/// Share of the camera height assumed to be taken up by the canopy.
const PLANT_HEIGHT_SLOPE: f64 = 0.574;

/// Enriches cleaned metadata with sensor, experiment and spatial sections.
///
/// Sections already present are kept untouched. The spatial section is only
/// computed when the gantry position is known.
pub fn enrich_metadata(clean: &Value, sensor: SensorId, config: &RunConfig) -> Result<Value> {
    let Value::Object(root) = clean else {
        return Err(ConversionError::InvalidJsonContent(
            "metadata must be a JSON object".to_string(),
        ));
    };
    let mut enriched = root.clone();

    if !enriched.contains_key(SENSOR_FIXED_KEY) {
        let fixed = load_sensor_fixed(sensor, &config.sensor_metadata_cache)?;
        enriched.insert(SENSOR_FIXED_KEY.to_string(), fixed);
    }

    if !enriched.contains_key(EXPERIMENT_KEY) {
        let date = capture_date(&enriched);
        let experiments: Vec<&Experiment> = config
            .experiments
            .iter()
            .filter(|experiment| experiment.covers(date))
            .collect();
        debug!("{} experiment(s) cover {}", experiments.len(), date);
        enriched.insert(EXPERIMENT_KEY.to_string(), serde_json::to_value(experiments)?);
    }

    if !enriched.contains_key(SPATIAL_KEY) {
        match sensor {
            SensorId::StereoTop => match stereo_spatial_metadata(&enriched)? {
                Some(spatial) => {
                    enriched.insert(SPATIAL_KEY.to_string(), spatial);
                }
                None => debug!("Gantry position or field of view unknown, no spatial metadata"),
            },
        }
    }

    Ok(Value::Object(enriched))
}

/// Reads `<cache>/sensors/<sensor>/sensor_fixed_metadata.json`, or falls back
/// to the built-in description of the sensor.
fn load_sensor_fixed(sensor: SensorId, cache_dir: &Path) -> Result<Value> {
    let path = cache_dir
        .join("sensors")
        .join(sensor.cache_name())
        .join("sensor_fixed_metadata.json");

    if !path.exists() {
        debug!("No cached fixed metadata at {}, using defaults", path.display());
        return Ok(default_sensor_fixed(sensor));
    }

    let text = std::fs::read_to_string(&path).map_err(|e| {
        ConversionError::InputReadError(format!("{}: {}", path.display(), e))
    })?;
    serde_json::from_str(&text).map_err(|e| {
        ConversionError::InvalidJsonContent(format!("{}: {}", path.display(), e))
    })
}

fn default_sensor_fixed(sensor: SensorId) -> Value {
    match sensor {
        SensorId::StereoTop => json!({
            "sensor_id": sensor.as_str(),
            "sensor_name": "Stereo RGB camera",
            "field_of_view_at_2m_m": {"x": 1.857, "y": 1.246},
            "location_in_camera_box_m": {"x": 0.877, "y": 2.276, "z": 0.578},
            "stereo_offset_m": 0.17
        }),
    }
}

/// Capture date from the gantry timestamp, or today when it can't be read.
fn capture_date(metadata: &Map<String, Value>) -> NaiveDate {
    let datetime = metadata
        .get("gantry_variable_metadata")
        .and_then(|gantry| gantry.get("datetime"))
        .and_then(Value::as_str);

    let parsed = datetime.and_then(|text| {
        NaiveDateTime::parse_from_str(text, CANONICAL_TIME_FORMAT)
            .map(|dt| dt.date())
            .ok()
            .or_else(|| text.get(..10).and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()))
    });

    parsed.unwrap_or_else(|| {
        warn!("Capture date unknown, matching experiments against today");
        Local::now().date_naive()
    })
}

/// Gantry position and camera description needed to place the footprints.
struct CameraGeometry<'a> {
    gantry: (f64, f64, f64),
    fov: (f64, f64),
    fixed: &'a Value,
}

fn camera_geometry(metadata: &Map<String, Value>) -> Option<CameraGeometry<'_>> {
    let position = metadata.get("gantry_variable_metadata")?.get("position_m")?;
    let gantry = (
        number(position.get("x")?)?,
        number(position.get("y")?)?,
        number(position.get("z")?)?,
    );
    let fixed = metadata.get(SENSOR_FIXED_KEY)?;
    let fov = pair(fixed.get("field_of_view_at_2m_m")?)?;
    Some(CameraGeometry { gantry, fov, fixed })
}

/// Ground footprint of both cameras, as GeoJSON bounding boxes and centroids.
///
/// `Ok(None)` when the gantry position or the field of view is unknown.
fn stereo_spatial_metadata(metadata: &Map<String, Value>) -> Result<Option<Value>> {
    let Some(CameraGeometry { gantry, fov, fixed }) = camera_geometry(metadata) else {
        return Ok(None);
    };
    let (gantry_x, gantry_y, gantry_z) = gantry;
    let (fov_x, fov_y) = fov;
    let camera_box = fixed.get("location_in_camera_box_m");
    let offset_along = |axis: &str| {
        camera_box
            .and_then(|cb| cb.get(axis))
            .and_then(number)
            .unwrap_or(0.0)
    };
    let stereo_offset = fixed.get("stereo_offset_m").and_then(number).unwrap_or(0.0);

    let center_x = gantry_x + offset_along("x");
    let center_y = gantry_y + offset_along("y");
    let camera_height = gantry_z + offset_along("z");

    let canopy_distance = camera_height * (1.0 - PLANT_HEIGHT_SLOPE);
    if canopy_distance <= 0.0 {
        warn!("Camera height {:.3}m leaves no room above the canopy", camera_height);
        return Ok(None);
    }
    // The field of view is given at 2m; scale it to the canopy distance.
    let footprint_x = fov_x * canopy_distance / 2.0;
    let footprint_y = fov_y * canopy_distance / 2.0;
    let (half_x, half_y) = (footprint_x / 2.0, footprint_y / 2.0);

    let projection = FieldProjection::new()?;
    let mut spatial = Map::new();
    for view in StereoView::ALL {
        let view_y = match view {
            StereoView::Left => center_y + stereo_offset,
            StereoView::Right => center_y - stereo_offset,
        };
        let corners = [
            (center_x - half_x, view_y - half_y),
            (center_x + half_x, view_y - half_y),
            (center_x + half_x, view_y + half_y),
            (center_x - half_x, view_y + half_y),
        ];
        let corners = corners
            .iter()
            .map(|&(x, y)| projection.scanalyzer_to_latlon(x, y))
            .collect::<Result<Vec<_>>>()?;
        let Some(bounds) = GpsBounds::enclosing(corners) else {
            return Ok(None);
        };
        let (lat, lon) = projection.scanalyzer_to_latlon(center_x, view_y)?;

        spatial.insert(
            view.as_str().to_string(),
            json!({
                "bounding_box": bounds_to_geojson(&bounds),
                "centroid": point_to_geojson(lat, lon),
            }),
        );
    }
    Ok(Some(Value::Object(spatial)))
}

/// Numbers in capture records are often stored as strings.
fn number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Reads `{"x": .., "y": ..}`, `[x, y]` or `"[x y]"`.
fn pair(value: &Value) -> Option<(f64, f64)> {
    match value {
        Value::Object(map) => Some((number(map.get("x")?)?, number(map.get("y")?)?)),
        Value::Array(items) => Some((number(items.first()?)?, number(items.get(1)?)?)),
        Value::String(text) => {
            let mut parts = text
                .trim_matches(|c: char| c == '[' || c == ']')
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|part| !part.is_empty())
                .map(str::parse::<f64>);
            Some((parts.next()?.ok()?, parts.next()?.ok()?))
        }
        _ => None,
    }
}

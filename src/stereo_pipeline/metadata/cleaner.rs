//! Flattens raw LemnaTec capture records into the canonical schema.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::stereo_pipeline::common::error::{ConversionError, Result};
use crate::stereo_pipeline::common::StereoView;
use crate::stereo_pipeline::metadata::types::SensorId;

const LEMNATEC_KEY: &str = "lemnatec_measurement_metadata";
const LEMNATEC_TIME_FORMAT: &str = "%m/%d/%Y %H:%M:%S";
pub(crate) const CANONICAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Cleans raw capture metadata for `sensor`.
///
/// Documents carrying a `lemnatec_measurement_metadata` section are flattened
/// into `gantry_variable_metadata` and `sensor_variable_metadata`. Any other
/// object is taken to be clean already and returned unchanged.
pub fn clean_metadata(raw: &Value, sensor: SensorId) -> Result<Value> {
    let Value::Object(root) = raw else {
        return Err(ConversionError::InvalidJsonContent(
            "metadata must be a JSON object".to_string(),
        ));
    };

    let Some(lemnatec) = root.get(LEMNATEC_KEY) else {
        debug!("No {} section, metadata treated as already clean", LEMNATEC_KEY);
        return Ok(raw.clone());
    };
    let Value::Object(lemnatec) = lemnatec else {
        return Err(ConversionError::InvalidJsonContent(format!(
            "{} must be a JSON object",
            LEMNATEC_KEY
        )));
    };

    debug!("Cleaning LemnaTec metadata for {}", sensor);

    let mut cleaned = Map::new();
    if let Some(Value::Object(gantry)) = lemnatec.get("gantry_system_variable_metadata") {
        cleaned.insert("gantry_variable_metadata".to_string(), clean_gantry(gantry));
    }
    if let Some(Value::Object(sensor_md)) = lemnatec.get("sensor_variable_metadata") {
        cleaned.insert(
            "sensor_variable_metadata".to_string(),
            clean_sensor_variable(sensor_md, sensor),
        );
    }
    if let Some(user) = lemnatec.get("user_given_data") {
        cleaned.insert("user_given_data".to_string(), user.clone());
    }

    // Sections already outside the LemnaTec record are carried over as-is.
    for (key, value) in root {
        if key != LEMNATEC_KEY && !cleaned.contains_key(key) {
            cleaned.insert(key.clone(), value.clone());
        }
    }

    Ok(Value::Object(cleaned))
}

fn clean_gantry(gantry: &Map<String, Value>) -> Value {
    let mut position = Map::new();
    let mut speed = Map::new();
    let mut cleaned = Map::new();

    for (key, value) in gantry {
        if key == "time" {
            cleaned.insert("datetime".to_string(), canonical_datetime(value));
        } else if let Some(axis) = axis_of(key, "position", "[m]") {
            position.insert(axis.to_string(), value.clone());
        } else if let Some(axis) = axis_of(key, "speed", "[m/s]") {
            speed.insert(axis.to_string(), value.clone());
        } else {
            cleaned.insert(snake_case(key), value.clone());
        }
    }

    if !position.is_empty() {
        cleaned.insert("position_m".to_string(), Value::Object(position));
    }
    if !speed.is_empty() {
        cleaned.insert("speed_m/s".to_string(), Value::Object(speed));
    }
    Value::Object(cleaned)
}

#[derive(Clone, Copy)]
enum ShapeField {
    Width,
    Height,
    Format,
}

fn clean_sensor_variable(sensor_md: &Map<String, Value>, sensor: SensorId) -> Value {
    match sensor {
        SensorId::StereoTop => {
            let mut width = Map::new();
            let mut height = Map::new();
            let mut format = Map::new();
            let mut cleaned = Map::new();

            for (key, value) in sensor_md {
                let shape_field = StereoView::ALL.into_iter().find_map(|view| {
                    let v = view.as_str();
                    if key == &format!("width {v} image [pixel]") {
                        Some((ShapeField::Width, view))
                    } else if key == &format!("height {v} image [pixel]") {
                        Some((ShapeField::Height, view))
                    } else if key == &format!("image format {v} image") {
                        Some((ShapeField::Format, view))
                    } else {
                        None
                    }
                });
                match shape_field {
                    Some((field, view)) => {
                        let target = match field {
                            ShapeField::Width => &mut width,
                            ShapeField::Height => &mut height,
                            ShapeField::Format => &mut format,
                        };
                        target.insert(view.as_str().to_string(), value.clone());
                    }
                    None => {
                        cleaned.insert(snake_case(key), value.clone());
                    }
                }
            }

            if !width.is_empty() {
                cleaned.insert("width_image_pixels".to_string(), Value::Object(width));
            }
            if !height.is_empty() {
                cleaned.insert("height_image_pixels".to_string(), Value::Object(height));
            }
            if !format.is_empty() {
                cleaned.insert("image_format".to_string(), Value::Object(format));
            }
            Value::Object(cleaned)
        }
    }
}

/// `position x [m]` -> `x` for `quantity = "position"`, `unit = "[m]"`.
fn axis_of<'a>(key: &'a str, quantity: &str, unit: &str) -> Option<&'a str> {
    let axis = key.strip_prefix(quantity)?.strip_suffix(unit)?.trim();
    matches!(axis, "x" | "y" | "z").then_some(axis)
}

fn canonical_datetime(value: &Value) -> Value {
    let Some(text) = value.as_str() else {
        return value.clone();
    };
    match NaiveDateTime::parse_from_str(text.trim(), LEMNATEC_TIME_FORMAT) {
        Ok(datetime) => Value::String(datetime.format(CANONICAL_TIME_FORMAT).to_string()),
        Err(_) => {
            warn!("Unrecognized gantry time {:?}, keeping it verbatim", text);
            value.clone()
        }
    }
}

/// `Camera exposure [ms]` -> `camera_exposure_ms`
fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

use serde_json::Value;

use crate::stereo_pipeline::common::error::{ConversionError, Result};
use crate::stereo_pipeline::common::StereoView;
use crate::stereo_pipeline::raw::types::{ImageShape, PixelFormat};

const SENSOR_VARIABLE_KEY: &str = "sensor_variable_metadata";

/// TIFF stores image dimensions as 32-bit values.
const MAX_DIMENSION: usize = u32::MAX as usize;

/// Reads the shape of one view's dump from canonical metadata.
///
/// Absent keys are reported as missing spatial metadata, so a record that
/// lacks them aborts conversion before anything is written.
pub fn image_shape(metadata: &Value, view: StereoView) -> Result<ImageShape> {
    let sensor_md = metadata
        .get(SENSOR_VARIABLE_KEY)
        .ok_or_else(|| ConversionError::MissingSpatialMetadata(SENSOR_VARIABLE_KEY.to_string()))?;

    let format = view_entry(sensor_md, "image_format", view)?
        .as_str()
        .ok_or_else(|| {
            ConversionError::InvalidJsonContent(format!("image format of {view} view is not a string"))
        })?
        .parse::<PixelFormat>()?;

    let width = dimension(view_entry(sensor_md, "width_image_pixels", view)?, "width", view)?;
    let height = dimension(view_entry(sensor_md, "height_image_pixels", view)?, "height", view)?;
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(ConversionError::InvalidDimensions(width, height));
    }

    Ok(ImageShape { width, height, format })
}

fn view_entry<'a>(sensor_md: &'a Value, field: &str, view: StereoView) -> Result<&'a Value> {
    sensor_md
        .get(field)
        .and_then(|per_view| per_view.get(view.as_str()))
        .ok_or_else(|| {
            ConversionError::MissingSpatialMetadata(format!(
                "{SENSOR_VARIABLE_KEY}.{field}.{view}"
            ))
        })
}

/// Dimensions are stored either as integers or as integer strings.
fn dimension(value: &Value, name: &str, view: StereoView) -> Result<usize> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        ConversionError::InvalidJsonContent(format!("corrupt {name} for {view} view: {value}"))
    })
}

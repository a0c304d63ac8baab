use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::stereo_pipeline::common::error::{ConversionError, Result};

/// Loads the capture metadata file as JSON.
///
/// The document must be an object with at least one top-level entry; `null`,
/// `{}` and every non-object document are rejected as invalid content.
pub fn load_metadata<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        ConversionError::InputReadError(format!("{}: {}", path.display(), e))
    })?;

    let metadata: Value = serde_json::from_str(&text).map_err(|e| {
        ConversionError::InvalidJsonContent(format!("{}: {}", path.display(), e))
    })?;

    match &metadata {
        Value::Object(map) if !map.is_empty() => {
            debug!("Loaded {} top-level metadata entries from {}", map.len(), path.display());
            Ok(metadata)
        }
        Value::Object(_) => Err(ConversionError::InvalidJsonContent(format!(
            "{}: file is empty",
            path.display()
        ))),
        _ => Err(ConversionError::InvalidJsonContent(format!(
            "{}: expected a JSON object",
            path.display()
        ))),
    }
}

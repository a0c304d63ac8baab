//! Pipeline conversions module
//!
//! This module contains the orchestration that turns a validated stereo input
//! set into its geoTIFF and metadata outputs.

mod ascii_json;
mod stereo_to_geotiff;

#[cfg(test)]
mod tests;

pub use stereo_to_geotiff::{ConversionReport, StereoToGeoTiffPipeline, ViewPlan};

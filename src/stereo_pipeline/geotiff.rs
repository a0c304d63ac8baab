//! geoTIFF writing module
//!
//! This module writes RGB images as georeferenced TIFF files through GDAL's
//! `GTiff` driver, carrying the image's lat/lon extent and a summary of the
//! capture metadata.

mod writer;
mod standard_geotiff_writer;
pub mod georef;
pub mod types;

pub use writer::GeoTiffWriter;
pub use standard_geotiff_writer::StandardGeoTiffWriter;
pub use types::{GeoTiffConfig, GeoTiffConfigBuilder, TiffCompression};

//! Stereo BIN to geoTIFF pipeline
//!
//! This module turns a pair of raw stereo camera dumps plus their capture
//! metadata into georeferenced TIFF images, with separate modules for argument
//! validation, metadata preparation, RAW decoding, geoTIFF writing and the
//! conversion orchestration that sequences them.

pub mod common;
pub mod params;
pub mod metadata;
pub mod raw;
pub mod geotiff;
pub mod conversions;

pub use common::{
    AbortStage,
    ConversionError,
    Experiment,
    FileRole,
    Result,
    RunConfig,
    RunConfigBuilder,
    StereoView,
};

pub use params::{
    check_parameters,
    StereoInputs,
};

pub use metadata::{
    load_metadata,
    GpsBounds,
    MetadataPreparer,
    SensorId,
};

pub use raw::{
    BayerReader,
    ImageShape,
    PixelFormat,
    RawImageReader,
    RgbImageData,
};

pub use geotiff::{
    GeoTiffConfig,
    GeoTiffConfigBuilder,
    GeoTiffWriter,
    StandardGeoTiffWriter,
    TiffCompression,
};

pub use conversions::{
    ConversionReport,
    StereoToGeoTiffPipeline,
    ViewPlan,
};

//! Run configuration types

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::stereo_pipeline::geotiff::TiffCompression;
use crate::stereo_pipeline::metadata::SensorId;

/// An experiment record used to tag captures by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub url: String,
}

impl Experiment {
    /// A placeholder experiment spanning a single day.
    pub fn dummy(date: NaiveDate) -> Self {
        Self {
            name: "Dummy".to_string(),
            start_date: date,
            end_date: date,
            url: String::new(),
        }
    }

    /// Whether `date` falls inside the experiment, both ends inclusive.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Configuration for one BIN to geoTIFF run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Sensor the metadata is cleaned and enriched for
    pub sensor: SensorId,
    /// Experiments available to metadata enrichment, instead of a live lookup
    pub experiments: Vec<Experiment>,
    /// Directory searched for cached sensor fixed metadata
    pub sensor_metadata_cache: PathBuf,
    /// Compression of the left view's geoTIFF
    pub left_compression: TiffCompression,
    /// Compression of the right view's geoTIFF
    pub right_compression: TiffCompression,
}

impl Default for RunConfig {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            sensor: SensorId::StereoTop,
            experiments: vec![Experiment::dummy(today)],
            sensor_metadata_cache: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            left_compression: TiffCompression::None,
            right_compression: TiffCompression::Lzw,
        }
    }
}

impl RunConfig {
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }
}

/// Builder for RunConfig
#[derive(Default)]
pub struct RunConfigBuilder {
    sensor: Option<SensorId>,
    experiments: Option<Vec<Experiment>>,
    sensor_metadata_cache: Option<PathBuf>,
    left_compression: Option<TiffCompression>,
    right_compression: Option<TiffCompression>,
}

impl RunConfigBuilder {
    pub fn sensor(mut self, sensor: SensorId) -> Self {
        self.sensor = Some(sensor);
        self
    }

    pub fn experiments(mut self, experiments: Vec<Experiment>) -> Self {
        self.experiments = Some(experiments);
        self
    }

    pub fn sensor_metadata_cache(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sensor_metadata_cache = Some(dir.into());
        self
    }

    pub fn left_compression(mut self, compression: TiffCompression) -> Self {
        self.left_compression = Some(compression);
        self
    }

    pub fn right_compression(mut self, compression: TiffCompression) -> Self {
        self.right_compression = Some(compression);
        self
    }

    pub fn build(self) -> RunConfig {
        let default = RunConfig::default();
        RunConfig {
            sensor: self.sensor.unwrap_or(default.sensor),
            experiments: self.experiments.unwrap_or(default.experiments),
            sensor_metadata_cache: self.sensor_metadata_cache.unwrap_or(default.sensor_metadata_cache),
            left_compression: self.left_compression.unwrap_or(default.left_compression),
            right_compression: self.right_compression.unwrap_or(default.right_compression),
        }
    }
}

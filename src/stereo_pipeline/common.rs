//! Common utilities module
//!
//! This module contains the error type, the run configuration and the view
//! identifiers shared across the stereo pipeline.

pub mod error;
pub mod config;
pub mod view;

pub use error::{AbortStage, ConversionError, FileRole, Result};
pub use config::{Experiment, RunConfig, RunConfigBuilder};
pub use view::StereoView;

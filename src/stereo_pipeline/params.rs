//! Invocation parameter module
//!
//! This module checks the three command line paths and works out which one
//! is the left image, the right image and the metadata file.

mod validator;
pub mod types;

pub use validator::{check_parameters, LEFT_SUFFIX, METADATA_SUFFIX, RIGHT_SUFFIX};
pub use types::StereoInputs;

//! RAW image reading module
//!
//! This module describes the shape of the stereo camera dumps and decodes them
//! into RGB images.

mod reader;
mod bayer_reader;
mod shape;
pub mod types;

pub use reader::RawImageReader;
pub use bayer_reader::BayerReader;
pub use shape::image_shape;
pub use types::{ImageShape, PixelFormat, RgbImageData};

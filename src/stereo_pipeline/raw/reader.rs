use crate::stereo_pipeline::common::error::Result;
use crate::stereo_pipeline::raw::types::{ImageShape, RgbImageData};

pub trait RawImageReader {
    /// Decodes a headerless dump whose layout is given entirely by `shape`.
    fn read_raw(&self, shape: &ImageShape, data: &[u8]) -> Result<RgbImageData>;
}

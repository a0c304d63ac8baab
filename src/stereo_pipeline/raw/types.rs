//! RAW image data types

use std::fmt;
use std::str::FromStr;

use crate::stereo_pipeline::common::error::ConversionError;

/// Pixel layouts the stereo cameras can dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit Bayer mosaic, first row starting green then red
    BayerGr8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::BayerGr8 => 1,
        }
    }
}

impl FromStr for PixelFormat {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BayerGR8" => Ok(PixelFormat::BayerGr8),
            other => Err(ConversionError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::BayerGr8 => write!(f, "BayerGR8"),
        }
    }
}

/// Layout of one camera dump, as declared in the capture metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageShape {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Pixel layout of the dump
    pub format: PixelFormat,
}

impl ImageShape {
    /// Number of bytes a dump of this shape must contain, `None` on overflow.
    pub fn byte_len(&self) -> Option<usize> {
        self.width
            .checked_mul(self.height)?
            .checked_mul(self.format.bytes_per_pixel())
    }
}

/// RGB image data after demosaicing
#[derive(Debug, Clone)]
pub struct RgbImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub data: Vec<u8>,
}

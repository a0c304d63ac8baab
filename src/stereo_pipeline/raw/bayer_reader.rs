//! RAW dump reader for the stereo cameras' Bayer output.
//!
//! The dumps carry no header: the byte stream is the sensor mosaic row by row,
//! and the shape comes from the capture metadata. Demosaicing is done with the
//! bayer crate.

use std::io::Cursor;

use bayer::{BayerDepth, Demosaic, RasterDepth, RasterMut, CFA};
use tracing::debug;

use crate::stereo_pipeline::common::error::{ConversionError, Result};
use crate::stereo_pipeline::raw::reader::RawImageReader;
use crate::stereo_pipeline::raw::types::{ImageShape, PixelFormat, RgbImageData};

/// Channels in the demosaiced output.
const RGB_CHANNELS: usize = 3;

/// Demosaicing needs at least one full 2x2 Bayer cell.
const MIN_DIMENSION: usize = 2;

/// Reader for headerless Bayer dumps.
pub struct BayerReader;

impl BayerReader {
    fn mosaic(format: PixelFormat) -> (CFA, BayerDepth) {
        match format {
            PixelFormat::BayerGr8 => (CFA::GRBG, BayerDepth::Depth8),
        }
    }
}

impl RawImageReader for BayerReader {
    /// Demosaics a dump into 8-bit RGB.
    ///
    /// The dump must hold exactly `width * height` samples; trailing or
    /// missing bytes are a decode error rather than being padded or cut.
    fn read_raw(&self, shape: &ImageShape, data: &[u8]) -> Result<RgbImageData> {
        let ImageShape { width, height, format } = *shape;
        debug!("Decoding {} dump {}x{}, {} bytes", format, width, height, data.len());

        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(ConversionError::InvalidDimensions(width, height));
        }
        let (Some(expected_len), Some(output_len)) = (
            shape.byte_len(),
            width.checked_mul(height).and_then(|pixels| pixels.checked_mul(RGB_CHANNELS)),
        ) else {
            return Err(ConversionError::InvalidDimensions(width, height));
        };
        if data.len() != expected_len {
            return Err(ConversionError::DecodeError(format!(
                "expected {} bytes for a {}x{} {} image, got {}",
                expected_len,
                width,
                height,
                format,
                data.len()
            )));
        }

        let (cfa, depth) = Self::mosaic(format);
        let mut output_buf = vec![0u8; output_len];
        {
            let mut output_raster = RasterMut::new(width, height, RasterDepth::Depth8, &mut output_buf);
            bayer::run_demosaic(
                &mut Cursor::new(data),
                depth,
                cfa,
                Demosaic::Linear,
                &mut output_raster,
            )
            .map_err(|e| ConversionError::DecodeError(format!("demosaic failed: {:?}", e)))?;
        }

        debug!("Demosaic complete");
        Ok(RgbImageData {
            width,
            height,
            data: output_buf,
        })
    }
}

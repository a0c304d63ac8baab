use std::path::Path;

use gdal::errors::GdalError;
use gdal::raster::{Buffer, GdalType, RasterCreationOptions};
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, DriverManager, Metadata};
use serde_json::Value;
use tracing::debug;

use crate::stereo_pipeline::common::error::{ConversionError, Result};
use crate::stereo_pipeline::geotiff::georef::{geo_transform, metadata_items, WGS84_EPSG};
use crate::stereo_pipeline::geotiff::types::GeoTiffConfig;
use crate::stereo_pipeline::geotiff::writer::GeoTiffWriter;
use crate::stereo_pipeline::metadata::GpsBounds;
use crate::stereo_pipeline::raw::RgbImageData;

const GTIFF_DRIVER: &str = "GTiff";
const RGB_BANDS: usize = 3;

pub struct StandardGeoTiffWriter;

fn encode_err(e: GdalError) -> ConversionError {
    ConversionError::EncodeError(e.to_string())
}

/// Creates a three band `GTiff` dataset with samples of type `T`.
fn create_dataset<T: GdalType>(
    output: &Path,
    width: usize,
    height: usize,
    config: &GeoTiffConfig,
) -> Result<Dataset> {
    let mut options = RasterCreationOptions::new();
    for (key, value) in config.compression.creation_options() {
        options.set_name_value(key, value).map_err(encode_err)?;
    }

    let driver = DriverManager::get_driver_by_name(GTIFF_DRIVER).map_err(encode_err)?;
    driver
        .create_with_band_type_with_options::<T, _>(output, width, height, RGB_BANDS, &options)
        .map_err(|e| ConversionError::OutputWriteError(format!("{}: {}", output.display(), e)))
}

/// Splits interleaved RGB samples into one band each.
fn write_bands<T: GdalType + Copy>(
    dataset: &mut Dataset,
    width: usize,
    height: usize,
    samples: &[T],
) -> Result<()> {
    for band_index in 0..RGB_BANDS {
        let plane: Vec<T> = samples
            .iter()
            .skip(band_index)
            .step_by(RGB_BANDS)
            .copied()
            .collect();
        let mut buffer = Buffer::new((width, height), plane);
        let mut band = dataset.rasterband(band_index + 1).map_err(encode_err)?;
        band.write((0, 0), (width, height), &mut buffer)
            .map_err(encode_err)?;
    }
    Ok(())
}

impl GeoTiffWriter for StandardGeoTiffWriter {
    fn write_geotiff(
        &self,
        image: &RgbImageData,
        bounds: &GpsBounds,
        system_md: &Value,
        output: &Path,
        config: &GeoTiffConfig,
    ) -> Result<()> {
        debug!("Encoding geoTIFF image: {}x{}", image.width, image.height);

        let (width, height) = (image.width, image.height);
        let expected_len = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(RGB_BANDS));
        if width == 0 || height == 0 || expected_len != Some(image.data.len()) {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        let mut dataset = if config.as_float {
            create_dataset::<f32>(output, width, height, config)?
        } else {
            create_dataset::<u8>(output, width, height, config)?
        };

        let transform = geo_transform(bounds, width, height);
        debug!(
            lon_min = bounds.lon_min,
            lat_max = bounds.lat_max,
            "Georeferencing with geotransform {:?}",
            transform
        );
        dataset.set_geo_transform(&transform).map_err(encode_err)?;
        let srs = SpatialRef::from_epsg(WGS84_EPSG).map_err(encode_err)?;
        dataset.set_spatial_ref(&srs).map_err(encode_err)?;

        for (key, value) in metadata_items(system_md) {
            dataset.set_metadata_item(key, &value, "").map_err(encode_err)?;
        }

        if config.as_float {
            let samples: Vec<f32> = image.data.iter().map(|&v| v as f32).collect();
            write_bands(&mut dataset, width, height, &samples)?;
        } else {
            write_bands(&mut dataset, width, height, &image.data)?;
        }

        // Closing the dataset flushes it to disk.
        drop(dataset);

        debug!("geoTIFF encoding complete: {}", output.display());
        Ok(())
    }
}

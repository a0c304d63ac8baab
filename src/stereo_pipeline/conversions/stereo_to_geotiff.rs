use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::stereo_pipeline::conversions::ascii_json::AsciiPrettyFormatter;
use crate::stereo_pipeline::{
    common::{ConversionError, Result, RunConfig, StereoView},
    geotiff::{GeoTiffConfig, GeoTiffWriter, StandardGeoTiffWriter},
    metadata::{geojson_to_bounds, load_metadata, GpsBounds, MetadataPreparer},
    params::StereoInputs,
    raw::{image_shape, BayerReader, ImageShape, RawImageReader},
};

/// Everything needed to convert one view, read from metadata up front.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewPlan {
    pub view: StereoView,
    pub shape: ImageShape,
    pub bounds: GpsBounds,
}

/// Paths written by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub left_tiff: PathBuf,
    pub right_tiff: PathBuf,
    pub metadata: PathBuf,
}

pub struct StereoToGeoTiffPipeline<R: RawImageReader, W: GeoTiffWriter> {
    reader: R,
    writer: W,
    config: RunConfig,
}

impl StereoToGeoTiffPipeline<BayerReader, StandardGeoTiffWriter> {
    pub fn new(config: RunConfig) -> Self {
        Self {
            reader: BayerReader,
            writer: StandardGeoTiffWriter,
            config,
        }
    }
}

impl<R: RawImageReader, W: GeoTiffWriter> StereoToGeoTiffPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: RunConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    /// Loads and normalizes the metadata, then converts both views.
    #[instrument(skip(self, inputs), fields(metadata = %inputs.metadata.display()))]
    pub fn run(&self, inputs: &StereoInputs) -> Result<ConversionReport> {
        let raw = {
            let _span = tracing::info_span!("load_metadata").entered();
            load_metadata(&inputs.metadata)?
        };

        let metadata = MetadataPreparer::new(&self.config).prepare(&raw)?;
        drop(raw);

        self.convert(inputs, &metadata)
    }

    /// Reads shape and bounds for both views.
    ///
    /// Fails with `MissingSpatialMetadata` if either view lacks them, before
    /// any output exists.
    pub fn extract_views(&self, metadata: &Value) -> Result<[ViewPlan; 2]> {
        let plan = |view: StereoView| -> Result<ViewPlan> {
            let shape = image_shape(metadata, view)?;
            let bounding_box = metadata
                .get("spatial_metadata")
                .and_then(|spatial| spatial.get(view.as_str()))
                .and_then(|view_md| view_md.get("bounding_box"))
                .ok_or_else(|| {
                    ConversionError::MissingSpatialMetadata(format!(
                        "spatial_metadata.{view}.bounding_box"
                    ))
                })?;
            let bounds = geojson_to_bounds(bounding_box).ok_or_else(|| {
                ConversionError::InvalidJsonContent(format!(
                    "bounding box of {view} view is not a GeoJSON geometry"
                ))
            })?;
            Ok(ViewPlan { view, shape, bounds })
        };

        Ok([plan(StereoView::Left)?, plan(StereoView::Right)?])
    }

    /// Writes both geoTIFFs and the updated metadata.
    ///
    /// Prints a `creating <path>` line before each output. Nothing is written
    /// unless both views could be extracted.
    #[instrument(skip(self, inputs, metadata))]
    pub fn convert(&self, inputs: &StereoInputs, metadata: &Value) -> Result<ConversionReport> {
        let [left, right] = {
            let _span = tracing::info_span!("extract_views").entered();
            self.extract_views(metadata)?
        };

        let report = ConversionReport {
            left_tiff: inputs.left_output(),
            right_tiff: inputs.right_output(),
            metadata: inputs.metadata_output(),
        };

        println!("creating {}", report.left_tiff.display());
        self.convert_view(&left, &inputs.left, &report.left_tiff, metadata)?;

        println!("creating {}", report.right_tiff.display());
        self.convert_view(&right, &inputs.right, &report.right_tiff, metadata)?;

        println!("creating {}", report.metadata.display());
        {
            let _span = tracing::info_span!("write_metadata").entered();
            write_metadata(metadata, &report.metadata)?;
        }

        info!("Conversion complete");
        Ok(report)
    }

    fn tiff_config(&self, view: StereoView) -> GeoTiffConfig {
        let compression = match view {
            StereoView::Left => self.config.left_compression,
            StereoView::Right => self.config.right_compression,
        };
        GeoTiffConfig::builder()
            .compression(compression)
            .as_float(false)
            .build()
    }

    #[instrument(skip(self, plan, input_path, output_path, metadata), fields(view = %plan.view))]
    fn convert_view(
        &self,
        plan: &ViewPlan,
        input_path: &Path,
        output_path: &Path,
        metadata: &Value,
    ) -> Result<()> {
        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting view"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let image = {
            let _span = tracing::info_span!("decode_raw",
                width = plan.shape.width,
                height = plan.shape.height
            ).entered();
            self.reader.read_raw(&plan.shape, &input_data)?
        };
        drop(input_data);

        {
            let _span = tracing::info_span!("encode_geotiff").entered();
            self.writer.write_geotiff(
                &image,
                &plan.bounds,
                metadata,
                output_path,
                &self.tiff_config(plan.view),
            )?;
        }

        info!(
            width = image.width,
            height = image.height,
            "View written"
        );
        Ok(())
    }
}

/// Serializes `metadata` with 4-space indentation and ASCII-only strings,
/// replacing any existing file.
fn write_metadata(metadata: &Value, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        ConversionError::OutputWriteError(format!("{}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);

    let formatter = AsciiPrettyFormatter::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    metadata.serialize(&mut serializer)?;

    writer.flush()?;
    Ok(())
}

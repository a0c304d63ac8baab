use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tempfile::TempDir;

use crate::stereo_pipeline::common::{ConversionError, Result, RunConfig, StereoView};
use crate::stereo_pipeline::conversions::StereoToGeoTiffPipeline;
use crate::stereo_pipeline::geotiff::{GeoTiffConfig, GeoTiffWriter, TiffCompression};
use crate::stereo_pipeline::metadata::GpsBounds;
use crate::stereo_pipeline::params::StereoInputs;
use crate::stereo_pipeline::raw::{ImageShape, RawImageReader, RgbImageData};

struct MockReader {
    should_fail: bool,
    calls: Arc<Mutex<Vec<ImageShape>>>,
}

impl RawImageReader for MockReader {
    fn read_raw(&self, shape: &ImageShape, _data: &[u8]) -> Result<RgbImageData> {
        self.calls.lock().unwrap().push(*shape);
        if self.should_fail {
            return Err(ConversionError::DecodeError("Mock decode error".to_string()));
        }
        Ok(RgbImageData {
            width: shape.width,
            height: shape.height,
            data: vec![0u8; shape.width * shape.height * 3],
        })
    }
}

#[derive(Debug, Clone)]
struct WrittenImage {
    bounds: GpsBounds,
    compression: TiffCompression,
    as_float: bool,
    system_md: Value,
}

struct MockWriter {
    written: Arc<Mutex<Vec<WrittenImage>>>,
}

impl GeoTiffWriter for MockWriter {
    fn write_geotiff(
        &self,
        _image: &RgbImageData,
        bounds: &GpsBounds,
        system_md: &Value,
        output: &Path,
        config: &GeoTiffConfig,
    ) -> Result<()> {
        fs::write(output, b"mock tiff")?;
        self.written.lock().unwrap().push(WrittenImage {
            bounds: *bounds,
            compression: config.compression,
            as_float: config.as_float,
            system_md: system_md.clone(),
        });
        Ok(())
    }
}

struct Fixture {
    dir: TempDir,
    inputs: StereoInputs,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let inputs = StereoInputs {
            left: dir.path().join("plot_left.bin"),
            right: dir.path().join("plot_right.bin"),
            metadata: dir.path().join("plot.json"),
        };
        fs::write(&inputs.left, vec![0u8; 4 * 2]).unwrap();
        fs::write(&inputs.right, vec![0u8; 4 * 2]).unwrap();
        Self { dir, inputs }
    }

    fn outputs_exist(&self) -> [bool; 3] {
        [
            self.inputs.left_output().exists(),
            self.inputs.right_output().exists(),
            self.inputs.metadata_output().exists(),
        ]
    }
}

fn polygon(lon_min: f64, lat_min: f64, lon_max: f64, lat_max: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[
            [lon_min, lat_min], [lon_max, lat_min], [lon_max, lat_max], [lon_min, lat_max], [lon_min, lat_min]
        ]]
    })
}

fn normalized_metadata() -> Value {
    json!({
        "gantry_variable_metadata": {"datetime": "2017-08-31T14:14:19"},
        "sensor_variable_metadata": {
            "width_image_pixels": {"left": "4", "right": "4"},
            "height_image_pixels": {"left": "2", "right": "2"},
            "image_format": {"left": "BayerGR8", "right": "BayerGR8"}
        },
        "spatial_metadata": {
            "left": {"bounding_box": polygon(-111.97496, 33.07597, -111.97493, 33.07616)},
            "right": {"bounding_box": polygon(-111.97490, 33.07597, -111.97487, 33.07616)}
        }
    })
}

type Recorded = (Arc<Mutex<Vec<ImageShape>>>, Arc<Mutex<Vec<WrittenImage>>>);

fn pipeline(should_fail: bool) -> (StereoToGeoTiffPipeline<MockReader, MockWriter>, Recorded) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let written = Arc::new(Mutex::new(Vec::new()));
    let pipeline = StereoToGeoTiffPipeline::with_custom(
        MockReader { should_fail, calls: calls.clone() },
        MockWriter { written: written.clone() },
        RunConfig::default(),
    );
    (pipeline, (calls, written))
}

#[test]
fn test_successful_conversion() {
    let fixture = Fixture::new();
    let (pipeline, (calls, written)) = pipeline(false);
    let metadata = normalized_metadata();

    let report = pipeline.convert(&fixture.inputs, &metadata).unwrap();

    assert_eq!(report.left_tiff, fixture.dir.path().join("plot_left.tif"));
    assert_eq!(report.right_tiff, fixture.dir.path().join("plot_right.tif"));
    assert_eq!(report.metadata, fixture.dir.path().join("plot_updated.json"));
    assert_eq!(fixture.outputs_exist(), [true, true, true]);
    assert_eq!(calls.lock().unwrap().len(), 2);

    let written = written.lock().unwrap();
    assert_eq!(written.len(), 2);
    assert_eq!(written[0].bounds.lon_min, -111.97496);
    assert_eq!(written[1].bounds.lon_min, -111.97490);
    assert!(written.iter().all(|w| w.system_md == metadata && !w.as_float));
}

#[test]
fn test_only_right_view_compressed() {
    let fixture = Fixture::new();
    let (pipeline, (_, written)) = pipeline(false);

    pipeline.convert(&fixture.inputs, &normalized_metadata()).unwrap();

    let written = written.lock().unwrap();
    assert!(matches!(written[0].compression, TiffCompression::None));
    assert!(matches!(written[1].compression, TiffCompression::Lzw));
}

#[test]
fn test_missing_right_bounding_box_writes_nothing() {
    let fixture = Fixture::new();
    let (pipeline, (calls, written)) = pipeline(false);
    let mut metadata = normalized_metadata();
    metadata["spatial_metadata"]
        .as_object_mut()
        .unwrap()
        .remove("right");

    let err = pipeline.convert(&fixture.inputs, &metadata).unwrap_err();

    assert!(err.is_clean_abort());
    assert_eq!(fixture.outputs_exist(), [false, false, false]);
    assert!(calls.lock().unwrap().is_empty());
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_missing_shape_writes_nothing() {
    let fixture = Fixture::new();
    let (pipeline, _) = pipeline(false);
    let mut metadata = normalized_metadata();
    metadata
        .as_object_mut()
        .unwrap()
        .remove("sensor_variable_metadata");

    let err = pipeline.convert(&fixture.inputs, &metadata).unwrap_err();

    assert!(matches!(err, ConversionError::MissingSpatialMetadata(_)));
    assert_eq!(fixture.outputs_exist(), [false, false, false]);
}

#[test]
fn test_oversized_dimensions_write_nothing() {
    let fixture = Fixture::new();
    let (pipeline, (calls, _)) = pipeline(false);
    let mut metadata = normalized_metadata();
    metadata["sensor_variable_metadata"]["width_image_pixels"]["left"] = json!("4294967296");
    metadata["sensor_variable_metadata"]["height_image_pixels"]["left"] = json!("4294967296");

    let err = pipeline.convert(&fixture.inputs, &metadata).unwrap_err();

    assert!(matches!(err, ConversionError::InvalidDimensions(..)));
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(fixture.outputs_exist(), [false, false, false]);
}

#[test]
fn test_non_ascii_metadata_escaped() {
    let fixture = Fixture::new();
    let (pipeline, _) = pipeline(false);
    let mut metadata = normalized_metadata();
    metadata["user_given_data"] = json!({"operator": "Jos\u{e9}"});

    pipeline.convert(&fixture.inputs, &metadata).unwrap();

    let text = fs::read_to_string(fixture.inputs.metadata_output()).unwrap();
    assert!(text.is_ascii());
    assert!(text.contains(r#""operator": "Jos\u00e9""#));
}

#[test]
fn test_reader_failure_creates_no_output() {
    let fixture = Fixture::new();
    let (pipeline, (_, written)) = pipeline(true);

    let err = pipeline.convert(&fixture.inputs, &normalized_metadata()).unwrap_err();

    assert!(matches!(err, ConversionError::DecodeError(_)));
    assert!(written.lock().unwrap().is_empty());
    assert_eq!(fixture.outputs_exist(), [false, false, false]);
}

#[test]
fn test_extract_views() {
    let (pipeline, _) = pipeline(false);

    let [left, right] = pipeline.extract_views(&normalized_metadata()).unwrap();

    assert_eq!(left.view, StereoView::Left);
    assert_eq!(right.view, StereoView::Right);
    assert_eq!((left.shape.width, left.shape.height), (4, 2));
    assert_eq!(left.bounds.lat_max, 33.07616);
}

#[test]
fn test_metadata_written_with_four_space_indent() {
    let fixture = Fixture::new();
    let (pipeline, _) = pipeline(false);
    let metadata = normalized_metadata();

    pipeline.convert(&fixture.inputs, &metadata).unwrap();

    let text = fs::read_to_string(fixture.inputs.metadata_output()).unwrap();
    assert!(text.starts_with("{\n    \"gantry_variable_metadata\": {\n        \"datetime\""));
    let reparsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(reparsed, metadata);
}

#[test]
fn test_run_rejects_empty_metadata_file() {
    let fixture = Fixture::new();
    fs::write(&fixture.inputs.metadata, "{}").unwrap();
    let (pipeline, _) = pipeline(false);

    let err = pipeline.run(&fixture.inputs).unwrap_err();

    assert!(matches!(err, ConversionError::InvalidJsonContent(_)));
    assert_eq!(fixture.outputs_exist(), [false, false, false]);
}

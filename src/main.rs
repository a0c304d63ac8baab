use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use stereo_bin2tif::logger;
use stereo_bin2tif::stereo_pipeline::{check_parameters, RunConfig, StereoToGeoTiffPipeline};

use tracing::{error, info, warn};

/// Converts a stereo camera BIN pair and its metadata into geoTIFF files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The left BIN, right BIN and JSON metadata files, in any order
    files: Vec<PathBuf>,

    /// Directory holding cached sensor fixed metadata (defaults to the working directory)
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    logger::init();
    let args = Args::parse();

    let inputs = check_parameters(&args.files)
        .inspect_err(|e| error!(stage = ?e.stage(), "Invalid parameters: {}", e))?;

    let mut config = RunConfig::builder();
    if let Some(dir) = args.cache_dir {
        config = config.sensor_metadata_cache(dir);
    }
    let pipeline = StereoToGeoTiffPipeline::new(config.build());

    info!("Starting stereo BIN to geoTIFF conversion");
    info!("Left: {}", inputs.left.display());
    info!("Right: {}", inputs.right.display());
    info!("Metadata: {}", inputs.metadata.display());

    match pipeline.run(&inputs) {
        Ok(report) => {
            info!(
                left = %report.left_tiff.display(),
                right = %report.right_tiff.display(),
                metadata = %report.metadata.display(),
                "Conversion successful!"
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_clean_abort() => {
            println!("ERROR: Spatial metadata not properly identified in JSON file");
            warn!("{}", e);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(stage = ?e.stage(), "Conversion failed: {}", e);
            Err(e.into())
        }
    }
}

use std::fmt;

use thiserror::Error;

/// The role an input file plays in a conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Left,
    Right,
    Metadata,
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRole::Left => write!(f, "Left"),
            FileRole::Right => write!(f, "Right"),
            FileRole::Metadata => write!(f, "JSON"),
        }
    }
}

/// How far a run got before it was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortStage {
    /// Nothing has been written to disk.
    BeforeOutput,
    /// Some outputs may already exist next to the inputs.
    DuringOutput,
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Too few parameters were specified: expected 3, got {0}")]
    InvalidArguments(usize),

    #[error("All files need to be in the same folder: {0}")]
    PathMismatch(String),

    #[error("Both left and right BIN files, and their JSON file, must be specified")]
    MissingFileRole,

    #[error("{0} file is specified but isn't available: {1}")]
    FileNotFound(FileRole, String),

    #[error("JSON file appears to be invalid: {0}")]
    InvalidJsonContent(String),

    #[error("Spatial metadata not properly identified in JSON file: missing {0}")]
    MissingSpatialMetadata(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode BIN image: {0}")]
    DecodeError(String),

    #[error("Failed to encode geoTIFF image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Coordinate projection failed: {0}")]
    Projection(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConversionError {
    /// Classifies the error by whether outputs may already have been written.
    ///
    /// Validation, metadata and extraction failures all happen before the first
    /// output file is created. Read, decode, encode and write failures can
    /// happen after the left image is already on disk.
    pub fn stage(&self) -> AbortStage {
        match self {
            ConversionError::InvalidArguments(_)
            | ConversionError::PathMismatch(_)
            | ConversionError::MissingFileRole
            | ConversionError::FileNotFound(..)
            | ConversionError::InvalidJsonContent(_)
            | ConversionError::MissingSpatialMetadata(_)
            | ConversionError::UnsupportedFormat(_)
            | ConversionError::Projection(_) => AbortStage::BeforeOutput,
            ConversionError::InputReadError(_)
            | ConversionError::OutputWriteError(_)
            | ConversionError::DecodeError(_)
            | ConversionError::EncodeError(_)
            | ConversionError::InvalidDimensions(..)
            | ConversionError::Json(_)
            | ConversionError::IoError(_) => AbortStage::DuringOutput,
        }
    }

    /// True for the one failure that ends a run without being treated as a crash.
    pub fn is_clean_abort(&self) -> bool {
        matches!(self, ConversionError::MissingSpatialMetadata(_))
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;

//! Validated input types

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// The three input files of a run, by role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StereoInputs {
    pub left: PathBuf,
    pub right: PathBuf,
    pub metadata: PathBuf,
}

impl StereoInputs {
    /// `<left_base>.tif`
    pub fn left_output(&self) -> PathBuf {
        self.left.with_extension("tif")
    }

    /// `<right_base>.tif`
    pub fn right_output(&self) -> PathBuf {
        self.right.with_extension("tif")
    }

    /// `<json_base>_updated.json`, keeping whatever extension the input had.
    pub fn metadata_output(&self) -> PathBuf {
        updated_sibling(&self.metadata)
    }
}

fn updated_sibling(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.file_stem().unwrap_or_default());
    name.push("_updated");
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

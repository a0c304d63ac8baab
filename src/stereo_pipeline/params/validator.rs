use std::path::{Path, PathBuf};

use tracing::debug;

use crate::stereo_pipeline::common::error::{ConversionError, FileRole, Result};
use crate::stereo_pipeline::params::types::StereoInputs;

pub const LEFT_SUFFIX: &str = "_left.bin";
pub const RIGHT_SUFFIX: &str = "_right.bin";
pub const METADATA_SUFFIX: &str = ".json";

/// Number of paths a run is made of.
const EXPECTED_ARGS: usize = 3;

/// Checks the command line paths and assigns them to their roles.
///
/// `args` are the arguments after the program name, in any order. Only the
/// first three are looked at. They must share a parent directory, carry the
/// left, right and metadata suffixes, and exist on disk. When two paths carry
/// the same suffix the later one is used.
///
/// Existence is checked left, right, then metadata, and only the first
/// missing file is reported.
pub fn check_parameters<P: AsRef<Path>>(args: &[P]) -> Result<StereoInputs> {
    if args.len() < EXPECTED_ARGS {
        return Err(ConversionError::InvalidArguments(args.len()));
    }
    let args: Vec<&Path> = args[..EXPECTED_ARGS].iter().map(|p| p.as_ref()).collect();

    let base_dir = args[0].parent();
    for path in &args[1..] {
        if path.parent() != base_dir {
            return Err(ConversionError::PathMismatch(format!(
                "{} is not in the folder of {}",
                path.display(),
                args[0].display()
            )));
        }
    }

    let (mut left, mut right, mut metadata) = (None, None, None);
    for path in &args {
        let name = path.to_string_lossy();
        if name.ends_with(LEFT_SUFFIX) {
            left = Some(*path);
        }
        if name.ends_with(RIGHT_SUFFIX) {
            right = Some(*path);
        }
        if name.ends_with(METADATA_SUFFIX) {
            metadata = Some(*path);
        }
    }
    let (Some(left), Some(right), Some(metadata)) = (left, right, metadata) else {
        return Err(ConversionError::MissingFileRole);
    };

    for (role, path) in [
        (FileRole::Left, left),
        (FileRole::Right, right),
        (FileRole::Metadata, metadata),
    ] {
        if !path.exists() {
            return Err(ConversionError::FileNotFound(role, path.display().to_string()));
        }
    }

    debug!(
        left = %left.display(),
        right = %right.display(),
        metadata = %metadata.display(),
        "Parameters accepted"
    );

    Ok(StereoInputs {
        left: PathBuf::from(left),
        right: PathBuf::from(right),
        metadata: PathBuf::from(metadata),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"").unwrap();
        path
    }

    fn stereo_set(dir: &TempDir) -> (PathBuf, PathBuf, PathBuf) {
        (
            touch(dir, "plot_left.bin"),
            touch(dir, "plot_right.bin"),
            touch(dir, "plot.json"),
        )
    }

    #[test]
    fn test_roles_independent_of_order() {
        let dir = TempDir::new().unwrap();
        let (left, right, json) = stereo_set(&dir);
        let expected = StereoInputs {
            left: left.clone(),
            right: right.clone(),
            metadata: json.clone(),
        };

        let orders = [
            [&left, &right, &json],
            [&json, &left, &right],
            [&right, &json, &left],
            [&right, &left, &json],
        ];
        for order in orders {
            assert_eq!(check_parameters(&order).unwrap(), expected);
        }
    }

    #[test]
    fn test_too_few_arguments() {
        let dir = TempDir::new().unwrap();
        let (left, right, _) = stereo_set(&dir);

        let result = check_parameters(&[left, right]);
        assert!(matches!(result.unwrap_err(), ConversionError::InvalidArguments(2)));

        let empty: [PathBuf; 0] = [];
        assert!(matches!(
            check_parameters(&empty).unwrap_err(),
            ConversionError::InvalidArguments(0)
        ));
    }

    #[test]
    fn test_path_mismatch() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let (left, right, _) = stereo_set(&dir);
        let json = touch(&other, "plot.json");

        let result = check_parameters(&[left, right, json]);
        assert!(matches!(result.unwrap_err(), ConversionError::PathMismatch(_)));
    }

    #[test]
    fn test_missing_role() {
        let dir = TempDir::new().unwrap();
        let (left, _, json) = stereo_set(&dir);
        let other = touch(&dir, "plot_center.bin");

        let result = check_parameters(&[left, other, json]);
        assert!(matches!(result.unwrap_err(), ConversionError::MissingFileRole));
    }

    #[test]
    fn test_missing_files_reported_left_first() {
        let dir = TempDir::new().unwrap();
        let left = dir.path().join("plot_left.bin");
        let right = dir.path().join("plot_right.bin");
        let json = dir.path().join("plot.json");

        let result = check_parameters(&[&json, &right, &left]);
        assert!(matches!(
            result.unwrap_err(),
            ConversionError::FileNotFound(FileRole::Left, _)
        ));

        fs::write(&left, b"").unwrap();
        let result = check_parameters(&[&json, &right, &left]);
        assert!(matches!(
            result.unwrap_err(),
            ConversionError::FileNotFound(FileRole::Right, _)
        ));

        fs::write(&right, b"").unwrap();
        let result = check_parameters(&[&json, &right, &left]);
        assert!(matches!(
            result.unwrap_err(),
            ConversionError::FileNotFound(FileRole::Metadata, _)
        ));
    }

    #[test]
    fn test_duplicate_role_leaves_another_unmatched() {
        let dir = TempDir::new().unwrap();
        let first = touch(&dir, "a_left.bin");
        let second = touch(&dir, "b_left.bin");
        let json = touch(&dir, "plot.json");

        // No right file at all, so the duplicate leaves a role empty.
        let result = check_parameters(&[&first, &second, &json]);
        assert!(matches!(result.unwrap_err(), ConversionError::MissingFileRole));

        let right = touch(&dir, "plot_right.bin");
        let result = check_parameters(&[&first, &right, &second, &json]).unwrap_err();
        // Only the first three arguments count, so the JSON file is never seen.
        assert!(matches!(result, ConversionError::MissingFileRole));
    }

    #[test]
    fn test_extra_arguments_ignored() {
        let dir = TempDir::new().unwrap();
        let (left, right, json) = stereo_set(&dir);
        let stray = dir.path().join("does_not_exist.txt");

        let inputs = check_parameters(&[&left, &right, &json, &stray]).unwrap();
        assert_eq!(inputs.metadata, json);
    }
}

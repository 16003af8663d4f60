//! CSV 读写

use super::error::ManifestError;
use super::ManifestRow;
use csv::WriterBuilder;
use log::info;
use std::fs;
use std::path::Path;

const HEADER: [&str; 2] = ["Class", "Video_Path"];

/// Writes `rows` with a header line; an empty slice gives a header-only file.
pub fn write_manifest(path: &Path, rows: &[ManifestRow]) -> Result<(), ManifestError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    // Header written by hand so it is present even without rows
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_manifest(path: &Path) -> Result<Vec<ManifestRow>, ManifestError> {
    if !path.is_file() {
        return Err(ManifestError::Missing(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize::<ManifestRow>()
        .collect::<Result<Vec<_>, _>>()?;
    info!("📖 Loaded {} rows from '{}'", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_written_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data_front.csv");
        let rows = vec![
            ManifestRow::new("a", "hand_sign_data/front/a/a_20240101_100000.mov"),
            ManifestRow::new("0", "hand_sign_data/front/0/0_20240101_100500.mov"),
        ];

        write_manifest(&path, &rows).unwrap();
        let text = fs::read_to_string(&path).unwrap();

        assert_eq!(
            text,
            "Class,Video_Path\n\
             a,hand_sign_data/front/a/a_20240101_100000.mov\n\
             0,hand_sign_data/front/0/0_20240101_100500.mov\n"
        );
        assert_eq!(read_manifest(&path).unwrap(), rows);
    }

    #[test]
    fn test_empty_manifest_has_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("data_back.csv");

        write_manifest(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Class,Video_Path\n");
        assert!(read_manifest(&path).unwrap().is_empty());
    }

    #[test]
    fn test_paths_with_commas_are_quoted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.csv");
        let rows = vec![ManifestRow::new("a", "dir, with comma/a_1.mov")];

        write_manifest(&path, &rows).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("\"dir, with comma/a_1.mov\""));
        assert_eq!(read_manifest(&path).unwrap(), rows);
    }

    #[test]
    fn test_missing_manifest() {
        let dir = tempdir().unwrap();
        let result = read_manifest(&dir.path().join("data_front.csv"));
        assert!(matches!(result, Err(ManifestError::Missing(_))));
    }
}

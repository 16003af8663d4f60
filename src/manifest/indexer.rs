use super::error::ManifestError;
use super::store::write_manifest;
use super::ManifestRow;
use log::{debug, info};
use std::path::Path;
use walkdir::WalkDir;

/// Walks `root` and returns one row per file ending in `.{extension}`.
///
/// The label is the name of the file's immediate parent directory; it is
/// not checked against the label alphabet. Entries are visited sorted by
/// file name so an unchanged tree always yields the same rows. A missing
/// root yields no rows.
pub fn collect_clip_rows(root: &Path, extension: &str) -> Result<Vec<ManifestRow>, ManifestError> {
    if !root.exists() {
        info!("📂 {} does not exist, nothing to index", root.display());
        return Ok(Vec::new());
    }

    let suffix = format!(".{}", extension);
    let mut rows = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !entry.file_name().to_string_lossy().ends_with(&suffix) {
            continue;
        }

        let path = entry.path();
        let label = path
            .parent()
            .and_then(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        debug!("Found clip {} (label '{}')", path.display(), label);
        rows.push(ManifestRow::new(label, path));
    }

    Ok(rows)
}

/// Indexes `root` and writes the manifest to `manifest_path`.
pub fn build_manifest(
    root: &Path,
    manifest_path: &Path,
    extension: &str,
) -> Result<Vec<ManifestRow>, ManifestError> {
    let rows = collect_clip_rows(root, extension)?;
    write_manifest(manifest_path, &rows)?;
    info!(
        "✅ Manifest with {} clips saved to '{}'",
        rows.len(),
        manifest_path.display()
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::read_manifest;
    use std::collections::HashSet;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::File::create(path).unwrap();
    }

    #[test]
    fn test_every_clip_gets_exactly_one_row() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("front");
        let clips: Vec<PathBuf> = vec![
            root.join("a").join("a_20240101_100000.mov"),
            root.join("a").join("a_20240101_100100.mov"),
            root.join("B").join("B_20240101_100200.mov"),
            root.join("7").join("7_20240101_100300.mov"),
        ];
        for clip in &clips {
            touch(clip);
        }
        touch(&root.join("a").join("notes.txt"));
        touch(&root.join("B").join("clip.mp4"));

        let rows = collect_clip_rows(&root, "mov").unwrap();
        assert_eq!(rows.len(), clips.len());

        let found: HashSet<PathBuf> = rows.iter().map(|r| r.clip_path.clone()).collect();
        let expected: HashSet<PathBuf> = clips.iter().cloned().collect();
        assert_eq!(found, expected);

        for row in &rows {
            assert!(row.clip_path.is_file());
            let parent = row.clip_path.parent().unwrap().file_name().unwrap();
            assert_eq!(row.label, parent.to_string_lossy());
        }
    }

    #[test]
    fn test_any_directory_name_becomes_label() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("stray folder").join("nested").join("x.mov"));

        let rows = collect_clip_rows(root, "mov").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "nested");
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a").join("upper.MOV"));
        touch(&dir.path().join("a").join("lower.mov"));

        let rows = collect_clip_rows(dir.path(), "mov").unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].clip_path.ends_with("lower.mov"));
    }

    #[test]
    fn test_empty_and_missing_roots() {
        let dir = tempdir().unwrap();
        assert!(collect_clip_rows(dir.path(), "mov").unwrap().is_empty());
        assert!(collect_clip_rows(&dir.path().join("nope"), "mov").unwrap().is_empty());
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("back");
        for label in ["c", "a", "b"] {
            for n in 0..3 {
                touch(&root.join(label).join(format!("{}_{}.mov", label, n)));
            }
        }
        let manifest = dir.path().join("data_back.csv");

        let first = build_manifest(&root, &manifest, "mov").unwrap();
        let first_bytes = fs::read(&manifest).unwrap();
        let second = build_manifest(&root, &manifest, "mov").unwrap();
        let second_bytes = fs::read(&manifest).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_bytes, second_bytes);
        assert_eq!(read_manifest(&manifest).unwrap(), first);
        assert_eq!(first.len(), 9);
    }
}

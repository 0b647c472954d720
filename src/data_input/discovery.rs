// src/data_input/discovery.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AnalysisError;

/// Which directory entries count as inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFilter<'a> {
    /// Files whose extension matches, case-insensitively (`"dat"`, `"csv"`).
    Extension(&'a str),
    /// Files whose name starts with the prefix (`"U"` for probe logs).
    Prefix(&'a str),
}

impl FileFilter<'_> {
    fn matches(&self, path: &Path) -> bool {
        match self {
            FileFilter::Extension(ext) => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext)),
            FileFilter::Prefix(prefix) => path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix)),
        }
    }
}

/// Lists matching regular files in `dir`, sorted by path.
///
/// A missing directory and a directory without matches are both reported as
/// [`AnalysisError::NoInputFiles`]; callers treat that as terminal for the run.
pub fn list_input_files(dir: &Path, filter: FileFilter) -> Result<Vec<PathBuf>, AnalysisError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AnalysisError::NoInputFiles {
                dir: dir.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && filter.matches(&path) {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(AnalysisError::NoInputFiles {
            dir: dir.to_path_buf(),
        });
    }

    files.sort();
    log::info!("Found {} input file(s) in '{}'", files.len(), dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "cfd_postproc_discovery_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_extension_and_prefix_filters() {
        let dir = scratch_dir("filters");
        for name in ["b.dat", "a.DAT", "notes.txt", "U1", "U2", "p"] {
            fs::write(dir.join(name), "").unwrap();
        }

        let dat = list_input_files(&dir, FileFilter::Extension("dat")).unwrap();
        let names: Vec<_> = dat
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.DAT", "b.dat"]);

        let probes = list_input_files(&dir, FileFilter::Prefix("U")).unwrap();
        assert_eq!(probes.len(), 2);
    }

    #[test]
    fn test_empty_directory_is_no_input_files() {
        let dir = scratch_dir("empty");
        assert!(matches!(
            list_input_files(&dir, FileFilter::Extension("dat")),
            Err(AnalysisError::NoInputFiles { .. })
        ));
    }

    #[test]
    fn test_missing_directory_is_no_input_files() {
        let dir = std::env::temp_dir().join("cfd_postproc_definitely_missing_dir");
        assert!(matches!(
            list_input_files(&dir, FileFilter::Prefix("U")),
            Err(AnalysisError::NoInputFiles { .. })
        ));
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::error::{BalanceError, Result};

/// One class folder of a classification dataset and the image files it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDirectory {
    /// Folder name, used as the class label
    pub name: String,
    /// Full path to the folder
    pub path: PathBuf,
    /// File names inside the folder, sorted
    pub files: Vec<String>,
}

impl ClassDirectory {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, mut files: Vec<String>) -> Self {
        files.sort();
        Self {
            name: name.into(),
            path: path.into(),
            files,
        }
    }

    /// Current number of image files
    pub fn count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Full path of a file inside this class folder
    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }
}

/// Check a path against an extension allow-list (case-insensitive).
/// An empty list accepts everything.
pub fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }

    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            extensions
                .iter()
                .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext))
        }
        None => false,
    }
}

/// List the image files directly inside a class folder.
///
/// Only regular files count; nested folders are ignored. File names that
/// are not valid UTF-8 are skipped with a warning.
pub fn list_class_files(dir: &Path, extensions: &[String]) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| BalanceError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BalanceError::io(dir, e))?;
        let path = entry.path();

        if !path.is_file() || !matches_extension(&path, extensions) {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => files.push(name),
            Err(name) => warn!("Skipping file with non UTF-8 name: {:?}", name),
        }
    }

    files.sort();
    Ok(files)
}

/// Scan the parent dataset folder for class folders.
///
/// Entries that are not directories are skipped silently. Classes come back
/// sorted by name so seeded runs are reproducible.
pub fn scan_class_directories(parent: &Path, extensions: &[String]) -> Result<Vec<ClassDirectory>> {
    if !parent.exists() {
        return Err(BalanceError::ParentNotFound(parent.to_path_buf()));
    }
    if !parent.is_dir() {
        return Err(BalanceError::NotADirectory(parent.to_path_buf()));
    }

    info!("Scanning class folders in: {:?}", parent);

    let entries = fs::read_dir(parent).map_err(|e| BalanceError::io(parent, e))?;

    let mut classes = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BalanceError::io(parent, e))?;
        let path = entry.path();

        if !path.is_dir() {
            debug!("Skipping non-directory entry {:?}", path);
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        let files = list_class_files(&path, extensions)?;
        debug!("Class '{}' has {} images", name, files.len());
        classes.push(ClassDirectory::new(name, path, files));
    }

    classes.sort_by(|a, b| a.name.cmp(&b.name));
    info!("Found {} class folders in {:?}", classes.len(), parent);

    Ok(classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_matches_extension() {
        let exts = vec!["png".to_string(), ".JPG".to_string()];
        assert!(matches_extension(Path::new("a.png"), &exts));
        assert!(matches_extension(Path::new("a.PNG"), &exts));
        assert!(matches_extension(Path::new("a.jpg"), &exts));
        assert!(!matches_extension(Path::new("a.txt"), &exts));
        assert!(!matches_extension(Path::new("README"), &exts));
        assert!(matches_extension(Path::new("README"), &[]));
    }

    #[test]
    fn test_scan_skips_loose_files() {
        let temp_dir = TempDir::new().unwrap();
        let cat = temp_dir.path().join("cat");
        let dog = temp_dir.path().join("dog");
        fs::create_dir(&cat).unwrap();
        fs::create_dir(&dog).unwrap();
        touch(&cat.join("1.png"));
        touch(&dog.join("1.png"));
        touch(&dog.join("2.png"));
        touch(&temp_dir.path().join("notes.txt"));

        let classes = scan_class_directories(temp_dir.path(), &[]).unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].name, "cat");
        assert_eq!(classes[0].count(), 1);
        assert_eq!(classes[1].name, "dog");
        assert_eq!(classes[1].files, vec!["1.png", "2.png"]);
    }

    #[test]
    fn test_nested_folders_are_not_images() {
        let temp_dir = TempDir::new().unwrap();
        let cat = temp_dir.path().join("cat");
        fs::create_dir_all(cat.join("nested")).unwrap();
        touch(&cat.join("a.png"));

        let files = list_class_files(&cat, &[]).unwrap();
        assert_eq!(files, vec!["a.png"]);
    }

    #[test]
    fn test_extension_filter_applies_to_class_files() {
        let temp_dir = TempDir::new().unwrap();
        let cat = temp_dir.path().join("cat");
        fs::create_dir(&cat).unwrap();
        touch(&cat.join("a.png"));
        touch(&cat.join("b.jpeg"));
        touch(&cat.join("labels.csv"));

        let exts = vec!["png".to_string(), "jpeg".to_string()];
        let classes = scan_class_directories(temp_dir.path(), &exts).unwrap();
        assert_eq!(classes[0].files, vec!["a.png", "b.jpeg"]);
    }

    #[test]
    fn test_missing_parent() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let result = scan_class_directories(&missing, &[]);
        assert!(matches!(result, Err(BalanceError::ParentNotFound(_))));
    }

    #[test]
    fn test_parent_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        touch(&file);
        let result = scan_class_directories(&file, &[]);
        assert!(matches!(result, Err(BalanceError::NotADirectory(_))));
    }

    #[test]
    fn test_file_path_joins_class_folder() {
        let class = ClassDirectory::new("cat", "/data/cat", vec!["b.png".into(), "a.png".into()]);
        assert_eq!(class.files, vec!["a.png", "b.png"]);
        assert_eq!(class.file_path("a.png"), PathBuf::from("/data/cat/a.png"));
    }
}

// ABOUTME: Image file discovery with optional recursion and an early-stop cap
// ABOUTME: Iterative explicit-stack traversal in lexicographic order for stable results

use crate::error::GridError;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions treated as images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryOptions {
    pub recursive: bool,
    pub max_count: Option<usize>,
}

impl DiscoveryOptions {
    pub fn new(recursive: bool, max_count: Option<usize>) -> Self {
        Self {
            recursive,
            max_count,
        }
    }
}

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Collect image paths under `root` in discovery order.
///
/// Only `root` itself is fatal: a missing or unreadable root yields
/// [`GridError::Directory`]. Unreadable subdirectories found while recursing
/// are logged and skipped. Symlinked directories are never descended.
pub fn discover(root: &Path, options: DiscoveryOptions) -> Result<Vec<PathBuf>, GridError> {
    let mut found = Vec::new();

    if options.max_count == Some(0) {
        // Still validate the root so a bad path is reported.
        read_sorted(root).map_err(|e| GridError::directory(root, e))?;
        return Ok(found);
    }

    let mut stack = vec![root.to_path_buf()];
    let mut is_root = true;

    while let Some(dir) = stack.pop() {
        let entries = match read_sorted(&dir) {
            Ok(entries) => entries,
            Err(e) if is_root => return Err(GridError::directory(&dir, e)),
            Err(e) => {
                log::warn!("Skipping unreadable directory {}: {}", dir.display(), e);
                continue;
            }
        };
        is_root = false;

        let mut subdirs = Vec::new();
        for entry in entries {
            match entry.kind {
                EntryKind::File if is_image_path(&entry.path) => {
                    log::debug!("Discovered {}", entry.path.display());
                    found.push(entry.path);
                    if options.max_count.is_some_and(|cap| found.len() >= cap) {
                        log::debug!("Reached image cap of {}", found.len());
                        return Ok(found);
                    }
                }
                EntryKind::Dir if options.recursive => subdirs.push(entry.path),
                _ => {}
            }
        }

        // Reverse so the lexicographically first subdirectory is popped next.
        stack.extend(subdirs.into_iter().rev());
    }

    Ok(found)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Dir,
    Other,
}

struct Entry {
    path: PathBuf,
    kind: EntryKind,
}

fn read_sorted(dir: &Path) -> std::io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if let Some(kind) = classify(&path, entry.file_type()) {
            entries.push(Entry { path, kind });
        }
    }

    entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(entries)
}

/// Kind of a directory entry, or `None` when its type cannot be read.
fn classify(path: &Path, file_type: std::io::Result<fs::FileType>) -> Option<EntryKind> {
    let file_type = match file_type {
        Ok(file_type) => file_type,
        Err(e) => {
            log::warn!("Skipping {}: {}", path.display(), e);
            return None;
        }
    };

    let kind = if file_type.is_dir() {
        EntryKind::Dir
    } else if file_type.is_file() {
        EntryKind::File
    } else if file_type.is_symlink() {
        // Follow links to files; linked directories are left alone.
        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => EntryKind::File,
            _ => EntryKind::Other,
        }
    } else {
        EntryKind::Other
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).expect("Should create file");
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("a.png")));
        assert!(is_image_path(Path::new("dir/B.JPG")));
        assert!(is_image_path(Path::new("photo.Jpeg")));
        assert!(is_image_path(Path::new("scan.tiff")));
        assert!(!is_image_path(Path::new("notes.txt")));
        assert!(!is_image_path(Path::new("png")));
        assert!(!is_image_path(Path::new("archive.png.gz")));
    }

    #[test]
    fn test_filters_and_sorts_direct_children() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "c.png");
        touch(temp.path(), "a.jpg");
        touch(temp.path(), "readme.md");
        touch(temp.path(), "b.GIF");
        fs::create_dir(temp.path().join("nested.png")).unwrap();

        let found = discover(temp.path(), DiscoveryOptions::default()).unwrap();
        assert_eq!(names(&found), vec!["a.jpg", "b.GIF", "c.png"]);
    }

    #[test]
    fn test_recursive_order_files_before_subdirs() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "z.png");
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::create_dir(&a).unwrap();
        fs::create_dir(&b).unwrap();
        touch(&a, "a1.png");
        touch(&b, "b1.png");
        let deep = a.join("deep");
        fs::create_dir(&deep).unwrap();
        touch(&deep, "d1.png");

        let flat = discover(temp.path(), DiscoveryOptions::new(false, None)).unwrap();
        assert_eq!(names(&flat), vec!["z.png"]);

        let all = discover(temp.path(), DiscoveryOptions::new(true, None)).unwrap();
        assert_eq!(names(&all), vec!["z.png", "a1.png", "d1.png", "b1.png"]);
    }

    #[test]
    fn test_cap_stops_early() {
        let temp = TempDir::new().unwrap();
        for i in 0..5 {
            touch(temp.path(), &format!("image{}.png", i));
        }

        let found = discover(temp.path(), DiscoveryOptions::new(false, Some(2))).unwrap();
        assert_eq!(names(&found), vec!["image0.png", "image1.png"]);

        let found = discover(temp.path(), DiscoveryOptions::new(false, Some(50))).unwrap();
        assert_eq!(found.len(), 5);

        let found = discover(temp.path(), DiscoveryOptions::new(false, Some(0))).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_missing_root_is_directory_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does-not-exist");

        let err = discover(&missing, DiscoveryOptions::default()).unwrap_err();
        assert!(matches!(err, GridError::Directory { .. }));
        assert!(err.to_string().starts_with("Error discovering images"));

        let err = discover(&missing, DiscoveryOptions::new(false, Some(0))).unwrap_err();
        assert!(matches!(err, GridError::Directory { .. }));
    }

    #[test]
    fn test_file_as_root_is_directory_error() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "single.png");

        let err = discover(&temp.path().join("single.png"), DiscoveryOptions::default());
        assert!(matches!(err, Err(GridError::Directory { .. })));
    }

    #[test]
    fn test_empty_directory_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let found = discover(temp.path(), DiscoveryOptions::new(true, None)).unwrap();
        assert!(found.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_not_descended() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real");
        fs::create_dir(&real).unwrap();
        touch(&real, "r.png");
        std::os::unix::fs::symlink(&real, temp.path().join("link")).unwrap();
        std::os::unix::fs::symlink(real.join("r.png"), temp.path().join("alias.png")).unwrap();

        let found = discover(temp.path(), DiscoveryOptions::new(true, None)).unwrap();
        assert_eq!(names(&found), vec!["alias.png", "r.png"]);
    }

    #[test]
    fn test_entry_with_unreadable_type_is_skipped() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.png");
        let file = temp.path().join("a.png");

        let gone = Err(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(classify(&file, gone), None);

        let file_type = fs::symlink_metadata(&file).map(|meta| meta.file_type());
        assert_eq!(classify(&file, file_type), Some(EntryKind::File));
        let dir_type = fs::symlink_metadata(temp.path()).map(|meta| meta.file_type());
        assert_eq!(classify(temp.path(), dir_type), Some(EntryKind::Dir));
    }

    #[cfg(unix)]
    fn set_mode(path: &Path, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "top.png");
        let locked = temp.path().join("locked");
        let open = temp.path().join("open");
        fs::create_dir(&locked).unwrap();
        fs::create_dir(&open).unwrap();
        touch(&locked, "hidden.png");
        touch(&open, "visible.png");

        set_mode(&locked, 0o000);
        if fs::read_dir(&locked).is_ok() {
            // Permission bits are not enforced (running as root).
            set_mode(&locked, 0o755);
            return;
        }

        let result = discover(temp.path(), DiscoveryOptions::new(true, None));
        set_mode(&locked, 0o755);

        let found = result.unwrap();
        assert_eq!(names(&found), vec!["top.png", "visible.png"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_root_is_directory_error() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        fs::create_dir(&root).unwrap();
        touch(&root, "a.png");

        set_mode(&root, 0o000);
        if fs::read_dir(&root).is_ok() {
            set_mode(&root, 0o755);
            return;
        }

        let result = discover(&root, DiscoveryOptions::new(true, None));
        set_mode(&root, 0o755);

        let err = result.unwrap_err();
        assert!(matches!(err, GridError::Directory { .. }));
        assert!(err.is_fatal());
        assert_eq!(
            err.help_text(),
            Some("Check that the directory is readable and traversable")
        );
    }
}

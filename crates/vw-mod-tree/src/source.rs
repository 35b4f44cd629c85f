use std::fs;
use std::io;
use std::path::Path;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntryInfo {
    pub fn file(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_dir: false }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_dir: true }
    }
}

/// Directory listing primitive used by the tree builder.
///
/// The builder shows entries in exactly the order returned here.
pub trait DirSource {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>>;
}

impl<T: DirSource + ?Sized> DirSource for &T {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        (**self).read_dir(path)
    }
}

/// Real filesystem, entries sorted by file name.
///
/// Symlinks are listed as files; the walk never follows them.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsDirSource;

impl DirSource for OsDirSource {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let entries = fs::read_dir(path)?.map(|entry| {
            entry.map(|e| {
                let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
                DirEntryInfo { name: e.file_name().to_string_lossy().to_string(), is_dir }
            })
        });
        Ok(sorted_entries(entries))
    }
}

/// Entries that could not be read are skipped; the rest keep the listing.
fn sorted_entries(entries: impl Iterator<Item = io::Result<DirEntryInfo>>) -> Vec<DirEntryInfo> {
    let mut entries: Vec<DirEntryInfo> = entries.flatten().collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn os_listing_is_sorted_and_typed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();

        let entries = OsDirSource.read_dir(dir.path()).unwrap();
        assert_eq!(entries, vec![DirEntryInfo::file("a.txt"), DirEntryInfo::file("b.txt"), DirEntryInfo::dir("c")]);
    }

    #[test]
    fn unreadable_entry_is_skipped() {
        let listing = vec![
            Ok(DirEntryInfo::file("b.go")),
            Err(io::Error::from(io::ErrorKind::PermissionDenied)),
            Ok(DirEntryInfo::dir("a")),
        ];
        assert_eq!(sorted_entries(listing.into_iter()), vec![DirEntryInfo::dir("a"), DirEntryInfo::file("b.go")]);
    }

    #[test]
    fn missing_directory_errors() {
        let dir = TempDir::new().unwrap();
        assert!(OsDirSource.read_dir(&dir.path().join("nope")).is_err());
    }
}

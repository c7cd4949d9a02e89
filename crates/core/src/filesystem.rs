use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// One entry returned by [`Filesystem::list_directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    /// Last modification time, when the platform reports one.
    pub modified: Option<DateTime<Utc>>,
    /// True for directories, including symlinks that resolve to one.
    pub is_dir: bool,
}

/// The filesystem operations the photo store consumes.
///
/// All paths are relative to whatever root the implementation was built with.
pub trait Filesystem {
    /// Enumerate the direct children of `dir`. Fails with [`Error::NotFound`] if `dir` is absent.
    fn list_directory(&self, dir: &Path) -> Result<Vec<FileInfo>>;

    fn create_directory(&self, dir: &Path) -> Result<()>;

    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write `bytes` to `path`, replacing any existing file.
    fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<()>;

    fn delete_file(&self, path: &Path) -> Result<()>;
}

/// [`Filesystem`] backed by the local disk under a fixed root.
#[derive(Debug, Clone)]
pub struct LocalFilesystem {
    root: PathBuf,
}

impl LocalFilesystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Filesystem for LocalFilesystem {
    fn list_directory(&self, dir: &Path) -> Result<Vec<FileInfo>> {
        let full = self.resolve(dir);
        let meta = fs::metadata(&full)
            .map_err(|e| Error::io(&full, e, |path, source| Error::List { path, source }))?;
        if !meta.is_dir() {
            return Err(Error::List {
                path: full,
                source: std::io::Error::other("not a directory"),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&full).min_depth(1).max_depth(1) {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str() else {
                tracing::warn!(path = %entry.path().display(), "skipping entry with non UTF-8 name");
                continue;
            };

            // Follows symlinks so a link to a directory reports as one.
            let meta = match fs::metadata(entry.path()) {
                Ok(meta) => meta,
                Err(err) => {
                    tracing::warn!(path = %entry.path().display(), %err, "skipping unreadable entry");
                    continue;
                }
            };
            files.push(FileInfo {
                name: name.to_string(),
                size: meta.len(),
                modified: meta.modified().ok().map(DateTime::<Utc>::from),
                is_dir: meta.is_dir(),
            });
        }
        Ok(files)
    }

    fn create_directory(&self, dir: &Path) -> Result<()> {
        let full = self.resolve(dir);
        fs::create_dir_all(&full).map_err(|source| Error::CreateDirectory { path: full, source })
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let full = self.resolve(path);
        fs::read(&full).map_err(|e| Error::io(&full, e, |path, source| Error::Read { path, source }))
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&full, bytes).map_err(|source| Error::Write { path: full, source })
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        let full = self.resolve(path);
        fs::remove_file(&full)
            .map_err(|e| Error::io(&full, e, |path, source| Error::Delete { path, source }))
    }
}

use std::path::Path;

use crate::config::StoreConfig;
use crate::domain::{photo_name, photo_path, LoadProgress, StoredPhoto};
use crate::error::{Error, Result};
use crate::filesystem::{Filesystem, LocalFilesystem};

/// Photos stored as individual files in one directory.
///
/// The directory listing is the only index. `photos` caches the result of
/// the last successful [`list_all`](Self::list_all) and is reloaded in full
/// after every save and delete.
pub struct PhotoStore<F = LocalFilesystem> {
    fs: F,
    image_dir: String,
    photos: Vec<StoredPhoto>,
    loading: bool,
}

impl PhotoStore<LocalFilesystem> {
    /// Open a store on local disk using the configured root and image directory.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let root = config.storage_root.resolve()?;
        tracing::debug!(root = %root.display(), dir = %config.image_dir, "opening photo store");
        Ok(Self::new(LocalFilesystem::new(root), config.image_dir.clone()))
    }
}

impl<F: Filesystem> PhotoStore<F> {
    pub fn new(fs: F, image_dir: impl Into<String>) -> Self {
        Self {
            fs,
            image_dir: image_dir.into(),
            photos: Vec::new(),
            loading: false,
        }
    }

    pub fn image_dir(&self) -> &str {
        &self.image_dir
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    /// Photos from the last successful load. No I/O.
    pub fn photos(&self) -> &[StoredPhoto] {
        &self.photos
    }

    /// Advisory flag for presentation layers; true only while a reload runs.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Look up a cached photo by filename.
    pub fn find(&self, name: &str) -> Option<&StoredPhoto> {
        self.photos.iter().find(|p| p.name == name)
    }

    /// Reload every photo in the directory.
    pub fn list_all(&mut self) -> Result<&[StoredPhoto]> {
        self.list_all_with_progress(None)
    }

    /// Reload every photo in the directory, reporting progress to `progress_cb`.
    ///
    /// A missing directory is created and yields an empty listing. Any other
    /// failure leaves the previous listing in place.
    pub fn list_all_with_progress(
        &mut self,
        progress_cb: Option<&mut dyn FnMut(LoadProgress)>,
    ) -> Result<&[StoredPhoto]> {
        self.loading = true;
        let loaded = self.load(progress_cb);
        self.loading = false;

        self.photos = loaded?;
        Ok(&self.photos)
    }

    fn load(
        &self,
        mut progress_cb: Option<&mut dyn FnMut(LoadProgress)>,
    ) -> Result<Vec<StoredPhoto>> {
        let dir = Path::new(&self.image_dir);

        let entries = match self.fs.list_directory(dir) {
            Ok(entries) => entries,
            Err(err) if err.is_not_found() => {
                tracing::warn!(dir = %self.image_dir, "image directory missing, creating it");
                self.fs.create_directory(dir)?;
                if let Some(ref mut cb) = progress_cb {
                    cb(LoadProgress::Start { total: 0 });
                    cb(LoadProgress::Complete { count: 0 });
                }
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };

        let files: Vec<_> = entries.into_iter().filter(|e| !e.is_dir).collect();

        if let Some(ref mut cb) = progress_cb {
            cb(LoadProgress::Start { total: files.len() });
        }

        let mut photos = Vec::with_capacity(files.len());
        for file in &files {
            let path = photo_path(&self.image_dir, &file.name);
            let bytes = self.fs.read_file(Path::new(&path))?;
            tracing::debug!(name = %file.name, size = bytes.len(), "loaded photo");
            photos.push(StoredPhoto::new(&self.image_dir, &file.name, &bytes));

            if let Some(ref mut cb) = progress_cb {
                cb(LoadProgress::Loaded {
                    name: file.name.clone(),
                });
            }
        }

        if let Some(ref mut cb) = progress_cb {
            cb(LoadProgress::Complete {
                count: photos.len(),
            });
        }

        Ok(photos)
    }

    /// Write `bytes` as `<now-millis>.jpeg` and reload. Returns the new filename.
    pub fn save(&mut self, bytes: &[u8]) -> Result<String> {
        self.save_at(bytes, chrono::Utc::now().timestamp_millis())
    }

    /// Write `bytes` as `<millis>.jpeg` and reload.
    ///
    /// An existing file with the same name is overwritten.
    pub fn save_at(&mut self, bytes: &[u8], millis: i64) -> Result<String> {
        let name = photo_name(millis);
        let path = photo_path(&self.image_dir, &name);
        self.fs.write_file(Path::new(&path), bytes)?;
        tracing::info!(%path, size = bytes.len(), "saved photo");

        self.list_all()?;
        Ok(name)
    }

    /// Remove the file behind `photo` and reload.
    ///
    /// Fails with [`Error::NotFound`] when the file is already gone; the
    /// cached listing is untouched on failure.
    pub fn delete(&mut self, photo: &StoredPhoto) -> Result<()> {
        self.fs.delete_file(Path::new(&photo.path))?;
        tracing::info!(path = %photo.path, "deleted photo");

        self.list_all()?;
        Ok(())
    }

    /// Delete the cached photo called `name`.
    pub fn delete_by_name(&mut self, name: &str) -> Result<()> {
        let photo = self
            .find(name)
            .cloned()
            .ok_or_else(|| Error::PhotoNotFound(name.to_string()))?;
        self.delete(&photo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;

    use crate::codec;
    use crate::filesystem::FileInfo;

    const DIR: &str = "stored-images";

    fn local_store(root: &Path) -> PhotoStore {
        PhotoStore::new(LocalFilesystem::new(root), DIR)
    }

    /// Local filesystem whose reads or deletes can be made to fail on demand.
    struct FlakyFs {
        inner: LocalFilesystem,
        fail_reads: Cell<bool>,
        fail_deletes: Cell<bool>,
    }

    impl FlakyFs {
        fn new(root: &Path) -> Self {
            Self {
                inner: LocalFilesystem::new(root),
                fail_reads: Cell::new(false),
                fail_deletes: Cell::new(false),
            }
        }
    }

    impl Filesystem for FlakyFs {
        fn list_directory(&self, dir: &Path) -> Result<Vec<FileInfo>> {
            self.inner.list_directory(dir)
        }

        fn create_directory(&self, dir: &Path) -> Result<()> {
            self.inner.create_directory(dir)
        }

        fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
            if self.fail_reads.get() {
                return Err(Error::Read {
                    path: path.to_path_buf(),
                    source: std::io::Error::other("injected"),
                });
            }
            self.inner.read_file(path)
        }

        fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<()> {
            self.inner.write_file(path, bytes)
        }

        fn delete_file(&self, path: &Path) -> Result<()> {
            if self.fail_deletes.get() {
                return Err(Error::Delete {
                    path: path.to_path_buf(),
                    source: std::io::Error::other("injected"),
                });
            }
            self.inner.delete_file(path)
        }
    }

    // ── list_all ────────────────────────────────────────────────

    #[test]
    fn test_list_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = local_store(tmp.path());

        assert!(store.list_all().unwrap().is_empty());
        assert!(tmp.path().join(DIR).is_dir());
        assert!(!store.is_loading());
    }

    #[test]
    fn test_list_propagates_non_missing_errors() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(DIR), b"a file where the directory should be").unwrap();
        let mut store = local_store(tmp.path());

        let err = store.list_all().unwrap_err();
        assert!(matches!(err, Error::List { .. }));
    }

    #[test]
    fn test_list_labels_everything_jpeg() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("notes.txt"), b"plain text").unwrap();

        let mut store = local_store(tmp.path());
        let photos = store.list_all().unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].name, "notes.txt");
        assert_eq!(photos[0].data, codec::jpeg_data_uri(b"plain text"));
    }

    #[test]
    fn test_list_skips_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(DIR);
        fs::create_dir_all(dir.join("thumbs")).unwrap();
        fs::write(dir.join("1.jpeg"), b"one").unwrap();

        let mut store = local_store(tmp.path());
        let names: Vec<&str> = store
            .list_all()
            .unwrap()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["1.jpeg"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_does_not_break_listing_or_save() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("1.jpeg"), b"one").unwrap();
        fs::write(dir.join(OsStr::from_bytes(b"bad\xff.jpeg")), b"unlisted").unwrap();

        let mut store = local_store(tmp.path());
        assert_eq!(store.list_all().unwrap().len(), 1);

        let name = store.save_at(b"two", 2).unwrap();
        assert_eq!(name, "2.jpeg");
        assert_eq!(store.photos().len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_skips_symlinked_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::create_dir_all(tmp.path().join("other")).unwrap();
        fs::write(dir.join("1.jpeg"), b"one").unwrap();
        std::os::unix::fs::symlink(tmp.path().join("other"), dir.join("linked")).unwrap();

        let mut store = local_store(tmp.path());
        let names: Vec<&str> = store
            .list_all()
            .unwrap()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["1.jpeg"]);
    }

    #[test]
    fn test_list_progress_events() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = local_store(tmp.path());
        store.save_at(b"a", 1).unwrap();
        store.save_at(b"b", 2).unwrap();

        let mut events = Vec::new();
        store
            .list_all_with_progress(Some(&mut |p| events.push(p)))
            .unwrap();

        assert_eq!(events.first(), Some(&LoadProgress::Start { total: 2 }));
        assert_eq!(events.last(), Some(&LoadProgress::Complete { count: 2 }));
        let loaded = events
            .iter()
            .filter(|e| matches!(e, LoadProgress::Loaded { .. }))
            .count();
        assert_eq!(loaded, 2);
    }

    #[test]
    fn test_list_progress_on_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = local_store(tmp.path());

        let mut events = Vec::new();
        store
            .list_all_with_progress(Some(&mut |p| events.push(p)))
            .unwrap();
        assert_eq!(
            events,
            vec![
                LoadProgress::Start { total: 0 },
                LoadProgress::Complete { count: 0 }
            ]
        );
    }

    #[test]
    fn test_failed_reload_keeps_previous_listing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = PhotoStore::new(FlakyFs::new(tmp.path()), DIR);
        store.save_at(b"kept", 10).unwrap();
        assert_eq!(store.photos().len(), 1);

        store.filesystem().fail_reads.set(true);
        assert!(store.list_all().is_err());
        assert!(!store.is_loading());
        assert_eq!(store.photos().len(), 1);
        assert_eq!(store.photos()[0].name, "10.jpeg");
    }

    // ── save ────────────────────────────────────────────────────

    #[test]
    fn test_save_names_by_timestamp_and_refreshes() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = local_store(tmp.path());

        let name = store.save_at(b"\xFF\xD8jpeg", 1718444400123).unwrap();
        assert_eq!(name, "1718444400123.jpeg");
        assert!(tmp.path().join(DIR).join(&name).exists());

        let photo = store.find(&name).unwrap();
        assert_eq!(photo.path, format!("{DIR}/{name}"));
        assert_eq!(photo.decode().unwrap(), b"\xFF\xD8jpeg");
    }

    #[test]
    fn test_save_before_any_list_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = local_store(tmp.path());
        store.save_at(b"x", 1).unwrap();
        assert_eq!(store.photos().len(), 1);
    }

    #[test]
    fn test_save_uses_current_time() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = local_store(tmp.path());

        let before = chrono::Utc::now().timestamp_millis();
        let name = store.save(b"now").unwrap();
        let after = chrono::Utc::now().timestamp_millis();

        let at = store.find(&name).unwrap().captured_at().unwrap();
        assert!((before..=after).contains(&at.timestamp_millis()));
    }

    #[test]
    fn test_same_millisecond_saves_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = local_store(tmp.path());

        store.save_at(b"first", 77).unwrap();
        store.save_at(b"second", 77).unwrap();

        assert_eq!(store.photos().len(), 1);
        assert_eq!(store.photos()[0].decode().unwrap(), b"second");
    }

    // ── delete ──────────────────────────────────────────────────

    #[test]
    fn test_delete_removes_and_refreshes() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = local_store(tmp.path());
        store.save_at(b"a", 1).unwrap();
        store.save_at(b"b", 2).unwrap();

        let victim = store.find("1.jpeg").cloned().unwrap();
        store.delete(&victim).unwrap();

        assert!(store.find("1.jpeg").is_none());
        assert!(store.find("2.jpeg").is_some());
        assert!(!tmp.path().join(DIR).join("1.jpeg").exists());
    }

    #[test]
    fn test_delete_missing_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = local_store(tmp.path());
        store.save_at(b"a", 1).unwrap();

        let photo = store.find("1.jpeg").cloned().unwrap();
        fs::remove_file(tmp.path().join(DIR).join("1.jpeg")).unwrap();

        let err = store.delete(&photo).unwrap_err();
        assert!(err.is_not_found());
        // Cache is not optimistically patched.
        assert!(store.find("1.jpeg").is_some());
    }

    #[test]
    fn test_failed_delete_keeps_listing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = PhotoStore::new(FlakyFs::new(tmp.path()), DIR);
        store.save_at(b"a", 1).unwrap();

        store.filesystem().fail_deletes.set(true);
        let err = store.delete_by_name("1.jpeg").unwrap_err();
        assert!(matches!(err, Error::Delete { .. }));
        assert_eq!(store.photos().len(), 1);
        assert!(tmp.path().join(DIR).join("1.jpeg").exists());
    }

    #[test]
    fn test_delete_by_unknown_name() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = local_store(tmp.path());
        store.list_all().unwrap();

        let err = store.delete_by_name("missing.jpeg").unwrap_err();
        assert!(matches!(err, Error::PhotoNotFound(ref n) if n == "missing.jpeg"));
    }
}

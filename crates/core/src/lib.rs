pub mod capture;
pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod filesystem;
pub mod store;

pub use capture::{Camera, CaptureOptions, FileCamera, Platform, PhotoReference};
pub use config::{StorageRoot, StoreConfig};
pub use domain::{LoadProgress, StoredPhoto};
pub use error::{Error, Result};
pub use filesystem::{FileInfo, Filesystem, LocalFilesystem};
pub use store::PhotoStore;

/// Capture a photo, resolve it to bytes, and save it into `store`.
///
/// Returns the stored filename. The store's listing is refreshed as part of
/// the save.
pub fn capture_and_save<F: Filesystem>(
    store: &mut PhotoStore<F>,
    camera: &mut dyn Camera,
    options: &CaptureOptions,
    platform: Platform,
) -> Result<String> {
    let reference = camera.capture(options)?;
    let bytes = capture::read_as_bytes(&reference, platform)?;
    store.save(&bytes)
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::codec;
use crate::error::Result;

/// Extension given to every saved photo.
pub const PHOTO_EXTENSION: &str = "jpeg";

/// A stored image file plus its loaded content.
///
/// `data` is always a JPEG data URI, whatever the file actually contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredPhoto {
    /// Filename, `<epoch-millis>.jpeg` for anything written by the store.
    pub name: String,
    /// `<image_dir>/<name>`, relative to the storage root.
    pub path: String,
    /// `data:image/jpeg;base64,...`
    pub data: String,
}

impl StoredPhoto {
    pub fn new(image_dir: &str, name: &str, bytes: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            path: photo_path(image_dir, name),
            data: codec::jpeg_data_uri(bytes),
        }
    }

    /// Decode `data` back into the raw file bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        codec::parse_data_uri(&self.data).map(|(_, bytes)| bytes)
    }

    /// Size of the file behind `data`, read off the base64 length.
    pub fn byte_len(&self) -> Result<usize> {
        let (_, payload) = codec::split_data_uri(&self.data)?;
        Ok(codec::base64_decoded_len(payload))
    }

    /// Capture time recovered from the filename, if it follows the `<millis>.jpeg` scheme.
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        let stem = self.name.strip_suffix(&format!(".{PHOTO_EXTENSION}"))?;
        let millis: i64 = stem.parse().ok()?;
        DateTime::from_timestamp_millis(millis)
    }
}

/// Filename for a photo saved at `millis` since the Unix epoch.
pub fn photo_name(millis: i64) -> String {
    format!("{millis}.{PHOTO_EXTENSION}")
}

pub fn photo_path(image_dir: &str, name: &str) -> String {
    format!("{image_dir}/{name}")
}

/// Progress events emitted while the store reloads its listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadProgress {
    /// Directory enumerated; `total` files will be read.
    Start { total: usize },
    /// One file read and encoded.
    Loaded { name: String },
    /// Listing replaced.
    Complete { count: usize },
}

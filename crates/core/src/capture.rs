//! Camera abstraction and photo-reference resolution.
//!
//! A camera hands back a [`PhotoReference`]: a native file path, a web-style
//! reference, or both. [`read_as_bytes`] turns it into the raw bytes the
//! store saves, reading the file directly on hybrid platforms and fetching
//! the web reference otherwise.

use std::fs;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tempfile::TempDir;

use crate::codec;
use crate::error::{Error, Result};

/// What form the camera should return the photo in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultType {
    /// A file the caller reads back.
    #[default]
    Uri,
    Base64,
    DataUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraSource {
    /// Let the user choose between camera and library.
    Prompt,
    #[default]
    Camera,
    /// Pick from the photo library.
    Photos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOptions {
    /// JPEG quality, 0-100.
    pub quality: u8,
    pub allow_editing: bool,
    pub result_type: ResultType,
    pub source: CameraSource,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            quality: 90,
            allow_editing: false,
            result_type: ResultType::Uri,
            source: CameraSource::Camera,
        }
    }
}

/// A captured photo as returned by a [`Camera`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoReference {
    /// Native filesystem path, when the platform exposes one.
    pub path: Option<PathBuf>,
    /// `file://`, `data:` or `http(s)://` reference.
    pub web_path: Option<String>,
    pub format: String,
}

/// Which half of a [`PhotoReference`] to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Native shell: read `path` directly.
    Hybrid,
    /// Browser-like: fetch `web_path`.
    Web,
}

pub trait Camera {
    fn capture(&mut self, options: &CaptureOptions) -> Result<PhotoReference>;
}

/// Camera that "captures" an existing image file.
///
/// The file is decoded and re-encoded as JPEG at the requested quality, so
/// everything it produces matches the store's JPEG assumption.
pub struct FileCamera {
    source: PathBuf,
    cache_dir: PathBuf,
    /// Owns `cache_dir` when it is scratch space; removed on drop.
    _scratch: Option<TempDir>,
}

impl FileCamera {
    /// `cache_dir` receives the re-encoded JPEG for [`ResultType::Uri`] captures.
    pub fn new(source: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            cache_dir: cache_dir.into(),
            _scratch: None,
        }
    }

    /// Camera whose captures land in a fresh temporary directory that is
    /// deleted, with everything captured into it, when the camera is dropped.
    pub fn temporary(source: impl Into<PathBuf>) -> Result<Self> {
        let scratch = tempfile::Builder::new()
            .prefix("snapshelf-capture-")
            .tempdir()
            .map_err(|err| Error::CreateDirectory {
                path: std::env::temp_dir(),
                source: err,
            })?;
        Ok(Self {
            source: source.into(),
            cache_dir: scratch.path().to_path_buf(),
            _scratch: Some(scratch),
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl Camera for FileCamera {
    fn capture(&mut self, options: &CaptureOptions) -> Result<PhotoReference> {
        if !self.source.is_file() {
            return Err(Error::NotFound(self.source.clone()));
        }
        if options.allow_editing {
            tracing::debug!("file camera has no editor, ignoring allow_editing");
        }

        let img = image::open(&self.source)?;
        let jpeg = encode_jpeg(&img, options.quality)?;
        tracing::debug!(
            source = %self.source.display(),
            quality = options.quality,
            size = jpeg.len(),
            "captured photo"
        );

        match options.result_type {
            ResultType::Uri => {
                fs::create_dir_all(&self.cache_dir).map_err(|source| Error::CreateDirectory {
                    path: self.cache_dir.clone(),
                    source,
                })?;
                let target = self.cache_dir.join(format!(
                    "capture-{}.jpeg",
                    chrono::Utc::now().timestamp_millis()
                ));
                fs::write(&target, &jpeg).map_err(|source| Error::Write {
                    path: target.clone(),
                    source,
                })?;
                Ok(PhotoReference {
                    web_path: Some(file_url(&target)),
                    path: Some(target),
                    format: "jpeg".to_string(),
                })
            }
            ResultType::Base64 | ResultType::DataUrl => Ok(PhotoReference {
                path: None,
                web_path: Some(codec::jpeg_data_uri(&jpeg)),
                format: "jpeg".to_string(),
            }),
        }
    }
}

/// Encode `img` as baseline JPEG. Alpha is dropped.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).encode_image(&rgb)?;
    Ok(buf)
}

pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Resolve a captured reference to the raw image bytes.
pub fn read_as_bytes(reference: &PhotoReference, platform: Platform) -> Result<Vec<u8>> {
    match platform {
        Platform::Hybrid => {
            let path = reference.path.as_deref().ok_or(Error::EmptyReference)?;
            read_local(path)
        }
        Platform::Web => {
            let web_path = reference.web_path.as_deref().ok_or(Error::EmptyReference)?;
            fetch_web_path(web_path)
        }
    }
}

fn read_local(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::io(path, e, |path, source| Error::Read { path, source }))
}

fn fetch_web_path(web_path: &str) -> Result<Vec<u8>> {
    if web_path.starts_with("data:") {
        return codec::parse_data_uri(web_path).map(|(_, bytes)| bytes);
    }
    if let Some(path) = web_path.strip_prefix("file://") {
        return read_local(Path::new(path));
    }
    if web_path.starts_with("http://") || web_path.starts_with("https://") {
        return fetch_http(web_path);
    }
    Err(Error::Encoding(format!("unsupported photo reference: {web_path}")))
}

fn fetch_http(url: &str) -> Result<Vec<u8>> {
    tracing::debug!(%url, "fetching photo");
    let fetch_err = |e: reqwest::Error| Error::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    };

    let bytes = reqwest::blocking::get(url)
        .and_then(|resp| resp.error_for_status())
        .map_err(fetch_err)?
        .bytes()
        .map_err(fetch_err)?;
    Ok(bytes.to_vec())
}

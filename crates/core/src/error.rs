use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("no stored photo named {0}")]
    PhotoNotFound(String),

    #[error("failed to list {}: {source}", .path.display())]
    List {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to delete {}: {source}", .path.display())]
    Delete {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("camera returned no usable reference for this platform")]
    EmptyReference,

    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("invalid image directory {0:?}: must be a single relative path component")]
    InvalidImageDir(String),

    #[error("could not determine the {0} directory for this platform")]
    NoPlatformDir(&'static str),
}

impl Error {
    /// True for the errors that mean "the thing is not there", as opposed to I/O failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::PhotoNotFound(_))
    }

    /// Map a raw I/O error, turning `ErrorKind::NotFound` into [`Error::NotFound`].
    pub(crate) fn io(
        path: impl Into<PathBuf>,
        source: std::io::Error,
        wrap: fn(PathBuf, std::io::Error) -> Error,
    ) -> Error {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(path)
        } else {
            wrap(path, source)
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Base64 and `data:` URI helpers.
//!
//! Stored files hold raw JPEG bytes; the presentation layer receives them as
//! `data:image/jpeg;base64,...` strings so it can render without a second read.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, Result};

/// MIME type every stored photo is labelled with.
pub const JPEG_MIME: &str = "image/jpeg";

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_base64(encoded: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(encoded.trim())?)
}

/// Length of the bytes `encoded` decodes to, computed without decoding.
///
/// Assumes well-formed base64; padding is optional.
pub fn base64_decoded_len(encoded: &str) -> usize {
    let unpadded = encoded.trim().trim_end_matches('=').len();
    unpadded * 3 / 4
}

/// Wrap raw bytes as a JPEG data URI.
pub fn jpeg_data_uri(bytes: &[u8]) -> String {
    format!("data:{JPEG_MIME};base64,{}", encode_base64(bytes))
}

/// Split a base64 data URI into its MIME type and decoded payload.
///
/// Only `;base64` URIs are accepted; percent-encoded payloads are rejected.
pub fn parse_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let (mime, payload) = split_data_uri(uri)?;
    Ok((mime, decode_base64(payload)?))
}

/// MIME type and still-encoded payload of a base64 data URI.
pub fn split_data_uri(uri: &str) -> Result<(String, &str)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| Error::Encoding("not a data URI".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::Encoding("data URI has no payload separator".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| Error::Encoding("data URI is not base64 encoded".to_string()))?;

    let mime = if mime.is_empty() {
        "text/plain".to_string()
    } else {
        mime.to_string()
    };
    Ok((mime, payload))
}

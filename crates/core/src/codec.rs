//! Share-token codec for deep-linking the live grid state.
//!
//! A token is the JSON form of the state, raw-DEFLATE compressed and
//! base64-encoded with the URL-safe alphabet and no padding. The output
//! only contains `A-Z a-z 0-9 - _`, so it can be dropped into a query
//! string without further percent-encoding.

use std::io::{Read, Write};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Query parameter the host application carries the token in.
pub const SHARE_PARAM: &str = "gridParams";

/// Longest token accepted for decoding.
pub const MAX_TOKEN_LEN: usize = 16 * 1024;

/// Largest inflated state accepted for decoding.
pub const MAX_STATE_BYTES: usize = 1024 * 1024;

/// Errors from encoding or decoding a share token.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("token is empty")]
    Empty,

    #[error("token too long: {0} chars (max {MAX_TOKEN_LEN})")]
    TooLong(usize),

    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to deflate state: {0}")]
    Deflate(#[source] std::io::Error),

    #[error("token failed to inflate: {0}")]
    Inflate(#[source] std::io::Error),

    #[error("inflated state exceeds {MAX_STATE_BYTES} bytes")]
    TooLarge,

    #[error("state is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode `state` as a URL-safe share token.
pub fn compress<T: Serialize + ?Sized>(state: &T) -> Result<String, CodecError> {
    let json = serde_json::to_vec(state)?;

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&json).map_err(CodecError::Deflate)?;
    let bytes = encoder.finish().map_err(CodecError::Deflate)?;

    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Decode a share token, reporting why it could not be read.
pub fn try_decompress<T: DeserializeOwned>(token: &str) -> Result<T, CodecError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CodecError::Empty);
    }
    if token.len() > MAX_TOKEN_LEN {
        return Err(CodecError::TooLong(token.len()));
    }

    let bytes = URL_SAFE_NO_PAD.decode(token)?;

    let mut json = Vec::new();
    DeflateDecoder::new(bytes.as_slice())
        .take(MAX_STATE_BYTES as u64 + 1)
        .read_to_end(&mut json)
        .map_err(CodecError::Inflate)?;
    if json.len() > MAX_STATE_BYTES {
        return Err(CodecError::TooLarge);
    }

    Ok(serde_json::from_slice(&json)?)
}

/// Decode an optional share token.
///
/// Returns `None` when there is no token (absent or blank) and when the
/// token cannot be decoded; a hand-edited URL must never stop the page
/// from rendering. A valid token for an empty state decodes to that empty
/// state, not to `None`.
pub fn decompress<T: DeserializeOwned>(token: Option<&str>) -> Option<T> {
    let token = token.map(str::trim).filter(|t| !t.is_empty())?;
    match try_decompress(token) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable grid-state token");
            None
        }
    }
}

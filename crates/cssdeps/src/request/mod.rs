//! URL text handling shared by both extractors.

mod classify;
mod normalize;

pub use classify::{RequestParts, candidates, is_placeholder, is_url_requestable, requestify};
pub use normalize::{decode_uri, normalize_url, unescape_css};

use once_cell::sync::Lazy;
use regex::Regex;

static NATIVE_WIN32_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[a-z]:[/\\]|^\\\\").unwrap());

/// `C:\dir\file`, `C:/dir/file` or a UNC path.
pub fn is_native_win32_path(url: &str) -> bool {
    NATIVE_WIN32_PATH.is_match(url)
}

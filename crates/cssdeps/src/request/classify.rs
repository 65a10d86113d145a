use once_cell::sync::Lazy;
use regex::Regex;

use crate::request::is_native_win32_path;

static ABSOLUTE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[a-z][a-z\d+\-.]*:").unwrap());
static FILE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^file:").unwrap());
static MODULE_REQUEST: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^?]*~").unwrap());
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^___CSS_LOADER_[A-Z_]+?(?:_\d+)?___$").unwrap());

/// Identifiers written by a previous pass.
pub fn is_placeholder(url: &str) -> bool {
    PLACEHOLDER.is_match(url)
}

/// Whether `url` names something the module system has to resolve.
///
/// Protocol-relative URLs, absolute URLs with any scheme except `file:`,
/// fragment-only URLs and placeholder identifiers pass through as literals.
pub fn is_url_requestable(url: &str) -> bool {
    if url.starts_with("//") {
        return false;
    }
    if FILE_URL.is_match(url) {
        return true;
    }
    if ABSOLUTE_URL.is_match(url) && !is_native_win32_path(url) {
        return false;
    }
    if url.starts_with('#') {
        return false;
    }
    !is_placeholder(url)
}

/// A requestable URL split into its loader prefix chain, the resolvable
/// path and the trailing query/hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParts {
    pub prefix: Option<String>,
    pub path: String,
    pub fragment: String,
}

impl RequestParts {
    pub fn split(url: &str) -> Self {
        let (rest, fragment) = match url.find(['?', '#']) {
            Some(at) => url.split_at(at),
            None => (url, ""),
        };
        // `!` only chains loaders in the path part.
        let (prefix, path) = match rest.rsplit_once('!') {
            Some((prefix, path)) => (Some(prefix.to_string()), path),
            None => (None, rest),
        };
        Self {
            prefix,
            path: path.to_string(),
            fragment: fragment.to_string(),
        }
    }
}

fn url_to_request(
    url: &str,
    root_context: Option<&str>,
) -> String {
    if url.is_empty() {
        return String::new();
    }

    let request = if is_native_win32_path(url) {
        url.to_string()
    } else if let Some(root) = root_context
        && let Some(rest) = url.strip_prefix('/')
    {
        if MODULE_REQUEST.is_match(root) && !root.ends_with(['~', '/']) {
            format!("{root}/{rest}")
        } else if MODULE_REQUEST.is_match(root) {
            format!("{root}{rest}")
        } else {
            format!("{root}{url}")
        }
    } else if url.starts_with('/') || url.starts_with("./") || url.starts_with("../") {
        url.to_string()
    } else {
        format!("./{url}")
    };

    MODULE_REQUEST.replace(&request, "").into_owned()
}

/// Shape a path into a module request: `file:` URLs become filesystem paths,
/// root-relative paths are joined to `root_context`, bare paths get `./` and
/// a `~` module marker is dropped.
pub fn requestify(
    url: &str,
    root_context: Option<&str>,
) -> String {
    if FILE_URL.is_match(url) {
        return url::Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.to_file_path().ok())
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_else(|| url.to_string());
    }
    url_to_request(url, root_context)
}

/// Requests handed to the resolver, in the order they are tried.
pub fn candidates(
    path: &str,
    root_context: Option<&str>,
) -> Vec<String> {
    let request = requestify(path, root_context);
    if request == path {
        vec![request]
    } else {
        vec![request, path.to_string()]
    }
}

#[cfg(test)]
#[path = "../../tests/src/request/classify_tests.rs"]
mod tests;

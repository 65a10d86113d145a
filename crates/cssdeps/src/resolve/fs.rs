use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Component, Path, PathBuf};

use dashmap::DashMap;
use tracing::debug;

use crate::request::is_native_win32_path;
use crate::resolve::{ResolveError, Resolver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsResolverOptions {
    /// Tried in order when the request itself is not a file.
    pub extensions: Vec<String>,
    /// Directory names searched for bare requests, from the context upwards.
    pub modules: Vec<String>,
    /// File names tried when the request is a directory.
    pub main_files: Vec<String>,
    /// Leading request segment to replacement path.
    pub alias: BTreeMap<String, String>,
}

impl Default for FsResolverOptions {
    fn default() -> Self {
        Self {
            extensions: vec![".css".to_string()],
            modules: vec!["node_modules".to_string()],
            main_files: vec!["index".to_string()],
            alias: BTreeMap::new(),
        }
    }
}

/// Resolves requests against the local filesystem.
///
/// Answers are cached per `(context, request)` for the lifetime of the
/// resolver, failures included.
#[derive(Debug, Default)]
pub struct FsResolver {
    options: FsResolverOptions,
    cache: DashMap<(PathBuf, String), Result<String, ResolveError>>,
}

impl FsResolver {
    pub fn new(options: FsResolverOptions) -> Self {
        Self {
            options,
            cache: DashMap::new(),
        }
    }

    pub fn options(&self) -> &FsResolverOptions {
        &self.options
    }

    fn apply_alias(
        &self,
        request: &str,
    ) -> String {
        for (name, target) in &self.options.alias {
            if request == name {
                return target.clone();
            }
            if let Some(rest) = request.strip_prefix(name.as_str())
                && rest.starts_with('/')
            {
                return format!("{}{rest}", target.trim_end_matches('/'));
            }
        }
        request.to_string()
    }

    fn search_paths(
        &self,
        context: &Path,
        request: &str,
    ) -> Vec<PathBuf> {
        let path = Path::new(request);
        if path.is_absolute() || is_native_win32_path(request) {
            return vec![path.to_path_buf()];
        }
        let relative = request == "." || request == ".." || request.starts_with("./") || request.starts_with("../");
        if relative {
            return vec![context.join(path)];
        }
        context
            .ancestors()
            .flat_map(|dir| self.options.modules.iter().map(move |module| dir.join(module).join(path)))
            .collect()
    }

    async fn lookup(
        &self,
        context: &Path,
        request: &str,
    ) -> Result<String, ResolveError> {
        if request.is_empty() {
            return Err(ResolveError::InvalidRequest {
                request: request.to_string(),
                reason: "empty request".to_string(),
            });
        }

        let aliased = self.apply_alias(request);
        for base in self.search_paths(context, &aliased) {
            if let Some(found) = self.probe(&normalize_lexically(&base)).await {
                return Ok(found);
            }
        }

        Err(ResolveError::NotFound {
            request: request.to_string(),
            context: context.to_path_buf(),
        })
    }

    async fn probe(
        &self,
        path: &Path,
    ) -> Option<String> {
        if is_file(path).await {
            return Some(canonical(path).await);
        }
        for candidate in self.with_extensions(path) {
            if is_file(&candidate).await {
                return Some(canonical(&candidate).await);
            }
        }
        if is_dir(path).await {
            for main in &self.options.main_files {
                for candidate in self.with_extensions(&path.join(main)) {
                    if is_file(&candidate).await {
                        return Some(canonical(&candidate).await);
                    }
                }
            }
        }
        None
    }

    fn with_extensions(
        &self,
        path: &Path,
    ) -> Vec<PathBuf> {
        self.options
            .extensions
            .iter()
            .map(|extension| {
                let mut name = path.as_os_str().to_os_string();
                name.push(extension);
                PathBuf::from(name)
            })
            .collect()
    }
}

impl Resolver for FsResolver {
    fn resolve(
        &self,
        context: &Path,
        request: &str,
    ) -> impl Future<Output = Result<String, ResolveError>> + Send {
        async move {
            let key = (context.to_path_buf(), request.to_string());
            if let Some(hit) = self.cache.get(&key) {
                return hit.value().clone();
            }
            let result = self.lookup(context, request).await;
            if let Err(err) = &result {
                debug!("{err}");
            }
            self.cache.insert(key, result.clone());
            result
        }
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path).await.map(|meta| meta.is_file()).unwrap_or(false)
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path).await.map(|meta| meta.is_dir()).unwrap_or(false)
}

async fn canonical(path: &Path) -> String {
    let resolved = tokio::fs::canonicalize(path).await.unwrap_or_else(|_| path.to_path_buf());
    resolved.to_string_lossy().into_owned()
}

/// Fold `.` and `..` components without touching the filesystem.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            },
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src/resolve/fs_tests.rs"]
mod tests;

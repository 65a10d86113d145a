//! Turning module requests into absolute targets.
//!
//! The engine only talks to a [`Resolver`]; [`FsResolver`] is the
//! filesystem-backed one used by the binary.

mod coordinator;
mod fs;

pub use coordinator::resolve_all;
pub use fs::{FsResolver, FsResolverOptions};

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("can't resolve '{request}' in '{}'", context.display())]
    NotFound { request: String, context: PathBuf },
    #[error("invalid request '{request}': {reason}")]
    InvalidRequest { request: String, reason: String },
}

pub trait Resolver: Send + Sync {
    /// Resolve one request relative to the `context` directory.
    fn resolve(
        &self,
        context: &Path,
        request: &str,
    ) -> impl Future<Output = Result<String, ResolveError>> + Send;

    /// Try `candidates` in order, skipping repeats; the first success wins,
    /// otherwise the last failure is returned.
    fn resolve_first(
        &self,
        context: &Path,
        candidates: &[String],
    ) -> impl Future<Output = Result<String, ResolveError>> + Send {
        async move {
            let mut seen = HashSet::new();
            let mut last_error = None;
            for candidate in candidates {
                if !seen.insert(candidate.as_str()) {
                    continue;
                }
                match self.resolve(context, candidate).await {
                    Ok(target) => return Ok(target),
                    Err(err) => {
                        trace!(%candidate, "candidate failed: {err}");
                        last_error = Some(err);
                    },
                }
            }
            Err(last_error.unwrap_or_else(|| ResolveError::InvalidRequest {
                request: String::new(),
                reason: "no candidates".to_string(),
            }))
        }
    }
}

impl<R: Resolver> Resolver for Arc<R> {
    fn resolve(
        &self,
        context: &Path,
        request: &str,
    ) -> impl Future<Output = Result<String, ResolveError>> + Send {
        R::resolve(self, context, request)
    }
}

#[cfg(test)]
#[path = "../../tests/src/resolve/resolver_tests.rs"]
mod tests;

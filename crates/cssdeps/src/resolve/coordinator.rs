use std::path::Path;

use futures::StreamExt;
use futures::future::join_all;
use futures::stream;
use tracing::debug;

use crate::resolve::{ResolveError, Resolver};

/// Resolve every candidate list, returning results in input order.
///
/// All requests are issued before any result is consumed. With
/// `concurrency > 0` at most that many are in flight at once; ordering of
/// the returned results is the same either way.
pub async fn resolve_all<R: Resolver>(
    resolver: &R,
    context: &Path,
    jobs: &[Vec<String>],
    concurrency: usize,
) -> Vec<Result<String, ResolveError>> {
    debug!(requests = jobs.len(), concurrency, "resolving");
    let requests = jobs.iter().map(|candidates| resolver.resolve_first(context, candidates));
    if concurrency == 0 {
        join_all(requests).await
    } else {
        stream::iter(requests).buffered(concurrency).collect().await
    }
}

#[cfg(test)]
#[path = "../../tests/src/resolve/coordinator_tests.rs"]
mod tests;

//! One complete pass over a stylesheet: extract, resolve, dedupe, rewrite.
//!
//! A [`Pass`] is cheap to keep around and can be run on any number of
//! stylesheets; every run builds its own tables and drops them on return,
//! so identifiers always start at `0`.

pub mod descriptor;
mod rewrite;
mod table;

pub use descriptor::{Descriptor, ImportNamespace, UsageOrigin};

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extract::{
    ExtractSettings, Extraction, LiteralUrls, Reference, ReferenceFilter, ReferenceKind, RewriteHandle, Warning,
    extract,
};
use crate::request::candidates;
use crate::resolve::{ResolveError, Resolver, resolve_all};
use crate::syntax::Stylesheet;
use table::{
    AT_RULE_IMPORT_PREFIX, ImportTable, RUNTIME_HELPER_NAME, ReplacementTable, URL_IMPORT_PREFIX,
};

/// Request bound to `___CSS_LOADER_GET_URL_IMPORT___` when nothing else is configured.
pub const DEFAULT_RUNTIME_HELPER: &str = "cssdeps/runtime/getUrl.js";

/// Maps a resolved request to the string stored in an `import-binding`.
pub type UrlHandler = Arc<dyn Fn(&str) -> String + Send + Sync>;

#[derive(Clone)]
pub struct PassOptions {
    /// Directory requests are resolved against.
    pub context: PathBuf,
    /// Prepended to root-relative (`/x`) requests; without it they are kept.
    pub root_context: Option<String>,
    pub import: bool,
    pub url: bool,
    pub literal_urls: LiteralUrls,
    pub runtime_helper: String,
    /// Maximum in-flight resolutions, `0` for no limit.
    pub concurrency: usize,
    pub filter: Option<ReferenceFilter>,
    pub url_handler: Option<UrlHandler>,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            context: PathBuf::from("."),
            root_context: None,
            import: true,
            url: true,
            literal_urls: LiteralUrls::Rewrite,
            runtime_helper: DEFAULT_RUNTIME_HELPER.to_string(),
            concurrency: 0,
            filter: None,
            url_handler: None,
        }
    }
}

impl fmt::Debug for PassOptions {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("PassOptions")
            .field("context", &self.context)
            .field("root_context", &self.root_context)
            .field("import", &self.import)
            .field("url", &self.url)
            .field("literal_urls", &self.literal_urls)
            .field("runtime_helper", &self.runtime_helper)
            .field("concurrency", &self.concurrency)
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .field("url_handler", &self.url_handler.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl PassOptions {
    fn extract_settings(&self) -> ExtractSettings {
        ExtractSettings {
            import: self.import,
            url: self.url,
            literal_urls: self.literal_urls,
            filter: self.filter.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PassError {
    #[error("unable to resolve '{request}' from '{}': {source}", context.display())]
    Resolution {
        request: String,
        context: PathBuf,
        #[source]
        source: ResolveError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassOutput {
    pub css: String,
    pub descriptors: Vec<Descriptor>,
    pub warnings: Vec<Warning>,
}

pub struct Pass<R> {
    resolver: R,
    options: PassOptions,
}

impl<R> Pass<R> {
    pub fn new(
        resolver: R,
        options: PassOptions,
    ) -> Self {
        Self {
            resolver,
            options,
        }
    }

    pub fn options(&self) -> &PassOptions {
        &self.options
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

impl<R: Resolver> Pass<R> {
    /// Run the pass over `source`.
    ///
    /// Nothing is rewritten unless every requestable reference resolves; on
    /// the first failure (in sequence order) the error is returned instead.
    pub async fn run(
        &self,
        source: &str,
    ) -> Result<PassOutput, PassError> {
        let Extraction {
            references,
            mut values,
            warnings,
        } = {
            let sheet = Stylesheet::parse(source);
            extract(&sheet, &self.options.extract_settings())
        };
        let targets = self.resolve_targets(&references).await?;

        let mut state = PassState::new(&self.options);
        for (reference, target) in references.iter().zip(&targets) {
            state.bind(reference, target.as_deref());
        }
        let css = rewrite::apply(source, &mut values, &state.rewrites);

        info!(
            "Pass over {} finished: {} reference(s), {} descriptor(s), {} warning(s)",
            self.options.context.display(),
            references.len(),
            state.descriptors.len(),
            warnings.len()
        );
        debug!(
            at_rule_imports = state.at_rule_imports.len(),
            url_imports = state.url_imports.len(),
            replacements = state.replacements.len(),
            "identifier tables"
        );

        Ok(PassOutput {
            css,
            descriptors: state.descriptors,
            warnings,
        })
    }

    /// One target per reference, `None` for literals.
    async fn resolve_targets(
        &self,
        references: &[Reference],
    ) -> Result<Vec<Option<String>>, PassError> {
        let root_context = self.options.root_context.as_deref();
        let pending: Vec<usize> = references
            .iter()
            .enumerate()
            .filter(|(_, reference)| reference.requestable)
            .map(|(position, _)| position)
            .collect();
        let jobs: Vec<Vec<String>> = pending
            .iter()
            .map(|&position| candidates(&references[position].path, root_context))
            .collect();

        let results = resolve_all(&self.resolver, &self.options.context, &jobs, self.options.concurrency).await;

        let mut targets = vec![None; references.len()];
        for (position, result) in pending.into_iter().zip(results) {
            match result {
                Ok(target) => targets[position] = Some(target),
                Err(source) => {
                    let reference = &references[position];
                    warn!(
                        "Failed to resolve '{}' at {}:{}: {source}",
                        reference.url, reference.location.line, reference.location.column
                    );
                    return Err(PassError::Resolution {
                        request: reference.url.clone(),
                        context: self.options.context.clone(),
                        source,
                    });
                },
            }
        }
        Ok(targets)
    }
}

/// Tables and output accumulated while binding resolved references.
struct PassState<'a> {
    options: &'a PassOptions,
    at_rule_imports: ImportTable,
    url_imports: ImportTable,
    replacements: ReplacementTable,
    runtime_helper_bound: bool,
    descriptors: Vec<Descriptor>,
    rewrites: Vec<(RewriteHandle, String)>,
}

impl<'a> PassState<'a> {
    fn new(options: &'a PassOptions) -> Self {
        Self {
            options,
            at_rule_imports: ImportTable::new(AT_RULE_IMPORT_PREFIX),
            url_imports: ImportTable::new(URL_IMPORT_PREFIX),
            replacements: ReplacementTable::default(),
            runtime_helper_bound: false,
            descriptors: Vec::new(),
            rewrites: Vec::new(),
        }
    }

    fn handle_url(
        &self,
        url: &str,
    ) -> String {
        match &self.options.url_handler {
            Some(handler) => handler(url),
            None => url.to_string(),
        }
    }

    fn bind(
        &mut self,
        reference: &Reference,
        target: Option<&str>,
    ) {
        match reference.kind {
            ReferenceKind::Import => self.bind_import(reference, target),
            ReferenceKind::UrlFunction | ReferenceKind::UrlString => self.bind_url(reference, target),
        }
    }

    fn bind_import(
        &mut self,
        reference: &Reference,
        target: Option<&str>,
    ) {
        let origin = match target {
            Some(target) => {
                let resolved = format!("{target}{}", reference.hash);
                let url = self.handle_url(&reference.with_prefix(&resolved));
                let (entry, inserted) = self
                    .at_rule_imports
                    .intern((reference.prefix.clone(), resolved), reference.index);
                if inserted {
                    self.descriptors.push(Descriptor::ImportBinding {
                        import_name: entry.name.clone(),
                        url,
                        index: entry.first_index,
                        namespace: ImportNamespace::AtRule,
                    });
                }
                UsageOrigin::Internal {
                    import_name: entry.name,
                }
            },
            None => UsageOrigin::External {
                url: reference.url.clone(),
            },
        };
        self.descriptors.push(Descriptor::ImportUsage {
            index: reference.index,
            media: reference.media.clone().unwrap_or_default(),
            origin,
        });
        self.rewrites.push((reference.handle, String::new()));
    }

    fn bind_url(
        &mut self,
        reference: &Reference,
        target: Option<&str>,
    ) {
        // Literals only get here when they are bound verbatim.
        let (target, literal) = match target {
            Some(target) => (target.to_string(), false),
            None => (reference.url.clone(), true),
        };
        let full = reference.with_prefix(&target);

        let (import, inserted) = self
            .url_imports
            .intern((reference.prefix.clone(), target), reference.index);
        if inserted {
            self.bind_runtime_helper(reference.index);
            let url = if literal { full.clone() } else { self.handle_url(&full) };
            self.descriptors.push(Descriptor::ImportBinding {
                import_name: import.name.clone(),
                url,
                index: import.first_index,
                namespace: ImportNamespace::Url,
            });
        }

        let (replacement, inserted) = self
            .replacements
            .intern((full, reference.hash.clone(), reference.needs_quotes), &import.name);
        if inserted {
            self.descriptors.push(Descriptor::UrlReplacement {
                replacement_name: replacement.name.clone(),
                import_name: replacement.import_name,
                hash: reference.hash.clone(),
                needs_quotes: reference.needs_quotes,
                index: reference.index,
            });
        }
        self.rewrites.push((reference.handle, replacement.name));
    }

    fn bind_runtime_helper(
        &mut self,
        index: usize,
    ) {
        if self.runtime_helper_bound {
            return;
        }
        self.runtime_helper_bound = true;
        let url = self.handle_url(&self.options.runtime_helper);
        self.descriptors.push(Descriptor::ImportBinding {
            import_name: RUNTIME_HELPER_NAME.to_string(),
            url,
            index,
            namespace: ImportNamespace::Runtime,
        });
    }
}

/// A handler that stores absolute targets relative to `context`.
///
/// Every `!`-separated segment that is an absolute path is rewritten with
/// forward slashes and a leading `./` when it does not climb out of
/// `context`; other segments are kept.
pub fn relative_url_handler(context: PathBuf) -> UrlHandler {
    Arc::new(move |url: &str| {
        url.split('!')
            .map(|segment| {
                let path = Path::new(segment);
                if path.is_absolute() {
                    relative_request(path, &context)
                } else {
                    segment.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("!")
    })
}

fn relative_request(
    path: &Path,
    base: &Path,
) -> String {
    let path: Vec<Component<'_>> = path.components().collect();
    let base: Vec<Component<'_>> = base.components().collect();
    let common = path.iter().zip(&base).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = std::iter::repeat_n("..".to_string(), base.len() - common).collect();
    parts.extend(path[common..].iter().map(|component| component.as_os_str().to_string_lossy().into_owned()));
    let joined = parts.join("/");

    if joined.starts_with("..") {
        joined
    } else {
        format!("./{joined}")
    }
}

#[cfg(test)]
#[path = "../../tests/src/pass/pass_tests.rs"]
mod tests;

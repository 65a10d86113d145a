//! First phase of a pass: walk the stylesheet and collect every `@import`
//! directive and resource reference without mutating anything.
//!
//! Each accepted occurrence becomes a [`Reference`] carrying a
//! [`RewriteHandle`] that the rewriter later uses to replace it. Declaration
//! values holding references are tokenized once and kept as
//! [`OwnedValue`]s so the handles stay valid until rewriting.

pub mod ignore;
mod imports;
mod urls;

use std::fmt;
use std::sync::Arc;

use rowan::TextRange;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::syntax::Stylesheet;
use crate::text_pos::SourceLocation;
use crate::value::{NodeId, ValueTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    Import,
    UrlFunction,
    UrlString,
}

/// Where a reference lives, for rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteHandle {
    /// A whole `@import` directive, removed on rewrite.
    Directive { range: TextRange },
    /// A node inside `Extraction::values[owner]`.
    ValueNode { owner: usize, node: NodeId },
}

/// A tokenized declaration value that holds at least one reference.
#[derive(Debug, Clone)]
pub struct OwnedValue {
    pub range: TextRange,
    pub tree: ValueTree,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ReferenceKind,
    /// URL text as written, before normalization.
    pub raw: String,
    pub url: String,
    pub is_string_value: bool,
    pub needs_quotes: bool,
    /// `!`-joined loader chain in front of the path.
    pub prefix: Option<String>,
    /// The part handed to the resolver.
    pub path: String,
    /// Trailing `?query` / `#hash`, re-appended after resolution.
    pub hash: String,
    pub index: usize,
    pub handle: RewriteHandle,
    pub media: Option<String>,
    pub requestable: bool,
    pub location: SourceLocation,
}

impl Reference {
    /// `target` with this reference's loader chain put back in front.
    pub fn with_prefix(
        &self,
        target: &str,
    ) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}!{target}"),
            None => target.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    MalformedDirective,
    UnparsableReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for Warning {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}:{}: {}", self.location.line, self.location.column, self.message)
    }
}

/// What to do with `url()` references that need no resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralUrls {
    /// Leave them in the output as written.
    Keep,
    /// Bind them verbatim and replace them like resolved references.
    #[default]
    Rewrite,
}

/// Argument of the accept predicate. `media` is `None` for `url()` references.
#[derive(Debug, Clone, Copy)]
pub struct FilterInput<'a> {
    pub url: &'a str,
    pub media: Option<&'a str>,
}

pub type ReferenceFilter = Arc<dyn Fn(&FilterInput<'_>) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct ExtractSettings {
    pub import: bool,
    pub url: bool,
    pub literal_urls: LiteralUrls,
    pub filter: Option<ReferenceFilter>,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            import: true,
            url: true,
            literal_urls: LiteralUrls::Rewrite,
            filter: None,
        }
    }
}

impl fmt::Debug for ExtractSettings {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ExtractSettings")
            .field("import", &self.import)
            .field("url", &self.url)
            .field("literal_urls", &self.literal_urls)
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Extraction {
    /// In sequence-index order: imports first, then `url()` references in
    /// document order.
    pub references: Vec<Reference>,
    pub values: Vec<OwnedValue>,
    pub warnings: Vec<Warning>,
}

pub fn extract(
    sheet: &Stylesheet,
    settings: &ExtractSettings,
) -> Extraction {
    let mut extractor = Extractor {
        sheet,
        settings,
        out: Extraction::default(),
    };
    if settings.import {
        extractor.extract_imports();
    }
    if settings.url {
        extractor.extract_urls();
    }
    debug!(
        references = extractor.out.references.len(),
        warnings = extractor.out.warnings.len(),
        "extraction finished"
    );
    extractor.out
}

struct Extractor<'a> {
    sheet: &'a Stylesheet,
    settings: &'a ExtractSettings,
    out: Extraction,
}

impl Extractor<'_> {
    fn location(
        &self,
        range: TextRange,
    ) -> SourceLocation {
        SourceLocation::new(self.sheet.source(), range)
    }

    fn warn(
        &mut self,
        kind: WarningKind,
        message: String,
        range: TextRange,
    ) {
        let location = self.location(range);
        debug!(line = location.line, column = location.column, "{message}");
        self.out.warnings.push(Warning {
            kind,
            message,
            location,
        });
    }

    fn accepts(
        &self,
        url: &str,
        media: Option<&str>,
    ) -> bool {
        match &self.settings.filter {
            Some(filter) => filter(&FilterInput {
                url,
                media,
            }),
            None => true,
        }
    }

    fn next_index(&self) -> usize {
        self.out.references.len()
    }
}

/// Node text the way it is quoted in warnings, without the closing `;`.
fn statement_text(node: &crate::syntax::cst::SyntaxNode) -> String {
    let text = node.text().to_string();
    text.trim_end_matches(';').trim_end().to_string()
}

#[cfg(test)]
#[path = "../../tests/src/extract/extract_tests.rs"]
mod tests;

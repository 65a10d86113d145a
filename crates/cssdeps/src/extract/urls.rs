use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::extract::{
    Extractor, LiteralUrls, OwnedValue, Reference, ReferenceKind, RewriteHandle, WarningKind, ignore, statement_text,
};
use crate::request::{RequestParts, is_placeholder, is_url_requestable, normalize_url};
use crate::syntax::ast::{AstNode, Declaration};
use crate::value::{NodeId, ValueTree, Walk};

static NEEDS_PARSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(?:url|(?:-webkit-)?image-set)\(").unwrap());
static IMAGE_SET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:-webkit-)?image-set$").unwrap());

/// One `url()` or `image-set()` string found while walking a value.
struct Candidate {
    /// Node replaced on rewrite; `None` for an empty `url()`.
    node: Option<NodeId>,
    raw: String,
    is_string_value: bool,
    needs_quotes: bool,
    marker: Option<bool>,
}

fn url_function(
    tree: &ValueTree,
    id: NodeId,
    marker: Option<bool>,
) -> Candidate {
    let children = tree.children(id);
    let first = children.first().copied();
    let is_string_value = first.is_some_and(|child| tree.node(child).is_string());
    let raw = match first {
        Some(child) if is_string_value => tree.node(child).value.clone(),
        _ => tree.stringify_nodes(children),
    };
    Candidate {
        node: first,
        raw,
        is_string_value,
        needs_quotes: false,
        marker,
    }
}

fn image_set_entries(
    tree: &ValueTree,
    id: NodeId,
    candidates: &mut Vec<Candidate>,
) {
    let children = tree.children(id);
    for (index, &child) in children.iter().enumerate() {
        let node = tree.node(child);
        let marker = ignore::sibling_marker(tree, index, children);
        if node.is_function_named("url") {
            candidates.push(url_function(tree, child, marker));
        } else if node.is_string() {
            candidates.push(Candidate {
                node: Some(child),
                raw: node.value.clone(),
                is_string_value: true,
                needs_quotes: true,
                marker,
            });
        }
    }
}

fn collect_candidates(
    tree: &ValueTree,
    between: Option<bool>,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    tree.walk(|tree, id, index, siblings| {
        let node = tree.node(id);
        if node.is_function_named("url") {
            let marker = ignore::sibling_marker(tree, index, siblings);
            candidates.push(url_function(tree, id, marker));
            return Walk::Skip;
        }
        if node.is_function() && IMAGE_SET.is_match(&node.value) {
            image_set_entries(tree, id, &mut candidates);
            return Walk::Skip;
        }
        Walk::Continue
    });
    // The between-zone marker belongs to the first candidate, wherever it sits.
    if let Some(first) = candidates.first_mut()
        && first.marker.is_none()
    {
        first.marker = between;
    }
    candidates
}

impl Extractor<'_> {
    pub(super) fn extract_urls(&mut self) {
        let declarations: Vec<Declaration> = self.sheet.root().declarations().collect();
        for declaration in declarations {
            self.extract_declaration(&declaration);
        }
    }

    fn extract_declaration(
        &mut self,
        declaration: &Declaration,
    ) {
        let Some(value) = declaration.value() else {
            return;
        };
        let text = value.text();
        if !NEEDS_PARSE.is_match(&text) {
            return;
        }

        let tree = ValueTree::parse(&text);
        let between = ignore::between_marker(&declaration.between());
        let declaration_wide = ignore::declaration_ignored(declaration.syntax());
        let candidates = collect_candidates(&tree, between);

        let owner = self.out.values.len();
        let range = declaration.syntax().text_range();
        let mut registered = false;

        for candidate in candidates {
            if ignore::is_suppressed(candidate.marker, declaration_wide) {
                debug!(raw = %candidate.raw, "url ignored by comment");
                continue;
            }

            let unparsable = || format!("Unable to find uri in '{}'", statement_text(declaration.syntax()));
            if candidate.raw.trim().is_empty() {
                self.warn(WarningKind::UnparsableReference, unparsable(), range);
                continue;
            }
            let url = normalize_url(&candidate.raw, candidate.is_string_value);
            let Some(node) = candidate.node.filter(|_| !url.is_empty()) else {
                self.warn(WarningKind::UnparsableReference, unparsable(), range);
                continue;
            };

            if !self.accepts(&url, None) {
                debug!(%url, "url rejected by filter");
                continue;
            }

            let requestable = is_url_requestable(&url);
            if !requestable && (self.settings.literal_urls == LiteralUrls::Keep || is_placeholder(&url)) {
                continue;
            }

            let parts = if requestable {
                RequestParts::split(&url)
            } else {
                RequestParts {
                    prefix: None,
                    path: url.clone(),
                    fragment: String::new(),
                }
            };
            let kind = if candidate.needs_quotes { ReferenceKind::UrlString } else { ReferenceKind::UrlFunction };
            let location = self.location(range);
            let index = self.next_index();
            self.out.references.push(Reference {
                kind,
                raw: candidate.raw,
                url,
                is_string_value: candidate.is_string_value,
                needs_quotes: candidate.needs_quotes,
                prefix: parts.prefix,
                path: parts.path,
                hash: parts.fragment,
                index,
                handle: RewriteHandle::ValueNode {
                    owner,
                    node,
                },
                media: None,
                requestable,
                location,
            });
            registered = true;
        }

        if registered {
            self.out.values.push(OwnedValue {
                range: value.text_range(),
                tree,
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/extract/urls_tests.rs"]
mod tests;

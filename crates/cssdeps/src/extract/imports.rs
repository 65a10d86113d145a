use tracing::debug;

use crate::extract::{Extractor, Reference, ReferenceKind, RewriteHandle, WarningKind, ignore, statement_text};
use crate::request::{RequestParts, is_url_requestable, normalize_url};
use crate::syntax::ast::{AstNode, AtRule};
use crate::value::ValueTree;

const MALFORMED_IMPORT: &str =
    "It looks like you didn't end your @import statement correctly. Child nodes are attached to it.";

/// URL of an `@import` parameter list: a leading string or `url()`.
fn import_url(tree: &ValueTree) -> Option<(String, bool)> {
    let &first = tree.roots().first()?;
    let node = tree.node(first);
    if node.is_function_named("url") {
        let children = tree.children(first);
        return match children.first() {
            Some(&child) if tree.node(child).is_string() => Some((tree.node(child).value.clone(), true)),
            _ => Some((tree.stringify_nodes(children), false)),
        };
    }
    if node.is_string() {
        return Some((node.value.clone(), true));
    }
    None
}

impl Extractor<'_> {
    pub(super) fn extract_imports(&mut self) {
        let imports: Vec<AtRule> =
            self.sheet.root().at_rules().filter(|rule| rule.name().eq_ignore_ascii_case("import")).collect();
        for at_rule in imports {
            self.extract_import(&at_rule);
        }
    }

    fn extract_import(
        &mut self,
        at_rule: &AtRule,
    ) {
        let range = at_rule.syntax().text_range();
        if ignore::import_ignored(at_rule) {
            debug!(?range, "@import ignored by comment");
            return;
        }

        if at_rule.block().is_some() {
            self.warn(WarningKind::MalformedDirective, MALFORMED_IMPORT.to_string(), range);
            return;
        }

        let unparsable = format!("Unable to find uri in \"{}\"", statement_text(at_rule.syntax()));
        let tree = ValueTree::parse(&at_rule.params());
        let Some((raw, is_string_value)) = import_url(&tree) else {
            self.warn(WarningKind::UnparsableReference, unparsable, range);
            return;
        };
        if raw.trim().is_empty() {
            self.warn(WarningKind::UnparsableReference, unparsable, range);
            return;
        }

        let requestable = is_url_requestable(raw.trim());
        let url = if requestable { normalize_url(&raw, is_string_value) } else { raw.trim().to_string() };
        if url.is_empty() {
            self.warn(WarningKind::UnparsableReference, unparsable, range);
            return;
        }

        let media = tree.stringify_nodes(&tree.roots()[1..]).trim().to_lowercase();
        if !self.accepts(&url, Some(&media)) {
            debug!(%url, "@import rejected by filter");
            return;
        }

        let requestable = is_url_requestable(&url);
        let parts = if requestable {
            RequestParts::split(&url)
        } else {
            RequestParts {
                prefix: None,
                path: url.clone(),
                fragment: String::new(),
            }
        };
        let location = self.location(range);
        let index = self.next_index();
        self.out.references.push(Reference {
            kind: ReferenceKind::Import,
            raw,
            url,
            is_string_value,
            needs_quotes: false,
            prefix: parts.prefix,
            path: parts.path,
            hash: parts.fragment,
            index,
            handle: RewriteHandle::Directive {
                range,
            },
            media: Some(media),
            requestable,
            location,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/src/extract/imports_tests.rs"]
mod tests;

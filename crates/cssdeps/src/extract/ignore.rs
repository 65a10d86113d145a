//! `webpackIgnore` comments.
//!
//! A marker directly in front of a reference (one space allowed in between)
//! decides for that reference alone. A marker in front of a declaration is
//! the default for every reference in it that has no marker of its own. Only
//! `true` suppresses, so a local `false` re-enables a reference inside an
//! ignored declaration.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::syntax::ast::{AstNode, AtRule, previous_comment};
use crate::syntax::cst::SyntaxNode;
use crate::value::{NodeId, ValueKind, ValueTree};

static WEBPACK_IGNORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"webpackIgnore:(\s+)?(true|false)").unwrap());

/// The marker's value, or `None` when the text carries no marker.
pub fn marker_value(comment: &str) -> Option<bool> {
    WEBPACK_IGNORE.captures(comment).map(|captures| &captures[2] == "true")
}

/// Marker in the last comment of a declaration's property/value gap.
pub fn between_marker(between: &str) -> Option<bool> {
    between.rfind("/*").and_then(|at| marker_value(&between[at..]))
}

/// Marker on the comment preceding a value node among its siblings.
pub fn sibling_marker(
    tree: &ValueTree,
    index: usize,
    siblings: &[NodeId],
) -> Option<bool> {
    let mut previous = tree.node(*siblings.get(index.checked_sub(1)?)?);
    if previous.kind == ValueKind::Space {
        previous = tree.node(*siblings.get(index.checked_sub(2)?)?);
    }
    match previous.kind {
        ValueKind::Comment {
            ..
        } => marker_value(&previous.value),
        _ => None,
    }
}

/// Whether the comment in front of a declaration ignores all of it.
pub fn declaration_ignored(declaration: &SyntaxNode) -> bool {
    previous_comment(declaration).and_then(|comment| marker_value(comment.text())).unwrap_or(false)
}

pub fn is_suppressed(
    local: Option<bool>,
    declaration_wide: bool,
) -> bool {
    local.unwrap_or(declaration_wide)
}

/// `@import /* webpackIgnore: true */ ...` or a marker comment right before
/// the directive.
pub fn import_ignored(at_rule: &AtRule) -> bool {
    let after_name = at_rule.after_name();
    if !after_name.trim().is_empty() && between_marker(&after_name) == Some(true) {
        return true;
    }
    previous_comment(at_rule.syntax()).and_then(|comment| marker_value(comment.text())) == Some(true)
}

#[cfg(test)]
#[path = "../../tests/src/extract/ignore_tests.rs"]
mod tests;

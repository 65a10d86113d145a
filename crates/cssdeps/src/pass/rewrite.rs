use rowan::TextRange;

use crate::extract::{OwnedValue, RewriteHandle};

/// Replacement text for one byte range of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

fn is_css_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

/// Removing a directive also removes the whitespace in front of it.
fn directive_removal(
    source: &str,
    range: TextRange,
) -> Edit {
    let end = usize::from(range.end());
    let start = usize::from(range.start());
    let start = source[..start].trim_end_matches(is_css_whitespace).len();
    Edit {
        start,
        end,
        text: String::new(),
    }
}

/// Apply every rewrite to the value trees, then splice the re-serialized
/// values and directive removals into `source` in one pass.
pub(crate) fn apply(
    source: &str,
    values: &mut [OwnedValue],
    rewrites: &[(RewriteHandle, String)],
) -> String {
    let mut touched = vec![false; values.len()];
    let mut edits = Vec::new();

    for (handle, replacement) in rewrites {
        match *handle {
            RewriteHandle::ValueNode {
                owner,
                node,
            } => {
                values[owner].tree.replace_with_word(node, replacement);
                touched[owner] = true;
            },
            RewriteHandle::Directive {
                range,
            } => edits.push(directive_removal(source, range)),
        }
    }

    for (value, _) in values.iter().zip(&touched).filter(|(_, touched)| **touched) {
        edits.push(Edit {
            start: usize::from(value.range.start()),
            end: usize::from(value.range.end()),
            text: value.tree.stringify(),
        });
    }

    edits.sort_by_key(|edit| edit.start);

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        out.push_str(&source[cursor..edit.start.max(cursor)]);
        out.push_str(&edit.text);
        cursor = edit.end.max(cursor);
    }
    out.push_str(&source[cursor..]);
    out
}

#[cfg(test)]
#[path = "../../tests/src/pass/rewrite_tests.rs"]
mod tests;

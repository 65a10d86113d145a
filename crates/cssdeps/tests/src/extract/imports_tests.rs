use std::sync::Arc;

use crate::extract::{Extraction, ExtractSettings, FilterInput, ReferenceFilter, RewriteHandle, extract};
use crate::syntax::Stylesheet;

use super::*;

fn imports_only(source: &str) -> Extraction {
    let settings = ExtractSettings {
        url: false,
        ..ExtractSettings::default()
    };
    extract(&Stylesheet::parse(source), &settings)
}

fn urls(extraction: &Extraction) -> Vec<&str> {
    extraction.references.iter().map(|reference| reference.url.as_str()).collect()
}

#[test]
fn string_and_url_forms_with_media() {
    let out = imports_only(
        "@import \"a.css\";\n@IMPORT url(b.css) screen;\n@import url('c.css') PRINT and (orientation: landscape);",
    );
    assert!(out.warnings.is_empty());
    assert_eq!(urls(&out), vec!["a.css", "b.css", "c.css"]);

    let string_values: Vec<bool> = out.references.iter().map(|r| r.is_string_value).collect();
    assert_eq!(string_values, vec![true, false, true]);

    let media: Vec<Option<&str>> = out.references.iter().map(|r| r.media.as_deref()).collect();
    assert_eq!(media, vec![Some(""), Some("screen"), Some("print and (orientation: landscape)")]);

    let indices: Vec<usize> = out.references.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert!(out.references.iter().all(|r| r.kind == ReferenceKind::Import && r.requestable));
    assert!(matches!(out.references[0].handle, RewriteHandle::Directive { .. }));
    assert!(out.values.is_empty());
}

#[test]
fn only_top_level_imports() {
    let out = imports_only("@media print { @import \"a.css\"; }\n@supports (display: grid) { @import 'b.css'; }");
    assert!(out.references.is_empty());
    assert!(out.warnings.is_empty());
}

#[test]
fn directive_with_block_is_malformed() {
    let out = imports_only("@import url(a.css) :root { color: red }");
    assert!(out.references.is_empty());
    assert_eq!(out.warnings.len(), 1);
    assert_eq!(out.warnings[0].kind, WarningKind::MalformedDirective);
    assert_eq!(out.warnings[0].message, MALFORMED_IMPORT);
}

#[test]
fn unparsable_directives_warn() {
    let out = imports_only("@import foo;\n@import;\n@import format(\"a.css\");\n@import \"\";\n@import url();\n@import ' ';");
    assert!(out.references.is_empty());
    assert_eq!(out.warnings.len(), 6);
    assert!(out.warnings.iter().all(|w| w.kind == WarningKind::UnparsableReference));
    assert_eq!(out.warnings[0].message, "Unable to find uri in \"@import foo\"");
    assert_eq!(out.warnings[2].location.line, 3);
    assert_eq!(out.warnings[2].location.column, 1);
}

#[test]
fn external_imports_are_not_requestable() {
    let out = imports_only("@import url(http://example.com/a%20b.css) screen;\n@import '//cdn.example.com/x.css';");
    assert_eq!(urls(&out), vec!["http://example.com/a%20b.css", "//cdn.example.com/x.css"]);
    assert!(out.references.iter().all(|r| !r.requestable && r.prefix.is_none() && r.hash.is_empty()));
}

#[test]
fn prefix_and_fragment_are_split() {
    let out = imports_only("@import \"loader!./a.css?x=1#y\";");
    let reference = &out.references[0];
    assert_eq!(reference.prefix.as_deref(), Some("loader"));
    assert_eq!(reference.path, "./a.css");
    assert_eq!(reference.hash, "?x=1#y");
}

#[test]
fn urls_are_normalized() {
    let out = imports_only("@import \"./a\\ b.css\";\n@import url(./c%20d.css);");
    assert_eq!(urls(&out), vec!["./a b.css", "./c d.css"]);
    assert_eq!(out.references[0].raw, "./a\\ b.css");
}

fn skip_print(input: &FilterInput<'_>) -> bool {
    input.media != Some("print")
}

#[test]
fn filter_sees_url_and_media() {
    let filter: ReferenceFilter = Arc::new(skip_print);
    let settings = ExtractSettings {
        url: false,
        filter: Some(filter),
        ..ExtractSettings::default()
    };
    let out = extract(&Stylesheet::parse("@import 'a.css' print;\n@import 'b.css';"), &settings);
    assert_eq!(urls(&out), vec!["b.css"]);
    assert_eq!(out.references[0].index, 0);
    assert!(out.warnings.is_empty());
}

#[test]
fn ignore_comments_skip_directives_silently() {
    let out = imports_only(
        "@import /* webpackIgnore: true */ 'a.css';\n/* webpackIgnore: true */\n@import 'b.css';\n/* webpackIgnore: false */ @import 'c.css';",
    );
    assert_eq!(urls(&out), vec!["c.css"]);
    assert!(out.warnings.is_empty());
}

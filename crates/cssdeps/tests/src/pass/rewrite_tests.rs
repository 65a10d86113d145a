use crate::extract::{ExtractSettings, extract};
use crate::syntax::Stylesheet;

use super::*;

fn rewrite_all(
    source: &str,
    name: impl Fn(usize) -> String,
) -> String {
    let mut extraction = extract(&Stylesheet::parse(source), &ExtractSettings::default());
    let rewrites: Vec<(RewriteHandle, String)> =
        extraction.references.iter().map(|r| (r.handle, name(r.index))).collect();
    apply(source, &mut extraction.values, &rewrites)
}

#[test]
fn replaces_nodes_and_keeps_surrounding_text() {
    let source = "a {\n  background: url( x.png ) no-repeat,  url('y.png');\n  color: red;\n}";
    let out = rewrite_all(source, |index| format!("___R{index}___"));
    assert_eq!(out, "a {\n  background: url( ___R0___ ) no-repeat,  url(___R1___);\n  color: red;\n}");
}

#[test]
fn removes_directives_with_leading_whitespace() {
    let source = "@import 'a.css';\n@import url(b.css) print;\n\n.a { b: url(c.png) }";
    let out = rewrite_all(source, |index| format!("___R{index}___"));
    assert_eq!(out, "\n\n.a { b: url(___R2___) }");

    let source = ".a {}\n  @import 'a.css';\n.b {}";
    assert_eq!(rewrite_all(source, |_| String::new()), ".a {}\n.b {}");
}

#[test]
fn image_set_strings_become_bare_words() {
    let source = ".a { b: image-set(\"a.png\" 1x, url(\"b.png\") 2x) }";
    let out = rewrite_all(source, |index| format!("___R{index}___"));
    assert_eq!(out, ".a { b: image-set(___R0___ 1x, url(___R1___) 2x) }");
}

#[test]
fn untouched_source_is_unchanged() {
    let source = ".a { b: /* webpackIgnore: true */ url(y.png) }\n@media print { @import 'x.css'; }";
    assert_eq!(rewrite_all(source, |_| "unused".to_string()), source);
}

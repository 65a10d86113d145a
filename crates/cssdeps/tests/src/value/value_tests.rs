use expect_test::{Expect, expect};

use super::*;

fn check(
    input: &str,
    expected: Expect,
) {
    let tree = ValueTree::parse(input);
    expected.assert_eq(&format!("{tree:?}"));
    assert_eq!(tree.stringify(), input);
}

#[test]
fn quoted_url_function() {
    check(
        "url( 'x.png' ) no-repeat",
        expect![[r#"
            Function "url" before=" " after=" "
              String ' "x.png"
            Space " "
            Word "no-repeat"
        "#]],
    );
}

#[test]
fn unquoted_url_is_one_word() {
    check(
        "url( a b.png )",
        expect![[r#"
            Function "url" before=" " after=" "
              Word "a b.png"
        "#]],
    );
    check(
        "URL(data:image/svg+xml;utf8,<svg\\)/>)",
        expect![[r#"
            Function "URL" before="" after=""
              Word "data:image/svg+xml;utf8,<svg\\)/>"
        "#]],
    );
}

#[test]
fn empty_url_has_no_children() {
    check(
        "url()",
        expect![[r#"
            Function "url" before="" after=""
        "#]],
    );
}

#[test]
fn image_set_candidates() {
    check(
        "-webkit-image-set(url(a.png) 1x, \"b.png\" 2x)",
        expect![[r#"
            Function "-webkit-image-set" before="" after=""
              Function "url" before="" after=""
                Word "a.png"
              Space " "
              Word "1x"
              Div "," before="" after=" "
              String " "b.png"
              Space " "
              Word "2x"
        "#]],
    );
}

#[test]
fn import_params_with_media() {
    check(
        "\"a.css\" screen and (orientation : landscape)",
        expect![[r#"
            String " "a.css"
            Space " "
            Word "screen"
            Space " "
            Word "and"
            Space " "
            Function "" before="" after=""
              Word "orientation"
              Div ":" before=" " after=" "
              Word "landscape"
        "#]],
    );
}

#[test]
fn slash_inside_calc_is_a_word() {
    check(
        "calc(1px / 2) / 3",
        expect![[r#"
            Function "calc" before="" after=""
              Word "1px"
              Space " "
              Word "/"
              Space " "
              Word "2"
            Div "/" before=" " after=" "
            Word "3"
        "#]],
    );
}

#[test]
fn unclosed_constructs() {
    check(
        "url(a.png   ",
        expect![[r#"
            Function "url" before="" after="" unclosed
              Word "a.png"
              Space "   "
        "#]],
    );
    check(
        "'abc",
        expect![[r#"
            String ' "abc" unclosed
        "#]],
    );
    check(
        "foo(bar /* note",
        expect![[r#"
            Function "foo" before="" after="" unclosed
              Word "bar"
              Space " "
              Comment " note"
        "#]],
    );
}

#[test]
fn unicode_range_and_stray_paren() {
    check(
        "U+0025-00FF )",
        expect![[r#"
            UnicodeRange "U+0025-00FF"
            Space " "
            Word ")"
        "#]],
    );
}

#[test]
fn stringify_is_lossless() {
    let inputs = [
        "",
        "  url(  \"a.png\"  )  ,  url(b.png)",
        "\"a\\\"b\" 'c\\'d'",
        "image-set( 'a.png' 1x , url( b.png ) 2x )",
        "/* webpackIgnore: true */ url(x)",
        "rgba(0,0,0,.5) 1px/2px",
        "url(\\)",
        "😸 url(😸.png)",
    ];
    for input in inputs {
        assert_eq!(ValueTree::parse(input).stringify(), input, "input: {input:?}");
    }
}

#[test]
fn walk_skips_handled_functions() {
    let tree = ValueTree::parse("url(a) image-set(url(b) 1x) calc(1px)");
    let mut seen = Vec::new();
    tree.walk(|tree, id, _, _| {
        let node = tree.node(id);
        seen.push(node.value.clone());
        if node.is_function_named("url") { Walk::Skip } else { Walk::Continue }
    });
    assert_eq!(seen, vec!["url", " ", "image-set", "url", " ", "1x", " ", "calc", "1px"]);
}

#[test]
fn walk_reports_sibling_position() {
    let tree = ValueTree::parse("image-set(\"a.png\" 1x)");
    let mut positions = Vec::new();
    tree.walk(|tree, id, index, siblings| {
        if tree.node(id).is_string() {
            positions.push((index, siblings.len()));
        }
        Walk::Continue
    });
    assert_eq!(positions, vec![(0, 3)]);
}

#[test]
fn replace_with_word_rewrites_in_place() {
    let mut tree = ValueTree::parse("url(a.png) no-repeat, image-set('b.png' 1x)");
    let mut targets = Vec::new();
    tree.walk(|tree, id, _, _| {
        let node = tree.node(id);
        if node.is_function_named("url") {
            targets.push(id);
            return Walk::Skip;
        }
        if node.is_string() {
            targets.push(id);
        }
        Walk::Continue
    });
    tree.replace_with_word(targets[0], "url(___A___)");
    tree.replace_with_word(targets[1], "\"___B___\"");
    assert_eq!(tree.stringify(), "url(___A___) no-repeat, image-set(\"___B___\" 1x)");
}

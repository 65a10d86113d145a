use super::*;

#[test]
fn trims_css_whitespace() {
    assert_eq!(normalize_url("  \t./a.png\n ", false), "./a.png");
}

#[test]
fn strips_escaped_newlines_in_strings_only() {
    assert_eq!(normalize_url("./a\\\nb.png", true), "./ab.png");
    assert_eq!(normalize_url("./a\\\r\nb.png", true), "./ab.png");
    assert_eq!(normalize_url("./a\\\nb.png", false), "./a\nb.png");
}

#[test]
fn decodes_css_escapes() {
    assert_eq!(unescape_css("img\\(1\\).png"), "img(1).png");
    assert_eq!(unescape_css("\\66 oo.png"), "foo.png");
    assert_eq!(unescape_css("\\1F638.png"), "😸.png");
    assert_eq!(unescape_css("\\0 x"), "\u{FFFD}x");
    assert_eq!(unescape_css("trailing\\"), "trailing\\");
    assert!(matches!(unescape_css("plain.png"), Cow::Borrowed(_)));
}

#[test]
fn decodes_percent_encoding_like_decode_uri() {
    assert_eq!(decode_uri("a%20b.png").as_deref(), Some("a b.png"));
    assert_eq!(decode_uri("%F0%9F%98%B8.png").as_deref(), Some("😸.png"));
    assert_eq!(decode_uri("a%23b%3Fc").as_deref(), Some("a%23b%3Fc"));
    assert_eq!(decode_uri("100%"), None);
    assert_eq!(decode_uri("%E0%A4%A"), None);
    assert_eq!(decode_uri("%C3%28"), None);
}

#[test]
fn malformed_percent_encoding_is_kept() {
    assert_eq!(normalize_url("./100%.png", false), "./100%.png");
    assert_eq!(normalize_url("./a%20b.png", true), "./a b.png");
}

#[test]
fn windows_paths_are_not_unescaped() {
    assert_eq!(normalize_url(" C:\\assets\\a%20b.png ", false), "C:\\assets\\a%20b.png");
    assert_eq!(normalize_url("\\\\server\\share\\a.png", true), "\\\\server\\share\\a.png");
}

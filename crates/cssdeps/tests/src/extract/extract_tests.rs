use super::*;

fn run(
    source: &str,
    settings: &ExtractSettings,
) -> Extraction {
    extract(&Stylesheet::parse(source), settings)
}

const SHEET: &str = "a { b: url(x.png) }\n@import 'a.css';\nc { d: url(y.png) }";

#[test]
fn imports_come_first_in_sequence() {
    let out = run(SHEET, &ExtractSettings::default());
    let order: Vec<(ReferenceKind, usize, &str)> =
        out.references.iter().map(|r| (r.kind, r.index, r.url.as_str())).collect();
    assert_eq!(
        order,
        vec![
            (ReferenceKind::Import, 0, "a.css"),
            (ReferenceKind::UrlFunction, 1, "x.png"),
            (ReferenceKind::UrlFunction, 2, "y.png"),
        ]
    );
}

#[test]
fn extractors_can_be_disabled() {
    let no_imports = ExtractSettings {
        import: false,
        ..ExtractSettings::default()
    };
    let out = run(SHEET, &no_imports);
    assert_eq!(out.references.len(), 2);
    assert_eq!(out.references[0].index, 0);

    let no_urls = ExtractSettings {
        url: false,
        ..ExtractSettings::default()
    };
    let out = run(SHEET, &no_urls);
    assert_eq!(out.references.len(), 1);
    assert!(out.values.is_empty());
}

#[test]
fn warning_display_has_position() {
    let out = run("\n\n  @import foo;", &ExtractSettings::default());
    assert_eq!(out.warnings[0].to_string(), "3:3: Unable to find uri in \"@import foo\"");
}

#[test]
fn serializes_kinds_in_kebab_case() {
    assert_eq!(serde_json::to_string(&ReferenceKind::UrlString).unwrap(), "\"url-string\"");
    assert_eq!(serde_json::to_string(&WarningKind::MalformedDirective).unwrap(), "\"malformed-directive\"");
    let literal: LiteralUrls = serde_json::from_str("\"rewrite\"").unwrap();
    assert_eq!(literal, LiteralUrls::Rewrite);
}

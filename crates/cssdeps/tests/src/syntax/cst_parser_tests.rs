    use super::*;
    use crate::syntax::cst::SyntaxNode;

    fn check(input: &str, expected_tree: &str) {
        let parser = Parser::new(input);
        let green = parser.parse();
        let node = SyntaxNode::new_root(green);
        let actual_tree = format!("{:#?}", node);

        // Normalize newlines and trim
        let actual_tree = actual_tree.trim();
        let expected_tree = expected_tree.trim();

        assert_eq!(actual_tree, expected_tree);
    }

    fn round_trip(input: &str) -> String {
        SyntaxNode::new_root(Parser::new(input).parse()).to_string()
    }

    #[test]
    fn test_empty() {
        check("", "Root@0..0");
    }

    #[test]
    fn test_import_directive() {
        check(
            "@import \"a.css\";",
            r#"
Root@0..16
  AtRule@0..16
    AtKeyword@0..7 "@import"
    AtRulePrelude@7..15
      Whitespace@7..8 " "
      String@8..15 "\"a.css\""
    Semicolon@15..16 ";"
"#,
        );
    }

    #[test]
    fn test_rule_with_declaration() {
        check(
            "a { color: red; }",
            r#"
Root@0..17
  Rule@0..17
    Selector@0..2
      Word@0..1 "a"
      Whitespace@1..2 " "
    Block@2..17
      LBrace@2..3 "{"
      Whitespace@3..4 " "
      Declaration@4..15
        Property@4..9
          Word@4..9 "color"
        Colon@9..10 ":"
        Whitespace@10..11 " "
        Value@11..14
          Word@11..14 "red"
        Semicolon@14..15 ";"
      Whitespace@15..16 " "
      RBrace@16..17 "}"
"#,
        );
    }

    #[test]
    fn test_declaration_value_excludes_trailing_whitespace() {
        check(
            "a{b:c }",
            r#"
Root@0..7
  Rule@0..7
    Selector@0..1
      Word@0..1 "a"
    Block@1..7
      LBrace@1..2 "{"
      Declaration@2..6
        Property@2..3
          Word@2..3 "b"
        Colon@3..4 ":"
        Value@4..5
          Word@4..5 "c"
        Whitespace@5..6 " "
      RBrace@6..7 "}"
"#,
        );
    }

    #[test]
    fn test_pseudo_selector_is_nested_rule() {
        check(
            "@media x{a:hover{}}",
            r#"
Root@0..19
  AtRule@0..19
    AtKeyword@0..6 "@media"
    AtRulePrelude@6..8
      Whitespace@6..7 " "
      Word@7..8 "x"
    Block@8..19
      LBrace@8..9 "{"
      Rule@9..18
        Selector@9..16
          Word@9..10 "a"
          Colon@10..11 ":"
          Word@11..16 "hover"
        Block@16..18
          LBrace@16..17 "{"
          RBrace@17..18 "}"
      RBrace@18..19 "}"
"#,
        );
    }

    #[test]
    fn test_data_uri_does_not_end_declaration() {
        check(
            "a{b:url(x;y)}",
            r#"
Root@0..13
  Rule@0..13
    Selector@0..1
      Word@0..1 "a"
    Block@1..13
      LBrace@1..2 "{"
      Declaration@2..12
        Property@2..3
          Word@2..3 "b"
        Colon@3..4 ":"
        Value@4..12
          Url@4..12 "url(x;y)"
      RBrace@12..13 "}"
"#,
        );
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let inputs = [
            "@charset \"UTF-8\";\n .class { a: b c d; }",
            ":root {--foo: 1px;\n--bar: 2px;}",
            "body { font-family: '😸'; }",
            "@import url(a.css) screen and (orientation:landscape);",
            ".a { background: /* webpackIgnore: true */ url( 'x.png' ) , url(\"y\") }",
            "a { b: c",
            "}} ;; @import",
            "@font-face { src: url(a.woff2) format('woff2'), url(\"a.woff\"); }",
            ".u-m\\+ { content: \"\\F10C\" }",
            "/* unterminated",
        ];
        for input in inputs {
            assert_eq!(round_trip(input), input);
        }
    }

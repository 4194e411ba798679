#[cfg(test)]
mod scanner_tests {
    use pretty_assertions::assert_eq;
    use rox as lox;

    use lox::error::ErrorKind;
    use lox::scanner::*;
    use lox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_char_operators() {
        assert_token_sequence(
            "! != = == < <= > >= /",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "class fun var _tmp orchid or nil",
            &[
                (TokenType::CLASS, "class"),
                (TokenType::FUN, "fun"),
                (TokenType::VAR, "var"),
                (TokenType::IDENTIFIER, "_tmp"),
                (TokenType::IDENTIFIER, "orchid"),
                (TokenType::OR, "or"),
                (TokenType::NIL, "nil"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_comments_produce_no_tokens() {
        let (tokens, errors) = Scanner::new("// nothing here\nprint 1; // trailing").scan_tokens();

        assert!(errors.is_empty());
        let kinds: Vec<&str> = tokens.iter().map(|t| t.kind_name()).collect();
        assert_eq!(kinds, vec!["PRINT", "NUMBER", "SEMICOLON", "EOF"]);
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn test_scanner_05_numbers() {
        let (tokens, _) = Scanner::new("123 45.67 8.").scan_tokens();

        assert!(matches!(tokens[0].token_type, TokenType::NUMBER(n) if n == 123.0));
        assert!(matches!(tokens[1].token_type, TokenType::NUMBER(n) if n == 45.67));
        // A trailing dot is not part of the number.
        assert!(matches!(tokens[2].token_type, TokenType::NUMBER(n) if n == 8.0));
        assert_eq!(tokens[3].token_type, TokenType::DOT);

        assert_eq!(tokens[0].to_string(), "NUMBER 123 123.0");
        assert_eq!(tokens[1].to_string(), "NUMBER 45.67 45.67");
    }

    #[test]
    fn test_scanner_05b_large_whole_numbers_keep_decimal() {
        let (tokens, _) = Scanner::new("1000000000000000").scan_tokens();

        assert_eq!(
            tokens[0].to_string(),
            "NUMBER 1000000000000000 1000000000000000.0"
        );
    }

    #[test]
    fn test_scanner_06_leading_dot_is_not_a_number() {
        assert_token_sequence(
            ".5",
            &[
                (TokenType::DOT, "."),
                (TokenType::NUMBER(0.0), "5"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_07_multiline_string() {
        let (tokens, errors) = Scanner::new("\"one\ntwo\" x").scan_tokens();

        assert!(errors.is_empty());
        match &tokens[0].token_type {
            TokenType::STRING(s) => assert_eq!(s, "one\ntwo"),
            other => panic!("expected string, got {:?}", other),
        }
        assert_eq!(tokens[0].to_string(), "STRING \"one\ntwo\" one\ntwo");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_scanner_08_unterminated_string_reports_opening_line() {
        let (tokens, errors) = Scanner::new("var a;\n\"never\nclosed").scan_tokens();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), ErrorKind::Lexical);
        assert_eq!(errors[0].line(), Some(2));
        assert_eq!(errors[0].to_string(), "[line 2] Error: Unterminated string.");
        assert_eq!(tokens.last().map(|t| t.token_type.clone()), Some(TokenType::EOF));
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let scanner = Scanner::new(source);

        // Collect all results (both tokens and errors)
        let results: Vec<_> = scanner.collect();

        // 0: COMMA ','
        // 1: DOT '.'
        // 2: Error for '$'
        // 3: LEFT_PAREN '('
        // 4: Error for '#'
        // 5: EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let errors: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .map(|e| e.to_string())
            .collect();

        assert_eq!(
            errors,
            vec![
                "[line 1] Error: Unexpected character: $".to_string(),
                "[line 1] Error: Unexpected character: #".to_string(),
            ]
        );

        fn assert_token_matches(
            result: &lox::error::Result<Token>,
            expected_type: TokenType,
            expected_lexeme: &str,
        ) {
            match result {
                Ok(token) => {
                    assert_eq!(
                        token.token_type, expected_type,
                        "Expected token type {:?}, got {:?}",
                        expected_type, token.token_type
                    );
                    assert_eq!(
                        token.lexeme, expected_lexeme,
                        "Expected lexeme '{}', got '{}'",
                        expected_lexeme, token.lexeme
                    );
                }
                Err(e) => panic!("Expected token but got error: {}", e),
            }
        }
    }

    #[test]
    fn test_scanner_09_non_ascii_outside_string() {
        let (tokens, errors) = Scanner::new("a é b \"ü\"").scan_tokens();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Unexpected character: é");
        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["a", "b", "\"ü\"", ""]);
    }

    #[test]
    fn test_scanner_11_tokens_serialize_to_json() {
        let (tokens, _) = Scanner::new("x = 2;").scan_tokens();

        let lines: Vec<String> = tokens
            .iter()
            .map(|t| serde_json::to_string(t).expect("token serializes"))
            .collect();

        assert_eq!(
            lines,
            vec![
                r#"{"token_type":"IDENTIFIER","lexeme":"x","line":1}"#,
                r#"{"token_type":"EQUAL","lexeme":"=","line":1}"#,
                r#"{"token_type":{"NUMBER":2.0},"lexeme":"2","line":1}"#,
                r#"{"token_type":"SEMICOLON","lexeme":";","line":1}"#,
                r#"{"token_type":"EOF","lexeme":"","line":1}"#,
            ]
        );
    }

    #[test]
    fn test_scanner_10_fused_after_eof() {
        let mut scanner = Scanner::new("");

        assert!(matches!(scanner.next(), Some(Ok(ref t)) if t.token_type == TokenType::EOF));
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }
}

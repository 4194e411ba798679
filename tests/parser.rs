#[cfg(test)]
mod parser_tests {
    use pretty_assertions::assert_eq;
    use rox as lox;

    use lox::ast_printer::AstPrinter;
    use lox::error::{ErrorKind, LoxError};
    use lox::expr::Expr;
    use lox::parser::Parser;
    use lox::scanner::Scanner;
    use lox::stmt::Stmt;

    fn parse(source: &str) -> Result<Vec<Stmt>, Vec<LoxError>> {
        let (tokens, errors) = Scanner::new(source).scan_tokens();
        assert!(errors.is_empty(), "unexpected lexical errors: {:?}", errors);
        Parser::new(tokens).parse()
    }

    fn printed(source: &str) -> Vec<String> {
        parse(source)
            .unwrap_or_else(|e| panic!("parse failed: {:?}", e))
            .iter()
            .map(AstPrinter::print_stmt)
            .collect()
    }

    fn parse_errors(source: &str) -> Vec<String> {
        match parse(source) {
            Ok(_) => panic!("expected parse errors for {:?}", source),
            Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn precedence_and_grouping() {
        let (tokens, _) = Scanner::new("-123 * (45.67)").scan_tokens();
        let expr = Parser::new(tokens).parse_expression().unwrap();

        assert_eq!(AstPrinter::print(&expr), "(* (- 123.0) (group 45.67))");
    }

    #[test]
    fn binary_operators_are_left_associative() {
        assert_eq!(printed("1 - 2 - 3;"), vec!["(; (- (- 1.0 2.0) 3.0))"]);
        assert_eq!(
            printed("1 + 2 * 3 == 7 and !false or nil;"),
            vec!["(; (or (and (== (+ 1.0 (* 2.0 3.0)) 7.0) (! false)) nil))"]
        );
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(printed("a = b = 1;"), vec!["(; (= a (= b 1.0)))"]);
    }

    #[test]
    fn property_set_is_a_valid_target() {
        assert_eq!(
            printed("point.x = 3;"),
            vec!["(; (= (. point x) 3.0))"]
        );
    }

    #[test]
    fn invalid_assignment_target() {
        assert_eq!(
            parse_errors("1 + 2 = 3;"),
            vec!["[line 1] Error at '=': Invalid assignment target."]
        );
    }

    #[test]
    fn for_loop_desugars_to_while_in_block() {
        assert_eq!(
            printed("for (var i = 0; i < 3; i = i + 1) print i;"),
            vec![
                "(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"
            ]
        );
        assert_eq!(
            printed("for (;;) print 1;"),
            vec!["(block (while true (print 1.0)))"]
        );
    }

    #[test]
    fn class_with_superclass_and_methods() {
        assert_eq!(
            printed("class B < A { init(x) { this.x = x; } get() { return super.get(); } }"),
            vec![
                "(class B < A (method init(x) (; (= (. this x) x))) (method get() (return (call (super get)))))"
            ]
        );
    }

    #[test]
    fn missing_semicolon_reports_at_end() {
        assert_eq!(
            parse_errors("print 1"),
            vec!["[line 1] Error at end: Expected ';' after value."]
        );
    }

    #[test]
    fn synchronizes_and_reports_independent_errors() {
        let errors = parse_errors("var = 1;\nprint 2;\nvar b = ;\nprint 3;");

        assert_eq!(
            errors,
            vec![
                "[line 1] Error at '=': Expected variable name.",
                "[line 3] Error at ';': Expected expression.",
            ]
        );
    }

    #[test]
    fn error_inside_block_does_not_cascade() {
        let errors = parse_errors("{\n  var x = );\n  print x;\n}\nprint 1;");

        assert_eq!(errors, vec!["[line 2] Error at ')': Expected expression."]);
    }

    #[test]
    fn argument_cap_is_reported_but_parsing_continues() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});\nprint ;", args.join(", "));

        let (tokens, _) = Scanner::new(&source).scan_tokens();
        let errors = Parser::new(tokens).parse().unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind(), ErrorKind::Syntax);
        assert_eq!(errors[0].message(), "Can't have more than 255 arguments.");
        assert_eq!(errors[1].to_string(), "[line 2] Error at ';': Expected expression.");
    }

    #[test]
    fn parameter_cap_is_reported() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));

        let errors = parse_errors(&source);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Can't have more than 255 parameters."));
    }

    #[test]
    fn variable_references_get_distinct_ids() {
        let stmts = parse("a; a;").unwrap();

        let ids: Vec<_> = stmts
            .iter()
            .map(|s| match s {
                Stmt::Expression(Expr::Variable { id, .. }) => *id,
                other => panic!("unexpected statement {:?}", other),
            })
            .collect();

        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn ids_continue_from_first_id() {
        let (tokens, _) = Scanner::new("x;").scan_tokens();
        let mut parser = Parser::new(tokens).with_first_id(40);
        let stmts = parser.parse().unwrap();

        assert!(matches!(
            &stmts[0],
            Stmt::Expression(Expr::Variable { id, .. }) if id.0 == 40
        ));
        assert_eq!(parser.next_id(), 41);
    }

    #[test]
    fn super_requires_method_name() {
        assert_eq!(
            parse_errors("super;"),
            vec!["[line 1] Error at ';': Expected '.' after 'super'."]
        );
    }
}

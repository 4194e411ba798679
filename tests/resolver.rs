#[cfg(test)]
mod resolver_tests {
    use pretty_assertions::assert_eq;
    use rox as lox;

    use lox::error::ErrorKind;
    use lox::expr::ExprId;
    use lox::parser::Parser;
    use lox::resolver::{Locals, Resolver};
    use lox::scanner::Scanner;
    use lox::stmt::Stmt;

    fn parse(source: &str) -> Vec<Stmt> {
        let (tokens, errors) = Scanner::new(source).scan_tokens();
        assert!(errors.is_empty());
        Parser::new(tokens).parse().expect("source parses")
    }

    fn resolve(source: &str) -> Locals {
        Resolver::new()
            .resolve(&parse(source))
            .unwrap_or_else(|e| panic!("resolution failed: {:?}", e))
    }

    fn resolve_errors(source: &str) -> Vec<String> {
        match Resolver::new().resolve(&parse(source)) {
            Ok(_) => panic!("expected resolution errors for {:?}", source),
            Err(errors) => {
                assert!(errors.iter().all(|e| e.kind() == ErrorKind::Resolution));
                errors.iter().map(|e| e.to_string()).collect()
            }
        }
    }

    #[test]
    fn globals_are_left_unannotated() {
        let locals = resolve("var a = 1; print a; a = 2;");

        assert!(locals.is_empty());
    }

    #[test]
    fn distances_count_enclosing_scopes() {
        // ids in source order: a (print, depth 0), a (print, depth 1), a (print, depth 2)
        let locals = resolve("{ var a = 1; print a; { print a; { print a; } } }");

        assert_eq!(locals.get(&ExprId(0)), Some(&0));
        assert_eq!(locals.get(&ExprId(1)), Some(&1));
        assert_eq!(locals.get(&ExprId(2)), Some(&2));
    }

    #[test]
    fn function_parameters_and_closures() {
        let locals = resolve(
            "fun make() { var count = 0; fun inc() { count = count + 1; return count; } return inc; }",
        );

        // `count = count + 1`: the inner `count` read (id 1) and the assignment
        // (id 0) both sit one function scope away from the declaration.
        assert_eq!(locals.get(&ExprId(0)), Some(&1));
        assert_eq!(locals.get(&ExprId(1)), Some(&1));
        // `return count;`
        assert_eq!(locals.get(&ExprId(2)), Some(&1));
        // `return inc;` is in the same scope as `fun inc`.
        assert_eq!(locals.get(&ExprId(3)), Some(&0));
    }

    #[test]
    fn self_reference_in_initializer_is_an_error() {
        assert_eq!(
            resolve_errors("{ var a = a; }"),
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn global_self_reference_is_allowed() {
        resolve("var a = a;");
    }

    #[test]
    fn redeclaration_in_same_scope() {
        assert_eq!(
            resolve_errors("fun f() { var a = 1; var a = 2; }"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn return_outside_function() {
        assert_eq!(
            resolve_errors("return 1;"),
            vec!["[line 1] Error at 'return': Can't return from top-level code."]
        );
    }

    #[test]
    fn multiple_errors_are_reported_together() {
        let errors = resolve_errors("return;\n{ var b = b; }\nprint this;");

        assert_eq!(
            errors,
            vec![
                "[line 1] Error at 'return': Can't return from top-level code.",
                "[line 2] Error at 'b': Can't read local variable in its own initializer.",
                "[line 3] Error at 'this': Can't use 'this' outside of a class.",
            ]
        );
    }

    #[test]
    fn class_rules() {
        assert_eq!(
            resolve_errors("class A < A {}"),
            vec!["[line 1] Error at 'A': A class can't inherit from itself."]
        );
        assert_eq!(
            resolve_errors("class A { f() { super.f(); } }"),
            vec!["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
        );
        assert_eq!(
            resolve_errors("fun f() { super.g(); }"),
            vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
        );
        assert_eq!(
            resolve_errors("class A { init() { return 1; } }"),
            vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
        );
    }

    #[test]
    fn bare_return_in_initializer_is_allowed() {
        resolve("class A { init() { return; } }");
    }

    #[test]
    fn this_and_super_resolve_to_the_method_scope() {
        // ids: B's superclass A (0), this (1), super (2)
        let locals = resolve("class A {} class B < A { m() { this; super.m(); } }");

        assert_eq!(locals.get(&ExprId(0)), None);
        assert_eq!(locals.get(&ExprId(1)), Some(&1));
        assert_eq!(locals.get(&ExprId(2)), Some(&1));
    }

    #[test]
    fn re_resolution_is_idempotent() {
        let program = parse(
            "fun outer() { var x = 1; fun inner() { { print x; } } return inner; }
             class P { init(v) { this.v = v; } }
             { var y = 2; { y = y + 1; } }",
        );

        let first = Resolver::new().resolve(&program).unwrap();
        let second = Resolver::new().resolve(&program).unwrap();

        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}

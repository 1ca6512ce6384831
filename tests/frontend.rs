use moonlang::{ast::{Expr, Statement},
               error::RunError,
               interpreter::{environment::Environment,
                             evaluator::{Evaluator, ModuleLoader, register_builtins},
                             lexer::{Lexer, Token, TokenKind},
                             parser::Parser},
               run_source};
use pretty_assertions::assert_eq;

/// Collects every token kind up to end of input.
fn kinds(source: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(source);
    let mut out = Vec::new();
    loop {
        let token = lexer.next_token();
        if token.kind == TokenKind::Eof {
            break;
        }
        out.push(token.kind);
    }
    out
}

/// Collects every token up to end of input.
fn tokens(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut out = Vec::new();
    loop {
        let token = lexer.next_token();
        if token.kind == TokenKind::Eof {
            break;
        }
        out.push(token);
    }
    out
}

/// Parses a source string expected to contain a single expression statement.
fn parse_expr(source: &str) -> Expr {
    let (program, errors) = Parser::new(Lexer::new(source)).parse_program();
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");

    match program.statements.into_iter().next() {
        Some(Statement::Expression { expr, .. }) => expr,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

/// Returns the parse diagnostics for a source string.
fn parse_errors(source: &str) -> Vec<String> {
    let (_, errors) = Parser::new(Lexer::new(source)).parse_program();
    errors.iter().map(ToString::to_string).collect()
}

#[test]
fn keywords_and_literals_tokenize() {
    assert_eq!(kinds("def x = 5"),
               vec![TokenKind::Def, TokenKind::Ident, TokenKind::Assign, TokenKind::Integer]);
    assert_eq!(kinds("fun struct extend match import"),
               vec![TokenKind::Fun,
                    TokenKind::Struct,
                    TokenKind::Extend,
                    TokenKind::Match,
                    TokenKind::Import]);
    assert_eq!(kinds("Some None Ok Error Mutable true false"),
               vec![TokenKind::Some,
                    TokenKind::None,
                    TokenKind::Ok,
                    TokenKind::Error,
                    TokenKind::Mutable,
                    TokenKind::True,
                    TokenKind::False]);
    // A keyword prefix does not break identifiers.
    assert_eq!(kinds("define forever"), vec![TokenKind::Ident, TokenKind::Ident]);
}

#[test]
fn two_character_operators_win_over_single() {
    assert_eq!(kinds("a -> b"), vec![TokenKind::Ident, TokenKind::Arrow, TokenKind::Ident]);
    assert_eq!(kinds("a == b"),
               vec![TokenKind::Ident, TokenKind::AssignMut, TokenKind::Ident]);
    assert_eq!(kinds("a >= b <= c"),
               vec![TokenKind::Ident,
                    TokenKind::GreaterEqual,
                    TokenKind::Ident,
                    TokenKind::LessEqual,
                    TokenKind::Ident]);
    assert_eq!(kinds("a - b"), vec![TokenKind::Ident, TokenKind::Minus, TokenKind::Ident]);
}

#[test]
fn numbers_need_digits_on_both_sides_of_the_dot() {
    assert_eq!(kinds("3.14"), vec![TokenKind::Float]);
    assert_eq!(kinds("3."), vec![TokenKind::Integer, TokenKind::Dot]);
    assert_eq!(kinds("list.map"), vec![TokenKind::Ident, TokenKind::Dot, TokenKind::Ident]);
}

#[test]
fn newlines_are_tokens_and_comments_are_not() {
    assert_eq!(kinds("a\nb"), vec![TokenKind::Ident, TokenKind::Newline, TokenKind::Ident]);
    assert_eq!(kinds("a // trailing note\nb"),
               vec![TokenKind::Ident, TokenKind::Newline, TokenKind::Ident]);
}

#[test]
fn string_literals_keep_escapes_verbatim() {
    let toks = tokens("\"a\\nb\"");
    assert_eq!(toks.len(), 1);
    assert_eq!(toks[0].kind, TokenKind::Str);
    // The backslash-n stays as two characters; nothing is decoded.
    assert_eq!(toks[0].literal, "a\\nb");

    let toks = tokens("\"say \\\"hi\\\"\"");
    assert_eq!(toks[0].literal, "say \\\"hi\\\"");
}

#[test]
fn tokens_carry_one_based_positions() {
    let toks = tokens("def x\n  def y");

    assert_eq!((toks[0].line, toks[0].column), (1, 1));
    assert_eq!((toks[1].line, toks[1].column), (1, 5));
    // The newline token belongs to the line it ends.
    assert_eq!(toks[2].kind, TokenKind::Newline);
    assert_eq!(toks[2].line, 1);
    assert_eq!((toks[3].line, toks[3].column), (2, 3));
    assert_eq!((toks[4].line, toks[4].column), (2, 7));
}

#[test]
fn unrecognized_characters_become_illegal_tokens() {
    let toks = tokens("a @ b");
    assert_eq!(toks[1].kind, TokenKind::Illegal);
    assert_eq!(toks[1].literal, "@");
}

#[test]
fn precedence_shapes_the_tree() {
    assert_eq!(parse_expr("1 + 2 * 3").to_string(), "(1 + (2 * 3))");
    assert_eq!(parse_expr("1 + 2 + 3").to_string(), "((1 + 2) + 3)");
    assert_eq!(parse_expr("1 * 2 < 3 + 4").to_string(), "((1 * 2) < (3 + 4))");
    assert_eq!(parse_expr("a or b and c").to_string(), "(a or (b and c))");
    assert_eq!(parse_expr("not a and b").to_string(), "((not a) and b)");
    assert_eq!(parse_expr("a is not b").to_string(), "(a is (not b))");
    assert_eq!(parse_expr("-f(1)[0]").to_string(), "(-(f(1)[0]))");
    assert_eq!(parse_expr("(1 + 2) * 3").to_string(), "((1 + 2) * 3)");
}

#[test]
fn struct_literals_need_an_uppercase_head() {
    // Uppercase + brace reads as a struct literal...
    assert!(matches!(parse_expr("User { name: \"A\" }"),
                     Expr::StructLiteral { .. }));
    // ...lowercase stays an identifier and the brace starts a map literal.
    let (program, errors) = Parser::new(Lexer::new("user { 1: 2 }")).parse_program();
    assert!(errors.is_empty());
    assert_eq!(program.statements.len(), 2);
}

#[test]
fn braces_disambiguate_lambdas_and_maps() {
    assert!(matches!(parse_expr("{ x -> x * 2 }"), Expr::Lambda { .. }));
    assert!(matches!(parse_expr("{ a, b -> a + b }"), Expr::Lambda { .. }));
    assert!(matches!(parse_expr("{ \"k\": 1 }"), Expr::Map { .. }));
    assert!(matches!(parse_expr("{}"), Expr::Map { .. }));
}

#[test]
fn with_updates_get_their_own_node() {
    assert!(matches!(parse_expr("user.with { age: 31 }"), Expr::With { .. }));
    assert!(matches!(parse_expr("user.withdraw(10)"), Expr::Call { .. }));
}

#[test]
fn expected_token_diagnostics_are_stable() {
    assert_eq!(parse_errors("def = 5"),
               vec!["line 1: expected next token to be IDENT, got = instead"]);
    assert_eq!(parse_errors("fun f {"),
               vec!["line 1: expected next token to be (, got { instead"]);
    assert_eq!(parse_errors("*"), vec!["line 1: no prefix parse function for * found"]);
    assert_eq!(parse_errors("99999999999999999999"),
               vec!["line 1: could not parse \"99999999999999999999\" as integer"]);
    assert_eq!(parse_errors("1 == 2"), vec!["line 1: left side of == must be an identifier"]);
}

#[test]
fn parsing_recovers_at_statement_boundaries() {
    let errors = parse_errors("def = 1\ndef = 2\ndef ok = 3");
    assert_eq!(errors.len(), 2);
    assert!(errors[0].starts_with("line 1:"));
    assert!(errors[1].starts_with("line 2:"));
}

#[test]
fn parse_failures_stop_the_run_before_evaluation() {
    match run_source("def = 1") {
        Err(RunError::Parse(errors)) => assert_eq!(errors.len(), 1),
        other => panic!("expected parse failure, got {other:?}"),
    }
}

#[test]
fn imports_resolve_relative_to_the_base_path() {
    let mut loader = ModuleLoader::new();
    loader.set_base_path("tests/modules");

    let source = "import mathutil\nmathutil.double(21)";
    let (program, errors) = Parser::new(Lexer::new(source)).parse_program();
    assert!(errors.is_empty());

    let env = Environment::new();
    register_builtins(&env);
    let value = Evaluator::with_loader(loader).eval_program(&program, &env)
                                              .expect("import should evaluate");
    assert_eq!(value.to_string(), "42");
}

#[test]
fn module_exports_hide_underscored_names() {
    let mut loader = ModuleLoader::new();
    loader.set_base_path("tests/modules");

    let source = "import mathutil\nmathutil._secret";
    let (program, errors) = Parser::new(Lexer::new(source)).parse_program();
    assert!(errors.is_empty());

    let env = Environment::new();
    register_builtins(&env);
    let error = Evaluator::with_loader(loader).eval_program(&program, &env)
                                              .expect_err("private access should fail");
    assert_eq!(error.to_string(), "undefined export _secret in module mathutil");
}

#[test]
fn modules_evaluate_once_and_cache() {
    let mut loader = ModuleLoader::new();
    loader.set_base_path("tests/modules");

    // The counter script bumps a module-level cell at load time; two imports
    // must observe a single evaluation.
    let source = "import counter\nimport counter\ncounter.loads()";
    let (program, errors) = Parser::new(Lexer::new(source)).parse_program();
    assert!(errors.is_empty());

    let env = Environment::new();
    register_builtins(&env);
    let value = Evaluator::with_loader(loader).eval_program(&program, &env)
                                              .expect("imports should evaluate");
    assert_eq!(value.to_string(), "1");
}

#[test]
fn missing_modules_report_the_path() {
    let mut loader = ModuleLoader::new();
    loader.set_base_path("tests/modules");

    let (program, errors) = Parser::new(Lexer::new("import nowhere")).parse_program();
    assert!(errors.is_empty());

    let env = Environment::new();
    register_builtins(&env);
    let error = Evaluator::with_loader(loader).eval_program(&program, &env)
                                              .expect_err("load should fail");
    assert!(error.to_string().starts_with("cannot load module nowhere:"),
            "unexpected message: {error}");
}

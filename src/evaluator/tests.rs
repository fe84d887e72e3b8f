//! Unit tests for the evaluator module.
//!
//! This module contains tests for evaluating:
//! - Integer, boolean and string expressions
//! - Conditionals, `return` and `let`
//! - Functions, closures and recursion
//! - Arrays, hashes and indexing
//! - Builtins and runtime errors

use std::{cell::RefCell, io, io::Write, rc::Rc};

use crate::{
    ast::ast::{Expression, Statement},
    object::{
        environment::Environment,
        object::{Object, ObjectKind},
    },
    parser::parser::parse,
};

use super::evaluator::{EvalConfig, Evaluator, DEFAULT_MAX_CALL_DEPTH};

#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("utf-8 output")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn run_with(evaluator: &Evaluator, source: &str) -> Option<Object> {
    let (program, errors) = parse(source);
    assert!(errors.is_empty(), "parser errors for {}: {:?}", source, errors);

    evaluator.eval(&program, &Environment::new())
}

fn eval(source: &str) -> Object {
    run_with(&Evaluator::new(), source).expect("a value")
}

fn assert_integer(source: &str, expected: i64) {
    let result = eval(source);
    match result.kind() {
        ObjectKind::Integer(value) => assert_eq!(*value, expected, "source: {}", source),
        _ => panic!("expected integer for {}, got {:?}", source, result),
    }
}

fn assert_boolean(source: &str, expected: bool) {
    let result = eval(source);
    assert!(
        result.is(&Object::boolean(expected)),
        "expected {} for {}, got {:?}",
        expected,
        source,
        result
    );
}

fn assert_null(source: &str) {
    let result = eval(source);
    assert!(result.is(&Object::null()), "expected null for {}, got {:?}", source, result);
}

fn assert_error(source: &str, message: &str) {
    let result = eval(source);
    match result.kind() {
        ObjectKind::Error(actual) => assert_eq!(actual, message, "source: {}", source),
        _ => panic!("expected error for {}, got {:?}", source, result),
    }
}

#[test]
fn test_eval_integer_expression() {
    let cases = [
        ("5", 5),
        ("10", 10),
        ("-5", -5),
        ("-10", -10),
        ("5 + 5 + 5 + 5 - 10", 10),
        ("2 * 2 * 2 * 2 * 2", 32),
        ("-50 + 100 + -50", 0),
        ("5 * 2 + 10", 20),
        ("5 + 2 * 10", 25),
        ("20 + 2 * -10", 0),
        ("50 / 2 * 2 + 10", 60),
        ("2 * (5 + 10)", 30),
        ("3 * 3 * 3 + 10", 37),
        ("3 * (3 * 3) + 10", 37),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
    ];

    for (source, expected) in cases {
        assert_integer(source, expected);
    }
}

#[test]
fn test_integer_division_truncates() {
    assert_integer("7 / 2", 3);
    assert_integer("-7 / 2", -3);
    assert_integer("7 / -2", -3);
    assert_error("1 / 0", "division by zero");
    assert_error("let zero = 0; 10 / zero", "division by zero");
}

#[test]
fn test_integer_arithmetic_wraps() {
    assert_integer("9223372036854775807 + 1", i64::MIN);
    assert_integer("-9223372036854775807 - 2", i64::MAX);
}

#[test]
fn test_eval_boolean_expression() {
    let cases = [
        ("true", true),
        ("false", false),
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 < 1", false),
        ("1 > 1", false),
        ("1 == 1", true),
        ("1 != 1", false),
        ("1 == 2", false),
        ("1 != 2", true),
        ("true == true", true),
        ("false == false", true),
        ("true == false", false),
        ("true != false", true),
        ("false != true", true),
        ("(1 < 2) == true", true),
        ("(1 < 2) == false", false),
        ("(1 > 2) == true", false),
        ("(1 > 2) == false", true),
    ];

    for (source, expected) in cases {
        assert_boolean(source, expected);
    }
}

#[test]
fn test_equality_across_types_uses_identity() {
    assert_boolean("1 == true", false);
    assert_boolean("1 != true", true);
    assert_boolean("[1] == [1]", false);
    assert_boolean("let a = [1]; a == a", true);
    assert_boolean("let f = fn() { 1 }; f == f", true);
    assert_boolean("if (false) { 1 } == if (false) { 2 }", true);
}

#[test]
fn test_bang_operator() {
    let cases = [
        ("!true", false),
        ("!false", true),
        ("!5", false),
        ("!!true", true),
        ("!!false", false),
        ("!!5", true),
        ("!0", false),
        ("!\"\"", false),
        ("!if (false) { 1 }", true),
    ];

    for (source, expected) in cases {
        assert_boolean(source, expected);
    }
}

#[test]
fn test_if_else_expressions() {
    assert_integer("if (true) { 10 }", 10);
    assert_null("if (false) { 10 }");
    assert_integer("if (1) { 10 }", 10);
    assert_integer("if (0) { 1 }", 1);
    assert_integer("if (1 < 2) { 10 }", 10);
    assert_null("if (1 > 2) { 10 }");
    assert_integer("if (1 > 2) { 10 } else { 20 }", 20);
    assert_integer("if (1 < 2) { 10 } else { 20 }", 10);
    assert_null("if (true) {}");
    assert_null("if (true) { let a = 1; }");
}

#[test]
fn test_return_statements() {
    let cases = [
        ("return 10;", 10),
        ("return 10; 9;", 10),
        ("return 2 * 5; 9;", 10),
        ("9; return 2 * 5; 9;", 10),
        ("if (10 > 1) { if (10 > 1) { return 10; } return 1; }", 10),
        (
            "let f = fn(x) { return x; x + 10; }; f(10);",
            10,
        ),
        (
            "let f = fn(x) { let result = x + 10; return result; return 10; }; f(10);",
            20,
        ),
        (
            "let f = fn() { if (true) { if (true) { return 1; } } return 2; }; f() + 10",
            11,
        ),
    ];

    for (source, expected) in cases {
        assert_integer(source, expected);
    }
}

#[test]
fn test_bare_return_yields_null() {
    assert_null("return;");
    assert_null("let f = fn() { return; 5 }; f()");
}

#[test]
fn test_error_handling() {
    let cases = [
        ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
        ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
        ("-true", "unknown operator: -BOOLEAN"),
        ("-\"a\"", "unknown operator: -STRING"),
        ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
        ("true + false + true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
        ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
        ("if (10 > 1) { true + false; }", "unknown operator: BOOLEAN + BOOLEAN"),
        (
            "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
            "unknown operator: BOOLEAN + BOOLEAN",
        ),
        ("foobar", "identifier not found: foobar"),
        ("\"Hello\" - \"World\"", "unknown operator: STRING - STRING"),
        ("\"a\" == \"a\"", "unknown operator: STRING == STRING"),
        ("\"a\" + 1", "type mismatch: STRING + INTEGER"),
        ("[1] + [2]", "unknown operator: ARRAY + ARRAY"),
        (
            "{\"name\": \"Monkey\"}[fn(x) { x }];",
            "unusable as hash key: FUNCTION",
        ),
        ("{fn(x) { x }: 1}", "unusable as hash key: FUNCTION"),
        ("{[1]: 1}", "unusable as hash key: ARRAY"),
        ("1(2)", "not a function INTEGER"),
        ("\"f\"()", "not a function STRING"),
        ("1[0]", "index operator not supported: INTEGER"),
        ("[1, 2][\"a\"]", "index operator not supported: ARRAY"),
        ("fn(x) { x }(1, 2)", "wrong number of arguments: want=1, got=2"),
        ("fn(x, y) { x }(1)", "wrong number of arguments: want=2, got=1"),
    ];

    for (source, message) in cases {
        assert_error(source, message);
    }
}

#[test]
fn test_errors_short_circuit_left_to_right() {
    assert_error("[1, foo, bar]", "identifier not found: foo");
    assert_error("let f = fn(a, b) { a }; f(x, y)", "identifier not found: x");
    assert_error("missing(1 + true)", "identifier not found: missing");
    assert_error("{\"a\": foo, bar: 1}", "identifier not found: foo");
    assert_error("{foo: bar}", "identifier not found: foo");
    assert_error("let a = b; a", "identifier not found: b");
}

#[test]
fn test_error_stops_later_side_effects() {
    let output = SharedBuffer::default();
    let evaluator = Evaluator::new().with_output(output.clone());

    let result = run_with(&evaluator, "puts(1); 1 + true; puts(2);").expect("a value");

    assert_eq!(result.inspect(), "ERROR: type mismatch: INTEGER + BOOLEAN");
    assert_eq!(output.contents(), "1\n");
}

#[test]
fn test_let_statements() {
    assert_integer("let a = 5; a;", 5);
    assert_integer("let a = 5 * 5; a;", 25);
    assert_integer("let a = 5; let b = a; b;", 5);
    assert_integer("let a = 5; let b = a; let c = a + b + 5; c;", 15);
    assert_integer("let a = 1; let a = a + 1; a", 2);

    assert!(run_with(&Evaluator::new(), "let a = 1;").is_none());
    assert!(run_with(&Evaluator::new(), "").is_none());
}

#[test]
fn test_function_object() {
    let result = eval("fn(x) { x + 2; };");

    let ObjectKind::Function(function) = result.kind() else {
        panic!("expected function, got {:?}", result);
    };
    assert_eq!(function.parameters.len(), 1);
    assert_eq!(function.parameters[0].value, "x");
    assert_eq!(function.body.to_string(), "(x + 2)");
    assert_eq!(result.inspect(), "fn(x) {\n(x + 2)\n}");
}

#[test]
fn test_function_application() {
    let cases = [
        ("let identity = fn(x) { x; }; identity(5);", 5),
        ("let identity = fn(x) { return x; }; identity(5);", 5),
        ("let double = fn(x) { x * 2; }; double(5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5, 5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20),
        ("fn(x) { x; }(5)", 5),
        (
            "let add = fn(a, b) { a + b }; let applyFunc = fn(a, b, func) { func(a, b) }; applyFunc(2, 2, add);",
            4,
        ),
    ];

    for (source, expected) in cases {
        assert_integer(source, expected);
    }
}

#[test]
fn test_empty_function_body_returns_null() {
    assert_null("fn() {}()");
    assert_null("let f = fn(x) { let y = x; }; f(1)");
}

#[test]
fn test_closures() {
    assert_integer(
        "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); addTwo(2);",
        4,
    );
    // A later global `x` does not change what the closure captured
    assert_integer(
        "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); let x = 100; addTwo(3);",
        5,
    );
}

#[test]
fn test_function_scope_does_not_leak() {
    assert_error("let f = fn() { let inner = 1; inner }; f(); inner", "identifier not found: inner");
    assert_integer("let x = 1; let f = fn(x) { x }; f(2); x", 1);
}

#[test]
fn test_recursion() {
    assert_integer(
        "let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } }; fib(15)",
        610,
    );
}

#[test]
fn test_call_depth_limit() {
    let evaluator = Evaluator::with_config(EvalConfig::default().with_max_call_depth(40));

    let result = run_with(&evaluator, "let f = fn(n) { f(n + 1) }; f(0)").expect("a value");
    assert_eq!(result.inspect(), "ERROR: maximum call depth of 40 exceeded");

    // The depth is back to zero for the next program
    let result = run_with(
        &evaluator,
        "let count = fn(n) { if (n == 0) { 0 } else { 1 + count(n - 1) } }; count(39)",
    )
    .expect("a value");
    assert_eq!(result.inspect(), "39");
}

#[test]
fn test_default_config() {
    assert_eq!(EvalConfig::default().max_call_depth, DEFAULT_MAX_CALL_DEPTH);
    assert_eq!(Evaluator::new().config().max_call_depth, 200);
}

#[test]
fn test_string_literal_and_concatenation() {
    let result = eval("\"Hello World!\"");
    assert!(matches!(result.kind(), ObjectKind::String(s) if s == "Hello World!"));

    let result = eval("\"Hello\" + \" \" + \"World!\"");
    assert!(matches!(result.kind(), ObjectKind::String(s) if s == "Hello World!"));
}

#[test]
fn test_builtin_functions() {
    assert_integer("len(\"\")", 0);
    assert_integer("len(\"four\")", 4);
    assert_integer("len(\"hello world\")", 11);
    assert_integer("len([1, 2, 3])", 3);
    assert_integer("len([])", 0);
    assert_integer("first([1, 2, 3])", 1);
    assert_integer("last([1, 2, 3])", 3);
    assert_null("first([])");
    assert_null("last([])");
    assert_null("rest([])");
    assert_eq!(eval("rest([1, 2, 3])").inspect(), "[2, 3]");
    assert_eq!(eval("rest([1])").inspect(), "[]");
    assert_eq!(eval("push([], 1)").inspect(), "[1]");
    assert_eq!(eval("push([1, 2], \"x\")").inspect(), "[1, 2, x]");
}

#[test]
fn test_builtin_errors() {
    let cases = [
        ("len(1)", "argument to `len` not supported, got INTEGER"),
        ("len(\"one\", \"two\")", "wrong number of arguments. got=2, want=1"),
        ("len()", "wrong number of arguments. got=0, want=1"),
        ("first(1)", "argument to `first` must be ARRAY, got INTEGER"),
        ("last(\"a\")", "argument to `last` must be ARRAY, got STRING"),
        ("rest(true)", "argument to `rest` must be ARRAY, got BOOLEAN"),
        ("push(1, 1)", "argument to `push` must be ARRAY, got INTEGER"),
        ("push([1])", "wrong number of arguments. got=1, want=2"),
    ];

    for (source, message) in cases {
        assert_error(source, message);
    }
}

#[test]
fn test_builtins_do_not_mutate_arguments() {
    assert_eq!(
        eval("let a = [1, 2, 3]; let b = push(a, 4); [a, b]").inspect(),
        "[[1, 2, 3], [1, 2, 3, 4]]"
    );
    assert_eq!(
        eval("let a = [1, 2, 3]; let b = rest(a); [a, b]").inspect(),
        "[[1, 2, 3], [2, 3]]"
    );
}

#[test]
fn test_builtins_can_be_shadowed_and_passed() {
    assert_integer("let len = fn(x) { 42 }; len([1])", 42);
    assert_integer("let apply = fn(f, x) { f(x) }; apply(len, \"abc\")", 3);
    assert_eq!(eval("len").inspect(), "builtin function");
    assert_boolean("len == len", true);
}

#[test]
fn test_puts_writes_to_output() {
    let output = SharedBuffer::default();
    let evaluator = Evaluator::new().with_output(output.clone());

    let result = run_with(&evaluator, "puts(\"hello\", 1, [1, 2], true)").expect("a value");

    assert!(result.is(&Object::null()));
    assert_eq!(output.contents(), "hello\n1\n[1, 2]\ntrue\n");
}

#[test]
fn test_array_literal() {
    let result = eval("[1, 2 * 2, 3 + 3]");

    let ObjectKind::Array(elements) = result.kind() else {
        panic!("expected array, got {:?}", result);
    };
    assert_eq!(elements.len(), 3);
    assert_eq!(result.inspect(), "[1, 4, 6]");
}

#[test]
fn test_array_index_expressions() {
    assert_integer("[1, 2, 3][0]", 1);
    assert_integer("[1, 2, 3][1]", 2);
    assert_integer("[1, 2, 3][2]", 3);
    assert_integer("let i = 0; [1][i];", 1);
    assert_integer("[1, 2, 3][1 + 1];", 3);
    assert_integer("let myArray = [1, 2, 3]; myArray[2];", 3);
    assert_integer(
        "let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];",
        6,
    );
    assert_integer("let myArray = [1, 2, 3]; let i = myArray[0]; myArray[i]", 2);
    assert_null("[1, 2, 3][3]");
    assert_null("[1, 2, 3][-1]");
    assert_null("[][0]");
}

#[test]
fn test_hash_literals() {
    let source = r#"let two = "two";
    {
        "one": 10 - 9,
        two: 1 + 1,
        "thr" + "ee": 6 / 2,
        4: 4,
        true: 5,
        false: 6
    }"#;
    let result = eval(source);

    let ObjectKind::Hash(pairs) = result.kind() else {
        panic!("expected hash, got {:?}", result);
    };

    let expected = [
        (Object::string("one"), 1),
        (Object::string("two"), 2),
        (Object::string("three"), 3),
        (Object::integer(4), 4),
        (Object::boolean(true), 5),
        (Object::boolean(false), 6),
    ];
    assert_eq!(pairs.len(), expected.len());
    for (key, value) in expected {
        let pair = pairs.get(&key.hash_key().expect("hashable")).expect("key present");
        assert!(matches!(pair.value.kind(), ObjectKind::Integer(v) if *v == value));
    }
    assert_eq!(
        result.inspect(),
        "{one: 1, two: 2, three: 3, 4: 4, true: 5, false: 6}"
    );
}

#[test]
fn test_hash_duplicate_keys_overwrite() {
    assert_eq!(
        eval(r#"{"a": 1, "b": 2, "a": 3}"#).inspect(),
        "{a: 3, b: 2}"
    );
    // Two separately built strings with the same text are one key
    assert_eq!(
        eval(r#"let k1 = "na" + "me"; let k2 = "name"; {k1: 1, k2: 2}"#).inspect(),
        "{name: 2}"
    );
    // Same text, different type: distinct keys
    assert_eq!(eval(r#"{1: "int", "1": "string"}"#).inspect(), "{1: int, 1: string}");
}

#[test]
fn test_hash_index_expressions() {
    assert_integer(r#"{"foo": 5}["foo"]"#, 5);
    assert_null(r#"{"foo": 5}["bar"]"#);
    assert_integer(r#"let key = "foo"; {"foo": 5}[key]"#, 5);
    assert_null(r#"{}["foo"]"#);
    assert_integer("{5: 5}[5]", 5);
    assert_integer("{true: 5}[true]", 5);
    assert_integer("{false: 5}[false]", 5);
    assert_integer(r#"let h = {"a": {"b": 7}}; h["a"]["b"]"#, 7);
}

#[test]
fn test_eval_statement_keeps_return_wrapped() {
    let (program, errors) = parse("return 1 + 1;");
    assert!(errors.is_empty());

    let result = Evaluator::new()
        .eval_statement(&program.statements[0], &Environment::new())
        .expect("a value");

    assert_eq!(result.object_type(), "RETURN_VALUE");
    assert_eq!(result.inspect(), "2");
}

#[test]
fn test_eval_block_keeps_return_wrapped() {
    let (program, errors) = parse("fn() { 1; return 5; 6 }");
    assert!(errors.is_empty());

    let Statement::Expression(stmt) = &program.statements[0] else {
        panic!("expected expression statement");
    };
    let Some(Expression::Function(function)) = &stmt.expression else {
        panic!("expected function literal");
    };

    let result = Evaluator::new()
        .eval_block(&function.body, &Environment::new())
        .expect("a value");

    assert!(matches!(result.kind(), ObjectKind::ReturnValue(v) if v.inspect() == "5"));
}

#[test]
fn test_eval_expression_against_environment() {
    let (program, errors) = parse("x * 2");
    assert!(errors.is_empty());
    let Statement::Expression(stmt) = &program.statements[0] else {
        panic!("expected expression statement");
    };
    let expression = stmt.expression.as_ref().expect("expression");

    let env = Environment::new();
    env.borrow_mut().set("x", Object::integer(21));
    let evaluator = Evaluator::new();

    assert_eq!(evaluator.eval_expression(expression, &env).inspect(), "42");
    assert_eq!(
        evaluator.eval_expression(expression, &Environment::new()).inspect(),
        "ERROR: identifier not found: x"
    );
}

#[test]
fn test_environment_persists_across_programs() {
    let evaluator = Evaluator::new();
    let env = Environment::new();

    let (first, _) = parse("let counter = fn(x) { x + 1 };");
    let (second, _) = parse("counter(41)");

    assert!(evaluator.eval(&first, &env).is_none());
    let result = evaluator.eval(&second, &env).expect("a value");
    assert_eq!(result.inspect(), "42");
}

#[test]
fn test_incomplete_program_evaluates_to_error() {
    let (program, errors) = parse("1 + ;");
    assert!(!errors.is_empty());

    let result = Evaluator::new()
        .eval(&program, &Environment::new())
        .expect("a value");
    assert_eq!(result.inspect(), "ERROR: incomplete expression");
}

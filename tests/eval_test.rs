// ABOUTME: Integration tests for the evaluator: arithmetic, control flow,
// closures, builtins, collections and the runtime error taxonomy

use monkey_lang::env::Environment;
use monkey_lang::error::EvalError;
use monkey_lang::eval::eval_program;
use monkey_lang::lexer::Lexer;
use monkey_lang::macros::{define_macros, expand_macros};
use monkey_lang::parser::Parser;
use monkey_lang::value::Value;

/// Runs the full pipeline (parse, macro passes, eval) in fresh environments.
fn eval_input(input: &str) -> Result<Value, EvalError> {
    let mut parser = Parser::new(Lexer::new(input));
    let mut program = parser.parse_program();
    assert_eq!(
        parser.errors(),
        &[] as &[String],
        "parser errors for {:?}",
        input
    );

    let macro_env = Environment::new();
    define_macros(&mut program, &macro_env);
    let expanded = expand_macros(program, &macro_env).expect("macro expansion failed");

    eval_program(&expanded, &Environment::new())
}

fn assert_integer(input: &str, expected: i64) {
    match eval_input(input) {
        Ok(Value::Integer(value)) => assert_eq!(value, expected, "input: {}", input),
        other => panic!("input {:?}: expected Integer, got {:?}", input, other),
    }
}

fn assert_float(input: &str, expected: f64) {
    match eval_input(input) {
        Ok(Value::Float(value)) => assert_eq!(value, expected, "input: {}", input),
        other => panic!("input {:?}: expected Float, got {:?}", input, other),
    }
}

fn assert_boolean(input: &str, expected: bool) {
    match eval_input(input) {
        Ok(Value::Boolean(value)) => assert_eq!(value, expected, "input: {}", input),
        other => panic!("input {:?}: expected Boolean, got {:?}", input, other),
    }
}

fn assert_string(input: &str, expected: &str) {
    match eval_input(input) {
        Ok(Value::String(value)) => assert_eq!(value, expected, "input: {}", input),
        other => panic!("input {:?}: expected String, got {:?}", input, other),
    }
}

fn assert_null(input: &str) {
    match eval_input(input) {
        Ok(Value::Null) => {}
        other => panic!("input {:?}: expected Null, got {:?}", input, other),
    }
}

fn assert_error(input: &str, expected: &str) {
    match eval_input(input) {
        Err(error) => assert_eq!(error.to_string(), expected, "input: {}", input),
        other => panic!("input {:?}: expected error, got {:?}", input, other),
    }
}

#[test]
fn test_integer_arithmetic() {
    let tests = [
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
        // division truncates toward zero
        ("7 / 2", 3),
        ("-7 / 2", -3),
    ];
    for (input, expected) in tests {
        assert_integer(input, expected);
    }
}

#[test]
fn test_float_arithmetic_and_promotion() {
    let tests = [
        ("2.5 + 1.5", 4.0),
        ("0.25 * 4.0", 1.0),
        ("5.0 / 2.0", 2.5),
        ("-2.5", -2.5),
        // any float operand promotes the whole expression
        ("1 + 2.5", 3.5),
        ("2.5 + 1", 3.5),
        ("10 / 4.0", 2.5),
        ("1.5 * 2", 3.0),
    ];
    for (input, expected) in tests {
        assert_float(input, expected);
    }
}

#[test]
fn test_boolean_expressions() {
    let tests = [
        ("true", true),
        ("false", false),
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 <= 1", true),
        ("2 <= 1", false),
        ("1 >= 1", true),
        ("1 >= 2", false),
        ("1 == 1", true),
        ("1 != 1", false),
        ("1 == 2", false),
        ("1 != 2", true),
        ("1.5 < 2", true),
        ("2.5 >= 2.5", true),
        ("true == true", true),
        ("false == false", true),
        ("true == false", false),
        ("true != false", true),
        ("false != true", true),
        ("(1 < 2) == true", true),
        ("(1 < 2) == false", false),
        ("(1 > 2) == true", false),
        ("\"a\" == \"a\"", true),
        ("\"a\" == \"b\"", false),
        ("\"a\" != \"b\"", true),
        // mixed non-numeric comparison is identity, never an error
        ("1 == true", false),
        ("1 != true", true),
    ];
    for (input, expected) in tests {
        assert_boolean(input, expected);
    }
}

#[test]
fn test_bang_operator() {
    let tests = [
        ("!true", false),
        ("!false", true),
        ("!5", false),
        ("!!true", true),
        ("!!false", false),
        ("!!5", true),
        ("!\"\"", false),
    ];
    for (input, expected) in tests {
        assert_boolean(input, expected);
    }
}

#[test]
fn test_if_else_expressions() {
    let tests = [
        ("if (true) { 10 }", Some(10)),
        ("if (1) { 10 }", Some(10)),
        ("if (1 < 2) { 10 }", Some(10)),
        ("if (1 > 2) { 10 } else { 20 }", Some(20)),
        ("if (1 < 2) { 10 } else { 20 }", Some(10)),
        ("if (false) { 10 }", None),
        ("if (1 > 2) { 10 }", None),
    ];
    for (input, expected) in tests {
        match expected {
            Some(value) => assert_integer(input, value),
            None => assert_null(input),
        }
    }
}

#[test]
fn test_return_statements() {
    let tests = [
        ("return 10;", 10),
        ("return 10; 9;", 10),
        ("return 2 * 5; 9;", 10),
        ("9; return 2 * 5; 9;", 10),
        (
            "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
            10,
        ),
    ];
    for (input, expected) in tests {
        assert_integer(input, expected);
    }
}

#[test]
fn test_let_statements() {
    let tests = [
        ("let a = 5; a;", 5),
        ("let a = 5 * 5; a;", 25),
        ("let a = 5; let b = a; b;", 5),
        ("let a = 5; let b = a; let c = a + b + 5; c;", 15),
    ];
    for (input, expected) in tests {
        assert_integer(input, expected);
    }
}

#[test]
fn test_shadowing_is_scoped_to_the_inner_frame() {
    let input = "let x = 1;
let f = fn() { let x = 2; x };
f() + x;";
    assert_integer(input, 3);
}

#[test]
fn test_function_value_inspection() {
    match eval_input("fn(x) { x + 2; };") {
        Ok(value @ Value::Function { .. }) => {
            assert_eq!(value.to_string(), "fn(x) {\n(x + 2)}\n");
        }
        other => panic!("expected Function, got {:?}", other),
    }
}

#[test]
fn test_function_application() {
    let tests = [
        ("let identity = fn(x) { x; }; identity(5);", 5),
        ("let identity = fn(x) { return x; }; identity(5);", 5),
        ("let double = fn(x) { x * 2; }; double(5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5, 5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20),
        ("fn(x) { x; }(5)", 5),
    ];
    for (input, expected) in tests {
        assert_integer(input, expected);
    }
}

#[test]
fn test_closures() {
    let input = "let newAdder = fn(x) { fn(y) { x + y }; };
let addTwo = newAdder(2);
addTwo(2);";
    assert_integer(input, 4);
}

#[test]
fn test_recursive_function_sees_its_own_binding() {
    let input = "let countdown = fn(x) { if (x == 0) { 0 } else { countdown(x - 1) } };
countdown(10);";
    assert_integer(input, 0);
}

#[test]
fn test_string_operations() {
    assert_string("\"Hello\" + \" \" + \"World!\"", "Hello World!");
    assert_string("let s = \"mon\"; s + \"key\";", "monkey");
}

#[test]
fn test_builtin_len() {
    assert_integer("len(\"\")", 0);
    assert_integer("len(\"four\")", 4);
    assert_integer("len(\"hello world\")", 11);
    assert_integer("len([1, 2, 3])", 3);
    assert_integer("len([])", 0);
    assert_error(
        "len(1)",
        "argument to 'len' not supported: got=INTEGER",
    );
    assert_error(
        "len(\"one\", \"two\")",
        "wrong number of arguments: want=1, got=2",
    );
}

#[test]
fn test_builtin_array_accessors() {
    assert_integer("first([1, 2, 3])", 1);
    assert_null("first([])");
    assert_integer("last([1, 2, 3])", 3);
    assert_null("last([])");
    assert_null("rest([])");
    match eval_input("rest([1, 2, 3])") {
        Ok(value) => assert_eq!(value.to_string(), "[2, 3]"),
        other => panic!("unexpected result {:?}", other),
    }
    match eval_input("push([1, 2], 3)") {
        Ok(value) => assert_eq!(value.to_string(), "[1, 2, 3]"),
        other => panic!("unexpected result {:?}", other),
    }
    assert_error(
        "first(1)",
        "argument to 'first' not supported: got=INTEGER",
    );
    assert_error("push(1, 2)", "argument to 'push' not supported: got=INTEGER");
}

#[test]
fn test_builtins_do_not_mutate_their_argument() {
    assert_integer("let a = [1, 2, 3]; push(a, 4); len(a);", 3);
    assert_integer("let a = [1, 2, 3]; rest(a); len(a);", 3);
    assert_integer("let a = [1, 2, 3]; first(a); last(a); len(a);", 3);
}

#[test]
fn test_let_shadows_builtin_in_scope() {
    assert_integer("let len = 5; len;", 5);
    // and the table itself is untouched for other programs
    assert_integer("len(\"ok\")", 2);
}

#[test]
fn test_array_literals_and_indexing() {
    match eval_input("[1, 2 * 2, 3 + 3]") {
        Ok(value) => assert_eq!(value.to_string(), "[1, 4, 6]"),
        other => panic!("unexpected result {:?}", other),
    }

    let tests = [
        ("[1, 2, 3][0]", Some(1)),
        ("[1, 2, 3][1]", Some(2)),
        ("[1, 2, 3][2]", Some(3)),
        ("let i = 0; [1][i];", Some(1)),
        ("[1, 2, 3][1 + 1];", Some(3)),
        ("let myArray = [1, 2, 3]; myArray[2];", Some(3)),
        (
            "let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];",
            Some(6),
        ),
        ("let myArray = [1, 2, 3]; let i = myArray[0]; myArray[i]", Some(2)),
        ("[1, 2, 3][3]", None),
        ("[1, 2, 3][-1]", None),
    ];
    for (input, expected) in tests {
        match expected {
            Some(value) => assert_integer(input, value),
            None => assert_null(input),
        }
    }
}

#[test]
fn test_hash_literals() {
    let input = "let two = \"two\";
{
    \"one\": 10 - 9,
    two: 1 + 1,
    \"thr\" + \"ee\": 6 / 2,
    4: 4,
    true: 5,
    false: 6
}";
    match eval_input(input) {
        Ok(Value::Hash(pairs)) => {
            assert_eq!(pairs.len(), 6);
            let expectations = [
                (Value::String("one".to_string()), 1),
                (Value::String("two".to_string()), 2),
                (Value::String("three".to_string()), 3),
                (Value::Integer(4), 4),
                (Value::Boolean(true), 5),
                (Value::Boolean(false), 6),
            ];
            for (key, expected) in expectations {
                let hash_key = key.hash_key().expect("key must be hashable");
                match pairs.get(&hash_key) {
                    Some(pair) => match pair.value {
                        Value::Integer(value) => assert_eq!(value, expected),
                        ref other => panic!("unexpected value {:?}", other),
                    },
                    None => panic!("no pair for key {}", key),
                }
            }
        }
        other => panic!("expected Hash, got {:?}", other),
    }
}

#[test]
fn test_duplicate_hash_keys_overwrite_in_insertion_order() {
    assert_integer("{\"a\": 1, \"a\": 2}[\"a\"]", 2);
}

#[test]
fn test_hash_indexing() {
    let tests = [
        ("{\"foo\": 5}[\"foo\"]", Some(5)),
        ("{\"foo\": 5}[\"bar\"]", None),
        ("let key = \"foo\"; {\"foo\": 5}[key]", Some(5)),
        ("{}[\"foo\"]", None),
        ("{5: 5}[5]", Some(5)),
        ("{true: 5}[true]", Some(5)),
        ("{false: 5}[false]", Some(5)),
    ];
    for (input, expected) in tests {
        match expected {
            Some(value) => assert_integer(input, value),
            None => assert_null(input),
        }
    }
}

#[test]
fn test_runtime_error_taxonomy() {
    let tests = [
        ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
        ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
        ("-true", "unknown operator: -BOOLEAN"),
        ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
        ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
        (
            "if (10 > 1) { true + false; }",
            "unknown operator: BOOLEAN + BOOLEAN",
        ),
        (
            "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
            "unknown operator: BOOLEAN + BOOLEAN",
        ),
        ("foobar", "identifier not found: foobar"),
        ("\"Hello\" - \"World\"", "unknown operator: STRING - STRING"),
        (
            "{\"name\": \"Monkey\"}[fn(x) { x }];",
            "unusable as hash key: FUNCTION",
        ),
        ("{[1, 2]: \"bad\"}", "unusable as hash key: ARRAY"),
        ("[1, 2, 3][\"str\"]", "index operator not supported: ARRAY"),
        ("5[0]", "index operator not supported: INTEGER"),
        ("5(1)", "not a function: INTEGER"),
        ("\"str\"()", "not a function: STRING"),
        ("5 / 0;", "division by zero"),
        (
            "fn(x) { x }(1, 2)",
            "wrong number of arguments: want=1, got=2",
        ),
        ("fn(x) { x }()", "wrong number of arguments: want=1, got=0"),
    ];
    for (input, expected) in tests {
        assert_error(input, expected);
    }
}

#[test]
fn test_errors_short_circuit_composite_literals() {
    assert_error("[1, 5 / 0, missing]", "division by zero");
    assert_error("{\"a\": missing}", "identifier not found: missing");
    assert_error(
        "let add = fn(x, y) { x + y }; add(1, missing);",
        "identifier not found: missing",
    );
}

// End-to-end scenarios

#[test]
fn test_scenario_arithmetic_binding() {
    assert_integer("let x = 5 * 5 + 10; x;", 35);
}

#[test]
fn test_scenario_higher_order_functions() {
    let input = "let twice = fn(f, x) { f(f(x)); };
let addTwo = fn(x) { x + 2 };
twice(addTwo, 2);";
    assert_integer(input, 6);
}

#[test]
fn test_scenario_nested_collections() {
    let people = "let people = [{\"name\": \"Alice\", \"age\": 24}, {\"name\": \"Anna\", \"age\": 28}];";
    assert_string(
        &format!("{} people[0][\"name\"];", people),
        "Alice",
    );
    assert_integer(&format!("{} people[1][\"age\"];", people), 28);
}

#[test]
fn test_scenario_deep_recursion_with_return() {
    let input = "let counter = fn(x) {
  if (x > 100) {
    return true;
  } else {
    let foobar = 9999;
    counter(x + 1);
  }
};
counter(0);";
    assert_boolean(input, true);
}

#[test]
fn test_scenario_macro_rewrite() {
    let input = "let reverse = macro(a, b) { quote(unquote(b) - unquote(a)); };
reverse(2 + 2, 10 - 5);";
    assert_integer(input, 1);
}

#[test]
fn test_scenario_builtin_pipeline() {
    assert_integer("len(\"hello\" + \" world\");", 11);
    assert_integer("first([1, 2, 3]) + last([1, 2, 3]);", 4);
    match eval_input("rest(rest([1, 2, 3]));") {
        Ok(value) => assert_eq!(value.to_string(), "[3]"),
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_pure_programs_are_deterministic() {
    let inputs = [
        "let x = 5 * 5 + 10; x;",
        "let twice = fn(f, x) { f(f(x)); }; let addTwo = fn(x) { x + 2 }; twice(addTwo, 2);",
        "[1, 2 * 2, {\"k\": 3}][2]",
        "1.5 + 2",
    ];
    for input in inputs {
        let first = eval_input(input).expect("first run failed");
        let second = eval_input(input).expect("second run failed");
        assert_eq!(first.to_string(), second.to_string(), "input: {}", input);
    }
}

#[test]
fn test_float_inspection_uses_six_decimals() {
    match eval_input("2.5 + 1.25") {
        Ok(value) => assert_eq!(value.to_string(), "3.750000"),
        other => panic!("unexpected result {:?}", other),
    }
}

use std::fs;

use moonlang::{error::RunError,
               interpreter::value::{ErrorValue, ResultValue, Value},
               run_source};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

/// Runs a script and returns its final value, panicking on any failure.
fn eval(source: &str) -> Value {
    run_source(source).unwrap_or_else(|e| panic!("script failed: {e}\nscript:\n{source}"))
}

/// Runs a script and returns the rendering of its final value.
fn eval_display(source: &str) -> String {
    eval(source).to_string()
}

/// Runs a script expected to die with a runtime error and returns it.
fn runtime_error(source: &str) -> ErrorValue {
    match run_source(source) {
        Err(RunError::Runtime(error)) => error,
        Err(other) => panic!("expected a runtime error, got: {other}\nscript:\n{source}"),
        Ok(value) => panic!("expected a runtime error, got value: {value}\nscript:\n{source}"),
    }
}

/// Runs a script expected to fail type checking and returns the diagnostic.
fn type_error(source: &str) -> String {
    match run_source(source) {
        Err(RunError::Type(error)) => error.to_string(),
        Err(other) => panic!("expected a type error, got: {other}\nscript:\n{source}"),
        Ok(value) => panic!("expected a type error, got value: {value}\nscript:\n{source}"),
    }
}

#[test]
fn arithmetic_and_precedence() {
    assert_eq!(eval_display("1 + 2 * 3"), "7");
    assert_eq!(eval_display("(1 + 2) * 3"), "9");
    assert_eq!(eval_display("10 % 3"), "1");
    assert_eq!(eval_display("7 / 2"), "3");
    assert_eq!(eval_display("-5 + 3"), "-2");
}

#[test]
fn mixed_numeric_operands_widen_to_float() {
    assert_eq!(eval_display("1 + 2.5"), "3.5");
    assert_eq!(eval_display("2.0 * 3"), "6");
}

#[test]
fn string_concatenation_and_ordering() {
    assert_eq!(eval_display("\"foo\" + \"bar\""), "foobar");
    assert_eq!(eval_display("\"abc\" < \"abd\""), "true");
}

#[test]
fn definitions_and_shadowing() {
    assert_eq!(eval_display("def x = 5\nx + 2"), "7");
    assert_eq!(eval_display("def x = 1\nif true {\n    def x = 99\n}\nx"), "1");
}

#[test]
fn if_is_an_expression() {
    assert_eq!(eval_display("def x = if 2 < 3 { 7 } else { 11 }\nx"), "7");
    assert_eq!(eval_display("if false { 1 }"), "null");
}

#[test]
fn equality_is_strict_about_tags() {
    assert_eq!(eval_display("1 is 1"), "true");
    assert_eq!(eval_display("1 is 1.0"), "false");
    assert_eq!(eval_display("\"a\" is \"a\""), "true");
    assert_eq!(eval_display("[1] is [1]"), "false");
}

#[test]
fn truthiness_through_not() {
    assert_eq!(eval_display("not 0"), "true");
    assert_eq!(eval_display("not 1"), "false");
    assert_eq!(eval_display("not \"\""), "true");
    assert_eq!(eval_display("not None"), "true");
    assert_eq!(eval_display("not [1]"), "false");
}

#[test]
fn mutable_round_trip() {
    let source = "def c = Mutable[Integer](0)\n\
                  c == 5\n\
                  c == c + 1\n\
                  c";
    assert_eq!(eval_display(source), "6");
}

#[test]
fn rebinding_an_immutable_binding_is_a_type_error() {
    assert_eq!(type_error("def x = 0\nx == 5"), "line 2: x is not mutable");
}

#[test]
fn while_loops_drive_mutables() {
    let source = "def counter = Mutable[Integer](0)\n\
                  while counter < 5 {\n\
                      counter == counter + 1\n\
                  }\n\
                  counter";
    assert_eq!(eval_display(source), "5");
}

#[test]
fn loop_control_flow() {
    let source = "def out = Mutable[List[Integer]]([])\n\
                  for i in range(10) {\n\
                      if i is 3 {\n\
                          continue\n\
                      }\n\
                      if i is 7 {\n\
                          break\n\
                      }\n\
                      out == out.append(i)\n\
                  }\n\
                  out";
    assert_eq!(eval_display(source), "[0, 1, 2, 4, 5, 6]");
}

#[test]
fn list_append_is_persistent() {
    let source = "def l = [1, 2, 3]\n\
                  def l2 = l.append(4)\n\
                  l.length()";
    assert_eq!(eval_display(source), "3");

    let source = "def l = [1, 2, 3]\n\
                  def l2 = l.append(4)\n\
                  l2.length()";
    assert_eq!(eval_display(source), "4");
}

#[test]
fn list_pipelines() {
    assert_eq!(eval_display("[1, 2, 3].map({ x -> x * 10 })"), "[10, 20, 30]");
    assert_eq!(eval_display("[1, 2, 3, 4].filter({ x -> x % 2 is 0 })"), "[2, 4]");
    assert_eq!(eval_display("[1, 2, 3, 4].reduce({ acc, x -> acc + x }, 0)"), "10");
    assert_eq!(eval_display("[1, 2, 3].contains(2)"), "true");
    assert_eq!(eval_display("[5, 6].find({ x -> x > 5 })"), "Some(6)");
    assert_eq!(eval_display("[5, 6].get(9)"), "None");
}

#[test]
fn list_indexing() {
    assert_eq!(eval_display("[10, 20, 30][1]"), "20");
    assert_eq!(runtime_error("[1][5]").to_string(), "index out of bounds");
}

#[test]
fn maps_are_persistent_and_string_keyed() {
    let source = "def m = {\"a\": 1}\n\
                  def m2 = m.insert(\"b\", 2)\n\
                  m2[\"b\"]";
    assert_eq!(eval_display(source), "2");

    let source = "def m = {\"a\": 1}\n\
                  def m2 = m.insert(\"b\", 2)\n\
                  m.contains(\"b\")";
    assert_eq!(eval_display(source), "false");

    assert_eq!(eval_display("{\"a\": 1}.remove(\"a\")"), "{}");
    assert_eq!(eval_display("{\"b\": 2, \"a\": 1}.keys()"), "[a, b]");
    assert_eq!(eval_display("{\"a\": 1}[\"missing\"]"), "None");
}

#[test]
fn map_rendering_sorts_and_quotes_keys() {
    assert_eq!(eval_display("{\"b\": 2, \"a\": 1}"), "{\"a\": 1, \"b\": 2}");
}

#[test]
fn string_methods() {
    assert_eq!(eval_display("\"Hello World\".lower()"), "hello world");
    assert_eq!(eval_display("\"hello\".upper()"), "HELLO");
    assert_eq!(eval_display("\"  pad  \".trim()"), "pad");
    assert_eq!(eval_display("\"a,b,c\".split(\",\")"), "[a, b, c]");
    assert_eq!(eval_display("\"hello\".contains(\"ell\")"), "true");
    assert_eq!(eval_display("\"hello\".length()"), "5");
    assert_eq!(eval_display("\"hello\"[1]"), "e");
}

#[test]
fn builtin_free_functions() {
    assert_eq!(eval_display("len(\"abc\")"), "3");
    assert_eq!(eval_display("len([1, 2])"), "2");
    assert_eq!(eval_display("type([1])"), "List");
    assert_eq!(eval_display("type(1.5)"), "Float");
    assert_eq!(eval_display("str(3.5) + \"!\""), "3.5!");
    assert_eq!(eval_display("int(\"42\") + 1"), "43");
    assert_eq!(eval_display("float(2) / 4"), "0.5");
    assert_eq!(eval_display("range(3)"), "[0, 1, 2]");
    assert_eq!(eval_display("range(2, 5)"), "[2, 3, 4]");
}

#[test]
fn builtin_argument_errors_are_specific() {
    assert_eq!(runtime_error("len()").to_string(), "len() requires exactly 1 argument");
    assert_eq!(runtime_error("range(\"x\")").to_string(),
               "range() argument must be an integer");
    assert_eq!(runtime_error("int(\"abc\")").to_string(),
               "cannot convert \"abc\" to integer");
}

#[test]
fn structs_update_without_mutation() {
    let source = "struct User {\n\
                      name: String\n\
                      age: Integer\n\
                  }\n\
                  def alice = User { name: \"Alice\", age: 30 }\n\
                  def older = alice.with { age: 31 }\n\
                  alice.age";
    assert_eq!(eval_display(source), "30");

    let source = "struct User {\n\
                      name: String\n\
                      age: Integer\n\
                  }\n\
                  def alice = User { name: \"Alice\", age: 30 }\n\
                  def older = alice.with { age: 31 }\n\
                  older.age";
    assert_eq!(eval_display(source), "31");
}

#[test]
fn struct_rendering_sorts_fields() {
    let source = "struct User {\n\
                      name: String\n\
                      age: Integer\n\
                  }\n\
                  User { name: \"Alice\", age: 30 }";
    assert_eq!(eval_display(source), "User{age: 30, name: Alice}");
}

#[test]
fn functions_and_recursion() {
    let source = "fun fibonacci(n: Integer) -> Integer {\n\
                      if n <= 1 {\n\
                          return n\n\
                      }\n\
                      return fibonacci(n - 1) + fibonacci(n - 2)\n\
                  }\n\
                  fibonacci(10)";
    assert_eq!(eval_display(source), "55");
}

#[test]
fn return_escapes_nested_loops() {
    let source = "fun firstOver(limit: Integer) -> Integer {\n\
                      for i in range(100) {\n\
                          if i > limit {\n\
                              return i\n\
                          }\n\
                      }\n\
                      return -1\n\
                  }\n\
                  firstOver(42)";
    assert_eq!(eval_display(source), "43");
}

#[test]
fn lambdas_close_over_their_definition_environment() {
    let source = "fun makeAdder(x: Integer) {\n\
                      return { y -> x + y }\n\
                  }\n\
                  def add5 = makeAdder(5)\n\
                  add5(3)";
    assert_eq!(eval_display(source), "8");

    assert_eq!(eval_display("def add = { a, b -> a + b }\nadd(2, 3)"), "5");
}

#[test]
fn call_arity_is_not_enforced() {
    // Extra arguments are dropped; missing ones only fail when referenced.
    let source = "fun first(a: Integer, b: Integer) -> Integer {\n\
                      return a\n\
                  }\n\
                  first(1, 2, 3)";
    assert_eq!(eval_display(source), "1");

    let source = "fun first(a: Integer, b: Integer) -> Integer {\n\
                      return a\n\
                  }\n\
                  first(9)";
    assert_eq!(eval_display(source), "9");
}

#[test]
fn option_chaining() {
    assert_eq!(eval_display("Some(5).unwrap()"), "5");
    assert_eq!(eval_display("None.unwrapOr(9)"), "9");
    assert_eq!(eval_display("Some(2).map({ x -> x * 10 })"), "Some(20)");
    assert_eq!(eval_display("None.map({ x -> x * 10 })"), "None");
    assert_eq!(eval_display("Some(1).isSome()"), "true");
    assert_eq!(eval_display("None.isNone()"), "true");
    assert_eq!(runtime_error("None.unwrap()").to_string(), "called unwrap on None");
}

const DIVIDE: &str = "fun divide(a: Integer, b: Integer) -> Result[Integer, String] {\n\
                          if b is 0 {\n\
                              return Error(\"Division by zero\")\n\
                          }\n\
                          return Ok(a / b)\n\
                      }\n";

#[test]
fn result_chaining_short_circuits() {
    assert_eq!(eval_display(&format!("{DIVIDE}divide(10, 2).unwrap()")), "5");
    assert_eq!(eval_display(&format!("{DIVIDE}divide(10, 0).unwrapOr(-1)")), "-1");

    // The closure after a failed divide never runs.
    let source = format!("{DIVIDE}divide(10, 0).then({{ x -> x * 2 }}).unwrapOr(-1)");
    assert_eq!(eval_display(&source), "-1");

    // then() flattens a Result returned by its closure; map() re-wraps.
    let source = format!("{DIVIDE}divide(10, 2).then({{ x -> divide(x, 5) }}).unwrap()");
    assert_eq!(eval_display(&source), "1");
    assert_eq!(eval_display(&format!("{DIVIDE}divide(10, 2).map({{ x -> x + 1 }}).unwrap()")),
               "6");
}

#[test]
fn result_unwrap_hands_back_the_error_as_a_value() {
    let Value::Error(error) = eval(&format!("{DIVIDE}divide(10, 0).unwrap()")) else {
        panic!("expected an error value");
    };
    assert_eq!(error.method, "divide");
    assert_eq!(error.message, "Division by zero");

    // An error value is legitimate data for a binding.
    let source = format!("{DIVIDE}def e = divide(1, 0).unwrap()\ntype(e)");
    assert_eq!(eval_display(&source), "Error");
}

const USER_VALIDATE: &str = "struct User {\n\
                                 name: String\n\
                                 age: Integer\n\
                             }\n\
                             extend User {\n\
                                 fun validate() -> Result[User, String] {\n\
                                     if this.age < 18 {\n\
                                         return Error(\"Must be 18+\")\n\
                                     }\n\
                                     return Ok(this)\n\
                                 }\n\
                             }\n\
                             def alice = User { name: \"Alice\", age: 10 }\n";

#[test]
fn failing_extension_methods_enrich_their_errors() {
    let Value::Result(result) = eval(&format!("{USER_VALIDATE}alice.validate()")) else {
        panic!("expected a result value");
    };
    let ResultValue::Err(error) = *result else {
        panic!("expected a failed result");
    };

    assert_eq!(error.method, "validate");
    assert_eq!(error.input, "User{age: 10, name: Alice}");
    assert_eq!(error.message, "Must be 18+");
    assert_eq!(error.to_string(),
               "Error in validate\nInput: User{age: 10, name: Alice}\nReason: Must be 18+");
}

#[test]
fn first_enrichment_wins_across_a_chain() {
    // The second call sees an error receiver, short-circuits, and must not
    // overwrite the provenance captured at the first failure.
    let Value::Result(result) = eval(&format!("{USER_VALIDATE}alice.validate().validate()"))
    else {
        panic!("expected a result value");
    };
    let ResultValue::Err(error) = *result else {
        panic!("expected a failed result");
    };

    assert_eq!(error.method, "validate");
    assert_eq!(error.input, "User{age: 10, name: Alice}");
    assert_eq!(error.message, "Must be 18+");
}

#[test]
fn extension_methods_dispatch_on_builtin_type_names() {
    let source = "extend Integer {\n\
                      fun double() -> Integer {\n\
                          return this * 2\n\
                      }\n\
                  }\n\
                  21.double()";
    assert_eq!(eval_display(source), "42");
}

#[test]
fn extension_dispatch_unwraps_ok_receivers() {
    let source = "extend Integer {\n\
                      fun double() -> Integer {\n\
                          return this * 2\n\
                      }\n\
                  }\n\
                  Ok(21).double()";
    assert_eq!(eval_display(source), "42");
}

#[test]
fn match_on_wrapper_shapes() {
    let source = format!("{DIVIDE}match divide(10, 2) {{\n\
                              Ok(v) -> {{ v * 100 }}\n\
                              Error(e) -> {{ -1 }}\n\
                          }}");
    assert_eq!(eval_display(&source), "1000");

    let source = format!("{DIVIDE}match divide(10, 0) {{\n\
                              Ok(v) -> {{ v * 100 }}\n\
                              Error(e) -> {{ -1 }}\n\
                          }}");
    assert_eq!(eval_display(&source), "-1");

    let source = "def m = {\"a\": 1}\n\
                  match m.get(\"missing\") {\n\
                      Some(v) -> { v }\n\
                      None -> { -1 }\n\
                  }";
    assert_eq!(eval_display(source), "-1");

    // A bare identifier matches unconditionally and binds the whole value.
    assert_eq!(eval_display("match 5 {\n    other -> { other + 1 }\n}"), "6");
}

#[test]
fn method_errors_name_the_receiver_type() {
    assert_eq!(runtime_error("[1].missing()").to_string(), "undefined method missing on List");
    assert_eq!(runtime_error("1 / 0").to_string(), "division by zero");
    assert_eq!(runtime_error("1.5 % 2.0").to_string(), "unknown operator: Float % Float");
}

#[test]
fn type_checker_rejects_structural_misuse() {
    assert_eq!(type_error("def x: Integer = \"hi\""),
               "line 1: cannot assign String to variable of type Integer");
    assert_eq!(type_error("def x = y + 1"), "line 1: undefined: y");
    assert_eq!(type_error("[1, \"a\"]"), "line 1: list elements must have the same type");
    assert_eq!(type_error("for x in 5 {\n    x\n}"), "line 1: cannot iterate over Integer");
    assert_eq!(type_error("\"a\" - \"b\""),
               "line 1: operator - not defined for String and String");
    assert_eq!(type_error("1 < \"a\""), "line 1: cannot compare Integer and String");
    assert_eq!(type_error("if 1 {\n    2\n}"),
               "line 1: if condition must be a boolean expression");
}

#[test]
fn struct_literals_check_their_fields() {
    let source = "struct P {\n\
                      x: Integer\n\
                  }\n\
                  def p = P { y: 1 }";
    assert_eq!(type_error(source), "line 4: undefined field y on P");

    let source = "struct P {\n\
                      x: Integer\n\
                  }\n\
                  def p = P { x: \"no\" }";
    assert_eq!(type_error(source), "line 4: cannot assign String to field x of type Integer");
}

#[test]
fn functions_cannot_declare_mutable_returns() {
    let source = "fun f() -> Mutable[Integer] {\n\
                      return Mutable[Integer](0)\n\
                  }";
    assert_eq!(type_error(source), "line 1: function f cannot return a Mutable type");
}

#[test]
fn return_types_are_checked_in_nested_blocks() {
    let source = "fun f(flag: Boolean) -> Integer {\n\
                      if flag {\n\
                          return \"nope\"\n\
                      }\n\
                      return 1\n\
                  }";
    assert_eq!(type_error(source),
               "line 3: cannot return String from function expecting Integer");
}

#[test]
fn example_scripts_run_cleanly() {
    let mut count = 0;

    for entry in WalkDir::new("tests/scripts")
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "moon"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {path:?}: {e}"));

        count += 1;
        if let Err(e) = run_source(&source) {
            panic!("script {path:?} failed:\n{e}");
        }
    }

    assert!(count > 0, "no example scripts found in tests/scripts");
}

#[test]
fn logical_operators_evaluate_both_sides() {
    // 'and'/'or' combine truthiness without short-circuit: the rebind in the
    // right operand always runs.
    let source = "def hits = Mutable[Integer](0)\n\
                  fun bump() -> Boolean {\n\
                      hits == hits + 1\n\
                      return true\n\
                  }\n\
                  def ignored = false and bump()\n\
                  hits";
    assert_eq!(eval_display(source), "1");
}

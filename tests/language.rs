use std::{
    cell::RefCell,
    fs::{self},
    io::Write,
    rc::Rc,
};

use pretty_assertions::assert_eq;
use prometheus::{
    Config, Context, DEFAULT_MAX_CALL_DEPTH, Value,
    error::{Error, ParseError, RuntimeError},
    run_source,
};
use walkdir::WalkDir;

#[derive(Clone, Default)]
struct Capture(Rc<RefCell<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().write(bytes)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn text(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("output is UTF-8")
    }
}

fn run_with(config: Config, src: &str) -> (Result<Option<Value>, Error>, String) {
    let capture = Capture::default();
    let mut context = Context::with_output(config, capture.clone());
    let result = run_source(&mut context, src);
    (result, capture.text())
}

fn run(src: &str) -> (Result<Option<Value>, Error>, String) {
    run_with(Config::default(), src)
}

/// Runs a script that must succeed and returns what it printed.
fn assert_success(src: &str) -> String {
    match run(src) {
        (Ok(_), output) => output,
        (Err(e), _) => panic!("Script failed: {e}\n{src}"),
    }
}

/// Runs a script that must fail and returns the error.
fn assert_failure(src: &str) -> Error {
    match run(src) {
        (Ok(_), output) => panic!("Script succeeded but was expected to fail; printed:\n{output}"),
        (Err(e), _) => e,
    }
}

fn assert_output(src: &str, expected: &str) {
    assert_eq!(assert_success(src), expected);
}

#[test]
fn script_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "pr"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected_path = path.with_extension("out");
        let expected = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
                                                               panic!("Failed to read {expected_path:?}: {e}")
                                                           });

        count += 1;
        match run(&source) {
            (Ok(_), output) => assert_eq!(output, expected, "output of {path:?}"),
            (Err(e), _) => panic!("Script {path:?} failed: {e}"),
        }
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

#[test]
fn declarations_and_basic_arithmetic() {
    assert_output("Integer x = 1 + 2;\nprint x;", "3\n");
    assert_output("Integer x = 7 * 9 - 3;\nprint x;", "60\n");
    assert_output("print 7 / 2;", "3\n");
    assert_output("print -7 / 2;", "-3\n");
    assert_output("print 7 % 3;", "1\n");
    assert_output("print 7.0 / 2;", "3.5\n");
    assert_output("print 2 ^ 10;", "1024\n");
    assert_output("print 2 ^ -1;", "0.5\n");
    assert_output("print 1 + 2.0;", "3.0\n");
}

#[test]
fn undeclared_types_get_zero_values() {
    assert_output("Integer i;\nFloat f;\nBool b;\nString s;\nArray a;\nDict d;\nprint i;\nprint \
                   f;\nprint b;\nprint s;\nprint a;\nprint d;",
                  "0\n0.0\nfalse\n\n[]\n{}\n");
}

#[test]
fn blocks_have_no_zero_value() {
    assert!(matches!(assert_failure("Block b;"),
                     Error::Runtime(RuntimeError::NoDefaultValue { .. })));
}

#[test]
fn declared_types_are_enforced() {
    assert!(matches!(assert_failure("Integer x = \"text\";"),
                     Error::Runtime(RuntimeError::TypeMismatch { .. })));
    assert!(matches!(assert_failure("Integer x = 1;\nx = 2.5;"),
                     Error::Runtime(RuntimeError::TypeMismatch { .. })));
    assert!(matches!(assert_failure("Integer x = 1;\nx += 0.5;"),
                     Error::Runtime(RuntimeError::TypeMismatch { .. })));
    assert_success("Object anything = 1;\nanything = \"now a string\";");
    assert_success("Number n = 1;\nn = 2.5;");
}

#[test]
fn redeclaration_in_one_scope_fails() {
    assert!(matches!(assert_failure("Integer x = 1;\nInteger x = 2;"),
                     Error::Runtime(RuntimeError::Redeclaration { line: 2, .. })));
}

#[test]
fn inner_scopes_may_shadow() {
    let src = "
        Integer x = 1;
        if (true) {
            String x = \"inner\";
            print x;
        }
        print x;
    ";
    assert_output(src, "inner\n1\n");
}

#[test]
fn loop_bodies_start_with_a_fresh_scope() {
    let src = "
        Integer i = 0;
        while (i < 3) {
            Integer square = i * i;
            print square;
            i++;
        }
    ";
    assert_output(src, "0\n1\n4\n");
}

#[test]
fn undeclared_variables_are_errors() {
    assert!(matches!(assert_failure("print missing;"),
                     Error::Runtime(RuntimeError::UndeclaredVariable { .. })));
    assert!(matches!(assert_failure("missing = 1;"),
                     Error::Runtime(RuntimeError::UndeclaredVariable { .. })));
}

#[test]
fn functions_do_not_see_caller_locals() {
    let src = "
        Integer peek() { return hidden; }
        if (true) {
            Integer hidden = 1;
            peek();
        }
    ";
    assert!(matches!(assert_failure(src),
                     Error::Runtime(RuntimeError::UndeclaredVariable { .. })));

    let src = "
        Integer base = 10;
        Integer offset(Integer x) { return base + x; }
        print offset(5);
    ";
    assert_output(src, "15\n");
}

#[test]
fn blocks_capture_their_defining_scope() {
    let src = "
        Block counter = ^{
            Integer count = 0;
            Block next = ^Integer { count++; return count; }
            return next;
        }
        Block tick = counter();
        tick();
        tick();
        print tick();
    ";
    assert_output(src, "3\n");
}

#[test]
fn recursion_works() {
    let src = "
        Integer fact(Integer n) {
            if (n <= 1) return 1;
            return n * fact(n - 1);
        }
        print fact(10);
    ";
    assert_output(src, "3628800\n");
}

#[test]
fn runaway_recursion_hits_the_limit() {
    let config = Config { max_call_depth: 25,
                          ..Config::default() };
    let (result, _) = run_with(config, "Integer down(Integer n) { return down(n + 1); }\ndown(0);");
    assert!(matches!(result, Err(Error::Runtime(RuntimeError::RecursionLimit { limit: 25, .. }))));
}

#[test]
fn default_recursion_limit_is_reported_as_an_error() {
    let down = "
        Integer down(Integer n) {
            if (n <= 0) { return 0; }
            return 1 + down(n - 1);
        }
    ";
    assert!(matches!(assert_failure(&format!("{down}\ndown(100000);")),
                     Error::Runtime(RuntimeError::RecursionLimit { limit: DEFAULT_MAX_CALL_DEPTH, .. })));

    let deepest = DEFAULT_MAX_CALL_DEPTH - 1;
    assert_output(&format!("{down}\nprint down({deepest});"), &format!("{deepest}\n"));
}

#[test]
fn return_contracts_are_checked() {
    assert!(matches!(assert_failure("Integer f() { return \"no\"; }\nf();"),
                     Error::Runtime(RuntimeError::ReturnType { .. })));
    assert!(matches!(assert_failure("Integer f() { }\nf();"),
                     Error::Runtime(RuntimeError::MissingReturnValue { .. })));
    assert!(matches!(assert_failure("Void f() { return 1; }\nf();"),
                     Error::Runtime(RuntimeError::UnexpectedReturnValue { .. })));
    assert_output("Void f() { print \"side effect\"; }\nprint f();", "side effect\nnil\n");
}

#[test]
fn arguments_are_checked() {
    assert!(matches!(assert_failure("Integer f(Integer x) { return x; }\nf();"),
                     Error::Runtime(RuntimeError::ArgumentCount { expected: 1,
                                                                  found: 0,
                                                                  .. })));
    assert!(matches!(assert_failure("Integer f(Integer x) { return x; }\nf(1.5);"),
                     Error::Runtime(RuntimeError::ArgumentType { position: 1, .. })));
    assert!(matches!(assert_failure("\"text\".substr(1);"),
                     Error::Runtime(RuntimeError::ArgumentCount { .. })));
    assert!(matches!(assert_failure("\"text\".at(\"0\");"),
                     Error::Runtime(RuntimeError::ArgumentType { .. })));
}

#[test]
fn top_level_return_is_an_error() {
    assert!(matches!(assert_failure("return 1;"),
                     Error::Runtime(RuntimeError::ReturnOutsideFunction { line: 1 })));
}

#[test]
fn integer_faults_are_errors() {
    assert!(matches!(assert_failure("print 1 / 0;"),
                     Error::Runtime(RuntimeError::DivisionByZero { .. })));
    assert!(matches!(assert_failure("print 1 % 0;"),
                     Error::Runtime(RuntimeError::DivisionByZero { .. })));
    assert!(matches!(assert_failure("print 9223372036854775807 + 1;"),
                     Error::Runtime(RuntimeError::Overflow { .. })));
    assert!(matches!(assert_failure("print 1.5 % 2;"),
                     Error::Runtime(RuntimeError::UnsupportedOperand { .. })));
}

#[test]
fn descriptions_read_back_as_the_same_value() {
    let evaluate = |source: &str| match run(&format!("{source};")) {
        (Ok(Some(value)), _) => value,
        (other, _) => panic!("{source} did not produce a value: {other:?}"),
    };

    let sources = ["0",
                   "42",
                   "-17",
                   "9223372036854775807",
                   "-9223372036854775807 - 1",
                   "3.0",
                   "-0.25",
                   "10.0 ^ 20",
                   "-(10.0 ^ 300)",
                   "1.0 / 3.0",
                   "0.1 + 0.2",
                   "1.0 / 10000000",
                   "true",
                   "false",
                   "\"hello world\""];
    for source in sources {
        let value = evaluate(source);
        let text = match &value {
            Value::String(text) => format!("\"{text}\""),
            other => other.describe(),
        };
        let again = evaluate(&text);
        assert_eq!(again.type_tag(), value.type_tag(), "{source} printed as {text}");
        assert!(again.equals(&value), "{source} printed as {text}");
    }
}

#[test]
fn comparison_and_equality() {
    assert_output("print 1 < 2;\nprint 2.5 >= 3;\nprint 1 == 1.0;\nprint \"a\" != \"b\";",
                  "true\nfalse\ntrue\ntrue\n");
    assert_output("print [1, 2] == [1, 2];\nprint @[1 : 2] == @[1 : 3];", "true\nfalse\n");
    assert!(matches!(assert_failure("print \"a\" < \"b\";"),
                     Error::Runtime(RuntimeError::UnsupportedOperand { .. })));
}

#[test]
fn logic_and_conditionals() {
    assert_output("print !0;\nprint 1 && nil;\nprint 0 || \"x\";", "true\nfalse\ntrue\n");
    assert_output("print 1 < 2 ? \"yes\" : \"no\";", "yes\n");
    assert_output("print nil ?: \"fallback\";\nprint 5 ?: 6;", "fallback\n5\n");
}

#[test]
fn increments_and_compound_assignment() {
    let src = "
        Integer x = 5;
        print x++;
        print x;
        print ++x;
        print --x;
        x *= 3;
        print x;
        x %= 4;
        print x;
    ";
    assert_output(src, "5\n6\n7\n6\n18\n2\n");
}

#[test]
fn subscripts_read_and_write() {
    let src = "
        Array grid = [[1, 2], [3, 4]];
        grid[1][0] = 30;
        grid[0][1] += 10;
        print grid;
        Dict ages = @[\"ann\" : 31];
        ages[\"bob\"] = 40;
        print ages[\"bob\"];
        print ages.length();
    ";
    assert_output(src, "[[1, 12], [30, 4]]\n40\n2\n");

    assert!(matches!(assert_failure("Array a = [1];\na[1] = 2;"),
                     Error::Runtime(RuntimeError::IndexOutOfBounds { index: 1,
                                                                     length: 1,
                                                                     .. })));
    assert!(matches!(assert_failure("Dict d = @[];\nprint d[\"none\"];"),
                     Error::Runtime(RuntimeError::MissingKey { .. })));
}

#[test]
fn containers_are_copied_on_write() {
    let src = "
        Array first = [1, 2];
        Array second = first;
        second.append(3);
        print first;
        print second;
    ";
    assert_output(src, "[1, 2]\n[1, 2, 3]\n");
}

#[test]
fn mutating_methods_write_back_to_nested_places() {
    let src = "
        Dict groups = @[\"odd\" : [1], \"even\" : []];
        groups[\"even\"].append(2);
        groups.add(\"none\", []);
        print groups;
    ";
    assert_output(src, "{odd: [1], even: [2], none: []}\n");
}

#[test]
fn chained_mutating_calls_update_the_variable() {
    let src = "
        Array items;
        items.append(1).append(2);
        Dict counts = @[];
        counts.add(\"a\", 1).add(\"b\", 2);
        Dict groups = @[\"odd\" : []];
        groups[\"odd\"].append(1).append(3);
        print items;
        print counts;
        print groups;
    ";
    assert_output(src, "[1, 2]\n{a: 1, b: 2}\n{odd: [1, 3]}\n");
}

#[test]
fn bound_mutating_methods_update_their_variable() {
    let src = "
        Array items = [1];
        Function push = items.append;
        push(2);
        push(3);
        print items;
        Array copy = items;
        copy.append(4);
        print items;
    ";
    assert_output(src, "[1, 2, 3]\n[1, 2, 3]\n");
}

#[test]
fn appending_to_a_variable_does_not_copy_it() {
    let mut context = Context::with_output(Config::default(), Capture::default());
    run_source(&mut context, "Array items = [1, 2, 3];").expect("declaration runs");

    let storage = |context: &Context| match context.root().get("items", 0) {
        Ok(Value::Array(elements)) => Rc::as_ptr(&elements),
        other => panic!("unexpected binding: {other:?}"),
    };
    let before = storage(&context);
    run_source(&mut context, "for (Integer i = 0; i < 100; i++) items.append(i);").expect("loop runs");
    assert_eq!(storage(&context), before);
}

#[test]
fn arrays_map_filter_and_reject() {
    let src = "
        Array numbers = [1, 2, 3, 4];
        print numbers.map(^(Integer n) { return n * n; });
        print numbers.filter(^(Integer n) { return n % 2 == 0; });
        print numbers.reject(^(Integer n) { return n % 2 == 0; });
        print numbers.length();
        print numbers.at(3);
    ";
    assert_output(src, "[1, 4, 9, 16]\n[2, 4]\n[1, 3]\n4\n4\n");
}

#[test]
fn string_methods() {
    let src = "
        String word = \"prometheus\";
        print word.length();
        print word.at(0);
        print word.substr(3, 4);
        print word.substr(8, 100);
        print word.append(\"!\");
        print word;
    ";
    assert_output(src, "10\np\nmeth\nus\nprometheus!\nprometheus\n");
    assert!(matches!(assert_failure("\"abc\".at(3);"),
                     Error::Runtime(RuntimeError::IndexOutOfBounds { .. })));
}

#[test]
fn missing_methods_are_reported() {
    assert!(matches!(assert_failure("[1].length(1);"),
                     Error::Runtime(RuntimeError::ArgumentCount { .. })));
    assert!(matches!(assert_failure("1.fly();"),
                     Error::Runtime(RuntimeError::MissingMethod { .. })));
    assert!(matches!(assert_failure("Integer x = 1;\nx();"),
                     Error::Runtime(RuntimeError::NotCallable { .. })));
}

#[test]
fn bound_methods_are_values() {
    let src = "
        String greeting = \"hello\";
        Function size = greeting.length;
        print size();
        print size;
    ";
    assert_output(src, "5\n<Method:- Integer length()>\n");
}

#[test]
fn callables_describe_themselves() {
    let src = "
        Integer twice(Integer x) { return x * 2; }
        Block half = ^(Integer x) { return x / 2; }
        print twice;
        print half;
    ";
    assert_output(src, "<Function:Integer twice(Integer)>\n<Block:^(Integer x)>\n");
}

#[test]
fn print_interpolates_variables() {
    let src = "
        String name = \"world\";
        Array items = [1, 2];
        print \"hello <name>, items are <items>\";
        print \"1 < 2 and <not an identifier>\";
    ";
    assert_output(src, "hello world, items are [1, 2]\n1 < 2 and <not an identifier>\n");

    assert!(matches!(assert_failure("print \"<nobody>\";"),
                     Error::Runtime(RuntimeError::UndeclaredVariable { .. })));
}

#[test]
fn for_loops() {
    let src = "
        Integer total = 0;
        for (Integer i = 1; i <= 4; i++) total += i;
        print total;
        for (Integer i = 0; i < 2; i++) {
            Integer doubled = i * 2;
            print doubled;
        }
    ";
    assert_output(src, "10\n0\n2\n");

    let (result, output) = run("for (;;) { print \"once\"; stop(); }");
    assert_eq!(output, "once\n");
    assert!(matches!(result, Err(Error::Runtime(RuntimeError::UndeclaredVariable { .. }))));
}

#[test]
fn return_leaves_nested_loops() {
    let src = "
        Integer first_even(Array items) {
            Integer i = 0;
            while (true) {
                for (Integer j = 0; j < 3; j++) {
                    if (items[i] % 2 == 0) return items[i];
                }
                i++;
            }
        }
        print first_even([1, 3, 4]);
    ";
    assert_output(src, "4\n");
}

#[test]
fn comma_expressions_yield_the_last_part() {
    let (result, _) = run("Integer a = 0;\na = 1, a + 1;");
    assert_eq!(result.unwrap(), Some(Value::Integer(2)));
}

#[test]
fn pipe_mode_prints_the_last_value() {
    let config = Config { pipe_mode: true,
                          ..Config::default() };
    let (result, output) = run_with(config, "Integer x = 4;\nx * 2;");
    assert!(result.is_ok());
    assert_eq!(output, "8\n");
}

#[test]
fn state_persists_across_runs() {
    let capture = Capture::default();
    let mut context = Context::with_output(Config::default(), capture.clone());

    run_source(&mut context, "Integer count = 1;").unwrap();
    run_source(&mut context, "count += 1;").unwrap();
    assert!(run_source(&mut context, "Integer count = 3;").is_err());
    run_source(&mut context, "print count;").unwrap();

    assert_eq!(capture.text(), "2\n");
}

#[test]
fn syntax_errors_stop_before_running() {
    let (result, output) = run("print 1;\nprint (2;");
    assert!(matches!(result, Err(Error::Parse(_))));
    assert_eq!(output, "");

    let e = assert_failure("Integer x = 1;\nx = $;");
    assert_eq!(e.line(), 2);
    assert!(e.to_string().starts_with("Error on line 2"));

    assert!(matches!(assert_failure("Unknown x;"), Error::Parse(_)));
    assert!(matches!(assert_failure("1 = 2;"), Error::Parse(_)));
    assert!(matches!(assert_failure("print \"unterminated;"), Error::Parse(_)));

    let deep = format!("print {}1{};", "(".repeat(10_000), ")".repeat(10_000));
    assert!(matches!(assert_failure(&deep), Error::Parse(ParseError::NestingTooDeep { .. })));
}

#[test]
fn comments_are_ignored() {
    let src = "
        // a line comment
        /* a block
           comment */
        print 1; // trailing
    ";
    assert_output(src, "1\n");
}

use std::io::Cursor;
use valo::run_program;
use valo_interp::value::Value;
use valo_source::{ErrorKind, Loc};

fn interpret_with_input(source: &str, input: &str) -> (Value, String) {
    let mut input = Cursor::new(input.to_string());
    let mut output = Vec::new();
    let value = run_program(source, &mut input, &mut output).unwrap();
    (value, String::from_utf8(output).unwrap())
}

fn interpret(source: &str) -> Value {
    let (value, _) = interpret_with_input(source, "");
    value
}

fn interpret_err(source: &str) -> valo_source::Error {
    let mut input = Cursor::new(String::new());
    let mut output = Vec::new();
    run_program(source, &mut input, &mut output).unwrap_err()
}

#[test]
fn math() {
    assert_eq!(interpret("1+2+3*2"), Value::Int(9));
}

#[test]
fn shadowing() {
    assert_eq!(
        interpret(
            r#"
var a = 6;
{var a = 7}
a"#,
        ),
        Value::Int(6)
    );
}

#[test]
fn fibonacci_sum() {
    assert_eq!(
        interpret(
            r#"
# calculate sum of the 9 first fibonacci numbers
var sum = 0;
var last1 = 1;
var last2 = 0;
var c = 0;
while c < 9 do {
    sum = sum + last1;
    c = c + 1;
    var tmp = last1 + last2;
    last2 = last1;
    last1 = tmp;
}
sum
"#,
        ),
        Value::Int(88)
    );
}

#[test]
fn block_value_propagation() {
    assert_eq!(
        interpret("if false then 1 else 1 + {1} 5"),
        Value::Int(5)
    );
}

#[test]
fn collatz_length() {
    assert_eq!(
        interpret(
            r#"
var i = 27;
var c = 0;
while i != 1 do {
    c = c + 1;
    if i % 2 == 0 then {
        i = i / 2;
    } else {
        i = 3 * i + 1;
    }
}
c
"#,
        ),
        Value::Int(111)
    );
}

#[test]
fn primality() {
    assert_eq!(
        interpret(
            r#"
var n = 83;
var divisor = n / 2;
var is_prime = true;
while divisor != 1 do {
    if n % divisor == 0 then is_prime = false;
    divisor = divisor - 1; # this is a comment
}
is_prime
"#,
        ),
        Value::Bool(true)
    );
}

#[test]
fn digit_sum() {
    assert_eq!(
        interpret(
            r#"
var num = 1659327469345786762;
var sum = 0;
while num > 0 do {
    var digit = num % 10;
    sum = sum + digit;
    num = num / 10;
}
sum
"#,
        ),
        Value::Int(100)
    );
}

#[test]
fn floor_division_rounds_toward_negative_infinity() {
    assert_eq!(interpret("-7 / 2"), Value::Int(-4));
    assert_eq!(interpret("7 / 2"), Value::Int(3));
}

#[test]
fn printing() {
    let (value, output) = interpret_with_input(
        r#"
print_int(42);
print_bool(1 < 2);
print_int(0 - 1)
"#,
        "",
    );
    assert_eq!(value, Value::Unit);
    assert_eq!(output, "42\ntrue\n-1\n");
}

#[test]
fn reading_input() {
    let (value, output) = interpret_with_input(
        r#"
var a = read_int();
var b = read_int();
print_int(a + b)
"#,
        "3\n4\n",
    );
    assert_eq!(value, Value::Unit);
    assert_eq!(output, "7\n");
}

#[test]
fn bad_input_is_an_input_format_error() {
    let mut input = Cursor::new("not a number\n".to_string());
    let mut output = Vec::new();
    let error = run_program("read_int()", &mut input, &mut output).unwrap_err();
    assert_eq!(error.kind, ErrorKind::InputFormat);
}

#[test]
fn type_change_is_rejected() {
    let error = interpret_err("var a = 1; a = true");
    assert_eq!(error.kind, ErrorKind::Type);
}

#[test]
fn division_by_zero_is_an_arithmetic_error() {
    assert_eq!(interpret_err("1 / 0").kind, ErrorKind::Arithmetic);
    assert_eq!(interpret_err("var a = 4; a % (a - a)").kind, ErrorKind::Arithmetic);
}

#[test]
fn undefined_identifier_reports_its_location() {
    let error = interpret_err("x");
    assert_eq!(error.kind, ErrorKind::Name);
    assert_eq!(error.loc, Some(Loc::new(0, 0)));
}

#[test]
fn unknown_function_is_an_arity_error() {
    assert_eq!(interpret_err("flush()").kind, ErrorKind::Arity);
    assert_eq!(interpret_err("print_int(1, 2)").kind, ErrorKind::Arity);
}

#[test]
fn lexical_error_carries_a_location() {
    let error = interpret_err("var x = @");
    assert_eq!(error.kind, ErrorKind::Syntax);
    assert_eq!(error.loc, Some(Loc::new(0, 8)));
}

#[test]
fn pathological_nesting_is_resource_exhaustion() {
    let mut source = String::new();
    for _ in 0..10_000 {
        source.push('{');
    }
    let error = interpret_err(&source);
    assert_eq!(error.kind, ErrorKind::ResourceExhaustion);
}

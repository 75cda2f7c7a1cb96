//! CLI polish: argument parsing, operand reading, execution and diagnostics.

use arrayop::builtins::{lookup, NAMES};
use arrayop::cli::{parse_args, CliArgs, ParseArgsResult};
use arrayop::diagnostics::{byte_to_line_col, render_error};
use arrayop::parser::{parse_operation, parse_value};
use arrayop::syntax::Operation;
use arrayop::{execute, invocation_source, EmitKind, ScType, Value};

fn args(list: &[&str]) -> Vec<String> {
    std::iter::once("arrayop")
        .chain(list.iter().copied())
        .map(str::to_owned)
        .collect()
}

fn parsed(list: &[&str]) -> CliArgs {
    match parse_args(&args(list)).expect("should parse") {
        ParseArgsResult::Args(cli) => cli,
        other => panic!("expected Args, got {:?}", other),
    }
}

fn run(list: &[&str]) -> Result<String, arrayop::Error> {
    execute(&parsed(list))
}

// ---------------------------------------------------------------------------
// 1. parse_args
// ---------------------------------------------------------------------------

#[test]
fn test_parse_args_defaults() {
    let cli = parsed(&["+", "1", "2"]);
    assert_eq!(cli.emit, EmitKind::Eval);
    assert_eq!(cli.builtin, "+");
    assert_eq!(cli.operands, vec!["1", "2"]);
    assert_eq!(cli.max_depth, 500);
}

#[test]
fn test_parse_args_flags() {
    let cli = parsed(&["--emit", "glsl", "--max-depth", "8", "max", "a:float", "b:float"]);
    assert_eq!(cli.emit, EmitKind::Glsl);
    assert_eq!(cli.max_depth, 8);
    assert_eq!(cli.builtin, "max");
}

#[test]
fn test_parse_args_negative_operands_are_positional() {
    let cli = parsed(&["-", "-1", "-2"]);
    assert_eq!(cli.builtin, "-");
    assert_eq!(cli.operands, vec!["-1", "-2"]);
}

#[test]
fn test_parse_args_help_and_version() {
    assert!(matches!(parse_args(&args(&["--help"])), Ok(ParseArgsResult::Help)));
    assert!(matches!(parse_args(&args(&["-V"])), Ok(ParseArgsResult::Version)));
}

#[test]
fn test_parse_args_errors() {
    let err = parse_args(&args(&["--emit", "llvm", "+"])).unwrap_err();
    assert!(err.contains("unknown emit kind"), "got: {}", err);
    let err = parse_args(&args(&["--max-depth", "deep", "+"])).unwrap_err();
    assert!(err.contains("not a valid positive integer"), "got: {}", err);
    let err = parse_args(&args(&["--max-depth", "0", "+"])).unwrap_err();
    assert!(err.contains("not a valid positive integer"), "got: {}", err);
    let err = parse_args(&args(&[])).unwrap_err();
    assert!(err.contains("no builtin"), "got: {}", err);
}

#[test]
fn test_help_lists_every_builtin() {
    let help = arrayop::cli::help_text();
    for name in NAMES {
        assert!(help.contains(name), "help text missing {}:\n{}", name, help);
        assert!(lookup(name).is_some(), "registry missing {}", name);
    }
}

// ---------------------------------------------------------------------------
// 2. Operand reader
// ---------------------------------------------------------------------------

#[test]
fn test_parse_values() {
    assert_eq!(parse_value("1.5").unwrap(), Value::Num(1.5));
    assert_eq!(parse_value("#true").unwrap(), Value::Bool(true));
    assert_eq!(parse_value(" [1, [2,#false], []] ").unwrap().to_string(), "[1,[2,#false],[]]");
}

#[test]
fn test_parse_value_rejects_variables() {
    assert!(parse_value("p:vec3").is_err());
}

#[test]
fn test_parse_operation_variables() {
    match parse_operation("[p:vec3, 1]").unwrap() {
        Operation::List(items) => {
            assert!(matches!(&items[0], Operation::Variable { name, ty } if name == "p" && *ty == ScType::Vec(3)));
            assert!(matches!(&items[1], Operation::Constant(Value::Num(n)) if *n == 1.0));
        }
        other => panic!("expected a list, got {:?}", other),
    }
}

#[test]
fn test_parse_errors() {
    let err = parse_value("[1,2").unwrap_err();
    assert!(err.to_string().contains("end of input"), "got: {}", err);
    let err = parse_value("1 2").unwrap_err();
    assert!(err.to_string().contains("unexpected character '2'"), "got: {}", err);
    let err = parse_operation("p:vec9").unwrap_err();
    assert!(err.to_string().contains("unknown type 'vec9'"), "got: {}", err);
}

// ---------------------------------------------------------------------------
// 3. execute
// ---------------------------------------------------------------------------

#[test]
fn test_execute_eval() {
    assert_eq!(run(&["+", "[1,2,3]", "[10,20,30]"]).unwrap(), "[11,22,33]\n");
    assert_eq!(run(&["sum", "[1,2,3]"]).unwrap(), "6\n");
    assert_eq!(run(&["sum", "[]"]).unwrap(), "0\n");
    assert_eq!(run(&["all", "[#true,#false]"]).unwrap(), "#false\n");
    assert_eq!(run(&["neg", "[1,-2]"]).unwrap(), "[-1,2]\n");
}

#[test]
fn test_execute_glsl() {
    let out = run(&["--emit", "glsl", "sum", "[a:float,b:float,c:float]"]).unwrap();
    assert_eq!(
        out,
        "float op(float a, float b, float c)\n{\n  float r1 = a + b;\n  float r2 = r1 + c;\n  return r2;\n}\n"
    );
}

#[test]
fn test_execute_glsl_binary() {
    let out = run(&["--emit", "glsl", "max", "a:vec2", "b:float"]).unwrap();
    assert!(out.contains("vec2 r2 = max(a,r1);"), "got:\n{}", out);
}

#[test]
fn test_execute_unknown_builtin() {
    let err = run(&["frobnicate", "1"]).unwrap_err();
    assert!(err.to_string().contains("unknown builtin 'frobnicate'"), "got: {}", err);
}

#[test]
fn test_execute_arity() {
    let err = run(&["+", "1"]).unwrap_err();
    assert!(err.to_string().contains("takes 2 operand(s), got 1"), "got: {}", err);
}

#[test]
fn test_execute_depth_limit() {
    let err = run(&["--max-depth", "2", "neg", "[[[1]]]"]).unwrap_err();
    assert_eq!(err.diagnostic_code(), "E0104");
    assert_eq!(run(&["--max-depth", "3", "neg", "[[[1]]]"]).unwrap(), "[[[-1]]]\n");
}

// ---------------------------------------------------------------------------
// 4. Diagnostics
// ---------------------------------------------------------------------------

#[test]
fn test_byte_to_line_col() {
    assert_eq!(byte_to_line_col("abc\ndef\n", 4), (2, 1));
    assert_eq!(byte_to_line_col("hello", 2), (1, 3));
}

#[test]
fn test_render_points_at_operator() {
    let cli = parsed(&["+", "[1,2]", "[1,2,3]"]);
    let err = execute(&cli).unwrap_err();
    let source = invocation_source(&cli);
    assert_eq!(source, "[1,2] + [1,2,3]");
    let rendered = render_error(&source, &err);
    assert!(
        rendered.contains("mismatched list sizes (2,3)"),
        "got:\n{}",
        rendered
    );
    assert!(rendered.contains(" --> 1:7"), "got:\n{}", rendered);
    assert!(rendered.contains("|       ^"), "got:\n{}", rendered);
}

#[test]
fn test_render_points_at_bad_operand() {
    let cli = parsed(&["max", "1", "#maybe"]);
    let err = execute(&cli).unwrap_err();
    let source = invocation_source(&cli);
    assert_eq!(source, "max[1,#maybe]");
    let rendered = render_error(&source, &err);
    assert!(rendered.starts_with("error[E0300]"), "got:\n{}", rendered);
    assert!(rendered.contains(" --> 1:7"), "got:\n{}", rendered);
}

#[test]
fn test_named_binary_reports_argument_position() {
    let err = run(&["max", "1", "#true"]).unwrap_err();
    assert_eq!(err.position(), Some(1));
    assert!(err.to_string().contains("(at argument 1)"), "got: {}", err);
}

#[test]
fn test_operator_binary_reports_expression() {
    let err = run(&["+", "#true", "1"]).unwrap_err();
    assert_eq!(err.to_string(), "[runtime error] #true + 1: domain error");
}

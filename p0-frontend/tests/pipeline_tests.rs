//! End-to-end: syntax tree in, program output out

use p0_common::{BinaryOp, CompilerError, Diagnostic, UnaryOp};
use p0_frontend::ast::build::*;
use p0_frontend::ast::{self, Type as T};
use p0_frontend::Frontend;
use p0_vm::run_to_string;
use pretty_assertions::assert_eq;

fn run(program: ast::Program) -> String {
    let module = Frontend::compile(&program, "Test").expect("program should compile");
    run_to_string(module).expect("program should run")
}

fn diagnostics(program: ast::Program) -> Vec<Diagnostic> {
    match Frontend::compile(&program, "Test") {
        Err(CompilerError::Diagnostics { diagnostics }) => diagnostics,
        Err(other) => panic!("expected diagnostics, got {other}"),
        Ok(_) => panic!("expected diagnostics, got a module"),
    }
}

fn println(arguments: Vec<ast::Expression>) -> ast::Statement {
    call_stmt("println", arguments)
}

#[test]
fn test_call_with_arguments() {
    let output = run(program(vec![
        fun(
            "add",
            &[("a", T::Int), ("b", T::Int)],
            vec![],
            Some((T::Int, binary(BinaryOp::Plus, var("a"), var("b")))),
        ),
        main(vec![println(vec![call("add", vec![int("2"), int("3")])])]),
    ]));

    assert_eq!(output, "5\n");
}

#[test]
fn test_and_evaluates_both_sides() {
    let output = run(program(vec![
        global_let("calls", lit(int_value("0"))),
        fun(
            "touch",
            &[],
            vec![assign("calls", binary(BinaryOp::Plus, var("calls"), int("1")))],
            Some((T::Bool, boolean(false))),
        ),
        main(vec![
            let_var("r", binary(BinaryOp::And, boolean(false), call("touch", vec![]))),
            println(vec![var("r"), var("calls")]),
        ]),
    ]));

    assert_eq!(output, "False1\n");
}

#[test]
fn test_recursion() {
    // fact(n) = n <= 1 ? 1 : n * fact(n - 1)
    let output = run(program(vec![
        main(vec![println(vec![call("fact", vec![int("10")])])]),
        fun(
            "fact",
            &[("n", T::Int)],
            vec![],
            Some((
                T::Int,
                ternary(
                    binary(BinaryOp::LessEqual, var("n"), int("1")),
                    int("1"),
                    binary(
                        BinaryOp::Times,
                        var("n"),
                        call("fact", vec![binary(BinaryOp::Minus, var("n"), int("1"))]),
                    ),
                ),
            )),
        ),
    ]));

    assert_eq!(output, "3628800\n");
}

#[test]
fn test_while_loop_with_locals() {
    let output = run(program(vec![main(vec![
        let_var("i", int("0")),
        let_var("sum", int("0")),
        while_do(
            binary(BinaryOp::LessThan, var("i"), int("5")),
            block(vec![
                assign("i", binary(BinaryOp::Plus, var("i"), int("1"))),
                assign("sum", binary(BinaryOp::Plus, var("sum"), var("i"))),
            ]),
        ),
        println(vec![var("sum")]),
    ])]));

    assert_eq!(output, "15\n");
}

#[test]
fn test_if_without_else() {
    let output = run(program(vec![main(vec![
        if_then(boolean(false), println(vec![string("no")])),
        if_then(binary(BinaryOp::NotEqual, int("1"), int("2")), println(vec![string("yes")])),
    ])]));

    assert_eq!(output, "yes\n");
}

#[test]
fn test_printed_forms() {
    let output = run(program(vec![main(vec![
        println(vec![binary(BinaryOp::Divide, float("1.0"), float("4.0"))]),
        println(vec![
            binary(BinaryOp::LessThan, int("1"), int("2")),
            binary(BinaryOp::GreaterEqual, float("2.5"), float("3.0")),
            unary(UnaryOp::UnaryNot, boolean(true)),
            binary(BinaryOp::Equal, boolean(true), boolean(true)),
            binary(BinaryOp::NotEqual, boolean(true), boolean(true)),
        ]),
        println(vec![unary(UnaryOp::UnaryMinus, float("1.5")), string(" "), binary(BinaryOp::Divide, int("7"), int("2"))]),
        call_stmt("print", vec![ternary(boolean(true), int("1"), int("2"))]),
        call_stmt("print", vec![paren(binary(BinaryOp::Or, boolean(false), boolean(true)))]),
    ])]));

    assert_eq!(output, "0.250000\nTrueFalseFalseTrueFalse\n-1.500000 3\n1True");
}

#[test]
fn test_globals_and_signed_initializers() {
    let output = run(program(vec![
        global_const("greeting", lit(string_value("hi"))),
        global_const("low", signed_lit(UnaryOp::UnaryMinus, int_value("2147483648"))),
        global_let("scale", signed_lit(UnaryOp::UnaryMinus, float_value("0.5"))),
        global_const("flag", signed_lit(UnaryOp::UnaryNot, bool_value(true))),
        main(vec![
            println(vec![var("greeting")]),
            println(vec![var("low")]),
            assign("scale", binary(BinaryOp::Times, var("scale"), float("4.0"))),
            println(vec![var("scale"), var("flag")]),
        ]),
    ]));

    assert_eq!(output, "hi\n-2147483648\n-2.000000False\n");
}

#[test]
fn test_int_min_in_expression() {
    let output = run(program(vec![main(vec![println(vec![unary(UnaryOp::UnaryMinus, int("2147483648"))])])]));

    assert_eq!(output, "-2147483648\n");
}

#[test]
fn test_sibling_blocks_do_not_clobber_outer_locals() {
    let output = run(program(vec![main(vec![
        let_var("x", int("1")),
        block(vec![let_var("y", int("2")), println(vec![var("y")])]),
        block(vec![let_var("z", int("3")), println(vec![var("z")])]),
        println(vec![var("x")]),
    ])]));

    assert_eq!(output, "2\n3\n1\n");
}

#[test]
fn test_declaration_as_if_branch_does_not_hide_the_global() {
    let output = run(program(vec![
        global_let("x", lit(int_value("0"))),
        main(vec![if_then(boolean(true), let_var("x", int("5"))), println(vec![var("x")])]),
    ]));

    assert_eq!(output, "0\n");
}

#[test]
fn test_declaration_as_loop_body_does_not_replace_the_local() {
    let output = run(program(vec![main(vec![
        let_var("x", int("1")),
        while_do(boolean(false), let_var("x", float("2.0"))),
        println(vec![var("x")]),
    ])]));

    assert_eq!(output, "1\n");
}

#[test]
fn test_repeated_local_in_main_shadows_the_first() {
    let output = run(program(vec![main(vec![
        let_var("x", int("1")),
        let_var("x", boolean(true)),
        println(vec![var("x")]),
    ])]));

    assert_eq!(output, "True\n");
}

#[test]
fn test_float_division_by_zero_prints_infinity() {
    let output = run(program(vec![main(vec![println(vec![
        binary(BinaryOp::Divide, float("1.0"), float("0.0")),
        string(" "),
        binary(BinaryOp::Divide, unary(UnaryOp::UnaryMinus, float("1.0")), float("0.0")),
    ])])]));

    assert_eq!(output, "Infinity -Infinity\n");
}

#[test]
fn test_program_without_main_prints_nothing() {
    let output = run(program(vec![fun("helper", &[], vec![println(vec![int("1")])], None)]));

    assert_eq!(output, "");
}

#[test]
fn test_unit_function_in_expression_yields_no_module() {
    let found = diagnostics(program(vec![
        fun("nothing", &[], vec![], None),
        main(vec![println(vec![call("nothing", vec![])])]),
    ]));

    assert_eq!(found.len(), 1);
    assert!(matches!(&found[0], Diagnostic::UnableToCallUnitFunctionAsValueFunction { name, .. } if name == "nothing"));
}

#[test]
fn test_redefinition_is_reported() {
    let found = diagnostics(program(vec![
        global_let("a", lit(int_value("1"))),
        global_const("a", lit(int_value("2"))),
        main(vec![]),
    ]));

    assert!(matches!(&found[..], [Diagnostic::AttemptToRedefineDeclaration { name, .. }] if name == "a"));
}

#[test]
fn test_bad_operand_reports_once() {
    let found = diagnostics(program(vec![main(vec![println(vec![binary(
        BinaryOp::Plus,
        int("1"),
        string("x"),
    )])])]));

    assert_eq!(found.len(), 1);
    assert!(matches!(found[0], Diagnostic::BinaryExpressionRequiresOperandType { .. }));
}

#[test]
fn test_all_diagnostics_are_collected() {
    let found = diagnostics(program(vec![main(vec![
        assign("missing", int("1")),
        if_then(int("1"), block(vec![])),
        while_do(float("1.0"), block(vec![])),
    ])]));

    assert_eq!(found.len(), 3);
}

#[test]
fn test_recompiling_is_byte_identical() {
    let build = || {
        program(vec![
            global_let("total", lit(float_value("0.0"))),
            fun("bump", &[("by", T::Float)], vec![assign("total", binary(BinaryOp::Plus, var("total"), var("by")))], None),
            main(vec![call_stmt("bump", vec![float("1.25")]), println(vec![var("total")])]),
        ])
    };

    let first = Frontend::compile(&build(), "Test").unwrap();
    let second = Frontend::compile(&build(), "Test").unwrap();
    assert_eq!(first.to_binary(), second.to_binary());
    assert_eq!(run_to_string(first).unwrap(), "1.250000\n");
}

const ADD_PROGRAM: &str = r#"{
    "declarations": [
        {
            "kind": "FunctionDeclaration",
            "identifier": { "name": "add" },
            "arguments": [[{ "name": "a" }, "Int"], [{ "name": "b" }, "Int"]],
            "suffix": ["Int", {
                "kind": "Binary",
                "op": "Plus",
                "expression1": { "kind": "IdentifierReference", "identifier": { "name": "a" } },
                "expression2": { "kind": "IdentifierReference", "identifier": { "name": "b" } }
            }]
        },
        {
            "kind": "FunctionDeclaration",
            "identifier": { "name": "main" },
            "statements": [
                {
                    "kind": "Call",
                    "identifier": { "name": "println" },
                    "expressions": [{
                        "kind": "Call",
                        "identifier": { "name": "add" },
                        "expressions": [
                            { "kind": "LiteralValue", "value": { "kind": "Int", "value": "2" } },
                            { "kind": "LiteralValue", "value": { "kind": "Int", "value": "3" } }
                        ]
                    }]
                },
                { "kind": "Empty" }
            ]
        }
    ]
}"#;

#[test]
fn test_json_program_runs() {
    let module = Frontend::compile_json(ADD_PROGRAM, "Json").unwrap();

    assert_eq!(run_to_string(module).unwrap(), "5\n");
}

#[test]
fn test_json_spans_reach_diagnostics() {
    let source = r#"{
        "declarations": [
            { "kind": "VariableDeclaration", "access": "ReadOnly",
              "identifier": { "name": "a", "span": { "start": { "line": 1, "column": 7 }, "end": { "line": 1, "column": 7 } } },
              "expression": { "kind": "Value", "value": { "kind": "Int", "value": "1" } } },
            { "kind": "VariableDeclaration", "access": "ReadWrite",
              "identifier": { "name": "a", "span": { "start": { "line": 2, "column": 5 }, "end": { "line": 2, "column": 5 } } },
              "expression": { "kind": "Value", "value": { "kind": "Bool", "value": true } } }
        ]
    }"#;

    let err = Frontend::compile_json(source, "Json").unwrap_err();
    let messages: Vec<String> = err.diagnostics().iter().map(|d| d.to_string()).collect();
    assert_eq!(messages, vec!["2:5: attempt to redefine 'a'".to_string()]);
}

use super::compile;
use crate::ast::build::*;
use crate::ast::{self, Type as T};
use crate::semantic::translate;
use crate::tst;
use p0_bytecode::{Condition, Constant, FieldRef, FieldType, Function, Instruction, MethodDescriptor, MethodRef, Module};
use p0_common::{BinaryOp, CompilerError, Type, UnaryOp};
use pretty_assertions::assert_eq;

fn generate(program: ast::Program) -> Module {
    let tst = translate(&program).expect("program should translate");
    compile(&tst, "Test").expect("program should compile")
}

fn routine<'a>(module: &'a Module, name: &str) -> &'a Function {
    module.get_function(name).unwrap_or_else(|| panic!("no routine {name}"))
}

fn field(name: &str, field_type: FieldType) -> FieldRef {
    FieldRef { owner: "Test".to_string(), name: name.to_string(), field_type }
}

#[test]
fn test_module_layout() {
    let module = generate(program(vec![
        global_const("limit", lit(int_value("10"))),
        global_let("ratio", lit(float_value("0.5"))),
        fun("helper", &[], vec![], None),
        main(vec![]),
    ]));

    let names: Vec<&str> = module.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["<init>", "helper", "main"]);

    assert_eq!(routine(&module, "<init>").code, vec![Instruction::Return]);
    assert_eq!(routine(&module, "<init>").descriptor.to_string(), "()V");

    assert_eq!(module.fields.len(), 2);
    assert!(module.fields[0].is_final);
    assert_eq!(module.fields[0].initial, Constant::Int(10));
    assert!(!module.fields[1].is_final);
    assert_eq!(module.fields[1].field_type, FieldType::Float);
}

#[test]
fn test_function_with_result() {
    let module = generate(program(vec![fun(
        "add",
        &[("a", T::Int), ("b", T::Int)],
        vec![],
        Some((T::Int, binary(BinaryOp::Plus, var("a"), var("b")))),
    )]));

    let add = routine(&module, "add");
    assert_eq!(add.descriptor.to_string(), "(II)I");
    assert_eq!(add.max_locals, 2);
    assert_eq!(add.code, vec![Instruction::ILoad(0), Instruction::ILoad(1), Instruction::IAdd, Instruction::IReturn]);
}

#[test]
fn test_float_and_bool_returns() {
    let module = generate(program(vec![
        fun("half", &[("x", T::Float)], vec![], Some((T::Float, binary(BinaryOp::Divide, var("x"), float("2.0"))))),
        fun("yes", &[], vec![], Some((T::Bool, boolean(true)))),
    ]));

    assert_eq!(
        routine(&module, "half").code,
        vec![Instruction::FLoad(0), Instruction::FConst(2.0), Instruction::FDiv, Instruction::FReturn]
    );
    assert_eq!(routine(&module, "yes").code, vec![Instruction::IConst(1), Instruction::IReturn]);
}

#[test]
fn test_sibling_blocks_share_a_slot() {
    let module = generate(program(vec![main(vec![
        block(vec![let_var("x", int("1"))]),
        block(vec![let_var("y", float("2.0"))]),
    ])]));

    let main = routine(&module, "main");
    assert_eq!(
        main.code,
        vec![
            Instruction::IConst(1),
            Instruction::IStore(1),
            Instruction::FConst(2.0),
            Instruction::FStore(1),
            Instruction::Return,
        ]
    );
    assert_eq!(main.max_locals, 2);
}

#[test]
fn test_same_block_gets_distinct_slots() {
    let module = generate(program(vec![main(vec![let_var("a", int("1")), let_var("b", var("a"))])]));

    assert_eq!(
        routine(&module, "main").code,
        vec![
            Instruction::IConst(1),
            Instruction::IStore(1),
            Instruction::ILoad(1),
            Instruction::IStore(2),
            Instruction::Return,
        ]
    );
}

#[test]
fn test_globals_use_static_fields() {
    let module = generate(program(vec![
        global_let("count", lit(int_value("0"))),
        main(vec![assign("count", binary(BinaryOp::Plus, var("count"), int("1")))]),
    ]));

    assert_eq!(
        routine(&module, "main").code,
        vec![
            Instruction::GetStatic(field("count", FieldType::Int)),
            Instruction::IConst(1),
            Instruction::IAdd,
            Instruction::PutStatic(field("count", FieldType::Int)),
            Instruction::Return,
        ]
    );
}

#[test]
fn test_int_comparison_materializes_a_boolean() {
    let module = generate(program(vec![fun(
        "less",
        &[("a", T::Int), ("b", T::Int)],
        vec![],
        Some((T::Bool, binary(BinaryOp::LessThan, var("a"), var("b")))),
    )]));

    assert_eq!(
        routine(&module, "less").code,
        vec![
            Instruction::ILoad(0),
            Instruction::ILoad(1),
            Instruction::IfICmp(Condition::Lt, 5),
            Instruction::IConst(0),
            Instruction::Goto(6),
            Instruction::IConst(1),
            Instruction::IReturn,
        ]
    );
}

#[test]
fn test_float_comparison_goes_through_fcmpg() {
    let module = generate(program(vec![fun(
        "at_least",
        &[("a", T::Float), ("b", T::Float)],
        vec![],
        Some((T::Bool, binary(BinaryOp::GreaterEqual, var("a"), var("b")))),
    )]));

    assert_eq!(
        routine(&module, "at_least").code,
        vec![
            Instruction::FLoad(0),
            Instruction::FLoad(1),
            Instruction::FCmpG,
            Instruction::If(Condition::Ge, 6),
            Instruction::IConst(0),
            Instruction::Goto(7),
            Instruction::IConst(1),
            Instruction::IReturn,
        ]
    );
}

#[test]
fn test_bool_equality_uses_xor() {
    let module = generate(program(vec![
        fun("same", &[("a", T::Bool), ("b", T::Bool)], vec![], Some((T::Bool, binary(BinaryOp::Equal, var("a"), var("b"))))),
        fun("differ", &[("a", T::Bool), ("b", T::Bool)], vec![], Some((T::Bool, binary(BinaryOp::NotEqual, var("a"), var("b"))))),
    ]));

    assert_eq!(
        routine(&module, "same").code,
        vec![
            Instruction::ILoad(0),
            Instruction::ILoad(1),
            Instruction::IXor,
            Instruction::IConst(1),
            Instruction::IXor,
            Instruction::IReturn,
        ]
    );
    assert_eq!(
        routine(&module, "differ").code,
        vec![Instruction::ILoad(0), Instruction::ILoad(1), Instruction::IXor, Instruction::IReturn]
    );
}

#[test]
fn test_and_evaluates_both_operands() {
    let module = generate(program(vec![
        fun("check", &[], vec![], Some((T::Bool, boolean(false)))),
        main(vec![let_var("x", binary(BinaryOp::And, boolean(true), call("check", vec![])))]),
    ]));

    assert_eq!(
        routine(&module, "main").code,
        vec![
            Instruction::IConst(1),
            Instruction::InvokeStatic(MethodRef {
                owner: "Test".to_string(),
                name: "check".to_string(),
                descriptor: MethodDescriptor::new(vec![], Some(FieldType::Bool)),
            }),
            Instruction::IAnd,
            Instruction::IStore(1),
            Instruction::Return,
        ]
    );
}

#[test]
fn test_unary_operators() {
    let module = generate(program(vec![
        fun("not", &[("b", T::Bool)], vec![], Some((T::Bool, unary(UnaryOp::UnaryNot, var("b"))))),
        fun("neg", &[("x", T::Float)], vec![], Some((T::Float, unary(UnaryOp::UnaryMinus, var("x"))))),
        fun("same", &[("x", T::Int)], vec![], Some((T::Int, unary(UnaryOp::UnaryPlus, var("x"))))),
    ]));

    assert_eq!(
        routine(&module, "not").code,
        vec![
            Instruction::ILoad(0),
            Instruction::If(Condition::Eq, 4),
            Instruction::IConst(0),
            Instruction::Goto(5),
            Instruction::IConst(1),
            Instruction::IReturn,
        ]
    );
    assert_eq!(routine(&module, "neg").code, vec![Instruction::FLoad(0), Instruction::FNeg, Instruction::FReturn]);
    assert_eq!(routine(&module, "same").code, vec![Instruction::ILoad(0), Instruction::IReturn]);
}

#[test]
fn test_if_and_while_lowering() {
    let module = generate(program(vec![main(vec![
        if_then_else(boolean(true), call_stmt("print", vec![int("1")]), call_stmt("print", vec![int("2")])),
        while_do(boolean(false), block(vec![])),
    ])]));

    assert_eq!(
        routine(&module, "main").code,
        vec![
            Instruction::IConst(1),
            Instruction::If(Condition::Eq, 6),
            Instruction::GetStdout,
            Instruction::IConst(1),
            Instruction::Print(FieldType::Int),
            Instruction::Goto(9),
            Instruction::GetStdout,
            Instruction::IConst(2),
            Instruction::Print(FieldType::Int),
            Instruction::IConst(0),
            Instruction::If(Condition::Eq, 12),
            Instruction::Goto(9),
            Instruction::Return,
        ]
    );
}

#[test]
fn test_declaration_as_branch_stays_in_the_branch() {
    let module = generate(program(vec![
        global_let("x", lit(int_value("0"))),
        main(vec![if_then(boolean(true), let_var("x", int("5"))), assign("x", int("7"))]),
    ]));

    let main = routine(&module, "main");
    assert_eq!(
        main.code,
        vec![
            Instruction::IConst(1),
            Instruction::If(Condition::Eq, 5),
            Instruction::IConst(5),
            Instruction::IStore(1),
            Instruction::Goto(5),
            Instruction::IConst(7),
            Instruction::PutStatic(field("x", FieldType::Int)),
            Instruction::Return,
        ]
    );
    assert_eq!(main.max_locals, 2);
}

#[test]
fn test_declaration_as_loop_body_stays_in_the_loop() {
    let module = generate(program(vec![main(vec![
        let_var("x", int("1")),
        while_do(boolean(false), let_var("x", float("2.0"))),
        assign("x", int("3")),
    ])]));

    let main = routine(&module, "main");
    assert_eq!(
        main.code,
        vec![
            Instruction::IConst(1),
            Instruction::IStore(1),
            Instruction::IConst(0),
            Instruction::If(Condition::Eq, 7),
            Instruction::FConst(2.0),
            Instruction::FStore(2),
            Instruction::Goto(2),
            Instruction::IConst(3),
            Instruction::IStore(1),
            Instruction::Return,
        ]
    );
    assert_eq!(main.max_locals, 3);
}

#[test]
fn test_ternary_lowering() {
    let module = generate(program(vec![fun(
        "pick",
        &[("c", T::Bool)],
        vec![],
        Some((T::Int, ternary(var("c"), int("1"), int("2")))),
    )]));

    assert_eq!(
        routine(&module, "pick").code,
        vec![
            Instruction::ILoad(0),
            Instruction::If(Condition::Eq, 4),
            Instruction::IConst(1),
            Instruction::Goto(5),
            Instruction::IConst(2),
            Instruction::IReturn,
        ]
    );
}

#[test]
fn test_println_formats_floats_with_fixed_precision() {
    let module = generate(program(vec![main(vec![call_stmt("println", vec![float("1.5"), string("s")])])]));

    assert_eq!(
        routine(&module, "main").code,
        vec![
            Instruction::GetStdout,
            Instruction::FConst(1.5),
            Instruction::PrintFixed { precision: 6 },
            Instruction::GetStdout,
            Instruction::SConst("s".to_string()),
            Instruction::Print(FieldType::String),
            Instruction::GetStdout,
            Instruction::PrintNewline,
            Instruction::Return,
        ]
    );
}

#[test]
fn test_unit_call_statement() {
    let module = generate(program(vec![
        fun("show", &[("x", T::Int), ("y", T::Float)], vec![call_stmt("println", vec![var("x"), var("y")])], None),
        main(vec![call_stmt("show", vec![int("1"), float("2.0")])]),
    ]));

    assert_eq!(
        routine(&module, "main").code,
        vec![
            Instruction::IConst(1),
            Instruction::FConst(2.0),
            Instruction::InvokeStatic(MethodRef {
                owner: "Test".to_string(),
                name: "show".to_string(),
                descriptor: "(IF)V".parse().unwrap(),
            }),
            Instruction::Return,
        ]
    );
    assert_eq!(routine(&module, "show").code.last(), Some(&Instruction::Return));
}

#[test]
fn test_string_local_is_an_internal_error() {
    let tst = translate(&program(vec![main(vec![let_var("s", string("hi"))])])).unwrap();

    assert!(matches!(compile(&tst, "Test"), Err(CompilerError::InternalError { .. })));
}

#[test]
fn test_error_type_is_an_internal_error() {
    let tst = tst::Program {
        declarations: vec![],
        statement: tst::Statement::Call {
            callee: tst::Callee::Println,
            arguments: vec![tst::Expression::IdentifierReference { expr_type: Type::TError, name: "x".to_string() }],
        },
    };

    assert!(matches!(compile(&tst, "Test"), Err(CompilerError::InternalError { .. })));
}

#[test]
fn test_compilation_is_deterministic() {
    let build = || {
        program(vec![
            global_const("scale", lit(float_value("2.5"))),
            fun("f", &[("x", T::Float)], vec![], Some((T::Float, binary(BinaryOp::Times, var("x"), var("scale"))))),
            main(vec![call_stmt("println", vec![call("f", vec![float("4.0")])])]),
        ])
    };

    assert_eq!(generate(build()).to_binary(), generate(build()).to_binary());
}

use p0_bytecode::{
    Condition, Constant, Field, FieldRef, FieldType, Function, Instruction, MethodDescriptor, MethodRef, Module,
};
use p0_vm::{run_to_string, Fault, VMState, Value, VmError, VmOptions, VM};
use pretty_assertions::assert_eq;

fn routine(name: &str, descriptor: &str, max_locals: u16, code: Vec<Instruction>) -> Function {
    Function {
        name: name.to_string(),
        descriptor: descriptor.parse().unwrap(),
        max_locals,
        code,
    }
}

fn module_with_main(code: Vec<Instruction>) -> Module {
    let mut module = Module::new("T");
    module.add_function(routine("main", "()V", 1, code));
    module
}

fn method(name: &str, descriptor: &str) -> MethodRef {
    MethodRef { owner: "T".to_string(), name: name.to_string(), descriptor: descriptor.parse().unwrap() }
}

fn print_int(v: i32) -> Vec<Instruction> {
    vec![Instruction::GetStdout, Instruction::IConst(v), Instruction::Print(FieldType::Int)]
}

#[test]
fn test_prints_each_type() {
    let module = module_with_main(vec![
        Instruction::GetStdout,
        Instruction::IConst(-7),
        Instruction::Print(FieldType::Int),
        Instruction::GetStdout,
        Instruction::IConst(1),
        Instruction::Print(FieldType::Bool),
        Instruction::GetStdout,
        Instruction::IConst(0),
        Instruction::Print(FieldType::Bool),
        Instruction::GetStdout,
        Instruction::FConst(2.5),
        Instruction::PrintFixed { precision: 6 },
        Instruction::GetStdout,
        Instruction::SConst("ok".to_string()),
        Instruction::Print(FieldType::String),
        Instruction::GetStdout,
        Instruction::PrintNewline,
        Instruction::Return,
    ]);

    assert_eq!(run_to_string(module).unwrap(), "-7TrueFalse2.500000ok\n");
}

#[test]
fn test_calls_pass_arguments_and_results() {
    let mut module = Module::new("T");
    module.add_function(routine(
        "add",
        "(II)I",
        2,
        vec![Instruction::ILoad(0), Instruction::ILoad(1), Instruction::IAdd, Instruction::IReturn],
    ));
    module.add_function(routine(
        "main",
        "()V",
        1,
        vec![
            Instruction::GetStdout,
            Instruction::IConst(2),
            Instruction::IConst(3),
            Instruction::InvokeStatic(method("add", "(II)I")),
            Instruction::Print(FieldType::Int),
            Instruction::Return,
        ],
    ));

    assert_eq!(run_to_string(module).unwrap(), "5");
}

#[test]
fn test_recursion_does_not_grow_the_rust_stack() {
    // count(n) = n == 0 ? 0 : 1 + count(n - 1)
    let mut module = Module::new("T");
    module.add_function(routine(
        "count",
        "(I)I",
        1,
        vec![
            Instruction::ILoad(0),
            Instruction::If(Condition::Ne, 4),
            Instruction::IConst(0),
            Instruction::IReturn,
            Instruction::IConst(1),
            Instruction::ILoad(0),
            Instruction::IConst(1),
            Instruction::ISub,
            Instruction::InvokeStatic(method("count", "(I)I")),
            Instruction::IAdd,
            Instruction::IReturn,
        ],
    ));
    module.add_function(routine("main", "()V", 1, vec![Instruction::Return]));

    let mut vm = VM::with_options(module, VmOptions { max_call_depth: 100_000, step_limit: None });
    let result = vm.call("count", vec![Value::Int(20_000)], &mut Vec::new()).unwrap();
    assert_eq!(result, Some(Value::Int(20_000)));
}

#[test]
fn test_call_depth_is_bounded() {
    let mut module = Module::new("T");
    module.add_function(routine("main", "()V", 1, vec![Instruction::InvokeStatic(method("main", "()V"))]));

    let mut vm = VM::with_options(module, VmOptions { max_call_depth: 50, step_limit: None });
    let err = vm.run(&mut Vec::new()).unwrap_err();

    assert_eq!(err, VmError::CallDepthExceeded { limit: 50 });
    assert!(matches!(vm.state, VMState::Error(_)));
}

#[test]
fn test_step_limit() {
    let module = module_with_main(vec![Instruction::Goto(0)]);

    let mut vm = VM::with_options(module, VmOptions { max_call_depth: 10, step_limit: Some(100) });
    assert_eq!(vm.run(&mut Vec::new()).unwrap_err(), VmError::StepLimitExceeded { limit: 100 });
    assert_eq!(vm.steps(), 101);
}

#[test]
fn test_int_arithmetic_wraps() {
    let mut code = vec![Instruction::GetStdout, Instruction::IConst(i32::MAX), Instruction::IConst(1), Instruction::IAdd];
    code.extend([Instruction::Print(FieldType::Int), Instruction::Return]);

    assert_eq!(run_to_string(module_with_main(code)).unwrap(), i32::MIN.to_string());
}

#[test]
fn test_division_by_zero_is_a_fault() {
    let module = module_with_main(vec![
        Instruction::IConst(1),
        Instruction::IConst(0),
        Instruction::IDiv,
        Instruction::Pop,
        Instruction::Return,
    ]);

    assert_eq!(
        run_to_string(module).unwrap_err(),
        VmError::Fault { routine: "main".to_string(), pc: 2, fault: Fault::DivisionByZero }
    );
}

#[test]
fn test_division_truncates_toward_zero() {
    let module = module_with_main(vec![
        Instruction::GetStdout,
        Instruction::IConst(-7),
        Instruction::IConst(2),
        Instruction::IDiv,
        Instruction::Print(FieldType::Int),
        Instruction::Return,
    ]);

    assert_eq!(run_to_string(module).unwrap(), "-3");
}

#[test]
fn test_fcmpg_treats_nan_as_greater() {
    let module = module_with_main(vec![
        Instruction::GetStdout,
        Instruction::FConst(f32::NAN),
        Instruction::FConst(1.0),
        Instruction::FCmpG,
        Instruction::Print(FieldType::Int),
        Instruction::GetStdout,
        Instruction::FConst(1.0),
        Instruction::FConst(2.0),
        Instruction::FCmpG,
        Instruction::Print(FieldType::Int),
        Instruction::Return,
    ]);

    assert_eq!(run_to_string(module).unwrap(), "1-1");
}

#[test]
fn test_statics_start_from_their_initial_values() {
    let count = FieldRef { owner: "T".to_string(), name: "count".to_string(), field_type: FieldType::Int };

    let mut module = module_with_main(vec![
        Instruction::GetStatic(count.clone()),
        Instruction::IConst(5),
        Instruction::IAdd,
        Instruction::PutStatic(count),
        Instruction::Return,
    ]);
    module.add_field(Field { name: "count".to_string(), is_final: false, field_type: FieldType::Int, initial: Constant::Int(10) });

    let mut vm = VM::new(module);
    vm.run(&mut Vec::new()).unwrap();

    assert_eq!(vm.state, VMState::Halted);
    assert_eq!(vm.get_static("count"), Some(&Value::Int(15)));
}

#[test]
fn test_unknown_field_and_routine() {
    let missing = FieldRef { owner: "T".to_string(), name: "nope".to_string(), field_type: FieldType::Int };
    let err = run_to_string(module_with_main(vec![Instruction::GetStatic(missing)])).unwrap_err();
    assert_eq!(err, VmError::UnknownField { name: "T.nope".to_string() });

    let mut module = Module::new("T");
    module.add_function(routine("helper", "()V", 0, vec![Instruction::Return]));
    assert_eq!(run_to_string(module).unwrap_err(), VmError::UnknownRoutine { name: "main".to_string() });
}

#[test]
fn test_running_off_the_end_is_a_fault() {
    let err = run_to_string(module_with_main(vec![Instruction::IConst(1)])).unwrap_err();

    assert_eq!(err, VmError::Fault { routine: "main".to_string(), pc: 0, fault: Fault::FellOffEnd });
}

#[test]
fn test_type_confusion_is_a_fault() {
    let err = run_to_string(module_with_main(vec![Instruction::FConst(1.0), Instruction::IStore(1)])).unwrap_err();

    assert_eq!(
        err,
        VmError::Fault {
            routine: "main".to_string(),
            pc: 1,
            fault: Fault::TypeMismatch { expected: "int", found: "float" },
        }
    );
}

#[test]
fn test_initializer_runs_before_main() {
    let mut module = Module::new("T");
    let mut init = print_int(1);
    init.push(Instruction::Return);
    module.add_function(Function {
        name: "<init>".to_string(),
        descriptor: MethodDescriptor::void(),
        max_locals: 0,
        code: init,
    });
    let mut main = print_int(2);
    main.push(Instruction::Return);
    module.add_function(routine("main", "()V", 1, main));

    assert_eq!(run_to_string(module).unwrap(), "12");
}

#[test]
fn test_load_binary() {
    let mut code = print_int(9);
    code.push(Instruction::Return);
    let binary = module_with_main(code).to_binary();

    let mut vm = VM::load_binary(&binary, VmOptions::default()).unwrap();
    let mut out = Vec::new();
    vm.run(&mut out).unwrap();
    assert_eq!(out, b"9");

    assert!(matches!(VM::load_binary(b"nope", VmOptions::default()), Err(VmError::Load(_))));
}

#[test]
fn test_non_finite_floats_print_by_name() {
    let mut code = Vec::new();
    for v in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
        code.extend([Instruction::GetStdout, Instruction::FConst(v), Instruction::PrintFixed { precision: 6 }]);
    }
    code.extend([
        Instruction::GetStdout,
        Instruction::FConst(f32::INFINITY),
        Instruction::Print(FieldType::Float),
        Instruction::Return,
    ]);

    assert_eq!(run_to_string(module_with_main(code)).unwrap(), "Infinity-InfinityNaNInfinity");
}

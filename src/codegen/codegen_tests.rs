use super::*;
use crate::codegen::asm::AsmUnaryOp;
use crate::parse::Parser;
use crate::semantic::SemanticAnalyzer;
use crate::semantic::loop_label::LoopLabeler;
use crate::tokenize::tokenize;

fn lower_source(source: &str) -> AsmFunction {
    let ast = Parser::new(tokenize(source, "test.c").unwrap())
        .parse()
        .unwrap();
    let resolved = SemanticAnalyzer::new().analyze_program(ast).unwrap();
    let labeled = LoopLabeler::new().label_program(resolved).unwrap();
    let tacky = crate::tacky::TackyGen::new(labeled).codegen().unwrap();
    lower(&tacky).unwrap().function
}

fn select_only(function: &Function) -> Vec<AsmInstruction> {
    let mut out = Vec::new();
    for instruction in &function.instructions {
        gen_instruction(instruction, &mut out).unwrap();
    }
    out
}

fn imm(n: i32) -> Operand {
    Operand::Imm(n)
}

fn reg(r: Reg) -> Operand {
    Operand::Reg(r)
}

fn pseudo(name: &str) -> Operand {
    Operand::Pseudo(name.into())
}

#[test]
fn return_moves_through_eax() {
    let function = Function {
        name: "main".into(),
        instructions: vec![Instruction::Return(Value::Constant(2))],
    };
    assert_eq!(
        select_only(&function),
        vec![
            AsmInstruction::Mov(imm(2), reg(Reg::AX)),
            AsmInstruction::Ret,
        ]
    );
}

#[test]
fn logical_not_selects_cmp_and_sete() {
    let function = Function {
        name: "main".into(),
        instructions: vec![Instruction::Unary {
            op: UnaryOp::Not,
            src: Value::Var("x".into()),
            dst: Value::Var("y".into()),
        }],
    };
    assert_eq!(
        select_only(&function),
        vec![
            AsmInstruction::Cmp(imm(0), pseudo("x")),
            AsmInstruction::Mov(imm(0), pseudo("y")),
            AsmInstruction::SetCC(Condition::E, pseudo("y")),
        ]
    );
}

#[test]
fn negate_selects_mov_and_neg() {
    let function = Function {
        name: "main".into(),
        instructions: vec![Instruction::Unary {
            op: UnaryOp::Negate,
            src: Value::Constant(5),
            dst: Value::Var("y".into()),
        }],
    };
    assert_eq!(
        select_only(&function),
        vec![
            AsmInstruction::Mov(imm(5), pseudo("y")),
            AsmInstruction::Unary(AsmUnaryOp::Neg, pseudo("y")),
        ]
    );
}

#[test]
fn division_routes_through_eax_and_cdq() {
    let function = Function {
        name: "main".into(),
        instructions: vec![Instruction::Binary {
            op: BinaryOp::Divide,
            src1: Value::Var("a".into()),
            src2: Value::Var("b".into()),
            dst: Value::Var("q".into()),
        }],
    };
    assert_eq!(
        select_only(&function),
        vec![
            AsmInstruction::Mov(pseudo("a"), reg(Reg::AX)),
            AsmInstruction::Cdq,
            AsmInstruction::Idiv(pseudo("b")),
            AsmInstruction::Mov(reg(Reg::AX), pseudo("q")),
        ]
    );
}

#[test]
fn remainder_reads_edx() {
    let function = Function {
        name: "main".into(),
        instructions: vec![Instruction::Binary {
            op: BinaryOp::Remainder,
            src1: Value::Var("a".into()),
            src2: Value::Var("b".into()),
            dst: Value::Var("r".into()),
        }],
    };
    assert_eq!(
        select_only(&function).last(),
        Some(&AsmInstruction::Mov(reg(Reg::DX), pseudo("r")))
    );
}

#[test]
fn relational_compares_with_swapped_operands() {
    let function = Function {
        name: "main".into(),
        instructions: vec![Instruction::Binary {
            op: BinaryOp::LessThan,
            src1: Value::Var("a".into()),
            src2: Value::Var("b".into()),
            dst: Value::Var("d".into()),
        }],
    };
    // cmp b, a makes the flags describe `a < b` in AT&T operand order.
    assert_eq!(
        select_only(&function),
        vec![
            AsmInstruction::Cmp(pseudo("b"), pseudo("a")),
            AsmInstruction::Mov(imm(0), pseudo("d")),
            AsmInstruction::SetCC(Condition::L, pseudo("d")),
        ]
    );
}

#[test]
fn fixup_splits_memory_to_memory_moves() {
    let function = AsmFunction {
        name: "main".into(),
        instructions: vec![AsmInstruction::Mov(pseudo("a"), pseudo("b"))],
    };
    let fixed = fix::fix_function(function);
    assert_eq!(
        fixed.instructions,
        vec![
            AsmInstruction::AllocateStack(8),
            AsmInstruction::Mov(Operand::Stack(-4), reg(Reg::R10)),
            AsmInstruction::Mov(reg(Reg::R10), Operand::Stack(-8)),
        ]
    );
}

#[test]
fn fixup_reuses_slots_for_repeated_pseudos() {
    let function = AsmFunction {
        name: "main".into(),
        instructions: vec![
            AsmInstruction::Mov(imm(1), pseudo("a")),
            AsmInstruction::Mov(imm(2), pseudo("b")),
            AsmInstruction::Mov(imm(3), pseudo("a")),
        ],
    };
    let fixed = fix::fix_function(function);
    assert_eq!(
        fixed.instructions,
        vec![
            AsmInstruction::AllocateStack(8),
            AsmInstruction::Mov(imm(1), Operand::Stack(-4)),
            AsmInstruction::Mov(imm(2), Operand::Stack(-8)),
            AsmInstruction::Mov(imm(3), Operand::Stack(-4)),
        ]
    );
}

#[test]
fn fixup_rewrites_immediate_idiv() {
    let function = AsmFunction {
        name: "main".into(),
        instructions: vec![AsmInstruction::Idiv(imm(3))],
    };
    let fixed = fix::fix_function(function);
    assert_eq!(
        fixed.instructions,
        vec![
            AsmInstruction::Mov(imm(3), reg(Reg::R10)),
            AsmInstruction::Idiv(reg(Reg::R10)),
        ]
    );
}

#[test]
fn fixup_keeps_imul_destination_in_a_register() {
    let function = AsmFunction {
        name: "main".into(),
        instructions: vec![AsmInstruction::Binary(
            AsmBinaryOp::Mul,
            imm(3),
            pseudo("a"),
        )],
    };
    let fixed = fix::fix_function(function);
    assert_eq!(
        fixed.instructions,
        vec![
            AsmInstruction::AllocateStack(4),
            AsmInstruction::Mov(Operand::Stack(-4), reg(Reg::R11)),
            AsmInstruction::Binary(AsmBinaryOp::Mul, imm(3), reg(Reg::R11)),
            AsmInstruction::Mov(reg(Reg::R11), Operand::Stack(-4)),
        ]
    );
}

#[test]
fn fixup_splits_memory_to_memory_add() {
    let function = AsmFunction {
        name: "main".into(),
        instructions: vec![AsmInstruction::Binary(
            AsmBinaryOp::Add,
            pseudo("a"),
            pseudo("b"),
        )],
    };
    let fixed = fix::fix_function(function);
    assert_eq!(
        fixed.instructions,
        vec![
            AsmInstruction::AllocateStack(8),
            AsmInstruction::Mov(Operand::Stack(-4), reg(Reg::R10)),
            AsmInstruction::Binary(AsmBinaryOp::Add, reg(Reg::R10), Operand::Stack(-8)),
        ]
    );
}

#[test]
fn fixup_moves_immediate_cmp_operand_to_r11() {
    let function = AsmFunction {
        name: "main".into(),
        instructions: vec![AsmInstruction::Cmp(pseudo("a"), imm(0))],
    };
    let fixed = fix::fix_function(function);
    assert_eq!(
        fixed.instructions,
        vec![
            AsmInstruction::AllocateStack(4),
            AsmInstruction::Mov(imm(0), reg(Reg::R11)),
            AsmInstruction::Cmp(Operand::Stack(-4), reg(Reg::R11)),
        ]
    );
}

#[test]
fn fixup_splits_memory_to_memory_cmp() {
    let function = AsmFunction {
        name: "main".into(),
        instructions: vec![AsmInstruction::Cmp(pseudo("a"), pseudo("b"))],
    };
    let fixed = fix::fix_function(function);
    assert_eq!(
        fixed.instructions,
        vec![
            AsmInstruction::AllocateStack(8),
            AsmInstruction::Mov(Operand::Stack(-4), reg(Reg::R10)),
            AsmInstruction::Cmp(reg(Reg::R10), Operand::Stack(-8)),
        ]
    );
}

#[test]
fn no_allocate_stack_without_pseudos() {
    let function = AsmFunction {
        name: "main".into(),
        instructions: vec![
            AsmInstruction::Mov(imm(2), reg(Reg::AX)),
            AsmInstruction::Ret,
        ],
    };
    let fixed = fix::fix_function(function);
    assert_eq!(
        fixed.instructions,
        vec![
            AsmInstruction::Mov(imm(2), reg(Reg::AX)),
            AsmInstruction::Ret,
        ]
    );
}

fn assert_legal(function: &AsmFunction) {
    for instruction in &function.instructions {
        if let AsmInstruction::Mov(src, dst)
        | AsmInstruction::Binary(_, src, dst)
        | AsmInstruction::Cmp(src, dst) = instruction
        {
            assert!(
                !matches!(src, Operand::Pseudo(_)) && !matches!(dst, Operand::Pseudo(_)),
                "pseudo survived fix-up: {instruction:?}"
            );
        }
        if let AsmInstruction::Unary(_, operand)
        | AsmInstruction::Idiv(operand)
        | AsmInstruction::SetCC(_, operand) = instruction
        {
            assert!(
                !matches!(operand, Operand::Pseudo(_)),
                "pseudo survived fix-up: {instruction:?}"
            );
        }
        assert!(!instruction.mem_operands(), "mem/mem: {instruction:?}");
        assert!(
            !instruction.is_idiv_constant(),
            "immediate idiv: {instruction:?}"
        );
        assert!(
            !instruction.is_mul_sndmem(),
            "imul into memory: {instruction:?}"
        );
        assert!(
            !instruction.is_cmp_sndimm(),
            "cmp against immediate destination: {instruction:?}"
        );
    }
}

#[test]
fn lowered_programs_satisfy_operand_constraints() {
    let sources = [
        "int main(void) { return 2; }",
        "int main(void) { return -(~5); }",
        "int main(void) { return 2 + 3 * 4 - 10 / 2 % 3; }",
        "int main(void) { return (1 && 2) + (0 || 0); }",
        "int main(void) { int a = 1; int b = 2; return a == b ? a / b : b % a; }",
        "int main(void) { int x = 0; for (int i = 0; i < 5; i = i + 1) x = x + i; return x; }",
        "int main(void) { int i = 0; while (i < 3) { if (i == 2) break; i = i + 1; } return i; }",
    ];
    for source in sources {
        assert_legal(&lower_source(source));
    }
}

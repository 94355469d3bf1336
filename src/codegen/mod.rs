pub mod asm;
pub mod error;
pub mod fix;

#[cfg(test)]
mod codegen_tests;

use crate::codegen::asm::{
    AsmBinaryOp, AsmFunction, AsmInstruction, AsmProgram, Condition, Operand, Reg,
};
use crate::codegen::error::{CodegenError, Result};
use crate::tacky::types::{BinaryOp, Function, Instruction, Program, UnaryOp, Value};

/// Lowers TAC to finished abstract assembly: instruction selection first,
/// then the fix-up pass that assigns stack slots and legalizes operands.
pub fn lower(program: &Program) -> Result<AsmProgram> {
    let function = gen_function(&program.function)?;
    let function = fix::fix_function(function);
    Ok(AsmProgram { function })
}

fn gen_function(function: &Function) -> Result<AsmFunction> {
    let mut instructions = Vec::new();
    for instruction in &function.instructions {
        gen_instruction(instruction, &mut instructions)?;
    }
    Ok(AsmFunction {
        name: function.name.clone(),
        instructions,
    })
}

fn gen_instruction(instruction: &Instruction, out: &mut Vec<AsmInstruction>) -> Result<()> {
    match instruction {
        Instruction::Return(value) => {
            out.push(AsmInstruction::Mov(value.into(), Operand::Reg(Reg::AX)));
            out.push(AsmInstruction::Ret);
        }
        Instruction::Unary {
            op: UnaryOp::Not,
            src,
            dst,
        } => {
            let dst = dst_operand(dst)?;
            out.push(AsmInstruction::Cmp(Operand::Imm(0), src.into()));
            out.push(AsmInstruction::Mov(Operand::Imm(0), dst.clone()));
            out.push(AsmInstruction::SetCC(Condition::E, dst));
        }
        Instruction::Unary { op, src, dst } => {
            let dst = dst_operand(dst)?;
            out.push(AsmInstruction::Mov(src.into(), dst.clone()));
            out.push(AsmInstruction::Unary((*op).into(), dst));
        }
        Instruction::Binary {
            op: BinaryOp::Divide,
            src1,
            src2,
            dst,
        } => {
            gen_division(src1, src2, out);
            out.push(AsmInstruction::Mov(
                Operand::Reg(Reg::AX),
                dst_operand(dst)?,
            ));
        }
        Instruction::Binary {
            op: BinaryOp::Remainder,
            src1,
            src2,
            dst,
        } => {
            gen_division(src1, src2, out);
            out.push(AsmInstruction::Mov(
                Operand::Reg(Reg::DX),
                dst_operand(dst)?,
            ));
        }
        Instruction::Binary {
            op,
            src1,
            src2,
            dst,
        } => {
            let dst = dst_operand(dst)?;
            match relational_condition(*op) {
                Some(condition) => {
                    // cmp b, a sets flags for `a OP b` in AT&T order.
                    out.push(AsmInstruction::Cmp(src2.into(), src1.into()));
                    out.push(AsmInstruction::Mov(Operand::Imm(0), dst.clone()));
                    out.push(AsmInstruction::SetCC(condition, dst));
                }
                None => {
                    out.push(AsmInstruction::Mov(src1.into(), dst.clone()));
                    out.push(AsmInstruction::Binary(arithmetic_op(*op), src2.into(), dst));
                }
            }
        }
        Instruction::Copy { src, dst } => {
            out.push(AsmInstruction::Mov(src.into(), dst_operand(dst)?));
        }
        Instruction::Jump(target) => out.push(AsmInstruction::Jmp(target.clone())),
        Instruction::JumpIfZero { condition, target } => {
            out.push(AsmInstruction::Cmp(Operand::Imm(0), condition.into()));
            out.push(AsmInstruction::JmpCC(Condition::E, target.clone()));
        }
        Instruction::JumpIfNotZero { condition, target } => {
            out.push(AsmInstruction::Cmp(Operand::Imm(0), condition.into()));
            out.push(AsmInstruction::JmpCC(Condition::NE, target.clone()));
        }
        Instruction::Label(name) => out.push(AsmInstruction::Label(name.clone())),
    }
    Ok(())
}

fn gen_division(src1: &Value, src2: &Value, out: &mut Vec<AsmInstruction>) {
    out.push(AsmInstruction::Mov(src1.into(), Operand::Reg(Reg::AX)));
    out.push(AsmInstruction::Cdq);
    out.push(AsmInstruction::Idiv(src2.into()));
}

fn relational_condition(op: BinaryOp) -> Option<Condition> {
    let condition = match op {
        BinaryOp::Equal => Condition::E,
        BinaryOp::NotEqual => Condition::NE,
        BinaryOp::LessThan => Condition::L,
        BinaryOp::LessOrEqual => Condition::LE,
        BinaryOp::GreaterThan => Condition::G,
        BinaryOp::GreaterOrEqual => Condition::GE,
        _ => return None,
    };
    Some(condition)
}

fn arithmetic_op(op: BinaryOp) -> AsmBinaryOp {
    match op {
        BinaryOp::Add => AsmBinaryOp::Add,
        BinaryOp::Subtract => AsmBinaryOp::Sub,
        BinaryOp::Multiply => AsmBinaryOp::Mul,
        other => unreachable!("{other:?} handled before arithmetic selection"),
    }
}

fn dst_operand(value: &Value) -> Result<Operand> {
    match value {
        Value::Var(name) => Ok(Operand::Pseudo(name.clone())),
        Value::Constant(n) => Err(CodegenError::ConstantDestination(*n)),
    }
}

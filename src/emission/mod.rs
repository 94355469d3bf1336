
use std::fmt;
use std::io::{self, Write};

use crate::codegen::asm::{
    AsmBinaryOp, AsmFunction, AsmInstruction, AsmProgram, AsmUnaryOp, Condition, Operand, Reg,
};

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name32())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Imm(n) => write!(f, "${n}"),
            Operand::Reg(reg) => write!(f, "{reg}"),
            Operand::Stack(offset) => write!(f, "{offset}(%rbp)"),
            Operand::Pseudo(name) => {
                unreachable!("pseudo operand `{name}` survived the fix-up pass")
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Condition::E => "e",
            Condition::NE => "ne",
            Condition::L => "l",
            Condition::LE => "le",
            Condition::G => "g",
            Condition::GE => "ge",
        })
    }
}

impl fmt::Display for AsmUnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AsmUnaryOp::Neg => "negl",
            AsmUnaryOp::Not => "notl",
        })
    }
}

impl fmt::Display for AsmBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AsmBinaryOp::Add => "addl",
            AsmBinaryOp::Sub => "subl",
            AsmBinaryOp::Mul => "imull",
        })
    }
}

fn symbol(name: &str) -> String {
    if cfg!(target_os = "macos") {
        format!("_{name}")
    } else {
        name.to_owned()
    }
}

fn local_label(name: &str) -> String {
    if cfg!(target_os = "macos") {
        format!("L{name}")
    } else {
        format!(".L{name}")
    }
}

/// `setcc` writes a single byte, so a register operand switches to its
/// 1-byte name.
fn byte_operand(operand: &Operand) -> String {
    match operand {
        Operand::Reg(reg) => reg.name8().to_owned(),
        other => other.to_string(),
    }
}

pub struct Emitter<W: Write> {
    buf: W,
}

impl<W: Write> Emitter<W> {
    pub fn new(buf: W) -> Self {
        Self { buf }
    }

    pub fn emit(&mut self, program: &AsmProgram) -> io::Result<()> {
        self.emit_function(&program.function)?;
        if cfg!(target_os = "linux") {
            writeln!(self.buf, "\t.section .note.GNU-stack,\"\",@progbits")?;
        }
        Ok(())
    }

    fn emit_function(&mut self, function: &AsmFunction) -> io::Result<()> {
        let name = symbol(&function.name);
        writeln!(self.buf, "\t.globl {name}")?;
        writeln!(self.buf, "{name}:")?;
        writeln!(self.buf, "\tpushq %rbp")?;
        writeln!(self.buf, "\tmovq %rsp, %rbp")?;
        for instruction in &function.instructions {
            self.emit_instruction(instruction)?;
        }
        Ok(())
    }

    fn emit_instruction(&mut self, instruction: &AsmInstruction) -> io::Result<()> {
        match instruction {
            AsmInstruction::Mov(src, dst) => writeln!(self.buf, "\tmovl {src}, {dst}"),
            AsmInstruction::Unary(op, operand) => writeln!(self.buf, "\t{op} {operand}"),
            AsmInstruction::Binary(op, src, dst) => writeln!(self.buf, "\t{op} {src}, {dst}"),
            AsmInstruction::Cmp(first, second) => {
                writeln!(self.buf, "\tcmpl {first}, {second}")
            }
            AsmInstruction::Idiv(operand) => writeln!(self.buf, "\tidivl {operand}"),
            AsmInstruction::Cdq => writeln!(self.buf, "\tcdq"),
            AsmInstruction::Jmp(target) => writeln!(self.buf, "\tjmp {}", local_label(target)),
            AsmInstruction::JmpCC(condition, target) => {
                writeln!(self.buf, "\tj{condition} {}", local_label(target))
            }
            AsmInstruction::SetCC(condition, operand) => {
                writeln!(self.buf, "\tset{condition} {}", byte_operand(operand))
            }
            AsmInstruction::Label(name) => writeln!(self.buf, "{}:", local_label(name)),
            AsmInstruction::AllocateStack(bytes) => {
                writeln!(self.buf, "\tsubq ${bytes}, %rsp")
            }
            AsmInstruction::Ret => {
                writeln!(self.buf, "\tmovq %rbp, %rsp")?;
                writeln!(self.buf, "\tpopq %rbp")?;
                writeln!(self.buf, "\tret")
            }
        }
    }
}

use crate::tacky::types::{UnaryOp, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct AsmProgram {
    pub function: AsmFunction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AsmFunction {
    pub name: String,
    pub instructions: Vec<AsmInstruction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    AX,
    DX,
    R10,
    R11,
}

impl Reg {
    pub fn name32(&self) -> &'static str {
        match self {
            Reg::AX => "%eax",
            Reg::DX => "%edx",
            Reg::R10 => "%r10d",
            Reg::R11 => "%r11d",
        }
    }

    pub fn name8(&self) -> &'static str {
        match self {
            Reg::AX => "%al",
            Reg::DX => "%dl",
            Reg::R10 => "%r10b",
            Reg::R11 => "%r11b",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Imm(i32),
    Reg(Reg),
    Pseudo(String),
    Stack(i64),
}

impl Operand {
    pub fn is_mem(&self) -> bool {
        matches!(self, Operand::Stack(_))
    }

    pub fn is_imm(&self) -> bool {
        matches!(self, Operand::Imm(_))
    }
}

impl From<&Value> for Operand {
    fn from(value: &Value) -> Self {
        match value {
            Value::Constant(n) => Operand::Imm(*n),
            Value::Var(name) => Operand::Pseudo(name.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    E,
    NE,
    L,
    LE,
    G,
    GE,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsmUnaryOp {
    Neg,
    Not,
}

impl From<UnaryOp> for AsmUnaryOp {
    fn from(op: UnaryOp) -> Self {
        match op {
            UnaryOp::Negate => AsmUnaryOp::Neg,
            UnaryOp::Complement => AsmUnaryOp::Not,
            // Logical not is lowered through Cmp/SetCC, never through here.
            UnaryOp::Not => unreachable!("logical not has no single-instruction encoding"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsmBinaryOp {
    Add,
    Sub,
    Mul,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AsmInstruction {
    Mov(Operand, Operand),
    Unary(AsmUnaryOp, Operand),
    Binary(AsmBinaryOp, Operand, Operand),
    Cmp(Operand, Operand),
    Idiv(Operand),
    Cdq,
    Jmp(String),
    JmpCC(Condition, String),
    SetCC(Condition, Operand),
    Label(String),
    AllocateStack(i64),
    Ret,
}

impl AsmInstruction {
    /// `mov`, `add`, `sub` and `cmp` cannot take two memory operands.
    pub fn mem_operands(&self) -> bool {
        match self {
            AsmInstruction::Mov(src, dst)
            | AsmInstruction::Binary(AsmBinaryOp::Add | AsmBinaryOp::Sub, src, dst)
            | AsmInstruction::Cmp(src, dst) => src.is_mem() && dst.is_mem(),
            _ => false,
        }
    }

    /// `idiv` cannot take an immediate operand.
    pub fn is_idiv_constant(&self) -> bool {
        matches!(self, AsmInstruction::Idiv(Operand::Imm(_)))
    }

    /// `imul` cannot write to a memory operand.
    pub fn is_mul_sndmem(&self) -> bool {
        matches!(
            self,
            AsmInstruction::Binary(AsmBinaryOp::Mul, _, Operand::Stack(_))
        )
    }

    /// `cmp`'s second operand cannot be an immediate.
    pub fn is_cmp_sndimm(&self) -> bool {
        matches!(self, AsmInstruction::Cmp(_, Operand::Imm(_)))
    }
}

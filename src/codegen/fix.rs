use std::collections::HashMap;

use crate::codegen::asm::{AsmBinaryOp, AsmFunction, AsmInstruction, Operand, Reg};

/// The fix-up pass: resolve every `Pseudo` to a stack slot, then rewrite
/// instructions the ISA cannot encode by routing operands through the
/// scratch registers (`r10` on the source side, `r11` on the destination
/// side). Builds a fresh list instead of splicing in place.
pub fn fix_function(function: AsmFunction) -> AsmFunction {
    let mut allocator = StackAllocator::new();

    let resolved: Vec<AsmInstruction> = function
        .instructions
        .into_iter()
        .map(|instruction| resolve_pseudos(instruction, &mut allocator))
        .collect();

    let mut instructions = Vec::with_capacity(resolved.len() + 1);
    let frame_size = allocator.frame_size();
    if frame_size > 0 {
        instructions.push(AsmInstruction::AllocateStack(frame_size));
    }
    for instruction in resolved {
        legalize(instruction, &mut instructions);
    }

    AsmFunction {
        name: function.name,
        instructions,
    }
}

/// Per-function map from pseudo names to `%rbp`-relative slots, 4 bytes
/// apiece.
struct StackAllocator {
    offsets: HashMap<String, i64>,
    next_offset: i64,
}

impl StackAllocator {
    fn new() -> Self {
        Self {
            offsets: HashMap::new(),
            next_offset: 4,
        }
    }

    fn allocate(&mut self, name: String) -> Operand {
        if let Some(offset) = self.offsets.get(&name) {
            return Operand::Stack(-*offset);
        }
        let offset = self.next_offset;
        self.next_offset += 4;
        self.offsets.insert(name, offset);
        Operand::Stack(-offset)
    }

    fn allocate_if_pseudo(&mut self, operand: Operand) -> Operand {
        match operand {
            Operand::Pseudo(name) => self.allocate(name),
            other => other,
        }
    }

    fn frame_size(&self) -> i64 {
        4 * self.offsets.len() as i64
    }
}

fn resolve_pseudos(instruction: AsmInstruction, allocator: &mut StackAllocator) -> AsmInstruction {
    match instruction {
        AsmInstruction::Mov(src, dst) => AsmInstruction::Mov(
            allocator.allocate_if_pseudo(src),
            allocator.allocate_if_pseudo(dst),
        ),
        AsmInstruction::Unary(op, operand) => {
            AsmInstruction::Unary(op, allocator.allocate_if_pseudo(operand))
        }
        AsmInstruction::Binary(op, src, dst) => AsmInstruction::Binary(
            op,
            allocator.allocate_if_pseudo(src),
            allocator.allocate_if_pseudo(dst),
        ),
        AsmInstruction::Cmp(first, second) => AsmInstruction::Cmp(
            allocator.allocate_if_pseudo(first),
            allocator.allocate_if_pseudo(second),
        ),
        AsmInstruction::Idiv(operand) => {
            AsmInstruction::Idiv(allocator.allocate_if_pseudo(operand))
        }
        AsmInstruction::SetCC(condition, operand) => {
            AsmInstruction::SetCC(condition, allocator.allocate_if_pseudo(operand))
        }
        other => other,
    }
}

fn legalize(instruction: AsmInstruction, out: &mut Vec<AsmInstruction>) {
    match instruction {
        // No memory-to-memory moves.
        AsmInstruction::Mov(src, dst) if src.is_mem() && dst.is_mem() => {
            out.push(AsmInstruction::Mov(src, Operand::Reg(Reg::R10)));
            out.push(AsmInstruction::Mov(Operand::Reg(Reg::R10), dst));
        }
        // idiv rejects immediates.
        AsmInstruction::Idiv(operand) if operand.is_imm() => {
            out.push(AsmInstruction::Mov(operand, Operand::Reg(Reg::R10)));
            out.push(AsmInstruction::Idiv(Operand::Reg(Reg::R10)));
        }
        // imul cannot write to memory, whatever the source.
        AsmInstruction::Binary(AsmBinaryOp::Mul, src, dst) if dst.is_mem() => {
            out.push(AsmInstruction::Mov(dst.clone(), Operand::Reg(Reg::R11)));
            out.push(AsmInstruction::Binary(
                AsmBinaryOp::Mul,
                src,
                Operand::Reg(Reg::R11),
            ));
            out.push(AsmInstruction::Mov(Operand::Reg(Reg::R11), dst));
        }
        // add/sub take at most one memory operand.
        AsmInstruction::Binary(op, src, dst) if src.is_mem() && dst.is_mem() => {
            out.push(AsmInstruction::Mov(src, Operand::Reg(Reg::R10)));
            out.push(AsmInstruction::Binary(op, Operand::Reg(Reg::R10), dst));
        }
        // cmp takes at most one memory operand.
        AsmInstruction::Cmp(first, second) if first.is_mem() && second.is_mem() => {
            out.push(AsmInstruction::Mov(first, Operand::Reg(Reg::R10)));
            out.push(AsmInstruction::Cmp(Operand::Reg(Reg::R10), second));
        }
        // cmp's second operand cannot be an immediate.
        AsmInstruction::Cmp(first, second) if second.is_imm() => {
            out.push(AsmInstruction::Mov(second, Operand::Reg(Reg::R11)));
            out.push(AsmInstruction::Cmp(first, Operand::Reg(Reg::R11)));
        }
        other => out.push(other),
    }
}

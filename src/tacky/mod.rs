pub mod error;
pub mod types;


use crate::parse::{
    self, Block, BlockItem, Declaration, Expr, ExprKind, ForInit, Program as AstProgram, Stmt,
    StmtKind,
};
use crate::tacky::error::{IRError, IResult};
use crate::tacky::types::{BinaryOp, Function, Instruction, Program, UnaryOp, Value};

pub struct TackyGen {
    tmp_counter: usize,
    label_counter: usize,
    program: AstProgram,
}

impl TackyGen {
    pub fn new(program: AstProgram) -> Self {
        Self {
            tmp_counter: 0,
            label_counter: 0,
            program,
        }
    }

    pub fn codegen(mut self) -> IResult<Program> {
        let function = self.program.function.clone();
        let function = self.gen_function(&function)?;
        Ok(Program { function })
    }

    fn gen_function(&mut self, function: &parse::Function) -> IResult<Function> {
        let mut instructions = Vec::new();
        self.gen_block(&function.body, &mut instructions)?;

        // Falling off the end of the body returns 0.
        instructions.push(Instruction::Return(Value::Constant(0)));

        Ok(Function {
            name: function.name.clone(),
            instructions,
        })
    }

    fn gen_block(&mut self, block: &Block, instructions: &mut Vec<Instruction>) -> IResult<()> {
        for item in &block.items {
            match item {
                BlockItem::Declaration(decl) => self.gen_declaration(decl, instructions)?,
                BlockItem::Statement(stmt) => self.gen_stmt(stmt, instructions)?,
            }
        }
        Ok(())
    }

    fn gen_declaration(
        &mut self,
        decl: &Declaration,
        instructions: &mut Vec<Instruction>,
    ) -> IResult<()> {
        if let Some(init) = &decl.init {
            let value = self.gen_expr(init, instructions)?;
            instructions.push(Instruction::Copy {
                src: value,
                dst: Value::Var(decl.name.clone()),
            });
        }
        Ok(())
    }

    fn gen_stmt(&mut self, stmt: &Stmt, instructions: &mut Vec<Instruction>) -> IResult<()> {
        match &stmt.kind {
            StmtKind::Return(expr) => {
                let value = self.gen_expr(expr, instructions)?;
                instructions.push(Instruction::Return(value));
            }
            StmtKind::Expr(expr) => {
                let _ = self.gen_expr(expr, instructions)?;
            }
            StmtKind::Null => {}
            StmtKind::Compound(block) => self.gen_block(block, instructions)?,
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let cond = self.gen_expr(condition, instructions)?;
                match else_branch {
                    None => {
                        let end_label = self.fresh_label("if_end");
                        instructions.push(Instruction::JumpIfZero {
                            condition: cond,
                            target: end_label.clone(),
                        });
                        self.gen_stmt(then_branch, instructions)?;
                        instructions.push(Instruction::Label(end_label));
                    }
                    Some(else_branch) => {
                        let else_label = self.fresh_label("if_else");
                        let end_label = self.fresh_label("if_end");
                        instructions.push(Instruction::JumpIfZero {
                            condition: cond,
                            target: else_label.clone(),
                        });
                        self.gen_stmt(then_branch, instructions)?;
                        instructions.push(Instruction::Jump(end_label.clone()));
                        instructions.push(Instruction::Label(else_label));
                        self.gen_stmt(else_branch, instructions)?;
                        instructions.push(Instruction::Label(end_label));
                    }
                }
            }
            StmtKind::While {
                condition,
                body,
                label,
            } => {
                let label = Self::loop_label(label, "while")?;
                let continue_label = format!("continue_{label}");
                let break_label = format!("break_{label}");

                instructions.push(Instruction::Label(continue_label.clone()));
                let cond = self.gen_expr(condition, instructions)?;
                let tmp = self.fresh_tmp();
                instructions.push(Instruction::Copy {
                    src: cond,
                    dst: tmp.clone(),
                });
                instructions.push(Instruction::JumpIfZero {
                    condition: tmp,
                    target: break_label.clone(),
                });
                self.gen_stmt(body, instructions)?;
                instructions.push(Instruction::Jump(continue_label));
                instructions.push(Instruction::Label(break_label));
            }
            StmtKind::DoWhile {
                body,
                condition,
                label,
            } => {
                let label = Self::loop_label(label, "do-while")?;
                let start_label = format!("start_{label}");
                let continue_label = format!("continue_{label}");
                let break_label = format!("break_{label}");

                instructions.push(Instruction::Label(start_label.clone()));
                self.gen_stmt(body, instructions)?;
                instructions.push(Instruction::Label(continue_label));
                let cond = self.gen_expr(condition, instructions)?;
                instructions.push(Instruction::JumpIfNotZero {
                    condition: cond,
                    target: start_label,
                });
                instructions.push(Instruction::Label(break_label));
            }
            StmtKind::For {
                init,
                condition,
                post,
                body,
                label,
            } => {
                let label = Self::loop_label(label, "for")?;
                let start_label = format!("start_{label}");
                let continue_label = format!("continue_{label}");
                let break_label = format!("break_{label}");

                match init {
                    ForInit::Declaration(decl) => self.gen_declaration(decl, instructions)?,
                    ForInit::Expr(Some(expr)) => {
                        let _ = self.gen_expr(expr, instructions)?;
                    }
                    ForInit::Expr(None) => {}
                }

                instructions.push(Instruction::Label(start_label.clone()));
                // An omitted condition is always true: fall through untested.
                if let Some(cond) = condition {
                    let value = self.gen_expr(cond, instructions)?;
                    let tmp = self.fresh_tmp();
                    instructions.push(Instruction::Copy {
                        src: value,
                        dst: tmp.clone(),
                    });
                    instructions.push(Instruction::JumpIfZero {
                        condition: tmp,
                        target: break_label.clone(),
                    });
                }
                self.gen_stmt(body, instructions)?;
                instructions.push(Instruction::Label(continue_label));
                if let Some(post) = post {
                    let _ = self.gen_expr(post, instructions)?;
                }
                instructions.push(Instruction::Jump(start_label));
                instructions.push(Instruction::Label(break_label));
            }
            StmtKind::Break { label } => {
                let label = Self::loop_label(label, "break")?;
                instructions.push(Instruction::Jump(format!("break_{label}")));
            }
            StmtKind::Continue { label } => {
                let label = Self::loop_label(label, "continue")?;
                instructions.push(Instruction::Jump(format!("continue_{label}")));
            }
        }
        Ok(())
    }

    fn gen_expr(&mut self, expr: &Expr, instructions: &mut Vec<Instruction>) -> IResult<Value> {
        match &expr.kind {
            ExprKind::Constant(value) => Ok(Value::Constant(*value)),
            ExprKind::Var(name) => Ok(Value::Var(name.clone())),
            ExprKind::Unary(op, operand) => {
                let src = self.gen_expr(operand, instructions)?;
                let dst = self.fresh_tmp();
                instructions.push(Instruction::Unary {
                    op: Self::unary_op(*op),
                    src,
                    dst: dst.clone(),
                });
                Ok(dst)
            }
            ExprKind::Binary(parse::BinaryOp::And, lhs, rhs) => {
                self.gen_logical_and(lhs, rhs, instructions)
            }
            ExprKind::Binary(parse::BinaryOp::Or, lhs, rhs) => {
                self.gen_logical_or(lhs, rhs, instructions)
            }
            ExprKind::Binary(op, lhs, rhs) => {
                let src1 = self.gen_expr(lhs, instructions)?;
                let src2 = self.gen_expr(rhs, instructions)?;
                let dst = self.fresh_tmp();
                instructions.push(Instruction::Binary {
                    op: Self::binary_op(*op),
                    src1,
                    src2,
                    dst: dst.clone(),
                });
                Ok(dst)
            }
            ExprKind::Assignment(lhs, rhs) => {
                let src = self.gen_expr(rhs, instructions)?;
                let ExprKind::Var(name) = &lhs.kind else {
                    return Err(IRError::InvalidAssignmentTarget);
                };
                let dst = Value::Var(name.clone());
                instructions.push(Instruction::Copy {
                    src,
                    dst: dst.clone(),
                });
                Ok(dst)
            }
            ExprKind::Conditional(condition, then_expr, else_expr) => {
                let else_label = self.fresh_label("cond_else");
                let end_label = self.fresh_label("cond_end");
                let dst = self.fresh_tmp();

                let cond = self.gen_expr(condition, instructions)?;
                instructions.push(Instruction::JumpIfZero {
                    condition: cond,
                    target: else_label.clone(),
                });
                let then_value = self.gen_expr(then_expr, instructions)?;
                instructions.push(Instruction::Copy {
                    src: then_value,
                    dst: dst.clone(),
                });
                instructions.push(Instruction::Jump(end_label.clone()));
                instructions.push(Instruction::Label(else_label));
                let else_value = self.gen_expr(else_expr, instructions)?;
                instructions.push(Instruction::Copy {
                    src: else_value,
                    dst: dst.clone(),
                });
                instructions.push(Instruction::Label(end_label));
                Ok(dst)
            }
        }
    }

    /// `a && b`: b is evaluated only when a is non-zero.
    fn gen_logical_and(
        &mut self,
        lhs: &Expr,
        rhs: &Expr,
        instructions: &mut Vec<Instruction>,
    ) -> IResult<Value> {
        let false_label = self.fresh_label("and_false");
        let end_label = self.fresh_label("and_end");
        let dst = self.fresh_tmp();

        let lhs_value = self.gen_expr(lhs, instructions)?;
        instructions.push(Instruction::JumpIfZero {
            condition: lhs_value,
            target: false_label.clone(),
        });
        let rhs_value = self.gen_expr(rhs, instructions)?;
        instructions.push(Instruction::JumpIfZero {
            condition: rhs_value,
            target: false_label.clone(),
        });
        instructions.push(Instruction::Copy {
            src: Value::Constant(1),
            dst: dst.clone(),
        });
        instructions.push(Instruction::Jump(end_label.clone()));
        instructions.push(Instruction::Label(false_label));
        instructions.push(Instruction::Copy {
            src: Value::Constant(0),
            dst: dst.clone(),
        });
        instructions.push(Instruction::Label(end_label));
        Ok(dst)
    }

    /// `a || b`: b is evaluated only when a is zero.
    fn gen_logical_or(
        &mut self,
        lhs: &Expr,
        rhs: &Expr,
        instructions: &mut Vec<Instruction>,
    ) -> IResult<Value> {
        let true_label = self.fresh_label("or_true");
        let end_label = self.fresh_label("or_end");
        let dst = self.fresh_tmp();

        let lhs_value = self.gen_expr(lhs, instructions)?;
        instructions.push(Instruction::JumpIfNotZero {
            condition: lhs_value,
            target: true_label.clone(),
        });
        let rhs_value = self.gen_expr(rhs, instructions)?;
        instructions.push(Instruction::JumpIfNotZero {
            condition: rhs_value,
            target: true_label.clone(),
        });
        instructions.push(Instruction::Copy {
            src: Value::Constant(0),
            dst: dst.clone(),
        });
        instructions.push(Instruction::Jump(end_label.clone()));
        instructions.push(Instruction::Label(true_label));
        instructions.push(Instruction::Copy {
            src: Value::Constant(1),
            dst: dst.clone(),
        });
        instructions.push(Instruction::Label(end_label));
        Ok(dst)
    }

    fn unary_op(op: parse::UnaryOp) -> UnaryOp {
        match op {
            parse::UnaryOp::Complement => UnaryOp::Complement,
            parse::UnaryOp::Negate => UnaryOp::Negate,
            parse::UnaryOp::Not => UnaryOp::Not,
        }
    }

    fn binary_op(op: parse::BinaryOp) -> BinaryOp {
        match op {
            parse::BinaryOp::Add => BinaryOp::Add,
            parse::BinaryOp::Subtract => BinaryOp::Subtract,
            parse::BinaryOp::Multiply => BinaryOp::Multiply,
            parse::BinaryOp::Divide => BinaryOp::Divide,
            parse::BinaryOp::Remainder => BinaryOp::Remainder,
            parse::BinaryOp::Equal => BinaryOp::Equal,
            parse::BinaryOp::NotEqual => BinaryOp::NotEqual,
            parse::BinaryOp::LessThan => BinaryOp::LessThan,
            parse::BinaryOp::LessOrEqual => BinaryOp::LessOrEqual,
            parse::BinaryOp::GreaterThan => BinaryOp::GreaterThan,
            parse::BinaryOp::GreaterOrEqual => BinaryOp::GreaterOrEqual,
            // Short-circuit operators never reach this table.
            parse::BinaryOp::And | parse::BinaryOp::Or => {
                unreachable!("logical operators are lowered before binary conversion")
            }
        }
    }

    fn loop_label<'a>(label: &'a Option<String>, stmt: &'static str) -> IResult<&'a str> {
        label
            .as_deref()
            .ok_or(IRError::MissingLoopLabel(stmt))
    }

    fn fresh_tmp(&mut self) -> Value {
        let n = self.tmp_counter;
        self.tmp_counter += 1;
        Value::Var(format!("tmp.{n}"))
    }

    fn fresh_label(&mut self, prefix: &str) -> String {
        let n = self.label_counter;
        self.label_counter += 1;
        format!("{prefix}.{n}")
    }
}

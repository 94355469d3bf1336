pub mod error;

use crate::parse::{Block, BlockItem, Program, Stmt, StmtKind};
use crate::semantic::loop_label::error::LoopLabelerError;

/// Attaches a fresh `loop.N` label to every loop and writes the enclosing
/// loop's label into each `break`/`continue`. Runs after variable
/// resolution.
#[derive(Default)]
pub struct LoopLabeler {
    counter: usize,
    loop_stack: Vec<String>,
}

impl LoopLabeler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label_program(mut self, program: Program) -> Result<Program, LoopLabelerError> {
        let mut function = program.function;
        function.body = self.label_block(function.body)?;
        Ok(Program { function })
    }

    fn label_block(&mut self, block: Block) -> Result<Block, LoopLabelerError> {
        let items = block
            .items
            .into_iter()
            .map(|item| match item {
                BlockItem::Statement(stmt) => Ok(BlockItem::Statement(self.label_stmt(stmt)?)),
                decl => Ok(decl),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Block { items })
    }

    fn label_stmt(&mut self, stmt: Stmt) -> Result<Stmt, LoopLabelerError> {
        let Stmt { kind, loc } = stmt;

        let kind = match kind {
            StmtKind::While {
                condition,
                body,
                label: _,
            } => {
                let (label, body) = self.label_loop_body(body)?;
                StmtKind::While {
                    condition,
                    body,
                    label: Some(label),
                }
            }
            StmtKind::DoWhile {
                body,
                condition,
                label: _,
            } => {
                let (label, body) = self.label_loop_body(body)?;
                StmtKind::DoWhile {
                    body,
                    condition,
                    label: Some(label),
                }
            }
            StmtKind::For {
                init,
                condition,
                post,
                body,
                label: _,
            } => {
                let (label, body) = self.label_loop_body(body)?;
                StmtKind::For {
                    init,
                    condition,
                    post,
                    body,
                    label: Some(label),
                }
            }
            StmtKind::Break { label: _ } => {
                let label = self
                    .loop_stack
                    .last()
                    .cloned()
                    .ok_or(LoopLabelerError::BreakOutsideLoop(loc.clone()))?;
                StmtKind::Break { label: Some(label) }
            }
            StmtKind::Continue { label: _ } => {
                let label = self
                    .loop_stack
                    .last()
                    .cloned()
                    .ok_or(LoopLabelerError::ContinueOutsideLoop(loc.clone()))?;
                StmtKind::Continue { label: Some(label) }
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => StmtKind::If {
                condition,
                then_branch: Box::new(self.label_stmt(*then_branch)?),
                else_branch: else_branch
                    .map(|stmt| self.label_stmt(*stmt))
                    .transpose()?
                    .map(Box::new),
            },
            StmtKind::Compound(block) => StmtKind::Compound(self.label_block(block)?),
            other => other,
        };

        Ok(Stmt { kind, loc })
    }

    fn label_loop_body(
        &mut self,
        body: Box<Stmt>,
    ) -> Result<(String, Box<Stmt>), LoopLabelerError> {
        let label = self.fresh_label();
        self.loop_stack.push(label.clone());
        let body = Box::new(self.label_stmt(*body)?);
        self.loop_stack.pop();
        Ok((label, body))
    }

    fn fresh_label(&mut self) -> String {
        let label = format!("loop.{}", self.counter);
        self.counter += 1;
        label
    }
}

pub mod error;
pub mod loop_label;


use std::collections::BTreeMap;

use crate::parse::{Block, BlockItem, Declaration, Expr, ExprKind, ForInit, Function, Program, Stmt, StmtKind};
use crate::semantic::error::SemanticError;

#[derive(Clone)]
struct Symbol {
    unique: String,
}

/// Resolves every identifier to a freshly minted unique name and rejects
/// duplicate declarations, undeclared uses, and non-identifier assignment
/// targets. Scopes are a stack of maps; the innermost map is the current
/// block, so a duplicate is a hit in `scopes.last()` alone.
#[derive(Default)]
pub struct SemanticAnalyzer {
    counter: usize,
    scopes: Vec<BTreeMap<String, Symbol>>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze_program(mut self, program: Program) -> Result<Program, SemanticError> {
        let function = self.analyze_function(program.function)?;
        Ok(Program { function })
    }

    fn analyze_function(&mut self, function: Function) -> Result<Function, SemanticError> {
        let Function { name, body } = function;
        let body = self.analyze_block(body)?;
        Ok(Function { name, body })
    }

    fn analyze_block(&mut self, block: Block) -> Result<Block, SemanticError> {
        self.enter_scope();
        let items = block
            .items
            .into_iter()
            .map(|item| self.analyze_block_item(item))
            .collect::<Result<Vec<_>, _>>()?;
        self.exit_scope();
        Ok(Block { items })
    }

    fn analyze_block_item(&mut self, item: BlockItem) -> Result<BlockItem, SemanticError> {
        match item {
            BlockItem::Declaration(decl) => {
                Ok(BlockItem::Declaration(self.analyze_declaration(decl)?))
            }
            BlockItem::Statement(stmt) => Ok(BlockItem::Statement(self.analyze_stmt(stmt)?)),
        }
    }

    fn analyze_declaration(&mut self, decl: Declaration) -> Result<Declaration, SemanticError> {
        let Declaration { name, init, loc } = decl;

        let current = self.scopes.last().expect("scope stack empty");
        if current.contains_key(&name) {
            return Err(SemanticError::DuplicateDeclaration(name, loc));
        }
        let unique = self.fresh_name(&name);
        self.scopes.last_mut().expect("scope stack empty").insert(
            name,
            Symbol {
                unique: unique.clone(),
            },
        );

        let init = init.map(|expr| self.analyze_expr(expr)).transpose()?;
        Ok(Declaration {
            name: unique,
            init,
            loc,
        })
    }

    fn analyze_stmt(&mut self, stmt: Stmt) -> Result<Stmt, SemanticError> {
        let Stmt { kind, loc } = stmt;

        let kind = match kind {
            StmtKind::Return(expr) => StmtKind::Return(self.analyze_expr(expr)?),
            StmtKind::Expr(expr) => StmtKind::Expr(self.analyze_expr(expr)?),
            StmtKind::Null => StmtKind::Null,
            StmtKind::Compound(block) => StmtKind::Compound(self.analyze_block(block)?),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => StmtKind::If {
                condition: self.analyze_expr(condition)?,
                then_branch: Box::new(self.analyze_stmt(*then_branch)?),
                else_branch: else_branch
                    .map(|stmt| self.analyze_stmt(*stmt))
                    .transpose()?
                    .map(Box::new),
            },
            StmtKind::While {
                condition,
                body,
                label,
            } => StmtKind::While {
                condition: self.analyze_expr(condition)?,
                body: Box::new(self.analyze_stmt(*body)?),
                label,
            },
            StmtKind::DoWhile {
                body,
                condition,
                label,
            } => StmtKind::DoWhile {
                body: Box::new(self.analyze_stmt(*body)?),
                condition: self.analyze_expr(condition)?,
                label,
            },
            StmtKind::For {
                init,
                condition,
                post,
                body,
                label,
            } => {
                // One scope spans the whole header and the body.
                self.enter_scope();
                let init = match init {
                    ForInit::Declaration(decl) => {
                        ForInit::Declaration(self.analyze_declaration(decl)?)
                    }
                    ForInit::Expr(expr) => {
                        ForInit::Expr(expr.map(|e| self.analyze_expr(e)).transpose()?)
                    }
                };
                let condition = condition.map(|e| self.analyze_expr(e)).transpose()?;
                let post = post.map(|e| self.analyze_expr(e)).transpose()?;
                let body = Box::new(self.analyze_stmt(*body)?);
                self.exit_scope();
                StmtKind::For {
                    init,
                    condition,
                    post,
                    body,
                    label,
                }
            }
            StmtKind::Break { label } => StmtKind::Break { label },
            StmtKind::Continue { label } => StmtKind::Continue { label },
        };

        Ok(Stmt { kind, loc })
    }

    fn analyze_expr(&mut self, expr: Expr) -> Result<Expr, SemanticError> {
        let Expr { kind, loc } = expr;

        let kind = match kind {
            ExprKind::Constant(value) => ExprKind::Constant(value),
            ExprKind::Var(name) => {
                let symbol = self.lookup(&name).ok_or_else(|| {
                    SemanticError::UndeclaredVariable(name.clone(), loc.clone())
                })?;
                ExprKind::Var(symbol.unique.clone())
            }
            ExprKind::Unary(op, operand) => {
                ExprKind::Unary(op, Box::new(self.analyze_expr(*operand)?))
            }
            ExprKind::Binary(op, left, right) => ExprKind::Binary(
                op,
                Box::new(self.analyze_expr(*left)?),
                Box::new(self.analyze_expr(*right)?),
            ),
            ExprKind::Assignment(left, right) => {
                if !matches!(left.kind, ExprKind::Var(_)) {
                    return Err(SemanticError::InvalidLvalue(left.loc.clone()));
                }
                ExprKind::Assignment(
                    Box::new(self.analyze_expr(*left)?),
                    Box::new(self.analyze_expr(*right)?),
                )
            }
            ExprKind::Conditional(condition, then_expr, else_expr) => ExprKind::Conditional(
                Box::new(self.analyze_expr(*condition)?),
                Box::new(self.analyze_expr(*then_expr)?),
                Box::new(self.analyze_expr(*else_expr)?),
            ),
        };

        Ok(Expr { kind, loc })
    }

    fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn enter_scope(&mut self) {
        self.scopes.push(BTreeMap::new());
    }

    fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    // Digit-led names cannot collide with anything the later stages mint
    // (tmp.N, loop.N, ...), so each pass keeps its own counter.
    fn fresh_name(&mut self, base: &str) -> String {
        let name = format!("{}.{base}", self.counter);
        self.counter += 1;
        name
    }
}

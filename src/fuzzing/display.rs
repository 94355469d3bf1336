// Renders an AST back to C source. Sub-expressions are parenthesized
// unconditionally so the printed text never depends on precedence.

use std::fmt;

use crate::parse::{
    BinaryOp, Block, BlockItem, Declaration, Expr, ExprKind, ForInit, Function, Program, Stmt,
    StmtKind, UnaryOp,
};

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.function)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "int {}(void) {}", self.name, self.body)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        for item in &self.items {
            writeln!(f, "{item}")?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for BlockItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockItem::Declaration(decl) => write!(f, "{decl}"),
            BlockItem::Statement(stmt) => write!(f, "{stmt}"),
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.init {
            Some(init) => write!(f, "int {} = {init};", self.name),
            None => write!(f, "int {};", self.name),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::Return(expr) => write!(f, "return {expr};"),
            StmtKind::Expr(expr) => write!(f, "{expr};"),
            StmtKind::Null => write!(f, ";"),
            StmtKind::Compound(block) => write!(f, "{block}"),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                write!(f, "if ({condition}) {then_branch}")?;
                if let Some(else_branch) = else_branch {
                    write!(f, " else {else_branch}")?;
                }
                Ok(())
            }
            StmtKind::While {
                condition, body, ..
            } => write!(f, "while ({condition}) {body}"),
            StmtKind::DoWhile {
                body, condition, ..
            } => write!(f, "do {body} while ({condition});"),
            StmtKind::For {
                init,
                condition,
                post,
                body,
                ..
            } => {
                write!(f, "for ({init}")?;
                if let Some(condition) = condition {
                    write!(f, " {condition}")?;
                }
                write!(f, ";")?;
                if let Some(post) = post {
                    write!(f, " {post}")?;
                }
                write!(f, ") {body}")
            }
            StmtKind::Break { .. } => write!(f, "break;"),
            StmtKind::Continue { .. } => write!(f, "continue;"),
        }
    }
}

impl fmt::Display for ForInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForInit::Declaration(decl) => write!(f, "{decl}"),
            ForInit::Expr(Some(expr)) => write!(f, "{expr};"),
            ForInit::Expr(None) => write!(f, ";"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Constant(value) => write!(f, "{value}"),
            ExprKind::Var(name) => write!(f, "{name}"),
            ExprKind::Unary(op, operand) => write!(f, "{op}({operand})"),
            ExprKind::Binary(op, left, right) => write!(f, "({left}) {op} ({right})"),
            ExprKind::Assignment(left, right) => write!(f, "{left} = ({right})"),
            ExprKind::Conditional(condition, then_expr, else_expr) => {
                write!(f, "({condition}) ? ({then_expr}) : ({else_expr})")
            }
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::Complement => "~",
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Remainder => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterOrEqual => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        })
    }
}

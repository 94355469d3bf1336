pub mod error;

#[cfg(test)]
mod parse_tests;

use crate::location::Location;
use crate::parse::error::ParserError;
use crate::tokenize::{Token, TokenKind};

pub type Expr = Node<ExprKind>;
pub type Stmt = Node<StmtKind>;

type PResult<T> = Result<T, ParserError>;

#[derive(Debug, Clone, PartialEq)]
pub struct Node<Kind> {
    pub kind: Kind,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub function: Function,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub items: Vec<BlockItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockItem {
    Declaration(Declaration),
    Statement(Stmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub init: Option<Expr>,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Return(Expr),
    Expr(Expr),
    Null,
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    Compound(Block),
    While {
        condition: Expr,
        body: Box<Stmt>,
        label: Option<String>,
    },
    DoWhile {
        body: Box<Stmt>,
        condition: Expr,
        label: Option<String>,
    },
    For {
        init: ForInit,
        condition: Option<Expr>,
        post: Option<Expr>,
        body: Box<Stmt>,
        label: Option<String>,
    },
    Break {
        label: Option<String>,
    },
    Continue {
        label: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Declaration(Declaration),
    Expr(Option<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Constant(i32),
    Var(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Assignment(Box<Expr>, Box<Expr>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Complement,
    Negate,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    And,
    Or,
}

/// Binding power of the token when used as a binary/ternary/assignment
/// operator; `None` ends the precedence-climbing loop.
fn binary_precedence(kind: &TokenKind) -> Option<u8> {
    let prec = match kind {
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 50,
        TokenKind::Plus | TokenKind::Minus => 45,
        TokenKind::LessThan
        | TokenKind::LessThanEqual
        | TokenKind::GreaterThan
        | TokenKind::GreaterThanEqual => 35,
        TokenKind::DoubleEqual | TokenKind::NotEqual => 30,
        TokenKind::DoubleAmpersand => 10,
        TokenKind::DoublePipe => 5,
        TokenKind::Question => 3,
        TokenKind::Equal => 1,
        _ => return None,
    };
    Some(prec)
}

#[derive(Debug, Clone)]
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(&mut self) -> PResult<Program> {
        let function = self.function()?;
        self.ensure_done()?;
        Ok(Program { function })
    }

    fn function(&mut self) -> PResult<Function> {
        self.expect(&TokenKind::Int)?;
        let name = self.identifier()?;
        self.expect(&TokenKind::LParen)?;
        self.expect(&TokenKind::Void)?;
        self.expect(&TokenKind::RParen)?;
        let body = self.block()?;
        Ok(Function { name, body })
    }

    fn block(&mut self) -> PResult<Block> {
        self.expect(&TokenKind::LBrace)?;
        let mut items = vec![];
        while !matches!(self.peek_kind(), Some(TokenKind::RBrace)) {
            items.push(self.block_item()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Block { items })
    }

    fn block_item(&mut self) -> PResult<BlockItem> {
        if matches!(self.peek_kind(), Some(TokenKind::Int)) {
            Ok(BlockItem::Declaration(self.declaration()?))
        } else {
            Ok(BlockItem::Statement(self.stmt()?))
        }
    }

    fn declaration(&mut self) -> PResult<Declaration> {
        let loc = self.peek()?.loc;
        self.expect(&TokenKind::Int)?;
        let name = self.identifier()?;
        let init = if matches!(self.peek_kind(), Some(TokenKind::Equal)) {
            self.advance()?;
            Some(self.expr()?)
        } else {
            None
        };
        self.expect(&TokenKind::Semicolon)?;
        Ok(Declaration { name, init, loc })
    }

    fn stmt(&mut self) -> PResult<Stmt> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::Return => {
                self.advance()?;
                let expr = self.expr()?;
                self.expect(&TokenKind::Semicolon)?;
                Ok(Stmt {
                    kind: StmtKind::Return(expr),
                    loc: token.loc,
                })
            }
            TokenKind::Semicolon => {
                self.advance()?;
                Ok(Stmt {
                    kind: StmtKind::Null,
                    loc: token.loc,
                })
            }
            TokenKind::LBrace => {
                let block = self.block()?;
                Ok(Stmt {
                    kind: StmtKind::Compound(block),
                    loc: token.loc,
                })
            }
            TokenKind::If => self.if_stmt(),
            TokenKind::While => self.while_stmt(),
            TokenKind::Do => self.do_while_stmt(),
            TokenKind::For => self.for_stmt(),
            TokenKind::Break => {
                self.advance()?;
                self.expect(&TokenKind::Semicolon)?;
                Ok(Stmt {
                    kind: StmtKind::Break { label: None },
                    loc: token.loc,
                })
            }
            TokenKind::Continue => {
                self.advance()?;
                self.expect(&TokenKind::Semicolon)?;
                Ok(Stmt {
                    kind: StmtKind::Continue { label: None },
                    loc: token.loc,
                })
            }
            _ => {
                let expr = self.expr()?;
                self.expect(&TokenKind::Semicolon)?;
                let loc = expr.loc.clone();
                Ok(Stmt {
                    kind: StmtKind::Expr(expr),
                    loc,
                })
            }
        }
    }

    fn if_stmt(&mut self) -> PResult<Stmt> {
        let loc = self.peek()?.loc;
        self.advance()?;
        self.expect(&TokenKind::LParen)?;
        let condition = self.expr()?;
        self.expect(&TokenKind::RParen)?;
        let then_branch = Box::new(self.stmt()?);
        let else_branch = if matches!(self.peek_kind(), Some(TokenKind::Else)) {
            self.advance()?;
            Some(Box::new(self.stmt()?))
        } else {
            None
        };
        Ok(Stmt {
            kind: StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            loc,
        })
    }

    fn while_stmt(&mut self) -> PResult<Stmt> {
        let loc = self.peek()?.loc;
        self.advance()?;
        self.expect(&TokenKind::LParen)?;
        let condition = self.expr()?;
        self.expect(&TokenKind::RParen)?;
        let body = Box::new(self.stmt()?);
        Ok(Stmt {
            kind: StmtKind::While {
                condition,
                body,
                label: None,
            },
            loc,
        })
    }

    fn do_while_stmt(&mut self) -> PResult<Stmt> {
        let loc = self.peek()?.loc;
        self.advance()?;
        let body = Box::new(self.stmt()?);
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LParen)?;
        let condition = self.expr()?;
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(Stmt {
            kind: StmtKind::DoWhile {
                body,
                condition,
                label: None,
            },
            loc,
        })
    }

    fn for_stmt(&mut self) -> PResult<Stmt> {
        let loc = self.peek()?.loc;
        self.advance()?;
        self.expect(&TokenKind::LParen)?;

        let init = if matches!(self.peek_kind(), Some(TokenKind::Semicolon)) {
            self.advance()?;
            ForInit::Expr(None)
        } else if matches!(self.peek_kind(), Some(TokenKind::Int)) {
            ForInit::Declaration(self.declaration()?)
        } else {
            let expr = self.expr()?;
            self.expect(&TokenKind::Semicolon)?;
            ForInit::Expr(Some(expr))
        };

        let condition = if matches!(self.peek_kind(), Some(TokenKind::Semicolon)) {
            None
        } else {
            Some(self.expr()?)
        };
        self.expect(&TokenKind::Semicolon)?;

        let post = if matches!(self.peek_kind(), Some(TokenKind::RParen)) {
            None
        } else {
            Some(self.expr()?)
        };
        self.expect(&TokenKind::RParen)?;

        let body = Box::new(self.stmt()?);
        Ok(Stmt {
            kind: StmtKind::For {
                init,
                condition,
                post,
                body,
                label: None,
            },
            loc,
        })
    }

    fn expr(&mut self) -> PResult<Expr> {
        self.parse_expression(0)
    }

    /// Precedence climbing. Left-associative binaries recurse at
    /// `precedence + 1`; `=` and `?:` are right-associative and recurse at
    /// `precedence`; the middle of a ternary restarts at 0.
    fn parse_expression(&mut self, min_precedence: u8) -> PResult<Expr> {
        let mut left = self.factor()?;

        loop {
            let Some(kind) = self.peek_kind().cloned() else {
                break;
            };
            let Some(precedence) = binary_precedence(&kind) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }

            match kind {
                TokenKind::Equal => {
                    self.advance()?;
                    let right = self.parse_expression(precedence)?;
                    let loc = left.loc.clone();
                    left = Expr {
                        kind: ExprKind::Assignment(Box::new(left), Box::new(right)),
                        loc,
                    };
                }
                TokenKind::Question => {
                    self.advance()?;
                    let middle = self.parse_expression(0)?;
                    self.expect(&TokenKind::Colon)?;
                    let right = self.parse_expression(precedence)?;
                    let loc = left.loc.clone();
                    left = Expr {
                        kind: ExprKind::Conditional(
                            Box::new(left),
                            Box::new(middle),
                            Box::new(right),
                        ),
                        loc,
                    };
                }
                _ => {
                    let op = self.binary_op()?;
                    let right = self.parse_expression(precedence + 1)?;
                    let loc = left.loc.clone();
                    left = Expr {
                        kind: ExprKind::Binary(op, Box::new(left), Box::new(right)),
                        loc,
                    };
                }
            }
        }

        Ok(left)
    }

    fn factor(&mut self) -> PResult<Expr> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::Constant(value) => {
                self.advance()?;
                Ok(Expr {
                    kind: ExprKind::Constant(value),
                    loc: token.loc,
                })
            }
            TokenKind::Identifier(name) => {
                self.advance()?;
                Ok(Expr {
                    kind: ExprKind::Var(name),
                    loc: token.loc,
                })
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Tilde => self.unary(UnaryOp::Complement, token.loc),
            TokenKind::Minus => self.unary(UnaryOp::Negate, token.loc),
            TokenKind::Not => self.unary(UnaryOp::Not, token.loc),
            other => Err(ParserError::ExpectedFactor(other, token.loc)),
        }
    }

    fn unary(&mut self, op: UnaryOp, loc: Location) -> PResult<Expr> {
        self.advance()?;
        let operand = self.factor()?;
        Ok(Expr {
            kind: ExprKind::Unary(op, Box::new(operand)),
            loc,
        })
    }

    fn binary_op(&mut self) -> PResult<BinaryOp> {
        let token = self.peek()?;
        let op = match token.kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Subtract,
            TokenKind::Star => BinaryOp::Multiply,
            TokenKind::Slash => BinaryOp::Divide,
            TokenKind::Percent => BinaryOp::Remainder,
            TokenKind::DoubleEqual => BinaryOp::Equal,
            TokenKind::NotEqual => BinaryOp::NotEqual,
            TokenKind::LessThan => BinaryOp::LessThan,
            TokenKind::LessThanEqual => BinaryOp::LessOrEqual,
            TokenKind::GreaterThan => BinaryOp::GreaterThan,
            TokenKind::GreaterThanEqual => BinaryOp::GreaterOrEqual,
            TokenKind::DoubleAmpersand => BinaryOp::And,
            TokenKind::DoublePipe => BinaryOp::Or,
            other => return Err(ParserError::ExpectedBinaryOperator(other, token.loc)),
        };
        self.advance()?;
        Ok(op)
    }

    fn identifier(&mut self) -> PResult<String> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::Identifier(name) => {
                self.advance()?;
                Ok(name)
            }
            other => Err(ParserError::ExpectedIdentifier(other, token.loc)),
        }
    }

    fn peek_opt(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn peek(&self) -> PResult<Token> {
        self.tokens
            .get(self.pos)
            .cloned()
            .ok_or(ParserError::UnexpectedEof)
    }

    fn advance(&mut self) -> PResult<()> {
        if self.pos >= self.tokens.len() {
            return Err(ParserError::UnexpectedEof);
        }
        self.pos += 1;
        Ok(())
    }

    fn expect(&mut self, kind: &TokenKind) -> PResult<()> {
        let token = self.peek()?;
        if &token.kind == kind {
            self.advance()
        } else {
            Err(ParserError::ExpectedToken(
                kind.clone(),
                token.kind,
                token.loc,
            ))
        }
    }

    fn ensure_done(&self) -> PResult<()> {
        match self.peek_opt() {
            None => Ok(()),
            Some(token) => Err(ParserError::NotAtEnd(token.kind.clone(), token.loc.clone())),
        }
    }
}

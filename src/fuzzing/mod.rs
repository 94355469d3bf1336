// Generates random programs that conform to the parser's grammar, for the
// harness in tests/fuzz.rs: whatever comes out of here must make it through
// the whole pipeline.

pub mod display;

use quickcheck::{Arbitrary, Gen, empty_shrinker};

use crate::location::Location;
use crate::parse::{
    BinaryOp, Block, BlockItem, Declaration, Expr, ExprKind, Function, Program, Stmt, StmtKind,
    UnaryOp,
};

pub fn generate() -> String {
    let mut g = Gen::new(12);
    Program::arbitrary(&mut g).to_string()
}

impl Arbitrary for Program {
    fn arbitrary(g: &mut Gen) -> Self {
        Program {
            function: gen_main(g),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        empty_shrinker()
    }
}

fn gen_main(g: &mut Gen) -> Function {
    let mut items = vec![];
    let mut vars = vec![];

    let declarations = usize::arbitrary(g) % 4;
    for i in 0..declarations {
        let name = format!("v{i}");
        items.push(BlockItem::Declaration(Declaration {
            name: name.clone(),
            init: Some(gen_expr(g, &vars, 3)),
            loc: Location::default(),
        }));
        vars.push(name);
    }

    items.push(BlockItem::Statement(stmt(StmtKind::Return(gen_expr(
        g, &vars, 4,
    )))));

    Function {
        name: String::from("main"),
        body: Block { items },
    }
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt {
        kind,
        loc: Location::default(),
    }
}

fn expr(kind: ExprKind) -> Expr {
    Expr {
        kind,
        loc: Location::default(),
    }
}

fn gen_expr(g: &mut Gen, vars: &[String], depth: usize) -> Expr {
    if depth == 0 {
        return gen_leaf(g, vars);
    }
    match u8::arbitrary(g) % 4 {
        0 => gen_leaf(g, vars),
        1 => {
            let op = *g
                .choose(&[UnaryOp::Negate, UnaryOp::Complement, UnaryOp::Not])
                .unwrap();
            expr(ExprKind::Unary(
                op,
                Box::new(gen_expr(g, vars, depth - 1)),
            ))
        }
        _ => {
            let op = *g
                .choose(&[
                    BinaryOp::Add,
                    BinaryOp::Subtract,
                    BinaryOp::Multiply,
                    BinaryOp::Divide,
                    BinaryOp::Remainder,
                    BinaryOp::Equal,
                    BinaryOp::NotEqual,
                    BinaryOp::LessThan,
                    BinaryOp::LessOrEqual,
                    BinaryOp::GreaterThan,
                    BinaryOp::GreaterOrEqual,
                    BinaryOp::And,
                    BinaryOp::Or,
                ])
                .unwrap();
            expr(ExprKind::Binary(
                op,
                Box::new(gen_expr(g, vars, depth - 1)),
                Box::new(gen_expr(g, vars, depth - 1)),
            ))
        }
    }
}

fn gen_leaf(g: &mut Gen, vars: &[String]) -> Expr {
    if !vars.is_empty() && bool::arbitrary(g) {
        let name = g.choose(vars).unwrap().clone();
        expr(ExprKind::Var(name))
    } else {
        let value = (u32::arbitrary(g) % 1000) as i32;
        expr(ExprKind::Constant(value))
    }
}

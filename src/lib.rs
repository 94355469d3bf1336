pub mod cli;
pub mod codegen;
pub mod driver;
pub mod emission;
pub mod fuzzing;
pub mod location;
pub mod parse;
pub mod semantic;
pub mod tacky;
pub mod tokenize;

use crate::codegen::lower;
use crate::emission::Emitter;
use crate::parse::Parser;
use crate::semantic::SemanticAnalyzer;
use crate::semantic::loop_label::LoopLabeler;
use crate::tacky::TackyGen;
use crate::tokenize::tokenize;

/// Runs the whole pipeline on already-preprocessed source and returns the
/// assembly text. Used by the generator harness and tests; the binary drives
/// the stages itself so it can stop early.
pub fn compile(source: &str, file: &str) -> anyhow::Result<String> {
    let tokens = tokenize(source, file)?;
    let ast = Parser::new(tokens).parse()?;
    let resolved = SemanticAnalyzer::new().analyze_program(ast)?;
    let labeled = LoopLabeler::new().label_program(resolved)?;
    let tacky = TackyGen::new(labeled).codegen()?;
    let asm = lower(&tacky)?;

    let mut buf = Vec::new();
    Emitter::new(&mut buf).emit(&asm)?;
    Ok(String::from_utf8(buf)?)
}

use std::fs::File;
use std::io::{BufWriter, Write as _};

use acc::cli::Args;
use acc::codegen::lower;
use acc::driver;
use acc::emission::Emitter;
use acc::parse::Parser;
use acc::semantic::SemanticAnalyzer;
use acc::semantic::loop_label::LoopLabeler;
use acc::tacky::TackyGen;
use acc::tokenize::tokenize;
use anyhow::Context as _;
use clap::Parser as _;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let source = driver::preprocess(&args.input_path)?;
    if args.verbose {
        eprintln!("source: {:?}", source);
    }

    let file = args.input_path.display().to_string();
    let tokens = tokenize(&source, &file)?;
    if args.lex {
        eprintln!("{tokens:?}");
        return Ok(());
    }
    if args.verbose {
        eprintln!("tokens: {:?}", tokens);
    }

    let ast = Parser::new(tokens).parse()?;
    if args.parse {
        eprintln!("{ast:?}");
        return Ok(());
    }
    if args.verbose {
        eprintln!("AST: {:?}", ast);
    }

    let resolved = SemanticAnalyzer::new().analyze_program(ast)?;
    let labeled = LoopLabeler::new().label_program(resolved)?;
    if args.validate {
        eprintln!("{labeled:?}");
        return Ok(());
    }
    if args.verbose {
        eprintln!("analyzed AST: {:?}", labeled);
    }

    let tacky = TackyGen::new(labeled).codegen()?;
    if args.tacky {
        eprintln!("{tacky:?}");
        return Ok(());
    }
    if args.verbose {
        eprintln!("TAC: {:?}", tacky);
    }

    let asm = lower(&tacky)?;
    if args.codegen {
        eprintln!("{asm:?}");
        return Ok(());
    }

    let asm_file = args.input_path.with_extension("s");
    if let Err(e) = write_assembly(&asm_file, &asm) {
        let _ = std::fs::remove_file(&asm_file);
        return Err(e);
    }

    let out_file = args.input_path.with_extension("");
    driver::assemble_and_link(&asm_file, &out_file)?;

    Ok(())
}

fn write_assembly(
    asm_file: &std::path::Path,
    asm: &acc::codegen::asm::AsmProgram,
) -> anyhow::Result<()> {
    let file =
        File::create(asm_file).context(format!("unable to create {}", asm_file.display()))?;
    let mut writer = BufWriter::new(file);
    Emitter::new(&mut writer).emit(asm)?;
    writer.flush()?;
    Ok(())
}

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use anyhow::{Context as _, bail};

/// Runs `gcc -E -P` on the input and returns the preprocessed source. The
/// intermediate `.i` file is removed before returning, on success and
/// failure alike.
pub fn preprocess(input: &Path) -> anyhow::Result<String> {
    let preprocessed = input.with_extension("i");

    let result = Command::new("gcc")
        .args(["-E", "-P"])
        .arg(input)
        .arg("-o")
        .arg(&preprocessed)
        .output();

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            let _ = fs::remove_file(&preprocessed);
            return Err(e).context("failed to run gcc for preprocessing");
        }
    };

    if !output.status.success() {
        let _ = fs::remove_file(&preprocessed);
        bail!("preprocessing failed:\n{}", combined_output(&output));
    }

    let source = fs::read_to_string(&preprocessed);
    let _ = fs::remove_file(&preprocessed);
    source.context(format!("unable to read {}", preprocessed.display()))
}

/// Assembles and links the emitted `.s` file with gcc. The assembly file is
/// removed once the assembler has exited, whatever its status.
pub fn assemble_and_link(asm_file: &Path, out_file: &Path) -> anyhow::Result<()> {
    let result = Command::new("gcc")
        .arg(asm_file)
        .arg("-o")
        .arg(out_file)
        .output();

    let _ = fs::remove_file(asm_file);

    let output = result.context("failed to run gcc for assembly")?;
    if !output.status.success() {
        bail!("assembly failed:\n{}", combined_output(&output));
    }
    Ok(())
}

fn combined_output(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

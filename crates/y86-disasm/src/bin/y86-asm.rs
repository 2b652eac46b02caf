use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use y86_disasm::source_listing;
use y86_rs::{assemble_source, AsmConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Y86 assembler")]
struct Opts {
    /// Input assembly file (labels, instructions and directives, one per line)
    #[arg(short, long)]
    input: PathBuf,
    /// Output binary file (raw image, little-endian words)
    #[arg(short, long)]
    output: PathBuf,
    /// Image capacity in bytes
    #[arg(long, default_value_t = AsmConfig::default().capacity)]
    capacity: usize,
    /// Print the annotated listing to stdout
    #[arg(long)]
    listing: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let text = fs::read_to_string(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;
    let asm = assemble_source(&text, AsmConfig { capacity: opts.capacity })
        .with_context(|| format!("assembling {}", opts.input.display()))?;
    if opts.listing {
        print!("{}", source_listing(&asm, &text));
    }
    fs::write(&opts.output, asm.image.into_bytes())
        .with_context(|| format!("writing {}", opts.output.display()))?;
    Ok(())
}

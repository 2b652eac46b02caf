use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use y86_disasm::listing::hex_bytes;
use y86_disasm::{disassemble, load_raw_bin};

#[derive(Parser, Debug)]
#[command(author, version, about = "Y86 disassembler CLI", long_about = None)]
struct Cli {
    /// Skip N bytes at start of file before loading
    #[arg(long, default_value_t = 0usize)]
    skip: usize,
    /// Limit bytes loaded (default: to EOF after --skip)
    #[arg(long)]
    len: Option<usize>,
    /// Show instruction bytes
    #[arg(long)]
    show_bytes: bool,
    /// Output format: text or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write output to file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
    /// Input binary path
    #[arg(value_name = "BINFILE")]
    input: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let bytes = load_raw_bin(&cli.input, cli.skip, cli.len)?;
    let lines = disassemble(&bytes);

    let rendered = match cli.format {
        OutputFormat::Json => serde_json::to_string_pretty(&lines)?,
        OutputFormat::Text => {
            let mut s = String::new();
            for l in &lines {
                if cli.show_bytes {
                    s.push_str(&format!("{:#06x}: {:<12}  {}\n", l.addr, hex_bytes(&l.bytes), l.text));
                } else {
                    s.push_str(&format!("{:#06x}: {}\n", l.addr, l.text));
                }
            }
            s
        }
    };

    match &cli.out {
        Some(path) => std::fs::write(path, rendered)?,
        None => print!("{rendered}"),
    }
    Ok(())
}

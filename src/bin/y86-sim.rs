use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use y86_rs::{run_image, RegId, RunReport, SimConfig, Status};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a Y86 binary image on the sequential simulator")]
struct Opts {
    /// Memory size in bytes
    #[arg(long, default_value_t = SimConfig::default().mem_size)]
    mem_size: usize,
    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Also print memory words changed by the program (text format)
    #[arg(long)]
    diff: bool,
    #[arg(value_name = "BINFILE")]
    input: String,
}

fn print_text(r: &RunReport, diff: bool) {
    println!("Stopped in {} steps at PC = {:#x}. Status '{}'", r.steps, r.pc, r.status);
    if let (Status::InvalidAddress, Some(addr)) = (r.status, r.fault_addr) {
        println!("Faulting address: {addr:#x}");
    }
    println!(
        "CC: Z={} S={} O={}",
        r.cc.contains(y86_rs::Cc::ZF) as u8,
        r.cc.contains(y86_rs::Cc::SF) as u8,
        r.cc.contains(y86_rs::Cc::OF) as u8
    );
    for reg in RegId::ALL {
        let v = r.regs[reg.index()];
        println!("{}: {:#010x} ({})", reg.name(), v, v as i32);
    }
    if diff {
        println!("Changes to memory:");
        for c in &r.mem_diff {
            println!("{:#06x}: {:#010x} -> {:#010x}", c.addr, c.old, c.new);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let bytes = std::fs::read(&opts.input).with_context(|| format!("reading {}", opts.input))?;
    let cfg = SimConfig { mem_size: opts.mem_size };
    let report = run_image(&bytes, cfg)?;

    match opts.format {
        OutputFormat::Text => print_text(&report, opts.diff),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;

use y86_rs::decoder::Decoder;
use y86_rs::disasm::fmt_decoded;
use y86_rs::isa::y86::Y86Decoder;
use y86_rs::Assembled;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub addr: u32,
    pub bytes: Vec<u8>,
    pub text: String,
}

pub fn hex_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Linear sweep from address 0. Bytes that do not decode are shown as `.byte`.
pub fn disassemble(bytes: &[u8]) -> Vec<Line> {
    let dec = Y86Decoder::new();
    let mut out = Vec::new();
    let mut pc = 0usize;
    while pc < bytes.len() {
        match dec.decode(&bytes[pc..]) {
            Some(d) => {
                let end = pc + d.width as usize;
                out.push(Line {
                    addr: pc as u32,
                    bytes: bytes[pc..end].to_vec(),
                    text: fmt_decoded(&d),
                });
                pc = end;
            }
            None => {
                out.push(Line {
                    addr: pc as u32,
                    bytes: vec![bytes[pc]],
                    text: format!(".byte {:#04x}", bytes[pc]),
                });
                pc += 1;
            }
        }
    }
    out
}

/// Source text annotated with the address and final bytes of each line,
/// after all forward references were patched, followed by the symbol table.
pub fn source_listing(asm: &Assembled, source: &str) -> String {
    let by_line: HashMap<usize, _> = asm.listing.iter().map(|e| (e.line, *e)).collect();
    let image = asm.image.as_bytes();
    let mut out = String::new();
    for (idx, src) in source.lines().enumerate() {
        match by_line.get(&(idx + 1)) {
            Some(e) => {
                let bytes = &image[e.offset as usize..(e.offset + e.len) as usize];
                let _ = writeln!(out, "{:#05x}: {:<12} | {}", e.offset, hex_bytes(bytes), src);
            }
            None => {
                let _ = writeln!(out, "{:19} | {}", "", src);
            }
        }
    }
    let mut symbols = asm.symbols.iter().peekable();
    if symbols.peek().is_some() {
        out.push_str("\nSymbols:\n");
        for (name, value) in symbols {
            let _ = writeln!(out, "{value:#06x}  {name}");
        }
    }
    out
}

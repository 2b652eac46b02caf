//! One-pass Y86 assembler.
//!
//! Lines are encoded in order as they arrive. Operands naming a symbol that is
//! not yet defined are emitted as zero and patched when the label shows up;
//! anything still unresolved when [`Assembler::finish`] runs is an error.

use serde::{Deserialize, Serialize};

use crate::error::{AsmError, LineError};
use crate::image::Image;
use crate::instructions::{self, Directive, Filler};
use crate::lexer;
use crate::memory::MEM_SIZE;
use crate::regs::{pack, RegId, R_NONE};
use crate::symbols::{Patch, SymbolTable};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AsmConfig {
    /// Image capacity in bytes.
    pub capacity: usize,
}

impl Default for AsmConfig {
    fn default() -> Self {
        Self { capacity: MEM_SIZE }
    }
}

/// Immediate operand: a literal, or a symbol to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imm {
    Value(u32),
    Symbol(String),
}

/// Where a source line's bytes landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub offset: u32,
    pub len: u32,
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct Assembled {
    pub image: Image,
    pub symbols: SymbolTable,
    pub listing: Vec<ListingEntry>,
}

/// Parses a decimal or `0x` hex literal with an optional sign. Negative
/// values wrap to their two's complement encoding.
pub fn parse_number(s: &str) -> Result<u32, AsmError> {
    let (neg, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let bad = || AsmError::BadNumber(s.to_string());
    let (digits, radix) = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (body, 10),
    };
    // the std parsers take their own leading '+'
    if digits.starts_with(['+', '-']) {
        return Err(bad());
    }
    let mag = u32::from_str_radix(digits, radix).map_err(|_| bad())?;
    Ok(if neg { mag.wrapping_neg() } else { mag })
}

pub fn parse_imm(s: &str) -> Result<Imm, AsmError> {
    if let Some(lit) = s.strip_prefix('$') {
        return parse_number(lit).map(Imm::Value);
    }
    match s.chars().next() {
        Some(c) if c.is_ascii_digit() || c == '-' || c == '+' => parse_number(s).map(Imm::Value),
        Some(_) => Ok(Imm::Symbol(s.to_string())),
        None => Err(AsmError::BadNumber(String::new())),
    }
}

pub fn parse_reg(s: &str) -> Result<RegId, AsmError> {
    RegId::parse(s).ok_or_else(|| AsmError::UnknownRegister(s.to_string()))
}

/// Parses `disp(%reg)`. An empty displacement means 0.
pub fn parse_mem(s: &str) -> Result<(Imm, RegId), AsmError> {
    let bad = || AsmError::BadMemory(s.to_string());
    let open = s.find('(').ok_or_else(bad)?;
    let close = s.rfind(')').ok_or_else(bad)?;
    if open > close
        || close + 1 != s.len()
        || s.find(')') != Some(close)
        || !s[open + 1..].starts_with('%')
    {
        return Err(bad());
    }
    let disp = &s[..open];
    let imm = if disp.is_empty() {
        Imm::Value(0)
    } else {
        parse_imm(disp)?
    };
    Ok((imm, parse_reg(&s[open + 1..close])?))
}

pub struct Assembler {
    offset: u32,
    image: Image,
    symbols: SymbolTable,
    listing: Vec<ListingEntry>,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(AsmConfig::default())
    }
}

impl Assembler {
    pub fn new(cfg: AsmConfig) -> Self {
        Self {
            offset: 0,
            image: Image::new(cfg.capacity),
            symbols: SymbolTable::new(),
            listing: Vec::new(),
        }
    }

    /// Next emit position.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Encodes one lexed line. `line` is only used to remember where
    /// forward references came from.
    pub fn assemble_line(&mut self, line: usize, fields: &[&str]) -> Result<(), AsmError> {
        let mut fields = fields;
        let Some(first) = fields.first() else {
            return Ok(());
        };
        if let Some(name) = first.strip_suffix(':') {
            if name.is_empty() {
                return Err(AsmError::EmptyLabel);
            }
            self.symbols.define(name, self.offset, &mut self.image)?;
            fields = &fields[1..];
        }

        let Some(&head) = fields.first() else {
            return Ok(());
        };
        if head.is_empty() {
            return Ok(());
        }
        let args = &fields[1..];
        if head.starts_with('.') {
            self.directive(line, head, args)
        } else {
            self.instruction(line, head, args)
        }
    }

    fn check_count(mnemonic: &str, expected: usize, args: &[&str]) -> Result<(), AsmError> {
        if args.len() != expected {
            return Err(AsmError::OperandCount {
                mnemonic: mnemonic.to_string(),
                expected,
                found: args.len(),
            });
        }
        Ok(())
    }

    fn directive(&mut self, line: usize, head: &str, args: &[&str]) -> Result<(), AsmError> {
        let dir = Directive::parse(head).ok_or_else(|| AsmError::UnknownDirective(head.to_string()))?;
        Self::check_count(head, 1, args)?;
        match dir {
            Directive::Long => {
                let imm = parse_imm(args[0])?;
                self.emit(line, None, None, Some(imm))
            }
            Directive::Pos => {
                self.offset = parse_number(args[0])?;
                Ok(())
            }
            Directive::Align => {
                let n = parse_number(args[0])?;
                if n == 0 {
                    return Err(AsmError::ZeroAlign);
                }
                let rem = self.offset % n;
                if rem != 0 {
                    let pad = n - rem;
                    self.offset = self.offset.checked_add(pad).ok_or(AsmError::Overflow {
                        offset: self.offset,
                        len: pad,
                        capacity: self.image.capacity(),
                    })?;
                }
                Ok(())
            }
        }
    }

    fn instruction(&mut self, line: usize, head: &str, args: &[&str]) -> Result<(), AsmError> {
        let desc = instructions::lookup(head).ok_or_else(|| AsmError::UnknownMnemonic(head.to_string()))?;
        let icode = desc.icode;
        Self::check_count(head, icode.operand_count(), args)?;

        let (reg, imm) = match icode.filler() {
            Filler::None => (None, None),
            Filler::RegReg => {
                let (ra, rb) = (parse_reg(args[0])?, parse_reg(args[1])?);
                (Some(pack(ra as u8, rb as u8)), None)
            }
            Filler::ImmReg => {
                let imm = parse_imm(args[0])?;
                let rb = parse_reg(args[1])?;
                (Some(pack(R_NONE, rb as u8)), Some(imm))
            }
            Filler::RegMem => {
                let ra = parse_reg(args[0])?;
                let (imm, rb) = parse_mem(args[1])?;
                (Some(pack(ra as u8, rb as u8)), Some(imm))
            }
            Filler::MemReg => {
                let (imm, rb) = parse_mem(args[0])?;
                let ra = parse_reg(args[1])?;
                (Some(pack(ra as u8, rb as u8)), Some(imm))
            }
            Filler::Imm => (None, Some(parse_imm(args[0])?)),
            Filler::Reg => {
                let ra = parse_reg(args[0])?;
                (Some(pack(ra as u8, R_NONE)), None)
            }
        };
        debug_assert_eq!(reg.is_some(), icode.has_reg());
        debug_assert_eq!(imm.is_some(), icode.has_imm());
        self.emit(line, Some(desc.opcode()), reg, imm)
    }

    fn emit(
        &mut self,
        line: usize,
        opcode: Option<u8>,
        reg: Option<u8>,
        imm: Option<Imm>,
    ) -> Result<(), AsmError> {
        let start = self.offset;
        let mut cur = self.image.cursor(start);
        if let Some(op) = opcode {
            cur.put_u8(op)?;
        }
        if let Some(r) = reg {
            cur.put_u8(r)?;
        }
        let mut deferred = None;
        match imm {
            Some(Imm::Value(v)) => cur.put_u32(v)?,
            Some(Imm::Symbol(name)) => {
                deferred = Some((name, cur.pos()));
                cur.put_u32(0)?;
            }
            None => {}
        }
        let end = cur.pos();

        if let Some((name, offset)) = deferred {
            self.symbols
                .resolve_or_defer(&name, Patch { offset, line }, &mut self.image);
        }
        self.listing.push(ListingEntry {
            offset: start,
            len: end - start,
            line,
        });
        self.offset = end;
        Ok(())
    }

    /// Ends the run. Fails if any referenced symbol never got a value,
    /// naming the earliest line that used one.
    pub fn finish(self) -> Result<Assembled, LineError> {
        let first_undefined = self
            .symbols
            .unresolved()
            .into_iter()
            .filter_map(|(name, patches)| {
                patches.iter().map(|p| p.line).min().map(|line| (line, name))
            })
            .min();
        if let Some((line, name)) = first_undefined {
            return Err(LineError {
                line,
                source: AsmError::UndefinedSymbol(name.to_string()),
            });
        }
        Ok(Assembled {
            image: self.image,
            symbols: self.symbols,
            listing: self.listing,
        })
    }
}

/// Assembles a whole source text.
pub fn assemble_source(text: &str, cfg: AsmConfig) -> Result<Assembled, LineError> {
    let mut asm = Assembler::new(cfg);
    for (idx, src) in text.lines().enumerate() {
        let fields = lexer::fields(src);
        if fields.is_empty() {
            continue;
        }
        asm.assemble_line(idx + 1, &fields)
            .map_err(|source| LineError { line: idx + 1, source })?;
    }
    asm.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(parse_number("10").unwrap(), 10);
        assert_eq!(parse_number("0x10").unwrap(), 16);
        assert_eq!(parse_number("-1").unwrap(), 0xFFFF_FFFF);
        assert_eq!(parse_number("+0X1f").unwrap(), 31);
        assert!(parse_number("").is_err());
        assert!(parse_number("12ab").is_err());
        for doubled in ["++5", "+-5", "--5", "0x+5", "-0x-5"] {
            assert!(matches!(parse_number(doubled), Err(AsmError::BadNumber(_))), "{doubled}");
        }
    }

    #[test]
    fn immediates() {
        assert_eq!(parse_imm("$-4").unwrap(), Imm::Value((-4i32) as u32));
        assert_eq!(parse_imm("Stack").unwrap(), Imm::Symbol("Stack".into()));
        assert!(matches!(parse_imm("$Stack"), Err(AsmError::BadNumber(_))));
    }

    #[test]
    fn memory_operands() {
        assert_eq!(parse_mem("8(%ebp)").unwrap(), (Imm::Value(8), RegId::Ebp));
        assert_eq!(parse_mem("(%esp)").unwrap(), (Imm::Value(0), RegId::Esp));
        assert_eq!(
            parse_mem("array(%edx)").unwrap(),
            (Imm::Symbol("array".into()), RegId::Edx)
        );
        for bad in ["8%ebp)", "8(%ebp", ")8(%ebp", "8(ebp)", "8(%ebp)x"] {
            assert!(matches!(parse_mem(bad), Err(AsmError::BadMemory(_))), "{bad}");
        }
        assert!(matches!(parse_mem("4(%xyz)"), Err(AsmError::UnknownRegister(_))));
    }
}

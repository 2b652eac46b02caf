//! Y86 encoding table.
//!
//! Every instruction is an opcode byte (`icode << 4 | ifun`), optionally
//! followed by a register byte (`rA << 4 | rB`) and a 4-byte little-endian
//! immediate. Which sections are present depends on the class alone.

use serde::{Deserialize, Serialize};

pub const OPCODE_SIZE: u32 = 1;
pub const REG_SIZE: u32 = 1;
pub const IMM_SIZE: u32 = 4;

/// Instruction class, the high nibble of the opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Icode {
    Halt = 0x0,
    Nop = 0x1,
    Rrmovl = 0x2,
    Irmovl = 0x3,
    Rmmovl = 0x4,
    Mrmovl = 0x5,
    Opl = 0x6,
    Jxx = 0x7,
    Call = 0x8,
    Ret = 0x9,
    Pushl = 0xA,
    Popl = 0xB,
}

/// How the textual operands of a class map onto the register/immediate sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filler {
    /// No operands.
    None,
    /// `%rA, %rB`
    RegReg,
    /// `imm, %rB` with rA = none
    ImmReg,
    /// `%rA, disp(%rB)`
    RegMem,
    /// `disp(%rB), %rA`
    MemReg,
    /// `imm`
    Imm,
    /// `%rA` with rB = none
    Reg,
}

impl Icode {
    pub const ALL: [Icode; 12] = [
        Icode::Halt,
        Icode::Nop,
        Icode::Rrmovl,
        Icode::Irmovl,
        Icode::Rmmovl,
        Icode::Mrmovl,
        Icode::Opl,
        Icode::Jxx,
        Icode::Call,
        Icode::Ret,
        Icode::Pushl,
        Icode::Popl,
    ];

    pub fn from_nibble(n: u8) -> Option<Self> {
        Self::ALL.get(n as usize).copied()
    }

    pub fn has_reg(self) -> bool {
        matches!(
            self,
            Icode::Rrmovl
                | Icode::Irmovl
                | Icode::Rmmovl
                | Icode::Mrmovl
                | Icode::Opl
                | Icode::Pushl
                | Icode::Popl
        )
    }

    pub fn has_imm(self) -> bool {
        matches!(
            self,
            Icode::Irmovl | Icode::Rmmovl | Icode::Mrmovl | Icode::Jxx | Icode::Call
        )
    }

    /// Encoded size in bytes: 1, 2, 5 or 6.
    pub fn size(self) -> u32 {
        let mut n = OPCODE_SIZE;
        if self.has_reg() {
            n += REG_SIZE;
        }
        if self.has_imm() {
            n += IMM_SIZE;
        }
        n
    }

    /// Number of textual operands following the mnemonic.
    pub fn operand_count(self) -> usize {
        match self.filler() {
            Filler::None => 0,
            Filler::Imm | Filler::Reg => 1,
            Filler::RegReg | Filler::ImmReg | Filler::RegMem | Filler::MemReg => 2,
        }
    }

    pub fn filler(self) -> Filler {
        match self {
            Icode::Halt | Icode::Nop | Icode::Ret => Filler::None,
            Icode::Rrmovl | Icode::Opl => Filler::RegReg,
            Icode::Irmovl => Filler::ImmReg,
            Icode::Rmmovl => Filler::RegMem,
            Icode::Mrmovl => Filler::MemReg,
            Icode::Jxx | Icode::Call => Filler::Imm,
            Icode::Pushl | Icode::Popl => Filler::Reg,
        }
    }

    /// Highest sub-function the class accepts.
    pub fn max_ifun(self) -> u8 {
        match self {
            Icode::Rrmovl | Icode::Jxx => 6,
            Icode::Opl => 3,
            _ => 0,
        }
    }
}

/// Assembler-only pseudo-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Long,
    Pos,
    Align,
}

impl Directive {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            ".long" => Some(Directive::Long),
            ".pos" => Some(Directive::Pos),
            ".align" => Some(Directive::Align),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub mnemonic: &'static str,
    pub icode: Icode,
    pub ifun: u8,
}

impl InstrDesc {
    pub fn opcode(&self) -> u8 {
        ((self.icode as u8) << 4) | (self.ifun & 0xF)
    }
}

const fn desc(mnemonic: &'static str, icode: Icode, ifun: u8) -> InstrDesc {
    InstrDesc { mnemonic, icode, ifun }
}

pub const TABLE: &[InstrDesc] = &[
    desc("halt", Icode::Halt, 0),
    desc("nop", Icode::Nop, 0),
    desc("rrmovl", Icode::Rrmovl, 0),
    desc("cmovle", Icode::Rrmovl, 1),
    desc("cmovl", Icode::Rrmovl, 2),
    desc("cmove", Icode::Rrmovl, 3),
    desc("cmovne", Icode::Rrmovl, 4),
    desc("cmovge", Icode::Rrmovl, 5),
    desc("cmovg", Icode::Rrmovl, 6),
    desc("irmovl", Icode::Irmovl, 0),
    desc("rmmovl", Icode::Rmmovl, 0),
    desc("mrmovl", Icode::Mrmovl, 0),
    desc("addl", Icode::Opl, 0),
    desc("subl", Icode::Opl, 1),
    desc("andl", Icode::Opl, 2),
    desc("xorl", Icode::Opl, 3),
    desc("jmp", Icode::Jxx, 0),
    desc("jle", Icode::Jxx, 1),
    desc("jl", Icode::Jxx, 2),
    desc("je", Icode::Jxx, 3),
    desc("jne", Icode::Jxx, 4),
    desc("jge", Icode::Jxx, 5),
    desc("jg", Icode::Jxx, 6),
    desc("call", Icode::Call, 0),
    desc("ret", Icode::Ret, 0),
    desc("pushl", Icode::Pushl, 0),
    desc("popl", Icode::Popl, 0),
];

pub fn lookup(mnemonic: &str) -> Option<&'static InstrDesc> {
    TABLE.iter().find(|d| d.mnemonic == mnemonic)
}

pub fn mnemonic_of(icode: Icode, ifun: u8) -> Option<&'static str> {
    TABLE
        .iter()
        .find(|d| d.icode == icode && d.ifun == ifun)
        .map(|d| d.mnemonic)
}

use crate::decoder::{Decoded, Decoder};
use crate::instructions::{Filler, Icode, IMM_SIZE};
use crate::regs::{unpack, RegId, R_NONE};

/// Decoder for the 32-bit Y86 encoding.
///
/// Besides the icode range it rejects sub-functions the class does not define
/// and register fields the class reads that are not one of the eight registers.
#[derive(Debug, Default, Clone, Copy)]
pub struct Y86Decoder;

impl Y86Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for Y86Decoder {
    fn decode(&self, bytes: &[u8]) -> Option<Decoded> {
        let op = *bytes.first()?;
        let icode = Icode::from_nibble(op >> 4)?;
        let ifun = op & 0xF;
        if ifun > icode.max_ifun() {
            return None;
        }

        let mut at = 1usize;
        let (mut ra, mut rb) = (R_NONE, R_NONE);
        if icode.has_reg() {
            (ra, rb) = unpack(*bytes.get(at)?);
            at += 1;
        }
        let mut valc = 0;
        if icode.has_imm() {
            let end = at + IMM_SIZE as usize;
            let word: [u8; 4] = bytes.get(at..end)?.try_into().ok()?;
            valc = u32::from_le_bytes(word);
            at = end;
        }

        let (reads_a, reads_b) = match icode.filler() {
            Filler::RegReg | Filler::RegMem | Filler::MemReg => (true, true),
            Filler::ImmReg => (false, true),
            Filler::Reg => (true, false),
            Filler::None | Filler::Imm => (false, false),
        };
        if (reads_a && RegId::from_id(ra).is_none()) || (reads_b && RegId::from_id(rb).is_none()) {
            return None;
        }

        Some(Decoded {
            icode,
            ifun,
            ra,
            rb,
            valc,
            width: at as u8,
        })
    }
}

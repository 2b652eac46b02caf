use serde::{Deserialize, Serialize};

use crate::instructions::Icode;
use crate::regs::RegId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub icode: Icode,
    pub ifun: u8,
    pub ra: u8, // R_NONE when absent
    pub rb: u8,
    pub valc: u32,
    pub width: u8, // 1, 2, 5 or 6
}

impl Decoded {
    pub fn reg_a(&self) -> Option<RegId> {
        RegId::from_id(self.ra)
    }

    pub fn reg_b(&self) -> Option<RegId> {
        RegId::from_id(self.rb)
    }
}

pub trait Decoder {
    /// Decodes one instruction from the start of `bytes`. `None` means the
    /// bytes do not form a valid instruction (or are too short).
    fn decode(&self, bytes: &[u8]) -> Option<Decoded>;
}

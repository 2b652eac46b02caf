use anyhow::Error;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::decoder::Decoder;
use crate::disasm::fmt_decoded;
use crate::exec::Executor;
use crate::instructions::Icode;
use crate::memory::{Bus, MEM_SIZE};
use crate::regs::RegId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimConfig {
    pub mem_size: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { mem_size: MEM_SIZE }
    }
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cc: u8 {
const OF = 1 << 0; // Overflow
const SF = 1 << 1; // Sign
const ZF = 1 << 2; // Zero
}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    pub pc: u32,
    pub cc: Cc,
    pub regs: [u32; 8], // indexed by RegId
}

/// Why a step did not complete normally. `Halt` is the successful end of a program.
#[derive(thiserror::Error, Debug)]
pub enum Trap {
    #[error("halted")]
    Halt,
    #[error("Invalid instruction at {pc:#06x}")]
    InvalidInstruction { pc: u32 },
    #[error("Invalid address {addr:#010x}: {source}")]
    InvalidAddress { addr: u32, #[source] source: Error },
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            pc: 0,
            cc: Cc::empty(),
            regs: [0; 8],
        }
    }

    pub fn reg(&self, r: RegId) -> u32 {
        self.regs[r.index()]
    }

    pub fn set_reg(&mut self, r: RegId, val: u32) {
        self.regs[r.index()] = val;
    }

    /// Fetches and executes the instruction at `pc`. On any `Err` the
    /// architectural state is left as it was before the call.
    pub fn step<B: Bus, D: Decoder, X: Executor>(
        &mut self,
        bus: &mut B,
        dec: &D,
        exec: &X,
    ) -> Result<(), Trap> {
        let pc = self.pc;
        let op = bus
            .read_u8(pc)
            .map_err(|source| Trap::InvalidAddress { addr: pc, source })?;
        let icode = Icode::from_nibble(op >> 4).ok_or(Trap::InvalidInstruction { pc })?;

        let mut raw = [0u8; 6];
        raw[0] = op;
        for i in 1..icode.size() {
            let addr = pc.wrapping_add(i);
            raw[i as usize] = bus
                .read_u8(addr)
                .map_err(|source| Trap::InvalidAddress { addr, source })?;
        }
        let d = dec
            .decode(&raw[..icode.size() as usize])
            .ok_or(Trap::InvalidInstruction { pc })?;
        trace!(pc, "{}", fmt_decoded(&d));

        if d.icode == Icode::Halt {
            return Err(Trap::Halt);
        }
        exec.exec(self, bus, d)
    }
}

use anyhow::{ensure, Result};
use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

/// Default memory capacity in bytes, shared by the assembler image and the simulator.
pub const MEM_SIZE: usize = 4000;

pub trait Bus {
    fn read_u8(&mut self, addr: u32) -> Result<u8>;
    fn read_u32(&mut self, addr: u32) -> Result<u32>;
    fn write_u32(&mut self, addr: u32, val: u32) -> Result<()>;
}

/// One changed 4-byte word, as reported after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemChange {
    pub addr: u32,
    pub old: u32,
    pub new: u32,
}

/// Flat little-endian memory starting at address 0.
#[derive(Clone)]
pub struct LinearMemory {
    pub mem: Vec<u8>,
    initial: Vec<u8>,
    written: BitVec,
}

impl LinearMemory {
    pub fn new(size: usize) -> Self {
        Self {
            mem: vec![0; size],
            initial: vec![0; size],
            written: bitvec![0; size],
        }
    }

    /// Clears memory and copies `bytes` to address 0. The result is the
    /// baseline for [`Self::diff`].
    pub fn load(&mut self, bytes: &[u8]) -> Result<()> {
        ensure!(
            bytes.len() <= self.mem.len(),
            "image of {} bytes does not fit in {} bytes of memory",
            bytes.len(),
            self.mem.len()
        );
        self.mem.fill(0);
        self.mem[..bytes.len()].copy_from_slice(bytes);
        self.initial.copy_from_slice(&self.mem);
        self.written.fill(false);
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.mem.len()
    }

    fn check(&self, addr: u32, len: usize) -> Result<usize> {
        let off = addr as usize;
        ensure!(
            off.checked_add(len).is_some_and(|end| end <= self.mem.len()),
            "address {addr:#x} (+{len}) outside {} bytes of memory",
            self.mem.len()
        );
        Ok(off)
    }

    fn word_at(bytes: &[u8], off: usize) -> u32 {
        let mut w = [0u8; 4];
        let end = (off + 4).min(bytes.len());
        w[..end - off].copy_from_slice(&bytes[off..end]);
        u32::from_le_bytes(w)
    }

    /// Words whose contents differ from what was loaded, in address order.
    pub fn diff(&self) -> Vec<MemChange> {
        let mut out = Vec::new();
        let mut last_word = None;
        for idx in self.written.iter_ones() {
            let off = idx & !3;
            if last_word == Some(off) {
                continue;
            }
            last_word = Some(off);
            let old = Self::word_at(&self.initial, off);
            let new = Self::word_at(&self.mem, off);
            if old != new {
                out.push(MemChange { addr: off as u32, old, new });
            }
        }
        out
    }
}

impl Bus for LinearMemory {
    fn read_u8(&mut self, addr: u32) -> Result<u8> {
        let off = self.check(addr, 1)?;
        Ok(self.mem[off])
    }
    fn read_u32(&mut self, addr: u32) -> Result<u32> {
        let off = self.check(addr, 4)?;
        Ok(Self::word_at(&self.mem, off))
    }
    fn write_u32(&mut self, addr: u32, val: u32) -> Result<()> {
        let off = self.check(addr, 4)?;
        self.mem[off..off + 4].copy_from_slice(&val.to_le_bytes());
        self.written[off..off + 4].fill(true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_access_straddling_the_end() {
        let mut mem = LinearMemory::new(8);
        assert!(mem.read_u32(4).is_ok());
        assert!(mem.read_u32(5).is_err());
        assert!(mem.write_u32(u32::MAX - 1, 0).is_err());
        assert!(mem.read_u8(8).is_err());
    }

    #[test]
    fn diff_ignores_rewrites_of_the_same_value() {
        let mut mem = LinearMemory::new(16);
        mem.load(&[1, 0, 0, 0]).unwrap();
        mem.write_u32(0, 1).unwrap();
        mem.write_u32(8, 0xdead_beef).unwrap();
        assert_eq!(
            mem.diff(),
            vec![MemChange { addr: 8, old: 0, new: 0xdead_beef }]
        );
    }
}

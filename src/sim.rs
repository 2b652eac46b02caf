use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cpu::{Cc, Cpu, SimConfig, Trap};
use crate::exec::SeqExecutor;
use crate::isa::y86::Y86Decoder;
use crate::memory::{LinearMemory, MemChange};
use crate::regs::RegId;

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Halted,
    InvalidInstruction,
    InvalidAddress,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Status::Halted => "halted",
            Status::InvalidInstruction => "invalid-instruction",
            Status::InvalidAddress => "invalid-address",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stop {
    pub status: Status,
    pub fault_addr: Option<u32>,
}

/// Final architectural state after a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub status: Status,
    pub pc: u32,
    pub cc: Cc,
    pub regs: [u32; 8],
    pub steps: u64,
    /// Address that caused an `InvalidAddress` fault.
    pub fault_addr: Option<u32>,
    pub mem_diff: Vec<MemChange>,
}

pub struct Simulator {
    pub cpu: Cpu,
    pub mem: LinearMemory,
    steps: u64,
    stopped: Option<Stop>,
    dec: Y86Decoder,
}

impl Simulator {
    pub fn new(cfg: SimConfig) -> Self {
        Self {
            cpu: Cpu::new(),
            mem: LinearMemory::new(cfg.mem_size),
            steps: 0,
            stopped: None,
            dec: Y86Decoder::new(),
        }
    }

    /// Starts a fresh run of `image`: memory is cleared, registers and flags
    /// are zero except `%esp`, which points just past the top of memory.
    pub fn load(&mut self, image: &[u8]) -> Result<()> {
        self.mem.load(image)?;
        self.cpu = Cpu::new();
        self.cpu.set_reg(RegId::Esp, self.mem.size() as u32);
        self.steps = 0;
        self.stopped = None;
        Ok(())
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Executes one instruction; `Some` once the program has stopped. After
    /// that the same `Stop` is returned without executing anything.
    pub fn step(&mut self) -> Option<Stop> {
        if self.stopped.is_some() {
            return self.stopped;
        }
        self.stopped = self.execute();
        self.stopped
    }

    fn execute(&mut self) -> Option<Stop> {
        match self.cpu.step(&mut self.mem, &self.dec, &SeqExecutor) {
            Ok(()) => {
                self.steps += 1;
                None
            }
            Err(Trap::Halt) => {
                self.steps += 1;
                Some(Stop { status: Status::Halted, fault_addr: None })
            }
            Err(trap @ Trap::InvalidInstruction { .. }) => {
                warn!(steps = self.steps, "{trap}");
                Some(Stop { status: Status::InvalidInstruction, fault_addr: None })
            }
            Err(Trap::InvalidAddress { addr, source }) => {
                warn!(steps = self.steps, pc = self.cpu.pc, "invalid address {addr:#x}: {source}");
                Some(Stop { status: Status::InvalidAddress, fault_addr: Some(addr) })
            }
        }
    }

    /// Runs until a terminal status.
    pub fn run(&mut self) -> RunReport {
        let stop = loop {
            if let Some(stop) = self.step() {
                break stop;
            }
        };
        debug!(status = %stop.status, steps = self.steps, pc = self.cpu.pc, "simulation finished");
        self.report(stop)
    }

    pub fn report(&self, stop: Stop) -> RunReport {
        let Stop { status, fault_addr } = stop;
        RunReport {
            status,
            pc: self.cpu.pc,
            cc: self.cpu.cc,
            regs: self.cpu.regs,
            steps: self.steps,
            fault_addr,
            mem_diff: self.mem.diff(),
        }
    }
}

/// Loads `image` into fresh memory and runs it to completion.
pub fn run_image(image: &[u8], cfg: SimConfig) -> Result<RunReport> {
    let mut sim = Simulator::new(cfg);
    sim.load(image)?;
    Ok(sim.run())
}

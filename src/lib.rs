pub mod alu;
pub mod asm;
pub mod cpu;
pub mod decoder;
pub mod disasm;
pub mod error;
pub mod exec;
pub mod image;
pub mod instructions;
pub mod lexer;
pub mod memory;
pub mod regs;
pub mod sim;
pub mod symbols;

pub mod isa {
    pub mod y86; // 32-bit Y86 (IA32 subset) encoding
}

pub use asm::{assemble_source, AsmConfig, Assembled, Assembler};
pub use cpu::{Cc, Cpu, SimConfig, Trap};
pub use error::{AsmError, ErrorKind, LineError};
pub use memory::{Bus, LinearMemory};
pub use regs::RegId;
pub use sim::{run_image, RunReport, Simulator, Status};

use crate::alu::{alu, AluOp, Cond};
use crate::cpu::{Cpu, Trap};
use crate::decoder::Decoded;
use crate::instructions::Icode;
use crate::memory::Bus;
use crate::regs::RegId;

pub trait Executor {
    fn exec<B: Bus>(&self, cpu: &mut Cpu, bus: &mut B, d: Decoded) -> Result<(), Trap>;
}

/// Single-cycle executor: decode, execute, memory, write-back, PC update.
///
/// Nothing is committed to `cpu` until the memory stage has succeeded, so a
/// faulting access leaves the registers, flags and PC untouched.
pub struct SeqExecutor;

impl SeqExecutor {
    fn src_a(d: &Decoded) -> Option<RegId> {
        match d.icode {
            Icode::Rrmovl | Icode::Rmmovl | Icode::Opl | Icode::Pushl => d.reg_a(),
            Icode::Popl | Icode::Ret => Some(RegId::Esp),
            _ => None,
        }
    }

    fn src_b(d: &Decoded) -> Option<RegId> {
        match d.icode {
            Icode::Rmmovl | Icode::Mrmovl | Icode::Opl => d.reg_b(),
            Icode::Pushl | Icode::Popl | Icode::Call | Icode::Ret => Some(RegId::Esp),
            _ => None,
        }
    }

    fn dst_e(d: &Decoded, cnd: bool) -> Option<RegId> {
        match d.icode {
            Icode::Rrmovl if cnd => d.reg_b(),
            Icode::Irmovl | Icode::Opl => d.reg_b(),
            Icode::Pushl | Icode::Popl | Icode::Call | Icode::Ret => Some(RegId::Esp),
            _ => None,
        }
    }

    fn dst_m(d: &Decoded) -> Option<RegId> {
        match d.icode {
            Icode::Mrmovl | Icode::Popl => d.reg_a(),
            _ => None,
        }
    }

    fn alu_a(d: &Decoded, val_a: u32) -> u32 {
        match d.icode {
            Icode::Rrmovl | Icode::Opl => val_a,
            Icode::Irmovl | Icode::Rmmovl | Icode::Mrmovl => d.valc,
            Icode::Call | Icode::Pushl => (-4i32) as u32,
            Icode::Ret | Icode::Popl => 4,
            _ => 0,
        }
    }

    fn alu_b(d: &Decoded, val_b: u32) -> u32 {
        match d.icode {
            Icode::Rmmovl
            | Icode::Mrmovl
            | Icode::Opl
            | Icode::Pushl
            | Icode::Popl
            | Icode::Call
            | Icode::Ret => val_b,
            _ => 0,
        }
    }

    fn alu_fun(d: &Decoded) -> Option<AluOp> {
        match d.icode {
            Icode::Opl => AluOp::from_ifun(d.ifun),
            _ => Some(AluOp::Add),
        }
    }
}

impl Executor for SeqExecutor {
    fn exec<B: Bus>(&self, cpu: &mut Cpu, bus: &mut B, d: Decoded) -> Result<(), Trap> {
        let pc = cpu.pc;
        let val_p = pc.wrapping_add(d.width as u32);

        let cnd = match d.icode {
            Icode::Rrmovl | Icode::Jxx => Cond::from_ifun(d.ifun)
                .ok_or(Trap::InvalidInstruction { pc })?
                .holds(cpu.cc),
            _ => true,
        };

        // decode
        let read = |r: Option<RegId>| r.map_or(0, |r| cpu.reg(r));
        let val_a = read(Self::src_a(&d));
        let val_b = read(Self::src_b(&d));

        // execute
        let op = Self::alu_fun(&d).ok_or(Trap::InvalidInstruction { pc })?;
        let out = alu(op, Self::alu_a(&d, val_a), Self::alu_b(&d, val_b));
        let val_e = out.val;

        // memory
        let mem_addr = match d.icode {
            Icode::Rmmovl | Icode::Pushl | Icode::Call | Icode::Mrmovl => val_e,
            Icode::Popl | Icode::Ret => val_a,
            _ => 0,
        };
        let val_m = match d.icode {
            Icode::Mrmovl | Icode::Popl | Icode::Ret => bus
                .read_u32(mem_addr)
                .map_err(|source| Trap::InvalidAddress { addr: mem_addr, source })?,
            _ => 0,
        };
        let store = match d.icode {
            Icode::Rmmovl | Icode::Pushl => Some(val_a),
            Icode::Call => Some(val_p),
            _ => None,
        };
        if let Some(val) = store {
            bus.write_u32(mem_addr, val)
                .map_err(|source| Trap::InvalidAddress { addr: mem_addr, source })?;
        }

        // write back
        if d.icode == Icode::Opl {
            cpu.cc = out.cc;
        }
        if let Some(r) = Self::dst_e(&d, cnd) {
            cpu.set_reg(r, val_e);
        }
        if let Some(r) = Self::dst_m(&d) {
            cpu.set_reg(r, val_m);
        }

        // PC update
        cpu.pc = match d.icode {
            Icode::Call => d.valc,
            Icode::Jxx if cnd => d.valc,
            Icode::Ret => val_m,
            _ => val_p,
        };
        Ok(())
    }
}

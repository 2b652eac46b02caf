use crate::decoder::Decoded;
use crate::instructions::{mnemonic_of, Icode};
use crate::regs::RegId;

fn reg(id: u8) -> String {
    match RegId::from_id(id) {
        Some(r) => r.name().to_string(),
        None => format!("%r{id:x}"),
    }
}

fn mem(valc: u32, base: u8) -> String {
    format!("{}({})", valc as i32, reg(base))
}

/// Renders a decoded instruction in assembler syntax.
pub fn fmt_decoded(d: &Decoded) -> String {
    let mn = mnemonic_of(d.icode, d.ifun).unwrap_or("???");
    match d.icode {
        Icode::Halt | Icode::Nop | Icode::Ret => mn.to_string(),
        Icode::Rrmovl | Icode::Opl => format!("{mn} {}, {}", reg(d.ra), reg(d.rb)),
        Icode::Irmovl => format!("{mn} ${}, {}", d.valc as i32, reg(d.rb)),
        Icode::Rmmovl => format!("{mn} {}, {}", reg(d.ra), mem(d.valc, d.rb)),
        Icode::Mrmovl => format!("{mn} {}, {}", mem(d.valc, d.rb), reg(d.ra)),
        Icode::Jxx | Icode::Call => format!("{mn} {:#x}", d.valc),
        Icode::Pushl | Icode::Popl => format!("{mn} {}", reg(d.ra)),
    }
}

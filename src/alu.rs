use serde::{Deserialize, Serialize};

use crate::cpu::Cc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum AluOp {
    Add = 0,
    Sub = 1,
    And = 2,
    Xor = 3,
}

impl AluOp {
    pub fn from_ifun(ifun: u8) -> Option<Self> {
        match ifun {
            0 => Some(AluOp::Add),
            1 => Some(AluOp::Sub),
            2 => Some(AluOp::And),
            3 => Some(AluOp::Xor),
            _ => None,
        }
    }
}

/// Branch / conditional-move condition, the ifun of `jXX` and `cmovXX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cond {
    Always = 0,
    Le = 1,
    L = 2,
    E = 3,
    Ne = 4,
    Ge = 5,
    G = 6,
}

impl Cond {
    pub fn from_ifun(ifun: u8) -> Option<Self> {
        match ifun {
            0 => Some(Cond::Always),
            1 => Some(Cond::Le),
            2 => Some(Cond::L),
            3 => Some(Cond::E),
            4 => Some(Cond::Ne),
            5 => Some(Cond::Ge),
            6 => Some(Cond::G),
            _ => None,
        }
    }

    pub fn holds(self, cc: Cc) -> bool {
        let zf = cc.contains(Cc::ZF);
        let less = cc.contains(Cc::SF) != cc.contains(Cc::OF);
        match self {
            Cond::Always => true,
            Cond::Le => less || zf,
            Cond::L => less,
            Cond::E => zf,
            Cond::Ne => !zf,
            Cond::Ge => !less,
            Cond::G => !less && !zf,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluOut {
    pub val: u32,
    pub cc: Cc,
}

/// Computes `b OP a`. Operand order matters for `Sub`: the result is `b - a`.
pub fn alu(op: AluOp, a: u32, b: u32) -> AluOut {
    let (sa, sb) = (a as i32, b as i32);
    let (val, of) = match op {
        AluOp::Add => {
            let (r, of) = sb.overflowing_add(sa);
            (r as u32, of)
        }
        AluOp::Sub => {
            let (r, of) = sb.overflowing_sub(sa);
            (r as u32, of)
        }
        AluOp::And => (b & a, false),
        AluOp::Xor => (b ^ a, false),
    };
    let mut cc = Cc::empty();
    cc.set(Cc::ZF, val == 0);
    cc.set(Cc::SF, (val as i32) < 0);
    cc.set(Cc::OF, of);
    AluOut { val, cc }
}

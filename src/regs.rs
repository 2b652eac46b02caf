use serde::{Deserialize, Serialize};

/// Register ID meaning "no register" in a packed register byte.
pub const R_NONE: u8 = 0xF;
/// Register ID reserved as an error marker; never real storage.
pub const R_INVALID: u8 = 0xE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RegId {
    Eax = 0,
    Ecx = 1,
    Edx = 2,
    Ebx = 3,
    Esp = 4,
    Ebp = 5,
    Esi = 6,
    Edi = 7,
}

const NAMES: [(&str, RegId); 8] = [
    ("%eax", RegId::Eax),
    ("%ecx", RegId::Ecx),
    ("%edx", RegId::Edx),
    ("%ebx", RegId::Ebx),
    ("%esp", RegId::Esp),
    ("%ebp", RegId::Ebp),
    ("%esi", RegId::Esi),
    ("%edi", RegId::Edi),
];

impl RegId {
    pub const ALL: [RegId; 8] = [
        RegId::Eax,
        RegId::Ecx,
        RegId::Edx,
        RegId::Ebx,
        RegId::Esp,
        RegId::Ebp,
        RegId::Esi,
        RegId::Edi,
    ];

    /// Parses `%name`; the leading `%` is required.
    pub fn parse(name: &str) -> Option<Self> {
        NAMES.iter().find(|(n, _)| *n == name).map(|(_, r)| *r)
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn name(self) -> &'static str {
        NAMES[self as usize].0
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

pub fn pack(ra: u8, rb: u8) -> u8 {
    ((ra & 0xF) << 4) | (rb & 0xF)
}

pub fn unpack(byte: u8) -> (u8, u8) {
    (byte >> 4, byte & 0xF)
}

/// Coarse classification of assembly errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown mnemonic, register or directive.
    Lexical,
    /// Wrong operand count or malformed operand.
    Syntax,
    /// Duplicate or undefined symbol.
    Symbol,
    /// Emission past the image capacity.
    Capacity,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("unknown instruction `{0}`")]
    UnknownMnemonic(String),
    #[error("unknown register `{0}`")]
    UnknownRegister(String),
    #[error("unknown directive `{0}`")]
    UnknownDirective(String),
    #[error("`{mnemonic}` takes {expected} operand(s), found {found}")]
    OperandCount {
        mnemonic: String,
        expected: usize,
        found: usize,
    },
    #[error("wrong memory access syntax `{0}`")]
    BadMemory(String),
    #[error("bad number `{0}`")]
    BadNumber(String),
    #[error("empty label")]
    EmptyLabel,
    #[error(".align needs a non-zero alignment")]
    ZeroAlign,
    #[error("duplicate symbol `{0}`")]
    DuplicateSymbol(String),
    #[error("undefined symbol `{0}`")]
    UndefinedSymbol(String),
    #[error("{len} byte(s) at offset {offset:#x} exceed image capacity of {capacity} bytes")]
    Overflow {
        offset: u32,
        len: u32,
        capacity: usize,
    },
}

impl AsmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AsmError::UnknownMnemonic(_)
            | AsmError::UnknownRegister(_)
            | AsmError::UnknownDirective(_) => ErrorKind::Lexical,
            AsmError::OperandCount { .. }
            | AsmError::BadMemory(_)
            | AsmError::BadNumber(_)
            | AsmError::EmptyLabel
            | AsmError::ZeroAlign => ErrorKind::Syntax,
            AsmError::DuplicateSymbol(_) | AsmError::UndefinedSymbol(_) => ErrorKind::Symbol,
            AsmError::Overflow { .. } => ErrorKind::Capacity,
        }
    }
}

/// An [`AsmError`] tied to the 1-based source line it came from.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {source}")]
pub struct LineError {
    pub line: usize,
    #[source]
    pub source: AsmError,
}

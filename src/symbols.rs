//! Labels and forward-reference patching.
//!
//! A symbol is created the first time it is either defined or used. Uses
//! before the definition are remembered as [`Patch`] locations and all of
//! them are written the moment the symbol gets its value.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::AsmError;
use crate::image::Image;

/// An image offset waiting for a symbol's value, plus the source line that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    pub offset: u32,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Unresolved(Vec<Patch>),
    Resolved(u32),
}

#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    symbols: BTreeMap<String, State>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives `name` its value and fills every pending patch with it.
    pub fn define(&mut self, name: &str, value: u32, image: &mut Image) -> Result<(), AsmError> {
        if let Some(State::Resolved(_)) = self.symbols.get(name) {
            return Err(AsmError::DuplicateSymbol(name.to_string()));
        }
        let prev = self.symbols.insert(name.to_string(), State::Resolved(value));
        if let Some(State::Unresolved(pending)) = prev {
            for p in &pending {
                image.patch_u32(p.offset, value);
            }
            debug!(symbol = name, value, patched = pending.len(), "resolved forward references");
        } else {
            debug!(symbol = name, value, "defined");
        }
        Ok(())
    }

    /// Writes the value of `name` at `at` now if it is known, otherwise
    /// queues `at` until [`Self::define`] is called for `name`.
    pub fn resolve_or_defer(&mut self, name: &str, at: Patch, image: &mut Image) {
        match self.symbols.get_mut(name) {
            Some(State::Resolved(v)) => image.patch_u32(at.offset, *v),
            Some(State::Unresolved(pending)) => pending.push(at),
            None => {
                self.symbols
                    .insert(name.to_string(), State::Unresolved(vec![at]));
            }
        }
    }

    pub fn value(&self, name: &str) -> Option<u32> {
        match self.symbols.get(name) {
            Some(State::Resolved(v)) => Some(*v),
            _ => None,
        }
    }

    /// Resolved symbols in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.symbols.iter().filter_map(|(k, s)| match s {
            State::Resolved(v) => Some((k.as_str(), *v)),
            State::Unresolved(_) => None,
        })
    }

    /// Symbols that were used but never defined, with their pending patches.
    pub fn unresolved(&self) -> Vec<(&str, &[Patch])> {
        self.symbols
            .iter()
            .filter_map(|(k, s)| match s {
                State::Unresolved(p) => Some((k.as_str(), p.as_slice())),
                State::Resolved(_) => None,
            })
            .collect()
    }
}

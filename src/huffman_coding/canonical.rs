//! Code length tables and canonical code assignment.
//!
//! Codes of equal length are consecutive integers in ascending symbol order, and every code of
//! length L, shifted left to a common width, sorts before every code longer than L. Because of
//! that, the code table can be rebuilt from the lengths alone.

use crate::{MAX_CODE_LEN, SYMBOLS};

/// A symbol with its code length, as listed in canonical order on the decode side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CodeSymbol {
    pub symbol: u8,
    pub length: u8,
}

/// Code length per symbol, 0 meaning unused, plus the summary values derived from it.
#[derive(Clone, Debug)]
pub struct CodeLengths {
    pub lengths: [u8; SYMBOLS],
    /// Count of symbols per code length. Index 0 is never counted.
    pub counts: [u32; 16],
    pub max_length: u32,
    pub max_symbol: u8,
    pub symbol_count: usize,
}

impl Default for CodeLengths {
    fn default() -> Self {
        Self {
            lengths: [0; SYMBOLS],
            counts: [0; 16],
            max_length: 0,
            max_symbol: 0,
            symbol_count: 0,
        }
    }
}

impl CodeLengths {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Recompute `counts`, `symbol_count` and `max_symbol` from `lengths`.
    pub fn tally(&mut self) {
        self.counts = [0; 16];
        self.symbol_count = 0;
        self.max_symbol = 0;
        for (symbol, &len) in self.lengths.iter().enumerate() {
            if len > 0 {
                self.counts[len as usize] += 1;
                self.symbol_count += 1;
                self.max_symbol = symbol as u8;
            }
        }
    }

    /// True when the lengths fit `max_length` and fill the code space exactly
    /// (Kraft sum of one).
    pub fn is_complete(&self) -> bool {
        if self.max_length == 0 || self.max_length as usize > MAX_CODE_LEN {
            return false;
        }
        if self.counts[self.max_length as usize + 1..].iter().any(|&c| c > 0) {
            return false;
        }
        let space: u64 = (1..=self.max_length)
            .map(|len| (self.counts[len as usize] as u64) << (self.max_length - len))
            .sum();
        space == 1 << self.max_length
    }

    /// Assign canonical codes. Unused symbols keep code 0.
    pub fn assign_codes(&self, codes: &mut [u32; SYMBOLS]) {
        let mut next_code = [0_u32; 16];
        for len in 2..=self.max_length as usize {
            next_code[len] = (next_code[len - 1] + self.counts[len - 1]) << 1;
        }

        codes.iter_mut().for_each(|c| *c = 0);
        for symbol in 0..=self.max_symbol as usize {
            let len = self.lengths[symbol] as usize;
            if len > 0 {
                codes[symbol] = next_code[len];
                next_code[len] += 1;
            }
        }
    }

    /// List the used symbols in canonical order: by length, then by symbol value.
    pub fn canonical_symbols(&self, out: &mut Vec<CodeSymbol>) {
        out.clear();
        for len in 1..=self.max_length as u8 {
            for symbol in 0..=self.max_symbol as usize {
                if self.lengths[symbol] == len {
                    out.push(CodeSymbol {
                        symbol: symbol as u8,
                        length: len,
                    });
                }
            }
        }
    }
}

//! The fast decode table.
//!
//! Indexed by the next `max_length` bits of a stream. Each slot holds the longest run of up to
//! three whole codes that fit in those bits, so one probe can produce three bytes.

use super::canonical::CodeSymbol;
use crate::error::Result;
use crate::tools::scratch::try_vec;
use crate::TABLE_SIZE;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeEntry {
    /// Decoded bytes. Only the first `count` are meaningful.
    pub symbols: [u8; 3],
    pub count: u8,
    /// Bits used by all `count` codes together.
    pub length: u8,
}

pub struct DecodeTable {
    entries: Vec<DecodeEntry>,
}

impl DecodeTable {
    pub fn new() -> Result<Self> {
        Ok(Self {
            entries: try_vec(TABLE_SIZE, DecodeEntry::default())?,
        })
    }

    /// Rebuild the first `1 << max_length` slots. `symbols` must be in canonical order and
    /// form a complete code of at most `max_length` bits.
    pub fn fill(&mut self, symbols: &[CodeSymbol], max_length: u32) {
        let max = max_length as u8;
        let mut pos = 0;
        for first in symbols {
            let mut entry = DecodeEntry {
                symbols: [first.symbol, 0, 0],
                count: 1,
                length: first.length,
            };
            let first_end = pos + (1 << (max - first.length));
            for second in symbols {
                let two = first.length + second.length;
                if two > max {
                    break;
                }
                entry.symbols[1] = second.symbol;
                let second_end = pos + (1 << (max - two));
                for third in symbols {
                    let three = two + third.length;
                    if three > max {
                        break;
                    }
                    entry.symbols[2] = third.symbol;
                    let end = pos + (1 << (max - three));
                    self.put(pos, end, entry, 3, three);
                    pos = end;
                }
                self.put(pos, second_end, entry, 2, two);
                pos = second_end;
            }
            self.put(pos, first_end, entry, 1, first.length);
            pos = first_end;
        }
    }

    #[inline(always)]
    fn put(&mut self, from: usize, to: usize, mut entry: DecodeEntry, count: u8, length: u8) {
        entry.count = count;
        entry.length = length;
        self.entries[from..to].fill(entry);
    }

    #[inline(always)]
    pub fn lookup(&self, window: usize) -> DecodeEntry {
        self.entries[window]
    }
}

//! Orders the symbols of a block by count for the tree builder.
//!
//! Two phases: every symbol lands in one of 32 buckets picked by the bit width of its count
//! (leading zeros), then each bucket is put in exact order by insertion. Counts inside one
//! bucket are within a factor of two of each other, so the insertion pass stays near linear.
//!
//! The result is ordered by DESCENDING count, ties kept in encounter order. The tree builder
//! walks it from the back, which yields the symbols in ascending frequency order.

use super::freq_count::SymbolCount;

/// Sort `freqs` (nonzero counts, ascending symbol order) into `sorted[..freqs.len()]`.
pub fn sort_symbols(freqs: &[SymbolCount], sorted: &mut [SymbolCount]) {
    let mut weights = [0_u8; 256];
    let mut counts = [0_u16; 32];

    for (weight, sym) in weights.iter_mut().zip(freqs) {
        *weight = sym.count.leading_zeros() as u8;
        counts[*weight as usize] += 1;
    }

    // Prefix sums: offset[w] is where bucket w starts, next[w] where its next entry goes.
    let mut offset = [0_u16; 32];
    for w in 1..32 {
        offset[w] = offset[w - 1] + counts[w - 1];
    }
    let mut next = offset;

    for (i, sym) in freqs.iter().enumerate() {
        let weight = weights[i] as usize;
        let start = offset[weight] as usize;
        let mut j = next[weight] as usize;
        next[weight] += 1;
        while j > start && sym.count > sorted[j - 1].count {
            sorted[j] = sorted[j - 1];
            j -= 1;
        }
        sorted[j] = *sym;
    }
}

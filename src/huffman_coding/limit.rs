//! Rebalances clamped code lengths into a valid prefix code of at most 12 bits.
//!
//! Each step takes one code from the deepest length below 12 that still has codes, splits it
//! into two codes one bit longer and drops one code from the 12 bit bucket. The code count is
//! unchanged and the Kraft sum falls by 2^-12, which pays back exactly one overflow pair.
//! This is not an optimal package-merge: the bucket shifting is kept as is so encoded blocks
//! stay identical.

use super::canonical::CodeLengths;
use crate::tools::freq_count::SymbolCount;
use crate::MAX_CODE_LEN;

/// Fix `lengths` after tree construction reported `overflow`. `sorted` is the same symbol
/// order the tree was built from; lengths are handed out along it, shortest first.
pub fn limit_lengths(sorted: &[SymbolCount], lengths: &mut CodeLengths, mut overflow: u32) {
    if overflow == 0 {
        return;
    }
    lengths.max_length = MAX_CODE_LEN as u32;

    let counts = &mut lengths.counts;
    while overflow > 0 {
        let mut len = MAX_CODE_LEN - 1;
        while counts[len] == 0 {
            len -= 1;
        }
        counts[len] -= 1;
        counts[len + 1] += 2;
        counts[MAX_CODE_LEN] -= 1;
        overflow = overflow.saturating_sub(2);
    }

    let mut syms = sorted.iter();
    for len in 1..=MAX_CODE_LEN {
        for sym in syms.by_ref().take(counts[len] as usize) {
            lengths.lengths[sym.symbol as usize] = len as u8;
        }
    }
}

#[cfg(test)]
mod test {
    use super::limit_lengths;
    use crate::huffman_coding::canonical::CodeLengths;
    use crate::huffman_coding::huffman_code_from_weights::TreeArena;
    use crate::tools::freq_count::SymbolCount;
    use crate::tools::symbol_sort::sort_symbols;

    fn limited(counts: &[u32]) -> CodeLengths {
        let freqs: Vec<SymbolCount> = counts
            .iter()
            .enumerate()
            .map(|(i, &count)| SymbolCount { count, symbol: i as u8 })
            .collect();
        let mut sorted = vec![SymbolCount::default(); freqs.len()];
        sort_symbols(&freqs, &mut sorted);
        let mut arena = TreeArena::new().unwrap();
        let mut lengths = CodeLengths::default();
        let max_symbol = (counts.len() - 1) as u8;
        let overflow = arena.code_lengths(&sorted, max_symbol, &mut lengths);
        limit_lengths(&sorted, &mut lengths, overflow);
        lengths
    }

    #[test]
    fn no_overflow_is_untouched_test() {
        let lengths = limited(&[10, 10, 10, 10]);
        assert!(lengths.lengths[..4].iter().all(|&l| l == 2));
        assert_eq!(lengths.max_length, 2);
    }

    #[test]
    fn fibonacci_is_limited_test() {
        let mut fib = vec![1_u32, 1];
        while fib.len() < 30 {
            let next = fib[fib.len() - 1] + fib[fib.len() - 2];
            fib.push(next);
        }
        let lengths = limited(&fib);
        assert_eq!(lengths.max_length, 12);
        assert!(lengths.lengths[..30].iter().all(|&l| (1..=12).contains(&l)));
        assert!(lengths.is_complete());
        // More frequent symbols never get longer codes.
        for i in 1..30 {
            assert!(lengths.lengths[i] <= lengths.lengths[i - 1]);
        }
    }

    #[test]
    fn skewed_full_alphabet_test() {
        let counts: Vec<u32> = (0..256).map(|i| if i < 8 { 1 << (20 - i) } else { 1 }).collect();
        let lengths = limited(&counts);
        assert!(lengths.is_complete());
        assert!(lengths.lengths.iter().all(|&l| (1..=12).contains(&l)));
    }
}

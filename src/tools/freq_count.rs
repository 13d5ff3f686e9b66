use crate::error::Result;
use crate::tools::scratch::try_vec;
use crate::SYMBOLS;

/// A byte value with its occurrence count (encode side).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SymbolCount {
    pub count: u32,
    pub symbol: u8,
}

/// One counting lane, kept on its own cache lines.
#[derive(Clone, Copy)]
#[repr(C, align(64))]
pub struct Lane([u32; SYMBOLS]);

/// Output of the frequency analysis of one block.
#[derive(Debug)]
pub struct Frequencies {
    /// Symbols with a nonzero count, ascending by symbol value.
    pub symbols: Vec<SymbolCount>,
    /// Highest symbol value present.
    pub max_symbol: u8,
    /// Bitwise OR of all counts. An upper bound of the largest count, never below it.
    pub max_count: u32,
}

impl Frequencies {
    pub fn new() -> Result<Self> {
        let mut symbols = try_vec(SYMBOLS, SymbolCount::default())?;
        symbols.clear();
        Ok(Self {
            symbols,
            max_symbol: 0,
            max_count: 0,
        })
    }

    /// Count of distinct symbols present.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

/// The four counting lanes, allocated once per encoder.
pub struct FreqCounter {
    lanes: Vec<Lane>,
}

impl FreqCounter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            lanes: try_vec(4, Lane([0; SYMBOLS]))?,
        })
    }

    /// Count every byte of `data` into `freqs`. Each byte of a four byte group goes to its own
    /// lane so consecutive increments never hit the same counter, then the lanes are summed.
    pub fn count(&mut self, data: &[u8], freqs: &mut Frequencies) {
        self.lanes.iter_mut().for_each(|lane| lane.0 = [0; SYMBOLS]);

        let (lane0, rest) = self.lanes.split_at_mut(1);
        let (lane1, rest) = rest.split_at_mut(1);
        let (lane2, lane3) = rest.split_at_mut(1);
        let (c0, c1, c2, c3) = (&mut lane0[0].0, &mut lane1[0].0, &mut lane2[0].0, &mut lane3[0].0);

        let mut quads = data.chunks_exact(4);
        for quad in &mut quads {
            c0[quad[0] as usize] += 1;
            c1[quad[1] as usize] += 1;
            c2[quad[2] as usize] += 1;
            c3[quad[3] as usize] += 1;
        }
        quads.remainder().iter().for_each(|&b| c0[b as usize] += 1);

        freqs.symbols.clear();
        freqs.max_count = 0;
        for symbol in 0..SYMBOLS {
            let count = c0[symbol] + c1[symbol] + c2[symbol] + c3[symbol];
            freqs.max_count |= count;
            if count > 0 {
                freqs.symbols.push(SymbolCount {
                    count,
                    symbol: symbol as u8,
                });
            }
        }
        freqs.max_symbol = freqs.symbols.last().map_or(0, |s| s.symbol);
    }
}

#[cfg(test)]
mod test {
    use super::{FreqCounter, Frequencies, SymbolCount};

    #[test]
    fn count_test() {
        let mut counter = FreqCounter::new().unwrap();
        let mut freqs = Frequencies::new().unwrap();
        counter.count(b"abracadabra", &mut freqs);
        assert_eq!(freqs.symbol_count(), 5);
        assert_eq!(freqs.symbols[0], SymbolCount { count: 5, symbol: b'a' });
        assert_eq!(freqs.symbols[4], SymbolCount { count: 2, symbol: b'r' });
        assert_eq!(freqs.max_symbol, b'r');
        // 5 | 2 | 1 | 1 | 2
        assert_eq!(freqs.max_count, 7);
    }

    #[test]
    fn lanes_are_reset_between_calls_test() {
        let mut counter = FreqCounter::new().unwrap();
        let mut freqs = Frequencies::new().unwrap();
        counter.count(&[9_u8; 1000], &mut freqs);
        counter.count(&[1, 2, 3], &mut freqs);
        assert_eq!(freqs.symbol_count(), 3);
        assert!(freqs.symbols.iter().all(|s| s.count == 1));
        assert_eq!(freqs.max_symbol, 3);
    }

    #[test]
    fn all_symbols_test() {
        let data: Vec<u8> = (0..=255).cycle().take(256 * 3 + 2).collect();
        let mut counter = FreqCounter::new().unwrap();
        let mut freqs = Frequencies::new().unwrap();
        counter.count(&data, &mut freqs);
        assert_eq!(freqs.symbol_count(), 256);
        assert_eq!(freqs.symbols[0].count, 4);
        assert_eq!(freqs.symbols[1].count, 4);
        assert_eq!(freqs.symbols[2].count, 3);
        assert_eq!(freqs.max_symbol, 255);
    }
}

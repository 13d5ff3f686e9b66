use log::{debug, trace};

use super::compress_block::{coded_bits, encode_data, part_bounds, stream_size, CodeBook};
use super::tag::{ContentKind, Tag};
use super::StreamFormat;
use crate::bitstream::put_u32;
use crate::error::{Error, Result};
use crate::huffman_coding::canonical::CodeLengths;
use crate::huffman_coding::header::{dense_cost, encode_header, sparse_cost};
use crate::huffman_coding::huffman_code_from_weights::TreeArena;
use crate::huffman_coding::limit::limit_lengths;
use crate::tools::freq_count::{FreqCounter, Frequencies, SymbolCount};
use crate::tools::scratch::try_vec;
use crate::tools::symbol_sort::sort_symbols;
use crate::{MAX_BLOCK_SIZE, MAX_HEADER_SIZE, MEM_OVERRUN, MIN_HEADER_SIZE, SYMBOLS};

/// Size of a literal block holding `len` bytes.
const fn literal_size(len: usize) -> usize {
    1 + 4 + len
}

/// Output capacity that is always enough to encode an input of `len` bytes.
pub fn compressed_size(len: usize) -> usize {
    len.saturating_add(MAX_HEADER_SIZE + MEM_OVERRUN)
}

/// Block encoder. Holds all scratch tables, so it is allocated once and reused for any number
/// of blocks. One encoder serves one call at a time.
pub struct Encoder {
    format: StreamFormat,
    counter: FreqCounter,
    freqs: Frequencies,
    sorted: Vec<SymbolCount>,
    arena: TreeArena,
    lengths: CodeLengths,
    codes: [u32; SYMBOLS],
}

impl Encoder {
    pub fn new(format: StreamFormat) -> Result<Self> {
        Ok(Self {
            format,
            counter: FreqCounter::new()?,
            freqs: Frequencies::new()?,
            sorted: try_vec(SYMBOLS, SymbolCount::default())?,
            arena: TreeArena::new()?,
            lengths: CodeLengths::default(),
            codes: [0; SYMBOLS],
        })
    }

    /// Encode `input` as one block into `output`, returning the number of bytes written.
    ///
    /// An output of [`compressed_size`] bytes always suffices. A smaller output may still
    /// work; if the block does not fit, the call fails with [`Error::OutputOverflow`].
    pub fn encode(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        if input.is_empty() {
            return Err(Error::InvalidArgument("empty input"));
        }
        if input.len() > MAX_BLOCK_SIZE {
            return Err(Error::InvalidArgument("input exceeds the maximum block size"));
        }
        if output.len() < MIN_HEADER_SIZE {
            return Err(Error::InvalidArgument("output capacity below the minimum header size"));
        }

        self.counter.count(input, &mut self.freqs);
        let symbol_count = self.freqs.symbol_count();
        trace!(
            "\nBlock of {} bytes: {} symbols, max count estimate {}",
            input.len(),
            symbol_count,
            self.freqs.max_count
        );

        if symbol_count == 1 {
            debug!("Run-length block: {} x {:#04x}", input.len(), input[0]);
            return encode_run(input, output);
        }
        if self.freqs.max_count as usize <= input.len() >> 7 {
            debug!("Near uniform distribution, literal block of {} bytes", input.len());
            return encode_literals(input, output);
        }

        let sorted = &mut self.sorted[..symbol_count];
        sort_symbols(&self.freqs.symbols, sorted);
        let overflow = self.arena.code_lengths(sorted, self.freqs.max_symbol, &mut self.lengths);
        limit_lengths(sorted, &mut self.lengths, overflow);

        let huffman_size = self.huffman_size(input);
        if huffman_size >= literal_size(input.len()) {
            debug!(
                "Huffman block would take {} bytes, literal block of {} bytes instead",
                huffman_size,
                input.len()
            );
            return encode_literals(input, output);
        }
        if huffman_size > output.len() {
            return Err(Error::overflow(huffman_size, output.len()));
        }

        self.lengths.assign_codes(&mut self.codes);
        let pos = encode_header(&self.lengths, self.format, output)?;
        let book = CodeBook {
            codes: &self.codes,
            lengths: &self.lengths.lengths,
        };
        let end = encode_data(book, self.format, input, output, pos)?;
        debug!(
            "Huffman block: {} -> {} bytes, max code length {}, header {} bytes",
            input.len(),
            end,
            self.lengths.max_length,
            pos
        );
        Ok(end)
    }

    /// Exact size of the Huffman coded block for the current code lengths.
    fn huffman_size(&self, input: &[u8]) -> usize {
        let lengths = &self.lengths.lengths;
        let bits: u64 = self
            .freqs
            .symbols
            .iter()
            .map(|s| s.count as u64 * lengths[s.symbol as usize] as u64)
            .sum();
        let header = dense_cost(&self.lengths).min(sparse_cost(&self.lengths));
        match self.format {
            StreamFormat::Single => header + 4 + stream_size(bits),
            StreamFormat::Multi => {
                // Each stream rounds up on its own, so the first three are measured and the
                // fourth gets the remaining bits.
                let (_, bounds) = part_bounds(input.len());
                let mut rest = bits;
                let mut data = 0;
                for i in 0..3 {
                    let part_bits = coded_bits(lengths, &input[bounds[i]..bounds[i + 1]]);
                    rest -= part_bits;
                    data += stream_size(part_bits);
                }
                header + 20 + data + stream_size(rest)
            }
        }
    }
}

fn encode_run(input: &[u8], output: &mut [u8]) -> Result<usize> {
    output[0] = Tag::plain(ContentKind::RunLength).to_byte();
    output[1] = input[0];
    put_u32(output, 2, input.len() as u32)
}

fn encode_literals(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let size = literal_size(input.len());
    if size > output.len() {
        return Err(Error::overflow(size, output.len()));
    }
    output[0] = Tag::plain(ContentKind::Literal).to_byte();
    let pos = put_u32(output, 1, input.len() as u32)?;
    output[pos..size].copy_from_slice(input);
    Ok(size)
}

#[cfg(test)]
mod test {
    use super::{compressed_size, Encoder};
    use crate::compression::StreamFormat;
    use crate::Error;

    #[test]
    fn compressed_size_test() {
        assert_eq!(compressed_size(0), 297);
        assert_eq!(compressed_size(1000), 1297);
        assert_eq!(compressed_size(usize::MAX - 10), usize::MAX);
    }

    #[test]
    fn run_length_test() {
        let mut encoder = Encoder::new(StreamFormat::Single).unwrap();
        let mut out = [0_u8; 8];
        assert_eq!(encoder.encode(&[0x41; 10000], &mut out), Ok(6));
        assert_eq!(&out[..6], &[0x40, 0x41, 0x10, 0x27, 0, 0]);
    }

    #[test]
    fn literal_fallback_test() {
        // Every byte value 16 times: max count 16 <= 4096 / 128.
        let input: Vec<u8> = (0..4096).map(|i| (i * 7) as u8).collect();
        let mut encoder = Encoder::new(StreamFormat::Multi).unwrap();
        let mut out = vec![0_u8; compressed_size(input.len())];
        assert_eq!(encoder.encode(&input, &mut out), Ok(4101));
        assert_eq!(&out[..5], &[0x00, 0x00, 0x10, 0, 0]);
        assert_eq!(&out[5..4101], &input[..]);

        let mut small = vec![0_u8; 4100];
        assert_eq!(encoder.encode(&input, &mut small), Err(Error::overflow(4101, 4100)));
    }

    #[test]
    fn tiny_huffman_falls_back_test() {
        // Two bytes can never beat the literal block.
        let mut encoder = Encoder::new(StreamFormat::Single).unwrap();
        let mut out = [0_u8; 16];
        assert_eq!(encoder.encode(b"ab", &mut out), Ok(7));
        assert_eq!(out[0], 0x00);
    }

    #[test]
    fn huffman_block_test() {
        let input = b"aaaaaaaabbbbccdd".repeat(8);
        let mut encoder = Encoder::new(StreamFormat::Single).unwrap();
        let mut out = vec![0_u8; compressed_size(input.len())];
        let used = encoder.encode(&input, &mut out).unwrap();
        // a = 1 bit, b = 2 bits, c and d = 3 bits: 8 + 8 + 6 + 6 = 28 bits per repeat.
        // Sparse header (1 + 3 + 4) plus 4 byte size, 28 data bytes and the trailer.
        assert_eq!(out[0], 0b11_00_0011);
        assert_eq!(used, 8 + 4 + 28 + 1);
        assert_eq!(&out[1..8], &[1, 1, 2, b'a', b'b', b'c', b'd']);
    }

    #[test]
    fn dense_header_test() {
        // Counts 64, 32, 16, 16 for bytes 0..=3: lengths 1, 2, 3, 3 and 224 data bits.
        let input = b"\x00\x00\x00\x00\x01\x01\x02\x03".repeat(16);
        let mut encoder = Encoder::new(StreamFormat::Single).unwrap();
        let mut out = vec![0_u8; compressed_size(input.len())];
        // Dense header (2 + 2) plus 4 byte size, 28 data bytes and the trailer.
        assert_eq!(encoder.encode(&input, &mut out), Ok(4 + 4 + 28 + 1));
        assert_eq!(&out[..4], &[0b10_00_0011, 3, 0x12, 0x33]);
    }

    #[test]
    fn multi_exact_capacity_test() {
        // Four parts of 32 bytes, each "aaaaaaaabbbbccdd" twice: 56 bits, 7 bytes plus trailer.
        let input = b"aaaaaaaabbbbccdd".repeat(8);
        let mut encoder = Encoder::new(StreamFormat::Multi).unwrap();
        let mut out = vec![0_u8; compressed_size(input.len())];
        let used = encoder.encode(&input, &mut out).unwrap();
        assert_eq!(used, 8 + 20 + 4 * 8);
        let mut exact = vec![0_u8; used];
        assert_eq!(encoder.encode(&input, &mut exact), Ok(used));
        assert_eq!(&exact[..], &out[..used]);
        let mut short = vec![0_u8; used - 1];
        assert_eq!(encoder.encode(&input, &mut short), Err(Error::overflow(used, used - 1)));
    }

    #[test]
    fn argument_checks_test() {
        let mut encoder = Encoder::new(StreamFormat::Single).unwrap();
        let mut out = [0_u8; 5];
        assert!(matches!(encoder.encode(b"abc", &mut out), Err(Error::InvalidArgument(_))));
        let mut out = [0_u8; 64];
        assert!(matches!(encoder.encode(b"", &mut out), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn huffman_overflow_test() {
        let input = b"aaaaaaaabbbbccdd".repeat(8);
        let mut encoder = Encoder::new(StreamFormat::Single).unwrap();
        let mut out = [0_u8; 30];
        assert_eq!(encoder.encode(&input, &mut out), Err(Error::overflow(41, 30)));
    }
}

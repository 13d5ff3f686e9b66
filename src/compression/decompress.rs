use log::{debug, trace};
use rayon::prelude::*;

use super::compress_block::split_points;
use super::tag::{ContentKind, Tag};
use super::StreamFormat;
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::get_u32;
use crate::error::{Error, Result};
use crate::huffman_coding::canonical::{CodeLengths, CodeSymbol};
use crate::huffman_coding::decode_table::DecodeTable;
use crate::huffman_coding::header::{decode_dense, decode_sparse};
use crate::tools::scratch::try_vec;
use crate::{MAX_CODE_LEN, MIN_HEADER_SIZE, SYMBOLS};

/// Block decoder. Like the encoder it owns its scratch tables and is reused across calls.
pub struct Decoder {
    table: DecodeTable,
    lengths: CodeLengths,
    symbols: Vec<CodeSymbol>,
    parallel: bool,
}

impl Decoder {
    pub fn new() -> Result<Self> {
        let mut symbols = try_vec(SYMBOLS, CodeSymbol::default())?;
        symbols.clear();
        Ok(Self {
            table: DecodeTable::new()?,
            lengths: CodeLengths::default(),
            symbols,
            parallel: false,
        })
    }

    /// Decode the four streams of a multi layout block on the rayon pool. The output is the
    /// same as with sequential decoding.
    pub fn with_parallel_streams(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Decode one block from `input` into `output`, returning the number of bytes produced.
    ///
    /// `output.len()` is the largest block accepted. Huffman coded streams are decoded until
    /// they run out, so a larger output than needed is fine.
    pub fn decode(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        if input.len() < MIN_HEADER_SIZE {
            return Err(Error::InvalidArgument("input shorter than the minimum header size"));
        }
        if output.is_empty() {
            return Err(Error::InvalidArgument("zero output capacity"));
        }

        let tag = Tag::parse(input[0])?;
        trace!("\nBlock tag {:?}", tag);
        match tag.kind {
            ContentKind::Literal => decode_literals(input, output),
            ContentKind::RunLength => decode_run(input, output),
            ContentKind::DenseHeader | ContentKind::SparseHeader => {
                let max_length = tag.max_length as u32;
                if max_length == 0 || max_length as usize > MAX_CODE_LEN {
                    return Err(Error::CorruptStream("maximum code length out of range"));
                }
                let body = &input[1..];
                let used = if tag.kind == ContentKind::DenseHeader {
                    decode_dense(body, max_length, &mut self.lengths)?
                } else {
                    decode_sparse(body, max_length, &mut self.lengths)?
                };
                self.lengths.canonical_symbols(&mut self.symbols);
                self.table.fill(&self.symbols, max_length);
                debug!(
                    "Huffman block: {} symbols, max code length {}, {:?} layout",
                    self.lengths.symbol_count,
                    max_length,
                    tag.format
                );

                let data = &body[used..];
                match tag.format {
                    StreamFormat::Single => self.decode_single(data, output, max_length),
                    StreamFormat::Multi => self.decode_multi(data, output, max_length),
                }
            }
        }
    }

    fn decode_single(&self, data: &[u8], output: &mut [u8], max_length: u32) -> Result<usize> {
        let mut rest = data;
        let size = take_size(&mut rest, 1)?[0];
        let stream = take_stream(&mut rest, size)?;
        StreamCursor::new(stream, output)?.run(&self.table, &self.lengths.lengths, max_length)
    }

    fn decode_multi(&self, data: &[u8], output: &mut [u8], max_length: u32) -> Result<usize> {
        let mut rest = data;
        let fields = take_size(&mut rest, 5)?;
        let part = fields[0] as usize;
        if part == 0 {
            return Err(Error::CorruptStream("zero part size"));
        }
        // The smallest block with this part size.
        let required = part.saturating_mul(4) - 3;
        if required > output.len() {
            return Err(Error::overflow(required, output.len()));
        }

        let bounds = split_points(part, output.len());

        let (out1, out) = output.split_at_mut(bounds[1]);
        let (out2, out) = out.split_at_mut(bounds[2] - bounds[1]);
        let (out3, out4) = out.split_at_mut(bounds[3] - bounds[2]);
        let mut cursors = [
            StreamCursor::new(take_stream(&mut rest, fields[1])?, out1)?,
            StreamCursor::new(take_stream(&mut rest, fields[2])?, out2)?,
            StreamCursor::new(take_stream(&mut rest, fields[3])?, out3)?,
            StreamCursor::new(take_stream(&mut rest, fields[4])?, out4)?,
        ];

        let table = &self.table;
        let lengths = &self.lengths.lengths;
        if self.parallel {
            cursors
                .as_mut_slice()
                .par_iter_mut()
                .try_for_each(|cursor| cursor.run(table, lengths, max_length).map(drop))?;
        } else {
            // Walk the four streams in lock step while all of them are in the bulk phase.
            while cursors.iter_mut().all(|cursor| cursor.bulk_ready()) {
                for _ in 0..4 {
                    for cursor in cursors.iter_mut() {
                        cursor.probe(table, max_length);
                    }
                }
            }
            for cursor in cursors.iter_mut() {
                cursor.run(table, lengths, max_length)?;
            }
        }

        // Only the last stream holding data may come up short of a full part.
        let produced = cursors.map(|cursor| cursor.pos);
        for i in 0..3 {
            if produced[i] < part && produced[i + 1..].iter().any(|&n| n > 0) {
                return Err(Error::CorruptStream("stream ended before its part was complete"));
            }
        }
        Ok(produced.iter().sum())
    }
}

/// Read `count` little-endian size fields off the front of `input`.
fn take_size<'a>(input: &mut &'a [u8], count: usize) -> Result<[u32; 5]> {
    let whole: &'a [u8] = *input;
    let mut fields = [0; 5];
    for (i, field) in fields.iter_mut().take(count).enumerate() {
        *field = get_u32(whole, i * 4)?;
    }
    *input = &whole[count * 4..];
    Ok(fields)
}

fn take_stream<'a>(input: &mut &'a [u8], size: u32) -> Result<&'a [u8]> {
    let size = size as usize;
    if size > input.len() {
        return Err(Error::CorruptStream("stream length exceeds the input"));
    }
    let whole: &'a [u8] = *input;
    let (stream, rest) = whole.split_at(size);
    *input = rest;
    Ok(stream)
}

fn decode_literals(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let size = get_u32(input, 1)? as usize;
    if size > input.len() - 5 {
        return Err(Error::CorruptStream("literal length exceeds the input"));
    }
    if size > output.len() {
        return Err(Error::overflow(size, output.len()));
    }
    output[..size].copy_from_slice(&input[5..5 + size]);
    Ok(size)
}

fn decode_run(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let symbol = input[1];
    let size = get_u32(input, 2)? as usize;
    if size > output.len() {
        return Err(Error::overflow(size, output.len()));
    }
    output[..size].fill(symbol);
    Ok(size)
}

/// One bit stream and the output range it decodes into.
struct StreamCursor<'a> {
    reader: BitReader<'a>,
    out: &'a mut [u8],
    pos: usize,
}

impl<'a> StreamCursor<'a> {
    fn new(stream: &'a [u8], out: &'a mut [u8]) -> Result<Self> {
        Ok(Self {
            reader: BitReader::new(stream)?,
            out,
            pos: 0,
        })
    }

    /// Room for four full probes in the output and a full window in the input.
    #[inline(always)]
    fn bulk_ready(&mut self) -> bool {
        self.pos + 12 < self.out.len() && self.reader.refill_fast()
    }

    /// Decode up to three bytes with one table lookup. Needs three bytes of room.
    #[inline(always)]
    fn probe(&mut self, table: &DecodeTable, max_length: u32) {
        let entry = table.lookup(self.reader.peek(max_length));
        self.out[self.pos..self.pos + 3].copy_from_slice(&entry.symbols);
        self.reader.consume(entry.length as u32);
        self.pos += entry.count as usize;
    }

    /// Finish the stream: bulk probes, then single probes, then one byte at a time until the
    /// stream or the output runs out, then the end of stream check. Returns the bytes decoded.
    fn run(&mut self, table: &DecodeTable, lengths: &[u8; SYMBOLS], max_length: u32) -> Result<usize> {
        while self.bulk_ready() {
            for _ in 0..4 {
                self.probe(table, max_length);
            }
        }
        while self.pos + 3 < self.out.len() && self.reader.refill_fast() {
            self.probe(table, max_length);
        }
        while self.pos < self.out.len() && self.reader.refill(max_length) {
            let symbol = table.lookup(self.reader.peek(max_length)).symbols[0];
            self.out[self.pos] = symbol;
            self.reader.consume(lengths[symbol as usize] as u32);
            self.pos += 1;
        }

        if let Err(e) = self.reader.finish() {
            trace!("\nStream stopped at {} after {} bytes", self.reader.loc(), self.pos);
            return Err(e);
        }
        Ok(self.pos)
    }
}

#[cfg(test)]
mod test {
    use super::Decoder;
    use crate::compression::compress_block::{encode_data, CodeBook};
    use crate::compression::StreamFormat;
    use crate::huffman_coding::canonical::CodeLengths;
    use crate::huffman_coding::header::encode_header;
    use crate::{Error, SYMBOLS};

    /// Hand built block for "a" = 0, "b" = 10, "c" = 11.
    fn small_block(input: &[u8], format: StreamFormat) -> Vec<u8> {
        let mut lengths = CodeLengths::default();
        lengths.lengths[b'a' as usize] = 1;
        lengths.lengths[b'b' as usize] = 2;
        lengths.lengths[b'c' as usize] = 2;
        lengths.tally();
        lengths.max_length = 2;
        let mut codes = [0_u32; SYMBOLS];
        lengths.assign_codes(&mut codes);

        let mut out = vec![0_u8; input.len() + 64];
        let pos = encode_header(&lengths, format, &mut out).unwrap();
        let book = CodeBook { codes: &codes, lengths: &lengths.lengths };
        let end = encode_data(book, format, input, &mut out, pos).unwrap();
        out.truncate(end);
        out
    }

    #[test]
    fn literal_block_test() {
        let mut decoder = Decoder::new().unwrap();
        let block = [0x00, 3, 0, 0, 0, b'x', b'y', b'z'];
        let mut out = [0_u8; 3];
        assert_eq!(decoder.decode(&block, &mut out), Ok(3));
        assert_eq!(&out, b"xyz");

        let mut short = [0_u8; 2];
        assert_eq!(decoder.decode(&block, &mut short), Err(Error::overflow(3, 2)));
        assert!(matches!(
            decoder.decode(&block[..7], &mut out),
            Err(Error::CorruptStream(_))
        ));
    }

    #[test]
    fn run_block_test() {
        let mut decoder = Decoder::new().unwrap();
        let block = [0x40, 0x41, 0x10, 0x27, 0, 0];
        let mut out = vec![0_u8; 10000];
        assert_eq!(decoder.decode(&block, &mut out), Ok(10000));
        assert!(out.iter().all(|&b| b == 0x41));
        assert_eq!(decoder.decode(&block, &mut out[..9999]), Err(Error::overflow(10000, 9999)));
    }

    #[test]
    fn single_stream_test() {
        let input = b"abcabcaaab".repeat(9);
        let block = small_block(&input, StreamFormat::Single);
        let mut decoder = Decoder::new().unwrap();
        let mut out = vec![0_u8; input.len()];
        assert_eq!(decoder.decode(&block, &mut out), Ok(input.len()));
        assert_eq!(out, input);
    }

    #[test]
    fn tiny_multi_streams_test() {
        for input in [&b"ab"[..], b"cabac", b"abcabcabc"] {
            let block = small_block(input, StreamFormat::Multi);
            for parallel in [false, true] {
                let mut decoder = Decoder::new().unwrap().with_parallel_streams(parallel);
                let mut out = vec![0_u8; input.len()];
                assert_eq!(decoder.decode(&block, &mut out), Ok(input.len()));
                assert_eq!(&out[..], input);
            }
        }
    }

    #[test]
    fn multi_capacity_test() {
        let input = b"abcabcabcabcabcabcab";
        let block = small_block(input, StreamFormat::Multi);
        for parallel in [false, true] {
            let mut decoder = Decoder::new().unwrap().with_parallel_streams(parallel);
            let mut out = vec![0_u8; 40];
            assert_eq!(decoder.decode(&block, &mut out), Ok(20));
            assert_eq!(&out[..20], &input[..]);
            // Part size 5 needs at least 17 bytes.
            let mut out = vec![0_u8; 12];
            assert_eq!(decoder.decode(&block, &mut out), Err(Error::overflow(17, 12)));
        }
    }

    #[test]
    fn short_multi_streams_in_large_output_test() {
        for input in [&b"ab"[..], b"cabac", b"abcab"] {
            let block = small_block(input, StreamFormat::Multi);
            for parallel in [false, true] {
                let mut decoder = Decoder::new().unwrap().with_parallel_streams(parallel);
                let mut out = vec![0_u8; input.len() + 9];
                assert_eq!(decoder.decode(&block, &mut out), Ok(input.len()));
                assert_eq!(&out[..input.len()], input);
            }
        }
    }

    #[test]
    fn early_part_end_is_corrupt_test() {
        // "abba" packs as four one byte parts. Claiming two byte parts leaves the first stream
        // short while later streams still hold data.
        let mut block = small_block(b"abba", StreamFormat::Multi);
        // Tag, two length counts, three symbols.
        let part_field = 1 + 2 + 3;
        assert_eq!(&block[part_field..part_field + 4], &[1, 0, 0, 0]);
        block[part_field] = 2;
        for parallel in [false, true] {
            let mut decoder = Decoder::new().unwrap().with_parallel_streams(parallel);
            let mut out = vec![0_u8; 8];
            assert!(matches!(decoder.decode(&block, &mut out), Err(Error::CorruptStream(_))));
        }
    }

    #[test]
    fn wrong_capacity_or_truncation_test() {
        let input = b"abcabcaaab".repeat(9);
        let block = small_block(&input, StreamFormat::Single);
        let mut decoder = Decoder::new().unwrap();
        // More output than the stream holds
        let mut out = vec![0_u8; input.len() + 100];
        assert_eq!(decoder.decode(&block, &mut out), Ok(input.len()));
        assert_eq!(&out[..input.len()], &input[..]);
        // Less output than the stream holds
        let mut out = vec![0_u8; input.len() - 1];
        assert!(matches!(decoder.decode(&block, &mut out), Err(Error::CorruptStream(_))));
        // Truncated block
        let mut out = vec![0_u8; input.len()];
        assert!(matches!(
            decoder.decode(&block[..block.len() - 1], &mut out),
            Err(Error::CorruptStream(_))
        ));
    }

    #[test]
    fn argument_checks_test() {
        let mut decoder = Decoder::new().unwrap();
        let mut out = [0_u8; 8];
        assert!(matches!(decoder.decode(&[0; 5], &mut out), Err(Error::InvalidArgument(_))));
        assert!(matches!(decoder.decode(&[0; 8], &mut []), Err(Error::InvalidArgument(_))));
        // Huffman tag with a zero code length limit
        assert!(matches!(
            decoder.decode(&[0x80, 0, 0, 0, 0, 0], &mut out),
            Err(Error::CorruptStream(_))
        ));
    }
}

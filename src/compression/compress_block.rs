use log::trace;

use super::StreamFormat;
use crate::bitstream::bitpacker::BitPacker;
use crate::bitstream::put_u32;
use crate::error::Result;
use crate::SYMBOLS;

/// Canonical code and code length per byte value.
#[derive(Clone, Copy)]
pub struct CodeBook<'a> {
    pub codes: &'a [u32; SYMBOLS],
    pub lengths: &'a [u8; SYMBOLS],
}

/// Byte ranges of the four parts of a multi layout block of `len` bytes. The first three
/// are `ceil(len / 4)` bytes, the fourth holds what is left, which may be nothing.
pub fn part_bounds(len: usize) -> (usize, [usize; 5]) {
    let part = (len + 3) / 4;
    (part, split_points(part, len))
}

/// Start of each part of size `part` within `len` bytes, then `len`. The fourth part runs to
/// the end.
pub fn split_points(part: usize, len: usize) -> [usize; 5] {
    let mut bounds = [len; 5];
    for (i, bound) in bounds.iter_mut().take(4).enumerate() {
        *bound = i.saturating_mul(part).min(len);
    }
    bounds
}

/// Bits taken by the codes of `data`.
pub fn coded_bits(lengths: &[u8; SYMBOLS], data: &[u8]) -> u64 {
    data.iter().map(|&byte| lengths[byte as usize] as u64).sum()
}

/// Size of a trailered stream holding `bits` bits.
pub const fn stream_size(bits: u64) -> usize {
    ((bits + 7) >> 3) as usize + 1
}

/// Called by the encoder once the header is written. Packs `input` at `pos` in the chosen
/// layout and returns the position just past the data.
pub fn encode_data(
    book: CodeBook<'_>,
    format: StreamFormat,
    input: &[u8],
    output: &mut [u8],
    pos: usize,
) -> Result<usize> {
    match format {
        StreamFormat::Single => {
            let end = encode_part(book, input, output, pos + 4)?;
            put_u32(output, pos, (end - pos - 4) as u32)?;
            trace!("\nSingle stream: {} bytes", end - pos - 4);
            Ok(end)
        }
        StreamFormat::Multi => {
            let (part, bounds) = part_bounds(input.len());
            let mut end = pos + 20;
            let mut sizes = [0_u32; 4];
            for (i, size) in sizes.iter_mut().enumerate() {
                let start = end;
                end = encode_part(book, &input[bounds[i]..bounds[i + 1]], output, start)?;
                *size = (end - start) as u32;
            }
            let mut field = put_u32(output, pos, part as u32)?;
            for &size in &sizes {
                field = put_u32(output, field, size)?;
            }
            trace!("\nMulti stream: part {}, stream sizes {:?}", part, sizes);
            Ok(end)
        }
    }
}

/// Pack one part into its own trailered bit stream starting at `pos`.
fn encode_part(book: CodeBook<'_>, part: &[u8], output: &mut [u8], pos: usize) -> Result<usize> {
    let mut packer = BitPacker::new(output, pos);

    // Four codes of at most 12 bits each fit between two flushes.
    let mut quads = part.chunks_exact(4);
    for quad in &mut quads {
        let mut code = 0_u64;
        let mut bits = 0;
        for &byte in quad {
            let len = book.lengths[byte as usize] as u32;
            code = code << len | book.codes[byte as usize] as u64;
            bits += len;
        }
        packer.put(code, bits);
        packer.flush()?;
    }
    for &byte in quads.remainder() {
        packer.put(
            book.codes[byte as usize] as u64,
            book.lengths[byte as usize] as u32,
        );
    }
    trace!("\nPart of {} bytes packed, at {}", part.len(), packer.loc());
    packer.finish()
}

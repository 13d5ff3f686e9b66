//! Serializes the code length table in whichever of two forms is smaller.
//!
//! - Dense: the highest used symbol, then one 4 bit length per symbol from 0 up to it, two per
//!   byte (high nibble first). Costs `2 + ceil((max_symbol + 1) / 2)` bytes with the tag.
//! - Sparse: one count byte per length 1..=max_length, then the used symbols grouped by
//!   ascending length. Costs `1 + max_length + symbol_count` bytes with the tag.
//!
//! Ties go to the dense form. Both cost figures include the tag byte, which is written here.

use log::trace;

use super::canonical::CodeLengths;
use crate::compression::tag::{ContentKind, Tag};
use crate::compression::StreamFormat;
use crate::error::{Error, Result};
use crate::MAX_CODE_LEN;

pub fn dense_cost(lengths: &CodeLengths) -> usize {
    2 + (lengths.max_symbol as usize + 2) / 2
}

pub fn sparse_cost(lengths: &CodeLengths) -> usize {
    1 + lengths.max_length as usize + lengths.symbol_count
}

/// Write the tag byte and the cheaper header form into `output`. Returns bytes written.
pub fn encode_header(lengths: &CodeLengths, format: StreamFormat, output: &mut [u8]) -> Result<usize> {
    let dense = dense_cost(lengths);
    let sparse = sparse_cost(lengths);
    let (kind, cost) = if dense <= sparse {
        (ContentKind::DenseHeader, dense)
    } else {
        (ContentKind::SparseHeader, sparse)
    };
    trace!("\nHeader costs: dense {}, sparse {}; using {:?}", dense, sparse, kind);

    let capacity = output.len();
    let out = output
        .get_mut(..cost)
        .ok_or_else(|| Error::overflow(cost, capacity))?;
    out[0] = Tag {
        kind,
        format,
        max_length: lengths.max_length as u8,
    }
    .to_byte();

    match kind {
        ContentKind::DenseHeader => {
            out[1] = lengths.max_symbol;
            for (byte, pair) in out[2..]
                .iter_mut()
                .zip(lengths.lengths[..=lengths.max_symbol as usize].chunks(2))
            {
                *byte = pair[0] << 4 | pair.get(1).copied().unwrap_or(0);
            }
        }
        _ => {
            let max_length = lengths.max_length as usize;
            out[1..=max_length]
                .iter_mut()
                .zip(&lengths.counts[1..=max_length])
                .for_each(|(byte, &count)| *byte = count as u8);

            // next_index[len] is where the next symbol of that length goes in the list.
            let mut next_index = [0_usize; MAX_CODE_LEN + 1];
            for len in 2..=max_length {
                next_index[len] = next_index[len - 1] + lengths.counts[len - 1] as usize;
            }
            let list = &mut out[1 + max_length..];
            for symbol in 0..=lengths.max_symbol as usize {
                let len = lengths.lengths[symbol] as usize;
                if len > 0 {
                    list[next_index[len]] = symbol as u8;
                    next_index[len] += 1;
                }
            }
        }
    }
    Ok(cost)
}

/// Read a dense header body (after the tag). Returns bytes consumed.
pub fn decode_dense(input: &[u8], max_length: u32, lengths: &mut CodeLengths) -> Result<usize> {
    let max_symbol = *input
        .first()
        .ok_or(Error::CorruptStream("truncated length table"))? as usize;
    let used = 1 + (max_symbol + 2) / 2;
    let packed = input
        .get(1..used)
        .ok_or(Error::CorruptStream("truncated length table"))?;

    lengths.clear();
    for (i, &byte) in packed.iter().enumerate() {
        lengths.lengths[2 * i] = byte >> 4;
        if 2 * i + 1 <= max_symbol {
            lengths.lengths[2 * i + 1] = byte & 0xF;
        }
    }
    finish_table(lengths, max_length)?;
    Ok(used)
}

/// Read a sparse header body (after the tag). Returns bytes consumed.
pub fn decode_sparse(input: &[u8], max_length: u32, lengths: &mut CodeLengths) -> Result<usize> {
    let max_len = max_length as usize;
    let counts = input
        .get(..max_len)
        .ok_or(Error::CorruptStream("truncated length counts"))?;
    let symbol_count: usize = counts.iter().map(|&c| c as usize).sum();
    let list = input
        .get(max_len..max_len + symbol_count)
        .ok_or(Error::CorruptStream("truncated symbol list"))?;

    lengths.clear();
    let mut symbols = list.iter();
    for (len, &count) in (1..=max_len).zip(counts) {
        for &symbol in symbols.by_ref().take(count as usize) {
            if lengths.lengths[symbol as usize] != 0 {
                return Err(Error::CorruptStream("symbol listed twice"));
            }
            lengths.lengths[symbol as usize] = len as u8;
        }
    }
    finish_table(lengths, max_length)?;
    Ok(max_len + symbol_count)
}

fn finish_table(lengths: &mut CodeLengths, max_length: u32) -> Result<()> {
    lengths.tally();
    lengths.max_length = max_length;
    if !lengths.is_complete() {
        return Err(Error::CorruptStream("code lengths do not form a complete code"));
    }
    Ok(())
}

//! The compression module holds the block level entry points.
//!
//! Encoding one block happens in the following steps:
//! - Frequency count: four-lane byte histogram.
//! - Dispatch: a single distinct byte becomes a run-length block, a near uniform histogram
//!   becomes a literal block.
//! - Huffman coding: sort the symbols, build the tree, limit the lengths to 12 bits, assign
//!   canonical codes, write the smaller of the two header forms, then pack the data.
//!
//! Decoding reads the tag byte and follows the same path backwards. Huffman coded blocks are
//! decoded with a 4096-entry table that yields up to three bytes per probe.
//!

pub mod compress;
pub mod compress_block;
pub mod decompress;
pub mod tag;

use crate::error::Error;

/// How the Huffman coded data of a block is laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamFormat {
    /// One bit stream for the whole block.
    Single = 0,
    /// Four independent bit streams, one per quarter of the block.
    Multi = 1,
}

impl TryFrom<u8> for StreamFormat {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(StreamFormat::Single),
            1 => Ok(StreamFormat::Multi),
            _ => Err(Error::InvalidArgument("unknown stream format")),
        }
    }
}

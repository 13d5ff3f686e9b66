//! The first byte of every block.
//!
//! Bits 7-6 hold the content kind, bits 5-4 the stream format and bits 3-0 the maximum code
//! length. Literal and run-length blocks leave the low six bits zero.

use super::StreamFormat;
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    Literal = 0,
    RunLength = 1,
    DenseHeader = 2,
    SparseHeader = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tag {
    pub kind: ContentKind,
    pub format: StreamFormat,
    pub max_length: u8,
}

impl Tag {
    /// Tag for blocks without Huffman data.
    pub fn plain(kind: ContentKind) -> Self {
        Self {
            kind,
            format: StreamFormat::Single,
            max_length: 0,
        }
    }

    pub fn to_byte(self) -> u8 {
        (self.kind as u8) << 6 | (self.format as u8) << 4 | (self.max_length & 0xF)
    }

    pub fn parse(byte: u8) -> Result<Self> {
        let kind = match byte >> 6 {
            0 => ContentKind::Literal,
            1 => ContentKind::RunLength,
            2 => ContentKind::DenseHeader,
            _ => ContentKind::SparseHeader,
        };
        let format = StreamFormat::try_from(byte >> 4 & 3)
            .map_err(|_| Error::CorruptStream("unknown stream format in tag"))?;
        Ok(Self {
            kind,
            format,
            max_length: byte & 0xF,
        })
    }
}

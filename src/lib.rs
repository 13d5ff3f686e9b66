//! Block-oriented lossless byte compressor built on length-limited canonical Huffman coding.
//!
//! Each call to [`Encoder::encode`] turns one input block into one self-describing compressed
//! block, and [`Decoder::decode`] turns it back. Nothing is carried from one call to the next
//! except the scratch allocation held by the encoder or decoder value.
//!
//! A block is stored in one of three ways:
//! - Run-length: the block holds a single distinct byte value.
//! - Literal: the byte distribution is close to uniform, so the bytes are copied verbatim.
//! - Huffman: code lengths (limited to 12 bits) followed by one bit-packed stream, or four
//!   independent streams in the multi layout.
//!
//! Basic usage:
//!
//! ```
//! use hmz::{compressed_size, Decoder, Encoder, StreamFormat};
//!
//! let input = b"abracadabra, abracadabra, abracadabra".to_vec();
//! let mut packed = vec![0_u8; compressed_size(input.len())];
//! let mut encoder = Encoder::new(StreamFormat::Multi).unwrap();
//! let packed_len = encoder.encode(&input, &mut packed).unwrap();
//!
//! let mut restored = vec![0_u8; input.len()];
//! let mut decoder = Decoder::new().unwrap();
//! let restored_len = decoder.decode(&packed[..packed_len], &mut restored).unwrap();
//! assert_eq!(&restored[..restored_len], &input[..]);
//! ```
//!
#![warn(rust_2018_idioms)]

pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{compressed_size, Encoder};
pub use compression::decompress::Decoder;
pub use compression::StreamFormat;
pub use error::{Error, Result};

/// Number of distinct byte values.
pub const SYMBOLS: usize = 256;
/// Longest code length the decode table supports.
pub const MAX_CODE_LEN: usize = 12;
/// Entries in the fast decode table.
pub const TABLE_SIZE: usize = 1 << MAX_CODE_LEN;
/// Smallest possible block: tag, one byte, one 4-byte field.
pub const MIN_HEADER_SIZE: usize = 1 + 1 + 4;
/// Largest possible header: tag, length counts, symbol list, multi-stream sizes.
pub const MAX_HEADER_SIZE: usize = 1 + MAX_CODE_LEN + SYMBOLS + 20;
/// Slack kept on top of the header in the worst case size estimate.
pub const MEM_OVERRUN: usize = 8;
/// Block size suggested to callers that split large inputs.
pub const DEFAULT_BLOCK_SIZE: usize = 1 << 15;
/// Largest block accepted by the encoder.
pub const MAX_BLOCK_SIZE: usize = 1 << 30;

//! The huffman_coding module turns a block's symbol counts into a length-limited canonical
//! code and serializes it. Decoding the data itself happens in the decompress module through
//! the fast decode table built here.
//!
//! - huffman_code_from_weights: queue-free tree build over sorted counts.
//! - limit: rebalances code lengths so none exceeds 12 bits.
//! - canonical: code assignment from lengths alone.
//! - header: dense and sparse serialization of the length table.
//! - decode_table: 4096-entry lookup yielding up to three symbols per probe.
//!

pub mod canonical;
pub mod decode_table;
pub mod header;
pub mod huffman_code_from_weights;
pub mod limit;

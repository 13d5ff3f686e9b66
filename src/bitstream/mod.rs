//! The bitstream module forms the I/O subsystem for the block codec.
//!
//! Both sides work on a 64 bit window. The packer fills its window from the most significant
//! bit down and flushes whole bytes in big-endian order, the reader loads 8 bytes at a time and
//! tracks how many bits of the window it has already consumed.
//!
//! Every bit stream ends with one trailer byte holding the number of padding bits in the last
//! data byte. This lets the reader stop on the exact bit boundary instead of a byte boundary.
//!
//! The few fixed-width integer fields in a block (lengths and counts) are plain 4 byte little
//! endian values. The helpers for those live here as well.
//!
pub mod bitpacker;
pub mod bitreader;

use crate::error::{Error, Result};

/// Write a little-endian u32 at `pos`, returning the position just past it.
pub fn put_u32(output: &mut [u8], pos: usize, value: u32) -> Result<usize> {
    let end = pos + 4;
    let capacity = output.len();
    output
        .get_mut(pos..end)
        .ok_or_else(|| Error::overflow(end, capacity))?
        .copy_from_slice(&value.to_le_bytes());
    Ok(end)
}

/// Read a little-endian u32 at `pos`.
pub fn get_u32(input: &[u8], pos: usize) -> Result<u32> {
    let bytes = input
        .get(pos..pos + 4)
        .ok_or(Error::CorruptStream("truncated size field"))?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

#[cfg(test)]
mod test {
    use super::{get_u32, put_u32};
    use crate::Error;

    #[test]
    fn u32_fields_test() {
        let mut buf = [0_u8; 6];
        assert_eq!(put_u32(&mut buf, 1, 10000), Ok(5));
        assert_eq!(buf, [0, 0x10, 0x27, 0, 0, 0]);
        assert_eq!(get_u32(&buf, 1), Ok(10000));
    }

    #[test]
    fn u32_bounds_test() {
        let mut buf = [0_u8; 6];
        assert_eq!(put_u32(&mut buf, 3, 1), Err(Error::overflow(7, 6)));
        assert!(matches!(get_u32(&buf, 3), Err(Error::CorruptStream(_))));
    }
}

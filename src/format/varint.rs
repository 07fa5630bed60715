// Variable-length unsigned integers for the factor stream.
//
// Base-128, big-endian: most-significant group first. Every byte except
// the last has bit 7 set.

use std::io::{self, Write};

/// Maximum encoded length of a `u64` (ceil(64/7)).
pub const MAX_VARINT_LEN: usize = 10;

/// Bits that must be clear before another `<< 7` on a `u64` accumulator.
const U64_OVERFLOW_MASK: u64 = 0xFE00_0000_0000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VarIntError {
    /// Input ended inside an integer.
    #[error("truncated varint")]
    Underflow,
    /// Value does not fit in 64 bits.
    #[error("varint overflow")]
    Overflow,
}

/// Encode `num` into the tail of `buf`; returns the encoded length.
/// The encoding occupies `buf[MAX_VARINT_LEN - len..]`.
#[inline]
pub fn encode_u64(mut num: u64, buf: &mut [u8; MAX_VARINT_LEN]) -> usize {
    let mut i = MAX_VARINT_LEN;
    loop {
        i -= 1;
        buf[i] = (num as u8 & 0x7F) | 0x80;
        num >>= 7;
        if num == 0 {
            break;
        }
    }
    buf[MAX_VARINT_LEN - 1] &= 0x7F;
    MAX_VARINT_LEN - i
}

/// Write `num` to `w`; returns the number of bytes written.
pub fn write_u64<W: Write>(w: &mut W, num: u64) -> io::Result<usize> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let len = encode_u64(num, &mut buf);
    w.write_all(&buf[MAX_VARINT_LEN - len..])?;
    Ok(len)
}

/// Decode a `u64` from the front of `data`.
/// Returns `(value, bytes_consumed)`.
pub fn read_u64(data: &[u8]) -> Result<(u64, usize), VarIntError> {
    let mut val: u64 = 0;
    for (i, &byte) in data.iter().enumerate() {
        if val & U64_OVERFLOW_MASK != 0 {
            return Err(VarIntError::Overflow);
        }
        val = (val << 7) | u64::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok((val, i + 1));
        }
    }
    Err(VarIntError::Underflow)
}

/// Encoded length of `num`.
#[inline]
pub fn sizeof_u64(num: u64) -> usize {
    let bits = 64 - num.leading_zeros();
    bits.max(1).div_ceil(7) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(num: u64) -> Vec<u8> {
        let mut out = Vec::new();
        write_u64(&mut out, num).unwrap();
        out
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encoded(0), [0x00]);
        assert_eq!(encoded(127), [0x7F]);
        assert_eq!(encoded(128), [0x81, 0x00]);
        assert_eq!(encoded(300), [0x82, 0x2C]);
        assert_eq!(encoded(u64::MAX).len(), MAX_VARINT_LEN);
    }

    #[test]
    fn sizes_match_encoder() {
        for num in [0, 1, 127, 128, 16383, 16384, u32::MAX as u64, u64::MAX] {
            assert_eq!(sizeof_u64(num), encoded(num).len(), "num={num}");
        }
    }

    #[test]
    fn read_consumes_only_one_integer() {
        let mut data = encoded(300);
        data.extend_from_slice(&encoded(5));
        assert_eq!(read_u64(&data).unwrap(), (300, 2));
        assert_eq!(read_u64(&data[2..]).unwrap(), (5, 1));
    }

    #[test]
    fn max_value_survives() {
        assert_eq!(read_u64(&encoded(u64::MAX)).unwrap(), (u64::MAX, 10));
    }

    #[test]
    fn truncated_input() {
        assert_eq!(read_u64(&[]), Err(VarIntError::Underflow));
        assert_eq!(read_u64(&[0x81]), Err(VarIntError::Underflow));
    }

    #[test]
    fn overlong_input() {
        let data = [0xFF; 11];
        assert_eq!(read_u64(&data), Err(VarIntError::Overflow));
    }
}

//! Bounded varint32 codec for visibility-expression payloads.
//!
//! Values are 7 bits per byte, low group first, high bit = continuation.
//! The decoded 32 bits are reinterpreted as a signed `i32`. Producers
//! write negative values as the 5-byte varint of their two's-complement
//! bits; 10-byte sign-extended (64-bit) encodings are also accepted and
//! the upper bits discarded.
//!
//! Every read is bounded by the tag's declared end. Touching a byte at or
//! past that end is a [`Error::Decode`].

use crate::{Error, Result};

/// Longest encoding accepted (64-bit sign extension).
pub const MAX_VARINT_LEN: usize = 10;

/// Bytes that contribute to the 32-bit result.
const VARINT32_LEN: usize = 5;

/// Decode one varint32 starting at `offset`, never reading at or past `end`.
///
/// Returns the value and the number of bytes consumed.
pub fn read_raw_varint32(buf: &[u8], offset: usize, end: usize) -> Result<(i32, usize)> {
    let bound = end.min(buf.len());
    let mut result: u32 = 0;
    for i in 0..MAX_VARINT_LEN {
        let pos = offset + i;
        if pos >= bound {
            return Err(Error::Decode {
                offset: pos,
                message: format!("varint starting at {offset} runs past end {end}"),
            });
        }
        let byte = buf[pos];
        if i < VARINT32_LEN {
            result |= u32::from(byte & 0x7F) << (7 * i);
        }
        if byte & 0x80 == 0 {
            return Ok((result as i32, i + 1));
        }
    }
    Err(Error::Decode {
        offset,
        message: format!("malformed varint: continuation bit set after {MAX_VARINT_LEN} bytes"),
    })
}

/// Append `value` as a varint32 (negative values take 5 bytes).
pub fn write_raw_varint32(value: i32, out: &mut Vec<u8>) {
    let mut v = value as u32;
    loop {
        if v & !0x7F == 0 {
            out.push(v as u8);
            return;
        }
        out.push((v as u8 & 0x7F) | 0x80);
        v >>= 7;
    }
}

// ============================================================================
// Lazy iteration
// ============================================================================

/// Lazily decodes packed varints from `buf[offset..end]`.
///
/// Yields `(value, bytes_consumed)` while `offset < end`. After the first
/// error the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct VarintIter<'a> {
    buf: &'a [u8],
    pos: usize,
    end: usize,
    failed: bool,
}

impl<'a> Iterator for VarintIter<'a> {
    type Item = Result<(i32, usize)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.end {
            return None;
        }
        match read_raw_varint32(self.buf, self.pos, self.end) {
            Ok((value, consumed)) => {
                self.pos += consumed;
                Some(Ok((value, consumed)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Decode the packed varints in `buf[offset..end]`.
pub fn decode(buf: &[u8], offset: usize, end: usize) -> VarintIter<'_> {
    VarintIter { buf, pos: offset, end, failed: false }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encoded(value: i32) -> Vec<u8> {
        let mut buf = Vec::new();
        write_raw_varint32(value, &mut buf);
        buf
    }

    #[test]
    fn test_single_byte_values() {
        assert_eq!(encoded(0), vec![0x00]);
        assert_eq!(encoded(3), vec![0x03]);
        assert_eq!(encoded(127), vec![0x7F]);
        assert_eq!(read_raw_varint32(&[0x07], 0, 1).unwrap(), (7, 1));
    }

    #[test]
    fn test_multi_byte_value() {
        assert_eq!(encoded(300), vec![0xAC, 0x02]);
        assert_eq!(read_raw_varint32(&[0xAC, 0x02], 0, 2).unwrap(), (300, 2));
    }

    #[test]
    fn test_negative_takes_five_bytes() {
        let buf = encoded(-5);
        assert_eq!(buf, vec![0xFB, 0xFF, 0xFF, 0xFF, 0x0F]);
        assert_eq!(read_raw_varint32(&buf, 0, buf.len()).unwrap(), (-5, 5));
    }

    #[test]
    fn test_sign_extended_ten_byte_form() {
        // -5 as a 64-bit varint
        let buf = [0xFB, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        assert_eq!(read_raw_varint32(&buf, 0, buf.len()).unwrap(), (-5, 10));
    }

    #[test]
    fn test_never_reads_past_end() {
        // Continuation bit set on the last in-bounds byte; the next byte
        // exists in the buffer but lies beyond the tag.
        let buf = [0x83, 0x01];
        let err = read_raw_varint32(&buf, 0, 1).unwrap_err();
        assert!(matches!(err, Error::Decode { offset: 1, .. }));
    }

    #[test]
    fn test_end_beyond_buffer_is_bounded() {
        assert!(read_raw_varint32(&[0x80], 0, 16).is_err());
    }

    #[test]
    fn test_unterminated_ten_bytes_is_malformed() {
        let buf = [0xFF; 11];
        let err = read_raw_varint32(&buf, 0, buf.len()).unwrap_err();
        assert!(matches!(err, Error::Decode { offset: 0, .. }));
    }

    #[test]
    fn test_decode_sequence_with_offset() {
        let mut buf = vec![0xEE, 0xEE];
        for v in [3, -5, 7] {
            write_raw_varint32(v, &mut buf);
        }
        let end = buf.len();
        buf.push(0xEE);

        let values: Vec<(i32, usize)> = decode(&buf, 2, end).map(|r| r.unwrap()).collect();
        assert_eq!(values, vec![(3, 1), (-5, 5), (7, 1)]);
    }

    #[test]
    fn test_decode_stops_after_error() {
        let buf = [0x01, 0x80];
        let mut iter = decode(&buf, 0, buf.len());
        assert_eq!(iter.next().unwrap().unwrap(), (1, 1));
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_decode_empty_range() {
        assert_eq!(decode(&[0x01], 1, 1).count(), 0);
    }

    proptest! {
        #[test]
        fn prop_write_then_read(value in any::<i32>()) {
            let buf = encoded(value);
            prop_assert!(buf.len() <= VARINT32_LEN);
            prop_assert_eq!(read_raw_varint32(&buf, 0, buf.len()).unwrap(), (value, buf.len()));
        }

        #[test]
        fn prop_decode_is_idempotent(bytes in proptest::collection::vec(any::<u8>(), 0..32)) {
            let first: Vec<String> = decode(&bytes, 0, bytes.len()).map(|r| format!("{r:?}")).collect();
            let second: Vec<String> = decode(&bytes, 0, bytes.len()).map(|r| format!("{r:?}")).collect();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_consumed_stays_in_bounds(bytes in proptest::collection::vec(any::<u8>(), 0..32)) {
            let mut total = 0;
            for item in decode(&bytes, 0, bytes.len()) {
                match item {
                    Ok((_, consumed)) => total += consumed,
                    Err(_) => break,
                }
            }
            prop_assert!(total <= bytes.len());
        }
    }
}

//! MSB-first bit packing of fragment strings.
//!
//! The baseband consumes frames as a packed byte buffer plus an exact bit
//! count. [`Bitstream::pack`] turns a fragment string (one `'0'`/`'1'` per
//! output bit) into that form; [`Bitstream::append`] adds raw bit fields so a
//! frame can be assembled from fixed preambles, a variable payload and fixed
//! trailers without rewriting the buffer.
//!
//! ## Layout
//!
//! - Bits fill each byte from the most significant bit down.
//! - A partial final byte is zero-padded in its low-order bits.
//! - [`Bitstream::len_bits`] is the number of meaningful bits, independent
//!   of how many bytes the buffer holds.
//!
//! In `no_std` builds the buffer holds at most
//! [`MAX_BITSTREAM_BYTES`](crate::consts::MAX_BITSTREAM_BYTES); bits past
//! that bound are dropped and not counted. Only unvalidated input reaches
//! that path: validation caps every protocol's longest frame at
//! [`MAX_FRAME_BITS`](crate::consts::MAX_FRAME_BITS), which is exactly the
//! buffer size.

#[cfg(not(feature = "std"))]
use crate::consts::MAX_BITSTREAM_BYTES;

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// A packed, MSB-first bit buffer with an exact bit length.
#[derive(PartialEq, Eq, Hash, Clone, Default, Debug)]
pub struct Bitstream {
    #[cfg(feature = "std")]
    bytes: Vec<u8>,
    #[cfg(not(feature = "std"))]
    bytes: Vec<u8, MAX_BITSTREAM_BYTES>,
    bit_len: usize,
}

impl Bitstream {
    /// Creates an empty bitstream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Packs a fragment string, one bit per character.
    ///
    /// Any character other than `'0'` is a `1` bit.
    ///
    /// # Example
    /// ```rust
    /// use ookframe::bitstream::Bitstream;
    ///
    /// let bits = Bitstream::pack("1000111");
    /// assert_eq!(bits.len_bits(), 7);
    /// assert_eq!(bits.as_bytes(), &[0b1000_1110]);
    /// ```
    pub fn pack(fragments: &str) -> Self {
        let mut stream = Self::new();
        stream.extend_fragments(fragments);
        stream
    }

    /// Appends a fragment string at the current bit position.
    pub fn extend_fragments(&mut self, fragments: &str) {
        for c in fragments.bytes() {
            if !self.push_bit(c != b'0') {
                return;
            }
        }
    }

    /// Appends the low `bit_count` bits of `bits`, most significant first.
    ///
    /// `bit_count` is capped at 32. The new bits are merged into a partially
    /// filled trailing byte.
    ///
    /// # Example
    /// ```rust
    /// use ookframe::bitstream::Bitstream;
    ///
    /// let mut bits = Bitstream::pack("101");
    /// bits.append(7, 0b110_0111);
    /// assert_eq!(bits.len_bits(), 10);
    /// assert_eq!(bits.as_bytes(), &[0b1011_1001, 0b1100_0000]);
    /// ```
    pub fn append(&mut self, bit_count: u32, bits: u32) {
        for shift in (0..bit_count.min(32)).rev() {
            if !self.push_bit((bits >> shift) & 1 != 0) {
                return;
            }
        }
    }

    fn push_bit(&mut self, bit: bool) -> bool {
        let byte = self.bit_len / 8;
        if byte == self.bytes.len() && !self.grow() {
            return false;
        }
        if bit {
            self.bytes[byte] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
        true
    }

    #[cfg(feature = "std")]
    fn grow(&mut self) -> bool {
        self.bytes.push(0);
        true
    }

    #[cfg(not(feature = "std"))]
    fn grow(&mut self) -> bool {
        self.bytes.push(0).is_ok()
    }

    /// Number of meaningful bits.
    pub fn len_bits(&self) -> usize {
        self.bit_len
    }

    /// Whether no bits have been written.
    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// The packed bytes, including the zero padding of a partial last byte.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Reads bit `index`, or `None` past the end.
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.bit_len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Iterates over the meaningful bits in transmit order.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_len).map(move |i| self.bytes[i / 8] & (0x80 >> (i % 8)) != 0)
    }

    /// Empties the buffer, keeping its allocation.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.bit_len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unpack(stream: &Bitstream) -> Vec<bool> {
        stream.bits().collect()
    }

    #[test]
    fn test_pack_msb_first() {
        let stream = Bitstream::pack("10110001");
        assert_eq!(stream.as_bytes(), &[0b1011_0001]);
        assert_eq!(stream.len_bits(), 8);
    }

    #[test]
    fn test_pack_pads_partial_byte() {
        for len in 0..=20 {
            let fragments: String = "1".repeat(len);
            let stream = Bitstream::pack(&fragments);
            assert_eq!(stream.len_bits(), len);
            assert_eq!(stream.as_bytes().len(), len.div_ceil(8));
            if len % 8 != 0 {
                let last = stream.as_bytes()[len / 8];
                assert_eq!(last & (0xff >> (len % 8)), 0);
            }
        }
    }

    #[test]
    fn test_pack_matches_fragments() {
        let fragments = "0111111101000000100000000000000000110";
        let stream = Bitstream::pack(fragments);
        let expected: Vec<bool> = fragments.chars().map(|c| c != '0').collect();
        assert_eq!(unpack(&stream), expected);
    }

    #[test]
    fn test_non_zero_characters_are_ones() {
        let stream = Bitstream::pack("0F2 ");
        assert_eq!(unpack(&stream), [false, true, true, true]);
    }

    #[test]
    fn test_append_merges_into_partial_byte() {
        let mut stream = Bitstream::pack("111");
        stream.append(2, 0b01);
        stream.append(5, 0b1_0110);
        assert_eq!(stream.len_bits(), 10);
        assert_eq!(stream.as_bytes(), &[0b1110_1101, 0b1000_0000]);
    }

    #[test]
    fn test_append_ignores_high_bits() {
        let mut stream = Bitstream::new();
        stream.append(4, 0xfff5);
        assert_eq!(unpack(&stream), [false, true, false, true]);
        stream.append(0, 0xffff_ffff);
        assert_eq!(stream.len_bits(), 4);
    }

    #[test]
    fn test_append_full_word() {
        let mut stream = Bitstream::new();
        stream.append(40, 0x8000_0001);
        assert_eq!(stream.len_bits(), 32);
        assert_eq!(stream.as_bytes(), &[0x80, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_longest_valid_frame_fits() {
        use crate::consts::{MAX_BITSTREAM_BYTES, MAX_FRAME_BITS};

        let mut stream = Bitstream::new();
        for _ in 0..MAX_FRAME_BITS / 8 {
            stream.append(8, 0xa5);
        }
        assert_eq!(stream.len_bits(), MAX_FRAME_BITS);
        assert_eq!(stream.as_bytes().len(), MAX_BITSTREAM_BYTES);
        assert!(stream.as_bytes().iter().all(|&b| b == 0xa5));
    }

    #[cfg(not(feature = "std"))]
    #[test]
    fn test_bits_past_capacity_are_dropped() {
        use crate::consts::MAX_FRAME_BITS;

        let mut stream = Bitstream::new();
        for _ in 0..MAX_FRAME_BITS / 8 {
            stream.append(8, 0xff);
        }
        stream.append(3, 0b101);
        assert_eq!(stream.len_bits(), MAX_FRAME_BITS);
        assert_eq!(stream.bit(MAX_FRAME_BITS), None);
    }

    #[test]
    fn test_bit_reads_and_clear() {
        let mut stream = Bitstream::pack("0100");
        assert_eq!(stream.bit(1), Some(true));
        assert_eq!(stream.bit(3), Some(false));
        assert_eq!(stream.bit(4), None);
        stream.clear();
        assert!(stream.is_empty());
        assert!(stream.as_bytes().is_empty());
    }
}

//! Arbitrary-radix De Bruijn sequences from Lyndon words.
//!
//! Uses the Fredricksen–Kessler–Maiorana construction: walking all
//! prenecklaces of length `n` over `k` symbols in lexicographic order and
//! concatenating those whose period divides `n` yields the lexicographically
//! smallest cyclic De Bruijn sequence B(k, n), `k^n` symbols long. Appending
//! its first `n - 1` symbols makes it linear, so every one of the `k^n`
//! words appears exactly once as a window of `k^n + n - 1` symbols.
//!
//! The walk is iterative over a fixed `a[]` array; there is no recursion and
//! no cancellation point, so callers bound the work through `k` and `n`
//! (see [`MAX_DEBRUIJN_LEN`]).
//!
//! The sequence is stored as ASCII digits and sliced into *parts* for
//! transmission. Part `i` covers symbols `i * part_len .. (i + 1) * part_len`,
//! wrapping around to the start of the sequence for the last part.

use crate::consts::{MAX_DEBRUIJN_LEN, MAX_DEBRUIJN_ORDER, MAX_DEBRUIJN_RADIX, MAX_PART_LEN, PartText};
use crate::error::{Error, Result};

#[cfg(not(feature = "std"))]
type SequenceText = heapless::String<MAX_DEBRUIJN_LEN>;
#[cfg(feature = "std")]
type SequenceText = String;

/// Whether a prenecklace with period `p` contributes to a sequence of order `n`.
///
/// Only prenecklaces whose period divides `n` are Lyndon-word prefixes of an
/// `n`-periodic necklace.
pub const fn accepts_period(n: usize, p: usize) -> bool {
    p != 0 && n % p == 0
}

/// A De Bruijn sequence B(k, n), materialized on demand.
#[derive(Clone, Debug)]
pub struct DeBruijnSequence {
    k: u8,
    n: u8,
    part_len: usize,
    len: usize,
    a: [u8; MAX_DEBRUIJN_ORDER + 1],
    sequence: SequenceText,
}

impl DeBruijnSequence {
    /// Prepares a sequence over `k` symbols with word length `n`.
    ///
    /// `k` must be in `2..=10` and `n` in `1..=32`, and the linear sequence
    /// (`k^n + n - 1` symbols) must fit [`MAX_DEBRUIJN_LEN`]. Parts default to
    /// `n` symbols.
    pub fn new(k: u8, n: u8) -> Result<Self> {
        let unsupported = Error::UnsupportedDeBruijnParameters { k, n };
        if !(2..=MAX_DEBRUIJN_RADIX).contains(&k) || n == 0 || usize::from(n) > MAX_DEBRUIJN_ORDER {
            return Err(unsupported);
        }
        let len = usize::from(k)
            .checked_pow(u32::from(n))
            .and_then(|words| words.checked_add(usize::from(n) - 1))
            .filter(|&len| len <= MAX_DEBRUIJN_LEN)
            .ok_or(unsupported)?;
        let part_len = usize::from(n).min(MAX_PART_LEN);
        Ok(Self {
            k,
            n,
            part_len,
            len,
            a: [0; MAX_DEBRUIJN_ORDER + 1],
            sequence: SequenceText::new(),
        })
    }

    /// Sets the number of symbols per transmitted part.
    pub fn with_part_len(mut self, part_len: usize) -> Result<Self> {
        if part_len == 0 || part_len > MAX_PART_LEN {
            return Err(Error::UnsupportedDeBruijnParameters {
                k: self.k,
                n: self.n,
            });
        }
        self.part_len = part_len;
        Ok(self)
    }

    /// Alphabet size `k`.
    pub fn alphabet_size(&self) -> u8 {
        self.k
    }

    /// Word length `n`.
    pub fn order(&self) -> u8 {
        self.n
    }

    /// Symbols per part.
    pub fn part_len(&self) -> usize {
        self.part_len
    }

    /// Length of the linear sequence, `k^n + n - 1`.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether [`generate`](Self::generate) has produced the sequence.
    pub fn is_generated(&self) -> bool {
        self.sequence.len() == self.len
    }

    /// Whether the sequence has no symbols. Never true for valid parameters.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Runs the necklace walk and materializes the linear sequence.
    ///
    /// Calling it again regenerates the same sequence.
    pub fn generate(&mut self) -> Result<()> {
        let n = usize::from(self.n);
        let top = self.k - 1;
        self.sequence.clear();
        self.a = [0; MAX_DEBRUIJN_ORDER + 1];

        // 0^n has period 1
        self.emit(1)?;
        loop {
            let mut i = n;
            while i > 0 && self.a[i] == top {
                i -= 1;
            }
            if i == 0 {
                break;
            }
            self.a[i] += 1;
            for j in i + 1..=n {
                self.a[j] = self.a[j - i];
            }
            if accepts_period(n, i) {
                self.emit(i)?;
            }
        }

        // wrap the first n - 1 symbols so every window is contiguous
        for i in 0..n - 1 {
            let digit = self.sequence.as_bytes()[i];
            self.push_digit(digit)?;
        }
        debug!("De Bruijn k={} n={}: {} symbols", self.k, self.n, self.sequence.len());
        Ok(())
    }

    fn emit(&mut self, period: usize) -> Result<()> {
        for j in 1..=period {
            let digit = b'0' + self.a[j];
            self.push_digit(digit)?;
        }
        Ok(())
    }

    #[cfg(feature = "std")]
    fn push_digit(&mut self, digit: u8) -> Result<()> {
        self.sequence.push(char::from(digit));
        Ok(())
    }

    #[cfg(not(feature = "std"))]
    fn push_digit(&mut self, digit: u8) -> Result<()> {
        self.sequence
            .push(char::from(digit))
            .map_err(|_| Error::CapacityExceeded)
    }

    /// The generated sequence as digits, empty before [`generate`](Self::generate).
    pub fn as_str(&self) -> &str {
        &self.sequence
    }

    /// Every length-`n` window of the linear sequence, in order.
    pub fn windows(&self) -> impl Iterator<Item = &str> + '_ {
        let n = usize::from(self.n);
        let count = (self.sequence.len() + 1).saturating_sub(n);
        (0..count).map(move |i| &self.sequence[i..i + n])
    }

    /// Number of parts the sequence is sliced into.
    pub fn total_parts(&self) -> u32 {
        self.len.div_ceil(self.part_len) as u32
    }

    /// Symbol indices of part `index`, or `None` past the end or before generation.
    pub fn part_symbols(&self, index: u32) -> Option<impl Iterator<Item = u8> + '_> {
        if !self.is_generated() || index >= self.total_parts() {
            return None;
        }
        let start = index as usize * self.part_len;
        let bytes = self.sequence.as_bytes();
        Some((start..start + self.part_len).map(move |i| bytes[i % bytes.len()] - b'0'))
    }

    /// Part `index` rendered as digits.
    pub fn part(&self, index: u32) -> Option<PartText> {
        let symbols = self.part_symbols(index)?;
        let mut text = PartText::new();
        for symbol in symbols {
            let _ = text.push(char::from(b'0' + symbol));
        }
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn generated(k: u8, n: u8) -> DeBruijnSequence {
        let mut seq = DeBruijnSequence::new(k, n).unwrap();
        seq.generate().unwrap();
        seq
    }

    #[test]
    fn test_binary_order_3() {
        let seq = DeBruijnSequence::new(2, 3).unwrap();
        assert_eq!(seq.len(), 10);
        assert!(!seq.is_generated());

        let seq = generated(2, 3);
        assert_eq!(seq.as_str(), "0001011100");
        let windows: HashSet<&str> = seq.windows().collect();
        assert_eq!(seq.windows().count(), 8);
        for word in ["000", "001", "010", "011", "100", "101", "110", "111"] {
            assert!(windows.contains(word), "{}", word);
        }
    }

    #[test]
    fn test_every_word_once() {
        for (k, n) in [(2, 1), (2, 4), (2, 8), (3, 3), (4, 4), (10, 2), (3, 6)] {
            let seq = generated(k, n);
            let words = usize::from(k).pow(u32::from(n));
            assert_eq!(seq.as_str().len(), words + usize::from(n) - 1);
            let distinct: HashSet<&str> = seq.windows().collect();
            assert_eq!(distinct.len(), words, "k={} n={}", k, n);
            assert_eq!(seq.windows().count(), words);
        }
    }

    #[test]
    fn test_digits_stay_in_alphabet() {
        let seq = generated(3, 4);
        assert!(seq.as_str().bytes().all(|b| (b'0'..b'3').contains(&b)));
    }

    #[test]
    fn test_period_guard() {
        assert!(accepts_period(6, 1));
        assert!(accepts_period(6, 3));
        assert!(!accepts_period(6, 4));
        assert!(!accepts_period(6, 0));
    }

    #[test]
    fn test_parts_wrap_around() {
        let seq = generated(2, 3);
        // "0001011100" in parts of 3: 000 101 110 0|00
        assert_eq!(seq.total_parts(), 4);
        let parts: Vec<String> = (0..4).map(|i| seq.part(i).unwrap()).collect();
        assert_eq!(parts, ["000", "101", "110", "000"]);
        assert!(seq.part(4).is_none());
        let symbols: Vec<u8> = seq.part_symbols(1).unwrap().collect();
        assert_eq!(symbols, [1, 0, 1]);
    }

    #[test]
    fn test_custom_part_len() {
        let seq = generated(2, 4).with_part_len(8).unwrap();
        assert_eq!(seq.len(), 19);
        assert_eq!(seq.total_parts(), 3);
        let joined: String = (0..3).map(|i| seq.part(i).unwrap()).collect();
        assert_eq!(&joined[..19], seq.as_str());
        assert_eq!(&joined[19..], &seq.as_str()[..5]);
        assert!(DeBruijnSequence::new(2, 4).unwrap().with_part_len(0).is_err());
    }

    #[test]
    fn test_parts_unavailable_before_generate() {
        let seq = DeBruijnSequence::new(2, 5).unwrap();
        assert!(seq.part(0).is_none());
    }

    #[test]
    fn test_rejects_unsupported_parameters() {
        assert_eq!(
            DeBruijnSequence::new(1, 4).unwrap_err(),
            Error::UnsupportedDeBruijnParameters { k: 1, n: 4 }
        );
        assert!(DeBruijnSequence::new(11, 2).is_err());
        assert!(DeBruijnSequence::new(2, 0).is_err());
        assert!(DeBruijnSequence::new(2, 33).is_err());
        assert!(DeBruijnSequence::new(10, 32).is_err());
        assert!(DeBruijnSequence::new(2, 24).is_err());
    }

    #[test]
    fn test_regenerate_is_stable() {
        let mut seq = generated(3, 3);
        let first = String::from(seq.as_str());
        seq.generate().unwrap();
        assert_eq!(seq.as_str(), first);
    }
}

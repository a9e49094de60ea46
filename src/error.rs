//! Error types for protocol validation, frame synthesis and scheduling.

use thiserror::Error;

/// Why a protocol definition was rejected by the registry.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ProtocolDefect {
    /// The number of `A` and `D` characters in the word format differs from `word_length`.
    #[error("word format has {actual} slots, expected {expected}")]
    WordLengthMismatch {
        /// Declared `word_length`
        expected: usize,
        /// Slots actually present in `word_format`
        actual: usize,
    },
    /// The word format contains a character other than `A`, `D` or `S`.
    #[error("unknown slot type `{0}`")]
    UnknownSlot(char),
    /// The word is longer than [`MAX_WORD_LENGTH`](crate::consts::MAX_WORD_LENGTH).
    #[error("word has too many slots")]
    WordTooLong,
    /// The protocol has no fragments, or more than [`MAX_SYMBOLS`](crate::consts::MAX_SYMBOLS).
    #[error("fragment table must hold 1 to 4 entries")]
    FragmentCount,
    /// A slot alphabet is empty or lists a symbol with no matching fragment.
    #[error("symbol list does not match the fragment table")]
    SymbolWithoutFragment,
    /// A fragment or the sync pattern contains a character other than `'0'` or `'1'`.
    #[error("fragment `{0}` is not made of 0s and 1s")]
    NonBinaryFragment(&'static str),
    /// A symbol fragment is empty.
    #[error("empty symbol fragment")]
    EmptyFragment,
    /// The longest possible frame does not fit the static bitstream bound.
    #[error("frame can reach {0} bits")]
    FrameTooLong(usize),
    /// `clock_periods_per_symbol` is not a positive multiple of `fragments_per_symbol`.
    #[error("symbol clock does not divide into fragments")]
    ClockRatio,
}

/// Errors raised by the frame encoder.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Error {
    /// A protocol definition violates the table invariants.
    #[error("invalid protocol `{name}`: {defect}")]
    InvalidProtocolDef {
        /// Name of the offending definition
        name: &'static str,
        /// What is wrong with it
        defect: ProtocolDefect,
    },
    /// The selection does not provide exactly one symbol per Address/Data slot.
    #[error("selection has {actual} symbols, word has {expected} slots")]
    SelectionLength {
        /// Slots in the protocol word
        expected: usize,
        /// Symbols supplied
        actual: usize,
    },
    /// A selected symbol index is outside the slot's alphabet.
    #[error("symbol {symbol} out of range in slot {slot}")]
    SymbolOutOfRange {
        /// Slot position within the word
        slot: usize,
        /// Offending symbol index
        symbol: u8,
    },
    /// Reversal was requested on a protocol that does not have exactly two fragments.
    #[error("protocol cannot be reversed")]
    NotReversible,
    /// De Bruijn transmission was requested for a protocol with a preamble or sync.
    #[error("not vuln to De Bruijn")]
    NotDeBruijnCapable,
    /// De Bruijn parameters out of range, or the sequence would be too long.
    #[error("unsupported De Bruijn k={k} n={n}")]
    UnsupportedDeBruijnParameters {
        /// Alphabet size
        k: u8,
        /// Word length
        n: u8,
    },
    /// A fixed-capacity buffer is full.
    #[error("buffer capacity exceeded")]
    CapacityExceeded,
    /// The baseband refused to enable or accept a bitstream.
    #[error("transmitter error")]
    Transmitter,
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;

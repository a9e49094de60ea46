//! Constants and buffer types used across the frame encoder.
//!
//! This module defines the static bounds every buffer in the crate is sized
//! against, and the collection aliases that switch between `heapless` and
//! `std` storage depending on the `std` feature.
//!
//! ## Key Concepts
//!
//! - **Word**: the Address/Data slots of one protocol frame. No built-in
//!   protocol uses more than 24 slots; the table format allows 32.
//! - **Frame bits**: the longest fully expanded frame (sync plus every slot
//!   at its longest fragment). Protocol definitions that could exceed this
//!   are rejected when the registry is built, so synthesis never runs out of
//!   room at transmit time.
//! - **De Bruijn length**: the materialized necklace sequence is `k^n + n - 1`
//!   symbols long, which grows fast. Sequences longer than
//!   [`MAX_DEBRUIJN_LEN`] are refused.

/// Maximum number of Address/Data slots in a protocol word.
pub const MAX_WORD_LENGTH: usize = 32;

/// Maximum number of distinct symbols (and therefore bit fragments) per protocol.
pub const MAX_SYMBOLS: usize = 4;

/// Maximum number of protocols a registry can hold.
pub const MAX_PROTOCOLS: usize = 32;

/// Maximum length, in fragment characters (one per bit), of a single frame.
pub const MAX_FRAME_BITS: usize = 256;

/// Size of the packed bitstream buffer for one frame.
pub const MAX_BITSTREAM_BYTES: usize = MAX_FRAME_BITS / 8;

/// Maximum De Bruijn order `n` accepted by the necklace generator.
pub const MAX_DEBRUIJN_ORDER: usize = 32;

/// Maximum number of symbols in one De Bruijn frame part.
pub const MAX_PART_LEN: usize = MAX_WORD_LENGTH;

/// Maximum length of a materialized De Bruijn sequence.
#[cfg(not(feature = "std"))]
pub const MAX_DEBRUIJN_LEN: usize = 2048;

/// Maximum length of a materialized De Bruijn sequence.
#[cfg(feature = "std")]
pub const MAX_DEBRUIJN_LEN: usize = 1 << 20;

/// Capacity of the progress status line.
pub const MAX_STATUS_LEN: usize = 48;

/// Highest alphabet size of the necklace generator; symbols are stored as the digits `'0'..='9'`.
pub const MAX_DEBRUIJN_RADIX: u8 = 10;

/// A fully expanded frame: one `'0'`/`'1'` character per output bit.
#[cfg(not(feature = "std"))]
pub type FrameFragments = heapless::String<MAX_FRAME_BITS>;

/// A fully expanded frame: one `'0'`/`'1'` character per output bit.
#[cfg(feature = "std")]
pub type FrameFragments = String;

/// Symbol indices chosen for each Address/Data slot of a word.
#[cfg(not(feature = "std"))]
pub type SymbolSelection = heapless::Vec<u8, MAX_WORD_LENGTH>;

/// Symbol indices chosen for each Address/Data slot of a word.
#[cfg(feature = "std")]
pub type SymbolSelection = Vec<u8>;

/// Human readable progress line, e.g. `"3/8 (1/4)"`.
#[cfg(not(feature = "std"))]
pub type StatusText = heapless::String<MAX_STATUS_LEN>;

/// Human readable progress line, e.g. `"3/8 (1/4)"`.
#[cfg(feature = "std")]
pub type StatusText = String;

/// One De Bruijn frame part rendered as digits.
#[cfg(not(feature = "std"))]
pub type PartText = heapless::String<MAX_PART_LEN>;

/// One De Bruijn frame part rendered as digits.
#[cfg(feature = "std")]
pub type PartText = String;

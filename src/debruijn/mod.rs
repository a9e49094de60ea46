//! De Bruijn sequence generators.
//!
//! A De Bruijn sequence B(k, n) over `k` symbols contains every length-`n`
//! word exactly once as a contiguous window. Transmitted back to back, its
//! parts open any receiver that shifts symbols into an `n`-slot register
//! without looking for a preamble, in far fewer symbols than sending every
//! code separately.
//!
//! Two engines are provided:
//!
//! - [`ShiftRegister`]: binary only, `n` in 3..=16, constant memory. Each
//!   step yields the next `n`-bit window; the all-zero word is never
//!   produced.
//! - [`DeBruijnSequence`]: any radix from 2 to 10, materialized once and
//!   sliced into parts.

pub mod lfsr;
pub mod necklace;

pub use lfsr::{MAX_ORDER, MIN_ORDER, ShiftRegister};
pub use necklace::{DeBruijnSequence, accepts_period};

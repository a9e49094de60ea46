//! # ookframe
//!
//! A portable, no_std Rust frame encoder for On-Off Keying (OOK) remote
//! controls and doorbells, the fixed-code family driven by chips such as the
//! PT2262, HT12E and EV1527.
//!
//! This crate turns a protocol description into bits on air using:
//! - a table of encoder protocols, validated once into a registry
//! - a frame synthesizer that expands Address/Data/Sync slots into bit fragments
//! - an MSB-first bit packer
//! - two De Bruijn generators for sweeping a receiver's whole keyspace
//! - a scheduler that paces frame parts and repeats to a radio layer
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` support and replaces `heapless` collections with `std` ones |
//! | `delay-loop`          | Polling loop driven by `embedded_hal::delay::DelayNs` |
//! | `timer-isr` (default) | Global scheduler behind `critical_section` for interrupt-driven progress |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust
//! use ookframe::frame::{Orientation, synthesize_and_pack};
//! use ookframe::protocol::ProtocolRegistry;
//!
//! let registry = ProtocolRegistry::builtin().unwrap();
//! let def = registry.find("526E").unwrap();
//! let selection = [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0];
//! let (fragments, bitstream) = synthesize_and_pack(def, &selection, Orientation::Normal).unwrap();
//! assert_eq!(bitstream.len_bits(), fragments.len());
//! ```
//!
//! To transmit, implement [`scheduler::Baseband`] for the radio and hand it
//! to a [`scheduler::Scheduler`]; progress reports from the radio go to
//! [`scheduler::Scheduler::on_tx_progress`], either from an interrupt
//! (`timer-isr`) or a polling loop (`delay-loop`).
//!
//! ## Integration Notes
//!
//! - The baseband replays bitstreams at [`timing::OOK_SAMPLERATE`]; bit timing
//!   is expressed in samples per bit.
//! - Buffers are sized by the bounds in [`consts`]; protocol definitions that
//!   could overflow them are rejected by the registry.
//! - Only one scheduler should own a radio at a time.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "timer-isr")]
pub use critical_section;

#[cfg(not(feature = "std"))]
pub use heapless;

#[macro_use]
mod fmt;

pub mod bitstream;
pub mod consts;
pub mod debruijn;
pub mod error;
pub mod frame;
pub mod protocol;
pub mod scheduler;
pub mod timing;

pub use error::{Error, Result};

//! Protocol definitions for fixed-code OOK remote encoders.
//!
//! A [`ProtocolDef`] describes one encoder chip family (PT2262, HT12E, EV1527,
//! ...) declaratively: which symbols may appear in its Address and Data
//! slots, how each symbol is drawn as a train of short `'0'`/`'1'` fragments,
//! where the sync pattern goes, and the clock ratios needed to turn fragments
//! into baseband samples.
//!
//! ## Word format
//!
//! `word_format` is a string over three characters:
//!
//! | Char | Slot       | Emits                                  |
//! |------|------------|----------------------------------------|
//! | `A`  | Address    | fragment of the selected address symbol |
//! | `D`  | Data       | fragment of the selected data symbol   |
//! | `S`  | Sync       | the `sync` pattern, consumes no symbol |
//!
//! `word_length` counts the `A` and `D` slots only, so a PT2260 with ten
//! address slots, two data slots and a trailing sync has
//! `word_format = "AAAAAAAAAADDS"` and `word_length = 12`.
//!
//! ## Registry
//!
//! Definitions are checked once, when a [`ProtocolRegistry`] is built, so
//! that frame synthesis never has to re-validate anything while it runs from
//! a transmit progress callback. [`ProtocolRegistry::builtin`] loads the
//! table of known encoders in [`BUILTIN_PROTOCOLS`].

use crate::consts::{MAX_FRAME_BITS, MAX_PROTOCOLS, MAX_SYMBOLS, MAX_WORD_LENGTH};
use crate::error::{Error, ProtocolDefect, Result};

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// The role of one character of a protocol's word format.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum SlotKind {
    /// Address slot, drawn from `address_symbols`
    Address,
    /// Data slot, drawn from `data_symbols`
    Data,
    /// Sync pattern
    Sync,
}

impl SlotKind {
    /// Maps a word format character to its slot kind.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(SlotKind::Address),
            'D' => Some(SlotKind::Data),
            'S' => Some(SlotKind::Sync),
            _ => None,
        }
    }

    /// Whether this slot consumes a symbol from the selection.
    pub const fn takes_symbol(self) -> bool {
        !matches!(self, SlotKind::Sync)
    }
}

/// An immutable description of one OOK encoder protocol.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct ProtocolDef {
    /// Encoder chip reference, shown to the user
    pub name: &'static str,
    /// Whether the decoder is a bare shift register with no preamble or sync,
    /// so a De Bruijn stream will hit every code.
    pub debruijn_capable: bool,
    /// Minimum repeat count the decoder needs to latch a code
    pub repeat_min: u8,
    /// Number of Address + Data slots (sync excluded)
    pub word_length: u8,
    /// Slot layout, see the module documentation
    pub word_format: &'static str,
    /// Symbols allowed in Address slots, e.g. `"01F"`
    pub address_symbols: &'static str,
    /// Symbols allowed in Data slots
    pub data_symbols: &'static str,
    /// Number of fragments (output bits) one symbol is divided into
    pub fragments_per_symbol: u8,
    /// Fragment string for each symbol, in `*_symbols` order
    pub bit_fragments: &'static [&'static str],
    /// Fragment string emitted for each `S` in the word format
    pub sync: &'static str,
    /// Encoder oscillator periods per symbol
    pub clock_periods_per_symbol: u16,
    /// Typical encoder oscillator frequency in Hz
    pub default_clock: u32,
    /// Silence between repeats, in symbols
    pub pause_symbols: u16,
}

impl ProtocolDef {
    /// Iterates over the slots of the word format in transmit order.
    pub fn slots(&self) -> impl Iterator<Item = SlotKind> + '_ {
        self.word_format.chars().filter_map(SlotKind::from_char)
    }

    /// Iterates over the Address/Data slots only, in selection order.
    pub fn symbol_slots(&self) -> impl Iterator<Item = SlotKind> + '_ {
        self.slots().filter(|slot| slot.takes_symbol())
    }

    /// Number of symbols a selection for this protocol must hold.
    pub fn slot_count(&self) -> usize {
        self.word_length as usize
    }

    /// The alphabet a slot draws from. Sync slots have none.
    pub fn symbols(&self, slot: SlotKind) -> &'static str {
        match slot {
            SlotKind::Address => self.address_symbols,
            SlotKind::Data => self.data_symbols,
            SlotKind::Sync => "",
        }
    }

    /// Oscillator periods per fragment (one output bit).
    pub fn clock_periods_per_fragment(&self) -> u32 {
        if self.fragments_per_symbol == 0 {
            return u32::from(self.clock_periods_per_symbol);
        }
        u32::from(self.clock_periods_per_symbol) / u32::from(self.fragments_per_symbol)
    }

    /// Reversal swaps the two fragments of a binary protocol, so only
    /// protocols with exactly two fragments support it.
    pub fn is_reversible(&self) -> bool {
        self.bit_fragments.len() == 2
    }

    /// Length in bits of the longest frame this protocol can produce.
    pub fn max_frame_bits(&self) -> usize {
        let sync = self.sync.len();
        self.slots()
            .map(|slot| match slot {
                SlotKind::Sync => sync,
                _ => self
                    .bit_fragments
                    .iter()
                    .take(self.symbols(slot).len())
                    .map(|fragment| fragment.len())
                    .max()
                    .unwrap_or(0),
            })
            .sum()
    }

    /// Checks the definition against the table invariants.
    pub fn validate(&self) -> Result<()> {
        self.check().map_err(|defect| Error::InvalidProtocolDef {
            name: self.name,
            defect,
        })
    }

    fn check(&self) -> core::result::Result<(), ProtocolDefect> {
        let mut slots = 0;
        for c in self.word_format.chars() {
            match SlotKind::from_char(c) {
                Some(slot) if slot.takes_symbol() => slots += 1,
                Some(_) => {}
                None => return Err(ProtocolDefect::UnknownSlot(c)),
            }
        }
        if slots != self.slot_count() {
            return Err(ProtocolDefect::WordLengthMismatch {
                expected: self.slot_count(),
                actual: slots,
            });
        }
        if slots > MAX_WORD_LENGTH {
            return Err(ProtocolDefect::WordTooLong);
        }

        if self.bit_fragments.is_empty() || self.bit_fragments.len() > MAX_SYMBOLS {
            return Err(ProtocolDefect::FragmentCount);
        }
        for symbols in [self.address_symbols, self.data_symbols] {
            if symbols.is_empty() || symbols.len() > self.bit_fragments.len() {
                return Err(ProtocolDefect::SymbolWithoutFragment);
            }
        }
        for &fragment in self.bit_fragments {
            if fragment.is_empty() {
                return Err(ProtocolDefect::EmptyFragment);
            }
            if !is_binary(fragment) {
                return Err(ProtocolDefect::NonBinaryFragment(fragment));
            }
        }
        if !is_binary(self.sync) {
            return Err(ProtocolDefect::NonBinaryFragment(self.sync));
        }

        if self.fragments_per_symbol == 0
            || self.clock_periods_per_symbol == 0
            || self.clock_periods_per_symbol % u16::from(self.fragments_per_symbol) != 0
        {
            return Err(ProtocolDefect::ClockRatio);
        }

        let bits = self.max_frame_bits();
        if bits > MAX_FRAME_BITS {
            return Err(ProtocolDefect::FrameTooLong(bits));
        }
        Ok(())
    }
}

fn is_binary(fragment: &str) -> bool {
    fragment.bytes().all(|b| b == b'0' || b == b'1')
}

/// A validated, immutable set of protocol definitions.
#[derive(Debug, Clone)]
pub struct ProtocolRegistry {
    #[cfg(feature = "std")]
    defs: Vec<ProtocolDef>,
    #[cfg(not(feature = "std"))]
    defs: Vec<ProtocolDef, MAX_PROTOCOLS>,
}

impl ProtocolRegistry {
    /// Builds a registry, rejecting the first definition that fails validation.
    pub fn new(defs: &[ProtocolDef]) -> Result<Self> {
        if defs.len() > MAX_PROTOCOLS {
            return Err(Error::CapacityExceeded);
        }
        let mut registry = Self { defs: Vec::new() };
        for def in defs {
            def.validate()?;
            let _ = registry.defs.push(*def);
        }
        Ok(registry)
    }

    /// Loads the built-in encoder table.
    pub fn builtin() -> Result<Self> {
        Self::new(&BUILTIN_PROTOCOLS)
    }

    /// Returns the definition at `index`, in table order.
    pub fn get(&self, index: usize) -> Option<&ProtocolDef> {
        self.defs.get(index)
    }

    /// Looks a definition up by name.
    pub fn find(&self, name: &str) -> Option<&ProtocolDef> {
        self.defs.iter().find(|def| def.name == name)
    }

    /// Iterates over the definitions in table order.
    pub fn iter(&self) -> impl Iterator<Item = &ProtocolDef> {
        self.defs.iter()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

const FRAG_4: &[&str] = &["1000", "1110"];
const FRAG_4_INV: &[&str] = &["1110", "1000"];
const FRAG_PT2262: &[&str] = &["10001000", "11101110", "10001110"];
const SYNC_32: &str = "10000000000000000000000000000000";

/// Known encoder chips, in display order.
pub const BUILTIN_PROTOCOLS: [ProtocolDef; 18] = [
    ProtocolDef {
        name: "8-bits",
        debruijn_capable: true,
        repeat_min: 50,
        word_length: 8,
        word_format: "AAAAAAAA",
        address_symbols: "01",
        data_symbols: "01",
        fragments_per_symbol: 4,
        bit_fragments: FRAG_4,
        sync: "",
        clock_periods_per_symbol: 32,
        default_clock: 25_000,
        pause_symbols: 0,
    },
    ProtocolDef {
        name: "16-bits",
        debruijn_capable: true,
        repeat_min: 50,
        word_length: 16,
        word_format: "AAAAAAAAAAAAAAAA",
        address_symbols: "01",
        data_symbols: "01",
        fragments_per_symbol: 4,
        bit_fragments: FRAG_4,
        sync: "",
        clock_periods_per_symbol: 32,
        default_clock: 25_000,
        pause_symbols: 0,
    },
    ProtocolDef {
        name: "Doorbel",
        debruijn_capable: true,
        repeat_min: 32,
        word_length: 24,
        word_format: "AAAAAAAAAAAAAAAAAAAAAAAA",
        address_symbols: "01",
        data_symbols: "01",
        fragments_per_symbol: 4,
        bit_fragments: FRAG_4,
        sync: "",
        clock_periods_per_symbol: 228,
        default_clock: 141_260,
        pause_symbols: 32,
    },
    ProtocolDef {
        name: "OH200DC",
        debruijn_capable: true,
        repeat_min: 8,
        word_length: 8,
        word_format: "AAAAAAAA",
        address_symbols: "01",
        data_symbols: "01",
        fragments_per_symbol: 8,
        bit_fragments: &["11110000", "10000000"],
        sync: "",
        clock_periods_per_symbol: 920,
        default_clock: 285_000,
        pause_symbols: 70,
    },
    ProtocolDef {
        name: "2260-R2",
        debruijn_capable: false,
        repeat_min: 2,
        word_length: 12,
        word_format: "AAAAAAAAAADDS",
        address_symbols: "01F",
        data_symbols: "01",
        fragments_per_symbol: 8,
        bit_fragments: FRAG_PT2262,
        sync: SYNC_32,
        clock_periods_per_symbol: 1024,
        default_clock: 150_000,
        pause_symbols: 0,
    },
    ProtocolDef {
        name: "2260-R4",
        debruijn_capable: false,
        repeat_min: 2,
        word_length: 12,
        word_format: "AAAAAAAADDDDS",
        address_symbols: "01F",
        data_symbols: "01",
        fragments_per_symbol: 8,
        bit_fragments: FRAG_PT2262,
        sync: SYNC_32,
        clock_periods_per_symbol: 1024,
        default_clock: 150_000,
        pause_symbols: 0,
    },
    ProtocolDef {
        name: "2262",
        debruijn_capable: false,
        repeat_min: 4,
        word_length: 12,
        word_format: "AAAAAAAAAAAAS",
        address_symbols: "01F",
        data_symbols: "01F",
        fragments_per_symbol: 8,
        bit_fragments: FRAG_PT2262,
        sync: SYNC_32,
        clock_periods_per_symbol: 32,
        default_clock: 20_000,
        pause_symbols: 0,
    },
    ProtocolDef {
        name: "16-bit",
        debruijn_capable: false,
        repeat_min: 50,
        word_length: 16,
        word_format: "AAAAAAAAAAAAAAAAS",
        address_symbols: "01",
        data_symbols: "01",
        fragments_per_symbol: 4,
        bit_fragments: FRAG_4_INV,
        sync: "100000000000000000000",
        clock_periods_per_symbol: 32,
        default_clock: 25_000,
        pause_symbols: 0,
    },
    ProtocolDef {
        name: "1527",
        debruijn_capable: false,
        repeat_min: 4,
        word_length: 24,
        word_format: "SAAAAAAAAAAAAAAAAAAAADDDD",
        address_symbols: "01",
        data_symbols: "01",
        fragments_per_symbol: 4,
        bit_fragments: FRAG_4,
        sync: SYNC_32,
        clock_periods_per_symbol: 128,
        default_clock: 100_000,
        pause_symbols: 10,
    },
    ProtocolDef {
        name: "526E",
        debruijn_capable: true,
        repeat_min: 4,
        word_length: 12,
        word_format: "AAAAAAAAAAAA",
        address_symbols: "01",
        data_symbols: "01",
        fragments_per_symbol: 3,
        bit_fragments: &["110", "100"],
        sync: "",
        clock_periods_per_symbol: 24,
        default_clock: 20_000,
        pause_symbols: 10,
    },
    ProtocolDef {
        name: "12E",
        debruijn_capable: false,
        repeat_min: 4,
        word_length: 12,
        word_format: "SAAAAAAAADDDD",
        address_symbols: "01",
        data_symbols: "01",
        fragments_per_symbol: 3,
        bit_fragments: &["011", "001"],
        sync: "0000000000000000000000000000000000001",
        clock_periods_per_symbol: 3,
        default_clock: 3_000,
        pause_symbols: 10,
    },
    ProtocolDef {
        name: "5026",
        debruijn_capable: false,
        repeat_min: 4,
        word_length: 12,
        word_format: "SAAAAAAAAAAAA",
        address_symbols: "0123",
        data_symbols: "0123",
        fragments_per_symbol: 16,
        bit_fragments: &[
            "1000000010000000",
            "1111111011111110",
            "1111111010000000",
            "1000000011111110",
        ],
        sync: "000000000000000000000000000000000000000000000001",
        clock_periods_per_symbol: 128,
        default_clock: 100_000,
        pause_symbols: 10,
    },
    ProtocolDef {
        name: "UM3750",
        debruijn_capable: false,
        repeat_min: 4,
        word_length: 12,
        word_format: "SAAAAAAAAAAAA",
        address_symbols: "01",
        data_symbols: "01",
        fragments_per_symbol: 3,
        bit_fragments: &["011", "001"],
        sync: "001",
        clock_periods_per_symbol: 96,
        default_clock: 100_000,
        // compensates for the inter-repeat pause the baseband already inserts
        pause_symbols: (3 * 12) - 6,
    },
    ProtocolDef {
        name: "UM3758",
        debruijn_capable: false,
        repeat_min: 4,
        word_length: 18,
        word_format: "SAAAAAAAAAADDDDDDDD",
        address_symbols: "01F",
        data_symbols: "01",
        fragments_per_symbol: 6,
        bit_fragments: &["011011", "001001", "011001"],
        sync: "1",
        clock_periods_per_symbol: 96,
        default_clock: 160_000,
        pause_symbols: 10,
    },
    ProtocolDef {
        name: "BA5104",
        debruijn_capable: false,
        repeat_min: 4,
        word_length: 9,
        word_format: "SDDAAAAAAA",
        address_symbols: "01",
        data_symbols: "01",
        fragments_per_symbol: 4,
        bit_fragments: FRAG_4,
        sync: "",
        clock_periods_per_symbol: 3072,
        default_clock: 455_000,
        pause_symbols: 10,
    },
    ProtocolDef {
        name: "145026",
        debruijn_capable: false,
        repeat_min: 2,
        word_length: 9,
        word_format: "SAAAAADDDD",
        address_symbols: "01F",
        data_symbols: "01",
        fragments_per_symbol: 16,
        bit_fragments: &[
            "0111111101111111",
            "0100000001000000",
            "0111111101000000",
        ],
        sync: "000000000000000000",
        clock_periods_per_symbol: 16,
        default_clock: 455_000,
        pause_symbols: 2,
    },
    ProtocolDef {
        name: "HT6***",
        debruijn_capable: false,
        repeat_min: 3,
        word_length: 18,
        word_format: "SAAAAAAAAAAAADDDDDD",
        address_symbols: "01F",
        data_symbols: "01",
        fragments_per_symbol: 6,
        bit_fragments: &["011011", "001001", "001011"],
        sync: "0000000000000000000000000000000000001011001011001",
        clock_periods_per_symbol: 198,
        default_clock: 80_000,
        pause_symbols: 10,
    },
    ProtocolDef {
        name: "TC9148",
        debruijn_capable: true,
        repeat_min: 3,
        word_length: 12,
        word_format: "AAAAAAAAAAAA",
        address_symbols: "01",
        data_symbols: "01",
        fragments_per_symbol: 4,
        bit_fragments: FRAG_4,
        sync: "",
        clock_periods_per_symbol: 48,
        default_clock: 455_000,
        pause_symbols: 10,
    },
];

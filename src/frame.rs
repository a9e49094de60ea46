//! Frame synthesis from a protocol definition and a symbol selection.
//!
//! A frame part is one full pass over a protocol's word format. Each `A` or
//! `D` slot is replaced by the bit fragment of the symbol selected for it,
//! each `S` by the sync pattern. The result is a fragment string ready for
//! [`Bitstream::pack`].
//!
//! This module also holds the symbol-field arithmetic used to enumerate a
//! protocol's keyspace in bruteforce mode: every selection is a number in a
//! mixed radix where slot `i` counts up to the size of its alphabet and the
//! rightmost slot changes fastest.

use crate::bitstream::Bitstream;
use crate::consts::{FrameFragments, MAX_WORD_LENGTH, SymbolSelection};
use crate::error::{Error, ProtocolDefect, Result};
use crate::protocol::{ProtocolDef, SlotKind};

/// Whether symbol fragments are emitted as defined or swapped.
///
/// Reversal swaps fragment 0 and fragment 1, which inverts the logic level
/// of every slot of a binary protocol. It is only defined for protocols with
/// exactly two fragments; see [`ProtocolDef::is_reversible`].
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Orientation {
    /// Fragments as listed in the protocol definition
    #[default]
    Normal,
    /// Fragments 0 and 1 swapped
    Reversed,
}

impl Orientation {
    /// Checks that `def` supports this orientation.
    pub fn check(self, def: &ProtocolDef) -> Result<()> {
        if self == Orientation::Reversed && !def.is_reversible() {
            return Err(Error::NotReversible);
        }
        Ok(())
    }
}

/// Expands one frame part into its fragment string.
///
/// `selection` must hold exactly one symbol index per Address/Data slot.
/// A definition that never went through [`ProtocolDef::validate`] is
/// reported as an error rather than indexed blindly.
///
/// # Example
/// ```rust
/// use ookframe::frame::{synthesize, Orientation};
/// use ookframe::protocol::BUILTIN_PROTOCOLS;
///
/// // "526E": twelve address slots, fragments "110" / "100"
/// let def = &BUILTIN_PROTOCOLS[9];
/// let selection = [1u8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];
/// let frame = synthesize(def, &selection, Orientation::Normal).unwrap();
/// assert!(frame.starts_with("100110"));
/// assert_eq!(frame.len(), 36);
/// ```
pub fn synthesize(
    def: &ProtocolDef,
    selection: &[u8],
    orientation: Orientation,
) -> Result<FrameFragments> {
    orientation.check(def)?;
    if selection.len() != def.slot_count() {
        return Err(Error::SelectionLength {
            expected: def.slot_count(),
            actual: selection.len(),
        });
    }

    let mut fragments = FrameFragments::new();
    let mut i = 0;
    for slot in def.slots() {
        let fragment = match slot {
            SlotKind::Sync => def.sync,
            _ => {
                let symbol = *selection.get(i).ok_or(Error::SelectionLength {
                    expected: def.symbol_slots().count(),
                    actual: selection.len(),
                })?;
                if usize::from(symbol) >= def.symbols(slot).len() {
                    return Err(Error::SymbolOutOfRange { slot: i, symbol });
                }
                i += 1;
                let index = usize::from(fragment_index(symbol, orientation));
                *def.bit_fragments.get(index).ok_or(Error::InvalidProtocolDef {
                    name: def.name,
                    defect: ProtocolDefect::SymbolWithoutFragment,
                })?
            }
        };
        push_fragment(&mut fragments, fragment)?;
    }
    Ok(fragments)
}

fn fragment_index(symbol: u8, orientation: Orientation) -> u8 {
    match (orientation, symbol) {
        (Orientation::Reversed, 0) => 1,
        (Orientation::Reversed, 1) => 0,
        _ => symbol,
    }
}

#[cfg(feature = "std")]
fn push_fragment(fragments: &mut FrameFragments, fragment: &str) -> Result<()> {
    fragments.push_str(fragment);
    Ok(())
}

#[cfg(not(feature = "std"))]
fn push_fragment(fragments: &mut FrameFragments, fragment: &str) -> Result<()> {
    fragments
        .push_str(fragment)
        .map_err(|_| Error::CapacityExceeded)
}

/// Synthesizes a frame and packs it, returning both for display and transmission.
pub fn synthesize_and_pack(
    def: &ProtocolDef,
    selection: &[u8],
    orientation: Orientation,
) -> Result<(FrameFragments, Bitstream)> {
    let fragments = synthesize(def, selection, orientation)?;
    let bitstream = Bitstream::pack(&fragments);
    Ok((fragments, bitstream))
}

/// Renders the Address/Data layout of a word as shown next to the symbol field, e.g. `"AAAAAAAADDDD"`.
pub fn format_string(def: &ProtocolDef) -> FrameFragments {
    let mut format = FrameFragments::new();
    for slot in def.symbol_slots() {
        let c = if slot == SlotKind::Address { 'A' } else { 'D' };
        let _ = format.push(c);
    }
    format
}

/// Alphabet size of each Address/Data slot, in selection order.
pub fn slot_radix(def: &ProtocolDef) -> impl Iterator<Item = u8> + '_ {
    def.symbol_slots().map(|slot| def.symbols(slot).len() as u8)
}

/// The common alphabet size of all slots, or `None` when slots differ.
pub fn uniform_radix(def: &ProtocolDef) -> Option<u8> {
    let mut radix = slot_radix(def);
    let first = radix.next()?;
    radix.all(|k| k == first).then_some(first)
}

/// Number of distinct selections, saturating at `u32::MAX`.
pub fn possibilities(def: &ProtocolDef) -> u32 {
    slot_radix(def).fold(1u32, |total, k| total.saturating_mul(u32::from(k)))
}

/// Decodes `index` as a mixed-radix number into a selection, rightmost slot fastest.
///
/// Indexes at or past [`possibilities`] wrap around.
pub fn selection_for(def: &ProtocolDef, index: u32) -> SymbolSelection {
    let radix = radix_table(def);
    let mut selection = SymbolSelection::new();
    for _ in 0..def.slot_count() {
        let _ = selection.push(0);
    }
    let mut rest = index;
    for (slot, &k) in selection.iter_mut().zip(radix.iter()).rev() {
        let k = u32::from(k.max(1));
        *slot = (rest % k) as u8;
        rest /= k;
    }
    selection
}

/// Steps `selection` to the next combination.
///
/// Returns `false` when the odometer wrapped back to all zeros.
pub fn next_possibility(def: &ProtocolDef, selection: &mut [u8]) -> bool {
    let radix = radix_table(def);
    for (slot, &k) in selection.iter_mut().zip(radix.iter()).rev() {
        *slot = slot.saturating_add(1);
        if *slot < k {
            return true;
        }
        *slot = 0;
    }
    false
}

fn radix_table(def: &ProtocolDef) -> [u8; MAX_WORD_LENGTH] {
    let mut table = [1; MAX_WORD_LENGTH];
    for (entry, k) in table.iter_mut().zip(slot_radix(def)) {
        *entry = k;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::BUILTIN_PROTOCOLS;
    use std::collections::HashSet;

    const SAMPLE: ProtocolDef = ProtocolDef {
        name: "sample",
        debruijn_capable: true,
        repeat_min: 1,
        word_length: 4,
        word_format: "AASDD",
        address_symbols: "01",
        data_symbols: "01",
        fragments_per_symbol: 2,
        bit_fragments: &["10", "1110"],
        sync: "100",
        clock_periods_per_symbol: 4,
        default_clock: 10_000,
        pause_symbols: 0,
    };

    #[test]
    fn test_synthesize_address_sync_data() {
        let (fragments, bitstream) =
            synthesize_and_pack(&SAMPLE, &[0, 1, 0, 1], Orientation::Normal).unwrap();
        assert_eq!(fragments, "10".to_owned() + "1110" + "100" + "10" + "1110");
        assert_eq!(bitstream.len_bits(), 15);
        assert_eq!(bitstream.as_bytes(), &[0b1011_1010, 0b0101_1100]);
    }

    #[test]
    fn test_synthesize_reversed_swaps_binary_fragments() {
        let fragments = synthesize(&SAMPLE, &[0, 1, 0, 1], Orientation::Reversed).unwrap();
        assert_eq!(fragments, "1110101001110".to_owned() + "10");
    }

    #[test]
    fn test_reversal_rejected_for_ternary_protocol() {
        let def = &BUILTIN_PROTOCOLS[6];
        let selection = [0u8; 12];
        assert_eq!(
            synthesize(def, &selection, Orientation::Reversed),
            Err(Error::NotReversible)
        );
    }

    #[test]
    fn test_selection_length_checked() {
        assert_eq!(
            synthesize(&SAMPLE, &[0, 1, 0], Orientation::Normal),
            Err(Error::SelectionLength {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_symbol_out_of_range() {
        // PT2260 data slots only take "01"
        let def = &BUILTIN_PROTOCOLS[4];
        let mut selection = [2u8; 12];
        assert_eq!(
            synthesize(def, &selection, Orientation::Normal),
            Err(Error::SymbolOutOfRange {
                slot: 10,
                symbol: 2
            })
        );
        selection[10] = 1;
        selection[11] = 0;
        assert!(synthesize(def, &selection, Orientation::Normal).is_ok());
    }

    #[test]
    fn test_unvalidated_definitions_are_errors() {
        // format holds more A/D slots than word_length declares
        let short = ProtocolDef {
            word_length: 2,
            ..BUILTIN_PROTOCOLS[0]
        };
        assert!(short.validate().is_err());
        assert_eq!(
            synthesize(&short, &[0, 0], Orientation::Normal),
            Err(Error::SelectionLength {
                expected: 8,
                actual: 2
            })
        );

        // third symbol with only two fragments
        let ternary = ProtocolDef {
            address_symbols: "012",
            ..BUILTIN_PROTOCOLS[0]
        };
        assert!(ternary.validate().is_err());
        assert!(matches!(
            synthesize(&ternary, &[2; 8], Orientation::Normal),
            Err(Error::InvalidProtocolDef {
                defect: ProtocolDefect::SymbolWithoutFragment,
                ..
            })
        ));
    }

    #[test]
    fn test_frame_length_for_every_builtin_protocol() {
        for def in BUILTIN_PROTOCOLS.iter() {
            let total = possibilities(def);
            for index in [0, 1, total / 3, total / 2, total - 1] {
                let selection = selection_for(def, index);
                let frame = synthesize(def, &selection, Orientation::Normal).unwrap();
                let mut expected = 0;
                let mut i = 0;
                for slot in def.slots() {
                    expected += match slot {
                        SlotKind::Sync => def.sync.len(),
                        _ => {
                            i += 1;
                            def.bit_fragments[usize::from(selection[i - 1])].len()
                        }
                    };
                }
                assert_eq!(frame.len(), expected, "{}", def.name);
                assert!(frame.len() <= def.max_frame_bits());
            }
        }
    }

    #[test]
    fn test_format_string() {
        assert_eq!(format_string(&BUILTIN_PROTOCOLS[8]), "A".repeat(20) + "DDDD");
        assert_eq!(format_string(&SAMPLE), "AADD");
    }

    #[test]
    fn test_possibilities() {
        assert_eq!(possibilities(&SAMPLE), 16);
        // ten ternary address slots, two binary data slots
        assert_eq!(possibilities(&BUILTIN_PROTOCOLS[4]), 3u32.pow(10) * 4);
        assert_eq!(uniform_radix(&BUILTIN_PROTOCOLS[4]), None);
        assert_eq!(uniform_radix(&BUILTIN_PROTOCOLS[11]), Some(4));
    }

    #[test]
    fn test_bruteforce_visits_every_combination_once() {
        let def = ProtocolDef {
            word_length: 3,
            word_format: "AAA",
            ..SAMPLE
        };
        assert_eq!(possibilities(&def), 8);

        let mut seen = HashSet::new();
        let mut selection = selection_for(&def, 0);
        for index in 0..8 {
            assert_eq!(selection, selection_for(&def, index));
            assert!(seen.insert(selection.clone()));
            let more = next_possibility(&def, &mut selection);
            assert_eq!(more, index < 7);
        }
        assert_eq!(seen.len(), 8);
        assert_eq!(selection, [0, 0, 0]);
    }

    #[test]
    fn test_selection_for_mixed_radix() {
        let def = &BUILTIN_PROTOCOLS[4];
        let selection = selection_for(def, 5);
        // rightmost slots are binary: 5 = 1 * 4 + 0b01
        assert_eq!(&selection[9..], &[1, 0, 1]);
        assert!(selection[..9].iter().all(|&s| s == 0));
    }
}

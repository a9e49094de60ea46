//! Clock and sample-rate arithmetic, plus helpers that drive a scheduler.
//!
//! The baseband replays a packed bitstream at a fixed sample rate and holds
//! each bit for `samples_per_bit` samples. A protocol's timing is given as
//! an encoder clock plus the number of clock periods per fragment bit, so
//! everything here converts between those two views.
//!
//! Progress delivery comes in two flavors: an interrupt handler calling into
//! a `critical_section` global (`timer-isr` feature), or a blocking polling
//! loop with `embedded_hal::delay::DelayNs` (`delay-loop` feature).
//!
//! Common encoder clocks at [`OOK_SAMPLERATE`] with 4 clock periods per bit:
//!
//! | Clock    | Samples per bit | Bit time  |
//! |----------|-----------------|-----------|
//! |  10 kHz  |             912 |    400 µs |
//! |  20 kHz  |             456 |    200 µs |
//! |  57 kHz  |             160 |   70.2 µs |
//! | 100 kHz  |              91 |     40 µs |

use crate::protocol::ProtocolDef;
use libm::round;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(feature = "timer-isr")]
mod macros;

/// Baseband sample rate for OOK playback, in Hz.
pub const OOK_SAMPLERATE: u32 = 2_280_000;

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Samples the baseband holds each fragment bit for.
///
/// Returns 0 when the clock is slower than one bit per second or either
/// argument is 0.
///
/// # Example
/// ```rust
/// use ookframe::timing::samples_per_bit;
///
/// const SPB: u32 = samples_per_bit(10_000, 4);
/// assert_eq!(SPB, 912);
/// ```
pub const fn samples_per_bit(clock_hz: u32, clock_periods_per_fragment: u32) -> u32 {
    if clock_periods_per_fragment == 0 {
        return 0;
    }
    let bit_rate = clock_hz / clock_periods_per_fragment;
    if bit_rate == 0 {
        return 0;
    }
    OOK_SAMPLERATE / bit_rate
}

/// Clock periods per fragment bit of `def`.
pub fn clock_periods_per_fragment(def: &ProtocolDef) -> u32 {
    def.clock_periods_per_fragment()
}

/// Duration of one symbol at `clock_hz`, rounded to the nearest microsecond.
pub fn symbol_duration_us(def: &ProtocolDef, clock_hz: u32) -> u32 {
    if clock_hz == 0 {
        return 0;
    }
    let us = f64::from(def.clock_periods_per_symbol) * MICROS_PER_SECOND / f64::from(clock_hz);
    round(us) as u32
}

/// Duration of the symbol slots of one word at `clock_hz`, in microseconds.
///
/// Sync patterns are not counted, matching the frame duration shown next to
/// the clock setting.
pub fn frame_duration_us(def: &ProtocolDef, clock_hz: u32) -> u32 {
    symbol_duration_us(def, clock_hz).saturating_mul(u32::from(def.word_length))
}

/// Duration of a single fragment bit, the shortest pulse on air, in microseconds.
pub fn short_pulse_us(def: &ProtocolDef, clock_hz: u32) -> u32 {
    if clock_hz == 0 {
        return 0;
    }
    let us = f64::from(def.clock_periods_per_fragment()) * MICROS_PER_SECOND / f64::from(clock_hz);
    round(us) as u32
}

/// Inverse of [`frame_duration_us`]: the clock that makes one word last `frame_us`.
pub fn clock_for_frame_duration(def: &ProtocolDef, frame_us: u32) -> u32 {
    if frame_us == 0 {
        return 0;
    }
    let periods = f64::from(def.word_length) * f64::from(def.clock_periods_per_symbol);
    round(periods * MICROS_PER_SECOND / f64::from(frame_us)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::BUILTIN_PROTOCOLS;

    #[test]
    fn test_samples_per_bit() {
        assert_eq!(samples_per_bit(10_000, 4), 912);
        assert_eq!(samples_per_bit(100_000, 4), 91);
        assert_eq!(samples_per_bit(0, 4), 0);
        assert_eq!(samples_per_bit(10_000, 0), 0);
        assert_eq!(samples_per_bit(3, 4), 0);
    }

    #[test]
    fn test_durations_follow_clock() {
        for def in BUILTIN_PROTOCOLS.iter() {
            let clock = def.default_clock;
            let symbol = symbol_duration_us(def, clock);
            assert_eq!(frame_duration_us(def, clock), symbol * u32::from(def.word_length));
            assert!(short_pulse_us(def, clock) <= symbol, "{}", def.name);
        }
    }

    #[test]
    fn test_clock_for_frame_duration_inverts_duration() {
        for def in BUILTIN_PROTOCOLS.iter() {
            let frame_us = frame_duration_us(def, def.default_clock);
            let clock = clock_for_frame_duration(def, frame_us);
            let drift = clock.abs_diff(def.default_clock);
            // symbol durations are rounded to whole microseconds
            assert!(drift * 50 <= def.default_clock, "{}: {} vs {}", def.name, clock, def.default_clock);
        }
        assert_eq!(clock_for_frame_duration(&BUILTIN_PROTOCOLS[0], 0), 0);
    }

    #[test]
    fn test_zero_clock_is_zero_duration() {
        let def = &BUILTIN_PROTOCOLS[0];
        assert_eq!(symbol_duration_us(def, 0), 0);
        assert_eq!(short_pulse_us(def, 0), 0);
    }
}

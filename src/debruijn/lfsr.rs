//! Binary De Bruijn windows from a maximal-length shift register.
//!
//! A Fibonacci LFSR with a primitive feedback polynomial steps through every
//! nonzero `n`-bit state exactly once per period of `2^n - 1` steps. Because
//! each step shifts one new bit into the register, successive states are
//! overlapping windows of a single bit sequence: reading the register once
//! per transmitted frame sweeps all `n`-bit codes with constant memory.

/// Primitive feedback masks for register widths 3 to 16, indexed by `n - 3`.
const POLYNOMIALS: [u32; 14] = [
    0x6, 0xc, 0x14, 0x30, 0x60, 0xb8, 0x110, 0x240, 0x500, 0xe08, 0x1c80, 0x3802, 0x6000, 0xd008,
];

/// Smallest supported register width.
pub const MIN_ORDER: u32 = 3;
/// Largest supported register width.
pub const MAX_ORDER: u32 = 16;

/// A maximal-length shift register producing `n`-bit De Bruijn windows.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct ShiftRegister {
    order: u32,
    polynomial: u32,
    mask: u32,
    register: u32,
}

impl ShiftRegister {
    /// Creates a register of width `n`, seeded with 1.
    ///
    /// Widths outside `3..=16` fall back to 3.
    pub fn new(n: u32) -> Self {
        let order = if (MIN_ORDER..=MAX_ORDER).contains(&n) {
            n
        } else {
            warn!("LFSR order {} out of range, using {}", n, MIN_ORDER);
            MIN_ORDER
        };
        Self {
            order,
            polynomial: POLYNOMIALS[(order - MIN_ORDER) as usize],
            mask: (1 << order) - 1,
            register: 1,
        }
    }

    /// Register width `n`.
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Number of steps before the register returns to its seed, `2^n - 1`.
    pub fn period(&self) -> u32 {
        self.mask
    }

    /// Current window without stepping.
    pub fn value(&self) -> u32 {
        self.register
    }

    /// Advances the register `steps` times and returns the new window.
    pub fn compute(&mut self, steps: u32) -> u32 {
        for _ in 0..steps {
            let feedback = (self.register & self.polynomial).count_ones() & 1;
            self.register = ((self.register << 1) | feedback) & self.mask;
        }
        self.register
    }

    /// Reseeds the register with 1.
    pub fn reset(&mut self) {
        self.register = 1;
    }
}

impl Iterator for ShiftRegister {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        Some(self.compute(1))
    }
}

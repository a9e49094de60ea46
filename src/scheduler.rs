//! Transmission scheduler for synthesized OOK frames.
//!
//! This module provides the [`Scheduler`] struct, which paces frame parts to
//! a lower [`Baseband`] layer and tracks a job with two bounded cursors: the
//! frame part being sent and the repeat of that part. The baseband replays a
//! submitted bitstream on its own and reports back through
//! [`on_tx_progress`](Scheduler::on_tx_progress); the scheduler decides
//! whether to resend, move on to the next frame part, or finish.
//!
//! ## Sources of frame parts
//!
//! - [`TxMode::Manual`]: the selection in [`TxConfig`], one frame part.
//! - [`TxMode::Bruteforce`]: every combination of the symbol field, rightmost
//!   slot fastest.
//! - [`TxMode::DeBruijn`]: consecutive windows of a De Bruijn sequence, so a
//!   receiver that shifts in symbols without sync eventually sees every code.
//!
//! ## Example
//!
//! ```rust
//! use ookframe::bitstream::Bitstream;
//! use ookframe::protocol::BUILTIN_PROTOCOLS;
//! use ookframe::scheduler::{Baseband, Scheduler, TxMode};
//!
//! struct Radio;
//!
//! impl Baseband for Radio {
//!     type Error = ();
//!     fn enable_transmitter(&mut self) -> Result<(), ()> { Ok(()) }
//!     fn disable_transmitter(&mut self) -> Result<(), ()> { Ok(()) }
//!     fn submit_bitstream(&mut self, _: &Bitstream, _: u32, _: u32, _: u16) -> Result<(), ()> {
//!         Ok(())
//!     }
//! }
//!
//! let mut scheduler = Scheduler::new(Radio, BUILTIN_PROTOCOLS[0]).unwrap();
//! scheduler.config.repeat = 2;
//! scheduler.start(TxMode::Manual).unwrap();
//! assert_eq!(scheduler.progress_text(), "1/1 (1/2)");
//!
//! // the baseband reports each repeat, then completion
//! scheduler.on_tx_progress(1, false);
//! scheduler.on_tx_progress(2, true);
//! assert_eq!(scheduler.progress_text(), "Ready");
//! assert_eq!(scheduler.tx_good, 1);
//! ```
//!
//! For driving progress from an interrupt or a polling loop, see
//! [`crate::timing`].

use crate::bitstream::Bitstream;
use crate::consts::{FrameFragments, StatusText, SymbolSelection};
use crate::debruijn::{DeBruijnSequence, MAX_ORDER, MIN_ORDER, ShiftRegister};
use crate::error::Error;
use crate::frame::{self, Orientation};
use crate::protocol::ProtocolDef;
use crate::timing::samples_per_bit;
use core::convert::Infallible;
use core::fmt::{Debug, Write};

/// The radio layer a [`Scheduler`] hands frames to.
///
/// Implementations own the RF front end. A submitted bitstream is played
/// `repeat_count` times with `pause_symbols` of silence between repeats;
/// progress is reported back through [`Scheduler::on_tx_progress`], or
/// polled with [`PollProgress`](crate::timing::PollProgress) when the
/// `delay-loop` feature is enabled.
pub trait Baseband {
    /// Error raised by the radio. Its details stay inside the radio layer.
    type Error: Debug;

    /// Powers up the transmit chain.
    fn enable_transmitter(&mut self) -> Result<(), Self::Error>;

    /// Powers down the transmit chain.
    fn disable_transmitter(&mut self) -> Result<(), Self::Error>;

    /// Queues one frame part for playback.
    ///
    /// A resubmission of the same part carries only the repeats still owed,
    /// not the configured total.
    fn submit_bitstream(
        &mut self,
        bitstream: &Bitstream,
        samples_per_bit: u32,
        repeat_count: u32,
        pause_symbols: u16,
    ) -> Result<(), Self::Error>;
}

/// What the scheduler is transmitting.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum TxMode {
    /// Nothing in flight. Progress callbacks are ignored.
    #[default]
    Idle,
    /// The configured selection, repeated.
    Manual,
    /// A De Bruijn sequence over the symbol field, each part sent once.
    DeBruijn,
    /// Every symbol-field combination in turn, each repeated.
    Bruteforce,
}

/// Generator used for [`TxMode::DeBruijn`].
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum DeBruijnEngine {
    /// Materialized necklace sequence, any radix up to 10.
    #[default]
    Necklace,
    /// Maximal-length shift register, binary words of 3 to 16 slots.
    ShiftRegister,
}

/// A bounded progress counter.
///
/// `index` never exceeds `total`; the cursor is done once they are equal.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Cursor {
    /// Position, starting at 0
    pub index: u32,
    /// Number of positions
    pub total: u32,
}

impl Cursor {
    /// A cursor at 0 over `total` positions.
    pub const fn new(total: u32) -> Self {
        Self { index: 0, total }
    }

    /// Rewinds to 0 with a new total.
    pub fn reset(&mut self, total: u32) {
        self.index = 0;
        self.total = total;
    }

    /// Whether every position has been consumed.
    pub fn is_done(&self) -> bool {
        self.index >= self.total
    }

    /// Steps forward, saturating at `total`. Returns `true` while positions remain.
    pub fn advance(&mut self) -> bool {
        if self.index < self.total {
            self.index += 1;
        }
        !self.is_done()
    }
}

/// User-adjustable transmission settings.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct TxConfig {
    /// Mode used to size the cursors and the preview while idle.
    pub method: TxMode,
    /// Symbol index per Address/Data slot, used by [`TxMode::Manual`].
    pub selection: SymbolSelection,
    /// Fragment orientation.
    pub orientation: Orientation,
    /// Repeats per frame part in manual and bruteforce modes.
    pub repeat: u8,
    /// Encoder clock in Hz.
    pub clock_hz: u32,
    /// Silence between repeats, in symbols.
    pub pause_symbols: u16,
    /// Generator for De Bruijn mode.
    pub engine: DeBruijnEngine,
}

impl TxConfig {
    /// Defaults taken from a protocol: all-zero selection, its minimum
    /// repeat count, default clock and pause.
    pub fn for_protocol(def: &ProtocolDef) -> Self {
        let mut selection = SymbolSelection::new();
        for _ in 0..def.slot_count() {
            let _ = selection.push(0);
        }
        Self {
            method: TxMode::Manual,
            selection,
            orientation: Orientation::Normal,
            repeat: def.repeat_min,
            clock_hz: def.default_clock,
            pause_symbols: def.pause_symbols,
            engine: DeBruijnEngine::default(),
        }
    }
}

/// Paces frame parts of one protocol to a [`Baseband`].
///
/// ## Fields
/// - `baseband`: the radio, public so interrupt glue can reach it.
/// - `config`: settings read when a job starts; changes apply to the next job.
/// - `tx_good`: jobs that ran to completion.
///
/// ## Invariants
/// - Both cursors satisfy `index <= total` at all times.
/// - Repeats of a frame part are exhausted before the next part is sent.
/// - A baseband error ends the job; [`progress_text`](Self::progress_text)
///   shows it until the next [`start`](Self::start).
#[derive(Debug)]
pub struct Scheduler<B> {
    /// The radio layer
    pub baseband: B,
    /// Transmission settings
    pub config: TxConfig,
    /// Counter of completed jobs.
    /// Incremented when the last frame part finishes and the scheduler returns to idle.
    pub tx_good: u32,
    def: ProtocolDef,
    mode: TxMode,
    frame_parts: Cursor,
    repeats: Cursor,
    necklace: Option<DeBruijnSequence>,
    lfsr: ShiftRegister,
    selection: SymbolSelection,
    fragments: FrameFragments,
    bitstream: Bitstream,
    last_error: Option<Error>,
}

impl<B: Baseband> Scheduler<B> {
    /// Creates an idle scheduler for `def` with [`TxConfig::for_protocol`] settings.
    ///
    /// # Errors
    /// Returns [`Error::InvalidProtocolDef`] if `def` fails
    /// [`ProtocolDef::validate`].
    pub fn new(baseband: B, def: ProtocolDef) -> Result<Self, Error> {
        def.validate()?;
        let mut scheduler = Self {
            baseband,
            config: TxConfig::for_protocol(&def),
            tx_good: 0,
            def,
            mode: TxMode::Idle,
            frame_parts: Cursor::default(),
            repeats: Cursor::default(),
            necklace: None,
            lfsr: ShiftRegister::new(MIN_ORDER),
            selection: SymbolSelection::new(),
            fragments: FrameFragments::new(),
            bitstream: Bitstream::new(),
            last_error: None,
        };
        scheduler.reset();
        Ok(scheduler)
    }

    /// Switches to another protocol, stopping any job in flight.
    ///
    /// The configuration is rebuilt from the new protocol's defaults; the
    /// method and De Bruijn engine carry over.
    pub fn set_protocol(&mut self, def: ProtocolDef) -> Result<(), Error> {
        def.validate()?;
        if self.mode != TxMode::Idle {
            self.stop();
        }
        let method = self.config.method;
        let engine = self.config.engine;
        self.def = def;
        self.config = TxConfig::for_protocol(&def);
        self.config.method = method;
        self.config.engine = engine;
        self.last_error = None;
        self.reset();
        Ok(())
    }

    /// The protocol being transmitted.
    pub fn protocol(&self) -> &ProtocolDef {
        &self.def
    }

    /// Current mode.
    pub fn mode(&self) -> TxMode {
        self.mode
    }

    /// Frame-part cursor.
    pub fn frame_parts(&self) -> Cursor {
        self.frame_parts
    }

    /// Repeat cursor.
    pub fn repeats(&self) -> Cursor {
        self.repeats
    }

    /// Starts a job in `mode` and submits the first frame part.
    ///
    /// Starting [`TxMode::Idle`] is the same as [`stop`](Self::stop).
    /// Configuration errors (reversal on a non-binary protocol, De Bruijn on
    /// a protocol with sync, unsupported De Bruijn parameters) are returned
    /// without touching the radio.
    pub fn start(&mut self, mode: TxMode) -> Result<(), Error> {
        if mode == TxMode::Idle {
            self.stop();
            return Ok(());
        }
        self.config.orientation.check(&self.def)?;
        let (frame_parts, repeats) = self.totals(mode)?;

        self.config.method = mode;
        self.last_error = None;
        self.frame_parts.reset(frame_parts);
        self.repeats.reset(repeats);
        if mode == TxMode::Bruteforce {
            self.selection = frame::selection_for(&self.def, 0);
        }
        self.mode = mode;
        debug!(
            "{}: start, {} frame parts x {} repeats",
            self.def.name,
            frame_parts,
            repeats
        );

        if let Err(error) = self.baseband.enable_transmitter() {
            let error = transmitter_error(self.def.name, error);
            return Err(self.fail(error));
        }
        self.tx()
    }

    /// Synthesizes the current frame part and hands it to the baseband.
    ///
    /// The baseband is asked for the repeats still owed on this part. Does
    /// nothing while idle.
    pub fn tx(&mut self) -> Result<(), Error> {
        if self.mode == TxMode::Idle {
            return Ok(());
        }
        if let Err(error) = self.render(self.mode) {
            return Err(self.fail(error));
        }
        let samples_per_bit =
            samples_per_bit(self.config.clock_hz, self.def.clock_periods_per_fragment());
        let repeat_count = self.repeats.total - self.repeats.index;
        trace!(
            "frame part {}/{}: {} bits x {}",
            self.frame_parts.index + 1,
            self.frame_parts.total,
            self.bitstream.len_bits(),
            repeat_count
        );
        let submitted = self.baseband.submit_bitstream(
            &self.bitstream,
            samples_per_bit,
            repeat_count,
            self.config.pause_symbols,
        );
        if let Err(error) = submitted {
            let error = transmitter_error(self.def.name, error);
            return Err(self.fail(error));
        }
        Ok(())
    }

    /// Handles a progress report from the baseband.
    ///
    /// While `done` is false, `progress` is the number of repeats played so
    /// far and only moves the repeat cursor for display. A `done` report
    /// completes one repeat: the current part is resent if repeats are still
    /// owed, otherwise the next frame part is sent or the job finishes.
    pub fn on_tx_progress(&mut self, progress: u32, done: bool) {
        if self.mode == TxMode::Idle {
            trace!("progress {} while idle", progress);
            return;
        }
        if !done {
            let shown = progress.min(self.repeats.total.saturating_sub(1));
            self.repeats.index = self.repeats.index.max(shown);
            return;
        }

        if self.repeats.advance() {
            let _ = self.tx();
            return;
        }
        self.repeats.index = 0;
        if !self.frame_parts.advance() {
            self.tx_good = self.tx_good.wrapping_add(1);
            debug!("{}: job complete", self.def.name);
            self.stop();
            return;
        }
        match (self.mode, self.config.engine) {
            (TxMode::Bruteforce, _) => {
                let _ = frame::next_possibility(&self.def, &mut self.selection);
            }
            (TxMode::DeBruijn, DeBruijnEngine::ShiftRegister) => {
                let _ = self.lfsr.compute(1);
            }
            _ => {}
        }
        let _ = self.tx();
    }

    /// Ends the job: the transmitter is disabled, cursors are rewound for
    /// the configured method and frame part 0 is synthesized as preview.
    pub fn stop(&mut self) {
        if let Err(error) = self.baseband.disable_transmitter() {
            let _ = transmitter_error(self.def.name, error);
        }
        if self.mode != TxMode::Idle {
            debug!("{}: stop", self.def.name);
        }
        self.mode = TxMode::Idle;
        self.reset();
    }

    /// `Ok` once idle, `WouldBlock` while a job is running.
    pub fn poll_idle(&self) -> nb::Result<(), Infallible> {
        if self.mode == TxMode::Idle {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Status line: `"Ready"`, the error that aborted the last job, or
    /// `"{part}/{parts} ({repeat}/{repeats})"` counting from 1.
    pub fn progress_text(&self) -> StatusText {
        let mut text = StatusText::new();
        if let Some(error) = self.last_error {
            let _ = write!(text, "{}", error);
        } else if self.mode == TxMode::Idle {
            let _ = text.push_str("Ready");
        } else {
            let _ = write!(
                text,
                "{}/{} ({}/{})",
                (self.frame_parts.index + 1).min(self.frame_parts.total),
                self.frame_parts.total,
                (self.repeats.index + 1).min(self.repeats.total),
                self.repeats.total
            );
        }
        text
    }

    /// The fragment string of the frame part in flight, or of the next one while idle.
    pub fn preview(&self) -> &str {
        &self.fragments
    }

    /// Packed form of [`preview`](Self::preview).
    pub fn bitstream(&self) -> &Bitstream {
        &self.bitstream
    }

    /// The necklace sequence, once De Bruijn mode has prepared one.
    pub fn debruijn_sequence(&self) -> Option<&DeBruijnSequence> {
        self.necklace.as_ref()
    }

    fn reset(&mut self) {
        let (frame_parts, repeats) = self.totals(self.config.method).unwrap_or((0, 0));
        self.frame_parts.reset(frame_parts);
        self.repeats.reset(repeats);
        if self.config.method == TxMode::Bruteforce {
            self.selection = frame::selection_for(&self.def, 0);
        }
        if let Err(error) = self.render(self.config.method) {
            debug!("{}: no preview, {}", self.def.name, error);
            self.fragments.clear();
            self.bitstream.clear();
        }
    }

    fn fail(&mut self, error: Error) -> Error {
        warn!("{}: aborted at frame part {}, {}", self.def.name, self.frame_parts.index, error);
        self.stop();
        self.last_error = Some(error);
        error
    }

    fn totals(&mut self, mode: TxMode) -> Result<(u32, u32), Error> {
        let repeats = u32::from(self.config.repeat).max(1);
        Ok(match mode {
            TxMode::Idle | TxMode::Manual => (1, repeats),
            TxMode::Bruteforce => (frame::possibilities(&self.def), repeats),
            TxMode::DeBruijn => (self.prepare_debruijn()?, 1),
        })
    }

    fn prepare_debruijn(&mut self) -> Result<u32, Error> {
        if !self.def.debruijn_capable {
            return Err(Error::NotDeBruijnCapable);
        }
        let n = self.def.word_length;
        let k = frame::uniform_radix(&self.def)
            .ok_or(Error::UnsupportedDeBruijnParameters { k: 0, n })?;

        match self.config.engine {
            DeBruijnEngine::ShiftRegister => {
                if k != 2 || !(MIN_ORDER..=MAX_ORDER).contains(&u32::from(n)) {
                    return Err(Error::UnsupportedDeBruijnParameters { k, n });
                }
                self.lfsr = ShiftRegister::new(u32::from(n));
                Ok(self.lfsr.period())
            }
            DeBruijnEngine::Necklace => {
                let part_len = usize::from(n);
                let reusable = self.necklace.as_ref().is_some_and(|seq| {
                    seq.alphabet_size() == k
                        && seq.order() == n
                        && seq.part_len() == part_len
                        && seq.is_generated()
                });
                if !reusable {
                    let mut seq = DeBruijnSequence::new(k, n)?.with_part_len(part_len)?;
                    seq.generate()?;
                    self.necklace = Some(seq);
                }
                Ok(self.necklace.as_ref().map_or(0, DeBruijnSequence::total_parts))
            }
        }
    }

    fn load_selection(&mut self, mode: TxMode) -> Result<(), Error> {
        match mode {
            TxMode::Idle | TxMode::Manual => {
                self.selection = self.config.selection.clone();
            }
            // the odometer is seeded on start and stepped per frame part
            TxMode::Bruteforce => {}
            TxMode::DeBruijn => {
                self.selection.clear();
                match self.config.engine {
                    DeBruijnEngine::Necklace => {
                        let seq = self.necklace.as_ref().ok_or(Error::NotDeBruijnCapable)?;
                        let symbols = seq
                            .part_symbols(self.frame_parts.index)
                            .ok_or(Error::CapacityExceeded)?;
                        for symbol in symbols {
                            let _ = self.selection.push(symbol);
                        }
                    }
                    DeBruijnEngine::ShiftRegister => {
                        let window = self.lfsr.value();
                        for bit in (0..self.lfsr.order()).rev() {
                            let _ = self.selection.push(((window >> bit) & 1) as u8);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn render(&mut self, mode: TxMode) -> Result<(), Error> {
        self.load_selection(mode)?;
        let (fragments, bitstream) =
            frame::synthesize_and_pack(&self.def, &self.selection, self.config.orientation)?;
        self.fragments = fragments;
        self.bitstream = bitstream;
        Ok(())
    }
}

/// Logs an opaque radio error and maps it to [`Error::Transmitter`].
fn transmitter_error<E: Debug>(name: &str, error: E) -> Error {
    #[cfg(feature = "log")]
    ::log::warn!("{}: baseband error {:?}", name, error);
    #[cfg(feature = "defmt-0-3")]
    ::defmt::warn!("{}: baseband error {}", name, defmt::Debug2Format(&error));
    let _ = (name, error);
    Error::Transmitter
}

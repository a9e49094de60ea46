use crate::error::Error;
use crate::protocol::ProtocolDef;
use crate::scheduler::{Baseband, Scheduler};
use core::cell::RefCell;
use critical_section::Mutex;

/// A scheduler shared between the main loop and the radio interrupt.
pub type GlobalScheduler<B> = Mutex<RefCell<Option<Scheduler<B>>>>;

/// Used to initialize the global static `Scheduler` for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust
/// # use ookframe::bitstream::Bitstream;
/// # use ookframe::scheduler::Baseband;
/// use ookframe::timing::{GlobalScheduler, global_scheduler_init};
///
/// struct Radio;
/// # impl Baseband for Radio {
/// #     type Error = ();
/// #     fn enable_transmitter(&mut self) -> Result<(), ()> { Ok(()) }
/// #     fn disable_transmitter(&mut self) -> Result<(), ()> { Ok(()) }
/// #     fn submit_bitstream(&mut self, _: &Bitstream, _: u32, _: u32, _: u16) -> Result<(), ()> {
/// #         Ok(())
/// #     }
/// # }
///
/// static SCHEDULER: GlobalScheduler<Radio> = global_scheduler_init();
/// ```
pub const fn global_scheduler_init<B: Baseband>() -> GlobalScheduler<B> {
    Mutex::new(RefCell::new(None))
}

/// Installs a fresh scheduler for `def` in the global slot, replacing any previous one.
///
/// # Errors
/// Returns [`Error::InvalidProtocolDef`] and leaves the slot untouched if
/// `def` does not validate.
pub fn global_scheduler_setup<B: Baseband>(
    global: &'static GlobalScheduler<B>,
    baseband: B,
    def: ProtocolDef,
) -> Result<(), Error> {
    let scheduler = Scheduler::new(baseband, def)?;
    critical_section::with(|cs| {
        let _ = global.borrow(cs).replace(Some(scheduler));
    });
    Ok(())
}

/// Runs `f` on the global scheduler inside a critical section.
///
/// Returns `None` if the scheduler has not been set up.
pub fn global_scheduler_with<B: Baseband, R>(
    global: &'static GlobalScheduler<B>,
    f: impl FnOnce(&mut Scheduler<B>) -> R,
) -> Option<R> {
    critical_section::with(|cs| global.borrow(cs).borrow_mut().as_mut().map(f))
}

/// Forwards a progress report from the radio interrupt
///
/// # Arguments
/// * The global static `Scheduler`
/// * Repeats played so far
/// * Whether the submitted bitstream finished
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn RADIO() {
///     let (progress, done) = radio_status();
///     global_tx_progress(&SCHEDULER, progress, done);
/// }
/// ```
pub fn global_tx_progress<B: Baseband>(
    global: &'static GlobalScheduler<B>,
    progress: u32,
    done: bool,
) {
    critical_section::with(|cs| {
        if let Some(scheduler) = global.borrow(cs).borrow_mut().as_mut() {
            scheduler.on_tx_progress(progress, done);
        }
    });
}

use crate::scheduler::{Baseband, Scheduler};
use embedded_hal::delay::DelayNs;

/// A baseband whose progress is read by polling instead of callbacks.
///
/// `poll_progress` returns `WouldBlock` while nothing new happened since the
/// last call, and `(progress, done)` in the same form
/// [`Scheduler::on_tx_progress`] takes otherwise.
pub trait PollProgress {
    /// Error raised while reading progress.
    type Error;

    /// Reads the next progress report, if any.
    fn poll_progress(&mut self) -> nb::Result<(u32, bool), Self::Error>;
}

/// Runs a blocking loop that feeds polled progress into `scheduler` until it is idle.
///
/// This is the polling counterpart of the interrupt helpers, for firmware
/// where the radio has no completion interrupt. Between polls the loop
/// sleeps `poll_us` microseconds on `delay`.
///
/// # Arguments
/// - `scheduler`: a scheduler with a job started, or idle (returns at once).
/// - `delay`: a delay provider implementing `DelayNs`, typically from the HAL.
/// - `poll_us`: the sleep between polls, in microseconds.
///
/// # Errors
/// Returns the first error raised by [`PollProgress::poll_progress`]. The
/// job is left running; call [`Scheduler::stop`] to abandon it.
///
/// # Example
/// ```rust
/// # use embedded_hal_mock::eh1::delay::NoopDelay;
/// # use ookframe::bitstream::Bitstream;
/// # use ookframe::protocol::BUILTIN_PROTOCOLS;
/// # use ookframe::scheduler::{Baseband, Scheduler, TxMode};
/// use ookframe::timing::{PollProgress, run_until_idle};
///
/// struct Radio {
///     pending: u32,
/// }
/// # impl Baseband for Radio {
/// #     type Error = ();
/// #     fn enable_transmitter(&mut self) -> Result<(), ()> { Ok(()) }
/// #     fn disable_transmitter(&mut self) -> Result<(), ()> { Ok(()) }
/// #     fn submit_bitstream(&mut self, _: &Bitstream, _: u32, n: u32, _: u16) -> Result<(), ()> {
/// #         self.pending = n;
/// #         Ok(())
/// #     }
/// # }
///
/// impl PollProgress for Radio {
///     type Error = ();
///     fn poll_progress(&mut self) -> nb::Result<(u32, bool), ()> {
///         let repeats = core::mem::take(&mut self.pending);
///         Ok((repeats, true))
///     }
/// }
///
/// let mut scheduler = Scheduler::new(Radio { pending: 0 }, BUILTIN_PROTOCOLS[9]).unwrap();
/// scheduler.start(TxMode::Manual).unwrap();
/// run_until_idle(&mut scheduler, &mut NoopDelay::new(), 100).unwrap();
/// assert_eq!(scheduler.tx_good, 1);
/// ```
pub fn run_until_idle<B, D>(
    scheduler: &mut Scheduler<B>,
    delay: &mut D,
    poll_us: u32,
) -> Result<(), <B as PollProgress>::Error>
where
    B: Baseband + PollProgress,
    D: DelayNs,
{
    while scheduler.poll_idle().is_err() {
        match scheduler.baseband.poll_progress() {
            Ok((progress, done)) => scheduler.on_tx_progress(progress, done),
            Err(nb::Error::WouldBlock) => delay.delay_us(poll_us),
            Err(nb::Error::Other(error)) => return Err(error),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::Bitstream;
    use crate::protocol::BUILTIN_PROTOCOLS;
    use crate::scheduler::TxMode;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use std::collections::VecDeque;

    /// Replays scripted progress reports, blocking between them.
    #[derive(Debug, Default)]
    struct ScriptedBaseband {
        script: VecDeque<nb::Result<(u32, bool), &'static str>>,
        submitted: u32,
        polls: u32,
    }

    impl Baseband for ScriptedBaseband {
        type Error = ();

        fn enable_transmitter(&mut self) -> Result<(), ()> {
            Ok(())
        }

        fn disable_transmitter(&mut self) -> Result<(), ()> {
            Ok(())
        }

        fn submit_bitstream(&mut self, _: &Bitstream, _: u32, _: u32, _: u16) -> Result<(), ()> {
            self.submitted += 1;
            Ok(())
        }
    }

    impl PollProgress for ScriptedBaseband {
        type Error = &'static str;

        fn poll_progress(&mut self) -> nb::Result<(u32, bool), &'static str> {
            self.polls += 1;
            self.script.pop_front().unwrap_or(Err(nb::Error::WouldBlock))
        }
    }

    #[test]
    fn test_runs_bruteforce_job_to_completion() {
        let def = BUILTIN_PROTOCOLS[3];
        let mut baseband = ScriptedBaseband::default();
        for _ in 0..256 {
            baseband.script.push_back(Err(nb::Error::WouldBlock));
            baseband.script.push_back(Ok((7, false)));
            baseband.script.push_back(Ok((8, true)));
        }
        let mut scheduler = Scheduler::new(baseband, def).unwrap();
        scheduler.start(TxMode::Bruteforce).unwrap();

        run_until_idle(&mut scheduler, &mut NoopDelay::new(), 10).unwrap();
        assert_eq!(scheduler.tx_good, 1);
        assert_eq!(scheduler.baseband.submitted, 256);
        assert!(scheduler.baseband.script.is_empty());
    }

    #[test]
    fn test_returns_immediately_when_idle() {
        let mut scheduler = Scheduler::new(ScriptedBaseband::default(), BUILTIN_PROTOCOLS[0]).unwrap();
        run_until_idle(&mut scheduler, &mut NoopDelay::new(), 10).unwrap();
        assert_eq!(scheduler.baseband.polls, 0);
    }

    #[test]
    fn test_poll_error_is_returned() {
        let mut baseband = ScriptedBaseband::default();
        baseband.script.push_back(Ok((1, false)));
        baseband.script.push_back(Err(nb::Error::Other("radio lost lock")));
        let mut scheduler = Scheduler::new(baseband, BUILTIN_PROTOCOLS[0]).unwrap();
        scheduler.start(TxMode::Manual).unwrap();

        assert_eq!(
            run_until_idle(&mut scheduler, &mut NoopDelay::new(), 10),
            Err("radio lost lock")
        );
        assert_eq!(scheduler.mode(), TxMode::Manual);
        assert_eq!(scheduler.repeats().index, 1);
    }
}

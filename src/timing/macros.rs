/// Declares a static global `OOK_SCHEDULER` protected by a `critical_section` mutex.
///
/// The main loop starts jobs through it and the radio interrupt reports
/// progress into it.
///
/// # Arguments
/// - `$baseband`: the concrete [`Baseband`](crate::scheduler::Baseband) type
///
/// # Example
/// ```rust,ignore
/// init_ook_scheduler!(MyRadio);
/// ```
#[macro_export]
macro_rules! init_ook_scheduler {
    ( $baseband:ty ) => {
        pub static OOK_SCHEDULER: $crate::timing::GlobalScheduler<$baseband> =
            $crate::timing::global_scheduler_init();
    };
}

/// Fills the `OOK_SCHEDULER` declared by [`init_ook_scheduler!`] with a new scheduler.
///
/// Evaluates to the `Result` of
/// [`global_scheduler_setup`](crate::timing::global_scheduler_setup).
///
/// # Arguments
/// - `$baseband`: the radio instance
/// - `$def`: the [`ProtocolDef`](crate::protocol::ProtocolDef) to transmit
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     setup_ook_scheduler!(radio, BUILTIN_PROTOCOLS[0]).unwrap();
/// }
/// ```
#[macro_export]
macro_rules! setup_ook_scheduler {
    ( $baseband:expr, $def:expr ) => {
        $crate::timing::global_scheduler_setup(&OOK_SCHEDULER, $baseband, $def)
    };
}

/// Forwards a `(progress, done)` report to the global `OOK_SCHEDULER`.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn RADIO() {
///     ook_tx_progress!(repeats_sent(), finished());
/// }
/// ```
///
/// # Notes
/// - Does nothing until `setup_ook_scheduler!` has run.
#[macro_export]
macro_rules! ook_tx_progress {
    ( $progress:expr, $done:expr ) => {
        $crate::timing::global_tx_progress(&OOK_SCHEDULER, $progress, $done)
    };
}

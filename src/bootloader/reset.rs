//! Bootloader-or-application decision at power-up
//!
//! Runs once, before any serial I/O. Only an external (reset-pin) reset
//! keeps the device in the bootloader; a watchdog, power-on or brown-out
//! reset goes straight to the application. The watchdog flag is cleared on
//! the way out so an application that never touches the watchdog does not
//! inherit a pending reset loop.

/// Reset-cause access and the one-way transfer into the application.
pub trait ResetControl {
    /// True if the last reset was triggered by the external reset pin.
    fn external_reset(&mut self) -> bool;

    /// Clear the external-reset status flag, leaving the other cause
    /// flags untouched.
    fn clear_external_flag(&mut self);

    /// Clear the watchdog status flag, disable the watchdog and transfer
    /// control to the resident application. Never returns.
    fn enter_application(&mut self) -> !;
}

/// Decide where this boot goes. Returns only when the bootloader should
/// keep running; the external-reset flag has then been consumed, so the
/// next non-external reset falls through to the application.
pub fn check_reset_cause<R: ResetControl>(control: &mut R) {
    if !control.external_reset() {
        control.enter_application();
    }
    control.clear_external_flag();
}

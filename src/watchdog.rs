//! Watchdog interface
//!
//! The watchdog is both the inactivity timer for the command loop and the
//! only way the device resets itself: `force_reset` arms the shortest
//! timeout and spins until the hardware pulls the chip back to the reset
//! vector.

#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(u8)]
pub enum WatchdogTimeout {
    Ms16 = 0,
    Ms32 = 1,
    Ms64 = 2,
    Ms125 = 3,
    Ms250 = 4,
    Ms500 = 5,
    Ms1000 = 6,
    Ms2000 = 7,
}

pub trait Watchdog {
    fn start(&mut self, timeout: WatchdogTimeout);
    fn feed(&mut self);
    fn disable(&mut self);

    /// Force a full hardware reset: arm the shortest timeout and spin
    /// until it fires. Control never comes back; the next thing that runs
    /// is the reset vector.
    fn force_reset(&mut self) -> ! {
        self.start(WatchdogTimeout::Ms16);
        loop {}
    }
}

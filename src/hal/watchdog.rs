use avr_device::atmega328p::WDT;

use crate::watchdog::{Watchdog, WatchdogTimeout};

// WDTCSR bits
const WDCE: u8 = 0x10;
const WDE: u8 = 0x08;

pub struct Wdt {
    _private: (),
}

impl Wdt {
    #[inline]
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Watchdog for Wdt {
    #[inline]
    fn start(&mut self, timeout: WatchdogTimeout) {
        unsafe {
            let p = WDT::ptr();
            // Timed sequence: change-enable, then timeout + enable
            (*p).wdtcsr.write(|w| w.bits(WDCE | WDE));
            (*p).wdtcsr.write(|w| w.bits(WDE | timeout as u8));
        }
    }

    #[inline]
    fn feed(&mut self) {
        unsafe {
            avr_device::asm::wdr();
        }
    }

    #[inline]
    fn disable(&mut self) {
        unsafe {
            let p = WDT::ptr();
            (*p).wdtcsr.write(|w| w.bits(WDCE | WDE));
            (*p).wdtcsr.write(|w| w.bits(0x00));
        }
    }
}

impl Default for Wdt {
    fn default() -> Self {
        Self::new()
    }
}

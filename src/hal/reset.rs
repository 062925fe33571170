//! Reset-cause access and the jump into the application

use avr_device::atmega328p::CPU;

use crate::bootloader::reset::ResetControl;
use crate::config;
use crate::hal::watchdog::Wdt;
use crate::watchdog::Watchdog;

// MCUSR bits
const EXTRF: u8 = 0x02;
const WDRF: u8 = 0x08;

pub struct Mcu {
    _private: (),
}

impl Mcu {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl ResetControl for Mcu {
    fn external_reset(&mut self) -> bool {
        unsafe { (*CPU::ptr()).mcusr.read().bits() & EXTRF != 0 }
    }

    fn clear_external_flag(&mut self) {
        unsafe {
            (*CPU::ptr()).mcusr.modify(|r, w| w.bits(r.bits() & !EXTRF));
        }
    }

    fn enter_application(&mut self) -> ! {
        // Clear WDRF here rather than leaving it to the application: an
        // application that never touches the watchdog cannot tell this
        // bootloader's watchdog reset from its own and would reset again.
        unsafe {
            (*CPU::ptr()).mcusr.modify(|r, w| w.bits(r.bits() & !WDRF));
        }
        Wdt::new().disable();

        unsafe { jump(config::APP_ENTRY) }
    }
}

impl Default for Mcu {
    fn default() -> Self {
        Self::new()
    }
}

/// Transfer control to the word address in `addr`, no arguments, no
/// return. The sole place a raw address becomes an entry point.
///
/// # Safety
///
/// `addr` must be the entry of code prepared to run from reset state;
/// nothing of the bootloader's stack or state survives the jump.
pub unsafe fn jump(addr: u16) -> ! {
    core::arch::asm!(
        "ijmp",
        in("r30") addr as u8,
        in("r31") (addr >> 8) as u8,
        options(noreturn),
    )
}

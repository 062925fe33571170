//! Self-programming (SPM) flash driver
//!
//! Each operation loads the Z pointer (and the r1:r0 data word for page
//! fills), writes the command to SPMCSR and issues `spm` within the
//! four-cycle window. r1 is restored to zero afterwards, as the ABI
//! expects.

use avr_device::atmega328p::CPU;

use crate::flash::Flash;

// SPMCSR data-space address and command bits
const SPMCSR: u8 = 0x57;
const SPMEN: u8 = 0x01;
const PAGE_ERASE: u8 = 0x03;
const PAGE_WRITE: u8 = 0x05;
const RWW_ENABLE: u8 = 0x11;

pub struct SpmFlash {
    _private: (),
}

impl SpmFlash {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

unsafe fn spm_command(addr: u16, word: u16, command: u8) {
    core::arch::asm!(
        "movw r0, {word}",
        "sts {spmcsr}, {cmd}",
        "spm",
        "clr r1",
        word = in(reg_pair) word,
        cmd = in(reg) command,
        spmcsr = const SPMCSR,
        in("r30") addr as u8,
        in("r31") (addr >> 8) as u8,
        out("r0") _,
    );
}

impl Flash for SpmFlash {
    fn page_erase(&mut self, addr: u16) {
        unsafe { spm_command(addr, 0, PAGE_ERASE) }
    }

    fn page_fill(&mut self, addr: u16, word: u16) {
        unsafe { spm_command(addr, word, SPMEN) }
    }

    fn page_write(&mut self, addr: u16) {
        unsafe { spm_command(addr, 0, PAGE_WRITE) }
    }

    fn busy_wait(&mut self) {
        unsafe { while (*CPU::ptr()).spmcsr.read().bits() & SPMEN != 0 {} }
    }

    fn rww_enable(&mut self) {
        self.busy_wait();
        unsafe { spm_command(0, 0, RWW_ENABLE) }
    }
}

impl Default for SpmFlash {
    fn default() -> Self {
        Self::new()
    }
}

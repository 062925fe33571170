use avr_device::atmega328p::TC0;

use crate::config;
use crate::transport::softuart::BitClock;

// TCCR0B clock select: clk/8
const CS01: u8 = 0x02;

const BIT_TICKS: u8 = config::BIT_PERIOD_TICKS as u8;

/// Timer/Counter0 as the software-UART bit clock. The prescaler is gated
/// on only while a delay runs, so the counter holds still between bits.
pub struct BitTimer {
    _private: (),
}

impl BitTimer {
    pub fn new() -> Self {
        unsafe {
            let p = TC0::ptr();
            // Normal mode, stopped, counter cleared
            (*p).tccr0a.write(|w| w.bits(0));
            (*p).tccr0b.write(|w| w.bits(0));
            (*p).tcnt0.write(|w| w.bits(0));
        }
        Self { _private: () }
    }

    fn run_from(&mut self, start: u8) {
        unsafe {
            let p = TC0::ptr();
            (*p).tcnt0.write(|w| w.bits(start));
            (*p).tccr0b.modify(|r, w| w.bits(r.bits() | CS01));
            while (*p).tcnt0.read().bits() < BIT_TICKS {}
            (*p).tccr0b.modify(|r, w| w.bits(r.bits() & !CS01));
        }
    }
}

impl BitClock for BitTimer {
    fn wait_bit(&mut self) {
        self.run_from(0);
    }

    fn wait_half_bit(&mut self) {
        self.run_from(BIT_TICKS / 2);
    }
}

impl Default for BitTimer {
    fn default() -> Self {
        Self::new()
    }
}

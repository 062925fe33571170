//! Hardware USART0 transport (`hw-uart` feature)

use core::convert::Infallible;

use avr_device::atmega328p::USART0;

use crate::config;
use crate::transport::Transport;

// UCSR0A flags
const RXC0: u8 = 1 << 7;
const UDRE0: u8 = 1 << 5;

// 8N1 at the fixed baud rate
const UBRR: u16 = (config::CPU_FREQ_HZ / 16 / config::UART_BAUD - 1) as u16;

pub struct Usart0 {
    _private: (),
}

impl Usart0 {
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn read_nb(&mut self) -> nb::Result<u8, Infallible> {
        unsafe {
            let p = USART0::ptr();
            if (*p).ucsr0a.read().bits() & RXC0 != 0 {
                Ok((*p).udr0.read().bits())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }

    fn write_nb(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        unsafe {
            let p = USART0::ptr();
            if (*p).ucsr0a.read().bits() & UDRE0 != 0 {
                (*p).udr0.write(|w| w.bits(byte));
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }
}

impl Transport for Usart0 {
    fn init(&mut self) {
        unsafe {
            let p = USART0::ptr();
            // Enable receiver and transmitter
            (*p).ucsr0b.write(|w| w.bits(0x18));
            // 8 data bits, no parity, 1 stop bit
            (*p).ucsr0c.write(|w| w.bits(0x06));
            (*p).ubrr0.write(|w| w.bits(UBRR));
        }
    }

    fn read_byte(&mut self) -> u8 {
        match nb::block!(self.read_nb()) {
            Ok(byte) => byte,
            Err(never) => match never {},
        }
    }

    fn write_byte(&mut self, byte: u8) {
        match nb::block!(self.write_nb(byte)) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }
}

impl Default for Usart0 {
    fn default() -> Self {
        Self::new()
    }
}

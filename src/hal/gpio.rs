use core::convert::Infallible;
use core::marker::PhantomData;

use avr_device::atmega328p::{PORTB, PORTC, PORTD};
use embedded_hal::digital::v2::{InputPin, OutputPin};

pub trait PinMode {}
pub struct Input;
pub struct Output;
impl PinMode for Input {}
impl PinMode for Output {}

/// One port pin, typed by port, bit number and direction.
pub struct Pin<PORT, const P: u8, MODE> {
    _port: PhantomData<PORT>,
    _mode: PhantomData<MODE>,
}

macro_rules! impl_port {
    ($PORT:ident, $port:ident, $ddr:ident, $pin:ident) => {
        impl<const P: u8, MODE: PinMode> Pin<$PORT, P, MODE> {
            /// Raw pin handle. The caller keeps each pin single-owner;
            /// nothing enforces it at this level.
            pub const fn new() -> Self {
                Self {
                    _port: PhantomData,
                    _mode: PhantomData,
                }
            }

            pub fn into_output(self) -> Pin<$PORT, P, Output> {
                // Set DDRx bit
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin::new()
            }

            pub fn into_input(self) -> Pin<$PORT, P, Input> {
                // Clear DDRx bit and disable the pull-up
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
                Pin::new()
            }

            pub fn into_pull_up_input(self) -> Pin<$PORT, P, Input> {
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin::new()
            }
        }

        impl<const P: u8> Pin<$PORT, P, Output> {
            #[inline]
            pub fn set_pin_high(&mut self) {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
            }

            #[inline]
            pub fn set_pin_low(&mut self) {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
            }

            #[inline]
            pub fn toggle(&mut self) {
                // Writing PINx toggles the output latch
                unsafe {
                    (*$PORT::ptr()).$pin.write(|w| w.bits(1 << P));
                }
            }
        }

        impl<const P: u8> Pin<$PORT, P, Input> {
            #[inline]
            pub fn pin_is_high(&self) -> bool {
                unsafe { (*$PORT::ptr()).$pin.read().bits() & (1 << P) != 0 }
            }
        }

        impl<const P: u8> OutputPin for Pin<$PORT, P, Output> {
            type Error = Infallible;

            fn set_high(&mut self) -> Result<(), Infallible> {
                self.set_pin_high();
                Ok(())
            }

            fn set_low(&mut self) -> Result<(), Infallible> {
                self.set_pin_low();
                Ok(())
            }
        }

        impl<const P: u8> InputPin for Pin<$PORT, P, Input> {
            type Error = Infallible;

            fn is_high(&self) -> Result<bool, Infallible> {
                Ok(self.pin_is_high())
            }

            fn is_low(&self) -> Result<bool, Infallible> {
                Ok(!self.pin_is_high())
            }
        }
    };
}

impl_port!(PORTB, portb, ddrb, pinb);
impl_port!(PORTC, portc, ddrc, pinc);
impl_port!(PORTD, portd, ddrd, pind);

/// Board pin assignment
pub mod board {
    use super::*;

    /// Serial receive line (PD0)
    pub type RxPin = Pin<PORTD, 0, Input>;
    /// Serial transmit line (PD1)
    pub type TxPin = Pin<PORTD, 1, Output>;
    /// Activity LED (PB5)
    pub type Led = Pin<PORTB, 5, Output>;
}

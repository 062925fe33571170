//! Software (bit-banged) serial transceiver
//!
//! 8N1 at the fixed build-time baud rate. All timing comes from a
//! [`BitClock`]; the line is a pair of `embedded-hal` digital pins. Both
//! directions are fully blocking with no buffering: transmit holds each
//! level for one bit period, receive busy-waits for a start edge and
//! samples at bit centers. A start-bit glitch or a bad stop bit drops the
//! byte and resynchronizes on the next start edge without reporting
//! anything to the caller.

use core::convert::Infallible;

use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::transport::Transport;

const START_LEVEL: bool = false;
const STOP_LEVEL: bool = true;
const BITS_PER_BYTE: u8 = 8;

/// Bit-period delays for the transceiver.
///
/// `wait_bit` blocks for one full bit period from now; `wait_half_bit`
/// blocks for half a period, used once per frame to align sampling to the
/// middle of each bit.
pub trait BitClock {
    fn wait_bit(&mut self);
    fn wait_half_bit(&mut self);
}

/// Receive faults, resolved locally by resynchronizing. Never escape
/// `read_byte`.
#[derive(Debug, PartialEq)]
enum RxFault {
    /// Start level gone at the half-bit sample point
    Glitch,
    /// Stop position not at the stop level
    Framing,
}

pub struct SoftUart<RX, TX, CLK> {
    rx: RX,
    tx: TX,
    clock: CLK,
}

impl<RX, TX, CLK> SoftUart<RX, TX, CLK>
where
    RX: InputPin<Error = Infallible>,
    TX: OutputPin<Error = Infallible>,
    CLK: BitClock,
{
    pub fn new(rx: RX, tx: TX, clock: CLK) -> Self {
        Self { rx, tx, clock }
    }

    fn rx_level(&self) -> bool {
        match self.rx.is_high() {
            Ok(level) => level,
            Err(never) => match never {},
        }
    }

    fn set_tx(&mut self, level: bool) {
        let result = if level {
            self.tx.set_high()
        } else {
            self.tx.set_low()
        };
        match result {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// One frame, entered right after the start edge was seen.
    fn read_frame(&mut self) -> Result<u8, RxFault> {
        self.clock.wait_half_bit();
        if self.rx_level() != START_LEVEL {
            return Err(RxFault::Glitch);
        }
        self.clock.wait_bit();

        let mut byte = 0u8;
        for _ in 0..BITS_PER_BYTE {
            // LSB arrives first: shift right, insert at the top.
            byte >>= 1;
            if self.rx_level() {
                byte |= 0x80;
            }
            self.clock.wait_bit();
        }

        if self.rx_level() != STOP_LEVEL {
            return Err(RxFault::Framing);
        }
        Ok(byte)
    }
}

impl<RX, TX, CLK> Transport for SoftUart<RX, TX, CLK>
where
    RX: InputPin<Error = Infallible>,
    TX: OutputPin<Error = Infallible>,
    CLK: BitClock,
{
    fn init(&mut self) {
        // Line idles at the stop level.
        self.set_tx(STOP_LEVEL);
    }

    fn read_byte(&mut self) -> u8 {
        loop {
            while self.rx_level() != START_LEVEL {}

            match self.read_frame() {
                Ok(byte) => return byte,
                // Drop the byte, resynchronize on the next start edge.
                Err(_) => continue,
            }
        }
    }

    fn write_byte(&mut self, byte: u8) {
        let mut bits = byte;

        self.set_tx(START_LEVEL);
        self.clock.wait_bit();
        for _ in 0..BITS_PER_BYTE {
            self.set_tx(bits & 0x01 != 0);
            bits >>= 1;
            self.clock.wait_bit();
        }
        self.set_tx(STOP_LEVEL);
        self.clock.wait_bit();
    }
}

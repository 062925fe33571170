//! Debug console over the serial transport
//!
//! Never used in the protocol path; command replies are written by the
//! dispatcher alone. The binary prints a one-line banner through this
//! under the `debug` feature.

use core::convert::Infallible;

use ufmt::uWrite;

use crate::transport::Transport;

pub struct Console<'a, T: Transport> {
    transport: &'a mut T,
}

impl<'a, T: Transport> Console<'a, T> {
    pub fn new(transport: &'a mut T) -> Self {
        Self { transport }
    }

    pub fn write_line(&mut self, s: &str) {
        for byte in s.bytes() {
            self.transport.write_byte(byte);
        }
        self.transport.write_byte(b'\r');
        self.transport.write_byte(b'\n');
    }

    // Debug helper - print hex value
    pub fn write_hex(&mut self, val: u8) {
        const HEX_CHARS: [u8; 16] = *b"0123456789ABCDEF";
        self.transport.write_byte(HEX_CHARS[(val >> 4) as usize]);
        self.transport.write_byte(HEX_CHARS[(val & 0xF) as usize]);
    }
}

impl<'a, T: Transport> uWrite for Console<'a, T> {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        for byte in s.bytes() {
            self.transport.write_byte(byte);
        }
        Ok(())
    }
}

//! Command dispatch loop
//!
//! One command per cycle: block on an opcode byte, run the handler, send
//! exactly one acknowledgment byte, feed the watchdog. The reset command
//! is the single exception: it never acknowledges and never returns.
//!
//! Every handler consumes a fixed number of bytes from the transport for
//! its opcode, success or failure, so a failed command never leaves the
//! host and device disagreeing about where the next opcode starts.

pub mod reset;

use crate::checksum;
use crate::config;
use crate::flash::Flash;
use crate::transport::Transport;
use crate::watchdog::Watchdog;

const ACK_OK: u8 = b'Y';
const ACK_FAIL: u8 = b'N';

#[derive(Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum Command {
    DeviceId = b'I',
    LoadAddress = b'A',
    WritePage = b'W',
    Reset = b'R',
}

impl Command {
    pub fn from_byte(byte: u8) -> Option<Command> {
        match byte {
            b'I' => Some(Command::DeviceId),
            b'A' => Some(Command::LoadAddress),
            b'W' => Some(Command::WritePage),
            b'R' => Some(Command::Reset),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum CommandError {
    UnknownCommand,
    SignatureMismatch,
    ChecksumMismatch,
}

pub type Result<T> = core::result::Result<T, CommandError>;

pub struct Bootloader<T, F, W> {
    transport: T,
    flash: F,
    watchdog: W,
    address: u16,
}

impl<T, F, W> Bootloader<T, F, W>
where
    T: Transport,
    F: Flash,
    W: Watchdog,
{
    pub fn new(transport: T, flash: F, watchdog: W) -> Self {
        Self {
            transport,
            flash,
            watchdog,
            address: 0,
        }
    }

    /// Current page address. Set by the load-address command, advanced by
    /// one page per successful write.
    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn flash(&self) -> &F {
        &self.flash
    }

    pub fn run(&mut self) -> ! {
        loop {
            self.process();
        }
    }

    /// One full command cycle.
    pub fn process(&mut self) {
        let result = match Command::from_byte(self.transport.read_byte()) {
            Some(Command::DeviceId) => self.cmd_device_id(),
            Some(Command::LoadAddress) => self.cmd_load_address(),
            Some(Command::WritePage) => self.cmd_write_page(),
            Some(Command::Reset) => self.watchdog.force_reset(),
            None => Err(CommandError::UnknownCommand),
        };

        let ack = if result.is_ok() { ACK_OK } else { ACK_FAIL };
        self.transport.write_byte(ack);
        self.watchdog.feed();
    }

    fn read_u16_le(&mut self) -> u16 {
        let lo = self.transport.read_byte();
        let hi = self.transport.read_byte();
        u16::from_le_bytes([lo, hi])
    }

    /// Always reads the full signature, even after a mismatched byte.
    fn cmd_device_id(&mut self) -> Result<()> {
        let mut matches = true;
        for &expected in config::DEVICE_SIGNATURE.iter() {
            if self.transport.read_byte() != expected {
                matches = false;
            }
        }

        if matches {
            Ok(())
        } else {
            Err(CommandError::SignatureMismatch)
        }
    }

    fn cmd_load_address(&mut self) -> Result<()> {
        self.address = self.read_u16_le();
        Ok(())
    }

    fn cmd_write_page(&mut self) -> Result<()> {
        let page = self.address;

        // Erased before the checksum and payload are read, so the erase
        // latency overlaps reception. A checksum failure below therefore
        // still leaves the page erased.
        self.flash.page_erase(page);

        let expected = self.read_u16_le();
        let mut buf = [0u8; config::PAGE_SIZE];
        for byte in buf.iter_mut() {
            *byte = self.transport.read_byte();
        }

        if checksum::checksum(&buf) != expected {
            return Err(CommandError::ChecksumMismatch);
        }

        self.flash.busy_wait();
        for (idx, word) in buf.chunks_exact(2).enumerate() {
            let offset = (idx * 2) as u16;
            self.flash
                .page_fill(page.wrapping_add(offset), u16::from_le_bytes([word[0], word[1]]));
        }
        self.flash.page_write(page);
        self.flash.busy_wait();
        self.flash.rww_enable();

        // Auto-increment to the next page
        self.address = self.address.wrapping_add(config::PAGE_SIZE as u16);
        Ok(())
    }
}

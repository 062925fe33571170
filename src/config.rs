//! Configuration constants for the ATmega328P bootloader

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// Serial baud rate (8N1, fixed at build time)
pub const UART_BAUD: u32 = 9600;

/// Timer0 prescaler used by the software UART bit clock
pub const SOFTUART_PRESCALER: u32 = 8;

/// Timer0 ticks per serial bit
pub const BIT_PERIOD_TICKS: u32 = (CPU_FREQ_HZ / SOFTUART_PRESCALER) / UART_BAUD;

// The bit period must fit the 8-bit counter
const _: () = assert!(BIT_PERIOD_TICKS >= 1, "baud rate is too high");
const _: () = assert!(BIT_PERIOD_TICKS <= 255, "baud rate is too low");

/// SPM flash page size in bytes
pub const PAGE_SIZE: usize = 128;

/// Device signature, matched against the bytes sent by the host
pub const DEVICE_SIGNATURE: [u8; 3] = [0x1E, 0x95, 0x0F];

/// Application entry point (word address for the indirect jump)
pub const APP_ENTRY: u16 = 0x0000;

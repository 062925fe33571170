#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(asm_experimental_arch))]

pub mod bootloader;
pub mod checksum;
pub mod config;
pub mod console;
pub mod flash;
pub mod hal;
pub mod transport;
pub mod watchdog;

use std::env;

fn main() {
    let target = env::var("TARGET").unwrap_or_default();

    // Configure for ATmega328P
    if target.contains("avr") {
        println!("cargo:rustc-link-arg=-mmcu=atmega328p");
    }

    // Pass CPU frequency for timing calculations
    println!("cargo:rustc-env=MCU_FREQ_HZ=16000000");
}

#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    use atmega328p_bootloader::bootloader::{reset, Bootloader};
    use atmega328p_bootloader::hal::{board, Mcu, SpmFlash, Wdt};
    use atmega328p_bootloader::transport::Transport;
    use atmega328p_bootloader::watchdog::{Watchdog, WatchdogTimeout};

    // Sole owner of the device from here on; drivers reach registers
    // through the peripheral pointers.
    let _dp = avr_device::atmega328p::Peripherals::take().unwrap();

    let mut led = board::Led::new().into_output();
    led.toggle();

    // Decides bootloader vs. application; may never come back.
    reset::check_reset_cause(&mut Mcu::new());

    // Inactivity timer, fed once per processed command
    let mut wdt = Wdt::new();
    wdt.start(WatchdogTimeout::Ms250);

    #[cfg(not(feature = "hw-uart"))]
    let mut transport = {
        use atmega328p_bootloader::hal::BitTimer;
        use atmega328p_bootloader::transport::SoftUart;

        let rx = board::RxPin::new().into_pull_up_input();
        let tx = board::TxPin::new().into_output();
        SoftUart::new(rx, tx, BitTimer::new())
    };
    #[cfg(feature = "hw-uart")]
    let mut transport = atmega328p_bootloader::transport::usart::Usart0::new();

    transport.init();

    #[cfg(feature = "debug")]
    {
        use atmega328p_bootloader::console::Console;

        let mut console = Console::new(&mut transport);
        let _ = ufmt::uwriteln!(console, "atmega328p_bootloader {}", env!("CARGO_PKG_VERSION"));
    }

    Bootloader::new(transport, SpmFlash::new(), wdt).run()
}

#[cfg(not(target_arch = "avr"))]
fn main() {}

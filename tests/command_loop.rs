//! End-to-end exercises of the command loop against simulated hardware.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use atmega328p_bootloader::bootloader::reset::{check_reset_cause, ResetControl};
use atmega328p_bootloader::bootloader::Bootloader;
use atmega328p_bootloader::checksum::checksum;
use atmega328p_bootloader::config;
use atmega328p_bootloader::flash::Flash;
use atmega328p_bootloader::transport::Transport;
use atmega328p_bootloader::watchdog::{Watchdog, WatchdogTimeout};

const PAGE: usize = config::PAGE_SIZE;
const ERASED: u8 = 0xFF;

struct ScriptTransport {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl ScriptTransport {
    fn new(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            output: Vec::new(),
        }
    }
}

impl Transport for ScriptTransport {
    fn init(&mut self) {}

    fn read_byte(&mut self) -> u8 {
        self.input.pop_front().expect("host script ran dry")
    }

    fn write_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }
}

struct SimFlash {
    memory: Vec<u8>,
    buffer: Vec<(u16, u16)>,
}

impl SimFlash {
    fn new() -> Self {
        // Pre-populated, as if an application image were resident.
        Self {
            memory: vec![0u8; 0x10000],
            buffer: Vec::new(),
        }
    }

    fn page(&self, addr: u16) -> &[u8] {
        &self.memory[addr as usize..addr as usize + PAGE]
    }
}

impl Flash for SimFlash {
    fn page_erase(&mut self, addr: u16) {
        for byte in &mut self.memory[addr as usize..addr as usize + PAGE] {
            *byte = ERASED;
        }
    }

    fn page_fill(&mut self, addr: u16, word: u16) {
        self.buffer.push((addr, word));
    }

    fn page_write(&mut self, _addr: u16) {
        for (addr, word) in std::mem::take(&mut self.buffer) {
            let bytes = word.to_le_bytes();
            self.memory[addr as usize] = bytes[0];
            self.memory[addr as usize + 1] = bytes[1];
        }
    }

    fn busy_wait(&mut self) {}

    fn rww_enable(&mut self) {}
}

#[derive(Default)]
struct WdtState {
    started: Option<WatchdogTimeout>,
    feeds: usize,
}

struct SimWatchdog(Rc<RefCell<WdtState>>);

impl Watchdog for SimWatchdog {
    fn start(&mut self, timeout: WatchdogTimeout) {
        self.0.borrow_mut().started = Some(timeout);
    }

    fn feed(&mut self) {
        self.0.borrow_mut().feeds += 1;
    }

    fn disable(&mut self) {
        self.0.borrow_mut().started = None;
    }

    fn force_reset(&mut self) -> ! {
        self.start(WatchdogTimeout::Ms16);
        panic!("watchdog reset");
    }
}

fn boot(input: &[u8]) -> (Bootloader<ScriptTransport, SimFlash, SimWatchdog>, Rc<RefCell<WdtState>>) {
    let wdt = Rc::new(RefCell::new(WdtState::default()));
    let loader = Bootloader::new(
        ScriptTransport::new(input),
        SimFlash::new(),
        SimWatchdog(wdt.clone()),
    );
    (loader, wdt)
}

fn payload() -> Vec<u8> {
    (0..PAGE).map(|i| (i as u8).wrapping_mul(31) ^ 0x5A).collect()
}

fn write_command(data: &[u8]) -> Vec<u8> {
    let mut bytes = vec![b'W'];
    bytes.extend_from_slice(&checksum(data).to_le_bytes());
    bytes.extend_from_slice(data);
    bytes
}

#[test]
fn program_one_page_at_a_loaded_address() {
    let page = payload();
    let mut input = vec![b'A', 0x00, 0x10];
    input.extend(write_command(&page));
    let (mut loader, wdt) = boot(&input);

    loader.process();
    assert_eq!(loader.address(), 0x1000);
    loader.process();

    assert_eq!(loader.transport().output, [b'Y', b'Y']);
    assert_eq!(loader.flash().page(0x1000), &page[..]);
    assert_eq!(loader.address(), 0x1000 + PAGE as u16);
    assert_eq!(wdt.borrow().feeds, 2);
}

#[test]
fn consecutive_pages_autoincrement() {
    let first = payload();
    let second: Vec<u8> = first.iter().map(|b| b.wrapping_add(1)).collect();
    let mut input = vec![b'A', 0x00, 0x00];
    input.extend(write_command(&first));
    input.extend(write_command(&second));
    let (mut loader, _wdt) = boot(&input);

    for _ in 0..3 {
        loader.process();
    }

    assert_eq!(loader.transport().output, [b'Y', b'Y', b'Y']);
    assert_eq!(loader.flash().page(0x0000), &first[..]);
    assert_eq!(loader.flash().page(PAGE as u16), &second[..]);
}

#[test]
fn failed_write_keeps_the_stream_in_sync() {
    let page = payload();
    let mut corrupted = write_command(&page);
    corrupted[1] ^= 0x01;
    let mut input = vec![b'A', 0x00, 0x10];
    input.extend(corrupted);
    input.extend([b'I', 0x1E, 0x95, 0x0F]);
    let (mut loader, _wdt) = boot(&input);

    for _ in 0..3 {
        loader.process();
    }

    // The mangled page fails, yet the identify that follows parses
    // cleanly: the failed command consumed exactly its fixed byte count.
    assert_eq!(loader.transport().output, [b'Y', b'N', b'Y']);
    assert!(loader.flash().page(0x1000).iter().all(|b| *b == ERASED));
    assert_eq!(loader.address(), 0x1000);
    assert!(loader.transport().input.is_empty());
}

#[test]
fn signature_probe_then_unknown_opcode() {
    let (mut loader, wdt) = boot(&[b'I', 0x1E, 0x95, 0x0F, b'X', b'I', 0x1E, 0x00, 0x0F]);

    for _ in 0..3 {
        loader.process();
    }

    assert_eq!(loader.transport().output, [b'Y', b'N', b'N']);
    assert_eq!(wdt.borrow().feeds, 3);
}

#[test]
fn reset_command_replies_nothing_and_restarts() {
    let (mut loader, wdt) = boot(&[b'R', b'I']);

    let outcome = catch_unwind(AssertUnwindSafe(|| loader.process()));

    assert!(outcome.is_err());
    assert_eq!(wdt.borrow().started, Some(WatchdogTimeout::Ms16));
    assert_eq!(wdt.borrow().feeds, 0);
    assert!(loader.transport().output.is_empty());
    // The trailing byte was never consumed.
    assert_eq!(loader.transport().input.len(), 1);
}

#[derive(Default)]
struct GuardState {
    external: bool,
    external_cleared: bool,
    entered_application: bool,
}

struct SimGuard(Rc<RefCell<GuardState>>);

impl ResetControl for SimGuard {
    fn external_reset(&mut self) -> bool {
        self.0.borrow().external
    }

    fn clear_external_flag(&mut self) {
        self.0.borrow_mut().external_cleared = true;
    }

    fn enter_application(&mut self) -> ! {
        self.0.borrow_mut().entered_application = true;
        panic!("jumped to application");
    }
}

#[test]
fn watchdog_restart_bypasses_the_bootloader() {
    // The power-up sequence checks the reset cause before any transport
    // exists; a watchdog-caused restart must jump without serial I/O.
    let state = Rc::new(RefCell::new(GuardState::default()));

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        check_reset_cause(&mut SimGuard(state.clone()));
        // Unreached on the bypass path: the transport would be brought
        // up only after the guard decides to stay.
        let mut transport = ScriptTransport::new(&[]);
        transport.init();
    }));

    assert!(outcome.is_err());
    assert!(state.borrow().entered_application);
    assert!(!state.borrow().external_cleared);
}

#[test]
fn external_reset_enters_the_command_loop() {
    let state = Rc::new(RefCell::new(GuardState {
        external: true,
        ..GuardState::default()
    }));

    check_reset_cause(&mut SimGuard(state.clone()));

    assert!(state.borrow().external_cleared);
    assert!(!state.borrow().entered_application);

    // And the loop is reachable afterwards.
    let (mut loader, _wdt) = boot(&[b'A', 0x10, 0x20]);
    loader.process();
    assert_eq!(loader.address(), 0x2010);
}

//! # keyboard
//!
//! A PS/2 style keyboard hanging off a single memory-mapped port. Each key
//! press becomes a make/break scancode sequence; the bytes are fed to the
//! port one at a time, spaced out in CPU ticks, and each one raises the
//! interrupt line until the program touches the port.
use std::collections::{HashMap, VecDeque};
use std::sync::OnceLock;

use log::{debug, trace};

use crate::config::KeyboardKind;
use crate::cpu::{Access, CpuHandle, IrqLine, WatchId};
use crate::input::Key;
use crate::peripheral::Peripheral;

const SHIFT_SCANCODE: u8 = 0x12;
const RELEASE_SCANCODE: u8 = 0xf0;
const EXTENDED_SCANCODE: u8 = 0xe0;

/// queue entry that only burns a tick
const PLACEHOLDER: u8 = 0;

/// placeholders queued after every real byte
pub const TICKS_BETWEEN_BYTES: usize = 100;

/// how a key's code byte is wrapped into a make/break sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Plain,
    Shift,
    Extended,
}

/// the bytes for one complete press and release of a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScancodeSequence(Vec<u8>);

impl ScancodeSequence {
    pub fn build(code: u8, category: Category) -> Self {
        ScancodeSequence(match category {
            Category::Plain => vec![code, RELEASE_SCANCODE, code],
            Category::Shift => vec![
                SHIFT_SCANCODE,
                code,
                RELEASE_SCANCODE,
                code,
                RELEASE_SCANCODE,
                SHIFT_SCANCODE,
            ],
            Category::Extended => vec![
                EXTENDED_SCANCODE,
                code,
                EXTENDED_SCANCODE,
                RELEASE_SCANCODE,
                code,
            ],
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

use Category::{Extended, Plain, Shift};

/// scancode set 2, US layout
#[rustfmt::skip]
const PS2_SCANCODES: &[(Key, u8, Category)] = &[
    (Key::Char('`'), 0x0e, Plain),  (Key::Char('~'), 0x0e, Shift),
    (Key::Char('1'), 0x16, Plain),  (Key::Char('!'), 0x16, Shift),
    (Key::Char('2'), 0x1e, Plain),  (Key::Char('@'), 0x1e, Shift),
    (Key::Char('3'), 0x26, Plain),  (Key::Char('#'), 0x26, Shift),
    (Key::Char('4'), 0x25, Plain),  (Key::Char('$'), 0x25, Shift),
    (Key::Char('5'), 0x2e, Plain),  (Key::Char('%'), 0x2e, Shift),
    (Key::Char('6'), 0x36, Plain),  (Key::Char('^'), 0x36, Shift),
    (Key::Char('7'), 0x3d, Plain),  (Key::Char('&'), 0x3d, Shift),
    (Key::Char('8'), 0x3e, Plain),  (Key::Char('*'), 0x3e, Shift),
    (Key::Char('9'), 0x46, Plain),  (Key::Char('('), 0x46, Shift),
    (Key::Char('0'), 0x45, Plain),  (Key::Char(')'), 0x45, Shift),
    (Key::Char('-'), 0x4e, Plain),  (Key::Char('_'), 0x4e, Shift),
    (Key::Char('='), 0x55, Plain),  (Key::Char('+'), 0x55, Shift),
    (Key::Backspace, 0x66, Plain),
    (Key::Tab, 0x0d, Plain),
    (Key::Char('q'), 0x15, Plain),  (Key::Char('Q'), 0x15, Shift),
    (Key::Char('w'), 0x1d, Plain),  (Key::Char('W'), 0x1d, Shift),
    (Key::Char('e'), 0x24, Plain),  (Key::Char('E'), 0x24, Shift),
    (Key::Char('r'), 0x2d, Plain),  (Key::Char('R'), 0x2d, Shift),
    (Key::Char('t'), 0x2c, Plain),  (Key::Char('T'), 0x2c, Shift),
    (Key::Char('y'), 0x35, Plain),  (Key::Char('Y'), 0x35, Shift),
    (Key::Char('u'), 0x3c, Plain),  (Key::Char('U'), 0x3c, Shift),
    (Key::Char('i'), 0x43, Plain),  (Key::Char('I'), 0x43, Shift),
    (Key::Char('o'), 0x44, Plain),  (Key::Char('O'), 0x44, Shift),
    (Key::Char('p'), 0x4d, Plain),  (Key::Char('P'), 0x4d, Shift),
    (Key::Char('['), 0x54, Plain),  (Key::Char('{'), 0x54, Shift),
    (Key::Char(']'), 0x5b, Plain),  (Key::Char('}'), 0x5b, Shift),
    (Key::Char('\\'), 0x5d, Plain), (Key::Char('|'), 0x5d, Shift),
    // TODO: caps lock has no terminal key event to hang off
    (Key::Char('a'), 0x1c, Plain),  (Key::Char('A'), 0x1c, Shift),
    (Key::Char('s'), 0x1b, Plain),  (Key::Char('S'), 0x1b, Shift),
    (Key::Char('d'), 0x23, Plain),  (Key::Char('D'), 0x23, Shift),
    (Key::Char('f'), 0x2b, Plain),  (Key::Char('F'), 0x2b, Shift),
    (Key::Char('g'), 0x34, Plain),  (Key::Char('G'), 0x34, Shift),
    (Key::Char('h'), 0x33, Plain),  (Key::Char('H'), 0x33, Shift),
    (Key::Char('j'), 0x3b, Plain),  (Key::Char('J'), 0x3b, Shift),
    (Key::Char('k'), 0x42, Plain),  (Key::Char('K'), 0x42, Shift),
    (Key::Char('l'), 0x4b, Plain),  (Key::Char('L'), 0x4b, Shift),
    (Key::Char(';'), 0x4c, Plain),  (Key::Char(':'), 0x4c, Shift),
    (Key::Char('\''), 0x52, Plain), (Key::Char('"'), 0x52, Shift),
    (Key::Enter, 0x5a, Plain),
    (Key::Char('z'), 0x1a, Plain),  (Key::Char('Z'), 0x1a, Shift),
    (Key::Char('x'), 0x22, Plain),  (Key::Char('X'), 0x22, Shift),
    (Key::Char('c'), 0x21, Plain),  (Key::Char('C'), 0x21, Shift),
    (Key::Char('v'), 0x2a, Plain),  (Key::Char('V'), 0x2a, Shift),
    (Key::Char('b'), 0x32, Plain),  (Key::Char('B'), 0x32, Shift),
    (Key::Char('n'), 0x31, Plain),  (Key::Char('N'), 0x31, Shift),
    (Key::Char('m'), 0x3a, Plain),  (Key::Char('M'), 0x3a, Shift),
    (Key::Char(','), 0x41, Plain),  (Key::Char('<'), 0x41, Shift),
    (Key::Char('.'), 0x49, Plain),  (Key::Char('>'), 0x49, Shift),
    (Key::Char('/'), 0x4a, Plain),  (Key::Char('?'), 0x4a, Shift),
    (Key::Char(' '), 0x29, Plain),
    (Key::Up, 0x75, Extended),
    (Key::Left, 0x6b, Extended),
    (Key::Down, 0x72, Extended),
    (Key::Right, 0x74, Extended),
];

/// sequences for every supported key, built on first use
fn ps2_sequences() -> &'static HashMap<Key, ScancodeSequence> {
    static SEQUENCES: OnceLock<HashMap<Key, ScancodeSequence>> = OnceLock::new();
    SEQUENCES.get_or_init(|| {
        PS2_SCANCODES
            .iter()
            .map(|(key, code, category)| (*key, ScancodeSequence::build(*code, *category)))
            .collect()
    })
}

/// PS/2 keyboard feeding one byte at a time into `port`
pub struct Ps2Keyboard {
    port: u16,
    ack: Access,
    cpu: CpuHandle,
    queue: VecDeque<u8>,
    line: IrqLine,
    watch: Option<WatchId>,
}

impl Ps2Keyboard {
    pub fn new(port: u16, ack: Access, cpu: CpuHandle) -> Self {
        Ps2Keyboard {
            port,
            ack,
            cpu,
            queue: VecDeque::new(),
            line: IrqLine::new(),
            watch: None,
        }
    }

    /// queue the scancode bytes for `key`; keys without a scancode are dropped
    pub fn press(&mut self, key: Key) {
        let Some(sequence) = ps2_sequences().get(&key) else {
            debug!("ps2: no scancode for {:?}", key);
            return;
        };
        for byte in sequence.bytes() {
            self.queue.push_back(*byte);
            self.queue
                .extend(std::iter::repeat(PLACEHOLDER).take(TICKS_BETWEEN_BYTES));
        }
        debug!("ps2: queued {:?} as {:02x?}", key, sequence.bytes());
    }

    /// queue entries not yet consumed, placeholders included
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// put a byte on the port and hold the line until the program touches it
    fn emit(&mut self, byte: u8) {
        self.line.raise();
        let mut cpu = self.cpu.borrow_mut();
        if let Some(stale) = self.watch.take() {
            cpu.unwatch(stale);
        }
        self.watch = Some(cpu.watch(self.port, self.ack, self.line.clone()));
        cpu.load(&[byte], self.port);
        trace!("ps2: {:#04x} -> {:#06x}", byte, self.port);
    }
}

impl Peripheral for Ps2Keyboard {
    fn kind(&self) -> &'static str {
        "ps2"
    }

    fn asserting(&self) -> bool {
        self.line.is_asserted()
    }

    fn needs_timing(&self) -> bool {
        true
    }

    fn tick(&mut self, ticks: u64) {
        for _ in 0..ticks {
            let Some(byte) = self.queue.pop_front() else {
                // nothing to deliver
                break;
            };
            if byte != PLACEHOLDER {
                self.emit(byte);
            }
        }
    }
}

/// every keyboard the harness can emulate
pub enum Keyboard {
    Ps2(Ps2Keyboard),
    /// takes no keys and never interrupts
    Unplugged,
}

impl Keyboard {
    pub fn build(kind: KeyboardKind, port: u16, ack: Access, cpu: CpuHandle) -> Self {
        match kind {
            KeyboardKind::Ps2 => Keyboard::Ps2(Ps2Keyboard::new(port, ack, cpu)),
            KeyboardKind::Unplugged => Keyboard::Unplugged,
        }
    }

    pub fn press(&mut self, key: Key) {
        match self {
            Keyboard::Ps2(k) => k.press(key),
            Keyboard::Unplugged => debug!("no keyboard, dropping {:?}", key),
        }
    }
}

impl Peripheral for Keyboard {
    fn kind(&self) -> &'static str {
        match self {
            Keyboard::Ps2(k) => k.kind(),
            Keyboard::Unplugged => "none",
        }
    }

    fn asserting(&self) -> bool {
        match self {
            Keyboard::Ps2(k) => k.asserting(),
            Keyboard::Unplugged => false,
        }
    }

    fn needs_timing(&self) -> bool {
        match self {
            Keyboard::Ps2(k) => k.needs_timing(),
            Keyboard::Unplugged => false,
        }
    }

    fn tick(&mut self, ticks: u64) {
        match self {
            Keyboard::Ps2(k) => k.tick(ticks),
            Keyboard::Unplugged => {}
        }
    }
}

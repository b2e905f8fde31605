use super::IrqLine;

// NB. addresses are u16 as per the 6502; lengths are usize to stop endless casting

/// how much RAM we have
const RAM_SIZE_BYTES: usize = 0x10000;

/// which kinds of bus access acknowledge a watch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// fires on a read only
    Read,
    /// fires on a read or a write
    ReadWrite,
}

impl Access {
    fn matches(self, write: bool) -> bool {
        match self {
            Access::Read => !write,
            Access::ReadWrite => true,
        }
    }
}

/// handle for removing a watch before it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

#[derive(Debug)]
struct Watch {
    id: WatchId,
    address: u16,
    access: Access,
    line: IrqLine,
}

/// Flat 64K address space as seen by the processor.
///
/// Bus accesses (`read`/`write`) are what the running program does and are
/// the only thing that fires acknowledge watches; `load`/`peek` are the
/// harness reaching in from outside and have no side effects.
pub struct Memory {
    bytes: Box<[u8]>,
    watches: Vec<Watch>,
    next_watch: u64,
    random_port: Option<u16>,
    rng: fastrand::Rng,
}

impl Default for Memory {
    fn default() -> Self {
        Memory::new()
    }
}

impl Memory {
    /// zeroed memory
    pub fn new() -> Self {
        Memory {
            bytes: vec![0u8; RAM_SIZE_BYTES].into_boxed_slice(),
            watches: Vec::new(),
            next_watch: 0,
            random_port: None,
            rng: fastrand::Rng::new(),
        }
    }

    /// reads of `port` by the program return a fresh random byte
    pub fn set_random_port(&mut self, port: Option<u16>) {
        self.random_port = port;
    }

    /// write a chunk of bytes, wrapping at the top of the address space
    pub fn load(&mut self, data: &[u8], addr: u16) {
        for (i, byte) in data.iter().enumerate() {
            let a = addr.wrapping_add(i as u16) as usize;
            self.bytes[a] = *byte;
        }
    }

    pub fn peek(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    /// copy out `len` bytes, wrapping at the top of the address space
    pub fn peek_range(&self, addr: u16, len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| self.peek(addr.wrapping_add(i as u16)))
            .collect()
    }

    /// a read by the program
    pub fn read(&mut self, addr: u16) -> u8 {
        self.acknowledge(addr, false);
        match self.random_port {
            Some(port) if port == addr => self.rng.u8(..),
            _ => self.bytes[addr as usize],
        }
    }

    /// a write by the program
    pub fn write(&mut self, addr: u16, value: u8) {
        self.acknowledge(addr, true);
        self.bytes[addr as usize] = value;
    }

    /// get a little-endian word through the bus (vectors, pointers)
    pub fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub fn watch(&mut self, address: u16, access: Access, line: IrqLine) -> WatchId {
        let id = WatchId(self.next_watch);
        self.next_watch += 1;
        self.watches.push(Watch {
            id,
            address,
            access,
            line,
        });
        id
    }

    pub fn unwatch(&mut self, id: WatchId) -> bool {
        let before = self.watches.len();
        self.watches.retain(|w| w.id != id);
        self.watches.len() != before
    }

    pub fn watch_count(&self) -> usize {
        self.watches.len()
    }

    fn acknowledge(&mut self, addr: u16, write: bool) {
        if self.watches.is_empty() {
            return;
        }
        self.watches.retain(|w| {
            if w.address == addr && w.access.matches(write) {
                w.line.clear();
                false
            } else {
                true
            }
        });
    }
}

//! # cpu
//!
//! The execution primitive the harness drives. Everything outside this module
//! talks to the processor through the [`Cpu`] trait, so the scheduler and the
//! peripherals never need to know which core is plugged in.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub mod memory;
pub mod mos6502;

pub use memory::{Access, Memory, WatchId};
pub use mos6502::Mos6502;

/// shared handle to the processor; the runner steps it, peripherals poke
/// their ports through it
pub type CpuHandle = Rc<RefCell<dyn Cpu>>;

/// snapshot of the programmer-visible registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    /// stack pointer, page one
    pub s: u8,
    pub pc: u16,
    /// processor status, NV-BDIZC
    pub p: u8,
}

/// A level-triggered interrupt line. Clones share the same level, so a
/// peripheral can hand a copy to the memory's acknowledge watch list and see
/// it drop when the program services the port.
#[derive(Debug, Clone, Default)]
pub struct IrqLine(Rc<Cell<bool>>);

impl IrqLine {
    pub fn new() -> Self {
        IrqLine::default()
    }

    pub fn raise(&self) {
        self.0.set(true);
    }

    pub fn clear(&self) {
        self.0.set(false);
    }

    pub fn is_asserted(&self) -> bool {
        self.0.get()
    }
}

/// The processor interface consumed by the runner and peripherals.
pub trait Cpu {
    /// copy bytes straight into memory; never counts as a bus access
    fn load(&mut self, bytes: &[u8], address: u16);

    /// run the reset sequence, fetching the program counter from the vector
    fn reset(&mut self);

    /// execute one instruction, returning the ticks it took
    fn step(&mut self) -> u64;

    /// execute whole instructions until at least `ticks` have elapsed
    fn exec(&mut self, ticks: u64) {
        let target = self.tick_count().saturating_add(ticks);
        while self.tick_count() < target {
            self.step();
        }
    }

    /// maskable interrupt; ignored while interrupts are disabled
    fn interrupt_request(&mut self);

    fn non_maskable_interrupt(&mut self);

    /// side-effect free read for debuggers and video; wraps at 0xffff
    fn read(&self, address: u16, count: usize) -> Vec<u8>;

    fn registers(&self) -> Registers;

    fn instruction_count(&self) -> u64;

    fn tick_count(&self) -> u64;

    /// arm a one-shot acknowledge: the next matching access to `address`
    /// clears `line` and drops the watch
    fn watch(&mut self, address: u16, access: Access, line: IrqLine) -> WatchId;

    /// drop a watch that hasn't fired yet; false if it already fired
    fn unwatch(&mut self, id: WatchId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_irq_line_clones_share_level() {
        let line = IrqLine::new();
        let other = line.clone();
        assert!(!other.is_asserted());
        line.raise();
        assert!(other.is_asserted());
        other.clear();
        assert!(!line.is_asserted());
    }
}

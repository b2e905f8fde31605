//! NMOS 6502, stepped one instruction at a time.
//!
//! Each `step()` executes a whole instruction and charges its documented
//! cycle count, including the page-crossing and taken-branch penalties.
//! Undocumented opcodes execute as two-cycle NOPs.

use super::memory::{Access, Memory, WatchId};
use super::{Cpu, IrqLine, Registers};

/// Carry
pub const C: u8 = 0x01;
/// Zero
pub const Z: u8 = 0x02;
/// Interrupt disable
pub const I: u8 = 0x04;
/// Decimal mode
pub const D: u8 = 0x08;
/// Break, only meaningful in a pushed copy of P
pub const B: u8 = 0x10;
/// Unused, always reads as 1
pub const U: u8 = 0x20;
/// Overflow
pub const V: u8 = 0x40;
/// Negative
pub const N: u8 = 0x80;

const NMI_VECTOR: u16 = 0xfffa;
const RESET_VECTOR: u16 = 0xfffc;
const IRQ_VECTOR: u16 = 0xfffe;

/// cycles spent entering an interrupt handler
const INTERRUPT_CYCLES: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirect,
    IndirectIndexed,
    Relative,
}

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
}

/// opcode -> (operation, addressing mode, base cycles)
#[rustfmt::skip]
fn decode(opcode: u8) -> (Op, Mode, u8) {
    use Mode::*;
    use Op::*;
    match opcode {
        0x69 => (Adc, Immediate, 2), 0x65 => (Adc, ZeroPage, 3), 0x75 => (Adc, ZeroPageX, 4),
        0x6d => (Adc, Absolute, 4), 0x7d => (Adc, AbsoluteX, 4), 0x79 => (Adc, AbsoluteY, 4),
        0x61 => (Adc, IndexedIndirect, 6), 0x71 => (Adc, IndirectIndexed, 5),

        0x29 => (And, Immediate, 2), 0x25 => (And, ZeroPage, 3), 0x35 => (And, ZeroPageX, 4),
        0x2d => (And, Absolute, 4), 0x3d => (And, AbsoluteX, 4), 0x39 => (And, AbsoluteY, 4),
        0x21 => (And, IndexedIndirect, 6), 0x31 => (And, IndirectIndexed, 5),

        0x0a => (Asl, Accumulator, 2), 0x06 => (Asl, ZeroPage, 5), 0x16 => (Asl, ZeroPageX, 6),
        0x0e => (Asl, Absolute, 6), 0x1e => (Asl, AbsoluteX, 7),

        0x90 => (Bcc, Relative, 2), 0xb0 => (Bcs, Relative, 2), 0xf0 => (Beq, Relative, 2),
        0x30 => (Bmi, Relative, 2), 0xd0 => (Bne, Relative, 2), 0x10 => (Bpl, Relative, 2),
        0x50 => (Bvc, Relative, 2), 0x70 => (Bvs, Relative, 2),

        0x24 => (Bit, ZeroPage, 3), 0x2c => (Bit, Absolute, 4),
        0x00 => (Brk, Implied, 7),

        0x18 => (Clc, Implied, 2), 0xd8 => (Cld, Implied, 2), 0x58 => (Cli, Implied, 2),
        0xb8 => (Clv, Implied, 2),

        0xc9 => (Cmp, Immediate, 2), 0xc5 => (Cmp, ZeroPage, 3), 0xd5 => (Cmp, ZeroPageX, 4),
        0xcd => (Cmp, Absolute, 4), 0xdd => (Cmp, AbsoluteX, 4), 0xd9 => (Cmp, AbsoluteY, 4),
        0xc1 => (Cmp, IndexedIndirect, 6), 0xd1 => (Cmp, IndirectIndexed, 5),
        0xe0 => (Cpx, Immediate, 2), 0xe4 => (Cpx, ZeroPage, 3), 0xec => (Cpx, Absolute, 4),
        0xc0 => (Cpy, Immediate, 2), 0xc4 => (Cpy, ZeroPage, 3), 0xcc => (Cpy, Absolute, 4),

        0xc6 => (Dec, ZeroPage, 5), 0xd6 => (Dec, ZeroPageX, 6), 0xce => (Dec, Absolute, 6),
        0xde => (Dec, AbsoluteX, 7),
        0xca => (Dex, Implied, 2), 0x88 => (Dey, Implied, 2),

        0x49 => (Eor, Immediate, 2), 0x45 => (Eor, ZeroPage, 3), 0x55 => (Eor, ZeroPageX, 4),
        0x4d => (Eor, Absolute, 4), 0x5d => (Eor, AbsoluteX, 4), 0x59 => (Eor, AbsoluteY, 4),
        0x41 => (Eor, IndexedIndirect, 6), 0x51 => (Eor, IndirectIndexed, 5),

        0xe6 => (Inc, ZeroPage, 5), 0xf6 => (Inc, ZeroPageX, 6), 0xee => (Inc, Absolute, 6),
        0xfe => (Inc, AbsoluteX, 7),
        0xe8 => (Inx, Implied, 2), 0xc8 => (Iny, Implied, 2),

        0x4c => (Jmp, Absolute, 3), 0x6c => (Jmp, Indirect, 5),
        0x20 => (Jsr, Absolute, 6),

        0xa9 => (Lda, Immediate, 2), 0xa5 => (Lda, ZeroPage, 3), 0xb5 => (Lda, ZeroPageX, 4),
        0xad => (Lda, Absolute, 4), 0xbd => (Lda, AbsoluteX, 4), 0xb9 => (Lda, AbsoluteY, 4),
        0xa1 => (Lda, IndexedIndirect, 6), 0xb1 => (Lda, IndirectIndexed, 5),
        0xa2 => (Ldx, Immediate, 2), 0xa6 => (Ldx, ZeroPage, 3), 0xb6 => (Ldx, ZeroPageY, 4),
        0xae => (Ldx, Absolute, 4), 0xbe => (Ldx, AbsoluteY, 4),
        0xa0 => (Ldy, Immediate, 2), 0xa4 => (Ldy, ZeroPage, 3), 0xb4 => (Ldy, ZeroPageX, 4),
        0xac => (Ldy, Absolute, 4), 0xbc => (Ldy, AbsoluteX, 4),

        0x4a => (Lsr, Accumulator, 2), 0x46 => (Lsr, ZeroPage, 5), 0x56 => (Lsr, ZeroPageX, 6),
        0x4e => (Lsr, Absolute, 6), 0x5e => (Lsr, AbsoluteX, 7),

        0xea => (Nop, Implied, 2),

        0x09 => (Ora, Immediate, 2), 0x05 => (Ora, ZeroPage, 3), 0x15 => (Ora, ZeroPageX, 4),
        0x0d => (Ora, Absolute, 4), 0x1d => (Ora, AbsoluteX, 4), 0x19 => (Ora, AbsoluteY, 4),
        0x01 => (Ora, IndexedIndirect, 6), 0x11 => (Ora, IndirectIndexed, 5),

        0x48 => (Pha, Implied, 3), 0x08 => (Php, Implied, 3),
        0x68 => (Pla, Implied, 4), 0x28 => (Plp, Implied, 4),

        0x2a => (Rol, Accumulator, 2), 0x26 => (Rol, ZeroPage, 5), 0x36 => (Rol, ZeroPageX, 6),
        0x2e => (Rol, Absolute, 6), 0x3e => (Rol, AbsoluteX, 7),
        0x6a => (Ror, Accumulator, 2), 0x66 => (Ror, ZeroPage, 5), 0x76 => (Ror, ZeroPageX, 6),
        0x6e => (Ror, Absolute, 6), 0x7e => (Ror, AbsoluteX, 7),

        0x40 => (Rti, Implied, 6), 0x60 => (Rts, Implied, 6),

        0xe9 => (Sbc, Immediate, 2), 0xe5 => (Sbc, ZeroPage, 3), 0xf5 => (Sbc, ZeroPageX, 4),
        0xed => (Sbc, Absolute, 4), 0xfd => (Sbc, AbsoluteX, 4), 0xf9 => (Sbc, AbsoluteY, 4),
        0xe1 => (Sbc, IndexedIndirect, 6), 0xf1 => (Sbc, IndirectIndexed, 5),

        0x38 => (Sec, Implied, 2), 0xf8 => (Sed, Implied, 2), 0x78 => (Sei, Implied, 2),

        0x85 => (Sta, ZeroPage, 3), 0x95 => (Sta, ZeroPageX, 4), 0x8d => (Sta, Absolute, 4),
        0x9d => (Sta, AbsoluteX, 5), 0x99 => (Sta, AbsoluteY, 5),
        0x81 => (Sta, IndexedIndirect, 6), 0x91 => (Sta, IndirectIndexed, 6),
        0x86 => (Stx, ZeroPage, 3), 0x96 => (Stx, ZeroPageY, 4), 0x8e => (Stx, Absolute, 4),
        0x84 => (Sty, ZeroPage, 3), 0x94 => (Sty, ZeroPageX, 4), 0x8c => (Sty, Absolute, 4),

        0xaa => (Tax, Implied, 2), 0xa8 => (Tay, Implied, 2), 0xba => (Tsx, Implied, 2),
        0x8a => (Txa, Implied, 2), 0x9a => (Txs, Implied, 2), 0x98 => (Tya, Implied, 2),

        _ => (Nop, Implied, 2),
    }
}

/// The MOS 6502 and the 64K it addresses.
pub struct Mos6502 {
    pub regs: Registers,
    memory: Memory,
    ticks: u64,
    instructions: u64,
}

impl Default for Mos6502 {
    fn default() -> Self {
        Mos6502::new()
    }
}

impl Mos6502 {
    pub fn new() -> Self {
        Mos6502::with_memory(Memory::new())
    }

    pub fn with_memory(memory: Memory) -> Self {
        Mos6502 {
            regs: Registers {
                s: 0xfd,
                p: U | I,
                ..Registers::default()
            },
            memory,
            ticks: 0,
            instructions: 0,
        }
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    fn flag(&self, flag: u8) -> bool {
        self.regs.p & flag != 0
    }

    fn set_flag(&mut self, flag: u8, on: bool) {
        if on {
            self.regs.p |= flag;
        } else {
            self.regs.p &= !flag;
        }
    }

    fn set_nz(&mut self, value: u8) {
        self.set_flag(N, value & 0x80 != 0);
        self.set_flag(Z, value == 0);
    }

    fn fetch(&mut self) -> u8 {
        let byte = self.memory.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        byte
    }

    fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch() as u16;
        let hi = self.fetch() as u16;
        (hi << 8) | lo
    }

    fn push(&mut self, value: u8) {
        self.memory.write(0x0100 | self.regs.s as u16, value);
        self.regs.s = self.regs.s.wrapping_sub(1);
    }

    fn pull(&mut self) -> u8 {
        self.regs.s = self.regs.s.wrapping_add(1);
        self.memory.read(0x0100 | self.regs.s as u16)
    }

    fn push_word(&mut self, value: u16) {
        self.push((value >> 8) as u8);
        self.push(value as u8);
    }

    fn pull_word(&mut self) -> u16 {
        let lo = self.pull() as u16;
        let hi = self.pull() as u16;
        (hi << 8) | lo
    }

    /// zero page pointer read; the high byte wraps within page zero
    fn zero_page_word(&mut self, ptr: u8) -> u16 {
        let lo = self.memory.read(ptr as u16) as u16;
        let hi = self.memory.read(ptr.wrapping_add(1) as u16) as u16;
        (hi << 8) | lo
    }

    /// effective address for a mode, and whether indexing crossed a page
    fn address(&mut self, mode: Mode) -> (u16, bool) {
        match mode {
            Mode::Immediate => {
                let addr = self.regs.pc;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                (addr, false)
            }
            Mode::ZeroPage => (self.fetch() as u16, false),
            Mode::ZeroPageX => (self.fetch().wrapping_add(self.regs.x) as u16, false),
            Mode::ZeroPageY => (self.fetch().wrapping_add(self.regs.y) as u16, false),
            Mode::Absolute => (self.fetch_word(), false),
            Mode::AbsoluteX => {
                let base = self.fetch_word();
                let addr = base.wrapping_add(self.regs.x as u16);
                (addr, crosses_page(base, addr))
            }
            Mode::AbsoluteY => {
                let base = self.fetch_word();
                let addr = base.wrapping_add(self.regs.y as u16);
                (addr, crosses_page(base, addr))
            }
            Mode::Indirect => {
                // the NMOS part never carries into the high byte of the pointer
                let ptr = self.fetch_word();
                let lo = self.memory.read(ptr) as u16;
                let hi_ptr = (ptr & 0xff00) | (ptr.wrapping_add(1) & 0x00ff);
                let hi = self.memory.read(hi_ptr) as u16;
                ((hi << 8) | lo, false)
            }
            Mode::IndexedIndirect => {
                let ptr = self.fetch().wrapping_add(self.regs.x);
                (self.zero_page_word(ptr), false)
            }
            Mode::IndirectIndexed => {
                let ptr = self.fetch();
                let base = self.zero_page_word(ptr);
                let addr = base.wrapping_add(self.regs.y as u16);
                (addr, crosses_page(base, addr))
            }
            Mode::Relative => {
                let offset = self.fetch() as i8;
                let addr = self.regs.pc.wrapping_add(offset as u16);
                (addr, crosses_page(self.regs.pc, addr))
            }
            Mode::Implied | Mode::Accumulator => (0, false),
        }
    }

    /// operand value for read instructions, charging the page-cross cycle
    fn operand(&mut self, mode: Mode) -> u8 {
        let (addr, crossed) = self.address(mode);
        if crossed {
            self.ticks += 1;
        }
        self.memory.read(addr)
    }

    /// read-modify-write on memory or the accumulator
    fn modify(&mut self, mode: Mode, f: fn(&mut Self, u8) -> u8) {
        if mode == Mode::Accumulator {
            let a = self.regs.a;
            self.regs.a = f(self, a);
        } else {
            let (addr, _) = self.address(mode);
            let value = self.memory.read(addr);
            let result = f(self, value);
            self.memory.write(addr, result);
        }
    }

    fn store(&mut self, mode: Mode, value: u8) {
        let (addr, _) = self.address(mode);
        self.memory.write(addr, value);
    }

    fn branch(&mut self, taken: bool) {
        let (target, crossed) = self.address(Mode::Relative);
        if taken {
            self.ticks += if crossed { 2 } else { 1 };
            self.regs.pc = target;
        }
    }

    fn compare(&mut self, register: u8, value: u8) {
        self.set_flag(C, register >= value);
        self.set_nz(register.wrapping_sub(value));
    }

    fn adc(&mut self, value: u8) {
        let a = self.regs.a as u16;
        let v = value as u16;
        let carry = self.flag(C) as u16;
        let binary = a + v + carry;

        if self.flag(D) {
            let mut lo = (a & 0x0f) + (v & 0x0f) + carry;
            if lo >= 0x0a {
                lo = ((lo + 0x06) & 0x0f) + 0x10;
            }
            let mut result = (a & 0xf0) + (v & 0xf0) + lo;
            self.set_flag(Z, binary & 0xff == 0);
            self.set_flag(N, result & 0x80 != 0);
            self.set_flag(V, (!(a ^ v) & (a ^ result) & 0x80) != 0);
            if result >= 0xa0 {
                result += 0x60;
            }
            self.set_flag(C, result >= 0x100);
            self.regs.a = result as u8;
        } else {
            self.set_flag(C, binary > 0xff);
            self.set_flag(V, (!(a ^ v) & (a ^ binary) & 0x80) != 0);
            self.regs.a = binary as u8;
            self.set_nz(self.regs.a);
        }
    }

    fn sbc(&mut self, value: u8) {
        let a = self.regs.a as i16;
        let v = value as i16;
        let borrow = 1 - self.flag(C) as i16;
        let binary = a - v - borrow;

        // flags always follow the binary result on the NMOS part
        self.set_flag(C, binary >= 0);
        self.set_flag(V, ((a ^ v) & (a ^ binary) & 0x80) != 0);
        self.set_nz(binary as u8);

        if self.flag(D) {
            let mut lo = (a & 0x0f) - (v & 0x0f) - borrow;
            if lo < 0 {
                lo = ((lo - 0x06) & 0x0f) - 0x10;
            }
            let mut result = (a & 0xf0) - (v & 0xf0) + lo;
            if result < 0 {
                result -= 0x60;
            }
            self.regs.a = result as u8;
        } else {
            self.regs.a = binary as u8;
        }
    }

    fn asl(&mut self, value: u8) -> u8 {
        self.set_flag(C, value & 0x80 != 0);
        let result = value << 1;
        self.set_nz(result);
        result
    }

    fn lsr(&mut self, value: u8) -> u8 {
        self.set_flag(C, value & 0x01 != 0);
        let result = value >> 1;
        self.set_nz(result);
        result
    }

    fn rol(&mut self, value: u8) -> u8 {
        let carry = self.flag(C) as u8;
        self.set_flag(C, value & 0x80 != 0);
        let result = (value << 1) | carry;
        self.set_nz(result);
        result
    }

    fn ror(&mut self, value: u8) -> u8 {
        let carry = self.flag(C) as u8;
        self.set_flag(C, value & 0x01 != 0);
        let result = (value >> 1) | (carry << 7);
        self.set_nz(result);
        result
    }

    fn inc(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_nz(result);
        result
    }

    fn dec(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_nz(result);
        result
    }

    /// push PC and P, mask interrupts, jump through the vector
    fn enter_interrupt(&mut self, vector: u16, pushed_status: u8) {
        self.push_word(self.regs.pc);
        self.push(pushed_status);
        self.set_flag(I, true);
        self.regs.pc = self.memory.read_word(vector);
    }

    fn execute(&mut self, op: Op, mode: Mode) {
        match op {
            Op::Adc => {
                let v = self.operand(mode);
                self.adc(v);
            }
            Op::Sbc => {
                let v = self.operand(mode);
                self.sbc(v);
            }
            Op::And => {
                self.regs.a &= self.operand(mode);
                self.set_nz(self.regs.a);
            }
            Op::Ora => {
                self.regs.a |= self.operand(mode);
                self.set_nz(self.regs.a);
            }
            Op::Eor => {
                self.regs.a ^= self.operand(mode);
                self.set_nz(self.regs.a);
            }
            Op::Bit => {
                let v = self.operand(mode);
                self.set_flag(Z, self.regs.a & v == 0);
                self.set_flag(N, v & 0x80 != 0);
                self.set_flag(V, v & 0x40 != 0);
            }
            Op::Cmp => {
                let v = self.operand(mode);
                self.compare(self.regs.a, v);
            }
            Op::Cpx => {
                let v = self.operand(mode);
                self.compare(self.regs.x, v);
            }
            Op::Cpy => {
                let v = self.operand(mode);
                self.compare(self.regs.y, v);
            }
            Op::Lda => {
                self.regs.a = self.operand(mode);
                self.set_nz(self.regs.a);
            }
            Op::Ldx => {
                self.regs.x = self.operand(mode);
                self.set_nz(self.regs.x);
            }
            Op::Ldy => {
                self.regs.y = self.operand(mode);
                self.set_nz(self.regs.y);
            }
            Op::Sta => self.store(mode, self.regs.a),
            Op::Stx => self.store(mode, self.regs.x),
            Op::Sty => self.store(mode, self.regs.y),

            Op::Asl => self.modify(mode, Self::asl),
            Op::Lsr => self.modify(mode, Self::lsr),
            Op::Rol => self.modify(mode, Self::rol),
            Op::Ror => self.modify(mode, Self::ror),
            Op::Inc => self.modify(mode, Self::inc),
            Op::Dec => self.modify(mode, Self::dec),

            Op::Inx => self.regs.x = self.inc(self.regs.x),
            Op::Iny => self.regs.y = self.inc(self.regs.y),
            Op::Dex => self.regs.x = self.dec(self.regs.x),
            Op::Dey => self.regs.y = self.dec(self.regs.y),

            Op::Bcc => self.branch(!self.flag(C)),
            Op::Bcs => self.branch(self.flag(C)),
            Op::Bne => self.branch(!self.flag(Z)),
            Op::Beq => self.branch(self.flag(Z)),
            Op::Bpl => self.branch(!self.flag(N)),
            Op::Bmi => self.branch(self.flag(N)),
            Op::Bvc => self.branch(!self.flag(V)),
            Op::Bvs => self.branch(self.flag(V)),

            Op::Clc => self.set_flag(C, false),
            Op::Cld => self.set_flag(D, false),
            Op::Cli => self.set_flag(I, false),
            Op::Clv => self.set_flag(V, false),
            Op::Sec => self.set_flag(C, true),
            Op::Sed => self.set_flag(D, true),
            Op::Sei => self.set_flag(I, true),

            Op::Jmp => {
                let (addr, _) = self.address(mode);
                self.regs.pc = addr;
            }
            Op::Jsr => {
                let target = self.fetch_word();
                self.push_word(self.regs.pc.wrapping_sub(1));
                self.regs.pc = target;
            }
            Op::Rts => {
                self.regs.pc = self.pull_word().wrapping_add(1);
            }
            Op::Rti => {
                let p = self.pull();
                self.regs.p = (p & !B) | U;
                self.regs.pc = self.pull_word();
            }
            Op::Brk => {
                // BRK skips a padding byte
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.enter_interrupt(IRQ_VECTOR, self.regs.p | B | U);
            }

            Op::Pha => self.push(self.regs.a),
            Op::Php => self.push(self.regs.p | B | U),
            Op::Pla => {
                self.regs.a = self.pull();
                self.set_nz(self.regs.a);
            }
            Op::Plp => {
                let p = self.pull();
                self.regs.p = (p & !B) | U;
            }

            Op::Tax => {
                self.regs.x = self.regs.a;
                self.set_nz(self.regs.x);
            }
            Op::Tay => {
                self.regs.y = self.regs.a;
                self.set_nz(self.regs.y);
            }
            Op::Tsx => {
                self.regs.x = self.regs.s;
                self.set_nz(self.regs.x);
            }
            Op::Txa => {
                self.regs.a = self.regs.x;
                self.set_nz(self.regs.a);
            }
            Op::Tya => {
                self.regs.a = self.regs.y;
                self.set_nz(self.regs.a);
            }
            Op::Txs => self.regs.s = self.regs.x,

            Op::Nop => {}
        }
    }
}

fn crosses_page(from: u16, to: u16) -> bool {
    from & 0xff00 != to & 0xff00
}

impl Cpu for Mos6502 {
    fn load(&mut self, bytes: &[u8], address: u16) {
        self.memory.load(bytes, address);
    }

    fn reset(&mut self) {
        self.regs.a = 0;
        self.regs.x = 0;
        self.regs.y = 0;
        self.regs.s = 0xfd;
        self.regs.p = (self.regs.p | U | I) & !D;
        self.regs.pc = self.memory.read_word(RESET_VECTOR);
        self.ticks += INTERRUPT_CYCLES;
    }

    fn step(&mut self) -> u64 {
        let start = self.ticks;
        let opcode = self.fetch();
        let (op, mode, cycles) = decode(opcode);
        self.ticks += cycles as u64;
        self.execute(op, mode);
        self.instructions += 1;
        self.ticks - start
    }

    fn interrupt_request(&mut self) {
        if self.flag(I) {
            return;
        }
        self.enter_interrupt(IRQ_VECTOR, (self.regs.p | U) & !B);
        self.ticks += INTERRUPT_CYCLES;
    }

    fn non_maskable_interrupt(&mut self) {
        self.enter_interrupt(NMI_VECTOR, (self.regs.p | U) & !B);
        self.ticks += INTERRUPT_CYCLES;
    }

    fn read(&self, address: u16, count: usize) -> Vec<u8> {
        self.memory.peek_range(address, count)
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn instruction_count(&self) -> u64 {
        self.instructions
    }

    fn tick_count(&self) -> u64 {
        self.ticks
    }

    fn watch(&mut self, address: u16, access: Access, line: IrqLine) -> WatchId {
        self.memory.watch(address, access, line)
    }

    fn unwatch(&mut self, id: WatchId) -> bool {
        self.memory.unwatch(id)
    }
}

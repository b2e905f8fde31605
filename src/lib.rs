//! # term6502
//!
//! A 6502 test harness that lives in a terminal.
//!
//! ## Design
//!
//! * the CPU is behind a trait so the core can be swapped; the runner and
//!   the peripherals share it through a [`cpu::CpuHandle`]
//! * a frame is a number of CPU ticks, not a wall-clock interval; `--fps`
//!   only sleeps out what is left of a RUN frame
//! * peripherals are closed enums built from the command line
//!    - keyboard: PS/2 scancodes fed through one port, interrupt driven
//!    - video: 128x64 frame buffer, 16 colors, drawn with TUI
//! * the terminal is abstracted as a [`surface::Surface`] so the loop can be
//!   driven by a script in tests
//!
//! Model
//!
//! Runner
//!  |-- cpu handle, keyboard(cpu handle), videocard, surface, config
//!  |-- debug session(command line, memory window)
//!  `-- main loop
//!       |-- render video + info panel + command line
//!       |-- read one key
//!       |-- RUN:   key -> keyboard queue; spend tick_rate ticks
//!       |            |-- if asserting: cpu.interrupt_request()
//!       |            |-- elapsed = cpu.step()
//!       |            `-- peripherals.tick(elapsed)
//!       `-- DEBUG: key -> command line; Enter executes it
pub mod config;
pub mod cpu;
pub mod debugger;
pub mod error;
pub mod input;
pub mod keyboard;
pub mod peripheral;
pub mod runner;
pub mod surface;
pub mod video;

pub use error::{Error, Result};

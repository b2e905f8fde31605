//! # runner
//!
//! Owns the main loop. Every frame it draws the video output and the info
//! panel, reads one key, then either advances the 6502 by a frame's worth of
//! ticks (RUN) or feeds the key to the debugger command line (DEBUG).
//!
//! Timing model:
//!
//!  * a frame is `tick_rate` CPU ticks, not a wall-clock interval
//!  * if any peripheral needs timing the frame is single-stepped:
//!      - before *every* step, any asserting peripheral raises IRQ
//!      - after every step, every peripheral is told how many ticks it took
//!  * otherwise the CPU runs the whole frame as one batch
//!  * `--fps` optionally sleeps out the rest of a RUN frame
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::config::Config;
use crate::cpu::{Cpu, CpuHandle};
use crate::debugger::{Command, CommandParser, DebugSession};
use crate::error::{Error, Result};
use crate::input::Key;
use crate::keyboard::Keyboard;
use crate::peripheral::Peripheral;
use crate::surface::{Screen, Surface};
use crate::video::Videocard;

const MEMORY_MAP_INDENT: usize = 36;
const INFO_BODY_LINES: usize = 17;
const UNKNOWN_COMMAND_MSG: &str = "UNKNOWN COMMAND";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Run,
    Debug,
}

/// whether the loop carries on after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// progress since the previous frame, for the frequency readout
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTiming {
    pub delta_instructions: u64,
    pub delta_time: Duration,
}

impl FrameTiming {
    pub fn mhz(&self) -> f64 {
        if self.delta_time.is_zero() {
            return 0.0;
        }
        self.delta_instructions as f64 / self.delta_time.as_secs_f64() / 1_000_000.0
    }
}

pub struct Runner<S: Surface> {
    cpu: CpuHandle,
    keyboard: Keyboard,
    video: Videocard,
    surface: S,
    tick_rate: u64,
    frame_period: Option<Duration>,
    mode: RunMode,
    session: DebugSession,
    commands: CommandParser,
    timing: FrameTiming,
}

impl<S: Surface> Runner<S> {
    pub fn new(
        cpu: CpuHandle,
        keyboard: Keyboard,
        video: Videocard,
        surface: S,
        config: &Config,
    ) -> Result<Runner<S>> {
        Ok(Runner {
            cpu,
            keyboard,
            video,
            surface,
            tick_rate: config.tick_rate,
            frame_period: config
                .fps
                .map(|fps| Duration::from_secs_f64(1.0 / fps as f64)),
            mode: if config.debug {
                RunMode::Debug
            } else {
                RunMode::Run
            },
            session: DebugSession::default(),
            commands: CommandParser::new()?,
            timing: FrameTiming::default(),
        })
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn session(&self) -> &DebugSession {
        &self.session
    }

    /// load a program image and reset into it
    pub fn boot(&mut self, program: &[u8], location: u16) {
        let mut cpu = self.cpu.borrow_mut();
        cpu.load(program, location);
        cpu.reset();
        info!(
            "loaded {} bytes at {:#06x}, reset to {:#06x}",
            program.len(),
            location,
            cpu.registers().pc
        );
    }

    /// run until quit; the palette is handed back however the loop ends
    pub fn run(&mut self) -> Result<()> {
        let result = self
            .video
            .setup(&mut self.surface)
            .map_err(Error::from)
            .and_then(|_| self.main_loop());
        let restored = self.video.restore(&mut self.surface);
        result?;
        restored?;
        Ok(())
    }

    fn main_loop(&mut self) -> Result<()> {
        self.apply_mode();
        let mut last_instructions = self.cpu.borrow().instruction_count();
        let mut last_time = Instant::now();

        loop {
            let frame_start = Instant::now();
            let instructions = self.cpu.borrow().instruction_count();
            self.timing = FrameTiming {
                delta_instructions: instructions - last_instructions,
                delta_time: frame_start - last_time,
            };
            last_instructions = instructions;
            last_time = frame_start;

            self.render()?;

            let key = self.surface.read_key()?;
            if self.handle_key(key) == Flow::Quit {
                info!("quit");
                return Ok(());
            }

            if let (RunMode::Run, Some(period)) = (self.mode, self.frame_period) {
                let spent = frame_start.elapsed();
                if spent < period {
                    spin_sleep::sleep(period - spent);
                }
            }
        }
    }

    /// act on one frame's input
    pub fn handle_key(&mut self, key: Option<Key>) -> Flow {
        match self.mode {
            RunMode::Run => {
                self.run_step(key);
                Flow::Continue
            }
            RunMode::Debug => match key {
                Some(key) => self.debug_step(key),
                None => Flow::Continue,
            },
        }
    }

    fn peripherals(&self) -> [&dyn Peripheral; 2] {
        [&self.keyboard, &self.video]
    }

    fn peripherals_mut(&mut self) -> [&mut dyn Peripheral; 2] {
        [&mut self.keyboard, &mut self.video]
    }

    fn interrupt_asserted(&self) -> bool {
        self.peripherals().iter().any(|p| p.asserting())
    }

    fn peripheral_needs_timing(&self) -> bool {
        self.peripherals().iter().any(|p| p.needs_timing())
    }

    /// one instruction: interrupt check, step, then tell every peripheral
    /// how long it took
    pub fn step_cpu(&mut self) -> u64 {
        let asserted = self.interrupt_asserted();
        let elapsed = {
            let mut cpu = self.cpu.borrow_mut();
            let start = cpu.tick_count();
            if asserted {
                cpu.interrupt_request();
            }
            cpu.step();
            cpu.tick_count() - start
        };
        for peripheral in self.peripherals_mut() {
            peripheral.tick(elapsed);
        }
        elapsed
    }

    /// a frame's worth of ticks
    fn run_frame(&mut self) {
        if self.peripheral_needs_timing() {
            let mut remaining = self.tick_rate;
            while remaining > 0 {
                remaining = remaining.saturating_sub(self.step_cpu());
            }
        } else {
            self.cpu.borrow_mut().exec(self.tick_rate);
        }
    }

    fn run_step(&mut self, key: Option<Key>) {
        match key {
            Some(Key::Esc) => {
                self.set_mode(RunMode::Debug);
                return;
            }
            Some(key) => self.keyboard.press(key),
            None => {}
        }
        self.run_frame();
    }

    fn debug_step(&mut self, key: Key) -> Flow {
        self.session.unknown_command = false;

        match key {
            Key::Right => {
                self.step_cpu();
            }
            Key::Enter => return self.execute_command(),
            Key::Backspace => {
                self.session.buffer.pop();
            }
            Key::Char(c) => self.session.buffer.push(c),
            _ => {}
        }
        Flow::Continue
    }

    fn execute_command(&mut self) -> Flow {
        let line = self.session.take_line();
        let command = self.commands.parse(&line);
        debug!("command {:?} -> {:?}", line, command);

        match command {
            Command::Run => self.set_mode(RunMode::Run),
            Command::Reset => self.cpu.borrow_mut().reset(),
            Command::Nmi => self.cpu.borrow_mut().non_maskable_interrupt(),
            Command::Irq => self.cpu.borrow_mut().interrupt_request(),
            Command::ShowMemory(view) => self.session.memory_view = Some(view),
            Command::HideMemory => self.session.memory_view = None,
            Command::Key(c) => self.keyboard.press(Key::Char(c)),
            Command::Step(n) => {
                for _ in 0..n {
                    self.step_cpu();
                }
            }
            Command::Quit => return Flow::Quit,
            Command::Empty => {}
            Command::Unknown => self.session.unknown_command = true,
        }
        Flow::Continue
    }

    fn set_mode(&mut self, mode: RunMode) {
        info!("{:?} mode", mode);
        self.mode = mode;
        self.apply_mode();
    }

    /// DEBUG waits for keys with a cursor on the command line; RUN polls
    fn apply_mode(&mut self) {
        let debug = self.mode == RunMode::Debug;
        self.surface.set_blocking(debug);
        self.surface.set_cursor_visible(debug);
    }

    fn render(&mut self) -> Result<()> {
        let screen = {
            let cpu = self.cpu.borrow();
            Screen {
                video: self.video.draw(&*cpu),
                info: self.info_panel(&*cpu),
                command: self.command_line(),
            }
        };
        self.surface.present(&screen)?;
        Ok(())
    }

    fn command_line(&self) -> Option<String> {
        match self.mode {
            RunMode::Run => None,
            RunMode::Debug if self.session.unknown_command => Some(UNKNOWN_COMMAND_MSG.to_string()),
            RunMode::Debug => Some(self.session.buffer.clone()),
        }
    }

    fn info_panel(&self, cpu: &dyn Cpu) -> Vec<String> {
        let r = cpu.registers();
        let dump = match self.session.memory_view {
            Some(view) => view.dump(&cpu.read(view.start, view.len)),
            None => Vec::new(),
        };

        let mut lines = vec![String::new(), String::new()];
        lines.push(if self.session.memory_view.is_some() {
            format!("{}Memory map:", " ".repeat(MEMORY_MAP_INDENT))
        } else {
            String::new()
        });

        let body = [
            format!("A: ${:02x}  X: ${:02x}  Y: ${:02x}", r.a, r.x, r.y),
            format!("SP: ${:02x}  PC: ${:04x}", r.s, r.pc),
            format!("{}NV-BDIZC", " ".repeat("Status: ".len())),
            format!("Status: {:08b}", r.p),
            format!("IC: {}", cpu.instruction_count()),
            format!(
                "{}   {:.2} MHz",
                if self.interrupt_asserted() { "INT" } else { "   " },
                self.timing.mhz()
            ),
        ];

        for i in 0..INFO_BODY_LINES {
            let mut line = body.get(i).cloned().unwrap_or_default();
            if let Some(dump_line) = dump.get(i) {
                line.push_str(&" ".repeat(MEMORY_MAP_INDENT.saturating_sub(line.len())));
                line.push_str(dump_line);
            }
            lines.push(line);
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyboardKind;
    use crate::cpu::{Access, IrqLine, Memory, Mos6502, Registers, WatchId};
    use crate::keyboard::TICKS_BETWEEN_BYTES;
    use crate::surface::{DummySurface, Palette};
    use crate::video::PALETTE_OFFSET;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Reset,
        Step,
        Exec(u64),
        Irq,
        Nmi,
    }

    /// records what the runner asks of it; every step costs `per_step`
    struct ScriptedCpu {
        memory: Memory,
        per_step: u64,
        ticks: u64,
        instructions: u64,
        log: Vec<Event>,
    }

    impl ScriptedCpu {
        fn new(per_step: u64) -> Rc<RefCell<ScriptedCpu>> {
            Rc::new(RefCell::new(ScriptedCpu {
                memory: Memory::new(),
                per_step,
                ticks: 0,
                instructions: 0,
                log: Vec::new(),
            }))
        }

        fn count(&self, event: Event) -> usize {
            self.log.iter().filter(|e| **e == event).count()
        }
    }

    impl Cpu for ScriptedCpu {
        fn load(&mut self, bytes: &[u8], address: u16) {
            self.memory.load(bytes, address);
        }

        fn reset(&mut self) {
            self.log.push(Event::Reset);
        }

        fn step(&mut self) -> u64 {
            self.log.push(Event::Step);
            self.ticks += self.per_step;
            self.instructions += 1;
            self.per_step
        }

        fn exec(&mut self, ticks: u64) {
            self.log.push(Event::Exec(ticks));
            self.ticks += ticks;
        }

        fn interrupt_request(&mut self) {
            self.log.push(Event::Irq);
        }

        fn non_maskable_interrupt(&mut self) {
            self.log.push(Event::Nmi);
        }

        fn read(&self, address: u16, count: usize) -> Vec<u8> {
            self.memory.peek_range(address, count)
        }

        fn registers(&self) -> Registers {
            Registers {
                a: 0x12,
                x: 0x34,
                y: 0x56,
                s: 0xfd,
                pc: 0x8000,
                p: 0x24,
            }
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

    fn runner(cpu: CpuHandle, surface: DummySurface, config: &Config) -> Runner<DummySurface> {
        let keyboard = Keyboard::build(config.keyboard, config.keyboard_port, config.ack, cpu.clone());
        let video = Videocard::build(config.videocard, config.frame_buffer);
        Runner::new(cpu, keyboard, video, surface, config).unwrap()
    }

    fn debug_config() -> Config {
        Config {
            debug: true,
            ..Config::default()
        }
    }

    fn type_command(r: &mut Runner<DummySurface>, text: &str) -> Flow {
        for c in text.chars() {
            r.handle_key(Some(Key::Char(c)));
        }
        r.handle_key(Some(Key::Enter))
    }

    fn pending(r: &Runner<DummySurface>) -> usize {
        match &r.keyboard {
            Keyboard::Ps2(k) => k.pending(),
            Keyboard::Unplugged => 0,
        }
    }

    #[test]
    fn test_starts_in_configured_mode() {
        let cpu = ScriptedCpu::new(2);
        let r = runner(cpu.clone(), DummySurface::new(&[]), &Config::default());
        assert_eq!(r.mode(), RunMode::Run);
        let r = runner(cpu, DummySurface::new(&[]), &debug_config());
        assert_eq!(r.mode(), RunMode::Debug);
    }

    #[test]
    fn test_step_command_checks_interrupt_before_every_step() {
        let cpu = ScriptedCpu::new(3);
        let mut r = runner(cpu.clone(), DummySurface::new(&[]), &debug_config());
        type_command(&mut r, "key a");
        assert_eq!(pending(&r), 3 * (1 + TICKS_BETWEEN_BYTES));

        type_command(&mut r, "step 5");
        let c = cpu.borrow();
        assert_eq!(c.count(Event::Step), 5);
        // the first byte lands after the first step, so the line is up
        // for the remaining four
        assert_eq!(
            c.log,
            vec![
                Event::Step,
                Event::Irq,
                Event::Step,
                Event::Irq,
                Event::Step,
                Event::Irq,
                Event::Step,
                Event::Irq,
                Event::Step,
            ]
        );
    }

    #[test]
    fn test_right_arrow_single_steps() {
        let cpu = ScriptedCpu::new(4);
        let mut r = runner(cpu.clone(), DummySurface::new(&[]), &debug_config());
        r.handle_key(Some(Key::Right));
        assert_eq!(cpu.borrow().log, vec![Event::Step]);
        assert_eq!(r.mode(), RunMode::Debug);
    }

    #[test]
    fn test_run_frame_spends_tick_budget() {
        let cpu = ScriptedCpu::new(7);
        let config = Config {
            tick_rate: 100,
            ..Config::default()
        };
        let mut r = runner(cpu.clone(), DummySurface::new(&[]), &config);
        r.handle_key(Some(Key::Char('a')));

        let c = cpu.borrow();
        assert_eq!(c.count(Event::Step), 15);
        assert_eq!(c.ticks, 105);
        assert!(c.ticks - 100 < c.per_step);
        assert_eq!(c.count(Event::Exec(100)), 0);
        // the keyboard saw exactly the ticks the cpu spent
        assert_eq!(pending(&r), 303 - 105);
    }

    #[test]
    fn test_run_frame_batches_without_timed_peripherals() {
        let cpu = ScriptedCpu::new(7);
        let config = Config {
            keyboard: KeyboardKind::Unplugged,
            tick_rate: 100,
            ..Config::default()
        };
        let mut r = runner(cpu.clone(), DummySurface::new(&[]), &config);
        assert!(!r.peripheral_needs_timing());
        r.handle_key(Some(Key::Char('a')));

        let c = cpu.borrow();
        assert_eq!(c.log, vec![Event::Exec(100)]);
        assert_eq!(c.count(Event::Step), 0);
        assert_eq!(c.ticks, 100);
        drop(c);
        assert!(!r.interrupt_asserted());
    }

    #[test]
    fn test_run_frame_budget_beyond_i64() {
        let cpu = ScriptedCpu::new(1 << 62);
        let config = Config {
            tick_rate: 1 << 63,
            ..Config::default()
        };
        let mut r = runner(cpu.clone(), DummySurface::new(&[]), &config);
        r.handle_key(None);
        assert_eq!(cpu.borrow().count(Event::Step), 2);
    }

    #[test]
    fn test_run_frame_without_key() {
        let cpu = ScriptedCpu::new(5);
        let config = Config {
            tick_rate: 10,
            ..Config::default()
        };
        let mut r = runner(cpu.clone(), DummySurface::new(&[]), &config);
        assert_eq!(r.handle_key(None), Flow::Continue);
        assert_eq!(cpu.borrow().log, vec![Event::Step, Event::Step]);
        assert_eq!(pending(&r), 0);
    }

    #[test]
    fn test_esc_enters_debug_without_stepping() {
        let cpu = ScriptedCpu::new(2);
        let mut r = runner(cpu.clone(), DummySurface::new(&[]), &Config::default());
        r.handle_key(Some(Key::Esc));
        assert_eq!(r.mode(), RunMode::Debug);
        assert!(cpu.borrow().log.is_empty());
        assert!(r.surface.blocking);
        assert!(r.surface.cursor_visible);
    }

    #[test]
    fn test_run_command_leaves_debug() {
        let cpu = ScriptedCpu::new(2);
        let mut r = runner(cpu, DummySurface::new(&[]), &debug_config());
        r.apply_mode();
        type_command(&mut r, "RUN");
        assert_eq!(r.mode(), RunMode::Run);
        assert!(!r.surface.blocking);
        assert!(!r.surface.cursor_visible);
    }

    #[test]
    fn test_cpu_commands() {
        let cpu = ScriptedCpu::new(2);
        let mut r = runner(cpu.clone(), DummySurface::new(&[]), &debug_config());
        type_command(&mut r, "reset");
        type_command(&mut r, "nmi");
        type_command(&mut r, "irq");
        assert_eq!(cpu.borrow().log, vec![Event::Reset, Event::Nmi, Event::Irq]);
    }

    #[test]
    fn test_memory_view_commands() {
        let cpu = ScriptedCpu::new(2);
        let mut r = runner(cpu, DummySurface::new(&[]), &debug_config());
        type_command(&mut r, "mem 2000 9999");
        let view = r.session().memory_view.unwrap();
        assert_eq!((view.start, view.len), (0x2000, 256));

        type_command(&mut r, "mem 0 10");
        assert!(r.session().memory_view.is_some());
        type_command(&mut r, "hide mem");
        assert!(r.session().memory_view.is_none());
    }

    #[test]
    fn test_unknown_command_flag() {
        let cpu = ScriptedCpu::new(2);
        let mut r = runner(cpu, DummySurface::new(&[]), &debug_config());
        type_command(&mut r, "");
        assert!(!r.session().unknown_command);

        type_command(&mut r, "foo");
        assert!(r.session().unknown_command);
        assert!(r.session().buffer.is_empty());
        assert_eq!(r.command_line(), Some(UNKNOWN_COMMAND_MSG.to_string()));

        // cleared by the next keypress
        r.handle_key(Some(Key::Char('s')));
        assert!(!r.session().unknown_command);
        assert_eq!(r.command_line(), Some("s".to_string()));
    }

    #[test]
    fn test_backspace_and_ignored_keys() {
        let cpu = ScriptedCpu::new(2);
        let mut r = runner(cpu.clone(), DummySurface::new(&[]), &debug_config());
        for key in [Key::Char('s'), Key::Char('x'), Key::Backspace, Key::Up, Key::Tab] {
            r.handle_key(Some(key));
        }
        assert_eq!(r.session().buffer, "s");
        r.handle_key(None);
        assert!(cpu.borrow().log.is_empty());
    }

    #[test]
    fn test_quit_commands() {
        let cpu = ScriptedCpu::new(2);
        let mut r = runner(cpu, DummySurface::new(&[]), &debug_config());
        assert_eq!(type_command(&mut r, "q"), Flow::Quit);
        assert_eq!(type_command(&mut r, "quit"), Flow::Quit);
        assert_eq!(type_command(&mut r, "step 0"), Flow::Continue);
    }

    #[test]
    fn test_run_loop_until_quit_restores_palette() {
        let cpu = ScriptedCpu::new(2);
        let mut surface = DummySurface::new(&[]);
        surface.type_line("step 3");
        surface.type_line("q");
        let mut r = runner(cpu.clone(), surface, &debug_config());

        r.run().unwrap();
        assert_eq!(cpu.borrow().count(Event::Step), 3);
        assert_eq!(r.surface.frames, 9);
        assert_eq!(r.surface.color(PALETTE_OFFSET), None);
    }

    #[test]
    fn test_run_loop_error_still_restores_palette() {
        let cpu = ScriptedCpu::new(2);
        let mut surface = DummySurface::new(&[]);
        surface.init_color(PALETTE_OFFSET + 3, (10, 20, 30)).unwrap();
        surface.type_line("step 1");
        let mut r = runner(cpu, surface, &debug_config());

        // the script runs dry while DEBUG is blocking for a key
        assert!(r.run().is_err());
        assert_eq!(r.surface.color(PALETTE_OFFSET + 3), Some((10, 20, 30)));
        assert_eq!(r.surface.color(PALETTE_OFFSET), None);
    }

    #[test]
    fn test_info_panel() {
        let cpu = ScriptedCpu::new(2);
        cpu.borrow_mut().load(&[0xde, 0xad], 0x0200);
        let mut r = runner(cpu, DummySurface::new(&[]), &debug_config());
        type_command(&mut r, "mem 200 2");
        r.render().unwrap();

        let screen = r.surface.last_screen.clone().unwrap();
        assert_eq!(screen.video.len(), 64);
        assert_eq!(screen.info.len(), 3 + INFO_BODY_LINES);
        assert_eq!(screen.info[2], format!("{}Memory map:", " ".repeat(36)));
        assert!(screen.info[3].starts_with("A: $12  X: $34  Y: $56"));
        assert!(screen.info[3].ends_with("x0 x1 x2 x3 x4 x5 x6 x7 x8 x9 xa xb xc xd xe xf"));
        assert_eq!(
            screen.info[4],
            format!("SP: $fd  PC: $8000{}0x0200: de ad", " ".repeat(36 - 18))
        );
        assert_eq!(screen.info[6], "Status: 00100100");
        assert_eq!(screen.info[7], "IC: 0");
        assert_eq!(screen.info[8], "      0.00 MHz");
        assert_eq!(screen.command, Some(String::new()));
    }

    #[test]
    fn test_info_panel_shows_interrupt() {
        let cpu = ScriptedCpu::new(2);
        let mut r = runner(cpu, DummySurface::new(&[]), &debug_config());
        type_command(&mut r, "key a");
        r.handle_key(Some(Key::Right));
        r.render().unwrap();
        let screen = r.surface.last_screen.clone().unwrap();
        assert!(screen.info[8].starts_with("INT"));
    }

    #[test]
    fn test_frame_timing_mhz() {
        let t = FrameTiming {
            delta_instructions: 2_000_000,
            delta_time: Duration::from_millis(500),
        };
        assert!((t.mhz() - 4.0).abs() < 1e-9);
        assert_eq!(FrameTiming::default().mhz(), 0.0);
    }

    /// a real 6502 taking keyboard interrupts: the handler copies each
    /// byte from the port into a buffer at $0301
    #[test]
    fn test_keyboard_interrupts_drive_program() {
        #[rustfmt::skip]
        let program = [
            0x58,             // 8000 CLI
            0x4c, 0x01, 0x80, // 8001 JMP $8001
            0xad, 0x01, 0x60, // 8004 LDA $6001
            0xae, 0x00, 0x03, // 8007 LDX $0300
            0x9d, 0x01, 0x03, // 800a STA $0301,X
            0xee, 0x00, 0x03, // 800d INC $0300
            0x40,             // 8010 RTI
        ];
        let cpu = Rc::new(RefCell::new(Mos6502::new()));
        cpu.borrow_mut().load(&[0x00, 0x80, 0x04, 0x80], 0xfffc);
        let mut r = runner(cpu.clone(), DummySurface::new(&[]), &Config::default());
        r.boot(&program, 0x8000);
        assert_eq!(cpu.borrow().registers().pc, 0x8000);

        r.handle_key(Some(Key::Char('A')));
        let c = cpu.borrow();
        assert_eq!(c.read(0x0300, 1), vec![6]);
        assert_eq!(
            c.read(0x0301, 6),
            vec![0x12, 0x1c, 0xf0, 0x1c, 0xf0, 0x12]
        );
        assert_eq!(c.memory().watch_count(), 0);
        drop(c);
        assert!(!r.interrupt_asserted());
    }
}

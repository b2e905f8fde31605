//! # debugger
//!
//! The command line shown in DEBUG mode: what has been typed so far, the
//! memory window it asked for, and the parser that turns a line into a
//! [`Command`].
use regex::Regex;

/// most bytes the memory window will show
pub const MEMORY_VIEW_MAX: usize = 0x100;

/// bytes per row of the memory dump
const MEMORY_VIEW_WIDTH: usize = 0x10;

/// a window onto memory shown beside the registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryView {
    pub start: u16,
    pub len: usize,
}

impl MemoryView {
    /// column header followed by one line per 16 bytes of `bytes`
    pub fn dump(&self, bytes: &[u8]) -> Vec<String> {
        let mut lines = vec![format!(
            "{}x0 x1 x2 x3 x4 x5 x6 x7 x8 x9 xa xb xc xd xe xf",
            " ".repeat("0x0000: ".len())
        )];
        let mut address = self.start;
        for chunk in bytes.chunks(MEMORY_VIEW_WIDTH) {
            let mut line = format!("0x{:04x}:", address);
            for byte in chunk {
                line.push_str(&format!(" {:02x}", byte));
            }
            lines.push(line);
            address = address.wrapping_add(MEMORY_VIEW_WIDTH as u16);
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run,
    Reset,
    Nmi,
    Irq,
    ShowMemory(MemoryView),
    HideMemory,
    Key(char),
    Step(u64),
    Quit,
    /// nothing typed
    Empty,
    Unknown,
}

/// Matches a line against each command pattern in priority order.
pub struct CommandParser {
    run: Regex,
    reset: Regex,
    nmi: Regex,
    irq: Regex,
    mem: Regex,
    hide_mem: Regex,
    key: Regex,
    step: Regex,
    quit: Regex,
}

impl CommandParser {
    pub fn new() -> Result<CommandParser, regex::Error> {
        Ok(CommandParser {
            run: Regex::new(r"(?i)\Arun")?,
            reset: Regex::new(r"(?i)\Areset")?,
            nmi: Regex::new(r"(?i)\Anmi\z")?,
            irq: Regex::new(r"(?i)\Airq\z")?,
            mem: Regex::new(r"(?i)mem (?:0x)?([0-9a-f]+)\s+([0-9a-f]+)")?,
            hide_mem: Regex::new(r"(?i)hide mem")?,
            key: Regex::new(r"(?i)\Akey (.)")?,
            step: Regex::new(r"(?i)\Astep ([0-9]+)")?,
            quit: Regex::new(r"(?i)\A(?:q\z|quit)")?,
        })
    }

    pub fn parse(&self, line: &str) -> Command {
        if self.run.is_match(line) {
            Command::Run
        } else if self.reset.is_match(line) {
            Command::Reset
        } else if self.nmi.is_match(line) {
            Command::Nmi
        } else if self.irq.is_match(line) {
            Command::Irq
        } else if let Some(caps) = self.mem.captures(line) {
            Command::ShowMemory(MemoryView {
                start: hex_masked(&caps[1]),
                len: hex_saturating(&caps[2]).min(MEMORY_VIEW_MAX as u64) as usize,
            })
        } else if self.hide_mem.is_match(line) {
            Command::HideMemory
        } else if let Some(c) = self
            .key
            .captures(line)
            .and_then(|caps| caps[1].chars().next())
        {
            Command::Key(c)
        } else if let Some(n) = self
            .step
            .captures(line)
            .and_then(|caps| caps[1].parse::<u64>().ok())
        {
            Command::Step(n)
        } else if self.quit.is_match(line) {
            Command::Quit
        } else if line.is_empty() {
            Command::Empty
        } else {
            Command::Unknown
        }
    }
}

/// low 16 bits of an arbitrarily long hex string
fn hex_masked(digits: &str) -> u16 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(16))
        .fold(0u16, |acc, d| (acc << 4) | d as u16)
}

/// value of a hex string, pinned at u64::MAX
fn hex_saturating(digits: &str) -> u64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(16))
        .fold(0u64, |acc, d| acc.saturating_mul(16).saturating_add(d as u64))
}

/// state of the DEBUG mode command line
#[derive(Debug, Default)]
pub struct DebugSession {
    pub buffer: String,
    pub memory_view: Option<MemoryView>,
    /// last command didn't parse; shown until the next keypress
    pub unknown_command: bool,
}

impl DebugSession {
    /// hand over the typed line, leaving the buffer empty
    pub fn take_line(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        CommandParser::new().unwrap().parse(line)
    }

    #[test]
    fn test_run_and_reset_are_prefixes() {
        assert_eq!(parse("run"), Command::Run);
        assert_eq!(parse("RUNNING"), Command::Run);
        assert_eq!(parse("Reset now"), Command::Reset);
        assert_eq!(parse(" run"), Command::Unknown);
    }

    #[test]
    fn test_interrupts_are_exact() {
        assert_eq!(parse("nmi"), Command::Nmi);
        assert_eq!(parse("IRQ"), Command::Irq);
        assert_eq!(parse("irq2"), Command::Unknown);
    }

    #[test]
    fn test_mem_window_clamped() {
        assert_eq!(
            parse("mem 2000 9999"),
            Command::ShowMemory(MemoryView {
                start: 0x2000,
                len: 256
            })
        );
        assert_eq!(
            parse("MEM 0x12345 10"),
            Command::ShowMemory(MemoryView {
                start: 0x2345,
                len: 16
            })
        );
        assert_eq!(
            parse("mem ffffffffffffffffffffff ffffffffffffffffffffffff"),
            Command::ShowMemory(MemoryView {
                start: 0xffff,
                len: 256
            })
        );
        assert_eq!(parse("mem 2000"), Command::Unknown);
    }

    #[test]
    fn test_hide_mem() {
        assert_eq!(parse("hide mem"), Command::HideMemory);
        assert_eq!(parse("Hide Mem please"), Command::HideMemory);
    }

    #[test]
    fn test_key_and_step() {
        assert_eq!(parse("key A"), Command::Key('A'));
        assert_eq!(parse("key  "), Command::Key(' '));
        assert_eq!(parse("key "), Command::Unknown);
        assert_eq!(parse("KEY a"), Command::Key('a'));
        assert_eq!(parse("step 5"), Command::Step(5));
        assert_eq!(parse("STEP 5"), Command::Step(5));
        assert_eq!(parse("Step 12"), Command::Step(12));
        assert_eq!(parse("step x"), Command::Unknown);
        assert_eq!(parse("step 99999999999999999999999"), Command::Unknown);
    }

    #[test]
    fn test_quit() {
        assert_eq!(parse("q"), Command::Quit);
        assert_eq!(parse("Q"), Command::Quit);
        assert_eq!(parse("quit"), Command::Quit);
        assert_eq!(parse("quitting"), Command::Quit);
        assert_eq!(parse("qq"), Command::Unknown);
    }

    #[test]
    fn test_priority_order() {
        // key comes before quit, so this presses q
        assert_eq!(parse("key q"), Command::Key('q'));
        // mem matches anywhere, ahead of hide mem
        assert_eq!(parse("hide mem 10 10"), Command::ShowMemory(MemoryView { start: 0x10, len: 16 }));
    }

    #[test]
    fn test_empty_and_unknown() {
        assert_eq!(parse(""), Command::Empty);
        assert_eq!(parse("foo"), Command::Unknown);
    }

    #[test]
    fn test_dump() {
        let view = MemoryView {
            start: 0xfff0,
            len: 18,
        };
        let bytes: Vec<u8> = (0..18).collect();
        let lines = view.dump(&bytes);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "        x0 x1 x2 x3 x4 x5 x6 x7 x8 x9 xa xb xc xd xe xf"
        );
        assert_eq!(
            lines[1],
            "0xfff0: 00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f"
        );
        assert_eq!(lines[2], "0x0000: 10 11");
    }

    #[test]
    fn test_take_line_clears_buffer() {
        let mut session = DebugSession::default();
        session.buffer.push_str("step 1");
        assert_eq!(session.take_line(), "step 1");
        assert!(session.buffer.is_empty());
    }
}

//! # config
//!
//! Everything the harness needs to know before it takes over the terminal.
//! Device variants are closed enums, so an unknown name is rejected while
//! the arguments are parsed, long before the main loop starts.
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use thiserror::Error;

use crate::cpu::Access;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown keyboard {0:?}, expected one of: {names}", names = KeyboardKind::NAMES.join(", "))]
    UnknownKeyboard(String),
    #[error("unknown videocard {0:?}, expected one of: {names}", names = VideocardKind::NAMES.join(", "))]
    UnknownVideocard(String),
    #[error("unknown acknowledge policy {0:?}, expected read-write or read")]
    UnknownAck(String),
    #[error("{0:?} is not a 16-bit hex address")]
    BadAddress(String),
}

/// keyboards we know how to emulate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardKind {
    Ps2,
    /// no keyboard at all
    Unplugged,
}

impl KeyboardKind {
    pub const NAMES: &'static [&'static str] = &["ps2", "none"];
}

impl FromStr for KeyboardKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ps2" => Ok(KeyboardKind::Ps2),
            "none" => Ok(KeyboardKind::Unplugged),
            _ => Err(ConfigError::UnknownKeyboard(s.to_string())),
        }
    }
}

impl fmt::Display for KeyboardKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeyboardKind::Ps2 => write!(f, "ps2"),
            KeyboardKind::Unplugged => write!(f, "none"),
        }
    }
}

/// video cards we know how to emulate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideocardKind {
    Bitmap128x64,
}

impl VideocardKind {
    pub const NAMES: &'static [&'static str] = &["bitmap128x64"];
}

impl FromStr for VideocardKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bitmap128x64" => Ok(VideocardKind::Bitmap128x64),
            _ => Err(ConfigError::UnknownVideocard(s.to_string())),
        }
    }
}

impl fmt::Display for VideocardKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VideocardKind::Bitmap128x64 => write!(f, "bitmap128x64"),
        }
    }
}

/// hex address, with or without a leading 0x
pub fn parse_hex(s: &str) -> Result<u16, ConfigError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|_| ConfigError::BadAddress(s.to_string()))
}

/// which accesses to the keyboard port count as servicing the interrupt
pub fn parse_ack(s: &str) -> Result<Access, ConfigError> {
    match s {
        "read-write" => Ok(Access::ReadWrite),
        "read" => Ok(Access::Read),
        _ => Err(ConfigError::UnknownAck(s.to_string())),
    }
}

/// Terminal 6502 harness
#[derive(Parser, Debug, Clone)]
#[command(name = "term6502", version)]
pub struct Config {
    /// raw program image to load
    pub program: PathBuf,

    /// start in DEBUG mode
    #[arg(long)]
    pub debug: bool,

    /// memory location (hex) the program is loaded at
    #[arg(long, value_parser = parse_hex, default_value = "8000")]
    pub program_location: u16,

    /// keyboard to emulate: ps2 or none
    #[arg(long, default_value = "ps2")]
    pub keyboard: KeyboardKind,

    /// memory location (hex) of the keyboard port
    #[arg(long, value_parser = parse_hex, default_value = "6001")]
    pub keyboard_port: u16,

    /// accesses that acknowledge the keyboard interrupt: read-write or read
    #[arg(long, value_parser = parse_ack, default_value = "read-write")]
    pub ack: Access,

    /// video card to emulate: bitmap128x64
    #[arg(long, default_value = "bitmap128x64")]
    pub videocard: VideocardKind,

    /// memory location (hex) of the start of the frame buffer
    #[arg(long, value_parser = parse_hex, default_value = "2000")]
    pub frame_buffer: u16,

    /// number of 6502 ticks per screen draw
    #[arg(long, default_value_t = 10_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_rate: u64,

    /// memory location (hex) that returns a random byte when read
    #[arg(long, value_parser = parse_hex)]
    pub random_byte_port: Option<u16>,

    /// cap RUN mode at this many frames per second
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: Option<u32>,

    /// write logs here; the terminal is busy with the screen
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            program: PathBuf::new(),
            debug: false,
            program_location: 0x8000,
            keyboard: KeyboardKind::Ps2,
            keyboard_port: 0x6001,
            ack: Access::ReadWrite,
            videocard: VideocardKind::Bitmap128x64,
            frame_buffer: 0x2000,
            tick_rate: 10_000,
            random_byte_port: None,
            fps: None,
            log_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_parsed_defaults() {
        let parsed = Config::try_parse_from(["term6502", "prog.bin"]).unwrap();
        let default = Config::default();
        assert_eq!(parsed.program, PathBuf::from("prog.bin"));
        assert_eq!(parsed.debug, default.debug);
        assert_eq!(parsed.program_location, default.program_location);
        assert_eq!(parsed.keyboard, default.keyboard);
        assert_eq!(parsed.keyboard_port, default.keyboard_port);
        assert_eq!(parsed.ack, default.ack);
        assert_eq!(parsed.videocard, default.videocard);
        assert_eq!(parsed.frame_buffer, default.frame_buffer);
        assert_eq!(parsed.tick_rate, default.tick_rate);
        assert_eq!(parsed.random_byte_port, None);
        assert_eq!(parsed.fps, None);
    }

    #[test]
    fn test_overrides() {
        let c = Config::try_parse_from([
            "term6502",
            "prog.bin",
            "--debug",
            "--program-location",
            "0xc000",
            "--keyboard-port",
            "d010",
            "--ack",
            "read",
            "--tick-rate",
            "500",
            "--random-byte-port",
            "fe",
        ])
        .unwrap();
        assert!(c.debug);
        assert_eq!(c.program_location, 0xc000);
        assert_eq!(c.keyboard_port, 0xd010);
        assert_eq!(c.ack, Access::Read);
        assert_eq!(c.tick_rate, 500);
        assert_eq!(c.random_byte_port, Some(0xfe));
    }

    #[test]
    fn test_unknown_variants_rejected() {
        assert!(Config::try_parse_from(["term6502", "p", "--keyboard", "at"]).is_err());
        assert!(Config::try_parse_from(["term6502", "p", "--videocard", "vga"]).is_err());
        assert_eq!(
            "at".parse::<KeyboardKind>(),
            Err(ConfigError::UnknownKeyboard("at".to_string()))
        );
        assert_eq!(
            "vga".parse::<VideocardKind>(),
            Err(ConfigError::UnknownVideocard("vga".to_string()))
        );
    }

    #[test]
    fn test_keyboard_can_be_unplugged() {
        let c = Config::try_parse_from(["term6502", "p", "--keyboard", "none"]).unwrap();
        assert_eq!(c.keyboard, KeyboardKind::Unplugged);
        assert_eq!(KeyboardKind::Unplugged.to_string(), "none");
    }

    #[test]
    fn test_huge_tick_rate_accepted() {
        let c = Config::try_parse_from(["term6502", "p", "--tick-rate", "9223372036854775808"])
            .unwrap();
        assert_eq!(c.tick_rate, 1 << 63);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("2000"), Ok(0x2000));
        assert_eq!(parse_hex("0xFFFF"), Ok(0xffff));
        assert!(parse_hex("10000").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        assert!(Config::try_parse_from(["term6502", "p", "--tick-rate", "0"]).is_err());
    }
}

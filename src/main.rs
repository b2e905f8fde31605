use std::cell::RefCell;
use std::fs::{self, File};
use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use log::info;

use term6502::config::Config;
use term6502::cpu::{CpuHandle, Memory, Mos6502};
use term6502::keyboard::Keyboard;
use term6502::runner::Runner;
use term6502::surface::TermSurface;
use term6502::video::Videocard;

/// stderr belongs to the screen, so logging only happens into a file
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("couldn't create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(config.log_file.as_deref())?;

    // everything that can fail on bad input happens before the terminal is
    // taken over
    let program = fs::read(&config.program)
        .with_context(|| format!("couldn't read program {}", config.program.display()))?;
    info!("{:?}", config);

    let mut memory = Memory::new();
    memory.set_random_port(config.random_byte_port);
    let cpu: CpuHandle = Rc::new(RefCell::new(Mos6502::with_memory(memory)));

    let video = Videocard::build(config.videocard, config.frame_buffer);
    let surface = TermSurface::new(video.geometry()).context("couldn't set up the terminal")?;
    let keyboard = Keyboard::build(config.keyboard, config.keyboard_port, config.ack, cpu.clone());

    let mut runner = Runner::new(cpu, keyboard, video, surface, &config)?;
    runner.boot(&program, config.program_location);
    runner.run()?;
    Ok(())
}

use std::io;

use tui::style::{Color, Style};
use tui::text::{Span, Spans};

use crate::config::VideocardKind;
use crate::cpu::Cpu;
use crate::peripheral::Peripheral;
use crate::surface::{Geometry, Palette, Rgb};

/// one full block per pixel
const GLYPH: char = '\u{2588}';

/// first surface color index we take over; the top of the 256 color cube
/// is rarely used by anything else in the terminal
pub const PALETTE_OFFSET: u8 = 214;

/// 16 color palette, index = low nibble of a frame buffer byte
#[rustfmt::skip]
const COLORS: [(u8, u8, u8); 16] = [
    (0x00, 0x00, 0x00), // black
    (0xff, 0xff, 0xff), // white
    (0x88, 0x00, 0x00), // red
    (0xaa, 0xff, 0xee), // cyan
    (0xcc, 0x44, 0xcc), // purple
    (0x00, 0xcc, 0x55), // green
    (0x00, 0x00, 0xaa), // blue
    (0xee, 0xee, 0x77), // yellow
    (0xdd, 0x88, 0x55), // orange
    (0x66, 0x44, 0x00), // brown
    (0xff, 0x77, 0x77), // light red
    (0x33, 0x33, 0x33), // dark grey
    (0x77, 0x77, 0x77), // grey
    (0xaa, 0xff, 0x66), // light green
    (0x00, 0x88, 0xff), // light blue
    (0xbb, 0xbb, 0xbb), // light grey
];

/// scale an 8-bit component into `0..=max`, rounding to nearest
pub fn scale_component(component: u8, max: u16) -> u16 {
    ((component as u32 * max as u32 + 127) / 255) as u16
}

fn palette_color(byte: u8) -> Color {
    Color::Indexed(PALETTE_OFFSET + (byte & 0x0f))
}

/// 128x64 pixels, one byte per pixel, 16 colors
pub struct Bitmap128x64 {
    frame_buffer: u16,
    /// surface colors we overwrote, to put back on restore
    saved: Option<Vec<(u8, Option<Rgb>)>>,
}

impl Bitmap128x64 {
    pub const LINES: u16 = 64;
    pub const COLUMNS: u16 = 128;

    pub fn new(frame_buffer: u16) -> Self {
        Bitmap128x64 {
            frame_buffer,
            saved: None,
        }
    }

    pub fn setup(&mut self, palette: &mut dyn Palette) -> io::Result<()> {
        let max = palette.color_max();
        let mut saved = Vec::with_capacity(COLORS.len());
        for (i, (r, g, b)) in COLORS.iter().enumerate() {
            let index = PALETTE_OFFSET + i as u8;
            saved.push((index, palette.color_content(index)?));
            palette.init_color(
                index,
                (
                    scale_component(*r, max),
                    scale_component(*g, max),
                    scale_component(*b, max),
                ),
            )?;
        }
        // a second setup mustn't remember our own colors as the originals
        if self.saved.is_none() {
            self.saved = Some(saved);
        }
        Ok(())
    }

    pub fn restore(&mut self, palette: &mut dyn Palette) -> io::Result<()> {
        let Some(saved) = self.saved.take() else {
            return Ok(());
        };
        for (index, original) in saved {
            match original {
                Some(rgb) => palette.init_color(index, rgb)?,
                None => palette.reset_color(index)?,
            }
        }
        Ok(())
    }

    pub fn draw(&self, cpu: &dyn Cpu) -> Vec<Spans<'static>> {
        (0..Self::LINES)
            .map(|line| {
                let row = cpu.read(
                    self.frame_buffer.wrapping_add(line * Self::COLUMNS),
                    Self::COLUMNS as usize,
                );
                row_spans(&row)
            })
            .collect()
    }
}

/// one span per run of same-colored pixels
fn row_spans(row: &[u8]) -> Spans<'static> {
    let mut spans = Vec::new();
    let mut iter = row.iter().peekable();
    while let Some(byte) = iter.next() {
        let color = palette_color(*byte);
        let mut run = 1;
        while iter.peek().map_or(false, |b| palette_color(**b) == color) {
            iter.next();
            run += 1;
        }
        spans.push(Span::styled(
            std::iter::repeat(GLYPH).take(run).collect::<String>(),
            Style::default().fg(color),
        ));
    }
    Spans::from(spans)
}

impl Peripheral for Bitmap128x64 {
    fn kind(&self) -> &'static str {
        "bitmap128x64"
    }
}

/// every video card the harness can emulate
pub enum Videocard {
    Bitmap128x64(Bitmap128x64),
}

impl Videocard {
    pub fn build(kind: VideocardKind, frame_buffer: u16) -> Self {
        match kind {
            VideocardKind::Bitmap128x64 => Videocard::Bitmap128x64(Bitmap128x64::new(frame_buffer)),
        }
    }

    pub fn geometry(&self) -> Geometry {
        match self {
            Videocard::Bitmap128x64(_) => Geometry {
                video_lines: Bitmap128x64::LINES,
                video_columns: Bitmap128x64::COLUMNS,
            },
        }
    }

    pub fn setup(&mut self, palette: &mut dyn Palette) -> io::Result<()> {
        match self {
            Videocard::Bitmap128x64(v) => v.setup(palette),
        }
    }

    pub fn restore(&mut self, palette: &mut dyn Palette) -> io::Result<()> {
        match self {
            Videocard::Bitmap128x64(v) => v.restore(palette),
        }
    }

    pub fn draw(&self, cpu: &dyn Cpu) -> Vec<Spans<'static>> {
        match self {
            Videocard::Bitmap128x64(v) => v.draw(cpu),
        }
    }
}

impl Peripheral for Videocard {
    fn kind(&self) -> &'static str {
        match self {
            Videocard::Bitmap128x64(v) => v.kind(),
        }
    }
}

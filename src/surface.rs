use std::collections::{BTreeSet, HashMap, VecDeque};
use std::io::{self, Write};
use std::time::Duration;

use crossterm::event;
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetSize};
use log::{debug, warn};
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::text::Spans;
use tui::widgets::Paragraph;
use tui::Terminal;

use crate::input::Key;

/// blank rows above the window
pub const LINE_PADDING: u16 = 1;
/// blank columns either side of the window
pub const COLUMN_PADDING: u16 = 2;
/// rows below the video output for the info panel and command line
pub const INFO_LINES: u16 = 25;

/// a color in the surface's own units, see [`Palette::color_max`]
pub type Rgb = (u16, u16, u16);

/// Indexed colors the surface lets us redefine.
pub trait Palette {
    /// largest value of one color component
    fn color_max(&self) -> u16;

    /// current definition of `index`, if the surface can tell us
    fn color_content(&mut self, index: u8) -> io::Result<Option<Rgb>>;

    fn init_color(&mut self, index: u8, rgb: Rgb) -> io::Result<()>;

    /// put `index` back to whatever the terminal started with
    fn reset_color(&mut self, index: u8) -> io::Result<()>;
}

/// Surface is used by the runner to show a frame and read the keyboard. It
/// abstracts the terminal so the loop can be driven without one.
pub trait Surface: Palette {
    /// draw one whole frame
    fn present(&mut self, screen: &Screen) -> io::Result<()>;

    /// one key event; waits for it when blocking, otherwise `None` if there
    /// wasn't one
    fn read_key(&mut self) -> io::Result<Option<Key>>;

    fn set_blocking(&mut self, blocking: bool);

    fn set_cursor_visible(&mut self, visible: bool);
}

/// everything drawn in one frame
#[derive(Debug, Clone, Default)]
pub struct Screen {
    /// one line of glyphs per video row
    pub video: Vec<Spans<'static>>,
    /// info panel, placed under the video output
    pub info: Vec<String>,
    /// command line on the last row, `None` hides it
    pub command: Option<String>,
}

/// terminal size needed for a given video mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub video_lines: u16,
    pub video_columns: u16,
}

impl Geometry {
    pub fn lines(&self) -> u16 {
        LINE_PADDING + self.video_lines + INFO_LINES
    }

    pub fn columns(&self) -> u16 {
        self.video_columns + COLUMN_PADDING * 2
    }

    fn video_area(&self) -> Rect {
        Rect::new(COLUMN_PADDING, LINE_PADDING, self.video_columns, self.video_lines)
    }

    fn info_area(&self) -> Rect {
        Rect::new(
            COLUMN_PADDING,
            LINE_PADDING + self.video_lines,
            self.columns() - COLUMN_PADDING,
            INFO_LINES - 1,
        )
    }

    fn command_area(&self) -> Rect {
        Rect::new(
            COLUMN_PADDING,
            self.lines() - 1,
            self.columns() - COLUMN_PADDING,
            1,
        )
    }
}

/// The real terminal, drawn with TUI over crossterm.
///
/// Owning one of these means owning the terminal: raw mode, the alternate
/// screen and the resized window are all put back when it is dropped, on
/// every way out of the program including panics.
pub struct TermSurface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    geometry: Geometry,
    original_size: (u16, u16),
    /// color indices we have redefined and not yet reset
    redefined: BTreeSet<u8>,
    blocking: bool,
    cursor_visible: bool,
}

/// one OSC 104 resetting every index in `indices`, `None` if there are none
fn reset_colors_command<'a>(indices: impl IntoIterator<Item = &'a u8>) -> Option<String> {
    let list: Vec<String> = indices.into_iter().map(|i| i.to_string()).collect();
    if list.is_empty() {
        return None;
    }
    Some(format!("104;{}", list.join(";")))
}

impl TermSurface {
    pub fn new(geometry: Geometry) -> Result<TermSurface, io::Error> {
        let original_size = terminal::size()?;
        terminal::enable_raw_mode()?;
        match Self::open(geometry) {
            Ok(terminal) => {
                debug!(
                    "terminal resized from {}x{} to {}x{}",
                    original_size.0,
                    original_size.1,
                    geometry.columns(),
                    geometry.lines()
                );
                Ok(TermSurface {
                    terminal,
                    geometry,
                    original_size,
                    redefined: BTreeSet::new(),
                    blocking: false,
                    cursor_visible: false,
                })
            }
            Err(e) => {
                let mut stdout = io::stdout();
                let _ = execute!(
                    stdout,
                    LeaveAlternateScreen,
                    SetSize(original_size.0, original_size.1)
                );
                let _ = terminal::disable_raw_mode();
                Err(e)
            }
        }
    }

    fn open(geometry: Geometry) -> Result<Terminal<CrosstermBackend<io::Stdout>>, io::Error> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            SetSize(geometry.columns(), geometry.lines())
        )?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        Ok(terminal)
    }

    /// operating system commands go straight to the terminal, past TUI
    fn osc(&mut self, command: &str) -> io::Result<()> {
        let backend = self.terminal.backend_mut();
        write!(backend, "\x1b]{}\x07", command)?;
        backend.flush()
    }
}

impl Drop for TermSurface {
    fn drop(&mut self) {
        let (columns, lines) = self.original_size;
        // only left over when the loop never got to hand the palette back
        if let Some(command) = reset_colors_command(&self.redefined) {
            if let Err(e) = self.osc(&command) {
                warn!("couldn't reset colors: {}", e);
            }
        }
        if let Err(e) = self.terminal.show_cursor() {
            warn!("couldn't show cursor: {}", e);
        }
        if let Err(e) = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            SetSize(columns, lines)
        ) {
            warn!("couldn't restore terminal: {}", e);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("couldn't leave raw mode: {}", e);
        }
    }
}

impl Palette for TermSurface {
    fn color_max(&self) -> u16 {
        0xffff
    }

    /// querying needs a reply from the terminal we can't wait for; restore
    /// falls back to resetting the index
    fn color_content(&mut self, _index: u8) -> io::Result<Option<Rgb>> {
        Ok(None)
    }

    fn init_color(&mut self, index: u8, (r, g, b): Rgb) -> io::Result<()> {
        self.redefined.insert(index);
        self.osc(&format!("4;{};rgb:{:04x}/{:04x}/{:04x}", index, r, g, b))
    }

    fn reset_color(&mut self, index: u8) -> io::Result<()> {
        self.osc(&format!("104;{}", index))?;
        self.redefined.remove(&index);
        Ok(())
    }
}

impl Surface for TermSurface {
    fn present(&mut self, screen: &Screen) -> io::Result<()> {
        let geometry = self.geometry;
        let cursor_visible = self.cursor_visible;
        self.terminal.draw(|f| {
            let size = f.size();

            f.render_widget(
                Paragraph::new(screen.video.clone()),
                geometry.video_area().intersection(size),
            );

            let info: Vec<Spans> = screen
                .info
                .iter()
                .map(|line| Spans::from(line.as_str()))
                .collect();
            f.render_widget(Paragraph::new(info), geometry.info_area().intersection(size));

            if let Some(command) = &screen.command {
                let line = format!(":{}", command);
                let area = geometry.command_area().intersection(size);
                let width = line.chars().count() as u16;
                f.render_widget(Paragraph::new(line), area);
                if cursor_visible && area.height > 0 {
                    f.set_cursor((area.x + width).min(area.right().saturating_sub(1)), area.y);
                }
            }
        })?;
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<Option<Key>> {
        if !self.blocking && !event::poll(Duration::ZERO)? {
            return Ok(None);
        }
        Ok(Key::from_event(event::read()?))
    }

    fn set_blocking(&mut self, blocking: bool) {
        self.blocking = blocking;
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }
}

/// useful for testing non-terminal routines: keys come from a script and
/// frames are kept for inspection
pub struct DummySurface {
    keys: VecDeque<Key>,
    colors: HashMap<u8, Rgb>,
    pub frames: usize,
    pub last_screen: Option<Screen>,
    pub blocking: bool,
    pub cursor_visible: bool,
}

impl DummySurface {
    pub fn new(keys: &[Key]) -> Self {
        DummySurface {
            keys: keys.iter().copied().collect(),
            colors: HashMap::new(),
            frames: 0,
            last_screen: None,
            blocking: false,
            cursor_visible: false,
        }
    }

    /// queue the characters of `text` followed by Enter
    pub fn type_line(&mut self, text: &str) {
        self.keys.extend(text.chars().map(Key::Char));
        self.keys.push_back(Key::Enter);
    }

    pub fn color(&self, index: u8) -> Option<Rgb> {
        self.colors.get(&index).copied()
    }
}

impl Palette for DummySurface {
    fn color_max(&self) -> u16 {
        1000
    }

    fn color_content(&mut self, index: u8) -> io::Result<Option<Rgb>> {
        Ok(self.colors.get(&index).copied())
    }

    fn init_color(&mut self, index: u8, rgb: Rgb) -> io::Result<()> {
        self.colors.insert(index, rgb);
        Ok(())
    }

    fn reset_color(&mut self, index: u8) -> io::Result<()> {
        self.colors.remove(&index);
        Ok(())
    }
}

impl Surface for DummySurface {
    fn present(&mut self, screen: &Screen) -> io::Result<()> {
        self.frames += 1;
        self.last_screen = Some(screen.clone());
        Ok(())
    }

    /// a blocking read past the end of the script would hang a real
    /// terminal forever, so it's an error here
    fn read_key(&mut self) -> io::Result<Option<Key>> {
        match self.keys.pop_front() {
            Some(key) => Ok(Some(key)),
            None if self.blocking => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no more scripted keys",
            )),
            None => Ok(None),
        }
    }

    fn set_blocking(&mut self, blocking: bool) {
        self.blocking = blocking;
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }
}

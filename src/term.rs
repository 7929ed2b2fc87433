use crate::TermInt;
use std::{io::{self, Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, KeyEventKind, read, poll};
use tracing::{debug, error};

/// Logical colors the game draws with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellColor {
    Default,
    Apple,
    Snek,
}

/// What the game needs from a terminal. Rows grow downward from the top.
pub trait Screen {
    /// Next pending key press, if any. Never blocks.
    fn poll_key(&mut self) -> io::Result<Option<KeyEvent>>;

    /// Blocks until a key is pressed.
    fn wait_key(&mut self) -> io::Result<KeyEvent>;

    /// `(height, width)` in cells.
    fn bounds(&self) -> (TermInt, TermInt);

    fn draw_cell(&mut self, row: TermInt, col: TermInt, ch: char, color: CellColor) -> io::Result<()>;

    /// Pushes everything drawn since the last call to the display.
    fn present(&mut self) -> io::Result<()>;

    fn hide_cursor(&mut self) -> io::Result<()>;
}

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager { width, height, stdout: stdout() })
    }

    /// Raw mode first, then the alternate screen. Call `restore` even when
    /// this fails part way.
    pub fn setup(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.stdout, EnterAlternateScreen, terminal::Clear(ClearType::All), cursor::DisableBlinking)?;
        debug!(width = self.width, height = self.height, "terminal ready");
        Ok(())
    }

    /// Attempts every step even if earlier ones fail; returns the first error.
    pub fn restore(&mut self) -> io::Result<()> {
        let steps: [Step<Stdout>; 4] = [
            ("disable raw mode", |_| terminal::disable_raw_mode()),
            ("reset colors", |out| execute!(out, style::ResetColor)),
            ("show cursor", |out| execute!(out, cursor::Show, cursor::EnableBlinking)),
            ("leave alternate screen", |out| execute!(out, LeaveAlternateScreen)),
        ];

        run_all(&mut self.stdout, &steps)
    }

    pub fn show_message(&mut self, lines: &[&str]) -> io::Result<()> {
        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        queue!(self.stdout, style::ResetColor)?;

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), style::Print(" ".repeat(msg_width as usize)))?;
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), style::Print(padded_line))?;
        }

        self.present()
    }
}

type Step<W> = (&'static str, fn(&mut W) -> io::Result<()>);

fn run_all<W>(out: &mut W, steps: &[Step<W>]) -> io::Result<()> {
    let mut first_err = None;

    for (what, step) in steps {
        if let Err(err) = step(out) {
            error!(?err, "failed to {}", what);
            first_err.get_or_insert(err);
        }
    }

    first_err.map_or(Ok(()), Err)
}

impl Screen for TermManager {
    fn poll_key(&mut self) -> io::Result<Option<KeyEvent>> {
        while poll(Duration::ZERO)? {
            match read()? {
                Event::Key(ev) if ev.kind == KeyEventKind::Press => return Ok(Some(ev)),
                _ => {}
            }
        }

        Ok(None)
    }

    fn wait_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                if ev.kind == KeyEventKind::Press {
                    return Ok(ev);
                }
            }
        }
    }

    fn bounds(&self) -> (TermInt, TermInt) {
        (self.height, self.width)
    }

    fn draw_cell(&mut self, row: TermInt, col: TermInt, ch: char, color: CellColor) -> io::Result<()> {
        let fg = match color {
            CellColor::Default => style::Color::Reset,
            CellColor::Apple => style::Color::Red,
            CellColor::Snek => style::Color::Green,
        };

        queue!(self.stdout, cursor::MoveTo(col, row), style::SetForegroundColor(fg), style::Print(ch))
    }

    fn present(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        execute!(self.stdout, cursor::Hide)
    }
}

impl<T: Screen + ?Sized> Screen for &mut T {
    fn poll_key(&mut self) -> io::Result<Option<KeyEvent>> {
        (**self).poll_key()
    }

    fn wait_key(&mut self) -> io::Result<KeyEvent> {
        (**self).wait_key()
    }

    fn bounds(&self) -> (TermInt, TermInt) {
        (**self).bounds()
    }

    fn draw_cell(&mut self, row: TermInt, col: TermInt, ch: char, color: CellColor) -> io::Result<()> {
        (**self).draw_cell(row, col, ch, color)
    }

    fn present(&mut self) -> io::Result<()> {
        (**self).present()
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        (**self).hide_cursor()
    }
}

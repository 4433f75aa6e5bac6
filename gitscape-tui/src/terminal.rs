use std::io::{self, Write};
use std::panic;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event as CrosstermEvent},
    execute, queue,
    style::{Attribute, Color as CtColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
};

use crate::buffer::{Buffer, Cell, char_width};
use crate::theme::Rgb;

/// Raw-mode alternate screen with mouse capture, redrawn by buffer diff.
pub struct Terminal {
    stdout: io::Stdout,
    current_buffer: Buffer,
    previous_buffer: Buffer,
    /// Force a full repaint on the next draw.
    invalidated: bool,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        // Restore the terminal before the panic message is printed
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        let entered = execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture
        )
        .and_then(|_| terminal::size());
        let (width, height) = match entered {
            Ok(size) => size,
            Err(e) => {
                let _ = restore_terminal();
                return Err(e);
            }
        };
        log::debug!("terminal opened at {width}x{height}");

        Ok(Self {
            stdout,
            current_buffer: Buffer::new(width, height),
            previous_buffer: Buffer::new(width, height),
            invalidated: true,
        })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.current_buffer.width(), self.current_buffer.height())
    }

    /// Wait up to `timeout` for input, then drain whatever else is pending.
    pub fn poll(&self, timeout: Duration) -> io::Result<Vec<CrosstermEvent>> {
        let mut events = Vec::new();
        if event::poll(timeout)? {
            events.push(event::read()?);
            while event::poll(Duration::ZERO)? {
                events.push(event::read()?);
            }
        }
        Ok(events)
    }

    /// Paint a fresh frame with `paint` and write the changed cells.
    pub fn draw(&mut self, paint: impl FnOnce(&mut Buffer)) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        if width != self.current_buffer.width() || height != self.current_buffer.height() {
            log::debug!("terminal resized to {width}x{height}");
            self.previous_buffer = Buffer::new(width, height);
            self.invalidated = true;
        }
        self.current_buffer = Buffer::new(width, height);

        paint(&mut self.current_buffer);

        if self.invalidated {
            execute!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
            // Differs from every painted cell, so the whole frame is written
            let unknown = Cell {
                char: '\0',
                ..Cell::default()
            };
            self.previous_buffer = Buffer::filled(width, height, unknown);
            self.invalidated = false;
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.current_buffer, &mut self.previous_buffer);
        Ok(())
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_x = u16::MAX;
        let mut last_y = u16::MAX;
        let mut last_char_width: u16 = 1;
        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_bold = false;

        queue!(self.stdout, SetAttribute(Attribute::Reset))?;

        for (x, y, cell) in self.current_buffer.diff(&self.previous_buffer) {
            // The wide char before already covers this cell
            if cell.wide_continuation {
                continue;
            }

            if y != last_y || x != last_x.wrapping_add(last_char_width) {
                queue!(self.stdout, cursor::MoveTo(x, y))?;
            }

            if last_fg != Some(cell.fg) {
                queue!(self.stdout, SetForegroundColor(ct_color(cell.fg)))?;
                last_fg = Some(cell.fg);
            }
            if last_bg != Some(cell.bg) {
                queue!(self.stdout, SetBackgroundColor(ct_color(cell.bg)))?;
                last_bg = Some(cell.bg);
            }
            if cell.bold != last_bold {
                let attribute = if cell.bold {
                    Attribute::Bold
                } else {
                    Attribute::NormalIntensity
                };
                queue!(self.stdout, SetAttribute(attribute))?;
                last_bold = cell.bold;
            }

            write!(self.stdout, "{}", cell.char)?;

            last_x = x;
            last_y = y;
            last_char_width = char_width(cell.char).max(1) as u16;
        }

        queue!(self.stdout, SetAttribute(Attribute::Reset))?;
        self.stdout.flush()
    }
}

fn ct_color(rgb: Rgb) -> CtColor {
    CtColor::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn restore_terminal() -> io::Result<()> {
    restore_to(&mut io::stdout())
}

/// Leave the alternate screen on `out` and raw mode, even when writing
/// fails. Safe to call more than once.
fn restore_to(out: &mut impl Write) -> io::Result<()> {
    let left = execute!(
        out,
        event::DisableMouseCapture,
        cursor::Show,
        terminal::LeaveAlternateScreen
    );
    let raw = terminal::disable_raw_mode();
    left.and(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writer that refuses every write.
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("closed"))
        }
    }

    #[test]
    fn test_restore_writes_teardown_sequence() {
        let mut out = Vec::new();
        restore_to(&mut out).unwrap();
        restore_to(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        // Show cursor, leave alternate screen
        assert_eq!(text.matches("\x1b[?25h").count(), 2);
        assert_eq!(text.matches("\x1b[?1049l").count(), 2);
    }

    #[test]
    fn test_restore_reports_write_failure() {
        assert!(restore_to(&mut Broken).is_err());
    }
}

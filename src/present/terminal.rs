use crossterm::{
    cursor,
    event::{self, EnableMouseCapture},
    execute, queue,
    style::{ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType, EnterAlternateScreen},
    Command,
};
use std::io::{self, BufWriter, Write};
use std::time::Duration;

use super::{
    downsample_to_cells, make_color, viewport, HalfblockCell, Presenter, Viewport, WindowConfig,
    HALF_BLOCK,
};
use crate::error::AppResult;
use crate::input::{classify_event, discard_pending, InputAction};
use crate::terminal_setup::cleanup_terminal;
use crate::turtle::canvas::Canvas;

pub fn detect_truecolor() -> bool {
    match std::env::var("COLORTERM") {
        Ok(val) => !val.is_empty() && (val == "truecolor" || val == "24bit"),
        Err(_) => match std::env::var("TERM_PROGRAM") {
            Ok(prog) => prog != "Apple_Terminal",
            Err(_) => match std::env::var("TERM") {
                Ok(term) => {
                    term.contains("ghostty") || term.contains("kitty") || term.contains("wezterm")
                }
                Err(_) => false,
            },
        },
    }
}

/// Shows the canvas in the terminal's alternate screen with half-block cells.
pub struct TerminalPresenter {
    stdout: BufWriter<io::Stdout>,
    use_truecolor: bool,
    cells: Vec<HalfblockCell>,
    last_viewport: Option<Viewport>,
    open: bool,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            stdout: BufWriter::with_capacity(1024 * 1024, io::stdout()),
            use_truecolor: detect_truecolor(),
            cells: Vec::new(),
            last_viewport: None,
            open: false,
        }
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for TerminalPresenter {
    fn open(&mut self, window: &WindowConfig) -> AppResult<()> {
        terminal::enable_raw_mode()?;
        self.open = true;
        execute!(
            self.stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            terminal::SetTitle(&window.title),
            terminal::Clear(ClearType::All)
        )?;
        self.stdout.flush()?;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> AppResult<()> {
        execute!(self.stdout, terminal::SetTitle(title))?;
        Ok(())
    }

    fn present(&mut self, canvas: &Canvas, window: &WindowConfig) -> AppResult<()> {
        let (cols, rows) = terminal::size().unwrap_or((120, 40));
        let vp = viewport(
            window,
            canvas.width,
            canvas.height,
            cols.max(1) as usize,
            rows.max(1) as usize,
        );
        if self.last_viewport != Some(vp) {
            queue!(self.stdout, ResetColor, terminal::Clear(ClearType::All))?;
            self.last_viewport = Some(vp);
        }

        downsample_to_cells(canvas, vp.cols, vp.rows, &mut self.cells);
        draw_cells(&mut self.stdout, &self.cells, vp, self.use_truecolor)?;
        queue!(self.stdout, ResetColor)?;
        self.stdout.flush()?;
        Ok(())
    }

    fn wait_for_dismiss(&mut self, canvas: &Canvas, window: &WindowConfig) -> AppResult<()> {
        let dropped = discard_pending(|| event::poll(Duration::ZERO), event::read)?;
        if dropped > 0 {
            log::debug!("discarded {dropped} input events queued while drawing");
        }
        loop {
            match classify_event(&event::read()?) {
                InputAction::Dismiss => return Ok(()),
                InputAction::Redraw => self.present(canvas, window)?,
                InputAction::Ignore => {}
            }
        }
    }

    fn close(&mut self) -> AppResult<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        cleanup_terminal(&mut self.stdout)
    }
}

impl Drop for TerminalPresenter {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn write_ansi_command(buf: &mut String, command: impl Command) -> io::Result<()> {
    command
        .write_ansi(buf)
        .map_err(|_| io::Error::other("failed to encode ANSI command"))
}

/// Writes one row of the viewport per buffered chunk, only switching colors
/// when they change.
pub fn draw_cells(
    out: &mut impl Write,
    cells: &[HalfblockCell],
    vp: Viewport,
    use_truecolor: bool,
) -> io::Result<()> {
    let mut last_bg: Option<[u8; 3]> = None;
    let mut last_fg: Option<[u8; 3]> = None;
    let mut row_buf = String::with_capacity(vp.cols * 8 + 32);

    for row in 0..vp.rows {
        row_buf.clear();
        write_ansi_command(
            &mut row_buf,
            cursor::MoveTo(vp.col as u16, (vp.row + row) as u16),
        )?;

        for col in 0..vp.cols {
            let (top, bottom) = cells[row * vp.cols + col];
            if last_bg != Some(top) {
                write_ansi_command(
                    &mut row_buf,
                    SetBackgroundColor(make_color(top, use_truecolor)),
                )?;
                last_bg = Some(top);
            }
            if last_fg != Some(bottom) {
                write_ansi_command(
                    &mut row_buf,
                    SetForegroundColor(make_color(bottom, use_truecolor)),
                )?;
                last_fg = Some(bottom);
            }
            row_buf.push(HALF_BLOCK);
        }

        out.write_all(row_buf.as_bytes())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_one_half_block_per_cell_at_viewport_offset() {
        let vp = Viewport {
            col: 2,
            row: 1,
            cols: 3,
            rows: 2,
        };
        let cells = vec![([255, 0, 0], [0, 0, 255]); 6];
        let mut out = Vec::new();
        draw_cells(&mut out, &cells, vp, true).expect("draw");

        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.matches(HALF_BLOCK).count(), 6);
        // MoveTo is 0-based in crossterm, 1-based in the escape sequence
        assert!(text.contains("\x1b[2;3H"));
        assert!(text.contains("\x1b[3;3H"));
        assert!(text.contains("48;2;255;0;0"));
        assert!(text.contains("38;2;0;0;255"));
    }

    #[test]
    fn repeated_colors_are_emitted_once() {
        let vp = Viewport {
            col: 0,
            row: 0,
            cols: 4,
            rows: 1,
        };
        let cells = vec![([1, 2, 3], [4, 5, 6]); 4];
        let mut out = Vec::new();
        draw_cells(&mut out, &cells, vp, true).expect("draw");

        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.matches("48;2;1;2;3").count(), 1);
        assert_eq!(text.matches("38;2;4;5;6").count(), 1);
    }

    #[test]
    fn falls_back_to_ansi256() {
        let vp = Viewport {
            col: 0,
            row: 0,
            cols: 1,
            rows: 1,
        };
        let mut out = Vec::new();
        draw_cells(&mut out, &[([255, 0, 0], [0, 0, 0])], vp, false).expect("draw");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("48;5;196"));
        assert!(text.contains("38;5;16"));
    }
}

use crossterm::{
    cursor,
    event::DisableMouseCapture,
    execute,
    style::ResetColor,
    terminal::{self, ClearType, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::panic;

use crate::error::AppResult;

pub fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let raw_mode_result = terminal::disable_raw_mode();
        let mut stdout = io::stdout();
        let cleanup_result = execute!(
            stdout,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            LeaveAlternateScreen,
            terminal::Clear(ClearType::All)
        );
        if raw_mode_result.is_err() || cleanup_result.is_err() {
            let mut stderr = io::stderr();
            let _ = writeln!(
                stderr,
                "panic cleanup fallback: writing terminal reset escape sequences"
            );
            let _ = stderr.write_all(b"\x1b[?1000l\x1b[?1049l\x1b[?25h\x1b[0m");
            let _ = stderr.flush();
        }
        default_hook(panic_info);
    }));
}

pub fn cleanup_terminal(stdout: &mut impl Write) -> AppResult<()> {
    execute!(
        stdout,
        ResetColor,
        DisableMouseCapture,
        cursor::Show,
        LeaveAlternateScreen
    )?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

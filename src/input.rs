use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Dismiss,
    Redraw,
    Ignore,
}

/// Any mouse button press closes the window, as do `Esc`, `q`, `Enter` and
/// `Ctrl+C` for terminals without mouse reporting.
pub fn classify_event(event: &Event) -> InputAction {
    match event {
        Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
            InputAction::Dismiss
        }
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Esc | KeyCode::Enter => InputAction::Dismiss,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                InputAction::Dismiss
            }
            KeyCode::Char(c) if c.eq_ignore_ascii_case(&'q') => InputAction::Dismiss,
            _ => InputAction::Ignore,
        },
        Event::Resize(_, _) | Event::FocusGained => InputAction::Redraw,
        _ => InputAction::Ignore,
    }
}

/// Reads and discards everything already queued, so only input that arrives
/// after the window is ready can dismiss it. Returns how many events were dropped.
pub fn discard_pending(
    mut has_pending: impl FnMut() -> io::Result<bool>,
    mut read: impl FnMut() -> io::Result<Event>,
) -> io::Result<usize> {
    let mut dropped = 0;
    while has_pending()? {
        read()?;
        dropped += 1;
    }
    Ok(dropped)
}

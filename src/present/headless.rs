use super::{Presenter, WindowConfig, DEFAULT_TITLE};
use crate::error::AppResult;
use crate::turtle::canvas::Canvas;

/// Off-screen target: nothing is shown, redraws are only counted and a
/// dismiss returns immediately.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    pub frames: usize,
    pub title: Option<String>,
    open: bool,
}

#[cfg(test)]
impl HeadlessPresenter {
    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl Presenter for HeadlessPresenter {
    fn open(&mut self, window: &WindowConfig) -> AppResult<()> {
        self.open = true;
        log::debug!("headless surface opened ({})", window.title);
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> AppResult<()> {
        self.title = Some(title.to_string());
        Ok(())
    }

    fn present(&mut self, _canvas: &Canvas, _window: &WindowConfig) -> AppResult<()> {
        self.frames += 1;
        Ok(())
    }

    fn wait_for_dismiss(&mut self, _canvas: &Canvas, _window: &WindowConfig) -> AppResult<()> {
        Ok(())
    }

    fn close(&mut self) -> AppResult<()> {
        if self.open {
            log::debug!(
                "headless surface {} closed after {} redraws",
                self.title.as_deref().unwrap_or(DEFAULT_TITLE),
                self.frames
            );
        }
        self.open = false;
        Ok(())
    }

    fn animates(&self) -> bool {
        false
    }
}

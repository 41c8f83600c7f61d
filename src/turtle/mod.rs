//! A small turtle-graphics surface: a [`Screen`] that owns the window and a
//! [`Pen`] cursor that stamps shapes onto its canvas.

pub mod canvas;
pub mod screen;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Shape {
    Circle,
    Square,
}

/// Window-level commands.
pub trait Screen {
    /// Maximum color component value accepted by [`Pen::color`]: 1 or 255.
    fn colormode(&mut self, max: u16) -> AppResult<()>;
    /// Values up to 1.0 are fractions of the display, larger values absolute cells.
    fn setup(&mut self, width: f64, height: f64) -> AppResult<()>;
    fn screensize(&mut self, canvas_width: u32, canvas_height: u32) -> AppResult<()>;
    fn delay(&mut self, millis: u64);
    /// Redraw after every `every`-th drawing update; 0 turns automatic redraws off.
    fn tracer(&mut self, every: u32, delay_millis: u64);
    fn title(&mut self, title: &str) -> AppResult<()>;
    fn canvas_size(&self) -> (u32, u32);
    /// Final redraw, then block until the user dismisses the window.
    fn exit_on_click(&mut self) -> AppResult<()>;
    fn bye(&mut self) -> AppResult<()>;
}

/// Cursor commands.
pub trait Pen {
    fn shape(&mut self, shape: Shape);
    fn speed(&mut self, speed: u8);
    fn pen_up(&mut self);
    #[cfg(test)]
    fn pen_down(&mut self);
    fn set_pos(&mut self, x: f64, y: f64) -> AppResult<()>;
    fn color(&mut self, pen: Rgb, fill: Rgb) -> AppResult<()>;
    fn shape_size(&mut self, stretch_wid: f64, stretch_len: f64);
    fn stamp(&mut self) -> AppResult<usize>;
}

use std::time::Duration;

use super::canvas::Canvas;
use super::{Pen, Rgb, Screen, Shape};
use crate::error::{AppResult, PixelizeError};
use crate::present::{Presenter, WindowConfig};
use crate::screenshot::ScreenShot;

/// Base radius (circle) or half-side (square) of a stamp before stretching.
const SHAPE_BASE_SIZE: f64 = 10.0;
const OUTLINE_WIDTH: f64 = 1.0;
const DEFAULT_DELAY: Duration = Duration::from_millis(10);
const DEFAULT_SPEED: u8 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct TurtleState {
    pub position: (f64, f64),
    pub pen_down: bool,
    pub shape: Shape,
    pub speed: u8,
    pub stretch: (f64, f64),
    pub pen_color: Rgb,
    pub fill_color: Rgb,
    pub stamps: usize,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self {
            position: (0.0, 0.0),
            pen_down: true,
            shape: Shape::Circle,
            speed: DEFAULT_SPEED,
            stretch: (1.0, 1.0),
            pen_color: Rgb::BLACK,
            fill_color: Rgb::BLACK,
            stamps: 0,
        }
    }
}

/// Turtle speeds run 1..=10 with 0 meaning "no animation"; anything above 10
/// collapses to 0.
pub fn normalize_speed(speed: u8) -> u8 {
    if speed > 10 {
        0
    } else {
        speed
    }
}

/// The single window plus its one cursor. Drawing goes into an off-screen
/// [`Canvas`]; the [`Presenter`] shows it every `tracer` updates.
pub struct TurtleScreen<P: Presenter> {
    canvas: Canvas,
    presenter: P,
    window: WindowConfig,
    color_max: u16,
    delay: Duration,
    tracer_every: u32,
    pending_updates: u32,
    turtle: TurtleState,
    screenshot: Option<ScreenShot>,
    closed: bool,
}

impl<P: Presenter> TurtleScreen<P> {
    pub fn open(mut presenter: P, screenshot: Option<ScreenShot>) -> AppResult<Self> {
        let window = WindowConfig::default();
        presenter.open(&window)?;
        Ok(Self {
            canvas: Canvas::default(),
            presenter,
            window,
            color_max: 1,
            delay: DEFAULT_DELAY,
            tracer_every: 1,
            pending_updates: 0,
            turtle: TurtleState::default(),
            screenshot,
            closed: false,
        })
    }

    fn update(&mut self) -> AppResult<()> {
        if self.tracer_every == 0 {
            return Ok(());
        }
        self.pending_updates += 1;
        if self.pending_updates >= self.tracer_every {
            self.redraw()?;
        }
        Ok(())
    }

    fn redraw(&mut self) -> AppResult<()> {
        self.pending_updates = 0;
        self.presenter.present(&self.canvas, &self.window)?;
        if self.presenter.animates() && !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        Ok(())
    }

    fn check_color(&self, color: Rgb) -> AppResult<()> {
        let max = self.color_max;
        if color.to_array().iter().any(|&c| u16::from(c) > max) {
            return Err(PixelizeError::BadColor {
                rgb: color.to_array(),
                max,
            }
            .into());
        }
        Ok(())
    }

    /// Colors given in colormode 1 are scaled up to the canvas' 0..=255 range.
    fn canvas_color(&self, color: Rgb) -> Rgb {
        if self.color_max == 1 {
            Rgb::new(
                color.r.saturating_mul(255),
                color.g.saturating_mul(255),
                color.b.saturating_mul(255),
            )
        } else {
            color
        }
    }
}

#[cfg(test)]
impl<P: Presenter> TurtleScreen<P> {
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn window(&self) -> &WindowConfig {
        &self.window
    }

    pub fn turtle(&self) -> &TurtleState {
        &self.turtle
    }
}

impl<P: Presenter> Screen for TurtleScreen<P> {
    fn colormode(&mut self, max: u16) -> AppResult<()> {
        if max != 1 && max != 255 {
            return Err(PixelizeError::BadColorMode(max).into());
        }
        self.color_max = max;
        Ok(())
    }

    fn setup(&mut self, width: f64, height: f64) -> AppResult<()> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(PixelizeError::BadWindowSize { width, height }.into());
        }
        self.window.width = width;
        self.window.height = height;
        Ok(())
    }

    fn screensize(&mut self, canvas_width: u32, canvas_height: u32) -> AppResult<()> {
        self.canvas
            .resize(canvas_width as usize, canvas_height as usize);
        Ok(())
    }

    fn delay(&mut self, millis: u64) {
        self.delay = Duration::from_millis(millis);
    }

    fn tracer(&mut self, every: u32, delay_millis: u64) {
        self.tracer_every = every;
        self.pending_updates = 0;
        self.delay = Duration::from_millis(delay_millis);
    }

    fn title(&mut self, title: &str) -> AppResult<()> {
        self.window.title = title.to_string();
        self.presenter.set_title(title)
    }

    fn canvas_size(&self) -> (u32, u32) {
        (self.canvas.width as u32, self.canvas.height as u32)
    }

    fn exit_on_click(&mut self) -> AppResult<()> {
        self.redraw()?;
        log::debug!(
            "{} stamps drawn, waiting for a click to close",
            self.turtle.stamps
        );
        let waited = self.presenter.wait_for_dismiss(&self.canvas, &self.window);
        let closed = self.bye();
        waited?;
        closed?;

        if let Some(screenshot) = &self.screenshot {
            screenshot.capture(&self.canvas)?;
            log::info!("saved screenshot to {}", screenshot.path().display());
        }
        Ok(())
    }

    fn bye(&mut self) -> AppResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.presenter.close()
    }
}

impl<P: Presenter> Pen for TurtleScreen<P> {
    fn shape(&mut self, shape: Shape) {
        self.turtle.shape = shape;
    }

    fn speed(&mut self, speed: u8) {
        self.turtle.speed = normalize_speed(speed);
    }

    fn pen_up(&mut self) {
        self.turtle.pen_down = false;
    }

    #[cfg(test)]
    fn pen_down(&mut self) {
        self.turtle.pen_down = true;
    }

    fn set_pos(&mut self, x: f64, y: f64) -> AppResult<()> {
        let from = self.turtle.position;
        self.turtle.position = (x, y);
        if self.turtle.pen_down {
            let color = self.canvas_color(self.turtle.pen_color);
            self.canvas.draw_line(from, (x, y), color);
            self.update()?;
        }
        Ok(())
    }

    fn color(&mut self, pen: Rgb, fill: Rgb) -> AppResult<()> {
        self.check_color(pen)?;
        self.check_color(fill)?;
        self.turtle.pen_color = pen;
        self.turtle.fill_color = fill;
        Ok(())
    }

    fn shape_size(&mut self, stretch_wid: f64, stretch_len: f64) {
        self.turtle.stretch = (stretch_wid, stretch_len);
    }

    fn stamp(&mut self) -> AppResult<usize> {
        let (stretch_wid, stretch_len) = self.turtle.stretch;
        // heading is fixed east: length runs along x, width along y
        let half_x = SHAPE_BASE_SIZE * stretch_len;
        let half_y = SHAPE_BASE_SIZE * stretch_wid;
        let fill = self.canvas_color(self.turtle.fill_color);
        let outline = self.canvas_color(self.turtle.pen_color);
        let center = self.turtle.position;

        match self.turtle.shape {
            Shape::Circle => {
                self.canvas
                    .fill_ellipse(center, half_x, half_y, fill, outline, OUTLINE_WIDTH)
            }
            Shape::Square => {
                self.canvas
                    .fill_rect(center, half_x, half_y, fill, outline, OUTLINE_WIDTH)
            }
        }

        self.turtle.stamps += 1;
        self.update()?;
        Ok(self.turtle.stamps)
    }
}

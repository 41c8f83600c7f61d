pub mod headless;
pub mod terminal;

use crossterm::style::Color;

use crate::error::AppResult;
use crate::turtle::canvas::Canvas;

pub type HalfblockCell = ([u8; 3], [u8; 3]);

pub const HALF_BLOCK: char = '\u{2584}';
pub const DEFAULT_TITLE: &str = "pixelize";

// width/height up to 1.0 are fractions of the display, larger values are cells
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub width: f64,
    pub height: f64,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 0.5,
            height: 0.75,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

pub trait Presenter {
    fn open(&mut self, window: &WindowConfig) -> AppResult<()>;
    fn set_title(&mut self, title: &str) -> AppResult<()>;
    fn present(&mut self, canvas: &Canvas, window: &WindowConfig) -> AppResult<()>;
    fn wait_for_dismiss(&mut self, canvas: &Canvas, window: &WindowConfig) -> AppResult<()>;
    fn close(&mut self) -> AppResult<()>;

    /// Whether redraws are visible, so that screen delays are worth sleeping for.
    fn animates(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub col: usize,
    pub row: usize,
    pub cols: usize,
    pub rows: usize,
}

fn window_extent(requested: f64, available: usize) -> usize {
    let cells = if requested <= 1.0 {
        (requested * available as f64).round()
    } else {
        requested.round()
    };
    (cells.max(1.0) as usize).min(available.max(1))
}

/// Keeps the canvas aspect ratio; a half-block cell is two pixels tall.
pub fn viewport(
    window: &WindowConfig,
    canvas_width: usize,
    canvas_height: usize,
    term_cols: usize,
    term_rows: usize,
) -> Viewport {
    let win_cols = window_extent(window.width, term_cols);
    let win_rows = window_extent(window.height, term_rows);

    let (mut cols, mut rows) = (win_cols, win_rows);
    if canvas_width > 0 && canvas_height > 0 {
        let scale = (win_cols as f64 / canvas_width as f64)
            .min(win_rows as f64 * 2.0 / canvas_height as f64);
        cols = ((canvas_width as f64 * scale).round() as usize).clamp(1, win_cols);
        rows = ((canvas_height as f64 * scale / 2.0).round() as usize).clamp(1, win_rows);
    }

    Viewport {
        col: term_cols.saturating_sub(cols) / 2,
        row: term_rows.saturating_sub(rows) / 2,
        cols,
        rows,
    }
}

fn average(fb: &[[u8; 3]], width: usize, xs: (usize, usize), ys: (usize, usize)) -> [u8; 3] {
    let mut sum = [0u32; 3];
    let mut count = 0u32;
    for y in ys.0..ys.1 {
        for x in xs.0..xs.1 {
            let p = fb[y * width + x];
            sum[0] += p[0] as u32;
            sum[1] += p[1] as u32;
            sum[2] += p[2] as u32;
            count += 1;
        }
    }
    if count == 0 {
        return [0, 0, 0];
    }
    [
        (sum[0] / count) as u8,
        (sum[1] / count) as u8,
        (sum[2] / count) as u8,
    ]
}

fn span(i: usize, n: usize, len: usize) -> (usize, usize) {
    let start = i * len / n;
    let end = ((i + 1) * len / n).max(start + 1).min(len);
    (start.min(len), end)
}

// --- Downsample ---

pub fn downsample_to_cells(
    canvas: &Canvas,
    cols: usize,
    rows: usize,
    out: &mut Vec<HalfblockCell>,
) {
    out.clear();
    out.resize(cols * rows, ([0u8; 3], [0u8; 3]));
    if canvas.width == 0 || canvas.height == 0 || cols == 0 || rows == 0 {
        return;
    }

    let pixel_rows = rows * 2;
    for row in 0..rows {
        let top = span(row * 2, pixel_rows, canvas.height);
        let bottom = span(row * 2 + 1, pixel_rows, canvas.height);
        for col in 0..cols {
            let xs = span(col, cols, canvas.width);
            out[row * cols + col] = (
                average(&canvas.framebuffer, canvas.width, xs, top),
                average(&canvas.framebuffer, canvas.width, xs, bottom),
            );
        }
    }
}

pub fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        return 232 + ((r as f32 - 8.0) / 247.0 * 24.0) as u8;
    }
    let ri = (r as f32 / 255.0 * 5.0 + 0.5) as u8;
    let gi = (g as f32 / 255.0 * 5.0 + 0.5) as u8;
    let bi = (b as f32 / 255.0 * 5.0 + 0.5) as u8;
    16 + 36 * ri + 6 * gi + bi
}

pub fn make_color(rgb: [u8; 3], use_truecolor: bool) -> Color {
    if use_truecolor {
        Color::Rgb {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
        }
    } else {
        Color::AnsiValue(rgb_to_ansi256(rgb[0], rgb[1], rgb[2]))
    }
}

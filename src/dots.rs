use crate::error::AppResult;
use crate::sampler::Sample;
use crate::turtle::{Pen, Rgb, Shape};

/// Subtracted from both sample indices so the drawing starts near the origin.
pub const CENTER_OFFSET: f64 = 100.0;
pub const DOT_SPEED: u8 = 10;
pub const DOT_STRETCH: f64 = 0.2;

/// Canvas placement of a sample: the oriented image's row runs along x and
/// its column along y. With the canvas' y-up convention this shows the
/// source image upright.
pub fn canvas_position(row: usize, column: usize) -> (f64, f64) {
    (row as f64 - CENTER_OFFSET, column as f64 - CENTER_OFFSET)
}

/// Cursor setup shared by every dot; done once instead of per dot.
pub fn prepare_pen(pen: &mut impl Pen, shape: Shape) {
    pen.shape(shape);
    pen.speed(DOT_SPEED);
    pen.shape_size(DOT_STRETCH, DOT_STRETCH);
    pen.pen_up();
}

pub fn draw_dot(pen: &mut impl Pen, sample: &Sample) -> AppResult<()> {
    let [blue, green, red] = sample.bgr;
    let color = Rgb::new(red, green, blue);
    let (x, y) = canvas_position(sample.row, sample.column);

    pen.pen_up();
    pen.set_pos(x, y)?;
    pen.color(color, color)?;
    pen.stamp()?;
    pen.pen_up();
    Ok(())
}

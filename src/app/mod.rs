#[cfg(test)]
mod tests;

use std::path::PathBuf;

use crate::decode::Decoder;
use crate::dots::{draw_dot, prepare_pen};
use crate::error::AppResult;
use crate::pixels::PixelArray;
use crate::sampler::{load_image, sample_count, samples, STRIDE};
use crate::turtle::{Pen, Screen, Shape};

pub const COLOR_MODE: u16 = 255;
pub const WINDOW_FRACTION: (f64, f64) = (0.6, 0.8);
pub const CANVAS_EXTENT: (u32, u32) = (1000, 1000);
pub const SCREEN_DELAY_MS: u64 = 0;
pub const TRACER_BATCH: (u32, u64) = (2000, 0);
pub const WINDOW_TITLE: &str = "Pixelization App";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub image_path: PathBuf,
    pub stride: usize,
    pub dot_shape: Shape,
    /// Level for the per-dot lines and the canvas height report.
    pub dot_log_level: log::Level,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from("sample.png"),
            stride: STRIDE,
            dot_shape: Shape::Circle,
            dot_log_level: log::Level::Debug,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Rendered { dots: usize },
    ImageUnavailable,
}

pub fn apply_settings(screen: &mut impl Screen) -> AppResult<()> {
    screen.colormode(COLOR_MODE)?;
    screen.setup(WINDOW_FRACTION.0, WINDOW_FRACTION.1)?;
    screen.screensize(CANVAS_EXTENT.0, CANVAS_EXTENT.1)?;
    screen.delay(SCREEN_DELAY_MS);
    screen.tracer(TRACER_BATCH.0, TRACER_BATCH.1);
    screen.title(WINDOW_TITLE)?;
    Ok(())
}

/// Decodes the image, then opens the surface and stamps every sample on it.
/// The surface is only opened once the image is known to be usable.
pub fn run<D, B, F>(decoder: &D, config: &RunConfig, open_surface: F) -> AppResult<RunOutcome>
where
    D: Decoder,
    B: Screen + Pen,
    F: FnOnce() -> AppResult<B>,
{
    let loaded = load_image(decoder, &config.image_path);
    let Some(image) = loaded.image else {
        log::error!("Failed to load image data. Exiting.");
        return Ok(RunOutcome::ImageUnavailable);
    };

    let mut surface = open_surface()?;
    let drawn = draw_image(&mut surface, &image, config);
    let dots = match drawn {
        Ok(dots) => dots,
        Err(err) => {
            let _ = surface.bye();
            return Err(err);
        }
    };

    log::log!(
        config.dot_log_level,
        "canvas height: {}",
        surface.canvas_size().1
    );
    surface.exit_on_click()?;
    Ok(RunOutcome::Rendered { dots })
}

fn draw_image<B: Screen + Pen>(
    surface: &mut B,
    image: &PixelArray,
    config: &RunConfig,
) -> AppResult<usize> {
    let stride = config.stride;
    apply_settings(surface)?;
    prepare_pen(surface, config.dot_shape);
    log::debug!(
        "stamping {} dots from a {}x{} image",
        sample_count(image.rows(), image.columns(), stride),
        image.rows(),
        image.columns()
    );

    let mut dots = 0;
    for sample in samples(image, stride)? {
        let [b, g, r] = sample.bgr;
        log::log!(
            config.dot_log_level,
            "x:{}, y:{}, RGB:({r}, {g}, {b})",
            sample.row,
            sample.column
        );
        draw_dot(surface, &sample)?;
        dots += 1;
    }
    Ok(dots)
}

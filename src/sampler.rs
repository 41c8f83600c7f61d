use std::path::Path;

use crate::decode::Decoder;
use crate::error::PixelizeError;
use crate::pixels::PixelArray;

pub const STRIDE: usize = 5;

/// `row` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub row: usize,
    pub column: usize,
    pub bgr: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub image: Option<PixelArray>,
    pub height: usize,
    pub width: usize,
}

impl LoadedImage {
    pub fn failed() -> Self {
        Self {
            image: None,
            height: 0,
            width: 0,
        }
    }

    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }
}

/// Decode problems are logged and turned into [`LoadedImage::failed`].
pub fn load_image(decoder: &impl Decoder, path: &Path) -> LoadedImage {
    let raw = match decoder.decode(path) {
        Ok(Some(raw)) if !raw.is_empty() => raw,
        Ok(_) => {
            log::error!(
                "Error loading image: '{}' not found or could not be read",
                path.display()
            );
            return LoadedImage::failed();
        }
        Err(err) => {
            log::error!("Error loading image: {err}");
            return LoadedImage::failed();
        }
    };

    let image = raw.orient_for_display();
    let (height, width) = (image.rows(), image.columns());
    log::info!("height: {height}");
    log::info!("width: {width}");
    log::info!("channel: {}", image.channels());

    LoadedImage {
        image: Some(image),
        height,
        width,
    }
}

pub fn sample_indices(len: usize, stride: usize) -> impl Iterator<Item = usize> + Clone {
    (1..=len).step_by(stride.max(1))
}

pub fn sample_count(height: usize, width: usize, stride: usize) -> usize {
    let stride = stride.max(1);
    height.div_ceil(stride) * width.div_ceil(stride)
}

pub fn samples(
    image: &PixelArray,
    stride: usize,
) -> Result<impl Iterator<Item = Sample> + '_, PixelizeError> {
    if stride == 0 {
        return Err(PixelizeError::ZeroStride);
    }
    if image.channels() < 3 {
        return Err(PixelizeError::TooFewChannels(image.channels()));
    }

    let columns = sample_indices(image.columns(), stride);
    Ok(sample_indices(image.rows(), stride).flat_map(move |row| {
        columns.clone().map(move |column| {
            let px = image.pixel(row - 1, column - 1);
            Sample {
                row,
                column,
                bgr: [px[0], px[1], px[2]],
            }
        })
    }))
}

use std::path::Path;

use image::io::Reader as ImageReader;

use crate::error::PixelizeError;
use crate::pixels::PixelArray;

/// Turns an encoded image file into a [`PixelArray`].
///
/// `Ok(None)` means the file decoded but carried no pixel data.
pub trait Decoder {
    fn decode(&self, path: &Path) -> Result<Option<PixelArray>, PixelizeError>;
}

/// Decodes anything the `image` crate understands, guessing the format from
/// the file contents. Channels come out blue-green-red, with alpha appended
/// when the source has it; grayscale sources are expanded to three channels.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFileDecoder;

impl Decoder for ImageFileDecoder {
    fn decode(&self, path: &Path) -> Result<Option<PixelArray>, PixelizeError> {
        let decode_err = |reason: String| PixelizeError::Decode {
            path: path.to_path_buf(),
            reason,
        };

        let img = ImageReader::open(path)
            .map_err(|e| decode_err(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| decode_err(e.to_string()))?
            .decode()
            .map_err(|e| decode_err(e.to_string()))?;

        let (width, height) = (img.width() as usize, img.height() as usize);
        if width == 0 || height == 0 {
            return Ok(None);
        }

        let (channels, mut data) = if img.color().has_alpha() {
            (4, img.to_rgba8().into_raw())
        } else {
            (3, img.to_rgb8().into_raw())
        };
        for px in data.chunks_exact_mut(channels) {
            px.swap(0, 2);
        }

        PixelArray::new(height, width, channels, data).map(Some)
    }
}

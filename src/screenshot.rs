use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::error::{AppResult, PixelizeError};
use crate::turtle::canvas::Canvas;

/// Writes the canvas to a PNG file.
#[derive(Debug, Clone)]
pub struct ScreenShot {
    path: PathBuf,
}

impl ScreenShot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capture(&self, canvas: &Canvas) -> AppResult<()> {
        let failed = |reason: String| PixelizeError::Screenshot {
            path: self.path.clone(),
            reason,
        };

        let raw: Vec<u8> = canvas.framebuffer.iter().flatten().copied().collect();
        let img = RgbImage::from_raw(canvas.width as u32, canvas.height as u32, raw)
            .filter(|img| img.width() > 0 && img.height() > 0)
            .ok_or_else(|| failed(format!("empty canvas {}x{}", canvas.width, canvas.height)))?;
        img.save(&self.path).map_err(|e| failed(e.to_string()))?;
        Ok(())
    }
}

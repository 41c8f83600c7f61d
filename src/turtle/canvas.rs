use super::Rgb;

pub const DEFAULT_CANVAS_WIDTH: usize = 400;
pub const DEFAULT_CANVAS_HEIGHT: usize = 300;
pub const BACKGROUND: [u8; 3] = [255, 255, 255];

/// Raster behind the turtle screen. World coordinates put the origin at the
/// center with y pointing up; pixel (0, 0) is the top-left corner.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub framebuffer: Vec<[u8; 3]>,
    pub width: usize,
    pub height: usize,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            framebuffer: vec![BACKGROUND; width.saturating_mul(height)],
            width,
            height,
        }
    }

    /// Grows or shrinks the extent, keeping what was drawn around the origin.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width == width && self.height == height {
            return;
        }

        let mut resized = Canvas::new(width, height);
        let dx = (width as isize - self.width as isize) / 2;
        let dy = (height as isize - self.height as isize) / 2;
        for y in 0..self.height {
            let ny = y as isize + dy;
            if ny < 0 || ny >= height as isize {
                continue;
            }
            for x in 0..self.width {
                let nx = x as isize + dx;
                if nx < 0 || nx >= width as isize {
                    continue;
                }
                resized.framebuffer[ny as usize * width + nx as usize] =
                    self.framebuffer[y * self.width + x];
            }
        }
        *self = resized;
    }

    pub fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.width as f64 * 0.5, self.height as f64 * 0.5 - y)
    }

    #[cfg(test)]
    pub fn pixel(&self, px: usize, py: usize) -> Option<[u8; 3]> {
        if px >= self.width || py >= self.height {
            return None;
        }
        Some(self.framebuffer[py * self.width + px])
    }

    /// Color at a world coordinate.
    #[cfg(test)]
    pub fn at(&self, x: f64, y: f64) -> Option<[u8; 3]> {
        let (px, py) = self.to_pixel(x, y);
        if px < 0.0 || py < 0.0 {
            return None;
        }
        self.pixel(px as usize, py as usize)
    }

    fn put(&mut self, px: isize, py: isize, color: [u8; 3]) {
        if px < 0 || py < 0 || px as usize >= self.width || py as usize >= self.height {
            return;
        }
        self.framebuffer[py as usize * self.width + px as usize] = color;
    }

    /// Bounding box of a world-space rectangle in pixel space, clipped.
    fn pixel_bounds(&self, cx: f64, cy: f64, half_w: f64, half_h: f64) -> Option<[usize; 4]> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let min_x = (cx - half_w).floor().max(0.0) as usize;
        let max_x = (cx + half_w).ceil().min((self.width - 1) as f64);
        let min_y = (cy - half_h).floor().max(0.0) as usize;
        let max_y = (cy + half_h).ceil().min((self.height - 1) as f64);
        if max_x < 0.0 || max_y < 0.0 {
            return None;
        }
        let (max_x, max_y) = (max_x as usize, max_y as usize);
        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some([min_x, max_x, min_y, max_y])
    }

    /// Filled ellipse centered on a world coordinate; the outermost
    /// `outline_width` pixels take the outline color.
    pub fn fill_ellipse(
        &mut self,
        center: (f64, f64),
        radius_x: f64,
        radius_y: f64,
        fill: Rgb,
        outline: Rgb,
        outline_width: f64,
    ) {
        let (cx, cy) = self.to_pixel(center.0, center.1);
        let rx = radius_x.abs().max(0.5);
        let ry = radius_y.abs().max(0.5);
        let Some([min_x, max_x, min_y, max_y]) = self.pixel_bounds(cx, cy, rx, ry) else {
            return;
        };
        let inner_rx = (rx - outline_width).max(0.0);
        let inner_ry = (ry - outline_width).max(0.0);

        for py in min_y..=max_y {
            let dy = py as f64 + 0.5 - cy;
            for px in min_x..=max_x {
                let dx = px as f64 + 0.5 - cx;
                if (dx / rx).powi(2) + (dy / ry).powi(2) > 1.0 {
                    continue;
                }
                let inside_outline = inner_rx > 0.0
                    && inner_ry > 0.0
                    && (dx / inner_rx).powi(2) + (dy / inner_ry).powi(2) <= 1.0;
                let color = if inside_outline { fill } else { outline };
                self.framebuffer[py * self.width + px] = color.to_array();
            }
        }
    }

    pub fn fill_rect(
        &mut self,
        center: (f64, f64),
        half_w: f64,
        half_h: f64,
        fill: Rgb,
        outline: Rgb,
        outline_width: f64,
    ) {
        let (cx, cy) = self.to_pixel(center.0, center.1);
        let half_w = half_w.abs().max(0.5);
        let half_h = half_h.abs().max(0.5);
        let Some([min_x, max_x, min_y, max_y]) = self.pixel_bounds(cx, cy, half_w, half_h) else {
            return;
        };

        for py in min_y..=max_y {
            let dy = (py as f64 + 0.5 - cy).abs();
            if dy > half_h {
                continue;
            }
            for px in min_x..=max_x {
                let dx = (px as f64 + 0.5 - cx).abs();
                if dx > half_w {
                    continue;
                }
                let on_edge = dx > half_w - outline_width || dy > half_h - outline_width;
                let color = if on_edge { outline } else { fill };
                self.framebuffer[py * self.width + px] = color.to_array();
            }
        }
    }

    /// One-pixel line between two world coordinates.
    pub fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb) {
        let (x0, y0) = self.to_pixel(from.0, from.1);
        let (x1, y1) = self.to_pixel(to.0, to.1);
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let px = (x0 + (x1 - x0) * t).floor() as isize;
            let py = (y0 + (y1 - y0) * t).floor() as isize;
            self.put(px, py, color.to_array());
        }
    }
}

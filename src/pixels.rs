use crate::error::PixelizeError;

/// `[row, column, channel]`, row-major, channels in decoder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelArray {
    rows: usize,
    columns: usize,
    channels: usize,
    data: Vec<u8>,
}

impl PixelArray {
    pub fn new(
        rows: usize,
        columns: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, PixelizeError> {
        let expected = rows
            .checked_mul(columns)
            .and_then(|n| n.checked_mul(channels));
        if channels == 0 || expected != Some(data.len()) {
            return Err(PixelizeError::Shape {
                rows,
                columns,
                channels,
                len: data.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            channels,
            data,
        })
    }

    #[cfg(test)]
    pub fn filled(rows: usize, columns: usize, pixel: &[u8]) -> Self {
        let data = pixel
            .iter()
            .copied()
            .cycle()
            .take(rows * columns * pixel.len())
            .collect();
        Self {
            rows,
            columns,
            channels: pixel.len(),
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    pub fn pixel(&self, row: usize, column: usize) -> &[u8] {
        assert!(
            row < self.rows && column < self.columns,
            "pixel ({row}, {column}) outside {}x{}",
            self.rows,
            self.columns
        );
        let start = (row * self.columns + column) * self.channels;
        &self.data[start..start + self.channels]
    }

    #[cfg(test)]
    pub fn pixel_mut(&mut self, row: usize, column: usize) -> &mut [u8] {
        assert!(
            row < self.rows && column < self.columns,
            "pixel ({row}, {column}) outside {}x{}",
            self.rows,
            self.columns
        );
        let start = (row * self.columns + column) * self.channels;
        &mut self.data[start..start + self.channels]
    }

    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for column in 0..self.columns {
            for row in 0..self.rows {
                data.extend_from_slice(self.pixel(row, column));
            }
        }
        Self {
            rows: self.columns,
            columns: self.rows,
            channels: self.channels,
            data,
        }
    }

    pub fn flip_columns(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for row in 0..self.rows {
            for column in (0..self.columns).rev() {
                data.extend_from_slice(self.pixel(row, column));
            }
        }
        Self {
            rows: self.rows,
            columns: self.columns,
            channels: self.channels,
            data,
        }
    }

    // transpose, then mirror the new column axis
    pub fn orient_for_display(&self) -> Self {
        self.transpose().flip_columns()
    }
}

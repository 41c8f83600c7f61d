use std::path::PathBuf;

pub type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug)]
pub enum PixelizeError {
    Decode {
        path: PathBuf,
        reason: String,
    },
    Shape {
        rows: usize,
        columns: usize,
        channels: usize,
        len: usize,
    },
    TooFewChannels(usize),
    ZeroStride,
    BadColorMode(u16),
    BadWindowSize {
        width: f64,
        height: f64,
    },
    BadColor {
        rgb: [u8; 3],
        max: u16,
    },
    Screenshot {
        path: PathBuf,
        reason: String,
    },
}

impl std::fmt::Display for PixelizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode { path, reason } => {
                write!(f, "unable to decode '{}': {reason}", path.display())
            }
            Self::Shape {
                rows,
                columns,
                channels,
                len,
            } => write!(
                f,
                "pixel data of length {len} does not fit shape {rows}x{columns}x{channels}"
            ),
            Self::TooFewChannels(channels) => {
                write!(f, "expected at least 3 color channels, image has {channels}")
            }
            Self::ZeroStride => f.write_str("sampling stride must be at least 1"),
            Self::BadColorMode(mode) => {
                write!(f, "colormode must be 1 or 255, got {mode}")
            }
            Self::BadWindowSize { width, height } => {
                write!(f, "window size must be positive, got {width}x{height}")
            }
            Self::BadColor { rgb, max } => write!(
                f,
                "bad color ({}, {}, {}) for colormode {max}",
                rgb[0], rgb[1], rgb[2]
            ),
            Self::Screenshot { path, reason } => {
                write!(f, "failed to write screenshot '{}': {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for PixelizeError {}

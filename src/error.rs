use thiserror::Error;

/// Rejected layout configuration. Raised before any layout work starts.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("iters must be at least 1")]
    InvalidIterations,
    #[error("max_d ({max_d}) must not be smaller than min_d ({min_d})")]
    InvertedDistanceRange { min_d: f64, max_d: f64 },
    #[error("{field} must not be negative, got {value}")]
    NegativeSize { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} = {value} is out of range, expected {expected}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("failed to parse layout config: {0}")]
    Parse(String),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read survey input: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse survey input: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to parse SVG: {0}")]
    Svg(String),
    #[error("failed to create a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },
    #[error("failed to encode PNG: {0}")]
    Png(String),
    #[error("failed to convert SVG to PDF: {0}")]
    Pdf(String),
    #[error("invalid PNG scale {0}")]
    Scale(f32),
}

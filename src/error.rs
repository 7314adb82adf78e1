use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapViewError {
    #[error("invalid window size {width}x{height}")]
    InvalidWindowSize { width: f32, height: f32 },

    #[error("invalid view width: {0}")]
    InvalidViewWidth(f32),

    #[error("invalid scale factor: {0}")]
    InvalidScaleFactor(f32),

    #[error("invalid reference tile size: {0}")]
    InvalidTileSize(f32),

    #[error("config error")]
    Config(#[from] serde_json::Error),
}

pub(crate) fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

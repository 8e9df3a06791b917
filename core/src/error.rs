use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TabletopError {
    #[error("canvas must have a positive size, got {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },
    #[error("grid cell size must be at least 1, got {0}")]
    InvalidCellSize(f32),
    #[error("snap grid must be positive, got {0}")]
    InvalidSnapGrid(f32),
    #[error("duplicate element id '{0}'")]
    DuplicateElementId(String),
    #[error("duplicate player id '{0}'")]
    DuplicatePlayerId(String),
}

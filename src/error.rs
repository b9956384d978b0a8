// src/error.rs
use thiserror::Error;

/// Ошибки генерации, загрузки и сохранения карты
#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid map dimensions {width}x{height}: must be positive multiples of {chunk_x}x{chunk_z}")]
    InvalidDimensions {
        width: i32,
        height: i32,
        chunk_x: i32,
        chunk_z: i32,
    },

    #[error("unsupported map format version {0}")]
    UnsupportedFormat(i32),

    #[error("region count {0} is out of range 1..=4")]
    InvalidRegionCount(u32),

    #[error("map {width}x{height} leaves no room for {region_count} region(s) with the configured borders")]
    MapTooSmallForRegions {
        width: i32,
        height: i32,
        region_count: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

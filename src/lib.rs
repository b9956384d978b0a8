pub mod biome;
pub mod cell;
pub mod climate;
pub mod config;
pub mod erosion;
pub mod error;
pub mod generator;
pub mod grid;
pub mod hex;
pub mod preview;
pub mod regions;
pub mod rivers;
pub mod sculpt;
pub mod search;

pub use biome::TerrainType;
pub use cell::{HexCell, HexEdgeType};
pub use config::{ClimateSettings, MapGenerationParams, TemperatureSettings, TerrainSettings};
pub use error::MapError;
pub use generator::{generate, summarize};
pub use grid::HexGrid;
pub use hex::{HexCoordinates, HexDirection};
pub use search::MovePath;

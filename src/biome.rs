// src/biome.rs
//! Классификация биомов
//!
//! Температура ячейки интерполируется по широте, гасится высотой и слегка
//! размывается когерентным шумом. Пары (температурный пояс, пояс влажности)
//! индексируют статическую таблицу 4×4 из типа поверхности и плотности
//! растительности. Подводные ячейки обрабатываются отдельным правилом по
//! рельефу берега.

use crate::config::{Hemisphere, MapGenerationParams, UNDERWATER_REEF_LIMIT};
use crate::grid::HexGrid;
use crate::hex::HexDirection;
use fastnoise_lite::{FastNoiseLite, NoiseType};
use serde::{Deserialize, Serialize};

/// Тип поверхности ячейки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TerrainType {
    Sand = 0,
    Grass = 1,
    Mud = 2,
    Stone = 3,
    Snow = 4,
}

impl TerrainType {
    #[must_use]
    pub fn index(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(TerrainType::Sand),
            1 => Some(TerrainType::Grass),
            2 => Some(TerrainType::Mud),
            3 => Some(TerrainType::Stone),
            4 => Some(TerrainType::Snow),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            TerrainType::Sand => [210, 190, 140],
            TerrainType::Grass => [90, 160, 70],
            TerrainType::Mud => [120, 90, 60],
            TerrainType::Stone => [140, 140, 140],
            TerrainType::Snow => [235, 240, 245],
        }
    }
}

/// Неизменяемая пара из таблицы биомов
#[derive(Debug, Clone, Copy)]
pub struct Biome {
    pub terrain: TerrainType,
    pub plant: u8,
}

const fn biome(terrain: TerrainType, plant: u8) -> Biome {
    Biome { terrain, plant }
}

/// Верхние границы температурных поясов (от холодного к тёплому)
pub const TEMPERATURE_BANDS: [f32; 3] = [0.1, 0.3, 0.6];

/// Верхние границы поясов влажности (от сухого к влажному)
pub const MOISTURE_BANDS: [f32; 3] = [0.12, 0.28, 0.85];

/// Таблица биомов: строка — температурный пояс, столбец — пояс влажности
const BIOMES: [Biome; 16] = [
    // ледяной пояс
    biome(TerrainType::Sand, 0),
    biome(TerrainType::Snow, 0),
    biome(TerrainType::Snow, 0),
    biome(TerrainType::Snow, 0),
    // холодный пояс
    biome(TerrainType::Sand, 0),
    biome(TerrainType::Mud, 0),
    biome(TerrainType::Mud, 1),
    biome(TerrainType::Mud, 2),
    // умеренный пояс
    biome(TerrainType::Sand, 0),
    biome(TerrainType::Grass, 0),
    biome(TerrainType::Grass, 1),
    biome(TerrainType::Grass, 2),
    // жаркий пояс
    biome(TerrainType::Sand, 1),
    biome(TerrainType::Grass, 1),
    biome(TerrainType::Grass, 2),
    biome(TerrainType::Grass, 3),
];

/// Назначает тип поверхности и растительность каждой ячейке
pub fn assign_biomes(grid: &mut HexGrid, moisture: &[f32], seed: u64, params: &MapGenerationParams) {
    let mut noise = FastNoiseLite::new();
    noise.set_seed(Some(seed.wrapping_add(1000) as i32));
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(0.1));

    let elevation_maximum = params.terrain.elevation_maximum;
    let water_level = params.terrain.water_level;
    // выше этой отметки пустыня сменяется голым камнем
    let rock_desert_elevation = elevation_maximum - (elevation_maximum - water_level) / 2;

    for index in 0..grid.cell_count() {
        let cell = &grid.cells()[index];
        let temperature = determine_temperature(grid, index, &noise, params);

        let (terrain, plant) = if cell.is_underwater() {
            (underwater_terrain(grid, index, temperature, water_level), 0)
        } else {
            let t = band_index(temperature, &TEMPERATURE_BANDS);
            let m = band_index(moisture[index], &MOISTURE_BANDS);
            let mut cell_biome = BIOMES[t * 4 + m];

            if cell_biome.terrain == TerrainType::Sand {
                if cell.elevation >= rock_desert_elevation {
                    cell_biome.terrain = TerrainType::Stone;
                }
            } else if cell.elevation == elevation_maximum {
                cell_biome.terrain = TerrainType::Snow;
            }

            if cell_biome.terrain == TerrainType::Snow {
                cell_biome.plant = 0;
            } else if cell_biome.plant < 3 && cell.has_river() {
                cell_biome.plant += 1;
            }
            (cell_biome.terrain, cell_biome.plant)
        };

        let cell = &mut grid.cells[index];
        cell.terrain_type = terrain;
        cell.plant_level = plant;
    }
}

fn band_index(value: f32, bands: &[f32; 3]) -> usize {
    bands.iter().position(|&b| value < b).unwrap_or(bands.len())
}

/// Температура ячейки: широта, высота и шум
fn determine_temperature(
    grid: &HexGrid,
    index: usize,
    noise: &FastNoiseLite,
    params: &MapGenerationParams,
) -> f32 {
    let cell = &grid.cells()[index];
    let settings = &params.temperature;

    let mut latitude = cell.coordinates.z as f32 / grid.cell_count_z as f32;
    match settings.hemisphere {
        Hemisphere::Both => {
            latitude *= 2.0;
            if latitude > 1.0 {
                latitude = 2.0 - latitude;
            }
        }
        Hemisphere::North => latitude = 1.0 - latitude,
        Hemisphere::South => {}
    }

    let mut temperature =
        settings.low_temperature + (settings.high_temperature - settings.low_temperature) * latitude;

    // высота над водой охлаждает
    temperature *= 1.0
        - (cell.view_elevation() - params.terrain.water_level) as f32
            / (params.terrain.elevation_maximum - params.terrain.water_level + 1) as f32;

    let (col, row) = cell.coordinates.to_offset();
    let jitter = noise.get_noise_2d(col as f32, row as f32);
    temperature + jitter * settings.temperature_jitter
}

/// Правило для подводных ячеек: пляж, риф, камень или ил
fn underwater_terrain(grid: &HexGrid, index: usize, temperature: f32, water_level: i32) -> TerrainType {
    let cell = &grid.cells()[index];
    let mut terrain = if cell.elevation == water_level - 1 {
        // мелководье: смотрим на рельеф берега
        let mut cliffs = 0;
        let mut slopes = 0;
        for d in HexDirection::ALL {
            if let Some(neighbor) = grid.neighbor(cell, d) {
                let delta = neighbor.elevation - cell.water_level;
                if delta == 0 {
                    slopes += 1;
                } else if delta > 0 {
                    cliffs += 1;
                }
            }
        }
        if cliffs + slopes > UNDERWATER_REEF_LIMIT {
            TerrainType::Grass
        } else if cliffs > 0 {
            TerrainType::Stone
        } else if slopes > 0 {
            TerrainType::Sand
        } else {
            TerrainType::Grass
        }
    } else if cell.elevation >= water_level {
        TerrainType::Grass
    } else if cell.elevation < 0 {
        TerrainType::Stone
    } else {
        TerrainType::Mud
    };

    // в самом холодном поясе мелководье замерзает
    if terrain == TerrainType::Grass && temperature < TEMPERATURE_BANDS[0] {
        terrain = TerrainType::Mud;
    }
    terrain
}

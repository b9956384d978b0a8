// src/generator.rs
//! Оркестровка генерации карты
//!
//! Фазы строго последовательны: каждая читает состояние, оставленное
//! предыдущей, поэтому ни одна не стартует раньше полного завершения
//! соседки. Между фазами — естественные точки для отмены со стороны хоста.
//! Один ChaCha8-генератор на все стохастические фазы даёт полную
//! воспроизводимость по сиду.

use crate::biome::assign_biomes;
use crate::climate::simulate_climate;
use crate::config::MapGenerationParams;
use crate::erosion::erode_land;
use crate::error::MapError;
use crate::grid::HexGrid;
use crate::regions::split_into_regions;
use crate::rivers::carve_rivers;
use crate::sculpt::sculpt_land;
use rand::SeedableRng;
use serde::Serialize;

/// Генерирует карту целиком: рельеф, климат, реки и биомы.
///
/// # Ошибки
/// Размеры проверяются до любых аллокаций; число регионов — до начала
/// формирования суши.
pub fn generate(
    cell_count_x: i32,
    cell_count_z: i32,
    seed: u64,
    params: &MapGenerationParams,
) -> Result<HexGrid, MapError> {
    let mut grid = HexGrid::new(cell_count_x, cell_count_z)?;
    grid.unit_elevation_ceiling = params.unit_elevation_ceiling;
    for cell in &mut grid.cells {
        cell.water_level = params.terrain.water_level;
    }

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);

    // === 1. Регионы ===
    let regions = split_into_regions(cell_count_x, cell_count_z, params, &mut rng)?;

    // === 2. Суша ===
    sculpt_land(&mut grid, &regions, params, &mut rng);

    // === 3. Эрозия ===
    erode_land(&mut grid, params, &mut rng);

    // === 4. Климат ===
    let moisture = simulate_climate(&grid, params);

    // === 5. Реки ===
    carve_rivers(&mut grid, &moisture, params, &mut rng);

    // === 6. Биомы ===
    assign_biomes(&mut grid, &moisture, seed, params);

    Ok(grid)
}

/// Сводка по готовой карте для логов и CLI
#[derive(Debug, Serialize)]
pub struct MapSummary {
    pub cell_count: usize,
    pub land_cells: usize,
    pub river_cells: usize,
    pub min_elevation: i32,
    pub max_elevation: i32,
}

#[must_use]
pub fn summarize(grid: &HexGrid) -> MapSummary {
    MapSummary {
        cell_count: grid.cell_count(),
        land_cells: grid.cells().iter().filter(|c| !c.is_underwater()).count(),
        river_cells: grid.cells().iter().filter(|c| c.has_river()).count(),
        min_elevation: grid.cells().iter().map(|c| c.elevation).min().unwrap_or(0),
        max_elevation: grid.cells().iter().map(|c| c.elevation).max().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_map() {
        let params = MapGenerationParams::default();
        let a = generate(40, 30, 123, &params).unwrap();
        let b = generate(40, 30, 123, &params).unwrap();
        for (ca, cb) in a.cells().iter().zip(b.cells()) {
            assert_eq!(ca.elevation, cb.elevation);
            assert_eq!(ca.water_level, cb.water_level);
            assert_eq!(ca.terrain_type, cb.terrain_type);
            assert_eq!(ca.river_out, cb.river_out);
        }
    }

    #[test]
    fn different_seeds_differ() {
        let params = MapGenerationParams::default();
        let a = generate(40, 30, 1, &params).unwrap();
        let b = generate(40, 30, 2, &params).unwrap();
        let differing = a
            .cells()
            .iter()
            .zip(b.cells())
            .filter(|(ca, cb)| ca.elevation != cb.elevation)
            .count();
        assert!(differing > 0, "разные сиды дали одинаковый рельеф");
    }

    #[test]
    fn small_map_with_default_borders_fails_cleanly() {
        // 10×10 проходит проверку размеров, но отступы по 5 съедают всю
        // играбельную область — это ошибка, а не паника в середине генерации
        let params = MapGenerationParams::default();
        assert!(matches!(
            generate(10, 10, 1, &params),
            Err(MapError::MapTooSmallForRegions { .. })
        ));
    }

    #[test]
    fn dimension_validation_happens_first() {
        let params = MapGenerationParams::default();
        assert!(matches!(
            generate(17, 30, 0, &params),
            Err(MapError::InvalidDimensions { .. })
        ));
    }
}

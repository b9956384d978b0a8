// src/climate.rs
//! Климатическая симуляция
//!
//! Для каждой ячейки ведётся пара (облака, влага). Вода испаряется в облака,
//! облака выпадают осадками (потолок облачности падает с высотой), остаток
//! разносится по соседям с перекосом в подветренную сторону. Влага стекает
//! к более низким соседям и просачивается к равным по высоте. Буфер двойной,
//! чтобы порядок обхода не влиял на результат.
//!
//! Состояние климата — временное: после генерации остаётся только итоговое
//! поле влажности для рек и биомов.

use crate::config::{CLIMATE_CYCLES, MapGenerationParams};
use crate::grid::HexGrid;
use crate::hex::HexDirection;

/// Облака и влага одной ячейки
#[derive(Debug, Clone, Copy, Default)]
pub struct ClimateData {
    pub clouds: f32,
    pub moisture: f32,
}

/// Прогоняет фиксированное число итераций диффузии и возвращает
/// установившееся поле влажности (по индексам ячеек).
#[must_use]
pub fn simulate_climate(grid: &HexGrid, params: &MapGenerationParams) -> Vec<f32> {
    let total = grid.cell_count();
    let mut climate = vec![
        ClimateData {
            clouds: 0.0,
            moisture: params.climate.starting_moisture,
        };
        total
    ];
    let mut next_climate = vec![ClimateData::default(); total];

    for _ in 0..CLIMATE_CYCLES {
        for index in 0..total {
            evolve_climate(grid, params, index, &mut climate, &mut next_climate);
        }
        std::mem::swap(&mut climate, &mut next_climate);
    }

    // вклад соседей мог добавиться после ограничения собственного —
    // финальное поле приводится к диапазону здесь
    climate.iter().map(|c| c.moisture.min(1.0)).collect()
}

fn evolve_climate(
    grid: &HexGrid,
    params: &MapGenerationParams,
    index: usize,
    climate: &mut [ClimateData],
    next_climate: &mut [ClimateData],
) {
    let settings = &params.climate;
    let cell = &grid.cells()[index];
    let mut cell_climate = climate[index];

    if cell.is_underwater() {
        // вода — неисчерпаемый источник влаги
        cell_climate.moisture = 1.0;
        cell_climate.clouds += settings.evaporation_factor;
    } else {
        let evaporation = cell_climate.moisture * settings.evaporation_factor;
        cell_climate.moisture -= evaporation;
        cell_climate.clouds += evaporation;
    }

    let precipitation = cell_climate.clouds * settings.precipitation_factor;
    cell_climate.clouds -= precipitation;
    cell_climate.moisture += precipitation;

    // чем выше ячейка, тем ниже потолок облачности: излишек выпадает сразу
    let cloud_maximum =
        1.0 - cell.view_elevation() as f32 / (params.terrain.elevation_maximum as f32 + 1.0);
    if cell_climate.clouds > cloud_maximum {
        cell_climate.moisture += cell_climate.clouds - cloud_maximum;
        cell_climate.clouds = cloud_maximum;
    }

    let main_dispersal_direction = settings.wind_direction.opposite();
    let cloud_dispersal = cell_climate.clouds * (1.0 / (5.0 + settings.wind_strength));
    let runoff = cell_climate.moisture * settings.runoff_factor * (1.0 / 6.0);
    let seepage = cell_climate.moisture * settings.seepage_factor * (1.0 / 6.0);

    for d in HexDirection::ALL {
        let Some(n) = cell.neighbor(d) else {
            continue;
        };
        let neighbor_index = n as usize;
        let neighbor = &grid.cells()[neighbor_index];
        let mut neighbor_climate = next_climate[neighbor_index];

        if d == main_dispersal_direction {
            neighbor_climate.clouds += cloud_dispersal * settings.wind_strength;
        } else {
            neighbor_climate.clouds += cloud_dispersal;
        }

        let elevation_delta = neighbor.view_elevation() - cell.view_elevation();
        if elevation_delta < 0 {
            cell_climate.moisture -= runoff;
            neighbor_climate.moisture += runoff;
        } else if elevation_delta == 0 {
            cell_climate.moisture -= seepage;
            neighbor_climate.moisture += seepage;
        }

        next_climate[neighbor_index] = neighbor_climate;
    }

    let mut next_cell_climate = next_climate[index];
    next_cell_climate.moisture += cell_climate.moisture;
    if next_cell_climate.moisture > 1.0 {
        next_cell_climate.moisture = 1.0;
    }
    next_climate[index] = next_cell_climate;
    climate[index] = ClimateData::default();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_grid(water_level: i32, elevation: i32) -> HexGrid {
        let mut grid = HexGrid::new(20, 15).unwrap();
        for cell in &mut grid.cells {
            cell.water_level = water_level;
            cell.elevation = elevation;
        }
        grid
    }

    #[test]
    fn moisture_stays_in_unit_range() {
        let mut grid = flat_grid(3, 3);
        // немного воды в углу
        for col in 0..5 {
            for row in 0..5 {
                grid.cell_at_offset_mut(col, row).unwrap().elevation = 0;
            }
        }
        let params = MapGenerationParams::default();
        let moisture = simulate_climate(&grid, &params);
        for &m in &moisture {
            assert!((0.0..=1.0).contains(&m), "влажность вне диапазона: {m}");
        }
    }

    #[test]
    fn water_cells_saturate() {
        let grid = flat_grid(3, 0);
        let params = MapGenerationParams::default();
        let moisture = simulate_climate(&grid, &params);
        for &m in &moisture {
            assert!((m - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn land_near_water_is_wetter_than_far_inland() {
        let mut grid = flat_grid(3, 3);
        // западная треть карты — океан
        for row in 0..15 {
            for col in 0..6 {
                grid.cell_at_offset_mut(col, row).unwrap().elevation = 0;
            }
        }
        let params = MapGenerationParams::default();
        let moisture = simulate_climate(&grid, &params);
        let coast = grid.cell_index_at_offset(7, 7).unwrap();
        let inland = grid.cell_index_at_offset(19, 7).unwrap();
        assert!(moisture[coast] > moisture[inland]);
    }

    #[test]
    fn simulation_is_deterministic() {
        let grid = flat_grid(3, 4);
        let params = MapGenerationParams::default();
        let a = simulate_climate(&grid, &params);
        let b = simulate_climate(&grid, &params);
        assert_eq!(a, b);
    }
}

// src/sculpt.rs
//! Формирование суши случайными блобами
//!
//! Пока не исчерпан бюджет ячеек суши, в случайном месте региона растёт
//! "блоб": волна приоритетного обхода от затравки, поднимающая (или, реже,
//! опускающая) высоту каждой накрытой ячейки. Приоритет обхода — расстояние
//! до центра блоба со случайным дрожанием, отсюда рваные органичные края.
//! Бюджет — цель, а не гарантия: при срабатывании предохранителя остаток
//! просто логируется.

use crate::config::{BLOB_JITTER_PROBABILITY, MapGenerationParams, SCULPT_GUARD_LIMIT};
use crate::grid::HexGrid;
use crate::hex::HexDirection;
use crate::regions::MapRegion;
use rand::Rng;

/// Поднимает сушу по регионам, пока не выйдет бюджет.
///
/// Возвращает неизрасходованный остаток бюджета (0 при полном успехе).
pub fn sculpt_land(
    grid: &mut HexGrid,
    regions: &[MapRegion],
    params: &MapGenerationParams,
    rng: &mut impl Rng,
) -> i32 {
    let mut budget =
        (grid.cell_count() as f32 * params.terrain.land_percentage as f32 * 0.01).round() as i32;

    let mut guard = 0;
    while budget > 0 && guard < SCULPT_GUARD_LIMIT {
        guard += 1;
        let sink = rng.gen_range(0.0..1.0) < params.terrain.sink_probability;
        for region in regions {
            let chunk_size =
                rng.gen_range(params.terrain.chunk_size_min..=params.terrain.chunk_size_max);
            if sink {
                budget = sink_terrain(grid, chunk_size, budget, region, params, rng);
            } else {
                budget = raise_terrain(grid, chunk_size, budget, region, params, rng);
                if budget == 0 {
                    return 0;
                }
            }
        }
    }
    if budget > 0 {
        log::warn!("бюджет суши не израсходован: осталось {budget} ячеек");
    }
    budget
}

fn raise_terrain(
    grid: &mut HexGrid,
    chunk_size: i32,
    mut budget: i32,
    region: &MapRegion,
    params: &MapGenerationParams,
    rng: &mut impl Rng,
) -> i32 {
    let water_level = params.terrain.water_level;
    let rise = if rng.gen_range(0.0..1.0) < params.terrain.high_rise_probability {
        2
    } else {
        1
    };

    let first = random_cell_index(grid, region, rng);
    let center = grid.cells[first].coordinates;
    let phase = start_blob(grid, first);

    let mut size = 0;
    while size < chunk_size {
        let Some((_, index)) = grid.search_frontier.pop() else {
            break;
        };
        let i = index as usize;
        let original = grid.cells[i].elevation;
        let new_elevation = original + rise;
        if new_elevation > params.terrain.elevation_maximum {
            continue;
        }
        grid.cells[i].elevation = new_elevation;
        if original < water_level && new_elevation >= water_level {
            budget -= 1;
            if budget == 0 {
                break;
            }
        }
        size += 1;
        grow_blob(grid, i, center, phase, rng);
    }
    grid.search_frontier.clear();
    budget
}

fn sink_terrain(
    grid: &mut HexGrid,
    chunk_size: i32,
    mut budget: i32,
    region: &MapRegion,
    params: &MapGenerationParams,
    rng: &mut impl Rng,
) -> i32 {
    let water_level = params.terrain.water_level;
    let sink = if rng.gen_range(0.0..1.0) < params.terrain.high_rise_probability {
        2
    } else {
        1
    };

    let first = random_cell_index(grid, region, rng);
    let center = grid.cells[first].coordinates;
    let phase = start_blob(grid, first);

    let mut size = 0;
    while size < chunk_size {
        let Some((_, index)) = grid.search_frontier.pop() else {
            break;
        };
        let i = index as usize;
        let original = grid.cells[i].elevation;
        let new_elevation = original - sink;
        if new_elevation < params.terrain.elevation_minimum {
            continue;
        }
        grid.cells[i].elevation = new_elevation;
        // ячейка суши ушла под воду — бюджет возвращается
        if original >= water_level && new_elevation < water_level {
            budget += 1;
        }
        size += 1;
        grow_blob(grid, i, center, phase, rng);
    }
    grid.search_frontier.clear();
    budget
}

/// Затравка нового блоба: свежая фаза поиска и очищенный фронтир
fn start_blob(grid: &mut HexGrid, first: usize) -> u32 {
    grid.search_frontier_phase += 1;
    let phase = grid.search_frontier_phase;
    grid.search_frontier.clear();
    let cell = &mut grid.cells[first];
    cell.search_phase = phase;
    cell.distance = 0;
    cell.search_heuristic = 0;
    grid.search_frontier.enqueue(0, first as u32);
    phase
}

/// Добавляет во фронтир ещё не накрытых соседей ячейки
fn grow_blob(
    grid: &mut HexGrid,
    index: usize,
    center: crate::hex::HexCoordinates,
    phase: u32,
    rng: &mut impl Rng,
) {
    for d in HexDirection::ALL {
        let Some(n) = grid.cells[index].neighbors[d.index()] else {
            continue;
        };
        let i = n as usize;
        if grid.cells[i].search_phase >= phase {
            continue;
        }
        let cell = &mut grid.cells[i];
        cell.search_phase = phase;
        cell.distance = cell.coordinates.distance_to(center);
        cell.search_heuristic = i32::from(rng.gen_range(0.0..1.0) < BLOB_JITTER_PROBABILITY);
        let priority = cell.search_priority();
        grid.search_frontier.enqueue(priority, n);
    }
}

fn random_cell_index(grid: &HexGrid, region: &MapRegion, rng: &mut impl Rng) -> usize {
    let x = rng.gen_range(region.x_min..region.x_max);
    let z = rng.gen_range(region.z_min..region.z_max);
    (z * grid.cell_count_x + x) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::split_into_regions;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn raised_land_stays_within_bounds() {
        let mut grid = HexGrid::new(40, 30).unwrap();
        let params = MapGenerationParams::default();
        for cell in &mut grid.cells {
            cell.water_level = params.terrain.water_level;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let regions = split_into_regions(40, 30, &params, &mut rng).unwrap();
        sculpt_land(&mut grid, &regions, &params, &mut rng);

        for cell in grid.cells() {
            assert!(cell.elevation >= params.terrain.elevation_minimum);
            assert!(cell.elevation <= params.terrain.elevation_maximum);
        }
    }

    #[test]
    fn land_count_approaches_budget() {
        let mut grid = HexGrid::new(40, 30).unwrap();
        let params = MapGenerationParams::default();
        for cell in &mut grid.cells {
            cell.water_level = params.terrain.water_level;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let regions = split_into_regions(40, 30, &params, &mut rng).unwrap();
        let leftover = sculpt_land(&mut grid, &regions, &params, &mut rng);

        let land = grid.cells().iter().filter(|c| !c.is_underwater()).count() as i32;
        let target =
            (grid.cell_count() as f32 * params.terrain.land_percentage as f32 * 0.01).round() as i32;
        assert_eq!(land, target - leftover);
    }
}

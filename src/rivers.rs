// src/rivers.rs
//! Прокладка рек
//!
//! Истоки выбираются из взвешенного пула: влажные высокие ячейки попадают в
//! него до трёх раз. Река растёт жадно вниз по склону, не пересекая себя и
//! чужие русла; впадение в существующее русло завершает реку. Если течь
//! больше некуда, на конце поднимается уровень воды — терминальное озеро.
//! Суммарный бюджет длины — процент от числа ячеек суши; недобор не
//! считается ошибкой.

use crate::config::{EXTRA_LAKE_PROBABILITY, MapGenerationParams};
use crate::grid::HexGrid;
use crate::hex::HexDirection;
use rand::Rng;

pub fn carve_rivers(
    grid: &mut HexGrid,
    moisture: &[f32],
    params: &MapGenerationParams,
    rng: &mut impl Rng,
) {
    let water_level = params.terrain.water_level;
    let elevation_maximum = params.terrain.elevation_maximum;

    let mut land_cells = 0;
    let mut river_origins: Vec<u32> = Vec::new();
    for (i, cell) in grid.cells().iter().enumerate() {
        if cell.is_underwater() {
            continue;
        }
        land_cells += 1;
        let weight = moisture[i] * (cell.elevation - water_level) as f32
            / (elevation_maximum - water_level) as f32;
        // пересечение каждого порога добавляет ещё одну копию в пул
        for threshold in [0.25, 0.5, 0.75] {
            if weight > threshold {
                river_origins.push(i as u32);
            }
        }
    }

    let mut river_budget = (land_cells as f32 * params.river_percentage as f32 * 0.01).round() as i32;

    while river_budget > 0 && !river_origins.is_empty() {
        let index = rng.gen_range(0..river_origins.len());
        let origin = river_origins.swap_remove(index) as usize;
        if is_valid_river_origin(grid, origin) {
            river_budget -= create_river(grid, origin, rng);
        }
    }

    if river_budget > 0 {
        log::warn!("бюджет рек не израсходован: осталось {river_budget} ячеек длины");
    }
}

/// Исток годится, если ни сама ячейка, ни соседи ещё не несут реку
/// и рядом нет воды
fn is_valid_river_origin(grid: &HexGrid, origin: usize) -> bool {
    if grid.cells()[origin].has_river() {
        return false;
    }
    for d in HexDirection::ALL {
        if let Some(neighbor) = grid.neighbor(&grid.cells()[origin], d) {
            if neighbor.has_river() || neighbor.is_underwater() {
                return false;
            }
        }
    }
    true
}

/// Растит одну реку от истока, возвращает её длину в ячейках
fn create_river(grid: &mut HexGrid, origin: usize, rng: &mut impl Rng) -> i32 {
    let mut length = 1;
    let mut cell = origin;
    let mut direction = HexDirection::NE;
    let mut flow_directions: Vec<HexDirection> = Vec::new();

    while !grid.cells[cell].is_underwater() {
        let mut min_neighbor_elevation = i32::MAX;
        flow_directions.clear();

        for d in HexDirection::ALL {
            let Some(n) = grid.cells[cell].neighbors[d.index()] else {
                continue;
            };
            let neighbor = &grid.cells[n as usize];
            if neighbor.elevation < min_neighbor_elevation {
                min_neighbor_elevation = neighbor.elevation;
            }
            // не возвращаемся в исток и не врезаемся в чужой приток
            if n as usize == origin || neighbor.has_incoming_river() {
                continue;
            }
            let delta = neighbor.elevation - grid.cells[cell].elevation;
            if delta > 0 {
                continue;
            }
            // слияние с чужим руслом завершает нашу реку
            if neighbor.has_outgoing_river() {
                grid.set_outgoing_river(cell, d);
                return length;
            }
            if delta < 0 {
                // строго вниз — втрое привлекательнее
                flow_directions.push(d);
                flow_directions.push(d);
                flow_directions.push(d);
            }
            // избегаем крутых разворотов русла
            if length == 1 || (d != direction.next2() && d != direction.previous2()) {
                flow_directions.push(d);
            }
        }

        if flow_directions.is_empty() {
            if length == 1 {
                // реке из одной ячейки некуда течь — отменяем
                return 0;
            }
            if min_neighbor_elevation >= grid.cells[cell].elevation {
                // терминальное озеро на уровне самого низкого соседа
                grid.cells[cell].water_level = min_neighbor_elevation;
                if min_neighbor_elevation == grid.cells[cell].elevation {
                    grid.cells[cell].elevation = min_neighbor_elevation - 1;
                }
            }
            break;
        }

        direction = flow_directions[rng.gen_range(0..flow_directions.len())];
        grid.set_outgoing_river(cell, direction);
        length += 1;

        // иногда река разливается озером прямо по пути
        if min_neighbor_elevation >= grid.cells[cell].elevation
            && rng.gen_range(0.0..1.0) < EXTRA_LAKE_PROBABILITY
        {
            grid.cells[cell].water_level = grid.cells[cell].elevation;
            grid.cells[cell].elevation -= 1;
        }

        cell = grid.cells[cell].neighbors[direction.index()].expect("flow direction has neighbor")
            as usize;
    }

    length
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Склон: высоты убывают с запада на восток, река обязана течь вниз
    #[test]
    fn rivers_flow_downhill_or_end_in_lakes() {
        let mut grid = HexGrid::new(20, 15).unwrap();
        let params = MapGenerationParams::default();
        for cell in &mut grid.cells {
            cell.water_level = params.terrain.water_level;
            let (col, _) = cell.coordinates.to_offset();
            cell.elevation = 8 - col / 3;
        }
        let moisture = vec![1.0; grid.cell_count()];
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        carve_rivers(&mut grid, &moisture, &params, &mut rng);

        let mut river_cells = 0;
        for cell in grid.cells() {
            if let Some(d) = cell.outgoing_river() {
                river_cells += 1;
                let neighbor = grid.neighbor(cell, d).expect("река ведёт к соседу");
                assert!(
                    neighbor.elevation <= cell.elevation
                        || cell.water_level == neighbor.elevation,
                    "река течёт вверх: {} -> {}",
                    cell.elevation,
                    neighbor.elevation
                );
            }
        }
        assert!(river_cells > 0, "на влажном склоне не выросло ни одной реки");
    }

    #[test]
    fn no_rivers_on_all_water_map() {
        let mut grid = HexGrid::new(10, 10).unwrap();
        let params = MapGenerationParams::default();
        for cell in &mut grid.cells {
            cell.water_level = 3;
            cell.elevation = 0;
        }
        let moisture = vec![1.0; grid.cell_count()];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        carve_rivers(&mut grid, &moisture, &params, &mut rng);
        assert!(grid.cells().iter().all(|c| !c.has_river()));
    }

    #[test]
    fn river_cells_have_at_most_one_inlet_and_outlet() {
        let mut grid = HexGrid::new(20, 15).unwrap();
        let params = MapGenerationParams::default();
        for cell in &mut grid.cells {
            cell.water_level = params.terrain.water_level;
            let (col, row) = cell.coordinates.to_offset();
            cell.elevation = 4 + ((col * 7 + row * 3) % 5) - (col / 4);
        }
        let moisture = vec![0.9; grid.cell_count()];
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        carve_rivers(&mut grid, &moisture, &params, &mut rng);

        // согласованность: мой исток — это приток соседа, и наоборот
        for cell in grid.cells() {
            if let Some(d) = cell.outgoing_river() {
                let neighbor = grid.neighbor(cell, d).unwrap();
                assert_eq!(neighbor.incoming_river(), Some(d.opposite()));
            }
            if let Some(d) = cell.incoming_river() {
                let neighbor = grid.neighbor(cell, d).unwrap();
                assert_eq!(neighbor.outgoing_river(), Some(d.opposite()));
            }
        }
    }
}

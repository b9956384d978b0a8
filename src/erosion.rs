// src/erosion.rs
//! Эрозия рельефа
//!
//! Ячейка "эродируема", если хотя бы один сосед ниже её минимум на два
//! уровня. Эрозия переносит один уровень высоты с такой ячейки на случайного
//! нижнего соседа — материал перемещается, а не исчезает. Правило остановки
//! адаптивное: работаем, пока множество эродируемых ячеек не сожмётся до
//! `(100 − erosion_percentage)%` от исходного размера.

use crate::config::MapGenerationParams;
use crate::grid::HexGrid;
use crate::hex::HexDirection;
use rand::Rng;

pub fn erode_land(grid: &mut HexGrid, params: &MapGenerationParams, rng: &mut impl Rng) {
    let mut erodible: Vec<u32> = (0..grid.cell_count() as u32)
        .filter(|&i| is_erodible(grid, i as usize))
        .collect();

    let target_count =
        (erodible.len() as f32 * (100 - params.terrain.erosion_percentage) as f32 * 0.01) as usize;

    while erodible.len() > target_count {
        let list_index = rng.gen_range(0..erodible.len());
        let cell = erodible[list_index] as usize;
        let Some(target) = erosion_target(grid, cell, rng) else {
            // ячейка перестала быть эродируемой из-за соседних переносов
            erodible.swap_remove(list_index);
            continue;
        };

        grid.cells[cell].elevation -= 1;
        grid.cells[target].elevation += 1;

        if !is_erodible(grid, cell) {
            erodible.swap_remove(list_index);
        }

        // соседи, оказавшиеся ровно на два уровня выше, стали эродируемыми
        let cell_elevation = grid.cells[cell].elevation;
        for d in HexDirection::ALL {
            if let Some(n) = grid.cells[cell].neighbors[d.index()] {
                if grid.cells[n as usize].elevation == cell_elevation + 2 && !erodible.contains(&n)
                {
                    erodible.push(n);
                }
            }
        }

        let target_u32 = target as u32;
        if is_erodible(grid, target) && !erodible.contains(&target_u32) {
            erodible.push(target_u32);
        }

        // соседи подросшей ячейки могли потерять эродируемость
        let target_elevation = grid.cells[target].elevation;
        for d in HexDirection::ALL {
            if let Some(n) = grid.cells[target].neighbors[d.index()] {
                let i = n as usize;
                if i != cell
                    && grid.cells[i].elevation == target_elevation + 1
                    && !is_erodible(grid, i)
                {
                    if let Some(pos) = erodible.iter().position(|&e| e == n) {
                        erodible.swap_remove(pos);
                    }
                }
            }
        }
    }
}

/// Есть ли у ячейки сосед минимум на два уровня ниже
pub fn is_erodible(grid: &HexGrid, index: usize) -> bool {
    let erodible_elevation = grid.cells[index].elevation - 2;
    HexDirection::ALL.iter().any(|d| {
        grid.cells[index].neighbors[d.index()]
            .is_some_and(|n| grid.cells[n as usize].elevation <= erodible_elevation)
    })
}

/// Случайный сосед, принимающий материал
fn erosion_target(grid: &HexGrid, index: usize, rng: &mut impl Rng) -> Option<usize> {
    let erodible_elevation = grid.cells[index].elevation - 2;
    let candidates: Vec<usize> = HexDirection::ALL
        .iter()
        .filter_map(|d| grid.cells[index].neighbors[d.index()])
        .map(|n| n as usize)
        .filter(|&n| grid.cells[n].elevation <= erodible_elevation)
        .collect();
    if candidates.is_empty() {
        None
    } else {
        Some(candidates[rng.gen_range(0..candidates.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Одинокий пик посреди равнины обязан быть сглажен
    #[test]
    fn lone_peak_is_eroded() {
        let mut grid = HexGrid::new(10, 10).unwrap();
        let peak = grid.cell_index_at_offset(5, 5).unwrap();
        grid.cells[peak].elevation = 5;
        assert!(is_erodible(&grid, peak));

        let params = MapGenerationParams {
            terrain: crate::config::TerrainSettings {
                erosion_percentage: 100,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        erode_land(&mut grid, &params, &mut rng);

        let erodible_left = (0..grid.cell_count()).filter(|&i| is_erodible(&grid, i)).count();
        assert_eq!(erodible_left, 0);
    }

    #[test]
    fn erosion_preserves_total_elevation() {
        let mut grid = HexGrid::new(10, 10).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for cell in &mut grid.cells {
            cell.elevation = rng.gen_range(0..8);
        }
        let before: i32 = grid.cells().iter().map(|c| c.elevation).sum();

        let params = MapGenerationParams::default();
        erode_land(&mut grid, &params, &mut rng);

        let after: i32 = grid.cells().iter().map(|c| c.elevation).sum();
        assert_eq!(before, after);
    }

    #[test]
    fn stopping_rule_honors_percentage() {
        let mut grid = HexGrid::new(20, 15).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for cell in &mut grid.cells {
            cell.elevation = rng.gen_range(-2..8);
        }
        let before = (0..grid.cell_count()).filter(|&i| is_erodible(&grid, i)).count();

        let params = MapGenerationParams::default(); // erosion_percentage = 50
        erode_land(&mut grid, &params, &mut rng);

        let after = (0..grid.cell_count()).filter(|&i| is_erodible(&grid, i)).count();
        assert!(after <= before / 2, "эрозия не достигла целевого порога: {after} > {before}/2");
    }
}

// src/regions.rs
//! Разбиение карты на регионы
//!
//! Каждый регион — прямоугольник, внутри которого суша поднимается
//! независимо от остальных. Между регионами остаётся полоса океана,
//! чтобы стартовые области игроков были сопоставимы по размеру.

use crate::config::MapGenerationParams;
use crate::error::MapError;
use rand::Rng;
use serde::Serialize;

/// Прямоугольник региона в смещённых координатах.
/// `x_max`/`z_max` — исключающие границы.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MapRegion {
    pub x_min: i32,
    pub x_max: i32,
    pub z_min: i32,
    pub z_max: i32,
}

/// Делит играбельную область на 1–4 региона.
///
/// Для двух регионов ось деления выбирается случайно; три региона —
/// вертикальные полосы, четыре — квадранты.
pub fn split_into_regions(
    cell_count_x: i32,
    cell_count_z: i32,
    params: &MapGenerationParams,
    rng: &mut impl Rng,
) -> Result<Vec<MapRegion>, MapError> {
    let border_x = params.map_border_x;
    let border_z = params.map_border_z;
    let region_border = params.region_border;

    let mut regions = Vec::with_capacity(params.region_count as usize);
    match params.region_count {
        1 => {
            regions.push(MapRegion {
                x_min: border_x,
                x_max: cell_count_x - border_x,
                z_min: border_z,
                z_max: cell_count_z - border_z,
            });
        }
        2 => {
            if rng.gen_bool(0.5) {
                // вертикальное деление: запад и восток
                regions.push(MapRegion {
                    x_min: border_x,
                    x_max: cell_count_x / 2 - region_border,
                    z_min: border_z,
                    z_max: cell_count_z - border_z,
                });
                regions.push(MapRegion {
                    x_min: cell_count_x / 2 + region_border,
                    x_max: cell_count_x - border_x,
                    z_min: border_z,
                    z_max: cell_count_z - border_z,
                });
            } else {
                // горизонтальное деление: юг и север
                regions.push(MapRegion {
                    x_min: border_x,
                    x_max: cell_count_x - border_x,
                    z_min: border_z,
                    z_max: cell_count_z / 2 - region_border,
                });
                regions.push(MapRegion {
                    x_min: border_x,
                    x_max: cell_count_x - border_x,
                    z_min: cell_count_z / 2 + region_border,
                    z_max: cell_count_z - border_z,
                });
            }
        }
        3 => {
            // три вертикальные полосы
            regions.push(MapRegion {
                x_min: border_x,
                x_max: cell_count_x / 3 - region_border,
                z_min: border_z,
                z_max: cell_count_z - border_z,
            });
            regions.push(MapRegion {
                x_min: cell_count_x / 3 + region_border,
                x_max: cell_count_x * 2 / 3 - region_border,
                z_min: border_z,
                z_max: cell_count_z - border_z,
            });
            regions.push(MapRegion {
                x_min: cell_count_x * 2 / 3 + region_border,
                x_max: cell_count_x - border_x,
                z_min: border_z,
                z_max: cell_count_z - border_z,
            });
        }
        4 => {
            // квадранты
            for (left, bottom) in [(true, true), (false, true), (true, false), (false, false)] {
                regions.push(MapRegion {
                    x_min: if left {
                        border_x
                    } else {
                        cell_count_x / 2 + region_border
                    },
                    x_max: if left {
                        cell_count_x / 2 - region_border
                    } else {
                        cell_count_x - border_x
                    },
                    z_min: if bottom {
                        border_z
                    } else {
                        cell_count_z / 2 + region_border
                    },
                    z_max: if bottom {
                        cell_count_z / 2 - region_border
                    } else {
                        cell_count_z - border_z
                    },
                });
            }
        }
        other => return Err(MapError::InvalidRegionCount(other)),
    }

    // отступы и межрегиональные полосы могли не оставить места под сушу
    for region in &regions {
        if region.x_min >= region.x_max || region.z_min >= region.z_max {
            return Err(MapError::MapTooSmallForRegions {
                width: cell_count_x,
                height: cell_count_z,
                region_count: params.region_count,
            });
        }
    }
    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params(region_count: u32) -> MapGenerationParams {
        MapGenerationParams {
            region_count,
            ..MapGenerationParams::default()
        }
    }

    #[test]
    fn regions_do_not_overlap() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for count in 1..=4 {
            let regions = split_into_regions(80, 60, &params(count), &mut rng).unwrap();
            assert_eq!(regions.len(), count as usize);
            for (i, a) in regions.iter().enumerate() {
                assert!(a.x_min < a.x_max && a.z_min < a.z_max);
                for b in &regions[i + 1..] {
                    let disjoint_x = a.x_max <= b.x_min || b.x_max <= a.x_min;
                    let disjoint_z = a.z_max <= b.z_min || b.z_max <= a.z_min;
                    assert!(disjoint_x || disjoint_z, "регионы пересекаются");
                }
            }
        }
    }

    #[test]
    fn invalid_region_count_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(matches!(
            split_into_regions(80, 60, &params(5), &mut rng),
            Err(MapError::InvalidRegionCount(5))
        ));
        assert!(matches!(
            split_into_regions(80, 60, &params(0), &mut rng),
            Err(MapError::InvalidRegionCount(0))
        ));
    }

    #[test]
    fn map_too_small_for_borders_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        // 10×10 с отступами по 5 не оставляет ни одной ячейки
        assert!(matches!(
            split_into_regions(10, 10, &params(1), &mut rng),
            Err(MapError::MapTooSmallForRegions { .. })
        ));
        // три полосы на карте шириной 15 дают вывернутый прямоугольник
        assert!(matches!(
            split_into_regions(15, 30, &params(3), &mut rng),
            Err(MapError::MapTooSmallForRegions { .. })
        ));
    }

    #[test]
    fn regions_respect_map_border() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let p = params(1);
        let regions = split_into_regions(40, 30, &p, &mut rng).unwrap();
        assert_eq!(regions[0].x_min, p.map_border_x);
        assert_eq!(regions[0].x_max, 40 - p.map_border_x);
    }
}

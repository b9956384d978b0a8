// src/cell.rs
//! Одна ячейка гексагональной сетки
//!
//! Ячейки живут в едином массиве внутри `HexGrid`; соседи хранятся как
//! индексы в этот массив, а не ссылки, поэтому циклов владения нет.
//! Поисковые поля (`distance`, `search_phase`, ...) — временный рабочий
//! буфер поиска пути, вне поиска их значения ничего не значат.

use crate::biome::TerrainType;
use crate::hex::{HexCoordinates, HexDirection};

/// Тип ребра между двумя соседними ячейками по перепаду высот
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexEdgeType {
    /// Одинаковая высота
    Flat,
    /// Перепад ровно в один уровень
    Slope,
    /// Перепад в два и более уровня — непроходимый обрыв
    Cliff,
}

impl HexEdgeType {
    #[must_use]
    pub fn between(elevation_a: i32, elevation_b: i32) -> Self {
        match (elevation_a - elevation_b).abs() {
            0 => HexEdgeType::Flat,
            1 => HexEdgeType::Slope,
            _ => HexEdgeType::Cliff,
        }
    }
}

/// Полное состояние одного узла сетки
#[derive(Debug, Clone)]
pub struct HexCell {
    pub coordinates: HexCoordinates,

    /// Индексы шести соседей в массиве сетки (выставляются один раз,
    /// симметрично, при создании сетки)
    pub(crate) neighbors: [Option<u32>; 6],

    /// Высота ячейки; границы задаёт конфигурация, сам тип не ограничен
    pub elevation: i32,

    /// Уровень воды: ячейка под водой, если `elevation < water_level`
    pub water_level: i32,

    /// Тип поверхности, назначается классификатором биомов
    pub terrain_type: TerrainType,

    /// Уровни растительности и построек 0..=3 (удорожают проход)
    pub forest_level: u8,
    pub farm_level: u8,
    pub plant_level: u8,

    /// Битовые маски рёбер с дорогами и стенами (бит = индекс направления)
    pub(crate) roads: u8,
    pub(crate) walls: u8,

    /// Направления входа и выхода реки, если река проходит через ячейку
    pub(crate) river_in: Option<HexDirection>,
    pub(crate) river_out: Option<HexDirection>,

    /// Ячейка занята юнитом (выставляется хостом игры)
    pub has_unit: bool,

    // --- Рабочие поля поиска пути ---
    pub(crate) distance: i32,
    pub(crate) search_heuristic: i32,
    pub(crate) search_phase: u32,
    pub(crate) path_from: u32,
}

impl HexCell {
    pub(crate) fn new(coordinates: HexCoordinates) -> Self {
        Self {
            coordinates,
            neighbors: [None; 6],
            elevation: 0,
            water_level: 0,
            terrain_type: TerrainType::Sand,
            forest_level: 0,
            farm_level: 0,
            plant_level: 0,
            roads: 0,
            walls: 0,
            river_in: None,
            river_out: None,
            has_unit: false,
            distance: 0,
            search_heuristic: 0,
            search_phase: 0,
            path_from: 0,
        }
    }

    /// Индекс соседа в заданном направлении
    #[must_use]
    pub fn neighbor(&self, direction: HexDirection) -> Option<u32> {
        self.neighbors[direction.index()]
    }

    #[must_use]
    pub fn is_underwater(&self) -> bool {
        self.elevation < self.water_level
    }

    /// Видимая высота: поверхность воды для подводных ячеек
    #[must_use]
    pub fn view_elevation(&self) -> i32 {
        self.elevation.max(self.water_level)
    }

    #[must_use]
    pub fn has_incoming_river(&self) -> bool {
        self.river_in.is_some()
    }

    #[must_use]
    pub fn has_outgoing_river(&self) -> bool {
        self.river_out.is_some()
    }

    #[must_use]
    pub fn has_river(&self) -> bool {
        self.river_in.is_some() || self.river_out.is_some()
    }

    #[must_use]
    pub fn outgoing_river(&self) -> Option<HexDirection> {
        self.river_out
    }

    #[must_use]
    pub fn incoming_river(&self) -> Option<HexDirection> {
        self.river_in
    }

    #[must_use]
    pub fn has_river_through_edge(&self, direction: HexDirection) -> bool {
        self.river_in == Some(direction) || self.river_out == Some(direction)
    }

    #[must_use]
    pub fn has_road_through_edge(&self, direction: HexDirection) -> bool {
        self.roads & (1 << direction.index()) != 0
    }

    #[must_use]
    pub fn has_wall_through_edge(&self, direction: HexDirection) -> bool {
        self.walls & (1 << direction.index()) != 0
    }

    /// Суммарная надбавка к стоимости шага за растительность и постройки
    #[must_use]
    pub fn feature_cost(&self) -> i32 {
        i32::from(self.forest_level) + i32::from(self.farm_level) + i32::from(self.plant_level)
    }

    pub(crate) fn search_priority(&self) -> i32 {
        self.distance + self.search_heuristic
    }
}

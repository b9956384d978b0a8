// src/config.rs
//! Конфигурация генерации карты
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией
//! гексагональной карты:
//! - Рельеф: доля суши, пределы высот, размеры "блобов" поднятия/опускания
//! - Климат: испарение, осадки, сток, ветер
//! - Температура: широтный градиент и шум
//! - Реки, регионы и границы карты
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки
//! через конфигурационные файлы.

use crate::hex::HexDirection;
use serde::{Deserialize, Serialize};
use std::fs;

/// Вероятность образования промежуточного озера при прокладке реки.
///
/// Подобранная константа из прототипа: менять осторожно, сильно влияет
/// на количество воды в низинах.
pub const EXTRA_LAKE_PROBABILITY: f32 = 0.25;

/// Порог "рифа" для мелководья: если у прибрежной ячейки больше этого числа
/// соседей-обрывов и склонов вместе, она считается рифом, а не пляжем.
pub const UNDERWATER_REEF_LIMIT: i32 = 3;

/// Вероятность добавить +1 к приоритету ячейки при росте блоба суши.
/// Придаёт блобам рваные, органичные края.
pub const BLOB_JITTER_PROBABILITY: f32 = 0.25;

/// Предохранитель от бесконечного цикла при выборке бюджета суши
pub const SCULPT_GUARD_LIMIT: u32 = 10_000;

/// Число итераций диффузии климата до установившегося состояния
pub const CLIMATE_CYCLES: u32 = 40;

/// Полушарие, к которому привязан широтный градиент температуры
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Hemisphere {
    /// Экватор посередине карты, холодные полюса сверху и снизу
    #[default]
    Both,
    /// Северное полушарие: юг карты тёплый, север холодный
    North,
    /// Южное полушарие: север карты тёплый, юг холодный
    South,
}

/// Настройки рельефа
///
/// Управляет долей суши, диапазоном высот и формой блобов поднятия/опускания.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerrainSettings {
    /// Целевая доля суши в процентах от всех ячеек (5..95)
    #[serde(default = "default_land_percentage")]
    pub land_percentage: i32,

    /// Уровень воды: ячейка под водой, если её высота строго меньше
    #[serde(default = "default_water_level")]
    pub water_level: i32,

    /// Минимальная высота ячейки (дно океанских впадин)
    #[serde(default = "default_elevation_minimum")]
    pub elevation_minimum: i32,

    /// Максимальная высота ячейки (снежные вершины)
    #[serde(default = "default_elevation_maximum")]
    pub elevation_maximum: i32,

    /// Минимальный размер блоба при поднятии/опускании суши (в ячейках)
    #[serde(default = "default_chunk_size_min")]
    pub chunk_size_min: i32,

    /// Максимальный размер блоба
    #[serde(default = "default_chunk_size_max")]
    pub chunk_size_max: i32,

    /// Вероятность поднять блоб сразу на 2 уровня вместо 1
    #[serde(default = "default_high_rise_probability")]
    pub high_rise_probability: f32,

    /// Вероятность опустить блоб вместо поднятия
    #[serde(default = "default_sink_probability")]
    pub sink_probability: f32,

    /// Процент "эродируемых" ячеек, которые нужно сгладить (0 = без эрозии)
    #[serde(default = "default_erosion_percentage")]
    pub erosion_percentage: i32,
}

fn default_land_percentage() -> i32 {
    50
}
fn default_water_level() -> i32 {
    3
}
fn default_elevation_minimum() -> i32 {
    -2
}
fn default_elevation_maximum() -> i32 {
    8
}
fn default_chunk_size_min() -> i32 {
    30
}
fn default_chunk_size_max() -> i32 {
    100
}
fn default_high_rise_probability() -> f32 {
    0.25
}
fn default_sink_probability() -> f32 {
    0.2
}
fn default_erosion_percentage() -> i32 {
    50
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            land_percentage: 50,
            water_level: 3,
            elevation_minimum: -2,
            elevation_maximum: 8,
            chunk_size_min: 30,
            chunk_size_max: 100,
            high_rise_probability: 0.25,
            sink_probability: 0.2,
            erosion_percentage: 50,
        }
    }
}

/// Настройки климатической симуляции
///
/// Вода испаряется в облака, облака разносятся ветром и выпадают осадками,
/// влага стекает вниз по склонам. Все коэффициенты — доли за одну итерацию.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateSettings {
    /// Начальная влажность каждой ячейки (0.0..1.0)
    #[serde(default = "default_starting_moisture")]
    pub starting_moisture: f32,

    /// Доля влаги, испаряющейся с суши за итерацию
    #[serde(default = "default_evaporation_factor")]
    pub evaporation_factor: f32,

    /// Доля облаков, выпадающих осадками за итерацию
    #[serde(default = "default_precipitation_factor")]
    pub precipitation_factor: f32,

    /// Доля влаги, стекающей к строго более низким соседям
    #[serde(default = "default_runoff_factor")]
    pub runoff_factor: f32,

    /// Доля влаги, просачивающейся к соседям той же высоты
    #[serde(default = "default_seepage_factor")]
    pub seepage_factor: f32,

    /// Направление, откуда дует преобладающий ветер
    #[serde(default = "default_wind_direction")]
    pub wind_direction: HexDirection,

    /// Сила ветра: 1.0 = штиль (равномерный разнос облаков), больше —
    /// сильнее перекос в подветренную сторону
    #[serde(default = "default_wind_strength")]
    pub wind_strength: f32,
}

fn default_starting_moisture() -> f32 {
    0.1
}
fn default_evaporation_factor() -> f32 {
    0.5
}
fn default_precipitation_factor() -> f32 {
    0.25
}
fn default_runoff_factor() -> f32 {
    0.25
}
fn default_seepage_factor() -> f32 {
    0.125
}
fn default_wind_direction() -> HexDirection {
    HexDirection::NW
}
fn default_wind_strength() -> f32 {
    4.0
}

impl Default for ClimateSettings {
    fn default() -> Self {
        Self {
            starting_moisture: 0.1,
            evaporation_factor: 0.5,
            precipitation_factor: 0.25,
            runoff_factor: 0.25,
            seepage_factor: 0.125,
            wind_direction: HexDirection::NW,
            wind_strength: 4.0,
        }
    }
}

/// Настройки температуры
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureSettings {
    /// Температура на холодном полюсе (0.0..1.0)
    #[serde(default = "default_low_temperature")]
    pub low_temperature: f32,

    /// Температура на тёплом экваторе (0.0..1.0)
    #[serde(default = "default_high_temperature")]
    pub high_temperature: f32,

    /// Амплитуда когерентного шума, размывающего границы
    /// температурных поясов
    #[serde(default = "default_temperature_jitter")]
    pub temperature_jitter: f32,

    /// Полушарие (по умолчанию экватор посередине карты)
    #[serde(default)]
    pub hemisphere: Hemisphere,
}

fn default_low_temperature() -> f32 {
    0.0
}
fn default_high_temperature() -> f32 {
    1.0
}
fn default_temperature_jitter() -> f32 {
    0.1
}

impl Default for TemperatureSettings {
    fn default() -> Self {
        Self {
            low_temperature: 0.0,
            high_temperature: 1.0,
            temperature_jitter: 0.1,
            hemisphere: Hemisphere::Both,
        }
    }
}

/// Основные параметры генерации карты
///
/// Полная конфигурация одной карты, кроме размеров и сида — они передаются
/// в `generate` явно. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapGenerationParams {
    /// Настройки рельефа
    #[serde(default)]
    pub terrain: TerrainSettings,

    /// Настройки климата
    #[serde(default)]
    pub climate: ClimateSettings,

    /// Настройки температуры
    #[serde(default)]
    pub temperature: TemperatureSettings,

    /// Число независимых регионов суши: 1..4
    #[serde(default = "default_region_count")]
    pub region_count: u32,

    /// Суммарная длина рек в процентах от числа ячеек суши
    #[serde(default = "default_river_percentage")]
    pub river_percentage: i32,

    /// Горизонтальный отступ от края карты, где суша не поднимается
    #[serde(default = "default_map_border_x")]
    pub map_border_x: i32,

    /// Вертикальный отступ от края карты
    #[serde(default = "default_map_border_z")]
    pub map_border_z: i32,

    /// Полоса океана между соседними регионами
    #[serde(default = "default_region_border")]
    pub region_border: i32,

    /// Максимальная высота ячейки, пригодной как цель движения юнита
    #[serde(default = "default_unit_elevation_ceiling")]
    pub unit_elevation_ceiling: i32,
}

fn default_region_count() -> u32 {
    1
}
fn default_river_percentage() -> i32 {
    10
}
fn default_map_border_x() -> i32 {
    5
}
fn default_map_border_z() -> i32 {
    5
}
fn default_region_border() -> i32 {
    4
}
fn default_unit_elevation_ceiling() -> i32 {
    4
}

impl Default for MapGenerationParams {
    fn default() -> Self {
        Self {
            terrain: TerrainSettings::default(),
            climate: ClimateSettings::default(),
            temperature: TemperatureSettings::default(),
            region_count: 1,
            river_percentage: 10,
            map_border_x: 5,
            map_border_z: 5,
            region_border: 4,
            unit_elevation_ceiling: 4,
        }
    }
}

impl MapGenerationParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # map.toml
    /// region_count = 2
    /// river_percentage = 15
    ///
    /// [terrain]
    /// land_percentage = 40
    /// ```
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::MapError> {
        let contents = fs::read_to_string(path)?;
        let params: Self = toml::from_str(&contents)?;
        Ok(params)
    }
}

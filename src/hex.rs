// src/hex.rs
//! Гексагональная система координат
//!
//! Ячейки хранятся в прямоугольном массиве по смещённым координатам
//! (колонка, ряд), а вся геометрия считается в кубических координатах
//! (x, y, z) с инвариантом x + y + z = 0. Кубические координаты дают
//! простую формулу расстояния и шесть фиксированных направлений.

use serde::{Deserialize, Serialize};

/// Шесть направлений от ячейки к соседям (плоская верхняя грань гекса)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HexDirection {
    NE = 0,
    E = 1,
    SE = 2,
    SW = 3,
    W = 4,
    NW = 5,
}

impl HexDirection {
    /// Все направления в порядке обхода по часовой стрелке
    pub const ALL: [HexDirection; 6] = [
        HexDirection::NE,
        HexDirection::E,
        HexDirection::SE,
        HexDirection::SW,
        HexDirection::W,
        HexDirection::NW,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    /// Противоположное направление (поворот на 3 шага)
    #[must_use]
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Следующее направление по часовой стрелке
    #[must_use]
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Предыдущее направление (против часовой стрелки)
    #[must_use]
    pub fn previous(self) -> Self {
        Self::from_index(self.index() + 5)
    }

    /// Поворот на два шага по часовой стрелке
    #[must_use]
    pub fn next2(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Поворот на два шага против часовой стрелки
    #[must_use]
    pub fn previous2(self) -> Self {
        Self::from_index(self.index() + 4)
    }
}

/// Кубические координаты ячейки
///
/// Компонента `y` не хранится: она всегда равна `-x - z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCoordinates {
    pub x: i32,
    pub z: i32,
}

impl HexCoordinates {
    #[must_use]
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Восстановленная компонента `y` (инвариант x + y + z = 0)
    #[must_use]
    pub fn y(self) -> i32 {
        -self.x - self.z
    }

    /// Переводит смещённые координаты (колонка, ряд) в кубические.
    ///
    /// Чётные ряды сдвинуты: каждая пара рядов смещает x на единицу.
    #[must_use]
    pub fn from_offset(col: i32, row: i32) -> Self {
        Self {
            x: col - row / 2,
            z: row,
        }
    }

    /// Обратный перевод в смещённые координаты (колонка, ряд)
    #[must_use]
    pub fn to_offset(self) -> (i32, i32) {
        (self.x + self.z / 2, self.z)
    }

    /// Гексагональное расстояние: максимум модулей разностей компонент
    #[must_use]
    pub fn distance_to(self, other: HexCoordinates) -> i32 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y() - other.y()).abs();
        let dz = (self.z - other.z).abs();
        dx.max(dy).max(dz)
    }
}

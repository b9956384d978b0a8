// src/grid.rs
//! Гексагональная сетка — владелец всех ячеек
//!
//! Ячейки лежат в одном плоском массиве размером width×height; связи между
//! соседями выставляются один раз при создании и всегда симметричны:
//! если `A.neighbor(d) == B`, то `B.neighbor(d.opposite()) == A`.
//!
//! Здесь же — минимальный версионированный формат сохранения: ведущий номер
//! формата, размеры, затем поля ячеек в фиксированном порядке.

use crate::cell::HexCell;
use crate::error::MapError;
use crate::hex::{HexCoordinates, HexDirection};
use crate::search::SearchFrontier;
use std::io::{self, Read, Write};

/// Размер блока карты; размеры карты обязаны быть кратны ему
pub const BLOCK_SIZE_X: i32 = 5;
pub const BLOCK_SIZE_Z: i32 = 5;

/// Номер текущего формата файла карты
pub const MAP_FORMAT_VERSION: i32 = 1;

/// Сетка ячеек и рабочее состояние одного поиска пути
pub struct HexGrid {
    /// Число ячеек по горизонтали (колонки)
    pub cell_count_x: i32,
    /// Число ячеек по вертикали (ряды)
    pub cell_count_z: i32,

    pub(crate) cells: Vec<HexCell>,

    /// Максимальная высота ячейки, куда может встать юнит
    pub unit_elevation_ceiling: i32,

    // Рабочее состояние поиска: одна очередь и монотонный счётчик фаз.
    // Счётчик позволяет не сбрасывать поисковые поля всех ячеек между
    // запросами: ячейка "не посещена", пока её фаза меньше текущей.
    pub(crate) search_frontier: SearchFrontier,
    pub(crate) search_frontier_phase: u32,
    pub(crate) current_path_exists: bool,
    pub(crate) current_path_from: u32,
    pub(crate) current_path_to: u32,
}

impl HexGrid {
    /// Создаёт сетку заданного размера со связанными соседями.
    ///
    /// # Ошибки
    /// Размеры должны быть положительными и кратными блоку
    /// `BLOCK_SIZE_X`×`BLOCK_SIZE_Z` — иначе ошибка до каких-либо аллокаций.
    pub fn new(cell_count_x: i32, cell_count_z: i32) -> Result<Self, MapError> {
        if cell_count_x <= 0
            || cell_count_z <= 0
            || cell_count_x % BLOCK_SIZE_X != 0
            || cell_count_z % BLOCK_SIZE_Z != 0
        {
            return Err(MapError::InvalidDimensions {
                width: cell_count_x,
                height: cell_count_z,
                chunk_x: BLOCK_SIZE_X,
                chunk_z: BLOCK_SIZE_Z,
            });
        }

        let total = (cell_count_x * cell_count_z) as usize;
        let mut cells = Vec::with_capacity(total);
        for z in 0..cell_count_z {
            for x in 0..cell_count_x {
                cells.push(HexCell::new(HexCoordinates::from_offset(x, z)));
            }
        }

        let mut grid = Self {
            cell_count_x,
            cell_count_z,
            cells,
            unit_elevation_ceiling: i32::MAX,
            search_frontier: SearchFrontier::new(),
            search_frontier_phase: 0,
            current_path_exists: false,
            current_path_from: 0,
            current_path_to: 0,
        };
        grid.link_all_neighbors();
        Ok(grid)
    }

    /// Симметрично связывает все ячейки с соседями.
    ///
    /// Ряды со смещением: у чётных рядов юго-восточный сосед лежит строго
    /// под ячейкой, у нечётных — юго-западный.
    fn link_all_neighbors(&mut self) {
        let width = self.cell_count_x;
        for z in 0..self.cell_count_z {
            for x in 0..width {
                let i = z * width + x;
                if x > 0 {
                    self.link(i, HexDirection::W, i - 1);
                }
                if z > 0 {
                    if z % 2 == 0 {
                        self.link(i, HexDirection::SE, i - width);
                        if x > 0 {
                            self.link(i, HexDirection::SW, i - width - 1);
                        }
                    } else {
                        self.link(i, HexDirection::SW, i - width);
                        if x < width - 1 {
                            self.link(i, HexDirection::SE, i - width + 1);
                        }
                    }
                }
            }
        }
    }

    fn link(&mut self, from: i32, direction: HexDirection, to: i32) {
        self.cells[from as usize].neighbors[direction.index()] = Some(to as u32);
        self.cells[to as usize].neighbors[direction.opposite().index()] = Some(from as u32);
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    /// Индекс ячейки по смещённым координатам, если они в границах карты
    #[must_use]
    pub fn cell_index_at_offset(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || col >= self.cell_count_x || row < 0 || row >= self.cell_count_z {
            return None;
        }
        Some((row * self.cell_count_x + col) as usize)
    }

    #[must_use]
    pub fn cell_at_offset(&self, col: i32, row: i32) -> Option<&HexCell> {
        self.cell_index_at_offset(col, row).map(|i| &self.cells[i])
    }

    #[must_use]
    pub fn cell_at_offset_mut(&mut self, col: i32, row: i32) -> Option<&mut HexCell> {
        self.cell_index_at_offset(col, row)
            .map(move |i| &mut self.cells[i])
    }

    /// Ячейка по кубическим координатам
    #[must_use]
    pub fn cell(&self, coordinates: HexCoordinates) -> Option<&HexCell> {
        let (col, row) = coordinates.to_offset();
        self.cell_at_offset(col, row)
    }

    #[must_use]
    pub fn cell_mut(&mut self, coordinates: HexCoordinates) -> Option<&mut HexCell> {
        let (col, row) = coordinates.to_offset();
        self.cell_at_offset_mut(col, row)
    }

    /// Сосед ячейки в заданном направлении
    #[must_use]
    pub fn neighbor(&self, cell: &HexCell, direction: HexDirection) -> Option<&HexCell> {
        cell.neighbor(direction).map(|i| &self.cells[i as usize])
    }

    /// Прокладывает дорогу через ребро (с обеих сторон)
    pub fn add_road(&mut self, index: usize, direction: HexDirection) {
        if let Some(n) = self.cells[index].neighbors[direction.index()] {
            self.cells[index].roads |= 1 << direction.index();
            self.cells[n as usize].roads |= 1 << direction.opposite().index();
        }
    }

    /// Ставит стену на ребро (с обеих сторон)
    pub fn add_wall(&mut self, index: usize, direction: HexDirection) {
        if let Some(n) = self.cells[index].neighbors[direction.index()] {
            self.cells[index].walls |= 1 << direction.index();
            self.cells[n as usize].walls |= 1 << direction.opposite().index();
        }
    }

    /// Река может течь в соседа не выше текущей ячейки; озеро на уровне
    /// соседа тоже годится как устье.
    pub(crate) fn is_valid_river_destination(&self, index: usize, direction: HexDirection) -> bool {
        let cell = &self.cells[index];
        match self.neighbor(cell, direction) {
            Some(neighbor) => {
                cell.elevation >= neighbor.elevation || cell.water_level == neighbor.elevation
            }
            None => false,
        }
    }

    pub(crate) fn remove_outgoing_river(&mut self, index: usize) {
        let Some(direction) = self.cells[index].river_out else {
            return;
        };
        self.cells[index].river_out = None;
        if let Some(n) = self.cells[index].neighbors[direction.index()] {
            self.cells[n as usize].river_in = None;
        }
    }

    pub(crate) fn remove_incoming_river(&mut self, index: usize) {
        let Some(direction) = self.cells[index].river_in else {
            return;
        };
        self.cells[index].river_in = None;
        if let Some(n) = self.cells[index].neighbors[direction.index()] {
            self.cells[n as usize].river_out = None;
        }
    }

    /// Направляет исток реки из ячейки в соседа.
    ///
    /// Старые рукава с обеих сторон снимаются, чтобы у ячейки было не больше
    /// одного входа и одного выхода.
    pub(crate) fn set_outgoing_river(&mut self, index: usize, direction: HexDirection) {
        if self.cells[index].river_out == Some(direction) {
            return;
        }
        if !self.is_valid_river_destination(index, direction) {
            return;
        }
        self.remove_outgoing_river(index);
        if self.cells[index].river_in == Some(direction) {
            self.remove_incoming_river(index);
        }
        let n = self.cells[index].neighbors[direction.index()]
            .expect("river destination checked above") as usize;
        self.remove_incoming_river(n);

        self.cells[index].river_out = Some(direction);
        self.cells[n].river_in = Some(direction.opposite());
    }

    // --- Сохранение и загрузка -------------------------------------------

    /// Записывает карту в минимальном версионированном формате.
    ///
    /// Порядок полей фиксирован: версия, ширина, высота, затем для каждой
    /// ячейки тип поверхности, высота, уровень воды, уровни построек,
    /// байт рек, байт дорог, байт стен.
    pub fn save(&self, writer: &mut impl Write) -> io::Result<()> {
        write_i32(writer, MAP_FORMAT_VERSION)?;
        write_i32(writer, self.cell_count_x)?;
        write_i32(writer, self.cell_count_z)?;
        for cell in &self.cells {
            writer.write_all(&[cell.terrain_type.index()])?;
            write_i16(writer, cell.elevation as i16)?;
            write_i16(writer, cell.water_level as i16)?;
            writer.write_all(&[
                cell.forest_level,
                cell.farm_level,
                cell.plant_level,
                pack_rivers(cell.river_in, cell.river_out),
                cell.roads,
                cell.walls,
            ])?;
        }
        Ok(())
    }

    /// Читает карту, записанную `save`.
    ///
    /// # Ошибки
    /// Неизвестный номер формата отклоняется сразу, без частичного чтения.
    pub fn load(reader: &mut impl Read) -> Result<Self, MapError> {
        let version = read_i32(reader)?;
        if version != MAP_FORMAT_VERSION {
            return Err(MapError::UnsupportedFormat(version));
        }
        let cell_count_x = read_i32(reader)?;
        let cell_count_z = read_i32(reader)?;
        let mut grid = Self::new(cell_count_x, cell_count_z)?;

        for i in 0..grid.cells.len() {
            let mut head = [0u8; 1];
            reader.read_exact(&mut head)?;
            let terrain = crate::biome::TerrainType::from_index(head[0]).ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, "unknown terrain type")
            })?;
            let elevation = i32::from(read_i16(reader)?);
            let water_level = i32::from(read_i16(reader)?);
            let mut rest = [0u8; 6];
            reader.read_exact(&mut rest)?;
            let (river_in, river_out) = unpack_rivers(rest[3]);

            let cell = &mut grid.cells[i];
            cell.terrain_type = terrain;
            cell.elevation = elevation;
            cell.water_level = water_level;
            cell.forest_level = rest[0];
            cell.farm_level = rest[1];
            cell.plant_level = rest[2];
            cell.river_in = river_in;
            cell.river_out = river_out;
            cell.roads = rest[4];
            cell.walls = rest[5];
        }
        Ok(grid)
    }

    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), MapError> {
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        self.save(&mut file)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self, MapError> {
        let mut file = std::io::BufReader::new(std::fs::File::open(path)?);
        Self::load(&mut file)
    }
}

/// Байт рек: биты 0..2 — направление истока, бит 3 — исток есть,
/// биты 4..6 — направление притока, бит 7 — приток есть.
fn pack_rivers(river_in: Option<HexDirection>, river_out: Option<HexDirection>) -> u8 {
    let mut byte = 0u8;
    if let Some(d) = river_out {
        byte |= 0b1000 | d.index() as u8;
    }
    if let Some(d) = river_in {
        byte |= 0b1000_0000 | ((d.index() as u8) << 4);
    }
    byte
}

fn unpack_rivers(byte: u8) -> (Option<HexDirection>, Option<HexDirection>) {
    let river_out = if byte & 0b1000 != 0 {
        Some(HexDirection::from_index((byte & 0b111) as usize))
    } else {
        None
    };
    let river_in = if byte & 0b1000_0000 != 0 {
        Some(HexDirection::from_index(((byte >> 4) & 0b111) as usize))
    } else {
        None
    };
    (river_in, river_out)
}

fn write_i32(writer: &mut impl Write, value: i32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

fn write_i16(writer: &mut impl Write, value: i16) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

fn read_i32(reader: &mut impl Read) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn read_i16(reader: &mut impl Read) -> io::Result<i16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(i16::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn rejects_bad_dimensions() {
        assert!(matches!(
            HexGrid::new(0, 15),
            Err(MapError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            HexGrid::new(21, 15),
            Err(MapError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            HexGrid::new(-5, 15),
            Err(MapError::InvalidDimensions { .. })
        ));
        assert!(HexGrid::new(20, 15).is_ok());
    }

    #[test]
    fn neighbors_are_symmetric() {
        let grid = HexGrid::new(20, 15).unwrap();
        for (i, cell) in grid.cells().iter().enumerate() {
            for d in HexDirection::ALL {
                if let Some(n) = cell.neighbor(d) {
                    let back = grid.cells()[n as usize].neighbor(d.opposite());
                    assert_eq!(back, Some(i as u32), "несимметричная связь {d:?}");
                }
            }
        }
    }

    #[test]
    fn neighbors_are_at_distance_one() {
        let grid = HexGrid::new(20, 15).unwrap();
        for cell in grid.cells() {
            for d in HexDirection::ALL {
                if let Some(neighbor) = grid.neighbor(cell, d) {
                    assert_eq!(cell.coordinates.distance_to(neighbor.coordinates), 1);
                }
            }
        }
    }

    #[test]
    fn save_load_round_trip() {
        let mut grid = HexGrid::new(10, 10).unwrap();
        for (i, cell) in grid.cells.iter_mut().enumerate() {
            cell.elevation = (i % 7) as i32 - 2;
            cell.water_level = 3;
            cell.plant_level = (i % 4) as u8;
        }
        grid.add_road(0, HexDirection::E);
        grid.set_outgoing_river(55, HexDirection::W);

        let mut buf = Vec::new();
        grid.save(&mut Cursor::new(&mut buf)).unwrap();
        let loaded = HexGrid::load(&mut Cursor::new(&buf)).unwrap();

        assert_eq!(loaded.cell_count_x, 10);
        for (a, b) in grid.cells().iter().zip(loaded.cells()) {
            assert_eq!(a.elevation, b.elevation);
            assert_eq!(a.water_level, b.water_level);
            assert_eq!(a.plant_level, b.plant_level);
            assert_eq!(a.roads, b.roads);
            assert_eq!(a.river_in, b.river_in);
            assert_eq!(a.river_out, b.river_out);
        }
    }

    #[test]
    fn unknown_format_version_is_rejected() {
        let mut buf = Vec::new();
        write_i32(&mut buf, 99).unwrap();
        write_i32(&mut buf, 10).unwrap();
        write_i32(&mut buf, 10).unwrap();
        assert!(matches!(
            HexGrid::load(&mut Cursor::new(&buf)),
            Err(MapError::UnsupportedFormat(99))
        ));
    }

    #[test]
    fn river_byte_round_trip() {
        for river_in in
            std::iter::once(None).chain(HexDirection::ALL.into_iter().map(Some))
        {
            for river_out in
                std::iter::once(None).chain(HexDirection::ALL.into_iter().map(Some))
            {
                assert_eq!(
                    unpack_rivers(pack_rivers(river_in, river_out)),
                    (river_in, river_out)
                );
            }
        }
    }
}

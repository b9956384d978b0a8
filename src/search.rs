// src/search.rs
//! Поиск пути с бюджетом хода
//!
//! Равномерный поиск (Дейкстра) по готовой сетке с приоритетом
//! `пройденная стоимость + гексагональное расстояние до цели`. Вместо
//! сброса полей всех ячеек между запросами используется монотонный счётчик
//! фаз: перед каждым поиском он растёт на 2, ячейка во фронтире имеет фазу,
//! равную счётчику, закрытая ячейка — счётчик + 1.

use crate::cell::HexEdgeType;
use crate::grid::HexGrid;
use crate::hex::{HexCoordinates, HexDirection};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Очередь фронтира с ленивой сменой приоритета.
///
/// Бинарная куча по (приоритет, индекс ячейки). `change` не удаляет старую
/// запись, а кладёт новую с меньшим приоритетом; устаревшая запись
/// отбрасывается при извлечении по фазе ячейки.
pub(crate) struct SearchFrontier {
    heap: BinaryHeap<Reverse<(i32, u32)>>,
}

impl SearchFrontier {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub(crate) fn enqueue(&mut self, priority: i32, index: u32) {
        self.heap.push(Reverse((priority, index)));
    }

    /// Перепостановка ячейки, чья дистанция улучшилась
    pub(crate) fn change(&mut self, new_priority: i32, index: u32) {
        self.heap.push(Reverse((new_priority, index)));
    }

    /// Запись с минимальным приоритетом (включая устаревшие)
    pub(crate) fn pop(&mut self) -> Option<(i32, u32)> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }
}

/// Найденный путь: координаты от старта до цели включительно
#[derive(Debug, Clone)]
pub struct MovePath {
    pub cells: Vec<HexCoordinates>,
    /// Суммарная стоимость движения с учётом переносов на новый ход
    pub cost: i32,
}

impl MovePath {
    /// Число ходов, необходимое юниту с данной скоростью
    #[must_use]
    pub fn turns(&self, speed: i32) -> i32 {
        if self.cost == 0 {
            0
        } else {
            (self.cost - 1) / speed + 1
        }
    }
}

impl HexGrid {
    /// Пригодна ли ячейка как цель движения: на суше, не занята юнитом
    /// и не выше потолка высоты для юнитов.
    #[must_use]
    pub fn is_valid_destination(&self, coordinates: HexCoordinates) -> bool {
        match self.cell(coordinates) {
            Some(cell) => {
                !cell.is_underwater()
                    && !cell.has_unit
                    && cell.elevation <= self.unit_elevation_ceiling
            }
            None => false,
        }
    }

    /// Существовал ли путь в последнем запросе `find_path`
    #[must_use]
    pub fn has_path(&self) -> bool {
        self.current_path_exists
    }

    /// Ищет кратчайший по стоимости путь между двумя ячейками.
    ///
    /// `speed` — бюджет очков движения на один ход: шаг, не помещающийся
    /// в остаток текущего хода, целиком переносится на следующий.
    pub fn find_path(
        &mut self,
        from: HexCoordinates,
        to: HexCoordinates,
        speed: i32,
    ) -> Option<MovePath> {
        // без бюджета движения не сделать ни шага
        if speed <= 0 {
            self.current_path_exists = false;
            return None;
        }
        let (from_col, from_row) = from.to_offset();
        let (to_col, to_row) = to.to_offset();
        let (Some(from_index), Some(to_index)) = (
            self.cell_index_at_offset(from_col, from_row),
            self.cell_index_at_offset(to_col, to_row),
        ) else {
            self.current_path_exists = false;
            return None;
        };

        self.current_path_from = from_index as u32;
        self.current_path_to = to_index as u32;
        self.current_path_exists = self.search(from_index, to_index, speed);
        if self.current_path_exists {
            Some(self.build_path())
        } else {
            None
        }
    }

    fn search(&mut self, from_index: usize, to_index: usize, speed: i32) -> bool {
        self.search_frontier_phase += 2;
        let phase = self.search_frontier_phase;
        self.search_frontier.clear();

        let goal = self.cells[to_index].coordinates;
        let start = &mut self.cells[from_index];
        start.search_phase = phase;
        start.distance = 0;
        start.search_heuristic = start.coordinates.distance_to(goal);
        let priority = start.search_priority();
        self.search_frontier.enqueue(priority, from_index as u32);

        while let Some((_, index)) = self.search_frontier.pop() {
            let current = index as usize;
            if self.cells[current].search_phase > phase {
                // устаревшая запись: ячейка уже закрыта
                continue;
            }
            self.cells[current].search_phase += 1;
            if current == to_index {
                return true;
            }

            let current_turn = (self.cells[current].distance - 1) / speed;

            for d in HexDirection::ALL {
                let Some(n) = self.cells[current].neighbors[d.index()] else {
                    continue;
                };
                let neighbor = n as usize;
                if self.cells[neighbor].search_phase > phase {
                    continue;
                }
                let Some(move_cost) = self.edge_move_cost(current, neighbor, d) else {
                    continue;
                };

                let mut distance = self.cells[current].distance + move_cost;
                let turn = (distance - 1) / speed;
                if turn > current_turn {
                    // шаг не влезает в остаток хода: начинаем его со
                    // свежего бюджета следующего хода
                    distance = turn * speed + move_cost;
                }

                if self.cells[neighbor].search_phase < phase {
                    let cell = &mut self.cells[neighbor];
                    cell.search_phase = phase;
                    cell.distance = distance;
                    cell.path_from = current as u32;
                    cell.search_heuristic = cell.coordinates.distance_to(goal);
                    let priority = cell.search_priority();
                    self.search_frontier.enqueue(priority, n);
                } else if distance < self.cells[neighbor].distance {
                    let cell = &mut self.cells[neighbor];
                    cell.distance = distance;
                    cell.path_from = current as u32;
                    let priority = cell.search_priority();
                    self.search_frontier.change(priority, n);
                }
            }
        }
        false
    }

    /// Стоимость шага из `from` в соседа `to` через ребро `direction`,
    /// `None` — ребро непроходимо.
    fn edge_move_cost(&self, from: usize, to: usize, direction: HexDirection) -> Option<i32> {
        let current = &self.cells[from];
        let neighbor = &self.cells[to];

        if neighbor.is_underwater() || neighbor.has_unit {
            return None;
        }
        let edge = HexEdgeType::between(current.elevation, neighbor.elevation);
        if edge == HexEdgeType::Cliff {
            return None;
        }
        if current.has_road_through_edge(direction) {
            return Some(1);
        }
        if current.has_wall_through_edge(direction) {
            return None;
        }
        let base = if edge == HexEdgeType::Flat { 2 } else { 4 };
        Some(base + neighbor.feature_cost())
    }

    fn build_path(&self) -> MovePath {
        let mut cells = Vec::new();
        let mut index = self.current_path_to;
        while index != self.current_path_from {
            cells.push(self.cells[index as usize].coordinates);
            index = self.cells[index as usize].path_from;
        }
        cells.push(self.cells[self.current_path_from as usize].coordinates);
        cells.reverse();
        MovePath {
            cells,
            cost: self.cells[self.current_path_to as usize].distance,
        }
    }
}

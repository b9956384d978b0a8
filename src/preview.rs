// src/preview.rs
//! PNG-превью карты: одна ячейка — один пиксель
//!
//! Служебная картинка для отладки и CLI, не имеет отношения к игровому
//! рендерингу.

use crate::error::MapError;
use crate::grid::HexGrid;
use image::{ImageBuffer, Rgba};
use rayon::prelude::*;

impl HexGrid {
    /// Возвращает RGBA-пиксели карты: цвет поверхности, затемнение под
    /// водой, синяя подсветка рек
    #[must_use]
    pub fn to_rgba_image(&self) -> Vec<u8> {
        self.cells()
            .par_iter()
            .flat_map_iter(|cell| {
                let [r, g, b] = if cell.has_river() && !cell.is_underwater() {
                    [70, 110, 200]
                } else if cell.is_underwater() {
                    // глубже — темнее
                    let depth = (cell.water_level - cell.elevation).min(5) as u16;
                    let fade = 1.0 - depth as f32 * 0.12;
                    let base = [40u8, 80, 160];
                    [
                        (f32::from(base[0]) * fade) as u8,
                        (f32::from(base[1]) * fade) as u8,
                        (f32::from(base[2]) * fade) as u8,
                    ]
                } else {
                    cell.terrain_type.to_rgb()
                };
                [r, g, b, 255]
            })
            .collect()
    }

    pub fn save_preview_png(&self, path: impl AsRef<std::path::Path>) -> Result<(), MapError> {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(
            self.cell_count_x as u32,
            self.cell_count_z as u32,
            self.to_rgba_image(),
        )
        .ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, "failed to create image buffer")
        })?;
        img.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_has_four_bytes_per_cell() {
        let grid = HexGrid::new(20, 15).unwrap();
        assert_eq!(grid.to_rgba_image().len(), 20 * 15 * 4);
    }
}

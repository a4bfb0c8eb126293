// src/world.rs
//! Сетка тайлов: смещённые позиции, уровень шума и биом каждого тайла
//!
//! Сетка строится за один проход и после этого не изменяется. Тайлы не читают
//! соседей, поэтому проход можно распараллелить; результат всё равно хранится построчно.

use crate::biome::Biome;
use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::geometry::Vector2;
use crate::noise::GradientNoiseField;
use crate::rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldTile {
    /// Смещённый центр тайла в мировых координатах
    pub position: Vector2,
    /// Случайное число тайла в `[0, 1)`: города, выбор и масштаб декораций
    pub random_value: f64,
    /// Уровень `noise + 1.0`, примерно 0..2
    pub noise_level: f64,
    pub biome: Biome,
}

/// Классифицированная сетка `width × height`, тайлы хранятся построчно
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldGrid {
    pub width: usize,
    pub height: usize,
    tiles: Vec<WorldTile>,
}

impl WorldGrid {
    /// Собирает сетку из готовых тайлов (построчно)
    pub fn from_tiles(
        width: usize,
        height: usize,
        tiles: Vec<WorldTile>,
    ) -> Result<Self, GenerationError> {
        let expected = width.checked_mul(height);
        if width == 0 || height == 0 || expected != Some(tiles.len()) {
            return Err(GenerationError::config(format!(
                "{} tiles do not form a {width}x{height} grid",
                tiles.len()
            )));
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    #[must_use]
    pub fn get(&self, col: usize, row: usize) -> &WorldTile {
        &self.tiles[row * self.width + col]
    }

    #[must_use]
    pub fn tiles(&self) -> &[WorldTile] {
        &self.tiles
    }

    /// Тайлы с координатами `(col, row)` в построчном порядке
    pub fn indexed(&self) -> impl Iterator<Item = ((usize, usize), &WorldTile)> {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, tile)| ((i % width, i / width), tile))
    }

    #[must_use]
    pub fn biome_counts(&self) -> [(Biome, usize); 4] {
        Biome::ALL.map(|biome| {
            let count = self.tiles.iter().filter(|t| t.biome == biome).count();
            (biome, count)
        })
    }

    /// Доля суши (всё, кроме воды) среди всех тайлов
    #[must_use]
    pub fn land_share(&self) -> f64 {
        let land = self.tiles.iter().filter(|t| t.biome.is_land()).count();
        land as f64 / self.tiles.len() as f64
    }
}

fn build_tile(
    config: &GeneratorConfig,
    noise: &GradientNoiseField,
    col: usize,
    row: usize,
) -> Result<WorldTile, GenerationError> {
    let grid = &config.grid;
    let seed = config.seed;
    let xn = col as f64 / grid.width as f64;
    let yn = row as f64 / grid.height as f64;

    let random_value = rng::normalized(&[seed, config.salts.random, xn, yn]);
    let jitter_x = rng::scaled(
        &[seed, config.salts.x, xn, yn],
        grid.border_min,
        grid.border_max,
    );
    let jitter_y = rng::scaled(
        &[seed, config.salts.y, xn, yn],
        grid.border_min,
        grid.border_max,
    );
    let position = Vector2::new(
        (col as f64 + jitter_x) * grid.tile_size,
        (row as f64 + jitter_y) * grid.tile_size,
    );

    let noise_level = noise.sample(position / config.noise.scale)? + 1.0;
    let biome = Biome::classify(noise_level, random_value, &config.biomes);

    Ok(WorldTile {
        position,
        random_value,
        noise_level,
        biome,
    })
}

/// Строит и классифицирует сетку тайлов.
///
/// Конфигурация проверяется до создания первого тайла. Если хотя бы один тайл
/// выходит за пределы решётки шума, возвращается ошибка первого такого тайла
/// в построчном порядке.
pub fn build_world_grid(
    config: &GeneratorConfig,
    noise: &GradientNoiseField,
) -> Result<WorldGrid, GenerationError> {
    config.validate()?;

    let width = config.grid.width;
    let height = config.grid.height;
    let total = width * height;

    #[cfg(feature = "parallel")]
    let results: Vec<Result<WorldTile, GenerationError>> = (0..total)
        .into_par_iter()
        .map(|i| build_tile(config, noise, i % width, i / width))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<WorldTile, GenerationError>> = (0..total)
        .map(|i| build_tile(config, noise, i % width, i / width))
        .collect();

    let tiles = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    debug!("Классифицировано {} тайлов ({}×{})", tiles.len(), width, height);

    WorldGrid::from_tiles(width, height, tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_grid() -> WorldGrid {
        let config = GeneratorConfig::default();
        let noise = GradientNoiseField::new(
            config.seed,
            config.noise.lattice_width,
            config.noise.lattice_height,
        );
        build_world_grid(&config, &noise).unwrap()
    }

    #[test]
    fn test_grid_shape_and_order() {
        let grid = default_grid();
        assert_eq!((grid.width, grid.height), (40, 28));
        assert_eq!(grid.tiles().len(), 40 * 28);

        for ((col, row), tile) in grid.indexed() {
            let min_x = (col as f64 + 0.2) * 25.0;
            let max_x = (col as f64 + 0.8) * 25.0;
            let min_y = (row as f64 + 0.2) * 25.0;
            let max_y = (row as f64 + 0.8) * 25.0;
            assert!(tile.position.x >= min_x && tile.position.x < max_x);
            assert!(tile.position.y >= min_y && tile.position.y < max_y);
            assert!((0.0..1.0).contains(&tile.random_value));
            assert_eq!(grid.get(col, row), tile);
        }
    }

    #[test]
    fn test_tile_values_follow_hash_chain() {
        let config = GeneratorConfig::default();
        let grid = default_grid();
        let tile = grid.get(7, 3);
        let (xn, yn) = (7.0 / 40.0, 3.0 / 28.0);
        assert_eq!(tile.random_value, rng::normalized(&[0.3, 0.7, xn, yn]));
        let jitter_x = rng::scaled(&[0.3, 0.9, xn, yn], 0.2, 0.8);
        assert_eq!(tile.position.x, (7.0 + jitter_x) * 25.0);

        let noise = GradientNoiseField::new(0.3, 12, 10);
        let level = noise.sample(tile.position / 200.0).unwrap() + 1.0;
        assert_eq!(tile.noise_level, level);
        assert_eq!(
            tile.biome,
            Biome::classify(level, tile.random_value, &config.biomes)
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        assert_eq!(default_grid(), default_grid());
    }

    #[test]
    fn test_counts_cover_every_tile() {
        let grid = default_grid();
        let counts = grid.biome_counts();
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        assert_eq!(total, grid.tiles().len());

        let water = counts[0].1;
        let expected = (total - water) as f64 / total as f64;
        assert_eq!(grid.land_share(), expected);
    }

    #[test]
    fn test_small_grid_rejected_before_tiles() {
        let mut config = GeneratorConfig::default();
        config.grid.width = 2;
        config.grid.height = 2;
        let noise = GradientNoiseField::new(config.seed, 12, 10);
        assert!(matches!(
            build_world_grid(&config, &noise),
            Err(GenerationError::Configuration(_))
        ));
    }

    #[test]
    fn test_noise_lattice_too_small() {
        let config = GeneratorConfig::default();
        // Карта 1000×700 при масштабе 200 требует решётку не меньше 6×5
        let noise = GradientNoiseField::new(config.seed, 3, 3);
        assert!(matches!(
            build_world_grid(&config, &noise),
            Err(GenerationError::OutOfRange {
                width: 3,
                height: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_from_tiles_checks_length() {
        let tile = WorldTile {
            position: Vector2::default(),
            random_value: 0.0,
            noise_level: 0.0,
            biome: Biome::Water,
        };
        assert!(WorldGrid::from_tiles(2, 2, vec![tile; 3]).is_err());
        assert!(WorldGrid::from_tiles(0, 0, vec![]).is_err());
        // Переполнение произведения не должно совпасть с пустым вектором
        assert!(WorldGrid::from_tiles(1 << 32, 1 << 32, vec![]).is_err());
        assert!(WorldGrid::from_tiles(usize::MAX, 2, vec![tile; 3]).is_err());
        assert!(WorldGrid::from_tiles(3, 1, vec![tile; 3]).is_ok());
    }
}

// src/config.rs
//! Конфигурация генерации карты
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией:
//! - Размеры сетки тайлов и разброс их положения
//! - Разрешение и масштаб градиентного шума
//! - Пороги биомов и вероятность появления городов
//! - Параметры декораций, включаемые слои и палитру для рендерера
//!
//! Значения по умолчанию воспроизводят исходный прототип карты 1000×700 с тайлами по 25px.
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use crate::error::GenerationError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Параметры сетки тайлов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    /// Количество тайлов по горизонтали (минимум 3)
    #[serde(default = "default_grid_width")]
    pub width: usize,

    /// Количество тайлов по вертикали (минимум 3)
    #[serde(default = "default_grid_height")]
    pub height: usize,

    /// Размер тайла в мировых единицах
    #[serde(default = "default_tile_size")]
    pub tile_size: f64,

    /// Минимальное смещение центра тайла (доля тайла, `0.0..=1.0`)
    #[serde(default = "default_border_min")]
    pub border_min: f64,

    /// Максимальное смещение центра тайла (доля тайла, `border_min..=1.0`)
    #[serde(default = "default_border_max")]
    pub border_max: f64,
}

fn default_grid_width() -> usize {
    40
}
fn default_grid_height() -> usize {
    28
}
fn default_tile_size() -> f64 {
    25.0
}
fn default_border_min() -> f64 {
    0.2
}
fn default_border_max() -> f64 {
    0.8
}

impl GridSettings {
    /// Подбирает количество тайлов под холст заданного размера.
    ///
    /// # Примеры
    /// ```
    /// use outline_grid::config::GridSettings;
    /// let grid = GridSettings::from_canvas(1000.0, 700.0, 25.0);
    /// assert_eq!((grid.width, grid.height), (40, 28));
    /// ```
    #[must_use]
    pub fn from_canvas(canvas_width: f64, canvas_height: f64, tile_size: f64) -> Self {
        Self {
            width: (canvas_width / tile_size).floor().max(0.0) as usize,
            height: (canvas_height / tile_size).floor().max(0.0) as usize,
            tile_size,
            ..Self::default()
        }
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            width: 40,
            height: 28,
            tile_size: 25.0,
            border_min: 0.2,
            border_max: 0.8,
        }
    }
}

/// Параметры решётки градиентного шума
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseSettings {
    /// Ширина решётки градиентов в узлах
    #[serde(default = "default_lattice_width")]
    pub lattice_width: usize,

    /// Высота решётки градиентов в узлах
    #[serde(default = "default_lattice_height")]
    pub lattice_height: usize,

    /// Делитель мировых координат перед выборкой шума:
    /// чем больше значение, тем крупнее континенты
    #[serde(default = "default_noise_scale")]
    pub scale: f64,
}

fn default_lattice_width() -> usize {
    12
}
fn default_lattice_height() -> usize {
    10
}
fn default_noise_scale() -> f64 {
    200.0
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            lattice_width: 12,
            lattice_height: 10,
            scale: 200.0,
        }
    }
}

/// Соли, разделяющие независимые случайные величины одного тайла
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedSalts {
    #[serde(default = "default_random_salt")]
    pub random: f64,
    #[serde(default = "default_x_salt")]
    pub x: f64,
    #[serde(default = "default_y_salt")]
    pub y: f64,
}

fn default_random_salt() -> f64 {
    0.7
}
fn default_x_salt() -> f64 {
    0.9
}
fn default_y_salt() -> f64 {
    0.8
}

impl Default for SeedSalts {
    fn default() -> Self {
        Self {
            random: 0.7,
            x: 0.9,
            y: 0.8,
        }
    }
}

/// Пороги классификации биомов по уровню `noise + 1.0` (≈0..2)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeThresholds {
    /// Выше этого уровня — горы
    #[serde(default = "default_mountain_level")]
    pub mountain: f64,

    /// Выше этого уровня может появиться город
    #[serde(default = "default_town_level")]
    pub town: f64,

    /// Выше этого уровня — суша (трава), ниже — вода
    #[serde(default = "default_grass_level")]
    pub grass: f64,

    /// Вероятность того, что подходящий тайл станет городом (`0.0..=1.0`)
    #[serde(default = "default_town_probability")]
    pub town_probability: f64,
}

fn default_mountain_level() -> f64 {
    1.4
}
fn default_town_level() -> f64 {
    1.0
}
fn default_grass_level() -> f64 {
    0.8
}
fn default_town_probability() -> f64 {
    0.02
}

impl Default for BiomeThresholds {
    fn default() -> Self {
        Self {
            mountain: 1.4,
            town: 1.0,
            grass: 0.8,
            town_probability: 0.02,
        }
    }
}

/// Параметры горных декораций
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationSettings {
    /// Размер каталога декораций (минимум 1)
    #[serde(default = "default_catalog_size")]
    pub catalog_size: usize,

    #[serde(default = "default_x_scale_base")]
    pub x_scale_base: f64,

    #[serde(default = "default_y_scale_base")]
    pub y_scale_base: f64,

    /// Масштаб растёт на `random_value * scale_spread`
    #[serde(default = "default_scale_spread")]
    pub scale_spread: f64,
}

fn default_catalog_size() -> usize {
    3
}
fn default_x_scale_base() -> f64 {
    1.1
}
fn default_y_scale_base() -> f64 {
    1.3
}
fn default_scale_spread() -> f64 {
    0.2
}

impl Default for DecorationSettings {
    fn default() -> Self {
        Self {
            catalog_size: 3,
            x_scale_base: 1.1,
            y_scale_base: 1.3,
            scale_spread: 0.2,
        }
    }
}

/// Какие производные слои вычислять. Отключённый слой даёт пустой список.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerToggles {
    #[serde(default = "default_enabled")]
    pub roads: bool,
    #[serde(default = "default_enabled")]
    pub coastline: bool,
    #[serde(default = "default_enabled")]
    pub decorations: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for LayerToggles {
    fn default() -> Self {
        Self {
            roads: true,
            coastline: true,
            decorations: true,
        }
    }
}

/// Цвета для рендерера в формате `#rgb` или `#rrggbb`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomePalette {
    #[serde(default = "default_water_color")]
    pub water: String,
    #[serde(default = "default_grass_color")]
    pub grass: String,
    #[serde(default = "default_mountain_color")]
    pub mountain: String,
    #[serde(default = "default_town_color")]
    pub town: String,
    #[serde(default = "default_road_color")]
    pub road: String,
    #[serde(default = "default_coast_color")]
    pub coast: String,
}

fn default_water_color() -> String {
    "#00f".to_string()
}
fn default_grass_color() -> String {
    "#9f9".to_string()
}
fn default_mountain_color() -> String {
    "#999".to_string()
}
fn default_town_color() -> String {
    "#f0f".to_string()
}
fn default_road_color() -> String {
    "#999".to_string()
}
fn default_coast_color() -> String {
    "#00f".to_string()
}

impl Default for BiomePalette {
    fn default() -> Self {
        Self {
            water: default_water_color(),
            grass: default_grass_color(),
            mountain: default_mountain_color(),
            town: default_town_color(),
            road: default_road_color(),
            coast: default_coast_color(),
        }
    }
}

impl BiomePalette {
    fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("water", &self.water),
            ("grass", &self.grass),
            ("mountain", &self.mountain),
            ("town", &self.town),
            ("road", &self.road),
            ("coast", &self.coast),
        ]
    }
}

fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|digits| {
        matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
    })
}

/// Ошибка загрузки конфигурационного файла
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Основные параметры генерации карты
///
/// Полная конфигурация одного запуска генератора. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Сид карты (любое конечное число, обычно из `[0, 1)`)
    #[serde(default = "default_seed")]
    pub seed: f64,

    #[serde(default)]
    pub grid: GridSettings,

    #[serde(default)]
    pub noise: NoiseSettings,

    #[serde(default)]
    pub salts: SeedSalts,

    #[serde(default)]
    pub biomes: BiomeThresholds,

    #[serde(default)]
    pub decorations: DecorationSettings,

    #[serde(default)]
    pub layers: LayerToggles,

    #[serde(default)]
    pub palette: BiomePalette,
}

fn default_seed() -> f64 {
    0.3
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0.3,
            grid: GridSettings::default(),
            noise: NoiseSettings::default(),
            salts: SeedSalts::default(),
            biomes: BiomeThresholds::default(),
            decorations: DecorationSettings::default(),
            layers: LayerToggles::default(),
            palette: BiomePalette::default(),
        }
    }
}

impl GeneratorConfig {
    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # map.toml
    /// seed = 0.42
    ///
    /// [grid]
    /// width = 60
    /// height = 40
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Проверяет параметры до начала генерации.
    ///
    /// Сид проверяется первым; затем все числовые параметры на принадлежность своей области.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !self.seed.is_finite() {
            return Err(GenerationError::InvalidSeed(self.seed));
        }

        let grid = &self.grid;
        if grid.width < 3 || grid.height < 3 {
            return Err(GenerationError::config(format!(
                "grid must be at least 3x3 to keep a 1-tile coastline border, got {}x{}",
                grid.width, grid.height
            )));
        }
        if grid.width.checked_mul(grid.height).is_none() {
            return Err(GenerationError::config(format!(
                "grid {}x{} has more tiles than fit in memory",
                grid.width, grid.height
            )));
        }
        if !(grid.tile_size.is_finite() && grid.tile_size > 0.0) {
            return Err(GenerationError::config(format!(
                "tile_size must be positive, got {}",
                grid.tile_size
            )));
        }
        if !(0.0 <= grid.border_min && grid.border_min <= grid.border_max && grid.border_max <= 1.0)
        {
            return Err(GenerationError::config(format!(
                "jitter borders must satisfy 0 <= min <= max <= 1, got [{}, {}]",
                grid.border_min, grid.border_max
            )));
        }

        let noise = &self.noise;
        if noise.lattice_width < 2 || noise.lattice_height < 2 {
            return Err(GenerationError::config(format!(
                "noise lattice must be at least 2x2, got {}x{}",
                noise.lattice_width, noise.lattice_height
            )));
        }
        if !(noise.scale.is_finite() && noise.scale > 0.0) {
            return Err(GenerationError::config(format!(
                "noise scale must be positive, got {}",
                noise.scale
            )));
        }

        let salts = [self.salts.random, self.salts.x, self.salts.y];
        if salts.iter().any(|s| !s.is_finite()) {
            return Err(GenerationError::config("seed salts must be finite"));
        }

        let biomes = &self.biomes;
        if [biomes.mountain, biomes.town, biomes.grass]
            .iter()
            .any(|t| !t.is_finite())
        {
            return Err(GenerationError::config("biome thresholds must be finite"));
        }
        if !(0.0..=1.0).contains(&biomes.town_probability) {
            return Err(GenerationError::config(format!(
                "town_probability must be within [0, 1], got {}",
                biomes.town_probability
            )));
        }

        let decorations = &self.decorations;
        if decorations.catalog_size == 0 {
            return Err(GenerationError::config(
                "decoration catalog must hold at least one item",
            ));
        }
        if [
            decorations.x_scale_base,
            decorations.y_scale_base,
            decorations.scale_spread,
        ]
        .iter()
        .any(|v| !v.is_finite())
        {
            return Err(GenerationError::config("decoration scales must be finite"));
        }

        for (name, color) in self.palette.entries() {
            if !is_hex_color(color) {
                return Err(GenerationError::config(format!(
                    "palette colour `{name}` must be #rgb or #rrggbb, got {color:?}"
                )));
            }
        }

        Ok(())
    }
}

// src/decoration.rs
//! Декорации горных тайлов
//!
//! Генератор только выбирает индекс в каталоге и масштаб. Содержимое декораций
//! (картинки, SVG-узлы) принадлежит рендереру и приходит через [`DecorationCatalog`].

use crate::biome::Biome;
use crate::config::DecorationSettings;
use crate::geometry::Vector2;
use crate::world::WorldGrid;
use serde::Serialize;

/// Каталог взаимозаменяемых декораций, доступных по индексу
pub trait DecorationCatalog {
    type Handle;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn select(&self, index: usize) -> Option<Self::Handle>;
}

/// Каталог поверх вектора: `select` клонирует элемент
#[derive(Debug, Clone, PartialEq)]
pub struct VecCatalog<T>(pub Vec<T>);

impl<T: Clone> DecorationCatalog for VecCatalog<T> {
    type Handle = T;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn select(&self, index: usize) -> Option<T> {
        self.0.get(index).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecorationPlacement {
    pub catalog_index: usize,
    pub x_scale: f64,
    pub y_scale: f64,
    pub position: Vector2,
}

/// Выбирает декорацию для каждого горного тайла.
///
/// Результат отсортирован по возрастанию `position.y` (сначала рисуются дальние),
/// при равных `y` сохраняется построчный порядок.
#[must_use]
pub fn place_mountain_decorations(
    grid: &WorldGrid,
    settings: &DecorationSettings,
) -> Vec<DecorationPlacement> {
    let catalog_size = settings.catalog_size.max(1);
    let mut placements: Vec<DecorationPlacement> = grid
        .tiles()
        .iter()
        .filter(|tile| tile.biome == Biome::Mountain)
        .map(|tile| {
            let r = tile.random_value;
            DecorationPlacement {
                catalog_index: ((r * catalog_size as f64).floor() as usize).min(catalog_size - 1),
                x_scale: settings.x_scale_base + r * settings.scale_spread,
                y_scale: settings.y_scale_base + r * settings.scale_spread,
                position: tile.position,
            }
        })
        .collect();
    placements.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
    placements
}

/// Сопоставляет размещениям элементы каталога.
///
/// Индекс вне каталога даёт `None`, например если каталог меньше настроенного размера.
pub fn resolve_decorations<'a, C: DecorationCatalog>(
    placements: &'a [DecorationPlacement],
    catalog: &'a C,
) -> impl Iterator<Item = (&'a DecorationPlacement, Option<C::Handle>)> {
    placements
        .iter()
        .map(move |placement| (placement, catalog.select(placement.catalog_index)))
}

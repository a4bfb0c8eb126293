// src/generator.rs
//! Полный конвейер генерации карты
//!
//! Порядок фаз жёсткий: решётка шума → классификация сетки → производные слои
//! (дороги, берег, декорации). Производные слои только читают готовую сетку.

use crate::coastline::{CoastlineSegment, extract_coastline};
use crate::config::{BiomePalette, GeneratorConfig};
use crate::decoration::{DecorationPlacement, place_mountain_decorations};
use crate::error::GenerationError;
use crate::noise::GradientNoiseField;
use crate::settlement::{Road, RoadNetwork, Town, collect_towns, connect_nearest};
use crate::world::{WorldGrid, build_world_grid};
use serde::Serialize;
use std::fs;
use tracing::{debug, info, warn};

/// Результат генерации, передаваемый внешнему рендереру
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedMap {
    pub seed: f64,
    pub grid: WorldGrid,
    pub towns: Vec<Town>,
    pub roads: Vec<Road>,
    /// Группы индексов городов, связанных дорогами
    pub settlement_clusters: Vec<Vec<usize>>,
    pub coastline: Vec<CoastlineSegment>,
    /// Горные декорации в порядке отрисовки (по возрастанию y)
    pub decorations: Vec<DecorationPlacement>,
    pub palette: BiomePalette,
}

impl GeneratedMap {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn save_as_json(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

fn link_roads(config: &GeneratorConfig, towns: &[Town]) -> Vec<Road> {
    if config.layers.roads {
        connect_nearest(towns)
    } else {
        Vec::new()
    }
}

fn trace_coastline(config: &GeneratorConfig, grid: &WorldGrid) -> Vec<CoastlineSegment> {
    if config.layers.coastline {
        extract_coastline(grid)
    } else {
        Vec::new()
    }
}

/// Генерирует карту по конфигурации.
///
/// Либо возвращает полный результат, либо первую ошибку без частичных данных.
pub fn generate(config: &GeneratorConfig) -> Result<GeneratedMap, GenerationError> {
    config.validate()?;

    let noise = GradientNoiseField::new(
        config.seed,
        config.noise.lattice_width,
        config.noise.lattice_height,
    );
    debug!("Решётка шума {}×{} построена", noise.width, noise.height);

    let grid = build_world_grid(config, &noise)?;
    let counts = grid.biome_counts();
    info!(
        "Сетка {}×{} классифицирована: {:?}, доля суши {:.2}",
        grid.width,
        grid.height,
        counts,
        grid.land_share()
    );

    let towns = collect_towns(&grid);
    if towns.is_empty() {
        warn!("На карте нет ни одного города (seed = {})", config.seed);
    }

    // Дороги и берег независимы и читают только готовую сетку
    #[cfg(feature = "parallel")]
    let (roads, coastline) = rayon::join(
        || link_roads(config, &towns),
        || trace_coastline(config, &grid),
    );
    #[cfg(not(feature = "parallel"))]
    let (roads, coastline) = (link_roads(config, &towns), trace_coastline(config, &grid));

    let network = RoadNetwork::new(&towns, &roads);
    let settlement_clusters = network.clusters();
    info!(
        "Городов: {}, дорог: {} (общая длина {:.1}), групп поселений: {}",
        towns.len(),
        roads.len(),
        network.total_length(),
        settlement_clusters.len()
    );
    info!("Сегментов береговой линии: {}", coastline.len());

    let decorations = if config.layers.decorations {
        place_mountain_decorations(&grid, &config.decorations)
    } else {
        Vec::new()
    };
    debug!("Горных декораций: {}", decorations.len());

    Ok(GeneratedMap {
        seed: config.seed,
        grid,
        towns,
        roads,
        settlement_clusters,
        coastline,
        decorations,
        palette: config.palette.clone(),
    })
}

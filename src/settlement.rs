// src/settlement.rs
use crate::biome::Biome;
use crate::geometry::Vector2;
use crate::world::WorldGrid;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use serde::Serialize;

/// Город: тайл с биомом `Town`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Town {
    pub position: Vector2,
    pub col: usize,
    pub row: usize,
}

/// Направленная дорога от города к ближайшему соседу.
///
/// Два города, ближайшие друг для друга, дают две дороги по одному отрезку.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Road {
    /// Индексы городов в порядке обнаружения
    pub from_index: usize,
    pub to_index: usize,
    pub from: Vector2,
    pub to: Vector2,
    pub distance: f64,
}

/// Собирает города в построчном порядке обхода сетки
#[must_use]
pub fn collect_towns(grid: &WorldGrid) -> Vec<Town> {
    grid.indexed()
        .filter(|(_, tile)| tile.biome == Biome::Town)
        .map(|((col, row), tile)| Town {
            position: tile.position,
            col,
            row,
        })
        .collect()
}

/// Соединяет каждый город с ближайшим другим городом.
///
/// При равных расстояниях выбирается город, найденный раньше.
/// Одинокий город дороги не получает.
#[must_use]
pub fn connect_nearest(towns: &[Town]) -> Vec<Road> {
    towns
        .iter()
        .enumerate()
        .filter_map(|(from_index, from)| {
            let mut nearest: Option<(usize, f64)> = None;
            for (to_index, to) in towns.iter().enumerate() {
                if to_index == from_index {
                    continue;
                }
                let distance = from.position.distance(to.position);
                // Строгое сравнение: при равенстве остаётся ранний кандидат
                if nearest.is_none_or(|(_, best)| distance < best) {
                    nearest = Some((to_index, distance));
                }
            }
            nearest.map(|(to_index, distance)| Road {
                from_index,
                to_index,
                from: from.position,
                to: towns[to_index].position,
                distance,
            })
        })
        .collect()
}

/// Граф дорог: узлы — индексы городов, рёбра — дороги с длиной
pub struct RoadNetwork {
    graph: DiGraph<usize, f64>,
}

impl RoadNetwork {
    #[must_use]
    pub fn new(towns: &[Town], roads: &[Road]) -> Self {
        let mut graph = DiGraph::with_capacity(towns.len(), roads.len());
        for index in 0..towns.len() {
            graph.add_node(index);
        }
        for road in roads {
            graph.add_edge(
                NodeIndex::new(road.from_index),
                NodeIndex::new(road.to_index),
                road.distance,
            );
        }
        Self { graph }
    }

    /// Группы городов, связанных дорогами (без учёта направления).
    ///
    /// Внутри группы индексы возрастают, группы упорядочены по первому городу.
    #[must_use]
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let mut sets = UnionFind::new(self.graph.node_count());
        for edge in self.graph.raw_edges() {
            sets.union(edge.source().index(), edge.target().index());
        }

        let mut clusters: Vec<Vec<usize>> = Vec::new();
        let mut cluster_of_root = vec![usize::MAX; self.graph.node_count()];
        for node in self.graph.node_indices() {
            let town = self.graph[node];
            let root = sets.find(node.index());
            if cluster_of_root[root] == usize::MAX {
                cluster_of_root[root] = clusters.len();
                clusters.push(Vec::new());
            }
            clusters[cluster_of_root[root]].push(town);
        }
        clusters
    }

    /// Суммарная длина всех дорог (дубли встречных дорог считаются дважды)
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.graph.edge_weights().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn town(x: f64, y: f64) -> Town {
        Town {
            position: Vector2::new(x, y),
            col: 0,
            row: 0,
        }
    }

    #[test]
    fn test_nearest_neighbor_road() {
        let towns = [town(0.0, 0.0), town(10.0, 0.0), town(3.0, 0.0)];
        let roads = connect_nearest(&towns);
        assert_eq!(roads.len(), 3);

        assert_eq!(roads[0].from, Vector2::new(0.0, 0.0));
        assert_eq!(roads[0].to, Vector2::new(3.0, 0.0));
        assert_eq!(roads[0].to_index, 2);
        assert_eq!(roads[0].distance, 3.0);

        // (10,0) -> (3,0), (3,0) -> (0,0)
        assert_eq!(roads[1].to_index, 2);
        assert_eq!(roads[2].to_index, 0);
    }

    #[test]
    fn test_mutual_nearest_not_deduplicated() {
        let towns = [town(0.0, 0.0), town(1.0, 0.0)];
        let roads = connect_nearest(&towns);
        assert_eq!(roads.len(), 2);
        assert_eq!((roads[0].from_index, roads[0].to_index), (0, 1));
        assert_eq!((roads[1].from_index, roads[1].to_index), (1, 0));
    }

    #[test]
    fn test_tie_prefers_earliest_town() {
        let towns = [town(0.0, 0.0), town(-5.0, 0.0), town(5.0, 0.0)];
        let roads = connect_nearest(&towns);
        assert_eq!(roads[0].to_index, 1);
    }

    #[test]
    fn test_single_or_no_town() {
        assert!(connect_nearest(&[]).is_empty());
        assert!(connect_nearest(&[town(1.0, 1.0)]).is_empty());
    }

    #[test]
    fn test_clusters() {
        let towns = [
            town(0.0, 0.0),
            town(100.0, 0.0),
            town(1.0, 0.0),
            town(101.0, 0.0),
            town(3.0, 0.0),
        ];
        let roads = connect_nearest(&towns);
        let network = RoadNetwork::new(&towns, &roads);
        assert_eq!(network.clusters(), vec![vec![0, 2, 4], vec![1, 3]]);
        // 1 + 1 + 1 + 1 + 2
        assert_eq!(network.total_length(), 6.0);
    }
}

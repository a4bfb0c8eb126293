// src/coastline.rs
//! Береговая линия по локальным шаблонам 3×3
//!
//! Для каждого внутреннего тайла воды проверяются 16 правил (4 формы × 4 угла).
//! Совпавшее правило добавляет позицию одного соседа — «якорь», через который
//! изгибается берег. Это не трассировка контура: кривые строятся независимо для
//! каждого тайла и лишь визуально складываются в сплошной берег.

use crate::biome::Biome;
use crate::geometry::Vector2;
use crate::world::{WorldGrid, WorldTile};
use serde::Serialize;

/// Квадратичная кривая: от середины `p`–якорь0 через `p` к середине `p`–якорь1
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoastlineSegment {
    pub start_control: Vector2,
    pub through: Vector2,
    pub end_control: Vector2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopRight,
    BottomRight,
    BottomLeft,
    TopLeft,
}

impl Corner {
    /// Смещения `(dx, dy)` для (ребро1, угол, ребро2): ребро1 — верх или низ,
    /// ребро2 — право или лево
    #[must_use]
    pub const fn offsets(self) -> [(isize, isize); 3] {
        match self {
            Corner::TopRight => [(0, -1), (1, -1), (1, 0)],
            Corner::BottomRight => [(0, 1), (1, 1), (1, 0)],
            Corner::BottomLeft => [(0, 1), (-1, 1), (-1, 0)],
            Corner::TopLeft => [(0, -1), (-1, -1), (-1, 0)],
        }
    }
}

/// Какой из трёх соседей угла становится якорем
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSelector {
    Edge1,
    Corner,
    Edge2,
}

impl AnchorSelector {
    const fn slot(self) -> usize {
        match self {
            AnchorSelector::Edge1 => 0,
            AnchorSelector::Corner => 1,
            AnchorSelector::Edge2 => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoastRule {
    pub corner: Corner,
    /// Биомы (центр, ребро1, угол, ребро2)
    pub pattern: [Biome; 4],
    pub anchor: AnchorSelector,
}

const W: Biome = Biome::Water;
const G: Biome = Biome::Grass;

const fn rule(
    corner: Corner,
    edge1: Biome,
    diag: Biome,
    edge2: Biome,
    anchor: AnchorSelector,
) -> CoastRule {
    CoastRule {
        corner,
        pattern: [W, edge1, diag, edge2],
        anchor,
    }
}

const fn corner_rules(corner: Corner) -> [CoastRule; 4] {
    [
        rule(corner, W, W, G, AnchorSelector::Corner),
        rule(corner, W, G, G, AnchorSelector::Edge1),
        rule(corner, G, G, W, AnchorSelector::Edge2),
        rule(corner, G, W, W, AnchorSelector::Corner),
    ]
}

const fn build_rules() -> [CoastRule; 16] {
    let corners = [
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
        Corner::TopLeft,
    ];
    let mut rules = [rule(Corner::TopRight, W, W, W, AnchorSelector::Corner); 16];
    let mut c = 0;
    while c < corners.len() {
        let shapes = corner_rules(corners[c]);
        let mut s = 0;
        while s < shapes.len() {
            rules[c * 4 + s] = shapes[s];
            s += 1;
        }
        c += 1;
    }
    rules
}

/// Таблица правил в порядке обхода углов: правый верхний, правый нижний,
/// левый нижний, левый верхний
pub static COAST_RULES: [CoastRule; 16] = build_rules();

fn neighbor(grid: &WorldGrid, col: usize, row: usize, (dx, dy): (isize, isize)) -> &WorldTile {
    grid.get(col.wrapping_add_signed(dx), row.wrapping_add_signed(dy))
}

/// Якоря для внутреннего тайла `(col, row)` в порядке таблицы правил.
///
/// Для тайлов на внешнем кольце сетки и для не-водных тайлов список пуст.
#[must_use]
pub fn coastline_anchors(grid: &WorldGrid, col: usize, row: usize) -> Vec<Vector2> {
    let interior = col >= 1 && row >= 1 && col + 1 < grid.width && row + 1 < grid.height;
    if !interior || grid.get(col, row).biome != Biome::Water {
        return Vec::new();
    }

    let mut anchors = Vec::new();
    for rule in &COAST_RULES {
        let tiles = rule
            .corner
            .offsets()
            .map(|offset| neighbor(grid, col, row, offset));
        let matches = tiles
            .iter()
            .zip(&rule.pattern[1..])
            .all(|(tile, &biome)| tile.biome == biome);
        if matches {
            anchors.push(tiles[rule.anchor.slot()].position);
        }
    }
    anchors
}

/// Сегменты берега для одного тайла: 2 якоря — один сегмент, 4 — два, иначе ничего
#[must_use]
pub fn segments_for(center: Vector2, anchors: &[Vector2]) -> Vec<CoastlineSegment> {
    let segment = |a: Vector2, b: Vector2| CoastlineSegment {
        start_control: center.midpoint(a),
        through: center,
        end_control: center.midpoint(b),
    };
    match anchors {
        [a, b] => vec![segment(*a, *b)],
        [a, b, c, d] => vec![segment(*a, *b), segment(*c, *d)],
        _ => Vec::new(),
    }
}

/// Обходит внутренние тайлы построчно и собирает все сегменты берега
#[must_use]
pub fn extract_coastline(grid: &WorldGrid) -> Vec<CoastlineSegment> {
    let mut segments = Vec::new();
    for row in 1..grid.height.saturating_sub(1) {
        for col in 1..grid.width.saturating_sub(1) {
            let anchors = coastline_anchors(grid, col, row);
            segments.extend(segments_for(grid.get(col, row).position, &anchors));
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Сетка из строк вида "WWG": W — вода, G — трава, M — горы, T — город
    fn grid_from(rows: &[&str]) -> WorldGrid {
        let height = rows.len();
        let width = rows[0].len();
        let tiles = rows
            .iter()
            .enumerate()
            .flat_map(|(row, line)| {
                line.chars().enumerate().map(move |(col, c)| WorldTile {
                    position: Vector2::new(col as f64 * 10.0, row as f64 * 10.0),
                    random_value: 0.5,
                    noise_level: 1.0,
                    biome: match c {
                        'G' => Biome::Grass,
                        'M' => Biome::Mountain,
                        'T' => Biome::Town,
                        _ => Biome::Water,
                    },
                })
            })
            .collect();
        WorldGrid::from_tiles(width, height, tiles).unwrap()
    }

    #[test]
    fn test_rule_table_order() {
        assert_eq!(COAST_RULES.len(), 16);
        assert!(COAST_RULES[..4].iter().all(|r| r.corner == Corner::TopRight));
        assert!(COAST_RULES[4..8].iter().all(|r| r.corner == Corner::BottomRight));
        assert!(COAST_RULES[8..12].iter().all(|r| r.corner == Corner::BottomLeft));
        assert!(COAST_RULES[12..].iter().all(|r| r.corner == Corner::TopLeft));
        assert!(COAST_RULES.iter().all(|r| r.pattern[0] == Biome::Water));
    }

    #[test]
    fn test_straight_coast_gives_one_segment() {
        let grid = grid_from(&["WWG", "WWG", "WWG"]);
        let anchors = coastline_anchors(&grid, 1, 1);
        // Правый верхний угол даёт верхнего соседа, правый нижний — нижнего
        assert_eq!(anchors, vec![Vector2::new(10.0, 0.0), Vector2::new(10.0, 20.0)]);

        let segments = extract_coastline(&grid);
        assert_eq!(
            segments,
            vec![CoastlineSegment {
                start_control: Vector2::new(10.0, 5.0),
                through: Vector2::new(10.0, 10.0),
                end_control: Vector2::new(10.0, 15.0),
            }]
        );
    }

    #[test]
    fn test_single_land_neighbor_uses_diagonals() {
        let grid = grid_from(&["WWW", "WWG", "WWW"]);
        let anchors = coastline_anchors(&grid, 1, 1);
        assert_eq!(anchors, vec![Vector2::new(20.0, 0.0), Vector2::new(20.0, 20.0)]);
    }

    #[test]
    fn test_four_anchors_give_two_segments() {
        let grid = grid_from(&["WGW", "WWW", "WGW"]);
        let anchors = coastline_anchors(&grid, 1, 1);
        assert_eq!(
            anchors,
            vec![
                Vector2::new(20.0, 0.0),
                Vector2::new(20.0, 20.0),
                Vector2::new(0.0, 20.0),
                Vector2::new(0.0, 0.0),
            ]
        );
        let segments = extract_coastline(&grid);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start_control, Vector2::new(15.0, 5.0));
        assert_eq!(segments[0].end_control, Vector2::new(15.0, 15.0));
        assert_eq!(segments[1].start_control, Vector2::new(5.0, 15.0));
        assert_eq!(segments[1].end_control, Vector2::new(5.0, 5.0));
    }

    #[test]
    fn test_no_rule_no_segments() {
        assert!(extract_coastline(&grid_from(&["WWW", "WWW", "WWW"])).is_empty());
        assert!(extract_coastline(&grid_from(&["GGG", "GGG", "GGG"])).is_empty());
        // Горы и города не считаются травой
        assert!(extract_coastline(&grid_from(&["WWM", "WWM", "WWT"])).is_empty());
    }

    #[test]
    fn test_land_center_and_border_ignored() {
        let grid = grid_from(&["WWG", "WGG", "WWG"]);
        assert!(coastline_anchors(&grid, 1, 1).is_empty());
        // Внешнее кольцо не обрабатывается
        assert!(coastline_anchors(&grid, 0, 1).is_empty());
        assert!(coastline_anchors(&grid, 2, 2).is_empty());
    }

    #[test]
    fn test_odd_anchor_counts_emit_nothing() {
        // Горы разрывают шаблон правого нижнего угла
        let one = grid_from(&["WWW", "WWG", "WWM"]);
        let anchors = coastline_anchors(&one, 1, 1);
        assert_eq!(anchors.len(), 1);
        assert!(segments_for(one.get(1, 1).position, &anchors).is_empty());

        let three = grid_from(&["WWW", "GWG", "WWM"]);
        assert_eq!(coastline_anchors(&three, 1, 1).len(), 3);
        assert!(extract_coastline(&three).is_empty());
    }

    #[test]
    fn test_interior_scan_on_larger_grid() {
        let grid = grid_from(&["WWWGG", "WWWGG", "WWWGG", "WWWGG"]);
        let segments = extract_coastline(&grid);
        // Берег проходит только через столбец 2 в строках 1 и 2
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.through.x == 20.0));
    }
}

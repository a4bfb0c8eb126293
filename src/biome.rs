use crate::config::{BiomePalette, BiomeThresholds};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Water,
    Grass,
    Mountain,
    Town,
}

impl Biome {
    pub const ALL: [Biome; 4] = [Biome::Water, Biome::Grass, Biome::Mountain, Biome::Town];

    /// Классифицирует тайл по уровню высоты и его случайному числу.
    ///
    /// Правила проверяются по порядку, побеждает первое совпавшее:
    /// горы, затем город, затем трава, иначе вода.
    #[must_use]
    pub fn classify(level: f64, random_value: f64, thresholds: &BiomeThresholds) -> Biome {
        if level > thresholds.mountain {
            return Biome::Mountain;
        }
        if level > thresholds.town && random_value < thresholds.town_probability {
            return Biome::Town;
        }
        if level > thresholds.grass {
            return Biome::Grass;
        }
        Biome::Water
    }

    /// Суша: город и горы тоже считаются сушей
    #[must_use]
    pub fn is_land(self) -> bool {
        self != Biome::Water
    }

    #[must_use]
    pub fn color(self, palette: &BiomePalette) -> &str {
        match self {
            Biome::Water => &palette.water,
            Biome::Grass => &palette.grass,
            Biome::Mountain => &palette.mountain,
            Biome::Town => &palette.town,
        }
    }
}

pub mod biome;
pub mod coastline;
pub mod config;
pub mod decoration;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod noise;
pub mod rng;
pub mod settlement;
pub mod world;

pub use config::{ConfigLoadError, GeneratorConfig};
pub use error::GenerationError;
pub use generator::{GeneratedMap, generate};

// src/rng.rs
//! Детерминированный хеш-генератор случайных чисел
//!
//! Вместо генератора с внутренним состоянием каждое значение выводится из явного
//! кортежа чисел («цепочки сидов»). Один и тот же кортеж всегда даёт один и тот же
//! результат, поэтому порядок вычисления тайлов не влияет на карту.

use crate::geometry::Vector2;
use xxhash_rust::xxh32::Xxh32;

/// Сид самого xxHash32 (не путать с сидом карты)
const XXHASH_SEED: u32 = 0;

/// Делитель нормализации: 2^32, чтобы результат был строго меньше 1.0
const HASH_RANGE: f64 = 4_294_967_296.0;

/// Хеширует кортеж чисел в 32-битное значение.
///
/// Каждое число приводится к `f32`, и хешируется его битовое представление
/// (little-endian), поэтому значения, совпадающие после округления до `f32`,
/// дают одинаковый хеш.
#[must_use]
pub fn hash(seeds: &[f64]) -> u32 {
    let mut hasher = Xxh32::new(XXHASH_SEED);
    for &seed in seeds {
        hasher.update(&(seed as f32).to_bits().to_le_bytes());
    }
    hasher.digest()
}

/// Псевдослучайное число в диапазоне `[0, 1)`
#[must_use]
pub fn normalized(seeds: &[f64]) -> f64 {
    f64::from(hash(seeds)) / HASH_RANGE
}

/// Псевдослучайное число в диапазоне `[min, max)`
#[must_use]
pub fn scaled(seeds: &[f64], min: f64, max: f64) -> f64 {
    min + normalized(seeds) * (max - min)
}

/// Единичный вектор со случайным направлением
#[must_use]
pub fn unit_vector(seeds: &[f64]) -> Vector2 {
    let angle = normalized(seeds) * std::f64::consts::TAU;
    Vector2::new(angle.cos(), angle.sin())
}

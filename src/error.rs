// src/error.rs
//! Ошибки генерации карты
//!
//! Все ошибки обнаруживаются синхронно, и генерация либо завершается полностью,
//! либо прерывается без частичного результата.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// Сид не является конечным числом (NaN или бесконечность)
    #[error("seed must be a finite number, got {0}")]
    InvalidSeed(f64),

    /// Параметр конфигурации вне допустимой области
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Запрос шума за пределами решётки градиентов
    #[error("noise sample at ({x}, {y}) is outside the {width}x{height} gradient lattice")]
    OutOfRange {
        x: f64,
        y: f64,
        width: usize,
        height: usize,
    },
}

impl GenerationError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        GenerationError::Configuration(message.into())
    }
}

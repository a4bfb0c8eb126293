// src/noise.rs
//! Градиентный шум (классический шум Перлина)
//!
//! Решётка единичных градиентов строится один раз из сида карты и дальше только читается.

use crate::error::GenerationError;
use crate::geometry::Vector2;
use crate::rng;

/// Полином 6t⁵ − 15t⁴ + 10t³: нулевые первая и вторая производные на концах [0, 1]
#[must_use]
pub fn smootherstep(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn interpolate(a: f64, b: f64, t: f64) -> f64 {
    a + smootherstep(t) * (b - a)
}

/// Решётка градиентов `width × height`, хранится построчно
#[derive(Debug, Clone, PartialEq)]
pub struct GradientNoiseField {
    pub width: usize,
    pub height: usize,
    gradients: Vec<Vector2>,
}

impl GradientNoiseField {
    /// Узел `(x, y)` получает `unit_vector([seed, x, y])`
    #[must_use]
    pub fn new(seed: f64, width: usize, height: usize) -> Self {
        let gradients = (0..height)
            .flat_map(|y| (0..width).map(move |x| rng::unit_vector(&[seed, x as f64, y as f64])))
            .collect();
        Self {
            width,
            height,
            gradients,
        }
    }

    #[must_use]
    pub fn gradient(&self, x: usize, y: usize) -> Vector2 {
        self.gradients[y * self.width + x]
    }

    /// Значение шума в точке, примерно в диапазоне [-1, 1].
    ///
    /// Ячейка, содержащая точку, должна целиком лежать внутри решётки.
    pub fn sample(&self, coord: Vector2) -> Result<f64, GenerationError> {
        let out_of_range = || GenerationError::OutOfRange {
            x: coord.x,
            y: coord.y,
            width: self.width,
            height: self.height,
        };

        let xf = coord.x.floor();
        let yf = coord.y.floor();
        // NaN не проходит ни одно сравнение и отсекается здесь же
        if !(xf >= 0.0 && yf >= 0.0 && xf + 1.0 < self.width as f64 && yf + 1.0 < self.height as f64)
        {
            return Err(out_of_range());
        }
        let (x0, y0) = (xf as usize, yf as usize);

        let dot = |x: usize, y: usize| {
            let offset = coord - Vector2::new(x as f64, y as f64);
            offset.dot(self.gradient(x, y))
        };

        let tl = dot(x0, y0);
        let tr = dot(x0 + 1, y0);
        let bl = dot(x0, y0 + 1);
        let br = dot(x0 + 1, y0 + 1);

        let top = interpolate(tl, tr, coord.x - xf);
        let bottom = interpolate(bl, br, coord.x - xf);
        Ok(interpolate(top, bottom, coord.y - yf))
    }
}

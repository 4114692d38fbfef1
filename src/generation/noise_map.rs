//! Dense 2D grids of scalar samples.

use super::noise::NoiseGenerator;

/// A `width × height` grid of `f64` samples, stored row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseMap {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl NoiseMap {
    /// Creates a map filled with zeros.
    pub fn new(width: usize, height: usize) -> Self {
        NoiseMap {
            width,
            height,
            values: vec![0.0; width * height],
        }
    }

    /// Creates a map by evaluating `f(x, y)` at every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut values = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                values.push(f(x, y));
            }
        }
        NoiseMap {
            width,
            height,
            values,
        }
    }

    /// Samples a noise field on a regular lattice.
    ///
    /// Cell `(x, y)` holds `noise.sample(origin[0] + x * step, origin[1] + y * step)`.
    pub fn sample(
        noise: &dyn NoiseGenerator,
        width: usize,
        height: usize,
        origin: [f64; 2],
        step: f64,
    ) -> Self {
        Self::from_fn(width, height, |x, y| {
            noise.sample(origin[0] + x as f64 * step, origin[1] + y as f64 * step)
        })
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// All samples, row by row.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The sample at integer cell `(x, y)`.
    ///
    /// # Panics
    /// Panics if the cell is outside the map.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[x + self.width * y]
    }

    /// Overwrites the sample at integer cell `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        self.values[x + self.width * y] = value;
    }

    /// Bilinearly interpolates the map at fractional coordinates.
    ///
    /// Coordinates outside the map are clamped to the nearest edge; they never wrap.
    /// An empty map samples as `0.0`.
    pub fn sample_bilinear(&self, x: f64, y: f64) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let max_x = (self.width - 1) as f64;
        let max_y = (self.height - 1) as f64;
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, max_x) };
        let y = if y.is_nan() { 0.0 } else { y.clamp(0.0, max_y) };

        let (x0, y0) = (x.floor() as usize, y.floor() as usize);
        let (x1, y1) = ((x0 + 1).min(self.width - 1), (y0 + 1).min(self.height - 1));
        let (tx, ty) = (x - x0 as f64, y - y0 as f64);

        let top = lerp(self.get(x0, y0), self.get(x1, y0), tx);
        let bottom = lerp(self.get(x0, y1), self.get(x1, y1), tx);
        lerp(top, bottom, ty)
    }

    /// Largest absolute per-cell difference to another map of the same size.
    pub fn max_difference(&self, other: &NoiseMap) -> f64 {
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> NoiseMap {
        NoiseMap::from_fn(4, 3, |x, y| x as f64 + 10.0 * y as f64)
    }

    #[test]
    fn test_bilinear_exact_on_lattice() {
        let map = ramp();
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(map.sample_bilinear(x as f64, y as f64), map.get(x, y));
            }
        }
    }

    #[test]
    fn test_bilinear_interpolates_between_cells() {
        let map = ramp();
        assert!((map.sample_bilinear(1.5, 0.0) - 1.5).abs() < 1e-12);
        assert!((map.sample_bilinear(2.25, 1.5) - 17.25).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_bounds_clamps_to_edge() {
        let map = ramp();
        assert_eq!(map.sample_bilinear(-7.0, -3.0), map.get(0, 0));
        assert_eq!(map.sample_bilinear(100.0, 1.0), map.get(3, 1));
        assert_eq!(map.sample_bilinear(3.0, 50.0), map.get(3, 2));
    }

    #[test]
    fn test_empty_map_samples_zero() {
        assert_eq!(NoiseMap::new(0, 0).sample_bilinear(1.0, 1.0), 0.0);
    }
}

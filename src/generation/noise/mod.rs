//! # Noise Generators
//!
//! Seeded 2D noise sampled over the horizontal `(x, z)` plane.
//!
//! Every generator returns values in `[-1, 1]`, and the same settings with the same
//! coordinates always produce the same value, on every call and every run.
//!
//! | Kind       | Source                         | Typical use               |
//! |------------|--------------------------------|---------------------------|
//! | `perlin`   | fBm over gradient noise        | base terrain              |
//! | `simplex`  | fBm over simplex noise         | rivers (absolute value)   |
//! | `ridged`   | ridged multifractal            | mountain ranges           |
//! | `cellular` | Worley noise                   | craters, plateaus, warp   |

mod generators;
pub mod settings;

pub use generators::{CellularNoise, PerlinNoise, RidgedNoise, SimplexNoise};
pub use settings::{
    CellularReturn, CellularSettings, DistanceFunction, FractalSettings, NoiseSettings,
    RidgedSettings,
};

use crate::error::{Result, TerrainError};

/// A seeded scalar field over the horizontal plane.
pub trait NoiseGenerator {
    /// Samples the field at world-space `(x, z)`.
    ///
    /// # Returns
    /// A value in `[-1, 1]`.
    fn sample(&self, x: f64, z: f64) -> f64;

    /// The settings this generator was built from.
    fn settings(&self) -> NoiseSettings;

    /// Replaces the settings and rebuilds the underlying noise from the new seed.
    ///
    /// # Errors
    /// Returns `TypeMismatch` if `settings` configures a different kind of generator.
    /// The generator is left unchanged in that case.
    fn update_settings(&mut self, settings: NoiseSettings) -> Result<()>;
}

impl NoiseSettings {
    /// Builds a generator of the matching kind from the sanitized settings.
    pub fn build(&self) -> Box<dyn NoiseGenerator> {
        match self.sanitized() {
            NoiseSettings::Perlin(s) => Box::new(PerlinNoise::new(s)),
            NoiseSettings::Simplex(s) => Box::new(SimplexNoise::new(s)),
            NoiseSettings::Ridged(s) => Box::new(RidgedNoise::new(s)),
            NoiseSettings::Cellular(s) => Box::new(CellularNoise::new(s)),
        }
    }
}

/// Builds the generator for a named layer.
///
/// # Errors
/// Returns `Configuration` if the layer has no settings.
pub fn build_layer(layer: &str, settings: Option<&NoiseSettings>) -> Result<Box<dyn NoiseGenerator>> {
    settings
        .map(NoiseSettings::build)
        .ok_or_else(|| TerrainError::Configuration(format!("missing settings for noise layer `{layer}`")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_layer_requires_settings() {
        let err = build_layer("mountain", None).err().unwrap();
        assert!(matches!(err, TerrainError::Configuration(ref m) if m.contains("mountain")));
    }

    #[test]
    fn test_build_sanitizes_settings() {
        let settings = NoiseSettings::Perlin(FractalSettings {
            octaves: 99,
            ..FractalSettings::default()
        });
        let noise = build_layer("base", Some(&settings)).unwrap();
        assert_eq!(noise.settings(), settings.sanitized());
    }
}

//! Concrete noise generators backed by the `noise` crate.
//!
//! Each generator owns exactly one settings value and rebuilds its underlying
//! noise function from it. Rebuilding is deterministic: the same settings always
//! produce the same field.

use noise::core::worley::{distance_functions, ReturnType};
use noise::{Fbm, MultiFractal, NoiseFn, Perlin, RidgedMulti, Seedable, Simplex, Worley};

use crate::error::{Result, TerrainError};

use super::settings::{
    CellularReturn, CellularSettings, DistanceFunction, FractalSettings, NoiseSettings,
    RidgedSettings,
};
use super::NoiseGenerator;

/// The `noise` crate seeds with `u32`; negative seeds wrap.
fn seed_of(seed: i32) -> u32 {
    seed as u32
}

fn fractal<T>(settings: &FractalSettings) -> Fbm<T>
where
    T: Default + Seedable,
{
    Fbm::<T>::new(seed_of(settings.seed))
        .set_octaves(settings.octaves)
        .set_frequency(settings.frequency())
        .set_persistence(settings.persistence)
        .set_lacunarity(settings.lacunarity)
}

fn mismatch(expected: &'static str, found: &NoiseSettings) -> TerrainError {
    TerrainError::TypeMismatch {
        expected,
        found: found.kind_name(),
    }
}

/// Fractal gradient ("Perlin") noise.
pub struct PerlinNoise {
    settings: FractalSettings,
    source: Fbm<Perlin>,
}

impl PerlinNoise {
    /// Builds the generator from its settings.
    pub fn new(settings: FractalSettings) -> Self {
        PerlinNoise {
            source: fractal(&settings),
            settings,
        }
    }
}

impl NoiseGenerator for PerlinNoise {
    fn sample(&self, x: f64, z: f64) -> f64 {
        self.source.get([x, z]).clamp(-1.0, 1.0)
    }

    fn settings(&self) -> NoiseSettings {
        NoiseSettings::Perlin(self.settings.clone())
    }

    fn update_settings(&mut self, settings: NoiseSettings) -> Result<()> {
        match settings {
            NoiseSettings::Perlin(s) => {
                *self = PerlinNoise::new(s);
                Ok(())
            }
            other => Err(mismatch("perlin", &other)),
        }
    }
}

/// Fractal simplex noise.
pub struct SimplexNoise {
    settings: FractalSettings,
    source: Fbm<Simplex>,
}

impl SimplexNoise {
    /// Builds the generator from its settings.
    pub fn new(settings: FractalSettings) -> Self {
        SimplexNoise {
            source: fractal(&settings),
            settings,
        }
    }
}

impl NoiseGenerator for SimplexNoise {
    fn sample(&self, x: f64, z: f64) -> f64 {
        self.source.get([x, z]).clamp(-1.0, 1.0)
    }

    fn settings(&self) -> NoiseSettings {
        NoiseSettings::Simplex(self.settings.clone())
    }

    fn update_settings(&mut self, settings: NoiseSettings) -> Result<()> {
        match settings {
            NoiseSettings::Simplex(s) => {
                *self = SimplexNoise::new(s);
                Ok(())
            }
            other => Err(mismatch("simplex", &other)),
        }
    }
}

/// Ridged multifractal noise: `1 - |noise|`, sharpened and weighted per octave,
/// giving crest lines suited to mountain ranges.
pub struct RidgedNoise {
    settings: RidgedSettings,
    source: RidgedMulti<Perlin>,
}

impl RidgedNoise {
    /// Builds the generator from its settings.
    pub fn new(settings: RidgedSettings) -> Self {
        let fractal = &settings.fractal;
        let source = RidgedMulti::<Perlin>::new(seed_of(fractal.seed))
            .set_octaves(fractal.octaves)
            .set_frequency(fractal.frequency())
            .set_persistence(fractal.persistence)
            .set_lacunarity(fractal.lacunarity)
            .set_attenuation(settings.attenuation);
        RidgedNoise { settings, source }
    }
}

impl NoiseGenerator for RidgedNoise {
    fn sample(&self, x: f64, z: f64) -> f64 {
        self.source.get([x, z]).clamp(-1.0, 1.0)
    }

    fn settings(&self) -> NoiseSettings {
        NoiseSettings::Ridged(self.settings.clone())
    }

    fn update_settings(&mut self, settings: NoiseSettings) -> Result<()> {
        match settings {
            NoiseSettings::Ridged(s) => {
                *self = RidgedNoise::new(s);
                Ok(())
            }
            other => Err(mismatch("ridged", &other)),
        }
    }
}

/// Cellular (Worley) noise.
pub struct CellularNoise {
    settings: CellularSettings,
    source: Worley,
}

impl CellularNoise {
    /// Builds the generator from its settings.
    pub fn new(settings: CellularSettings) -> Self {
        let source = Worley::new(seed_of(settings.seed))
            .set_frequency(1.0 / settings.scale)
            .set_return_type(match settings.return_type {
                CellularReturn::Value => ReturnType::Value,
                CellularReturn::Distance => ReturnType::Distance,
            });
        let source = match settings.distance_function {
            DistanceFunction::Euclidean => {
                source.set_distance_function(distance_functions::euclidean)
            }
            DistanceFunction::EuclideanSquared => {
                source.set_distance_function(distance_functions::euclidean_squared)
            }
            DistanceFunction::Manhattan => {
                source.set_distance_function(distance_functions::manhattan)
            }
            DistanceFunction::Chebyshev => {
                source.set_distance_function(distance_functions::chebyshev)
            }
        };
        CellularNoise { settings, source }
    }
}

impl NoiseGenerator for CellularNoise {
    fn sample(&self, x: f64, z: f64) -> f64 {
        self.source.get([x, z]).clamp(-1.0, 1.0)
    }

    fn settings(&self) -> NoiseSettings {
        NoiseSettings::Cellular(self.settings.clone())
    }

    fn update_settings(&mut self, settings: NoiseSettings) -> Result<()> {
        match settings {
            NoiseSettings::Cellular(s) => {
                *self = CellularNoise::new(s);
                Ok(())
            }
            other => Err(mismatch("cellular", &other)),
        }
    }
}

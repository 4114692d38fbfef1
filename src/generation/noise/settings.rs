//! Noise settings value objects.
//!
//! Settings are plain, serializable values. They are responsible for keeping
//! themselves in range ([`NoiseSettings::sanitized`]); generators trust what they
//! are given.

use serde::{Deserialize, Serialize};

/// Smallest accepted `scale`; anything below is raised to this.
pub const MIN_SCALE: f64 = 1e-6;
/// Accepted octave range.
pub const OCTAVE_RANGE: (usize, usize) = (1, 8);
/// Accepted persistence range.
pub const PERSISTENCE_RANGE: (f64, f64) = (0.1, 1.0);

/// Parameters shared by every fractal (octave-summed) noise kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalSettings {
    /// Reseeds the underlying noise; equal seeds give equal fields.
    pub seed: i32,
    /// Feature size. Sampling frequency is `1 / scale`, so larger values spread features apart.
    pub scale: f64,
    /// Number of summed octaves (1–8).
    pub octaves: usize,
    /// Amplitude multiplier between successive octaves (0.1–1.0).
    pub persistence: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
}

impl Default for FractalSettings {
    fn default() -> Self {
        FractalSettings {
            seed: 0,
            scale: 64.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl FractalSettings {
    /// Returns a copy with every field clamped to its accepted range.
    pub fn sanitized(&self) -> Self {
        FractalSettings {
            seed: self.seed,
            scale: sanitize_scale(self.scale),
            octaves: self.octaves.clamp(OCTAVE_RANGE.0, OCTAVE_RANGE.1),
            persistence: clamp_or(self.persistence, PERSISTENCE_RANGE, 0.5),
            lacunarity: if self.lacunarity.is_finite() {
                self.lacunarity.max(1.0)
            } else {
                2.0
            },
        }
    }

    /// Sampling frequency of the first octave.
    pub fn frequency(&self) -> f64 {
        1.0 / self.scale
    }
}

/// Ridged multifractal parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RidgedSettings {
    /// Octave parameters.
    pub fractal: FractalSettings,
    /// How strongly each octave's ridges are weighted by the previous octave.
    pub attenuation: f64,
}

impl Default for RidgedSettings {
    fn default() -> Self {
        RidgedSettings {
            fractal: FractalSettings::default(),
            attenuation: 2.0,
        }
    }
}

/// Distance metric used by cellular noise.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceFunction {
    /// Straight-line distance.
    #[default]
    Euclidean,
    /// Squared straight-line distance.
    EuclideanSquared,
    /// Sum of absolute axis differences.
    Manhattan,
    /// Largest absolute axis difference.
    Chebyshev,
}

/// What cellular noise reports for a point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellularReturn {
    /// A per-cell random value, giving flat polygonal regions.
    Value,
    /// Distance to the nearest feature point.
    #[default]
    Distance,
}

/// Cellular (Worley) noise parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellularSettings {
    /// Reseeds the feature-point layout.
    pub seed: i32,
    /// Cell size. Sampling frequency is `1 / scale`.
    pub scale: f64,
    /// Distance metric.
    pub distance_function: DistanceFunction,
    /// Reported quantity.
    pub return_type: CellularReturn,
}

impl Default for CellularSettings {
    fn default() -> Self {
        CellularSettings {
            seed: 0,
            scale: 32.0,
            distance_function: DistanceFunction::default(),
            return_type: CellularReturn::default(),
        }
    }
}

/// Settings for one noise layer. The variant selects the generator kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoiseSettings {
    /// Fractal gradient noise.
    Perlin(FractalSettings),
    /// Fractal simplex noise.
    Simplex(FractalSettings),
    /// Ridged multifractal gradient noise.
    Ridged(RidgedSettings),
    /// Cellular (Worley) noise.
    Cellular(CellularSettings),
}

impl NoiseSettings {
    /// Short name of the generator kind these settings configure.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NoiseSettings::Perlin(_) => "perlin",
            NoiseSettings::Simplex(_) => "simplex",
            NoiseSettings::Ridged(_) => "ridged",
            NoiseSettings::Cellular(_) => "cellular",
        }
    }

    /// Returns a copy with every field clamped to its accepted range.
    pub fn sanitized(&self) -> Self {
        match self {
            NoiseSettings::Perlin(s) => NoiseSettings::Perlin(s.sanitized()),
            NoiseSettings::Simplex(s) => NoiseSettings::Simplex(s.sanitized()),
            NoiseSettings::Ridged(s) => NoiseSettings::Ridged(RidgedSettings {
                fractal: s.fractal.sanitized(),
                attenuation: if s.attenuation.is_finite() && s.attenuation > 0.0 {
                    s.attenuation
                } else {
                    2.0
                },
            }),
            NoiseSettings::Cellular(s) => NoiseSettings::Cellular(CellularSettings {
                scale: sanitize_scale(s.scale),
                ..s.clone()
            }),
        }
    }

    /// The seed of this layer.
    pub fn seed(&self) -> i32 {
        match self {
            NoiseSettings::Perlin(s) | NoiseSettings::Simplex(s) => s.seed,
            NoiseSettings::Ridged(s) => s.fractal.seed,
            NoiseSettings::Cellular(s) => s.seed,
        }
    }
}

fn sanitize_scale(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.max(MIN_SCALE)
    } else {
        MIN_SCALE
    }
}

fn clamp_or(value: f64, range: (f64, f64), fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(range.0, range.1)
    }
}

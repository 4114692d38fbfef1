//! # Domain Warp
//!
//! Distorts sample coordinates with a secondary noise field before the primary
//! field is sampled, breaking up axis-aligned features.
//!
//! The X and Z displacements are read from the warp field at two different
//! coordinate offsets. If both channels used the same offset they would always
//! move a point diagonally by the same amount, so such settings are rejected.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

use super::noise::NoiseGenerator;
use super::noise_map::NoiseMap;

/// Warp parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpSettings {
    /// Maximum displacement, in the units of the warped coordinates.
    pub strength: f64,
    /// Offset added to `(x, z)` when reading the X displacement.
    pub offset_x: [f64; 2],
    /// Offset added to `(x, z)` when reading the Z displacement.
    pub offset_z: [f64; 2],
}

impl Default for WarpSettings {
    fn default() -> Self {
        WarpSettings {
            strength: 8.0,
            offset_x: [0.0, 0.0],
            offset_z: [5.2, 1.3],
        }
    }
}

/// A pure coordinate transform driven by a noise field.
#[derive(Clone, Debug, PartialEq)]
pub struct DomainWarp {
    settings: WarpSettings,
}

impl DomainWarp {
    /// Creates a warp from its settings.
    ///
    /// # Errors
    /// Returns `Configuration` if both channels use the same offset, or if the
    /// strength is not finite.
    pub fn new(settings: WarpSettings) -> Result<Self> {
        if settings.offset_x == settings.offset_z {
            return Err(TerrainError::Configuration(format!(
                "domain warp channels share offset {:?}; X and Z would warp identically",
                settings.offset_x
            )));
        }
        if !settings.strength.is_finite() {
            return Err(TerrainError::Configuration(format!(
                "domain warp strength must be finite, got {}",
                settings.strength
            )));
        }
        Ok(DomainWarp { settings })
    }

    /// The settings this warp was built from.
    pub fn settings(&self) -> &WarpSettings {
        &self.settings
    }

    /// Returns a copy of this warp with a different strength.
    pub fn with_strength(&self, strength: f64) -> Self {
        DomainWarp {
            settings: WarpSettings {
                strength,
                ..self.settings.clone()
            },
        }
    }

    /// Displaces `(x, z)` by the warp field.
    ///
    /// # Returns
    /// `(x + n(x + ox) * strength, z + n(z + oz) * strength)` where each channel reads
    /// the field at its own offset.
    pub fn warp(&self, noise: &dyn NoiseGenerator, x: f64, z: f64) -> (f64, f64) {
        let [ox0, ox1] = self.settings.offset_x;
        let [oz0, oz1] = self.settings.offset_z;
        let dx = noise.sample(x + ox0, z + ox1) * self.settings.strength;
        let dz = noise.sample(x + oz0, z + oz1) * self.settings.strength;
        (x + dx, z + dz)
    }

    /// Warps an already generated map.
    ///
    /// Each cell is resampled from `map` at its warped, usually fractional, position
    /// using bilinear interpolation; positions outside the map clamp to its edge.
    pub fn warp_map(&self, noise: &dyn NoiseGenerator, map: &NoiseMap) -> NoiseMap {
        NoiseMap::from_fn(map.width(), map.height(), |x, y| {
            let (wx, wy) = self.warp(noise, x as f64, y as f64);
            map.sample_bilinear(wx, wy)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::noise::{FractalSettings, NoiseSettings};

    fn field(seed: i32, scale: f64) -> Box<dyn NoiseGenerator> {
        NoiseSettings::Perlin(FractalSettings {
            seed,
            scale,
            ..FractalSettings::default()
        })
        .build()
    }

    fn source_map() -> NoiseMap {
        NoiseMap::sample(field(3, 7.0).as_ref(), 32, 32, [0.37, 0.61], 1.0)
    }

    #[test]
    fn test_identical_offsets_rejected() {
        let settings = WarpSettings {
            offset_x: [1.0, 2.0],
            offset_z: [1.0, 2.0],
            ..WarpSettings::default()
        };
        assert!(matches!(
            DomainWarp::new(settings),
            Err(TerrainError::Configuration(_))
        ));
    }

    #[test]
    fn test_channels_move_independently() {
        let warp = DomainWarp::new(WarpSettings::default()).unwrap();
        let noise = field(11, 9.0);
        let diagonal = (0..100).all(|i| {
            let (x, z) = (i as f64 * 0.77, i as f64 * 1.31);
            let (wx, wz) = warp.warp(noise.as_ref(), x, z);
            ((wx - x) - (wz - z)).abs() < 1e-12
        });
        assert!(!diagonal);
    }

    #[test]
    fn test_warp_changes_most_samples() {
        let map = source_map();
        let warp = DomainWarp::new(WarpSettings {
            strength: 6.0,
            ..WarpSettings::default()
        })
        .unwrap();
        let warped = warp.warp_map(field(19, 10.0).as_ref(), &map);

        let changed = map
            .values()
            .iter()
            .zip(warped.values())
            .filter(|(a, b)| (*a - *b).abs() > 1e-9)
            .count();
        assert!(changed * 2 > map.values().len(), "only {changed} samples changed");
    }

    #[test]
    fn test_warp_converges_as_strength_vanishes() {
        let map = source_map();
        let noise = field(19, 10.0);
        let warp = DomainWarp::new(WarpSettings::default()).unwrap();

        let differences: Vec<f64> = [4.0, 0.4, 0.04, 0.0004]
            .iter()
            .map(|&s| warp.with_strength(s).warp_map(noise.as_ref(), &map).max_difference(&map))
            .collect();
        for pair in differences.windows(2) {
            assert!(pair[1] <= pair[0], "{differences:?}");
        }
        assert!(differences[3] < 1e-3);
        assert_eq!(warp.with_strength(0.0).warp_map(noise.as_ref(), &map), map);
    }
}

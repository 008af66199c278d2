//! Multi-octave Perlin noise height field
//!
//! Samples 2D gradient noise from a shuffled permutation table, sums several
//! octaves of it and stretches the result so the lowest cell is 0.0 and the
//! highest is 1.0.

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ascii::render_ascii;
use crate::error::{check_dimensions, MapGenError, Result};
use crate::tilemap::Tilemap;

/// Lattice coordinates wrap at this size.
const TABLE_SIZE: usize = 256;

/// Shuffled 0..256 range stored twice, so `perm[perm[x] + y + 1]` never
/// runs off the end.
pub struct PermutationTable {
    perm: [usize; TABLE_SIZE * 2],
}

impl PermutationTable {
    pub fn new(rng: &mut ChaCha8Rng) -> Self {
        let mut p: Vec<usize> = (0..TABLE_SIZE).collect();
        p.shuffle(rng);

        let mut perm = [0; TABLE_SIZE * 2];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & (TABLE_SIZE - 1)];
        }
        Self { perm }
    }

    /// Single-octave gradient noise, roughly in [-1, 1]. Zero on every
    /// lattice point.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let xi = (x.floor() as i64 & 255) as usize;
        let yi = (y.floor() as i64 & 255) as usize;
        let xf = x - x.floor();
        let yf = y - y.floor();

        let u = fade(xf);
        let v = fade(yf);

        let p = &self.perm;
        let aa = p[p[xi] + yi];
        let ab = p[p[xi] + yi + 1];
        let ba = p[p[xi + 1] + yi];
        let bb = p[p[xi + 1] + yi + 1];

        let x1 = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let x2 = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);
        lerp(x1, x2, v)
    }
}

/// Quintic smoothstep 6t^5 - 15t^4 + 10t^3.
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product with one of four diagonal gradients.
fn grad(hash: usize, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}

pub struct PerlinNoise {
    width: usize,
    height: usize,
    rng: ChaCha8Rng,
    map: Option<Tilemap<f32>>,
}

impl PerlinNoise {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_seed(width, height, rand::random())
    }

    pub fn with_seed(width: usize, height: usize, seed: u64) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            rng: ChaCha8Rng::seed_from_u64(seed),
            map: None,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Build a normalized height field.
    ///
    /// Octave `o` samples at `(x * f / width, y * f / height)` with
    /// `f = frequency * lacunarity^o`, weighted by `gain^o`.
    pub fn generate(
        &mut self,
        octaves: u32,
        frequency: f64,
        gain: f64,
        lacunarity: f64,
    ) -> Result<&Tilemap<f32>> {
        if octaves == 0 {
            return Err(MapGenError::InvalidConfig("octaves must be at least 1".into()));
        }
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(MapGenError::InvalidConfig(format!(
                "frequency must be positive, got {}",
                frequency
            )));
        }
        if !gain.is_finite() || !lacunarity.is_finite() {
            return Err(MapGenError::InvalidConfig(format!(
                "gain {} and lacunarity {} must be finite",
                gain, lacunarity
            )));
        }

        let table = PermutationTable::new(&mut self.rng);
        let (width, height) = (self.width, self.height);

        let mut raw = Tilemap::new_with(width, height, 0.0f64);
        let mut min_v = f64::INFINITY;
        let mut max_v = f64::NEG_INFINITY;

        for (x, y, cell) in raw.iter_mut() {
            let mut amplitude = 1.0;
            let mut freq = frequency;
            let mut value = 0.0;

            for _ in 0..octaves {
                let sx = x as f64 * freq / width as f64;
                let sy = y as f64 * freq / height as f64;
                value += table.sample(sx, sy) * amplitude;

                amplitude *= gain;
                freq *= lacunarity;
            }

            *cell = value;
            min_v = min_v.min(value);
            max_v = max_v.max(value);
        }

        let range = max_v - min_v;
        let mut map = Tilemap::new_with(width, height, 0.0f32);
        if range > 0.0 && range.is_finite() {
            for (x, y, cell) in map.iter_mut() {
                *cell = ((raw.get(x, y) - min_v) / range) as f32;
            }
        } else {
            warn!(
                "perlin: flat field on {}x{} (range {}), leaving every cell at 0.0",
                width, height, range
            );
        }

        debug!(
            "perlin: {} octaves, frequency {}, raw range [{:.3}, {:.3}]",
            octaves, frequency, min_v, max_v
        );

        Ok(&*self.map.insert(map))
    }

    pub fn map(&self) -> Option<&Tilemap<f32>> {
        self.map.as_ref()
    }

    /// Render with the elevation bands of [`crate::ascii::elevation_char`].
    pub fn render(&self) -> String {
        self.map.as_ref().map(render_ascii).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_fade_curve() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert_approx_eq!(fade(0.5), 0.5);
        assert_approx_eq!(fade(0.25), 0.103515625);
    }

    #[test]
    fn test_gradients() {
        assert_eq!(grad(0, 0.25, 0.5), 0.75);
        assert_eq!(grad(1, 0.25, 0.5), 0.25);
        assert_eq!(grad(2, 0.25, 0.5), -0.25);
        assert_eq!(grad(7, 0.25, 0.5), -0.75);
    }

    #[test]
    fn test_noise_vanishes_on_lattice() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let table = PermutationTable::new(&mut rng);
        for (x, y) in [(0.0, 0.0), (3.0, 7.0), (255.0, 1.0), (300.0, 12.0)] {
            assert_eq!(table.sample(x, y), 0.0);
        }
        assert!(table.sample(0.5, 0.5).abs() <= 1.0);
    }

    #[test]
    fn test_permutation_is_duplicated_shuffle() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let table = PermutationTable::new(&mut rng);
        let mut first: Vec<usize> = table.perm[..TABLE_SIZE].to_vec();
        assert_eq!(&table.perm[..TABLE_SIZE], &table.perm[TABLE_SIZE..]);
        first.sort_unstable();
        assert_eq!(first, (0..TABLE_SIZE).collect::<Vec<_>>());
    }

    #[test]
    fn test_normalized_to_unit_range() {
        let mut gen = PerlinNoise::with_seed(50, 50, 11).unwrap();
        let map = gen.generate(4, 4.0, 0.5, 2.0).unwrap();
        let (min_v, max_v) = map.min_max();
        assert_eq!(min_v, 0.0);
        assert_eq!(max_v, 1.0);
        assert!(map.iter().all(|(_, _, v)| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_same_seed_same_field() {
        let mut a = PerlinNoise::with_seed(32, 24, 6).unwrap();
        let mut b = PerlinNoise::with_seed(32, 24, 6).unwrap();
        let fa = a.generate(3, 3.0, 0.5, 2.0).unwrap().clone();
        let fb = b.generate(3, 3.0, 0.5, 2.0).unwrap().clone();
        assert_eq!(fa, fb);
        assert_eq!(a.render(), b.render());
    }

    #[test]
    fn test_single_cell_is_flat_not_nan() {
        let mut gen = PerlinNoise::with_seed(1, 1, 4).unwrap();
        let map = gen.generate(4, 4.0, 0.5, 2.0).unwrap();
        assert_eq!(*map.get(0, 0), 0.0);
        assert_eq!(gen.render(), "~\n");
    }

    #[test]
    fn test_render_uses_elevation_bands() {
        let mut gen = PerlinNoise::with_seed(40, 20, 8).unwrap();
        gen.generate(4, 4.0, 0.5, 2.0).unwrap();
        let text = gen.render();
        assert_eq!(text.lines().count(), 20);
        assert!(text.lines().all(|l| l.len() == 40));
        assert!(text.chars().all(|c| matches!(c, '~' | '.' | '^' | 'A' | '\n')));
        // The normalized minimum is water and the maximum a peak.
        assert!(text.contains('~') && text.contains('A'));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut gen = PerlinNoise::with_seed(10, 10, 1).unwrap();
        assert!(matches!(
            gen.generate(0, 4.0, 0.5, 2.0),
            Err(MapGenError::InvalidConfig(_))
        ));
        assert!(gen.generate(4, 0.0, 0.5, 2.0).is_err());
        assert!(gen.generate(4, f64::NAN, 0.5, 2.0).is_err());
        assert!(gen.generate(4, 4.0, f64::INFINITY, 2.0).is_err());
        assert!(gen.map().is_none());
    }
}

//! Column heights for the demo terrain, from fractal Brownian motion over
//! simplex noise.

use noise::{NoiseFn, Simplex};

/// Octave settings for [`HeightmapSampler`].
#[derive(Clone, Debug)]
pub struct HeightmapParams {
    pub seed: u64,
    pub octaves: u32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Frequency of the broadest octave, in cycles per block.
    pub base_frequency: f64,
    /// Amplitude of the broadest octave, in blocks.
    pub amplitude: f64,
    /// Height that noise offsets are added to, usually sea level.
    pub base_height: i32,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 0.01,
            amplitude: 12.0,
            base_height: 64,
        }
    }
}

pub struct HeightmapSampler {
    noise: Simplex,
    params: HeightmapParams,
}

impl HeightmapSampler {
    pub fn new(params: HeightmapParams) -> Self {
        let noise = Simplex::new(params.seed as u32);
        Self { noise, params }
    }

    /// Noise offset at `(x, z)`, within `[-max_amplitude, max_amplitude]`.
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.params.base_frequency;
        let mut amplitude = self.params.amplitude;

        for _ in 0..self.params.octaves {
            total += self.noise.get([x * frequency, z * frequency]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }
        total
    }

    /// Y of the topmost solid block in column `(x, z)`.
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        self.params.base_height + self.sample(x as f64, z as f64).round() as i32
    }

    /// Geometric sum of the octave amplitudes.
    pub fn max_amplitude(&self) -> f64 {
        let mut sum = 0.0;
        let mut amp = self.params.amplitude;
        for _ in 0..self.params.octaves {
            sum += amp;
            amp *= self.params.persistence;
        }
        sum
    }

    pub fn params(&self) -> &HeightmapParams {
        &self.params
    }
}

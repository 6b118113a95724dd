use fastnoise_lite::{FastNoiseLite, NoiseType};
use loam_voxel::{BRICK_EDGE, VOLUME_CELLS, VOXEL_MAX, VOXEL_MIN};

use crate::worldgen::{Height, Mode, WorldGenConfig};

/// World-voxel footprint of one chunk per horizontal axis.
pub const CHUNK_STRIDE: i32 = (VOLUME_CELLS * BRICK_EDGE) as i32;

// Octave seed salts, matching the number of default octaves.
const OCTAVE_SALTS: [i32; 4] = [0, 99_173, 41_337, 0x1203_5F31];

/// Shared terrain description: the seed, the generation mode, and the
/// height-band parameters. Cheap to share; the per-job noise state lives in
/// [`GenCtx`].
pub struct World {
    pub seed: i32,
    pub mode: WorldGenMode,
    height: Height,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WorldGenMode {
    Normal,
    Flat { height: i32 },
}

/// Per-job noise generators. Octave instances are seeded and offset from the
/// world seed alone, so every context built for the same world samples
/// identically.
pub struct GenCtx {
    octaves: Vec<Octave>,
}

struct Octave {
    noise: FastNoiseLite,
    amplitude: f32,
    offset_x: f32,
    offset_z: f32,
}

impl World {
    pub fn new(seed: i32, mode: WorldGenMode, height: Height) -> Self {
        Self { seed, mode, height }
    }

    pub fn from_config(seed: i32, config: &WorldGenConfig) -> Self {
        let mode = match config.mode {
            Mode::Normal => WorldGenMode::Normal,
            Mode::Flat => WorldGenMode::Flat {
                height: config.flat.height,
            },
        };
        Self::new(seed, mode, config.height.clone())
    }

    #[inline]
    pub fn is_flat(&self) -> bool {
        matches!(self.mode, WorldGenMode::Flat { .. })
    }

    pub fn make_gen_ctx(&self) -> GenCtx {
        let n = self
            .height
            .octave_frequencies
            .len()
            .min(self.height.octave_amplitudes.len());
        let mut octaves = Vec::with_capacity(n);
        for i in 0..n {
            // The salt table covers the default octave count; extra octaves
            // fold the wrap count into the seed instead of reusing a salt.
            let wrap = (i / OCTAVE_SALTS.len()) as i32;
            let salt = OCTAVE_SALTS[i % OCTAVE_SALTS.len()] ^ (wrap << 16);
            let mut noise = FastNoiseLite::with_seed(self.seed ^ salt);
            noise.set_noise_type(Some(NoiseType::Perlin));
            noise.set_frequency(Some(self.height.octave_frequencies[i]));
            octaves.push(Octave {
                noise,
                amplitude: self.height.octave_amplitudes[i],
                offset_x: seed_offset(self.seed, 0x9E37 ^ (i as u32)),
                offset_z: seed_offset(self.seed, 0x79B9 ^ (i as u32)),
            });
        }
        GenCtx { octaves }
    }

    /// Surface height for a world column. Pure in `(wx, wz, seed)`: chunks
    /// regenerated independently must agree on boundary terrain without
    /// communicating.
    pub fn height_at(&self, ctx: &GenCtx, wx: i32, wz: i32) -> i32 {
        match self.mode {
            WorldGenMode::Flat { height } => height.clamp(VOXEL_MIN, VOXEL_MAX),
            WorldGenMode::Normal => {
                let mut sum = 0.0f32;
                let mut total = 0.0f32;
                for oct in &ctx.octaves {
                    sum += oct.amplitude
                        * oct
                            .noise
                            .get_noise_2d(wx as f32 + oct.offset_x, wz as f32 + oct.offset_z);
                    total += oct.amplitude;
                }
                let n = if total > 0.0 { sum / total } else { 0.0 };
                remap_noise_to_height(n.clamp(-1.0, 1.0), self.height.min_y, self.height.max_y)
            }
        }
    }
}

fn remap_noise_to_height(noise: f32, min_y: i32, max_y: i32) -> i32 {
    let span = (max_y - min_y).max(0) as f32;
    let h = ((noise + 1.0) * 0.5 * span) as i32 + min_y;
    h.clamp(VOXEL_MIN, VOXEL_MAX)
}

// Small integer hash (xorshift-multiply) mapped onto a sample-space offset.
fn seed_offset(seed: i32, salt: u32) -> f32 {
    let mut h = (seed as u32) ^ salt.wrapping_mul(0x9E37_79B9);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    (h % 8192) as f32
}

use loam_geom::Position;
use loam_voxel::{VOXEL_MAX, VOXEL_MIN};
use loam_world::{CHUNK_STRIDE, World, WorldGenConfig, WorldGenMode, generate_volume};
use proptest::prelude::*;

fn normal_world(seed: i32) -> World {
    World::from_config(seed, &WorldGenConfig::default())
}

proptest! {
    // Identical (x, z, seed) always yields the identical height, across
    // repeated calls, fresh contexts, and fresh worlds.
    #[test]
    fn height_is_deterministic(seed in any::<i32>(), wx in -100_000i32..=100_000, wz in -100_000i32..=100_000) {
        let world = normal_world(seed);
        let ctx_a = world.make_gen_ctx();
        let ctx_b = world.make_gen_ctx();
        let h = world.height_at(&ctx_a, wx, wz);
        prop_assert_eq!(world.height_at(&ctx_a, wx, wz), h);
        prop_assert_eq!(world.height_at(&ctx_b, wx, wz), h);

        let again = normal_world(seed);
        let ctx_c = again.make_gen_ctx();
        prop_assert_eq!(again.height_at(&ctx_c, wx, wz), h);
    }

    // Heights stay inside the volume's valid y range.
    #[test]
    fn height_is_in_volume_range(seed in any::<i32>(), wx in any::<i32>(), wz in any::<i32>()) {
        let world = normal_world(seed);
        let ctx = world.make_gen_ctx();
        let h = world.height_at(&ctx, wx, wz);
        prop_assert!(h >= VOXEL_MIN && h <= VOXEL_MAX);
    }
}

#[test]
fn different_seeds_change_the_terrain() {
    let a = normal_world(1);
    let b = normal_world(2);
    let ctx_a = a.make_gen_ctx();
    let ctx_b = b.make_gen_ctx();
    let differs = (0..64).any(|i| {
        let wx = i * 97;
        let wz = i * 61 - 1000;
        a.height_at(&ctx_a, wx, wz) != b.height_at(&ctx_b, wx, wz)
    });
    assert!(differs);
}

#[test]
fn flat_mode_is_constant_and_clamped() {
    let world = World::from_config(
        7,
        &WorldGenConfig::default(),
    );
    assert!(!world.is_flat());

    let flat = World::new(7, WorldGenMode::Flat { height: 3 }, Default::default());
    let ctx = flat.make_gen_ctx();
    assert_eq!(flat.height_at(&ctx, -5000, 9000), 3);

    let too_deep = World::new(7, WorldGenMode::Flat { height: -10_000 }, Default::default());
    let ctx = too_deep.make_gen_ctx();
    assert_eq!(too_deep.height_at(&ctx, 0, 0), VOXEL_MIN);
}

// Surface y for one column of a generated (local) volume.
fn surface_y(volume: &loam_voxel::SparseVolume, x: i32, z: i32) -> Vec<i32> {
    (VOXEL_MIN..=VOXEL_MAX)
        .filter(|&y| {
            volume
                .voxel(Position::new(x, y, z))
                .unwrap()
                .should_draw()
        })
        .collect()
}

#[test]
fn flat_generation_writes_one_surface_voxel_per_column() {
    let world = World::new(0, WorldGenMode::Flat { height: 0 }, Default::default());
    let ctx = world.make_gen_ctx();
    let out = generate_volume(&world, &ctx, Position::ZERO).unwrap();

    assert_eq!(out.surface_voxels, (CHUNK_STRIDE * CHUNK_STRIDE) as u32);
    // One brick per (x, z) cell in the y = 0 cell layer.
    assert_eq!(out.volume.dense_cells(), 64 * 64);
    for (x, z) in [(VOXEL_MIN, VOXEL_MIN), (0, 0), (VOXEL_MAX, -17)] {
        assert_eq!(surface_y(&out.volume, x, z), vec![0]);
    }
}

#[test]
fn adjacent_chunks_agree_on_boundary_columns() {
    let world = normal_world(1337);
    let ctx = world.make_gen_ctx();
    let left = generate_volume(&world, &ctx, Position::ZERO).unwrap();
    let right = generate_volume(&world, &ctx, Position::new(1, 0, 0)).unwrap();

    for z in [-200, -1, 0, 63, 255] {
        // Last column of the left chunk and first column of the right chunk
        // are neighbors in world space; each is generated by exactly one
        // chunk, and both must match the shared height function.
        let world_left = world.height_at(&ctx, VOXEL_MAX, z);
        let world_right = world.height_at(&ctx, CHUNK_STRIDE + VOXEL_MIN, z);
        assert_eq!(surface_y(&left.volume, VOXEL_MAX, z), vec![world_left]);
        assert_eq!(surface_y(&right.volume, VOXEL_MIN, z), vec![world_right]);
    }
}

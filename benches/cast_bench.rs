use cgmath::{Point3, Vector3};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hearth_collision::physics::aabb::create_aabb;
use hearth_collision::world::{fill_blocks, load_chunk, set_block, set_fluid};
use hearth_collision::{
    create_basic_registries, BlockId, ChunkPos, CollisionEvents, CollisionProbe, FluidId,
    TriggerTracker, VoxelPos, WorldData,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Stone floor with scattered obstacles over a 2x2 chunk area
fn build_world() -> WorldData {
    let registries = create_basic_registries().expect("basic content registers");
    let mut world = WorldData::new(Arc::new(registries));
    for x in 0..2 {
        for z in 0..2 {
            load_chunk(&mut world, ChunkPos::new(x, z)).expect("load chunk");
        }
    }
    fill_blocks(&mut world, VoxelPos::new(0, 0, 0), VoxelPos::new(63, 0, 63), BlockId::STONE)
        .expect("floor");

    let mut rng = StdRng::seed_from_u64(7);
    let palette = [BlockId::STONE, BlockId::SLAB, BlockId::FENCE, BlockId::PRESSURE_PLATE];
    for _ in 0..600 {
        let pos = VoxelPos::new(rng.gen_range(0..64), rng.gen_range(1..4), rng.gen_range(0..64));
        let block = palette[rng.gen_range(0..palette.len())];
        set_block(&mut world, pos, block).expect("obstacle");
    }
    for x in 20..28 {
        set_fluid(&mut world, VoxelPos::new(x, 1, 30), FluidId::WATER, 8).expect("water");
    }
    world
}

fn bench_cast(c: &mut Criterion) {
    let world = build_world();
    let player = create_aabb(Point3::new(0.0, 0.0, 0.0), Point3::new(0.6, 1.8, 0.6));
    let start = Point3::new(32.2, 1.0, 32.2);

    let mut group = c.benchmark_group("cast");
    for &length in &[0.0f32, 0.5, 2.0, 8.0] {
        group.throughput(Throughput::Elements(1));
        for &stop in &[false, true] {
            let id = format!("{}/stop={}", length, stop);
            group.bench_with_input(BenchmarkId::from_parameter(id), &length, |b, &length| {
                let mut probe = CollisionProbe::default();
                probe.set_report_overlaps(true);
                let mut events = CollisionEvents::new();
                let mut triggers = TriggerTracker::new();
                let motion = Vector3::new(length * 0.8, -length * 0.2, length * 0.6);
                b.iter(|| {
                    events.clear();
                    probe
                        .cast(&world, &player, start, motion, &mut events, &mut triggers, stop)
                        .expect("cast");
                    black_box(events.events.len())
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_cast);
criterion_main!(benches);

//! Sweep demo
//!
//! Builds a small world and prints what a player-sized collider meets while
//! falling onto a slab and then walking through a door, a pressure plate and
//! a lava pool.

use anyhow::Result;
use cgmath::{Point3, Vector3};
use hearth_collision::physics::aabb::create_aabb;
use hearth_collision::world::{
    fill_blocks, load_chunk, log_world_stats, place_multiblock, set_block, set_fluid,
    validate_world_data,
};
use hearth_collision::{
    create_basic_registries, BlockCollisionCandidate, BlockId, ChunkPos, CollisionConfig,
    CollisionConsumer, CollisionProbe, ContactRecord, FluidId, TriggerTag, TriggerTracker,
    VoxelPos, WorldData,
};
use std::sync::Arc;

/// Prints every event as it arrives
struct PrintingConsumer;

impl CollisionConsumer for PrintingConsumer {
    fn on_solid_contact(&mut self, contact: ContactRecord, candidate: &BlockCollisionCandidate) {
        println!(
            "  t={:.3} solid {:?} box #{} normal=({}, {}, {}) ground={}",
            contact.time_fraction,
            candidate.block,
            candidate.detail_index,
            contact.normal.x,
            contact.normal.y,
            contact.normal.z,
            contact.on_ground
        );
    }

    fn on_damage(&mut self, block: VoxelPos, amount: f32) {
        println!("  damage {} from {:?}", amount, block);
    }

    fn on_trigger(&mut self, block: VoxelPos, tag: TriggerTag) {
        println!("  trigger {:?} at {:?}", tag, block);
    }

    fn on_fluid_contact(&mut self, block: VoxelPos, fill_height: f32) {
        println!("  fluid at {:?} (fill {:.2})", block, fill_height);
    }

    fn on_cast_finished(&mut self) {
        println!("  done");
    }
}

fn build_world() -> Result<WorldData> {
    let registries = create_basic_registries()?;
    let mut world = WorldData::new(Arc::new(registries));
    load_chunk(&mut world, ChunkPos::new(0, 0))?;

    fill_blocks(&mut world, VoxelPos::new(0, 0, 0), VoxelPos::new(31, 0, 31), BlockId::STONE)?;
    set_block(&mut world, VoxelPos::new(4, 1, 4), BlockId::SLAB)?;
    place_multiblock(&mut world, VoxelPos::new(8, 1, 4), BlockId::DOOR)?;
    set_block(&mut world, VoxelPos::new(10, 1, 4), BlockId::PRESSURE_PLATE)?;
    for x in 12..15 {
        set_fluid(&mut world, VoxelPos::new(x, 1, 4), FluidId::LAVA, 8)?;
    }

    validate_world_data(&world).map_err(anyhow::Error::msg)?;
    log_world_stats(&world);
    Ok(world)
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    println!("Hearth Collision Sweep Demo");
    println!("===========================");

    let config = CollisionConfig::default();
    config.validate()?;

    let world = build_world()?;
    let player = create_aabb(Point3::new(0.0, 0.0, 0.0), Point3::new(0.6, 1.8, 0.6));
    let mut probe = CollisionProbe::new(config);
    let mut triggers = TriggerTracker::new();
    let mut consumer = PrintingConsumer;

    println!("Falling onto the slab:");
    probe.cast(
        &world,
        &player,
        Point3::new(4.2, 4.0, 4.2),
        Vector3::new(0.0, -4.0, 0.0),
        &mut consumer,
        &mut triggers,
        true,
    )?;

    println!("Walking through the door, plate and lava:");
    probe.cast(
        &world,
        &player,
        Point3::new(6.0, 1.0, 4.1),
        Vector3::new(9.0, 0.0, 0.0),
        &mut consumer,
        &mut triggers,
        false,
    )?;
    for block in triggers.entered() {
        println!("  entered trigger at {:?}", block);
    }

    let stats = probe.last_stats();
    println!(
        "Last cast: {:?}, {} cells reachable, {} candidates, sampler hit rate {:.0}%",
        stats.strategy,
        stats.cells_reachable,
        stats.candidates,
        stats.sampler.hit_rate() * 100.0
    );

    Ok(())
}

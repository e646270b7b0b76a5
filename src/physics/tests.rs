use super::*;
use crate::config::{CollisionConfig, MissingChunkPolicy};
use crate::error::EngineError;
use crate::physics::aabb::create_aabb;
use crate::world::{
    create_basic_registries, fill_blocks, load_chunk, place_multiblock, set_block, set_fluid,
    BlockId, ChunkPos, FluidId, VoxelPos, WorldData,
};
use cgmath::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn basic_world() -> WorldData {
    init_logging();
    let registries = create_basic_registries().expect("basic content registers");
    let mut world = WorldData::new(Arc::new(registries));
    load_chunk(&mut world, ChunkPos::new(0, 0)).expect("load chunk");
    world
}

/// Entity-local collider with its min corner at the origin
fn collider(width: f32, height: f32, depth: f32) -> AABB {
    create_aabb(Point3::new(0.0, 0.0, 0.0), Point3::new(width, height, depth))
}

fn player() -> AABB {
    collider(0.6, 1.8, 0.6)
}

fn cast_events(
    probe: &mut CollisionProbe,
    world: &WorldData,
    shape: &AABB,
    start: Point3<f32>,
    motion: Vector3<f32>,
    stop_at_first_solid: bool,
) -> CollisionEvents {
    let mut events = CollisionEvents::new();
    let mut triggers = TriggerTracker::new();
    probe
        .cast(world, shape, start, motion, &mut events, &mut triggers, stop_at_first_solid)
        .expect("cast succeeds");
    events
}

/// Keeps the full candidate of every solid contact
#[derive(Default)]
struct CandidateLog {
    solids: Vec<BlockCollisionCandidate>,
    finished: usize,
}

impl CollisionConsumer for CandidateLog {
    fn on_solid_contact(&mut self, _contact: ContactRecord, candidate: &BlockCollisionCandidate) {
        self.solids.push(candidate.clone());
    }

    fn on_cast_finished(&mut self) {
        self.finished += 1;
    }
}

#[test]
fn test_falling_collider_lands_on_slab() {
    let mut world = basic_world();
    set_block(&mut world, VoxelPos::new(4, 0, 4), BlockId::SLAB).expect("place slab");

    let mut probe = CollisionProbe::default();
    let events = cast_events(
        &mut probe,
        &world,
        &collider(1.0, 2.0, 1.0),
        Point3::new(4.0, 2.0, 4.0),
        Vector3::new(0.0, -5.0, 0.0),
        true,
    );

    let contact = events.earliest_solid().expect("collider hits the slab");
    assert!((contact.time_fraction - 0.32).abs() < 1e-5);
    assert_eq!(contact.normal, Vector3::new(0.0, 1.0, 0.0));
    assert!(contact.on_ground);
    assert!((contact.point.y - 0.4).abs() < 1e-5);
    assert_eq!(events.solid_contacts().count(), 1);
    assert_eq!(events.finished, 1);
    assert_eq!(probe.last_stats().strategy, CastStrategy::Iterative);
}

#[test]
fn test_static_overlap_with_trigger_respects_report_overlaps() {
    let mut world = basic_world();
    set_block(&mut world, VoxelPos::new(4, 0, 4), BlockId::PRESSURE_PLATE).expect("place plate");
    let start = Point3::new(4.2, 0.0, 4.2);

    let mut probe = CollisionProbe::default();
    probe.set_report_overlaps(true);
    let events = cast_events(&mut probe, &world, &player(), start, Vector3::new(0.0, 0.0, 0.0), false);
    assert_eq!(events.trigger_count(), 1);
    assert_eq!(probe.last_stats().strategy, CastStrategy::ShortDistance);

    probe.set_report_overlaps(false);
    let events = cast_events(&mut probe, &world, &player(), start, Vector3::new(0.0, 0.0, 0.0), false);
    assert_eq!(events.trigger_count(), 0);
    assert_eq!(events.finished, 1);
}

#[test]
fn test_masked_out_fluid_is_not_reported() {
    let mut world = basic_world();
    for x in 4..=6 {
        set_fluid(&mut world, VoxelPos::new(x, 1, 4), FluidId::WATER, 8).expect("place water");
    }
    let start = Point3::new(2.0, 1.0, 4.2);
    let motion = Vector3::new(6.0, 0.0, 0.0);
    let shape = collider(0.6, 0.8, 0.6);

    let mut probe = CollisionProbe::default();
    probe.set_requested_collision_materials(MaterialMask::ALL.without(MaterialMask::FLUID));
    let events = cast_events(&mut probe, &world, &shape, start, motion, false);
    assert_eq!(events.fluid_count(), 0);
    assert!(probe.last_stats().cells_masked >= 3);

    probe.set_requested_collision_materials(MaterialMask::ALL);
    let events = cast_events(&mut probe, &world, &shape, start, motion, false);
    assert_eq!(events.fluid_count(), 3);
}

#[test]
fn test_stop_at_first_solid_keeps_ties_and_drops_later_hits() {
    let mut world = basic_world();
    fill_blocks(&mut world, VoxelPos::new(6, 1, 4), VoxelPos::new(6, 2, 4), BlockId::STONE)
        .expect("near wall");
    fill_blocks(&mut world, VoxelPos::new(9, 1, 4), VoxelPos::new(9, 2, 4), BlockId::STONE)
        .expect("far wall");
    let start = Point3::new(4.0, 1.0, 4.2);
    let motion = Vector3::new(8.0, 0.0, 0.0);

    let mut probe = CollisionProbe::default();
    let all = cast_events(&mut probe, &world, &player(), start, motion, false);
    let times: Vec<f32> = all.solid_contacts().map(|c| c.time_fraction).collect();
    assert_eq!(times.len(), 4);
    assert!((times[0] - 0.175).abs() < 1e-5);
    assert_eq!(times[0], times[1]);
    assert!((times[2] - 0.55).abs() < 1e-5);

    let first = cast_events(&mut probe, &world, &player(), start, motion, true);
    let times: Vec<f32> = first.solid_contacts().map(|c| c.time_fraction).collect();
    assert_eq!(times.len(), 2);
    assert!(times.iter().all(|t| (t - 0.175).abs() < 1e-5));
    let stats = probe.last_stats();
    assert!(stats.cells_pruned > 0 || stats.events_dropped > 0);
    assert_eq!(first.solid_contacts().next().map(|c| c.normal), Some(Vector3::new(-1.0, 0.0, 0.0)));
}

#[test]
fn test_solid_times_are_monotonic_and_casts_deterministic() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut world = basic_world();
    let palette = [
        BlockId::STONE,
        BlockId::SLAB,
        BlockId::FENCE,
        BlockId::CACTUS,
        BlockId::PRESSURE_PLATE,
        BlockId::CAMPFIRE,
    ];
    for _ in 0..80 {
        let pos = VoxelPos::new(rng.gen_range(2..20), rng.gen_range(1..10), rng.gen_range(2..20));
        let block = palette[rng.gen_range(0..palette.len())];
        set_block(&mut world, pos, block).expect("place block");
    }

    let mut probe = CollisionProbe::default();
    let mut fresh_probe = CollisionProbe::default();
    for _ in 0..40 {
        let start = Point3::new(
            rng.gen_range(5.0..15.0),
            rng.gen_range(2.0..7.0),
            rng.gen_range(5.0..15.0),
        );
        let motion = Vector3::new(
            rng.gen_range(-4.0..4.0),
            rng.gen_range(-4.0..4.0),
            rng.gen_range(-4.0..4.0),
        );

        let mut log = CandidateLog::default();
        let mut triggers = TriggerTracker::new();
        probe
            .cast(&world, &player(), start, motion, &mut log, &mut triggers, false)
            .expect("cast succeeds");
        assert_eq!(log.finished, 1);
        assert!(log
            .solids
            .windows(2)
            .all(|pair| pair[0].time_fraction() <= pair[1].time_fraction()));

        let first = cast_events(&mut probe, &world, &player(), start, motion, false);
        let again = cast_events(&mut probe, &world, &player(), start, motion, false);
        let fresh = cast_events(&mut fresh_probe, &world, &player(), start, motion, false);
        assert_eq!(first.events, again.events);
        assert_eq!(first.events, fresh.events);
        assert_eq!(probe.pending_candidates(), 0);
    }
}

#[test]
fn test_trigger_fires_once_across_detail_boxes() {
    let mut world = basic_world();
    set_block(&mut world, VoxelPos::new(4, 0, 4), BlockId::PRESSURE_PLATE).expect("place plate");
    let start = Point3::new(4.2, 1.0, 4.2);
    let motion = Vector3::new(0.0, -1.0, 0.0);

    let mut probe = CollisionProbe::default();
    let mut triggers = TriggerTracker::new();
    let mut events = CollisionEvents::new();
    probe
        .cast(&world, &player(), start, motion, &mut events, &mut triggers, false)
        .expect("cast succeeds");

    assert_eq!(events.trigger_count(), 1);
    assert_eq!(events.solid_contacts().count(), 0);
    assert_eq!(triggers.entered().count(), 1);

    events.clear();
    probe
        .cast(&world, &player(), start, motion, &mut events, &mut triggers, false)
        .expect("cast succeeds");
    assert_eq!(events.trigger_count(), 1);
    assert_eq!(triggers.entered().count(), 0);
    assert_eq!(triggers.exited().count(), 0);
}

#[test]
fn test_multiblock_is_evaluated_once_at_its_origin() {
    let mut world = basic_world();
    place_multiblock(&mut world, VoxelPos::new(6, 1, 4), BlockId::DOOR).expect("place door");

    let mut probe = CollisionProbe::default();
    let events = cast_events(
        &mut probe,
        &world,
        &player(),
        Point3::new(4.0, 1.0, 3.9),
        Vector3::new(8.0, 0.0, 0.0),
        false,
    );

    let solids: Vec<_> = events
        .events
        .iter()
        .filter_map(|event| match event {
            CollisionEvent::Solid { block, contact, .. } => Some((*block, contact.time_fraction)),
            _ => None,
        })
        .collect();
    assert_eq!(solids.len(), 1);
    assert_eq!(solids[0].0, VoxelPos::new(6, 1, 4));
    assert!((solids[0].1 - 0.175).abs() < 1e-5);
}

#[test]
fn test_overhanging_shape_is_found_from_neighbouring_cell() {
    let mut world = basic_world();
    set_block(&mut world, VoxelPos::new(6, 1, 4), BlockId::FENCE).expect("place fence");

    // Only the fence rail reaches into y = 2
    let mut probe = CollisionProbe::default();
    let mut log = CandidateLog::default();
    let mut triggers = TriggerTracker::new();
    probe
        .cast(
            &world,
            &collider(0.6, 0.3, 0.6),
            Point3::new(4.0, 2.1, 4.3),
            Vector3::new(8.0, 0.0, 0.0),
            &mut log,
            &mut triggers,
            true,
        )
        .expect("cast succeeds");

    assert_eq!(log.solids.len(), 1);
    let rail = &log.solids[0];
    assert_eq!(rail.block, VoxelPos::new(6, 1, 4));
    assert_eq!(rail.detail_index, 1);
    assert!((rail.time_fraction() - 0.175).abs() < 1e-5);
}

#[test]
fn test_resting_contact_is_touching() {
    let mut world = basic_world();
    set_block(&mut world, VoxelPos::new(4, 0, 4), BlockId::STONE).expect("place stone");

    let mut probe = CollisionProbe::default();
    let mut log = CandidateLog::default();
    let mut triggers = TriggerTracker::new();
    probe
        .cast(
            &world,
            &player(),
            Point3::new(4.2, 1.0, 4.2),
            Vector3::new(0.0, -0.5, 0.0),
            &mut log,
            &mut triggers,
            true,
        )
        .expect("cast succeeds");

    assert_eq!(log.solids.len(), 1);
    assert_eq!(log.solids[0].time_fraction(), 0.0);
    assert!(log.solids[0].touching);
    assert!(!log.solids[0].overlapping);

    // Sliding along the top face is not a contact
    let sliding = cast_events(
        &mut probe,
        &world,
        &player(),
        Point3::new(4.2, 1.0, 4.2),
        Vector3::new(2.0, 0.0, 0.0),
        false,
    );
    assert_eq!(sliding.solid_contacts().count(), 0);
}

#[test]
fn test_damage_sources_report_once_per_block() {
    let mut world = basic_world();
    set_block(&mut world, VoxelPos::new(6, 1, 4), BlockId::CAMPFIRE).expect("place campfire");
    set_fluid(&mut world, VoxelPos::new(9, 1, 4), FluidId::LAVA, 8).expect("place lava");
    set_block(&mut world, VoxelPos::new(12, 1, 4), BlockId::CACTUS).expect("place cactus");

    let mut probe = CollisionProbe::default();
    let events = cast_events(
        &mut probe,
        &world,
        &player(),
        Point3::new(4.0, 1.0, 4.2),
        Vector3::new(8.0, 0.0, 0.0),
        false,
    );

    let damage: Vec<(VoxelPos, f32)> = events
        .events
        .iter()
        .filter_map(|event| match event {
            CollisionEvent::Damage { block, amount } => Some((*block, *amount)),
            _ => None,
        })
        .collect();
    assert_eq!(
        damage,
        vec![
            (VoxelPos::new(6, 1, 4), 1.0),
            (VoxelPos::new(9, 1, 4), 4.0),
            (VoxelPos::new(12, 1, 4), 1.0),
        ]
    );
    assert_eq!(events.fluid_count(), 1);

    // Only the cactus blocks movement
    let contact = events.earliest_solid().expect("cactus is solid");
    assert_eq!(contact.damage, 1.0);
    assert_eq!(events.solid_contacts().count(), 1);
}

#[test]
fn test_short_motion_matches_static_overlap() {
    let mut world = basic_world();
    set_block(&mut world, VoxelPos::new(4, 2, 4), BlockId::STONE).expect("place stone");
    let start = Point3::new(4.2, 0.5, 4.2);

    let mut probe = CollisionProbe::default();
    probe.set_report_overlaps(true);
    let still = cast_events(&mut probe, &world, &player(), start, Vector3::new(0.0, 0.0, 0.0), false);
    let nudged = cast_events(&mut probe, &world, &player(), start, Vector3::new(1.0e-6, 0.0, 0.0), false);

    assert_eq!(probe.last_stats().strategy, CastStrategy::ShortDistance);
    assert_eq!(still.events, nudged.events);
    let contact = still.earliest_solid().expect("collider overlaps the stone");
    assert_eq!(contact.time_fraction, 0.0);
    // Shallowest push out is down, out of the bottom face
    assert_eq!((contact.normal.x, contact.normal.z), (0.0, 0.0));
    assert!((contact.normal.y + 1.0).abs() < 1e-6);

    probe.set_report_overlaps(false);
    let silent = cast_events(&mut probe, &world, &player(), start, Vector3::new(0.0, 0.0, 0.0), false);
    assert!(silent.events.is_empty());
}

#[test]
fn test_empty_mask_and_flat_collider_are_no_ops() {
    let mut world = basic_world();
    set_block(&mut world, VoxelPos::new(4, 0, 4), BlockId::STONE).expect("place stone");
    let start = Point3::new(4.0, 2.0, 4.0);
    let motion = Vector3::new(0.0, -3.0, 0.0);

    let mut probe = CollisionProbe::default();
    probe.set_requested_collision_materials(MaterialMask::EMPTY);
    let events = cast_events(&mut probe, &world, &player(), start, motion, false);
    assert!(events.events.is_empty());
    assert_eq!(events.finished, 1);
    assert_eq!(probe.last_stats().strategy, CastStrategy::NoOp);

    probe.set_requested_collision_materials(MaterialMask::ALL);
    let events = cast_events(&mut probe, &world, &collider(1.0, 0.0, 1.0), start, motion, false);
    assert!(events.events.is_empty());
    assert_eq!(events.finished, 1);
}

#[test]
fn test_contract_violations_fail_fast() {
    let world = basic_world();
    let mut probe = CollisionProbe::default();
    let mut events = CollisionEvents::new();
    let mut triggers = TriggerTracker::new();

    let result = probe.cast(
        &world,
        &player(),
        Point3::new(1.0, 1.0, 1.0),
        Vector3::new(f32::NAN, 0.0, 0.0),
        &mut events,
        &mut triggers,
        false,
    );
    assert!(matches!(result, Err(EngineError::InvalidInput { .. })));

    let inverted = create_aabb(Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 1.0));
    let result = probe.cast(
        &world,
        &inverted,
        Point3::new(1.0, 1.0, 1.0),
        Vector3::new(1.0, 0.0, 0.0),
        &mut events,
        &mut triggers,
        false,
    );
    assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    assert_eq!(events.finished, 0);
}

#[test]
fn test_oversized_sweep_is_rejected() {
    let world = basic_world();
    let config = CollisionConfig {
        max_broad_phase_blocks: 64,
        ..CollisionConfig::default()
    };
    let mut probe = CollisionProbe::new(config);
    let mut events = CollisionEvents::new();
    let mut triggers = TriggerTracker::new();

    let result = probe.cast(
        &world,
        &player(),
        Point3::new(2.0, 2.0, 2.0),
        Vector3::new(20.0, 0.0, 20.0),
        &mut events,
        &mut triggers,
        false,
    );
    assert!(matches!(result, Err(EngineError::SweepTooLarge { max_cells: 64, .. })));
    assert_eq!(probe.pending_candidates(), 0);
}

#[test]
fn test_missing_chunk_policy() {
    let mut world = basic_world();
    set_block(&mut world, VoxelPos::new(1, 1, 4), BlockId::STONE).expect("place stone");
    // Sweeping towards negative x crosses into the unloaded column at x < 0
    let start = Point3::new(3.0, 1.0, 4.2);
    let motion = Vector3::new(-5.0, 0.0, 0.0);

    let mut lenient = CollisionProbe::default();
    let events = cast_events(&mut lenient, &world, &player(), start, motion, false);
    assert_eq!(events.solid_contacts().count(), 1);
    assert!(lenient.last_stats().sampler.missing_chunks > 0);

    let strict_config = CollisionConfig {
        missing_chunk_policy: MissingChunkPolicy::Fail,
        ..CollisionConfig::default()
    };
    let mut strict = CollisionProbe::new(strict_config);
    let mut events = CollisionEvents::new();
    let mut triggers = TriggerTracker::new();
    let result = strict.cast(&world, &player(), start, motion, &mut events, &mut triggers, false);
    assert!(matches!(result, Err(EngineError::ChunkNotLoaded { .. })));
    assert_eq!(events.finished, 0);
}

#[test]
fn test_long_diagonal_sweep_walks_the_path() {
    let mut world = basic_world();
    set_block(&mut world, VoxelPos::new(20, 20, 20), BlockId::STONE).expect("place stone");

    let mut probe = CollisionProbe::default();
    let mut log = CandidateLog::default();
    let mut triggers = TriggerTracker::new();
    probe
        .cast(
            &world,
            &collider(0.5, 0.5, 0.5),
            Point3::new(1.0, 1.0, 1.0),
            Vector3::new(20.0, 20.0, 20.0),
            &mut log,
            &mut triggers,
            true,
        )
        .expect("diagonal sweep stays within the cell limit");

    assert_eq!(log.finished, 1);
    assert_eq!(log.solids.len(), 1);
    assert_eq!(log.solids[0].block, VoxelPos::new(20, 20, 20));
    assert!((log.solids[0].time_fraction() - 0.925).abs() < 1e-4);
    // Only a tube around the diagonal is listed, not the 21^3 bounding box
    assert!(probe.last_stats().cells_in_range < 21 * 21 * 21);
}

#[test]
fn test_huge_motion_is_rejected_without_overflow() {
    let world = basic_world();
    let mut probe = CollisionProbe::default();
    let mut events = CollisionEvents::new();
    let mut triggers = TriggerTracker::new();

    let result = probe.cast(
        &world,
        &player(),
        Point3::new(0.0, 10.0, 0.0),
        Vector3::new(4.0e9, 0.0, 0.0),
        &mut events,
        &mut triggers,
        false,
    );
    assert!(matches!(result, Err(EngineError::SweepTooLarge { .. })));
    assert_eq!(events.finished, 0);
    assert_eq!(probe.pending_candidates(), 0);
}

#[test]
fn test_fluid_in_door_upper_half_is_reported() {
    let mut world = basic_world();
    place_multiblock(&mut world, VoxelPos::new(3, 5, 3), BlockId::DOOR).expect("place door");
    set_fluid(&mut world, VoxelPos::new(3, 6, 3), FluidId::WATER, 8).expect("place water");
    let shape = collider(0.5, 0.5, 0.5);
    let start = Point3::new(1.0, 6.2, 3.0);
    let motion = Vector3::new(4.0, 0.0, 0.0);

    let mut probe = CollisionProbe::default();
    probe.set_requested_collision_materials(MaterialMask::FLUID);
    let events = cast_events(&mut probe, &world, &shape, start, motion, false);
    let fluids: Vec<_> = events
        .events
        .iter()
        .filter_map(|event| match event {
            CollisionEvent::Fluid { block, fill_height } => Some((*block, *fill_height)),
            _ => None,
        })
        .collect();
    assert_eq!(fluids, vec![(VoxelPos::new(3, 6, 3), 1.0)]);

    // The door shape is still resolved once, at its origin
    probe.set_requested_collision_materials(MaterialMask::ALL);
    let events = cast_events(&mut probe, &world, &shape, start, motion, false);
    assert_eq!(events.fluid_count(), 1);
    let solids: Vec<_> = events
        .events
        .iter()
        .filter_map(|event| match event {
            CollisionEvent::Solid { block, .. } => Some(*block),
            _ => None,
        })
        .collect();
    assert_eq!(solids, vec![VoxelPos::new(3, 5, 3)]);
}

#[test]
fn test_far_from_origin_collider_is_still_swept() {
    let world = basic_world();
    let mut probe = CollisionProbe::default();
    probe.set_report_overlaps(false);

    // At this distance f32 spacing exceeds the collider width
    let events = cast_events(
        &mut probe,
        &world,
        &player(),
        Point3::new(-2.0e9, 10.0, 0.0),
        Vector3::new(0.0, -1.0, 0.0),
        false,
    );
    assert_eq!(events.finished, 1);
    assert_eq!(probe.last_stats().strategy, CastStrategy::Iterative);
}

#[test]
fn test_solid_contact_damage_follows_material_mask() {
    let mut world = basic_world();
    set_block(&mut world, VoxelPos::new(6, 1, 4), BlockId::CACTUS).expect("place cactus");
    let start = Point3::new(4.0, 1.0, 4.2);
    let motion = Vector3::new(4.0, 0.0, 0.0);

    let solid_damage = |events: &CollisionEvents| {
        events.events.iter().find_map(|event| match event {
            CollisionEvent::Solid { contact, .. } => Some(contact.damage),
            _ => None,
        })
    };
    let damage_events = |events: &CollisionEvents| {
        events
            .events
            .iter()
            .filter(|event| matches!(event, CollisionEvent::Damage { .. }))
            .count()
    };

    let mut probe = CollisionProbe::default();
    probe.set_requested_collision_materials(MaterialMask::ALL.without(MaterialMask::DAMAGE));
    let events = cast_events(&mut probe, &world, &player(), start, motion, true);
    assert_eq!(solid_damage(&events), Some(0.0));
    assert_eq!(damage_events(&events), 0);

    probe.set_requested_collision_materials(MaterialMask::ALL);
    let events = cast_events(&mut probe, &world, &player(), start, motion, true);
    assert_eq!(solid_damage(&events), Some(1.0));
    assert_eq!(damage_events(&events), 1);
}

//! Swept block collision probe
//!
//! Casts a moving box through the block world and reports what it meets.
//! Cells of the broad phase are ordered by a lower bound on their entry time
//! so an early solid hit lets the rest of the sweep be skipped. Events are
//! gathered first and handed to the consumer afterwards in time order.

use super::aabb::{
    aabb_is_degenerate, aabb_is_valid, aabb_overlaps, aabb_penetration_vector, aabb_swept_bounds,
    aabb_time_of_impact, aabb_translated, create_aabb, AABB,
};
use super::block_sampler::{log_sampler_stats, WorldBlockSampler};
use super::block_snapshot::BlockSnapshot;
use super::collision_data::{
    BlockCollisionCandidate, CandidateKind, CastStats, CastStrategy, CollisionCandidate,
    SweepQuery,
};
use super::consumer::CollisionConsumer;
use super::material::MaterialMask;
use super::trigger_tracker::TriggerTracker;
use crate::config::CollisionConfig;
use crate::constants::collision::CANDIDATE_POOL_CAPACITY;
use crate::constants::core::WORLD_HEIGHT;
use crate::error::{EngineError, EngineResult};
use crate::memory::{MemoryPool, PoolHandle};
use crate::world::core::{FluidId, VoxelPos};
use crate::world::interfaces::BlockWorld;
use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3, Zero};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;

/// Where and when the collider meets one box
#[derive(Debug, Clone, Copy)]
struct BoxContact {
    detail_index: usize,
    time: f32,
    normal: Vector3<f32>,
    point: Point3<f32>,
    touching: bool,
    overlapping: bool,
}

/// Center of the region shared by two boxes; a face patch when they touch
fn contact_point(a: &AABB, b: &AABB) -> Point3<f32> {
    let mid = |axis: usize| {
        let lo = a.min[axis].max(b.min[axis]);
        let hi = a.max[axis].min(b.max[axis]);
        (lo + hi) * 0.5
    };
    Point3::new(mid(0), mid(1), mid(2))
}

fn box_contact(
    moving: &AABB,
    motion: Vector3<f32>,
    target: &AABB,
    sweep: bool,
    report_overlaps: bool,
    epsilon: f32,
) -> Option<BoxContact> {
    if aabb_overlaps(moving, target) {
        if !report_overlaps {
            return None;
        }
        let normal = aabb_penetration_vector(moving, target)
            .filter(|push| push.magnitude2() > 0.0)
            .map(|push| push.normalize())
            .unwrap_or_else(Vector3::zero);
        return Some(BoxContact {
            detail_index: 0,
            time: 0.0,
            normal,
            point: contact_point(moving, target),
            touching: false,
            overlapping: true,
        });
    }

    if !sweep {
        return None;
    }

    let hit = aabb_time_of_impact(moving, motion, target)?;
    let time = entry_time(hit.entry);
    let moved = aabb_translated(moving, motion * time);
    Some(BoxContact {
        detail_index: 0,
        time,
        normal: hit.normal,
        point: contact_point(&moved, target),
        touching: hit.entry.abs() <= epsilon,
        overlapping: false,
    })
}

/// Entry fraction clamped to 0..=1, folding -0.0 into 0.0
fn entry_time(entry: f32) -> f32 {
    if entry <= 0.0 {
        0.0
    } else {
        entry.min(1.0)
    }
}

/// Inclusive cell range covered by `bounds`, grown by `padding` cells
///
/// Computed in i64 so far-out or huge sweeps cannot overflow; y is clamped
/// to the world height.
fn cell_range(bounds: &AABB, padding: i32) -> ([i64; 3], [i64; 3]) {
    let padding = padding as i64;
    let mut lo = [0i64; 3];
    let mut hi = [0i64; 3];
    for axis in 0..3 {
        let first = bounds.min[axis].floor() as i64;
        let last = (bounds.max[axis].ceil() as i64).saturating_sub(1).max(first);
        lo[axis] = first.saturating_sub(padding);
        hi[axis] = last.saturating_add(padding);
    }
    lo[1] = lo[1].max(0);
    hi[1] = hi[1].min(WORLD_HEIGHT as i64 - 1);
    (lo, hi)
}

/// Number of cells in a range, zero when any axis is empty
fn range_cells(lo: &[i64; 3], hi: &[i64; 3]) -> u64 {
    (0..3)
        .map(|axis| hi[axis].saturating_sub(lo[axis]).saturating_add(1).max(0) as u64)
        .fold(1u64, u64::saturating_mul)
}

/// Part of the motion during which the box is within reach of world-height cells
fn vertical_window(moving: &AABB, motion: Vector3<f32>, padding: i32) -> Option<(f32, f32)> {
    let floor = -(padding as f32);
    let ceiling = WORLD_HEIGHT as f32 + padding as f32;
    if motion.y == 0.0 {
        let inside = moving.max.y > floor && moving.min.y < ceiling;
        return inside.then_some((0.0, 1.0));
    }
    let a = (floor - moving.max.y) / motion.y;
    let b = (ceiling - moving.min.y) / motion.y;
    let enter = a.min(b).max(0.0);
    let exit = a.max(b).min(1.0);
    (enter <= exit).then_some((enter, exit))
}

/// Sub-intervals of `window` so that no step travels more than one block on
/// any axis
fn sweep_steps(motion: Vector3<f32>, window: (f32, f32)) -> u64 {
    let longest = motion.x.abs().max(motion.y.abs()).max(motion.z.abs());
    ((longest * (window.1 - window.0)).ceil() as u64).max(1)
}

pub struct CollisionProbe {
    config: CollisionConfig,
    requested_materials: MaterialMask,
    report_overlaps: bool,
    candidates: MemoryPool<BlockCollisionCandidate>,
    /// Candidate handles in dispatch order
    order: Vec<PoolHandle>,
    /// Broad-phase cells with their entry time lower bound
    cells: Vec<(f32, VoxelPos)>,
    /// Cells already listed by the broad phase this cast
    seen_cells: FxHashSet<VoxelPos>,
    /// Multi-block origins already evaluated this cast
    visited_origins: FxHashSet<VoxelPos>,
    stats: CastStats,
}

impl CollisionProbe {
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            config,
            requested_materials: MaterialMask::ALL,
            report_overlaps: false,
            candidates: MemoryPool::with_capacity(CANDIDATE_POOL_CAPACITY),
            order: Vec::with_capacity(CANDIDATE_POOL_CAPACITY),
            cells: Vec::new(),
            seen_cells: FxHashSet::default(),
            visited_origins: FxHashSet::default(),
            stats: CastStats::default(),
        }
    }

    /// Categories reported by later casts; an empty mask makes casts no-ops
    pub fn set_requested_collision_materials(&mut self, mask: MaterialMask) {
        self.requested_materials = mask;
    }

    pub fn requested_collision_materials(&self) -> MaterialMask {
        self.requested_materials
    }

    /// Report boxes the collider already overlaps at the start of the motion
    pub fn set_report_overlaps(&mut self, report: bool) {
        self.report_overlaps = report;
    }

    pub fn report_overlaps(&self) -> bool {
        self.report_overlaps
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Diagnostics of the most recent cast
    pub fn last_stats(&self) -> &CastStats {
        &self.stats
    }

    /// Sweep `collider` (entity-local) from `start` along `motion`
    ///
    /// Events reach `consumer` in non-decreasing time order, followed by
    /// `on_cast_finished`. With `stop_at_first_solid`, nothing later than the
    /// earliest solid contact is reported. On error no callback fires.
    #[allow(clippy::too_many_arguments)]
    pub fn cast<W: BlockWorld, C: CollisionConsumer>(
        &mut self,
        world: &W,
        collider: &AABB,
        start: Point3<f32>,
        motion: Vector3<f32>,
        consumer: &mut C,
        triggers: &mut TriggerTracker,
        stop_at_first_solid: bool,
    ) -> EngineResult<()> {
        if !(0..3).all(|axis| start[axis].is_finite() && motion[axis].is_finite()) {
            return Err(EngineError::InvalidInput {
                context: format!("non-finite start {:?} or motion {:?}", start, motion),
            });
        }
        if !aabb_is_valid(collider) {
            return Err(EngineError::InvalidInput {
                context: format!("collider {:?} is inverted or non-finite", collider),
            });
        }

        let query = SweepQuery {
            collider: *collider,
            start,
            motion,
            requested_materials: self.requested_materials,
            report_overlaps: self.report_overlaps,
        };

        self.stats = CastStats::default();
        triggers.begin_cast();

        let result = match self.collect(world, &query, stop_at_first_solid) {
            Ok(earliest_solid) => {
                self.dispatch(consumer, triggers, earliest_solid, stop_at_first_solid);
                consumer.on_cast_finished();
                log::debug!(
                    "[CollisionProbe::cast] {:?}: {} reachable cells, {} pruned, {} candidates, {} events",
                    self.stats.strategy,
                    self.stats.cells_reachable,
                    self.stats.cells_pruned,
                    self.stats.candidates,
                    self.stats.events_dispatched
                );
                Ok(())
            }
            Err(e) => {
                log::warn!("[CollisionProbe::cast] Cast failed: {}", e);
                Err(e)
            }
        };

        self.reset_scratch();
        result
    }

    /// Gather candidates; returns the earliest solid contact time
    fn collect<W: BlockWorld>(
        &mut self,
        world: &W,
        query: &SweepQuery,
        stop_at_first_solid: bool,
    ) -> EngineResult<f32> {
        // Degeneracy is judged on the local shape; far from the origin f32
        // rounding may flatten the translated box
        if query.requested_materials.is_empty() || aabb_is_degenerate(&query.collider) {
            self.stats.strategy = CastStrategy::NoOp;
            log::trace!("[CollisionProbe::collect] Empty mask or zero-volume collider, skipping");
            return Ok(f32::INFINITY);
        }

        let moving = aabb_translated(&query.collider, query.start.to_vec());
        let short = query.motion.magnitude() < self.config.short_distance_threshold;
        let sweep = if short {
            self.stats.strategy = CastStrategy::ShortDistance;
            if !query.report_overlaps {
                return Ok(f32::INFINITY);
            }
            false
        } else {
            self.stats.strategy = CastStrategy::Iterative;
            true
        };

        let padding = world.registries().blocks.broad_phase_padding();
        self.gather_cells(&moving, query.motion, padding, sweep)?;

        let mut sampler = WorldBlockSampler::new(self.config.missing_chunk_policy);
        sampler.initialize(world);
        let result = self.evaluate_cells(&mut sampler, query, &moving, sweep, stop_at_first_solid);
        self.stats.sampler = sampler.stats();
        if log::log_enabled!(log::Level::Debug) {
            log_sampler_stats(&self.stats.sampler);
        }
        sampler.cleanup();
        result
    }

    /// Fill `cells` with every reachable cell, ordered by entry time bound
    ///
    /// The motion is walked in steps of at most one block, and only the cells
    /// around each step's swept box are listed, so the work grows with the
    /// path length. `max_broad_phase_blocks` bounds the total.
    fn gather_cells(
        &mut self,
        moving: &AABB,
        motion: Vector3<f32>,
        padding: i32,
        sweep: bool,
    ) -> EngineResult<()> {
        let window = if sweep {
            match vertical_window(moving, motion, padding) {
                Some(window) => window,
                None => return Ok(()),
            }
        } else {
            (0.0, 0.0)
        };
        let steps = if sweep { sweep_steps(motion, window) } else { 1 };
        let max_cells = self.config.max_broad_phase_blocks;
        // Every step enters at least one new cell
        if steps > max_cells as u64 {
            return Err(EngineError::SweepTooLarge {
                cells: usize::try_from(steps).unwrap_or(usize::MAX),
                max_cells,
            });
        }
        let pad = padding as f32;

        for step in 0..steps {
            let bounds = if sweep {
                let span = window.1 - window.0;
                let t0 = window.0 + span * (step as f32 / steps as f32);
                let t1 = window.0 + span * ((step + 1) as f32 / steps as f32);
                let from = aabb_translated(moving, motion * t0);
                aabb_swept_bounds(&from, motion * (t1 - t0))
            } else {
                *moving
            };

            let (lo, hi) = cell_range(&bounds, padding);
            let step_cells = range_cells(&lo, &hi);
            if step_cells == 0 {
                continue;
            }
            if step_cells > max_cells as u64 {
                return Err(EngineError::SweepTooLarge {
                    cells: usize::try_from(step_cells).unwrap_or(usize::MAX),
                    max_cells,
                });
            }

            for x in lo[0]..=hi[0] {
                for y in lo[1]..=hi[1] {
                    for z in lo[2]..=hi[2] {
                        // Cells past the i32 coordinate space never hold blocks
                        let (Ok(x), Ok(y), Ok(z)) =
                            (i32::try_from(x), i32::try_from(y), i32::try_from(z))
                        else {
                            continue;
                        };
                        let pos = VoxelPos::new(x, y, z);
                        if !self.seen_cells.insert(pos) {
                            continue;
                        }
                        self.stats.cells_in_range += 1;
                        if self.stats.cells_in_range > max_cells {
                            return Err(EngineError::SweepTooLarge {
                                cells: self.stats.cells_in_range,
                                max_cells,
                            });
                        }

                        let corner = Point3::new(x as f32, y as f32, z as f32);
                        let cell = create_aabb(
                            corner - Vector3::new(pad, pad, pad),
                            corner + Vector3::new(1.0 + pad, 1.0 + pad, 1.0 + pad),
                        );
                        let bound = if sweep {
                            aabb_time_of_impact(moving, motion, &cell)
                                .map(|hit| entry_time(hit.entry))
                        } else {
                            aabb_overlaps(moving, &cell).then_some(0.0)
                        };
                        if let Some(bound) = bound {
                            self.cells.push((bound, pos));
                        }
                    }
                }
            }
        }

        // Stable: equal bounds keep discovery order
        self.cells.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.stats.cells_reachable = self.cells.len();
        Ok(())
    }

    fn evaluate_cells<'w, W: BlockWorld>(
        &mut self,
        sampler: &mut WorldBlockSampler<'w, W>,
        query: &SweepQuery,
        moving: &AABB,
        sweep: bool,
        stop_at_first_solid: bool,
    ) -> EngineResult<f32> {
        let mut earliest_solid = f32::INFINITY;
        let mut block = BlockSnapshot::default();
        let cells = std::mem::take(&mut self.cells);

        let mut result = Ok(());
        for (i, &(bound, pos)) in cells.iter().enumerate() {
            if stop_at_first_solid && bound > earliest_solid {
                self.stats.cells_pruned = cells.len() - i;
                break;
            }
            if let Err(e) = self.evaluate_cell(
                sampler,
                &mut block,
                pos,
                query,
                moving,
                sweep,
                &mut earliest_solid,
            ) {
                result = Err(e);
                break;
            }
        }

        self.cells = cells;
        result.map(|_| earliest_solid)
    }

    #[allow(clippy::too_many_arguments)]
    fn evaluate_cell<'w, W: BlockWorld>(
        &mut self,
        sampler: &mut WorldBlockSampler<'w, W>,
        block: &mut BlockSnapshot<'w>,
        pos: VoxelPos,
        query: &SweepQuery,
        moving: &AABB,
        sweep: bool,
        earliest_solid: &mut f32,
    ) -> EngineResult<()> {
        block.assign(sampler.read(pos)?);
        let origin = block.origin_coordinate();
        let is_filler = block.is_filler();
        let multiblock = block.block_type.is_some_and(|b| b.multiblock);

        if !block.material.intersects(query.requested_materials) {
            if block.material != MaterialMask::EMPTY {
                self.stats.cells_masked += 1;
            }
            return Ok(());
        }

        // A multi-block shape is evaluated once, at its origin; fluid belongs
        // to each cell
        let first_visit = !(is_filler || multiblock) || self.visited_origins.insert(origin);
        if !is_filler {
            return self.evaluate_block(block, query, moving, sweep, earliest_solid, first_visit, true);
        }

        self.evaluate_block(block, query, moving, sweep, earliest_solid, false, true)?;
        if !first_visit {
            return Ok(());
        }
        block.assign(sampler.read(origin)?);
        self.evaluate_block(block, query, moving, sweep, earliest_solid, true, false)
    }

    /// Classify one resolved block into solid, trigger, fluid and damage candidates
    ///
    /// `shape` covers the block's boxes, `fluid` the fluid volume of its cell.
    #[allow(clippy::too_many_arguments)]
    fn evaluate_block(
        &mut self,
        block: &mut BlockSnapshot<'_>,
        query: &SweepQuery,
        moving: &AABB,
        sweep: bool,
        earliest_solid: &mut f32,
        shape: bool,
        fluid: bool,
    ) -> EngineResult<()> {
        let mask = query.requested_materials;
        let epsilon = self.config.contact_epsilon;
        let origin = block.position;
        let wants_damage = mask.contains(MaterialMask::DAMAGE);

        let wants_solid = shape
            && block.material.contains(MaterialMask::SOLID)
            && mask.contains(MaterialMask::SOLID);
        let wants_trigger = shape
            && block.material.contains(MaterialMask::TRIGGER)
            && mask.contains(MaterialMask::TRIGGER);
        let block_damage = if shape && wants_damage {
            block.block_damage()
        } else {
            0.0
        };
        let fluid_damage = if fluid && wants_damage {
            block.fluid_damage()
        } else {
            0.0
        };

        let mut shape_contact: Option<BoxContact> = None;
        if wants_solid || wants_trigger || block_damage > 0.0 {
            let boxes = block.bounding_boxes()?;
            for (index, target) in boxes.translated(origin.to_vector()).enumerate() {
                let Some(mut contact) =
                    box_contact(moving, query.motion, &target, sweep, query.report_overlaps, epsilon)
                else {
                    continue;
                };
                contact.detail_index = index;
                if shape_contact.map_or(true, |best| contact.time < best.time) {
                    shape_contact = Some(contact);
                }
            }
        }

        if let Some(contact) = shape_contact {
            if wants_solid {
                let submerged = block.fluid_id != FluidId::NONE
                    && origin.y as f32 + block.fill_height >= contact.point.y;
                self.push_candidate(
                    CandidateKind::Solid,
                    block,
                    &contact,
                    block_damage + fluid_damage,
                    submerged,
                );
                *earliest_solid = earliest_solid.min(contact.time);
            }
            if wants_trigger {
                self.push_candidate(CandidateKind::Trigger, block, &contact, 0.0, false);
            }
        }

        let wants_fluid = block.material.contains(MaterialMask::FLUID) && mask.contains(MaterialMask::FLUID);
        let mut fluid_contact = None;
        if fluid && block.fill_height > 0.0 && (wants_fluid || fluid_damage > 0.0) {
            let base = Point3::from_vec(origin.to_vector());
            let volume = create_aabb(base, base + Vector3::new(1.0, block.fill_height, 1.0));
            fluid_contact =
                box_contact(moving, query.motion, &volume, sweep, query.report_overlaps, epsilon);
            if let (Some(contact), true) = (fluid_contact, wants_fluid) {
                self.push_candidate(CandidateKind::Fluid, block, &contact, fluid_damage, true);
            }
        }

        // One damage event per block, at the earliest contact that hurts
        let mut damage = 0.0;
        let mut damage_contact: Option<BoxContact> = None;
        for (contact, amount) in [(shape_contact, block_damage), (fluid_contact, fluid_damage)] {
            let Some(contact) = contact else { continue };
            if amount <= 0.0 {
                continue;
            }
            damage += amount;
            if damage_contact.map_or(true, |best| contact.time < best.time) {
                damage_contact = Some(contact);
            }
        }
        if let Some(contact) = damage_contact {
            self.push_candidate(CandidateKind::Damage, block, &contact, damage, false);
        }

        Ok(())
    }

    fn push_candidate(
        &mut self,
        kind: CandidateKind,
        block: &BlockSnapshot<'_>,
        contact: &BoxContact,
        damage: f32,
        submerged: bool,
    ) {
        let handle = self.candidates.acquire();
        self.order.push(handle);
        self.stats.candidates += 1;

        let Some(candidate) = self.candidates.get_mut(handle) else {
            return;
        };
        candidate.base = CollisionCandidate {
            point: contact.point,
            time_fraction: contact.time,
        };
        candidate.kind = kind;
        candidate.block = block.position;
        candidate.block_id = block.block_id;
        candidate.fluid_id = block.fluid_id;
        candidate.material = block.material;
        candidate.detail_index = contact.detail_index;
        candidate.normal = contact.normal;
        candidate.touching = contact.touching;
        candidate.overlapping = contact.overlapping;
        candidate.damage = damage;
        candidate.fill_height = block.fill_height;
        candidate.trigger = block.block_type.and_then(|b| b.trigger);
        candidate.submerged = submerged;
    }

    /// Deliver candidates in time order
    fn dispatch<C: CollisionConsumer>(
        &mut self,
        consumer: &mut C,
        triggers: &mut TriggerTracker,
        earliest_solid: f32,
        stop_at_first_solid: bool,
    ) {
        let candidates = &self.candidates;
        // Stable: equal times keep discovery order
        self.order.sort_by(|a, b| match (candidates.get(*a), candidates.get(*b)) {
            (Some(a), Some(b)) => a.base.compare(&b.base),
            _ => Ordering::Equal,
        });

        let threshold = self.config.ground_normal_threshold;
        for handle in &self.order {
            let Some(candidate) = candidates.get(*handle) else {
                continue;
            };
            if stop_at_first_solid && candidate.time_fraction() > earliest_solid {
                self.stats.events_dropped += 1;
                continue;
            }

            match candidate.kind {
                CandidateKind::Solid => {
                    consumer.on_solid_contact(candidate.to_contact_record(threshold), candidate)
                }
                CandidateKind::Damage => consumer.on_damage(candidate.block, candidate.damage),
                CandidateKind::Trigger => {
                    let Some(tag) = candidate.trigger else { continue };
                    if !triggers.track(candidate.block) {
                        continue;
                    }
                    consumer.on_trigger(candidate.block, tag);
                }
                CandidateKind::Fluid => {
                    consumer.on_fluid_contact(candidate.block, candidate.fill_height)
                }
            }
            self.stats.events_dispatched += 1;
        }
    }

    /// Drop all per-cast scratch state; storage is kept for the next cast
    fn reset_scratch(&mut self) {
        self.candidates.release_all();
        self.order.clear();
        self.cells.clear();
        self.seen_cells.clear();
        self.visited_origins.clear();
    }

    /// Candidates currently held; empty outside of a cast
    pub fn pending_candidates(&self) -> usize {
        self.candidates.len()
    }
}

impl Default for CollisionProbe {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}

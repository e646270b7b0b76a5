//! Collision event consumers
//!
//! Events of one cast arrive in non-decreasing time order, followed by exactly
//! one `on_cast_finished`.

use super::collision_data::{BlockCollisionCandidate, ContactRecord};
use crate::world::core::{TriggerTag, VoxelPos};

pub trait CollisionConsumer {
    /// Collider meets a solid block
    fn on_solid_contact(&mut self, contact: ContactRecord, candidate: &BlockCollisionCandidate);

    /// Collider touches a damaging block or fluid; fired once per block per cast
    fn on_damage(&mut self, _block: VoxelPos, _amount: f32) {}

    /// Collider touches a trigger block; fired once per block per cast
    fn on_trigger(&mut self, _block: VoxelPos, _tag: TriggerTag) {}

    /// Collider enters a fluid volume of the given fill height
    fn on_fluid_contact(&mut self, _block: VoxelPos, _fill_height: f32) {}

    fn on_cast_finished(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollisionEvent {
    Solid {
        contact: ContactRecord,
        block: VoxelPos,
        detail_index: usize,
    },
    Damage {
        block: VoxelPos,
        amount: f32,
    },
    Trigger {
        block: VoxelPos,
        tag: TriggerTag,
    },
    Fluid {
        block: VoxelPos,
        fill_height: f32,
    },
}

/// Consumer that records every event in delivery order
#[derive(Debug, Clone, Default)]
pub struct CollisionEvents {
    pub events: Vec<CollisionEvent>,
    pub finished: usize,
}

impl CollisionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.finished = 0;
    }

    pub fn solid_contacts(&self) -> impl Iterator<Item = &ContactRecord> + '_ {
        self.events.iter().filter_map(|event| match event {
            CollisionEvent::Solid { contact, .. } => Some(contact),
            _ => None,
        })
    }

    /// First solid contact of the cast, if any
    pub fn earliest_solid(&self) -> Option<&ContactRecord> {
        self.solid_contacts().next()
    }

    pub fn trigger_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, CollisionEvent::Trigger { .. }))
            .count()
    }

    pub fn damage_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, CollisionEvent::Damage { .. }))
            .count()
    }

    pub fn fluid_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, CollisionEvent::Fluid { .. }))
            .count()
    }
}

impl CollisionConsumer for CollisionEvents {
    fn on_solid_contact(&mut self, contact: ContactRecord, candidate: &BlockCollisionCandidate) {
        self.events.push(CollisionEvent::Solid {
            contact,
            block: candidate.block,
            detail_index: candidate.detail_index,
        });
    }

    fn on_damage(&mut self, block: VoxelPos, amount: f32) {
        self.events.push(CollisionEvent::Damage { block, amount });
    }

    fn on_trigger(&mut self, block: VoxelPos, tag: TriggerTag) {
        self.events.push(CollisionEvent::Trigger { block, tag });
    }

    fn on_fluid_contact(&mut self, block: VoxelPos, fill_height: f32) {
        self.events.push(CollisionEvent::Fluid { block, fill_height });
    }

    fn on_cast_finished(&mut self) {
        self.finished += 1;
    }
}

//! Collision configuration
//!
//! Tuning values are loaded from TOML and validated once up front; the probe
//! and sampler copy what they need so a cast never re-checks them.

use crate::constants::collision::{
    CONTACT_EPSILON, GROUND_NORMAL_THRESHOLD, MAX_BROAD_PHASE_BLOCKS, SHORT_DISTANCE_THRESHOLD,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What a read does when the column holding a block is not resident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingChunkPolicy {
    /// Unloaded space is empty air
    #[default]
    TreatAsAir,
    /// Reads into unloaded space fail with `EngineError::ChunkNotLoaded`
    Fail,
}

/// Collision engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Motions shorter than this use the static overlap strategy
    pub short_distance_threshold: f32,
    /// Entry times within this of zero count as touching
    pub contact_epsilon: f32,
    /// Minimum normal.y for a contact to count as ground
    pub ground_normal_threshold: f32,
    /// Upper bound on cells a single cast may enumerate
    pub max_broad_phase_blocks: usize,
    pub missing_chunk_policy: MissingChunkPolicy,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            short_distance_threshold: SHORT_DISTANCE_THRESHOLD,
            contact_epsilon: CONTACT_EPSILON,
            ground_normal_threshold: GROUND_NORMAL_THRESHOLD,
            max_broad_phase_blocks: MAX_BROAD_PHASE_BLOCKS,
            missing_chunk_policy: MissingChunkPolicy::TreatAsAir,
        }
    }
}

impl CollisionConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.short_distance_threshold.is_finite() || self.short_distance_threshold < 0.0 {
            return Err(anyhow::anyhow!(
                "CollisionConfig: short_distance_threshold {} must be finite and >= 0",
                self.short_distance_threshold
            ));
        }

        if !self.contact_epsilon.is_finite() || self.contact_epsilon < 0.0 {
            return Err(anyhow::anyhow!(
                "CollisionConfig: contact_epsilon {} must be finite and >= 0",
                self.contact_epsilon
            ));
        }

        if !(0.0..=1.0).contains(&self.ground_normal_threshold) {
            return Err(anyhow::anyhow!(
                "CollisionConfig: ground_normal_threshold {} must be within 0..=1",
                self.ground_normal_threshold
            ));
        }

        if self.max_broad_phase_blocks == 0 {
            return Err(anyhow::anyhow!(
                "CollisionConfig: max_broad_phase_blocks cannot be 0. {}",
                self.suggest_safe_config()
            ));
        }

        log::info!(
            "[CollisionConfig] Validation: short_distance={}, epsilon={}, ground={}, max_cells={}, missing_chunks={:?}",
            self.short_distance_threshold,
            self.contact_epsilon,
            self.ground_normal_threshold,
            self.max_broad_phase_blocks,
            self.missing_chunk_policy
        );
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).context("CollisionConfig: invalid TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("CollisionConfig: failed to read {}", path.display()))?;
        Self::from_toml_str(&source)
            .with_context(|| format!("CollisionConfig: failed to load {}", path.display()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("CollisionConfig: failed to serialize")
    }

    /// Largest cube (in blocks per side) one sweep step may cover
    ///
    /// Steps travel at most one block, so this bounds the collider size.
    pub fn max_sweep_extent(&self) -> usize {
        (self.max_broad_phase_blocks as f64).cbrt().floor() as usize
    }

    /// Suggest safe configuration parameters
    pub fn suggest_safe_config(&self) -> String {
        let mut suggestions = Vec::new();

        if self.max_broad_phase_blocks > 0 {
            suggestions.push(format!(
                "max_broad_phase_blocks={} allows colliders of about {} blocks per side",
                self.max_broad_phase_blocks,
                self.max_sweep_extent()
            ));
        }

        suggestions.push("Common safe configurations:".to_string());
        suggestions.push(format!(
            "  - max_broad_phase_blocks={} (players and mobs)",
            MAX_BROAD_PHASE_BLOCKS
        ));
        suggestions.push("  - max_broad_phase_blocks=65536 (long projectile paths)".to_string());

        suggestions.join("\n")
    }
}
